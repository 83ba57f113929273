use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = vms_enrich::Args::parse();

	vms_enrich::run(args).await
}
