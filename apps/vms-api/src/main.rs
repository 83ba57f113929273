use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = vms_api::Args::parse();

	vms_api::run(args).await
}
