use std::{
	fs,
	io::{self, Write},
	path::PathBuf,
	sync::Arc,
};

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use tracing_subscriber::EnvFilter;

use vms_providers::page::PageClient;
use vms_service::{Enricher, Vendor};

#[derive(Debug, Parser)]
#[command(
	version = vms_cli::VERSION,
	rename_all = "kebab",
	styles = vms_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// JSON array of vendor objects.
	#[arg(long, short = 'i', value_name = "FILE")]
	pub input: PathBuf,
	/// Defaults to stdout.
	#[arg(long, short = 'o', value_name = "FILE")]
	pub output: Option<PathBuf>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = vms_config::load(&args.config)?;

	init_tracing(&config)?;

	let raw = fs::read_to_string(&args.input)
		.wrap_err_with(|| format!("Failed to read {}.", args.input.display()))?;
	let vendors: Vec<Vendor> = serde_json::from_str(&raw)
		.wrap_err_with(|| format!("{} must hold a JSON array of vendors.", args.input.display()))?;
	let fetcher = PageClient::new(&config.enrichment)?;
	let enricher = Enricher::new(Arc::new(fetcher), &config.enrichment);
	let total = vendors.len();
	let had_email = vendors.iter().filter(|vendor| has_email(vendor)).count();

	tracing::info!(vendors = total, "Enriching vendors.");

	let enriched = enricher.enrich_batch(vendors).await;

	if enriched.len() != total {
		return Err(eyre::eyre!("Enrichment returned {} vendors for {total}.", enriched.len()));
	}

	let with_email = enriched.iter().filter(|vendor| has_email(vendor)).count();

	tracing::info!(
		vendors = total,
		gained_email = with_email.saturating_sub(had_email),
		with_email,
		"Enrichment finished."
	);

	let rendered = serde_json::to_string_pretty(&enriched)?;

	match args.output.as_ref() {
		Some(path) => fs::write(path, rendered)
			.wrap_err_with(|| format!("Failed to write {}.", path.display()))?,
		None => {
			let mut stdout = io::stdout().lock();

			stdout.write_all(rendered.as_bytes())?;
			stdout.write_all(b"\n")?;
		},
	}

	Ok(())
}

fn has_email(vendor: &Vendor) -> bool {
	vendor.email.as_deref().is_some_and(|email| !email.trim().is_empty())
}

fn init_tracing(config: &vms_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	// Stdout may carry the enriched JSON, so logs go to stderr.
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

	Ok(())
}
