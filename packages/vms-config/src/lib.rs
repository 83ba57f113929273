mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Cadence, Config, Enrichment, Postgres, Providers, RedditProviderConfig, Security, Service,
	Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	let offsets = &cfg.cadence.step_offsets_days;

	if offsets.is_empty() {
		return Err(Error::Validation {
			message: "cadence.step_offsets_days must be non-empty.".to_string(),
		});
	}
	if offsets[0] != 0 {
		return Err(Error::Validation {
			message: "cadence.step_offsets_days must start at day 0.".to_string(),
		});
	}
	if offsets.windows(2).any(|pair| pair[1] <= pair[0]) {
		return Err(Error::Validation {
			message: "cadence.step_offsets_days must be strictly increasing.".to_string(),
		});
	}
	if cfg.cadence.entitled_tiers.iter().all(|tier| tier.trim().is_empty()) {
		return Err(Error::Validation {
			message: "cadence.entitled_tiers must name at least one tier.".to_string(),
		});
	}
	if cfg.enrichment.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "enrichment.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.enrichment.max_body_bytes == 0 {
		return Err(Error::Validation {
			message: "enrichment.max_body_bytes must be greater than zero.".to_string(),
		});
	}
	if cfg.enrichment.max_concurrent == 0 {
		return Err(Error::Validation {
			message: "enrichment.max_concurrent must be greater than zero.".to_string(),
		});
	}

	if let Some(reddit) = cfg.providers.reddit.as_ref() {
		for (label, value) in [
			("providers.reddit.client_id", &reddit.client_id),
			("providers.reddit.client_secret", &reddit.client_secret),
			("providers.reddit.token_url", &reddit.token_url),
			("providers.reddit.api_base", &reddit.api_base),
		] {
			if value.trim().is_empty() {
				return Err(Error::Validation { message: format!("{label} must be non-empty.") });
			}
		}

		if reddit.refresh_margin_seconds < 0 {
			return Err(Error::Validation {
				message: "providers.reddit.refresh_margin_seconds must be zero or greater."
					.to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.security.api_auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false)
	{
		cfg.security.api_auth_token = None;
	}

	cfg.cadence.entitled_tiers = cfg
		.cadence
		.entitled_tiers
		.iter()
		.map(|tier| tier.trim().to_lowercase())
		.filter(|tier| !tier.is_empty())
		.collect();

	if cfg.enrichment.user_agent.trim().is_empty() {
		cfg.enrichment.user_agent = crate::Enrichment::default().user_agent;
	}
}
