use reqwest::{Client, header::ACCEPT};
use url::Url;

use crate::Result;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml";

/// Bounded HTML fetches for vendor websites.
#[derive(Clone)]
pub struct PageClient {
	client: Client,
	max_body_bytes: usize,
}
impl PageClient {
	pub fn new(cfg: &vms_config::Enrichment) -> Result<Self> {
		let client = crate::http_client(cfg.timeout_ms, &cfg.user_agent)?;
		let max_body_bytes = usize::try_from(cfg.max_body_bytes).unwrap_or(usize::MAX);

		Ok(Self { client, max_body_bytes })
	}

	/// GETs `url`, following redirects, and returns at most `max_body_bytes` of the body decoded
	/// as lossy UTF-8. Non-success statuses are errors.
	pub async fn fetch(&self, url: &Url) -> Result<String> {
		let mut res = self
			.client
			.get(url.clone())
			.header(ACCEPT, HTML_ACCEPT)
			.send()
			.await?
			.error_for_status()?;
		let mut body: Vec<u8> = Vec::new();

		while let Some(chunk) = res.chunk().await? {
			let remaining = self.max_body_bytes.saturating_sub(body.len());

			if chunk.len() >= remaining {
				body.extend_from_slice(&chunk[..remaining]);

				break;
			}

			body.extend_from_slice(&chunk);
		}

		Ok(String::from_utf8_lossy(&body).into_owned())
	}
}
