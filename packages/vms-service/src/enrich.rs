//! Contact enrichment for vendor records.
//!
//! Scraping is best effort. A vendor whose site cannot be read comes back unchanged, and nothing
//! in this module returns `crate::Error`.

use std::sync::Arc;

use futures::future;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::{PageFetcher, VmsService};
use vms_domain::contact::{self, FinancingSignal};

/// What a scrape found. Every field is optional; an all-empty value is a valid outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
	pub email: Option<String>,
	pub contact_name: Option<String>,
	/// Only set when no email address was found at all.
	pub contact_form_url: Option<String>,
	pub financing: FinancingSignal,
}

/// Why a scrape produced nothing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Absent {
	#[error("Website {website:?} is not a usable URL.")]
	InvalidUrl { website: String },
	#[error("Website {url} could not be fetched: {reason}")]
	Unreachable { url: String, reason: String },
}

/// A vendor record as produced by lead discovery. Keys this module does not know about are kept
/// as they are.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
	#[serde(default)]
	pub website: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub contact_name: Option<String>,
	#[serde(default)]
	pub contact_form_url: Option<String>,
	#[serde(default)]
	pub offers_financing_on_website: Option<bool>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Clone)]
pub struct Enricher {
	fetcher: Arc<dyn PageFetcher>,
	max_concurrent: usize,
	max_subpages: usize,
}
impl Enricher {
	pub fn new(fetcher: Arc<dyn PageFetcher>, cfg: &vms_config::Enrichment) -> Self {
		Self {
			fetcher,
			max_concurrent: usize::try_from(cfg.max_concurrent).unwrap_or(1).max(1),
			max_subpages: usize::try_from(cfg.max_subpages).unwrap_or(0),
		}
	}

	/// Reads the landing page and, when it has no personal address, up to `max_subpages`
	/// contact-like pages on the same host.
	pub async fn scrape_contact_info(&self, website: &str) -> Result<ContactInfo, Absent> {
		let url = contact::normalize_website(website)
			.ok_or_else(|| Absent::InvalidUrl { website: website.to_string() })?;
		let html = self.fetcher.fetch(&url).await.map_err(|err| {
			tracing::debug!(url = %url, error = %err, "Vendor website fetch failed.");

			Absent::Unreachable { url: url.to_string(), reason: err.to_string() }
		})?;
		let mut emails = contact::extract_emails(&html);
		let mut contact_name = contact::extract_contact_name(&html);
		let mut form_url: Option<Url> = None;
		let mut financing = contact::mentions_financing(&html);

		if !has_personal(&emails) {
			let subpages = contact::find_subpage_urls(&html, &url);

			for page_url in subpages.into_iter().take(self.max_subpages) {
				let page = match self.fetcher.fetch(&page_url).await {
					Ok(page) => page,
					Err(err) => {
						tracing::debug!(
							url = %page_url,
							error = %err,
							"Vendor subpage fetch failed."
						);

						continue;
					},
				};

				for email in contact::extract_emails(&page) {
					if !emails.contains(&email) {
						emails.push(email);
					}
				}

				if contact_name.is_none() {
					contact_name = contact::extract_contact_name(&page);
				}
				if form_url.is_none() {
					form_url = contact::find_contact_form_url(&page, &page_url);
				}

				financing |= contact::mentions_financing(&page);

				if has_personal(&emails) {
					break;
				}
			}
		}

		if emails.is_empty() && form_url.is_none() {
			form_url = contact::find_contact_form_url(&html, &url);
		}

		let email = contact::pick_best_email(&emails).map(str::to_string);
		let contact_form_url =
			if emails.is_empty() { form_url.map(|url| url.to_string()) } else { None };

		Ok(ContactInfo {
			email,
			contact_name,
			contact_form_url,
			financing: FinancingSignal::from_scan(financing),
		})
	}

	/// Enriches vendors in fixed batches of `max_concurrent`, finishing each batch before the
	/// next starts. Output order matches input order.
	pub async fn enrich_batch(&self, vendors: Vec<Vendor>) -> Vec<Vendor> {
		let mut out = Vec::with_capacity(vendors.len());
		let mut pending = vendors.into_iter();

		loop {
			let batch = pending.by_ref().take(self.max_concurrent).collect::<Vec<_>>();

			if batch.is_empty() {
				break;
			}

			let enriched =
				future::join_all(batch.into_iter().map(|vendor| self.enrich_vendor(vendor))).await;

			out.extend(enriched);
		}

		out
	}

	async fn enrich_vendor(&self, vendor: Vendor) -> Vendor {
		let Some(website) = vendor.website.as_deref().filter(|site| !site.trim().is_empty()) else {
			return vendor;
		};

		match self.scrape_contact_info(website).await {
			Ok(info) => apply_contact_info(vendor, info),
			Err(absent) => {
				tracing::warn!(reason = %absent, "Vendor enrichment found nothing.");

				vendor
			},
		}
	}
}

impl VmsService {
	pub async fn enrich_batch(&self, vendors: Vec<Vendor>) -> Vec<Vendor> {
		let total = vendors.len();
		let enriched = self.enricher.enrich_batch(vendors).await;

		tracing::info!(vendors = total, "Enrichment batch finished.");

		enriched
	}
}

/// Scraped values win only when present; otherwise the vendor keeps what it had.
pub fn apply_contact_info(mut vendor: Vendor, info: ContactInfo) -> Vendor {
	if info.email.is_some() {
		vendor.email = info.email;
	}
	if info.contact_name.is_some() {
		vendor.contact_name = info.contact_name;
	}
	if info.contact_form_url.is_some() {
		vendor.contact_form_url = info.contact_form_url;
	}
	if let Some(offered) = info.financing.as_column() {
		vendor.offers_financing_on_website = Some(offered);
	}

	vendor
}

fn has_personal(emails: &[String]) -> bool {
	emails.iter().any(|email| contact::is_personal_email(email))
}
