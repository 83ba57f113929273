pub mod cadences;
pub mod due;
pub mod enrich;
pub mod enroll;
pub mod leads;
pub mod social;
pub mod steps;
pub mod stop;
pub mod time_serde;

mod error;

pub use cadences::{CadenceView, CadenceWithSteps, LeadSummaryView, ListCadencesRequest, StepView};
pub use due::{DueLead, DueRequest, DueStep};
pub use enrich::{Absent, ContactInfo, Enricher, Vendor};
pub use enroll::EnrollRequest;
pub use error::{Error, Result};
pub use leads::{AddLeadRequest, LeadView};
pub use social::{SocialSearchRequest, SocialSearchResponse};
pub use steps::{StepActionRequest, StepActionResponse};
pub use stop::{UpdateStatusRequest, UpdateStatusResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use sqlx::PgPool;
use time::Duration;
use url::Url;
use uuid::Uuid;

use vms_config::Config;
use vms_providers::{
	page::PageClient,
	reddit::{RedditClient, TokenCache},
};
use vms_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Fetches one HTML page for enrichment.
pub trait PageFetcher
where
	Self: Send + Sync,
{
	fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, vms_providers::Result<String>>;
}

/// Decides whether an account may use premium features: cadences and social search.
pub trait EntitlementGate
where
	Self: Send + Sync,
{
	fn is_entitled<'a>(&'a self, pool: &'a PgPool, user_id: Uuid) -> BoxFuture<'a, Result<bool>>;
}

/// Reads `profiles.subscription_tier` and accepts the configured tiers. Accounts without a
/// profile row are treated as free.
pub struct ProfileTierGate {
	entitled_tiers: Vec<String>,
}
impl ProfileTierGate {
	pub fn new(cfg: &vms_config::Cadence) -> Self {
		Self { entitled_tiers: cfg.entitled_tiers.clone() }
	}
}

#[derive(Clone)]
pub struct Collaborators {
	pub fetcher: Arc<dyn PageFetcher>,
	pub entitlements: Arc<dyn EntitlementGate>,
}
impl Collaborators {
	pub fn new(fetcher: Arc<dyn PageFetcher>, entitlements: Arc<dyn EntitlementGate>) -> Self {
		Self { fetcher, entitlements }
	}

	pub fn from_config(cfg: &Config) -> Result<Self> {
		let fetcher = PageClient::new(&cfg.enrichment)?;

		Ok(Self {
			fetcher: Arc::new(fetcher),
			entitlements: Arc::new(ProfileTierGate::new(&cfg.cadence)),
		})
	}
}

pub struct VmsService {
	pub cfg: Config,
	pub db: Db,
	pub enricher: Enricher,
	pub entitlements: Arc<dyn EntitlementGate>,
	pub reddit: Option<RedditClient>,
}
impl VmsService {
	pub fn new(cfg: Config, db: Db) -> Result<Self> {
		let collaborators = Collaborators::from_config(&cfg)?;

		Self::with_collaborators(cfg, db, collaborators)
	}

	pub fn with_collaborators(cfg: Config, db: Db, collaborators: Collaborators) -> Result<Self> {
		let reddit = match cfg.providers.reddit.as_ref() {
			Some(reddit_cfg) => {
				let tokens =
					Arc::new(TokenCache::new(Duration::seconds(reddit_cfg.refresh_margin_seconds)));

				Some(RedditClient::new(reddit_cfg, tokens)?)
			},
			None => None,
		};
		let enricher = Enricher::new(collaborators.fetcher, &cfg.enrichment);

		Ok(Self { cfg, db, enricher, entitlements: collaborators.entitlements, reddit })
	}

	pub(crate) async fn require_entitlement(&self, user_id: Uuid, feature: &str) -> Result<()> {
		if self.entitlements.is_entitled(&self.db.pool, user_id).await? {
			return Ok(());
		}

		tracing::info!(%user_id, feature, "Request rejected by subscription tier.");

		let tiers = self.cfg.cadence.entitled_tiers.join(", ");

		Err(Error::NotEntitled { message: format!("{feature} requires one of the tiers: {tiers}.") })
	}
}

impl PageFetcher for PageClient {
	fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, vms_providers::Result<String>> {
		Box::pin(PageClient::fetch(self, url))
	}
}

impl EntitlementGate for ProfileTierGate {
	fn is_entitled<'a>(&'a self, pool: &'a PgPool, user_id: Uuid) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move {
			let tier = vms_storage::profiles::subscription_tier(pool, user_id).await?;
			let tier = tier.unwrap_or_else(|| "free".to_string()).to_lowercase();

			Ok(self.entitled_tiers.iter().any(|allowed| allowed == &tier))
		})
	}
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
	value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
