use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub cadence: Cadence,
	#[serde(default)]
	pub enrichment: Enrichment,
	#[serde(default)]
	pub providers: Providers,
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cadence {
	/// Day offsets from the enrollment day, one per step. The first entry is day 0.
	#[serde(default = "default_step_offsets_days")]
	pub step_offsets_days: Vec<u32>,
	/// Subscription tiers whose accounts may enroll leads into cadences.
	#[serde(default = "default_entitled_tiers")]
	pub entitled_tiers: Vec<String>,
}
impl Default for Cadence {
	fn default() -> Self {
		Self {
			step_offsets_days: default_step_offsets_days(),
			entitled_tiers: default_entitled_tiers(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Enrichment {
	#[serde(default = "default_enrichment_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default = "default_max_body_bytes")]
	pub max_body_bytes: u64,
	#[serde(default = "default_max_concurrent")]
	pub max_concurrent: u32,
	#[serde(default = "default_max_subpages")]
	pub max_subpages: u32,
	#[serde(default = "default_browser_user_agent")]
	pub user_agent: String,
}
impl Default for Enrichment {
	fn default() -> Self {
		Self {
			timeout_ms: default_enrichment_timeout_ms(),
			max_body_bytes: default_max_body_bytes(),
			max_concurrent: default_max_concurrent(),
			max_subpages: default_max_subpages(),
			user_agent: default_browser_user_agent(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Providers {
	pub reddit: Option<RedditProviderConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditProviderConfig {
	pub client_id: String,
	pub client_secret: String,
	#[serde(default = "default_reddit_token_url")]
	pub token_url: String,
	#[serde(default = "default_reddit_api_base")]
	pub api_base: String,
	#[serde(default = "default_reddit_user_agent")]
	pub user_agent: String,
	#[serde(default = "default_reddit_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default = "default_reddit_subreddits")]
	pub subreddits: Vec<String>,
	/// Tokens expiring within this many seconds are treated as already expired.
	#[serde(default = "default_refresh_margin_seconds")]
	pub refresh_margin_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	pub api_auth_token: Option<String>,
}

fn default_step_offsets_days() -> Vec<u32> {
	vec![0, 2, 6, 13]
}

fn default_entitled_tiers() -> Vec<String> {
	vec!["pro".to_string(), "enterprise".to_string()]
}

fn default_enrichment_timeout_ms() -> u64 {
	5_000
}

fn default_max_body_bytes() -> u64 {
	200 * 1_024
}

fn default_max_concurrent() -> u32 {
	3
}

fn default_max_subpages() -> u32 {
	2
}

fn default_browser_user_agent() -> String {
	"Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
	 Chrome/120.0.0.0 Safari/537.36"
		.to_string()
}

fn default_reddit_token_url() -> String {
	"https://www.reddit.com/api/v1/access_token".to_string()
}

fn default_reddit_api_base() -> String {
	"https://oauth.reddit.com".to_string()
}

fn default_reddit_user_agent() -> String {
	"VendorMarketingSystem/1.0".to_string()
}

fn default_reddit_timeout_ms() -> u64 {
	10_000
}

fn default_reddit_subreddits() -> Vec<String> {
	[
		"heavyequipment",
		"Construction",
		"equipmenttrading",
		"HeavyEquipmentTrading",
		"constructionequipment",
		"Excavators",
		"heavymachinery",
	]
	.into_iter()
	.map(str::to_string)
	.collect()
}

fn default_refresh_margin_seconds() -> i64 {
	60
}
