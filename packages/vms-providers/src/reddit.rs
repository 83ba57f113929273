//! Reddit search through the application-only OAuth flow.

use std::sync::{Arc, Mutex};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{
	Client, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, Result};

const SELFTEXT_MAX_CHARS: usize = 500;
const PERMALINK_BASE: &str = "https://reddit.com";
const GENERAL_SEARCH_SUFFIX: &str = " equipment dealer";
const MIN_RESTRICTED_RESULTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
	pub token: String,
	pub expires_at: OffsetDateTime,
}

/// Holds one bearer token and hands it out until it is within `refresh_margin` of expiring.
///
/// The cache never reads the clock itself. Callers pass `now`, so expiry is fully controlled by
/// whoever owns the cache.
#[derive(Debug)]
pub struct TokenCache {
	refresh_margin: Duration,
	slot: Mutex<Option<AccessToken>>,
}
impl TokenCache {
	pub fn new(refresh_margin: Duration) -> Self {
		Self { refresh_margin, slot: Mutex::new(None) }
	}

	pub fn get(&self, now: OffsetDateTime) -> Option<String> {
		let slot = self.slot.lock().unwrap_or_else(|err| err.into_inner());

		slot.as_ref()
			.filter(|cached| cached.expires_at > now + self.refresh_margin)
			.map(|cached| cached.token.clone())
	}

	pub fn store(&self, token: String, expires_in_seconds: i64, now: OffsetDateTime) {
		let expires_at = now + Duration::seconds(expires_in_seconds);
		let mut slot = self.slot.lock().unwrap_or_else(|err| err.into_inner());

		*slot = Some(AccessToken { token, expires_at });
	}

	pub fn clear(&self) {
		let mut slot = self.slot.lock().unwrap_or_else(|err| err.into_inner());

		*slot = None;
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSort {
	#[default]
	Relevance,
	Hot,
	Top,
	New,
}
impl SearchSort {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Relevance => "relevance",
			Self::Hot => "hot",
			Self::Top => "top",
			Self::New => "new",
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchWindow {
	Hour,
	Day,
	Week,
	Month,
	#[default]
	Year,
	All,
}
impl SearchWindow {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Hour => "hour",
			Self::Day => "day",
			Self::Week => "week",
			Self::Month => "month",
			Self::Year => "year",
			Self::All => "all",
		}
	}
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
	/// Overrides the configured subreddit list when set.
	pub subreddits: Option<Vec<String>>,
	pub sort: SearchSort,
	pub window: SearchWindow,
	pub limit: u32,
}
impl Default for SearchOptions {
	fn default() -> Self {
		Self {
			subreddits: None,
			sort: SearchSort::default(),
			window: SearchWindow::default(),
			limit: 10,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
	pub id: String,
	pub title: String,
	pub selftext: String,
	pub subreddit: String,
	pub author: String,
	pub url: String,
	pub permalink: String,
	pub score: i64,
	pub num_comments: i64,
	pub created_utc: f64,
	pub link_flair_text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
	pub posts: Vec<RedditPost>,
	pub subreddits_searched: Vec<String>,
	pub total_results: usize,
}

pub struct RedditClient {
	cfg: vms_config::RedditProviderConfig,
	client: Client,
	tokens: Arc<TokenCache>,
}
impl RedditClient {
	pub fn new(cfg: &vms_config::RedditProviderConfig, tokens: Arc<TokenCache>) -> Result<Self> {
		if cfg.client_id.trim().is_empty() || cfg.client_secret.trim().is_empty() {
			return Err(Error::InvalidConfig {
				message: "Reddit client credentials must be non-empty.".to_string(),
			});
		}

		let client = crate::http_client(cfg.timeout_ms, &cfg.user_agent)?;

		Ok(Self { cfg: cfg.clone(), client, tokens })
	}

	pub async fn access_token(&self, now: OffsetDateTime) -> Result<String> {
		if let Some(token) = self.tokens.get(now) {
			return Ok(token);
		}

		let basic = STANDARD.encode(format!("{}:{}", self.cfg.client_id, self.cfg.client_secret));
		let res = self
			.client
			.post(self.cfg.token_url.as_str())
			.header(AUTHORIZATION, format!("Basic {basic}"))
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.body("grant_type=client_credentials")
			.send()
			.await?;
		let status = res.status();

		if !status.is_success() {
			return Err(Error::InvalidResponse {
				message: format!("Reddit auth failed with status {status}."),
			});
		}

		let body: TokenResponse = res.json().await?;

		if body.access_token.trim().is_empty() {
			return Err(Error::InvalidResponse {
				message: "Reddit auth response is missing access_token.".to_string(),
			});
		}

		self.tokens.store(body.access_token.clone(), body.expires_in, now);

		Ok(body.access_token)
	}

	/// Searches the subreddit list first and widens to all of Reddit when that finds fewer than
	/// three posts. Posts come back deduplicated by id and ordered by score, highest first.
	pub async fn search(&self, query: &str, opts: &SearchOptions) -> Result<SearchResult> {
		let token = self.access_token(OffsetDateTime::now_utc()).await?;
		let subreddits = opts.subreddits.clone().unwrap_or_else(|| self.cfg.subreddits.clone());
		let restricted_url = format!("{}/r/{}/search", self.cfg.api_base, subreddits.join("+"));
		let mut posts = self
			.fetch_listing(&token, &restricted_url, query, opts, true)
			.await?
			.unwrap_or_default();

		if posts.len() < MIN_RESTRICTED_RESULTS {
			let general_url = format!("{}/search", self.cfg.api_base);
			let general_query = format!("{query}{GENERAL_SEARCH_SUFFIX}");
			let general = self
				.fetch_listing(&token, &general_url, &general_query, opts, false)
				.await?
				.unwrap_or_default();

			posts = merge_posts(posts, general);
		} else {
			posts = merge_posts(posts, Vec::new());
		}

		let total_results = posts.len();

		Ok(SearchResult { posts, subreddits_searched: subreddits, total_results })
	}

	/// `Ok(None)` when Reddit answers with a non-success status; those searches contribute
	/// nothing instead of failing the whole request.
	async fn fetch_listing(
		&self,
		token: &str,
		url: &str,
		query: &str,
		opts: &SearchOptions,
		restrict: bool,
	) -> Result<Option<Vec<RedditPost>>> {
		let limit = opts.limit.to_string();
		let mut params = vec![
			("q", query),
			("sort", opts.sort.as_str()),
			("t", opts.window.as_str()),
			("limit", limit.as_str()),
			("type", "link"),
		];

		if restrict {
			params.push(("restrict_sr", "on"));
		}

		let res = self
			.client
			.get(url)
			.query(&params)
			.header(AUTHORIZATION, format!("Bearer {token}"))
			.send()
			.await?;
		let status = res.status();

		if status == StatusCode::UNAUTHORIZED {
			self.tokens.clear();
		}
		if !status.is_success() {
			tracing::warn!(%status, url, "Reddit search returned a non-success status.");

			return Ok(None);
		}

		let listing: Listing = res.json().await?;

		Ok(Some(posts_from_listing(listing)))
	}
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
	expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct Listing {
	data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
	#[serde(default)]
	children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
	data: RawPost,
}

#[derive(Debug, Deserialize)]
struct RawPost {
	id: String,
	#[serde(default)]
	title: String,
	#[serde(default)]
	selftext: Option<String>,
	#[serde(default)]
	subreddit: String,
	#[serde(default)]
	author: String,
	#[serde(default)]
	url: String,
	#[serde(default)]
	permalink: String,
	#[serde(default)]
	score: i64,
	#[serde(default)]
	num_comments: i64,
	#[serde(default)]
	created_utc: f64,
	#[serde(default)]
	link_flair_text: Option<String>,
}
impl From<RawPost> for RedditPost {
	fn from(raw: RawPost) -> Self {
		Self {
			id: raw.id,
			title: raw.title,
			selftext: raw
				.selftext
				.unwrap_or_default()
				.chars()
				.take(SELFTEXT_MAX_CHARS)
				.collect(),
			subreddit: raw.subreddit,
			author: raw.author,
			url: raw.url,
			permalink: format!("{PERMALINK_BASE}{}", raw.permalink),
			score: raw.score,
			num_comments: raw.num_comments,
			created_utc: raw.created_utc,
			link_flair_text: raw.link_flair_text,
		}
	}
}

fn posts_from_listing(listing: Listing) -> Vec<RedditPost> {
	listing.data.children.into_iter().map(|child| RedditPost::from(child.data)).collect()
}

/// Appends posts from `extra` whose id is not already present, then orders by score.
fn merge_posts(mut posts: Vec<RedditPost>, extra: Vec<RedditPost>) -> Vec<RedditPost> {
	for post in extra {
		if !posts.iter().any(|seen| seen.id == post.id) {
			posts.push(post);
		}
	}

	posts.sort_by(|a, b| b.score.cmp(&a.score));

	posts
}
