use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, VmsService};
use vms_providers::reddit::{RedditPost, SearchOptions, SearchSort, SearchWindow};

const DEFAULT_LIMIT: u32 = 25;
const MAX_LIMIT: u32 = 100;
const CONTEXT_TERMS: &[&str] = &["equipment", "dealer", "vendor", "sale"];
const CONTEXT_SUFFIX: &str = "dealer OR vendor OR sale";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SocialSearchRequest {
	/// Set by the HTTP layer from the caller identity; a value in the body is ignored.
	#[serde(default)]
	pub user_id: Uuid,
	#[serde(default)]
	pub query: Option<String>,
	/// Equipment tag such as `skid_steers`, or `any`.
	#[serde(default)]
	pub equipment_type: Option<String>,
	#[serde(default)]
	pub state: Option<String>,
	#[serde(default)]
	pub subreddits: Option<Vec<String>>,
	#[serde(default)]
	pub sort: Option<SearchSort>,
	#[serde(default)]
	pub window: Option<SearchWindow>,
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SocialSearchResponse {
	pub results: Vec<RedditPost>,
	pub subreddits_searched: Vec<String>,
	pub total_results: usize,
	pub query: String,
}

impl VmsService {
	pub async fn search_social(&self, req: SocialSearchRequest) -> Result<SocialSearchResponse> {
		let Some(reddit) = self.reddit.as_ref() else {
			return Err(Error::ProviderNotConfigured { provider: "reddit".to_string() });
		};

		self.require_entitlement(req.user_id, "Social search").await?;

		let query = build_search_query(
			req.query.as_deref(),
			req.equipment_type.as_deref(),
			req.state.as_deref(),
		)
		.ok_or_else(|| Error::InvalidRequest {
			message: "Provide a search query, equipment type, or state.".to_string(),
		})?;
		let opts = SearchOptions {
			subreddits: req.subreddits.filter(|subs| !subs.is_empty()),
			sort: req.sort.unwrap_or_default(),
			window: req.window.unwrap_or_default(),
			limit: req.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
		};
		let result = reddit.search(&query, &opts).await?;

		tracing::info!(query = %query, results = result.total_results, "Social search finished.");

		Ok(SocialSearchResponse {
			results: result.posts,
			subreddits_searched: result.subreddits_searched,
			total_results: result.total_results,
			query,
		})
	}
}

/// Joins the provided parts and appends dealer context when none of them carries it. `None` when
/// every part is blank.
pub fn build_search_query(
	query: Option<&str>,
	equipment_type: Option<&str>,
	state: Option<&str>,
) -> Option<String> {
	let mut parts: Vec<String> = Vec::new();

	if let Some(query) = query.map(str::trim).filter(|query| !query.is_empty()) {
		parts.push(query.to_string());
	}
	if let Some(tag) = equipment_type
		.map(str::trim)
		.filter(|tag| !tag.is_empty() && !tag.eq_ignore_ascii_case("any"))
	{
		parts.push(tag.replace('_', " "));
	}
	if let Some(state) = state.map(str::trim).filter(|state| !state.is_empty()) {
		parts.push(state.to_string());
	}

	if parts.is_empty() {
		return None;
	}

	let has_context = parts.iter().any(|part| {
		let lower = part.to_lowercase();

		CONTEXT_TERMS.iter().any(|term| lower.contains(term))
	});

	if !has_context {
		parts.push(CONTEXT_SUFFIX.to_string());
	}

	Some(parts.join(" "))
}
