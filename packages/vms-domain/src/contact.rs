//! Best-effort extraction of contact details from vendor web pages.
//!
//! Everything here works on raw HTML text with pattern matching. Nothing parses the DOM, so
//! results are heuristics: callers treat an empty result as "not found", never as an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

pub const GENERIC_EMAIL_PREFIXES: &[&str] = &[
	"info",
	"support",
	"help",
	"noreply",
	"no-reply",
	"admin",
	"webmaster",
	"postmaster",
	"mailer-daemon",
	"abuse",
	"privacy",
	"legal",
	"billing",
	"hello",
	"contact",
];

pub const OWNER_TITLES: &[&str] = &[
	"owner",
	"president",
	"ceo",
	"founder",
	"principal",
	"general manager",
	"gm",
	"dealer principal",
	"managing director",
	"vice president",
	"vp",
	"director",
	"partner",
];

pub const FINANCING_KEYWORDS: &[&str] = &[
	"financing available",
	"finance application",
	"apply for credit",
	"apply for financing",
	"payment calculator",
	"monthly payments",
	"lease options",
	"credit application",
	"financing options",
	"finance your",
	"get pre-approved",
	"pre-qualification",
	"equipment financing",
	"loan application",
	"finance department",
];

const SUBPAGE_HINTS: &[&str] = &["contact", "about", "team", "staff", "leadership"];
const CONTACT_LINK_TEXT_HINTS: &[&str] = &["contact", "get in touch", "reach us"];
const NOISE_EMAIL_SUFFIXES: &[&str] =
	&[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".css", ".js"];
const NOISE_EMAIL_MARKERS: &[&str] = &["sentry", "wixpress"];
const MAX_EMAIL_CHARS: usize = 60;

static EMAIL_RE: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").ok());
static TAG_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]+>").ok());
static WHITESPACE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());
static ANCHOR_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
	Regex::new(r#"(?i)<a\b[^>]*?\bhref=["']([^"'#]+)["'][^>]*>([^<]*)"#).ok()
});
static FORM_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)<form[^>]*>").ok());
static CONTACT_FIELD_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
	[
		r#"(?i)name=["'](?:email|name|message|phone|subject|inquiry)"#,
		r#"(?i)type=["']email"#,
		r#"(?i)placeholder=["'][^"']*(?:email|name|message|your name)"#,
	]
	.into_iter()
	.filter_map(|pattern| Regex::new(pattern).ok())
	.collect()
});
static CONTACT_NAME_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
	let titles = OWNER_TITLES.join("|");

	[
		// "John Smith, Owner" or "John Smith - President"
		format!(r"(?i)([A-Z][a-z]{{1,15}}\s+[A-Z][a-z]{{1,20}})\s*[,\-–|]\s*(?:{titles})"),
		// "Owner: John Smith" or "President - John Smith"
		format!(r"(?i)(?:{titles})\s*[:\-–|]\s*([A-Z][a-z]{{1,15}}\s+[A-Z][a-z]{{1,20}})"),
	]
	.iter()
	.filter_map(|pattern| Regex::new(pattern).ok())
	.collect()
});

/// Whether a vendor's website advertises financing. `Unknown` means no page could be read;
/// `NotMentioned` means pages were read and none carried a financing phrase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingSignal {
	Offered,
	NotMentioned,
	#[default]
	Unknown,
}
impl FinancingSignal {
	pub fn from_scan(found: bool) -> Self {
		if found { Self::Offered } else { Self::NotMentioned }
	}

	/// Nullable column form: offered is `true`, not mentioned is `false`, unknown is `NULL`.
	pub fn as_column(self) -> Option<bool> {
		match self {
			Self::Offered => Some(true),
			Self::NotMentioned => Some(false),
			Self::Unknown => None,
		}
	}
}

/// Parses a vendor website the way people type it, adding `https://` when no scheme is given.
pub fn normalize_website(raw: &str) -> Option<Url> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return None;
	}

	let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
		trimmed.to_string()
	} else {
		format!("https://{trimmed}")
	};
	let url = Url::parse(&candidate).ok()?;

	url.host_str()?;

	Some(url)
}

/// Distinct email-like strings in document order, without asset names and tracker noise.
pub fn extract_emails(html: &str) -> Vec<String> {
	let Some(re) = EMAIL_RE.as_ref() else {
		return Vec::new();
	};
	let mut out: Vec<String> = Vec::new();

	for found in re.find_iter(html) {
		let email = found.as_str();

		if is_noise_email(email) || out.iter().any(|seen| seen == email) {
			continue;
		}

		out.push(email.to_string());
	}

	out
}

pub fn is_personal_email(email: &str) -> bool {
	let prefix = email.split('@').next().unwrap_or_default().to_lowercase();

	!GENERIC_EMAIL_PREFIXES.contains(&prefix.as_str())
}

/// First personal address if any, otherwise the first address.
pub fn pick_best_email(emails: &[String]) -> Option<&str> {
	emails
		.iter()
		.find(|email| is_personal_email(email))
		.or_else(|| emails.first())
		.map(String::as_str)
}

pub fn extract_contact_name(html: &str) -> Option<String> {
	let text = visible_text(html);

	CONTACT_NAME_RES.iter().find_map(|re| {
		re.captures(&text)
			.and_then(|caps| caps.get(1))
			.map(|name| name.as_str().trim().to_string())
			.filter(|name| !name.is_empty())
	})
}

/// Same-host links that look like contact, about, or team pages, in document order.
pub fn find_subpage_urls(html: &str, base: &Url) -> Vec<Url> {
	let mut out: Vec<Url> = Vec::new();

	for (href, text) in anchors(html) {
		let href_lower = href.to_lowercase();
		let text_lower = text.to_lowercase();
		let hinted = SUBPAGE_HINTS
			.iter()
			.any(|hint| href_lower.contains(hint) || text_lower.contains(hint));

		if !hinted {
			continue;
		}
		if let Some(url) = resolve_same_host(base, href)
			&& !out.contains(&url)
		{
			out.push(url);
		}
	}

	out
}

/// The page itself when it carries a contact form, otherwise the first same-host link that
/// reads like a contact page.
pub fn find_contact_form_url(html: &str, base: &Url) -> Option<Url> {
	if has_contact_form(html) {
		return Some(base.clone());
	}

	anchors(html).find_map(|(href, text)| {
		let href_lower = href.to_lowercase();
		let text_lower = text.to_lowercase();
		let hinted = href_lower.contains("contact")
			|| CONTACT_LINK_TEXT_HINTS.iter().any(|hint| text_lower.contains(hint));

		if hinted { resolve_same_host(base, href) } else { None }
	})
}

pub fn has_contact_form(html: &str) -> bool {
	let has_form = FORM_RE.as_ref().map(|re| re.is_match(html)).unwrap_or(false);

	has_form && CONTACT_FIELD_RES.iter().any(|re| re.is_match(html))
}

pub fn mentions_financing(html: &str) -> bool {
	let lower = html.to_lowercase();

	FINANCING_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

fn is_noise_email(email: &str) -> bool {
	let lower = email.to_lowercase();

	email.chars().count() > MAX_EMAIL_CHARS
		|| NOISE_EMAIL_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
		|| NOISE_EMAIL_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn visible_text(html: &str) -> String {
	let stripped = match TAG_RE.as_ref() {
		Some(re) => re.replace_all(html, " ").into_owned(),
		None => html.to_string(),
	};

	match WHITESPACE_RE.as_ref() {
		Some(re) => re.replace_all(&stripped, " ").into_owned(),
		None => stripped,
	}
}

fn anchors(html: &str) -> impl Iterator<Item = (&str, &str)> {
	ANCHOR_RE.as_ref().into_iter().flat_map(move |re| {
		re.captures_iter(html).filter_map(|caps| {
			let href = caps.get(1)?.as_str();
			let text = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

			Some((href, text))
		})
	})
}

fn resolve_same_host(base: &Url, href: &str) -> Option<Url> {
	let url = base.join(href.trim()).ok()?;

	if !matches!(url.scheme(), "http" | "https") {
		return None;
	}
	if url.host_str() != base.host_str() {
		return None;
	}

	Some(url)
}
