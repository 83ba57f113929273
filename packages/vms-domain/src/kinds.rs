//! Closed enumerations persisted as text columns.
//!
//! Every kind round-trips through `as_str` and `FromStr` using the exact spelling stored in
//! Postgres, and serializes with the same spelling over JSON.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} value {value:?}.")]
pub struct ParseKindError {
	pub kind: &'static str,
	pub value: String,
}
impl ParseKindError {
	fn new(kind: &'static str, value: &str) -> Self {
		Self { kind, value: value.to_string() }
	}
}

/// Outreach messaging strategy chosen at enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Angle {
	A,
	B,
	C,
}
impl Angle {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::A => "A",
			Self::B => "B",
			Self::C => "C",
		}
	}
}
impl FromStr for Angle {
	type Err = ParseKindError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"A" => Ok(Self::A),
			"B" => Ok(Self::B),
			"C" => Ok(Self::C),
			other => Err(ParseKindError::new("angle", other)),
		}
	}
}
impl fmt::Display for Angle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CadenceStatus {
	Active,
	Paused,
	Completed,
	Stopped,
}
impl CadenceStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Active => "active",
			Self::Paused => "paused",
			Self::Completed => "completed",
			Self::Stopped => "stopped",
		}
	}

	pub fn is_terminal(self) -> bool {
		matches!(self, Self::Completed | Self::Stopped)
	}
}
impl FromStr for CadenceStatus {
	type Err = ParseKindError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"active" => Ok(Self::Active),
			"paused" => Ok(Self::Paused),
			"completed" => Ok(Self::Completed),
			"stopped" => Ok(Self::Stopped),
			other => Err(ParseKindError::new("cadence status", other)),
		}
	}
}
impl fmt::Display for CadenceStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Lifecycle of a single touch. A pending step whose date has arrived is "due"; that is a
/// query-time property, not a stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
	Pending,
	Sent,
	Skipped,
	Cancelled,
}
impl StepStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Sent => "sent",
			Self::Skipped => "skipped",
			Self::Cancelled => "cancelled",
		}
	}
}
impl FromStr for StepStatus {
	type Err = ParseKindError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(Self::Pending),
			"sent" => Ok(Self::Sent),
			"skipped" => Ok(Self::Skipped),
			"cancelled" => Ok(Self::Cancelled),
			other => Err(ParseKindError::new("step status", other)),
		}
	}
}
impl fmt::Display for StepStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
	#[default]
	New,
	Contacted,
	Replied,
	CallBooked,
	Activated,
	Dead,
}
impl LeadStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::New => "new",
			Self::Contacted => "contacted",
			Self::Replied => "replied",
			Self::CallBooked => "call_booked",
			Self::Activated => "activated",
			Self::Dead => "dead",
		}
	}
}
impl FromStr for LeadStatus {
	type Err = ParseKindError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"new" => Ok(Self::New),
			"contacted" => Ok(Self::Contacted),
			"replied" => Ok(Self::Replied),
			"call_booked" => Ok(Self::CallBooked),
			"activated" => Ok(Self::Activated),
			"dead" => Ok(Self::Dead),
			other => Err(ParseKindError::new("lead status", other)),
		}
	}
}

/// Acquisition channel that produced a lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
	AiFinder,
	SmartSearch,
	SocialSearch,
	#[default]
	Manual,
	CsvImport,
}
impl LeadSource {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::AiFinder => "ai_finder",
			Self::SmartSearch => "smart_search",
			Self::SocialSearch => "social_search",
			Self::Manual => "manual",
			Self::CsvImport => "csv_import",
		}
	}
}
impl FromStr for LeadSource {
	type Err = ParseKindError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"ai_finder" => Ok(Self::AiFinder),
			"smart_search" => Ok(Self::SmartSearch),
			"social_search" => Ok(Self::SocialSearch),
			"manual" => Ok(Self::Manual),
			"csv_import" => Ok(Self::CsvImport),
			other => Err(ParseKindError::new("lead source", other)),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancePartnerStatus {
	Yes,
	No,
	#[default]
	Unknown,
}
impl FinancePartnerStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Yes => "yes",
			Self::No => "no",
			Self::Unknown => "unknown",
		}
	}
}
impl FromStr for FinancePartnerStatus {
	type Err = ParseKindError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"yes" => Ok(Self::Yes),
			"no" => Ok(Self::No),
			"unknown" => Ok(Self::Unknown),
			other => Err(ParseKindError::new("finance partner status", other)),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutreachEventType {
	EmailSent,
	ReplyReceived,
	CallBooked,
	DealActivated,
}
impl OutreachEventType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::EmailSent => "email_sent",
			Self::ReplyReceived => "reply_received",
			Self::CallBooked => "call_booked",
			Self::DealActivated => "deal_activated",
		}
	}
}
