use serde_json::Value;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct Profile {
	pub user_id: Uuid,
	pub email: Option<String>,
	pub subscription_tier: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Lead {
	pub lead_id: Uuid,
	pub user_id: Uuid,
	pub company_name: String,
	pub contact_name: Option<String>,
	pub email: Option<String>,
	pub phone: Option<String>,
	pub website: Option<String>,
	pub address: Option<String>,
	pub city: Option<String>,
	pub state: Option<String>,
	pub zip_code: Option<String>,
	pub equipment_types: Vec<String>,
	pub source: String,
	pub source_url: Option<String>,
	pub status: String,
	pub follow_up_date: Option<Date>,
	pub notes: Option<String>,
	pub last_contacted: Option<OffsetDateTime>,
	pub angle_used: Option<String>,
	pub has_existing_finance_partner: String,
	pub offers_financing_on_website: Option<bool>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// Lead columns shown next to a cadence.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeadSummary {
	pub lead_id: Uuid,
	pub company_name: String,
	pub contact_name: Option<String>,
	pub email: Option<String>,
	pub equipment_types: Vec<String>,
	pub status: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmailTemplate {
	pub template_id: Uuid,
	pub name: String,
	pub subject: String,
	pub body: String,
	pub category: Option<String>,
	pub is_default: bool,
	pub tier_required: String,
	pub angle: Option<String>,
	pub cadence_step: Option<i32>,
	pub cadence_day: Option<i32>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Cadence {
	pub cadence_id: Uuid,
	pub lead_id: Uuid,
	pub user_id: Uuid,
	pub angle: String,
	pub status: String,
	pub started_at: OffsetDateTime,
	pub stopped_at: Option<OffsetDateTime>,
	pub stop_reason: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CadenceStep {
	pub step_id: Uuid,
	pub cadence_id: Uuid,
	pub step_number: i32,
	pub template_id: Option<Uuid>,
	pub scheduled_date: Date,
	pub status: String,
	pub sent_at: Option<OffsetDateTime>,
	pub created_at: OffsetDateTime,
}

/// A pending step of an active cadence joined with its lead and template.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DueStepRow {
	pub step_id: Uuid,
	pub cadence_id: Uuid,
	pub step_number: i32,
	pub scheduled_date: Date,
	pub angle: String,
	pub lead_id: Uuid,
	pub company_name: String,
	pub contact_name: Option<String>,
	pub email: Option<String>,
	pub equipment_types: Vec<String>,
	pub template_id: Option<Uuid>,
	pub subject: Option<String>,
	pub body: Option<String>,
}

/// A step locked together with the owning cadence for a state change.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedStep {
	pub step_id: Uuid,
	pub cadence_id: Uuid,
	pub step_number: i32,
	pub status: String,
	pub lead_id: Uuid,
	pub angle: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct OutreachLogEntry {
	pub event_id: Uuid,
	pub user_id: Uuid,
	pub lead_id: Option<Uuid>,
	pub event_type: String,
	pub cadence_step_id: Option<Uuid>,
	pub metadata: Value,
	pub created_at: OffsetDateTime,
}
