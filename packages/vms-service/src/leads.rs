use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{Error, Result, VmsService};
use vms_domain::{FinancePartnerStatus, LeadSource, LeadStatus};
use vms_storage::models::Lead;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AddLeadRequest {
	/// Set by the HTTP layer from the caller identity; a value in the body is ignored.
	#[serde(default)]
	pub user_id: Uuid,
	pub company_name: String,
	#[serde(default)]
	pub contact_name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub website: Option<String>,
	#[serde(default)]
	pub address: Option<String>,
	#[serde(default)]
	pub city: Option<String>,
	#[serde(default)]
	pub state: Option<String>,
	#[serde(default)]
	pub zip_code: Option<String>,
	#[serde(default)]
	pub equipment_types: Vec<String>,
	#[serde(default)]
	pub source: Option<LeadSource>,
	#[serde(default)]
	pub source_url: Option<String>,
	#[serde(default)]
	pub status: Option<LeadStatus>,
	#[serde(default, with = "crate::time_serde::date::option")]
	pub follow_up_date: Option<Date>,
	#[serde(default)]
	pub notes: Option<String>,
	#[serde(default)]
	pub has_existing_finance_partner: Option<FinancePartnerStatus>,
	#[serde(default)]
	pub offers_financing_on_website: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeadView {
	pub lead_id: Uuid,
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
	pub source: LeadSource,
	pub source_url: Option<String>,
	pub status: LeadStatus,
	#[serde(with = "crate::time_serde::date::option")]
	pub follow_up_date: Option<Date>,
	pub notes: Option<String>,
	#[serde(with = "crate::time_serde::option")]
	pub last_contacted: Option<OffsetDateTime>,
	pub angle_used: Option<String>,
	pub has_existing_finance_partner: FinancePartnerStatus,
	pub offers_financing_on_website: Option<bool>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl TryFrom<Lead> for LeadView {
	type Error = Error;

	fn try_from(row: Lead) -> Result<Self> {
		Ok(Self {
			lead_id: row.lead_id,
			company_name: row.company_name,
			contact_name: row.contact_name,
			email: row.email,
			phone: row.phone,
			website: row.website,
			address: row.address,
			city: row.city,
			state: row.state,
			zip_code: row.zip_code,
			equipment_types: row.equipment_types,
			source: row.source.parse()?,
			source_url: row.source_url,
			status: row.status.parse()?,
			follow_up_date: row.follow_up_date,
			notes: row.notes,
			last_contacted: row.last_contacted,
			angle_used: row.angle_used,
			has_existing_finance_partner: row.has_existing_finance_partner.parse()?,
			offers_financing_on_website: row.offers_financing_on_website,
			created_at: row.created_at,
			updated_at: row.updated_at,
		})
	}
}

impl VmsService {
	pub async fn add_lead(&self, req: AddLeadRequest) -> Result<LeadView> {
		let now = OffsetDateTime::now_utc();
		let company_name = req.company_name.trim();

		if company_name.is_empty() {
			return Err(Error::InvalidRequest { message: "company_name is required.".to_string() });
		}

		let lead = Lead {
			lead_id: Uuid::new_v4(),
			user_id: req.user_id,
			company_name: company_name.to_string(),
			contact_name: crate::non_blank(req.contact_name),
			email: crate::non_blank(req.email).map(|email| email.to_lowercase()),
			phone: crate::non_blank(req.phone),
			website: crate::non_blank(req.website),
			address: crate::non_blank(req.address),
			city: crate::non_blank(req.city),
			state: crate::non_blank(req.state),
			zip_code: crate::non_blank(req.zip_code),
			equipment_types: normalize_equipment_types(req.equipment_types),
			source: req.source.unwrap_or_default().as_str().to_string(),
			source_url: crate::non_blank(req.source_url),
			status: req.status.unwrap_or_default().as_str().to_string(),
			follow_up_date: req.follow_up_date,
			notes: crate::non_blank(req.notes),
			last_contacted: None,
			angle_used: None,
			has_existing_finance_partner: req
				.has_existing_finance_partner
				.unwrap_or_default()
				.as_str()
				.to_string(),
			offers_financing_on_website: req.offers_financing_on_website,
			created_at: now,
			updated_at: now,
		};

		vms_storage::leads::insert_lead(&self.db.pool, &lead).await?;

		tracing::info!(lead_id = %lead.lead_id, source = %lead.source, "Lead created.");

		LeadView::try_from(lead)
	}
}

/// Trimmed, non-empty, first occurrence wins.
fn normalize_equipment_types(raw: Vec<String>) -> Vec<String> {
	let mut out: Vec<String> = Vec::with_capacity(raw.len());

	for tag in raw {
		let tag = tag.trim();

		if tag.is_empty() || out.iter().any(|seen| seen == tag) {
			continue;
		}

		out.push(tag.to_string());
	}

	out
}
