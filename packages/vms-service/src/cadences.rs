use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{Error, Result, VmsService};
use vms_domain::{Angle, CadenceStatus, LeadStatus, StepStatus};
use vms_storage::models::{Cadence, CadenceStep, Lead, LeadSummary};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListCadencesRequest {
	pub user_id: Uuid,
	pub status: Option<CadenceStatus>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CadenceView {
	pub cadence_id: Uuid,
	pub lead_id: Uuid,
	pub angle: Angle,
	pub status: CadenceStatus,
	#[serde(with = "crate::time_serde")]
	pub started_at: OffsetDateTime,
	#[serde(with = "crate::time_serde::option")]
	pub stopped_at: Option<OffsetDateTime>,
	pub stop_reason: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl TryFrom<Cadence> for CadenceView {
	type Error = Error;

	fn try_from(row: Cadence) -> Result<Self> {
		Ok(Self {
			cadence_id: row.cadence_id,
			lead_id: row.lead_id,
			angle: row.angle.parse()?,
			status: row.status.parse()?,
			started_at: row.started_at,
			stopped_at: row.stopped_at,
			stop_reason: row.stop_reason,
			created_at: row.created_at,
			updated_at: row.updated_at,
		})
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepView {
	pub step_id: Uuid,
	pub cadence_id: Uuid,
	pub step_number: i32,
	pub template_id: Option<Uuid>,
	#[serde(with = "crate::time_serde::date")]
	pub scheduled_date: Date,
	pub status: StepStatus,
	#[serde(with = "crate::time_serde::option")]
	pub sent_at: Option<OffsetDateTime>,
}
impl TryFrom<CadenceStep> for StepView {
	type Error = Error;

	fn try_from(row: CadenceStep) -> Result<Self> {
		Ok(Self {
			step_id: row.step_id,
			cadence_id: row.cadence_id,
			step_number: row.step_number,
			template_id: row.template_id,
			scheduled_date: row.scheduled_date,
			status: row.status.parse()?,
			sent_at: row.sent_at,
		})
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeadSummaryView {
	pub lead_id: Uuid,
	pub company_name: String,
	pub contact_name: Option<String>,
	pub email: Option<String>,
	pub equipment_types: Vec<String>,
	pub status: LeadStatus,
}
impl TryFrom<LeadSummary> for LeadSummaryView {
	type Error = Error;

	fn try_from(row: LeadSummary) -> Result<Self> {
		Ok(Self {
			lead_id: row.lead_id,
			company_name: row.company_name,
			contact_name: row.contact_name,
			email: row.email,
			equipment_types: row.equipment_types,
			status: row.status.parse()?,
		})
	}
}
impl TryFrom<&Lead> for LeadSummaryView {
	type Error = Error;

	fn try_from(row: &Lead) -> Result<Self> {
		Ok(Self {
			lead_id: row.lead_id,
			company_name: row.company_name.clone(),
			contact_name: row.contact_name.clone(),
			email: row.email.clone(),
			equipment_types: row.equipment_types.clone(),
			status: row.status.parse()?,
		})
	}
}

/// A cadence with its lead and its steps ordered by step number.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CadenceWithSteps {
	#[serde(flatten)]
	pub cadence: CadenceView,
	pub lead: Option<LeadSummaryView>,
	pub steps: Vec<StepView>,
}
impl CadenceWithSteps {
	pub(crate) fn from_rows(
		cadence: Cadence,
		lead: Option<LeadSummaryView>,
		mut steps: Vec<CadenceStep>,
	) -> Result<Self> {
		steps.sort_by_key(|step| step.step_number);

		Ok(Self {
			cadence: CadenceView::try_from(cadence)?,
			lead,
			steps: steps.into_iter().map(StepView::try_from).collect::<Result<Vec<_>>>()?,
		})
	}
}

impl VmsService {
	/// Owned cadences, newest first.
	pub async fn list_cadences(&self, req: ListCadencesRequest) -> Result<Vec<CadenceWithSteps>> {
		let status = req.status.map(CadenceStatus::as_str);
		let rows = vms_storage::cadences::list_cadences(&self.db.pool, req.user_id, status).await?;

		self.attach_leads_and_steps(req.user_id, rows).await
	}

	pub async fn get_cadence(&self, user_id: Uuid, cadence_id: Uuid) -> Result<CadenceWithSteps> {
		let row = vms_storage::cadences::get_cadence(&self.db.pool, user_id, cadence_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Cadence not found.".to_string() })?;

		self.attach_leads_and_steps(user_id, vec![row])
			.await?
			.pop()
			.ok_or_else(|| Error::NotFound { message: "Cadence not found.".to_string() })
	}

	async fn attach_leads_and_steps(
		&self,
		user_id: Uuid,
		rows: Vec<Cadence>,
	) -> Result<Vec<CadenceWithSteps>> {
		let cadence_ids = rows.iter().map(|row| row.cadence_id).collect::<Vec<_>>();
		let mut lead_ids = rows.iter().map(|row| row.lead_id).collect::<Vec<_>>();

		lead_ids.sort_unstable();
		lead_ids.dedup();

		let steps = vms_storage::steps::list_steps(&self.db.pool, &cadence_ids).await?;
		let leads =
			vms_storage::leads::list_lead_summaries(&self.db.pool, user_id, &lead_ids).await?;
		let mut steps_by_cadence: HashMap<Uuid, Vec<CadenceStep>> = HashMap::new();
		let mut leads_by_id: HashMap<Uuid, LeadSummaryView> = HashMap::new();

		for step in steps {
			steps_by_cadence.entry(step.cadence_id).or_default().push(step);
		}
		for lead in leads {
			leads_by_id.insert(lead.lead_id, LeadSummaryView::try_from(lead)?);
		}

		rows.into_iter()
			.map(|row| {
				let steps = steps_by_cadence.remove(&row.cadence_id).unwrap_or_default();
				let lead = leads_by_id.get(&row.lead_id).cloned();

				CadenceWithSteps::from_rows(row, lead, steps)
			})
			.collect()
	}
}
