use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{Result, VmsService};
use vms_domain::{
	Angle,
	merge::{MergeLead, MergeValues},
};
use vms_storage::models::DueStepRow;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DueRequest {
	pub user_id: Uuid,
	/// Defaults to the current UTC date.
	#[serde(default, with = "crate::time_serde::date::option")]
	pub as_of: Option<Date>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DueLead {
	pub lead_id: Uuid,
	pub company_name: String,
	pub contact_name: Option<String>,
	pub email: Option<String>,
}

/// A step ready to send, with merge fields already filled in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DueStep {
	pub step_id: Uuid,
	pub cadence_id: Uuid,
	pub step_number: i32,
	#[serde(with = "crate::time_serde::date")]
	pub scheduled_date: Date,
	pub angle: Angle,
	pub template_id: Option<Uuid>,
	pub lead: DueLead,
	pub subject: String,
	pub body: String,
}
impl TryFrom<DueStepRow> for DueStep {
	type Error = crate::Error;

	fn try_from(row: DueStepRow) -> Result<Self> {
		let values = MergeValues::from_lead(MergeLead {
			company_name: &row.company_name,
			contact_name: row.contact_name.as_deref(),
			equipment_types: &row.equipment_types,
		});
		let subject = values.render(row.subject.as_deref().unwrap_or_default());
		let body = values.render(row.body.as_deref().unwrap_or_default());

		Ok(Self {
			step_id: row.step_id,
			cadence_id: row.cadence_id,
			step_number: row.step_number,
			scheduled_date: row.scheduled_date,
			angle: row.angle.parse()?,
			template_id: row.template_id,
			lead: DueLead {
				lead_id: row.lead_id,
				company_name: row.company_name,
				contact_name: row.contact_name,
				email: row.email,
			},
			subject,
			body,
		})
	}
}

impl VmsService {
	/// Pending steps of the caller's active cadences due on or before the requested day, oldest
	/// first. Read only.
	pub async fn list_due(&self, req: DueRequest) -> Result<Vec<DueStep>> {
		let as_of = req.as_of.unwrap_or_else(|| OffsetDateTime::now_utc().date());
		let rows = vms_storage::steps::list_due_steps(&self.db.pool, req.user_id, as_of).await?;

		rows.into_iter().map(DueStep::try_from).collect()
	}
}
