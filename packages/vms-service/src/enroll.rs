use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{CadenceWithSteps, Error, LeadSummaryView, Result, VmsService};
use vms_domain::{Angle, CadenceStatus, StepStatus, schedule::CadenceSchedule};
use vms_storage::models::{Cadence, CadenceStep};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnrollRequest {
	pub user_id: Uuid,
	pub lead_id: Uuid,
	pub angle: Angle,
}

impl VmsService {
	/// Starts a cadence on an owned lead. A missing or foreign lead is reported before the
	/// subscription check. The cadence, every step, and the lead's `angle_used` are written in one
	/// transaction.
	pub async fn enroll(&self, req: EnrollRequest) -> Result<CadenceWithSteps> {
		if vms_storage::leads::get_lead(&self.db.pool, req.user_id, req.lead_id).await?.is_none() {
			return Err(lead_not_found());
		}

		self.require_entitlement(req.user_id, "Cadences").await?;

		let now = OffsetDateTime::now_utc();
		let schedule = CadenceSchedule::from_config(&self.cfg.cadence);
		let mut tx = self.db.pool.begin().await?;
		let lead = vms_storage::leads::lock_lead(&mut *tx, req.user_id, req.lead_id)
			.await?
			.ok_or_else(lead_not_found)?;

		if let Some(existing) =
			vms_storage::cadences::find_active_for_lead(&mut *tx, lead.lead_id).await?
		{
			return Err(Error::Conflict {
				message: format!(
					"Lead already has an active cadence {existing}. Stop it before enrolling again."
				),
			});
		}

		let templates =
			vms_storage::templates::list_cadence_templates(&mut *tx, req.angle.as_str()).await?;
		let cadence = Cadence {
			cadence_id: Uuid::new_v4(),
			lead_id: lead.lead_id,
			user_id: req.user_id,
			angle: req.angle.as_str().to_string(),
			status: CadenceStatus::Active.as_str().to_string(),
			started_at: now,
			stopped_at: None,
			stop_reason: None,
			created_at: now,
			updated_at: now,
		};

		vms_storage::cadences::insert_cadence(&mut *tx, &cadence).await?;

		let mut steps = Vec::with_capacity(schedule.step_count());

		for planned in schedule.plan(now.date()) {
			// Missing templates are allowed; the step then renders with empty content.
			let template_id = templates
				.iter()
				.find(|template| template.cadence_step == Some(planned.step_number))
				.map(|template| template.template_id);
			let step = CadenceStep {
				step_id: Uuid::new_v4(),
				cadence_id: cadence.cadence_id,
				step_number: planned.step_number,
				template_id,
				scheduled_date: planned.scheduled_date,
				status: StepStatus::Pending.as_str().to_string(),
				sent_at: None,
				created_at: now,
			};

			vms_storage::steps::insert_step(&mut *tx, &step).await?;

			steps.push(step);
		}

		vms_storage::leads::set_angle_used(&mut *tx, lead.lead_id, req.angle.as_str(), now)
			.await?;

		tx.commit().await?;

		tracing::info!(
			cadence_id = %cadence.cadence_id,
			lead_id = %lead.lead_id,
			angle = %req.angle,
			steps = steps.len(),
			"Cadence enrolled."
		);

		let lead_summary = LeadSummaryView::try_from(&lead)?;

		CadenceWithSteps::from_rows(cadence, Some(lead_summary), steps)
	}
}

fn lead_not_found() -> Error {
	Error::NotFound { message: "Lead not found.".to_string() }
}
