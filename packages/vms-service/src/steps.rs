use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, VmsService};
use vms_domain::{
	OutreachEventType, StepStatus,
	transition::{self, StepOutcome},
};
use vms_storage::models::OutreachLogEntry;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepActionRequest {
	pub user_id: Uuid,
	pub step_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepActionResponse {
	pub step_id: Uuid,
	pub status: StepStatus,
	pub cadence_completed: bool,
}

impl VmsService {
	/// Records a send: the step, the outreach log, the lead's last contact time, and cadence
	/// completion change together or not at all.
	pub async fn mark_sent(&self, req: StepActionRequest) -> Result<StepActionResponse> {
		self.finish_step(req, StepOutcome::Sent).await
	}

	/// Skips a pending step. Sibling steps and the cadence are left alone.
	pub async fn skip(&self, req: StepActionRequest) -> Result<StepActionResponse> {
		self.finish_step(req, StepOutcome::Skipped).await
	}

	async fn finish_step(
		&self,
		req: StepActionRequest,
		outcome: StepOutcome,
	) -> Result<StepActionResponse> {
		let now = OffsetDateTime::now_utc();
		let sent_at = (outcome == StepOutcome::Sent).then_some(now);
		let mut tx = self.db.pool.begin().await?;
		let Some(step) = vms_storage::steps::finish_pending_step(
			&mut *tx,
			req.user_id,
			req.step_id,
			outcome.status().as_str(),
			sent_at,
		)
		.await?
		else {
			let existing =
				vms_storage::steps::get_owned_step(&mut *tx, req.user_id, req.step_id).await?;
			let Some(existing) = existing else {
				return Err(Error::NotFound { message: "Step not found.".to_string() });
			};
			let current: StepStatus = existing.status.parse()?;

			transition::ensure_step_pending(current)?;

			return Err(Error::InvalidState {
				message: format!("Step {} changed while it was being updated.", req.step_id),
			});
		};
		let mut cadence_completed = false;

		if outcome == StepOutcome::Sent {
			let entry = OutreachLogEntry {
				event_id: Uuid::new_v4(),
				user_id: req.user_id,
				lead_id: Some(step.lead_id),
				event_type: OutreachEventType::EmailSent.as_str().to_string(),
				cadence_step_id: Some(step.step_id),
				metadata: serde_json::json!({
					"angle": step.angle,
					"step_number": step.step_number,
					"cadence_id": step.cadence_id,
				}),
				created_at: now,
			};

			vms_storage::outreach::insert_log_entry(&mut *tx, &entry).await?;
			vms_storage::leads::touch_last_contacted(&mut *tx, step.lead_id, now).await?;

			let final_step = vms_storage::steps::final_step_number(&mut *tx, step.cadence_id)
				.await?
				.unwrap_or(step.step_number);

			if transition::completes_cadence(outcome, step.step_number, final_step) {
				cadence_completed =
					vms_storage::cadences::complete_cadence(&mut *tx, step.cadence_id, now).await?;
			}
		}

		tx.commit().await?;

		tracing::info!(
			step_id = %step.step_id,
			cadence_id = %step.cadence_id,
			step_number = step.step_number,
			status = outcome.status().as_str(),
			"Cadence step finished."
		);

		if cadence_completed {
			tracing::info!(cadence_id = %step.cadence_id, "Cadence completed.");
		}

		Ok(StepActionResponse { step_id: step.step_id, status: outcome.status(), cadence_completed })
	}
}
