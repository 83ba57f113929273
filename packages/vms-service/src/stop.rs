use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{CadenceView, Error, Result, VmsService};
use vms_domain::{CadenceStatus, transition};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
	pub user_id: Uuid,
	pub cadence_id: Uuid,
	/// `stopped` or `paused`.
	pub status: CadenceStatus,
	#[serde(default)]
	pub reason: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
	pub cadence: CadenceView,
	pub cancelled_steps: u64,
}

impl VmsService {
	/// Stops or pauses an owned cadence and cancels its pending steps in the same transaction.
	pub async fn update_status(&self, req: UpdateStatusRequest) -> Result<UpdateStatusResponse> {
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let cadence = vms_storage::cadences::lock_cadence(&mut *tx, req.user_id, req.cadence_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Cadence not found.".to_string() })?;
		let current: CadenceStatus = cadence.status.parse()?;

		transition::check_stop(current, req.status)?;

		let stopping = req.status == CadenceStatus::Stopped;
		let stopped_at = stopping.then_some(now);
		let reason = if stopping { crate::non_blank(req.reason) } else { None };
		let updated = vms_storage::cadences::update_status(
			&mut *tx,
			cadence.cadence_id,
			req.status.as_str(),
			stopped_at,
			reason.as_deref(),
			now,
		)
		.await?;
		let cancelled_steps =
			vms_storage::steps::cancel_pending_steps(&mut *tx, cadence.cadence_id).await?;

		tx.commit().await?;

		tracing::info!(
			cadence_id = %cadence.cadence_id,
			from = %current,
			status = %req.status,
			cancelled_steps,
			"Cadence status updated."
		);

		Ok(UpdateStatusResponse { cadence: CadenceView::try_from(updated)?, cancelled_steps })
	}
}
