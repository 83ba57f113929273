use crate::{CadenceStatus, StepStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
	#[error("Step is {current}, only pending steps can change.")]
	StepNotPending { current: StepStatus },
	#[error("Cadence is {current}, only active or paused cadences can be stopped or paused.")]
	CadenceNotStoppable { current: CadenceStatus },
	#[error("Cadences can only be moved to stopped or paused, not {target}.")]
	InvalidStopTarget { target: CadenceStatus },
}

/// The terminal status a pending step moves to. Cancellation is only reachable through a
/// cadence stop, never directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
	Sent,
	Skipped,
}
impl StepOutcome {
	pub fn status(self) -> StepStatus {
		match self {
			Self::Sent => StepStatus::Sent,
			Self::Skipped => StepStatus::Skipped,
		}
	}
}

pub fn ensure_step_pending(current: StepStatus) -> Result<(), TransitionError> {
	if current == StepStatus::Pending {
		Ok(())
	} else {
		Err(TransitionError::StepNotPending { current })
	}
}

/// Validates a user-requested stop or pause.
pub fn check_stop(current: CadenceStatus, target: CadenceStatus) -> Result<(), TransitionError> {
	if !matches!(target, CadenceStatus::Stopped | CadenceStatus::Paused) {
		return Err(TransitionError::InvalidStopTarget { target });
	}
	if !matches!(current, CadenceStatus::Active | CadenceStatus::Paused) {
		return Err(TransitionError::CadenceNotStoppable { current });
	}

	Ok(())
}

/// Only a sent final step completes a cadence. Skipping the final step leaves the cadence
/// active.
pub fn completes_cadence(outcome: StepOutcome, step_number: i32, final_step: i32) -> bool {
	outcome == StepOutcome::Sent && step_number == final_step
}
