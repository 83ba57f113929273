use time::{Date, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStep {
	pub step_number: i32,
	pub scheduled_date: Date,
}

/// Day offsets of a cadence template. Step `n` is scheduled `offsets[n - 1]` days after the
/// enrollment day, which itself counts as day 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CadenceSchedule {
	offsets_days: Vec<u32>,
}
impl CadenceSchedule {
	pub fn new(offsets_days: Vec<u32>) -> Self {
		Self { offsets_days }
	}

	pub fn from_config(cfg: &vms_config::Cadence) -> Self {
		Self::new(cfg.step_offsets_days.clone())
	}

	pub fn step_count(&self) -> usize {
		self.offsets_days.len()
	}

	pub fn offsets_days(&self) -> &[u32] {
		&self.offsets_days
	}

	pub fn plan(&self, enrolled_on: Date) -> Vec<PlannedStep> {
		self.offsets_days
			.iter()
			.enumerate()
			.map(|(idx, offset)| PlannedStep {
				step_number: idx as i32 + 1,
				scheduled_date: enrolled_on.saturating_add(Duration::days(i64::from(*offset))),
			})
			.collect()
	}
}
impl Default for CadenceSchedule {
	fn default() -> Self {
		Self::from_config(&vms_config::Cadence::default())
	}
}

/// A pending step is due once its date is today or earlier.
pub fn is_due(scheduled_date: Date, today: Date) -> bool {
	scheduled_date <= today
}
