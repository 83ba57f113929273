pub mod contact;
pub mod kinds;
pub mod merge;
pub mod schedule;
pub mod transition;

pub use kinds::{
	Angle, CadenceStatus, FinancePartnerStatus, LeadSource, LeadStatus, OutreachEventType,
	ParseKindError, StepStatus,
};
