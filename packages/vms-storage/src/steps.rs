use sqlx::PgExecutor;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
	Result,
	models::{CadenceStep, DueStepRow, OwnedStep},
};

const STEP_COLUMNS: &str = "\
	step_id,
	cadence_id,
	step_number,
	template_id,
	scheduled_date,
	status,
	sent_at,
	created_at";

pub async fn insert_step<'e, E>(executor: E, step: &CadenceStep) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO cadence_steps (
	step_id,
	cadence_id,
	step_number,
	template_id,
	scheduled_date,
	status,
	sent_at,
	created_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8)",
	)
	.bind(step.step_id)
	.bind(step.cadence_id)
	.bind(step.step_number)
	.bind(step.template_id)
	.bind(step.scheduled_date)
	.bind(step.status.as_str())
	.bind(step.sent_at)
	.bind(step.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

/// Steps of the given cadences ordered by cadence then step number.
pub async fn list_steps<'e, E>(executor: E, cadence_ids: &[Uuid]) -> Result<Vec<CadenceStep>>
where
	E: PgExecutor<'e>,
{
	if cadence_ids.is_empty() {
		return Ok(vec![]);
	}

	let sql = format!(
		"\
SELECT {STEP_COLUMNS}
FROM cadence_steps
WHERE cadence_id = ANY($1)
ORDER BY cadence_id ASC, step_number ASC"
	);
	let rows = sqlx::query_as::<_, CadenceStep>(&sql).bind(cadence_ids).fetch_all(executor).await?;

	Ok(rows)
}

pub async fn get_owned_step<'e, E>(
	executor: E,
	user_id: Uuid,
	step_id: Uuid,
) -> Result<Option<OwnedStep>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, OwnedStep>(
		"\
SELECT
	s.step_id,
	s.cadence_id,
	s.step_number,
	s.status,
	c.lead_id,
	c.angle
FROM cadence_steps s
JOIN cadences c ON c.cadence_id = s.cadence_id
WHERE s.step_id = $1
	AND c.user_id = $2",
	)
	.bind(step_id)
	.bind(user_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// Moves an owned pending step to `status` in one statement. Returns `None` when the step is
/// missing, not owned, or no longer pending; callers use `get_owned_step` to tell these apart.
pub async fn finish_pending_step<'e, E>(
	executor: E,
	user_id: Uuid,
	step_id: Uuid,
	status: &str,
	sent_at: Option<OffsetDateTime>,
) -> Result<Option<OwnedStep>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, OwnedStep>(
		"\
UPDATE cadence_steps s
SET
	status = $3,
	sent_at = $4
FROM cadences c
WHERE s.step_id = $1
	AND s.cadence_id = c.cadence_id
	AND c.user_id = $2
	AND s.status = 'pending'
RETURNING
	s.step_id,
	s.cadence_id,
	s.step_number,
	s.status,
	c.lead_id,
	c.angle",
	)
	.bind(step_id)
	.bind(user_id)
	.bind(status)
	.bind(sent_at)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn final_step_number<'e, E>(executor: E, cadence_id: Uuid) -> Result<Option<i32>>
where
	E: PgExecutor<'e>,
{
	let max = sqlx::query_scalar::<_, Option<i32>>(
		"SELECT max(step_number) FROM cadence_steps WHERE cadence_id = $1",
	)
	.bind(cadence_id)
	.fetch_one(executor)
	.await?;

	Ok(max)
}

/// Cancels every still-pending step of a cadence and returns how many changed.
pub async fn cancel_pending_steps<'e, E>(executor: E, cadence_id: Uuid) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE cadence_steps
SET status = 'cancelled'
WHERE cadence_id = $1
	AND status = 'pending'",
	)
	.bind(cadence_id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected())
}

/// Pending steps of the owner's active cadences scheduled on or before `as_of`.
pub async fn list_due_steps<'e, E>(
	executor: E,
	user_id: Uuid,
	as_of: Date,
) -> Result<Vec<DueStepRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, DueStepRow>(
		"\
SELECT
	s.step_id,
	s.cadence_id,
	s.step_number,
	s.scheduled_date,
	c.angle,
	l.lead_id,
	l.company_name,
	l.contact_name,
	l.email,
	l.equipment_types,
	s.template_id,
	t.subject,
	t.body
FROM cadence_steps s
JOIN cadences c ON c.cadence_id = s.cadence_id
JOIN leads l ON l.lead_id = c.lead_id
LEFT JOIN email_templates t ON t.template_id = s.template_id
WHERE c.user_id = $1
	AND c.status = 'active'
	AND s.status = 'pending'
	AND s.scheduled_date <= $2
ORDER BY s.scheduled_date ASC, s.step_number ASC, s.step_id ASC",
	)
	.bind(user_id)
	.bind(as_of)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
