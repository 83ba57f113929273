use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{Result, models::OutreachLogEntry};

pub async fn insert_log_entry<'e, E>(executor: E, entry: &OutreachLogEntry) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO outreach_log (
	event_id,
	user_id,
	lead_id,
	event_type,
	cadence_step_id,
	metadata,
	created_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7)",
	)
	.bind(entry.event_id)
	.bind(entry.user_id)
	.bind(entry.lead_id)
	.bind(entry.event_type.as_str())
	.bind(entry.cadence_step_id)
	.bind(&entry.metadata)
	.bind(entry.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn list_for_step<'e, E>(executor: E, step_id: Uuid) -> Result<Vec<OutreachLogEntry>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, OutreachLogEntry>(
		"\
SELECT
	event_id,
	user_id,
	lead_id,
	event_type,
	cadence_step_id,
	metadata,
	created_at
FROM outreach_log
WHERE cadence_step_id = $1
ORDER BY created_at ASC",
	)
	.bind(step_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
