use sqlx::{PgConnection, PgExecutor};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, models::Cadence};

/// Name of the partial unique index that keeps one active cadence per lead.
pub const ONE_ACTIVE_PER_LEAD: &str = "uq_cadences_one_active_per_lead";

const CADENCE_COLUMNS: &str = "\
	cadence_id,
	lead_id,
	user_id,
	angle,
	status,
	started_at,
	stopped_at,
	stop_reason,
	created_at,
	updated_at";

pub async fn insert_cadence<'e, E>(executor: E, cadence: &Cadence) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO cadences (
	cadence_id,
	lead_id,
	user_id,
	angle,
	status,
	started_at,
	stopped_at,
	stop_reason,
	created_at,
	updated_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)",
	)
	.bind(cadence.cadence_id)
	.bind(cadence.lead_id)
	.bind(cadence.user_id)
	.bind(cadence.angle.as_str())
	.bind(cadence.status.as_str())
	.bind(cadence.started_at)
	.bind(cadence.stopped_at)
	.bind(cadence.stop_reason.as_deref())
	.bind(cadence.created_at)
	.bind(cadence.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn find_active_for_lead<'e, E>(executor: E, lead_id: Uuid) -> Result<Option<Uuid>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_scalar::<_, Uuid>(
		"SELECT cadence_id FROM cadences WHERE lead_id = $1 AND status = 'active' LIMIT 1",
	)
	.bind(lead_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn get_cadence<'e, E>(
	executor: E,
	user_id: Uuid,
	cadence_id: Uuid,
) -> Result<Option<Cadence>>
where
	E: PgExecutor<'e>,
{
	let sql =
		format!("SELECT {CADENCE_COLUMNS} FROM cadences WHERE cadence_id = $1 AND user_id = $2");
	let row = sqlx::query_as::<_, Cadence>(&sql)
		.bind(cadence_id)
		.bind(user_id)
		.fetch_optional(executor)
		.await?;

	Ok(row)
}

/// Locks the owned cadence row until the surrounding transaction ends.
pub async fn lock_cadence(
	executor: &mut PgConnection,
	user_id: Uuid,
	cadence_id: Uuid,
) -> Result<Option<Cadence>> {
	let sql = format!(
		"SELECT {CADENCE_COLUMNS} FROM cadences WHERE cadence_id = $1 AND user_id = $2 FOR UPDATE"
	);
	let row = sqlx::query_as::<_, Cadence>(&sql)
		.bind(cadence_id)
		.bind(user_id)
		.fetch_optional(executor)
		.await?;

	Ok(row)
}

/// Owned cadences, newest first, optionally restricted to one status.
pub async fn list_cadences<'e, E>(
	executor: E,
	user_id: Uuid,
	status: Option<&str>,
) -> Result<Vec<Cadence>>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
SELECT {CADENCE_COLUMNS}
FROM cadences
WHERE user_id = $1
	AND ($2::text IS NULL OR status = $2)
ORDER BY created_at DESC, cadence_id ASC"
	);
	let rows = sqlx::query_as::<_, Cadence>(&sql)
		.bind(user_id)
		.bind(status)
		.fetch_all(executor)
		.await?;

	Ok(rows)
}

pub async fn update_status<'e, E>(
	executor: E,
	cadence_id: Uuid,
	status: &str,
	stopped_at: Option<OffsetDateTime>,
	stop_reason: Option<&str>,
	now: OffsetDateTime,
) -> Result<Cadence>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
UPDATE cadences
SET
	status = $2,
	stopped_at = COALESCE($3, stopped_at),
	stop_reason = COALESCE($4, stop_reason),
	updated_at = $5
WHERE cadence_id = $1
RETURNING {CADENCE_COLUMNS}"
	);
	let row = sqlx::query_as::<_, Cadence>(&sql)
		.bind(cadence_id)
		.bind(status)
		.bind(stopped_at)
		.bind(stop_reason)
		.bind(now)
		.fetch_one(executor)
		.await?;

	Ok(row)
}

/// Moves an active cadence to completed. Returns `false` when it was no longer active.
pub async fn complete_cadence<'e, E>(
	executor: E,
	cadence_id: Uuid,
	now: OffsetDateTime,
) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE cadences
SET
	status = 'completed',
	updated_at = $2
WHERE cadence_id = $1
	AND status = 'active'",
	)
	.bind(cadence_id)
	.bind(now)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() == 1)
}
