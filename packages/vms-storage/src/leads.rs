use sqlx::{PgConnection, PgExecutor};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	models::{Lead, LeadSummary},
};

const LEAD_COLUMNS: &str = "\
	lead_id,
	user_id,
	company_name,
	contact_name,
	email,
	phone,
	website,
	address,
	city,
	state,
	zip_code,
	equipment_types,
	source,
	source_url,
	status,
	follow_up_date,
	notes,
	last_contacted,
	angle_used,
	has_existing_finance_partner,
	offers_financing_on_website,
	created_at,
	updated_at";

pub async fn insert_lead<'e, E>(executor: E, lead: &Lead) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO leads (
	lead_id,
	user_id,
	company_name,
	contact_name,
	email,
	phone,
	website,
	address,
	city,
	state,
	zip_code,
	equipment_types,
	source,
	source_url,
	status,
	follow_up_date,
	notes,
	last_contacted,
	angle_used,
	has_existing_finance_partner,
	offers_financing_on_website,
	created_at,
	updated_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19,$20,$21,$22,$23)",
	)
	.bind(lead.lead_id)
	.bind(lead.user_id)
	.bind(lead.company_name.as_str())
	.bind(lead.contact_name.as_deref())
	.bind(lead.email.as_deref())
	.bind(lead.phone.as_deref())
	.bind(lead.website.as_deref())
	.bind(lead.address.as_deref())
	.bind(lead.city.as_deref())
	.bind(lead.state.as_deref())
	.bind(lead.zip_code.as_deref())
	.bind(&lead.equipment_types)
	.bind(lead.source.as_str())
	.bind(lead.source_url.as_deref())
	.bind(lead.status.as_str())
	.bind(lead.follow_up_date)
	.bind(lead.notes.as_deref())
	.bind(lead.last_contacted)
	.bind(lead.angle_used.as_deref())
	.bind(lead.has_existing_finance_partner.as_str())
	.bind(lead.offers_financing_on_website)
	.bind(lead.created_at)
	.bind(lead.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn get_lead<'e, E>(executor: E, user_id: Uuid, lead_id: Uuid) -> Result<Option<Lead>>
where
	E: PgExecutor<'e>,
{
	let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE lead_id = $1 AND user_id = $2");
	let row = sqlx::query_as::<_, Lead>(&sql)
		.bind(lead_id)
		.bind(user_id)
		.fetch_optional(executor)
		.await?;

	Ok(row)
}

/// Locks the owned lead row until the surrounding transaction ends.
pub async fn lock_lead(
	executor: &mut PgConnection,
	user_id: Uuid,
	lead_id: Uuid,
) -> Result<Option<Lead>> {
	let sql = format!(
		"SELECT {LEAD_COLUMNS} FROM leads WHERE lead_id = $1 AND user_id = $2 FOR UPDATE"
	);
	let row = sqlx::query_as::<_, Lead>(&sql)
		.bind(lead_id)
		.bind(user_id)
		.fetch_optional(executor)
		.await?;

	Ok(row)
}

pub async fn set_angle_used<'e, E>(
	executor: E,
	lead_id: Uuid,
	angle: &str,
	now: OffsetDateTime,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query("UPDATE leads SET angle_used = $2, updated_at = $3 WHERE lead_id = $1")
		.bind(lead_id)
		.bind(angle)
		.bind(now)
		.execute(executor)
		.await?;

	Ok(())
}

pub async fn touch_last_contacted<'e, E>(
	executor: E,
	lead_id: Uuid,
	now: OffsetDateTime,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query("UPDATE leads SET last_contacted = $2, updated_at = $2 WHERE lead_id = $1")
		.bind(lead_id)
		.bind(now)
		.execute(executor)
		.await?;

	Ok(())
}

pub async fn list_lead_summaries<'e, E>(
	executor: E,
	user_id: Uuid,
	lead_ids: &[Uuid],
) -> Result<Vec<LeadSummary>>
where
	E: PgExecutor<'e>,
{
	if lead_ids.is_empty() {
		return Ok(vec![]);
	}

	let rows = sqlx::query_as::<_, LeadSummary>(
		"\
SELECT
	lead_id,
	company_name,
	contact_name,
	email,
	equipment_types,
	status
FROM leads
WHERE user_id = $1
	AND lead_id = ANY($2)",
	)
	.bind(user_id)
	.bind(lead_ids)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
