use sqlx::PgExecutor;

use crate::{Result, models::EmailTemplate};

/// Cadence templates for one angle, ordered so the preferred template for each step comes first.
pub async fn list_cadence_templates<'e, E>(executor: E, angle: &str) -> Result<Vec<EmailTemplate>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, EmailTemplate>(
		"\
SELECT
	template_id,
	name,
	subject,
	body,
	category,
	is_default,
	tier_required,
	angle,
	cadence_step,
	cadence_day,
	created_at
FROM email_templates
WHERE category = 'cadence'
	AND angle = $1
	AND cadence_step IS NOT NULL
ORDER BY cadence_step ASC, is_default DESC, created_at ASC",
	)
	.bind(angle)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn insert_template<'e, E>(executor: E, template: &EmailTemplate) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO email_templates (
	template_id,
	name,
	subject,
	body,
	category,
	is_default,
	tier_required,
	angle,
	cadence_step,
	cadence_day,
	created_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)",
	)
	.bind(template.template_id)
	.bind(template.name.as_str())
	.bind(template.subject.as_str())
	.bind(template.body.as_str())
	.bind(template.category.as_deref())
	.bind(template.is_default)
	.bind(template.tier_required.as_str())
	.bind(template.angle.as_deref())
	.bind(template.cadence_step)
	.bind(template.cadence_day)
	.bind(template.created_at)
	.execute(executor)
	.await?;

	Ok(())
}
