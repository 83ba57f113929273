use sqlx::PgExecutor;
use uuid::Uuid;

use crate::Result;

/// The caller's subscription tier, or `None` when no profile row exists yet.
pub async fn subscription_tier<'e, E>(executor: E, user_id: Uuid) -> Result<Option<String>>
where
	E: PgExecutor<'e>,
{
	let tier = sqlx::query_scalar::<_, String>(
		"SELECT subscription_tier FROM profiles WHERE user_id = $1",
	)
	.bind(user_id)
	.fetch_optional(executor)
	.await?;

	Ok(tier)
}

pub async fn upsert_profile<'e, E>(executor: E, user_id: Uuid, tier: &str) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO profiles (user_id, subscription_tier)
VALUES ($1, $2)
ON CONFLICT (user_id) DO UPDATE
SET
	subscription_tier = EXCLUDED.subscription_tier,
	updated_at = now()",
	)
	.bind(user_id)
	.bind(tier)
	.execute(executor)
	.await?;

	Ok(())
}
