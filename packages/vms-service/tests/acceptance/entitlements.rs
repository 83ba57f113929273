use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use uuid::Uuid;

use vms_domain::Angle;
use vms_service::{EnrollRequest, Error, ProfileTierGate, SocialSearchRequest};

use super::DenyAll;

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn unentitled_accounts_cannot_enroll() {
	let Some(test_db) = super::test_db("unentitled_accounts_cannot_enroll").await else {
		return;
	};
	let calls = Arc::new(AtomicUsize::new(0));
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, Arc::new(DenyAll { calls: calls.clone() }))
		.await
		.expect("Failed to build service.");
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let err = service
		.enroll(EnrollRequest { user_id, lead_id: lead.lead_id, angle: Angle::A })
		.await
		.expect_err("Denied account must not enroll.");

	assert!(matches!(err, Error::NotEntitled { .. }), "Unexpected error: {err:?}");
	assert_eq!(calls.load(Ordering::SeqCst), 1);

	let cadences = sqlx::query_scalar::<_, i64>("SELECT count(*) FROM cadences")
		.fetch_one(&service.db.pool)
		.await
		.expect("Failed to count cadences.");

	assert_eq!(cadences, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn missing_lead_is_reported_before_the_tier_check() {
	let Some(test_db) = super::test_db("missing_lead_is_reported_before_the_tier_check").await
	else {
		return;
	};
	let calls = Arc::new(AtomicUsize::new(0));
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, Arc::new(DenyAll { calls: calls.clone() }))
		.await
		.expect("Failed to build service.");
	let user_id = Uuid::new_v4();
	let unknown = service
		.enroll(EnrollRequest { user_id, lead_id: Uuid::new_v4(), angle: Angle::A })
		.await
		.expect_err("Unknown lead must not enroll.");

	assert!(matches!(unknown, Error::NotFound { .. }), "Unexpected error: {unknown:?}");

	let foreign_lead = super::seed_lead(&service, Uuid::new_v4(), "Other Co").await;
	let foreign = service
		.enroll(EnrollRequest { user_id, lead_id: foreign_lead.lead_id, angle: Angle::B })
		.await
		.expect_err("Foreign lead must not enroll.");

	assert!(matches!(foreign, Error::NotFound { .. }), "Unexpected error: {foreign:?}");
	assert_eq!(calls.load(Ordering::SeqCst), 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn profile_tier_decides_entitlement() {
	let Some(test_db) = super::test_db("profile_tier_decides_entitlement").await else {
		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let gate = Arc::new(ProfileTierGate::new(&cfg.cadence));
	let service = super::build_service(cfg, gate).await.expect("Failed to build service.");
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let request = EnrollRequest { user_id, lead_id: lead.lead_id, angle: Angle::A };
	let no_profile =
		service.enroll(request.clone()).await.expect_err("Accounts without a profile are free.");

	assert!(matches!(no_profile, Error::NotEntitled { .. }), "Unexpected error: {no_profile:?}");

	vms_storage::profiles::upsert_profile(&service.db.pool, user_id, "starter")
		.await
		.expect("Failed to write profile.");

	let starter = service.enroll(request.clone()).await.expect_err("Starter is not entitled.");

	assert!(matches!(starter, Error::NotEntitled { .. }), "Unexpected error: {starter:?}");

	vms_storage::profiles::upsert_profile(&service.db.pool, user_id, "pro")
		.await
		.expect("Failed to write profile.");

	let cadence = service.enroll(request).await.expect("Pro accounts must enroll.");

	assert_eq!(cadence.steps.len(), 4);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn social_search_without_reddit_config_is_not_configured() {
	let Some(test_db) =
		super::test_db("social_search_without_reddit_config_is_not_configured").await
	else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let err = service
		.search_social(SocialSearchRequest {
			user_id: Uuid::new_v4(),
			query: Some("excavator dealer".to_string()),
			equipment_type: None,
			state: None,
			subreddits: None,
			sort: None,
			window: None,
			limit: None,
		})
		.await
		.expect_err("Social search needs Reddit credentials.");

	assert!(matches!(err, Error::ProviderNotConfigured { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
