use uuid::Uuid;

use vms_domain::Angle;
use vms_service::{Error, StepActionRequest};

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn second_mark_sent_is_rejected_without_a_second_log_entry() {
	let Some(test_db) =
		super::test_db("second_mark_sent_is_rejected_without_a_second_log_entry").await
	else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let cadence = super::enroll(&service, user_id, lead.lead_id, Angle::A).await;
	let request = StepActionRequest { user_id, step_id: cadence.steps[0].step_id };

	service.mark_sent(request.clone()).await.expect("First mark_sent failed.");

	let again = service.mark_sent(request.clone()).await.expect_err("Second mark_sent must fail.");
	let skip = service.skip(request).await.expect_err("Skipping a sent step must fail.");

	assert!(matches!(again, Error::InvalidState { .. }), "Unexpected error: {again:?}");
	assert!(matches!(skip, Error::InvalidState { .. }), "Unexpected error: {skip:?}");

	let entries = vms_storage::outreach::list_for_step(&service.db.pool, cadence.steps[0].step_id)
		.await
		.expect("Failed to read outreach log.");

	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].event_type, "email_sent");
	assert_eq!(entries[0].metadata["angle"], "A");
	assert_eq!(entries[0].metadata["step_number"], 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn concurrent_mark_sent_records_one_send() {
	let Some(test_db) = super::test_db("concurrent_mark_sent_records_one_send").await else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let cadence = super::enroll(&service, user_id, lead.lead_id, Angle::A).await;
	let request = StepActionRequest { user_id, step_id: cadence.steps[0].step_id };
	let (left, right) =
		tokio::join!(service.mark_sent(request.clone()), service.mark_sent(request.clone()));
	let successes = [left.is_ok(), right.is_ok()].into_iter().filter(|ok| *ok).count();
	let entries = vms_storage::outreach::list_for_step(&service.db.pool, request.step_id)
		.await
		.expect("Failed to read outreach log.");

	assert_eq!(successes, 1);
	assert_eq!(entries.len(), 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
