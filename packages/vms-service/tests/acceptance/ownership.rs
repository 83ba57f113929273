use uuid::Uuid;

use vms_domain::{Angle, CadenceStatus};
use vms_service::{
	DueRequest, EnrollRequest, Error, ListCadencesRequest, StepActionRequest, UpdateStatusRequest,
};

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn other_accounts_see_not_found() {
	let Some(test_db) = super::test_db("other_accounts_see_not_found").await else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let owner = Uuid::new_v4();
	let stranger = Uuid::new_v4();
	let lead = super::seed_lead(&service, owner, "Acme Co").await;
	let cadence = super::enroll(&service, owner, lead.lead_id, Angle::A).await;
	let step_id = cadence.steps[0].step_id;
	let cadence_id = cadence.cadence.cadence_id;
	let enroll = service
		.enroll(EnrollRequest { user_id: stranger, lead_id: lead.lead_id, angle: Angle::A })
		.await
		.expect_err("Enrolling someone else's lead must fail.");
	let get = service
		.get_cadence(stranger, cadence_id)
		.await
		.expect_err("Reading someone else's cadence must fail.");
	let sent = service
		.mark_sent(StepActionRequest { user_id: stranger, step_id })
		.await
		.expect_err("Sending someone else's step must fail.");
	let skipped = service
		.skip(StepActionRequest { user_id: stranger, step_id })
		.await
		.expect_err("Skipping someone else's step must fail.");
	let stopped = service
		.update_status(UpdateStatusRequest {
			user_id: stranger,
			cadence_id,
			status: CadenceStatus::Stopped,
			reason: None,
		})
		.await
		.expect_err("Stopping someone else's cadence must fail.");

	for err in [enroll, get, sent, skipped, stopped] {
		assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");
	}

	let listed = service
		.list_cadences(ListCadencesRequest { user_id: stranger, status: None })
		.await
		.expect("Failed to list cadences.");
	let due = service
		.list_due(DueRequest { user_id: stranger, as_of: Some(super::days_from_today(30)) })
		.await
		.expect("Failed to list due steps.");

	assert!(listed.is_empty());
	assert!(due.is_empty());

	let owner_view =
		service.get_cadence(owner, cadence_id).await.expect("Owner must see the cadence.");

	assert_eq!(owner_view.cadence.status, CadenceStatus::Active);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn unknown_ids_are_not_found() {
	let Some(test_db) = super::test_db("unknown_ids_are_not_found").await else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let enroll = service
		.enroll(EnrollRequest { user_id, lead_id: Uuid::new_v4(), angle: Angle::B })
		.await
		.expect_err("Unknown lead must fail.");
	let sent = service
		.mark_sent(StepActionRequest { user_id, step_id: Uuid::new_v4() })
		.await
		.expect_err("Unknown step must fail.");

	assert!(matches!(enroll, Error::NotFound { .. }), "Unexpected error: {enroll:?}");
	assert!(matches!(sent, Error::NotFound { .. }), "Unexpected error: {sent:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
