use uuid::Uuid;

use vms_domain::{Angle, CadenceStatus, StepStatus};
use vms_service::{Error, ListCadencesRequest, StepActionRequest, UpdateStatusRequest};

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn enroll_schedules_four_pending_steps_from_today() {
	let Some(test_db) = super::test_db("enroll_schedules_four_pending_steps_from_today").await
	else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let cadence = super::enroll(&service, user_id, lead.lead_id, Angle::B).await;
	let dates = cadence.steps.iter().map(|step| step.scheduled_date).collect::<Vec<_>>();

	assert_eq!(cadence.cadence.status, CadenceStatus::Active);
	assert_eq!(cadence.cadence.angle, Angle::B);
	assert_eq!(cadence.steps.iter().map(|step| step.step_number).collect::<Vec<_>>(), vec![
		1, 2, 3, 4
	]);
	assert_eq!(dates, vec![
		super::days_from_today(0),
		super::days_from_today(2),
		super::days_from_today(6),
		super::days_from_today(13),
	]);
	assert!(cadence.steps.iter().all(|step| step.status == StepStatus::Pending));
	assert!(cadence.steps.iter().all(|step| step.template_id.is_none()));

	let stored = vms_storage::leads::get_lead(&service.db.pool, user_id, lead.lead_id)
		.await
		.expect("Failed to read lead.")
		.expect("Lead must exist.");

	assert_eq!(stored.angle_used.as_deref(), Some("B"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn second_enrollment_conflicts_until_the_first_is_stopped() {
	let Some(test_db) =
		super::test_db("second_enrollment_conflicts_until_the_first_is_stopped").await
	else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let first = super::enroll(&service, user_id, lead.lead_id, Angle::A).await;
	let err = service
		.enroll(vms_service::EnrollRequest { user_id, lead_id: lead.lead_id, angle: Angle::C })
		.await
		.expect_err("Second active cadence must be rejected.");

	assert!(matches!(err, Error::Conflict { .. }), "Unexpected error: {err:?}");

	service
		.update_status(UpdateStatusRequest {
			user_id,
			cadence_id: first.cadence.cadence_id,
			status: CadenceStatus::Stopped,
			reason: Some("Replied".to_string()),
		})
		.await
		.expect("Failed to stop cadence.");

	let second = super::enroll(&service, user_id, lead.lead_id, Angle::C).await;
	let all = service
		.list_cadences(ListCadencesRequest { user_id, status: None })
		.await
		.expect("Failed to list cadences.");
	let active = service
		.list_cadences(ListCadencesRequest { user_id, status: Some(CadenceStatus::Active) })
		.await
		.expect("Failed to list active cadences.");

	assert_eq!(all.len(), 2);
	assert_eq!(active.len(), 1);
	assert_eq!(active[0].cadence.cadence_id, second.cadence.cadence_id);
	assert_eq!(active[0].lead.as_ref().map(|lead| lead.company_name.as_str()), Some("Acme Co"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn sending_the_final_step_completes_the_cadence() {
	let Some(test_db) = super::test_db("sending_the_final_step_completes_the_cadence").await else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let cadence = super::enroll(&service, user_id, lead.lead_id, Angle::A).await;
	let mut completed = Vec::new();

	for step in &cadence.steps {
		let response = service
			.mark_sent(StepActionRequest { user_id, step_id: step.step_id })
			.await
			.expect("Failed to mark step sent.");

		assert_eq!(response.status, StepStatus::Sent);

		completed.push(response.cadence_completed);
	}

	assert_eq!(completed, vec![false, false, false, true]);

	let after = service
		.get_cadence(user_id, cadence.cadence.cadence_id)
		.await
		.expect("Failed to load cadence.");

	assert_eq!(after.cadence.status, CadenceStatus::Completed);
	assert!(after.steps.iter().all(|step| step.sent_at.is_some()));

	let log_count = sqlx::query_scalar::<_, i64>(
		"SELECT count(*) FROM outreach_log WHERE lead_id = $1 AND event_type = 'email_sent'",
	)
	.bind(lead.lead_id)
	.fetch_one(&service.db.pool)
	.await
	.expect("Failed to count outreach log.");
	let stored = vms_storage::leads::get_lead(&service.db.pool, user_id, lead.lead_id)
		.await
		.expect("Failed to read lead.")
		.expect("Lead must exist.");

	assert_eq!(log_count, 4);
	assert!(stored.last_contacted.is_some());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn earlier_steps_stay_workable_after_an_early_final_send() {
	let Some(test_db) =
		super::test_db("earlier_steps_stay_workable_after_an_early_final_send").await
	else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let cadence = super::enroll(&service, user_id, lead.lead_id, Angle::C).await;
	let final_send = service
		.mark_sent(StepActionRequest { user_id, step_id: cadence.steps[3].step_id })
		.await
		.expect("Failed to send the final step.");

	assert!(final_send.cadence_completed);

	let third = service
		.mark_sent(StepActionRequest { user_id, step_id: cadence.steps[2].step_id })
		.await
		.expect("A pending step of a completed cadence must still send.");
	let second = service
		.skip(StepActionRequest { user_id, step_id: cadence.steps[1].step_id })
		.await
		.expect("A pending step of a completed cadence must still skip.");

	assert_eq!(third.status, StepStatus::Sent);
	assert!(!third.cadence_completed);
	assert_eq!(second.status, StepStatus::Skipped);
	assert!(!second.cadence_completed);

	let after = service
		.get_cadence(user_id, cadence.cadence.cadence_id)
		.await
		.expect("Failed to load cadence.");
	let statuses = after.steps.iter().map(|step| step.status).collect::<Vec<_>>();

	assert_eq!(after.cadence.status, CadenceStatus::Completed);
	assert_eq!(
		statuses,
		vec![StepStatus::Pending, StepStatus::Skipped, StepStatus::Sent, StepStatus::Sent]
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn skipping_the_final_step_leaves_the_cadence_active() {
	let Some(test_db) = super::test_db("skipping_the_final_step_leaves_the_cadence_active").await
	else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let cadence = super::enroll(&service, user_id, lead.lead_id, Angle::A).await;
	let response = service
		.skip(StepActionRequest { user_id, step_id: cadence.steps[3].step_id })
		.await
		.expect("Failed to skip step.");

	assert_eq!(response.status, StepStatus::Skipped);
	assert!(!response.cadence_completed);

	let after = service
		.get_cadence(user_id, cadence.cadence.cadence_id)
		.await
		.expect("Failed to load cadence.");

	assert_eq!(after.cadence.status, CadenceStatus::Active);
	assert_eq!(after.steps[0].status, StepStatus::Pending);
	assert_eq!(after.steps[3].sent_at, None);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn stop_cancels_pending_steps_and_keeps_sent_ones() {
	let Some(test_db) = super::test_db("stop_cancels_pending_steps_and_keeps_sent_ones").await
	else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let cadence = super::enroll(&service, user_id, lead.lead_id, Angle::A).await;

	service
		.mark_sent(StepActionRequest { user_id, step_id: cadence.steps[0].step_id })
		.await
		.expect("Failed to mark step sent.");

	let stopped = service
		.update_status(UpdateStatusRequest {
			user_id,
			cadence_id: cadence.cadence.cadence_id,
			status: CadenceStatus::Stopped,
			reason: Some("Dealer replied".to_string()),
		})
		.await
		.expect("Failed to stop cadence.");

	assert_eq!(stopped.cancelled_steps, 3);
	assert_eq!(stopped.cadence.status, CadenceStatus::Stopped);
	assert!(stopped.cadence.stopped_at.is_some());
	assert_eq!(stopped.cadence.stop_reason.as_deref(), Some("Dealer replied"));

	let after = service
		.get_cadence(user_id, cadence.cadence.cadence_id)
		.await
		.expect("Failed to load cadence.");
	let statuses = after.steps.iter().map(|step| step.status).collect::<Vec<_>>();

	assert_eq!(statuses, vec![
		StepStatus::Sent,
		StepStatus::Cancelled,
		StepStatus::Cancelled,
		StepStatus::Cancelled,
	]);

	let err = service
		.update_status(UpdateStatusRequest {
			user_id,
			cadence_id: cadence.cadence.cadence_id,
			status: CadenceStatus::Stopped,
			reason: None,
		})
		.await
		.expect_err("Stopping a stopped cadence must fail.");

	assert!(matches!(err, Error::InvalidState { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn pause_cancels_pending_steps_without_stop_metadata() {
	let Some(test_db) = super::test_db("pause_cancels_pending_steps_without_stop_metadata").await
	else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let cadence = super::enroll(&service, user_id, lead.lead_id, Angle::A).await;
	let paused = service
		.update_status(UpdateStatusRequest {
			user_id,
			cadence_id: cadence.cadence.cadence_id,
			status: CadenceStatus::Paused,
			reason: Some("Vacation".to_string()),
		})
		.await
		.expect("Failed to pause cadence.");

	assert_eq!(paused.cadence.status, CadenceStatus::Paused);
	assert_eq!(paused.cancelled_steps, 4);
	assert_eq!(paused.cadence.stopped_at, None);
	assert_eq!(paused.cadence.stop_reason, None);

	let err = service
		.update_status(UpdateStatusRequest {
			user_id,
			cadence_id: cadence.cadence.cadence_id,
			status: CadenceStatus::Completed,
			reason: None,
		})
		.await
		.expect_err("Completing through a status change must fail.");

	assert!(matches!(err, Error::InvalidState { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn pausing_a_paused_cadence_is_allowed() {
	let Some(test_db) = super::test_db("pausing_a_paused_cadence_is_allowed").await else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let cadence = super::enroll(&service, user_id, lead.lead_id, Angle::B).await;
	let pause = UpdateStatusRequest {
		user_id,
		cadence_id: cadence.cadence.cadence_id,
		status: CadenceStatus::Paused,
		reason: None,
	};
	let first = service.update_status(pause.clone()).await.expect("Failed to pause cadence.");
	let second = service.update_status(pause).await.expect("Pausing again must succeed.");

	assert_eq!(first.cadence.status, CadenceStatus::Paused);
	assert_eq!(first.cancelled_steps, 4);
	assert_eq!(second.cadence.status, CadenceStatus::Paused);
	assert_eq!(second.cancelled_steps, 0);

	let stopped = service
		.update_status(UpdateStatusRequest {
			user_id,
			cadence_id: cadence.cadence.cadence_id,
			status: CadenceStatus::Stopped,
			reason: Some("Not interested".to_string()),
		})
		.await
		.expect("A paused cadence must stop.");

	assert_eq!(stopped.cadence.status, CadenceStatus::Stopped);
	assert_eq!(stopped.cadence.stop_reason.as_deref(), Some("Not interested"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
