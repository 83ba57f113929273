use uuid::Uuid;

use vms_domain::{Angle, CadenceStatus};
use vms_service::{DueRequest, StepActionRequest, UpdateStatusRequest};

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn due_steps_follow_the_calendar() {
	let Some(test_db) = super::test_db("due_steps_follow_the_calendar").await else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let first = super::seed_lead(&service, user_id, "Acme Co").await;
	let second = super::seed_lead(&service, user_id, "Big Iron").await;
	let first_cadence = super::enroll(&service, user_id, first.lead_id, Angle::A).await;

	super::enroll(&service, user_id, second.lead_id, Angle::A).await;

	let due_today = service
		.list_due(DueRequest { user_id, as_of: None })
		.await
		.expect("Failed to list due steps.");

	assert_eq!(due_today.len(), 2);
	assert!(due_today.iter().all(|step| step.step_number == 1));

	let due_later = service
		.list_due(DueRequest { user_id, as_of: Some(super::days_from_today(2)) })
		.await
		.expect("Failed to list due steps.");
	let order = due_later
		.iter()
		.map(|step| (step.scheduled_date, step.step_number))
		.collect::<Vec<_>>();

	assert_eq!(order, vec![
		(super::today(), 1),
		(super::today(), 1),
		(super::days_from_today(2), 2),
		(super::days_from_today(2), 2),
	]);

	service
		.mark_sent(StepActionRequest { user_id, step_id: first_cadence.steps[0].step_id })
		.await
		.expect("Failed to mark step sent.");

	let remaining = service
		.list_due(DueRequest { user_id, as_of: None })
		.await
		.expect("Failed to list due steps.");

	assert_eq!(remaining.len(), 1);
	assert_eq!(remaining[0].lead.lead_id, second.lead_id);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn paused_cadences_drop_out_of_the_due_queue() {
	let Some(test_db) = super::test_db("paused_cadences_drop_out_of_the_due_queue").await else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let cadence = super::enroll(&service, user_id, lead.lead_id, Angle::A).await;

	service
		.update_status(UpdateStatusRequest {
			user_id,
			cadence_id: cadence.cadence.cadence_id,
			status: CadenceStatus::Paused,
			reason: None,
		})
		.await
		.expect("Failed to pause cadence.");

	let due = service
		.list_due(DueRequest { user_id, as_of: Some(super::days_from_today(30)) })
		.await
		.expect("Failed to list due steps.");

	assert!(due.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VMS_PG_DSN to run."]
async fn due_steps_carry_rendered_template_content() {
	let Some(test_db) = super::test_db("due_steps_carry_rendered_template_content").await else {
		return;
	};
	let service = super::open_service(&test_db).await;
	let template_id = super::seed_template(
		&service.db.pool,
		Angle::A,
		1,
		"Quick question for {{company_name}}",
		"Hi {{contact_name}}, do your buyers finance {{equipment_type}}?",
	)
	.await;
	let user_id = Uuid::new_v4();
	let lead = super::seed_lead(&service, user_id, "Acme Co").await;
	let cadence = super::enroll(&service, user_id, lead.lead_id, Angle::A).await;

	assert_eq!(cadence.steps[0].template_id, Some(template_id));
	assert_eq!(cadence.steps[1].template_id, None);

	let due = service
		.list_due(DueRequest { user_id, as_of: Some(super::days_from_today(2)) })
		.await
		.expect("Failed to list due steps.");

	assert_eq!(due.len(), 2);
	assert_eq!(due[0].template_id, Some(template_id));
	assert_eq!(due[0].subject, "Quick question for Acme Co");
	assert_eq!(due[0].body, "Hi there, do your buyers finance skid steers?");
	assert_eq!(due[1].subject, "");
	assert_eq!(due[1].body, "");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
