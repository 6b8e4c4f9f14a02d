use chrono::{Duration, TimeZone, Utc};
use taskhive_core::{Project, ProjectStatus, Task, Worker};
use uuid::Uuid;

#[test]
fn worker_wire_shape_has_no_password_field() {
    let worker_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let position_id = Uuid::parse_str("aaaaaaaa-bbbb-4ccc-8ddd-eeeeeeeeeeee").unwrap();
    let worker = Worker {
        uuid: worker_id,
        username: "ann.dev".to_string(),
        first_name: "Ann".to_string(),
        last_name: "Bee".to_string(),
        position: position_id,
    };

    let json = serde_json::to_value(&worker).unwrap();
    assert_eq!(json["uuid"], worker_id.to_string());
    assert_eq!(json["username"], "ann.dev");
    assert_eq!(json["first_name"], "Ann");
    assert_eq!(json["last_name"], "Bee");
    assert_eq!(json["position"], position_id.to_string());
    assert!(json.get("password").is_none());

    let decoded: Worker = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, worker);
}

#[test]
fn full_name_joins_and_trims_name_parts() {
    let mut worker = Worker {
        uuid: Uuid::new_v4(),
        username: "ann".to_string(),
        first_name: "Ann".to_string(),
        last_name: "Bee".to_string(),
        position: Uuid::new_v4(),
    };
    assert_eq!(worker.full_name(), "Ann Bee");

    worker.last_name.clear();
    assert_eq!(worker.full_name(), "Ann");

    worker.first_name.clear();
    assert_eq!(worker.full_name(), "");
}

#[test]
fn task_wire_shape_uses_rfc3339_deadline() {
    let task_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let task_type_id = Uuid::parse_str("aaaaaaaa-bbbb-4ccc-8ddd-eeeeeeeeeeee").unwrap();
    let assignee_id = Uuid::parse_str("99999999-9999-4999-8999-999999999999").unwrap();
    let task = Task {
        uuid: task_id,
        name: "Ship release".to_string(),
        deadline: Utc.with_ymd_and_hms(2031, 5, 1, 9, 30, 0).unwrap(),
        is_completed: false,
        task_type: task_type_id,
        assignees: vec![assignee_id],
    };

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["name"], "Ship release");
    assert_eq!(json["deadline"], "2031-05-01T09:30:00Z");
    assert_eq!(json["is_completed"], false);
    assert_eq!(json["task_type"], task_type_id.to_string());
    assert_eq!(json["assignees"][0], assignee_id.to_string());

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn overdue_requires_past_deadline_and_open_task() {
    let now = Utc::now();
    let mut task = Task {
        uuid: Uuid::new_v4(),
        name: "Review queue".to_string(),
        deadline: now - Duration::hours(1),
        is_completed: false,
        task_type: Uuid::new_v4(),
        assignees: Vec::new(),
    };
    assert!(task.is_overdue(now));

    task.is_completed = true;
    assert!(!task.is_overdue(now));

    task.is_completed = false;
    task.deadline = now + Duration::hours(1);
    assert!(!task.is_overdue(now));
}

#[test]
fn project_status_round_trips_through_canonical_strings() {
    for status in ProjectStatus::ALL {
        assert_eq!(ProjectStatus::parse(status.as_str()), Some(status));
        assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
    }

    assert_eq!(ProjectStatus::parse("archived"), None);
    assert_eq!(ProjectStatus::parse("Completed"), None);
}

#[test]
fn project_wire_shape_and_completion_helper() {
    let project_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let team_id = Uuid::parse_str("aaaaaaaa-bbbb-4ccc-8ddd-eeeeeeeeeeee").unwrap();
    let project = Project {
        uuid: project_id,
        name: "Hive portal".to_string(),
        status: ProjectStatus::InProgress,
        teams: vec![team_id],
    };
    assert!(!project.is_completed());

    let json = serde_json::to_value(&project).unwrap();
    assert_eq!(json["status"], "in_progress");
    assert_eq!(json["teams"][0], team_id.to_string());

    let decoded: Project = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, project);
    assert!(Project {
        status: ProjectStatus::Completed,
        ..decoded
    }
    .is_completed());
}
