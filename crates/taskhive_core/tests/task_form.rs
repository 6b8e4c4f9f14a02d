use chrono::{Duration, TimeZone, Utc};
use rusqlite::Connection;
use taskhive_core::db::open_db_in_memory;
use taskhive_core::{
    CatalogRepository, FieldErrors, FormData, FormError, NewWorker, SqliteCatalogRepository,
    SqliteTaskRepository, SqliteWorkerRepository, TaskForm, TaskRepository, WorkerRepository,
};
use uuid::Uuid;

#[test]
fn valid_submission_binds_and_persists() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let workers = SqliteWorkerRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let bugfix = catalog.create_task_type("Bugfix").unwrap();
    let assignee = seed_worker(&conn, "ann");

    let now = Utc::now();
    let deadline = now + Duration::days(7);
    let data = FormData::new()
        .with("name", "  Fix hive sync  ")
        .with("deadline", deadline.to_rfc3339())
        .with("task_type", bugfix.to_string())
        .with("assignees", assignee.to_string());

    let payload = TaskForm::new(data)
        .validate(&catalog, &workers, now)
        .unwrap();
    assert_eq!(payload.name, "Fix hive sync");
    assert!(!payload.is_completed);
    assert_eq!(payload.task_type, bugfix);
    assert_eq!(payload.assignees, vec![assignee]);

    let id = tasks.create_task(&payload).unwrap();
    let loaded = tasks.get_task(id).unwrap().unwrap();
    assert_eq!(loaded.name, "Fix hive sync");
    assert_eq!(
        loaded.deadline.timestamp_millis(),
        payload.deadline.timestamp_millis()
    );
}

#[test]
fn blank_submission_reports_every_required_field() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let workers = SqliteWorkerRepository::try_new(&conn).unwrap();

    let form = TaskForm::new(FormData::new());
    let errors = unwrap_invalid(form.validate(&catalog, &workers, Utc::now()));

    for field in ["name", "deadline", "task_type", "assignees"] {
        assert_eq!(
            errors.messages(field),
            ["This field is required."],
            "field {field}"
        );
    }
    assert!(errors.messages("is_completed").is_empty());
}

#[test]
fn completed_flag_rejected_at_creation_and_allowed_on_edit() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let workers = SqliteWorkerRepository::try_new(&conn).unwrap();

    let bugfix = catalog.create_task_type("Bugfix").unwrap();
    let assignee = seed_worker(&conn, "ann");

    let now = Utc::now();
    let data = FormData::new()
        .with("name", "Close out release")
        .with("deadline", (now + Duration::days(1)).to_rfc3339())
        .with("is_completed", "true")
        .with("task_type", bugfix.to_string())
        .with("assignees", assignee.to_string());

    let errors = unwrap_invalid(TaskForm::new(data.clone()).validate(&catalog, &workers, now));
    assert_eq!(
        errors.messages("is_completed"),
        ["Status can't be set as 'completed' during task creation."]
    );

    let payload = TaskForm::for_instance(Uuid::new_v4(), data)
        .validate(&catalog, &workers, now)
        .unwrap();
    assert!(payload.is_completed);
}

#[test]
fn past_deadline_rejected_with_stable_message() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let workers = SqliteWorkerRepository::try_new(&conn).unwrap();

    let bugfix = catalog.create_task_type("Bugfix").unwrap();
    let assignee = seed_worker(&conn, "ann");

    let now = Utc::now();
    let data = FormData::new()
        .with("name", "Late already")
        .with("deadline", (now - Duration::hours(1)).to_rfc3339())
        .with("task_type", bugfix.to_string())
        .with("assignees", assignee.to_string());

    let errors = unwrap_invalid(TaskForm::new(data.clone()).validate(&catalog, &workers, now));
    assert_eq!(
        errors.messages("deadline"),
        ["Deadline can't be earlier than current date"]
    );

    // The deadline rule applies on edit as well.
    let errors = unwrap_invalid(
        TaskForm::for_instance(Uuid::new_v4(), data).validate(&catalog, &workers, now),
    );
    assert_eq!(
        errors.messages("deadline"),
        ["Deadline can't be earlier than current date"]
    );
}

#[test]
fn datetime_local_submission_format_binds() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let workers = SqliteWorkerRepository::try_new(&conn).unwrap();

    let bugfix = catalog.create_task_type("Bugfix").unwrap();
    let assignee = seed_worker(&conn, "ann");

    let now = Utc.with_ymd_and_hms(2031, 4, 30, 12, 0, 0).unwrap();
    let data = FormData::new()
        .with("name", "Scheduled work")
        .with("deadline", "2031-05-01T09:30")
        .with("task_type", bugfix.to_string())
        .with("assignees", assignee.to_string());

    let payload = TaskForm::new(data)
        .validate(&catalog, &workers, now)
        .unwrap();
    assert_eq!(
        payload.deadline,
        Utc.with_ymd_and_hms(2031, 5, 1, 9, 30, 0).unwrap()
    );
}

#[test]
fn unknown_references_rejected_as_invalid_choices() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let workers = SqliteWorkerRepository::try_new(&conn).unwrap();

    let ghost_type = Uuid::new_v4();
    let ghost_worker = Uuid::new_v4();
    let data = FormData::new()
        .with("name", "Orphan references")
        .with("deadline", (Utc::now() + Duration::days(1)).to_rfc3339())
        .with("task_type", ghost_type.to_string())
        .with("assignees", ghost_worker.to_string());

    let errors = unwrap_invalid(TaskForm::new(data).validate(&catalog, &workers, Utc::now()));
    assert_eq!(
        errors.messages("task_type"),
        ["Select a valid choice. That choice is not one of the available choices."]
    );
    assert_eq!(
        errors.messages("assignees"),
        [format!(
            "Select a valid choice. {ghost_worker} is not one of the available choices."
        )]
    );
}

#[test]
fn malformed_values_collect_per_field_errors_together() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let workers = SqliteWorkerRepository::try_new(&conn).unwrap();

    let data = FormData::new()
        .with("name", "Broken submission")
        .with("deadline", "soon")
        .with("task_type", "not-a-uuid")
        .with("assignees", "also-not-a-uuid");

    let errors = unwrap_invalid(TaskForm::new(data).validate(&catalog, &workers, Utc::now()));
    assert_eq!(errors.messages("deadline"), ["Enter a valid date/time."]);
    assert_eq!(
        errors.messages("task_type"),
        ["Select a valid choice. That choice is not one of the available choices."]
    );
    assert_eq!(
        errors.messages("assignees"),
        ["\"also-not-a-uuid\" is not a valid value."]
    );
    assert!(errors.messages("name").is_empty());
}

fn unwrap_invalid<T: std::fmt::Debug>(result: Result<T, FormError>) -> FieldErrors {
    match result.unwrap_err() {
        FormError::Invalid(errors) => errors,
        FormError::Repo(err) => panic!("unexpected repository error: {err}"),
    }
}

fn seed_worker(conn: &Connection, username: &str) -> Uuid {
    let catalog = SqliteCatalogRepository::try_new(conn).unwrap();
    let position = catalog
        .create_position(&format!("{username} position"))
        .unwrap();
    let workers = SqliteWorkerRepository::try_new(conn).unwrap();
    workers
        .create_worker(&NewWorker {
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password: "hunter2hunter2".to_string(),
            position,
        })
        .unwrap()
}
