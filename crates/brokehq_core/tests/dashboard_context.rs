use brokehq_core::db::open_db_in_memory;
use brokehq_core::{
    Company, CompanyId, ContextService, Page, Priority, Project, ProjectRepository, RequestState,
    SqliteProjectRepository, SqliteTaskRepository, SqliteTermRepository, SqliteUserRepository,
    StatusTerm, Task, TaskRepository, TermRepository, User, UserRepository, Visibility,
};
use chrono::NaiveDate;
use rusqlite::Connection;

type SqliteContextService<'conn> = ContextService<
    SqliteProjectRepository<'conn>,
    SqliteTaskRepository<'conn>,
    SqliteUserRepository<'conn>,
    SqliteTermRepository<'conn>,
>;

fn context_service(conn: &Connection) -> SqliteContextService<'_> {
    ContextService::new(
        SqliteProjectRepository::new(conn),
        SqliteTaskRepository::new(conn),
        SqliteUserRepository::new(conn),
        SqliteTermRepository::new(conn),
    )
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn seed_company(conn: &Connection, name: &str) -> Company {
    let company = Company::new(name);
    SqliteUserRepository::new(conn)
        .create_company(&company)
        .unwrap();
    company
}

fn seed_user(conn: &Connection, name: &str, company: Option<CompanyId>, job: &str) -> User {
    let mut user = User::new(name);
    user.company = company;
    user.job_title = job.to_string();
    SqliteUserRepository::new(conn).create_user(&user).unwrap();
    user
}

#[test]
fn guest_dashboard_sees_only_public_projects() {
    let conn = open_db_in_memory().unwrap();
    let projects = SqliteProjectRepository::new(&conn);

    let mut public = Project::new("open roadmap");
    public.visibility = Some(Visibility::Public);
    projects.create_project(&public).unwrap();

    let mut hidden = Project::new("secret launch");
    hidden.visibility = Some(Visibility::Assigned);
    projects.create_project(&hidden).unwrap();

    let request = RequestState {
        user: None,
        page: Page::Dashboard,
        today: date("2026-08-27"),
    };
    let context = context_service(&conn).build(&request).unwrap();

    assert_eq!(context.accessible_projects.len(), 1);
    assert_eq!(context.accessible_projects[0].title, "open roadmap");
    assert!(context.my_projects.is_empty());
    assert!(context.company_projects.is_empty());
    assert!(context.active_projects.is_empty());
    assert!(context.my_tasks.is_empty());
    assert!(context.overdue_tasks.is_empty());
    assert!(context.upcoming_tasks.is_empty());
    assert!(!context.is_company_member);
    assert!(context.user_company.is_none());
    assert!(context.user_company_id.is_none());
    assert!(context.user_job_title.is_empty());
}

#[test]
fn member_dashboard_aggregates_all_collections() {
    let conn = open_db_in_memory().unwrap();
    let acme = seed_company(&conn, "Acme");
    let me = seed_user(&conn, "me", Some(acme.id), "Engineer");
    let boss = seed_user(&conn, "boss", None, "Director");

    SqliteTermRepository::new(&conn)
        .create_term(&StatusTerm::new("in-progress", "In Progress"))
        .unwrap();

    let projects = SqliteProjectRepository::new(&conn);

    let mut alpha = Project::new("alpha");
    alpha.visibility = Some(Visibility::Assigned);
    alpha.project_manager = Some(me.id);
    projects.create_project(&alpha).unwrap();

    let mut beta = Project::new("beta");
    beta.visibility = Some(Visibility::Company);
    beta.company = Some(acme.id);
    beta.project_manager = Some(boss.id);
    beta.status = Some("in-progress".to_string());
    projects.create_project(&beta).unwrap();

    let mut gamma = Project::new("gamma");
    gamma.visibility = Some(Visibility::Public);
    gamma.project_manager = Some(boss.id);
    projects.create_project(&gamma).unwrap();

    let mut delta = Project::new("delta");
    delta.visibility = Some(Visibility::Assigned);
    delta.project_manager = Some(boss.id);
    projects.create_project(&delta).unwrap();

    let tasks = SqliteTaskRepository::new(&conn);
    let seed_task = |title: &str, priority: Priority, due: Option<NaiveDate>| {
        let mut task = Task::new(title, priority);
        task.assigned_to = Some(me.id);
        task.due_date = due;
        tasks.create_task(&task).unwrap();
    };
    seed_task("t1", Priority::Urgent, Some(date("2026-08-26")));
    seed_task("t2", Priority::High, Some(date("2026-08-27")));
    seed_task("t3", Priority::Medium, Some(date("2026-09-03")));
    seed_task("t4", Priority::Low, None);

    let request = RequestState {
        user: Some(me.clone()),
        page: Page::Dashboard,
        today: date("2026-08-27"),
    };
    let context = context_service(&conn).build(&request).unwrap();

    let titles = |list: &[Project]| -> Vec<String> {
        list.iter().map(|p| p.title.clone()).collect()
    };
    assert_eq!(titles(&context.my_projects), ["alpha"]);
    assert_eq!(titles(&context.company_projects), ["beta"]);
    assert_eq!(titles(&context.active_projects), ["beta"]);
    // delta stays hidden: assigned visibility, and we are neither manager
    // nor assignee there.
    assert_eq!(
        titles(&context.accessible_projects),
        ["alpha", "beta", "gamma"]
    );

    assert_eq!(context.user_company.as_ref().map(|c| c.name.as_str()), Some("Acme"));
    assert_eq!(context.user_company_id, Some(acme.id));
    assert!(context.is_company_member);
    assert_eq!(context.user_job_title, "Engineer");

    let task_titles: Vec<&str> = context.my_tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(task_titles, ["t1", "t2", "t3", "t4"]);

    let buckets = &context.my_tasks_by_priority;
    assert_eq!(buckets.urgent.len(), 1);
    assert_eq!(buckets.urgent[0].title, "t1");
    assert_eq!(buckets.high[0].title, "t2");
    assert_eq!(buckets.medium[0].title, "t3");
    assert_eq!(buckets.low[0].title, "t4");

    let overdue: Vec<&str> = context.overdue_tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(overdue, ["t1"]);
    let upcoming: Vec<&str> = context.upcoming_tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(upcoming, ["t2", "t3"]);

    assert_eq!(context.project_statuses.len(), 1);
    assert_eq!(context.task_statuses.len(), 1);
}

#[test]
fn non_dashboard_pages_gate_their_collections() {
    let conn = open_db_in_memory().unwrap();
    let acme = seed_company(&conn, "Acme");
    let me = seed_user(&conn, "me", Some(acme.id), "Engineer");

    SqliteTermRepository::new(&conn)
        .create_term(&StatusTerm::new("in-progress", "In Progress"))
        .unwrap();

    let projects = SqliteProjectRepository::new(&conn);
    let mut public = Project::new("open roadmap");
    public.visibility = Some(Visibility::Public);
    projects.create_project(&public).unwrap();

    let tasks = SqliteTaskRepository::new(&conn);
    let mut task = Task::new("t1", Priority::High);
    task.assigned_to = Some(me.id);
    tasks.create_task(&task).unwrap();

    let service = context_service(&conn);

    // Unrelated page: user profile data only.
    let other = service
        .build(&RequestState {
            user: Some(me.clone()),
            page: Page::Other,
            today: date("2026-08-27"),
        })
        .unwrap();
    assert!(other.is_company_member);
    assert_eq!(other.user_job_title, "Engineer");
    assert!(other.accessible_projects.is_empty());
    assert!(other.project_statuses.is_empty());
    assert!(other.my_tasks.is_empty());
    assert!(other.task_statuses.is_empty());

    // Project archive: projects load, tasks stay gated.
    let archive = service
        .build(&RequestState {
            user: Some(me.clone()),
            page: Page::ProjectArchive,
            today: date("2026-08-27"),
        })
        .unwrap();
    assert_eq!(archive.accessible_projects.len(), 1);
    assert_eq!(archive.project_statuses.len(), 1);
    assert!(archive.my_tasks.is_empty());
    assert!(archive.task_statuses.is_empty());

    // Task archive: tasks load, projects stay gated.
    let task_page = service
        .build(&RequestState {
            user: Some(me),
            page: Page::TaskArchive,
            today: date("2026-08-27"),
        })
        .unwrap();
    assert_eq!(task_page.my_tasks.len(), 1);
    assert_eq!(task_page.task_statuses.len(), 1);
    assert!(task_page.accessible_projects.is_empty());
    assert!(task_page.project_statuses.is_empty());
}

#[test]
fn context_serializes_with_renderer_facing_keys() {
    let conn = open_db_in_memory().unwrap();
    let request = RequestState {
        user: None,
        page: Page::Dashboard,
        today: date("2026-08-27"),
    };
    let context = context_service(&conn).build(&request).unwrap();

    let value = serde_json::to_value(&context).unwrap();
    let object = value.as_object().unwrap();
    for key in [
        "accessible_projects",
        "my_projects",
        "company_projects",
        "active_projects",
        "project_statuses",
        "my_tasks",
        "my_tasks_by_priority",
        "overdue_tasks",
        "upcoming_tasks",
        "task_statuses",
        "user_company",
        "user_company_id",
        "is_company_member",
        "user_job_title",
    ] {
        assert!(object.contains_key(key), "missing context key {key}");
    }
}
