use mockito::Matcher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use zirtually_lib::events::GOAL_COMPLETED;
use zirtually_lib::models::{
    Actor, AuditCategory, AuditDraft, AuditQuery, GoalStatus, NewGoal, NewReview, Priority, ReviewStatus,
};
use zirtually_lib::{AppConfig, AppCore, BackendConfig, PersistenceMode};

fn local_core(dir: &tempfile::TempDir) -> Arc<AppCore> {
    AppCore::new(AppConfig {
        data_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    })
    .expect("core")
}

fn master_x(user_id: &str) -> NewGoal {
    NewGoal {
        user_id: user_id.to_string(),
        title: "Master X".to_string(),
        priority: Priority::High,
        progress: 0,
        ..Default::default()
    }
}

#[tokio::test]
async fn listing_seeds_from_fixtures_without_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = local_core(&dir);

    let first = core.goals().list_all().await.expect("first list");
    let second = core.goals().list_all().await.expect("second list");
    assert!(!first.is_empty());
    assert_eq!(first, second);

    core.users().list().await.expect("users");
    core.audit().list(&AuditQuery::default()).await.expect("audit");
    assert!(core.database().keys().expect("keys").is_empty());
}

#[tokio::test]
async fn created_goal_is_listed_for_its_owner() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = local_core(&dir);

    let created = core.goals().create(master_x("u1")).await.expect("create");
    let goals = core.goals().list_for_user("u1").await.expect("list");
    assert!(goals
        .iter()
        .any(|goal| goal.id == created.id && goal.title == "Master X" && goal.priority == Priority::High && goal.progress == 0));
    assert!(core.database().keys().expect("keys").contains(&"zirtually_goals".to_string()));
}

#[tokio::test]
async fn progress_update_is_persisted_exactly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = local_core(&dir);

    let created = core.goals().create(master_x("u1")).await.expect("create");
    let mut finished = created.clone();
    finished.progress = 100;
    finished.status = GoalStatus::Completed;
    core.goals().update(finished).await.expect("update");

    let reread = core.goals().get(&created.id).await.expect("get").expect("goal");
    assert_eq!(reread.progress, 100);
    assert_eq!(reread.status, GoalStatus::Completed);
}

#[tokio::test]
async fn audit_log_reads_newest_first_and_never_rewrites() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = local_core(&dir);
    let before = core.audit().list(&AuditQuery::default()).await.expect("before");

    let actor = Actor {
        id: "usr-001".to_string(),
        name: "Morgan Reyes".to_string(),
    };
    let mut written = Vec::new();
    for action in ["A", "B", "C"] {
        written.push(
            core.audit()
                .record(AuditDraft::new(actor.clone(), action, AuditCategory::System, action))
                .await,
        );
    }

    let after = core.audit().list(&AuditQuery::default()).await.expect("after");
    let actions = after.iter().take(3).map(|entry| entry.action.as_str()).collect::<Vec<_>>();
    assert_eq!(actions, vec!["C", "B", "A"]);
    assert_eq!(&after[3..], &before[..]);
    for entry in &written {
        assert!(after.contains(entry));
    }
}

#[tokio::test]
async fn goal_completed_is_delivered_once_with_the_goal_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = local_core(&dir);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = core.events().subscribe(GOAL_COMPLETED, move |event| {
        sink.lock()
            .expect("sink")
            .push(event.payload["id"].as_str().unwrap_or_default().to_string());
    });

    let created = core.goals().create(master_x("u1")).await.expect("create");
    core.goals().update(created.clone().with_progress(100)).await.expect("update");

    assert_eq!(*seen.lock().expect("seen"), vec![created.id.clone()]);
    assert!(subscription.unsubscribe());
}

#[tokio::test]
async fn unsubscribed_handler_sees_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = local_core(&dir);
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let subscription = core.events().subscribe(GOAL_COMPLETED, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let created = core.goals().create(master_x("u1")).await.expect("create");
    subscription.unsubscribe();
    core.goals().update(created.with_progress(100)).await.expect("update");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unconfigured_backend_never_touches_the_network() {
    let mut server = mockito::Server::new_async().await;
    let mut untouched = Vec::new();
    for method in ["GET", "POST", "PATCH", "DELETE"] {
        untouched.push(server.mock(method, Matcher::Any).expect(0).create_async().await);
    }

    let dir = tempfile::tempdir().expect("tempdir");
    let core = AppCore::new(AppConfig {
        data_dir: dir.path().to_path_buf(),
        backend: Some(BackendConfig::new(server.url(), "your-anon-key")),
        ..AppConfig::default()
    })
    .expect("core");
    assert_eq!(core.persistence_mode(), PersistenceMode::Local);

    let goal = core.goals().create(master_x("u1")).await.expect("goal");
    core.goals().update(goal.with_progress(50)).await.expect("update");
    core.reviews().list_all().await.expect("reviews");
    let user = core.users().login("priya@zirtually.com", None).await.expect("login");
    core.users().logout(&user, None).await;
    core.admin().list_departments().await.expect("departments");
    core.audit().list(&AuditQuery::default()).await.expect("audit");

    for mock in untouched {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn review_lifecycle_keeps_its_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = local_core(&dir);

    core.reviews()
        .create(NewReview {
            employee_id: "u2".to_string(),
            period: "Q3 2024".to_string(),
            status: ReviewStatus::Pending,
            ..Default::default()
        })
        .await
        .expect("create");

    let listed = core.reviews().list_for_employee("u2").await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, ReviewStatus::Pending);
    let original_id = listed[0].id.clone();

    let mut completed = listed[0].clone();
    completed.status = ReviewStatus::Completed;
    completed.overall_rating = Some(4.0);
    core.reviews().update(completed).await.expect("update");

    let listed = core.reviews().list_for_employee("u2").await.expect("list again");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, ReviewStatus::Completed);
    assert_eq!(listed[0].overall_rating, Some(4.0));
    assert_eq!(listed[0].id, original_id);
}

#[tokio::test]
async fn data_survives_reopening_the_core() {
    let dir = tempfile::tempdir().expect("tempdir");
    let created = {
        let core = local_core(&dir);
        core.goals().create(master_x("u5")).await.expect("create")
    };
    let reopened = local_core(&dir);
    let goals = reopened.goals().list_for_user("u5").await.expect("list");
    assert_eq!(goals, vec![created]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn parallel_writers_lose_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = local_core(&dir);
    let actor = Actor {
        id: "usr-002".to_string(),
        name: "Priya Shah".to_string(),
    };

    let writers = (0..64)
        .map(|n| {
            let core = core.clone();
            let actor = actor.clone();
            tokio::spawn(async move {
                let goal = core
                    .goals()
                    .create(NewGoal {
                        user_id: "u-parallel".to_string(),
                        title: format!("Parallel goal {}", n),
                        ..Default::default()
                    })
                    .await
                    .expect("create");
                let entry = core
                    .audit()
                    .record(AuditDraft::new(
                        actor,
                        "goal.create",
                        AuditCategory::Goals,
                        format!("Created {}", goal.id),
                    ))
                    .await;
                (goal.id, entry.id)
            })
        })
        .collect::<Vec<_>>();

    let mut written = Vec::new();
    for writer in writers {
        written.push(writer.await.expect("writer task"));
    }

    let goals = core.goals().list_for_user("u-parallel").await.expect("goals");
    let entries = core
        .audit()
        .list(&AuditQuery {
            user_id: Some("usr-002".to_string()),
            ..Default::default()
        })
        .await
        .expect("audit");
    assert_eq!(goals.len(), 64);
    for (goal_id, entry_id) in &written {
        assert!(goals.iter().any(|goal| &goal.id == goal_id), "goal {} lost", goal_id);
        assert!(entries.iter().any(|entry| &entry.id == entry_id), "audit entry {} lost", entry_id);
    }
}
