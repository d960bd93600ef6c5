//! Seed data served by local mode until the first write to a collection.

use crate::models::{
    placeholder_avatar, AuditCategory, AuditLogEntry, AuditStatus, Department, Goal, GoalStatus, Position,
    Priority, Review, ReviewStatus, Role, User,
};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use serde_json::json;

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or_default()
}

fn user(id: &str, name: &str, role: Role, department: &str, position_id: &str, manager_id: Option<&str>) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@zirtually.com", name.split_whitespace().next().unwrap_or(id).to_ascii_lowercase()),
        role,
        department: Some(department.to_string()),
        avatar_url: placeholder_avatar(name),
        is_new_hire: false,
        hire_date: date(2022, 3, 14),
        position_id: Some(position_id.to_string()),
        manager_id: manager_id.map(ToString::to_string),
    }
}

static USERS: Lazy<Vec<User>> = Lazy::new(|| {
    let mut new_hire = user("usr-004", "Jordan Lee", Role::Staff, "Engineering", "pos-003", Some("usr-002"));
    new_hire.is_new_hire = true;
    new_hire.hire_date = date(2025, 1, 6);

    vec![
        user("usr-001", "Morgan Reyes", Role::Admin, "People Operations", "pos-001", None),
        user("usr-002", "Priya Shah", Role::Manager, "Engineering", "pos-002", Some("usr-001")),
        user("usr-003", "Sam Okafor", Role::Staff, "Engineering", "pos-003", Some("usr-002")),
        new_hire,
        user("usr-005", "Elena Petrova", Role::Manager, "Sales", "pos-004", Some("usr-001")),
    ]
});

static DEPARTMENTS: Lazy<Vec<Department>> = Lazy::new(|| {
    vec![
        Department {
            id: "dep-001".to_string(),
            name: "People Operations".to_string(),
            manager_id: Some("usr-001".to_string()),
            description: Some("Hiring, onboarding and employee experience".to_string()),
        },
        Department {
            id: "dep-002".to_string(),
            name: "Engineering".to_string(),
            manager_id: Some("usr-002".to_string()),
            description: Some("Product and platform development".to_string()),
        },
        Department {
            id: "dep-003".to_string(),
            name: "Sales".to_string(),
            manager_id: Some("usr-005".to_string()),
            description: None,
        },
    ]
});

static POSITIONS: Lazy<Vec<Position>> = Lazy::new(|| {
    vec![
        Position {
            id: "pos-001".to_string(),
            title: "HR Director".to_string(),
            department_id: Some("dep-001".to_string()),
            level: Some("director".to_string()),
            salary_min: Some(120_000.0),
            salary_max: Some(160_000.0),
        },
        Position {
            id: "pos-002".to_string(),
            title: "Engineering Manager".to_string(),
            department_id: Some("dep-002".to_string()),
            level: Some("manager".to_string()),
            salary_min: Some(140_000.0),
            salary_max: Some(185_000.0),
        },
        Position {
            id: "pos-003".to_string(),
            title: "Software Engineer".to_string(),
            department_id: Some("dep-002".to_string()),
            level: Some("mid".to_string()),
            salary_min: Some(95_000.0),
            salary_max: Some(135_000.0),
        },
        Position {
            id: "pos-004".to_string(),
            title: "Sales Lead".to_string(),
            department_id: Some("dep-003".to_string()),
            level: Some("senior".to_string()),
            salary_min: Some(90_000.0),
            salary_max: Some(130_000.0),
        },
    ]
});

static GOALS: Lazy<Vec<Goal>> = Lazy::new(|| {
    vec![
        Goal {
            id: "goal-001".to_string(),
            user_id: "usr-003".to_string(),
            title: "Complete security awareness training".to_string(),
            description: "Finish the annual compliance module and quiz".to_string(),
            progress: 60,
            due_date: date(2025, 3, 31),
            status: GoalStatus::InProgress,
            category: "Compliance".to_string(),
            priority: Priority::High,
            estimated_time: Some(4.0),
            is_team_goal: false,
        },
        Goal {
            id: "goal-002".to_string(),
            user_id: "usr-004".to_string(),
            title: "Finish onboarding checklist".to_string(),
            description: "Accounts, equipment, first-week meetings".to_string(),
            progress: 20,
            due_date: date(2025, 1, 31),
            status: GoalStatus::InProgress,
            category: "Onboarding".to_string(),
            priority: Priority::High,
            estimated_time: Some(12.0),
            is_team_goal: false,
        },
        Goal {
            id: "goal-003".to_string(),
            user_id: "usr-002".to_string(),
            title: "Reduce deploy lead time".to_string(),
            description: "Team goal for the platform squad".to_string(),
            progress: 0,
            due_date: date(2025, 6, 30),
            status: GoalStatus::NotStarted,
            category: "Delivery".to_string(),
            priority: Priority::Medium,
            estimated_time: Some(80.0),
            is_team_goal: true,
        },
        Goal {
            id: "goal-004".to_string(),
            user_id: "usr-003".to_string(),
            title: "Mentor an intern".to_string(),
            description: String::new(),
            progress: 100,
            due_date: date(2024, 12, 15),
            status: GoalStatus::Completed,
            category: "Leadership".to_string(),
            priority: Priority::Low,
            estimated_time: None,
            is_team_goal: false,
        },
    ]
});

static REVIEWS: Lazy<Vec<Review>> = Lazy::new(|| {
    vec![
        Review {
            id: "rev-001".to_string(),
            employee_id: "usr-003".to_string(),
            reviewer_id: Some("usr-002".to_string()),
            period: "Q4 2024".to_string(),
            status: ReviewStatus::Completed,
            due_date: date(2025, 1, 15),
            overall_rating: Some(4.0),
            self_assessment: Some(json!({ "highlights": "Shipped the audit log export" })),
            manager_assessment: Some(json!({ "summary": "Consistently reliable" })),
            strengths: Some("Ownership, code quality".to_string()),
            areas_for_improvement: Some("Cross-team communication".to_string()),
            goals_next_period: Some("Lead one design review".to_string()),
        },
        Review {
            id: "rev-002".to_string(),
            employee_id: "usr-004".to_string(),
            reviewer_id: Some("usr-002".to_string()),
            period: "90-day check-in".to_string(),
            status: ReviewStatus::Scheduled,
            due_date: date(2025, 4, 6),
            overall_rating: None,
            self_assessment: None,
            manager_assessment: None,
            strengths: None,
            areas_for_improvement: None,
            goals_next_period: None,
        },
        Review {
            id: "rev-003".to_string(),
            employee_id: "usr-005".to_string(),
            reviewer_id: Some("usr-001".to_string()),
            period: "Q1 2025".to_string(),
            status: ReviewStatus::Pending,
            due_date: date(2025, 4, 15),
            overall_rating: None,
            self_assessment: None,
            manager_assessment: None,
            strengths: None,
            areas_for_improvement: None,
            goals_next_period: None,
        },
    ]
});

static AUDIT_LOGS: Lazy<Vec<AuditLogEntry>> = Lazy::new(|| {
    vec![
        AuditLogEntry {
            id: "log-002".to_string(),
            timestamp: at(1_736_330_400),
            user_id: "usr-001".to_string(),
            user_name: "Morgan Reyes".to_string(),
            action: "user.create".to_string(),
            category: AuditCategory::UserManagement,
            details: "Created account for Jordan Lee".to_string(),
            status: AuditStatus::Success,
            affected_entity: Some("usr-004".to_string()),
            ip_address: Some("10.0.0.12".to_string()),
        },
        AuditLogEntry {
            id: "log-001".to_string(),
            timestamp: at(1_736_326_800),
            user_id: "usr-001".to_string(),
            user_name: "Morgan Reyes".to_string(),
            action: "user.login".to_string(),
            category: AuditCategory::Authentication,
            details: "Signed in".to_string(),
            status: AuditStatus::Success,
            affected_entity: None,
            ip_address: Some("10.0.0.12".to_string()),
        },
    ]
});

pub fn users() -> Vec<User> {
    USERS.clone()
}

pub fn departments() -> Vec<Department> {
    DEPARTMENTS.clone()
}

pub fn positions() -> Vec<Position> {
    POSITIONS.clone()
}

pub fn goals() -> Vec<Goal> {
    GOALS.clone()
}

pub fn reviews() -> Vec<Review> {
    REVIEWS.clone()
}

pub fn audit_logs() -> Vec<AuditLogEntry> {
    AUDIT_LOGS.clone()
}
