//! Wire rows for the hosted tables and their mapping to application models.
//!
//! Mappings are total. Two of them narrow: review statuses (the table only
//! knows draft/submitted/completed) and roles (executive folds into Admin).

use crate::models::{
    placeholder_avatar, AuditCategory, AuditLogEntry, AuditStatus, Department, Goal, GoalStatus, Position,
    Priority, Review, ReviewStatus, Role, User,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Application review status as stored remotely. Pending and scheduled both
/// become `draft`; reading back never yields `Scheduled`.
pub fn narrow_review_status(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Pending | ReviewStatus::Scheduled => "draft",
        ReviewStatus::InProgress => "submitted",
        ReviewStatus::Completed => "completed",
    }
}

pub fn widen_review_status(status: &str) -> ReviewStatus {
    match status {
        "submitted" => ReviewStatus::InProgress,
        "completed" => ReviewStatus::Completed,
        _ => ReviewStatus::Pending,
    }
}

pub fn role_from_remote(role: Option<&str>) -> Role {
    match role.map(str::to_ascii_lowercase).as_deref() {
        Some("admin") | Some("executive") => Role::Admin,
        Some("manager") => Role::Manager,
        _ => Role::Staff,
    }
}

pub fn role_to_remote(role: Role) -> &'static str {
    match role {
        Role::Admin => "admin",
        Role::Manager => "manager",
        Role::Staff => "employee",
    }
}

fn priority_from_remote(priority: Option<&str>) -> Priority {
    match priority.map(str::to_ascii_lowercase).as_deref() {
        Some("high") => Priority::High,
        Some("low") => Priority::Low,
        _ => Priority::Medium,
    }
}

fn priority_to_remote(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<f64>,
    #[serde(default)]
    pub is_team_goal: Option<bool>,
}

impl From<&Goal> for GoalRow {
    fn from(goal: &Goal) -> Self {
        Self {
            id: Some(goal.id.clone()),
            user_id: goal.user_id.clone(),
            title: goal.title.clone(),
            description: Some(goal.description.clone()),
            status: goal.status.as_str().to_string(),
            progress: i32::from(goal.progress),
            due_date: goal.due_date,
            priority: Some(priority_to_remote(goal.priority).to_string()),
            category: Some(goal.category.clone()),
            estimated_time: goal.estimated_time,
            is_team_goal: Some(goal.is_team_goal),
        }
    }
}

impl From<GoalRow> for Goal {
    fn from(row: GoalRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            user_id: row.user_id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            progress: row.progress.clamp(0, 100) as u8,
            due_date: row.due_date,
            status: GoalStatus::parse(&row.status).unwrap_or_default(),
            category: row.category.unwrap_or_default(),
            priority: priority_from_remote(row.priority.as_deref()),
            estimated_time: row.estimated_time,
            is_team_goal: row.is_team_goal.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub employee_id: String,
    #[serde(default)]
    pub reviewer_id: Option<String>,
    pub period: String,
    pub status: String,
    #[serde(default)]
    pub overall_rating: Option<f64>,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub areas_for_improvement: Option<String>,
    #[serde(default)]
    pub goals_next_period: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub self_assessment: Option<Value>,
    #[serde(default)]
    pub manager_assessment: Option<Value>,
}

impl From<&Review> for ReviewRow {
    fn from(review: &Review) -> Self {
        Self {
            id: Some(review.id.clone()),
            employee_id: review.employee_id.clone(),
            reviewer_id: review.reviewer_id.clone(),
            period: review.period.clone(),
            status: narrow_review_status(review.status).to_string(),
            overall_rating: review.overall_rating,
            strengths: review.strengths.clone(),
            areas_for_improvement: review.areas_for_improvement.clone(),
            goals_next_period: review.goals_next_period.clone(),
            due_date: review.due_date,
            self_assessment: review.self_assessment.clone(),
            manager_assessment: review.manager_assessment.clone(),
        }
    }
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            employee_id: row.employee_id,
            reviewer_id: row.reviewer_id,
            period: row.period,
            status: widen_review_status(&row.status),
            due_date: row.due_date,
            overall_rating: row.overall_rating,
            self_assessment: row.self_assessment,
            manager_assessment: row.manager_assessment,
            strengths: row.strengths,
            areas_for_improvement: row.areas_for_improvement,
            goals_next_period: row.goals_next_period,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub position_id: Option<String>,
    #[serde(default)]
    pub manager_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<&User> for ProfileRow {
    fn from(user: &User) -> Self {
        Self {
            id: Some(user.id.clone()),
            email: user.email.clone(),
            full_name: Some(user.name.clone()),
            role: Some(role_to_remote(user.role).to_string()),
            department: user.department.clone(),
            avatar_url: Some(user.avatar_url.clone()),
            position_id: user.position_id.clone(),
            manager_id: user.manager_id.clone(),
            start_date: user.hire_date,
            status: Some(if user.is_new_hire { "onboarding" } else { "active" }.to_string()),
        }
    }
}

impl From<ProfileRow> for User {
    fn from(row: ProfileRow) -> Self {
        let name = row
            .full_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| row.email.clone());
        let avatar_url = row
            .avatar_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| placeholder_avatar(&name));
        Self {
            id: row.id.unwrap_or_default(),
            role: role_from_remote(row.role.as_deref()),
            is_new_hire: row.status.as_deref() == Some("onboarding"),
            name,
            email: row.email,
            department: row.department,
            avatar_url,
            hire_date: row.start_date,
            position_id: row.position_id,
            manager_id: row.manager_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub manager_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&Department> for DepartmentRow {
    fn from(department: &Department) -> Self {
        Self {
            id: Some(department.id.clone()),
            name: department.name.clone(),
            manager_id: department.manager_id.clone(),
            description: department.description.clone(),
        }
    }
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            name: row.name,
            manager_id: row.manager_id,
            description: row.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
}

impl From<&Position> for PositionRow {
    fn from(position: &Position) -> Self {
        Self {
            id: Some(position.id.clone()),
            title: position.title.clone(),
            department_id: position.department_id.clone(),
            level: position.level.clone(),
            salary_min: position.salary_min,
            salary_max: position.salary_max,
        }
    }
}

impl From<PositionRow> for Position {
    fn from(row: PositionRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            title: row.title,
            department_id: row.department_id,
            level: row.level,
            salary_min: row.salary_min,
            salary_max: row.salary_max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileName {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub action: String,
    pub category: String,
    #[serde(default)]
    pub details: Option<String>,
    pub status: String,
    #[serde(default)]
    pub affected_entity: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub profiles: Option<ProfileName>,
}

impl From<&AuditLogEntry> for AuditRow {
    fn from(entry: &AuditLogEntry) -> Self {
        Self {
            id: Some(entry.id.clone()),
            user_id: entry.user_id.clone(),
            action: entry.action.clone(),
            category: entry.category.as_str().to_string(),
            details: Some(entry.details.clone()),
            status: entry.status.as_str().to_string(),
            affected_entity: entry.affected_entity.clone(),
            ip_address: entry.ip_address.clone(),
            created_at: Some(entry.timestamp),
            profiles: None,
        }
    }
}

impl From<AuditRow> for AuditLogEntry {
    fn from(row: AuditRow) -> Self {
        let user_name = row
            .profiles
            .and_then(|profile| profile.full_name)
            .unwrap_or_else(|| row.user_id.clone());
        Self {
            id: row.id.unwrap_or_default(),
            timestamp: row.created_at.unwrap_or_else(Utc::now),
            user_id: row.user_id,
            user_name,
            action: row.action,
            category: AuditCategory::parse(&row.category),
            details: row.details.unwrap_or_default(),
            status: if row.status == "failure" {
                AuditStatus::Failure
            } else {
                AuditStatus::Success
            },
            affected_entity: row.affected_entity,
            ip_address: row.ip_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn review_status_narrowing_is_lossy_for_scheduled() {
        assert_eq!(narrow_review_status(ReviewStatus::Pending), "draft");
        assert_eq!(narrow_review_status(ReviewStatus::Scheduled), "draft");
        assert_eq!(widen_review_status(narrow_review_status(ReviewStatus::Scheduled)), ReviewStatus::Pending);
        for status in [ReviewStatus::Pending, ReviewStatus::InProgress, ReviewStatus::Completed] {
            assert_eq!(widen_review_status(narrow_review_status(status)), status);
        }
    }

    #[test]
    fn executive_and_missing_roles_fold() {
        assert_eq!(role_from_remote(Some("executive")), Role::Admin);
        assert_eq!(role_from_remote(Some("MANAGER")), Role::Manager);
        assert_eq!(role_from_remote(None), Role::Staff);
        assert_eq!(role_to_remote(Role::Staff), "employee");
    }

    #[test]
    fn profile_without_avatar_gets_placeholder() {
        let row: ProfileRow = serde_json::from_value(json!({
            "id": "p1",
            "email": "sam@zirtually.com",
            "full_name": "Sam Okafor",
            "status": "onboarding"
        }))
        .expect("profile row");
        let user = User::from(row);
        assert_eq!(user.avatar_url, placeholder_avatar("Sam Okafor"));
        assert_eq!(user.role, Role::Staff);
        assert!(user.is_new_hire);
    }

    #[test]
    fn goal_row_uses_snake_case_and_lowercase_priority() {
        let goal = crate::fixtures::goals().remove(0);
        let value = serde_json::to_value(GoalRow::from(&goal)).expect("goal row");
        assert_eq!(value["user_id"], "usr-003");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["status"], "in-progress");
        assert_eq!(Goal::from(serde_json::from_value::<GoalRow>(value).expect("row")), goal);
    }

    #[test]
    fn audit_row_takes_name_from_embedded_profile() {
        let row: AuditRow = serde_json::from_value(json!({
            "id": "a1",
            "user_id": "usr-001",
            "action": "user.login",
            "category": "authentication",
            "status": "failure",
            "created_at": "2025-01-08T09:00:00Z",
            "profiles": { "full_name": "Morgan Reyes" }
        }))
        .expect("audit row");
        let entry = AuditLogEntry::from(row);
        assert_eq!(entry.user_name, "Morgan Reyes");
        assert_eq!(entry.status, AuditStatus::Failure);
        assert_eq!(entry.category, AuditCategory::Authentication);

        let outgoing = serde_json::to_value(AuditRow::from(&entry)).expect("serialize");
        assert!(outgoing.get("profiles").is_none());
    }
}
