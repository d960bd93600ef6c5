use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Blocked,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not-started" => Some(Self::NotStarted),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub progress: u8,
    pub due_date: Option<NaiveDate>,
    pub status: GoalStatus,
    #[serde(default)]
    pub category: String,
    pub priority: Priority,
    pub estimated_time: Option<f64>,
    #[serde(default)]
    pub is_team_goal: bool,
}

impl Goal {
    /// Applies a progress change the way the goal screens do: the value is
    /// clamped to 0..=100 and the status follows it, except that a blocked
    /// goal stays blocked until it reaches 100.
    pub fn with_progress(mut self, progress: i32) -> Self {
        let progress = progress.clamp(0, 100) as u8;
        self.progress = progress;
        self.status = match (progress, self.status) {
            (100, _) => GoalStatus::Completed,
            (_, GoalStatus::Blocked) => GoalStatus::Blocked,
            (0, _) => GoalStatus::NotStarted,
            _ => GoalStatus::InProgress,
        };
        self
    }

    pub fn is_completed(&self) -> bool {
        self.progress >= 100 || self.status == GoalStatus::Completed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub progress: u8,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    pub estimated_time: Option<f64>,
    #[serde(default)]
    pub is_team_goal: bool,
}

impl NewGoal {
    pub fn into_goal(self, id: String) -> Goal {
        Goal {
            id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            progress: self.progress,
            due_date: self.due_date,
            status: self.status,
            category: self.category,
            priority: self.priority,
            estimated_time: self.estimated_time,
            is_team_goal: self.is_team_goal,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Scheduled,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Scheduled => "scheduled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub employee_id: String,
    pub reviewer_id: Option<String>,
    pub period: String,
    pub status: ReviewStatus,
    pub due_date: Option<NaiveDate>,
    pub overall_rating: Option<f64>,
    pub self_assessment: Option<serde_json::Value>,
    pub manager_assessment: Option<serde_json::Value>,
    pub strengths: Option<String>,
    pub areas_for_improvement: Option<String>,
    pub goals_next_period: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub employee_id: String,
    pub reviewer_id: Option<String>,
    pub period: String,
    #[serde(default)]
    pub status: ReviewStatus,
    pub due_date: Option<NaiveDate>,
    pub overall_rating: Option<f64>,
    pub self_assessment: Option<serde_json::Value>,
    pub manager_assessment: Option<serde_json::Value>,
    pub strengths: Option<String>,
    pub areas_for_improvement: Option<String>,
    pub goals_next_period: Option<String>,
}

impl NewReview {
    pub fn into_review(self, id: String) -> Review {
        Review {
            id,
            employee_id: self.employee_id,
            reviewer_id: self.reviewer_id,
            period: self.period,
            status: self.status,
            due_date: self.due_date,
            overall_rating: self.overall_rating,
            self_assessment: self.self_assessment,
            manager_assessment: self.manager_assessment,
            strengths: self.strengths,
            areas_for_improvement: self.areas_for_improvement,
            goals_next_period: self.goals_next_period,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Staff,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Staff => "Staff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub avatar_url: String,
    #[serde(default)]
    pub is_new_hire: bool,
    pub hire_date: Option<NaiveDate>,
    pub position_id: Option<String>,
    pub manager_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub department: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_new_hire: bool,
    pub hire_date: Option<NaiveDate>,
    pub position_id: Option<String>,
    pub manager_id: Option<String>,
}

impl NewUser {
    pub fn into_user(self, id: String) -> User {
        let avatar_url = self
            .avatar_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| placeholder_avatar(&self.name));
        User {
            id,
            name: self.name,
            email: self.email,
            role: self.role,
            department: self.department,
            avatar_url,
            is_new_hire: self.is_new_hire,
            hire_date: self.hire_date,
            position_id: self.position_id,
            manager_id: self.manager_id,
        }
    }
}

/// Deterministic avatar for users that never uploaded one.
pub fn placeholder_avatar(name: &str) -> String {
    let encoded = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("+");
    format!("https://ui-avatars.com/api/?name={}&background=random", encoded)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub manager_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDepartment {
    pub name: String,
    pub manager_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub title: String,
    pub department_id: Option<String>,
    pub level: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub title: String,
    pub department_id: Option<String>,
    pub level: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditCategory {
    Authentication,
    UserManagement,
    Goals,
    Reviews,
    Administration,
    System,
}

impl AuditCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::UserManagement => "user_management",
            Self::Goals => "goals",
            Self::Reviews => "reviews",
            Self::Administration => "administration",
            Self::System => "system",
        }
    }

    /// Unknown categories written by other clients read back as `System`.
    pub fn parse(value: &str) -> Self {
        match value {
            "authentication" => Self::Authentication,
            "user_management" => Self::UserManagement,
            "goals" => Self::Goals,
            "reviews" => Self::Reviews,
            "administration" => Self::Administration,
            _ => Self::System,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Failure,
}

impl AuditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub user_name: String,
    pub action: String,
    pub category: AuditCategory,
    pub details: String,
    pub status: AuditStatus,
    pub affected_entity: Option<String>,
    pub ip_address: Option<String>,
}

/// Who performed an audited action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn system() -> Self {
        Self {
            id: "system".to_string(),
            name: "System".to_string(),
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDraft {
    pub actor: Actor,
    pub action: String,
    pub category: AuditCategory,
    pub details: String,
    pub status: AuditStatus,
    pub affected_entity: Option<String>,
    pub ip_address: Option<String>,
}

impl AuditDraft {
    pub fn new(actor: Actor, action: &str, category: AuditCategory, details: impl Into<String>) -> Self {
        Self {
            actor,
            action: action.to_string(),
            category,
            details: details.into(),
            status: AuditStatus::Success,
            affected_entity: None,
            ip_address: None,
        }
    }

    pub fn failed(mut self) -> Self {
        self.status = AuditStatus::Failure;
        self
    }

    pub fn affecting(mut self, entity: impl Into<String>) -> Self {
        self.affected_entity = Some(entity.into());
        self
    }

    pub fn from_ip(mut self, ip_address: Option<&str>) -> Self {
        self.ip_address = ip_address.map(ToString::to_string);
        self
    }

    pub fn into_entry(self, id: String, timestamp: DateTime<Utc>) -> AuditLogEntry {
        AuditLogEntry {
            id,
            timestamp,
            user_id: self.actor.id,
            user_name: self.actor.name,
            action: self.action,
            category: self.category,
            details: self.details,
            status: self.status,
            affected_entity: self.affected_entity,
            ip_address: self.ip_address,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub user_id: Option<String>,
    pub category: Option<AuditCategory>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub enabled: bool,
    pub lead_days: u32,
    pub goal_reminders: bool,
    pub review_reminders: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            lead_days: 3,
            goal_reminders: true,
            review_reminders: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReminderKind {
    Goal,
    Review,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub kind: ReminderKind,
    pub item_id: String,
    pub user_id: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub days_until_due: i64,
}

impl Reminder {
    /// Key used in the notified-items set; one reminder per item and due date.
    pub fn dedupe_key(&self) -> String {
        let kind = match self.kind {
            ReminderKind::Goal => "goal",
            ReminderKind::Review => "review",
        };
        format!("{}:{}:{}", kind, self.item_id, self.due_date)
    }
}
