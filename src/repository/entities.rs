use super::Entity;
use crate::fixtures;
use crate::models::{AuditLogEntry, Department, Goal, Position, Review, User};
use crate::remote::rows::{AuditRow, DepartmentRow, GoalRow, PositionRow, ProfileRow, ReviewRow};
use crate::store::StorageKey;
use chrono::SecondsFormat;

impl Entity for Goal {
    type Row = GoalRow;

    const NAME: &'static str = "goal";
    const STORAGE_KEY: StorageKey = StorageKey::Goals;
    const TABLE: &'static str = "goals";
    // Goals keep no creation timestamp locally; stored order is creation order.
    const ORDER: Option<&'static str> = Some("created_at.asc");
    const SIMULATED_LATENCY_MS: u64 = 300;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn column(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.clone()),
            "user_id" => Some(self.user_id.clone()),
            "status" => Some(self.status.as_str().to_string()),
            "category" => Some(self.category.clone()),
            _ => None,
        }
    }

    fn to_row(&self) -> GoalRow {
        GoalRow::from(self)
    }

    fn from_row(row: GoalRow) -> Self {
        Goal::from(row)
    }

    fn fixtures() -> Vec<Self> {
        fixtures::goals()
    }
}

impl Entity for Review {
    type Row = ReviewRow;

    const NAME: &'static str = "review";
    const STORAGE_KEY: StorageKey = StorageKey::Reviews;
    const TABLE: &'static str = "performance_reviews";
    const ORDER: Option<&'static str> = Some("due_date.asc");
    const SIMULATED_LATENCY_MS: u64 = 400;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn column(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.clone()),
            "employee_id" => Some(self.employee_id.clone()),
            "reviewer_id" => self.reviewer_id.clone(),
            "period" => Some(self.period.clone()),
            "due_date" => self.due_date.map(|date| date.format("%Y-%m-%d").to_string()),
            _ => None,
        }
    }

    fn to_row(&self) -> ReviewRow {
        ReviewRow::from(self)
    }

    fn from_row(row: ReviewRow) -> Self {
        Review::from(row)
    }

    fn fixtures() -> Vec<Self> {
        fixtures::reviews()
    }
}

impl Entity for User {
    type Row = ProfileRow;

    const NAME: &'static str = "user";
    const STORAGE_KEY: StorageKey = StorageKey::Users;
    const TABLE: &'static str = "profiles";
    const ORDER: Option<&'static str> = Some("full_name.asc");
    const SIMULATED_LATENCY_MS: u64 = 300;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn column(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.clone()),
            // Hosted auth lowercases addresses; match that locally.
            "email" => Some(self.email.to_ascii_lowercase()),
            "full_name" => Some(self.name.clone()),
            "department" => self.department.clone(),
            "manager_id" => self.manager_id.clone(),
            _ => None,
        }
    }

    fn to_row(&self) -> ProfileRow {
        ProfileRow::from(self)
    }

    fn from_row(row: ProfileRow) -> Self {
        User::from(row)
    }

    fn fixtures() -> Vec<Self> {
        fixtures::users()
    }
}

impl Entity for Department {
    type Row = DepartmentRow;

    const NAME: &'static str = "department";
    const STORAGE_KEY: StorageKey = StorageKey::Departments;
    const TABLE: &'static str = "departments";
    const ORDER: Option<&'static str> = Some("name.asc");
    const SIMULATED_LATENCY_MS: u64 = 200;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn column(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.clone()),
            "name" => Some(self.name.clone()),
            "manager_id" => self.manager_id.clone(),
            _ => None,
        }
    }

    fn to_row(&self) -> DepartmentRow {
        DepartmentRow::from(self)
    }

    fn from_row(row: DepartmentRow) -> Self {
        Department::from(row)
    }

    fn fixtures() -> Vec<Self> {
        fixtures::departments()
    }
}

impl Entity for Position {
    type Row = PositionRow;

    const NAME: &'static str = "position";
    const STORAGE_KEY: StorageKey = StorageKey::Positions;
    const TABLE: &'static str = "positions";
    const ORDER: Option<&'static str> = Some("title.asc");
    const SIMULATED_LATENCY_MS: u64 = 200;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn column(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.clone()),
            "title" => Some(self.title.clone()),
            "department_id" => self.department_id.clone(),
            _ => None,
        }
    }

    fn to_row(&self) -> PositionRow {
        PositionRow::from(self)
    }

    fn from_row(row: PositionRow) -> Self {
        Position::from(row)
    }

    fn fixtures() -> Vec<Self> {
        fixtures::positions()
    }
}

impl Entity for AuditLogEntry {
    type Row = AuditRow;

    const NAME: &'static str = "log";
    const STORAGE_KEY: StorageKey = StorageKey::AuditLogs;
    const TABLE: &'static str = "audit_logs";
    const SELECT: &'static str = "*,profiles(full_name)";
    const ORDER: Option<&'static str> = Some("created_at.desc");
    const NEWEST_FIRST: bool = true;
    const SIMULATED_LATENCY_MS: u64 = 200;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn column(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.clone()),
            "user_id" => Some(self.user_id.clone()),
            "category" => Some(self.category.as_str().to_string()),
            "status" => Some(self.status.as_str().to_string()),
            "created_at" => Some(self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
            _ => None,
        }
    }

    fn to_row(&self) -> AuditRow {
        AuditRow::from(self)
    }

    fn from_row(row: AuditRow) -> Self {
        AuditLogEntry::from(row)
    }

    fn fixtures() -> Vec<Self> {
        fixtures::audit_logs()
    }
}
