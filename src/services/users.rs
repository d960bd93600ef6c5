use crate::errors::{AppError, AppResult};
use crate::events::{EventBus, USER_UPDATED};
use crate::models::{Actor, AuditCategory, AuditDraft, NewUser, User};
use crate::repository::{Query, Repository};
use crate::services::audit::AuditService;
use crate::store::Lookup;
use std::sync::Arc;

/// Profiles plus the session actions that must leave an audit trail.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn Repository<User>>,
    audit: AuditService,
    events: EventBus,
}

impl UserService {
    pub fn new(repo: Arc<dyn Repository<User>>, audit: AuditService, events: EventBus) -> Self {
        Self { repo, audit, events }
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repo.list(&Query::all()).await
    }

    pub async fn list_by_department(&self, department: &str) -> AppResult<Vec<User>> {
        self.repo.list(&Query::all().eq("department", department)).await
    }

    pub async fn direct_reports(&self, manager_id: &str) -> AppResult<Vec<User>> {
        self.repo.list(&Query::all().eq("manager_id", manager_id)).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<User>> {
        let mut found = self.repo.list(&Query::all().eq("id", id).limit(Some(1))).await?;
        Ok(if found.is_empty() { None } else { Some(found.remove(0)) })
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_ascii_lowercase();
        let mut found = self.repo.list(&Query::all().eq("email", email).limit(Some(1))).await?;
        Ok(if found.is_empty() { None } else { Some(found.remove(0)) })
    }

    pub async fn create(&self, payload: NewUser, actor: &Actor) -> AppResult<User> {
        let user = self.repo.insert(payload.into_user(String::new())).await?;
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "user created");
        self.audit
            .record(
                AuditDraft::new(
                    actor.clone(),
                    "user.create",
                    AuditCategory::UserManagement,
                    format!("Created account for {}", user.name),
                )
                .affecting(user.id.clone()),
            )
            .await;
        Ok(user)
    }

    pub async fn update_profile(&self, user: User, actor: &Actor, ip_address: Option<&str>) -> AppResult<User> {
        let id = user.id.clone();
        let user = match self.repo.update(user).await? {
            Lookup::Found(user) => user,
            Lookup::NotFound => return Err(AppError::NotFound(format!("user {}", id))),
        };
        tracing::info!(user_id = %user.id, "profile updated");

        self.audit
            .record(
                AuditDraft::new(
                    actor.clone(),
                    "profile.update",
                    AuditCategory::UserManagement,
                    format!("Updated profile of {}", user.name),
                )
                .affecting(user.id.clone())
                .from_ip(ip_address),
            )
            .await;
        self.events.publish_json(USER_UPDATED, &user);
        Ok(user)
    }

    /// Resolves the account for `email`. Unknown addresses are audited as a
    /// failed login and reported as `NotFound`.
    pub async fn login(&self, email: &str, ip_address: Option<&str>) -> AppResult<User> {
        let Some(user) = self.find_by_email(email).await? else {
            let anonymous = Actor {
                id: "anonymous".to_string(),
                name: email.trim().to_string(),
            };
            self.audit
                .record(
                    AuditDraft::new(anonymous, "user.login", AuditCategory::Authentication, "Unknown account")
                        .failed()
                        .from_ip(ip_address),
                )
                .await;
            return Err(AppError::NotFound(format!("no account for {}", email.trim())));
        };

        self.audit
            .record(
                AuditDraft::new(Actor::from(&user), "user.login", AuditCategory::Authentication, "Signed in")
                    .from_ip(ip_address),
            )
            .await;
        tracing::info!(user_id = %user.id, "user signed in");
        Ok(user)
    }

    pub async fn logout(&self, user: &User, ip_address: Option<&str>) {
        self.audit
            .record(
                AuditDraft::new(Actor::from(user), "user.logout", AuditCategory::Authentication, "Signed out")
                    .from_ip(ip_address),
            )
            .await;
        tracing::info!(user_id = %user.id, "user signed out");
    }
}
