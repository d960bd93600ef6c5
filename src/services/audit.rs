use crate::errors::AppResult;
use crate::models::{AuditDraft, AuditLogEntry, AuditQuery};
use crate::redaction::Redactor;
use crate::repository::{Query, Repository};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Append-only audit trail. Recording never fails the caller: when the
/// backend rejects the write the locally built entry is returned instead.
#[derive(Clone)]
pub struct AuditService {
    repo: Arc<dyn Repository<AuditLogEntry>>,
    redactor: Redactor,
}

impl AuditService {
    pub fn new(repo: Arc<dyn Repository<AuditLogEntry>>) -> Self {
        Self {
            repo,
            redactor: Redactor::new(),
        }
    }

    /// Scrubs rejected writes with `redactor` before they are logged.
    pub fn with_redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = redactor;
        self
    }

    pub async fn record(&self, draft: AuditDraft) -> AuditLogEntry {
        let entry = draft.into_entry(Uuid::new_v4().to_string(), Utc::now());
        match self.repo.insert(entry.clone()).await {
            Ok(mut stored) => {
                // Inserts do not echo the embedded profile name.
                stored.user_name = entry.user_name;
                tracing::info!(
                    action = %stored.action,
                    user_id = %stored.user_id,
                    status = stored.status.as_str(),
                    "audit entry recorded"
                );
                stored
            }
            Err(error) => {
                tracing::error!(
                    action = %entry.action,
                    user_id = %entry.user_id,
                    error = %self.redactor.redact(&error.to_string()).content,
                    "failed to persist audit entry"
                );
                entry
            }
        }
    }

    /// Most recent first.
    pub async fn list(&self, query: &AuditQuery) -> AppResult<Vec<AuditLogEntry>> {
        let mut filter = Query::all().limit(query.limit);
        if let Some(user_id) = &query.user_id {
            filter = filter.eq("user_id", user_id.clone());
        }
        if let Some(category) = query.category {
            filter = filter.eq("category", category.as_str());
        }
        self.repo.list(&filter).await
    }
}
