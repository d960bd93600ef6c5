use crate::config::{AppConfig, PersistenceMode};
use crate::db::Database;
use crate::errors::AppResult;
use crate::events::EventBus;
use crate::redaction::Redactor;
use crate::repository::Backend;
use crate::services::reminders::MIN_SWEEP_INTERVAL;
use crate::services::{AdminService, AuditService, GoalService, ReminderService, ReviewService, UserService};
use crate::store::SnapshotStore;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Everything a UI shell needs, wired once: one database, one event bus,
/// one backend choice shared by every service.
pub struct AppCore {
    config: AppConfig,
    db: Arc<Database>,
    backend: Backend,
    events: EventBus,
    goals: GoalService,
    reviews: ReviewService,
    users: UserService,
    admin: AdminService,
    audit: AuditService,
    reminders: ReminderService,
    background: StdMutex<Vec<JoinHandle<()>>>,
}

impl AppCore {
    pub fn new(config: AppConfig) -> AppResult<Arc<Self>> {
        Self::with_events(config, EventBus::new())
    }

    pub fn with_events(config: AppConfig, events: EventBus) -> AppResult<Arc<Self>> {
        let db = Arc::new(Database::new(&config.database_path())?);
        let store = SnapshotStore::new(db.clone());
        let backend = Backend::select(&config, store.clone())?;

        let redactor = match &config.backend {
            Some(backend) => Redactor::new().with_secret(&backend.anon_key),
            None => Redactor::new(),
        };

        let audit = AuditService::new(backend.repository()).with_redactor(redactor.clone());
        let goals = GoalService::new(backend.repository(), events.clone());
        let reviews = ReviewService::new(backend.repository(), events.clone());
        let users = UserService::new(backend.repository(), audit.clone(), events.clone());
        let admin = AdminService::new(backend.repository(), backend.repository(), audit.clone());
        let reminders =
            ReminderService::new(store, goals.clone(), reviews.clone(), events.clone()).with_redactor(redactor);

        tracing::info!(
            mode = ?backend.mode(),
            database = %db.path().display(),
            "application core ready"
        );

        Ok(Arc::new(Self {
            config,
            db,
            backend,
            events,
            goals,
            reviews,
            users,
            admin,
            audit,
            reminders,
            background: StdMutex::new(Vec::new()),
        }))
    }

    pub fn persistence_mode(&self) -> PersistenceMode {
        self.backend.mode()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn goals(&self) -> &GoalService {
        &self.goals
    }

    pub fn reviews(&self) -> &ReviewService {
        &self.reviews
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn admin(&self) -> &AdminService {
        &self.admin
    }

    pub fn audit(&self) -> &AuditService {
        &self.audit
    }

    pub fn reminders(&self) -> &ReminderService {
        &self.reminders
    }

    /// Starts the periodic reminder sweep. Must be called inside a tokio
    /// runtime; calling it again is a no-op while tasks are running.
    pub fn start_background_tasks(&self) {
        let mut background = self.background.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        background.retain(|handle| !handle.is_finished());
        if !background.is_empty() || !self.config.reminders.enabled {
            return;
        }
        let every = Duration::from_secs(self.config.reminders.interval_seconds).max(MIN_SWEEP_INTERVAL);
        background.push(self.reminders.spawn(every));
        tracing::info!(interval_seconds = every.as_secs(), "reminder sweep scheduled");
    }

    pub fn stop_background_tasks(&self) {
        let mut background = self.background.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for handle in background.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for AppCore {
    fn drop(&mut self) {
        self.stop_background_tasks();
    }
}

#[cfg(test)]
mod tests {
    use super::AppCore;
    use crate::config::{AppConfig, BackendConfig, PersistenceMode};

    fn config(dir: &tempfile::TempDir) -> AppConfig {
        AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn placeholder_backend_falls_back_to_local() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = config(&dir);
        config.backend = Some(BackendConfig::new("https://your-project.supabase.co", "your-anon-key"));
        let core = AppCore::new(config).expect("core");
        assert_eq!(core.persistence_mode(), PersistenceMode::Local);
        assert!(core.database().path().starts_with(dir.path()));
    }

    #[tokio::test]
    async fn configured_backend_selects_remote() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = config(&dir);
        config.backend = Some(BackendConfig::new("https://abc.supabase.co", "anon-live-key"));
        let core = AppCore::new(config).expect("core");
        assert_eq!(core.persistence_mode(), PersistenceMode::Remote);
    }

    #[tokio::test]
    async fn background_tasks_start_once_and_stop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let core = AppCore::new(config(&dir)).expect("core");
        core.start_background_tasks();
        core.start_background_tasks();
        assert_eq!(core.background.lock().expect("background").len(), 1);
        core.stop_background_tasks();
        assert!(core.background.lock().expect("background").is_empty());
    }
}
