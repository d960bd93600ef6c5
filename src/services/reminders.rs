use crate::errors::AppResult;
use crate::events::{EventBus, REMINDER_DUE};
use crate::models::{NotificationSettings, Reminder, ReminderKind, ReviewStatus};
use crate::redaction::Redactor;
use crate::services::goals::GoalService;
use crate::services::reviews::ReviewService;
use crate::store::{SnapshotStore, StorageKey};
use chrono::{NaiveDate, Utc};
use std::collections::BTreeSet;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Shortest interval accepted by [`ReminderService::spawn`].
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Due-date reminders for open goals and reviews. Settings and the set of
/// already-notified items are device-local in both persistence modes.
#[derive(Clone)]
pub struct ReminderService {
    store: SnapshotStore,
    goals: GoalService,
    reviews: ReviewService,
    events: EventBus,
    redactor: Redactor,
}

impl ReminderService {
    pub fn new(store: SnapshotStore, goals: GoalService, reviews: ReviewService, events: EventBus) -> Self {
        Self {
            store,
            goals,
            reviews,
            events,
            redactor: Redactor::new(),
        }
    }

    /// Scrubs sweep failures with `redactor` before they are logged.
    pub fn with_redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = redactor;
        self
    }

    pub fn settings(&self) -> AppResult<NotificationSettings> {
        Ok(self
            .store
            .read_value::<NotificationSettings>(StorageKey::NotificationSettings)?
            .unwrap_or_default())
    }

    pub fn save_settings(&self, settings: NotificationSettings) -> AppResult<NotificationSettings> {
        self.store.write_value(StorageKey::NotificationSettings, &settings)?;
        Ok(settings)
    }

    /// Collects items due within the configured lead time that were not
    /// reminded about before, records them, and publishes one event each.
    pub async fn sweep(&self, today: NaiveDate) -> AppResult<Vec<Reminder>> {
        let settings = self.settings()?;
        if !settings.enabled {
            return Ok(Vec::new());
        }
        let lead_days = i64::from(settings.lead_days);
        let in_window = |due: NaiveDate| {
            let days = (due - today).num_days();
            (0..=lead_days).contains(&days).then_some(days)
        };

        let mut candidates = Vec::new();
        if settings.goal_reminders {
            for goal in self.goals.list_all().await? {
                if goal.is_completed() {
                    continue;
                }
                let Some(due_date) = goal.due_date else { continue };
                if let Some(days_until_due) = in_window(due_date) {
                    candidates.push(Reminder {
                        kind: ReminderKind::Goal,
                        item_id: goal.id,
                        user_id: goal.user_id,
                        title: goal.title,
                        due_date,
                        days_until_due,
                    });
                }
            }
        }
        if settings.review_reminders {
            for review in self.reviews.list_all().await? {
                if review.status == ReviewStatus::Completed {
                    continue;
                }
                let Some(due_date) = review.due_date else { continue };
                if let Some(days_until_due) = in_window(due_date) {
                    candidates.push(Reminder {
                        kind: ReminderKind::Review,
                        item_id: review.id,
                        user_id: review.employee_id,
                        title: format!("{} review", review.period),
                        due_date,
                        days_until_due,
                    });
                }
            }
        }

        // Claiming items and saving the set happen in one store write, so two
        // overlapping sweeps never both report the same item.
        let fresh = self
            .store
            .update_value(StorageKey::NotifiedItems, |notified: &mut BTreeSet<String>| {
                let fresh = candidates
                    .into_iter()
                    .filter(|reminder| notified.insert(reminder.dedupe_key()))
                    .collect::<Vec<_>>();
                (!fresh.is_empty()).then_some(fresh)
            })?
            .unwrap_or_default();

        if !fresh.is_empty() {
            for reminder in &fresh {
                self.events.publish_json(REMINDER_DUE, reminder);
            }
            tracing::info!(count = fresh.len(), "due-date reminders issued");
        }
        Ok(fresh)
    }

    /// Runs [`sweep`](Self::sweep) on a fixed interval until the runtime
    /// shuts down or the handle is aborted. Intervals shorter than
    /// [`MIN_SWEEP_INTERVAL`] are raised to it.
    pub fn spawn(&self, every: Duration) -> JoinHandle<()> {
        let service = self.clone();
        let every = every.max(MIN_SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                if let Err(error) = service.sweep(Utc::now().date_naive()).await {
                    let message = service.redactor.redact(&error.to_string()).content;
                    tracing::warn!(error = %message, "reminder sweep failed");
                }
            }
        })
    }
}
