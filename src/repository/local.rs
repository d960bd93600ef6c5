use super::{Entity, Query, Repository};
use crate::errors::AppResult;
use crate::store::{Lookup, SnapshotStore};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::marker::PhantomData;
use tokio::time::Duration;

/// Repository over the local snapshot store. Every call optionally sleeps for
/// the entity's simulated round-trip before touching storage.
#[derive(Debug, Clone)]
pub struct LocalRepository<T> {
    store: SnapshotStore,
    latency: Duration,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> LocalRepository<T> {
    pub fn new(store: SnapshotStore, simulate_latency: bool) -> Self {
        let latency = if simulate_latency {
            Duration::from_millis(T::SIMULATED_LATENCY_MS)
        } else {
            Duration::ZERO
        };
        Self {
            store,
            latency,
            _entity: PhantomData,
        }
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Timestamp-based id with a random suffix so two records created in the
/// same millisecond do not collide.
pub(crate) fn local_id(prefix: &str) -> String {
    format!(
        "{}-{}-{:08x}",
        prefix,
        Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}

/// Orders `items` the way the hosted backend applies `T::ORDER`
/// (`column.asc|desc`, rows without a value last). Entities whose order
/// column is not kept locally stay in stored order.
fn sort_by_order<T: Entity>(items: &mut [T]) {
    let Some(order) = T::ORDER else { return };
    let (column, direction) = order.split_once('.').unwrap_or((order, "asc"));
    let descending = direction == "desc";
    items.sort_by(|left, right| match (left.column(column), right.column(column)) {
        (Some(left), Some(right)) if descending => right.cmp(&left),
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[async_trait]
impl<T: Entity> Repository<T> for LocalRepository<T> {
    async fn list(&self, query: &Query) -> AppResult<Vec<T>> {
        self.pause().await;
        let mut items = self
            .store
            .read_all::<T>()?
            .into_iter()
            .filter(|item| query.matches(item))
            .collect::<Vec<_>>();
        sort_by_order(&mut items);
        if let Some(limit) = query.limit {
            items.truncate(limit);
        }
        Ok(items)
    }

    async fn insert(&self, mut entity: T) -> AppResult<T> {
        self.pause().await;
        entity.set_id(local_id(T::NAME));
        let stored = self.store.append(entity)?;
        tracing::debug!(entity = T::NAME, id = %stored.id(), "stored locally");
        Ok(stored)
    }

    async fn update(&self, entity: T) -> AppResult<Lookup<T>> {
        self.pause().await;
        self.store.replace(entity)
    }

    async fn delete(&self, id: &str) -> AppResult<Lookup<()>> {
        self.pause().await;
        Ok(match self.store.remove::<T>(id)? {
            Lookup::Found(_) => Lookup::Found(()),
            Lookup::NotFound => Lookup::NotFound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{local_id, LocalRepository};
    use crate::db::Database;
    use crate::models::{AuditLogEntry, Goal, NewGoal, NewReview, Review, User};
    use crate::repository::{Query, Repository};
    use crate::store::{Lookup, SnapshotStore};
    use std::sync::Arc;
    use std::time::Instant;

    fn repository(simulate_latency: bool) -> (tempfile::TempDir, LocalRepository<Goal>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Arc::new(Database::new(&dir.path().join("local.db")).expect("db"));
        (dir, LocalRepository::new(SnapshotStore::new(db), simulate_latency))
    }

    #[test]
    fn local_ids_are_prefixed_and_distinct() {
        let first = local_id("goal");
        let second = local_id("goal");
        assert!(first.starts_with("goal-"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn insert_then_filter_by_owner() {
        let (_dir, repo) = repository(false);
        let goal = NewGoal {
            user_id: "u1".to_string(),
            title: "Learn Rust".to_string(),
            ..Default::default()
        }
        .into_goal(String::new());

        let stored = repo.insert(goal).await.expect("insert");
        assert!(!stored.id.is_empty());

        let mine = repo.list(&Query::all().eq("user_id", "u1")).await.expect("list");
        assert_eq!(mine, vec![stored]);
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_id_are_not_found() {
        let (_dir, repo) = repository(false);
        let mut ghost = crate::fixtures::goals().remove(0);
        ghost.id = "ghost".to_string();
        assert_eq!(repo.update(ghost).await.expect("update"), Lookup::NotFound);
        assert_eq!(repo.delete("ghost").await.expect("delete"), Lookup::NotFound);
    }

    #[tokio::test]
    async fn limit_truncates_results() {
        let (_dir, repo) = repository(false);
        let listed = repo.list(&Query::all().limit(Some(2))).await.expect("list");
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn lists_follow_the_remote_ordering() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::new(Arc::new(Database::new(&dir.path().join("order.db")).expect("db")));

        let users = LocalRepository::<User>::new(store.clone(), false)
            .list(&Query::all())
            .await
            .expect("users");
        let names = users.iter().map(|user| user.name.clone()).collect::<Vec<_>>();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let reviews = LocalRepository::<Review>::new(store.clone(), false);
        reviews
            .insert(
                NewReview {
                    employee_id: "u9".to_string(),
                    period: "Undated".to_string(),
                    ..Default::default()
                }
                .into_review(String::new()),
            )
            .await
            .expect("insert");
        let listed = reviews.list(&Query::all()).await.expect("reviews");
        let dates = listed.iter().map(|review| review.due_date).collect::<Vec<_>>();
        assert_eq!(dates.last(), Some(&None));
        assert!(dates.windows(2).all(|pair| pair[1].is_none() || pair[0] <= pair[1]));

        let audit = LocalRepository::<AuditLogEntry>::new(store, false)
            .list(&Query::all())
            .await
            .expect("audit");
        assert!(audit.windows(2).all(|pair| pair[0].timestamp >= pair[1].timestamp));
    }

    #[tokio::test]
    async fn simulated_latency_delays_calls() {
        let (_dir, repo) = repository(true);
        let started = Instant::now();
        repo.list(&Query::all()).await.expect("list");
        assert!(started.elapsed().as_millis() >= 250);
    }
}
