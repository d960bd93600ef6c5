use crate::errors::{AppError, AppResult};
use crate::events::{EventBus, REVIEW_COMPLETED, REVIEW_CREATED, REVIEW_DELETED, REVIEW_UPDATED};
use crate::models::{NewReview, Review, ReviewStatus};
use crate::repository::{Query, Repository};
use crate::store::Lookup;
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReviewService {
    repo: Arc<dyn Repository<Review>>,
    events: EventBus,
}

impl ReviewService {
    pub fn new(repo: Arc<dyn Repository<Review>>, events: EventBus) -> Self {
        Self { repo, events }
    }

    pub async fn list_for_employee(&self, employee_id: &str) -> AppResult<Vec<Review>> {
        self.repo.list(&Query::all().eq("employee_id", employee_id)).await
    }

    pub async fn list_for_reviewer(&self, reviewer_id: &str) -> AppResult<Vec<Review>> {
        self.repo.list(&Query::all().eq("reviewer_id", reviewer_id)).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<Review>> {
        self.repo.list(&Query::all()).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<Review>> {
        let mut found = self.repo.list(&Query::all().eq("id", id).limit(Some(1))).await?;
        Ok(if found.is_empty() { None } else { Some(found.remove(0)) })
    }

    pub async fn create(&self, payload: NewReview) -> AppResult<Review> {
        let review = self.repo.insert(payload.into_review(String::new())).await?;
        tracing::info!(review_id = %review.id, employee_id = %review.employee_id, "review created");
        self.events.publish_json(REVIEW_CREATED, &review);
        Ok(review)
    }

    pub async fn update(&self, review: Review) -> AppResult<Review> {
        let id = review.id.clone();
        let review = match self.repo.update(review).await? {
            Lookup::Found(review) => review,
            Lookup::NotFound => return Err(AppError::NotFound(format!("review {}", id))),
        };
        tracing::info!(review_id = %review.id, status = review.status.as_str(), "review updated");

        self.events.publish_json(REVIEW_UPDATED, &review);
        if review.status == ReviewStatus::Completed {
            self.events.publish_json(REVIEW_COMPLETED, &review);
        }
        Ok(review)
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        match self.repo.delete(id).await? {
            Lookup::Found(()) => {
                tracing::info!(review_id = %id, "review deleted");
                self.events.publish(REVIEW_DELETED, json!({ "id": id }));
                Ok(true)
            }
            Lookup::NotFound => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReviewService;
    use crate::db::Database;
    use crate::events::{EventBus, REVIEW_COMPLETED};
    use crate::models::{NewReview, Review, ReviewStatus};
    use crate::repository::LocalRepository;
    use crate::store::SnapshotStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn service() -> (tempfile::TempDir, ReviewService, EventBus) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Arc::new(Database::new(&dir.path().join("reviews.db")).expect("db"));
        let events = EventBus::new();
        let repo = Arc::new(LocalRepository::<Review>::new(SnapshotStore::new(db), false));
        (dir, ReviewService::new(repo, events.clone()), events)
    }

    #[tokio::test]
    async fn scheduled_status_round_trips_locally() {
        let (_dir, reviews, _events) = service();
        let created = reviews
            .create(NewReview {
                employee_id: "u7".to_string(),
                reviewer_id: Some("m1".to_string()),
                period: "H1 2025".to_string(),
                status: ReviewStatus::Scheduled,
                ..Default::default()
            })
            .await
            .expect("create");

        let listed = reviews.list_for_reviewer("m1").await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].status, ReviewStatus::Scheduled);
    }

    #[tokio::test]
    async fn completion_is_published() {
        let (_dir, reviews, events) = service();
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = completed.clone();
        let _subscription = events.subscribe(REVIEW_COMPLETED, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut review = reviews
            .create(NewReview {
                employee_id: "u7".to_string(),
                period: "Q2 2025".to_string(),
                ..Default::default()
            })
            .await
            .expect("create");
        review.status = ReviewStatus::InProgress;
        let review = reviews.update(review).await.expect("start");
        assert_eq!(completed.load(Ordering::SeqCst), 0);

        let mut review = review;
        review.status = ReviewStatus::Completed;
        reviews.update(review).await.expect("complete");
        assert_eq!(completed.load(Ordering::SeqCst), 1);
    }
}
