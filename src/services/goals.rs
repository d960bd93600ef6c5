use crate::errors::{AppError, AppResult};
use crate::events::{EventBus, GOAL_COMPLETED, GOAL_CREATED, GOAL_DELETED, GOAL_UPDATED};
use crate::models::{Goal, NewGoal};
use crate::repository::{Query, Repository};
use crate::store::Lookup;
use serde_json::json;
use std::sync::Arc;

/// Goal CRUD. Progress and status rules belong to the caller; whatever is
/// passed in is stored as-is.
#[derive(Clone)]
pub struct GoalService {
    repo: Arc<dyn Repository<Goal>>,
    events: EventBus,
}

impl GoalService {
    pub fn new(repo: Arc<dyn Repository<Goal>>, events: EventBus) -> Self {
        Self { repo, events }
    }

    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Goal>> {
        self.repo.list(&Query::all().eq("user_id", user_id)).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<Goal>> {
        self.repo.list(&Query::all()).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<Goal>> {
        let mut found = self.repo.list(&Query::all().eq("id", id).limit(Some(1))).await?;
        Ok(if found.is_empty() { None } else { Some(found.remove(0)) })
    }

    pub async fn create(&self, payload: NewGoal) -> AppResult<Goal> {
        let goal = self.repo.insert(payload.into_goal(String::new())).await?;
        tracing::info!(goal_id = %goal.id, user_id = %goal.user_id, "goal created");

        self.events.publish_json(GOAL_CREATED, &goal);
        if goal.is_completed() {
            self.events.publish_json(GOAL_COMPLETED, &goal);
        }
        Ok(goal)
    }

    pub async fn update(&self, goal: Goal) -> AppResult<Goal> {
        let id = goal.id.clone();
        let goal = match self.repo.update(goal).await? {
            Lookup::Found(goal) => goal,
            Lookup::NotFound => return Err(AppError::NotFound(format!("goal {}", id))),
        };
        tracing::info!(goal_id = %goal.id, progress = goal.progress, status = goal.status.as_str(), "goal updated");

        self.events.publish_json(GOAL_UPDATED, &goal);
        if goal.is_completed() {
            self.events.publish_json(GOAL_COMPLETED, &goal);
        }
        Ok(goal)
    }

    /// `false` when no goal carries `id`.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        match self.repo.delete(id).await? {
            Lookup::Found(()) => {
                tracing::info!(goal_id = %id, "goal deleted");
                self.events.publish(GOAL_DELETED, json!({ "id": id }));
                Ok(true)
            }
            Lookup::NotFound => Ok(false),
        }
    }
}
