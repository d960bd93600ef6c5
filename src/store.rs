use crate::db::Database;
use crate::errors::AppResult;
use crate::repository::Entity;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Every durable key the application writes. One key owns one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Goals,
    Reviews,
    Users,
    Departments,
    Positions,
    AuditLogs,
    NotificationSettings,
    NotifiedItems,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Goals => "zirtually_goals",
            Self::Reviews => "zirtually_reviews",
            Self::Users => "zirtually_users",
            Self::Departments => "zirtually_departments",
            Self::Positions => "zirtually_positions",
            Self::AuditLogs => "zirtually_audit_logs",
            Self::NotificationSettings => "zirtually_notification_settings",
            Self::NotifiedItems => "zirtually_notified_items",
        }
    }
}

/// Result of a keyed write against a stored collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    db: Arc<Database>,
}

impl SnapshotStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Stored collection, or the bundled fixtures when nothing was written
    /// yet. Reading never persists the fixtures.
    pub fn read_all<T: Entity>(&self) -> AppResult<Vec<T>> {
        match self.db.get_item(T::STORAGE_KEY.as_str())? {
            Some(raw) => Ok(serde_json::from_str::<Vec<T>>(&raw)?),
            None => Ok(T::fixtures()),
        }
    }

    pub fn write_all<T: Entity>(&self, items: &[T]) -> AppResult<()> {
        let raw = serde_json::to_string(items)?;
        self.db.set_item(T::STORAGE_KEY.as_str(), &raw)
    }

    /// Applies `apply` to the current collection as one atomic read-modify-write.
    /// The collection is written back only when `apply` returns `Some`.
    fn modify<T, R, F>(&self, apply: F) -> AppResult<Option<R>>
    where
        T: Entity,
        F: FnOnce(&mut Vec<T>) -> Option<R>,
    {
        let mut outcome = None;
        self.db.update_item(T::STORAGE_KEY.as_str(), |raw| {
            let mut items = match raw {
                Some(raw) => serde_json::from_str::<Vec<T>>(&raw)?,
                None => T::fixtures(),
            };
            outcome = apply(&mut items);
            if outcome.is_none() {
                return Ok(None);
            }
            Ok(Some(serde_json::to_string(&items)?))
        })?;
        Ok(outcome)
    }

    pub fn append<T: Entity>(&self, item: T) -> AppResult<T> {
        let stored = item.clone();
        self.modify::<T, (), _>(move |items| {
            if T::NEWEST_FIRST {
                items.insert(0, item);
            } else {
                items.push(item);
            }
            Some(())
        })?;
        Ok(stored)
    }

    pub fn replace<T: Entity>(&self, item: T) -> AppResult<Lookup<T>> {
        let replaced = self.modify::<T, T, _>(|items| {
            let slot = items.iter_mut().find(|current| current.id() == item.id())?;
            *slot = item.clone();
            Some(item)
        })?;
        Ok(replaced.map_or(Lookup::NotFound, Lookup::Found))
    }

    pub fn remove<T: Entity>(&self, id: &str) -> AppResult<Lookup<T>> {
        let removed = self.modify::<T, T, _>(|items| {
            let index = items.iter().position(|current| current.id() == id)?;
            Some(items.remove(index))
        })?;
        Ok(removed.map_or(Lookup::NotFound, Lookup::Found))
    }

    pub fn read_value<T: DeserializeOwned>(&self, key: StorageKey) -> AppResult<Option<T>> {
        match self.db.get_item(key.as_str())? {
            Some(raw) => Ok(Some(serde_json::from_str::<T>(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn write_value<T: Serialize>(&self, key: StorageKey, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.db.set_item(key.as_str(), &raw)
    }

    /// Atomic read-modify-write of a singleton value; a missing value starts
    /// from `T::default()`. Nothing is written when `apply` returns `None`.
    pub fn update_value<T, R, F>(&self, key: StorageKey, apply: F) -> AppResult<Option<R>>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> Option<R>,
    {
        let mut outcome = None;
        self.db.update_item(key.as_str(), |raw| {
            let mut value = match raw {
                Some(raw) => serde_json::from_str::<T>(&raw)?,
                None => T::default(),
            };
            outcome = apply(&mut value);
            if outcome.is_none() {
                return Ok(None);
            }
            Ok(Some(serde_json::to_string(&value)?))
        })?;
        Ok(outcome)
    }

    pub fn is_persisted(&self, key: StorageKey) -> AppResult<bool> {
        Ok(self.db.get_item(key.as_str())?.is_some())
    }
}
