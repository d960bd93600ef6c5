use super::{Entity, Query, Repository};
use crate::errors::AppResult;
use crate::remote::RestClient;
use crate::store::Lookup;
use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;

#[derive(Debug, Clone)]
pub struct RemoteRepository<T> {
    client: RestClient,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> RemoteRepository<T> {
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }
}

/// Row body for writes. The id travels in the URL (updates) or is assigned
/// by the server (inserts), never in the body.
fn write_body<T: Entity>(entity: &T) -> AppResult<Value> {
    let mut body = serde_json::to_value(entity.to_row())?;
    if let Value::Object(map) = &mut body {
        map.remove("id");
    }
    Ok(body)
}

#[async_trait]
impl<T: Entity> Repository<T> for RemoteRepository<T> {
    async fn list(&self, query: &Query) -> AppResult<Vec<T>> {
        let rows = self
            .client
            .select::<T::Row>(T::TABLE, T::SELECT, &query.filters, T::ORDER, query.limit)
            .await?;
        Ok(rows.into_iter().map(T::from_row).collect())
    }

    async fn insert(&self, entity: T) -> AppResult<T> {
        let body = write_body(&entity)?;
        let row = self.client.insert::<T::Row>(T::TABLE, &body).await?;
        let stored = T::from_row(row);
        tracing::debug!(entity = T::NAME, id = %stored.id(), "stored remotely");
        Ok(stored)
    }

    async fn update(&self, entity: T) -> AppResult<Lookup<T>> {
        let body = write_body(&entity)?;
        let row = self.client.update::<T::Row>(T::TABLE, entity.id(), &body).await?;
        Ok(match row {
            Some(row) => Lookup::Found(T::from_row(row)),
            None => Lookup::NotFound,
        })
    }

    async fn delete(&self, id: &str) -> AppResult<Lookup<()>> {
        if self.client.delete(T::TABLE, id).await? {
            Ok(Lookup::Found(()))
        } else {
            Ok(Lookup::NotFound)
        }
    }
}
