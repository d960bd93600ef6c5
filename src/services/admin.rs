use crate::errors::{AppError, AppResult};
use crate::models::{Actor, AuditCategory, AuditDraft, Department, NewDepartment, NewPosition, Position};
use crate::repository::{Query, Repository};
use crate::services::audit::AuditService;
use crate::store::Lookup;
use std::sync::Arc;

/// Organization structure managed from the admin console. Manager and
/// department references are stored as given; nothing checks they exist.
#[derive(Clone)]
pub struct AdminService {
    departments: Arc<dyn Repository<Department>>,
    positions: Arc<dyn Repository<Position>>,
    audit: AuditService,
}

impl AdminService {
    pub fn new(
        departments: Arc<dyn Repository<Department>>,
        positions: Arc<dyn Repository<Position>>,
        audit: AuditService,
    ) -> Self {
        Self {
            departments,
            positions,
            audit,
        }
    }

    async fn record(&self, actor: &Actor, action: &str, details: String, entity_id: &str) {
        self.audit
            .record(
                AuditDraft::new(actor.clone(), action, AuditCategory::Administration, details).affecting(entity_id),
            )
            .await;
    }

    pub async fn list_departments(&self) -> AppResult<Vec<Department>> {
        self.departments.list(&Query::all()).await
    }

    pub async fn create_department(&self, payload: NewDepartment, actor: &Actor) -> AppResult<Department> {
        let department = self
            .departments
            .insert(Department {
                id: String::new(),
                name: payload.name,
                manager_id: payload.manager_id,
                description: payload.description,
            })
            .await?;
        tracing::info!(department_id = %department.id, "department created");
        self.record(actor, "department.create", format!("Created department {}", department.name), &department.id)
            .await;
        Ok(department)
    }

    pub async fn update_department(&self, department: Department, actor: &Actor) -> AppResult<Department> {
        let id = department.id.clone();
        let department = match self.departments.update(department).await? {
            Lookup::Found(department) => department,
            Lookup::NotFound => return Err(AppError::NotFound(format!("department {}", id))),
        };
        self.record(actor, "department.update", format!("Updated department {}", department.name), &department.id)
            .await;
        Ok(department)
    }

    pub async fn delete_department(&self, id: &str, actor: &Actor) -> AppResult<bool> {
        let removed = self.departments.delete(id).await?.is_found();
        if removed {
            self.record(actor, "department.delete", format!("Deleted department {}", id), id).await;
        }
        Ok(removed)
    }

    pub async fn list_positions(&self) -> AppResult<Vec<Position>> {
        self.positions.list(&Query::all()).await
    }

    pub async fn positions_for_department(&self, department_id: &str) -> AppResult<Vec<Position>> {
        self.positions.list(&Query::all().eq("department_id", department_id)).await
    }

    pub async fn create_position(&self, payload: NewPosition, actor: &Actor) -> AppResult<Position> {
        let position = self
            .positions
            .insert(Position {
                id: String::new(),
                title: payload.title,
                department_id: payload.department_id,
                level: payload.level,
                salary_min: payload.salary_min,
                salary_max: payload.salary_max,
            })
            .await?;
        tracing::info!(position_id = %position.id, "position created");
        self.record(actor, "position.create", format!("Created position {}", position.title), &position.id)
            .await;
        Ok(position)
    }

    pub async fn update_position(&self, position: Position, actor: &Actor) -> AppResult<Position> {
        let id = position.id.clone();
        let position = match self.positions.update(position).await? {
            Lookup::Found(position) => position,
            Lookup::NotFound => return Err(AppError::NotFound(format!("position {}", id))),
        };
        self.record(actor, "position.update", format!("Updated position {}", position.title), &position.id)
            .await;
        Ok(position)
    }

    pub async fn delete_position(&self, id: &str, actor: &Actor) -> AppResult<bool> {
        let removed = self.positions.delete(id).await?.is_found();
        if removed {
            self.record(actor, "position.delete", format!("Deleted position {}", id), id).await;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::AdminService;
    use crate::db::Database;
    use crate::models::{Actor, AuditCategory, AuditLogEntry, AuditQuery, Department, NewDepartment, NewPosition, Position};
    use crate::repository::LocalRepository;
    use crate::services::audit::AuditService;
    use crate::store::SnapshotStore;
    use std::sync::Arc;

    fn service() -> (tempfile::TempDir, AdminService, AuditService) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Arc::new(Database::new(&dir.path().join("admin.db")).expect("db"));
        let store = SnapshotStore::new(db);
        let audit = AuditService::new(Arc::new(LocalRepository::<AuditLogEntry>::new(store.clone(), false)));
        let admin = AdminService::new(
            Arc::new(LocalRepository::<Department>::new(store.clone(), false)),
            Arc::new(LocalRepository::<Position>::new(store, false)),
            audit.clone(),
        );
        (dir, admin, audit)
    }

    #[tokio::test]
    async fn positions_are_scoped_to_their_department() {
        let (_dir, admin, audit) = service();
        let actor = Actor::system();
        let design = admin
            .create_department(
                NewDepartment {
                    name: "Design".to_string(),
                    ..Default::default()
                },
                &actor,
            )
            .await
            .expect("department");
        admin
            .create_position(
                NewPosition {
                    title: "Product Designer".to_string(),
                    department_id: Some(design.id.clone()),
                    salary_min: Some(90_000.0),
                    salary_max: Some(120_000.0),
                    ..Default::default()
                },
                &actor,
            )
            .await
            .expect("position");

        let scoped = admin.positions_for_department(&design.id).await.expect("positions");
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].title, "Product Designer");
        assert_eq!(admin.positions_for_department("dep-002").await.expect("positions").len(), 2);

        let log = audit
            .list(&AuditQuery {
                category: Some(AuditCategory::Administration),
                ..Default::default()
            })
            .await
            .expect("audit");
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].action, "position.create");
    }

    #[tokio::test]
    async fn deleting_unknown_department_is_quiet() {
        let (_dir, admin, _audit) = service();
        assert!(!admin.delete_department("dep-999", &Actor::system()).await.expect("delete"));
        assert!(admin.delete_department("dep-003", &Actor::system()).await.expect("delete"));
        assert_eq!(admin.list_departments().await.expect("list").len(), 2);
    }
}
