use crate::clock::Clock;
use crate::db::DbPool;
use crate::entities::branch;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::Resolution;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Candidate branch reference inside a request; same sentinel and
/// stored-values-win semantics as the customer reference.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BranchRef {
    pub id: Option<Uuid>,
    #[validate(length(
        min = 3,
        max = 200,
        message = "Name must be between 3 and 200 characters long."
    ))]
    pub name: String,
}

impl BranchRef {
    pub fn persisted_id(&self) -> Option<Uuid> {
        self.id.filter(|id| !id.is_nil())
    }
}

/// Service for managing branches
#[derive(Clone)]
pub struct BranchService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    clock: Arc<dyn Clock>,
}

impl BranchService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, clock: Arc<dyn Clock>) -> Self {
        Self {
            db_pool,
            event_sender,
            clock,
        }
    }

    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    pub async fn create(&self, candidate: &BranchRef) -> Result<branch::Model, ServiceError> {
        let db = &*self.db_pool;
        let model = branch::ActiveModel {
            id: Set(candidate.persisted_id().unwrap_or_else(Uuid::new_v4)),
            name: Set(candidate.name.clone()),
            created_at: Set(self.clock.now()),
            updated_at: Set(None),
        };

        let created = model.insert(db).await?;

        if let Err(e) = self.event_sender.send(Event::BranchCreated(created.id)).await {
            warn!(error = %e, branch_id = %created.id, "Failed to send branch created event");
        }

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<branch::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(branch::Entity::find_by_id(id).one(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<Option<branch::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(branch::Entity::find()
            .filter(branch::Column::Name.eq(name))
            .one(db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let db = &*self.db_pool;
        let result = branch::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Resolve-or-create, same policy as customers.
    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    pub async fn resolve(
        &self,
        candidate: &BranchRef,
    ) -> Result<Resolution<branch::Model>, ServiceError> {
        match candidate.persisted_id() {
            None => Ok(Resolution::Created(self.create(candidate).await?)),
            Some(id) => match self.get_by_id(id).await? {
                Some(existing) => Ok(Resolution::Found(existing)),
                None => Ok(Resolution::Created(self.create(candidate).await?)),
            },
        }
    }
}
