use crate::clock::Clock;
use crate::db::DbPool;
use crate::entities::customer::{self, CustomerStatus};
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

/// Candidate customer reference inside a request.
///
/// An absent or nil `id` means "not yet persisted". When the id matches an
/// existing row the stored values win and the rest of the candidate is
/// discarded.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CustomerRef {
    pub id: Option<Uuid>,
    #[validate(length(
        min = 3,
        max = 200,
        message = "Name must be between 3 and 200 characters long."
    ))]
    pub name: String,
    #[serde(default)]
    pub status: CustomerStatus,
}

impl CustomerRef {
    /// The id, unless it is the "not yet persisted" sentinel.
    pub fn persisted_id(&self) -> Option<Uuid> {
        self.id.filter(|id| !id.is_nil())
    }
}

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    clock: Arc<dyn Clock>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, clock: Arc<dyn Clock>) -> Self {
        Self {
            db_pool,
            event_sender,
            clock,
        }
    }

    /// Creates a new customer row from the candidate's fields. A candidate
    /// id is kept when present so dangling references heal in place.
    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    pub async fn create(&self, candidate: &CustomerRef) -> Result<customer::Model, ServiceError> {
        let db = &*self.db_pool;
        let model = customer::ActiveModel {
            id: Set(candidate.persisted_id().unwrap_or_else(Uuid::new_v4)),
            name: Set(candidate.name.clone()),
            status: Set(candidate.status),
            created_at: Set(self.clock.now()),
            updated_at: Set(None),
        };

        let created = model.insert(db).await?;

        if let Err(e) = self
            .event_sender
            .send(Event::CustomerCreated(created.id))
            .await
        {
            warn!(error = %e, customer_id = %created.id, "Failed to send customer created event");
        }

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<customer::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(customer::Entity::find_by_id(id).one(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<Option<customer::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(customer::Entity::find()
            .filter(customer::Column::Name.eq(name))
            .one(db)
            .await?)
    }

    /// Returns true if a row was deleted, false if the id matched nothing.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let db = &*self.db_pool;
        let result = customer::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Resolve-or-create: a dangling identifier is not an error, it becomes
    /// a create carrying the candidate's payload.
    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    pub async fn resolve(
        &self,
        candidate: &CustomerRef,
    ) -> Result<Resolution<customer::Model>, ServiceError> {
        match candidate.persisted_id() {
            None => Ok(Resolution::Created(self.create(candidate).await?)),
            Some(id) => match self.get_by_id(id).await? {
                Some(existing) => Ok(Resolution::Found(existing)),
                None => Ok(Resolution::Created(self.create(candidate).await?)),
            },
        }
    }
}
