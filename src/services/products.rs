use crate::clock::Clock;
use crate::db::DbPool;
use crate::entities::product;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::Resolution;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Candidate catalog product. `price` is the reference price captured when
/// the product is first created; sale lines carry their own unit price.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductRef {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Product Name is required."))]
    pub name: String,
    #[validate(custom = "crate::services::validation::validate_positive_price")]
    pub price: Decimal,
}

impl ProductRef {
    pub fn persisted_id(&self) -> Option<Uuid> {
        self.id.filter(|id| !id.is_nil())
    }
}

/// Service for managing the product catalog
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    clock: Arc<dyn Clock>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, clock: Arc<dyn Clock>) -> Self {
        Self {
            db_pool,
            event_sender,
            clock,
        }
    }

    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    pub async fn create(&self, candidate: &ProductRef) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;
        let model = product::ActiveModel {
            id: Set(candidate.persisted_id().unwrap_or_else(Uuid::new_v4)),
            name: Set(candidate.name.clone()),
            price: Set(candidate.price),
            created_at: Set(self.clock.now()),
            updated_at: Set(None),
        };

        let created = model.insert(db).await?;

        if let Err(e) = self
            .event_sender
            .send(Event::ProductCreated(created.id))
            .await
        {
            warn!(error = %e, product_id = %created.id, "Failed to send product created event");
        }

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<product::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(product::Entity::find_by_id(id).one(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<Option<product::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(product::Entity::find()
            .filter(product::Column::Name.eq(name))
            .one(db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let db = &*self.db_pool;
        let result = product::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Resolve-or-create, same policy as customers and branches.
    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    pub async fn resolve(
        &self,
        candidate: &ProductRef,
    ) -> Result<Resolution<product::Model>, ServiceError> {
        match candidate.persisted_id() {
            None => Ok(Resolution::Created(self.create(candidate).await?)),
            Some(id) => match self.get_by_id(id).await? {
                Some(existing) => Ok(Resolution::Found(existing)),
                None => Ok(Resolution::Created(self.create(candidate).await?)),
            },
        }
    }
}
