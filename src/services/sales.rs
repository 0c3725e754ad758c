use crate::clock::Clock;
use crate::db::DbPool;
use crate::entities::sale::SaleStatus;
use crate::entities::{branch, customer, product, sale, sale_item};
use crate::errors::ServiceError;
use crate::events::publisher::SaleCreatedPublisher;
use crate::events::{Event, EventSender};
use crate::services::branches::{BranchRef, BranchService};
use crate::services::customers::{CustomerRef, CustomerService};
use crate::services::pricing;
use crate::services::products::{ProductRef, ProductService};
use crate::services::validation;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request/Response types for the sale service
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateSaleRequest {
    /// Requested sale date; validated against the business window, then
    /// replaced by the server-side stamp at persistence time.
    pub sale_date: DateTime<Utc>,
    #[validate]
    pub customer: CustomerRef,
    #[validate]
    pub branch: BranchRef,
    /// Client-supplied total; must be positive when present, then discarded
    /// in favor of the recomputed sum.
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(default)]
    pub status: SaleStatus,
    #[validate]
    pub items: Vec<SaleLineRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SaleLineRequest {
    /// Catalog product id; absent or nil means resolve-by-create.
    pub product_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Product Name is required."))]
    pub name: String,
    #[validate(range(min = 1, message = "Product Quantities must be greater than zero."))]
    pub quantity: i32,
    #[validate(custom = "crate::services::validation::validate_positive_price")]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartyResponse {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaleLineResponse {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    /// Applied tier discount fraction (0, 0.10 or 0.20).
    pub discount: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaleResponse {
    pub id: Uuid,
    pub sale_date: DateTime<Utc>,
    pub customer: PartyResponse,
    pub branch: PartyResponse,
    pub items: Vec<SaleLineResponse>,
    pub total_amount: Decimal,
    pub is_cancelled: bool,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

struct PricedLine {
    product: product::Model,
    quantity: i32,
    unit_price: Decimal,
    discount: Decimal,
    total: Decimal,
}

/// Orchestrates the sale-creation pipeline: validate, resolve, guard, price,
/// persist, notify.
#[derive(Clone)]
pub struct SaleService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    publisher: SaleCreatedPublisher,
    customers: Arc<CustomerService>,
    branches: Arc<BranchService>,
    products: Arc<ProductService>,
    clock: Arc<dyn Clock>,
}

impl SaleService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        publisher: SaleCreatedPublisher,
        customers: Arc<CustomerService>,
        branches: Arc<BranchService>,
        products: Arc<ProductService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            publisher,
            customers,
            branches,
            products,
            clock,
        }
    }

    /// Creates a sale end to end.
    ///
    /// Validation and the quantity guard run before the sale row is written;
    /// resolver creations may already have committed by the time a guard
    /// failure aborts the request. Notification failures never surface here.
    #[instrument(skip(self, request), fields(customer = %request.customer.name, branch = %request.branch.name, lines = request.items.len()))]
    pub async fn create_sale(
        &self,
        request: CreateSaleRequest,
    ) -> Result<SaleResponse, ServiceError> {
        validation::validate_create_sale(&request, self.clock.now())?;

        let customer = self.customers.resolve(&request.customer).await?.into_inner();
        let branch = self.branches.resolve(&request.branch).await?.into_inner();

        // lines resolve in request order and stay in that order end to end
        let mut resolved_lines = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let product = self
                .products
                .resolve(&ProductRef {
                    id: line.product_id,
                    name: line.name.clone(),
                    price: line.unit_price,
                })
                .await?
                .into_inner();
            resolved_lines.push((product, line));
        }

        pricing::check_quantity_ceiling(
            resolved_lines
                .iter()
                .map(|(product, line)| (product.name.as_str(), line.quantity)),
        )?;

        let mut total_amount = Decimal::ZERO;
        let mut priced_lines = Vec::with_capacity(resolved_lines.len());
        for (product, line) in resolved_lines {
            let (discount, total) = pricing::price_line(line.unit_price, line.quantity);
            total_amount += total;
            priced_lines.push(PricedLine {
                product,
                quantity: line.quantity,
                unit_price: line.unit_price,
                discount,
                total,
            });
        }

        let now = self.clock.now();
        let sale_id = Uuid::new_v4();

        let txn = self.db_pool.begin().await?;

        let created_sale = sale::ActiveModel {
            id: Set(sale_id),
            // server-authoritative stamp; the candidate's date was only
            // validated, never stored
            sale_date: Set(now),
            customer_id: Set(customer.id),
            branch_id: Set(branch.id),
            total_amount: Set(total_amount),
            is_cancelled: Set(request.is_cancelled),
            status: Set(request.status),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(priced_lines.len());
        for (index, priced) in priced_lines.iter().enumerate() {
            let item = sale_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                sale_id: Set(sale_id),
                product_id: Set(priced.product.id),
                product_name: Set(priced.product.name.clone()),
                line_number: Set(index as i32 + 1),
                quantity: Set(priced.quantity),
                unit_price: Set(priced.unit_price),
                discount: Set(priced.discount),
                total: Set(priced.total),
                created_at: Set(now),
                updated_at: Set(None),
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        txn.commit().await?;

        info!(
            %sale_id,
            customer_id = %customer.id,
            branch_id = %branch.id,
            total_amount = %total_amount,
            "Sale created successfully"
        );

        let response = map_sale(created_sale, customer, branch, items);

        if let Err(e) = self.event_sender.send(Event::SaleCreated(sale_id)).await {
            warn!(error = %e, %sale_id, "Failed to send sale created event");
        }
        self.publisher.notify_created(sale_id, &response).await;

        Ok(response)
    }

    /// Re-reads a sale with its lines in original order.
    #[instrument(skip(self))]
    pub async fn get_sale(&self, id: Uuid) -> Result<SaleResponse, ServiceError> {
        let db = &*self.db_pool;

        let sale = sale::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sale with ID {} not found", id)))?;

        let customer = customer::Entity::find_by_id(sale.customer_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!("Sale {} references a missing customer", id))
            })?;

        let branch = branch::Entity::find_by_id(sale.branch_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!("Sale {} references a missing branch", id))
            })?;

        let items = sale_item::Entity::find()
            .filter(sale_item::Column::SaleId.eq(id))
            .order_by_asc(sale_item::Column::LineNumber)
            .all(db)
            .await?;

        Ok(map_sale(sale, customer, branch, items))
    }

    /// Sets the sale status to Active.
    pub async fn activate(&self, id: Uuid) -> Result<SaleResponse, ServiceError> {
        self.transition_status(id, SaleStatus::Active).await
    }

    /// Sets the sale status to Inactive.
    pub async fn deactivate(&self, id: Uuid) -> Result<SaleResponse, ServiceError> {
        self.transition_status(id, SaleStatus::Inactive).await
    }

    /// Sets the sale status to Suspended.
    pub async fn suspend(&self, id: Uuid) -> Result<SaleResponse, ServiceError> {
        self.transition_status(id, SaleStatus::Suspended).await
    }

    /// Status transitions only touch status and the update timestamp; any
    /// state is reachable from any other.
    #[instrument(skip(self))]
    async fn transition_status(
        &self,
        id: Uuid,
        status: SaleStatus,
    ) -> Result<SaleResponse, ServiceError> {
        let db = &*self.db_pool;

        let sale = sale::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sale with ID {} not found", id)))?;

        let old_status = sale.status;
        let mut active: sale::ActiveModel = sale.into();
        active.status = Set(status);
        active.updated_at = Set(Some(self.clock.now()));
        let updated = active.update(db).await?;

        if let Err(e) = self
            .event_sender
            .send(Event::SaleStatusChanged {
                sale_id: updated.id,
                old_status: old_status.to_value(),
                new_status: status.to_value(),
            })
            .await
        {
            warn!(error = %e, sale_id = %updated.id, "Failed to send sale status changed event");
        }

        self.get_sale(updated.id).await
    }
}

fn map_sale(
    sale: sale::Model,
    customer: customer::Model,
    branch: branch::Model,
    items: Vec<sale_item::Model>,
) -> SaleResponse {
    SaleResponse {
        id: sale.id,
        sale_date: sale.sale_date,
        customer: PartyResponse {
            id: customer.id,
            name: customer.name,
        },
        branch: PartyResponse {
            id: branch.id,
            name: branch.name,
        },
        items: items
            .into_iter()
            .map(|item| SaleLineResponse {
                product_id: item.product_id,
                name: item.product_name,
                quantity: item.quantity,
                unit_price: item.unit_price,
                discount: item.discount,
                total: item.total,
            })
            .collect(),
        total_amount: sale.total_amount,
        is_cancelled: sale.is_cancelled,
        status: sale.status,
        created_at: sale.created_at,
        updated_at: sale.updated_at,
    }
}
