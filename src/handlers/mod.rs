pub mod branches;
pub mod customers;
pub mod products;
pub mod sales;

use crate::clock::{Clock, SystemClock};
use crate::db::DbPool;
use crate::events::publisher::SaleCreatedPublisher;
use crate::events::EventSender;
use crate::services::branches::BranchService;
use crate::services::customers::CustomerService;
use crate::services::products::ProductService;
use crate::services::sales::SaleService;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub customers: Arc<CustomerService>,
    pub branches: Arc<BranchService>,
    pub products: Arc<ProductService>,
    pub sales: Arc<SaleService>,
}

impl AppServices {
    /// Builds the services container with the system wall clock.
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        publisher: SaleCreatedPublisher,
    ) -> Self {
        Self::with_clock(db_pool, event_sender, publisher, Arc::new(SystemClock))
    }

    /// Builds the services container with an explicit clock (tests pin time).
    pub fn with_clock(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        publisher: SaleCreatedPublisher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let customers = Arc::new(CustomerService::new(
            db_pool.clone(),
            event_sender.clone(),
            clock.clone(),
        ));
        let branches = Arc::new(BranchService::new(
            db_pool.clone(),
            event_sender.clone(),
            clock.clone(),
        ));
        let products = Arc::new(ProductService::new(
            db_pool.clone(),
            event_sender.clone(),
            clock.clone(),
        ));
        let sales = Arc::new(SaleService::new(
            db_pool,
            event_sender,
            publisher,
            customers.clone(),
            branches.clone(),
            products.clone(),
            clock,
        ));

        Self {
            customers,
            branches,
            products,
            sales,
        }
    }
}
