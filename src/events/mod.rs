use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

pub mod publisher;

/// In-process events emitted by the services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    SaleCreated(Uuid),
    SaleStatusChanged {
        sale_id: Uuid,
        old_status: String,
        new_status: String,
    },
    CustomerCreated(Uuid),
    BranchCreated(Uuid),
    ProductCreated(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the in-process event channel and dispatches per event kind.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::SaleCreated(sale_id) => {
                info!(%sale_id, "Processing sale created event");
            }
            Event::SaleStatusChanged {
                sale_id,
                old_status,
                new_status,
            } => {
                info!(%sale_id, %old_status, %new_status, "Sale status changed");
            }
            Event::CustomerCreated(customer_id) => {
                info!(%customer_id, "Customer created");
            }
            Event::BranchCreated(branch_id) => {
                info!(%branch_id, "Branch created");
            }
            Event::ProductCreated(product_id) => {
                info!(%product_id, "Product created");
            }
        }
    }

    warn!("Event processing loop has ended");
}
