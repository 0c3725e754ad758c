use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use saleflow_api::{
    clock::{Clock, SystemClock},
    config::AppConfig,
    db,
    events::{
        self,
        publisher::{PublishPolicy, SaleCreatedPublisher},
        EventSender,
    },
    handlers::AppServices,
    message_queue::{InMemoryMessageQueue, MessageQueue},
    AppState,
};
use tokio::sync::mpsc;

/// Test harness: application state backed by an in-memory SQLite database,
/// the full v1 router, and an inspectable message queue.
pub struct TestApp {
    router: Router,
    #[allow(dead_code)]
    pub state: AppState,
    #[allow(dead_code)]
    pub queue: Arc<InMemoryMessageQueue>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Fresh application with an in-memory queue receiving published events.
    pub async fn new() -> Self {
        let queue = Arc::new(InMemoryMessageQueue::new());
        Self::build(queue.clone(), queue, Arc::new(SystemClock)).await
    }

    /// Application whose notifier publishes into the given (possibly
    /// failing) transport.
    #[allow(dead_code)]
    pub async fn with_publish_queue(publish_queue: Arc<dyn MessageQueue>) -> Self {
        Self::build(publish_queue, Arc::new(InMemoryMessageQueue::new()), Arc::new(SystemClock))
            .await
    }

    /// Application with a pinned clock.
    #[allow(dead_code)]
    pub async fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let queue = Arc::new(InMemoryMessageQueue::new());
        Self::build(queue.clone(), queue, clock).await
    }

    async fn build(
        publish_queue: Arc<dyn MessageQueue>,
        inspect_queue: Arc<InMemoryMessageQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cfg = AppConfig::for_tests("sqlite::memory:");

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");
        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let publisher = SaleCreatedPublisher::new(
            publish_queue,
            cfg.event_topics.clone(),
            PublishPolicy::Publish,
        );

        let services =
            AppServices::with_clock(db_arc.clone(), event_sender.clone(), publisher, clock);

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", saleflow_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            queue: inspect_queue,
            _event_task: event_task,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request should build"))
            .await
            .expect("request should not fail at the transport level");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };

        (status, json)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    #[allow(dead_code)]
    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }
}

/// Parses a JSON value that may encode a decimal as string or number.
pub fn decimal_of(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string should parse"),
        Value::Number(n) => n
            .to_string()
            .parse()
            .expect("decimal number should parse"),
        other => panic!("expected a decimal-encodable value, got {other:?}"),
    }
}
