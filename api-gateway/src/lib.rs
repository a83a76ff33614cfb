//! Event Lambdas - create, read and delete event records.
//!
//! Endpoints:
//! - GET /_status - Health check
//! - POST /event - Store the JSON body as a record
//! - GET /event?id={id} - Fetch a record
//! - DELETE /event?id={id} - Delete a record
//!
//! Each binary serves a subset of these; anything it does not serve is a 400.

pub mod handler;
pub mod routes;

pub use handler::{handler, AppState};
pub use routes::Operation;

use lambda_http::{run, service_fn, Error};
use shared::{Config, DynamoRecordStore};
use std::sync::Arc;
use tracing::info;

/// Run an event Lambda serving `operations` against the configured DynamoDB table.
pub async fn serve(operations: &'static [Operation]) -> Result<(), Error> {
    let config = Config::from_env();
    let store = DynamoRecordStore::connect(&config).await;

    info!(
        "Starting event handler: table={}, operations={:?}",
        store.table_name(),
        operations
    );

    let state = Arc::new(AppState { store, operations });

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
