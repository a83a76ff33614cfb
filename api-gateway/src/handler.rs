//! Request handling for the event Lambdas.

use lambda_http::{Body, Error, Request, Response};
use serde_json::Value;
use shared::http::{json_response, message_response, parse_json_body};
use shared::{Record, RecordStore, StatusResponse};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::routes::{event_id, request_path, route, Operation};

pub const CREATED: &str = "Item created successfully.";
pub const DELETED: &str = "Item deleted successfully.";
pub const NOT_FOUND: &str = "Item not found.";
pub const CREATE_FAILED: &str = "Error creating the item.";
pub const GET_FAILED: &str = "Error retrieving the item.";
pub const DELETE_FAILED: &str = "Error deleting the item.";
pub const INVALID_OPERATION: &str = "Invalid operation.";

/// Application state shared across requests.
pub struct AppState<S> {
    pub store: S,
    /// Operations this deployment serves; everything else is a 400.
    pub operations: &'static [Operation],
}

pub async fn handler<S: RecordStore>(
    state: Arc<AppState<S>>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let path = request_path(&event);
    let method = event.method().as_str();

    info!("Received request: method={}, path={}", method, path);

    let Some(operation) = route(method, path, state.operations) else {
        warn!("Invalid operation: method={}, path={}", method, path);
        return message_response(400, INVALID_OPERATION);
    };

    match operation {
        Operation::Status => json_response(200, &StatusResponse::healthy()),
        Operation::CreateEvent => create_event(&state.store, event.body()).await,
        Operation::GetEvent => match event_id(&event) {
            Some(id) => get_event(&state.store, id).await,
            None => {
                error!("Error retrieving the item: missing id query parameter");
                message_response(500, GET_FAILED)
            }
        },
        Operation::DeleteEvent => match event_id(&event) {
            Some(id) => delete_event(&state.store, id).await,
            None => {
                error!("Error deleting the item: missing id query parameter");
                message_response(500, DELETE_FAILED)
            }
        },
    }
}

async fn create_event<S: RecordStore>(store: &S, body: &Body) -> Result<Response<Body>, Error> {
    match store_body(store, body).await {
        Ok(id) => {
            info!("Created item {}", id);
            message_response(201, CREATED)
        }
        Err(e) => {
            error!("Error creating the item: {}", e);
            message_response(500, CREATE_FAILED)
        }
    }
}

/// Parse the body and store it as given; the caller-supplied id is trusted.
async fn store_body<S: RecordStore>(store: &S, body: &Body) -> shared::Result<String> {
    let value: Value = parse_json_body(body)?;
    let record = Record::try_from(value)?;
    let id = record.id().to_string();
    store.put(record).await?;
    Ok(id)
}

async fn get_event<S: RecordStore>(store: &S, id: &str) -> Result<Response<Body>, Error> {
    match store.get(id).await {
        Ok(Some(record)) => json_response(200, &record),
        Ok(None) => message_response(404, NOT_FOUND),
        Err(e) => {
            error!("Error retrieving item {}: {}", id, e);
            message_response(500, GET_FAILED)
        }
    }
}

async fn delete_event<S: RecordStore>(store: &S, id: &str) -> Result<Response<Body>, Error> {
    match store.delete(id).await {
        Ok(true) => {
            info!("Deleted item {}", id);
            message_response(200, DELETED)
        }
        Ok(false) => message_response(404, NOT_FOUND),
        Err(e) => {
            error!("Error deleting item {}: {}", id, e);
            message_response(500, DELETE_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lambda_http::RequestExt;
    use serde_json::json;
    use shared::InMemoryRecordStore;
    use std::collections::HashMap;

    struct FailingStore;

    #[async_trait]
    impl RecordStore for FailingStore {
        async fn put(&self, _record: Record) -> shared::Result<()> {
            Err(shared::Error::Aws("ProvisionedThroughputExceeded".to_string()))
        }

        async fn get(&self, _id: &str) -> shared::Result<Option<Record>> {
            Err(shared::Error::Aws("ProvisionedThroughputExceeded".to_string()))
        }

        async fn delete(&self, _id: &str) -> shared::Result<bool> {
            Err(shared::Error::Aws("ProvisionedThroughputExceeded".to_string()))
        }
    }

    fn state<S>(store: S, operations: &'static [Operation]) -> Arc<AppState<S>> {
        Arc::new(AppState { store, operations })
    }

    fn request(method: &str, path: &str, body: Body) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri(path)
            .body(body)
            .unwrap()
    }

    fn with_id(method: &str, id: &str) -> Request {
        request(method, "/event", Body::Empty).with_query_string_parameters(HashMap::from([(
            "id".to_string(),
            id.to_string(),
        )]))
    }

    fn post(body: Value) -> Request {
        request("POST", "/event", Body::from(body.to_string()))
    }

    fn body_json(response: &Response<Body>) -> Value {
        serde_json::from_slice(response.body().as_ref()).unwrap()
    }

    #[tokio::test]
    async fn test_status_is_healthy() {
        let state = state(InMemoryRecordStore::new(), Operation::ALL);
        let response = handler(state, request("GET", "/_status", Body::Empty))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            body_json(&response),
            json!({"status": "healthy", "message": "Backend is up and running."})
        );
    }

    #[tokio::test]
    async fn test_post_then_get_round_trips_record() {
        let state = state(InMemoryRecordStore::new(), Operation::ALL);
        let record = json!({
            "id": "evt-1",
            "vaccine": {"code": "39114911000001105", "display": "COVID-19"},
            "doses": [1, 2],
            "recorded": true
        });

        let response = handler(Arc::clone(&state), post(record.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(body_json(&response), json!(CREATED));

        let response = handler(state, with_id("GET", "evt-1")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response), record);
    }

    #[tokio::test]
    async fn test_post_malformed_body_is_server_error() {
        let state = state(InMemoryRecordStore::new(), Operation::ALL);

        let response = handler(
            Arc::clone(&state),
            request("POST", "/event", Body::from("{not json")),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 500);
        assert_eq!(body_json(&response), json!(CREATE_FAILED));

        let response = handler(Arc::clone(&state), post(json!({"vaccine": "FLU"})))
            .await
            .unwrap();
        assert_eq!(response.status(), 500);
        assert!(state.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_and_delete_missing_are_not_found() {
        let state = state(InMemoryRecordStore::new(), Operation::ALL);

        for method in ["GET", "DELETE"] {
            let response = handler(Arc::clone(&state), with_id(method, "missing"))
                .await
                .unwrap();
            assert_eq!(response.status(), 404);
            assert_eq!(body_json(&response), json!(NOT_FOUND));
        }
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let state = state(InMemoryRecordStore::new(), Operation::ALL);
        handler(Arc::clone(&state), post(json!({"id": "evt-2"})))
            .await
            .unwrap();

        let response = handler(Arc::clone(&state), with_id("DELETE", "evt-2"))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response), json!(DELETED));

        let response = handler(state, with_id("GET", "evt-2")).await.unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_store_failures_are_server_errors() {
        let state = state(FailingStore, Operation::ALL);

        let response = handler(Arc::clone(&state), post(json!({"id": "evt-3"})))
            .await
            .unwrap();
        assert_eq!(response.status(), 500);
        assert_eq!(body_json(&response), json!(CREATE_FAILED));

        let response = handler(Arc::clone(&state), with_id("GET", "evt-3"))
            .await
            .unwrap();
        assert_eq!(response.status(), 500);
        assert_eq!(body_json(&response), json!(GET_FAILED));

        let response = handler(state, with_id("DELETE", "evt-3")).await.unwrap();
        assert_eq!(response.status(), 500);
        assert_eq!(body_json(&response), json!(DELETE_FAILED));
    }

    #[tokio::test]
    async fn test_undefined_operations_are_bad_requests() {
        let state = state(InMemoryRecordStore::new(), Operation::ALL);
        let cases = [
            request("PUT", "/event", Body::Empty),
            request("PATCH", "/event", Body::Empty),
            request("GET", "/events", Body::Empty),
            request("POST", "/_status", Body::Empty),
            request("GET", "/", Body::Empty),
        ];

        for event in cases {
            let response = handler(Arc::clone(&state), event).await.unwrap();
            assert_eq!(response.status(), 400);
            assert_eq!(body_json(&response), json!(INVALID_OPERATION));
        }
    }

    #[tokio::test]
    async fn test_missing_id_is_server_error() {
        let state = state(InMemoryRecordStore::new(), Operation::ALL);
        let cases = [
            ("GET", request("GET", "/event", Body::Empty), GET_FAILED),
            ("DELETE", request("DELETE", "/event", Body::Empty), DELETE_FAILED),
            ("GET", with_id("GET", ""), GET_FAILED),
            ("DELETE", with_id("DELETE", ""), DELETE_FAILED),
        ];

        for (method, event, message) in cases {
            let response = handler(Arc::clone(&state), event).await.unwrap();
            assert_eq!(response.status(), 500, "{}", method);
            assert_eq!(body_json(&response), json!(message));
        }
    }

    #[tokio::test]
    async fn test_single_method_deployment() {
        let state = state(
            InMemoryRecordStore::new(),
            &[Operation::Status, Operation::GetEvent],
        );

        let response = handler(Arc::clone(&state), post(json!({"id": "evt-4"})))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        assert!(state.store.is_empty().await);

        let response = handler(Arc::clone(&state), with_id("DELETE", "evt-4"))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let response = handler(state, request("GET", "/_status", Body::Empty))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }
}
