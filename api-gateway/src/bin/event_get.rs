//! Event GET Lambda - Handles GET /_status and GET /event.

use api_gateway::{serve, Operation};
use lambda_http::Error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    serve(&[Operation::Status, Operation::GetEvent]).await
}
