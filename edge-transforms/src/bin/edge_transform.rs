//! Edge Transform Lambda - Runs one proxy transform over the request's context variables.
//!
//! Input: `{"script": {"name": "...", ...}, "variables": {...}}`
//! Output: `{"set": {...}, "removed": [...]}`

use edge_transforms::{Changes, Script, VariableBag};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct TransformEvent {
    script: Script,
    #[serde(default)]
    variables: Map<String, Value>,
}

async fn handler(event: LambdaEvent<TransformEvent>) -> Result<Changes, Error> {
    let TransformEvent { script, variables } = event.payload;

    let mut bag = VariableBag::new(variables);
    script.run(&mut bag);

    Ok(bag.into_changes())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    run(service_fn(handler)).await
}
