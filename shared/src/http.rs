//! HTTP helpers for Lambda functions.

use lambda_http::{Body, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Result;

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize + ?Sized>(
    status: u16,
    data: &T,
) -> std::result::Result<Response<Body>, lambda_http::Error> {
    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(data)?))
        .map_err(Box::new)?;

    Ok(response)
}

/// Create a response whose body is the message as a JSON string.
pub fn message_response(
    status: u16,
    message: &str,
) -> std::result::Result<Response<Body>, lambda_http::Error> {
    json_response(status, message)
}

/// Parse request body as JSON.
pub fn parse_json_body<T: DeserializeOwned>(body: &Body) -> Result<T> {
    Ok(serde_json::from_slice(body.as_ref())?)
}
