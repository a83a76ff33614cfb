//! Configuration management for Lambda functions.

use std::env;

/// Table used when `DYNAMODB_TABLE_NAME` is not set.
pub const DEFAULT_TABLE_NAME: &str = "DefaultTableName";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// DynamoDB table holding event records
    pub table_name: String,
    /// AWS region
    pub aws_region: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// An unset or blank table name falls back to [`DEFAULT_TABLE_NAME`].
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("DYNAMODB_TABLE_NAME").ok(),
            env::var("AWS_REGION").ok(),
        )
    }

    fn from_vars(table_name: Option<String>, aws_region: Option<String>) -> Self {
        Self {
            table_name: table_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            aws_region: aws_region
                .filter(|region| !region.trim().is_empty())
                .unwrap_or_else(|| "eu-west-2".to_string()),
        }
    }
}
