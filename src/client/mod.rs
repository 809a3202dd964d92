pub mod ccw;
pub mod http;

pub use ccw::{fetch_access_token, order_status_payload, AccessToken, CcwClient, OrderIdType};
pub use http::create_client;

use crate::error::Result;
use async_trait::async_trait;

/// What the order API returned for one order number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderDocument {
    /// Raw response body.
    Found(String),
    /// Unknown order, or one the credential may not read.
    NotFound,
}

/// Source of raw order documents.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_order(&self, order_number: &str) -> Result<OrderDocument>;
}
