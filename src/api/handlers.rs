use crate::models::{FieldSet, MatchQuery, MatchResult, ParsedOrder};
use crate::service::{parser, resolve};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Fields used when a match request does not name any.
    pub default_fields: FieldSet,
}

/// Request body: an order document (absent = order not found) plus match keys.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[serde(default)]
    pub document: Option<Value>,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub ship_set_number: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub fields: Option<FieldSet>,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub success: bool,
    pub message: String,
    pub order: Option<ParsedOrder>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub success: bool,
    pub message: String,
    pub result: Option<MatchResult>,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// Parses a raw `checkOrderStatus` document into header and lines.
pub async fn parse_order(Json(document): Json<Value>) -> Response {
    match parser::parse_value(&document) {
        Ok(order) => {
            let response = ParseResponse {
                success: true,
                message: format!("Parsed order with {} lines", order.lines.len()),
                order: Some(order),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let response = ParseResponse {
                success: false,
                message: format!("Error: {}", e),
                order: None,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(response)).into_response()
        }
    }
}

/// Resolves one (order, ship set, SKU) query against the supplied document.
pub async fn match_line(State(state): State<Arc<ApiState>>, Json(req): Json<MatchRequest>) -> Response {
    let query = MatchQuery::new(req.order_number, req.ship_set_number, req.sku);
    let fields = req.fields.unwrap_or_else(|| state.default_fields.clone());

    let order = match req.document.as_ref().map(parser::parse_value).transpose() {
        Ok(order) => order,
        Err(e) => {
            let response = MatchResponse {
                success: false,
                message: format!("Error: {}", e),
                result: None,
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(response)).into_response();
        }
    };

    let result = resolve(order.as_ref(), &query, &fields);
    let response = MatchResponse {
        success: true,
        message: format!("{:?}", result.status),
        result: Some(result),
    };
    (StatusCode::OK, Json(response)).into_response()
}
