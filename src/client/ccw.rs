use super::{create_client, OrderDocument, OrderSource};
use crate::config::CcwConfig;
use crate::error::{Error, Result};
use crate::path;
use crate::service::lookup::lookup;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use urlencoding::encode;

/// Response code CCW uses for "order not found or not authorized".
const NOT_FOUND_CODE: &str = "OSA001";
const BODID: &str = "CCWOrderTracker";

/// How the order numbers in the workbook should be interpreted by CCW.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderIdType {
    #[default]
    SalesOrder,
    WebOrder,
    PurchaseOrder,
}

/// Bearer token for the order API. Read-only once issued.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// OAuth2 client-credentials grant against the CCW identity service.
pub async fn fetch_access_token(client: &Client, cfg: &CcwConfig) -> Result<AccessToken> {
    if cfg.client_id.is_empty() {
        return Err(Error::MissingCredential("client_id"));
    }
    if cfg.client_secret.is_empty() {
        return Err(Error::MissingCredential("client_secret"));
    }

    let body = format!(
        "client_id={}&client_secret={}&grant_type=client_credentials",
        encode(&cfg.client_id),
        encode(&cfg.client_secret),
    );

    let resp = client
        .post(&cfg.token_url)
        .header(ACCEPT, "application/json")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(CACHE_CONTROL, "no-cache")
        .body(body)
        .send()
        .await?;

    if resp.status() != StatusCode::OK {
        return Err(api_error(resp).await);
    }

    let token: TokenResponse = resp.json().await?;
    token
        .access_token
        .filter(|t| !t.is_empty())
        .map(AccessToken)
        .ok_or(Error::MissingToken)
}

/// Request body for `checkOrderStatus`, asking for line details.
pub fn order_status_payload(order_number: &str, id_type: OrderIdType) -> Value {
    let mut header = json!({
        "Description": [{ "value": true, "typeCode": "details" }]
    });
    match id_type {
        OrderIdType::SalesOrder => {
            header["SalesOrderReference"] = json!([{ "ID": { "value": numeric_id(order_number) } }]);
        }
        OrderIdType::WebOrder => {
            header["DocumentReference"] = json!([{ "ID": { "value": numeric_id(order_number) } }]);
        }
        OrderIdType::PurchaseOrder => {
            header["ID"] = json!({ "value": order_number });
        }
    }

    json!({
        "GetPurchaseOrder": {
            "value": {
                "DataArea": {
                    "PurchaseOrder": [{ "PurchaseOrderHeader": header }]
                },
                "ApplicationArea": {
                    "CreationDateTime": "datetime",
                    "BODID": { "value": BODID, "schemeVersionID": "V1" }
                }
            }
        }
    })
}

/// Sales and web order references go out as JSON numbers when they are numeric.
fn numeric_id(order_number: &str) -> Value {
    order_number
        .parse::<u64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(order_number))
}

/// True when the response carries the OSA001 not-found code.
pub fn is_not_found(body: &str) -> bool {
    let Ok(doc) = serde_json::from_str::<Value>(body) else {
        return false;
    };
    let expression = path![
        "ShowPurchaseOrder",
        "value",
        "DataArea",
        "Show",
        "ResponseCriteria",
        0,
        "ResponseExpression",
        "value"
    ];
    lookup(&doc, &expression)
        .and_then(Value::as_str)
        .is_some_and(|s| s.contains(NOT_FOUND_CODE))
}

async fn api_error(resp: Response) -> Error {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    warn!(status, "CCW request failed");
    Error::Api { status, body }
}

/// Order API client holding the shared token.
pub struct CcwClient {
    http: Client,
    token: AccessToken,
    order_url: String,
    id_type: OrderIdType,
}

impl CcwClient {
    pub fn new(http: Client, token: AccessToken, cfg: &CcwConfig) -> Self {
        Self {
            http,
            token,
            order_url: cfg.order_url.clone(),
            id_type: cfg.order_id_type,
        }
    }

    /// Builds the HTTP client and obtains a token.
    pub async fn connect(cfg: &CcwConfig) -> Result<Self> {
        let http = create_client(Duration::from_secs(cfg.timeout_secs))?;
        let token = fetch_access_token(&http, cfg).await?;
        Ok(Self::new(http, token, cfg))
    }
}

#[async_trait]
impl OrderSource for CcwClient {
    async fn fetch_order(&self, order_number: &str) -> Result<OrderDocument> {
        debug!(order = %order_number, "requesting order status");
        let resp = self
            .http
            .post(&self.order_url)
            .bearer_auth(self.token.as_str())
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .json(&order_status_payload(order_number, self.id_type))
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(api_error(resp).await);
        }

        let body = resp.text().await?;
        if is_not_found(&body) {
            return Ok(OrderDocument::NotFound);
        }
        Ok(OrderDocument::Found(body))
    }
}
