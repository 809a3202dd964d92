use crate::client::OrderIdType;
use crate::error::Result;
use crate::models::{FieldName, FieldSet};
use crate::sheet::SheetMode;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Application configuration.
///
/// Layers, lowest first: built-in defaults, `tracker.toml` (or the file named
/// by `TRACKER_CONFIG`), then `TRACKER_*` environment variables using `__` as
/// the section separator, e.g. `TRACKER_CCW__CLIENT_ID`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ccw: CcwConfig,
    pub workbook: WorkbookConfig,
    /// Rows processed concurrently.
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CcwConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub order_url: String,
    pub order_id_type: OrderIdType,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookConfig {
    pub path: PathBuf,
    pub mode: SheetMode,
    pub order_column: String,
    pub ship_set_column: String,
    pub sku_column: String,
    /// Tracked fields and the column each is written to, in column order.
    pub fields: Vec<TrackedColumn>,
    pub keep_history: bool,
    pub history_field: FieldName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedColumn {
    pub field: FieldName,
    pub column: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            ccw: CcwConfig::default(),
            workbook: WorkbookConfig::default(),
            workers: 10,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for CcwConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            token_url: "https://id.cisco.com/oauth2/default/v1/token".to_string(),
            order_url: "https://apix.cisco.com/commerce/ORDER/v2/sync/checkOrderStatus".to_string(),
            order_id_type: OrderIdType::default(),
            timeout_secs: 30,
        }
    }
}

// keeps the secret out of startup logs
impl fmt::Debug for CcwConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CcwConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("token_url", &self.token_url)
            .field("order_url", &self.order_url)
            .field("order_id_type", &self.order_id_type)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("delivery_dates.csv"),
            mode: SheetMode::default(),
            order_column: "Sales Order".to_string(),
            ship_set_column: "Ship Set Number".to_string(),
            sku_column: "SKU".to_string(),
            fields: vec![TrackedColumn {
                field: FieldName::DeliveryDate,
                column: "Delivery Date".to_string(),
            }],
            keep_history: true,
            history_field: FieldName::DeliveryDate,
        }
    }
}

impl WorkbookConfig {
    /// Tracked fields in declaration order.
    pub fn field_set(&self) -> FieldSet {
        self.fields.iter().map(|c| c.field).collect()
    }
}

impl AppConfig {
    /// Loads defaults, the optional config file and `TRACKER_*` env overrides.
    pub fn load() -> Result<Self> {
        let file = std::env::var("TRACKER_CONFIG").unwrap_or_else(|_| "tracker".to_string());
        let settings = Config::builder()
            .add_source(File::with_name(&file).required(false))
            .add_source(
                Environment::with_prefix("TRACKER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
