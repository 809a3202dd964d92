use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which record a tracked field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Header,
    Line,
}

/// A field that can be tracked into the workbook.
///
/// Names are the camelCase attribute names. The lowercase names used by older
/// tracker configs (`billtoparty`, `salesordernum`, `line`, ...) are accepted as
/// aliases when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum FieldName {
    BillToParty,
    Party,
    Status,
    SalesOrderNumber,
    ShipToParty,
    TotalAmount,
    CurrencyCode,
    Sku,
    Description,
    Quantity,
    LineNumber,
    Amount,
    DeliveryDate,
    ShipSetNumber,
}

impl FieldName {
    pub const ALL: [FieldName; 14] = [
        FieldName::BillToParty,
        FieldName::Party,
        FieldName::Status,
        FieldName::SalesOrderNumber,
        FieldName::ShipToParty,
        FieldName::TotalAmount,
        FieldName::CurrencyCode,
        FieldName::Sku,
        FieldName::Description,
        FieldName::Quantity,
        FieldName::LineNumber,
        FieldName::Amount,
        FieldName::DeliveryDate,
        FieldName::ShipSetNumber,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::BillToParty => "billToParty",
            FieldName::Party => "party",
            FieldName::Status => "status",
            FieldName::SalesOrderNumber => "salesOrderNumber",
            FieldName::ShipToParty => "shipToParty",
            FieldName::TotalAmount => "totalAmount",
            FieldName::CurrencyCode => "currencyCode",
            FieldName::Sku => "sku",
            FieldName::Description => "description",
            FieldName::Quantity => "quantity",
            FieldName::LineNumber => "lineNumber",
            FieldName::Amount => "amount",
            FieldName::DeliveryDate => "deliveryDate",
            FieldName::ShipSetNumber => "shipSetNumber",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let alias = match name {
            "billtoparty" => Some(FieldName::BillToParty),
            "salesordernum" => Some(FieldName::SalesOrderNumber),
            "shiptoparty" => Some(FieldName::ShipToParty),
            "currencycode" => Some(FieldName::CurrencyCode),
            "line" => Some(FieldName::LineNumber),
            _ => None,
        };
        alias.or_else(|| Self::ALL.into_iter().find(|f| f.as_str() == name))
    }

    pub fn source(self) -> FieldSource {
        match self {
            FieldName::BillToParty
            | FieldName::Party
            | FieldName::Status
            | FieldName::SalesOrderNumber
            | FieldName::ShipToParty
            | FieldName::TotalAmount
            | FieldName::CurrencyCode => FieldSource::Header,
            FieldName::Sku
            | FieldName::Description
            | FieldName::Quantity
            | FieldName::LineNumber
            | FieldName::Amount
            | FieldName::DeliveryDate
            | FieldName::ShipSetNumber => FieldSource::Line,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for FieldName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FieldName::from_name(value.trim()).ok_or_else(|| format!("unknown field `{value}`"))
    }
}

impl From<FieldName> for &'static str {
    fn from(value: FieldName) -> Self {
        value.as_str()
    }
}

/// Ordered, de-duplicated set of fields to track.
pub type FieldSet = IndexSet<FieldName>;

/// One (order, ship-set, SKU) lookup. All keys are trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    pub order_number: String,
    pub ship_set_number: String,
    pub sku: String,
}

impl MatchQuery {
    pub fn new(
        order_number: impl Into<String>,
        ship_set_number: impl Into<String>,
        sku: impl Into<String>,
    ) -> Self {
        Self {
            order_number: order_number.into().trim().to_string(),
            ship_set_number: ship_set_number.into().trim().to_string(),
            sku: sku.into().trim().to_string(),
        }
    }

    /// True when any key is empty; such queries are never sent upstream.
    pub fn has_missing_keys(&self) -> bool {
        [&self.order_number, &self.ship_set_number, &self.sku]
            .iter()
            .any(|key| key.trim().is_empty())
    }
}
