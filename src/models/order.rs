use super::query::FieldName;
use super::result::Sentinel;
use bigdecimal::BigDecimal;
use serde::Serialize;
use std::fmt;

/// A single extracted value, or the sentinel that replaced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Decimal(BigDecimal),
    Sentinel(Sentinel),
}

impl FieldValue {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, FieldValue::Sentinel(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Decimal(d) => write!(f, "{d}"),
            FieldValue::Sentinel(s) => f.write_str(s.as_str()),
        }
    }
}

impl From<Sentinel> for FieldValue {
    fn from(value: Sentinel) -> Self {
        FieldValue::Sentinel(value)
    }
}

/// Order-level attributes (PurchaseOrderHeader).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHeader {
    pub bill_to_party: FieldValue,
    pub party: FieldValue,
    pub status: FieldValue,
    pub sales_order_number: FieldValue,
    pub ship_to_party: FieldValue,
    pub total_amount: FieldValue,
    pub currency_code: FieldValue,
}

impl OrderHeader {
    /// Header attribute behind `name`; `None` for line attributes.
    pub fn field(&self, name: FieldName) -> Option<&FieldValue> {
        match name {
            FieldName::BillToParty => Some(&self.bill_to_party),
            FieldName::Party => Some(&self.party),
            FieldName::Status => Some(&self.status),
            FieldName::SalesOrderNumber => Some(&self.sales_order_number),
            FieldName::ShipToParty => Some(&self.ship_to_party),
            FieldName::TotalAmount => Some(&self.total_amount),
            FieldName::CurrencyCode => Some(&self.currency_code),
            _ => None,
        }
    }
}

/// One PurchaseOrderLine entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub sku: FieldValue,
    pub description: FieldValue,
    pub quantity: FieldValue,
    pub line_number: FieldValue,
    pub amount: FieldValue,
    pub delivery_date: FieldValue,
    pub ship_set_number: FieldValue,
}

impl OrderLine {
    /// Line attribute behind `name`; `None` for header attributes.
    pub fn field(&self, name: FieldName) -> Option<&FieldValue> {
        match name {
            FieldName::Sku => Some(&self.sku),
            FieldName::Description => Some(&self.description),
            FieldName::Quantity => Some(&self.quantity),
            FieldName::LineNumber => Some(&self.line_number),
            FieldName::Amount => Some(&self.amount),
            FieldName::DeliveryDate => Some(&self.delivery_date),
            FieldName::ShipSetNumber => Some(&self.ship_set_number),
            _ => None,
        }
    }
}

/// Header plus lines in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedOrder {
    pub header: OrderHeader,
    pub lines: Vec<OrderLine>,
}
