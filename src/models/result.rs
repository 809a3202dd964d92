use super::order::FieldValue;
use super::query::{FieldName, FieldSet, MatchQuery};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Reserved values written in place of data that could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    NoData,
    SkuNotFound,
    OrderNotFound,
    MissingData,
    InvalidDate,
}

impl Sentinel {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentinel::NoData => "No Data",
            Sentinel::SkuNotFound => "SKU/SS Not Found",
            Sentinel::OrderNotFound => "Order Not Found",
            Sentinel::MissingData => "Missing Data",
            Sentinel::InvalidDate => "Invalid Date",
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Sentinel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Query-level outcome of a resolution, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStatus {
    MissingData,
    OrderNotFound,
    SkuNotFound,
    Matched,
}

impl MatchStatus {
    /// The sentinel every tracked field takes for this status, if any.
    pub fn sentinel(self) -> Option<Sentinel> {
        match self {
            MatchStatus::MissingData => Some(Sentinel::MissingData),
            MatchStatus::OrderNotFound => Some(Sentinel::OrderNotFound),
            MatchStatus::SkuNotFound => Some(Sentinel::SkuNotFound),
            MatchStatus::Matched => None,
        }
    }
}

/// One resolved row: the query it answers and a value per tracked field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub query: MatchQuery,
    pub status: MatchStatus,
    pub fields: IndexMap<FieldName, FieldValue>,
}

impl MatchResult {
    /// Result where every tracked field carries the status sentinel.
    pub(crate) fn uniform(query: &MatchQuery, fields: &FieldSet, status: MatchStatus) -> Self {
        let value = status
            .sentinel()
            .map(FieldValue::Sentinel)
            .unwrap_or(FieldValue::Sentinel(Sentinel::NoData));
        Self {
            query: query.clone(),
            status,
            fields: fields.iter().map(|&name| (name, value.clone())).collect(),
        }
    }

    pub fn get(&self, name: FieldName) -> Option<&FieldValue> {
        self.fields.get(&name)
    }
}

/// Counters for one tracker run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackStats {
    pub rows: usize,
    pub matched: usize,
    pub sku_not_found: usize,
    pub order_not_found: usize,
    pub missing_data: usize,
    pub failed: usize,
}

impl TrackStats {
    /// Counts one row; `None` means the row failed before a result existed.
    pub fn record(&mut self, status: Option<MatchStatus>) {
        self.rows += 1;
        match status {
            Some(MatchStatus::Matched) => self.matched += 1,
            Some(MatchStatus::SkuNotFound) => self.sku_not_found += 1,
            Some(MatchStatus::OrderNotFound) => self.order_not_found += 1,
            Some(MatchStatus::MissingData) => self.missing_data += 1,
            None => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: &TrackStats) {
        self.rows += other.rows;
        self.matched += other.matched;
        self.sku_not_found += other.sku_not_found;
        self.order_not_found += other.order_not_found;
        self.missing_data += other.missing_data;
        self.failed += other.failed;
    }
}
