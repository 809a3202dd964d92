use super::lookup::{lookup, Key};
use crate::error::{Error, Result};
use crate::models::{FieldValue, OrderHeader, OrderLine, ParsedOrder, Sentinel};
use crate::path;
use bigdecimal::BigDecimal;
use serde_json::Value;
use std::str::FromStr;

const PURCHASE_ORDER: [Key<'static>; 5] = [
    Key::Name("ShowPurchaseOrder"),
    Key::Name("value"),
    Key::Name("DataArea"),
    Key::Name("PurchaseOrder"),
    Key::Index(0),
];
const PURCHASE_ORDER_PATH: &str = "ShowPurchaseOrder.value.DataArea.PurchaseOrder[0]";
const HEADER_PATH: &str = "ShowPurchaseOrder.value.DataArea.PurchaseOrder[0].PurchaseOrderHeader";
const LINES_PATH: &str = "ShowPurchaseOrder.value.DataArea.PurchaseOrder[0].PurchaseOrderLine";

/// Parses a raw `checkOrderStatus` response body.
pub fn parse(raw: &str) -> Result<ParsedOrder> {
    let doc: Value = serde_json::from_str(raw)?;
    parse_value(&doc)
}

/// Extracts the header and lines from an already decoded response.
///
/// The purchase order header and line array are required; every field below
/// them degrades to [`Sentinel::NoData`] when absent.
pub fn parse_value(doc: &Value) -> Result<ParsedOrder> {
    let order = lookup(doc, &PURCHASE_ORDER).ok_or(Error::Structure(PURCHASE_ORDER_PATH))?;
    let header = order
        .get("PurchaseOrderHeader")
        .filter(|h| !h.is_null())
        .ok_or(Error::Structure(HEADER_PATH))?;
    let lines = order
        .get("PurchaseOrderLine")
        .and_then(Value::as_array)
        .ok_or(Error::Structure(LINES_PATH))?;

    Ok(ParsedOrder {
        header: parse_header(header),
        lines: lines.iter().map(parse_line).collect(),
    })
}

fn parse_header(header: &Value) -> OrderHeader {
    OrderHeader {
        bill_to_party: text(header, &path!["BillToParty", "Name", 0, "value"]),
        party: text(header, &path!["Party", 0, "Name", 0, "value"]),
        status: text(header, &path!["Status", 0, "Description", "value"]),
        sales_order_number: text(header, &path!["SalesOrderReference", 0, "ID", "value"]),
        ship_to_party: text(header, &path!["ShipToParty", "Name", 0, "value"]),
        total_amount: decimal(header, &path!["TotalAmount", "value"]),
        currency_code: text(header, &path!["TotalAmount", "currencyCode"]),
    }
}

fn parse_line(line: &Value) -> OrderLine {
    OrderLine {
        sku: text(line, &path!["Item", "ID", "value"]),
        description: text(line, &path!["Item", "Description", 0, "value"]),
        quantity: raw(line, &path!["Item", "Lot", 0, "Quantity", "value"]),
        line_number: text(line, &path!["SalesOrderReference", "LineNumberID", "value"]),
        amount: decimal(line, &path!["ExtendedAmount", "value"]),
        delivery_date: text(line, &path!["PromisedDeliveryDateTime"]),
        ship_set_number: text(line, &path!["LineIDSet", 0, "ID", 0, "value"]),
    }
}

fn no_data() -> FieldValue {
    FieldValue::Sentinel(Sentinel::NoData)
}

/// Scalars as text; containers count as absent.
fn text(node: &Value, path: &[Key<'_>]) -> FieldValue {
    match lookup(node, path) {
        Some(Value::String(s)) => FieldValue::Text(s.clone()),
        Some(Value::Number(n)) => FieldValue::Text(n.to_string()),
        Some(Value::Bool(b)) => FieldValue::Text(b.to_string()),
        _ => no_data(),
    }
}

/// Numbers stay numbers, strings stay text.
fn raw(node: &Value, path: &[Key<'_>]) -> FieldValue {
    match lookup(node, path) {
        Some(Value::Number(n)) => FieldValue::Number(n.clone()),
        Some(Value::String(s)) => FieldValue::Text(s.clone()),
        _ => no_data(),
    }
}

fn decimal(node: &Value, path: &[Key<'_>]) -> FieldValue {
    let parsed = match lookup(node, path) {
        Some(Value::Number(n)) => BigDecimal::from_str(&n.to_string()).ok(),
        Some(Value::String(s)) => BigDecimal::from_str(s.trim()).ok(),
        _ => None,
    };
    parsed.map(FieldValue::Decimal).unwrap_or_else(no_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(order: Value) -> Value {
        json!({ "ShowPurchaseOrder": { "value": { "DataArea": { "PurchaseOrder": [order] } } } })
    }

    fn full_line() -> Value {
        json!({
            "Item": {
                "ID": { "value": "C9300-48P-E" },
                "Description": [{ "value": "Catalyst 9300 48-port PoE+" }],
                "Lot": [{ "Quantity": { "value": 4 } }]
            },
            "SalesOrderReference": { "LineNumberID": { "value": "1.1" } },
            "ExtendedAmount": { "value": 1234.5 },
            "PromisedDeliveryDateTime": "2024-01-10T00:00:00Z",
            "LineIDSet": [{ "ID": [{ "value": "1" }] }]
        })
    }

    #[test]
    fn extracts_header_and_lines() {
        let doc = wrap(json!({
            "PurchaseOrderHeader": {
                "BillToParty": { "Name": [{ "value": "Reseller Inc" }] },
                "Party": [{ "Name": [{ "value": "End Customer" }] }],
                "Status": [{ "Description": { "value": "BOOKED" } }],
                "SalesOrderReference": [{ "ID": { "value": 98765432 } }],
                "ShipToParty": { "Name": [{ "value": "Warehouse 4" }] },
                "TotalAmount": { "value": "4938.00", "currencyCode": "USD" }
            },
            "PurchaseOrderLine": [full_line()]
        }));

        let order = parse_value(&doc).unwrap();
        assert_eq!(order.header.bill_to_party, FieldValue::Text("Reseller Inc".into()));
        assert_eq!(order.header.party, FieldValue::Text("End Customer".into()));
        assert_eq!(order.header.status, FieldValue::Text("BOOKED".into()));
        assert_eq!(order.header.sales_order_number, FieldValue::Text("98765432".into()));
        assert_eq!(order.header.total_amount, FieldValue::Decimal(BigDecimal::from_str("4938.00").unwrap()));
        assert_eq!(order.header.currency_code, FieldValue::Text("USD".into()));

        let line = &order.lines[0];
        assert_eq!(line.sku, FieldValue::Text("C9300-48P-E".into()));
        assert_eq!(line.quantity, FieldValue::Number(4.into()));
        assert_eq!(line.line_number, FieldValue::Text("1.1".into()));
        assert_eq!(line.amount, FieldValue::Decimal(BigDecimal::from_str("1234.5").unwrap()));
        assert_eq!(line.delivery_date, FieldValue::Text("2024-01-10T00:00:00Z".into()));
        assert_eq!(line.ship_set_number, FieldValue::Text("1".into()));
    }

    #[test]
    fn absent_leaves_become_no_data() {
        let doc = wrap(json!({
            "PurchaseOrderHeader": { "TotalAmount": { "value": "n/a" } },
            "PurchaseOrderLine": [{ "Item": { "ID": { "value": "ABC" } }, "LineIDSet": [] }]
        }));

        let order = parse_value(&doc).unwrap();
        let none = FieldValue::Sentinel(Sentinel::NoData);
        assert_eq!(order.header.bill_to_party, none);
        assert_eq!(order.header.total_amount, none);
        assert_eq!(order.header.currency_code, none);

        let line = &order.lines[0];
        assert_eq!(line.sku, FieldValue::Text("ABC".into()));
        assert_eq!(line.delivery_date, none);
        assert_eq!(line.ship_set_number, none);
        assert_eq!(line.quantity, none);
    }

    #[test]
    fn keeps_line_order_and_duplicates() {
        let mut second = full_line();
        second["LineIDSet"][0]["ID"][0]["value"] = json!("2");
        let doc = wrap(json!({
            "PurchaseOrderHeader": {},
            "PurchaseOrderLine": [full_line(), second, full_line()]
        }));

        let order = parse_value(&doc).unwrap();
        let sets: Vec<_> = order.lines.iter().map(|l| l.ship_set_number.to_string()).collect();
        assert_eq!(sets, ["1", "2", "1"]);
    }

    #[test]
    fn missing_structure_is_an_error() {
        let no_header = wrap(json!({ "PurchaseOrderLine": [] }));
        assert!(matches!(parse_value(&no_header), Err(Error::Structure(HEADER_PATH))));

        let lines_not_array = wrap(json!({ "PurchaseOrderHeader": {}, "PurchaseOrderLine": {} }));
        assert!(matches!(parse_value(&lines_not_array), Err(Error::Structure(LINES_PATH))));

        let empty_orders = json!({ "ShowPurchaseOrder": { "value": { "DataArea": { "PurchaseOrder": [] } } } });
        assert!(matches!(parse_value(&empty_orders), Err(Error::Structure(PURCHASE_ORDER_PATH))));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(parse("{not json"), Err(Error::Json(_))));
    }
}
