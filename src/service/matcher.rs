use crate::models::{
    FieldName, FieldSet, FieldValue, MatchQuery, MatchResult, MatchStatus, OrderHeader, OrderLine,
    ParsedOrder, Sentinel,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
];
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Resolves one query against a parsed order.
///
/// `order` is `None` when the order API reported the order as not found.
/// Precedence is fixed: missing query keys, then a missing order, then an
/// unmatched line, then per-field fallbacks.
pub fn resolve(order: Option<&ParsedOrder>, query: &MatchQuery, fields: &FieldSet) -> MatchResult {
    if query.has_missing_keys() {
        return MatchResult::uniform(query, fields, MatchStatus::MissingData);
    }
    let Some(order) = order else {
        return MatchResult::uniform(query, fields, MatchStatus::OrderNotFound);
    };

    let line = find_line(&order.lines, query);
    let status = match line {
        Some(_) => MatchStatus::Matched,
        None => MatchStatus::SkuNotFound,
    };

    MatchResult {
        query: query.clone(),
        status,
        fields: fields
            .iter()
            .map(|&name| (name, resolve_field(name, &order.header, line)))
            .collect(),
    }
}

/// First line whose SKU and ship set both exist and equal the query's.
pub fn find_line<'a>(lines: &'a [OrderLine], query: &MatchQuery) -> Option<&'a OrderLine> {
    lines.iter().find(|line| {
        let (Some(sku), Some(ship_set)) = (line.sku.as_text(), line.ship_set_number.as_text()) else {
            return false;
        };
        sku.trim() == query.sku && ship_set == query.ship_set_number
    })
}

fn resolve_field(name: FieldName, header: &OrderHeader, line: Option<&OrderLine>) -> FieldValue {
    let Some(line) = line else {
        return Sentinel::SkuNotFound.into();
    };
    let value = line
        .field(name)
        .or_else(|| header.field(name))
        .cloned()
        .unwrap_or(FieldValue::Sentinel(Sentinel::NoData));

    match name {
        FieldName::DeliveryDate => format_delivery_value(value),
        _ => value,
    }
}

fn format_delivery_value(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Sentinel(_) => value,
        FieldValue::Text(raw) => format_delivery_date(&raw)
            .map(FieldValue::Text)
            .unwrap_or(FieldValue::Sentinel(Sentinel::InvalidDate)),
        _ => FieldValue::Sentinel(Sentinel::InvalidDate),
    }
}

/// Turns `2023-11-05T00:00:00Z` into `11/05/2023`.
///
/// The last character (the zone designator) is dropped before parsing. Times
/// without an offset are taken as UTC.
pub fn format_delivery_date(raw: &str) -> Option<String> {
    let mut chars = raw.chars();
    chars.next_back()?;
    parse_timestamp(chars.as_str()).map(|ts| ts.format("%m/%d/%Y").to_string())
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    parse_exact(s).or_else(|| with_minutes(s).and_then(|padded| parse_exact(&padded)))
}

/// `2023-11-05T08` becomes `2023-11-05T08:00`; chrono needs a minute.
fn with_minutes(s: &str) -> Option<String> {
    let (date, time) = s.split_once('T')?;
    let hour = time.get(..2)?;
    let rest = &time[2..];
    if !hour.bytes().all(|b| b.is_ascii_digit()) || rest.starts_with(':') {
        return None;
    }
    Some(format!("{date}T{hour}:00{rest}"))
}

fn parse_exact(s: &str) -> Option<DateTime<Utc>> {
    let with_offset = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .map(|ts| ts.with_timezone(&Utc));
    if with_offset.is_some() {
        return with_offset;
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn no_data() -> FieldValue {
        FieldValue::Sentinel(Sentinel::NoData)
    }

    fn header() -> OrderHeader {
        OrderHeader {
            bill_to_party: text("Reseller Inc"),
            party: text("End Customer"),
            status: text("BOOKED"),
            sales_order_number: text("SO1"),
            ship_to_party: text("Warehouse 4"),
            total_amount: no_data(),
            currency_code: text("USD"),
        }
    }

    fn line(sku: FieldValue, ship_set: FieldValue, date: &str, number: &str) -> OrderLine {
        OrderLine {
            sku,
            description: text("switch"),
            quantity: FieldValue::Number(2.into()),
            line_number: text(number),
            amount: no_data(),
            delivery_date: text(date),
            ship_set_number: ship_set,
        }
    }

    fn order(lines: Vec<OrderLine>) -> ParsedOrder {
        ParsedOrder { header: header(), lines }
    }

    fn fields(names: &[FieldName]) -> FieldSet {
        names.iter().copied().collect()
    }

    #[test]
    fn formats_zulu_timestamp() {
        assert_eq!(format_delivery_date("2023-11-05T00:00:00Z").as_deref(), Some("11/05/2023"));
        assert_eq!(format_delivery_date("2023-11-05T08:30:00.250Z").as_deref(), Some("11/05/2023"));
        assert_eq!(format_delivery_date("2023-11-05Z").as_deref(), Some("11/05/2023"));
    }

    #[test]
    fn offsets_are_converted_to_utc() {
        assert_eq!(format_delivery_date("2023-11-05T23:00:00-05:00Z").as_deref(), Some("11/06/2023"));
    }

    #[test]
    fn hour_only_times_are_accepted() {
        assert_eq!(format_delivery_date("2023-11-05T08Z").as_deref(), Some("11/05/2023"));
        assert_eq!(format_delivery_date("2023-11-05T23-05:00Z").as_deref(), Some("11/06/2023"));
        assert_eq!(format_delivery_date("2023-11-05TxxZ"), None);
    }

    #[test]
    fn malformed_dates_are_rejected() {
        assert_eq!(format_delivery_date("not-a-date"), None);
        assert_eq!(format_delivery_date(""), None);
        assert_eq!(format_delivery_date("2023-13-40T00:00:00Z"), None);
    }

    #[test]
    fn malformed_delivery_date_resolves_to_invalid_date() {
        let order = order(vec![line(text("ABC123"), text("1"), "not-a-date", "1.0")]);
        let query = MatchQuery::new("SO1", "1", "ABC123");
        let result = resolve(Some(&order), &query, &fields(&[FieldName::DeliveryDate]));
        assert_eq!(result.get(FieldName::DeliveryDate), Some(&FieldValue::Sentinel(Sentinel::InvalidDate)));
        assert_eq!(result.status, MatchStatus::Matched);
    }

    #[test]
    fn missing_keys_take_priority_over_a_match() {
        let order = order(vec![line(text("ABC123"), text("1"), "2024-01-10T00:00:00Z", "1.0")]);
        for query in [
            MatchQuery::new("SO1", "", "ABC123"),
            MatchQuery::new("SO1", "1", ""),
            MatchQuery::new("", "1", "ABC123"),
        ] {
            let result = resolve(Some(&order), &query, &fields(&[FieldName::DeliveryDate, FieldName::Status]));
            assert_eq!(result.status, MatchStatus::MissingData);
            assert!(result
                .fields
                .values()
                .all(|v| *v == FieldValue::Sentinel(Sentinel::MissingData)));
        }
    }

    #[test]
    fn absent_order_resolves_to_order_not_found() {
        let query = MatchQuery::new("SO1", "1", "ABC123");
        let result = resolve(None, &query, &fields(&[FieldName::DeliveryDate]));
        assert_eq!(result.status, MatchStatus::OrderNotFound);
        assert_eq!(result.get(FieldName::DeliveryDate), Some(&FieldValue::Sentinel(Sentinel::OrderNotFound)));
    }

    #[test]
    fn first_matching_line_wins() {
        let order = order(vec![
            line(text("ABC123"), text("2"), "2024-03-01T00:00:00Z", "1.0"),
            line(text("ABC123"), text("1"), "2024-01-10T00:00:00Z", "2.0"),
            line(text("ABC123"), text("1"), "2024-02-20T00:00:00Z", "3.0"),
        ]);
        let query = MatchQuery::new("SO1", "1", "ABC123");
        let result = resolve(Some(&order), &query, &fields(&[FieldName::LineNumber, FieldName::DeliveryDate]));
        assert_eq!(result.get(FieldName::LineNumber), Some(&text("2.0")));
        assert_eq!(result.get(FieldName::DeliveryDate), Some(&text("01/10/2024")));
    }

    #[test]
    fn lines_without_sku_or_ship_set_are_skipped() {
        let order = order(vec![
            line(no_data(), text("1"), "2024-03-01T00:00:00Z", "1.0"),
            line(text("ABC123"), no_data(), "2024-03-02T00:00:00Z", "2.0"),
        ]);
        let query = MatchQuery::new("SO1", "1", "ABC123");
        assert!(find_line(&order.lines, &query).is_none());

        let result = resolve(Some(&order), &query, &fields(&[FieldName::DeliveryDate]));
        assert_eq!(result.status, MatchStatus::SkuNotFound);
        assert_eq!(result.get(FieldName::DeliveryDate), Some(&FieldValue::Sentinel(Sentinel::SkuNotFound)));
    }

    #[test]
    fn line_sku_is_trimmed_but_ship_set_is_not() {
        let padded_sku = order(vec![line(text(" ABC123 "), text("1"), "2024-01-10T00:00:00Z", "1.0")]);
        let padded_set = order(vec![line(text("ABC123"), text(" 1"), "2024-01-10T00:00:00Z", "1.0")]);
        let query = MatchQuery::new("SO1", " 1 ", "ABC123");
        assert!(find_line(&padded_sku.lines, &query).is_some());
        assert!(find_line(&padded_set.lines, &query).is_none());
    }

    #[test]
    fn header_and_line_fields_merge_on_match() {
        let order = order(vec![line(text("ABC123"), text("1"), "2024-01-10T00:00:00Z", "1.0")]);
        let query = MatchQuery::new("SO1", "1", "ABC123");
        let tracked = fields(&[FieldName::Status, FieldName::Quantity, FieldName::TotalAmount]);
        let result = resolve(Some(&order), &query, &tracked);

        let keys: Vec<_> = result.fields.keys().copied().collect();
        assert_eq!(keys, [FieldName::Status, FieldName::Quantity, FieldName::TotalAmount]);
        assert_eq!(result.get(FieldName::Status), Some(&text("BOOKED")));
        assert_eq!(result.get(FieldName::Quantity), Some(&FieldValue::Number(2.into())));
        assert_eq!(result.get(FieldName::TotalAmount), Some(&no_data()));
    }

    #[test]
    fn unmatched_line_overrides_header_fields() {
        let order = order(vec![line(text("ABC123"), text("1"), "2024-01-10T00:00:00Z", "1.0")]);
        let query = MatchQuery::new("SO1", "1", "ZZZ");
        let result = resolve(Some(&order), &query, &fields(&[FieldName::Status]));
        assert_eq!(result.get(FieldName::Status), Some(&FieldValue::Sentinel(Sentinel::SkuNotFound)));
    }

    #[test]
    fn missing_delivery_date_stays_no_data() {
        let mut bare = line(text("ABC123"), text("1"), "", "1.0");
        bare.delivery_date = no_data();
        let order = order(vec![bare]);
        let query = MatchQuery::new("SO1", "1", "ABC123");
        let result = resolve(Some(&order), &query, &fields(&[FieldName::DeliveryDate]));
        assert_eq!(result.get(FieldName::DeliveryDate), Some(&no_data()));
    }

    #[test]
    fn resolve_is_deterministic() {
        let order = order(vec![
            line(text("ABC123"), text("1"), "2024-01-10T00:00:00Z", "1.0"),
            line(text("XYZ"), text("2"), "bogus", "2.0"),
        ]);
        let tracked = fields(&FieldName::ALL);
        for query in [MatchQuery::new("SO1", "1", "ABC123"), MatchQuery::new("SO1", "2", "XYZ")] {
            assert_eq!(resolve(Some(&order), &query, &tracked), resolve(Some(&order), &query, &tracked));
        }
    }
}
