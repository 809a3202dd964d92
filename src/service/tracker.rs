use super::{matcher, parser};
use crate::client::{CcwClient, OrderDocument, OrderSource};
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{FieldSet, MatchQuery, MatchResult, MatchStatus, ParsedOrder, TrackStats};
use crate::sheet::{self, OutputPlan, SheetRow};
use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

/// Result of one workbook row. An `Err` means the retrieved order document was
/// unreadable or structurally broken.
#[derive(Debug)]
pub struct RowOutcome {
    pub row: usize,
    pub result: Result<MatchResult>,
}

impl RowOutcome {
    pub fn status(&self) -> Option<MatchStatus> {
        self.result.as_ref().ok().map(|r| r.status)
    }
}

impl TrackStats {
    pub fn from_outcomes(outcomes: &[RowOutcome]) -> Self {
        let mut stats = TrackStats::default();
        for outcome in outcomes {
            stats.record(outcome.status());
        }
        stats
    }
}

/// Resolves workbook rows against an order source, `workers` rows at a time.
pub struct DeliveryTracker<S> {
    source: S,
    fields: FieldSet,
    workers: usize,
}

impl<S: OrderSource> DeliveryTracker<S> {
    pub fn new(source: S, fields: FieldSet, workers: usize) -> Self {
        Self {
            source,
            fields,
            workers: workers.max(1),
        }
    }

    /// Processes all rows concurrently. Outcomes are returned in row order.
    pub async fn track(&self, rows: Vec<SheetRow>) -> Vec<RowOutcome> {
        let mut outcomes: Vec<RowOutcome> = stream::iter(rows)
            .map(|row| self.track_row(row))
            .buffer_unordered(self.workers)
            .collect()
            .await;
        outcomes.sort_by_key(|o| o.row);
        outcomes
    }

    async fn track_row(&self, row: SheetRow) -> RowOutcome {
        let query = MatchQuery::new(row.order_number, row.ship_set, row.sku);
        let result = self
            .fetch(&query)
            .await
            .map(|order| matcher::resolve(order.as_ref(), &query, &self.fields));

        match &result {
            Ok(resolved) => log_result(row.index, resolved),
            Err(e) => error!(
                row = row.index,
                order = %query.order_number,
                sku = %query.sku,
                "row failed: {}", e
            ),
        }
        RowOutcome {
            row: row.index,
            result,
        }
    }

    /// `Ok(None)` when the order is unknown upstream, could not be retrieved,
    /// or when the query is incomplete and never sent.
    async fn fetch(&self, query: &MatchQuery) -> Result<Option<ParsedOrder>> {
        if query.has_missing_keys() {
            return Ok(None);
        }
        match self.source.fetch_order(&query.order_number).await {
            Ok(OrderDocument::Found(raw)) => parser::parse(&raw).map(Some),
            Ok(OrderDocument::NotFound) => Ok(None),
            Err(e) => {
                error!(order = %query.order_number, "order retrieval failed: {}", e);
                Ok(None)
            }
        }
    }
}

fn log_result(row: usize, result: &MatchResult) {
    let order = &result.query.order_number;
    let sku = &result.query.sku;
    match result.status {
        MatchStatus::MissingData => info!(row, "skipping row with missing order, ship set or SKU"),
        MatchStatus::OrderNotFound => warn!(row, order = %order, sku = %sku, "Order Not Found"),
        MatchStatus::SkuNotFound => warn!(row, order = %order, sku = %sku, "SKU/SS Not Found in order"),
        MatchStatus::Matched => {
            let values: Vec<String> = result
                .fields
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            info!(row, order = %order, sku = %sku, "found {}", values.join(", "));
        }
    }
}

/// Full batch run: token, every configured sheet, write-back.
///
/// A sheet lacking its mandatory columns is skipped; the others still run.
pub async fn run(config: &AppConfig) -> Result<TrackStats> {
    let client = CcwClient::connect(&config.ccw).await?;
    info!("obtained CCW access token");

    let fields = config.workbook.field_set();
    let tracker = DeliveryTracker::new(client, fields, config.workers);
    let plan = OutputPlan::new(&config.workbook, chrono::Local::now().date_naive());

    let mut total = TrackStats::default();
    for (path, mut sheet) in sheet::load_sheets(&config.workbook)? {
        let rows = match sheet::collect_rows(&sheet, &config.workbook) {
            Ok(rows) => rows,
            Err(e) => {
                error!(sheet = %sheet.name(), "{}", e);
                continue;
            }
        };
        info!(sheet = %sheet.name(), rows = rows.len(), "processing sheet");

        let outcomes = tracker.track(rows).await;
        sheet::write_results(&mut sheet, &plan, &outcomes);
        sheet.save(&path)?;

        let stats = TrackStats::from_outcomes(&outcomes);
        info!(sheet = %sheet.name(), ?stats, "sheet saved");
        total.merge(&stats);
    }

    info!(
        "tracking complete: rows {}, matched {}, SKU/SS not found {}, order not found {}, missing data {}, failed {}",
        total.rows,
        total.matched,
        total.sku_not_found,
        total.order_not_found,
        total.missing_data,
        total.failed
    );
    Ok(total)
}
