use super::Sheet;
use crate::config::WorkbookConfig;
use crate::models::FieldName;
use crate::service::tracker::RowOutcome;
use chrono::NaiveDate;

/// Name of the dated column that keeps one day's history of a field.
pub fn history_column_name(column: &str, date: NaiveDate) -> String {
    format!("{column}: {}", date.format("%m.%d.%Y"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedColumn {
    field: FieldName,
    column: String,
    dated: bool,
}

/// Where each tracked field is written for one run.
#[derive(Debug, Clone)]
pub struct OutputPlan {
    columns: Vec<PlannedColumn>,
    mandatory: usize,
}

impl OutputPlan {
    /// With history enabled, the history field goes to a column stamped with `today`.
    pub fn new(cfg: &WorkbookConfig, today: NaiveDate) -> Self {
        let history = cfg.keep_history.then_some(cfg.history_field);
        let columns = cfg
            .fields
            .iter()
            .map(|tracked| {
                let dated = history == Some(tracked.field);
                PlannedColumn {
                    field: tracked.field,
                    column: if dated {
                        history_column_name(&tracked.column, today)
                    } else {
                        tracked.column.clone()
                    },
                    dated,
                }
            })
            .collect();
        Self {
            columns,
            mandatory: cfg.mode.mandatory_columns(),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.columns.iter().map(|c| (c.field, c.column.as_str()))
    }
}

/// Writes each outcome into its row.
///
/// A new dated column is inserted right after the mandatory and tracked
/// columns, ahead of older history, once the sheet already has that many
/// columns. Otherwise columns are reused by name or appended. Failed rows are
/// left untouched.
pub fn write_results(sheet: &mut Sheet, plan: &OutputPlan, outcomes: &[RowOutcome]) {
    let fixed = plan.mandatory + plan.columns.len();
    for planned in &plan.columns {
        if sheet.column_index(&planned.column).is_some() {
            continue;
        }
        if planned.dated && sheet.headers().len() >= fixed {
            sheet.insert_column(fixed - 1, planned.column.as_str());
        } else {
            sheet.ensure_column(&planned.column);
        }
    }

    // resolve indexes only after every insert has shifted the layout
    let targets: Vec<(FieldName, usize)> = plan
        .columns
        .iter()
        .filter_map(|p| sheet.column_index(&p.column).map(|i| (p.field, i)))
        .collect();

    for outcome in outcomes {
        let Ok(result) = &outcome.result else {
            continue;
        };
        for &(field, col) in &targets {
            if let Some(value) = result.get(field) {
                sheet.set_cell(outcome.row, col, value.to_string());
            }
        }
    }
}
