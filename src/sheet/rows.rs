use super::{Sheet, SheetMode};
use crate::config::WorkbookConfig;
use crate::error::{Error, Result};

/// Lookup keys read from one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// Zero-based data row index (header excluded).
    pub index: usize,
    pub order_number: String,
    pub ship_set: String,
    pub sku: String,
}

/// Reads the lookup keys of every data row.
///
/// In [`SheetMode::SheetPerOrder`] the order number is the sheet name.
pub fn collect_rows(sheet: &Sheet, cfg: &WorkbookConfig) -> Result<Vec<SheetRow>> {
    let order_col = match cfg.mode {
        SheetMode::SingleSheet => Some(require(sheet, &cfg.order_column)?),
        SheetMode::SheetPerOrder => None,
    };
    let ship_set_col = require(sheet, &cfg.ship_set_column)?;
    let sku_col = require(sheet, &cfg.sku_column)?;

    Ok((0..sheet.row_count())
        .map(|index| SheetRow {
            index,
            order_number: match order_col {
                Some(col) => sheet.cell(index, col).to_string(),
                None => sheet.name().to_string(),
            },
            ship_set: sheet.cell(index, ship_set_col).to_string(),
            sku: sheet.cell(index, sku_col).to_string(),
        })
        .collect())
}

fn require(sheet: &Sheet, column: &str) -> Result<usize> {
    sheet.column_index(column).ok_or_else(|| Error::MissingColumn {
        sheet: sheet.name().to_string(),
        column: column.to_string(),
    })
}
