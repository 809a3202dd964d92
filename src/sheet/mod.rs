pub mod rows;
pub mod workbook;
pub mod writer;

pub use rows::{collect_rows, SheetRow};
pub use workbook::{load_sheets, Sheet};
pub use writer::{history_column_name, write_results, OutputPlan};

use serde::{Deserialize, Serialize};

/// How orders are laid out in the workbook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SheetMode {
    /// One sheet with an order-number column.
    #[default]
    SingleSheet,
    /// A directory of sheets, each named after its order number.
    SheetPerOrder,
}

impl SheetMode {
    /// Count of leading mandatory columns (order, ship set, SKU).
    pub fn mandatory_columns(self) -> usize {
        match self {
            SheetMode::SingleSheet => 3,
            SheetMode::SheetPerOrder => 2,
        }
    }
}
