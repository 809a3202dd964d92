pub mod lookup;
pub mod matcher;
pub mod parser;
pub mod tracker;

pub use matcher::{format_delivery_date, resolve};
pub use parser::{parse, parse_value};
pub use tracker::{DeliveryTracker, RowOutcome};
