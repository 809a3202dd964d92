pub mod order;
pub mod query;
pub mod result;

pub use order::{FieldValue, OrderHeader, OrderLine, ParsedOrder};
pub use query::{FieldName, FieldSet, FieldSource, MatchQuery};
pub use result::{MatchResult, MatchStatus, Sentinel, TrackStats};
