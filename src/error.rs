use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the tracker and its collaborators.
///
/// Only [`Error::Structure`] and [`Error::Json`] come out of the core parser.
/// Everything a row can recover from (missing leaves, unmatched lines, bad dates)
/// is a [`crate::models::Sentinel`] value instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("order document is missing required node `{0}`")]
    Structure(&'static str),

    #[error("invalid order document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CCW API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("token response did not contain an access token")]
    MissingToken,

    #[error("missing credential `{0}`")]
    MissingCredential(&'static str),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("sheet `{sheet}` is missing mandatory column `{column}`")]
    MissingColumn { sheet: String, column: String },

    #[error("workbook path {0:?} is not usable for the configured sheet mode")]
    InvalidSheetPath(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
