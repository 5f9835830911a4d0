use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no {table} row with id {id}")]
    RowNotFound { table: &'static str, id: Uuid },
    #[error("update of order {0} rejected")]
    Rejected(Uuid),
    #[error("store unavailable")]
    Unavailable,
}
