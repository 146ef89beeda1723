use thiserror::Error;

/// A whole source failed for this pass. The scan logs it and continues with
/// the remaining sources.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not locate listing data in response: {0}")]
    MissingData(&'static str),

    #[error("response body was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One listing in an otherwise good response could not be read. The adapter
/// logs it and skips the listing.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("listing JSON did not match the expected shape: {0}")]
    Json(#[from] serde_json::Error),

    #[error("listing is missing required field `{0}`")]
    MissingField(&'static str),
}

/// The dedup store is unusable. Fatal to the pass: notifying without durable
/// dedup state risks duplicate alerts on every later run.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not open listings database at {path}: {source}")]
    Open {
        path: String,
        source: diesel::ConnectionError,
    },

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
}

/// Telegram delivery failed for one listing. Logged; the rest of the batch
/// still goes out and the listing is still recorded as seen.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("telegram send failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("delivery failed for all {0} configured chats")]
    AllChatsFailed(usize),
}
