use thiserror::Error;

/// Every way a call to the remote store can fail. Callers in the catalog
/// treat all of these as "degrade to the local mirror".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("malformed response from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },

    #[error("store rejected request to {endpoint}: {message}")]
    Rejected { endpoint: String, message: String },

    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn malformed(endpoint: &str, message: impl ToString) -> Self {
        StoreError::Malformed {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }

    pub fn rejected(endpoint: &str, message: impl ToString) -> Self {
        StoreError::Rejected {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }
}
