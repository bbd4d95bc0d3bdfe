//! Loader: the single outbound request for the user collection
//!
//! The fetch runs on its own tokio task and reports back over a oneshot
//! channel, so the event loop that owns the UI state stays the only writer
//! of the source collection. There is no retry, polling or timeout; if the
//! receiver is gone by the time the request settles the result is dropped.

use super::User;
use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::oneshot;

/// Default endpoint for the user collection
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// Everything that can go wrong while loading users
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-2xx status
    #[error("Network response was not ok ({0})")]
    Status(StatusCode),

    /// Connection, TLS or body transfer failure
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not a JSON array of users
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Message shown in place of the table
    pub fn display_message(&self) -> String {
        format!("Error fetching users: {}", self)
    }
}

pub type FetchResult = Result<Vec<User>, FetchError>;

/// Loading lifecycle of the table
///
/// Starts in `Loading` and settles exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    /// Settled state for a fetch outcome, plus the source collection to show
    ///
    /// A failure yields an empty collection and the display message.
    pub fn from_result(result: FetchResult) -> (Self, Vec<User>) {
        match result {
            Ok(users) => (LoadState::Loaded, users),
            Err(e) => (LoadState::Failed(e.display_message()), Vec::new()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// HTTP client bound to one endpoint
#[derive(Debug, Clone)]
pub struct UserClient {
    http: reqwest::Client,
    endpoint: String,
}

impl UserClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// GET the endpoint and decode the user array
    pub async fn fetch_users(&self) -> FetchResult {
        tracing::debug!("Fetching users from {}", self.endpoint);

        let response = self.http.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let users: Vec<User> = serde_json::from_slice(&body)?;
        Ok(users)
    }
}

/// Run the fetch in the background and hand back the receiving end
pub fn spawn_fetch(client: UserClient) -> oneshot::Receiver<FetchResult> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = client.fetch_users().await;
        match &result {
            Ok(users) => tracing::info!("Loaded {} users", users.len()),
            Err(e) => tracing::error!("Failed to load users: {}", e),
        }

        if tx.send(result).is_err() {
            tracing::debug!("User fetch settled after the receiver was dropped");
        }
    });

    rx
}
