//! Adapter between the orchestrator and the hangman service.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::protocol::{
    ErrorBody, GuessBody, HintBody, InitBody, MoveBody, NewGameBody, NewGameResponseBody,
    StateBody,
};
use crate::{
    ApiError, HintSuggestion, InitReport, Letter, MoveOutcome, RoundMode, RoundStart,
    StateSnapshot,
};

/// Operations the orchestrator needs from the hangman service.
///
/// Every failure, whether transport or service-reported, comes back as an
/// [`ApiError`].
#[async_trait::async_trait]
pub trait HangmanApi: Send + Sync {
    /// Prepares server-side state (word lists, oracle).
    async fn initialize(&self) -> Result<InitReport, ApiError>;

    /// Starts a new round.
    async fn start_round(&self, mode: RoundMode) -> Result<RoundStart, ApiError>;

    /// Submits a player guess.
    async fn submit_guess(&self, letter: Letter) -> Result<MoveOutcome, ApiError>;

    /// Asks the oracle for ranked letter suggestions.
    async fn request_hint(&self) -> Result<Vec<HintSuggestion>, ApiError>;

    /// Lets the oracle pick and play a letter.
    async fn request_ai_move(&self) -> Result<MoveOutcome, ApiError>;

    /// Reads the current round state with guess history.
    async fn fetch_state(&self) -> Result<StateSnapshot, ApiError>;
}

/// HTTP/JSON implementation of [`HangmanApi`].
#[derive(Debug, Clone)]
pub struct HttpHangmanClient {
    /// Base URL of the service, without trailing slash.
    base_url: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl HttpHangmanClient {
    /// Creates a client for the service at `base_url`.
    #[instrument(skip(base_url), fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Created hangman HTTP client");
        Ok(Self { base_url, client })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::decode(path, response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::decode(path, response).await
    }

    /// Turns a response into `T`, or into an [`ApiError`] carrying the
    /// service's `error` text for non-success statuses.
    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        debug!(path, status = %status, body = %text, "Service response");

        if !status.is_success() {
            let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            warn!(path, status = %status, error = ?body.error, "Service reported failure");
            return Err(ApiError::service(status.as_u16(), body.error));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait::async_trait]
impl HangmanApi for HttpHangmanClient {
    #[instrument(skip(self))]
    async fn initialize(&self) -> Result<InitReport, ApiError> {
        info!("Initializing service");
        let body: InitBody = self.post::<(), _>("/api/init", None).await?;
        let report = InitReport::from(body);
        info!(
            corpus_size = ?report.corpus_size,
            test_size = ?report.test_size,
            "Service initialized"
        );
        Ok(report)
    }

    #[instrument(skip(self), fields(mode = mode.as_str()))]
    async fn start_round(&self, mode: RoundMode) -> Result<RoundStart, ApiError> {
        info!("Starting round");
        let body: NewGameResponseBody = self
            .post("/api/new-game", Some(&NewGameBody::from(&mode)))
            .await?;
        Ok(body.into())
    }

    #[instrument(skip(self), fields(letter = %letter))]
    async fn submit_guess(&self, letter: Letter) -> Result<MoveOutcome, ApiError> {
        debug!("Submitting guess");
        let body: MoveBody = self.post("/api/guess", Some(&GuessBody { letter })).await?;
        MoveOutcome::try_from(body)
    }

    #[instrument(skip(self))]
    async fn request_hint(&self) -> Result<Vec<HintSuggestion>, ApiError> {
        debug!("Requesting hint");
        let body: HintBody = self.get("/api/ai-hint").await?;
        Vec::try_from(body)
    }

    #[instrument(skip(self))]
    async fn request_ai_move(&self) -> Result<MoveOutcome, ApiError> {
        debug!("Requesting AI move");
        let body: MoveBody = self.post::<(), _>("/api/ai-play", None).await?;
        let outcome = MoveOutcome::try_from(body)?;
        if outcome.letter().is_none() {
            return Err(ApiError::new("AI move response did not name a letter"));
        }
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn fetch_state(&self) -> Result<StateSnapshot, ApiError> {
        debug!("Fetching game state");
        let body: StateBody = self.get("/api/game-state").await?;
        StateSnapshot::try_from(body)
    }
}
