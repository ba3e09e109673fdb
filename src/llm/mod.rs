pub mod gemini;
pub mod types;

use crate::scan::compiler::CompiledRequest;
use types::SignalReply;

/// Backend abstraction - the single outbound suspension point of a scan.
#[async_trait::async_trait]
pub trait SignalBackend: Send + Sync {
    /// Perform one structured, web-grounded generation call.
    async fn generate(&self, request: &CompiledRequest) -> Result<SignalReply, TransportError>;
}

/// Failures of the backend call itself. Terminal for the attempt: the core
/// never retries, backs off or queues.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid or missing API key")]
    InvalidApiKey,

    #[error("Quota exhausted or rate limit exceeded")]
    QuotaExceeded,

    #[error("API error: {0}")]
    Api(String),
}
