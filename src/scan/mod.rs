pub mod compiler;
pub mod model;
pub mod normalizer;

use crate::llm::{SignalBackend, TransportError};
use compiler::ScanScope;
use model::{SearchRequest, SearchResult};

/// The two fatal failure kinds a scan can surface.
///
/// Both are terminal for the attempt: no retry, no backoff, no partial
/// salvage beyond the per-record drops inside the normalizer. User-facing
/// messaging belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The backend call itself could not complete.
    #[error("Backend connection failure: {0}")]
    Transport(#[from] TransportError),

    /// The call completed but its payload could not be interpreted. Carries
    /// the raw text for diagnostics.
    #[error("Could not interpret signal payload")]
    Parse { raw: String },
}

/// Run one full scan: compile, call the backend, normalize.
///
/// The backend call is the sole suspension point. No internal concurrency,
/// no cancellation, no state across calls; a caller issuing a new scan
/// while one is in flight must discard the superseded response itself.
pub async fn run_scan(
    backend: &dyn SignalBackend,
    request: &SearchRequest,
    scope: &ScanScope,
) -> Result<SearchResult, ScanError> {
    let compiled = compiler::compile(request, scope);

    tracing::info!(
        kind = ?request.kind,
        query = %request.query,
        platform_count = request.platforms.len(),
        "dispatching scan"
    );

    let reply = backend.generate(&compiled).await?;

    normalizer::normalize(&reply.text, &reply.grounding)
}
