use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    sigsweep::cli::run().await
}
