//! Error type for the Facade API.

use thiserror::Error;

/// Error type for Facade API operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// No successful fetch has been recorded for the provider yet
    #[error("no usage data for provider: {provider}")]
    NoData { provider: String },
}
