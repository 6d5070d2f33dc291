// ── Core error types ──
//
// `ConfigError` is fatal to setup and shown verbatim to the operator.
// Everything else is recoverable: the card renders a dedicated view and the
// next payload push re-runs the whole pipeline.

use thiserror::Error;

pub use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Entity not available: {entity}")]
    Unavailable { entity: String },

    #[error("No mesh nodes reported yet")]
    EmptyTopology,

    #[error("Render error: {message}")]
    Render { message: String },
}
