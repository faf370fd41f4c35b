//! Errors that abort the viewer.
//!
//! Nothing here is recovered from: [`main`](crate) logs the error and exits with
//! [`EXIT_FAILURE`].

use objview_core::{config::ConfigError, model::LoadError};
use thiserror::Error;

/// Process exit code for any initialisation failure.
pub const EXIT_FAILURE: i32 = -1;

/// Process exit code after the window was closed normally.
pub const EXIT_SUCCESS: i32 = 0;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("window creation failed: {0}")]
    Window(String),

    #[error("OpenGL error: {0}")]
    GlLoader(String),

    #[error(transparent)]
    Model(#[from] LoadError),

    #[error("shader error: {0}")]
    Shader(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to set up logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl ViewerError {
    pub fn window(e: impl ToString) -> Self {
        Self::Window(e.to_string())
    }

    pub fn gl(e: impl ToString) -> Self {
        Self::GlLoader(e.to_string())
    }
}

/// Maps the outcome of a viewer run to a process exit code.
pub fn exit_code<T>(result: &Result<T, ViewerError>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}
