//! Error boundary around screen rendering.
//!
//! A render that fails or panics is replaced by a diagnostic panel. The panel
//! stays until [`ErrorBoundary::retry`] is called; later renders are not
//! attempted in the meantime.

use std::panic::{AssertUnwindSafe, catch_unwind};

use colored::Colorize;

use crate::tracing_layer::panic_message;

/// A failure caught while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaughtError {
    pub message: String,
    pub details: String,
}

#[derive(Debug, Default)]
pub struct ErrorBoundary {
    caught: Option<CaughtError>,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caught(&self) -> Option<&CaughtError> {
        self.caught.as_ref()
    }

    /// Runs `render`, or shows the panel if a failure is already recorded.
    pub fn render<F>(&mut self, render: F) -> String
    where
        F: FnOnce() -> anyhow::Result<String>,
    {
        if let Some(caught) = &self.caught {
            return panel(caught);
        }

        let caught = match catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(output)) => return output,
            Ok(Err(e)) => CaughtError {
                message: e.to_string(),
                details: format!("{:?}", e),
            },
            Err(payload) => {
                let message = panic_message(payload.as_ref())
                    .unwrap_or_else(|| "render panicked".to_string());
                CaughtError {
                    details: format!("panic: {}", message),
                    message,
                }
            }
        };

        tracing::error!(message = %caught.message, details = %caught.details, "render failed");
        let output = panel(&caught);
        self.caught = Some(caught);
        output
    }

    /// Clears the recorded failure so the next render runs again.
    pub fn retry(&mut self) {
        if self.caught.take().is_some() {
            tracing::info!("render retry requested");
        }
    }
}

fn panel(caught: &CaughtError) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        "Something went wrong".bright_red().bold(),
        caught.message,
        caught.details.bright_black(),
        "Type /retry to try again.".yellow()
    )
}
