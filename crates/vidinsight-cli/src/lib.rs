//! Upload and result pages for the Vidinsight gateway, driven from the command line.

pub mod prompt;
pub mod refresh;
pub mod render;
pub mod results;
pub mod shell;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use refresh::AutoRefresh;
pub use results::{Command, FetchTicket, ResultError, ResultPage, ViewState};
pub use shell::{ConsoleShell, Shell};
pub use upload::{UploadError, UploadPage};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}


/// Initialize tracing for the CLI. Logs go to stderr so stdout only carries pages.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
