//! Advisory user notifications raised by the API client.
//!
//! The client surfaces exactly two transient conditions on its own:
//! unreachable server and server-side failure. They are advisory only and
//! never change control flow; the caller still receives the error. The sink
//! is injected so the client stays free of any presentation concern.

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// No response received - server unreachable or connection dropped
    ConnectionError,
    /// Server responded with a 5xx status
    ServerError,
}

impl Notice {
    /// User-facing message for this notice
    pub fn message(&self) -> &'static str {
        match self {
            Notice::ConnectionError => "Cannot reach the server. Check your connection.",
            Notice::ServerError => "The server hit an internal error. Try again shortly.",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Receives advisory notices from the client. Implementations must not block.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Default sink: notices become tracing warnings
pub struct LogNotices;

impl NoticeSink for LogNotices {
    fn notify(&self, notice: Notice) {
        warn!(notice = ?notice, "{}", notice.message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_messages() {
        assert!(Notice::ConnectionError.message().contains("reach"));
        assert!(Notice::ServerError.message().contains("server"));
        assert_eq!(
            Notice::ConnectionError.to_string(),
            Notice::ConnectionError.message()
        );
    }
}
