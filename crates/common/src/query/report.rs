//! Fire-and-forget error reporting.

/// Reports longer than this are truncated at construction, so oversized
/// backend bodies can never flood the reporting sink.
pub const MAX_REPORT_MESSAGE_LEN: usize = 500;

/// One user-facing failure notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Failure description, at most [`MAX_REPORT_MESSAGE_LEN`] characters.
    pub message: String,
    pub title: Option<String>,
}

impl ErrorReport {
    /// Builds a report, truncating the message on a character boundary.
    pub fn new(message: impl Into<String>) -> Self {
        let message: String = message.into();
        let message = match message.char_indices().nth(MAX_REPORT_MESSAGE_LEN) {
            Some((cut, _)) => message[..cut].to_string(),
            None => message,
        };
        Self { message, title: None }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Error")
    }
}

/// Sink for failure notifications.
///
/// Notification must not block or fail: implementations log, toast, or
/// forward, and swallow their own errors.
pub trait ErrorReporter: Send + Sync {
    fn notify(&self, report: ErrorReport);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_messages_pass_through() {
        let report = ErrorReport::new("upstream down");
        assert_eq!(report.message, "upstream down");
        assert_eq!(report.title_or_default(), "Error");
    }

    #[test]
    fn long_messages_are_truncated() {
        let report = ErrorReport::new("x".repeat(2000));
        assert_eq!(report.message.chars().count(), MAX_REPORT_MESSAGE_LEN);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Two-byte chars: truncation must count chars, not bytes
        let report = ErrorReport::new("é".repeat(600));
        assert_eq!(report.message.chars().count(), MAX_REPORT_MESSAGE_LEN);
        assert!(report.message.chars().all(|c| c == 'é'));
    }

    #[test]
    fn title_overrides_default() {
        let report = ErrorReport::new("boom").with_title("schedule request failed");
        assert_eq!(report.title_or_default(), "schedule request failed");
    }
}
