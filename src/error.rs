//! Failure type produced by dispatch calls.

use thiserror::Error;

/// Error returned by a [`Dispatch`](crate::Dispatch) call.
///
/// Both the message and the stack trace are optional; the instrumentation
/// records whichever of them is present and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or("request failed"))]
pub struct RequestError {
    message: Option<String>,
    stack: Option<String>,
}

impl RequestError {
    /// Create an error carrying a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            stack: None,
        }
    }

    /// Create an error with neither message nor stack trace.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Attach a stack trace.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_message() {
        let err = RequestError::new("db down").with_stack("at query (engine.rs:10)");
        assert_eq!(err.to_string(), "db down");
        assert_eq!(err.stack(), Some("at query (engine.rs:10)"));
    }

    #[test]
    fn test_display_without_message() {
        let err = RequestError::unknown();
        assert_eq!(err.to_string(), "request failed");
        assert!(err.message().is_none());
        assert!(err.stack().is_none());
    }
}
