//! Completion tracking for in-flight dispatch calls.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use opentelemetry_semantic_conventions::attribute::{EXCEPTION_MESSAGE, EXCEPTION_STACKTRACE};
use serde_json::Value;
use tracing::Span;

use crate::dispatch::RequestFuture;
use crate::error::RequestError;

/// Future returned by an instrumented dispatch call.
///
/// Resolves to exactly what the wrapped call resolves to. The request span is
/// entered on every poll and ended once: when the call settles, or when this
/// future is dropped early (including while unwinding from a panic).
#[must_use = "futures do nothing unless polled"]
pub struct TracedRequest {
    inner: RequestFuture,
    span: Option<Span>,
    start: Instant,
    slow_threshold: Duration,
}

impl TracedRequest {
    pub(crate) fn new(span: Span, inner: RequestFuture, slow_threshold: Duration) -> Self {
        Self {
            inner,
            span: Some(span),
            start: Instant::now(),
            slow_threshold,
        }
    }

    /// The span tracking this call, until it has been ended.
    pub fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }
}

impl Future for TracedRequest {
    type Output = Result<Value, RequestError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        let result = match &this.span {
            Some(span) => {
                let _enter = span.enter();
                futures::ready!(this.inner.as_mut().poll(cx))
            }
            None => return this.inner.as_mut().poll(cx),
        };

        if let Some(span) = this.span.take() {
            record_result(&span, &result, this.start.elapsed(), this.slow_threshold);
        }
        Poll::Ready(result)
    }
}

impl fmt::Debug for TracedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedRequest")
            .field("span", &self.span)
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}

/// Record the outcome of a settled call on its span.
fn record_result(
    span: &Span,
    result: &Result<Value, RequestError>,
    elapsed: Duration,
    slow_threshold: Duration,
) {
    if elapsed > slow_threshold {
        span.record("slow_request", true);
        tracing::warn!(
            parent: span,
            duration_ms = elapsed.as_millis() as u64,
            threshold_ms = slow_threshold.as_millis() as u64,
            "Slow Prisma request detected"
        );
    }

    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(e) => {
            record_error(span, e);
            tracing::error!(
                parent: span,
                error = %e,
                "Prisma request failed"
            );
        }
    }
}

/// Mark a span as failed, with message and stack trace when the error has them.
pub(crate) fn record_error(span: &Span, error: &RequestError) {
    span.record("otel.status_code", "ERROR");
    span.record("error", true);

    if let Some(message) = error.message().filter(|m| !m.is_empty()) {
        span.record(EXCEPTION_MESSAGE, message);
    }
    if let Some(stack) = error.stack().filter(|s| !s.is_empty()) {
        span.record(EXCEPTION_STACKTRACE, stack);
    }
}
