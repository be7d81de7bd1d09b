//! # prisma-tracing
//!
//! OpenTelemetry-compatible tracing instrumentation for Prisma-style client dispatch.
//!
//! Every query and mutation a Prisma-style client issues passes through one internal
//! dispatch entry point. This crate wraps that entry point so each call produces a
//! client span, without any change to the code that uses the client.
//!
//! ## Features
//!
//! - **Transparent**: results and errors reach the caller exactly as the wrapped
//!   dispatcher produced them
//! - **Proper Span Nesting**: request spans are children of the current span, and spans
//!   opened by the engine during the call are children of the request span
//! - **Argument Visibility**: nested call arguments are flattened into
//!   `prisma.args.*` attributes
//! - **Error Tracking**: failures set `error`, `exception.message` and
//!   `exception.stacktrace`
//! - **Exactly-once Completion**: the span ends when the call settles, panics, or is
//!   dropped, and never twice
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use prisma_tracing::{DispatchSlot, PrismaInstrumentation};
//!
//! // The slot every client handle routes its calls through
//! let slot = DispatchSlot::new(engine);
//! PrismaInstrumentation::default().install(&slot);
//!
//! // All calls are now traced
//! let users = slot
//!     .request(json!({ "clientMethod": "findMany", "model": "User", "args": {} }))
//!     .await?;
//! ```
//!
//! ## Configuration
//!
//! ```rust,ignore
//! use prisma_tracing::{InstrumentationConfig, PrismaInstrumentation};
//!
//! let config = InstrumentationConfig::default()
//!     .with_args_recording(false) // keep user data out of traces
//!     .with_slow_request_threshold(Duration::from_millis(100));
//!
//! PrismaInstrumentation::new(config).install(&slot);
//! ```
//!
//! ## Span Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `component` | Always "prisma" unless configured otherwise |
//! | `prisma.action` | ORM operation kind (when present) |
//! | `prisma.model` | Target model (when present) |
//! | `prisma.args.*` | Flattened call arguments (when enabled) |
//! | `otel.status_code` | "OK" or "ERROR" |
//! | `error` | `true` on failure |
//! | `exception.message` | Failure message (when present) |
//! | `exception.stacktrace` | Failure stack trace (when present) |
//! | `slow_request` | `true` when the call exceeded the slow threshold |

mod config;
mod dispatch;
mod error;
mod flatten;
mod instrumentation;
mod metadata;
mod observer;
mod span;

pub use config::{InstrumentationConfig, DEFAULT_ARGS_NAMESPACE, DEFAULT_COMPONENT};
pub use dispatch::{Dispatch, DispatchSlot, RequestFuture};
pub use error::RequestError;
pub use flatten::{flatten, FlatAttributes};
pub use instrumentation::{Instrumented, PrismaInstrumentation, TracingExt};
pub use metadata::{CallMetadata, FALLBACK_SPAN_NAME};
pub use observer::TracedRequest;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Dispatch, DispatchSlot, InstrumentationConfig, PrismaInstrumentation, RequestError,
        TracingExt,
    };
}
