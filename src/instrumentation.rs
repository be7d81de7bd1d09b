//! Traced dispatch wrapper and its installation into a [`DispatchSlot`].

use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use crate::config::InstrumentationConfig;
use crate::dispatch::{Dispatch, DispatchSlot, RequestFuture};
use crate::metadata::CallMetadata;
use crate::observer::TracedRequest;
use crate::span::start_span;

/// A traced wrapper around a dispatch function.
///
/// Accepts the same parameters and returns the same results as the wrapped
/// dispatcher; every call additionally produces one client span.
///
/// # Span Nesting
///
/// Spans are created as children of the tracing span current at call time,
/// and the request span is current while the wrapped call runs. Spans opened
/// by the underlying engine therefore nest under the request span, and
/// request spans nest under whatever HTTP or job span issued the query.
///
/// # Example
///
/// ```rust,ignore
/// use prisma_tracing::{Instrumented, TracingExt};
///
/// let traced = engine.with_tracing();
/// let users = traced
///     .request(json!({ "clientMethod": "findMany", "model": "User", "args": {} }))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Instrumented<D> {
    inner: D,
    config: Arc<InstrumentationConfig>,
}

impl<D: Dispatch> Instrumented<D> {
    /// Create a new traced dispatcher with the given configuration.
    pub fn new(inner: D, config: InstrumentationConfig) -> Self {
        Self::with_shared_config(inner, Arc::new(config))
    }

    /// Create a new traced dispatcher with default configuration.
    pub fn wrap(inner: D) -> Self {
        Self::new(inner, InstrumentationConfig::default())
    }

    fn with_shared_config(inner: D, config: Arc<InstrumentationConfig>) -> Self {
        Self { inner, config }
    }

    /// Get a reference to the wrapped dispatcher.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Get the tracing configuration.
    pub fn config(&self) -> &InstrumentationConfig {
        &self.config
    }

    /// Consume the wrapper and return the wrapped dispatcher.
    pub fn into_inner(self) -> D {
        self.inner
    }

    /// Dispatch a call, returning the traced future directly.
    pub fn traced_request(&self, params: Value) -> TracedRequest {
        let span = {
            let metadata = CallMetadata::from_params(&params);
            start_span(&self.config, &metadata)
        };

        // a panic here unwinds through `span`, which ends it
        let inner = span.in_scope(|| self.inner.request(params));
        TracedRequest::new(span, inner, self.config.slow_request_threshold)
    }
}

impl<D: Dispatch> From<D> for Instrumented<D> {
    fn from(inner: D) -> Self {
        Self::wrap(inner)
    }
}

impl<D: Dispatch> Dispatch for Instrumented<D> {
    fn request(&self, params: Value) -> RequestFuture {
        self.traced_request(params).boxed()
    }
}

/// Installs request tracing into a client's dispatch slot.
///
/// # Example
///
/// ```rust
/// # use prisma_tracing::{Dispatch, DispatchSlot, RequestFuture};
/// # use futures::FutureExt;
/// # struct Engine;
/// # impl Dispatch for Engine {
/// #     fn request(&self, params: serde_json::Value) -> RequestFuture {
/// #         async move { Ok(params) }.boxed()
/// #     }
/// # }
/// use prisma_tracing::PrismaInstrumentation;
///
/// let slot = DispatchSlot::new(Engine);
/// let instrumentation = PrismaInstrumentation::default();
///
/// assert!(instrumentation.install(&slot));
/// assert!(instrumentation.install(&slot)); // still a single wrapper
/// assert!(instrumentation.uninstall(&slot));
/// assert!(!slot.is_wrapped());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrismaInstrumentation {
    config: Arc<InstrumentationConfig>,
}

impl PrismaInstrumentation {
    pub fn new(config: InstrumentationConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &InstrumentationConfig {
        &self.config
    }

    /// Wrap the slot's dispatch function with tracing.
    ///
    /// Installing over an existing wrapper replaces it. Returns whether the
    /// slot is traced afterwards; a disabled configuration leaves the slot as
    /// it was.
    pub fn install(&self, slot: &DispatchSlot) -> bool {
        if !self.config.enabled {
            tracing::debug!(
                instrumentation = %self.config.instrumentation_name,
                "Instrumentation disabled, dispatch left unwrapped"
            );
            return slot.is_wrapped();
        }

        let replaced = slot.is_wrapped();
        let config = self.config.clone();
        slot.wrap(move |original| -> Arc<dyn Dispatch> {
            Arc::new(Instrumented::with_shared_config(original, config))
        });

        tracing::debug!(
            instrumentation = %self.config.instrumentation_name,
            version = %self.config.version,
            component = %self.config.component,
            replaced,
            "Installed dispatch tracing"
        );
        true
    }

    /// Restore the slot's original dispatch function.
    ///
    /// Returns `false` if no wrapper was installed.
    pub fn uninstall(&self, slot: &DispatchSlot) -> bool {
        let removed = slot.restore();
        if removed {
            tracing::debug!(
                instrumentation = %self.config.instrumentation_name,
                version = %self.config.version,
                "Removed dispatch tracing"
            );
        }
        removed
    }

    /// Wrap a dispatcher directly, sharing this instrumentation's configuration.
    pub fn wrap<D: Dispatch>(&self, dispatch: D) -> Instrumented<D> {
        Instrumented::with_shared_config(dispatch, self.config.clone())
    }
}

/// Extension trait for easy wrapping of dispatchers.
pub trait TracingExt: Dispatch + Sized {
    /// Wrap this dispatcher with tracing instrumentation.
    fn with_tracing(self) -> Instrumented<Self>;

    /// Wrap this dispatcher with custom tracing configuration.
    fn with_tracing_config(self, config: InstrumentationConfig) -> Instrumented<Self>;
}

impl<D: Dispatch> TracingExt for D {
    fn with_tracing(self) -> Instrumented<Self> {
        Instrumented::wrap(self)
    }

    fn with_tracing_config(self, config: InstrumentationConfig) -> Instrumented<Self> {
        Instrumented::new(self, config)
    }
}
