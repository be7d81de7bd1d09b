//! The client's dispatch entry point and the shared slot that holds it.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::RequestError;

/// Asynchronous result of a dispatch call.
pub type RequestFuture = BoxFuture<'static, Result<Value, RequestError>>;

/// The single internal entry point every client operation passes through.
///
/// `params` is the call's metadata record (`clientMethod`, `action`, `model`,
/// `args`); the returned future resolves to the operation's result.
pub trait Dispatch: Send + Sync {
    fn request(&self, params: Value) -> RequestFuture;
}

impl<D: Dispatch + ?Sized> Dispatch for Arc<D> {
    fn request(&self, params: Value) -> RequestFuture {
        (**self).request(params)
    }
}

impl<D: Dispatch + ?Sized> Dispatch for Box<D> {
    fn request(&self, params: Value) -> RequestFuture {
        (**self).request(params)
    }
}

struct SlotState {
    original: Arc<dyn Dispatch>,
    wrapper: Option<Arc<dyn Dispatch>>,
}

/// Shared holder of a client's dispatch function.
///
/// Every client handle built on the same slot routes its calls through
/// [`DispatchSlot::request`], so wrapping the slot affects all of them at
/// once. The slot remembers the original function and at most one wrapper.
pub struct DispatchSlot {
    state: RwLock<SlotState>,
}

impl DispatchSlot {
    pub fn new<D: Dispatch + 'static>(original: D) -> Self {
        Self {
            state: RwLock::new(SlotState {
                original: Arc::new(original),
                wrapper: None,
            }),
        }
    }

    /// The function calls are currently routed to.
    pub fn current(&self) -> Arc<dyn Dispatch> {
        let state = self.state.read();
        state
            .wrapper
            .as_ref()
            .unwrap_or(&state.original)
            .clone()
    }

    /// The unwrapped dispatch function.
    pub fn original(&self) -> Arc<dyn Dispatch> {
        self.state.read().original.clone()
    }

    pub fn is_wrapped(&self) -> bool {
        self.state.read().wrapper.is_some()
    }

    /// Replace the dispatch function with `wrap(original)`.
    ///
    /// An existing wrapper is removed first, so the original is never
    /// wrapped twice.
    pub fn wrap<F>(&self, wrap: F)
    where
        F: FnOnce(Arc<dyn Dispatch>) -> Arc<dyn Dispatch>,
    {
        let mut state = self.state.write();
        let wrapper = wrap(state.original.clone());
        state.wrapper = Some(wrapper);
    }

    /// Restore the original dispatch function.
    ///
    /// Returns `false` when nothing was wrapped.
    pub fn restore(&self) -> bool {
        self.state.write().wrapper.take().is_some()
    }

    /// Dispatch a call through the current function.
    pub fn request(&self, params: Value) -> RequestFuture {
        // the lock is released before the call runs
        let current = self.current();
        current.request(params)
    }
}

impl Dispatch for DispatchSlot {
    fn request(&self, params: Value) -> RequestFuture {
        DispatchSlot::request(self, params)
    }
}

impl fmt::Debug for DispatchSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchSlot")
            .field("wrapped", &self.is_wrapped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;
    use serde_json::json;

    struct Echo;

    impl Dispatch for Echo {
        fn request(&self, params: Value) -> RequestFuture {
            async move { Ok(params) }.boxed()
        }
    }

    struct Tagged {
        inner: Arc<dyn Dispatch>,
        hits: Arc<AtomicUsize>,
    }

    impl Dispatch for Tagged {
        fn request(&self, params: Value) -> RequestFuture {
            self.hits.fetch_add(1, Ordering::SeqCst);
            self.inner.request(params)
        }
    }

    fn tagged(hits: &Arc<AtomicUsize>) -> impl FnOnce(Arc<dyn Dispatch>) -> Arc<dyn Dispatch> {
        let hits = hits.clone();
        move |inner| -> Arc<dyn Dispatch> { Arc::new(Tagged { inner, hits }) }
    }

    #[test]
    fn test_unwrapped_slot_calls_original() {
        let slot = DispatchSlot::new(Echo);
        assert!(!slot.is_wrapped());

        let out = slot.request(json!({ "clientMethod": "count" })).now_or_never();
        assert_eq!(out, Some(Ok(json!({ "clientMethod": "count" }))));
    }

    #[test]
    fn test_wrap_twice_keeps_single_wrapper() {
        let slot = DispatchSlot::new(Echo);
        let hits = Arc::new(AtomicUsize::new(0));

        slot.wrap(tagged(&hits));
        slot.wrap(tagged(&hits));
        assert!(slot.is_wrapped());

        let _ = slot.request(json!({})).now_or_never();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_restore_brings_back_original() {
        let slot = DispatchSlot::new(Echo);
        let hits = Arc::new(AtomicUsize::new(0));

        slot.wrap(tagged(&hits));
        assert!(slot.restore());
        assert!(!slot.is_wrapped());
        assert!(!slot.restore());

        let _ = slot.request(json!({})).now_or_never();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(Arc::ptr_eq(&slot.current(), &slot.original()));
    }
}
