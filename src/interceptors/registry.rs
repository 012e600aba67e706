//! Chain registry: ordered, copy-on-write interceptor storage.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::{ChainKind, Interceptor, InterceptorHandle};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

struct Entry<T: Send + 'static> {
    id: u64,
    interceptor: Arc<dyn Interceptor<T>>,
}

impl<T: Send + 'static> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            interceptor: Arc::clone(&self.interceptor),
        }
    }
}

/// An immutable snapshot of a chain, in registration order.
///
/// Snapshots are cheap to clone and unaffected by later registrations or
/// removals.
pub struct Chain<T: Send + 'static> {
    entries: Arc<Vec<Entry<T>>>,
}

impl<T: Send + 'static> Chain<T> {
    /// Creates an empty chain.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Arc::new(Vec::new()),
        }
    }

    /// Iterates over the interceptors in invocation order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Interceptor<T>>> {
        self.entries.iter().map(|entry| &entry.interceptor)
    }

    /// Returns the number of interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the chain has no interceptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Send + 'static> Clone for Chain<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T: Send + 'static> Default for Chain<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Send + 'static> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("interceptors", &format!("<{} interceptors>", self.len()))
            .finish()
    }
}

/// Ordered storage of the interceptors of one chain.
///
/// Registration and removal may happen while requests are in flight. Each
/// request works on a [`Chain`] snapshot taken when it enters the chain, so
/// concurrent changes never affect an invocation that already started.
///
/// # Thread Safety
///
/// `InterceptorRegistry` is `Send + Sync`; every method takes `&self`.
///
/// # Example
///
/// ```rust
/// use http_interceptors::interceptors::{ChainKind, HeaderInterceptor, InterceptorRegistry};
/// use http_interceptors::HttpRequest;
///
/// let registry: InterceptorRegistry<HttpRequest> = InterceptorRegistry::new(ChainKind::Request);
/// let handle = registry.register(HeaderInterceptor::new("Accept", "application/json"));
/// assert_eq!(registry.len(), 1);
///
/// let snapshot = registry.snapshot();
/// registry.remove(handle);
/// assert_eq!(registry.len(), 0);
/// assert_eq!(snapshot.len(), 1);
/// ```
pub struct InterceptorRegistry<T: Send + 'static> {
    kind: ChainKind,
    chain: RwLock<Chain<T>>,
}

impl<T: Send + 'static> InterceptorRegistry<T> {
    /// Creates an empty registry for `kind`.
    #[must_use]
    pub fn new(kind: ChainKind) -> Self {
        Self {
            kind,
            chain: RwLock::new(Chain::empty()),
        }
    }

    /// Returns the chain kind of this registry.
    #[must_use]
    pub const fn kind(&self) -> ChainKind {
        self.kind
    }

    /// Appends `interceptor` to the end of the chain.
    pub fn register<I>(&self, interceptor: I) -> InterceptorHandle
    where
        I: Interceptor<T> + 'static,
    {
        self.register_arc(Arc::new(interceptor))
    }

    /// Appends a shared interceptor to the end of the chain.
    pub fn register_arc(&self, interceptor: Arc<dyn Interceptor<T>>) -> InterceptorHandle {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let mut chain = self.chain.write().unwrap_or_else(PoisonError::into_inner);

        let mut entries = Vec::with_capacity(chain.len() + 1);
        entries.extend(chain.entries.iter().cloned());
        entries.push(Entry { id, interceptor });
        *chain = Chain {
            entries: Arc::new(entries),
        };

        tracing::trace!(kind = %self.kind, id, "registered interceptor");
        InterceptorHandle {
            kind: self.kind,
            id,
        }
    }

    /// Removes the interceptor registered under `handle`.
    ///
    /// Removing a handle that is already gone, or that belongs to another
    /// chain, is a no-op. Returns `true` if an interceptor was removed.
    pub fn remove(&self, handle: InterceptorHandle) -> bool {
        if handle.kind != self.kind {
            return false;
        }

        let mut chain = self.chain.write().unwrap_or_else(PoisonError::into_inner);
        if !chain.entries.iter().any(|entry| entry.id == handle.id) {
            return false;
        }

        let entries = chain
            .entries
            .iter()
            .filter(|entry| entry.id != handle.id)
            .cloned()
            .collect();
        *chain = Chain {
            entries: Arc::new(entries),
        };

        tracing::trace!(kind = %self.kind, id = handle.id, "removed interceptor");
        true
    }

    /// Removes every interceptor.
    pub fn clear(&self) {
        let mut chain = self.chain.write().unwrap_or_else(PoisonError::into_inner);
        *chain = Chain::empty();
    }

    /// Returns a snapshot of the current chain.
    #[must_use]
    pub fn snapshot(&self) -> Chain<T> {
        self.chain
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of registered interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns `true` if no interceptors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl<T: Send + 'static> fmt::Debug for InterceptorRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("kind", &self.kind)
            .field("interceptors", &format!("<{} interceptors>", self.len()))
            .finish()
    }
}

// Verify InterceptorRegistry is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<InterceptorRegistry<crate::clients::HttpRequest>>();
    assert_send_sync::<Chain<crate::clients::HttpResponse>>();
};
