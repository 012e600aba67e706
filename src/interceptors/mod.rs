//! Ordered request and response interceptor chains.
//!
//! An interceptor is a pair of hooks invoked at a fixed point of a request's
//! lifecycle:
//!
//! - `on_fulfilled` transforms the success-path value (an [`HttpRequest`] for
//!   request interceptors, an [`HttpResponse`] for response interceptors) and
//!   may reject it by returning an error;
//! - `on_rejected` observes a failure and may recover by returning a value, or
//!   pass the failure on.
//!
//! Interceptors run in registration order. Once a hook fails, the remaining
//! interceptors are visited through their `on_rejected` hooks until one of
//! them recovers; from there the fulfilled path resumes.
//!
//! # Overview
//!
//! - [`Interceptor`]: the hook pair, with pass-through defaults
//! - [`InterceptorRegistry`]: append/remove storage handing out [`Chain`] snapshots
//! - [`run_fulfilled`] / [`run_rejected`]: the invoker
//! - [`FnInterceptor`]: builds an interceptor from closures
//! - [`HeaderInterceptor`], [`TracingInterceptor`]: ready-made interceptors
//!
//! # Example
//!
//! ```rust
//! use http_interceptors::interceptors::{Interceptor, InterceptorRegistry, ChainKind, run_fulfilled};
//! use http_interceptors::{BoxFuture, HttpError, HttpMethod, HttpRequest};
//!
//! struct AcceptJson;
//!
//! impl Interceptor<HttpRequest> for AcceptJson {
//!     fn on_fulfilled<'a>(
//!         &'a self,
//!         mut request: HttpRequest,
//!     ) -> BoxFuture<'a, Result<HttpRequest, HttpError>> {
//!         request.headers.insert("Accept", "application/json");
//!         Box::pin(async move { Ok(request) })
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let registry = InterceptorRegistry::new(ChainKind::Request);
//! registry.register(AcceptJson);
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/products").build().unwrap();
//! let request = run_fulfilled(&registry.snapshot(), request).await.unwrap();
//! assert_eq!(request.headers.get("accept"), Some("application/json"));
//! # });
//! ```

mod builtin;
mod fn_interceptor;
mod invoker;
mod registry;

use std::fmt;
use std::future;

use crate::clients::HttpError;
use crate::BoxFuture;

pub use builtin::{HeaderInterceptor, TracingInterceptor};
pub use fn_interceptor::FnInterceptor;
pub use invoker::{run_fulfilled, run_rejected};
pub use registry::{Chain, InterceptorRegistry};

#[cfg(doc)]
use crate::clients::{HttpRequest, HttpResponse};

/// A pair of hooks run at one point of the request lifecycle.
///
/// Both hooks default to passing their input through unchanged, so an
/// implementation only overrides the hooks it needs.
pub trait Interceptor<T: Send + 'static>: Send + Sync {
    /// Transforms the success-path value.
    ///
    /// Returning an error switches the rest of the chain to the rejected path.
    fn on_fulfilled<'a>(&'a self, value: T) -> BoxFuture<'a, Result<T, HttpError>> {
        Box::pin(future::ready(Ok(value)))
    }

    /// Observes a failure.
    ///
    /// Returning `Ok` recovers: the rest of the chain resumes on the fulfilled
    /// path with the returned value.
    fn on_rejected<'a>(&'a self, error: HttpError) -> BoxFuture<'a, Result<T, HttpError>> {
        Box::pin(future::ready(Err(error)))
    }
}

/// Which chain an interceptor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainKind {
    /// Runs over the outgoing request.
    Request,
    /// Runs over the response or final failure.
    Response,
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => write!(f, "request"),
            Self::Response => write!(f, "response"),
        }
    }
}

/// Identifies one registration; used to remove it again.
///
/// Handles are unique across all registries in the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InterceptorHandle {
    kind: ChainKind,
    id: u64,
}

impl InterceptorHandle {
    /// Returns the chain this handle belongs to.
    #[must_use]
    pub const fn kind(&self) -> ChainKind {
        self.kind
    }
}
