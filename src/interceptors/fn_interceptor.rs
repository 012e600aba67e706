//! Closure-backed interceptors.

use std::fmt;
use std::future::{self, Future};

use crate::clients::HttpError;
use crate::BoxFuture;

use super::Interceptor;

type FulfilledFn<T> = Box<dyn Fn(T) -> BoxFuture<'static, Result<T, HttpError>> + Send + Sync>;
type RejectedFn<T> =
    Box<dyn Fn(HttpError) -> BoxFuture<'static, Result<T, HttpError>> + Send + Sync>;

/// An [`Interceptor`] assembled from closures.
///
/// A hook left unset passes its input through.
///
/// # Example
///
/// ```rust
/// use http_interceptors::interceptors::FnInterceptor;
/// use http_interceptors::{HttpError, HttpResponse};
///
/// // Turns any failure into an empty 204.
/// let fallback = FnInterceptor::<HttpResponse>::new()
///     .rejected(|_error: HttpError| async move {
///         Ok(HttpResponse::new(204, Default::default(), ""))
///     });
/// ```
pub struct FnInterceptor<T: Send + 'static> {
    fulfilled: Option<FulfilledFn<T>>,
    rejected: Option<RejectedFn<T>>,
}

impl<T: Send + 'static> FnInterceptor<T> {
    /// Creates an interceptor whose hooks both pass through.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fulfilled: None,
            rejected: None,
        }
    }

    /// Sets the success-path hook.
    #[must_use]
    pub fn fulfilled<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, HttpError>> + Send + 'static,
    {
        self.fulfilled = Some(Box::new(
            move |value: T| -> BoxFuture<'static, Result<T, HttpError>> { Box::pin(hook(value)) },
        ));
        self
    }

    /// Sets the failure hook.
    #[must_use]
    pub fn rejected<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(HttpError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, HttpError>> + Send + 'static,
    {
        self.rejected = Some(Box::new(
            move |error: HttpError| -> BoxFuture<'static, Result<T, HttpError>> { Box::pin(hook(error)) },
        ));
        self
    }
}

impl<T: Send + 'static> Default for FnInterceptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Interceptor<T> for FnInterceptor<T> {
    fn on_fulfilled<'a>(&'a self, value: T) -> BoxFuture<'a, Result<T, HttpError>> {
        match &self.fulfilled {
            Some(hook) => hook(value),
            None => Box::pin(future::ready(Ok(value))),
        }
    }

    fn on_rejected<'a>(&'a self, error: HttpError) -> BoxFuture<'a, Result<T, HttpError>> {
        match &self.rejected {
            Some(hook) => hook(error),
            None => Box::pin(future::ready(Err(error))),
        }
    }
}

impl<T: Send + 'static> fmt::Debug for FnInterceptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnInterceptor")
            .field("fulfilled", &self.fulfilled.is_some())
            .field("rejected", &self.rejected.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::InterceptorError;

    #[tokio::test]
    async fn test_fulfilled_hook_runs() {
        let interceptor = FnInterceptor::new().fulfilled(|s: String| async move { Ok(s + "!") });
        assert_eq!(interceptor.on_fulfilled("hi".to_string()).await.unwrap(), "hi!");
    }

    #[tokio::test]
    async fn test_rejected_hook_can_recover() {
        let interceptor =
            FnInterceptor::new().rejected(|_| async move { Ok::<_, HttpError>(0_u8) });
        let error = InterceptorError::new("boom").into();
        assert_eq!(interceptor.on_rejected(error).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unset_hooks_pass_through() {
        let interceptor = FnInterceptor::<u8>::default();
        assert_eq!(interceptor.on_fulfilled(3).await.unwrap(), 3);

        let error = InterceptorError::new("boom").into();
        assert!(interceptor.on_rejected(error).await.is_err());
    }

    #[test]
    fn test_debug_reports_hooks() {
        let interceptor = FnInterceptor::new().fulfilled(|v: u8| async move { Ok(v) });
        assert_eq!(
            format!("{interceptor:?}"),
            "FnInterceptor { fulfilled: true, rejected: false }"
        );
    }
}
