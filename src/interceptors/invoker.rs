//! Runs a chain snapshot over a value or a failure.

use crate::clients::HttpError;

use super::Chain;

/// Runs `chain` starting on the fulfilled path with `value`.
///
/// Each interceptor sees the current state: a value goes to its
/// `on_fulfilled`, a failure to its `on_rejected`. The state after the last
/// interceptor is the result. An empty chain returns `value` unchanged.
///
/// # Errors
///
/// Returns the failure left over after the last interceptor, if no
/// `on_rejected` hook recovered from it.
pub async fn run_fulfilled<T: Send + 'static>(chain: &Chain<T>, value: T) -> Result<T, HttpError> {
    run(chain, Ok(value)).await
}

/// Runs `chain` starting on the rejected path with `error`.
///
/// The first interceptor whose `on_rejected` returns a value recovers the
/// chain; interceptors after it run on the fulfilled path.
///
/// # Errors
///
/// Returns the failure unchanged if the chain is empty or no interceptor
/// recovers.
pub async fn run_rejected<T: Send + 'static>(
    chain: &Chain<T>,
    error: HttpError,
) -> Result<T, HttpError> {
    run(chain, Err(error)).await
}

async fn run<T: Send + 'static>(
    chain: &Chain<T>,
    mut state: Result<T, HttpError>,
) -> Result<T, HttpError> {
    for (index, interceptor) in chain.iter().enumerate() {
        let was_ok = state.is_ok();
        state = match state {
            Ok(value) => interceptor.on_fulfilled(value).await,
            Err(error) => interceptor.on_rejected(error).await,
        };

        match (was_ok, state.is_ok()) {
            (true, false) => tracing::trace!(index, "interceptor rejected"),
            (false, true) => tracing::trace!(index, "interceptor recovered"),
            _ => {}
        }
    }
    state
}
