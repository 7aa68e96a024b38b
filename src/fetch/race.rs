//! Response wait: the transport future raced against the timer and the
//! caller's cancellation token.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Which side of [`race_response`] finished first.
#[derive(Debug)]
pub enum RaceOutcome<T> {
    Completed(T),
    TimedOut,
    Cancelled,
}

/// Awaits `response` for at most `timeout`, giving up early if `cancel` fires.
///
/// When several branches are ready at once, cancellation wins over a
/// completed response and a completed response wins over the timer. The
/// losing futures are dropped, which aborts the in-flight request.
pub async fn race_response<F>(
    response: F,
    timeout: Duration,
    cancel: Option<&CancellationToken>,
) -> RaceOutcome<F::Output>
where
    F: Future,
{
    let cancelled = async {
        match cancel {
            Some(token) => token.cancelled().await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancelled => RaceOutcome::Cancelled,
        output = response => RaceOutcome::Completed(output),
        _ = tokio::time::sleep(timeout) => RaceOutcome::TimedOut,
    }
}
