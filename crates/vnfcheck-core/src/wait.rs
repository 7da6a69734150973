//! Bounded condition polling.
//!
//! Collaborator implementations block on these helpers while a resource
//! reaches a desired state. There is no cancellation beyond error
//! propagation: a timeout surfaces as a deployment error and the caller
//! decides what to do.

use std::time::{Duration, Instant};
use vnfcheck_proto::{Error, Result};

/// Polls `condition` with a fixed delay until it holds or `timeout`
/// elapses. `what` names the wait in the timeout error.
pub async fn wait_on<F>(what: &str, mut condition: F, delay: Duration, timeout: Duration) -> Result<()>
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    while !condition() {
        if start.elapsed() >= timeout {
            return Err(Error::Deployment(format!("timeout waiting on {what}")));
        }
        tokio::time::sleep(delay).await;
    }
    Ok(())
}

/// Polls `poll` until it yields a value or `timeout` elapses.
pub async fn wait_until_some<T, F>(
    what: &str,
    mut poll: F,
    delay: Duration,
    timeout: Duration,
) -> Result<T>
where
    F: FnMut() -> Option<T>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = poll() {
            return Ok(value);
        }
        if start.elapsed() >= timeout {
            return Err(Error::Deployment(format!("timeout waiting on {what}")));
        }
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn satisfied_condition_returns_immediately() {
        wait_on(
            "already true",
            || true,
            Duration::from_millis(1),
            Duration::from_millis(50),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn condition_becoming_true_is_observed() {
        let mut polls = 0;
        wait_on(
            "third poll",
            || {
                polls += 1;
                polls >= 3
            },
            Duration::from_millis(1),
            Duration::from_millis(500),
        )
        .await
        .unwrap();
        assert_eq!(polls, 3);
    }

    #[tokio::test]
    async fn timeout_names_the_wait() {
        let err = wait_on(
            "container web_1 running",
            || false,
            Duration::from_millis(1),
            Duration::from_millis(10),
        )
        .await
        .unwrap_err();

        match err {
            Error::Deployment(msg) => assert!(msg.contains("container web_1 running")),
            other => panic!("expected a deployment error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn polling_for_a_value() {
        let mut polls = 0;
        let value = wait_until_some(
            "value",
            || {
                polls += 1;
                (polls >= 2).then_some(42)
            },
            Duration::from_millis(1),
            Duration::from_millis(500),
        )
        .await
        .unwrap();
        assert_eq!(value, 42);
    }
}
