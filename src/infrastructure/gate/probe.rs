use std::time::Duration;

use futures::future::try_join_all;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error, info};

use super::launcher::{GateCommand, Launcher};
use super::policy::RetryPolicy;
use super::target::WaitTarget;
use super::GateError;

/// Shortest connect budget, so the last attempt before the deadline still gets a chance
const MIN_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(10);

/// Deadline used when `now + timeout` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

/// Wait until `target` accepts a TCP connection, returning the number of attempts
pub async fn wait_for(target: &WaitTarget, policy: &RetryPolicy) -> Result<u32, GateError> {
    wait_until(target, policy, deadline_after(policy.timeout)).await
}

/// Wait for every target concurrently against a single deadline
pub async fn wait_for_all(targets: &[WaitTarget], policy: &RetryPolicy) -> Result<(), GateError> {
    let deadline = deadline_after(policy.timeout);

    try_join_all(
        targets
            .iter()
            .map(|target| wait_until(target, policy, deadline)),
    )
    .await?;

    Ok(())
}

/// Wait for all targets, then launch `command` exactly once
///
/// The command is never launched if any target stays unreachable past the
/// policy timeout.
pub async fn run_gated<L: Launcher + ?Sized>(
    targets: &[WaitTarget],
    policy: &RetryPolicy,
    command: &GateCommand,
    launcher: &L,
) -> Result<i32, GateError> {
    info!(
        targets = targets.len(),
        timeout_ms = policy.timeout.as_millis() as u64,
        "Waiting for dependencies"
    );

    if let Err(e) = wait_for_all(targets, policy).await {
        error!(error = %e, "Dependencies not reachable, refusing to start");
        return Err(e);
    }

    launcher.launch(command)
}

async fn wait_until(
    target: &WaitTarget,
    policy: &RetryPolicy,
    deadline: Instant,
) -> Result<u32, GateError> {
    let started = Instant::now();
    let mut interval = policy.initial_interval;
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        let remaining = deadline.saturating_duration_since(Instant::now());
        let budget = policy.attempt_timeout.min(remaining).max(MIN_ATTEMPT_TIMEOUT);

        match timeout(budget, TcpStream::connect((target.host.as_str(), target.port))).await {
            Ok(Ok(_)) => {
                info!(
                    target = %target,
                    attempts,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Dependency is reachable"
                );
                return Ok(attempts);
            }
            Ok(Err(e)) => {
                debug!(target = %target, attempt = attempts, error = %e, "Connection failed");
            }
            Err(_) => {
                debug!(target = %target, attempt = attempts, "Connection attempt timed out");
            }
        }

        let now = Instant::now();

        if now >= deadline {
            return Err(GateError::Timeout {
                target: target.to_string(),
                elapsed: started.elapsed(),
            });
        }

        sleep(interval.min(deadline - now)).await;
        interval = policy.next_interval(interval);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::net::TcpListener;

    use super::*;

    #[derive(Debug, Default)]
    struct CountingLauncher {
        calls: AtomicUsize,
    }

    impl Launcher for CountingLauncher {
        fn launch(&self, _command: &GateCommand) -> Result<i32, GateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }

    fn fast_policy(timeout: Duration) -> RetryPolicy {
        RetryPolicy::default()
            .with_timeout(timeout)
            .with_initial_interval(Duration::from_millis(20))
            .with_max_interval(Duration::from_millis(100))
            .with_attempt_timeout(Duration::from_millis(200))
    }

    fn command() -> GateCommand {
        GateCommand::from_argv(vec!["./scripts/start.sh".to_string()]).unwrap()
    }

    /// A port that was free a moment ago and has nothing listening on it
    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn test_wait_for_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let attempts = wait_for(&WaitTarget::new("127.0.0.1", port), &fast_policy(Duration::from_secs(2)))
            .await
            .unwrap();

        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn test_unbounded_timeout_does_not_overflow() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let huge = crate::infrastructure::gate::parse_duration("9999999999999999h").unwrap();

        let attempts = wait_for(&WaitTarget::new("127.0.0.1", port), &fast_policy(huge))
            .await
            .unwrap();
        assert_eq!(attempts, 1);

        assert!(deadline_after(Duration::MAX) > Instant::now());
        assert!(deadline_after(Duration::from_secs(1)) <= Instant::now() + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_wait_for_times_out() {
        let port = closed_port().await;
        let timeout = Duration::from_millis(300);
        let start = std::time::Instant::now();

        let err = wait_for(&WaitTarget::new("127.0.0.1", port), &fast_policy(timeout))
            .await
            .unwrap_err();

        let elapsed = start.elapsed();
        assert!(err.is_timeout());
        assert!(elapsed >= timeout, "gave up early after {:?}", elapsed);
        assert!(elapsed < timeout + Duration::from_secs(1), "overran: {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_wait_for_port_that_opens_later() {
        let port = closed_port().await;

        let server = tokio::spawn(async move {
            sleep(Duration::from_millis(150)).await;
            let listener = TcpListener::bind(("127.0.0.1", port)).await.unwrap();
            let _ = listener.accept().await;
        });

        let attempts = wait_for(&WaitTarget::new("127.0.0.1", port), &fast_policy(Duration::from_secs(3)))
            .await
            .unwrap();

        assert!(attempts > 1);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_all_fails_if_any_target_down() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let up = listener.local_addr().unwrap().port();
        let down = closed_port().await;

        let targets = vec![
            WaitTarget::new("127.0.0.1", up),
            WaitTarget::new("127.0.0.1", down),
        ];

        let err = wait_for_all(&targets, &fast_policy(Duration::from_millis(200)))
            .await
            .unwrap_err();

        match err {
            GateError::Timeout { target, .. } => assert!(target.ends_with(&down.to_string())),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_run_gated_launches_once_when_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let launcher = CountingLauncher::default();

        let code = run_gated(
            &[WaitTarget::new("127.0.0.1", port)],
            &fast_policy(Duration::from_secs(2)),
            &command(),
            &launcher,
        )
        .await;

        tokio_test::assert_ok!(&code);
        assert_eq!(code.unwrap(), 0);
        assert_eq!(launcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_gated_never_launches_when_unreachable() {
        let port = closed_port().await;
        let launcher = CountingLauncher::default();

        let result = run_gated(
            &[WaitTarget::new("127.0.0.1", port)],
            &fast_policy(Duration::from_millis(200)),
            &command(),
            &launcher,
        )
        .await;

        tokio_test::assert_err!(&result);
        assert_eq!(launcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_gated_without_targets_launches_immediately() {
        let launcher = CountingLauncher::default();

        run_gated(&[], &RetryPolicy::default(), &command(), &launcher)
            .await
            .unwrap();

        assert_eq!(launcher.calls.load(Ordering::SeqCst), 1);
    }
}
