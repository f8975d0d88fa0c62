//! Background window resetter.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::gate::WindowGate;

/// Spawns the task that restores the gate's window budget once per `window`.
///
/// The gate starts with a full budget, so the first tick is due one window
/// after this call, not whenever the task is first polled. Ticks never
/// overlap: a slow tick delays the next one instead of bunching them up. The
/// task exits when `shutdown` is cancelled.
pub(crate) fn spawn_window_resetter(
    runtime: &Handle,
    gate: Arc<WindowGate>,
    window: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let mut ticker = {
        let _entered = runtime.enter();
        interval_at(Instant::now() + window, window)
    };
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    runtime.spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    log::debug!("Window resetter shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let restored = gate.replenish();
                    if restored > 0 {
                        log::trace!(
                            "New window: restored {} of {} admissions ({} in flight)",
                            restored,
                            gate.capacity(),
                            gate.in_flight()
                        );
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_resetter_restores_budget_each_window() {
        let gate = Arc::new(WindowGate::new(2));
        let shutdown = CancellationToken::new();
        let handle = spawn_window_resetter(
            &Handle::current(),
            Arc::clone(&gate),
            Duration::from_millis(50),
            shutdown.clone(),
        );

        gate.acquire().await.unwrap().release();
        gate.acquire().await.unwrap().release();
        assert_eq!(gate.available_slots(), 0);

        sleep(Duration::from_millis(120)).await;
        assert_eq!(gate.available_slots(), 2);

        shutdown.cancel();
        timeout(Duration::from_secs(1), handle)
            .await
            .expect("resetter should stop after cancellation")
            .unwrap();
    }

    #[tokio::test]
    async fn test_first_tick_is_one_window_after_spawn() {
        let gate = Arc::new(WindowGate::new(2));
        let shutdown = CancellationToken::new();
        let _handle = spawn_window_resetter(
            &Handle::current(),
            Arc::clone(&gate),
            Duration::from_millis(200),
            shutdown.clone(),
        );

        gate.acquire().await.unwrap().release();
        gate.acquire().await.unwrap().release();
        // Let the resetter task run before the window ends.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        sleep(Duration::from_millis(20)).await;
        assert_eq!(gate.available_slots(), 0, "no replenish before the first window ends");

        sleep(Duration::from_millis(300)).await;
        assert_eq!(gate.available_slots(), 2);
        shutdown.cancel();
    }

    #[tokio::test]
    async fn test_resetter_stops_replenishing_after_cancel() {
        let gate = Arc::new(WindowGate::new(1));
        let shutdown = CancellationToken::new();
        let handle = spawn_window_resetter(
            &Handle::current(),
            Arc::clone(&gate),
            Duration::from_millis(30),
            shutdown.clone(),
        );

        shutdown.cancel();
        handle.await.unwrap();

        gate.acquire().await.unwrap().release();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(gate.available_slots(), 0);
    }
}
