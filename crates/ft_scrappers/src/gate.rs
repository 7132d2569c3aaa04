use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Enforces a minimum interval between requests to the same host.
///
/// Callers reserve the next free slot for a host and sleep until it, so
/// concurrent callers for one host are spaced out while different hosts
/// never wait on each other.
#[derive(Debug)]
pub struct HostGate {
    interval: Duration,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl HostGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until `host` may be contacted again.
    pub async fn wait(&self, host: &str) {
        if self.interval.is_zero() {
            return;
        }

        let slot = {
            let mut slots = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match slots.get(host) {
                Some(&next) if next > now => next,
                _ => now,
            };
            slots.insert(host.to_string(), slot + self.interval);
            slot
        };

        sleep_until(slot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;

    #[tokio::test]
    async fn test_first_request_does_not_wait() {
        let gate = HostGate::new(Duration::from_secs(60));
        let start = Instant::now();
        gate.wait("a.com").await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_same_host_is_spaced() {
        let gate = HostGate::new(Duration::from_millis(50));
        let start = Instant::now();
        gate.wait("a.com").await;
        gate.wait("a.com").await;
        gate.wait("a.com").await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_concurrent_waiters_get_distinct_slots() {
        let gate = HostGate::new(Duration::from_millis(40));
        let start = Instant::now();
        join_all((0..3).map(|_| gate.wait("a.com"))).await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_different_hosts_do_not_wait() {
        let gate = HostGate::new(Duration::from_secs(60));
        let start = Instant::now();
        for host in ["a.com", "b.com", "c.com"] {
            gate.wait(host).await;
        }
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_zero_interval_is_a_no_op() {
        let gate = HostGate::new(Duration::ZERO);
        gate.wait("a.com").await;
        gate.wait("a.com").await;
        assert_eq!(gate.interval(), Duration::ZERO);
    }
}
