// Per-key serialization of concurrent cache misses

use crate::cache::key::Fingerprint;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::OwnedMutexGuard;

/// Collapses concurrent identical requests into a single render.
///
/// `read -> render -> write` is not atomic; without coordination two tasks
/// with the same fingerprint can both observe a miss and both render. Each
/// key gets an async mutex here: the first task holds it while rendering,
/// the rest wait and then find the artifact on their store re-check.
///
/// The map holds weak references so a key's entry disappears once the last
/// in-flight guard for it is dropped.
#[derive(Debug, Default)]
pub struct InflightGuards {
    keys: Mutex<HashMap<String, Weak<tokio::sync::Mutex<()>>>>,
}

impl InflightGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the guard for `key`, waiting if another task holds it.
    pub async fn acquire(&self, key: &Fingerprint) -> OwnedMutexGuard<()> {
        let lock = {
            let mut keys = self.keys.lock().expect("inflight map poisoned");
            keys.retain(|_, weak| weak.strong_count() > 0);
            match keys.get(key.as_str()).and_then(Weak::upgrade) {
                Some(existing) => existing,
                None => {
                    let fresh = Arc::new(tokio::sync::Mutex::new(()));
                    keys.insert(key.as_str().to_string(), Arc::downgrade(&fresh));
                    fresh
                }
            }
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.keys.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::key::fingerprint;
    use crate::models::{CaptionColor, CaptionRequest};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(n: &str) -> Fingerprint {
        fingerprint(&CaptionRequest::new(n, "", "", CaptionColor::Black))
    }

    #[tokio::test]
    async fn test_same_key_serializes() {
        let guards = Arc::new(InflightGuards::new());
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let guards = guards.clone();
            let running = running.clone();
            let peak = peak.clone();
            tasks.push(tokio::spawn(async move {
                let _guard = guards.acquire(&key("same")).await;
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                running.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block() {
        let guards = InflightGuards::new();
        let a = guards.acquire(&key("a")).await;
        // Must complete while `a` is still held.
        let b = guards.acquire(&key("b")).await;
        drop(a);
        drop(b);
    }

    #[tokio::test]
    async fn test_entries_are_reclaimed() {
        let guards = InflightGuards::new();
        let guard = guards.acquire(&key("a")).await;
        assert_eq!(guards.tracked_keys(), 1);
        drop(guard);
        // The dead weak entry is swept on the next acquire.
        let guard = guards.acquire(&key("b")).await;
        assert_eq!(guards.tracked_keys(), 1);
        drop(guard);
    }
}
