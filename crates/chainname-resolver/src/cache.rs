//! Per-chain cache of the resolver contract address.

use alloy_primitives::Address;
use std::collections::HashMap;
use std::future::Future;
use std::sync::RwLock;

/// Resolver address per chain ID.
///
/// Shared by all requests. An entry is written once and never replaced;
/// failed lookups leave no entry, so the next request retries.
#[derive(Debug, Default)]
pub struct ResolverAddressCache {
    entries: RwLock<HashMap<u64, Address>>,
}

impl ResolverAddressCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chain_id: u64) -> Option<Address> {
        self.entries
            .read()
            .ok()
            .and_then(|map| map.get(&chain_id).copied())
    }

    /// Return the cached address or run `compute` and store its result.
    ///
    /// Concurrent misses may each run `compute`; the first stored value wins
    /// and is returned to every caller.
    pub async fn get_or_try_compute<F, Fut, E>(&self, chain_id: u64, compute: F) -> Result<Address, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Address, E>>,
    {
        if let Some(address) = self.get(chain_id) {
            return Ok(address);
        }

        tracing::debug!(chain_id, "resolver address cache miss");
        let computed = compute().await?;

        match self.entries.write() {
            Ok(mut map) => Ok(*map.entry(chain_id).or_insert(computed)),
            // A poisoned lock only loses the cache write.
            Err(_) => Ok(computed),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn computes_once() {
        let cache = ResolverAddressCache::new();
        let calls = AtomicUsize::new(0);
        let addr = Address::repeat_byte(0xaa);

        for _ in 0..3 {
            let got = cache
                .get_or_try_compute(10000, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(addr)
                })
                .await
                .unwrap();
            assert_eq!(got, addr);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = ResolverAddressCache::new();
        let err = cache
            .get_or_try_compute(2000, || async { Err::<Address, _>("boom") })
            .await;
        assert_eq!(err, Err("boom"));
        assert!(cache.is_empty());

        let addr = Address::repeat_byte(0x01);
        let ok = cache
            .get_or_try_compute(2000, || async { Ok::<_, &str>(addr) })
            .await;
        assert_eq!(ok, Ok(addr));
    }

    #[tokio::test]
    async fn racing_misses_agree_on_first_write() {
        let cache = ResolverAddressCache::new();
        let barrier = tokio::sync::Barrier::new(2);
        let compute = |byte: u8| {
            let barrier = &barrier;
            move || async move {
                barrier.wait().await;
                Ok::<_, ()>(Address::repeat_byte(byte))
            }
        };

        let (a, b) = tokio::join!(
            cache.get_or_try_compute(1, compute(0x01)),
            cache.get_or_try_compute(1, compute(0x02)),
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn chains_are_independent() {
        let cache = ResolverAddressCache::new();
        let a = Address::repeat_byte(0x0a);
        let b = Address::repeat_byte(0x0b);
        cache.get_or_try_compute(1, || async { Ok::<_, ()>(a) }).await.unwrap();
        cache.get_or_try_compute(2, || async { Ok::<_, ()>(b) }).await.unwrap();
        assert_eq!(cache.get(1), Some(a));
        assert_eq!(cache.get(2), Some(b));
    }
}
