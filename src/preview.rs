use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

struct PoolInner {
    limit: usize,
    live: AtomicUsize,
    issued: AtomicU64,
}

/// Hands out preview handles up to a fixed number of live handles.
///
/// Clones share the same budget. A handle returns its slot when dropped, so
/// removing an item or clearing the sequence releases it exactly once.
#[derive(Clone)]
pub struct PreviewPool {
    inner: Arc<PoolInner>,
}

impl PreviewPool {
    pub fn new(limit: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                limit,
                live: AtomicUsize::new(0),
                issued: AtomicU64::new(0),
            }),
        }
    }

    /// Returns `None` once the pool is exhausted; the item is then shown without a preview.
    pub fn acquire(&self) -> Option<PreviewHandle> {
        let limit = self.inner.limit;
        self.inner
            .live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < limit).then_some(n + 1))
            .ok()?;
        let id = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Some(PreviewHandle {
            id,
            pool: Arc::clone(&self.inner),
        })
    }

    pub fn live(&self) -> usize {
        self.inner.live.load(Ordering::SeqCst)
    }

    pub fn limit(&self) -> usize {
        self.inner.limit
    }
}

impl fmt::Debug for PreviewPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewPool")
            .field("limit", &self.inner.limit)
            .field("live", &self.live())
            .finish()
    }
}

pub struct PreviewHandle {
    id: u64,
    pool: Arc<PoolInner>,
}

impl PreviewHandle {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.pool.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PreviewHandle({})", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_pool_refuses_until_a_handle_drops() {
        let pool = PreviewPool::new(2);
        let a = pool.acquire().unwrap();
        let _b = pool.acquire().unwrap();
        assert!(pool.acquire().is_none());
        assert_eq!(pool.live(), 2);

        drop(a);
        assert_eq!(pool.live(), 1);
        let c = pool.acquire().unwrap();
        assert_eq!(c.id(), 3);
    }

    #[test]
    fn clones_share_one_budget() {
        let pool = PreviewPool::new(1);
        let other = pool.clone();
        let _h = pool.acquire().unwrap();
        assert!(other.acquire().is_none());
        assert_eq!(other.live(), 1);
    }
}
