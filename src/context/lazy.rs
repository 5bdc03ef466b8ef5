//! On-demand initialization with observable readiness.

use anyhow::Result;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::OnceCell;

/// Readiness of a lazily-initialized context.
///
/// `NotRequested -> Loading` on the first access, `Loading -> Ready` when
/// the initializer resolves. A failed or cancelled initialization falls
/// back to `NotRequested`, so the next access simply tries again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    NotRequested,
    Loading,
    Ready,
}

pub struct LazyProvider<T> {
    cell: OnceCell<T>,
    loading: AtomicBool,
}

impl<T> LazyProvider<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            loading: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ProviderState {
        if self.cell.initialized() {
            ProviderState::Ready
        } else if self.loading.load(Ordering::Acquire) {
            ProviderState::Loading
        } else {
            ProviderState::NotRequested
        }
    }

    /// Returns the value, running `init` on first access. Concurrent
    /// callers share one initialization. Dropping the returned future
    /// mid-flight discards the pending result; nothing is committed.
    pub async fn get_or_init<F, Fut>(&self, init: F) -> Result<&T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.cell
            .get_or_try_init(|| async {
                let _guard = LoadingGuard::arm(&self.loading);
                init().await
            })
            .await
    }
}

impl<T> Default for LazyProvider<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Clears the loading flag on success, failure and cancellation alike.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn arm(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
