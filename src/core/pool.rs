use crate::utils::error::{HarvestError, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};
use tokio::task::{AbortHandle, JoinHandle};

pub const DEFAULT_WORKERS: usize = 3;

#[derive(Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

/// 任務結束（完成、panic 或被中止）時遞減計數
struct InFlightGuard(Arc<InFlight>);

impl InFlightGuard {
    fn enter(in_flight: &Arc<InFlight>) -> Self {
        in_flight.count.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(in_flight))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// 固定大小的工作池：超過 `size` 的任務在 semaphore 上排隊
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
    accepting: AtomicBool,
    in_flight: Arc<InFlight>,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
            accepting: AtomicBool::new(true),
            in_flight: Arc::new(InFlight::default()),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::Acquire)
    }

    /// 尚未結束的任務數（含排隊中）
    pub fn pending_tasks(&self) -> usize {
        self.in_flight.count.load(Ordering::Acquire)
    }

    pub fn submit<F>(&self, task: F) -> Result<JoinHandle<Result<F::Output>>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if !self.is_accepting() {
            return Err(HarvestError::PoolUnavailable);
        }

        let guard = InFlightGuard::enter(&self.in_flight);
        let permits = Arc::clone(&self.permits);
        let handle = tokio::spawn(async move {
            let _guard = guard;
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| HarvestError::PoolUnavailable)?;
            Ok(task.await)
        });

        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.retain(|t| !t.is_finished());
            tasks.push(handle.abort_handle());
        }
        Ok(handle)
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.in_flight.idle.notified();
            if self.pending_tasks() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// 停止接收新任務，最多等待 `grace` 讓進行中與排隊中的任務結束，逾時則強制中止。
    ///
    /// 回傳 `true` 表示所有任務都在寬限期內完成。
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.accepting.store(false, Ordering::Release);
        tracing::debug!("Shutting down worker pool ({} pending tasks)", self.pending_tasks());

        let drained = tokio::time::timeout(grace, self.wait_idle()).await.is_ok();
        if !drained {
            tracing::warn!(
                "⏱️ Worker pool did not drain within {:?}, aborting {} tasks",
                grace,
                self.pending_tasks()
            );
            if let Ok(mut tasks) = self.tasks.lock() {
                for task in tasks.drain(..) {
                    task.abort();
                }
            }
        }

        self.permits.close();
        drained
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}
