//! Per-session serialization of concurrent calls.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use skipery_common::SessionId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = Arc<Mutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>>;
type LockFuture = Pin<Box<dyn Future<Output = OwnedMutexGuard<()>> + Send>>;

/// One async mutex per active session id.
///
/// Calls for the same id queue behind each other; different ids never
/// contend. An entry lives only while some caller holds or awaits it.
#[derive(Debug, Default, Clone)]
pub struct SessionLocks {
    table: LockTable,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: &SessionId) -> SessionGuard {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(table.entry(id.clone()).or_default())
        };
        let mut waiting = Waiting {
            id: id.clone(),
            table: Arc::clone(&self.table),
            lock: Some(Box::pin(lock.lock_owned())),
        };
        let guard = (&mut waiting).await;
        SessionGuard {
            id: id.clone(),
            table: Arc::clone(&self.table),
            guard: Some(guard),
        }
    }

    /// Number of ids with an active or pending holder.
    pub fn active(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Drop the table entry for `id` if the table holds its last reference.
fn release_if_idle(table: &LockTable, id: &SessionId) {
    let mut table = table.lock().unwrap_or_else(PoisonError::into_inner);
    if table
        .get(id)
        .is_some_and(|lock| Arc::strong_count(lock) == 1)
    {
        table.remove(id);
    }
}

/// A caller queued on a session lock. Dropped unresolved when the
/// acquiring future is cancelled.
struct Waiting {
    id: SessionId,
    table: LockTable,
    lock: Option<LockFuture>,
}

impl Future for Waiting {
    type Output = OwnedMutexGuard<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.lock.as_mut() {
            Some(lock) => lock.as_mut().poll(cx),
            None => Poll::Pending,
        }
    }
}

impl Drop for Waiting {
    fn drop(&mut self) {
        // Our reference to the mutex lives inside the pending future.
        drop(self.lock.take());
        release_if_idle(&self.table, &self.id);
    }
}

/// Releases the session lock on drop, even when the owning future is
/// cancelled, and removes the table entry once nobody else needs it.
pub struct SessionGuard {
    id: SessionId,
    table: LockTable,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        release_if_idle(&self.table, &self.id);
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard").field("id", &self.id).finish()
    }
}
