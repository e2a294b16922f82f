//! Push-based query subscriptions.
//!
//! A [`Subscription`] receives the query result once when it is created
//! and again after every committed write that changed rows in one of the
//! tables the query reads. Snapshots are computed on the writer's thread
//! and queued on an unbounded channel, so the receiver can consume them
//! from any thread or task.

use rusqlite::Connection;
use storebench_core::StoreError;
use tokio::sync::mpsc;

use crate::table::TableId;

/// Sending side of one watched query.
pub(crate) trait Sink: Send {
    /// True once the [`Subscription`] has been dropped.
    fn is_closed(&self) -> bool;

    /// Re-run the query and push the result. Returns `Ok(false)` if the
    /// receiving side went away.
    fn refresh(&mut self, conn: &Connection) -> Result<bool, StoreError>;
}

struct QuerySink<T, F> {
    tx: mpsc::UnboundedSender<T>,
    query: F,
}

impl<T, F> Sink for QuerySink<T, F>
where
    T: Send + 'static,
    F: Fn(&Connection) -> Result<T, StoreError> + Send + 'static,
{
    fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn refresh(&mut self, conn: &Connection) -> Result<bool, StoreError> {
        let snapshot = (self.query)(conn)?;
        Ok(self.tx.send(snapshot).is_ok())
    }
}

struct Watcher {
    id: u64,
    tables: Vec<TableId>,
    sink: Box<dyn Sink>,
}

/// Live watchers of one store, keyed by subscription id.
#[derive(Default)]
pub struct WatchRegistry {
    next_id: u64,
    watchers: Vec<Watcher>,
}

impl WatchRegistry {
    pub(crate) fn register(&mut self, tables: Vec<TableId>, sink: Box<dyn Sink>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.watchers.push(Watcher { id, tables, sink });
        id
    }

    /// Drop a watcher. Returns false if the id was unknown.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.watchers.len();
        self.watchers.retain(|w| w.id != id);
        self.watchers.len() != before
    }

    /// Number of registered watchers, including ones whose receiver has
    /// been dropped since the last notification.
    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    /// Prune every closed watcher, then refresh the ones reading one of
    /// `changed`.
    ///
    /// A failed refresh keeps the watcher registered; the next write
    /// retries it.
    pub(crate) fn notify(&mut self, conn: &Connection, changed: &[TableId]) {
        self.watchers.retain_mut(|w| {
            if w.sink.is_closed() {
                log::debug!("Subscription {} closed", w.id);
                return false;
            }
            if !w.tables.iter().any(|t| changed.contains(t)) {
                return true;
            }
            match w.sink.refresh(conn) {
                Ok(open) => {
                    if !open {
                        log::debug!("Subscription {} closed", w.id);
                    }
                    open
                }
                Err(e) => {
                    log::warn!("Subscription {} refresh failed: {}", w.id, e);
                    true
                }
            }
        });
    }
}

/// Receiving end of a watched query.
///
/// Dropping it unsubscribes; the registry prunes the slot on the next
/// notification.
pub struct Subscription<T> {
    id: u64,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(id: u64, rx: mpsc::UnboundedReceiver<T>) -> Self {
        Self { id, rx }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next snapshot. `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Blocking variant of [`recv`](Self::recv) for non-async callers.
    ///
    /// Panics if called from within an async runtime.
    pub fn blocking_recv(&mut self) -> Option<T> {
        self.rx.blocking_recv()
    }

    /// The next queued snapshot, if any.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Drain the queue and return only the newest snapshot.
    pub fn latest(&mut self) -> Option<T> {
        let mut last = None;
        while let Ok(snapshot) = self.rx.try_recv() {
            last = Some(snapshot);
        }
        last
    }

    /// Number of snapshots waiting to be received.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Run `query` once for the initial snapshot and build the sink that
/// keeps the subscription current.
pub(crate) fn subscribe<T, F>(
    conn: &Connection,
    query: F,
) -> Result<(Box<dyn Sink>, mpsc::UnboundedReceiver<T>), StoreError>
where
    T: Send + 'static,
    F: Fn(&Connection) -> Result<T, StoreError> + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let initial = query(conn)?;
    // The receiver is still in scope, so this cannot fail.
    let _ = tx.send(initial);
    Ok((Box::new(QuerySink { tx, query }), rx))
}
