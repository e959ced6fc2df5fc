//! Bounded multi-producer, multi-consumer work queue
//!
//! A thin layer over a bounded `tokio::sync::mpsc` channel whose receiver is
//! shared by a pool of workers. Only the owner closes the queue; once closed,
//! sends fail and receivers drain what is buffered before seeing `None`.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch, Mutex};

/// Returned when sending on a closed queue
#[derive(Debug, Error, PartialEq, Eq)]
#[error("work queue is closed")]
pub struct QueueClosed;

/// A bounded FIFO shared between producer and consumer pools
#[derive(Debug)]
pub struct WorkQueue<T> {
    sender: mpsc::Sender<T>,
    receiver: Arc<Mutex<mpsc::Receiver<T>>>,
    closed: Arc<watch::Sender<bool>>,
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            receiver: Arc::clone(&self.receiver),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<T: Send> WorkQueue<T> {
    /// Creates a queue that holds at most `capacity` items
    pub fn bounded(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        let (closed, _) = watch::channel(false);
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            closed: Arc::new(closed),
        }
    }

    /// Appends an item, waiting while the queue is full
    pub async fn send(&self, item: T) -> Result<(), QueueClosed> {
        if self.is_closed() {
            return Err(QueueClosed);
        }
        self.sender.send(item).await.map_err(|_| QueueClosed)
    }

    /// Appends an item only if there is room right now
    ///
    /// A full queue hands the item back in `TrySendError::Full`.
    pub fn try_send(&self, item: T) -> Result<(), TrySendError<T>> {
        if self.is_closed() {
            return Err(TrySendError::Closed(item));
        }
        self.sender.try_send(item)
    }

    /// Waits for a free slot and reserves it
    pub async fn reserve(&self) -> Result<mpsc::Permit<'_, T>, QueueClosed> {
        if self.is_closed() {
            return Err(QueueClosed);
        }
        self.sender.reserve().await.map_err(|_| QueueClosed)
    }

    /// Takes the next item
    ///
    /// Waits while the queue is empty and open. Returns `None` once the queue
    /// is closed and every buffered item has been taken.
    pub async fn recv(&self) -> Option<T> {
        let mut receiver = self.receiver.lock().await;
        let mut closed = self.closed.subscribe();

        if !*closed.borrow_and_update() {
            tokio::select! {
                item = receiver.recv() => return item,
                _ = closed.wait_for(|closed| *closed) => {}
            }
        }

        receiver.close();
        receiver.recv().await
    }

    /// Closes the queue; further sends fail, buffered items stay receivable
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Number of buffered items (sends in progress count as buffered)
    pub fn len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
