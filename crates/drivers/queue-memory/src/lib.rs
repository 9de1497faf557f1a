#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Nebula Queue Memory Driver
//!
//! In-memory bounded task queue implementing the [`TaskQueue`] port.
//!
//! Uses `tokio::sync::mpsc` for the main queue channel and a `DashMap`
//! to track in-flight tasks for ack/nack semantics.
//!
//! Suitable for desktop and single-process deployments where durability
//! is not required.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nebula_queue_memory::MemoryQueue;
//! use nebula_ports::TaskQueue;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let queue = MemoryQueue::new(1024);
//! let task_id = queue.enqueue(serde_json::json!({"action": "send_email"})).await?;
//! let item = queue.dequeue(Duration::from_secs(1)).await?;
//! if let Some((id, payload)) = item {
//!     // process task...
//!     queue.ack(&id).await?;
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use nebula_ports::TaskQueue;
use nebula_ports::error::PortsError;
use tokio::sync::{Mutex, mpsc};

/// An item in the queue: task ID + payload.
#[derive(Debug, Clone)]
struct QueueItem {
    id: String,
    payload: serde_json::Value,
}

/// In-memory bounded task queue.
///
/// Tasks flow through three states:
/// 1. **Queued** -- sitting in the mpsc channel
/// 2. **In-flight** -- dequeued, awaiting ack/nack
/// 3. **Done** -- acked (removed) or nacked (requeued)
pub struct MemoryQueue {
    sender: mpsc::Sender<QueueItem>,
    receiver: Arc<Mutex<mpsc::Receiver<QueueItem>>>,
    in_flight: Arc<Mutex<HashMap<String, QueueItem>>>,
    queued_count: AtomicUsize,
}

impl MemoryQueue {
    /// Create a new memory queue with the given capacity.
    ///
    /// The capacity determines the maximum number of tasks that can be
    /// buffered in the queue. Enqueue will fail with `PortsError::Internal`
    /// when the queue is full.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            queued_count: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TaskQueue for MemoryQueue {
    async fn enqueue(&self, payload: serde_json::Value) -> Result<String, PortsError> {
        let id = uuid::Uuid::new_v4().to_string();
        let item = QueueItem {
            id: id.clone(),
            payload,
        };
        self.sender
            .try_send(item)
            .map_err(|e| PortsError::Internal(format!("queue full or closed: {e}")))?;
        self.queued_count.fetch_add(1, Ordering::Relaxed);
        Ok(id)
    }

    async fn dequeue(
        &self,
        timeout: Duration,
    ) -> Result<Option<(String, serde_json::Value)>, PortsError> {
        let mut rx = self.receiver.lock().await;
        let result = tokio::time::timeout(timeout, rx.recv()).await;
        match result {
            Ok(Some(item)) => {
                self.queued_count.fetch_sub(1, Ordering::Relaxed);
                let id = item.id.clone();
                let payload = item.payload.clone();
                self.in_flight.lock().await.insert(id.clone(), item);
                Ok(Some((id, payload)))
            }
            Ok(None) => {
                // Channel closed.
                Ok(None)
            }
            Err(_) => {
                // Timeout.
                Ok(None)
            }
        }
    }

    async fn ack(&self, task_id: &str) -> Result<(), PortsError> {
        let removed = self.in_flight.lock().await.remove(task_id);
        if removed.is_none() {
            return Err(PortsError::not_found("Task", task_id));
        }
        Ok(())
    }

    async fn nack(&self, task_id: &str) -> Result<(), PortsError> {
        let item = self.in_flight.lock().await.remove(task_id);
        match item {
            Some(item) => {
                self.sender
                    .try_send(item)
                    .map_err(|e| PortsError::Internal(format!("requeue failed: {e}")))?;
                self.queued_count.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            None => Err(PortsError::not_found("Task", task_id)),
        }
    }

    async fn len(&self) -> Result<usize, PortsError> {
        Ok(self.queued_count.load(Ordering::Relaxed))
    }
}
