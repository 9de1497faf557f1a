use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nebula_plugin_protocol::{JsonRpcError, RequestId, Response};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::timeout;

use crate::error::SandboxError;

type Pending = HashMap<i64, oneshot::Sender<Response>>;

/// Allocates monotonic request ids and matches responses read off a tool
/// server's stdout back to the caller awaiting them.
///
/// The reader task that actually parses stdout lines lives in
/// [`crate::process::ChildProcess`]; this type only owns the id allocator
/// and the `pending` table those lines are resolved against.
#[derive(Clone)]
pub struct RequestMultiplexer {
    next_id: Arc<AtomicI64>,
    pending: Arc<Mutex<Pending>>,
    server_name: Arc<str>,
}

impl RequestMultiplexer {
    pub fn new(server_name: impl Into<Arc<str>>) -> Self {
        Self {
            next_id: Arc::new(AtomicI64::new(1)),
            pending: Arc::new(Mutex::new(HashMap::new())),
            server_name: server_name.into(),
        }
    }

    pub fn next_request_id(&self) -> RequestId {
        RequestId::Number(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a waiter for `id`, to be resolved by [`Self::resolve`] or
    /// dropped (and the request failed) after `deadline`.
    pub async fn wait_for(
        &self,
        id: RequestId,
        deadline: Duration,
    ) -> Result<Response, SandboxError> {
        let RequestId::Number(raw) = id else {
            return Err(SandboxError::Transport {
                server: self.server_name.to_string(),
                message: "multiplexer only allocates numeric ids".to_string(),
            });
        };
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(raw, tx);

        match timeout(deadline, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(SandboxError::Transport {
                server: self.server_name.to_string(),
                message: "response channel dropped".to_string(),
            }),
            Err(_) => {
                self.pending.lock().remove(&raw);
                Err(SandboxError::RequestTimeout {
                    server: self.server_name.to_string(),
                    elapsed: deadline,
                })
            }
        }
    }

    /// Called by the reader task for every parsed response line.
    pub fn resolve(&self, response: Response) {
        let RequestId::Number(raw) = response.id else {
            return;
        };
        if let Some(tx) = self.pending.lock().remove(&raw) {
            let _ = tx.send(response);
        }
    }

    /// Fails every still-pending request, used when the child process dies
    /// or the server transitions to `FAILED`.
    pub fn fail_all(&self, message: &str) {
        let pending: Vec<_> = self.pending.lock().drain().collect();
        for (id, tx) in pending {
            let _ = tx.send(Response::failure(
                RequestId::Number(id),
                JsonRpcError::new(-32000, message.to_string()),
            ));
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn allocates_increasing_ids() {
        let mux = RequestMultiplexer::new("srv");
        let a = mux.next_request_id();
        let b = mux.next_request_id();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn resolve_delivers_matching_response() {
        let mux = RequestMultiplexer::new("srv");
        let id = mux.next_request_id();
        let mux2 = mux.clone();
        let id2 = id.clone();
        tokio::spawn(async move {
            mux2.resolve(Response::success(id2, json!({"ok": true})));
        });
        let response = mux.wait_for(id, Duration::from_secs(1)).await.unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn wait_for_times_out_when_unresolved() {
        let mux = RequestMultiplexer::new("srv");
        let id = mux.next_request_id();
        let err = mux
            .wait_for(id, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, SandboxError::RequestTimeout { .. }));
        assert_eq!(mux.pending_count(), 0);
    }

    #[tokio::test]
    async fn fail_all_resolves_pending_with_error() {
        let mux = RequestMultiplexer::new("srv");
        let id = mux.next_request_id();
        let mux2 = mux.clone();
        let handle = tokio::spawn(async move { mux.wait_for(id, Duration::from_secs(5)).await });
        tokio::task::yield_now().await;
        mux2.fail_all("server died");
        let response = handle.await.unwrap().unwrap();
        assert!(!response.is_success());
    }
}
