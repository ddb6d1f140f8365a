//! Change broadcaster.
//!
//! Maintains the set of live subscribers and pushes every committed
//! document change to all of them, plus a periodic heartbeat. The
//! subscriber set is the single synchronization point: inserts from new
//! connections, removals on disconnect, and the publish fan-out all go
//! through the same mutex-guarded map instead of serializing through a
//! queue.
//!
//! Disconnect detection is lazy: each push is an independent fallible
//! operation, and failed pushes are collected into a removal batch that is
//! processed after the full fan-out pass. One unreachable subscriber never
//! affects delivery to the others or the lifecycle operation that
//! triggered the publish.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use docflow_core::models::{ChangeEvent, Document};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Buffered events per subscriber. A subscriber that falls this far behind
/// is treated the same as a disconnected one.
const SUBSCRIBER_BUFFER: usize = 64;

/// Handle for one live subscriber. Dropping it unsubscribes promptly;
/// a dangling sender is additionally pruned on the next failed push.
pub struct Subscription {
    id: Uuid,
    receiver: mpsc::Receiver<ChangeEvent>,
    broadcaster: Weak<ChangeBroadcaster>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Receive the next event; `None` once the broadcaster is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(broadcaster) = self.broadcaster.upgrade() {
            broadcaster.unsubscribe(self.id);
        }
    }
}

#[derive(Default)]
pub struct ChangeBroadcaster {
    subscribers: Mutex<HashMap<Uuid, mpsc::Sender<ChangeEvent>>>,
}

impl ChangeBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. It only sees events emitted after this
    /// call; there is no backlog or replay.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let (sender, receiver) = mpsc::channel(SUBSCRIBER_BUFFER);
        let id = Uuid::new_v4();
        self.subscribers.lock().unwrap().insert(id, sender);
        tracing::debug!(subscriber_id = %id, "Subscriber registered");
        Subscription {
            id,
            receiver,
            broadcaster: Arc::downgrade(self),
        }
    }

    /// Remove a subscriber explicitly (connection reported closure).
    pub fn unsubscribe(&self, id: Uuid) {
        if self.subscribers.lock().unwrap().remove(&id).is_some() {
            tracing::debug!(subscriber_id = %id, "Subscriber removed");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }

    /// Push a committed document change to every active subscriber.
    pub fn publish(&self, document: Document) {
        self.fan_out(ChangeEvent::document(document));
    }

    /// Push a keep-alive to every active subscriber.
    pub fn heartbeat(&self) {
        self.fan_out(ChangeEvent::heartbeat());
    }

    fn fan_out(&self, event: ChangeEvent) {
        // Snapshot the senders so new connections and removals never block
        // behind the fan-out pass.
        let targets: Vec<(Uuid, mpsc::Sender<ChangeEvent>)> = {
            let subscribers = self.subscribers.lock().unwrap();
            subscribers
                .iter()
                .map(|(id, sender)| (*id, sender.clone()))
                .collect()
        };

        let mut dead = Vec::new();
        for (id, sender) in targets {
            if sender.try_send(event.clone()).is_err() {
                dead.push(id);
            }
        }

        if !dead.is_empty() {
            let mut subscribers = self.subscribers.lock().unwrap();
            for id in &dead {
                subscribers.remove(id);
            }
            tracing::debug!(
                removed = dead.len(),
                remaining = subscribers.len(),
                "Pruned dead subscribers after fan-out"
            );
        }
    }

    /// Start the periodic heartbeat task. Returns a JoinHandle the caller
    /// may abort on shutdown.
    pub fn start_heartbeat(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let broadcaster = Arc::clone(self);
        tokio::spawn(async move {
            let mut heartbeat_interval = tokio::time::interval(interval);
            loop {
                heartbeat_interval.tick().await;
                broadcaster.heartbeat();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docflow_core::models::DocumentStatus;

    fn test_document(id: &str) -> Document {
        Document {
            document_id: id.to_string(),
            file_name: format!("{}.pdf", id),
            size: 50,
            mimetype: "application/pdf".to_string(),
            status: DocumentStatus::Pending,
            created_at: Utc::now(),
            deleted_at: None,
            purge_at: None,
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_document() {
        let broadcaster = Arc::new(ChangeBroadcaster::new());
        let mut subscription = broadcaster.subscribe();

        broadcaster.publish(test_document("d1"));

        match subscription.recv().await {
            Some(ChangeEvent::Document { document }) => {
                assert_eq!(document.document_id, "d1");
            }
            other => panic!("expected document event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_backlog_for_late_subscribers() {
        let broadcaster = Arc::new(ChangeBroadcaster::new());
        broadcaster.publish(test_document("before"));

        let mut subscription = broadcaster.subscribe();
        broadcaster.publish(test_document("after"));

        match subscription.recv().await {
            Some(ChangeEvent::Document { document }) => {
                assert_eq!(document.document_id, "after");
            }
            other => panic!("expected document event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dead_subscriber_is_pruned_within_one_publish() {
        let broadcaster = Arc::new(ChangeBroadcaster::new());
        let mut alive = broadcaster.subscribe();
        let dead = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 2);

        // Closing the receiving end without the Drop cleanup simulates a
        // transport-level failure the broadcaster only sees on push.
        let mut dead = std::mem::ManuallyDrop::new(dead);
        dead.receiver.close();

        broadcaster.publish(test_document("d1"));
        assert_eq!(broadcaster.subscriber_count(), 1);

        // The remaining subscriber still got the event
        match alive.recv().await {
            Some(ChangeEvent::Document { document }) => {
                assert_eq!(document.document_id, "d1");
            }
            other => panic!("expected document event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let broadcaster = Arc::new(ChangeBroadcaster::new());
        let subscription = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 1);
        drop(subscription);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_heartbeat_reaches_subscribers() {
        let broadcaster = Arc::new(ChangeBroadcaster::new());
        let mut subscription = broadcaster.subscribe();

        broadcaster.heartbeat();

        match subscription.recv().await {
            Some(ChangeEvent::Heartbeat { .. }) => {}
            other => panic!("expected heartbeat event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_explicit_unsubscribe() {
        let broadcaster = Arc::new(ChangeBroadcaster::new());
        let subscription = broadcaster.subscribe();
        broadcaster.unsubscribe(subscription.id());
        assert_eq!(broadcaster.subscriber_count(), 0);
    }
}
