use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::store::{BotStore, DigestArtifacts};

use super::{notify_all, DeliveryError, SubscriberTransport};

#[derive(Debug, Clone, Copy)]
enum FailureMode {
    PermanentOnPlot,
    PermanentOnDigest,
    TransientOnPlot,
}

#[derive(Default)]
struct MockTransport {
    failures: HashMap<i64, FailureMode>,
    calls: Mutex<Vec<(i64, &'static str)>>,
}

impl MockTransport {
    fn failing(failures: HashMap<i64, FailureMode>) -> Self {
        Self {
            failures,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls_for(&self, chat_id: i64) -> Vec<&'static str> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, kind)| *kind)
            .collect()
    }
}

impl SubscriberTransport for MockTransport {
    async fn send_plot(
        &self,
        chat_id: i64,
        _png: &[u8],
        _caption: &str,
    ) -> Result<(), DeliveryError> {
        match self.failures.get(&chat_id) {
            Some(FailureMode::PermanentOnPlot) => {
                Err(DeliveryError::Permanent("blocked".to_string()))
            }
            Some(FailureMode::TransientOnPlot) => {
                Err(DeliveryError::Transient("timeout".to_string()))
            }
            _ => {
                self.calls.lock().expect("calls lock").push((chat_id, "plot"));
                Ok(())
            }
        }
    }

    async fn send_digest(&self, chat_id: i64, _text: &str) -> Result<(), DeliveryError> {
        match self.failures.get(&chat_id) {
            Some(FailureMode::PermanentOnDigest) => {
                Err(DeliveryError::Permanent("blocked".to_string()))
            }
            _ => {
                self.calls
                    .lock()
                    .expect("calls lock")
                    .push((chat_id, "digest"));
                Ok(())
            }
        }
    }
}

fn store_with_subscribers(path: &std::path::Path, chat_ids: &[i64]) -> BotStore {
    let store = BotStore::open_at(&path.to_string_lossy()).expect("open store");
    for chat_id in chat_ids {
        store.subscribers.add(*chat_id, Utc::now()).expect("add subscriber");
    }
    store
}

fn artifacts() -> DigestArtifacts {
    DigestArtifacts {
        digest: "<b>digest</b>".to_string(),
        plot_png: vec![1, 2, 3],
    }
}

#[tokio::test]
async fn permanent_failure_prunes_only_the_failing_subscriber() {
    let temp = tempfile::tempdir().expect("temp dir");
    let store = store_with_subscribers(temp.path(), &[1, 2, 3]);
    let transport = MockTransport::failing(HashMap::from([(2, FailureMode::PermanentOnPlot)]));

    let report = notify_all(&transport, &store.subscribers, &artifacts()).await;

    assert_eq!(report.delivered, 2);
    assert_eq!(report.pruned, 1);
    assert_eq!(report.failed, 0);

    let mut remaining = store.subscribers.list();
    remaining.sort_unstable();
    assert_eq!(remaining, vec![1, 3]);

    assert_eq!(transport.calls_for(1), vec!["plot", "digest"]);
    assert_eq!(transport.calls_for(3), vec!["plot", "digest"]);
    assert!(transport.calls_for(2).is_empty());
}

#[tokio::test]
async fn permanent_failure_on_the_text_leg_still_prunes() {
    let temp = tempfile::tempdir().expect("temp dir");
    let store = store_with_subscribers(temp.path(), &[10, 20]);
    let transport = MockTransport::failing(HashMap::from([(20, FailureMode::PermanentOnDigest)]));

    let report = notify_all(&transport, &store.subscribers, &artifacts()).await;

    assert_eq!(report.delivered, 1);
    assert_eq!(report.pruned, 1);
    assert_eq!(store.subscribers.list(), vec![10]);
    // The failing subscriber got the plot before the text leg was rejected.
    assert_eq!(transport.calls_for(20), vec!["plot"]);
}

#[tokio::test]
async fn transient_failure_keeps_the_subscriber() {
    let temp = tempfile::tempdir().expect("temp dir");
    let store = store_with_subscribers(temp.path(), &[7, 8]);
    let transport = MockTransport::failing(HashMap::from([(7, FailureMode::TransientOnPlot)]));

    let report = notify_all(&transport, &store.subscribers, &artifacts()).await;

    assert_eq!(report.delivered, 1);
    assert_eq!(report.pruned, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(store.subscribers.count(), 2);
    // No partial delivery: the text leg is skipped once the plot leg fails.
    assert!(transport.calls_for(7).is_empty());
}

#[tokio::test]
async fn empty_subscriber_set_is_a_no_op() {
    let temp = tempfile::tempdir().expect("temp dir");
    let store = store_with_subscribers(temp.path(), &[]);
    let transport = MockTransport::default();

    let report = notify_all(&transport, &store.subscribers, &artifacts()).await;

    assert_eq!(report.delivered, 0);
    assert_eq!(report.pruned, 0);
    assert_eq!(report.failed, 0);
}
