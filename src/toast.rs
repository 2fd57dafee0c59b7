use std::sync::{Arc, Mutex};
use std::time::Duration;

#[cfg(all(feature = "app", not(test)))]
use tauri::async_runtime::{spawn, JoinHandle};
#[cfg(not(all(feature = "app", not(test))))]
use tokio::{spawn, task::JoinHandle};

use crate::events::ToastPayload;

pub const TOAST_DURATION: Duration = Duration::from_secs(2);

/// Receives show/hide notifications; in the app this forwards them to the webview.
pub trait ToastSink: Send + Sync + 'static {
    fn publish(&self, payload: ToastPayload);
}

/// Shows one transient message at a time and hides it after a fixed delay.
///
/// The pending dismissal is a task on the async runtime. Showing a new message aborts
/// it, and [`Toasts::close`] aborts it for good once the window it targets is gone.
#[derive(Clone)]
pub struct Toasts {
    sink: Arc<dyn ToastSink>,
    duration: Duration,
    inner: Arc<Mutex<ToastState>>,
}

#[derive(Default)]
struct ToastState {
    next_id: u64,
    pending: Option<(u64, JoinHandle<()>)>,
    closed: bool,
}

impl Toasts {
    pub fn new(sink: Arc<dyn ToastSink>) -> Self {
        Self::with_duration(sink, TOAST_DURATION)
    }

    pub fn with_duration(sink: Arc<dyn ToastSink>, duration: Duration) -> Self {
        Self {
            sink,
            duration,
            inner: Arc::new(Mutex::new(ToastState::default())),
        }
    }

    /// Returns the id of the shown message, or `None` once closed.
    pub fn show(&self, message: &str) -> Option<u64> {
        let mut guard = self.inner.lock().expect("toast state poisoned");
        if guard.closed {
            log::debug!("toast: dropped after close message={message}");
            return None;
        }
        if let Some((_, handle)) = guard.pending.take() {
            handle.abort();
        }
        guard.next_id += 1;
        let id = guard.next_id;
        self.sink.publish(ToastPayload {
            id,
            message: message.to_string(),
            visible: true,
        });

        let toasts = self.clone();
        let message = message.to_string();
        let handle = spawn(async move {
            tokio::time::sleep(toasts.duration).await;
            toasts.dismiss(id, message);
        });
        guard.pending = Some((id, handle));
        Some(id)
    }

    fn dismiss(&self, id: u64, message: String) {
        let mut guard = self.inner.lock().expect("toast state poisoned");
        let current = matches!(&guard.pending, Some((pending, _)) if *pending == id);
        if guard.closed || !current {
            return;
        }
        guard.pending = None;
        self.sink.publish(ToastPayload {
            id,
            message,
            visible: false,
        });
    }

    /// Cancels the pending dismissal and ignores every later `show`.
    pub fn close(&self) {
        let mut guard = self.inner.lock().expect("toast state poisoned");
        guard.closed = true;
        if let Some((id, handle)) = guard.pending.take() {
            log::debug!("toast: cancelled pending dismissal id={id}");
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        published: Mutex<Vec<ToastPayload>>,
    }

    impl RecordingSink {
        fn published(&self) -> Vec<ToastPayload> {
            self.published.lock().unwrap().clone()
        }
    }

    impl ToastSink for RecordingSink {
        fn publish(&self, payload: ToastPayload) {
            self.published.lock().unwrap().push(payload);
        }
    }

    fn make_toasts() -> (Arc<RecordingSink>, Toasts) {
        let sink = Arc::new(RecordingSink::default());
        let toasts = Toasts::new(sink.clone());
        (sink, toasts)
    }

    async fn advance(duration: Duration) {
        tokio::time::sleep(duration).await;
        // Let the woken dismissal task run.
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn toast_is_dismissed_after_two_seconds() {
        let (sink, toasts) = make_toasts();
        let id = toasts.show("copied").unwrap();
        assert_eq!(
            sink.published(),
            vec![ToastPayload {
                id,
                message: "copied".into(),
                visible: true
            }]
        );

        advance(Duration::from_millis(1900)).await;
        assert_eq!(sink.published().len(), 1);

        advance(Duration::from_millis(200)).await;
        let published = sink.published();
        assert_eq!(published.len(), 2);
        assert_eq!(
            published[1],
            ToastPayload {
                id,
                message: "copied".into(),
                visible: false
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn newer_toast_replaces_older_timer() {
        let (sink, toasts) = make_toasts();
        let first = toasts.show("first").unwrap();
        advance(Duration::from_millis(1500)).await;
        let second = toasts.show("second").unwrap();
        assert_ne!(first, second);

        // The first timer would have fired here; it was aborted.
        advance(Duration::from_millis(1000)).await;
        assert!(sink.published().iter().all(|p| p.visible));

        advance(Duration::from_millis(1100)).await;
        let hidden: Vec<_> = sink
            .published()
            .into_iter()
            .filter(|p| !p.visible)
            .collect();
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].id, second);
    }

    #[tokio::test(start_paused = true)]
    async fn close_cancels_pending_dismissal_and_later_shows() {
        let (sink, toasts) = make_toasts();
        toasts.show("bye").unwrap();
        toasts.close();

        advance(Duration::from_secs(5)).await;
        assert_eq!(sink.published().len(), 1);

        assert_eq!(toasts.show("ignored"), None);
        assert_eq!(sink.published().len(), 1);

        // Closing twice is harmless.
        toasts.close();
    }
}
