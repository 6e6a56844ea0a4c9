//! Outbound configuration-change notifications for an embedding page.

use crate::config::Configuration;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::mpsc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MessageKind {
    UpdateConfig,
}

/// Tagged message carrying the session it belongs to, rather than encoding
/// the session into a transport-level name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfigMessage {
    pub kind: MessageKind,
    pub session: String,
    pub payload: Configuration,
}

impl ConfigMessage {
    pub fn update(session: &str, payload: Configuration) -> Self {
        Self {
            kind: MessageKind::UpdateConfig,
            session: session.to_string(),
            payload,
        }
    }
}

/// Fire-and-forget sink for [`ConfigMessage`]s. Delivery is best-effort.
pub trait ConfigNotifier {
    fn notify(&self, message: ConfigMessage);
}

/// Discards every message; used when the app is not embedded.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl ConfigNotifier for NullNotifier {
    fn notify(&self, _message: ConfigMessage) {}
}

/// Forwards messages into a channel, for embedders that consume updates
/// away from the DOM (a worker, a native host, a test harness).
#[derive(Clone, Debug)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<ConfigMessage>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::Receiver<ConfigMessage>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl ConfigNotifier for ChannelNotifier {
    fn notify(&self, message: ConfigMessage) {
        if self.tx.send(message).is_err() {
            log::debug!("[notify] receiver dropped; message discarded");
        }
    }
}

/// Queues messages until [`DeferredNotifier::flush`] hands them to the inner
/// notifier.
///
/// The store notifies from inside an update, while its owner still holds it
/// mutably. Clones share one queue, so the owner keeps a clone and flushes
/// after releasing the store; listeners reached from `flush` may then read or
/// update the store again.
pub struct DeferredNotifier<N> {
    queue: Rc<RefCell<VecDeque<ConfigMessage>>>,
    inner: Rc<N>,
}

impl<N> DeferredNotifier<N> {
    pub fn new(inner: N) -> Self {
        Self {
            queue: Rc::default(),
            inner: Rc::new(inner),
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl<N: ConfigNotifier> DeferredNotifier<N> {
    /// Deliver queued messages in order, including any queued while flushing.
    pub fn flush(&self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(message) => self.inner.notify(message),
                None => break,
            }
        }
    }
}

impl<N> Clone for DeferredNotifier<N> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<N> ConfigNotifier for DeferredNotifier<N> {
    fn notify(&self, message: ConfigMessage) {
        self.queue.borrow_mut().push_back(message);
    }
}

impl<N: ConfigNotifier + ?Sized> ConfigNotifier for Box<N> {
    fn notify(&self, message: ConfigMessage) {
        (**self).notify(message)
    }
}
