//! Seams for abstracting the push-event transport and the state container.
//!
//! The [`EventSource`] trait decouples the user list from a specific
//! real-time transport, and [`Dispatch`] decouples it from a specific state
//! container. Both are injected into [`crate::UserList::mount`], so tests can
//! substitute an in-process [`crate::Hub`] and a recording dispatcher.

use std::fmt;

use tokio::sync::mpsc;

use crate::{EventName, OutboundRequest, RawEvent, StoreAction};

/// Sender half handed to an [`EventSource`] for one subscription.
pub type EventSink = mpsc::UnboundedSender<RawEvent>;

/// Abstracts the real-time transport delivering server push events.
///
/// Both operations are non-blocking: a subscription only registers a sink,
/// and an emit only queues the request. Replies arrive later as events.
pub trait EventSource: Send {
    /// Transport-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Deliver every `event` to `sink` until the returned [`Subscription`] is
    /// disposed.
    fn subscribe(&mut self, event: EventName, sink: EventSink) -> Result<Subscription, Self::Error>;

    /// Send a request to the server.
    fn emit(&mut self, request: OutboundRequest) -> Result<(), Self::Error>;
}

/// Disposer for a registered event handler.
///
/// Dropping the subscription disposes it, so handlers never outlive the
/// component that registered them.
pub struct Subscription {
    event: EventName,
    disposer: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a disposer for a handler of `event`.
    pub fn new(event: EventName, disposer: impl FnOnce() + Send + 'static) -> Self {
        Self { event, disposer: Some(Box::new(disposer)) }
    }

    /// Event this subscription listens to.
    pub fn event(&self) -> EventName {
        self.event
    }

    /// Unregister the handler.
    pub fn dispose(mut self) {
        self.run_disposer();
    }

    fn run_disposer(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_disposer();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("active", &self.disposer.is_some())
            .finish()
    }
}

/// Injected state-update function.
pub trait Dispatch {
    /// Hand an action to the state container.
    fn dispatch(&mut self, action: StoreAction);
}

impl<D: Dispatch + ?Sized> Dispatch for &mut D {
    fn dispatch(&mut self, action: StoreAction) {
        (**self).dispatch(action);
    }
}

/// Records actions in order.
impl Dispatch for Vec<StoreAction> {
    fn dispatch(&mut self, action: StoreAction) {
        self.push(action);
    }
}

/// Forwards actions to a store owned by another task.
impl Dispatch for mpsc::UnboundedSender<StoreAction> {
    fn dispatch(&mut self, action: StoreAction) {
        if self.send(action).is_err() {
            tracing::warn!("store channel closed, dropping action");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[test]
    fn dispose_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = Subscription::new(EventName::NewUserJoined, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        subscription.dispose();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_disposes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        {
            let _subscription = Subscription::new(EventName::UserDisconnected, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn channel_dispatch_forwards() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatch = tx;

        dispatch.dispatch(StoreAction::toggle_collapse());
        assert_eq!(rx.try_recv().ok(), Some(StoreAction::toggle_collapse()));
    }
}
