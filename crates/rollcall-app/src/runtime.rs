//! Membership event loop.
//!
//! [`UserList`] is the mounted form of the conversations panel. It wires the
//! three membership events of an [`EventSource`] into a single inbox, feeds
//! them through the [`MembershipBridge`] and hands the resulting actions to an
//! injected [`Dispatch`].
//!
//! Handlers run to completion and never block. If the server never answers
//! the roster fetch, the user list simply stays empty.

use tokio::sync::mpsc;
use tracing::info;

use crate::{
    BridgeStats, Dispatch, EventName, EventSource, MembershipBridge, RawEvent, Subscription,
};

/// Mounted user list driving membership state from push events.
///
/// # Type Parameters
///
/// - `S`: Push-event source
/// - `D`: State-update function
pub struct UserList<S, D>
where
    S: EventSource,
    D: Dispatch,
{
    source: S,
    dispatch: D,
    bridge: MembershipBridge,
    subscriptions: Vec<Subscription>,
    inbox: mpsc::UnboundedReceiver<RawEvent>,
}

impl<S, D> UserList<S, D>
where
    S: EventSource,
    D: Dispatch,
{
    /// Register the membership handlers and request the roster.
    ///
    /// The roster fetch is emitted exactly once, after all handlers are in
    /// place, so its reply cannot be missed.
    ///
    /// # Errors
    ///
    /// Returns the source's error if a subscription or the fetch fails. Any
    /// handler registered before the failure is disposed.
    pub fn mount(mut source: S, dispatch: D) -> Result<Self, S::Error> {
        let (sink, inbox) = mpsc::unbounded_channel();
        let bridge = MembershipBridge::new();

        let subscriptions = EventName::ALL
            .into_iter()
            .map(|event| source.subscribe(event, sink.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        drop(sink);

        source.emit(bridge.startup_request())?;
        info!(handlers = subscriptions.len(), "user list mounted");

        Ok(Self { source, dispatch, bridge, subscriptions, inbox })
    }

    /// Decode one envelope and dispatch its actions.
    ///
    /// Returns the number of actions dispatched.
    pub fn process(&mut self, raw: RawEvent) -> usize {
        let actions = self.bridge.handle_raw(raw);
        let count = actions.len();
        for action in actions {
            self.dispatch.dispatch(action);
        }
        count
    }

    /// Process every event already waiting in the inbox without blocking.
    ///
    /// Returns the number of events processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(raw) = self.inbox.try_recv() {
            self.process(raw);
            processed += 1;
        }
        processed
    }

    /// Process events until every subscription's sink has closed.
    pub async fn run(&mut self) {
        while let Some(raw) = self.inbox.recv().await {
            self.process(raw);
        }
        info!(stats = ?self.bridge.stats(), "event source closed");
    }

    /// Dispose every handler and hand back the source and dispatcher.
    pub fn unmount(self) -> (S, D) {
        let Self { source, dispatch, bridge, subscriptions, mut inbox } = self;
        for subscription in subscriptions {
            subscription.dispose();
        }
        inbox.close();
        info!(stats = ?bridge.stats(), "user list unmounted");
        (source, dispatch)
    }

    /// Event counters of the bridge.
    pub fn stats(&self) -> BridgeStats {
        self.bridge.stats()
    }

    /// Get a reference to the dispatcher
    pub fn dispatcher(&self) -> &D {
        &self.dispatch
    }

    /// Get a mutable reference to the dispatcher
    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatch
    }

    /// Get a reference to the event source
    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{Hub, OutboundRequest, StoreAction};

    #[test]
    fn mount_subscribes_then_fetches_once() {
        let hub = Hub::new();
        let list = UserList::mount(hub.clone(), Vec::<StoreAction>::new()).unwrap();

        for event in EventName::ALL {
            assert_eq!(hub.subscriber_count(event), 1);
        }
        assert_eq!(hub.take_requests().unwrap(), [OutboundRequest::GetActiveUsersList]);
        assert!(list.dispatcher().is_empty());
    }

    #[test]
    fn unmount_disposes_handlers() {
        let hub = Hub::new();
        let list = UserList::mount(hub.clone(), Vec::<StoreAction>::new()).unwrap();

        let _ = list.unmount();

        for event in EventName::ALL {
            assert_eq!(hub.subscriber_count(event), 0);
        }
    }

    #[test]
    fn remount_does_not_duplicate_handlers() {
        let hub = Hub::new();
        let list = UserList::mount(hub.clone(), Vec::<StoreAction>::new()).unwrap();
        let (_, actions) = list.unmount();
        let mut list = UserList::mount(hub.clone(), actions).unwrap();

        hub.publish(RawEvent::new(EventName::UserDisconnected, vec![json!(["g1"]), json!("alice")]))
            .unwrap();

        assert_eq!(list.pump(), 1);
        assert_eq!(list.dispatcher().len(), 1);
    }

    #[test]
    fn malformed_events_are_counted_not_dispatched() {
        let hub = Hub::new();
        let mut list = UserList::mount(hub.clone(), Vec::<StoreAction>::new()).unwrap();

        hub.publish(RawEvent::new(EventName::NewUserJoined, vec![json!(null)])).unwrap();

        assert_eq!(list.pump(), 1);
        assert!(list.dispatcher().is_empty());
        assert_eq!(list.stats().dropped, 1);
    }
}
