//! In-process push-event source.
//!
//! [`Hub`] implements [`EventSource`] without any network transport. Cloned
//! handles share one subscriber table, so a test or a replay tool can hold
//! one handle to publish events while the [`crate::UserList`] owns another.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, Weak},
};

use tracing::{debug, trace};

use crate::{
    EventName, EventSink, EventSource, HubError, OutboundRequest, PushEvent, RawEvent, Subscription,
};

#[derive(Debug, Default)]
struct HubState {
    next_id: u64,
    subscribers: BTreeMap<EventName, Vec<(u64, EventSink)>>,
    requests: Vec<OutboundRequest>,
    closed: bool,
}

/// Shared in-process event bus.
#[derive(Debug, Clone, Default)]
pub struct Hub {
    inner: Arc<Mutex<HubState>>,
}

impl Hub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HubState>, HubError> {
        self.inner.lock().map_err(|_| HubError::Poisoned)
    }

    /// Deliver a raw envelope to every subscriber of its event.
    ///
    /// Returns the number of subscribers reached. Events nobody listens to
    /// are discarded.
    pub fn publish(&self, raw: RawEvent) -> Result<usize, HubError> {
        let mut state = self.lock()?;
        if state.closed {
            return Err(HubError::Closed);
        }

        let Some(sinks) = EventName::from_wire(&raw.event).and_then(|e| state.subscribers.get_mut(&e))
        else {
            trace!(event = %raw.event, "no subscribers");
            return Ok(0);
        };

        sinks.retain(|(_, sink)| !sink.is_closed());
        for (_, sink) in sinks.iter() {
            // Receivers may close between retain and send.
            let _ = sink.send(raw.clone());
        }
        Ok(sinks.len())
    }

    /// Encode and publish a typed event.
    pub fn publish_event(&self, event: &PushEvent) -> Result<usize, HubError> {
        self.publish(event.to_raw())
    }

    /// Drain the requests emitted so far, oldest first.
    pub fn take_requests(&self) -> Result<Vec<OutboundRequest>, HubError> {
        Ok(std::mem::take(&mut self.lock()?.requests))
    }

    /// Number of live handlers registered for `event`.
    pub fn subscriber_count(&self, event: EventName) -> usize {
        self.lock()
            .map(|state| state.subscribers.get(&event).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Shut the hub down, closing every subscriber's sink.
    pub fn close(&self) -> Result<(), HubError> {
        let mut state = self.lock()?;
        state.closed = true;
        state.subscribers.clear();
        debug!("hub closed");
        Ok(())
    }
}

fn unsubscribe(inner: &Weak<Mutex<HubState>>, event: EventName, id: u64) {
    let Some(inner) = inner.upgrade() else { return };
    if let Ok(mut state) = inner.lock()
        && let Some(sinks) = state.subscribers.get_mut(&event)
    {
        sinks.retain(|(sid, _)| *sid != id);
        trace!(%event, id, "unsubscribed");
    }
}

impl EventSource for Hub {
    type Error = HubError;

    fn subscribe(&mut self, event: EventName, sink: EventSink) -> Result<Subscription, HubError> {
        let mut state = self.lock()?;
        if state.closed {
            return Err(HubError::Closed);
        }

        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.entry(event).or_default().push((id, sink));
        trace!(%event, id, "subscribed");

        let inner = Arc::downgrade(&self.inner);
        Ok(Subscription::new(event, move || unsubscribe(&inner, event, id)))
    }

    fn emit(&mut self, request: OutboundRequest) -> Result<(), HubError> {
        let mut state = self.lock()?;
        if state.closed {
            return Err(HubError::Closed);
        }
        debug!(request = request.as_str(), "emit");
        state.requests.push(request);
        Ok(())
    }
}
