//! Scripted client session.
//!
//! A [`Session`] mounts a [`UserList`] over an in-process [`Hub`] and a
//! [`Store`], then plays server events into it one step at a time. After each
//! step the default group is recorded so invariants can check its history.

use rollcall_app::{
    GroupId, Hub, HubError, Member, PushEvent, RawEvent, ReadModel, Store, StoreConfig, UserList,
};
use serde_json::Value;

use crate::SessionSnapshot;

/// Mounted user list driven by scripted server events.
pub struct Session {
    hub: Hub,
    list: UserList<Hub, Store>,
    default_history: Vec<Option<GroupId>>,
}

impl Session {
    /// Mount a user list over a fresh hub and store.
    pub fn mount(config: StoreConfig) -> Result<Self, HubError> {
        let hub = Hub::new();
        let list = UserList::mount(hub.clone(), Store::new(config))?;
        Ok(Self { hub, list, default_history: Vec::new() })
    }

    /// Publish a raw envelope and process it.
    ///
    /// Returns the number of events the user list processed.
    pub fn publish(&mut self, raw: RawEvent) -> Result<usize, HubError> {
        self.hub.publish(raw)?;
        let processed = self.list.pump();
        self.default_history.push(self.model().default_group.clone());
        Ok(processed)
    }

    /// Publish a typed event and process it.
    pub fn publish_event(&mut self, event: &PushEvent) -> Result<usize, HubError> {
        self.publish(event.to_raw())
    }

    /// Server sends the roster of a group.
    pub fn roster(&mut self, group_name: &str, group_id: &str, members: &[&str]) -> Result<usize, HubError> {
        self.publish_event(&PushEvent::ActiveUsersList {
            group_name: group_name.to_owned(),
            group_id: group_id.to_owned(),
            members: members.iter().copied().map(Member::new).collect(),
        })
    }

    /// Server announces a user joining a group.
    pub fn join(&mut self, group_name: &str, group_id: &str, nickname: &str) -> Result<usize, HubError> {
        self.publish_event(&PushEvent::UserJoined {
            group_name: group_name.to_owned(),
            group_id: group_id.to_owned(),
            member: Member::new(nickname),
        })
    }

    /// Server announces a user disconnecting from groups.
    pub fn disconnect(&mut self, group_ids: &[&str], nickname: &str) -> Result<usize, HubError> {
        self.publish_event(&PushEvent::UserDisconnected {
            group_ids: group_ids.iter().map(|&id| id.to_owned()).collect(),
            nickname: nickname.to_owned(),
        })
    }

    /// Publish an arbitrary, possibly malformed, envelope by event name.
    pub fn publish_args(&mut self, event: &str, args: Vec<Value>) -> Result<usize, HubError> {
        self.publish(RawEvent { event: event.to_owned(), args })
    }

    /// Current read model.
    pub fn model(&self) -> &ReadModel {
        self.list.dispatcher().model()
    }

    /// Store owned by the user list, for local UI actions.
    pub fn store_mut(&mut self) -> &mut Store {
        self.list.dispatcher_mut()
    }

    /// Shared hub handle.
    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// The mounted user list.
    pub fn user_list(&self) -> &UserList<Hub, Store> {
        &self.list
    }

    /// Snapshot of the current state with the recorded default-group history.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_model(self.model()).with_history(self.default_history.iter().cloned())
    }

    /// Unmount the user list and return the store.
    pub fn unmount(self) -> Store {
        let (_, store) = self.list.unmount();
        store
    }
}
