//! Playback notifications
//!
//! Two independent channels keep the presentation layer in sync:
//! - **state**: every player state transition (with the failure message, if any)
//! - **action**: what the engine just did to the playlist or transport, so a
//!   UI can tell "rebuild the whole track list" from "move the highlight"
//!
//! Listeners run synchronously on the engine's thread, in subscription order,
//! for each notification in emission order. A notification is fully delivered
//! before the next one is emitted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::PlayerState;

/// Payload of the state channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    /// The new state
    pub state: PlayerState,
    /// Failure message, set only when `state` is `Failed`
    pub error: Option<String>,
}

/// What the engine did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Play requested (track started, or resumed)
    Play,
    /// Pause requested
    Pause,
    /// A release was selected for playback
    PlayRelease,
    /// Playlist replaced
    PlaylistChanged,
    /// Current index moved
    IndexChanged,
}

/// How the playlist was affected by an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaylistActionKind {
    /// Playlist untouched
    None,
    /// Whole list replaced; re-render every row
    NewList,
    /// Only the current index moved
    IndexChanged,
}

/// Payload of the action channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionChange {
    pub action: ActionKind,
    pub playlist: PlaylistActionKind,
}

impl ActionChange {
    /// Pair an action with its playlist effect
    pub fn new(action: ActionKind, playlist: PlaylistActionKind) -> Self {
        Self { action, playlist }
    }
}

/// Token returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Listener<E> = Box<dyn FnMut(&E) + Send>;

/// Ordered observer list for one notification type
pub struct EventHub<E> {
    listeners: Vec<(SubscriptionId, Listener<E>)>,
    next_id: u64,
}

impl<E> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> EventHub<E> {
    /// Create a hub with no listeners
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener; it receives every later notification
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&E) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener in subscription order
    pub fn emit(&mut self, event: &E) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if nobody is listening
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn listeners_run_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hub = EventHub::<ActionChange>::new();

        let rows = Arc::clone(&log);
        hub.subscribe(move |e: &ActionChange| rows.lock().unwrap().push(("rows", e.action)));
        let stream = Arc::clone(&log);
        hub.subscribe(move |e: &ActionChange| stream.lock().unwrap().push(("stream", e.action)));

        hub.emit(&ActionChange::new(
            ActionKind::PlaylistChanged,
            PlaylistActionKind::NewList,
        ));
        hub.emit(&ActionChange::new(
            ActionKind::PlayRelease,
            PlaylistActionKind::None,
        ));

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ("rows", ActionKind::PlaylistChanged),
                ("stream", ActionKind::PlaylistChanged),
                ("rows", ActionKind::PlayRelease),
                ("stream", ActionKind::PlayRelease),
            ]
        );
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let count = Arc::new(Mutex::new(0));
        let mut hub = EventHub::<StateChange>::new();

        let seen = Arc::clone(&count);
        let id = hub.subscribe(move |_| *seen.lock().unwrap() += 1);

        let change = StateChange {
            state: PlayerState::Ready,
            error: None,
        };
        hub.emit(&change);
        assert!(hub.unsubscribe(id));
        hub.emit(&change);

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(hub.is_empty());
        assert!(!hub.unsubscribe(id));
    }
}
