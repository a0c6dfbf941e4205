//! Change-notification emitter
//!
//! An [`EventEmitter`] is an injected capability, not a base class: table
//! elements hold a [`SharedEmitter`] and derive their channel names from
//! their own ids. Delivery is synchronous and in-process, on the caller's
//! thread.
//!
//! A closed channel is dead: subscribing to it or emitting on it is a no-op,
//! never an error. Ids are never reused, so a stale handle can only name a
//! dead channel.

use crate::item::ItemId;
use ahash::{AHashMap, AHashSet};
use std::cell::RefCell;
use std::rc::Rc;

/// Subscriber callback, invoked with the id of the element that changed
pub type Callback = Box<dyn FnMut(ItemId)>;

/// Shared handle to an emitter, one per table
pub type SharedEmitter = Rc<RefCell<EventEmitter>>;

/// Subscription lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionKind {
    /// Fires on every emission until removed or the channel dies
    Persistent,
    /// Fires on exactly the next emission, then unsubscribes itself
    Once,
}

/// Token for removing a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionHandle {
    channel: String,
    token: u64,
}

struct Subscriber {
    token: u64,
    kind: SubscriptionKind,
    callback: Callback,
}

/// Channel-keyed publish/subscribe registry
#[derive(Default)]
pub struct EventEmitter {
    channels: AHashMap<String, Vec<Subscriber>>,
    dead: AHashSet<String>,
    /// Channels whose subscriber list is currently swapped out for delivery
    emitting: AHashSet<String>,
    /// Tokens unsubscribed while their channel was mid-delivery; settled by
    /// `finish_emit`
    revoked: AHashSet<u64>,
    next_token: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh emitter behind the shared handle type
    pub fn shared() -> SharedEmitter {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Register a callback on a channel
    ///
    /// Subscribing to a dead channel is a no-op; the returned handle then
    /// refers to nothing.
    pub fn subscribe(
        &mut self,
        channel: &str,
        kind: SubscriptionKind,
        callback: Callback,
    ) -> SubscriptionHandle {
        let token = self.next_token;
        self.next_token += 1;
        let handle = SubscriptionHandle {
            channel: channel.to_string(),
            token,
        };
        if !self.dead.contains(channel) {
            self.channels.entry(channel.to_string()).or_default().push(Subscriber {
                token,
                kind,
                callback,
            });
        }
        handle
    }

    /// Remove one subscription; unknown handles are ignored
    ///
    /// A subscription removed from inside a callback on its own channel is
    /// mid-delivery (its list is swapped out); the token is recorded so
    /// `finish_emit` does not reinstate it.
    pub fn unsubscribe(&mut self, handle: &SubscriptionHandle) {
        if let Some(subs) = self.channels.get_mut(&handle.channel) {
            let before = subs.len();
            subs.retain(|s| s.token != handle.token);
            if subs.len() != before {
                return;
            }
        }
        if self.emitting.contains(&handle.channel) {
            self.revoked.insert(handle.token);
        }
    }

    /// Number of live subscriptions on a channel
    pub fn listener_count(&self, channel: &str) -> usize {
        self.channels.get(channel).map_or(0, Vec::len)
    }

    /// Drop every subscription on a channel, leaving it alive
    pub fn remove_all(&mut self, channel: &str) {
        self.channels.remove(channel);
    }

    /// Drop every subscription and mark the channel dead
    pub fn kill(&mut self, channel: &str) {
        self.channels.remove(channel);
        self.dead.insert(channel.to_string());
    }

    /// True once a channel has been killed
    pub fn is_dead(&self, channel: &str) -> bool {
        self.dead.contains(channel)
    }

    fn begin_emit(&mut self, channel: &str) -> Vec<Subscriber> {
        if self.dead.contains(channel) {
            Vec::new()
        } else {
            self.emitting.insert(channel.to_string());
            self.channels.remove(channel).unwrap_or_default()
        }
    }

    fn finish_emit(&mut self, channel: &str, mut subs: Vec<Subscriber>) {
        self.emitting.remove(channel);
        if self.dead.contains(channel) {
            for sub in &subs {
                self.revoked.remove(&sub.token);
            }
            return;
        }
        // Settle every token, dropping one-shots and mid-delivery removals
        subs.retain(|s| {
            let revoked = self.revoked.remove(&s.token);
            s.kind == SubscriptionKind::Persistent && !revoked
        });
        // Callbacks may have subscribed during delivery; keep those too
        if let Some(newcomers) = self.channels.remove(channel) {
            subs.extend(newcomers);
        }
        if !subs.is_empty() {
            self.channels.insert(channel.to_string(), subs);
        }
    }
}

/// Deliver an event to every subscriber of a channel
///
/// The subscriber list is swapped out for the duration of delivery, so a
/// callback may subscribe or unsubscribe on the same emitter without
/// aliasing the borrow. One-shot subscribers are dropped after their first
/// invocation.
pub fn emit(emitter: &SharedEmitter, channel: &str, payload: ItemId) {
    let mut subs = emitter.borrow_mut().begin_emit(channel);
    for sub in subs.iter_mut() {
        (sub.callback)(payload);
    }
    emitter.borrow_mut().finish_emit(channel, subs);
}

/// Deliver a final event, then kill the channel
pub fn close(emitter: &SharedEmitter, channel: &str, payload: ItemId) {
    emit(emitter, channel, payload);
    emitter.borrow_mut().kill(channel);
}
