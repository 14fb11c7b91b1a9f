//! Reference-counted attachment of a shared host listener.
//!
//! The host keeps the plugin's modification listeners registered for the
//! plugin's whole lifetime, but only delivers events to them while subscribed.
//! A [`Subscription`] subscribes when the first buffer becomes interested and
//! unsubscribes when the last one loses interest.

use crate::host::{Host, ListenerHandle, ListenerKind};
use thiserror::Error;

/// Fatal errors raised while activating the plugin.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActivationError {
    /// The host has no registered listener of this kind
    #[error("Host did not register the {0:?} listener")]
    ListenerMissing(ListenerKind),
}

#[derive(Debug)]
pub struct Subscription {
    kind: ListenerKind,
    handle: ListenerHandle,
    interested: usize,
}

impl Subscription {
    /// Find the host's listener for `kind`. Does not subscribe.
    pub fn locate<H: Host>(host: &H, kind: ListenerKind) -> Result<Self, ActivationError> {
        let handle = host
            .locate_listener(kind)
            .ok_or(ActivationError::ListenerMissing(kind))?;
        Ok(Self {
            kind,
            handle,
            interested: 0,
        })
    }

    pub fn interested(&self) -> usize {
        self.interested
    }

    pub fn is_subscribed(&self) -> bool {
        self.interested > 0
    }

    /// Register one more interested buffer.
    pub fn acquire<H: Host>(&mut self, host: &mut H) {
        if self.interested == 0 {
            tracing::debug!("Subscribing {:?} listener", self.kind);
            host.subscribe(self.handle);
        }
        self.interested += 1;
    }

    /// Drop one interested buffer.
    pub fn release<H: Host>(&mut self, host: &mut H) {
        match self.interested {
            0 => tracing::warn!("Released {:?} listener with no interest", self.kind),
            1 => {
                self.interested = 0;
                tracing::debug!("Unsubscribing {:?} listener", self.kind);
                host.unsubscribe(self.handle);
            }
            _ => self.interested -= 1,
        }
    }

    /// Unsubscribe regardless of outstanding interest.
    pub fn detach<H: Host>(&mut self, host: &mut H) {
        if self.interested > 0 {
            self.interested = 0;
            host.unsubscribe(self.handle);
        }
    }
}
