//! The editor side of the plugin contract.
//!
//! Everything the conversion engine needs from the hosting editor goes
//! through [`Host`]: buffer text, dirty and scratch flags, the per-buffer
//! settings store, status messages, deferred tasks and listener
//! subscription. The engine never owns buffers; it only holds
//! [`BufferId`]s and asks the host.
//!
//! # Deferred work
//!
//! Some effects must not run inside the handler that triggers them (the host
//! is still inside its own edit or revert bookkeeping). They are posted with
//! [`Host::schedule`] as [`Deferred`] values and handed back to
//! [`Dispatcher::run_deferred`](crate::Dispatcher::run_deferred) on the next
//! idle tick, after the current handler has returned.

use crate::buffer::{BufferId, EditError, TextBuffer};

/// Work posted to run on the host's next idle tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Hide a freshly converted buffer's dirty state behind the scratch flag.
    EngageScratch(BufferId),
    /// Arm reconversion on the next modification after a revert.
    ArmReset(BufferId),
}

/// Long-lived modification listeners the host keeps registered for the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    /// Clears a forced scratch flag on the next edit.
    Scratch,
    /// Reconverts a buffer on the first edit after a revert.
    Revert,
}

/// Host-issued handle of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(pub u64);

/// Primitives an editor provides to the plugin.
///
/// All calls happen on the host's single UI thread.
pub trait Host {
    /// Every open buffer across all windows.
    fn buffers(&self) -> Vec<BufferId>;

    fn contains(&self, id: BufferId) -> bool {
        self.buffers().contains(&id)
    }

    /// Name of the syntax assigned to the buffer, if any.
    fn syntax(&self, id: BufferId) -> Option<String>;

    /// Whether the buffer has unsaved changes.
    fn is_dirty(&self, id: BufferId) -> bool;

    /// Whether the buffer is marked scratch (never reported dirty).
    fn is_scratch(&self, id: BufferId) -> bool;

    fn set_scratch(&mut self, id: BufferId, scratch: bool);

    /// Read a key from the buffer's settings store.
    fn setting(&self, id: BufferId, key: &str) -> Option<toml::Value>;

    fn set_setting(&mut self, id: BufferId, key: &str, value: toml::Value);

    fn erase_setting(&mut self, id: BufferId, key: &str);

    /// Run `read` against the buffer's current text.
    fn inspect<R>(
        &self,
        id: BufferId,
        read: impl FnOnce(&dyn TextBuffer) -> R,
    ) -> Result<R, EditError>;

    /// Run `edit` as a single edit transaction (one undo step).
    ///
    /// Hosts must discard partial edits when `edit` returns an error.
    fn transact<R>(
        &mut self,
        id: BufferId,
        edit: impl FnOnce(&mut dyn TextBuffer) -> Result<R, EditError>,
    ) -> Result<R, EditError>;

    /// Show a transient message in the status bar.
    fn status_message(&mut self, id: BufferId, message: &str);

    /// Post `task` to run after the current handler returns.
    fn schedule(&mut self, task: Deferred);

    /// Find a listener the host registered for the plugin.
    fn locate_listener(&self, kind: ListenerKind) -> Option<ListenerHandle>;

    /// Start delivering modification events to `listener`.
    fn subscribe(&mut self, listener: ListenerHandle);

    /// Stop delivering modification events to `listener`.
    fn unsubscribe(&mut self, listener: ListenerHandle);
}
