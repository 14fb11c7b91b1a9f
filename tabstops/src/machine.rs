//! Per-buffer transient flags and their transitions across a buffer's life.
//!
//! The flags themselves live in [`ConversionState`] inside each buffer's
//! settings store. [`BufferStateMachine`] owns what is shared across buffers:
//! how many views show each buffer, and the two listener [`Subscription`]s
//! that only need to be attached while some buffer has a hack active.
//!
//! | Flag                     | Set by                      | Cleared by                                       |
//! |--------------------------|-----------------------------|--------------------------------------------------|
//! | `scratch_hack_active`    | [`Deferred::EngageScratch`] | next modification, revert, last view close       |
//! | `reset_hack_active`      | [`Deferred::ArmReset`]      | successful reconversion, revert, last view close |
//! | `tts_on_activate_armed`  | load hook                   | activation, pre-save, any view close             |
//! | `tts_on_post_save_armed` | pre-save hook               | post-save, any view close                        |

use crate::{
    buffer::BufferId,
    host::{Deferred, Host, ListenerKind},
    state::ConversionState,
    subscription::{ActivationError, Subscription},
};
use rustc_hash::FxHashMap;

#[derive(Debug)]
pub struct BufferStateMachine {
    views: FxHashMap<BufferId, usize>,
    scratch: Subscription,
    reset: Subscription,
}

impl BufferStateMachine {
    pub fn new<H: Host>(host: &H) -> Result<Self, ActivationError> {
        Ok(Self {
            views: FxHashMap::default(),
            scratch: Subscription::locate(host, ListenerKind::Scratch)?,
            reset: Subscription::locate(host, ListenerKind::Revert)?,
        })
    }

    pub fn scratch_subscription(&self) -> &Subscription {
        &self.scratch
    }

    pub fn reset_subscription(&self) -> &Subscription {
        &self.reset
    }

    /// Number of views known to show `id`.
    pub fn views(&self, id: BufferId) -> usize {
        self.views.get(&id).copied().unwrap_or(0)
    }

    /// A buffer was loaded into its first view.
    pub fn open(&mut self, id: BufferId) {
        self.views.entry(id).or_insert(1);
    }

    /// Another view now shows `id`.
    pub fn clone_view(&mut self, id: BufferId) {
        *self.views.entry(id).or_insert(1) += 1;
    }

    /// A view of `id` closed. Pending conversions are cancelled; the rest of
    /// the buffer's state is erased once no view is left.
    ///
    /// Returns whether the state was erased.
    pub fn close<H: Host>(&mut self, host: &mut H, id: BufferId) -> bool {
        let remaining = match self.views.get_mut(&id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                *count
            }
            _ => 0,
        };
        if remaining > 0 {
            tracing::debug!("{id} still shown in {remaining} views");
            ConversionState::update(host, id, |state| {
                state.tts_on_activate_armed = false;
                state.tts_on_post_save_armed = false;
            });
            return false;
        }

        self.views.remove(&id);
        self.erase(host, id);
        true
    }

    /// The host is discarding in-memory edits of `id`.
    ///
    /// Drops any forced scratch flag and erases all state. With `rearm`, a
    /// [`Deferred::ArmReset`] is posted so reconversion is armed once the host
    /// has finished reverting.
    pub fn revert<H: Host>(&mut self, host: &mut H, id: BufferId, rearm: bool) {
        let state = ConversionState::load(host, id);
        if state.scratch_hack_active && host.is_scratch(id) {
            host.set_scratch(id, false);
        }
        self.erase(host, id);

        if rearm {
            host.schedule(Deferred::ArmReset(id));
        }
    }

    /// Force the scratch flag on so a conversion doesn't read as unsaved work.
    pub fn engage_scratch<H: Host>(&mut self, host: &mut H, id: BufferId) {
        if !host.contains(id) {
            tracing::debug!("Skipping scratch hack for closed {id}");
            return;
        }
        let mut state = ConversionState::load(host, id);
        // A buffer already scratch (by the user or an earlier hack) is left alone.
        if state.scratch_hack_active || host.is_scratch(id) {
            return;
        }

        host.set_scratch(id, true);
        state.scratch_hack_active = true;
        state.store(host, id);
        self.scratch.acquire(host);
    }

    /// Arm reconversion on the next modification of `id`.
    pub fn arm_reset<H: Host>(&mut self, host: &mut H, id: BufferId) {
        if !host.contains(id) {
            tracing::debug!("Skipping reset hack for closed {id}");
            return;
        }
        let mut state = ConversionState::load(host, id);
        if state.reset_hack_active {
            return;
        }

        state.reset_hack_active = true;
        state.store(host, id);
        self.reset.acquire(host);
    }

    /// `id` was modified. Clears a scratch hack this modification ends.
    ///
    /// Returns whether a reset reconversion is due. The reset hack stays armed
    /// until [`finish_reset`](Self::finish_reset) records that it succeeded.
    pub fn modified<H: Host>(&mut self, host: &mut H, id: BufferId) -> bool {
        let mut state = ConversionState::load(host, id);
        if state.scratch_hack_active {
            host.set_scratch(id, false);
            state.scratch_hack_active = false;
            self.scratch.release(host);
            state.store(host, id);
        }
        state.reset_hack_active
    }

    /// The reconversion after a revert of `id` succeeded.
    pub fn finish_reset<H: Host>(&mut self, host: &mut H, id: BufferId) {
        let mut state = ConversionState::load(host, id);
        if !state.reset_hack_active {
            return;
        }

        state.reset_hack_active = false;
        state.store(host, id);
        self.reset.release(host);
    }

    /// Drop all state on every open buffer and detach both listeners.
    pub fn shutdown<H: Host>(&mut self, host: &mut H) {
        for id in host.buffers() {
            let state = ConversionState::load(host, id);
            if state.scratch_hack_active && host.is_scratch(id) {
                host.set_scratch(id, false);
            }
            ConversionState::erase(host, id);
        }
        self.scratch.detach(host);
        self.reset.detach(host);
        self.views.clear();
    }

    fn erase<H: Host>(&mut self, host: &mut H, id: BufferId) {
        let state = ConversionState::load(host, id);
        if state.scratch_hack_active {
            self.scratch.release(host);
        }
        if state.reset_hack_active {
            self.reset.release(host);
        }
        ConversionState::erase(host, id);
    }
}
