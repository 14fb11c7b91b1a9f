//! Per-buffer conversion state, persisted in the buffer's settings store.
//!
//! Absent state reads as [`ConversionState::default`]. A state equal to the
//! default is erased rather than written, so untouched buffers carry no key.

use crate::{buffer::BufferId, host::Host};
use serde::{Deserialize, Serialize};

/// Buffer setting holding this plugin's transient state.
pub const STATE_KEY: &str = "emacs_tabstops_state";

/// Direction of the last conversion applied to a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertedTo {
    #[default]
    None,
    Tabs,
    Spaces,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionState {
    pub converted_to: ConvertedTo,
    /// Scratch flag was forced on to hide a conversion's dirty state.
    pub scratch_hack_active: bool,
    /// Reconvert on the next modification (set after a revert).
    pub reset_hack_active: bool,
    /// Restore spaces once the pending save completes.
    pub tts_on_post_save_armed: bool,
    /// Expand tabs when the buffer is next activated.
    pub tts_on_activate_armed: bool,
}

impl ConversionState {
    pub fn load<H: Host>(host: &H, id: BufferId) -> Self {
        let Some(value) = host.setting(id, STATE_KEY) else {
            return Self::default();
        };
        match value.try_into() {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!("Ignoring malformed conversion state on {id}: {err}");
                Self::default()
            }
        }
    }

    pub fn store<H: Host>(&self, host: &mut H, id: BufferId) {
        if *self == Self::default() {
            host.erase_setting(id, STATE_KEY);
            return;
        }
        match toml::Value::try_from(self) {
            Ok(value) => host.set_setting(id, STATE_KEY, value),
            Err(err) => tracing::error!("Failed to serialize conversion state for {id}: {err}"),
        }
    }

    /// Load, modify and store in one step. Returns the stored state.
    pub fn update<H: Host>(host: &mut H, id: BufferId, f: impl FnOnce(&mut Self)) -> Self {
        let mut state = Self::load(host, id);
        f(&mut state);
        state.store(host, id);
        state
    }

    pub fn erase<H: Host>(host: &mut H, id: BufferId) {
        host.erase_setting(id, STATE_KEY);
    }
}
