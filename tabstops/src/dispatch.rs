//! Lifecycle hooks the host calls into.
//!
//! The [`Dispatcher`] is the plugin instance. The host constructs it with
//! [`Dispatcher::activate`] when the plugin loads, forwards each buffer
//! lifecycle event to the matching `on_*` hook, hands queued [`Deferred`]
//! tasks back through [`Dispatcher::run_deferred`], and calls
//! [`Dispatcher::deactivate`] on unload.
//!
//! # Event flow
//!
//! ```text
//! load ──> arm tts_on_activate ──> activated ──> tabs -> spaces
//!                                                    │
//!                                  (clean buffer) EngageScratch
//!
//! pre-save ──> spaces -> tabs, arm tts_on_post_save ──> post-save ──> tabs -> spaces
//!
//! revert ──> erase state ──> ArmReset ──> next modification ──> tabs -> spaces
//! ```
//!
//! Hooks update per-buffer state only after the edit they depend on
//! succeeded, so a failed conversion leaves the flags as they were.

use crate::{
    buffer::BufferId,
    commands,
    config::{BufferConfig, ConfigError, Defaults},
    convert::{self, ConvertError},
    host::{Deferred, Host},
    machine::BufferStateMachine,
    policy::{self, Direction},
    state::ConversionState,
    subscription::ActivationError,
};
use thiserror::Error;

/// Text command name the host issues when reverting a buffer to its saved content.
pub const REVERT_COMMAND: &str = "revert";

/// Errors returned from hooks and commands.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

#[derive(Debug)]
pub struct Dispatcher {
    defaults: Defaults,
    machine: BufferStateMachine,
}

impl Dispatcher {
    /// Activate the plugin against `host`.
    ///
    /// Fails when the host did not register the plugin's listeners; the host's
    /// plugin contract has changed and running degraded would leave buffers
    /// stuck scratch or never reconverted.
    pub fn activate<H: Host>(host: &H, defaults: Defaults) -> Result<Self, ActivationError> {
        let machine = BufferStateMachine::new(host)?;
        tracing::info!("Emacs tabstops activated (tabstop {})", defaults.tabstop);
        Ok(Self { defaults, machine })
    }

    /// Drop all state and detach listeners.
    pub fn deactivate<H: Host>(mut self, host: &mut H) {
        self.machine.shutdown(host);
        tracing::info!("Emacs tabstops deactivated");
    }

    pub fn machine(&self) -> &BufferStateMachine {
        &self.machine
    }

    /// Current conversion state of `id`.
    pub fn state<H: Host>(&self, host: &H, id: BufferId) -> ConversionState {
        ConversionState::load(host, id)
    }

    fn config<H: Host>(&self, host: &H, id: BufferId) -> Result<BufferConfig, ConfigError> {
        BufferConfig::resolve(host, id, &self.defaults)
    }

    fn is_skipped<H: Host>(host: &H, id: BufferId, config: &BufferConfig) -> bool {
        host.syntax(id)
            .is_some_and(|syntax| policy::is_skipped_syntax(&syntax, config))
    }

    /// A buffer finished loading. Conversion waits until it is shown.
    pub fn on_load<H: Host>(&mut self, host: &mut H, id: BufferId) -> Result<(), DispatchError> {
        tracing::debug!("@load {id}");
        self.machine.open(id);

        let config = self.config(host, id)?;
        if Self::is_skipped(host, id, &config) {
            tracing::debug!("Skipping {id}: syntax {:?} exempt", host.syntax(id));
            return Ok(());
        }
        if policy::should_convert_on_load(&config) {
            ConversionState::update(host, id, |state| {
                state.tts_on_activate_armed = true;
                state.tts_on_post_save_armed = false;
            });
        }
        Ok(())
    }

    pub fn on_activated<H: Host>(
        &mut self,
        host: &mut H,
        id: BufferId,
    ) -> Result<(), DispatchError> {
        tracing::debug!("@activated {id}");
        if !ConversionState::load(host, id).tts_on_activate_armed {
            return Ok(());
        }

        let config = self.config(host, id)?;
        convert::tabs_to_spaces(host, id, config.tabstop)?;
        ConversionState::update(host, id, |state| state.tts_on_activate_armed = false);
        Ok(())
    }

    /// Collapse spaces before the buffer is written, so the file keeps tabs.
    pub fn on_pre_save<H: Host>(
        &mut self,
        host: &mut H,
        id: BufferId,
    ) -> Result<(), DispatchError> {
        tracing::debug!("@pre_save {id}");
        let config = self.config(host, id)?;
        if Self::is_skipped(host, id, &config) {
            return Ok(());
        }

        let state = ConversionState::load(host, id);
        if !policy::should_convert_on_save(&config, &state) {
            return Ok(());
        }

        convert::spaces_to_tabs(host, id, config.tabstop)?;
        ConversionState::update(host, id, |state| {
            state.tts_on_post_save_armed = true;
            state.tts_on_activate_armed = false;
        });
        Ok(())
    }

    /// Restore spaces in the editor once the tabbed content is on disk.
    pub fn on_post_save<H: Host>(
        &mut self,
        host: &mut H,
        id: BufferId,
    ) -> Result<(), DispatchError> {
        tracing::debug!("@post_save {id}");
        if !ConversionState::load(host, id).tts_on_post_save_armed {
            return Ok(());
        }

        let config = self.config(host, id)?;
        convert::tabs_to_spaces(host, id, config.tabstop)?;
        ConversionState::update(host, id, |state| state.tts_on_post_save_armed = false);
        Ok(())
    }

    pub fn on_close<H: Host>(&mut self, host: &mut H, id: BufferId) {
        tracing::debug!("@close {id}");
        self.machine.close(host, id);
    }

    pub fn on_clone<H: Host>(&mut self, _host: &mut H, id: BufferId) {
        tracing::debug!("@clone {id}");
        self.machine.clone_view(id);
    }

    /// Delivered only while one of the plugin's listeners is subscribed.
    pub fn on_modified<H: Host>(
        &mut self,
        host: &mut H,
        id: BufferId,
    ) -> Result<(), DispatchError> {
        if !self.machine.modified(host, id) {
            return Ok(());
        }

        tracing::debug!("Reconverting {id} after revert");
        let config = self.config(host, id)?;
        convert::tabs_to_spaces(host, id, config.tabstop)?;
        self.machine.finish_reset(host, id);
        Ok(())
    }

    /// Watches text commands for a revert.
    pub fn on_text_command<H: Host>(
        &mut self,
        host: &mut H,
        id: BufferId,
        command: &str,
        _args: Option<&toml::Table>,
    ) -> Result<(), DispatchError> {
        if command != REVERT_COMMAND {
            return Ok(());
        }

        tracing::debug!("@revert {id}");
        let config = self.config(host, id);
        let rearm = config.as_ref().is_ok_and(|config| {
            policy::should_convert_on_load(config) && !Self::is_skipped(host, id, config)
        });

        // State is erased even when the configuration can't be read.
        self.machine.revert(host, id, rearm);
        config?;
        Ok(())
    }

    /// Run a task the host queued through [`Host::schedule`].
    pub fn run_deferred<H: Host>(&mut self, host: &mut H, task: Deferred) {
        match task {
            Deferred::EngageScratch(id) => self.machine.engage_scratch(host, id),
            Deferred::ArmReset(id) => self.machine.arm_reset(host, id),
        }
    }

    pub fn convert_tabs_to_spaces<H: Host>(
        &mut self,
        host: &mut H,
        id: BufferId,
        tabstop: Option<usize>,
    ) -> Result<usize, DispatchError> {
        commands::convert_tabs_to_spaces(host, id, &self.defaults, tabstop)
    }

    pub fn convert_spaces_to_tabs<H: Host>(
        &mut self,
        host: &mut H,
        id: BufferId,
        tabstop: Option<usize>,
    ) -> Result<usize, DispatchError> {
        commands::convert_spaces_to_tabs(host, id, &self.defaults, tabstop)
    }

    pub fn toggle_conversion<H: Host>(
        &mut self,
        host: &mut H,
        id: BufferId,
    ) -> Result<Option<(Direction, usize)>, DispatchError> {
        commands::toggle_conversion(host, id, &self.defaults)
    }
}
