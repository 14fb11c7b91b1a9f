//! Emacs-style tabstops for editor buffers.
//!
//! Converts leading indentation between tab characters and runs of `tabstop`
//! spaces, automatically around a buffer's lifecycle:
//!
//! - on first activation after load, leading tabs expand to spaces
//! - before save, space runs collapse back so the file on disk keeps tabs
//! - after save, the editor view returns to spaces
//! - after a revert, the reloaded content is expanded again
//!
//! Only leading indentation is ever rewritten. Whitespace after the first
//! non-whitespace character of a line is left alone.
//!
//! # Architecture
//!
//! ```text
//! Host (editor) ──events──> Dispatcher ──> policy (pure decisions)
//!                               │
//!                               ├──> BufferStateMachine (flags, listener refcounts)
//!                               └──> convert ──> IndentScanner
//! ```
//!
//! The editor implements [`Host`]; the plugin never owns buffers. Per-buffer
//! flags live in the buffer's own settings store as a [`ConversionState`].
//!
//! # Testing
//!
//! The `test-support` feature exposes [`test::TestHost`] and
//! [`test::TestEditor`], an in-memory host and an event-loop harness.

pub mod buffer;
pub mod commands;
pub mod config;
pub mod convert;
pub mod dispatch;
pub mod host;
pub mod machine;
pub mod policy;
pub mod scanner;
pub mod state;
pub mod subscription;


pub use buffer::{BufferId, EditError, TextBuffer};
pub use config::{BufferConfig, ConfigError, ConvertOnSave, Defaults};
pub use convert::ConvertError;
pub use dispatch::{DispatchError, Dispatcher};
pub use host::{Deferred, Host, ListenerHandle, ListenerKind};
pub use machine::BufferStateMachine;
pub use policy::Direction;
pub use scanner::IndentScanner;
pub use state::{ConversionState, ConvertedTo};
pub use subscription::ActivationError;
