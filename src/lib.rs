//! NetCon Library
//!
//! Interactive line-oriented TCP console: typed lines go to a single current
//! connection, lines starting with `/` are evaluated as Lua with a `connect`
//! binding, and received bytes stream into the output pane.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod tui;

pub use core::{
    Connection, ConnectionSlot, Connector, Console, ConsoleEvent, Dispatch, LineDispatcher, OutputBuffer, OutputSink,
    QuitDecision, QuitGuard, ScriptBridge,
};
pub use domain::config::NetConConfig;
pub use domain::error::{NetConError, NetConResult};
