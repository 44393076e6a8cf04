// Core module - Connection handling, line dispatch and scripting
pub mod connection;
pub mod console;
pub mod dispatch;
pub mod output;
pub mod quit;
pub mod scripting;

pub use connection::{Connection, ConnectionId, ConnectionSlot, Connector};
pub use console::Console;
pub use dispatch::{Dispatch, InputLine, LineDispatcher, SENTINEL};
pub use output::{output_channel, ConsoleEvent, OutputBuffer, OutputSink};
pub use quit::{QuitDecision, QuitGuard};
pub use scripting::{HostOps, HostResult, ScriptBridge};
