//! Embedded Lua environment for `/`-prefixed lines.
//!
//! One interpreter lives for the whole process on the UI task. Only a
//! sandboxed subset of the standard library is loaded; the host capability
//! set is:
//!
//! - `connect(target)` - dial `host:port` (or a configured alias)
//! - `disconnect()` - close the current connection
//! - `print(...)` - write to the output pane
//!
//! Each evaluation runs on its own Lua thread with an instruction budget, and
//! the interpreter has a memory cap, so a runaway line fails instead of
//! freezing the console.

pub mod host;

pub use host::{HostOps, HostResult};

use std::cell::Cell;

use mlua::prelude::*;
use mlua::{LuaOptions, StdLib};
use tracing::{debug, warn};

use crate::core::output::OutputSink;
use crate::domain::error::NetConResult;

/// Instructions between budget checks.
const HOOK_INTERVAL: u32 = 10_000;

/// Budget checks allowed per evaluation (about 50M instructions).
const MAX_HOOK_CALLS: u32 = 5_000;

/// Heap cap for the interpreter.
pub const MEMORY_LIMIT: usize = 64 * 1024 * 1024;

pub struct ScriptBridge {
    lua: Lua,
    host: HostOps,
}

impl ScriptBridge {
    pub fn new(host: HostOps, sink: OutputSink) -> NetConResult<Self> {
        let lua = Lua::new_with(
            StdLib::COROUTINE | StdLib::TABLE | StdLib::STRING | StdLib::UTF8 | StdLib::MATH,
            LuaOptions::default(),
        )?;
        lua.set_memory_limit(MEMORY_LIMIT)?;
        register_host(&lua, host.clone(), sink)?;
        Ok(Self { lua, host })
    }

    pub fn host(&self) -> &HostOps {
        &self.host
    }

    /// Evaluate `source` and render its results for display.
    ///
    /// Expressions are tried first so `1+1` yields `2`; anything else runs as
    /// a block. Multiple results are tab-separated, none renders as `nil`.
    /// Time spent awaiting `connect` does not count against the budget.
    pub async fn evaluate(&self, source: &str) -> NetConResult<String> {
        debug!("Evaluating {:?}", source);
        let function = match self.lua.load(format!("return {}", source)).set_name("=input").into_function() {
            Ok(function) => function,
            Err(_) => self.lua.load(source).set_name("=input").into_function()?,
        };

        // Hooks fire only on the thread they were set on
        let thread = self.lua.create_thread(function)?;
        let checks = Cell::new(0u32);
        thread.set_hook(
            LuaHookTriggers::new().every_nth_instruction(HOOK_INTERVAL),
            move |_, _| {
                checks.set(checks.get() + 1);
                if checks.get() > MAX_HOOK_CALLS {
                    warn!("Evaluation exceeded its instruction budget");
                    return Err(LuaError::runtime("script exceeded its instruction budget"));
                }
                Ok(LuaVmState::Continue)
            },
        );

        let values: LuaMultiValue = thread.into_async(()).await?;
        Ok(render(&self.lua, values)?)
    }
}

impl std::fmt::Debug for ScriptBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptBridge")
            .field("used_memory", &self.lua.used_memory())
            .finish_non_exhaustive()
    }
}

fn register_host(lua: &Lua, host: HostOps, sink: OutputSink) -> LuaResult<()> {
    let globals = lua.globals();

    let connect_host = host.clone();
    let connect = lua.create_async_function(move |_, target: Option<String>| {
        let host = connect_host.clone();
        async move { Ok::<_, LuaError>(host.connect(target.as_deref().unwrap_or_default()).await) }
    })?;
    globals.set("connect", connect)?;

    let disconnect = lua.create_function(move |_, ()| Ok(host.disconnect()))?;
    globals.set("disconnect", disconnect)?;

    let print = lua.create_function(move |lua, args: LuaMultiValue| {
        sink.notice(render_values(lua, args)?);
        Ok(())
    })?;
    globals.set("print", print)?;

    Ok(())
}

fn render(lua: &Lua, values: LuaMultiValue) -> LuaResult<String> {
    if values.is_empty() {
        return Ok("nil".to_string());
    }
    render_values(lua, values)
}

fn render_values(lua: &Lua, values: LuaMultiValue) -> LuaResult<String> {
    let tostring: LuaFunction = lua.globals().get("tostring")?;
    let parts = values
        .into_iter()
        .map(|value| tostring.call::<String>(value))
        .collect::<LuaResult<Vec<_>>>()?;
    Ok(parts.join("\t"))
}
