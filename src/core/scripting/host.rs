//! Host operations callable from scripts.
//!
//! Every operation returns a [`HostResult`] value instead of raising, so a
//! failed dial is something a script can inspect rather than an abort.

use std::fmt;

use mlua::prelude::*;
use tracing::warn;

use crate::core::connection::Connector;

/// Tagged success/failure value returned by host operations.
///
/// Exposed to Lua as userdata with `ok`, `target`, `message` and `error`
/// fields; `tostring` renders `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostResult {
    pub ok: bool,
    pub target: String,
    pub message: String,
    pub error: Option<String>,
}

impl HostResult {
    pub fn connected(target: &str) -> Self {
        Self {
            ok: true,
            target: target.to_string(),
            message: format!("Connected to {:?}", target),
            error: None,
        }
    }

    pub fn connect_failed(target: &str, cause: impl Into<String>) -> Self {
        let cause = cause.into();
        Self {
            ok: false,
            target: target.to_string(),
            message: format!("Error connecting to {:?}: {}", target, cause),
            error: Some(cause),
        }
    }

    pub fn disconnecting(target: &str) -> Self {
        Self {
            ok: true,
            target: target.to_string(),
            message: format!("Closing connection to {:?}", target),
            error: None,
        }
    }

    pub fn not_connected() -> Self {
        Self {
            ok: false,
            target: String::new(),
            message: "Not connected".to_string(),
            error: Some("no active connection".to_string()),
        }
    }
}

impl fmt::Display for HostResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl LuaUserData for HostResult {
    fn add_fields<F: LuaUserDataFields<Self>>(fields: &mut F) {
        fields.add_field_method_get("ok", |_, this| Ok(this.ok));
        fields.add_field_method_get("target", |_, this| Ok(this.target.clone()));
        fields.add_field_method_get("message", |_, this| Ok(this.message.clone()));
        fields.add_field_method_get("error", |_, this| Ok(this.error.clone()));
    }

    fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(LuaMetaMethod::ToString, |_, this, ()| Ok(this.message.clone()));
    }
}

/// The capability set bound into the script environment.
#[derive(Debug, Clone)]
pub struct HostOps {
    connector: Connector,
}

impl HostOps {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }

    pub async fn connect(&self, target: &str) -> HostResult {
        let target = target.trim();
        match self.connector.connect(target).await {
            Ok(_) => HostResult::connected(target),
            Err(e) => {
                warn!("connect({:?}) failed: {}", target, e);
                HostResult::connect_failed(target, e.cause())
            }
        }
    }

    pub fn disconnect(&self) -> HostResult {
        match self.connector.disconnect() {
            Some(connection) => HostResult::disconnecting(connection.target()),
            None => HostResult::not_connected(),
        }
    }
}
