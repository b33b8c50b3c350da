//! Proxies for DBus services, so we can call them.
//!
//! The panel-service proxy started out as `zbus-xmlgen` output for the
//! introspection of `com.canonical.Unity.Panel.Service`, then was trimmed to
//! the method and signals we consume and adjusted to use the crate's typed
//! rows. For more information, see ["Writing a client proxy" in the zbus
//! tutorial](https://dbus2.github.io/zbus/).

mod dbus_panel_service;
pub use dbus_panel_service::*;
