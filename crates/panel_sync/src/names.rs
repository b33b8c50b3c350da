//! Well-known names for the panel service, and the fixed identifiers the
//! reconciler matches listing rows against.

/// Bus name the panel service owns on the session bus.
pub const PANEL_BUS: &str = "com.canonical.Unity.Panel.Service.Desktop";

/// Object path the panel service lives at.
pub const PANEL_OBJECT: &str = "/com/canonical/Unity/Panel/Service";

/// Interface exposed at [`PANEL_OBJECT`].
pub const PANEL_INTERFACE: &str = "com.canonical.Unity.Panel.Service";

/// Indicator module that application entries are registered under.
pub const APPLICATION_MODULE: &str = "libapplication.so";

/// Name our indicator registers as, and the name its listing row carries.
pub const INDICATOR_NAME: &str = "testing-123";
