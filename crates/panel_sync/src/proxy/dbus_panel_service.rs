//! # DBus interface proxy for: `com.canonical.Unity.Panel.Service`

use crate::{Geometry, PanelItemRow};
use zbus::proxy;

#[proxy(
    interface = "com.canonical.Unity.Panel.Service",
    default_service = "com.canonical.Unity.Panel.Service.Desktop",
    default_path = "/com/canonical/Unity/Panel/Service",
    gen_blocking = false
)]
pub trait PanelService {
    /// SyncOne method
    ///
    /// The panel's current listing of the entries registered by the indicator
    /// module `indicator_id`.
    fn sync_one(&self, indicator_id: &str) -> zbus::Result<Vec<PanelItemRow>>;

    /// ReSync signal
    ///
    /// The panel's listing for `indicator_id` changed and consumers should
    /// fetch it again.
    #[zbus(signal)]
    fn re_sync(&self, indicator_id: &str) -> zbus::Result<()>;

    /// EntryActivated signal
    ///
    /// The user activated `entry_id` on panel `panel_id`; `geometry` is where
    /// the entry sits on screen.
    #[zbus(signal)]
    fn entry_activated(&self, panel_id: &str, entry_id: &str, geometry: Geometry) -> zbus::Result<()>;
}
