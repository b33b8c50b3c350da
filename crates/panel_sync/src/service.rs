use crate::{names, Geometry, PanelItemRow};

use std::sync::{Arc, Mutex};
use zbus::{interface, object_server::SignalContext};

/// An instance of `com.canonical.Unity.Panel.Service`, reduced to the part of
/// the interface that entry synchronization consumes: the row listing behind
/// `SyncOne`, and the `ReSync`/`EntryActivated` signals.
///
/// The desktop shell normally provides this service; running one standalone
/// gives indicators something to synchronize against on a plain session bus.
#[derive(Debug, Clone, Default)]
pub struct PanelService {
    // Intentionally using std::sync::Mutex instead of tokio's async mutex, since we don't need to
    // hold the mutex across an await.
    //
    // See <https://docs.rs/tokio/latest/tokio/sync/struct.Mutex.html#which-kind-of-mutex-should-you-use>
    rows: Arc<Mutex<Vec<PanelItemRow>>>,
}

/// Implementation of the panel-service interface.
///
/// Methods correspond to methods on the DBus service that indicators call,
/// while signals are events we generate that indicators listen to.
#[interface(name = "com.canonical.Unity.Panel.Service")]
impl PanelService {
    /// SyncOne method
    async fn sync_one(&self, indicator_id: &str) -> Vec<PanelItemRow> {
        log::info!("listing entries for {}", indicator_id);
        let rows = self.rows.lock().unwrap(); // unwrap: mutex poisoning is okay
        rows.iter().filter(|row| row.indicator_id == indicator_id).cloned().collect()
    }

    /// ReSync signal
    #[zbus(signal)]
    async fn re_sync(ctxt: &SignalContext<'_>, indicator_id: &str) -> zbus::Result<()>;

    /// EntryActivated signal
    #[zbus(signal)]
    async fn entry_activated(ctxt: &SignalContext<'_>, panel_id: &str, entry_id: &str, geometry: Geometry)
        -> zbus::Result<()>;
}

impl PanelService {
    /// Create a new service with an empty listing.
    pub fn new() -> PanelService {
        Default::default()
    }

    /// Replace the whole listing.
    pub fn set_rows(&self, rows: Vec<PanelItemRow>) {
        *self.rows.lock().unwrap() = rows; // unwrap: mutex poisoning is okay
    }

    pub fn push_row(&self, row: PanelItemRow) {
        self.rows.lock().unwrap().push(row); // unwrap: mutex poisoning is okay
    }

    /// Attach and run the service (in the background) on a connection.
    ///
    /// Unlike tray watchers, exactly one panel service makes sense on a bus,
    /// so losing the name race is an error rather than a deferral.
    pub async fn attach_to(self, con: &zbus::Connection) -> zbus::Result<()> {
        if !con.object_server().at(names::PANEL_OBJECT, self).await? {
            return Err(zbus::Error::Failure(format!(
                "Object already exists at {} on this connection -- is a panel service already running?",
                names::PANEL_OBJECT
            )));
        }

        let flags = [zbus::fdo::RequestNameFlags::DoNotQueue];
        match con.request_name_with_flags(names::PANEL_BUS, flags.into_iter().collect()).await? {
            zbus::fdo::RequestNameReply::PrimaryOwner => Ok(()),
            _ => Err(zbus::Error::NameTaken),
        }
    }
}

/// Emit `ReSync` for `indicator_id` from the service attached to `con`.
pub async fn emit_resync(con: &zbus::Connection, indicator_id: &str) -> zbus::Result<()> {
    let iface = con.object_server().interface::<_, PanelService>(names::PANEL_OBJECT).await?;
    PanelService::re_sync(iface.signal_context(), indicator_id).await
}

/// Emit `EntryActivated` from the service attached to `con`.
pub async fn emit_entry_activated(
    con: &zbus::Connection,
    panel_id: &str,
    entry_id: &str,
    geometry: Geometry,
) -> zbus::Result<()> {
    let iface = con.object_server().interface::<_, PanelService>(names::PANEL_OBJECT).await?;
    PanelService::entry_activated(iface.signal_context(), panel_id, entry_id, geometry).await
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn sync_one_filters_by_indicator_module() {
        let service = PanelService::new();
        service.set_rows(vec![
            PanelItemRow::new(names::APPLICATION_MODULE, "abc", names::INDICATOR_NAME),
            PanelItemRow::new("libappmenu.so", "def", "gedit"),
        ]);
        service.push_row(PanelItemRow::new(names::APPLICATION_MODULE, "ghi", "someone-else"));

        let rows = service.sync_one(names::APPLICATION_MODULE).await;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.indicator_id == names::APPLICATION_MODULE));

        assert!(service.sync_one("libsoundmenu.so").await.is_empty());
    }
}
