use crate::{names, proxy::PanelServiceProxy, Error, Geometry, PanelEntry, Result};

use std::time::Duration;
use zbus::export::ordered_stream::OrderedStreamExt;

/// Bound on the `SyncOne` round-trip. The panel service answers from memory,
/// so anything slower than this means it is gone or wedged.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(5);

/// A panel-service signal we act on.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    ReSync { indicator_id: String },
    EntryActivated { entry_id: String, geometry: Geometry },
}

/// Decode a panel-service signal message into a [`PanelEvent`].
///
/// Signals other than `ReSync` and `EntryActivated` decode to `None`. A known
/// signal with a body we can't read is a [`Error::MalformedSignal`]; the
/// caller decides whether to drop it (the reconciler loop does).
pub fn decode_signal(msg: &zbus::Message) -> Result<Option<PanelEvent>> {
    let header = msg.header();
    let Some(member) = header.member() else {
        return Ok(None);
    };

    match member.as_str() {
        "ReSync" => {
            let (indicator_id,): (String,) =
                msg.body().deserialize().map_err(|e| Error::MalformedSignal(member.to_string(), e))?;
            Ok(Some(PanelEvent::ReSync { indicator_id }))
        }
        "EntryActivated" => {
            // first field is the emitting panel's id, which we don't use
            let (_panel_id, entry_id, geometry): (String, String, Geometry) =
                msg.body().deserialize().map_err(|e| Error::MalformedSignal(member.to_string(), e))?;
            Ok(Some(PanelEvent::EntryActivated { entry_id, geometry }))
        }
        _ => Ok(None),
    }
}

/// Ask the panel service for its listing of [`names::APPLICATION_MODULE`]
/// entries and apply it to `entry`.
///
/// On failure (including `sync_timeout` elapsing) the entry keeps whatever
/// identifier it had. Returns whether the identifier changed.
pub async fn handle_resync(proxy: &PanelServiceProxy<'_>, entry: &mut PanelEntry, sync_timeout: Duration) -> Result<bool> {
    let rows = tokio::time::timeout(sync_timeout, proxy.sync_one(names::APPLICATION_MODULE))
        .await
        .map_err(|_| Error::SyncTimeout(sync_timeout))??;
    Ok(entry.apply_listing(&rows))
}

/// Act on one decoded panel signal.
///
/// A `ReSync` naming our module triggers [`handle_resync`]; resync failures
/// are logged and swallowed, since the service will announce itself again with
/// a fresh `ReSync`. An `EntryActivated` for our entry runs its callback.
pub async fn dispatch_event(proxy: &PanelServiceProxy<'_>, entry: &mut PanelEntry, event: PanelEvent, sync_timeout: Duration) {
    match event {
        PanelEvent::ReSync { indicator_id } if indicator_id == names::APPLICATION_MODULE => {
            match handle_resync(proxy, entry, sync_timeout).await {
                Ok(true) => log::info!("panel entry is now {:?}", entry.identifier()),
                Ok(false) => {}
                Err(e) => log::warn!("could not resync with the panel service: {}", e),
            }
        }
        PanelEvent::ReSync { indicator_id } => {
            log::debug!("ignoring ReSync for {}", indicator_id);
        }
        PanelEvent::EntryActivated { entry_id, geometry } => {
            entry.activate_if(&entry_id, geometry);
        }
    }
}

/// Keep `entry` in agreement with the panel service until the signal stream
/// ends (i.e. the connection is closed).
///
/// Malformed signals are logged and dropped; nothing that arrives over the bus
/// can take the loop down.
pub async fn run_reconciler(proxy: &PanelServiceProxy<'_>, entry: &mut PanelEntry, sync_timeout: Duration) -> Result<()> {
    let mut signals = proxy.inner().receive_all_signals().await?;
    while let Some(msg) = signals.next().await {
        match decode_signal(&msg) {
            Ok(Some(event)) => dispatch_event(proxy, entry, event, sync_timeout).await,
            Ok(None) => {}
            Err(e) => log::warn!("ignoring panel signal: {}", e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn signal<B>(member: &str, body: &B) -> zbus::Message
    where
        B: serde::ser::Serialize + zbus::zvariant::DynamicType,
    {
        zbus::message::Message::signal(names::PANEL_OBJECT, names::PANEL_INTERFACE, member)
            .unwrap()
            .build(body)
            .unwrap()
    }

    #[test]
    fn resync_signal_decodes() {
        let msg = signal("ReSync", &(names::APPLICATION_MODULE,));
        let event = decode_signal(&msg).unwrap();
        assert_eq!(event, Some(PanelEvent::ReSync { indicator_id: names::APPLICATION_MODULE.into() }));
    }

    #[test]
    fn entry_activated_signal_decodes() {
        let geometry = Geometry { x: 10, y: 20, width: 5, height: 5 };
        let msg = signal("EntryActivated", &("/com/canonical/Unity/Panel/Service/panel0", "abc", geometry));
        let event = decode_signal(&msg).unwrap();
        assert_eq!(event, Some(PanelEvent::EntryActivated { entry_id: "abc".into(), geometry }));
    }

    #[test]
    fn unknown_signals_are_ignored() {
        let msg = signal("EntryShowNowChanged", &("abc", true));
        assert_eq!(decode_signal(&msg).unwrap(), None);
    }

    #[test]
    fn resync_with_wrong_payload_is_malformed() {
        let msg = signal("ReSync", &(42u32,));
        assert!(matches!(decode_signal(&msg), Err(Error::MalformedSignal(member, _)) if member == "ReSync"));
    }

    #[test]
    fn entry_activated_without_geometry_is_malformed() {
        let msg = signal("EntryActivated", &("panel0", "abc"));
        assert!(matches!(decode_signal(&msg), Err(Error::MalformedSignal(member, _)) if member == "EntryActivated"));
    }
}
