use crate::names;

use serde::{Deserialize, Serialize};
use zbus::zvariant::Type;

/// On-screen placement of a panel entry, as carried by the `EntryActivated`
/// signal (the `(iiuu)` record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One row of a `SyncOne` listing (the `(sssubbubbi)` record).
///
/// Only the three string fields matter to the reconciler; the rest are carried
/// so the row round-trips over the wire unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Type)]
pub struct PanelItemRow {
    /// Indicator module the entry was registered by, e.g. `libapplication.so`.
    pub indicator_id: String,
    /// The panel service's identifier for the entry.
    pub entry_id: String,
    /// Name the owning application registered the entry under.
    pub name_hint: String,
    pub parent_window: u32,
    pub label_sensitive: bool,
    pub label_visible: bool,
    pub image_type: u32,
    pub image_sensitive: bool,
    pub image_visible: bool,
    pub priority: i32,
}

impl PanelItemRow {
    /// Row with the given string fields and default flags.
    pub fn new(indicator_id: &str, entry_id: &str, name_hint: &str) -> Self {
        Self {
            indicator_id: indicator_id.to_owned(),
            entry_id: entry_id.to_owned(),
            name_hint: name_hint.to_owned(),
            ..Default::default()
        }
    }
}

/// Our indicator's entry as the panel service knows it.
///
/// Starts out unsynchronized (no identifier). [`apply_listing`] learns the
/// identifier from a `SyncOne` response; [`activate_if`] forwards a matching
/// activation to the callback handed in at construction.
///
/// [`apply_listing`]: PanelEntry::apply_listing
/// [`activate_if`]: PanelEntry::activate_if
pub struct PanelEntry {
    identifier: Option<String>,
    on_activate: Box<dyn FnMut(Geometry) + Send>,
}

impl PanelEntry {
    pub fn new(on_activate: impl FnMut(Geometry) + Send + 'static) -> Self {
        Self { identifier: None, on_activate: Box::new(on_activate) }
    }

    /// The identifier learned from the last successful synchronization, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn is_synchronized(&self) -> bool {
        self.identifier.is_some()
    }

    /// Take the identifier from the listing row registered by
    /// [`names::APPLICATION_MODULE`] under [`names::INDICATOR_NAME`].
    ///
    /// Qualifying rows are applied in order, so if the listing names the entry
    /// more than once the last row wins. A listing that doesn't name the entry
    /// at all leaves the last-known identifier in place. Returns whether the
    /// identifier changed.
    pub fn apply_listing(&mut self, rows: &[PanelItemRow]) -> bool {
        let mut changed = false;
        for row in rows {
            if row.indicator_id == names::APPLICATION_MODULE
                && row.name_hint == names::INDICATOR_NAME
                && self.identifier.as_deref() != Some(row.entry_id.as_str())
            {
                self.identifier = Some(row.entry_id.clone());
                changed = true;
            }
        }
        changed
    }

    /// Invoke the activation callback iff `entry_id` names this entry.
    ///
    /// An unsynchronized entry matches nothing. Returns whether the callback
    /// ran.
    pub fn activate_if(&mut self, entry_id: &str, geometry: Geometry) -> bool {
        if self.identifier.as_deref() == Some(entry_id) {
            (self.on_activate)(geometry);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn entry() -> PanelEntry {
        PanelEntry::new(|_| {})
    }

    fn row(indicator_id: &str, entry_id: &str, name_hint: &str) -> PanelItemRow {
        PanelItemRow::new(indicator_id, entry_id, name_hint)
    }

    #[test]
    fn listing_without_qualifying_row_changes_nothing() {
        let mut entry = entry();
        let rows =
            vec![row("libappmenu.so", "abc", names::INDICATOR_NAME), row(names::APPLICATION_MODULE, "abc", "someone-else")];

        assert!(!entry.apply_listing(&rows));
        assert_eq!(entry.identifier(), None);
        assert!(!entry.is_synchronized());
    }

    #[test]
    fn qualifying_row_sets_identifier_once() {
        let mut entry = entry();
        let rows = vec![row(names::APPLICATION_MODULE, "abc", names::INDICATOR_NAME)];

        assert!(entry.apply_listing(&rows));
        assert_eq!(entry.identifier(), Some("abc"));

        // same response again: no change to signal
        assert!(!entry.apply_listing(&rows));
        assert_eq!(entry.identifier(), Some("abc"));
    }

    #[test]
    fn identifier_survives_a_listing_that_dropped_the_entry() {
        let mut entry = entry();
        assert!(entry.apply_listing(&[row(names::APPLICATION_MODULE, "abc", names::INDICATOR_NAME)]));

        assert!(!entry.apply_listing(&[]));
        assert_eq!(entry.identifier(), Some("abc"));
    }

    #[test]
    fn last_qualifying_row_wins() {
        let mut entry = entry();
        let rows = vec![
            row(names::APPLICATION_MODULE, "first", names::INDICATOR_NAME),
            row(names::APPLICATION_MODULE, "second", names::INDICATOR_NAME),
        ];

        assert!(entry.apply_listing(&rows));
        assert_eq!(entry.identifier(), Some("second"));
    }

    #[test]
    fn activation_requires_matching_identifier() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut entry = PanelEntry::new({
            let seen = seen.clone();
            move |geometry| seen.lock().unwrap().push(geometry)
        });
        let geometry = Geometry { x: 10, y: 20, width: 5, height: 5 };

        // unsynchronized: nothing matches
        assert!(!entry.activate_if("abc", geometry));

        entry.apply_listing(&[row(names::APPLICATION_MODULE, "abc", names::INDICATOR_NAME)]);
        assert!(!entry.activate_if("xyz", geometry));
        assert!(entry.activate_if("abc", geometry));

        assert_eq!(*seen.lock().unwrap(), vec![geometry]);
    }
}
