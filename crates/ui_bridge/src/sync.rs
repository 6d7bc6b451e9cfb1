use serde::Serialize;

use crate::binding::{BindingHandle, BindingSet};
use crate::documents::DocumentControl;
use crate::panel::Panel;
use crate::viewmodel::{FieldDiff, ViewModel, ViewModelSnapshot, ViewModelStore};

/// Outcome of one synchronizer pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub panel: Option<Panel>,
    pub changed: Vec<&'static str>,
    /// Set when the pass showed (`true`) or hid (`false`) the panel's document.
    pub document_visibility: Option<bool>,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Commits every field of `next` that differs from `current` and announces it.
/// An inert handle makes the whole call a no-op.
pub fn sync<V: ViewModel>(
    current: &mut V,
    next: &V,
    handle: &BindingHandle,
    documents: &mut dyn DocumentControl,
) -> SyncReport {
    let panel = V::SCHEMA.panel;
    if !handle.is_live() {
        return SyncReport::default();
    }

    let visible_before = current.coupled_visibility();
    let mut diff = FieldDiff::new(handle);
    current.sync_from(next, &mut diff);
    let changed = diff.into_changed();

    let mut document_visibility = None;
    let visible_after = current.coupled_visibility();
    if visible_before != visible_after {
        if let Some(visible) = visible_after {
            if visible {
                documents.show(panel);
            } else {
                documents.hide(panel);
            }
            document_visibility = Some(visible);
        }
    }

    SyncReport {
        panel: Some(panel),
        changed,
        document_visibility,
    }
}

/// Routes a tagged snapshot to the matching stored view model.
pub fn sync_snapshot(
    store: &mut ViewModelStore,
    snapshot: &ViewModelSnapshot,
    bindings: &BindingSet,
    documents: &mut dyn DocumentControl,
) -> SyncReport {
    let handle = bindings.get(snapshot.panel());
    match snapshot {
        ViewModelSnapshot::Hud(next) => sync(&mut store.hud, next, handle, documents),
        ViewModelSnapshot::Messages(next) => sync(&mut store.messages, next, handle, documents),
        ViewModelSnapshot::Scoreboard(next) => {
            sync(&mut store.scoreboard, next, handle, documents)
        }
        ViewModelSnapshot::Console(next) => sync(&mut store.console, next, handle, documents),
        ViewModelSnapshot::Menu(next) => sync(&mut store.menu, next, handle, documents),
    }
}
