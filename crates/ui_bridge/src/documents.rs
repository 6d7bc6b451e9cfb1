use crate::panel::{Panel, PANEL_COUNT};
use crate::toolkit::{DocumentId, UiContext};

/// Visibility control over the five panel documents.
pub trait DocumentControl {
    fn show(&mut self, panel: Panel);
    fn hide(&mut self, panel: Panel);
    fn is_visible(&self, panel: Panel) -> bool;
}

/// Non-owning document references, one slot per panel.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocumentRegistry {
    slots: [Option<DocumentId>; PANEL_COUNT],
}

impl DocumentRegistry {
    pub fn get(&self, panel: Panel) -> Option<DocumentId> {
        self.slots[panel.index()]
    }

    pub fn get_by_name(&self, name: &str) -> Option<DocumentId> {
        Panel::from_name(name).and_then(|panel| self.get(panel))
    }

    pub fn set(&mut self, panel: Panel, document: Option<DocumentId>) {
        self.slots[panel.index()] = document;
    }

    pub fn has_all_loaded(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.slots = [None; PANEL_COUNT];
    }

    pub fn is_visible_in(&self, panel: Panel, context: &dyn UiContext) -> bool {
        self.get(panel)
            .is_some_and(|document| context.is_document_visible(document))
    }

    /// True while a visible document is one the player interacts with.
    pub fn has_active_interactive_in(&self, context: &dyn UiContext) -> bool {
        Panel::ALL
            .into_iter()
            .filter(|panel| panel.is_interactive())
            .any(|panel| self.is_visible_in(panel, context))
    }

    pub fn bind<'a>(&'a self, context: &'a mut dyn UiContext) -> BoundDocuments<'a> {
        BoundDocuments {
            registry: self,
            context,
        }
    }
}

/// A registry paired with the context that owns its documents.
pub struct BoundDocuments<'a> {
    registry: &'a DocumentRegistry,
    context: &'a mut dyn UiContext,
}

impl BoundDocuments<'_> {
    pub fn toggle(&mut self, panel: Panel) {
        if self.is_visible(panel) {
            self.hide(panel);
        } else {
            self.show(panel);
        }
    }
}

impl DocumentControl for BoundDocuments<'_> {
    fn show(&mut self, panel: Panel) {
        if let Some(document) = self.registry.get(panel) {
            self.context.show_document(document);
        }
    }

    fn hide(&mut self, panel: Panel) {
        if let Some(document) = self.registry.get(panel) {
            self.context.hide_document(document);
        }
    }

    fn is_visible(&self, panel: Panel) -> bool {
        self.registry.is_visible_in(panel, &*self.context)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Records visibility calls so tests can assert on them.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingDocuments {
        pub(crate) visible: [bool; PANEL_COUNT],
        pub(crate) calls: Vec<(Panel, bool)>,
    }

    impl DocumentControl for RecordingDocuments {
        fn show(&mut self, panel: Panel) {
            self.visible[panel.index()] = true;
            self.calls.push((panel, true));
        }

        fn hide(&mut self, panel: Panel) {
            self.visible[panel.index()] = false;
            self.calls.push((panel, false));
        }

        fn is_visible(&self, panel: Panel) -> bool {
            self.visible[panel.index()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_resolves_nothing() {
        let registry = DocumentRegistry::default();
        assert_eq!(registry.get(Panel::Menu), None);
        assert_eq!(registry.get_by_name("menu"), None);
        assert_eq!(registry.get_by_name("inventory"), None);
        assert!(!registry.has_all_loaded());
    }

    #[test]
    fn all_loaded_requires_every_slot() {
        let mut registry = DocumentRegistry::default();
        for (i, panel) in Panel::ALL.into_iter().enumerate() {
            assert!(!registry.has_all_loaded());
            registry.set(panel, Some(DocumentId(i as u32)));
        }
        assert!(registry.has_all_loaded());
        assert_eq!(registry.get_by_name("console"), Some(DocumentId(3)));

        registry.clear();
        assert_eq!(registry.loaded_count(), 0);
    }
}
