use std::fmt;

use crate::panel::{Panel, PANEL_COUNT};

/// Toolkit-side capability for invalidating one bound variable of a data model.
pub trait ModelHandle {
    fn dirty_variable(&self, name: &str);
}

/// Fixed shape a data model is registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSchema {
    pub panel: Panel,
    pub fields: &'static [&'static str],
    pub events: &'static [&'static str],
}

impl ModelSchema {
    pub fn name(&self) -> &'static str {
        self.panel.as_str()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(&name)
    }
}

/// A binding handle with explicit liveness. An empty handle swallows every
/// announcement, which is how an unbound view model stays inert.
#[derive(Default)]
pub struct BindingHandle {
    inner: Option<Box<dyn ModelHandle>>,
}

impl BindingHandle {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(handle: Box<dyn ModelHandle>) -> Self {
        Self {
            inner: Some(handle),
        }
    }

    pub fn is_live(&self) -> bool {
        self.inner.is_some()
    }

    pub fn dirty(&self, name: &str) {
        if let Some(handle) = &self.inner {
            handle.dirty_variable(name);
        }
    }

    pub fn clear(&mut self) {
        self.inner = None;
    }
}

impl fmt::Debug for BindingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingHandle")
            .field("live", &self.is_live())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct BindingSet {
    handles: [BindingHandle; PANEL_COUNT],
}

impl BindingSet {
    pub fn get(&self, panel: Panel) -> &BindingHandle {
        &self.handles[panel.index()]
    }

    pub fn set(&mut self, panel: Panel, handle: BindingHandle) {
        self.handles[panel.index()] = handle;
    }

    pub fn live_count(&self) -> usize {
        self.handles.iter().filter(|handle| handle.is_live()).count()
    }

    pub fn clear_all(&mut self) {
        for handle in &mut self.handles {
            handle.clear();
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{BindingHandle, ModelHandle};

    /// Records every announced name in order.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct DirtyRecorder {
        names: Rc<RefCell<Vec<String>>>,
    }

    impl DirtyRecorder {
        pub(crate) fn handle(&self) -> BindingHandle {
            BindingHandle::new(Box::new(self.clone()))
        }

        pub(crate) fn names(&self) -> Vec<String> {
            self.names.borrow().clone()
        }

        pub(crate) fn count(&self, name: &str) -> usize {
            self.names.borrow().iter().filter(|n| *n == name).count()
        }

        pub(crate) fn clear(&self) {
            self.names.borrow_mut().clear();
        }
    }

    impl ModelHandle for DirtyRecorder {
        fn dirty_variable(&self, name: &str) {
            self.names.borrow_mut().push(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::DirtyRecorder;
    use super::*;

    #[test]
    fn empty_handle_is_inert() {
        let handle = BindingHandle::empty();
        assert!(!handle.is_live());
        handle.dirty("health");
    }

    #[test]
    fn cleared_handle_stops_forwarding() {
        let recorder = DirtyRecorder::default();
        let mut handle = recorder.handle();
        handle.dirty("armor");
        handle.clear();
        handle.dirty("armor");
        assert!(!handle.is_live());
        assert_eq!(recorder.names(), vec!["armor".to_string()]);
    }

    #[test]
    fn binding_set_clears_every_slot() {
        let recorder = DirtyRecorder::default();
        let mut set = BindingSet::default();
        set.set(Panel::Hud, recorder.handle());
        set.set(Panel::Menu, recorder.handle());
        assert_eq!(set.live_count(), 2);
        assert!(set.get(Panel::Menu).is_live());
        assert!(!set.get(Panel::Console).is_live());

        set.clear_all();
        assert_eq!(set.live_count(), 0);
    }
}
