//! Registry of active pin windows.
//!
//! The stage owns one [`PinRegistry`] and hands it to each pinned controller
//! at setup. Registering returns a [`PinRegistration`] guard; dropping the
//! guard removes the entry, so every unmount path releases its slot. All
//! access happens on the page's single event loop thread.

use crate::pin::PinWindow;
use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    entries: FnvHashMap<u64, (&'static str, PinWindow)>,
}

#[derive(Clone, Default)]
pub struct PinRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl PinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &'static str, window: PinWindow) -> PinRegistration {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.insert(id, (name, window));
        log::debug!("[pin] registered {} at {:.0}px", name, window.start_px);
        PinRegistration {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every window, ascending by start offset.
    pub fn windows(&self) -> Vec<(&'static str, PinWindow)> {
        let mut out: Vec<_> = self.inner.borrow().entries.values().copied().collect();
        out.sort_by(|a, b| a.1.start_px.total_cmp(&b.1.start_px));
        out
    }
}

/// Live registration; removed from the registry on drop.
pub struct PinRegistration {
    id: u64,
    registry: Weak<RefCell<RegistryInner>>,
}

impl PinRegistration {
    /// Replace the window after a relayout.
    pub fn update(&self, window: PinWindow) {
        if let Some(inner) = self.registry.upgrade() {
            if let Some(entry) = inner.borrow_mut().entries.get_mut(&self.id) {
                entry.1 = window;
            }
        }
    }
}

impl Drop for PinRegistration {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            if let Some((name, _)) = inner.borrow_mut().entries.remove(&self.id) {
                log::debug!("[pin] released {}", name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: f64) -> PinWindow {
        PinWindow {
            start_px: start,
            extent_px: 100.0,
        }
    }

    #[test]
    fn windows_come_back_sorted() {
        let reg = PinRegistry::new();
        let _b = reg.register("b", window(500.0));
        let _a = reg.register("a", window(100.0));
        let names: Vec<_> = reg.windows().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn dropping_the_guard_unregisters() {
        let reg = PinRegistry::new();
        let a = reg.register("a", window(0.0));
        {
            let _b = reg.register("b", window(300.0));
            assert_eq!(reg.len(), 2);
        }
        assert_eq!(reg.len(), 1);
        drop(a);
        assert!(reg.is_empty());
    }

    #[test]
    fn update_moves_the_window() {
        let reg = PinRegistry::new();
        let a = reg.register("a", window(0.0));
        a.update(window(250.0));
        assert_eq!(reg.windows()[0].1.start_px, 250.0);
    }

    #[test]
    fn guard_outliving_registry_is_harmless() {
        let reg = PinRegistry::new();
        let a = reg.register("a", window(0.0));
        drop(reg);
        a.update(window(5.0));
        drop(a);
    }
}
