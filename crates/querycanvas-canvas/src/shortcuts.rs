use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Delete,
    Backspace,
    Escape,
    Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub ctrl: bool,
    /// Cmd on macOS.
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    pub fn command(key: Key) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasAction {
    Undo,
    DeleteSelection,
}

impl CanvasAction {
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        match event.key {
            Key::Char('z' | 'Z') if event.ctrl || event.meta => Some(CanvasAction::Undo),
            Key::Delete | Key::Backspace => Some(CanvasAction::DeleteSelection),
            _ => None,
        }
    }
}

/// Canvas keyboard bindings. They only resolve while at least one
/// [`ShortcutScope`] is alive.
#[derive(Debug, Clone, Default)]
pub struct Shortcuts {
    mounted: Arc<AtomicUsize>,
}

impl Shortcuts {
    pub fn mount(&self) -> ShortcutScope {
        self.mounted.fetch_add(1, Ordering::SeqCst);
        debug!("Canvas shortcuts mounted");
        ShortcutScope {
            mounted: Arc::clone(&self.mounted),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst) > 0
    }

    pub fn resolve(&self, event: &KeyEvent) -> Option<CanvasAction> {
        if !self.is_mounted() {
            return None;
        }
        CanvasAction::from_key(event)
    }
}

/// Keeps the canvas bindings registered. Dropping it unregisters them.
#[must_use = "shortcuts unregister as soon as the scope is dropped"]
#[derive(Debug)]
pub struct ShortcutScope {
    mounted: Arc<AtomicUsize>,
}

impl Drop for ShortcutScope {
    fn drop(&mut self) {
        self.mounted.fetch_sub(1, Ordering::SeqCst);
        debug!("Canvas shortcuts unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(
            CanvasAction::from_key(&KeyEvent::command(Key::Char('z'))),
            Some(CanvasAction::Undo)
        );
        let cmd_z = KeyEvent {
            meta: true,
            ..KeyEvent::plain(Key::Char('z'))
        };
        assert_eq!(CanvasAction::from_key(&cmd_z), Some(CanvasAction::Undo));
        assert_eq!(CanvasAction::from_key(&KeyEvent::plain(Key::Char('z'))), None);
        assert_eq!(
            CanvasAction::from_key(&KeyEvent::plain(Key::Backspace)),
            Some(CanvasAction::DeleteSelection)
        );
    }

    #[test]
    fn test_scope_drop_unregisters() {
        let shortcuts = Shortcuts::default();
        let delete = KeyEvent::plain(Key::Delete);
        assert_eq!(shortcuts.resolve(&delete), None);

        let scope = shortcuts.mount();
        assert_eq!(shortcuts.resolve(&delete), Some(CanvasAction::DeleteSelection));

        drop(scope);
        assert!(!shortcuts.is_mounted());
        assert_eq!(shortcuts.resolve(&delete), None);
    }

    #[test]
    fn test_nested_scopes() {
        let shortcuts = Shortcuts::default();
        let outer = shortcuts.mount();
        let inner = shortcuts.mount();
        drop(inner);
        assert!(shortcuts.is_mounted());
        drop(outer);
        assert!(!shortcuts.is_mounted());
    }
}
