//! Built-in gradient presets and the runtime preset table.

use std::cell::RefCell;
use std::rc::Rc;

use crate::color::Rgb;
use crate::settings::{AnimationUpdate, ColorSet, SettingsStore};

/// A named color/animation template. Colors replace the current set
/// wholesale on application; animation fields merge over it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub colors: ColorSet,
    pub animation: AnimationUpdate,
}

fn c(r: u8, g: u8, b: u8) -> Rgb {
    Rgb::new(r, g, b)
}

fn preset(colors: [Rgb; 4], speed: f32, complexity: u32, scale: f32) -> Preset {
    Preset {
        colors: ColorSet::from(colors),
        animation: AnimationUpdate::new(speed, complexity, scale),
    }
}

/// The fixed built-in set, in presentation order.
pub fn builtins() -> Vec<(&'static str, Preset)> {
    vec![
        ("default", preset([c(0xff, 0x6b, 0x6b), c(0x4e, 0xcd, 0xc4), c(0x45, 0xb7, 0xd1), c(0xf7, 0xdc, 0x6f)], 1.0, 3, 1.0)),
        ("warm", preset([c(0xff, 0x9a, 0x56), c(0xff, 0x6b, 0x6b), c(0xfe, 0xca, 0x57), c(0xff, 0x76, 0x75)], 0.8, 2, 1.2)),
        ("cool", preset([c(0x74, 0xb9, 0xff), c(0x09, 0x84, 0xe3), c(0x00, 0xce, 0xc9), c(0x6c, 0x5c, 0xe7)], 1.0, 3, 1.0)),
        ("contrast", preset([c(0x2d, 0x34, 0x36), c(0xff, 0xff, 0xff), c(0xdd, 0xdd, 0xdd), c(0x00, 0x00, 0x00)], 1.5, 4, 0.8)),
        ("cinematic", preset([c(0x2c, 0x3e, 0x50), c(0x34, 0x98, 0xdb), c(0x9b, 0x59, 0xb6), c(0x1a, 0xbc, 0x9c)], 0.6, 4, 1.5)),
        ("vintage", preset([c(0xd6, 0x30, 0x31), c(0xfd, 0xcb, 0x6e), c(0x6c, 0x5c, 0xe7), c(0xfd, 0x79, 0xa8)], 0.5, 2, 2.0)),
        ("neon", preset([c(0xfd, 0x79, 0xa8), c(0xfd, 0xcb, 0x6e), c(0x00, 0xce, 0xc9), c(0x6c, 0x5c, 0xe7)], 2.0, 5, 0.7)),
        ("sunset", preset([c(0xfd, 0x79, 0xa8), c(0xfd, 0xcb, 0x6e), c(0xe1, 0x70, 0x55), c(0xd6, 0x30, 0x31)], 0.7, 3, 1.3)),
        ("cyberpunk", preset([c(0xff, 0x00, 0x6e), c(0x00, 0xf5, 0xff), c(0x83, 0x38, 0xec), c(0x3a, 0x86, 0xff)], 1.8, 5, 0.8)),
        ("ocean", preset([c(0x09, 0x84, 0xe3), c(0x74, 0xb9, 0xff), c(0x00, 0xce, 0xc9), c(0x55, 0xa3, 0xff)], 1.2, 4, 1.1)),
        ("forest", preset([c(0x00, 0xb8, 0x94), c(0x55, 0xa3, 0xff), c(0x6c, 0x5c, 0xe7), c(0xa2, 0x9b, 0xfe)], 0.9, 3, 1.4)),
        ("fire", preset([c(0xd6, 0x30, 0x31), c(0xe1, 0x70, 0x55), c(0xfd, 0xcb, 0x6e), c(0xfd, 0x79, 0xa8)], 1.6, 4, 0.9)),
        ("purple", preset([c(0x6c, 0x5c, 0xe7), c(0xa2, 0x9b, 0xfe), c(0xfd, 0x79, 0xa8), c(0xfd, 0xcb, 0x6e)], 1.1, 3, 1.2)),
        ("gold", preset([c(0xfd, 0xcb, 0x6e), c(0xe1, 0x70, 0x55), c(0xfd, 0x79, 0xa8), c(0xd6, 0x30, 0x31)], 0.8, 2, 1.5)),
        ("ice", preset([c(0x74, 0xb9, 0xff), c(0x09, 0x84, 0xe3), c(0x00, 0xce, 0xc9), c(0xff, 0xff, 0xff)], 0.6, 2, 1.8)),
        ("desert", preset([c(0xe1, 0x70, 0x55), c(0xfd, 0xcb, 0x6e), c(0xd6, 0x30, 0x31), c(0xff, 0x76, 0x75)], 0.7, 3, 1.6)),
        ("night", preset([c(0x2d, 0x34, 0x36), c(0x63, 0x6e, 0x72), c(0x6c, 0x5c, 0xe7), c(0xa2, 0x9b, 0xfe)], 0.5, 4, 2.0)),
        ("spring", preset([c(0x00, 0xb8, 0x94), c(0x55, 0xa3, 0xff), c(0xfd, 0x79, 0xa8), c(0xfd, 0xcb, 0x6e)], 1.3, 3, 1.1)),
        ("autumn", preset([c(0xe1, 0x70, 0x55), c(0xd6, 0x30, 0x31), c(0xfd, 0xcb, 0x6e), c(0xff, 0x76, 0x75)], 0.8, 3, 1.4)),
        ("electric", preset([c(0x00, 0xf5, 0xff), c(0xff, 0x00, 0x6e), c(0x83, 0x38, 0xec), c(0xff, 0xbe, 0x0b)], 2.2, 5, 0.6)),
        ("blood", preset([c(0xd6, 0x30, 0x31), c(0x2d, 0x34, 0x36), c(0x63, 0x6e, 0x72), c(0xe1, 0x70, 0x55)], 0.4, 4, 1.8)),
        ("cosmic", preset([c(0x2d, 0x34, 0x36), c(0x6c, 0x5c, 0xe7), c(0xa2, 0x9b, 0xfe), c(0x74, 0xb9, 0xff)], 0.9, 5, 1.3)),
        ("lava", preset([c(0xd6, 0x30, 0x31), c(0xe1, 0x70, 0x55), c(0x2d, 0x34, 0x36), c(0xff, 0x76, 0x75)], 1.4, 4, 0.9)),
        ("mint", preset([c(0x00, 0xb8, 0x94), c(0x00, 0xce, 0xc9), c(0x55, 0xa3, 0xff), c(0x74, 0xb9, 0xff)], 1.0, 2, 1.2)),
    ]
}

pub fn is_builtin(id: &str) -> bool {
    builtins().iter().any(|(name, _)| *name == id)
}

/// Convenience lookup into the built-in set.
pub fn builtin(id: &str) -> Option<Preset> {
    builtins().into_iter().find(|(name, _)| *name == id).map(|(_, p)| p)
}

/// Runtime preset table: the built-ins plus any custom entries, in
/// insertion order, bound to a settings store for application.
pub struct PresetManager {
    store: Rc<SettingsStore>,
    entries: RefCell<Vec<(String, Preset)>>,
}

impl PresetManager {
    pub fn new(store: Rc<SettingsStore>) -> Self {
        let entries = builtins()
            .into_iter()
            .map(|(name, preset)| (name.to_owned(), preset))
            .collect();
        Self { store, entries: RefCell::new(entries) }
    }

    pub fn get(&self, id: &str) -> Option<Preset> {
        self.entries
            .borrow()
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, preset)| *preset)
    }

    /// Ordered read-only view for UI population.
    pub fn all(&self) -> Vec<(String, Preset)> {
        self.entries.borrow().clone()
    }

    /// Applies the named preset to the store; false when the id is unknown.
    pub fn apply(&self, id: &str) -> bool {
        match self.get(id) {
            Some(preset) => {
                self.store.set_preset(id, &preset);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<String> {
        self.store.settings().current_preset
    }

    /// Inserts or overwrites a custom entry. Built-in ids are protected;
    /// returns false without touching the table for those.
    pub fn add_custom(&self, id: &str, preset: Preset) -> bool {
        if is_builtin(id) {
            return false;
        }
        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|(name, _)| name == id) {
            Some((_, existing)) => *existing = preset,
            None => entries.push((id.to_owned(), preset)),
        }
        true
    }

    /// Removes a custom entry; built-ins cannot be removed.
    pub fn remove_custom(&self, id: &str) -> bool {
        if is_builtin(id) {
            return false;
        }
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(name, _)| name != id);
        entries.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (Rc<SettingsStore>, PresetManager) {
        let store = Rc::new(SettingsStore::new());
        let manager = PresetManager::new(Rc::clone(&store));
        (store, manager)
    }

    #[test]
    fn builtin_table_is_complete_and_ordered() {
        let all = builtins();
        assert_eq!(all.len(), 24);
        assert_eq!(all[0].0, "default");
        assert_eq!(all[23].0, "mint");
        // The default preset mirrors the startup settings.
        let default = builtin("default").unwrap();
        assert_eq!(default.colors, crate::settings::Settings::default().colors);
    }

    #[test]
    fn apply_known_and_unknown() {
        let (store, manager) = manager();
        assert!(manager.apply("cyberpunk"));
        let s = store.settings();
        assert_eq!(s.colors.color1, Rgb::new(0xff, 0x00, 0x6e));
        assert_eq!(s.animation.complexity, 5);
        assert_eq!(s.current_preset.as_deref(), Some("cyberpunk"));
        assert!(!manager.apply("no-such-preset"));
    }

    #[test]
    fn apply_is_idempotent() {
        let (store, manager) = manager();
        assert!(manager.apply("ocean"));
        let first = store.settings();
        assert!(manager.apply("ocean"));
        let second = store.settings();
        assert_eq!(first, second);
        assert_eq!(second.current_preset.as_deref(), Some("ocean"));
    }

    #[test]
    fn remove_builtin_fails_remove_custom_succeeds() {
        let (_, manager) = manager();
        assert!(!manager.remove_custom("default"));
        let custom = builtin("mint").unwrap();
        assert!(manager.add_custom("my-custom", custom));
        assert!(manager.get("my-custom").is_some());
        assert!(manager.remove_custom("my-custom"));
        assert!(manager.get("my-custom").is_none());
    }

    #[test]
    fn custom_cannot_shadow_builtin() {
        let (_, manager) = manager();
        let original = manager.get("warm").unwrap();
        assert!(!manager.add_custom("warm", builtin("ice").unwrap()));
        assert_eq!(manager.get("warm").unwrap(), original);
    }

    #[test]
    fn add_custom_overwrites_custom() {
        let (_, manager) = manager();
        assert!(manager.add_custom("mine", builtin("fire").unwrap()));
        assert!(manager.add_custom("mine", builtin("ice").unwrap()));
        assert_eq!(manager.get("mine").unwrap(), builtin("ice").unwrap());
        // Overwrite keeps a single entry.
        let count = manager.all().iter().filter(|(name, _)| name == "mine").count();
        assert_eq!(count, 1);
    }
}
