#![cfg(not(target_arch = "wasm32"))]

//! End-to-end host checks over the public API: preset application, share
//! token round-trips and the generated artifacts.

use std::rc::Rc;

use gradient_studio::export;
use gradient_studio::presets::PresetManager;
use gradient_studio::settings::{AnimationUpdate, SettingsStore};
use gradient_studio::share;

#[test]
fn default_settings_round_trip_through_a_share_token() {
    let source = SettingsStore::new();
    let token = share::encode_token(&source.settings());

    let target = SettingsStore::new();
    target.randomize();
    share::restore_from_token(&target, &token).unwrap();

    let restored = target.settings();
    assert_eq!(restored.colors, source.settings().colors);
    assert_eq!(restored.animation.speed, 1.0);
    assert_eq!(restored.animation.complexity, 3);
    assert_eq!(restored.animation.scale, 1.0);
    assert!(restored.current_preset.is_none());
}

#[test]
fn tweaked_preset_shares_as_anonymous_state() {
    let store = Rc::new(SettingsStore::new());
    let presets = PresetManager::new(Rc::clone(&store));
    assert!(presets.apply("sunset"));
    store.update_animation(AnimationUpdate { speed: Some(2.2), ..Default::default() });

    let token = share::encode_token(&store.settings());
    let receiver = SettingsStore::new();
    share::restore_from_token(&receiver, &token).unwrap();

    let received = receiver.settings();
    assert_eq!(received.colors, store.settings().colors);
    assert_eq!(received.animation.speed, 2.2);
    // The link carries raw values, never the preset name.
    assert!(received.current_preset.is_none());
}

#[test]
fn garbage_tokens_never_disturb_the_receiver() {
    let receiver = Rc::new(SettingsStore::new());
    let presets = PresetManager::new(Rc::clone(&receiver));
    assert!(presets.apply("forest"));
    let before = receiver.settings();

    for token in ["", "%%%", "dGhpcyBpcyBub3QganNvbg", "AAAA"] {
        assert!(share::restore_from_token(&receiver, token).is_err());
        assert_eq!(receiver.settings(), before);
    }
}

#[test]
fn artifacts_reflect_the_applied_preset() {
    let store = Rc::new(SettingsStore::new());
    let presets = PresetManager::new(Rc::clone(&store));
    assert!(presets.apply("cyberpunk"));
    let snapshot = store.settings();

    let css = export::stylesheet(&snapshot);
    let svg = export::svg_document(&snapshot, export::SVG_DEFAULT_WIDTH, export::SVG_DEFAULT_HEIGHT);
    let embed = export::embed_snippet(&snapshot, 42);
    for color in snapshot.colors.as_array() {
        let hex = color.to_string();
        assert!(css.contains(&hex), "stylesheet missing {hex}");
        assert!(svg.contains(&hex), "svg missing {hex}");
        assert!(embed.contains(&hex), "embed missing {hex}");
    }
    assert!(svg.contains(r#"width="800" height="600""#));
}

#[test]
fn settings_file_export_import_cycle() {
    let store = Rc::new(SettingsStore::new());
    let presets = PresetManager::new(Rc::clone(&store));
    assert!(presets.apply("ice"));
    let json = export::settings_file(&store.settings(), "2026-08-06T09:00:00.000Z");

    let fresh = SettingsStore::new();
    let import = export::parse_settings_file(&json).unwrap();
    fresh.update_colors(import.colors);
    fresh.update_animation(import.animation);

    assert_eq!(fresh.settings().colors, store.settings().colors);
    assert_eq!(fresh.settings().animation, store.settings().animation);
}

#[test]
fn builtin_protection_holds_through_the_manager() {
    let store = Rc::new(SettingsStore::new());
    let presets = PresetManager::new(Rc::clone(&store));

    assert!(!presets.remove_custom("default"));
    let custom = gradient_studio::presets::builtin("mint").unwrap();
    assert!(presets.add_custom("my-custom", custom));
    assert!(presets.apply("my-custom"));
    assert_eq!(store.settings().current_preset.as_deref(), Some("my-custom"));
    assert!(presets.remove_custom("my-custom"));
    assert!(!presets.apply("my-custom"));
}
