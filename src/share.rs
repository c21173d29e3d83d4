//! Compact URL-safe token carrying a shareable settings snapshot.
//!
//! The token is the JSON record `{"c":[4 hex colors],"s":speed,
//! "x":complexity,"z":scale}` encoded with the unpadded URL-safe base64
//! alphabet. Decoding is deliberately tolerant: the color array is
//! all-or-nothing, the three scalars apply independently, and anything
//! that fails to parse leaves the store untouched.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Serialize;
use serde_json::Value;

use crate::color::Rgb;
use crate::settings::{Settings, SettingsStore};

#[derive(Serialize)]
struct ShareRecord {
    c: [String; 4],
    s: f32,
    x: u32,
    z: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token payload has the wrong shape")]
    Shape,
}

/// Fields recovered from a token; unset fields keep their prior values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShareUpdate {
    pub colors: Option<[Rgb; 4]>,
    pub speed: Option<f32>,
    pub complexity: Option<u32>,
    pub scale: Option<f32>,
}

pub fn encode_token(settings: &Settings) -> String {
    let [c1, c2, c3, c4] = settings.colors.as_array();
    let record = ShareRecord {
        c: [c1.to_string(), c2.to_string(), c3.to_string(), c4.to_string()],
        s: settings.animation.speed,
        x: settings.animation.complexity,
        z: settings.animation.scale,
    };
    // Serializing a record of plain strings and numbers cannot fail.
    let json = serde_json::to_vec(&record).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

pub fn decode_token(token: &str) -> Result<ShareUpdate, ShareError> {
    let bytes = URL_SAFE_NO_PAD.decode(token)?;
    let value: Value = serde_json::from_slice(&bytes)?;
    let record = value.as_object().ok_or(ShareError::Shape)?;

    let colors = match record.get("c").and_then(Value::as_array) {
        Some(entries) if entries.len() == 4 => {
            let mut parsed = [Rgb::new(0, 0, 0); 4];
            let mut ok = true;
            for (slot, entry) in parsed.iter_mut().zip(entries) {
                match entry.as_str().and_then(|s| s.parse().ok()) {
                    Some(color) => *slot = color,
                    None => {
                        ok = false;
                        break;
                    }
                }
            }
            ok.then_some(parsed)
        }
        _ => None,
    };

    Ok(ShareUpdate {
        colors,
        speed: record.get("s").and_then(Value::as_f64).map(|v| v as f32),
        complexity: record.get("x").and_then(Value::as_f64).map(|v| (v as u32).max(1)),
        scale: record.get("z").and_then(Value::as_f64).map(|v| v as f32),
    })
}

/// Decode `token` and apply it to the store. Token-restored state is never
/// attributed to a named preset; observers are notified exactly once.
/// On any decode failure the store is left unmodified.
pub fn restore_from_token(store: &SettingsStore, token: &str) -> Result<(), ShareError> {
    let update = decode_token(token)?;
    store.commit(|settings| {
        if let Some([c1, c2, c3, c4]) = update.colors {
            settings.colors = [c1, c2, c3, c4].into();
        }
        if let Some(speed) = update.speed {
            settings.animation.speed = speed;
        }
        if let Some(complexity) = update.complexity {
            settings.animation.complexity = complexity;
        }
        if let Some(scale) = update.scale {
            settings.animation.scale = scale;
        }
        settings.current_preset = None;
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn round_trip_restores_defaults_on_fresh_store() {
        let source = SettingsStore::new();
        let token = encode_token(&source.settings());

        let target = SettingsStore::new();
        // Perturb the target so the restore has to do real work.
        target.randomize();
        restore_from_token(&target, &token).unwrap();

        let restored = target.settings();
        let original = source.settings();
        assert_eq!(restored.colors, original.colors);
        assert_eq!(restored.animation.speed, original.animation.speed);
        assert_eq!(restored.animation.complexity, original.animation.complexity);
        assert_eq!(restored.animation.scale, original.animation.scale);
        assert!(restored.current_preset.is_none());
    }

    #[test]
    fn round_trip_survives_awkward_floats() {
        let store = SettingsStore::new();
        store.update_animation(crate::settings::AnimationUpdate {
            speed: Some(0.7),
            complexity: Some(5),
            scale: Some(2.3),
        });
        let token = encode_token(&store.settings());
        let update = decode_token(&token).unwrap();
        assert_eq!(update.speed, Some(0.7));
        assert_eq!(update.complexity, Some(5));
        assert_eq!(update.scale, Some(2.3));
    }

    #[test]
    fn restore_clears_preset_and_notifies_once() {
        let store = Rc::new(SettingsStore::new());
        let neon = presets::builtin("neon").unwrap();
        store.set_preset("neon", &neon);

        let calls = Rc::new(Cell::new(0u32));
        {
            let calls = Rc::clone(&calls);
            store.subscribe(move |_| calls.set(calls.get() + 1));
        }
        let token = encode_token(&SettingsStore::new().settings());
        restore_from_token(&store, &token).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(store.settings().current_preset.is_none());
    }

    #[test]
    fn malformed_tokens_fail_clean_and_leave_store_alone() {
        let store = SettingsStore::new();
        let before = store.settings();
        for token in [
            "!!!not base64!!!",
            "AQIDBA",               // valid base64, not JSON
            "e30#truncated",        // stray characters
            "bnVsbA",               // JSON null
            "WzEsMiwzXQ",           // JSON array
            "IjQyIg",               // JSON string
        ] {
            assert!(restore_from_token(&store, token).is_err(), "token {token:?}");
            assert_eq!(store.settings(), before);
        }
    }

    #[test]
    fn truncated_base64_is_an_error() {
        let token = encode_token(&SettingsStore::new().settings());
        // Dropping the tail loses the end of the JSON payload at best and
        // breaks the base64 length at worst; both must surface as errors.
        assert!(decode_token(&token[..token.len() - 1]).is_err());
        assert!(decode_token(&token[..5]).is_err());
    }

    #[test]
    fn empty_object_applies_nothing_but_still_clears_preset() {
        let store = SettingsStore::new();
        let neon = presets::builtin("neon").unwrap();
        store.set_preset("neon", &neon);
        let before = store.settings();

        let token = URL_SAFE_NO_PAD.encode(b"{}");
        restore_from_token(&store, &token).unwrap();
        let after = store.settings();
        assert_eq!(after.colors, before.colors);
        assert_eq!(after.animation, before.animation);
        assert!(after.current_preset.is_none());
    }

    #[test]
    fn color_array_is_all_or_nothing() {
        let store = SettingsStore::new();
        let before = store.settings();

        // Three colors only: skipped, but the valid speed still applies.
        let token = URL_SAFE_NO_PAD.encode(br##"{"c":["#111111","#222222","#333333"],"s":1.7}"##);
        restore_from_token(&store, &token).unwrap();
        let after = store.settings();
        assert_eq!(after.colors, before.colors);
        assert_eq!(after.animation.speed, 1.7);

        // One junk entry poisons the whole array.
        let token = URL_SAFE_NO_PAD
            .encode(br##"{"c":["#111111","#222222","#333333","nope"],"z":0.4}"##);
        restore_from_token(&store, &token).unwrap();
        let after = store.settings();
        assert_eq!(after.colors, before.colors);
        assert_eq!(after.animation.scale, 0.4);
    }

    #[test]
    fn scalars_apply_independently_and_ignore_non_numbers() {
        let store = SettingsStore::new();
        let token = URL_SAFE_NO_PAD.encode(br#"{"s":"fast","x":4.9,"z":2.0}"#);
        restore_from_token(&store, &token).unwrap();
        let after = store.settings();
        assert_eq!(after.animation.speed, 1.0);
        assert_eq!(after.animation.complexity, 4);
        assert_eq!(after.animation.scale, 2.0);
    }
}
