//! The mutable settings object driving rendering and exports, plus the
//! observer mechanics that keep the UI and render loop in sync with it.
//!
//! The store is constructor-injected and shared as `Rc<SettingsStore>`;
//! everything runs on the browser's single thread, so interior mutability
//! is plain `RefCell`. Observers are invoked synchronously after every
//! mutation with a snapshot of the new state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::presets::Preset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSet {
    pub color1: Rgb,
    pub color2: Rgb,
    pub color3: Rgb,
    pub color4: Rgb,
}

impl ColorSet {
    pub fn as_array(&self) -> [Rgb; 4] {
        [self.color1, self.color2, self.color3, self.color4]
    }
}

impl From<[Rgb; 4]> for ColorSet {
    fn from([color1, color2, color3, color4]: [Rgb; 4]) -> Self {
        Self { color1, color2, color3, color4 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub speed: f32,
    pub complexity: u32,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub colors: ColorSet,
    pub animation: Animation,
    #[serde(rename = "currentPreset")]
    pub current_preset: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            colors: ColorSet {
                color1: Rgb::new(0xff, 0x6b, 0x6b),
                color2: Rgb::new(0x4e, 0xcd, 0xc4),
                color3: Rgb::new(0x45, 0xb7, 0xd1),
                color4: Rgb::new(0xf7, 0xdc, 0x6f),
            },
            animation: Animation { speed: 1.0, complexity: 3, scale: 1.0 },
            current_preset: None,
        }
    }
}

/// Partial color update; unset slots keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ColorUpdate {
    pub color1: Option<Rgb>,
    pub color2: Option<Rgb>,
    pub color3: Option<Rgb>,
    pub color4: Option<Rgb>,
}

impl ColorUpdate {
    pub fn all(colors: ColorSet) -> Self {
        Self {
            color1: Some(colors.color1),
            color2: Some(colors.color2),
            color3: Some(colors.color3),
            color4: Some(colors.color4),
        }
    }

    fn merge_into(&self, colors: &mut ColorSet) {
        if let Some(c) = self.color1 {
            colors.color1 = c;
        }
        if let Some(c) = self.color2 {
            colors.color2 = c;
        }
        if let Some(c) = self.color3 {
            colors.color3 = c;
        }
        if let Some(c) = self.color4 {
            colors.color4 = c;
        }
    }
}

/// Partial animation update; also the animation half of a preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

impl AnimationUpdate {
    pub const fn new(speed: f32, complexity: u32, scale: f32) -> Self {
        Self { speed: Some(speed), complexity: Some(complexity), scale: Some(scale) }
    }

    pub fn all(animation: Animation) -> Self {
        Self {
            speed: Some(animation.speed),
            complexity: Some(animation.complexity),
            scale: Some(animation.scale),
        }
    }

    fn merge_into(&self, animation: &mut Animation) {
        if let Some(v) = self.speed {
            animation.speed = v;
        }
        if let Some(v) = self.complexity {
            animation.complexity = v;
        }
        if let Some(v) = self.scale {
            animation.scale = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

type Observer = Rc<dyn Fn(&Settings)>;

pub struct SettingsStore {
    state: RefCell<Settings>,
    observers: RefCell<Vec<(ObserverId, Observer)>>,
    next_observer: Cell<u64>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            state: RefCell::new(settings),
            observers: RefCell::new(Vec::new()),
            next_observer: Cell::new(0),
        }
    }

    /// Copy-on-read snapshot of the current state.
    pub fn settings(&self) -> Settings {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self, observer: impl Fn(&Settings) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer.get());
        self.next_observer.set(id.0 + 1);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    /// Returns false when the id was already removed.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }

    pub fn update_colors(&self, update: ColorUpdate) {
        self.commit(|settings| update.merge_into(&mut settings.colors));
    }

    pub fn update_animation(&self, update: AnimationUpdate) {
        self.commit(|settings| update.merge_into(&mut settings.animation));
    }

    /// Full color replacement, animation merge, preset id recorded.
    pub fn set_preset(&self, id: &str, preset: &Preset) {
        self.commit(|settings| {
            settings.colors = preset.colors;
            preset.animation.merge_into(&mut settings.animation);
            settings.current_preset = Some(id.to_owned());
        });
    }

    /// Uniform-random colors (hue [0,360), saturation [60,100), lightness
    /// [40,80)) and animation (speed [0.5,2.0), complexity [1,5],
    /// scale [0.5,3.0)); drops any active preset attribution.
    pub fn randomize(&self) {
        let random_color =
            || Rgb::from_hsl(fastrand::f32() * 360.0, 60.0 + fastrand::f32() * 40.0, 40.0 + fastrand::f32() * 40.0);
        self.commit(|settings| {
            settings.colors = ColorSet {
                color1: random_color(),
                color2: random_color(),
                color3: random_color(),
                color4: random_color(),
            };
            settings.animation = Animation {
                speed: 0.5 + fastrand::f32() * 1.5,
                complexity: 1 + fastrand::u32(0..5),
                scale: 0.5 + fastrand::f32() * 2.5,
            };
            settings.current_preset = None;
        });
    }

    /// Apply one mutation and notify every observer exactly once.
    pub(crate) fn commit(&self, mutate: impl FnOnce(&mut Settings)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            mutate(&mut state);
            state.clone()
        };
        // Observers may re-enter the store, so invoke them outside the borrow.
        let observers: Vec<Observer> =
            self.observers.borrow().iter().map(|(_, o)| Rc::clone(o)).collect();
        for observer in observers {
            observer(&snapshot);
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
