use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::camera::{CameraMovement, OrbitDirection};
use crate::input::{InputState, KeyCode};

/// Which camera paradigm a session uses.  Chosen once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Free flight: keys move along the camera basis, the mouse looks around.
    #[default]
    Fly,
    /// Keys swing the camera around the world origin; mouse look is off.
    Orbit,
}

/// What a held key does this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Move(CameraMovement),
    Orbit(OrbitDirection),
    ToggleAnimation,
    Exit,
}

/// Maps keys to [`Action`]s.
///
/// # Example
/// ```rust
/// use orrery_core::{Action, CameraMovement, KeyBindings, KeyCode, NavigationMode};
///
/// let mut keys = KeyBindings::for_mode(NavigationMode::Fly);
/// // Arrow keys as well as WASD
/// keys.bind(KeyCode::ArrowUp, Action::Move(CameraMovement::Forward));
/// keys.bind(KeyCode::ArrowDown, Action::Move(CameraMovement::Backward));
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    mappings: HashMap<KeyCode, Action>,
}

impl KeyBindings {
    /// Creates an empty binding table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default layout for a navigation mode.
    ///
    /// Both layouts share `P` (toggle animation) and `Escape` (exit).
    /// Fly uses WASD plus `Space`/`X` for up/down; Orbit uses WASD and the
    /// arrow keys to swing around the origin.
    pub fn for_mode(mode: NavigationMode) -> Self {
        let mut keys = Self::new();
        match mode {
            NavigationMode::Fly => {
                keys.bind(KeyCode::KeyW, Action::Move(CameraMovement::Forward));
                keys.bind(KeyCode::KeyS, Action::Move(CameraMovement::Backward));
                keys.bind(KeyCode::KeyA, Action::Move(CameraMovement::Left));
                keys.bind(KeyCode::KeyD, Action::Move(CameraMovement::Right));
                keys.bind(KeyCode::Space, Action::Move(CameraMovement::Up));
                keys.bind(KeyCode::KeyX, Action::Move(CameraMovement::Down));
            }
            NavigationMode::Orbit => {
                for (key, dir) in [
                    (KeyCode::KeyW, OrbitDirection::Up),
                    (KeyCode::ArrowUp, OrbitDirection::Up),
                    (KeyCode::KeyS, OrbitDirection::Down),
                    (KeyCode::ArrowDown, OrbitDirection::Down),
                    (KeyCode::KeyA, OrbitDirection::Left),
                    (KeyCode::ArrowLeft, OrbitDirection::Left),
                    (KeyCode::KeyD, OrbitDirection::Right),
                    (KeyCode::ArrowRight, OrbitDirection::Right),
                ] {
                    keys.bind(key, Action::Orbit(dir));
                }
            }
        }
        keys.bind(KeyCode::KeyP, Action::ToggleAnimation);
        keys.bind(KeyCode::Escape, Action::Exit);
        keys
    }

    /// Binds `key` to `action`, overwriting any previous binding.
    pub fn bind(&mut self, key: KeyCode, action: Action) {
        self.mappings.insert(key, action);
    }

    /// Removes the binding for `key`, if any.
    pub fn unbind(&mut self, key: KeyCode) {
        self.mappings.remove(&key);
    }

    pub fn action_for(&self, key: KeyCode) -> Option<Action> {
        self.mappings.get(&key).copied()
    }

    /// Actions whose keys are currently held, each listed once even when
    /// several of its keys are down.
    pub fn active_actions(&self, input: &InputState) -> Vec<Action> {
        let mut out = Vec::new();
        for (key, action) in &self.mappings {
            if input.is_key_pressed(*key) && !out.contains(action) {
                out.push(*action);
            }
        }
        out
    }
}
