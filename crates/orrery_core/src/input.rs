use std::collections::HashSet;

/// Re-exported key enum from `winit` so bindings and the runner share one
/// type without every caller depending on winit directly.
pub use winit::keyboard::KeyCode;

/// State of the keyboard, mouse and window at a given moment.
///
/// The runner drives this structure by feeding it the events coming from
/// `winit`; the scene loop reads it once per frame.  Mouse and scroll deltas
/// accumulate between frames and are reset when consumed.
#[derive(Debug)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    /// Screen-space mouse travel (y grows downwards) since the last consume.
    mouse_delta: (f32, f32),
    /// Vertical wheel travel in lines since the last consume.
    scroll_delta: f32,
    framebuffer_size: (u32, u32),
    close_requested: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    /// Creates a fresh, empty input state.
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            mouse_delta: (0.0, 0.0),
            scroll_delta: 0.0,
            framebuffer_size: (0, 0),
            close_requested: false,
        }
    }

    // ── Keyboard ─────────────────────────────────────────────────────────

    /// Called by the event loop when a keyboard event arrives.
    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    /// Returns true if the given key is currently held down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Drop every held key.  Used when the window loses focus so no key
    /// stays stuck down.
    pub fn release_all(&mut self) {
        self.keys_down.clear();
    }

    // ── Mouse ────────────────────────────────────────────────────────────

    /// Accumulate raw mouse motion in screen pixels.
    pub fn add_mouse_motion(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    /// Retrieve and reset the mouse movement since the last call.
    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Accumulate wheel travel.  Positive is away from the user.
    pub fn add_scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    /// Retrieve and reset the wheel travel since the last call.
    pub fn consume_scroll_delta(&mut self) -> f32 {
        std::mem::take(&mut self.scroll_delta)
    }

    // ── Window ───────────────────────────────────────────────────────────

    pub fn set_framebuffer_size(&mut self, width: u32, height: u32) {
        self.framebuffer_size = (width, height);
    }

    pub fn framebuffer_size(&self) -> (u32, u32) {
        self.framebuffer_size
    }

    /// Width / height of the framebuffer, or 1.0 while minimised.
    pub fn aspect(&self) -> f32 {
        let (w, h) = self.framebuffer_size;
        if h == 0 { 1.0 } else { w as f32 / h as f32 }
    }

    /// Ask the runner to shut down after the current frame.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn should_close(&self) -> bool {
        self.close_requested
    }
}
