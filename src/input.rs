//! Window-system independent input events.

use std::collections::HashSet;
use std::fmt;

/// Keys the scenes respond to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Key {
    Escape,
    Space,
    W,
    A,
    S,
    D,
    Q,
    E,
    R,

    /// Any other key.
    Unknown,
}

/// What happened to a key or button.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    /// Went down.
    Press,

    /// Came up.
    Release,

    /// Held down long enough to auto-repeat.
    Repeat,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Action::Press => "Pressed",
            Action::Release => "Released",
            Action::Repeat => "Repeat",
        })
    }
}

/// Modifier keys held during an event.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Modifiers {
    /// Either control key.
    pub control: bool,

    /// Either shift key.
    pub shift: bool,

    /// Either alt key.
    pub alt: bool,
}

/// Prints as three flags, `C`, `S` and `A`, with `-` for released keys.
impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let flag = |on: bool, c: char| if on { c } else { '-' };
        write!(
            f,
            "{}{}{}",
            flag(self.control, 'C'),
            flag(self.shift, 'S'),
            flag(self.alt, 'A'),
        )
    }
}

/// Mouse buttons.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// An input or window event, already translated from the window system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// A keyboard key changed state.
    Key {
        key: Key,
        scancode: u32,
        action: Action,
        modifiers: Modifiers,
    },

    /// The cursor moved, in window pixels.
    CursorMoved { x: f64, y: f64 },

    /// A mouse button changed state with the cursor at `(x, y)`.
    MouseButton {
        button: MouseButton,
        action: Action,
        x: f64,
        y: f64,
    },

    /// Scroll wheel movement, in lines.
    Scroll { dx: f32, dy: f32 },

    /// The framebuffer was resized.
    Resized { width: u32, height: u32 },

    /// The window lost keyboard focus.
    FocusLost,

    /// The user asked to close the window.
    Close,
}

/// The set of keys currently held down.
///
/// [`Key::Unknown`] stands for many physical keys, so it is never tracked:
/// every press of it is a fresh press.
///
/// [`Key::Unknown`]: enum.Key.html#variant.Unknown
#[derive(Clone, Debug, Default)]
pub struct KeyState {
    down: HashSet<Key>,
}

impl KeyState {
    /// Constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as held. A press of a key that is already held is a
    /// repeat.
    pub fn press(&mut self, key: Key) -> Action {
        if key == Key::Unknown || self.down.insert(key) {
            Action::Press
        } else {
            Action::Repeat
        }
    }

    /// Marks `key` as released.
    pub fn release(&mut self, key: Key) {
        self.down.remove(&key);
    }

    /// Returns `true` while `key` is held.
    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Releases every key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.down.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_flags() {
        assert_eq!(Modifiers::default().to_string(), "---");
        let mods = Modifiers { control: true, shift: false, alt: true };
        assert_eq!(mods.to_string(), "C-A");
    }

    #[test]
    fn second_press_is_a_repeat() {
        let mut keys = KeyState::new();
        assert_eq!(keys.press(Key::W), Action::Press);
        assert_eq!(keys.press(Key::W), Action::Repeat);
        assert!(keys.is_down(Key::W));
        keys.release(Key::W);
        assert!(!keys.is_down(Key::W));
        assert_eq!(keys.press(Key::W), Action::Press);
    }

    #[test]
    fn unknown_keys_are_not_tracked() {
        let mut keys = KeyState::new();
        assert_eq!(keys.press(Key::Unknown), Action::Press);
        assert_eq!(keys.press(Key::Unknown), Action::Press);
        assert!(!keys.is_down(Key::Unknown));
    }

    #[test]
    fn clear_releases_everything() {
        let mut keys = KeyState::new();
        keys.press(Key::W);
        keys.press(Key::Space);
        keys.clear();
        assert!(!keys.is_down(Key::W));
        assert!(!keys.is_down(Key::Space));
    }
}
