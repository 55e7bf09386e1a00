use core::ffi::c_int;

use reglfw_sys as sys;

/// Platform independent key code, `GLFW_KEY_*`.
pub type Keycode = c_int;

/// Platform specific key code.
pub type Scancode = c_int;

/// Tri-state key action.
///
/// Discriminants are the order callers see the variants in, which differs
/// from the native `GLFW_PRESS`/`GLFW_RELEASE`/`GLFW_REPEAT` values.
#[repr(i32)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Action {
    Press = 0,
    Release = 1,
    Repeat = 2,
}

impl Action {
    /// Maps a native action. Unknown values are logged and read as `Press`.
    pub fn from_native(action: c_int) -> Action {
        match action {
            sys::GLFW_PRESS => Action::Press,
            sys::GLFW_RELEASE => Action::Release,
            sys::GLFW_REPEAT => Action::Repeat,
            other => {
                log::warn!("unexpected button state {}", other);
                Action::Press
            }
        }
    }

    pub fn to_native(self) -> c_int {
        match self {
            Action::Press => sys::GLFW_PRESS,
            Action::Release => sys::GLFW_RELEASE,
            Action::Repeat => sys::GLFW_REPEAT,
        }
    }
}

bitflags::bitflags! {
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Modifiers: i32 {
        const SHIFT     = sys::GLFW_MOD_SHIFT;
        const CONTROL   = sys::GLFW_MOD_CONTROL;
        const ALT       = sys::GLFW_MOD_ALT;
        const SUPER     = sys::GLFW_MOD_SUPER;
        const CAPS_LOCK = sys::GLFW_MOD_CAPS_LOCK;
        const NUM_LOCK  = sys::GLFW_MOD_NUM_LOCK;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_order() {
        assert_eq!(0, Action::from_native(sys::GLFW_PRESS) as i32);
        assert_eq!(1, Action::from_native(sys::GLFW_RELEASE) as i32);
        assert_eq!(2, Action::from_native(sys::GLFW_REPEAT) as i32);
    }

    #[test]
    fn unknown_action_is_press() {
        assert_eq!(Action::Press, Action::from_native(7));
        assert_eq!(Action::Press, Action::from_native(-1));
    }

    #[test]
    fn action_native_values() {
        for action in [Action::Press, Action::Release, Action::Repeat] {
            assert_eq!(action, Action::from_native(action.to_native()));
        }
    }

    #[test]
    fn modifiers_ignore_unknown_bits() {
        let mods = Modifiers::from_bits_truncate(sys::GLFW_MOD_SHIFT | sys::GLFW_MOD_ALT | 0x400);
        assert_eq!(Modifiers::SHIFT | Modifiers::ALT, mods);
    }
}
