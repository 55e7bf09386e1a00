use core::ffi::c_int;

use reglfw_sys as sys;

use crate::{Error, Glfw};

/// Boolean window hints, in the order callers index them.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowFlag {
    Resizable = 0,
    Visible = 1,
    Decorated = 2,
    Focused = 3,
    AutoIconify = 4,
    Floating = 5,
    Maximized = 6,
}

impl WindowFlag {
    pub const ALL: [WindowFlag; 7] = [
        WindowFlag::Resizable,
        WindowFlag::Visible,
        WindowFlag::Decorated,
        WindowFlag::Focused,
        WindowFlag::AutoIconify,
        WindowFlag::Floating,
        WindowFlag::Maximized,
    ];

    /// The `GLFW_*` hint, which is also the window attribute.
    pub fn to_native(self) -> c_int {
        match self {
            WindowFlag::Resizable => sys::GLFW_RESIZABLE,
            WindowFlag::Visible => sys::GLFW_VISIBLE,
            WindowFlag::Decorated => sys::GLFW_DECORATED,
            WindowFlag::Focused => sys::GLFW_FOCUSED,
            WindowFlag::AutoIconify => sys::GLFW_AUTO_ICONIFY,
            WindowFlag::Floating => sys::GLFW_FLOATING,
            WindowFlag::Maximized => sys::GLFW_MAXIMIZED,
        }
    }
}

impl TryFrom<i32> for WindowFlag {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| WindowFlag::ALL.get(index).copied())
            .ok_or(value)
    }
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientApi {
    OpenGl = sys::GLFW_OPENGL_API,
    OpenGlEs = sys::GLFW_OPENGL_ES_API,
    None = sys::GLFW_NO_API,
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextCreationApi {
    Native = sys::GLFW_NATIVE_CONTEXT_API,
    Egl = sys::GLFW_EGL_CONTEXT_API,
    OsMesa = sys::GLFW_OSMESA_CONTEXT_API,
}

/// A hint for the next `Glfw::create_window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowHint {
    Flag(WindowFlag, bool),
    ClientApi(ClientApi),
    ContextCreationApi(ContextCreationApi),
    /// `(major, minor)`
    ContextVersion(i32, i32),
}

impl WindowHint {
    /// `glfwWindowHint` calls for this hint.
    pub(crate) fn native(&self) -> Vec<(c_int, c_int)> {
        match *self {
            WindowHint::Flag(flag, value) => {
                let value = if value { sys::GLFW_TRUE } else { sys::GLFW_FALSE };
                vec![(flag.to_native(), value)]
            }
            WindowHint::ClientApi(api) => vec![(sys::GLFW_CLIENT_API, api as c_int)],
            WindowHint::ContextCreationApi(api) => {
                vec![(sys::GLFW_CONTEXT_CREATION_API, api as c_int)]
            }
            WindowHint::ContextVersion(major, minor) => vec![
                (sys::GLFW_CONTEXT_VERSION_MAJOR, major),
                (sys::GLFW_CONTEXT_VERSION_MINOR, minor),
            ],
        }
    }

    pub(crate) fn apply(&self) -> Result<(), Error> {
        for (hint, value) in self.native() {
            unsafe {
                sys::glfwWindowHint(hint, value);
            }
            Glfw::get_error()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_native_hints() {
        let expected = [
            sys::GLFW_RESIZABLE,
            sys::GLFW_VISIBLE,
            sys::GLFW_DECORATED,
            sys::GLFW_FOCUSED,
            sys::GLFW_AUTO_ICONIFY,
            sys::GLFW_FLOATING,
            sys::GLFW_MAXIMIZED,
        ];
        for (index, native) in expected.into_iter().enumerate() {
            let flag = WindowFlag::try_from(index as i32).unwrap();
            assert_eq!(index as i32, flag as i32);
            assert_eq!(native, flag.to_native());
        }
    }

    #[test]
    fn unknown_flag_index() {
        assert_eq!(Err(7), WindowFlag::try_from(7));
        assert_eq!(Err(-1), WindowFlag::try_from(-1));
    }

    #[test]
    fn hint_values() {
        assert_eq!(
            vec![(sys::GLFW_FLOATING, sys::GLFW_TRUE)],
            WindowHint::Flag(WindowFlag::Floating, true).native()
        );
        assert_eq!(
            vec![(sys::GLFW_DECORATED, sys::GLFW_FALSE)],
            WindowHint::Flag(WindowFlag::Decorated, false).native()
        );
        assert_eq!(
            vec![(sys::GLFW_CLIENT_API, sys::GLFW_NO_API)],
            WindowHint::ClientApi(ClientApi::None).native()
        );
        assert_eq!(
            vec![
                (sys::GLFW_CONTEXT_VERSION_MAJOR, 3),
                (sys::GLFW_CONTEXT_VERSION_MINOR, 0)
            ],
            WindowHint::ContextVersion(3, 0).native()
        );
    }
}
