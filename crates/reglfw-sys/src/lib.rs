#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(rustdoc::broken_intra_doc_links)]

mod ffi;
pub use ffi::*;

#[cfg(test)]
mod tests {
    use crate as sys;
    use core::{ffi::CStr, ptr};
    use parking_lot::Mutex;

    // glfwInit/glfwTerminate are process-global.
    static GLFW: Mutex<()> = Mutex::new(());

    unsafe fn init_null() {
        sys::glfwInitHint(sys::GLFW_PLATFORM, sys::GLFW_PLATFORM_NULL);
        let status = sys::glfwInit();
        assert_eq!(sys::GLFW_TRUE, status);
    }

    #[test]
    fn glfw_init_terminate() {
        let _guard = GLFW.lock();
        unsafe {
            init_null();
            assert_eq!(sys::GLFW_PLATFORM_NULL, sys::glfwGetPlatform());
            sys::glfwTerminate();
        }
    }

    #[test]
    fn glfw_version() {
        let (mut major, mut minor, mut rev) = (0, 0, 0);
        unsafe {
            sys::glfwGetVersion(&mut major, &mut minor, &mut rev);
            assert!(!CStr::from_ptr(sys::glfwGetVersionString()).to_bytes().is_empty());
        }
        assert_eq!(sys::GLFW_VERSION_MAJOR, major);
        assert!(minor >= sys::GLFW_VERSION_MINOR);
    }

    #[test]
    fn glfw_window_hint_applies_to_window() {
        let _guard = GLFW.lock();
        unsafe {
            init_null();
            sys::glfwDefaultWindowHints();
            sys::glfwWindowHint(sys::GLFW_CLIENT_API, sys::GLFW_NO_API);
            sys::glfwWindowHint(sys::GLFW_VISIBLE, sys::GLFW_FALSE);
            sys::glfwWindowHint(sys::GLFW_RESIZABLE, sys::GLFW_FALSE);
            let window = sys::glfwCreateWindow(
                320,
                240,
                c"sys".as_ptr(),
                ptr::null_mut(),
                ptr::null_mut(),
            );
            assert!(!window.is_null());
            assert_eq!(sys::GLFW_FALSE, sys::glfwGetWindowAttrib(window, sys::GLFW_VISIBLE));
            assert_eq!(sys::GLFW_FALSE, sys::glfwGetWindowAttrib(window, sys::GLFW_RESIZABLE));
            sys::glfwDestroyWindow(window);
            sys::glfwTerminate();
        }
    }
}
