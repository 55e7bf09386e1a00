use core::ffi::c_void;
use core::ptr;
use std::{ffi::CString, rc::Rc};

use reglfw_sys as sys;

use crate::{
    callbacks, registry::Handler, Action, CallbackSlot, Error, Glfw, Keycode, Modifiers, Scancode, Terminate,
    WindowEvent, WindowFlag,
};

#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub(crate) usize);

impl WindowId {
    pub fn window_ptr(self) -> *const sys::GLFWwindow {
        self.0 as *const _
    }

    pub fn window_mut_ptr(self) -> *mut sys::GLFWwindow {
        self.0 as *mut _
    }
}

/// An open window. The window and every callback registered on it are
/// released when this is dropped.
pub struct Window {
    pub(crate) window_ptr: *mut sys::GLFWwindow,
    pub(crate) _terminate: Rc<Terminate>,
}

fn invalid_value(desc: &str) -> Error {
    Error {
        code: sys::GLFW_INVALID_VALUE,
        desc: String::from(desc),
    }
}

/// Resolves a GL or GLES entry point in the current context, null if missing.
pub fn get_proc_address(name: &str) -> *const c_void {
    let Ok(name) = CString::new(name) else {
        return ptr::null();
    };
    unsafe {
        sys::glfwGetProcAddress(name.as_ptr())
            .map_or(ptr::null(), |f| f as *const c_void)
    }
}

impl Window {
    pub fn window_id(&self) -> WindowId {
        WindowId(self.window_ptr as usize)
    }

    fn set_callback(&self, slot: CallbackSlot, handler: Handler) {
        if !callbacks::set_handler(self.window_id(), slot, Some(handler)) {
            log::warn!("{:?} is not registered, dropping {:?} callback", self.window_id(), slot);
        }
    }

    /// Called with the new framebuffer size in pixels.
    #[doc(alias = "glfwSetFramebufferSizeCallback")]
    pub fn set_framebuffer_size_callback<F>(&self, mut callback: F)
    where
        F: FnMut(WindowId, i32, i32) + 'static,
    {
        self.set_callback(
            CallbackSlot::FramebufferSize,
            Box::new(move |window_id: WindowId, event: WindowEvent| {
                if let WindowEvent::FramebufferSize(width, height) = event {
                    callback(window_id, width, height)
                }
            }),
        );
    }

    /// Called with the cursor position relative to the content area.
    #[doc(alias = "glfwSetCursorPosCallback")]
    pub fn set_cursor_pos_callback<F>(&self, mut callback: F)
    where
        F: FnMut(WindowId, f64, f64) + 'static,
    {
        self.set_callback(
            CallbackSlot::CursorPos,
            Box::new(move |window_id: WindowId, event: WindowEvent| {
                if let WindowEvent::CursorPos(xpos, ypos) = event {
                    callback(window_id, xpos, ypos)
                }
            }),
        );
    }

    #[doc(alias = "glfwSetKeyCallback")]
    pub fn set_key_callback<F>(&self, mut callback: F)
    where
        F: FnMut(WindowId, Keycode, Scancode, Action, Modifiers) + 'static,
    {
        self.set_callback(
            CallbackSlot::Key,
            Box::new(move |window_id: WindowId, event: WindowEvent| {
                if let WindowEvent::Key(key, scancode, action, mods) = event {
                    callback(window_id, key, scancode, action, mods)
                }
            }),
        );
    }

    #[doc(alias = "glfwSetCharCallback")]
    pub fn set_char_callback<F>(&self, mut callback: F)
    where
        F: FnMut(WindowId, char) + 'static,
    {
        self.set_callback(
            CallbackSlot::Char,
            Box::new(move |window_id: WindowId, event: WindowEvent| {
                if let WindowEvent::Char(ch) = event {
                    callback(window_id, ch)
                }
            }),
        );
    }

    #[doc(alias = "glfwSetScrollCallback")]
    pub fn set_scroll_callback<F>(&self, mut callback: F)
    where
        F: FnMut(WindowId, f64, f64) + 'static,
    {
        self.set_callback(
            CallbackSlot::Scroll,
            Box::new(move |window_id: WindowId, event: WindowEvent| {
                if let WindowEvent::Scroll(xoffset, yoffset) = event {
                    callback(window_id, xoffset, yoffset)
                }
            }),
        );
    }

    /// Receives every event of this window, whatever its slot.
    ///
    /// Events raised while `callback` is running, e.g. the resize caused by
    /// calling [`Window::set_size`] from inside it, are not delivered.
    pub fn set_event_callback<F>(&self, callback: F)
    where
        F: FnMut(WindowId, WindowEvent) + 'static,
    {
        let callback = Rc::new(core::cell::RefCell::new(callback));
        for slot in CallbackSlot::ALL {
            let callback = Rc::clone(&callback);
            self.set_callback(
                slot,
                Box::new(move |window_id: WindowId, event: WindowEvent| {
                    match callback.try_borrow_mut() {
                        Ok(mut callback) => (*callback)(window_id, event),
                        Err(_) => log::trace!("{:?} dropped nested {:?}", window_id, event),
                    }
                }),
            );
        }
    }

    pub fn unset_callback(&self, slot: CallbackSlot) {
        callbacks::set_handler(self.window_id(), slot, None);
    }

    pub fn has_callback(&self, slot: CallbackSlot) -> bool {
        callbacks::has_handler(self.window_id(), slot)
    }

    #[doc(alias = "glfwMakeContextCurrent")]
    pub fn make_context_current(&self) -> Result<(), Error> {
        unsafe {
            sys::glfwMakeContextCurrent(self.window_ptr);
            Glfw::get_error()
        }
    }

    /// Makes the context current and hands `load` a resolver for GPU entry
    /// points, e.g. `window.load_gl_with(|resolve| gl::load_with(resolve))`.
    pub fn load_gl_with<T, F>(&self, load: F) -> Result<T, Error>
    where
        F: FnOnce(&dyn Fn(&str) -> *const c_void) -> T,
    {
        self.make_context_current()?;
        Ok(load(&get_proc_address))
    }

    #[doc(alias = "glfwSwapBuffers")]
    pub fn swap_buffers(&self) -> Result<(), Error> {
        unsafe {
            sys::glfwSwapBuffers(self.window_ptr);
            Glfw::get_error()
        }
    }

    #[doc(alias = "glfwWindowShouldClose")]
    pub fn should_close(&self) -> bool {
        unsafe { sys::GLFW_TRUE == sys::glfwWindowShouldClose(self.window_ptr) }
    }

    #[doc(alias = "glfwSetWindowShouldClose")]
    pub fn set_should_close(&self, value: bool) {
        let value = if value { sys::GLFW_TRUE } else { sys::GLFW_FALSE };
        unsafe { sys::glfwSetWindowShouldClose(self.window_ptr, value) }
    }

    #[doc(alias = "glfwSetWindowTitle")]
    pub fn set_title(&self, title: &str) -> Result<(), Error> {
        let title = CString::new(title).map_err(|_| invalid_value("title contains a nul byte"))?;
        unsafe {
            sys::glfwSetWindowTitle(self.window_ptr, title.as_ptr());
            Glfw::get_error()
        }
    }

    #[doc(alias = "glfwGetWindowPos")]
    pub fn get_pos(&self) -> Result<(i32, i32), Error> {
        let (mut xpos, mut ypos) = (0, 0);
        unsafe {
            sys::glfwGetWindowPos(self.window_ptr, &mut xpos, &mut ypos);
        }
        Glfw::get_error().map(|_| (xpos, ypos))
    }

    #[doc(alias = "glfwSetWindowPos")]
    pub fn set_pos(&self, xpos: i32, ypos: i32) -> Result<(), Error> {
        unsafe {
            sys::glfwSetWindowPos(self.window_ptr, xpos, ypos);
            Glfw::get_error()?;
        }
        callbacks::resume_panic();
        Ok(())
    }

    #[doc(alias = "glfwGetWindowSize")]
    pub fn get_size(&self) -> Result<(i32, i32), Error> {
        let (mut width, mut height) = (0, 0);
        unsafe {
            sys::glfwGetWindowSize(self.window_ptr, &mut width, &mut height);
        }
        Glfw::get_error().map(|_| (width, height))
    }

    #[doc(alias = "glfwSetWindowSize")]
    pub fn set_size(&self, width: i32, height: i32) -> Result<(), Error> {
        unsafe {
            sys::glfwSetWindowSize(self.window_ptr, width, height);
            Glfw::get_error()?;
        }
        callbacks::resume_panic();
        Ok(())
    }

    /// Size of the framebuffer in pixels.
    #[doc(alias = "glfwGetFramebufferSize")]
    pub fn get_framebuffer_size(&self) -> Result<(i32, i32), Error> {
        let (mut width, mut height) = (0, 0);
        unsafe {
            sys::glfwGetFramebufferSize(self.window_ptr, &mut width, &mut height);
        }
        Glfw::get_error().map(|_| (width, height))
    }

    #[doc(alias = "glfwMaximizeWindow")]
    pub fn maximize(&self) -> Result<(), Error> {
        unsafe {
            sys::glfwMaximizeWindow(self.window_ptr);
            Glfw::get_error()?;
        }
        callbacks::resume_panic();
        Ok(())
    }

    #[doc(alias = "glfwShowWindow")]
    pub fn show(&self) -> Result<(), Error> {
        unsafe {
            sys::glfwShowWindow(self.window_ptr);
            Glfw::get_error()?;
        }
        callbacks::resume_panic();
        Ok(())
    }

    #[doc(alias = "glfwHideWindow")]
    pub fn hide(&self) -> Result<(), Error> {
        unsafe {
            sys::glfwHideWindow(self.window_ptr);
            Glfw::get_error()?;
        }
        callbacks::resume_panic();
        Ok(())
    }

    /// Current value of a window flag.
    #[doc(alias = "glfwGetWindowAttrib")]
    pub fn get_flag(&self, flag: WindowFlag) -> Result<bool, Error> {
        unsafe {
            let value = sys::glfwGetWindowAttrib(self.window_ptr, flag.to_native());
            Glfw::get_error().map(|_| sys::GLFW_TRUE == value)
        }
    }

    #[doc(alias = "glfwGetCursorPos")]
    pub fn get_cursor_pos(&self) -> Result<(f64, f64), Error> {
        let (mut xpos, mut ypos) = (0.0, 0.0);
        unsafe {
            sys::glfwGetCursorPos(self.window_ptr, &mut xpos, &mut ypos);
        }
        Glfw::get_error().map(|_| (xpos, ypos))
    }

    #[doc(alias = "glfwSetCursorPos")]
    pub fn set_cursor_pos(&self, xpos: f64, ypos: f64) -> Result<(), Error> {
        unsafe {
            sys::glfwSetCursorPos(self.window_ptr, xpos, ypos);
            Glfw::get_error()?;
        }
        callbacks::resume_panic();
        Ok(())
    }
}

impl core::fmt::Debug for Window {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Window").field(&self.window_id()).finish()
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        unsafe {
            if self.window_ptr != ptr::null_mut() {
                sys::glfwDestroyWindow(self.window_ptr);
                if let Some(err) = Glfw::get_error().err() {
                    log::warn!("glfwDestroyWindow failed: {:?}", err);
                }
            }
        }
        callbacks::unregister_window(self.window_id());
        log::debug!("destroyed {:?}", self.window_id());
    }
}
