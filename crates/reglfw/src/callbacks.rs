use core::ffi::{c_double, c_int, c_uint};
use std::{
    any::Any,
    cell::{Cell, RefCell},
    marker::PhantomData,
    panic::{self, AssertUnwindSafe},
};

use reglfw_sys as sys;

use crate::{
    registry::{Handler, RegistryFull, WindowRegistry},
    Action, CallbackSlot, Modifiers, WindowEvent, WindowId,
};

thread_local! {
    static REGISTRY: RefCell<Option<WindowRegistry>> = const { RefCell::new(None) };
    static PANIC: Cell<Option<Box<dyn Any + Send>>> = const { Cell::new(None) };
}

/// Owns the registry of the initializing thread. Dropping it releases every
/// callback that is still registered.
#[derive(Debug)]
pub(crate) struct RegistryGuard {
    _phantom: PhantomData<*mut ()>,
}

impl Drop for RegistryGuard {
    fn drop(&mut self) {
        // thread-local storage may already be gone during thread exit
        let registry = REGISTRY
            .try_with(|cell| cell.borrow_mut().take())
            .ok()
            .flatten();
        if let Some(registry) = &registry {
            if registry.len() > 0 {
                log::debug!("releasing callbacks of {} windows", registry.len());
            }
        }
        drop(registry);
        if let Ok(Some(_)) = PANIC.try_with(|cell| cell.take()) {
            log::warn!("dropping callback panic that was not resumed before terminating");
        }
    }
}

pub(crate) fn install_registry() -> RegistryGuard {
    let previous = REGISTRY.with(|cell| cell.borrow_mut().replace(WindowRegistry::new()));
    if previous.is_some() {
        log::warn!("window registry was already installed on this thread");
    }
    drop(previous);
    RegistryGuard {
        _phantom: PhantomData,
    }
}

fn with_registry<R>(f: impl FnOnce(&mut WindowRegistry) -> R) -> Option<R> {
    REGISTRY.with(|cell| cell.borrow_mut().as_mut().map(f))
}

pub(crate) fn window_count() -> usize {
    with_registry(|registry| registry.len()).unwrap_or(0)
}

pub(crate) fn register_window(window_id: WindowId) -> Result<(), RegistryFull> {
    with_registry(|registry| registry.insert(window_id)).unwrap_or(Err(RegistryFull))
}

pub(crate) fn unregister_window(window_id: WindowId) {
    let entry = with_registry(|registry| registry.remove(window_id)).flatten();
    if let Some(entry) = &entry {
        log::trace!("released callbacks of window {:?}", entry.id());
    }
    drop(entry);
}

/// Stores `handler` in the window's `slot`. Returns `false` if the window is
/// not registered.
pub(crate) fn set_handler(window_id: WindowId, slot: CallbackSlot, handler: Option<Handler>) -> bool {
    let registered = handler.is_some();
    // only moved into the registry once the window is found
    let mut handler = Some(handler);
    let previous = with_registry(|registry| {
        let entry = registry.get_mut(window_id)?;
        Some(entry.set(slot, handler.take().flatten()))
    })
    .flatten();
    match previous {
        None => false,
        Some(previous) => {
            if previous.is_some() {
                log::trace!("released {:?} callback of window {:?}", slot, window_id);
            }
            if registered {
                log::trace!("registered {:?} callback for window {:?}", slot, window_id);
            }
            true
        }
    }
}

pub(crate) fn has_handler(window_id: WindowId, slot: CallbackSlot) -> bool {
    with_registry(|registry| {
        registry
            .get(window_id)
            .map_or(false, |entry| entry.is_set(slot))
    })
    .unwrap_or(false)
}

/// Runs the handler registered for `event` on `window_id`, if any.
///
/// The handler is taken out of the registry while it runs so it can register
/// or unset callbacks itself. A panic is held until the event pump returns.
pub(crate) fn dispatch(window_id: WindowId, event: WindowEvent) {
    let slot = event.slot();
    let checked_out = with_registry(|registry| {
        registry
            .get_mut(window_id)
            .and_then(|entry| entry.checkout(slot))
    })
    .flatten();
    let Some((mut handler, version)) = checked_out else {
        return;
    };

    let result = panic::catch_unwind(AssertUnwindSafe(|| handler(window_id, event)));

    let mut handler = Some(handler);
    with_registry(|registry| {
        if let Some(entry) = registry.get_mut(window_id) {
            if let Some(checked_out) = handler.take() {
                handler = entry.checkin(slot, checked_out, version);
            }
        }
    });
    // replaced, unset or unregistered while it ran
    drop(handler);

    if let Err(payload) = result {
        PANIC.with(|cell| {
            if cell.replace(Some(payload)).is_some() {
                log::warn!("dropping panic from an earlier callback");
            }
        });
    }
}

/// Re-raises a panic caught in a callback during the last event pump.
pub(crate) fn resume_panic() {
    if let Some(payload) = PANIC.with(|cell| cell.take()) {
        panic::resume_unwind(payload);
    }
}

fn window_id(window_ptr: *mut sys::GLFWwindow) -> WindowId {
    WindowId(window_ptr as usize)
}

pub(crate) unsafe extern "C" fn framebuffer_size_callback(
    window_ptr: *mut sys::GLFWwindow,
    width: c_int,
    height: c_int,
) {
    dispatch(window_id(window_ptr), WindowEvent::FramebufferSize(width, height));
}

pub(crate) unsafe extern "C" fn cursor_pos_callback(
    window_ptr: *mut sys::GLFWwindow,
    xpos: c_double,
    ypos: c_double,
) {
    dispatch(window_id(window_ptr), WindowEvent::CursorPos(xpos, ypos));
}

pub(crate) unsafe extern "C" fn key_callback(
    window_ptr: *mut sys::GLFWwindow,
    key: c_int,
    scancode: c_int,
    action: c_int,
    mods: c_int,
) {
    let event = WindowEvent::Key(
        key,
        scancode,
        Action::from_native(action),
        Modifiers::from_bits_truncate(mods),
    );
    dispatch(window_id(window_ptr), event);
}

pub(crate) unsafe extern "C" fn char_callback(window_ptr: *mut sys::GLFWwindow, codepoint: c_uint) {
    match char::from_u32(codepoint) {
        Some(ch) => dispatch(window_id(window_ptr), WindowEvent::Char(ch)),
        None => log::warn!("invalid codepoint {:#x}", codepoint),
    }
}

pub(crate) unsafe extern "C" fn scroll_callback(
    window_ptr: *mut sys::GLFWwindow,
    xoffset: c_double,
    yoffset: c_double,
) {
    dispatch(window_id(window_ptr), WindowEvent::Scroll(xoffset, yoffset));
}

pub(crate) unsafe fn set_window_callbacks(window_ptr: *mut sys::GLFWwindow) {
    sys::glfwSetFramebufferSizeCallback(window_ptr, Some(framebuffer_size_callback));
    sys::glfwSetCursorPosCallback(window_ptr, Some(cursor_pos_callback));
    sys::glfwSetKeyCallback(window_ptr, Some(key_callback));
    sys::glfwSetCharCallback(window_ptr, Some(char_callback));
    sys::glfwSetScrollCallback(window_ptr, Some(scroll_callback));
}
