use core::ffi::{c_int, CStr};
pub use reglfw_sys as sys;
use std::{
    ffi::CString,
    marker::PhantomData,
    ptr,
    rc::Rc,
    sync::{LazyLock, Mutex, MutexGuard, TryLockError},
    time::Duration,
};

mod callbacks;
mod error;
mod hint;
mod input;
mod monitor;
mod registry;
mod window;

pub use error::*;
pub use hint::*;
pub use input::*;
pub use monitor::*;
pub use registry::MAX_WINDOWS;
pub use window::*;

static INIT: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[derive(Debug)]
struct Terminate {
    // dropped first: callbacks are released before the init lock
    _registry: callbacks::RegistryGuard,
    _init_guard: InitGuard,
    _phantom: PhantomData<*mut ()>,
}

type InitGuard = MutexGuard<'static, ()>;

/// The initialized library. GLFW is terminated once this and every window
/// and monitor created from it have been dropped.
#[derive(Debug)]
pub struct Glfw {
    terminate: Rc<Terminate>,
}

impl Drop for Terminate {
    fn drop(&mut self) {
        unsafe {
            sys::glfwTerminate();
            if let Some(err) = Glfw::get_error().err() {
                log::warn!("glfwTerminate failed: {:?}", err);
            }
        }
        log::debug!("terminated GLFW");
    }
}

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Platform {
    Any = sys::GLFW_ANY_PLATFORM,
    Win32 = sys::GLFW_PLATFORM_WIN32,
    Cocoa = sys::GLFW_PLATFORM_COCOA,
    Wayland = sys::GLFW_PLATFORM_WAYLAND,
    X11 = sys::GLFW_PLATFORM_X11,
    Null = sys::GLFW_PLATFORM_NULL,
}

impl TryFrom<i32> for Platform {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            sys::GLFW_ANY_PLATFORM => Ok(Platform::Any),
            sys::GLFW_PLATFORM_WIN32 => Ok(Platform::Win32),
            sys::GLFW_PLATFORM_COCOA => Ok(Platform::Cocoa),
            sys::GLFW_PLATFORM_WAYLAND => Ok(Platform::Wayland),
            sys::GLFW_PLATFORM_X11 => Ok(Platform::X11),
            sys::GLFW_PLATFORM_NULL => Ok(Platform::Null),
            other => Err(other),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InitHint {
    Platform(Platform),
    JoystickHatButtons(bool),
    CocoaChdirResources(bool),
    CocoaMenubar(bool),
}

impl InitHint {
    pub fn none() -> &'static [InitHint] {
        &[]
    }

    /// https://www.glfw.org/docs/3.4/intro_guide.html#init_hints
    fn default_hints() -> &'static [InitHint] {
        &[
            InitHint::Platform(Platform::Any),
            InitHint::JoystickHatButtons(true),
            InitHint::CocoaChdirResources(true),
            InitHint::CocoaMenubar(true),
        ]
    }

    fn native(&self) -> (c_int, c_int) {
        fn flag(value: bool) -> c_int {
            if value {
                sys::GLFW_TRUE
            } else {
                sys::GLFW_FALSE
            }
        }
        match *self {
            InitHint::Platform(platform) => (sys::GLFW_PLATFORM, platform as c_int),
            InitHint::JoystickHatButtons(value) => (sys::GLFW_JOYSTICK_HAT_BUTTONS, flag(value)),
            InitHint::CocoaChdirResources(value) => (sys::GLFW_COCOA_CHDIR_RESOURCES, flag(value)),
            InitHint::CocoaMenubar(value) => (sys::GLFW_COCOA_MENUBAR, flag(value)),
        }
    }
}

fn initialize(hints: &[InitHint], init_guard: InitGuard) -> Result<Glfw, InitError> {
    let default_hints = InitHint::default_hints();
    for hint in default_hints.iter().chain(hints.iter()) {
        let (name, value) = hint.native();
        unsafe {
            sys::glfwInitHint(name, value);
        }
        Glfw::get_error().map_err(|err| InitError::Hint(*hint, err))?;
    }
    unsafe {
        if sys::GLFW_TRUE == sys::glfwInit() {
            let glfw = Glfw {
                terminate: Rc::new(Terminate {
                    _registry: callbacks::install_registry(),
                    _init_guard: init_guard,
                    _phantom: PhantomData,
                }),
            };
            log::debug!("initialized GLFW on {:?}", glfw.get_platform());
            Ok(glfw)
        } else {
            Err(InitError::Init(
                Glfw::get_error().err().unwrap_or_else(unknown_error),
            ))
        }
    }
}

impl Glfw {
    #[doc(alias = "glfwGetError")]
    pub fn get_error() -> Result<(), Error> {
        unsafe {
            let mut desc = ptr::null();
            let code = sys::glfwGetError(&mut desc);
            if sys::GLFW_NO_ERROR != code {
                let desc = if desc.is_null() {
                    String::new()
                } else {
                    CStr::from_ptr(desc).to_string_lossy().into_owned()
                };
                Err(Error { code, desc })
            } else {
                Ok(())
            }
        }
    }

    /// Initializes GLFW, blocking while another `Glfw` is alive.
    #[doc(alias = "glfwInit")]
    #[doc(alias = "glfwInitHint")]
    pub fn init(hints: &[InitHint]) -> Result<Glfw, InitError> {
        let init_guard = INIT.lock().map_err(|_| InitError::Poisoned)?;
        initialize(hints, init_guard)
    }

    #[doc(alias = "glfwInit")]
    #[doc(alias = "glfwInitHint")]
    pub fn try_init(hints: &[InitHint]) -> Result<Glfw, TryInitError> {
        let init_guard = INIT.try_lock().map_err(|err| match err {
            TryLockError::Poisoned(_) => TryInitError::InitError(InitError::Poisoned),
            TryLockError::WouldBlock => TryInitError::WouldBlock,
        })?;
        Ok(initialize(hints, init_guard)?)
    }

    #[doc(alias = "glfwPlatformSupported")]
    pub fn platform_supported(platform: Platform) -> bool {
        unsafe { sys::GLFW_TRUE == sys::glfwPlatformSupported(platform as i32) }
    }

    #[doc(alias = "glfwGetVersion")]
    pub fn get_version() -> (i32, i32, i32) {
        let mut major = 0;
        let mut minor = 0;
        let mut patch = 0;
        unsafe { sys::glfwGetVersion(&mut major, &mut minor, &mut patch) }
        (major, minor, patch)
    }

    #[doc(alias = "glfwGetPlatform")]
    pub fn get_platform(&self) -> Platform {
        let platform = unsafe { sys::glfwGetPlatform() };
        Platform::try_from(platform).unwrap_or(Platform::Any)
    }

    #[doc(alias = "glfwDefaultWindowHints")]
    pub fn default_window_hints(&self) -> Result<(), Error> {
        unsafe {
            sys::glfwDefaultWindowHints();
        }
        Glfw::get_error()
    }

    /// Sets a hint for the windows created after this call.
    #[doc(alias = "glfwWindowHint")]
    pub fn window_hint(&self, hint: WindowHint) -> Result<(), HintError> {
        Ok(hint.apply()?)
    }

    /// Sets a window flag by its index in [`WindowFlag::ALL`]. An unknown
    /// index is logged and leaves the hints untouched.
    pub fn window_hint_raw(&self, flag: i32, value: bool) -> Result<(), HintError> {
        let flag = WindowFlag::try_from(flag).map_err(|flag| {
            log::warn!("unexpected window hint {}", flag);
            HintError::UnknownFlag(flag)
        })?;
        self.window_hint(WindowHint::Flag(flag, value))
    }

    /// Creates a window using the hints currently set.
    #[doc(alias = "glfwCreateWindow")]
    pub fn create_window(
        &self,
        width: i32,
        height: i32,
        title: &str,
    ) -> Result<Window, CreateWindowError> {
        let title = CString::new(title)?;
        let window_ptr = unsafe {
            sys::glfwCreateWindow(width, height, title.as_ptr(), ptr::null_mut(), ptr::null_mut())
        };
        if window_ptr.is_null() {
            let err = Glfw::get_error().err().unwrap_or_else(unknown_error);
            return Err(CreateWindowError::CreateWindow(err));
        }
        let window = Window {
            window_ptr,
            _terminate: Rc::clone(&self.terminate),
        };
        // a full registry drops `window` and with it the native window
        callbacks::register_window(window.window_id())
            .map_err(|_| CreateWindowError::RegistryFull)?;
        unsafe {
            callbacks::set_window_callbacks(window_ptr);
        }
        Glfw::get_error().map_err(CreateWindowError::CreateWindow)?;
        log::debug!("created {:?} {}x{}", window.window_id(), width, height);
        Ok(window)
    }

    /// Number of windows currently registered.
    pub fn window_count(&self) -> usize {
        callbacks::window_count()
    }

    #[doc(alias = "glfwGetMonitors")]
    pub fn get_monitors(&self) -> Result<Vec<Monitor>, Error> {
        unsafe {
            let mut count = 0;
            let monitor_ptrs = sys::glfwGetMonitors(&mut count);
            Glfw::get_error()?;
            if monitor_ptrs.is_null() {
                return Ok(Vec::new());
            }
            let monitors = core::slice::from_raw_parts(monitor_ptrs, count as usize)
                .iter()
                .map(|&monitor_ptr| Monitor {
                    monitor_ptr,
                    _terminate: Rc::clone(&self.terminate),
                })
                .collect();
            Ok(monitors)
        }
    }

    #[doc(alias = "glfwGetPrimaryMonitor")]
    pub fn get_primary_monitor(&self) -> Option<Monitor> {
        unsafe {
            let monitor_ptr = sys::glfwGetPrimaryMonitor();
            if monitor_ptr.is_null() {
                None
            } else {
                Some(Monitor {
                    monitor_ptr,
                    _terminate: Rc::clone(&self.terminate),
                })
            }
        }
    }

    /// Seconds since initialization, unless changed with [`Glfw::set_time`].
    #[doc(alias = "glfwGetTime")]
    pub fn get_time(&self) -> f64 {
        unsafe { sys::glfwGetTime() }
    }

    #[doc(alias = "glfwSetTime")]
    pub fn set_time(&self, time: f64) -> Result<(), Error> {
        unsafe {
            sys::glfwSetTime(time);
        }
        Glfw::get_error()
    }

    /// Applies to the context that is current on this thread.
    #[doc(alias = "glfwSwapInterval")]
    pub fn swap_interval(&self, interval: i32) -> Result<(), Error> {
        unsafe {
            sys::glfwSwapInterval(interval);
        }
        Glfw::get_error()
    }

    /// Processes pending events, running registered callbacks on this thread.
    #[doc(alias = "glfwPollEvents")]
    pub fn poll_events(&self) -> Result<(), Error> {
        unsafe {
            sys::glfwPollEvents();
        }
        callbacks::resume_panic();
        Glfw::get_error()
    }

    #[doc(alias = "glfwWaitEvents")]
    pub fn wait_events(&self) -> Result<(), Error> {
        unsafe {
            sys::glfwWaitEvents();
        }
        callbacks::resume_panic();
        Glfw::get_error()
    }

    #[doc(alias = "glfwWaitEventsTimeout")]
    pub fn wait_events_timeout(&self, timeout: Duration) -> Result<(), Error> {
        unsafe {
            sys::glfwWaitEventsTimeout(timeout.as_secs_f64());
        }
        callbacks::resume_panic();
        Glfw::get_error()
    }
}

/// Per-window callback categories.
#[repr(usize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CallbackSlot {
    FramebufferSize,
    CursorPos,
    Key,
    Char,
    Scroll,
}

impl CallbackSlot {
    pub const COUNT: usize = 5;

    pub const ALL: [CallbackSlot; CallbackSlot::COUNT] = [
        CallbackSlot::FramebufferSize,
        CallbackSlot::CursorPos,
        CallbackSlot::Key,
        CallbackSlot::Char,
        CallbackSlot::Scroll,
    ];
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum WindowEvent {
    FramebufferSize(i32, i32),
    CursorPos(f64, f64),
    Scroll(f64, f64),
    Key(Keycode, Scancode, Action, Modifiers),
    Char(char),
}

impl WindowEvent {
    pub fn slot(&self) -> CallbackSlot {
        match self {
            WindowEvent::FramebufferSize(..) => CallbackSlot::FramebufferSize,
            WindowEvent::CursorPos(..) => CallbackSlot::CursorPos,
            WindowEvent::Scroll(..) => CallbackSlot::Scroll,
            WindowEvent::Key(..) => CallbackSlot::Key,
            WindowEvent::Char(_) => CallbackSlot::Char,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use std::{cell::RefCell, rc::Rc};

    macro_rules! assert_not_impl {
        ($x:ty, $($t:path),+ $(,)*) => {
            const _: fn() -> () = || {
                struct Check<T: ?Sized>(T);
                trait AmbiguousIfImpl<A> { fn some_item() { } }

                impl<T: ?Sized> AmbiguousIfImpl<()> for Check<T> { }
                impl<T: ?Sized $(+ $t)*> AmbiguousIfImpl<u8> for Check<T> { }

                <Check::<$x> as AmbiguousIfImpl<_>>::some_item()
            };
        };
    }

    assert_not_impl!(Glfw, Send, Sync);
    assert_not_impl!(Terminate, Send, Sync);
    assert_not_impl!(Window, Send, Sync);
    assert_not_impl!(Monitor, Send, Sync);

    const INIT_HINTS: &[InitHint] = &[InitHint::Platform(Platform::Null)];

    fn hidden_window(glfw: &Glfw, title: &str) -> Window {
        glfw.default_window_hints().unwrap();
        glfw.window_hint(WindowHint::ClientApi(ClientApi::None))
            .unwrap();
        glfw.window_hint(WindowHint::Flag(WindowFlag::Visible, false))
            .unwrap();
        glfw.create_window(320, 240, title).expect("create_window")
    }

    #[test]
    fn slots_match_events() {
        for (index, slot) in CallbackSlot::ALL.into_iter().enumerate() {
            assert_eq!(index, slot as usize);
        }
        assert_eq!(CallbackSlot::Char, WindowEvent::Char('a').slot());
        assert_eq!(CallbackSlot::Scroll, WindowEvent::Scroll(0.0, 1.0).slot());
    }

    #[test]
    fn platform_supported() {
        assert!(Glfw::platform_supported(Platform::Null));
    }

    #[test]
    fn init() {
        let glfw = Glfw::init(INIT_HINTS).expect("it failed");
        assert_eq!(Platform::Null, glfw.get_platform());
        assert_eq!(0, glfw.window_count());
    }

    #[test]
    fn try_init_while_initialized() {
        let _glfw = Glfw::init(INIT_HINTS).unwrap();
        assert!(matches!(
            Glfw::try_init(INIT_HINTS),
            Err(TryInitError::WouldBlock)
        ));
    }

    #[test]
    fn get_version() {
        let (major, minor, _patch) = Glfw::get_version();
        assert_eq!((3, true), (major, minor >= 4));
    }

    #[test]
    fn time() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        glfw.set_time(10.0).unwrap();
        assert!(glfw.get_time() >= 10.0);
    }

    #[test]
    fn monitors() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        let monitors = glfw.get_monitors().unwrap();
        let primary = glfw.get_primary_monitor().expect("primary monitor");
        assert!(monitors
            .iter()
            .any(|monitor| monitor.monitor_id() == primary.monitor_id()));
        let mode = primary.get_video_mode().unwrap();
        assert!(mode.width > 0 && mode.height > 0);
        primary.get_pos().unwrap();
        assert!(!primary.get_name().unwrap().is_empty());
        drop(glfw);
        drop(monitors);
    }

    #[test]
    fn create_window() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        let window = hidden_window(&glfw, "test");
        assert_eq!(1, glfw.window_count());
        assert_eq!((320, 240), window.get_size().unwrap());
        assert_eq!((320, 240), window.get_framebuffer_size().unwrap());
        assert!(!window.should_close());
        window.set_should_close(true);
        assert!(window.should_close());
        window.set_title("renamed").unwrap();
        assert!(window.set_title("bad\0title").is_err());
        drop(window);
        assert_eq!(0, glfw.window_count());
    }

    #[test]
    fn create_window_rejects_nul_title() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        assert!(matches!(
            glfw.create_window(100, 100, "a\0b"),
            Err(CreateWindowError::Title(_))
        ));
        assert_eq!(0, glfw.window_count());
    }

    #[test]
    fn window_flags_reach_the_window() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        glfw.window_hint(WindowHint::Flag(WindowFlag::Resizable, false))
            .unwrap();
        glfw.window_hint(WindowHint::Flag(WindowFlag::Floating, true))
            .unwrap();
        let window = {
            glfw.window_hint(WindowHint::ClientApi(ClientApi::None))
                .unwrap();
            glfw.window_hint(WindowHint::Flag(WindowFlag::Visible, false))
                .unwrap();
            glfw.create_window(200, 100, "flags").unwrap()
        };
        assert!(!window.get_flag(WindowFlag::Resizable).unwrap());
        assert!(window.get_flag(WindowFlag::Floating).unwrap());
        assert!(!window.get_flag(WindowFlag::Visible).unwrap());
        assert!(window.get_flag(WindowFlag::Decorated).unwrap());
    }

    #[test]
    fn raw_window_hints() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        glfw.default_window_hints().unwrap();
        assert!(matches!(
            glfw.window_hint_raw(9, true),
            Err(HintError::UnknownFlag(9))
        ));
        glfw.window_hint_raw(WindowFlag::Decorated as i32, false)
            .unwrap();
        glfw.window_hint(WindowHint::ClientApi(ClientApi::None))
            .unwrap();
        glfw.window_hint_raw(WindowFlag::Visible as i32, false)
            .unwrap();
        let window = glfw.create_window(200, 100, "raw").unwrap();
        assert!(!window.get_flag(WindowFlag::Decorated).unwrap());
        assert!(window.get_flag(WindowFlag::Resizable).unwrap());
    }

    #[test]
    fn resize_calls_only_that_windows_callback() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        let first = hidden_window(&glfw, "first");
        let second = hidden_window(&glfw, "second");
        let calls = Rc::new(RefCell::new(Vec::new()));

        for window in [&first, &second] {
            let calls = Rc::clone(&calls);
            window.set_framebuffer_size_callback(move |window_id, width, height| {
                calls.borrow_mut().push((window_id, width, height));
            });
            assert!(window.has_callback(CallbackSlot::FramebufferSize));
        }

        first.set_size(640, 480).unwrap();
        second.set_size(800, 600).unwrap();
        glfw.poll_events().unwrap();

        assert_eq!(
            vec![
                (first.window_id(), 640, 480),
                (second.window_id(), 800, 600)
            ],
            *calls.borrow()
        );
        assert_eq!((640, 480), first.get_framebuffer_size().unwrap());

        second.unset_callback(CallbackSlot::FramebufferSize);
        assert!(!second.has_callback(CallbackSlot::FramebufferSize));
        drop(first);
        drop(second);
        assert_eq!(1, Rc::strong_count(&calls));
    }

    #[test]
    fn event_callback_sees_resizes() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        let window = hidden_window(&glfw, "events");
        let events = Rc::new(RefCell::new(Vec::new()));
        {
            let events = Rc::clone(&events);
            window.set_event_callback(move |_, event| events.borrow_mut().push(event));
        }
        for slot in CallbackSlot::ALL {
            assert!(window.has_callback(slot));
        }
        window.set_size(400, 300).unwrap();
        assert_eq!(vec![WindowEvent::FramebufferSize(400, 300)], *events.borrow());
    }

    #[test]
    fn cursor_pos() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        let window = hidden_window(&glfw, "cursor");
        // only moves the cursor of a focused window
        window.set_cursor_pos(10.0, 20.0).unwrap();
        let (xpos, ypos) = window.get_cursor_pos().unwrap();
        assert!(xpos.is_finite() && ypos.is_finite());
    }

    #[test]
    fn window_outlives_glfw_handle() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        let window = hidden_window(&glfw, "outlive");
        window.set_key_callback(|_, _, _, _, _| {});
        drop(glfw);
        assert!(window.has_callback(CallbackSlot::Key));
        window.set_pos(5, 5).unwrap();
        drop(window);
        let glfw = Glfw::init(INIT_HINTS).expect("terminated after last window");
        assert_eq!(0, glfw.window_count());
    }

    #[test]
    fn full_registry_rejects_window() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        let mut windows: Vec<Window> = (0..MAX_WINDOWS)
            .map(|_| hidden_window(&glfw, "full"))
            .collect();
        assert_eq!(MAX_WINDOWS, glfw.window_count());

        assert!(matches!(
            glfw.create_window(320, 240, "rejected"),
            Err(CreateWindowError::RegistryFull)
        ));
        assert_eq!(MAX_WINDOWS, glfw.window_count());
        assert!(windows.iter().all(|window| window.get_size().is_ok()));

        windows.pop();
        let window = glfw.create_window(320, 240, "accepted").unwrap();
        assert_eq!(MAX_WINDOWS, glfw.window_count());
        window.set_key_callback(|_, _, _, _, _| {});
        assert!(window.has_callback(CallbackSlot::Key));
    }

    #[test]
    fn window_ops_resume_callback_panic() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        let window = hidden_window(&glfw, "resume");
        window.set_framebuffer_size_callback(|_, _, _| panic!("resize failed"));

        unsafe { callbacks::framebuffer_size_callback(window.window_ptr, 1, 1) };
        let payload = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| window.hide()))
            .unwrap_err();
        assert_eq!(Some(&"resize failed"), payload.downcast_ref::<&str>());
        window.show().unwrap();
    }

    #[test]
    fn callback_panic_ends_with_glfw() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        let window = hidden_window(&glfw, "stale");
        window.set_framebuffer_size_callback(|_, _, _| panic!("previous instance"));
        unsafe { callbacks::framebuffer_size_callback(window.window_ptr, 1, 1) };
        drop(window);
        drop(glfw);

        let glfw = Glfw::init(INIT_HINTS).unwrap();
        glfw.poll_events().unwrap();
    }

    #[test]
    fn event_callback_skips_nested_events() {
        let glfw = Glfw::init(INIT_HINTS).unwrap();
        let window = hidden_window(&glfw, "nested");
        let events = Rc::new(RefCell::new(Vec::new()));
        {
            let events = Rc::clone(&events);
            window.set_event_callback(move |window_id, event| {
                events.borrow_mut().push(event);
                if let WindowEvent::Key(..) = event {
                    unsafe {
                        callbacks::framebuffer_size_callback(window_id.window_mut_ptr(), 10, 10)
                    };
                }
            });
        }

        unsafe {
            callbacks::key_callback(window.window_ptr, sys::GLFW_KEY_A, 38, sys::GLFW_PRESS, 0);
            callbacks::framebuffer_size_callback(window.window_ptr, 20, 20);
        }
        assert_eq!(
            vec![
                WindowEvent::Key(sys::GLFW_KEY_A, 38, Action::Press, Modifiers::empty()),
                WindowEvent::FramebufferSize(20, 20),
            ],
            *events.borrow()
        );
    }
}
