//! Declarations for the subset of the GLFW 3.4 C API used by `reglfw`.
//!
//! Names, values and signatures follow `GLFW/glfw3.h` exactly.

use core::ffi::{c_char, c_double, c_int, c_uint};

mod link;

pub const GLFW_VERSION_MAJOR: c_int = 3;
pub const GLFW_VERSION_MINOR: c_int = 4;

pub const GLFW_TRUE: c_int = 1;
pub const GLFW_FALSE: c_int = 0;

pub const GLFW_RELEASE: c_int = 0;
pub const GLFW_PRESS: c_int = 1;
pub const GLFW_REPEAT: c_int = 2;

pub const GLFW_KEY_UNKNOWN: c_int = -1;
pub const GLFW_KEY_SPACE: c_int = 32;
pub const GLFW_KEY_A: c_int = 65;
pub const GLFW_KEY_ESCAPE: c_int = 256;
pub const GLFW_KEY_ENTER: c_int = 257;
pub const GLFW_KEY_LAST: c_int = 348;

pub const GLFW_MOD_SHIFT: c_int = 0x0001;
pub const GLFW_MOD_CONTROL: c_int = 0x0002;
pub const GLFW_MOD_ALT: c_int = 0x0004;
pub const GLFW_MOD_SUPER: c_int = 0x0008;
pub const GLFW_MOD_CAPS_LOCK: c_int = 0x0010;
pub const GLFW_MOD_NUM_LOCK: c_int = 0x0020;

pub const GLFW_NO_ERROR: c_int = 0;
pub const GLFW_NOT_INITIALIZED: c_int = 0x00010001;
pub const GLFW_NO_CURRENT_CONTEXT: c_int = 0x00010002;
pub const GLFW_INVALID_ENUM: c_int = 0x00010003;
pub const GLFW_INVALID_VALUE: c_int = 0x00010004;
pub const GLFW_OUT_OF_MEMORY: c_int = 0x00010005;
pub const GLFW_API_UNAVAILABLE: c_int = 0x00010006;
pub const GLFW_VERSION_UNAVAILABLE: c_int = 0x00010007;
pub const GLFW_PLATFORM_ERROR: c_int = 0x00010008;
pub const GLFW_FORMAT_UNAVAILABLE: c_int = 0x00010009;
pub const GLFW_NO_WINDOW_CONTEXT: c_int = 0x0001000A;
pub const GLFW_CURSOR_UNAVAILABLE: c_int = 0x0001000B;
pub const GLFW_FEATURE_UNAVAILABLE: c_int = 0x0001000C;
pub const GLFW_FEATURE_UNIMPLEMENTED: c_int = 0x0001000D;
pub const GLFW_PLATFORM_UNAVAILABLE: c_int = 0x0001000E;

pub const GLFW_FOCUSED: c_int = 0x00020001;
pub const GLFW_ICONIFIED: c_int = 0x00020002;
pub const GLFW_RESIZABLE: c_int = 0x00020003;
pub const GLFW_VISIBLE: c_int = 0x00020004;
pub const GLFW_DECORATED: c_int = 0x00020005;
pub const GLFW_AUTO_ICONIFY: c_int = 0x00020006;
pub const GLFW_FLOATING: c_int = 0x00020007;
pub const GLFW_MAXIMIZED: c_int = 0x00020008;
pub const GLFW_CENTER_CURSOR: c_int = 0x00020009;
pub const GLFW_TRANSPARENT_FRAMEBUFFER: c_int = 0x0002000A;
pub const GLFW_HOVERED: c_int = 0x0002000B;
pub const GLFW_FOCUS_ON_SHOW: c_int = 0x0002000C;

pub const GLFW_CLIENT_API: c_int = 0x00022001;
pub const GLFW_CONTEXT_VERSION_MAJOR: c_int = 0x00022002;
pub const GLFW_CONTEXT_VERSION_MINOR: c_int = 0x00022003;
pub const GLFW_CONTEXT_CREATION_API: c_int = 0x0002200B;

pub const GLFW_NO_API: c_int = 0;
pub const GLFW_OPENGL_API: c_int = 0x00030001;
pub const GLFW_OPENGL_ES_API: c_int = 0x00030002;

pub const GLFW_NATIVE_CONTEXT_API: c_int = 0x00036001;
pub const GLFW_EGL_CONTEXT_API: c_int = 0x00036002;
pub const GLFW_OSMESA_CONTEXT_API: c_int = 0x00036003;

pub const GLFW_JOYSTICK_HAT_BUTTONS: c_int = 0x00050001;
pub const GLFW_ANGLE_PLATFORM_TYPE: c_int = 0x00050002;
pub const GLFW_PLATFORM: c_int = 0x00050003;
pub const GLFW_COCOA_CHDIR_RESOURCES: c_int = 0x00051001;
pub const GLFW_COCOA_MENUBAR: c_int = 0x00051002;

pub const GLFW_ANY_PLATFORM: c_int = 0x00060000;
pub const GLFW_PLATFORM_WIN32: c_int = 0x00060001;
pub const GLFW_PLATFORM_COCOA: c_int = 0x00060002;
pub const GLFW_PLATFORM_WAYLAND: c_int = 0x00060003;
pub const GLFW_PLATFORM_X11: c_int = 0x00060004;
pub const GLFW_PLATFORM_NULL: c_int = 0x00060005;

pub const GLFW_DONT_CARE: c_int = -1;

#[repr(C)]
pub struct GLFWwindow {
    _private: [u8; 0],
}

#[repr(C)]
pub struct GLFWmonitor {
    _private: [u8; 0],
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct GLFWvidmode {
    pub width: c_int,
    pub height: c_int,
    pub redBits: c_int,
    pub greenBits: c_int,
    pub blueBits: c_int,
    pub refreshRate: c_int,
}

pub type GLFWglproc = Option<unsafe extern "C" fn()>;

pub type GLFWframebuffersizefun =
    Option<unsafe extern "C" fn(window: *mut GLFWwindow, width: c_int, height: c_int)>;
pub type GLFWcursorposfun =
    Option<unsafe extern "C" fn(window: *mut GLFWwindow, xpos: c_double, ypos: c_double)>;
pub type GLFWkeyfun = Option<
    unsafe extern "C" fn(
        window: *mut GLFWwindow,
        key: c_int,
        scancode: c_int,
        action: c_int,
        mods: c_int,
    ),
>;
pub type GLFWcharfun = Option<unsafe extern "C" fn(window: *mut GLFWwindow, codepoint: c_uint)>;
pub type GLFWscrollfun =
    Option<unsafe extern "C" fn(window: *mut GLFWwindow, xoffset: c_double, yoffset: c_double)>;

extern "C" {
    pub fn glfwInit() -> c_int;
    pub fn glfwTerminate();
    pub fn glfwInitHint(hint: c_int, value: c_int);
    pub fn glfwGetVersion(major: *mut c_int, minor: *mut c_int, rev: *mut c_int);
    pub fn glfwGetVersionString() -> *const c_char;
    pub fn glfwGetError(description: *mut *const c_char) -> c_int;
    pub fn glfwGetPlatform() -> c_int;
    pub fn glfwPlatformSupported(platform: c_int) -> c_int;

    pub fn glfwGetMonitors(count: *mut c_int) -> *mut *mut GLFWmonitor;
    pub fn glfwGetPrimaryMonitor() -> *mut GLFWmonitor;
    pub fn glfwGetMonitorPos(monitor: *mut GLFWmonitor, xpos: *mut c_int, ypos: *mut c_int);
    pub fn glfwGetMonitorName(monitor: *mut GLFWmonitor) -> *const c_char;
    pub fn glfwGetVideoMode(monitor: *mut GLFWmonitor) -> *const GLFWvidmode;

    pub fn glfwDefaultWindowHints();
    pub fn glfwWindowHint(hint: c_int, value: c_int);
    pub fn glfwCreateWindow(
        width: c_int,
        height: c_int,
        title: *const c_char,
        monitor: *mut GLFWmonitor,
        share: *mut GLFWwindow,
    ) -> *mut GLFWwindow;
    pub fn glfwDestroyWindow(window: *mut GLFWwindow);
    pub fn glfwWindowShouldClose(window: *mut GLFWwindow) -> c_int;
    pub fn glfwSetWindowShouldClose(window: *mut GLFWwindow, value: c_int);
    pub fn glfwSetWindowTitle(window: *mut GLFWwindow, title: *const c_char);
    pub fn glfwGetWindowPos(window: *mut GLFWwindow, xpos: *mut c_int, ypos: *mut c_int);
    pub fn glfwSetWindowPos(window: *mut GLFWwindow, xpos: c_int, ypos: c_int);
    pub fn glfwGetWindowSize(window: *mut GLFWwindow, width: *mut c_int, height: *mut c_int);
    pub fn glfwSetWindowSize(window: *mut GLFWwindow, width: c_int, height: c_int);
    pub fn glfwGetFramebufferSize(window: *mut GLFWwindow, width: *mut c_int, height: *mut c_int);
    pub fn glfwMaximizeWindow(window: *mut GLFWwindow);
    pub fn glfwShowWindow(window: *mut GLFWwindow);
    pub fn glfwHideWindow(window: *mut GLFWwindow);
    pub fn glfwGetWindowAttrib(window: *mut GLFWwindow, attrib: c_int) -> c_int;

    pub fn glfwSetFramebufferSizeCallback(
        window: *mut GLFWwindow,
        callback: GLFWframebuffersizefun,
    ) -> GLFWframebuffersizefun;
    pub fn glfwSetCursorPosCallback(
        window: *mut GLFWwindow,
        callback: GLFWcursorposfun,
    ) -> GLFWcursorposfun;
    pub fn glfwSetKeyCallback(window: *mut GLFWwindow, callback: GLFWkeyfun) -> GLFWkeyfun;
    pub fn glfwSetCharCallback(window: *mut GLFWwindow, callback: GLFWcharfun) -> GLFWcharfun;
    pub fn glfwSetScrollCallback(window: *mut GLFWwindow, callback: GLFWscrollfun)
        -> GLFWscrollfun;

    pub fn glfwPollEvents();
    pub fn glfwWaitEvents();
    pub fn glfwWaitEventsTimeout(timeout: c_double);

    pub fn glfwGetCursorPos(window: *mut GLFWwindow, xpos: *mut c_double, ypos: *mut c_double);
    pub fn glfwSetCursorPos(window: *mut GLFWwindow, xpos: c_double, ypos: c_double);

    pub fn glfwGetTime() -> c_double;
    pub fn glfwSetTime(time: c_double);

    pub fn glfwMakeContextCurrent(window: *mut GLFWwindow);
    pub fn glfwSwapBuffers(window: *mut GLFWwindow);
    pub fn glfwSwapInterval(interval: c_int);
    pub fn glfwGetProcAddress(procname: *const c_char) -> GLFWglproc;
}
