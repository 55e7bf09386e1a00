use core::ffi::CStr;
use std::rc::Rc;

use reglfw_sys as sys;

use crate::{unknown_error, Error, Glfw, Terminate};

#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonitorId(pub(crate) usize);

impl MonitorId {
    pub fn monitor_ptr(self) -> *const sys::GLFWmonitor {
        self.0 as *const _
    }

    pub fn monitor_mut_ptr(self) -> *mut sys::GLFWmonitor {
        self.0 as *mut _
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VideoMode {
    pub width: i32,
    pub height: i32,
    pub red_bits: i32,
    pub green_bits: i32,
    pub blue_bits: i32,
    pub refresh_rate: i32,
}

impl From<&sys::GLFWvidmode> for VideoMode {
    fn from(mode: &sys::GLFWvidmode) -> Self {
        VideoMode {
            width: mode.width,
            height: mode.height,
            red_bits: mode.redBits,
            green_bits: mode.greenBits,
            blue_bits: mode.blueBits,
            refresh_rate: mode.refreshRate,
        }
    }
}

pub struct Monitor {
    pub(crate) monitor_ptr: *mut sys::GLFWmonitor,
    pub(crate) _terminate: Rc<Terminate>,
}

impl Monitor {
    pub fn monitor_id(&self) -> MonitorId {
        MonitorId(self.monitor_ptr as usize)
    }

    #[doc(alias = "glfwGetMonitorName")]
    pub fn get_name(&self) -> Result<String, Error> {
        unsafe {
            let name_ptr = sys::glfwGetMonitorName(self.monitor_ptr);
            Glfw::get_error()?;
            if name_ptr.is_null() {
                return Err(unknown_error());
            }
            Ok(CStr::from_ptr(name_ptr).to_string_lossy().into_owned())
        }
    }

    /// Position of the monitor's viewport on the virtual screen.
    #[doc(alias = "glfwGetMonitorPos")]
    pub fn get_pos(&self) -> Result<(i32, i32), Error> {
        let (mut xpos, mut ypos) = (0, 0);
        unsafe {
            sys::glfwGetMonitorPos(self.monitor_ptr, &mut xpos, &mut ypos);
        }
        Glfw::get_error().map(|_| (xpos, ypos))
    }

    /// Current video mode of the monitor.
    #[doc(alias = "glfwGetVideoMode")]
    pub fn get_video_mode(&self) -> Result<VideoMode, Error> {
        unsafe {
            let mode_ptr = sys::glfwGetVideoMode(self.monitor_ptr);
            Glfw::get_error()?;
            mode_ptr
                .as_ref()
                .map(VideoMode::from)
                .ok_or_else(unknown_error)
        }
    }
}

impl core::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Monitor").field(&self.monitor_ptr).finish()
    }
}
