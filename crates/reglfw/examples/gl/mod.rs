use core::{ffi::c_void, mem};

pub const GL_COLOR_BUFFER_BIT: u32 = 0x4000;

type ClearFn = unsafe extern "system" fn(u32);
type ClearColorFn = unsafe extern "system" fn(f32, f32, f32, f32);
type ViewportFn = unsafe extern "system" fn(i32, i32, i32, i32);

pub struct Gl {
    clear: Option<ClearFn>,
    clear_color: Option<ClearColorFn>,
    viewport: Option<ViewportFn>,
}

impl Gl {
    pub fn load(resolve: &dyn Fn(&str) -> *const c_void) -> Gl {
        unsafe {
            Gl {
                clear: mem::transmute::<*const c_void, Option<ClearFn>>(resolve("glClear")),
                clear_color: mem::transmute::<*const c_void, Option<ClearColorFn>>(resolve(
                    "glClearColor",
                )),
                viewport: mem::transmute::<*const c_void, Option<ViewportFn>>(resolve(
                    "glViewport",
                )),
            }
        }
    }

    pub fn clear(&self, mask: u32) {
        unsafe { self.clear.expect("glClear")(mask) }
    }

    pub fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.clear_color.expect("glClearColor")(red, green, blue, alpha) }
    }

    pub fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.viewport.expect("glViewport")(x, y, width, height) }
    }
}
