use std::{cell::Cell, rc::Rc};

use reglfw::{Action, ClientApi, Glfw, WindowFlag, WindowHint};
use reglfw::sys;

mod gl;
use gl::{Gl, GL_COLOR_BUFFER_BIT};

fn main() {
    env_logger::init();

    let glfw = Glfw::init(&[]).expect("GLFW failed to initialize");
    glfw.window_hint(WindowHint::ClientApi(ClientApi::OpenGlEs))
        .expect("client api hint");
    glfw.window_hint(WindowHint::ContextVersion(2, 0))
        .expect("context version hint");
    glfw.window_hint(WindowHint::Flag(WindowFlag::Visible, false))
        .expect("visible hint");

    let window = glfw
        .create_window(800, 600, "GLFW Window")
        .expect("Failed to create window");

    // center on the primary monitor before showing
    if let Some(monitor) = glfw.get_primary_monitor() {
        let (xpos, ypos) = monitor.get_pos().expect("glfwGetMonitorPos");
        let mode = monitor.get_video_mode().expect("glfwGetVideoMode");
        window
            .set_pos(xpos + (mode.width - 800) / 2, ypos + (mode.height - 600) / 2)
            .expect("glfwSetWindowPos");
    }
    window.show().expect("glfwShowWindow");

    let gl = Rc::new(window.load_gl_with(Gl::load).expect("glfwMakeContextCurrent"));
    glfw.swap_interval(1).expect("glfwSwapInterval");

    let running = Rc::new(Cell::new(true));

    let resize_gl = Rc::clone(&gl);
    window.set_framebuffer_size_callback(move |_, width, height| {
        log::info!("framebuffer {}x{}", width, height);
        resize_gl.viewport(0, 0, width, height);
    });
    window.set_cursor_pos_callback(|_, xpos, ypos| log::trace!("cursor {:.1} {:.1}", xpos, ypos));
    window.set_scroll_callback(|_, xoffset, yoffset| log::info!("scroll {} {}", xoffset, yoffset));
    window.set_char_callback(|_, ch| log::info!("char {:?}", ch));
    let key_running = Rc::clone(&running);
    window.set_key_callback(move |_, key, scancode, action, mods| {
        log::info!("key {} ({}) {:?} {:?}", key, scancode, action, mods);
        if key == sys::GLFW_KEY_ESCAPE && action == Action::Press {
            key_running.set(false);
        }
    });

    while running.get() && !window.should_close() {
        glfw.poll_events().expect("glfwPollEvents");
        let time = 2.0 * glfw.get_time() as f32;
        gl.clear_color(time.sin(), time.cos(), 1.0 - time.sin(), 1.0);
        gl.clear(GL_COLOR_BUFFER_BIT);
        window.swap_buffers().expect("glfwSwapBuffers");
    }
}
