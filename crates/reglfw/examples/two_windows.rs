use std::{cell::RefCell, rc::Rc};

use reglfw::{CallbackSlot, ClientApi, Glfw, WindowEvent, WindowHint, WindowId};
use reglfw::sys;

fn main() {
    env_logger::init();

    let glfw = Glfw::init(&[]).expect("GLFW failed to initialize");
    glfw.window_hint(WindowHint::ClientApi(ClientApi::None))
        .expect("client api hint");

    let events: Rc<RefCell<Vec<(WindowId, WindowEvent)>>> = Rc::default();
    let windows = ["left", "right"].map(|title| {
        let window = glfw
            .create_window(400, 300, title)
            .expect("Failed to create window");
        let events = Rc::clone(&events);
        window.set_event_callback(move |window_id, event| {
            events.borrow_mut().push((window_id, event));
        });
        window
    });
    windows[0].set_pos(100, 100).expect("glfwSetWindowPos");
    windows[1].set_pos(520, 100).expect("glfwSetWindowPos");

    // cursor movement is noisy
    for window in &windows {
        window.unset_callback(CallbackSlot::CursorPos);
    }

    while windows.iter().all(|window| !window.should_close()) {
        glfw.wait_events().expect("glfwWaitEvents");
        for (window_id, event) in events.borrow_mut().drain(..) {
            let index = windows
                .iter()
                .position(|window| window.window_id() == window_id)
                .expect("event for an unknown window");
            println!("window {}: {:?}", index, event);
            if let WindowEvent::Key(sys::GLFW_KEY_ESCAPE, ..) = event {
                windows[index].set_should_close(true);
            }
        }
    }
}
