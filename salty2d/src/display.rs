use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::math::{Dimensions, Vector2f};

/// Engine version shown in window titles.
pub const VERSION_TAG: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MouseEvent {
    Moved { position: Vector2f },
    Pressed { position: Vector2f, button: MouseButton },
    Released { position: Vector2f, button: MouseButton },
    Wheel { position: Vector2f, delta: f32 },
}

/// Raw events a windowing backend pushes into the display.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DisplayEvent {
    CloseRequested,
    Resized { width: u32, height: u32 },
    Mouse(MouseEvent),
}

/// Receives mouse events from the display. Every method defaults to a no-op.
pub trait MouseInputHandler {
    fn mouse_moved(&mut self, _position: Vector2f) {}

    fn mouse_pressed(&mut self, _position: Vector2f, _button: MouseButton) {}

    fn mouse_released(&mut self, _position: Vector2f, _button: MouseButton) {}

    fn mouse_wheel(&mut self, _position: Vector2f, _delta: f32) {}
}

/// The surface a game is shown on.
///
/// The display does not own a window. A backend holds a [`DisplayEvent`]
/// sender and the engine drains the queue once per update.
pub struct Display {
    title: String,
    width: u32,
    height: u32,
    close_requested: bool,
    mouse_handler: Option<Box<dyn MouseInputHandler>>,
    event_send: Sender<DisplayEvent>,
    event_recv: Receiver<DisplayEvent>,
}

impl Display {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        let (event_send, event_recv) = crossbeam_channel::unbounded();
        Self {
            title: title.into(),
            width,
            height,
            close_requested: false,
            mouse_handler: None,
            event_send,
            event_recv,
        }
    }

    /// Title as given by the game.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Title decorated with the engine name and version, as shown to the player.
    pub fn window_title(&self) -> String {
        format!("{} [Salty Engine {}]", self.title, VERSION_TAG)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize in place. Handlers and event senders stay connected.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width as f32, self.height as f32)
    }

    pub fn is_close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn set_close_requested(&mut self, close_requested: bool) {
        self.close_requested = close_requested;
    }

    pub fn set_mouse_handler<H: MouseInputHandler + 'static>(&mut self, handler: H) {
        self.mouse_handler = Some(Box::new(handler));
    }

    pub fn clear_mouse_handler(&mut self) {
        self.mouse_handler = None;
    }

    pub fn has_mouse_handler(&self) -> bool {
        self.mouse_handler.is_some()
    }

    /// Sender for backends. Cloneable and usable from another thread.
    pub fn event_sender(&self) -> Sender<DisplayEvent> {
        self.event_send.clone()
    }

    /// Apply every queued event. Mouse events without a handler are dropped.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_recv.try_recv() {
            match event {
                DisplayEvent::CloseRequested => {
                    log::info!("Close requested for \"{}\"", self.title);
                    self.close_requested = true;
                }
                DisplayEvent::Resized { width, height } => self.set_size(width, height),
                DisplayEvent::Mouse(mouse) => {
                    if let Some(handler) = self.mouse_handler.as_mut() {
                        dispatch_mouse(handler.as_mut(), mouse);
                    }
                }
            }
        }
    }
}

fn dispatch_mouse(handler: &mut dyn MouseInputHandler, event: MouseEvent) {
    match event {
        MouseEvent::Moved { position } => handler.mouse_moved(position),
        MouseEvent::Pressed { position, button } => handler.mouse_pressed(position, button),
        MouseEvent::Released { position, button } => handler.mouse_released(position, button),
        MouseEvent::Wheel { position, delta } => handler.mouse_wheel(position, delta),
    }
}

impl std::fmt::Debug for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Display")
            .field("title", &self.title)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("close_requested", &self.close_requested)
            .field("mouse_handler", &self.mouse_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl MouseInputHandler for Recorder {
        fn mouse_pressed(&mut self, position: Vector2f, button: MouseButton) {
            self.0.borrow_mut().push(format!("{:?}@{}", button, position));
        }
    }

    #[test]
    fn title_carries_version_tag() {
        let display = Display::new("Pong", 640, 480);
        assert_eq!(display.window_title(), format!("Pong [Salty Engine {}]", VERSION_TAG));
    }

    #[test]
    fn close_request_arrives_through_channel() {
        let mut display = Display::new("Pong", 640, 480);
        let sender = display.event_sender();
        sender.send(DisplayEvent::Resized { width: 800, height: 600 }).unwrap();
        assert!(!display.is_close_requested());

        sender.send(DisplayEvent::CloseRequested).unwrap();
        display.process_events();
        assert!(display.is_close_requested());
        assert_eq!((display.width(), display.height()), (800, 600));
    }

    #[test]
    fn mouse_events_reach_the_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut display = Display::new("Pong", 640, 480);
        let sender = display.event_sender();

        // dropped: no handler yet
        sender
            .send(DisplayEvent::Mouse(MouseEvent::Pressed { position: Vector2f::ZERO, button: MouseButton::Right }))
            .unwrap();
        display.process_events();

        display.set_mouse_handler(Recorder(seen.clone()));
        sender
            .send(DisplayEvent::Mouse(MouseEvent::Pressed {
                position: Vector2f::new(3.0, 4.0),
                button: MouseButton::Left,
            }))
            .unwrap();
        sender
            .send(DisplayEvent::Mouse(MouseEvent::Moved { position: Vector2f::ONE }))
            .unwrap();
        display.process_events();

        assert_eq!(seen.borrow().len(), 1);
        assert!(seen.borrow()[0].starts_with("Left@"));
    }
}
