use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// The panorama's display rectangle inside the host window, in physical
/// pixels. Pointer samples outside it never move a dragged hotspot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl ViewportRect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    pub fn from_size(width: f32, height: f32) -> Self {
        Self { origin: Vec2::ZERO, size: Vec2::new(width, height) }
    }

    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= self.origin.x
            && position.y >= self.origin.y
            && position.x <= self.origin.x + self.size.x
            && position.y <= self.origin.y + self.size.y
    }

    /// Pixel position to normalized device coordinates, x and y in [-1, 1]
    /// with y up. Positions outside the rect map outside that range.
    pub fn to_ndc(&self, position: Vec2) -> Vec2 {
        let local = position - self.origin;
        let x = if self.size.x > 0.0 { (2.0 * local.x / self.size.x) - 1.0 } else { 0.0 };
        let y = if self.size.y > 0.0 { 1.0 - (2.0 * local.y / self.size.y) } else { 0.0 };
        Vec2::new(x, y)
    }
}

/// Pointer samples the engine consumes, translated from the host's window
/// events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved { position: Vec2 },
    Pressed { button: MouseButton },
    Released { button: MouseButton },
    Wheel { delta: f32 },
    /// Cursor left the window. Further samples are out of bounds until it
    /// returns; an active drag session stays alive.
    Exited,
    /// Pointer capture is gone for good (focus loss). Drags must abort.
    CaptureLost,
    Other,
}

impl PointerEvent {
    pub fn from_window_event(ev: &WindowEvent) -> Self {
        match ev {
            WindowEvent::CursorMoved { position, .. } => {
                PointerEvent::Moved { position: Vec2::new(position.x as f32, position.y as f32) }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => PointerEvent::Pressed { button: *button },
                ElementState::Released => PointerEvent::Released { button: *button },
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                PointerEvent::Wheel { delta: d }
            }
            WindowEvent::CursorLeft { .. } => PointerEvent::Exited,
            WindowEvent::Focused(false) => PointerEvent::CaptureLost,
            _ => PointerEvent::Other,
        }
    }
}

/// Frame-scoped pointer state: latched click, accumulated wheel and motion
/// delta, current position.
#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: Option<Vec2>,
    delta: Vec2,
    wheel: f32,
    left_pressed: bool,
    left_clicked: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ev: PointerEvent) {
        match ev {
            PointerEvent::Moved { position } => {
                if let Some(last) = self.cursor {
                    self.delta += position - last;
                }
                self.cursor = Some(position);
            }
            PointerEvent::Pressed { button: MouseButton::Left } => {
                self.left_pressed = true;
                self.left_clicked = true;
            }
            PointerEvent::Released { button: MouseButton::Left } => {
                self.left_pressed = false;
            }
            PointerEvent::Wheel { delta } => {
                self.wheel += delta;
            }
            PointerEvent::Exited | PointerEvent::CaptureLost => {
                self.left_pressed = false;
                self.delta = Vec2::ZERO;
            }
            _ => {}
        }
    }

    pub fn clear_frame(&mut self) {
        self.delta = Vec2::ZERO;
        self.wheel = 0.0;
        self.left_clicked = false;
    }

    pub fn cursor_position(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn left_held(&self) -> bool {
        self.left_pressed
    }

    pub fn take_left_click(&mut self) -> bool {
        let was = self.left_clicked;
        self.left_clicked = false;
        was
    }

    pub fn take_motion_delta(&mut self) -> Vec2 {
        let d = self.delta;
        self.delta = Vec2::ZERO;
        d
    }

    pub fn take_wheel_delta(&mut self) -> Option<f32> {
        if self.wheel.abs() > 0.0 {
            let d = self.wheel;
            self.wheel = 0.0;
            Some(d)
        } else {
            None
        }
    }
}
