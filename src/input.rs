//! Turns raw window events into viewer actions.
//!
//! Tracks the left-button drag that orbits the camera, converts wheel input
//! into zoom, and spots double-clicks (winit only reports single presses).

use std::time::{Duration, Instant};

use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Two presses closer together than this count as a double-click.
pub const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(300);
/// ...as long as the pointer moved less than this many logical pixels.
pub const DOUBLE_CLICK_SLOP: f64 = 6.0;

/// Something the viewer should do in response to input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Orbit by a pointer delta in logical pixels.
    Rotate { dx: f32, dy: f32 },
    /// Zoom by a number of wheel lines, positive towards the target.
    Zoom(f32),
    ToggleFullscreen,
    /// Leave fullscreen, or close the viewer when already windowed.
    Escape,
}

/// Detects double-clicks from a stream of press events.
#[derive(Debug, Default)]
pub struct DoubleClick {
    last_press: Option<(Instant, (f64, f64))>,
}

impl DoubleClick {
    /// Record a press. Returns `true` when it completes a double-click.
    pub fn press(&mut self, at: Instant, position: (f64, f64)) -> bool {
        if let Some((prev_at, prev_pos)) = self.last_press {
            let dx = position.0 - prev_pos.0;
            let dy = position.1 - prev_pos.1;
            let close = (dx * dx + dy * dy).sqrt() <= DOUBLE_CLICK_SLOP;
            let quick = at.saturating_duration_since(prev_at) <= DOUBLE_CLICK_INTERVAL;
            if close && quick {
                // A third press starts a new pair
                self.last_press = None;
                return true;
            }
        }
        self.last_press = Some((at, position));
        false
    }
}

/// Pointer and keyboard state for the viewer window.
#[derive(Debug, Default)]
pub struct Input {
    dragging: bool,
    cursor: Option<(f64, f64)>,
    clicks: DoubleClick,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one window event. `scale_factor` converts physical pixels to
    /// logical ones.
    pub fn handle(&mut self, event: &WindowEvent, scale_factor: f64) -> Option<Action> {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.press(Instant::now()),
                ElementState::Released => {
                    self.release();
                    None
                }
            },
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(scale_factor);
                self.cursor_moved((logical.x, logical.y))
            }
            WindowEvent::CursorLeft { .. } => {
                self.release();
                self.cursor = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => Some(Action::Zoom(match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
            })),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => key_action(*code),
            _ => None,
        }
    }

    /// Left button went down.
    pub fn press(&mut self, at: Instant) -> Option<Action> {
        self.dragging = true;
        let position = self.cursor.unwrap_or_default();
        self.clicks
            .press(at, position)
            .then_some(Action::ToggleFullscreen)
    }

    /// Left button went up.
    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Cursor moved to `position` (logical pixels).
    pub fn cursor_moved(&mut self, position: (f64, f64)) -> Option<Action> {
        let previous = self.cursor.replace(position);
        if !self.dragging {
            return None;
        }
        previous.map(|(x, y)| Action::Rotate {
            dx: (position.0 - x) as f32,
            dy: (position.1 - y) as f32,
        })
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

fn key_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::KeyF | KeyCode::F11 => Some(Action::ToggleFullscreen),
        KeyCode::Escape => Some(Action::Escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click_detected() {
        let mut clicks = DoubleClick::default();
        let t0 = Instant::now();
        assert!(!clicks.press(t0, (10.0, 10.0)));
        assert!(clicks.press(t0 + Duration::from_millis(150), (12.0, 11.0)));
    }

    #[test]
    fn test_slow_clicks_are_single() {
        let mut clicks = DoubleClick::default();
        let t0 = Instant::now();
        assert!(!clicks.press(t0, (10.0, 10.0)));
        assert!(!clicks.press(t0 + Duration::from_millis(800), (10.0, 10.0)));
    }

    #[test]
    fn test_distant_clicks_are_single() {
        let mut clicks = DoubleClick::default();
        let t0 = Instant::now();
        assert!(!clicks.press(t0, (10.0, 10.0)));
        assert!(!clicks.press(t0 + Duration::from_millis(100), (60.0, 10.0)));
    }

    #[test]
    fn test_triple_click_toggles_once() {
        let mut clicks = DoubleClick::default();
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        assert!(!clicks.press(t0, (0.0, 0.0)));
        assert!(clicks.press(t0 + ms(100), (0.0, 0.0)));
        assert!(!clicks.press(t0 + ms(200), (0.0, 0.0)));
    }

    #[test]
    fn test_drag_produces_rotation() {
        let mut input = Input::new();
        assert_eq!(input.cursor_moved((100.0, 100.0)), None);

        input.press(Instant::now());
        assert!(input.is_dragging());
        assert_eq!(
            input.cursor_moved((110.0, 95.0)),
            Some(Action::Rotate { dx: 10.0, dy: -5.0 })
        );

        input.release();
        assert_eq!(input.cursor_moved((150.0, 150.0)), None);
    }

    #[test]
    fn test_key_shortcuts() {
        assert_eq!(key_action(KeyCode::KeyF), Some(Action::ToggleFullscreen));
        assert_eq!(key_action(KeyCode::Escape), Some(Action::Escape));
        assert_eq!(key_action(KeyCode::KeyQ), None);
    }
}
