use glam::Vec2;

/// Logical controls the viewer responds to.
///
/// Desktop bindings are W/S/A/D for movement and the arrow keys for looking
/// around; the mapping from platform key codes lives in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    LookUp,
    LookDown,
}

/// Key held for as long as a touch lasts, so a phone can walk without a keyboard.
pub const TOUCH_KEY: Key = Key::Forward;

/// A raw device event as delivered by the platform.
///
/// Positions are screen-space pixels with Y growing downwards. They are
/// optional because some touch sources omit coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { position: Option<Vec2> },
    PointerMove { position: Option<Vec2> },
    PointerUp,
    TouchStart { position: Option<Vec2> },
    TouchMove { position: Option<Vec2> },
    TouchEnd,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_walks_forward() {
        assert_eq!(TOUCH_KEY, Key::Forward);
    }

    #[test]
    fn events_compare_by_value() {
        let a = InputEvent::PointerMove {
            position: Some(Vec2::new(1.0, 2.0)),
        };
        assert_eq!(
            a,
            InputEvent::PointerMove {
                position: Some(Vec2::new(1.0, 2.0))
            }
        );
        assert_ne!(a, InputEvent::PointerMove { position: None });
    }
}
