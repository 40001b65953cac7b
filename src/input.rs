use cgmath::*;
use std::collections::HashMap;

/// Logical inputs the simulation understands. Mapping devices onto these is the caller's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Duck,
    Interact,
    FirePrimary,
    FireSecondary,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Duck,
        Action::Interact,
        Action::FirePrimary,
        Action::FireSecondary,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Down,
    Released,
    Up,
}

impl Default for ButtonState {
    fn default() -> Self {
        ButtonState::Up
    }
}

impl ButtonState {
    fn transition(&self, key_down: bool) -> ButtonState {
        if key_down {
            match self {
                ButtonState::Pressed => ButtonState::Down,
                ButtonState::Down => ButtonState::Down,
                ButtonState::Released => ButtonState::Pressed,
                ButtonState::Up => ButtonState::Pressed,
            }
        } else {
            match self {
                ButtonState::Pressed => ButtonState::Released,
                ButtonState::Down => ButtonState::Released,
                ButtonState::Released => ButtonState::Up,
                ButtonState::Up => ButtonState::Up,
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::Down)
    }
}

/// Per-frame snapshot of logical input: a ButtonState per Action plus a world-space
/// aim point for the portal gun.
#[derive(Debug, Clone)]
pub struct InputState {
    buttons: HashMap<Action, ButtonState>,
    pub aim: Point2<f32>,
}

impl Default for InputState {
    fn default() -> Self {
        let mut buttons = HashMap::new();
        for action in Action::ALL.iter() {
            buttons.insert(*action, ButtonState::default());
        }
        Self {
            buttons,
            aim: point2(0.0, 0.0),
        }
    }
}

impl InputState {
    pub fn get_button_state(&self, action: Action) -> ButtonState {
        self.buttons.get(&action).copied().unwrap_or_default()
    }

    pub fn is_active(&self, action: Action) -> bool {
        self.get_button_state(action).is_active()
    }

    /// True only on the frame the action went from up to down.
    pub fn is_pressed(&self, action: Action) -> bool {
        self.get_button_state(action) == ButtonState::Pressed
    }

    pub fn process_action(&mut self, action: Action, down: bool) {
        let button_state = self.get_button_state(action);
        self.buttons.insert(action, button_state.transition(down));
    }

    pub fn set_aim(&mut self, aim: Point2<f32>) {
        self.aim = aim;
    }

    /// Advances edge states (Pressed -> Down, Released -> Up). Call once per frame after the
    /// simulation has consumed this frame's input.
    pub fn update(&mut self) {
        let previous_button_state = std::mem::take(&mut self.buttons);
        for (action, button_state) in previous_button_state {
            self.buttons
                .insert(action, button_state.transition(button_state.is_active()));
        }
    }
}
