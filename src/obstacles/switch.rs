use anyhow::{bail, Result};
use std::convert::TryFrom;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchState {
    Inactive = 0,
    Pressed = 1,
    Active = 2,
}

impl TryFrom<i32> for SwitchState {
    type Error = anyhow::Error;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => SwitchState::Inactive,
            1 => SwitchState::Pressed,
            2 => SwitchState::Active,
            _ => bail!("{} is not a valid switch state", value),
        })
    }
}

#[derive(Clone, Debug)]
pub struct Switch {
    pub state: SwitchState,
    pub initial_state: SwitchState,
}

impl Switch {
    pub fn new(state: SwitchState) -> Self {
        Self {
            state,
            initial_state: state,
        }
    }

    /// Index of the switch's frame in its sprite strip, which is laid out Active, Pressed, Inactive.
    pub fn frame(&self) -> usize {
        match self.state {
            SwitchState::Active => 0,
            SwitchState::Pressed => 1,
            SwitchState::Inactive => 2,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.state == SwitchState::Pressed
    }

    pub fn reset(&mut self) {
        self.state = self.initial_state;
    }
}
