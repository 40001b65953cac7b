use std::{fmt::Display, str::FromStr};

/// Classification of a contact surface. Governs both how projectiles react on impact
/// and how much friction the character gets from standing on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    Absorbs = 4,
    Amplifies = 3,
    Normal = 2,
    Reflects = 1,
    Portal = 0,
    Death = -1,
}

impl Surface {
    /// Tile friction is a linear function of the surface discriminant.
    pub fn friction(&self) -> f32 {
        (*self as i32) as f32 * 0.2
    }

    pub fn name(&self) -> &'static str {
        match self {
            Surface::Absorbs => "absorbs",
            Surface::Amplifies => "amplifies",
            Surface::Normal => "normal",
            Surface::Reflects => "reflects",
            Surface::Portal => "portal",
            Surface::Death => "death",
        }
    }
}

impl Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Surface {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absorbs" => Ok(Surface::Absorbs),
            "amplifies" => Ok(Surface::Amplifies),
            "normal" => Ok(Surface::Normal),
            "reflects" => Ok(Surface::Reflects),
            "portal" => Ok(Surface::Portal),
            "death" => Ok(Surface::Death),
            _ => anyhow::bail!("Unrecognized surface type \"{}\"", s),
        }
    }
}
