// Gameplay tuning. Level geometry has been laid out against these values, so change them with care.
// Units are seconds & world units (pixels) unless otherwise specified.

/// Scales a level's gravity (meters/s^2) into world units/s^2.
pub const METERS_TO_UNITS: f32 = 20.0;

/// Upper bound on message dispatch rounds per frame. Switches can signal each other
/// in a cycle; anything past this many rounds is dropped.
pub const MAX_DISPATCH_ROUNDS: usize = 8;

pub mod character {
    pub const DEFAULT_SPEED: f32 = 160.0;
    pub const MASS: f32 = 80.0;
    pub const STATIC_ACCEL_GND: f32 = MASS * 0.05;
    pub const DYNAMIC_ACCEL_AIR: f32 = MASS * 0.20;
    pub const STATIC_ACCEL_AIR: f32 = MASS * 0.0025;

    pub const STANDING_SIZE: (f32, f32) = (73.0, 135.0);
    pub const DUCKING_SIZE: (f32, f32) = (67.0, 103.0);
    pub const DUCK_OFFSET: f32 = 16.0;

    /// Contacts no deeper than this are always treated as landings
    pub const LANDING_TOLERANCE: f32 = 3.0;
    /// Horizontal-facing apertures accept the character when the vertical overlap is within this of its height
    pub const PORTAL_HEIGHT_TOLERANCE: f32 = 3.0;
    /// Vertical-facing apertures accept the character when the horizontal overlap is within this of its width
    pub const PORTAL_WIDTH_TOLERANCE: f32 = 1.0;

    /// Body lean decays back to upright at this many radians per second
    pub const LEAN_RECOVERY_RATE: f32 = std::f32::consts::PI / 2.0;

    pub const ARM_LENGTH: f32 = 37.0;
    pub const ARM_ANCHOR: (f32, f32) = (-4.0, -8.0);
    pub const ARM_ANCHOR_DUCKED: (f32, f32) = (-6.0, 12.0);
    pub const ARM_ANCHOR_LEFT: (f32, f32) = (6.0, 0.0);
    pub const ARM_ANCHOR_DUCKED_LEFT: (f32, f32) = (13.0, 0.0);
}

pub mod portal {
    /// Length of an aperture along the surface it sits on
    pub const PORTAL_HEIGHT: f32 = 150.0;
    /// Thickness of an aperture
    pub const PORTAL_WIDTH: f32 = 5.0;
    /// Minimum time between two teleport swaps of the same occupant
    pub const SWAP_HYSTERESIS: f32 = 0.2;
    /// Upward kick given when leaving through an Up-facing aperture
    pub const UP_EXIT_BOOST: f32 = 25.0;
}

pub mod projectile {
    pub const SPEED: f32 = 1000.0;
    pub const SOURCE_SIZE: f32 = 200.0;
    pub const SCALE: f32 = 0.1;
    pub const CENTER: (f32, f32) = (10.0, 10.0);
    /// Divisor applied to velocity when deciding a target is too thin to trust the approach side
    pub const DEPTH_FUDGE: f32 = 30.0;
}

pub mod obstacle {
    pub const FRICTION: f32 = 0.60;
    pub const DOOR_SPEED: f32 = 50.0;
    pub const DOOR_HEIGHT: f32 = 200.0;
    pub const DOOR_WIDTH: f32 = 20.0;
    pub const SWITCH_SIZE: (f32, f32) = (20.0, 100.0);
    pub const PLATFORM_SIZE: (f32, f32) = (160.0, 20.0);
}

pub mod level {
    use crate::actor::EntityId;

    /// Identifier the player is bound to. Obstacle identifiers in level documents start at 1.
    pub const PLAYER_ID: EntityId = 0;
    /// Gravity in meters/s^2 for levels which don't specify their own
    pub const DEFAULT_GRAVITY: f32 = 9.8;
}

pub mod camera {
    pub const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 720.0);
    /// The player is held this far up and left of the viewport's focus point
    pub const FOCUS_INSET: f32 = 100.0;
}
