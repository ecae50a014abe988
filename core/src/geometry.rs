//! Planar helpers shared by the world and its systems.

use glam::Vec2;

/// Playfield dimensions measured in world units.
///
/// The top `ui_height` rows are reserved for the heads-up display and the
/// rightmost `sanctuary_width` columns form the sanctuary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    width: f32,
    height: f32,
    ui_height: f32,
    sanctuary_width: f32,
}

impl Arena {
    /// Creates a new arena description.
    #[must_use]
    pub const fn new(width: f32, height: f32, ui_height: f32, sanctuary_width: f32) -> Self {
        Self {
            width,
            height,
            ui_height,
            sanctuary_width,
        }
    }

    /// Total width of the arena.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Total height of the arena, including the UI band.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Height of the band reserved for the HUD at the top of the arena.
    #[must_use]
    pub const fn ui_height(&self) -> f32 {
        self.ui_height
    }

    /// Width of the sanctuary strip along the right edge.
    #[must_use]
    pub const fn sanctuary_width(&self) -> f32 {
        self.sanctuary_width
    }

    /// X coordinate where the sanctuary begins.
    #[must_use]
    pub fn sanctuary_boundary(&self) -> f32 {
        self.width - self.sanctuary_width
    }

    /// X coordinate marching entities walk toward.
    #[must_use]
    pub fn march_target_x(&self) -> f32 {
        self.sanctuary_boundary() + 2.0
    }

    /// Clamps a circle of the provided radius so it stays inside the arena
    /// and below the UI band.
    #[must_use]
    pub fn clamp_circle(&self, position: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            clamp(position.x, radius, self.width - 1.0 - radius),
            clamp(
                position.y,
                self.ui_height + radius,
                self.height - 1.0 - radius,
            ),
        )
    }
}

/// Clamps `value` into `[low, high]`.
///
/// Unlike [`f32::clamp`] this never panics when the bounds cross; the lower
/// bound wins in that case.
#[must_use]
pub fn clamp(value: f32, low: f32, high: f32) -> f32 {
    low.max(high.min(value))
}

/// Axis-aligned rectangle used for obstacles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    origin: Vec2,
    size: Vec2,
}

impl Rect {
    /// Creates a rectangle anchored at its upper-left corner.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Reports whether a circle overlaps the rectangle.
    #[must_use]
    pub fn collides_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = Vec2::new(
            clamp(center.x, self.origin.x, self.origin.x + self.size.x),
            clamp(center.y, self.origin.y, self.origin.y + self.size.y),
        );
        center.distance_squared(closest) < radius * radius
    }
}
