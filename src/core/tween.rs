//=========================================================================
// Tweening Interface
//=========================================================================
//
// Collaborator contract for animating UI elements.
//
// Targets are containers; the capability they carry (transform, rect,
// image, text) decides what a call animates. Implementations own the
// interpolation and usually live as a `Singleton` on a persistent
// container.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::world::ContainerId;

//=== Value Types =========================================================

/// Position or anchor offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Linear RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

//=== TweenOptions ========================================================

/// Callback run at a tween boundary.
pub type TweenCallback = Box<dyn FnOnce() + Send>;

/// Optional settings shared by every tween call.
#[derive(Default)]
pub struct TweenOptions {
    /// Runs when the tween starts.
    pub on_start: Option<TweenCallback>,

    /// Runs when the tween reaches its target.
    pub on_complete: Option<TweenCallback>,

    /// Advance with unscaled time (keeps running while the game is paused).
    pub ignore_time_scale: bool,
}

impl TweenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    pub fn on_complete(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn ignore_time_scale(mut self, ignore: bool) -> Self {
        self.ignore_time_scale = ignore;
        self
    }
}

impl std::fmt::Debug for TweenOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenOptions")
            .field("on_start", &self.on_start.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("ignore_time_scale", &self.ignore_time_scale)
            .finish()
    }
}

//=== Tweening Trait ======================================================

/// Animation operations on UI elements.
///
/// `speed` is in target units per second.
pub trait Tweening {
    //--- World transform --------------------------------------------------

    fn tween_position(&mut self, target: ContainerId, to: Vec3, speed: f32, options: TweenOptions);

    fn tween_position_x(&mut self, target: ContainerId, to: f32, speed: f32, options: TweenOptions);

    fn tween_position_y(&mut self, target: ContainerId, to: f32, speed: f32, options: TweenOptions);

    //--- Anchored (layout) position ---------------------------------------

    fn tween_anchor_position(&mut self, target: ContainerId, to: Vec3, speed: f32, options: TweenOptions);

    fn tween_anchor_position_x(&mut self, target: ContainerId, to: f32, speed: f32, options: TweenOptions);

    fn tween_anchor_position_y(&mut self, target: ContainerId, to: f32, speed: f32, options: TweenOptions);

    //--- Appearance -------------------------------------------------------

    /// Animates the image alpha only.
    fn tween_fade(&mut self, target: ContainerId, alpha: f32, speed: f32, options: TweenOptions);

    /// Animates an image or text color.
    fn tween_color(&mut self, target: ContainerId, to: Rgba, speed: f32, options: TweenOptions);

    /// Counts a text label from `from` to `to`.
    fn tween_text_number(
        &mut self,
        target: ContainerId,
        from: f32,
        to: f32,
        speed: f32,
        options: TweenOptions,
    );
}

//=========================================================================
// Tests
//=========================================================================
