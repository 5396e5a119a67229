//! The surface a host 3D engine provides to the interactive layer.

use glam::DVec2;
use terrascope_core::{PickResult, Ray};

/// Picking queries answered by the host engine.
pub trait Scene {
    /// Returns up to `limit` objects under a screen position, topmost first.
    fn drill_pick(&self, position: DVec2, limit: usize) -> Vec<PickResult>;

    /// Returns the camera ray through a screen position in ECEF coordinates.
    fn pick_ray(&self, position: DVec2) -> Option<Ray>;
}

/// Enable flags of the host's screen-space camera controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraInputs {
    pub enable_translate: bool,
    pub enable_rotate: bool,
    pub enable_tilt: bool,
    pub enable_zoom: bool,
    pub enable_look: bool,
    pub inertia_enabled: bool,
}

impl Default for CameraInputs {
    fn default() -> Self {
        Self {
            enable_translate: true,
            enable_rotate: true,
            enable_tilt: true,
            enable_zoom: true,
            enable_look: true,
            inertia_enabled: true,
        }
    }
}

impl CameraInputs {
    /// Enables or disables every navigation gesture. Inertia is left alone.
    pub fn set_all(&mut self, enabled: bool) {
        self.enable_translate = enabled;
        self.enable_rotate = enabled;
        self.enable_tilt = enabled;
        self.enable_zoom = enabled;
        self.enable_look = enabled;
    }

    /// Returns true if every navigation gesture is enabled.
    pub fn all_enabled(&self) -> bool {
        self.enable_translate
            && self.enable_rotate
            && self.enable_tilt
            && self.enable_zoom
            && self.enable_look
    }

    /// Returns true if no navigation gesture is enabled.
    pub fn all_disabled(&self) -> bool {
        !(self.enable_translate
            || self.enable_rotate
            || self.enable_tilt
            || self.enable_zoom
            || self.enable_look)
    }
}

/// Modifier keys held during a pointer event.
///
/// Input bindings carry a set of modifiers as their qualifier; an event
/// triggers a binding only when exactly those keys are held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };
}

/// Pointer event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Down,
    Up,
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: DVec2,
    pub kind: PointerKind,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: DVec2) -> Self {
        Self {
            position,
            kind,
            modifiers: Modifiers::default(),
        }
    }

    pub fn moved(position: DVec2) -> Self {
        Self::new(PointerKind::Move, position)
    }

    pub fn down(position: DVec2) -> Self {
        Self::new(PointerKind::Down, position)
    }

    pub fn up(position: DVec2) -> Self {
        Self::new(PointerKind::Up, position)
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
