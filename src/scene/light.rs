//! Light types for the scene

use glam::{Vec3, Vec4};

/// Categories of light source.
///
/// The shadow subsystem treats spot lights like point lights: the cone only
/// matters for shading, not for silhouette extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    Point,
    Directional,
    Spot,
}

/// Point light emitting in all directions from a position
#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub radius: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Vec3::ONE,
            intensity: 1.0,
            radius: 10.0,
        }
    }
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec3, intensity: f32, radius: f32) -> Self {
        Self {
            position,
            color,
            intensity,
            radius,
        }
    }
}

/// Spot light emitting in a cone from a position
#[derive(Debug, Clone)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub radius: f32,
    pub inner_angle: f32, // radians
    pub outer_angle: f32, // radians
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: -Vec3::Y,
            color: Vec3::ONE,
            intensity: 1.0,
            radius: 10.0,
            inner_angle: 0.3,
            outer_angle: 0.5,
        }
    }
}

impl SpotLight {
    pub fn new(
        position: Vec3,
        direction: Vec3,
        color: Vec3,
        intensity: f32,
        radius: f32,
        inner_angle: f32,
        outer_angle: f32,
    ) -> Self {
        Self {
            position,
            direction: direction.normalize(),
            color,
            intensity,
            radius,
            inner_angle,
            outer_angle,
        }
    }
}

/// Directional light (like the sun)
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.5, -1.0, -0.5).normalize(),
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

impl DirectionalLight {
    pub fn new(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            direction: direction.normalize(),
            color,
            intensity,
        }
    }
}

/// A light source of any type
#[derive(Debug, Clone)]
pub enum Light {
    Point(PointLight),
    Spot(SpotLight),
    Directional(DirectionalLight),
}

impl Light {
    pub fn light_type(&self) -> LightType {
        match self {
            Light::Point(_) => LightType::Point,
            Light::Spot(_) => LightType::Spot,
            Light::Directional(_) => LightType::Directional,
        }
    }

    /// Pack this light into the 4-vector consumed by light-facing
    /// classification and vertex extrusion.
    ///
    /// Point and spot lights pack `(position, 1)`. Directional lights pack
    /// `(-direction, 0)`, the vector toward the infinitely distant source.
    /// Shadow consumers branch on `w == 0.0`, so the packing must be kept
    /// bit-for-bit stable.
    pub fn shadow_volume_vector(&self) -> Vec4 {
        match self {
            Light::Point(l) => l.position.extend(1.0),
            Light::Spot(l) => l.position.extend(1.0),
            Light::Directional(l) => (-l.direction).extend(0.0),
        }
    }
}
