//! Scene types for Glint.
//!
//! A scene is a fixed set of analytic spheres, each paired 1:1 by index with
//! a material. Scenes are immutable for the duration of a render epoch and
//! are replaced wholesale when the host regenerates the layout.

use glint_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// The closed set of surface behaviors.
///
/// The discriminants match the tags used by the kernel's packed material
/// layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum MaterialKind {
    /// Ideal diffuse reflector
    Lambert = 0,
    /// Diffuse reflector modulated by a UV checkerboard
    LambertCheckerboard = 1,
    /// Mirror reflector with global roughness
    Metal = 2,
    /// Glass: Fresnel-weighted reflection/refraction
    Dielectric = 3,
    /// Emitter; terminates paths
    Light = 4,
}

impl MaterialKind {
    /// All kinds in tag order.
    pub const ALL: [MaterialKind; 5] = [
        MaterialKind::Lambert,
        MaterialKind::LambertCheckerboard,
        MaterialKind::Metal,
        MaterialKind::Dielectric,
        MaterialKind::Light,
    ];

    /// Integer tag of this kind.
    pub fn tag(self) -> u32 {
        self as u32
    }

    /// Kind for an integer tag, if it names one.
    pub fn from_tag(tag: u32) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// True for the diffuse kinds.
    pub fn is_diffuse(self) -> bool {
        matches!(self, MaterialKind::Lambert | MaterialKind::LambertCheckerboard)
    }
}

/// Surface material: albedo (or emission for lights) plus behavior.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Albedo for reflectors, emitted radiance for lights
    pub color: Color,
    pub kind: MaterialKind,
}

impl Material {
    /// Create a new material.
    pub fn new(color: Color, kind: MaterialKind) -> Self {
        Self { color, kind }
    }

    pub fn lambert(color: Color) -> Self {
        Self::new(color, MaterialKind::Lambert)
    }

    pub fn checkerboard(color: Color) -> Self {
        Self::new(color, MaterialKind::LambertCheckerboard)
    }

    pub fn metal(color: Color) -> Self {
        Self::new(color, MaterialKind::Metal)
    }

    pub fn dielectric(color: Color) -> Self {
        Self::new(color, MaterialKind::Dielectric)
    }

    pub fn light(emission: Color) -> Self {
        Self::new(emission, MaterialKind::Light)
    }

    /// True if the material emits light.
    pub fn is_emissive(&self) -> bool {
        self.kind == MaterialKind::Light
    }
}

/// An analytic sphere primitive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// True if the two spheres' footprints on the ground (XZ) plane overlap.
    pub fn overlaps_xz(&self, other: &Sphere) -> bool {
        let d = glint_math::Vec2::new(self.center.x - other.center.x, self.center.z - other.center.z);
        d.length() < self.radius + other.radius
    }
}

/// Spheres and their materials as two parallel arrays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    spheres: Vec<Sphere>,
    materials: Vec<Material>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene with room for `capacity` spheres.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            spheres: Vec::with_capacity(capacity),
            materials: Vec::with_capacity(capacity),
        }
    }

    /// Add a sphere and its material. Returns the sphere index.
    pub fn push(&mut self, sphere: Sphere, material: Material) -> usize {
        self.spheres.push(sphere);
        self.materials.push(material);
        self.spheres.len() - 1
    }

    /// Builder-style [`Scene::push`].
    pub fn with(mut self, sphere: Sphere, material: Material) -> Self {
        self.push(sphere, material);
        self
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Iterate over `(sphere, material)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&Sphere, &Material)> {
        self.spheres.iter().zip(self.materials.iter())
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Number of emissive spheres.
    pub fn light_count(&self) -> usize {
        self.materials.iter().filter(|m| m.is_emissive()).count()
    }

    /// Number of spheres of the given kind.
    pub fn count_of(&self, kind: MaterialKind) -> usize {
        self.materials.iter().filter(|m| m.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_tags() {
        for (i, kind) in MaterialKind::ALL.iter().enumerate() {
            assert_eq!(kind.tag(), i as u32);
            assert_eq!(MaterialKind::from_tag(i as u32), Some(*kind));
        }
        assert_eq!(MaterialKind::from_tag(5), None);
        assert_eq!(MaterialKind::Dielectric.tag(), 3);
    }

    #[test]
    fn test_material_kind_predicates() {
        assert!(MaterialKind::Lambert.is_diffuse());
        assert!(MaterialKind::LambertCheckerboard.is_diffuse());
        assert!(!MaterialKind::Metal.is_diffuse());
        assert!(Material::light(Color::splat(500.0)).is_emissive());
        assert!(!Material::metal(Color::splat(0.9)).is_emissive());
    }

    #[test]
    fn test_scene_parallel_arrays() {
        let scene = Scene::new()
            .with(
                Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0),
                Material::lambert(Color::splat(0.15)),
            )
            .with(Sphere::new(Vec3::new(1.0, 1.0, 0.0), 1.0), Material::light(Color::splat(10.0)));

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.spheres().len(), scene.materials().len());
        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.count_of(MaterialKind::Lambert), 1);

        let (sphere, material) = scene.iter().nth(1).unwrap();
        assert_eq!(sphere.radius, 1.0);
        assert_eq!(material.kind, MaterialKind::Light);
    }

    #[test]
    fn test_sphere_overlap_xz() {
        let a = Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0);
        let b = Sphere::new(Vec3::new(1.5, 0.5, 0.0), 0.6);
        let c = Sphere::new(Vec3::new(3.0, 0.5, 0.0), 0.6);

        assert!(a.overlaps_xz(&b));
        assert!(!a.overlaps_xz(&c));
        // Height is ignored
        let high = Sphere::new(Vec3::new(0.0, 50.0, 0.0), 0.5);
        assert!(a.overlaps_xz(&high));
    }

    #[test]
    fn test_negative_radius_clamped() {
        assert_eq!(Sphere::new(Vec3::ZERO, -2.0).radius, 0.0);
    }
}
