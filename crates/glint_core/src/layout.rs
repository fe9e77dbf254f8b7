//! Randomized scene layout.
//!
//! Generates a ground sphere plus a field of small spheres resting on it,
//! placed so that no two of them overlap. Layout is a host concern: the
//! renderer only ever sees the finished [`Scene`].

use std::f32::consts::TAU;

use glint_math::{hsv_to_rgb, Color, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::{Material, MaterialKind, Scene, Sphere};

/// Errors that can occur during scene layout.
#[derive(Error, Debug, PartialEq)]
pub enum LayoutError {
    #[error("Scene needs at least {required} spheres, got {count}")]
    TooFewSpheres { count: usize, required: usize },

    #[error("Could not place sphere {index} without overlap after {attempts} attempts")]
    Crowded { index: usize, attempts: usize },
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Placement attempts per sphere before giving up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

/// Material table for random spheres. Diffuse kinds appear twice so they
/// are drawn more often.
const KIND_TABLE: [MaterialKind; 7] = [
    MaterialKind::Lambert,
    MaterialKind::Lambert,
    MaterialKind::LambertCheckerboard,
    MaterialKind::LambertCheckerboard,
    MaterialKind::Metal,
    MaterialKind::Dielectric,
    MaterialKind::Light,
];

/// Options for [`generate_scene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Total sphere count, ground included
    pub sphere_count: usize,
    /// Keep the large "sun" light at index 1
    pub include_sun: bool,
    /// RNG seed; `None` draws a fresh layout every time
    pub seed: Option<u64>,
    /// Radius of the disk the small spheres are scattered in
    pub field_radius: f32,
    /// X offset of the field's center
    pub field_offset_x: f32,
    /// Radius range of the small spheres
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            sphere_count: 75,
            include_sun: false,
            seed: None,
            field_radius: 15.0,
            field_offset_x: -6.0,
            min_radius: 0.5,
            max_radius: 1.0,
        }
    }
}

impl LayoutOptions {
    /// Index of the first randomly placed sphere.
    fn first_random_index(&self) -> usize {
        if self.include_sun {
            2
        } else {
            1
        }
    }
}

/// The ground: a huge sphere whose top touches y = 0.
pub fn ground() -> (Sphere, Material) {
    (
        Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0),
        Material::lambert(Color::splat(0.15)),
    )
}

/// The optional "sun": a large, very bright light off to the side.
pub fn sun() -> (Sphere, Material) {
    (
        Sphere::new(Vec3::new(10.0, 10.0, 0.0), 2.0),
        Material::light(Color::splat(800.0)),
    )
}

/// Generate a scene, seeding the RNG from `options.seed` (or entropy).
pub fn generate_scene(options: &LayoutOptions) -> LayoutResult<Scene> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_scene_with(options, &mut rng)
}

/// Generate a scene with the given RNG.
pub fn generate_scene_with<R: Rng>(options: &LayoutOptions, rng: &mut R) -> LayoutResult<Scene> {
    let first = options.first_random_index();
    if options.sphere_count < first {
        return Err(LayoutError::TooFewSpheres {
            count: options.sphere_count,
            required: first,
        });
    }

    let mut scene = Scene::with_capacity(options.sphere_count);
    let (sphere, material) = ground();
    scene.push(sphere, material);
    if options.include_sun {
        let (sphere, material) = sun();
        scene.push(sphere, material);
    }

    for index in first..options.sphere_count {
        let radius = if options.max_radius > options.min_radius {
            rng.gen_range(options.min_radius..options.max_radius)
        } else {
            options.min_radius
        };
        let sphere = place_sphere(&scene, options, radius, index, rng)?;
        let material = random_material(rng);
        scene.push(sphere, material);
    }

    log::info!(
        "Generated scene: {} spheres, {} lights",
        scene.len(),
        scene.light_count()
    );

    Ok(scene)
}

/// Rejection-sample a position that overlaps no previously placed sphere
/// (the ground excluded).
fn place_sphere<R: Rng>(
    scene: &Scene,
    options: &LayoutOptions,
    radius: f32,
    index: usize,
    rng: &mut R,
) -> LayoutResult<Sphere> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen::<f32>() * options.field_radius;
        let center = Vec3::new(
            angle.sin() * distance + options.field_offset_x,
            radius,
            angle.cos() * distance,
        );
        let candidate = Sphere::new(center, radius);

        let collides = scene.spheres()[1..].iter().any(|other| candidate.overlaps_xz(other));
        if !collides {
            return Ok(candidate);
        }
    }

    Err(LayoutError::Crowded {
        index,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

fn random_material<R: Rng>(rng: &mut R) -> Material {
    let kind = KIND_TABLE[rng.gen_range(0..KIND_TABLE.len())];
    let color = match kind {
        MaterialKind::Lambert | MaterialKind::LambertCheckerboard => {
            hsv_to_rgb(rng.gen_range(180.0..360.0), 0.9, 1.0) * 0.2
        }
        MaterialKind::Metal | MaterialKind::Dielectric => Color::splat(0.9),
        MaterialKind::Light => hsv_to_rgb(rng.gen_range(0.0..360.0), 0.2, 1.0) * 500.0,
    };
    Material::new(color, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> LayoutOptions {
        LayoutOptions {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_layout() {
        let scene = generate_scene(&seeded(1)).unwrap();

        assert_eq!(scene.len(), 75);
        assert_eq!(scene.spheres()[0], ground().0);
        assert_eq!(scene.materials()[0], ground().1);
    }

    #[test]
    fn test_small_spheres_rest_on_ground_without_overlap() {
        let scene = generate_scene(&seeded(2)).unwrap();
        let small = &scene.spheres()[1..];

        for (i, a) in small.iter().enumerate() {
            assert!(a.radius >= 0.5 && a.radius < 1.0);
            assert_eq!(a.center.y, a.radius);
            for b in &small[i + 1..] {
                assert!(!a.overlaps_xz(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_seed_is_deterministic() {
        assert_eq!(generate_scene(&seeded(42)).unwrap(), generate_scene(&seeded(42)).unwrap());
        assert_ne!(generate_scene(&seeded(42)).unwrap(), generate_scene(&seeded(43)).unwrap());
    }

    #[test]
    fn test_sun_kept_at_index_one() {
        let options = LayoutOptions {
            include_sun: true,
            ..seeded(3)
        };
        let scene = generate_scene(&options).unwrap();

        assert_eq!(scene.len(), 75);
        assert_eq!(scene.spheres()[1], sun().0);
        assert_eq!(scene.materials()[1].kind, MaterialKind::Light);
        // Nothing may be placed on top of the sun's footprint
        for sphere in &scene.spheres()[2..] {
            assert!(!sphere.overlaps_xz(&sun().0));
        }
    }

    #[test]
    fn test_material_colors_follow_kind() {
        let scene = generate_scene(&seeded(4)).unwrap();

        for material in &scene.materials()[1..] {
            match material.kind {
                MaterialKind::Lambert | MaterialKind::LambertCheckerboard => {
                    assert!(material.color.max_element() <= 0.2 + 1e-5);
                }
                MaterialKind::Metal | MaterialKind::Dielectric => {
                    assert_eq!(material.color, Color::splat(0.9));
                }
                MaterialKind::Light => {
                    assert!((material.color.max_element() - 500.0).abs() < 1e-2);
                }
            }
        }
    }

    #[test]
    fn test_too_few_spheres() {
        let options = LayoutOptions {
            sphere_count: 1,
            include_sun: true,
            ..seeded(5)
        };
        assert_eq!(
            generate_scene(&options),
            Err(LayoutError::TooFewSpheres { count: 1, required: 2 })
        );

        let ground_only = LayoutOptions {
            sphere_count: 1,
            ..seeded(5)
        };
        assert_eq!(generate_scene(&ground_only).unwrap().len(), 1);
    }

    #[test]
    fn test_crowded_field_fails() {
        let options = LayoutOptions {
            sphere_count: 50,
            field_radius: 0.5,
            ..seeded(6)
        };
        assert!(matches!(generate_scene(&options), Err(LayoutError::Crowded { .. })));
    }
}
