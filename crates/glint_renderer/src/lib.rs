//! Glint Renderer - progressive CPU path tracing.
//!
//! A Monte Carlo path tracer over a fixed set of analytic spheres. Each
//! frame shades every pixel with [`SAMPLES_PER_PIXEL`] paths, tone maps the
//! mean and folds it into a running average, so the image converges as
//! frames accumulate.
//!
//! All randomness comes from a stateless integer hash ([`Sampler`]), which
//! makes a frame a pure function of its [`FrameConfig`](glint_core::FrameConfig),
//! the scene, and the previous buffer contents.
//!
//! # Example
//!
//! ```ignore
//! use glint_core::{generate_scene, RenderSettings};
//! use glint_renderer::Progressive;
//!
//! let settings = RenderSettings::default();
//! let scene = generate_scene(&settings.layout)?;
//! let mut session = Progressive::from_settings(&settings);
//! for _ in 0..16 {
//!     session.render(&scene, &settings, settings.orbit.position());
//! }
//! let rgba = session.buffer().to_rgba8();
//! ```

mod accumulator;
mod camera;
mod hittable;
mod material;
mod progressive;
mod renderer;
mod sampler;
mod sphere;
mod tile;
mod tonemap;

pub use accumulator::{accumulate, AccumulationBuffer};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable};
pub use material::{checker, reflect, reflectance, refract, scatter, ScatterEvent, CHECKER_FREQUENCY};
pub use progressive::{Progressive, ResetReason};
pub use renderer::{
    ray_color, render_pixel, shade_pixel, trace_path, PathSample, Termination, MAX_BOUNCES, SAMPLES_PER_PIXEL,
};
pub use sampler::{random, stream, wang_hash, Sampler, RANDOM_RESOLUTION};
pub use sphere::{hit_distance, sphere_uv, HIT_EPSILON};
pub use tile::{generate_tiles, render_frame, render_tile, Tile, TileResult, DEFAULT_TILE_SIZE};
pub use tonemap::{color_to_rgba, linear_to_gamma, tone_map};

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Color, Interval, Ray, Vec3};
