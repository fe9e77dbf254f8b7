//! Glint Core - Scene and frame configuration for the progressive path tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Sphere`, `Material`, `MaterialKind`
//! - **Frame configuration**: `FrameConfig` snapshots and `RenderSettings`
//! - **Scene layout**: randomized, non-overlapping sphere placement
//! - **Settings reload**: swap-on-success polling of a settings file
//!
//! # Example
//!
//! ```ignore
//! use glint_core::{layout::generate_scene, RenderSettings};
//!
//! let settings = RenderSettings::load("glint.json")?;
//! let scene = generate_scene(&settings.layout)?;
//! println!("{} spheres, {} lights", scene.len(), scene.light_count());
//! ```

pub mod config;
pub mod layout;
pub mod reload;
pub mod scene;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, FrameConfig, RenderSettings};
pub use layout::{generate_scene, LayoutError, LayoutOptions, LayoutResult};
pub use reload::SettingsWatcher;
pub use scene::{Material, MaterialKind, Scene, Sphere};
