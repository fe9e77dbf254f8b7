//! `glint` - headless progressive renderer.
//!
//! Renders a randomized sphere field for a fixed number of frames, folding
//! every frame into a running average, and writes the converged image.

mod output;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use glint_core::{generate_scene, ConfigResult, LayoutOptions, RenderSettings, Scene, SettingsWatcher};
use glint_renderer::{Progressive, ResetReason};

/// Command line options.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Options {
    /// Settings file (JSON). Reloaded whenever it changes on disk.
    #[arg(long, short = 's', value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Number of frames to accumulate.
    #[arg(long, short = 'n', value_name = "NUM", default_value_t = 64)]
    frames: u32,

    /// Output image; `.exr` and `.hdr` are written as 32-bit float.
    #[arg(long, short = 'o', value_name = "FILE", default_value = "glint.png")]
    output: PathBuf,

    /// Also write a numbered snapshot every NUM frames.
    #[arg(long, value_name = "NUM")]
    snapshot_every: Option<u32>,

    /// Scene layout seed.
    #[arg(long, value_name = "NUM")]
    seed: Option<u64>,

    /// Add the large sun light to the scene.
    #[arg(long)]
    sun: bool,

    /// Orbit azimuth change per frame in radians. Every move restarts accumulation.
    #[arg(long, value_name = "RADIANS", default_value_t = 0.0, allow_negative_numbers = true)]
    orbit_step: f32,

    /// Regenerate the scene layout every NUM frames.
    #[arg(long, value_name = "NUM")]
    regenerate_every: Option<u32>,

    /// Worker threads for rendering (defaults to all cores).
    #[arg(long, short = 't', value_name = "NUM")]
    threads: Option<usize>,

    /// Override the image width.
    #[arg(long, value_name = "PIXELS")]
    width: Option<u32>,

    /// Override the image height.
    #[arg(long, value_name = "PIXELS")]
    height: Option<u32>,

    /// Write the default settings to FILE and exit.
    #[arg(long, value_name = "FILE")]
    write_settings: Option<PathBuf>,
}

impl Options {
    /// Apply command line overrides on top of file settings.
    fn apply(&self, mut settings: RenderSettings) -> ConfigResult<RenderSettings> {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(seed) = self.seed {
            settings.layout.seed = Some(seed);
        }
        if self.sun {
            settings.layout.include_sun = true;
        }
        settings.validated()
    }

    /// True if frame `frame` (1-based) starts with a regenerated scene.
    fn regenerates_at(&self, frame: u32) -> bool {
        match self.regenerate_every {
            Some(n) if n > 0 => frame > 1 && (frame - 1) % n == 0,
            _ => false,
        }
    }

    /// True if a snapshot is due after frame `frame`.
    fn snapshot_at(&self, frame: u32) -> bool {
        match self.snapshot_every {
            Some(n) if n > 0 => frame % n == 0 && frame < self.frames,
            _ => false,
        }
    }
}

/// Generate a scene, varying a fixed seed by generation so regenerations differ.
fn build_scene(layout: &LayoutOptions, generation: u64) -> Result<Scene> {
    let options = LayoutOptions {
        seed: layout.seed.map(|seed| seed.wrapping_add(generation)),
        ..layout.clone()
    };
    generate_scene(&options).context("Failed to generate scene layout")
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let options = Options::parse();

    if let Some(path) = &options.write_settings {
        RenderSettings::default()
            .save(path)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        log::info!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    if let Some(threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    // Settings as read from disk, before command line overrides
    let mut file_settings = match &options.settings {
        Some(path) => {
            RenderSettings::load(path).with_context(|| format!("Failed to load settings from {}", path.display()))?
        }
        None => RenderSettings::default(),
    };
    let mut settings = options.apply(file_settings.clone()).context("Invalid settings")?;
    let mut watcher = options.settings.as_ref().map(SettingsWatcher::new);

    log::info!(
        "Starting Glint: {}x{}, {} frames, {} threads",
        settings.width,
        settings.height,
        options.frames,
        rayon::current_num_threads()
    );

    let mut generation = 0;
    let mut scene = build_scene(&settings.layout, generation)?;
    let mut orbit = settings.orbit;
    let mut session = Progressive::from_settings(&settings);
    let started = Instant::now();

    for frame in 1..=options.frames {
        if let Some(watcher) = watcher.as_mut() {
            if let Some(previous_file) = watcher.reload_into(&mut file_settings) {
                match options.apply(file_settings.clone()) {
                    Ok(new) => {
                        if let Some(reason) = session.apply_settings(&settings, &new) {
                            log::info!("Reset: {}", reason);
                        }
                        if settings.requires_new_scene(&new) {
                            generation = 0;
                            scene = build_scene(&new.layout, generation)?;
                        }
                        if settings.camera_moved(&new) {
                            orbit = new.orbit;
                        }
                        settings = new;
                    }
                    Err(e) => {
                        log::warn!("Keeping previous settings: {}", e);
                        file_settings = previous_file;
                    }
                }
            }
        }

        if options.regenerates_at(frame) {
            generation += 1;
            scene = build_scene(&settings.layout, generation)?;
            session.reset(ResetReason::SceneRegenerated);
            log::info!("Reset: {}", ResetReason::SceneRegenerated);
        }

        if options.orbit_step != 0.0 && frame > 1 {
            orbit.rotate(options.orbit_step, 0.0);
            session.reset(ResetReason::CameraMoved);
        }

        let frame_start = Instant::now();
        let config = session.render(&scene, &settings, orbit.position());
        log::debug!("Frame {} (step {}) in {:.2?}", frame, config.step, frame_start.elapsed());

        if frame % 16 == 0 || frame == options.frames {
            log::info!(
                "Frame {}/{}, {} accumulated, {:.2?} elapsed",
                frame,
                options.frames,
                session.frames(),
                started.elapsed()
            );
        }

        if options.snapshot_at(frame) {
            output::write_image(session.buffer(), &output::snapshot_path(&options.output, frame))?;
        }
    }

    output::write_image(session.buffer(), &options.output)?;
    log::info!("Done in {:.2?}", started.elapsed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Options {
        Options::parse_from(std::iter::once("glint").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let options = parse(&[]);
        assert_eq!(options.frames, 64);
        assert_eq!(options.output, PathBuf::from("glint.png"));
        assert_eq!(options.orbit_step, 0.0);
        assert!(!options.sun);
    }

    #[test]
    fn test_overrides_apply() {
        let options = parse(&["--width", "320", "--height", "64", "--seed", "7", "--sun"]);
        let settings = options.apply(RenderSettings::default()).unwrap();

        assert_eq!((settings.width, settings.height), (320, 64));
        assert_eq!(settings.layout.seed, Some(7));
        assert!(settings.layout.include_sun);
    }

    #[test]
    fn test_invalid_override_rejected() {
        // 100 is not a multiple of the default tile size
        let options = parse(&["--width", "100"]);
        assert!(options.apply(RenderSettings::default()).is_err());
    }

    #[test]
    fn test_negative_orbit_step() {
        let options = parse(&["--orbit-step", "-0.05"]);
        assert_eq!(options.orbit_step, -0.05);
    }

    #[test]
    fn test_schedules() {
        let options = parse(&["--frames", "8", "--regenerate-every", "3", "--snapshot-every", "4"]);

        let regenerated: Vec<u32> = (1..=8).filter(|f| options.regenerates_at(*f)).collect();
        assert_eq!(regenerated, vec![4, 7]);

        // The last frame is written as the final output instead
        let snapshots: Vec<u32> = (1..=8).filter(|f| options.snapshot_at(*f)).collect();
        assert_eq!(snapshots, vec![4]);
    }

    #[test]
    fn test_build_scene_varies_by_generation() {
        let layout = LayoutOptions {
            sphere_count: 8,
            seed: Some(1),
            ..LayoutOptions::default()
        };
        let a = build_scene(&layout, 0).unwrap();
        let b = build_scene(&layout, 0).unwrap();
        let c = build_scene(&layout, 1).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
