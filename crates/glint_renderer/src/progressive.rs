//! Progressive render session: the accumulation buffer plus its step counter.

use std::fmt;

use crate::accumulator::AccumulationBuffer;
use crate::hittable::Hittable;
use crate::tile::{render_frame, DEFAULT_TILE_SIZE};
use glint_core::{FrameConfig, RenderSettings};
use glint_math::Vec3;

/// Why accumulated frames were thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    /// The scene layout was regenerated
    SceneRegenerated,
    /// A tunable setting changed
    SettingsChanged,
    /// The camera moved
    CameraMoved,
    /// The output resolution changed and the buffer was reallocated
    Resized,
}

impl fmt::Display for ResetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ResetReason::SceneRegenerated => "scene regenerated",
            ResetReason::SettingsChanged => "settings changed",
            ResetReason::CameraMoved => "camera moved",
            ResetReason::Resized => "resolution changed",
        };
        f.write_str(reason)
    }
}

/// Running average of frames since the last reset.
///
/// `step` is the index the next frame will be dispatched with; it starts at
/// 1 and is advanced once per [`Progressive::render`]. Resets happen under
/// `&mut self`, so no dispatch can observe a half-reset buffer.
#[derive(Debug, Clone)]
pub struct Progressive {
    buffer: AccumulationBuffer,
    step: u32,
    tile_size: u32,
}

impl Progressive {
    /// Create a session with a zeroed buffer.
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        Self {
            buffer: AccumulationBuffer::new(width, height),
            step: 1,
            tile_size: if tile_size == 0 { DEFAULT_TILE_SIZE } else { tile_size },
        }
    }

    /// Create a session sized for `settings`.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.width, settings.height, settings.tile_size)
    }

    /// Step the next frame will use.
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Frames accumulated since the last reset.
    pub fn frames(&self) -> u32 {
        self.step - 1
    }

    pub fn buffer(&self) -> &AccumulationBuffer {
        &self.buffer
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Snapshot the configuration for the next frame.
    pub fn frame_config(&self, settings: &RenderSettings, camera_position: Vec3) -> FrameConfig {
        let mut config = FrameConfig::new(settings, camera_position, self.step);
        config.image_width = self.buffer.width();
        config.image_height = self.buffer.height();
        config
    }

    /// Render one frame into the buffer and advance the step.
    ///
    /// Returns the configuration the frame was rendered with.
    pub fn render(&mut self, world: &dyn Hittable, settings: &RenderSettings, camera_position: Vec3) -> FrameConfig {
        let config = self.frame_config(settings, camera_position);
        render_frame(world, &config, &mut self.buffer, self.tile_size);
        self.step = self.step.saturating_add(1);
        config
    }

    /// Discard all accumulated frames: zero the buffer and restart at step 1.
    pub fn reset(&mut self, reason: ResetReason) {
        log::debug!("Reset after {} frames: {}", self.frames(), reason);
        self.buffer.clear();
        self.step = 1;
    }

    /// Reallocate the buffer for a new resolution. Always resets.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.buffer = AccumulationBuffer::new(width, height);
        self.reset(ResetReason::Resized);
    }

    /// Apply new settings, resizing or resetting as needed.
    ///
    /// Returns the reset that was issued, if any.
    pub fn apply_settings(&mut self, old: &RenderSettings, new: &RenderSettings) -> Option<ResetReason> {
        if new.tile_size != 0 {
            self.tile_size = new.tile_size;
        }
        if old.resolution_changed(new) {
            self.resize(new.width, new.height);
            Some(ResetReason::Resized)
        } else if old.requires_new_scene(new) {
            self.reset(ResetReason::SceneRegenerated);
            Some(ResetReason::SceneRegenerated)
        } else if old.requires_reset(new) {
            self.reset(ResetReason::SettingsChanged);
            Some(ResetReason::SettingsChanged)
        } else if old.camera_moved(new) {
            self.reset(ResetReason::CameraMoved);
            Some(ResetReason::CameraMoved)
        } else {
            None
        }
    }
}
