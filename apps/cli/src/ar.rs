//! # AR Menu Overlay
//!
//! The marker-tracked 3D overlay is an external renderer. This module owns
//! what the host side needs from it: the static scene description, the
//! display state driven by renderer events, and gated still capture.
//!
//! ## Display State
//! ```text
//!            ArEvent::Ready
//!  Loading ────────────────► Ready ──── capture() allowed
//!     │                        │
//!     │ ArEvent::Error         │ ArEvent::Error
//!     ▼                        ▼
//!   Error ◄────────────────────┘        (terminal for this overlay)
//! ```

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

/// Compiled image-target file the tracker loads.
pub const IMAGE_TARGET_SOURCE: &str = "target/menu.mind";

// =============================================================================
// Scene Description
// =============================================================================

/// A 3-component transform value, rendered space-separated (`"90 0 0"`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Vec3 { x: v, y: v, z: v }
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// One tracked marker and the model shown on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArTarget {
    pub name: &'static str,
    pub model_asset: &'static str,
    pub scale: Vec3,
    pub rotation: Vec3,
    /// Index of the marker inside the image-target file.
    pub target_index: usize,
}

/// The printed menu: one marker, one model.
pub const MENU_TARGETS: &[ArTarget] = &[ArTarget {
    name: "Starter",
    model_asset: "models/pigglet.glb",
    scale: Vec3::splat(1.0),
    rotation: Vec3::new(90.0, 0.0, 0.0),
    target_index: 0,
}];

/// Serializable scene handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneManifest {
    pub image_target_src: String,
    pub assets: Vec<SceneAsset>,
    pub entities: Vec<SceneEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneAsset {
    pub id: String,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEntity {
    pub target_index: usize,
    pub model: String,
    pub scale: String,
    pub rotation: String,
    pub position: String,
}

impl SceneManifest {
    /// Builds the scene for `targets`. Asset ids follow target order.
    pub fn for_targets(targets: &[ArTarget]) -> Self {
        let assets = targets
            .iter()
            .enumerate()
            .map(|(i, t)| SceneAsset {
                id: format!("model-{}", i),
                src: t.model_asset.to_string(),
            })
            .collect();

        let entities = targets
            .iter()
            .enumerate()
            .map(|(i, t)| SceneEntity {
                target_index: t.target_index,
                model: format!("#model-{}", i),
                scale: t.scale.to_string(),
                rotation: t.rotation.to_string(),
                position: Vec3::splat(0.0).to_string(),
            })
            .collect();

        SceneManifest {
            image_target_src: IMAGE_TARGET_SOURCE.to_string(),
            assets,
            entities,
        }
    }
}

// =============================================================================
// Events, State, Errors
// =============================================================================

/// Signals from the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArEvent {
    Ready,
    Error(String),
}

/// What the host shows around the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArDisplayState {
    #[default]
    Loading,
    Ready,
    Error(String),
}

impl std::fmt::Display for ArDisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArDisplayState::Loading => write!(f, "loading"),
            ArDisplayState::Ready => write!(f, "ready"),
            ArDisplayState::Error(_) => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArError {
    /// Capture requested while the overlay is not ready.
    #[error("AR overlay is not ready (state: {0})")]
    NotReady(String),

    /// The renderer reported a tracking failure.
    #[error("AR tracking failed: {0}")]
    Tracking(String),

    /// The renderer could not produce a frame.
    #[error("Capture failed: {0}")]
    CaptureFailed(String),
}

/// Source of rendered frames, implemented by the renderer host.
pub trait FrameCapture {
    /// Returns the current composited frame as PNG bytes.
    fn capture_png(&mut self) -> Result<Vec<u8>, ArError>;
}

/// A captured still, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub file_name: String,
    pub png: Vec<u8>,
}

/// Capture file name for a capture taken at `epoch_ms`.
pub fn capture_file_name(epoch_ms: i64) -> String {
    format!("menu-ar-{}.png", epoch_ms)
}

// =============================================================================
// Overlay
// =============================================================================

/// Host-side view of one AR session.
#[derive(Debug, Clone, Default)]
pub struct ArOverlay {
    state: ArDisplayState,
}

impl ArOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ArDisplayState {
        &self.state
    }

    /// Applies a renderer event. Errors are terminal.
    pub fn handle(&mut self, event: ArEvent) -> &ArDisplayState {
        if matches!(self.state, ArDisplayState::Error(_)) {
            return &self.state;
        }

        match event {
            ArEvent::Ready => {
                info!("AR overlay ready");
                self.state = ArDisplayState::Ready;
            }
            ArEvent::Error(reason) => {
                error!(reason = %reason, "AR overlay failed");
                self.state = ArDisplayState::Error(reason);
            }
        }
        &self.state
    }

    /// Takes a still, only while `Ready`.
    pub fn capture(
        &self,
        source: &mut dyn FrameCapture,
        epoch_ms: i64,
    ) -> Result<Capture, ArError> {
        match &self.state {
            ArDisplayState::Ready => {}
            ArDisplayState::Error(reason) => return Err(ArError::Tracking(reason.clone())),
            other => return Err(ArError::NotReady(other.to_string())),
        }

        let png = source.capture_png()?;
        let file_name = capture_file_name(epoch_ms);
        info!(file = %file_name, bytes = png.len(), "AR still captured");
        Ok(Capture { file_name, png })
    }
}

// =============================================================================
// Rendered Frame File
// =============================================================================

/// Frame source for a renderer that writes its composited frame to a file.
#[derive(Debug, Clone)]
pub struct RenderedFrameFile {
    path: PathBuf,
}

impl RenderedFrameFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RenderedFrameFile { path: path.into() }
    }

    /// Renderer signal implied by the file: ready once a frame exists.
    pub fn event(&self) -> ArEvent {
        if self.path.is_file() {
            ArEvent::Ready
        } else {
            ArEvent::Error(format!("no rendered frame at {}", self.path.display()))
        }
    }
}

impl FrameCapture for RenderedFrameFile {
    fn capture_png(&mut self) -> Result<Vec<u8>, ArError> {
        std::fs::read(&self.path)
            .map_err(|e| ArError::CaptureFailed(format!("{}: {}", self.path.display(), e)))
    }
}
