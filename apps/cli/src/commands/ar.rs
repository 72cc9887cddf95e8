//! # AR Commands
//!
//! Host side of the menu overlay: hand the scene to the renderer, feed
//! back its events, save stills.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::ar::{
    ArDisplayState, ArError, ArEvent, ArOverlay, FrameCapture, RenderedFrameFile, SceneManifest,
    MENU_TARGETS,
};
use crate::error::ApiError;

/// Scene for the printed menu.
pub fn menu_scene() -> SceneManifest {
    SceneManifest::for_targets(MENU_TARGETS)
}

/// Applies a renderer event and returns the resulting display state.
pub fn apply_ar_event(overlay: &mut ArOverlay, event: ArEvent) -> ArDisplayState {
    debug!(?event, "apply_ar_event command");
    overlay.handle(event).clone()
}

/// Captures the current frame into `dir`.
///
/// ## Returns
/// Path of the written `menu-ar-<epoch ms>.png`.
pub async fn capture_still(
    overlay: &ArOverlay,
    source: &mut dyn FrameCapture,
    dir: &Path,
) -> Result<PathBuf, ApiError> {
    let capture = overlay.capture(source, Utc::now().timestamp_millis())?;
    let path = dir.join(&capture.file_name);

    tokio::fs::write(&path, &capture.png)
        .await
        .map_err(|e| ArError::CaptureFailed(format!("{}: {}", path.display(), e)))?;

    info!(path = %path.display(), "AR still saved");
    Ok(path)
}

/// Saves the frame the renderer wrote to `frame` into `dir`.
///
/// A missing frame puts the overlay in its error state, so nothing is
/// written and `AR_ERROR` comes back.
pub async fn capture_frame(frame: &Path, dir: &Path) -> Result<PathBuf, ApiError> {
    let mut source = RenderedFrameFile::new(frame);
    let mut overlay = ArOverlay::new();
    apply_ar_event(&mut overlay, source.event());

    capture_still(&overlay, &mut source, dir).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    struct StillFrame;

    impl FrameCapture for StillFrame {
        fn capture_png(&mut self) -> Result<Vec<u8>, ArError> {
            Ok(b"\x89PNG\r\n".to_vec())
        }
    }

    #[test]
    fn test_menu_scene_serializes_for_renderer() {
        let json = serde_json::to_value(menu_scene()).unwrap();
        assert_eq!(json["imageTargetSrc"], "target/menu.mind");
        assert_eq!(json["entities"][0]["targetIndex"], 0);
        assert_eq!(json["entities"][0]["rotation"], "90 0 0");
    }

    #[tokio::test]
    async fn test_capture_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut overlay = ArOverlay::new();
        assert_eq!(apply_ar_event(&mut overlay, ArEvent::Ready), ArDisplayState::Ready);

        let path = capture_still(&overlay, &mut StillFrame, dir.path())
            .await
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("menu-ar-") && name.ends_with(".png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG\r\n");
    }

    #[tokio::test]
    async fn test_capture_refused_before_ready() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = ArOverlay::new();

        let err = capture_still(&overlay, &mut StillFrame, dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ArError);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_capture_frame_from_renderer_file() {
        let frames = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let frame = frames.path().join("frame.png");
        std::fs::write(&frame, b"\x89PNG\r\n").unwrap();

        let path = capture_frame(&frame, out.path()).await.unwrap();

        assert_eq!(path.parent(), Some(out.path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG\r\n");
    }

    #[tokio::test]
    async fn test_capture_frame_without_frame() {
        let out = tempfile::tempdir().unwrap();

        let err = capture_frame(&out.path().join("missing.png"), out.path())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ArError);
        assert!(err.message.contains("no rendered frame"));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
