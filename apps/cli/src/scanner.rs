//! # Barcode Scanner
//!
//! The live barcode source. The app never decodes images itself: a
//! [`BarcodeDecoder`] owns the device and reports exactly two kinds of
//! events, a decoded text or a failed frame.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ScannerSession                                     │
//! │                                                                         │
//! │   new(decoder) ──► start(config) ──┬── Err ──► stop() ──► retry?       │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                              next_code()                                │
//! │                                    │                                    │
//! │        Failed(reason) ◄────────────┤  (ignored, keep reading)          │
//! │                                    │                                    │
//! │        Decoded(text) ──► stop() ──► Ok(text)                           │
//! │        channel closed ──► stop() ──► Err(Closed(last reason))          │
//! │        session dropped ──► stop()                                      │
//! │                                                                         │
//! │   The device is released on every one of these paths.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

// =============================================================================
// Configuration
// =============================================================================

/// Which camera to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Rear camera.
    #[default]
    Environment,
    /// Front camera.
    User,
}

/// Capture parameters handed to the decoder.
///
/// ## Configuration File Section
/// ```toml
/// [scanner]
/// fps = 10
/// scan_box = 250
/// aspect_ratio = 1.0
/// facing = "environment"
/// device = "/dev/ttyACM0"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Decode attempts per second.
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Side of the square scan box, in pixels.
    #[serde(default = "default_scan_box")]
    pub scan_box: u32,

    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,

    #[serde(default)]
    pub facing: Facing,

    /// Serial or HID scanner that emits one decoded code per line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<PathBuf>,
}

fn default_fps() -> u32 {
    10
}

fn default_scan_box() -> u32 {
    250
}

fn default_aspect_ratio() -> f64 {
    1.0
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            fps: default_fps(),
            scan_box: default_scan_box(),
            aspect_ratio: default_aspect_ratio(),
            facing: Facing::default(),
            device: None,
        }
    }
}

// =============================================================================
// Events & Errors
// =============================================================================

/// What a decoder reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A barcode was read.
    Decoded(String),
    /// A frame could not be decoded. Expected and frequent.
    Failed(String),
}

/// Scanner failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScannerError {
    /// The device could not be acquired. Retry is allowed.
    #[error("Could not start camera: {0}")]
    StartFailed(String),

    /// The decoder went away before producing a code. Carries the last
    /// failure it reported, if any.
    #[error("Scanner closed before a barcode was read{}", closed_reason(.0))]
    Closed(Option<String>),
}

fn closed_reason(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(": {}", r))
        .unwrap_or_default()
}

// =============================================================================
// Decoder Contract
// =============================================================================

/// A barcode decoder bound to a capture device.
#[async_trait]
pub trait BarcodeDecoder: Send {
    /// Acquires the device and starts emitting events on `events`.
    async fn start(
        &mut self,
        config: &ScannerConfig,
        events: mpsc::Sender<ScanEvent>,
    ) -> Result<(), ScannerError>;

    /// Releases the device. Must be safe to call when not started.
    fn stop(&mut self);
}

/// Scoped scanner use: guarantees `stop` on every exit path.
pub struct ScannerSession<D: BarcodeDecoder> {
    decoder: D,
    events: Option<mpsc::Receiver<ScanEvent>>,
    running: bool,
}

impl<D: BarcodeDecoder> ScannerSession<D> {
    pub fn new(decoder: D) -> Self {
        ScannerSession {
            decoder,
            events: None,
            running: false,
        }
    }

    /// Starts the decoder. On failure the device is released and the
    /// session can be started again.
    pub async fn start(&mut self, config: &ScannerConfig) -> Result<(), ScannerError> {
        if self.running {
            return Ok(());
        }

        let (tx, rx) = mpsc::channel(16);
        match self.decoder.start(config, tx).await {
            Ok(()) => {
                info!(fps = config.fps, facing = ?config.facing, "Scanner started");
                self.events = Some(rx);
                self.running = true;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Scanner failed to start");
                self.decoder.stop();
                Err(e)
            }
        }
    }

    /// Waits for the next decoded barcode, then stops the decoder.
    ///
    /// Failed frames are skipped. The last failure is kept for the error
    /// returned if the decoder closes.
    pub async fn next_code(&mut self) -> Result<String, ScannerError> {
        let Some(events) = self.events.as_mut() else {
            return Err(ScannerError::Closed(None));
        };

        let mut last_failure = None;
        loop {
            match events.recv().await {
                Some(ScanEvent::Decoded(text)) => {
                    debug!(text = %text, "Barcode decoded");
                    self.close();
                    return Ok(text);
                }
                Some(ScanEvent::Failed(reason)) => {
                    trace!(reason = %reason, "Frame not decoded");
                    last_failure = Some(reason);
                }
                None => {
                    self.close();
                    return Err(ScannerError::Closed(last_failure));
                }
            }
        }
    }

    /// Whether the device is currently held.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stops the decoder if it is running.
    pub fn close(&mut self) {
        if self.running {
            self.decoder.stop();
            self.running = false;
            self.events = None;
            debug!("Scanner stopped");
        }
    }
}

impl<D: BarcodeDecoder> Drop for ScannerSession<D> {
    fn drop(&mut self) {
        self.close();
    }
}

// =============================================================================
// Serial Line Decoder
// =============================================================================

/// Decoder for hardware scanners that present as a serial/HID line device
/// and type one barcode per line.
#[derive(Debug, Default)]
pub struct SerialLineDecoder {
    device: Option<PathBuf>,
    reader: Option<JoinHandle<()>>,
}

impl SerialLineDecoder {
    /// Reads from `device`, overriding the configured one.
    pub fn new(device: Option<PathBuf>) -> Self {
        SerialLineDecoder {
            device,
            reader: None,
        }
    }
}

#[async_trait]
impl BarcodeDecoder for SerialLineDecoder {
    async fn start(
        &mut self,
        config: &ScannerConfig,
        events: mpsc::Sender<ScanEvent>,
    ) -> Result<(), ScannerError> {
        let path = self
            .device
            .clone()
            .or_else(|| config.device.clone())
            .ok_or_else(|| ScannerError::StartFailed("no scanner device configured".into()))?;

        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| ScannerError::StartFailed(format!("{}: {}", path.display(), e)))?;

        info!(device = %path.display(), "Reading barcodes from device");

        self.reader = Some(tokio::spawn(async move {
            let mut lines = BufReader::new(file).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let text = line.trim();
                        if text.is_empty() {
                            continue;
                        }
                        if events.send(ScanEvent::Decoded(text.to_string())).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        let _ = events.send(ScanEvent::Failed(e.to_string())).await;
                        break;
                    }
                }
            }
        }));

        Ok(())
    }

    fn stop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
