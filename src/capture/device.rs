use crate::error::Result;
use tokio::sync::mpsc;

/// PCM audio delivered by a capture device (16-bit, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}

/// Microphone capture seam.
///
/// Platform integrations implement this against whatever recording primitive
/// the host provides; `FixtureDevice` feeds canned frames for tests and
/// offline runs. Opening the device is the point where a permission prompt
/// can fail, surfaced as `PermissionDenied`.
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Open the microphone and start delivering frames.
    ///
    /// The returned channel closes when the device stream ends.
    async fn open(&self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Device name for logging
    fn name(&self) -> &str;
}

/// Capture device that replays a fixed set of frames, then closes
pub struct FixtureDevice {
    frames: Vec<AudioFrame>,
}

impl FixtureDevice {
    pub fn new(frames: Vec<AudioFrame>) -> Self {
        Self { frames }
    }

    /// Frames of silence totalling `secs` seconds of 16kHz mono audio
    pub fn silence(secs: u64) -> Self {
        let frames = (0..secs * 10)
            .map(|_| AudioFrame {
                samples: vec![0i16; 1600], // 100ms at 16kHz mono
                sample_rate: 16000,
                channels: 1,
            })
            .collect();
        Self::new(frames)
    }
}

#[async_trait::async_trait]
impl CaptureDevice for FixtureDevice {
    async fn open(&self) -> Result<mpsc::Receiver<AudioFrame>> {
        let (tx, rx) = mpsc::channel(64);
        let frames = self.frames.clone();

        tokio::spawn(async move {
            for frame in frames {
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

/// Capture device that always refuses access, for exercising the
/// permission-denied path
pub struct DeniedDevice;

#[async_trait::async_trait]
impl CaptureDevice for DeniedDevice {
    async fn open(&self) -> Result<mpsc::Receiver<AudioFrame>> {
        Err(crate::error::InterviewError::PermissionDenied(
            "user declined microphone access".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "denied"
    }
}
