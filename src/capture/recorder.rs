use super::device::{AudioFrame, CaptureDevice};
use crate::error::{InterviewError, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

/// Capture lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Recording,
    Paused,
    Stopped,
}

/// One finished take: the WAV blob plus enough metadata to upload it
#[derive(Debug, Clone)]
pub struct RecordedTake {
    pub id: Uuid,
    pub bytes: Bytes,
    pub mime_type: String,
    pub duration_secs: f64,
    pub recorded_at: DateTime<Utc>,
}

impl RecordedTake {
    pub fn is_empty(&self) -> bool {
        self.duration_secs == 0.0
    }
}

#[derive(Default)]
struct CaptureBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

/// Buffers microphone frames into a single take.
///
/// The microphone stream is exclusively owned between `start` and `stop`;
/// `stop` releases the device task before finalizing the blob, so a new
/// `start` never races a previous stream. `stop` is idempotent: the call that
/// performs finalization returns the take, later calls return `None`.
pub struct MediaCapture {
    device: Arc<dyn CaptureDevice>,
    state: CaptureState,
    stop_signal: Arc<Notify>,
    paused: Arc<AtomicBool>,
    buffer: Arc<Mutex<CaptureBuffer>>,
    collector: Option<JoinHandle<()>>,
    elapsed_secs: u64,
}

impl MediaCapture {
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            state: CaptureState::Idle,
            stop_signal: Arc::new(Notify::new()),
            paused: Arc::new(AtomicBool::new(false)),
            buffer: Arc::new(Mutex::new(CaptureBuffer::default())),
            collector: None,
            elapsed_secs: 0,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Elapsed recording seconds, for display only. Independent of the
    /// answer time budget.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Advance the elapsed-recording counter by one second. Driven by the
    /// flow's shared tick source; counts only while recording and not paused.
    pub fn tick(&mut self) {
        if self.state == CaptureState::Recording {
            self.elapsed_secs += 1;
        }
    }

    /// Open the device and start buffering frames
    pub async fn start(&mut self) -> Result<()> {
        if matches!(self.state, CaptureState::Recording | CaptureState::Paused) {
            return Err(InterviewError::InvalidState("capture already running"));
        }

        let mut frames = self.device.open().await?;

        info!("Capture started on device: {}", self.device.name());

        {
            let mut buffer = self.buffer.lock().await;
            *buffer = CaptureBuffer::default();
        }
        self.elapsed_secs = 0;
        self.paused.store(false, Ordering::SeqCst);
        // A fresh signal per recording, so a permit left over from a stop
        // that raced a closed stream cannot leak into the next collector
        self.stop_signal = Arc::new(Notify::new());

        let paused = Arc::clone(&self.paused);
        let buffer = Arc::clone(&self.buffer);
        let stop = Arc::clone(&self.stop_signal);

        self.collector = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    frame = frames.recv() => {
                        let Some(frame) = frame else { break };
                        // Frames arriving while paused are dropped, not buffered
                        if paused.load(Ordering::SeqCst) {
                            continue;
                        }
                        let mut buffer = buffer.lock().await;
                        buffer.sample_rate = frame.sample_rate;
                        buffer.channels = frame.channels;
                        buffer.samples.extend_from_slice(&frame.samples);
                    }
                    _ = stop.notified() => break,
                }
            }
        }));

        self.state = CaptureState::Recording;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.state != CaptureState::Recording {
            return Err(InterviewError::InvalidState("not recording"));
        }
        self.paused.store(true, Ordering::SeqCst);
        self.state = CaptureState::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        if self.state != CaptureState::Paused {
            return Err(InterviewError::InvalidState("not paused"));
        }
        self.paused.store(false, Ordering::SeqCst);
        self.state = CaptureState::Recording;
        Ok(())
    }

    /// Stop capturing and finalize the buffered audio into one WAV blob.
    ///
    /// Safe to call in any state; a stop without an active recording is a
    /// no-op returning `None`.
    pub async fn stop(&mut self) -> Result<Option<RecordedTake>> {
        if !matches!(self.state, CaptureState::Recording | CaptureState::Paused) {
            return Ok(None);
        }

        // Wakes the collector even if the device stream is stalled with no
        // frame in flight; the permit is stored if it is not parked yet
        self.stop_signal.notify_one();

        if let Some(collector) = self.collector.take() {
            if let Err(e) = collector.await {
                warn!("Capture collector task failed: {}", e);
            }
        }

        self.state = CaptureState::Stopped;

        let buffer = self.buffer.lock().await;
        let take = encode_wav(&buffer)?;

        info!(
            "Capture stopped: {:.1}s buffered ({} bytes)",
            take.duration_secs,
            take.bytes.len()
        );

        Ok(Some(take))
    }
}

/// Encode buffered PCM into an in-memory WAV blob
fn encode_wav(buffer: &CaptureBuffer) -> Result<RecordedTake> {
    let sample_rate = if buffer.sample_rate == 0 { 16000 } else { buffer.sample_rate };
    let channels = if buffer.channels == 0 { 1 } else { buffer.channels };

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = match hound::WavWriter::new(&mut cursor, spec) {
            Ok(writer) => writer,
            Err(e) => {
                warn!("WAV writer creation failed: {}", e);
                return Err(InterviewError::InvalidState("WAV header write failed"));
            }
        };

        for &sample in &buffer.samples {
            if writer.write_sample(sample).is_err() {
                return Err(InterviewError::InvalidState("WAV sample write failed"));
            }
        }

        if writer.finalize().is_err() {
            return Err(InterviewError::InvalidState("WAV finalize failed"));
        }
    }

    let duration_secs = buffer.samples.len() as f64 / (sample_rate as f64 * channels as f64);

    Ok(RecordedTake {
        id: Uuid::new_v4(),
        bytes: Bytes::from(cursor.into_inner()),
        mime_type: "audio/wav".to_string(),
        duration_secs,
        recorded_at: Utc::now(),
    })
}
