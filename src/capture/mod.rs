mod device;
mod recorder;

pub use device::{AudioFrame, CaptureDevice, DeniedDevice, FixtureDevice};
pub use recorder::{CaptureState, MediaCapture, RecordedTake};
