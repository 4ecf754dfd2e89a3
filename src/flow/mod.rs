mod driver;
mod machine;

pub use driver::InterviewDriver;
pub use machine::{FlowOutcome, InterviewFlow, Phase, TimeoutFired};
