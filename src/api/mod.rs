mod client;
mod types;

pub use client::{ApiClient, ALREADY_IN_QUEUE_OR_DONE};
pub use types::*;
