//! Component F: the three-stage producer/converter/consumer pipeline —
//! decode, quantize, frame-diff encode — with ordered output reassembly.

pub mod jobs;
pub mod orchestrator;
pub mod queues;

pub use jobs::{ConvertJob, WriteJob};
pub use orchestrator::{choose_skip_frame, run, PipelineConfig};
pub use queues::{ConvertQueue, WriteQueue};
