//! Frame-level processing: the `FrameSource` boundary contract (component
//! external interface), the per-frame quantize+dither mapper (component D),
//! and the frame-to-frame diff encoder (component E).

pub mod differencer;
pub mod mapper;
pub mod source;

pub use differencer::{FrameDifferencer, PixelRecord};
pub use mapper::FrameMapper;
pub use source::{BorrowedBgraFrame, FrameSource, VecFrameSource, ALIGN};
