// portable_simd feature - only enable when the feature flag is set
#![cfg_attr(feature = "portable_simd", feature(portable_simd))]

//! Accelerated BGRA-to-palettized frame stream encoder for character-grid
//! display hosts.
//!
//! This crate turns a sequence of decoded video frames into a compact,
//! frame-differenced byte stream: each pixel is mapped to the nearest
//! entry of a fixed 256-color palette (the "expanded game palette") using
//! an accelerated nearest-neighbor search with Sierra-Lite error
//! diffusion, then encoded as a delta against the previous frame.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use pal8vid_encoder::color::GamePalette;
//! use pal8vid_encoder::pipeline::{self, PipelineConfig};
//!
//! let palette = Arc::new(GamePalette::build()?);
//! let sink = std::fs::File::create("out.pal8")?;
//! pipeline::run(my_frame_source, palette, sink, PipelineConfig::new())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`color`]: palette construction, the accelerated quantizer, and the
//!   error diffuser (components A, B, C).
//! - [`frame`]: the `FrameSource` contract, the per-frame mapper, and the
//!   frame differencer (components D, E).
//! - [`pipeline`]: the decode/quantize/write orchestrator (component F).
//! - [`stream`]: the output wire format (component G).
//! - [`utils`]: errors, logging, and progress reporting.

pub mod color;
pub mod frame;
pub mod pipeline;
pub mod stream;
pub mod utils;

pub use color::{Color, GamePalette};
pub use frame::{FrameDifferencer, FrameMapper, FrameSource, PixelRecord};
pub use pipeline::PipelineConfig;
pub use stream::{StreamHeader, StreamWriter};
pub use utils::error::{PaletteError, PipelineError, SourceError};
