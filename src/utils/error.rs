//! Error types for the palette tables, frame source, and pipeline.
//!
//! Each subsystem gets its own `thiserror`-derived enum rather than a single
//! crate-wide catch-all, following the pattern used elsewhere in this corpus
//! for individual codec errors (a local enum per subsystem with `#[from]`
//! conversions instead of one giant variant list).

use thiserror::Error;

/// Errors from building the palette auxiliary tables (component A).
#[derive(Error, Debug)]
pub enum PaletteError {
    /// The palette has fewer than two entries; MPS needs at least two
    /// colors to expand outward from a predicted index.
    #[error("palette must have at least 2 colors, got {0}")]
    TooFewColors(usize),

    /// The mean range spanned by the palette never reaches 255, so
    /// `indexLUT` cannot be populated for every input mean. Mirrors the
    /// source's "palette does not have white" diagnostic.
    #[error("palette does not span the full mean range (missing a near-white color)")]
    IncompleteMeanRange,
}

/// Errors surfaced by a `FrameSource` implementation.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source could not be opened or the initial decode failed.
    #[error("failed to open or decode video source: {0}")]
    Open(String),

    /// Decoding failed after at least one frame was successfully read.
    /// The pipeline treats this the same as a clean EOF (per the decoder's
    /// contract) but keeps the message for the final diagnostic line.
    #[error("decode failure mid-stream: {0}")]
    Decode(String),
}

/// Fatal errors from the pipeline orchestrator (component F) and the
/// stream writer (component G).
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("palette setup failed: {0}")]
    Palette(#[from] PaletteError),

    #[error("output sink error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame source error: {0}")]
    Source(#[from] SourceError),

    /// A worker or the writer thread panicked instead of returning.
    #[error("pipeline worker thread panicked: {0}")]
    WorkerPanic(String),
}
