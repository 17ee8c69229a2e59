//! Component F: the pipeline orchestrator. Spawns the decoder, N converter
//! workers, and the writer, and wires them together through
//! [`super::queues::ConvertQueue`] and [`super::queues::WriteQueue`].
//! Grounded on `examples/original_source/main.cpp`'s thread-spawning
//! `main()` (worker-count heuristic, writer polling loop, `isFinished`
//! handoff) and, for the Rust idiom of a chainable configuration struct,
//! `examples/LegeApp-DJVULibRust/src/doc/builder.rs`'s `DjvuBuilder`.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crate::color::GamePalette;
use crate::frame::{BorrowedBgraFrame, FrameDifferencer, FrameMapper, FrameSource};
use crate::pipeline::jobs::{ConvertJob, WriteJob};
use crate::pipeline::queues::{ConvertQueue, WriteQueue};
use crate::stream::{StreamHeader, StreamWriter};
use crate::utils::error::PipelineError;
use crate::utils::progress::{ProgressCallback, ProgressReporter};

/// Sentinel meaning "the decoder has not yet reported how many frames it
/// emitted" — `finalFrameNumber` is otherwise always `>= 1`.
const NO_FINAL_FRAME: u64 = u64::MAX;

/// Chainable configuration for [`run`], following the teacher's `with_*`
/// builder style. All fields are optional; omitted ones fall back to the
/// reference-design heuristics from §4.F.
#[derive(Clone, Default)]
pub struct PipelineConfig {
    worker_count: Option<usize>,
    convert_queue_capacity: Option<usize>,
    skip_frame: Option<u32>,
    progress: ProgressReporter,
}

impl PipelineConfig {
    pub fn new() -> Self {
        PipelineConfig::default()
    }

    /// Overrides the converter worker count. Without this, `N = max(1,
    /// min(6, hwConcurrency - 2))`.
    pub fn with_worker_count(mut self, n: usize) -> Self {
        self.worker_count = Some(n.max(1));
        self
    }

    /// Bounds the convert queue to `capacity` jobs (§4.F backpressure).
    /// Without this, the queue is unbounded.
    pub fn with_convert_queue_capacity(mut self, capacity: usize) -> Self {
        self.convert_queue_capacity = Some(capacity);
        self
    }

    /// Overrides frame decimation. Without this, the smallest `skipFrame`
    /// in `[1, 12]` satisfying `inputFps / skip <= 12` and `inputFps % skip
    /// == 0` is chosen, falling back to `1` (§9 open question).
    pub fn with_skip_frame(mut self, skip_frame: u32) -> Self {
        self.skip_frame = Some(skip_frame.max(1));
        self
    }

    /// Registers a callback invoked after each frame the writer emits,
    /// receiving `(frames_written, final_frame_number)`. `final_frame_number`
    /// stays `None` until the decoder has observed EOF.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress = ProgressReporter::new(callback);
        self
    }

    fn resolve_worker_count(&self) -> usize {
        self.worker_count.unwrap_or_else(|| {
            let hw = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
            (hw.saturating_sub(2)).clamp(1, 6)
        })
    }

    fn resolve_skip_frame(&self, input_fps: u32) -> u32 {
        self.skip_frame.unwrap_or_else(|| choose_skip_frame(input_fps))
    }
}

/// Chooses the decimation factor per §4.F: the smallest value in `[1, 12]`
/// such that `inputFps / skip <= 12` and `inputFps` divides evenly by
/// `skip`. Falls back to `1` when no such value exists, rather than the
/// source's meaningless `skip = 13` fallthrough (§9).
pub fn choose_skip_frame(input_fps: u32) -> u32 {
    for skip in 1..=12u32 {
        if skip != 0 && input_fps % skip == 0 && input_fps / skip <= 12 {
            return skip;
        }
    }
    1
}

/// Runs the full pipeline to completion: spawns the decoder, converter
/// workers, and writer; blocks until all frames are written or a fatal
/// error occurs. `source` and `sink` are consumed by worker threads, so
/// both must be `'static` and `Send`.
pub fn run<S, W>(
    mut source: S,
    palette: Arc<GamePalette>,
    sink: W,
    config: PipelineConfig,
) -> Result<(), PipelineError>
where
    S: FrameSource + Send + 'static,
    W: Write + Send + 'static,
{
    let width = source.width();
    let height = source.height();
    let input_fps = source.frame_rate();
    let skip_frame = config.resolve_skip_frame(input_fps);
    let worker_count = config.resolve_worker_count();
    let fps_out = (input_fps / skip_frame).min(u8::MAX as u32) as u8;
    let header = StreamHeader::new(width as u16, height as u16, fps_out);
    let progress = config.progress.clone();

    let convert_queue = Arc::new(ConvertQueue::new(config.convert_queue_capacity));
    let write_queue = Arc::new(WriteQueue::new());
    let is_finished = Arc::new(AtomicBool::new(false));
    let abort = Arc::new(AtomicBool::new(false));
    let final_frame_number = Arc::new(AtomicU64::new(NO_FINAL_FRAME));

    let decoder_handle = {
        let convert_queue = Arc::clone(&convert_queue);
        let final_frame_number = Arc::clone(&final_frame_number);
        let abort = Arc::clone(&abort);
        thread::Builder::new()
            .name("decoder".to_string())
            .spawn(move || -> Result<(), PipelineError> {
                let result = run_decoder(&mut source, &convert_queue, skip_frame, &abort);
                match &result {
                    Ok(emitted) => final_frame_number.store(emitted + 1, Ordering::Release),
                    Err(_) => abort.store(true, Ordering::Release),
                }
                result.map(|_| ())
            })?
    };

    let mut worker_handles = Vec::with_capacity(worker_count);
    for worker_index in 0..worker_count {
        let convert_queue = Arc::clone(&convert_queue);
        let write_queue = Arc::clone(&write_queue);
        let is_finished = Arc::clone(&is_finished);
        let abort = Arc::clone(&abort);
        let palette = Arc::clone(&palette);
        let handle = thread::Builder::new()
            .name(format!("converter-{worker_index}"))
            .spawn(move || {
                run_converter(&convert_queue, &write_queue, &is_finished, &abort, palette.as_ref());
            })?;
        worker_handles.push(handle);
    }

    let writer_handle = {
        let write_queue = Arc::clone(&write_queue);
        let final_frame_number = Arc::clone(&final_frame_number);
        let is_finished = Arc::clone(&is_finished);
        let abort = Arc::clone(&abort);
        let palette = Arc::clone(&palette);
        thread::Builder::new()
            .name("writer".to_string())
            .spawn(move || -> Result<(), PipelineError> {
                run_writer(
                    width,
                    sink,
                    &write_queue,
                    &final_frame_number,
                    &is_finished,
                    &abort,
                    palette.as_ref(),
                    header,
                    &progress,
                )
            })?
    };

    let decoder_result = join_thread(decoder_handle, "decoder")?;
    for (index, handle) in worker_handles.into_iter().enumerate() {
        join_thread(handle, &format!("converter-{index}"))?;
    }
    let writer_result = join_thread(writer_handle, "writer")?;

    decoder_result?;
    writer_result?;
    Ok(())
}

/// Reads and decimates frames from `source`, pushing a [`ConvertJob`] for
/// every `skip_frame`-th input frame. Returns the count of jobs emitted;
/// the caller derives `finalFrameNumber = emitted + 1` (§4.F).
fn run_decoder<S: FrameSource>(
    source: &mut S,
    convert_queue: &ConvertQueue,
    skip_frame: u32,
    abort: &AtomicBool,
) -> Result<u64, PipelineError> {
    source.seek_to_start()?;

    let mut input_index: u64 = 0;
    let mut frame_number: u64 = 1;

    loop {
        if abort.load(Ordering::Acquire) {
            break;
        }
        match source.read_frame() {
            Ok(Some(frame)) => {
                input_index += 1;
                if input_index % skip_frame as u64 != 0 {
                    continue;
                }
                let mut job = ConvertJob {
                    frame_number,
                    width: frame.width,
                    height: frame.height,
                    bgra: frame.data.to_vec(),
                };
                loop {
                    match convert_queue.try_push(job) {
                        Ok(()) => break,
                        Err(rejected) => {
                            job = rejected;
                            thread::yield_now();
                        }
                    }
                }
                frame_number += 1;
            }
            Ok(None) => break,
            Err(err) => {
                // Mid-stream decode failures are surfaced as EOF, per §7.
                log::error!("frame source error treated as end of stream: {err}");
                break;
            }
        }
    }

    Ok(frame_number - 1)
}

/// Pops jobs off `convert_queue`, runs the frame mapper, and pushes the
/// result onto `write_queue`. Exits once the writer has observed the final
/// frame and the convert queue is drained.
fn run_converter(
    convert_queue: &ConvertQueue,
    write_queue: &WriteQueue,
    is_finished: &AtomicBool,
    abort: &AtomicBool,
    palette: &GamePalette,
) {
    let tables = palette.tables();
    let mut mapper = FrameMapper::new();

    loop {
        if abort.load(Ordering::Acquire) {
            return;
        }
        match convert_queue.pop() {
            Some(job) => {
                let frame = BorrowedBgraFrame {
                    width: job.width,
                    height: job.height,
                    data: &job.bgra,
                };
                let pal8 = mapper.convert_image(&frame, tables);
                write_queue.push(WriteJob {
                    frame_number: job.frame_number,
                    pal8,
                });
            }
            None => {
                if is_finished.load(Ordering::Acquire) && convert_queue.is_empty() {
                    return;
                }
                thread::yield_now();
            }
        }
    }
}

/// Drains `write_queue` in strict frame-number order, diffs each frame
/// against the previous one, and writes the result. Sets `is_finished`
/// once the last frame has been written.
#[allow(clippy::too_many_arguments)]
fn run_writer<W: Write>(
    width: usize,
    sink: W,
    write_queue: &WriteQueue,
    final_frame_number: &AtomicU64,
    is_finished: &AtomicBool,
    abort: &AtomicBool,
    palette: &GamePalette,
    header: StreamHeader,
    progress: &ProgressReporter,
) -> Result<(), PipelineError> {
    let mut writer = StreamWriter::new(sink);
    writer.write_header(&header)?;

    let mut frames_written: u64 = 0;
    let mut previous: Option<Vec<u8>> = None;

    loop {
        if abort.load(Ordering::Acquire) {
            return Ok(());
        }

        let final_fn = final_frame_number.load(Ordering::Acquire);
        let reported_final = if final_fn == NO_FINAL_FRAME { None } else { Some(final_fn) };

        if let Some(job) = write_queue.pop_if_next(frames_written + 1) {
            let records = FrameDifferencer::diff(width, &job.pal8, previous.as_deref(), palette);
            writer.write_frame(&records)?;
            frames_written += 1;
            previous = Some(job.pal8);
            progress.report(frames_written, reported_final);
        } else {
            thread::yield_now();
        }

        if final_fn != NO_FINAL_FRAME && frames_written == final_fn - 1 {
            is_finished.store(true, Ordering::Release);
            break;
        }
    }

    writer.flush()?;
    Ok(())
}

fn join_thread<T>(handle: thread::JoinHandle<T>, name: &str) -> Result<T, PipelineError> {
    handle
        .join()
        .map_err(|payload| PipelineError::WorkerPanic(format!("{name}: {}", panic_message(&payload))))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::source::VecFrameSource;

    #[test]
    fn skip_frame_picks_the_smallest_exact_factor() {
        assert_eq!(choose_skip_frame(24), 2); // 24/2 = 12
        assert_eq!(choose_skip_frame(12), 1); // already <= 12
        assert_eq!(choose_skip_frame(60), 5); // 60/5 = 12
    }

    #[test]
    fn skip_frame_falls_back_to_one_when_no_exact_factor_fits() {
        // 17 is prime and > 12; no skip in [1,12] divides it evenly besides 1.
        assert_eq!(choose_skip_frame(17), 1);
    }

    #[test]
    fn worker_count_is_clamped_between_one_and_six() {
        let config = PipelineConfig::new().with_worker_count(0);
        assert_eq!(config.resolve_worker_count(), 1);
        let config = PipelineConfig::new().with_worker_count(64);
        assert_eq!(config.resolve_worker_count(), 64); // explicit override is honored as-is
    }

    #[test]
    fn runs_a_small_synthetic_stream_end_to_end() {
        let palette = Arc::new(GamePalette::build().unwrap());
        let source = VecFrameSource::solid(2, 2, 24, (0, 0, 0), 5);
        let sink: Vec<u8> = Vec::new();
        let config = PipelineConfig::new().with_worker_count(2);
        run(source, palette, sink, config).unwrap();
    }
}
