//! The two job types moved through the pipeline's queues. Both are owned
//! buffers: pushing onto a queue moves ownership to it; popping moves
//! ownership to the popping task (§5 "Shared resources").

/// Produced by the decoder, consumed by exactly one converter worker.
pub struct ConvertJob {
    pub frame_number: u64,
    pub width: usize,
    pub height: usize,
    /// Owned copy of the BGRA frame bytes, including row padding.
    pub bgra: Vec<u8>,
}

/// Produced by a converter worker, consumed by the writer.
pub struct WriteJob {
    pub frame_number: u64,
    pub pal8: Vec<u8>,
}

impl PartialEq for WriteJob {
    fn eq(&self, other: &Self) -> bool {
        self.frame_number == other.frame_number
    }
}
impl Eq for WriteJob {}

impl PartialOrd for WriteJob {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered by `frame_number` alone, so a [`std::collections::BinaryHeap`]
/// wrapped in [`std::cmp::Reverse`] becomes a min-heap keyed by frame
/// number, per §4.F's WriteQueue.
impl Ord for WriteJob {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.frame_number.cmp(&other.frame_number)
    }
}
