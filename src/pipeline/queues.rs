//! The two pipeline queues: a FIFO convert queue and a min-heap write
//! queue, each guarded by its own mutex (§5 "Shared resources"). Grounded
//! on `examples/LegeApp-DJVULibRust/src/doc/page_collection.rs`'s
//! `Arc<RwLock<Vec<PageSlot>>>` ownership-transfer pattern, adapted here to
//! plain `Mutex` since both queues are held only for the brief
//! enqueue/dequeue critical section, never across I/O or computation.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::sync::Mutex;

use super::jobs::{ConvertJob, WriteJob};

/// FIFO queue of decoded frames awaiting conversion. Producer: decoder.
/// Consumers: converter workers.
pub struct ConvertQueue {
    inner: Mutex<VecDeque<ConvertJob>>,
    /// `None` means unbounded (the reference design). `Some(n)` bounds the
    /// queue to `n` jobs, per §4.F's backpressure recommendation.
    capacity: Option<usize>,
}

impl ConvertQueue {
    pub fn new(capacity: Option<usize>) -> Self {
        ConvertQueue {
            inner: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Pushes a job, returning it back to the caller if the queue is at
    /// capacity. Callers should yield and retry on `Err`.
    pub fn try_push(&self, job: ConvertJob) -> Result<(), ConvertJob> {
        let mut guard = self.inner.lock().unwrap();
        if let Some(cap) = self.capacity {
            if guard.len() >= cap {
                return Err(job);
            }
        }
        let frame_number = job.frame_number;
        guard.push_back(job);
        log::trace!("convert queue depth={} after pushing frame {frame_number}", guard.len());
        Ok(())
    }

    pub fn pop(&self) -> Option<ConvertJob> {
        let mut guard = self.inner.lock().unwrap();
        let job = guard.pop_front();
        if let Some(job) = &job {
            log::trace!("convert queue depth={} after popping frame {}", guard.len(), job.frame_number);
        }
        job
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Min-heap of converted frames awaiting writing, keyed by `frame_number`.
/// Producers: converter workers. Consumer: writer.
pub struct WriteQueue {
    inner: Mutex<BinaryHeap<Reverse<WriteJob>>>,
}

impl WriteQueue {
    pub fn new() -> Self {
        WriteQueue {
            inner: Mutex::new(BinaryHeap::new()),
        }
    }

    pub fn push(&self, job: WriteJob) {
        let mut guard = self.inner.lock().unwrap();
        let frame_number = job.frame_number;
        guard.push(Reverse(job));
        log::trace!("write queue depth={} after pushing frame {frame_number}", guard.len());
    }

    /// Pops the lowest-numbered job only if its `frame_number` equals
    /// `expected`; otherwise leaves the heap untouched. This is the
    /// writer's "peek, then pop iff next-in-order" step from §4.F.
    pub fn pop_if_next(&self, expected: u64) -> Option<WriteJob> {
        let mut guard = self.inner.lock().unwrap();
        match guard.peek() {
            Some(Reverse(job)) if job.frame_number == expected => {
                guard.pop().map(|Reverse(job)| job)
            }
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}

impl Default for WriteQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_queue_is_fifo() {
        let q = ConvertQueue::new(None);
        q.try_push(ConvertJob { frame_number: 1, width: 1, height: 1, bgra: vec![] }).unwrap();
        q.try_push(ConvertJob { frame_number: 2, width: 1, height: 1, bgra: vec![] }).unwrap();
        assert_eq!(q.pop().unwrap().frame_number, 1);
        assert_eq!(q.pop().unwrap().frame_number, 2);
        assert!(q.pop().is_none());
    }

    #[test]
    fn convert_queue_rejects_push_past_capacity() {
        let q = ConvertQueue::new(Some(1));
        q.try_push(ConvertJob { frame_number: 1, width: 1, height: 1, bgra: vec![] }).unwrap();
        let rejected = q.try_push(ConvertJob { frame_number: 2, width: 1, height: 1, bgra: vec![] });
        assert!(rejected.is_err());
    }

    #[test]
    fn write_queue_reorders_out_of_order_pushes() {
        let q = WriteQueue::new();
        q.push(WriteJob { frame_number: 3, pal8: vec![] });
        q.push(WriteJob { frame_number: 1, pal8: vec![] });
        q.push(WriteJob { frame_number: 2, pal8: vec![] });

        assert!(q.pop_if_next(1).is_some());
        assert!(q.pop_if_next(3).is_none(), "frame 2 must come before frame 3");
        assert!(q.pop_if_next(2).is_some());
        assert!(q.pop_if_next(3).is_some());
    }
}
