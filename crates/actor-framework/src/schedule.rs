//! # Deferred Work
//!
//! A deadline-ordered queue of jobs. Actors and workers keep one of these next to their
//! receive loop and race `sleep_until(next_due)` against incoming messages, so every
//! delayed mutation runs on the task that owns the state it touches.
//!
//! Jobs due at the same instant fire in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;
use tokio::time::Instant;

/// About thirty years.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

struct Entry<J> {
    due: Instant,
    seq: u64,
    job: J,
}

impl<J> PartialEq for Entry<J> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<J> Eq for Entry<J> {}

impl<J> PartialOrd for Entry<J> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<J> Ord for Entry<J> {
    // Reversed: BinaryHeap is a max-heap and we want the earliest deadline on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Jobs waiting for their deadline.
pub struct DeferredQueue<J> {
    heap: BinaryHeap<Entry<J>>,
    next_seq: u64,
}

impl<J> Default for DeferredQueue<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J> DeferredQueue<J> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedules `job` to fire `after` from now. A delay past the clock's range parks
    /// the job at the far end of it.
    pub fn schedule(&mut self, after: Duration, job: J) {
        let now = Instant::now();
        let due = now.checked_add(after).unwrap_or_else(|| now + FAR_FUTURE);
        self.schedule_at(due, job);
    }

    pub fn schedule_at(&mut self, due: Instant, job: J) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { due, seq, job });
    }

    /// Deadline of the earliest pending job.
    pub fn next_due(&self) -> Option<Instant> {
        self.heap.peek().map(|e| e.due)
    }

    /// Removes and returns the earliest job if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<J> {
        if self.next_due()? <= now {
            self.heap.pop().map(|e| e.job)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Sleeps until `due`, or forever when nothing is scheduled.
///
/// Meant for a `tokio::select!` branch next to a receive loop.
pub async fn sleep_until_due(due: Option<Instant>) {
    match due {
        Some(due) => tokio::time::sleep_until(due).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn jobs_pop_in_deadline_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule(Duration::from_millis(200), "standard");
        queue.schedule(Duration::from_millis(100), "expedited");
        queue.schedule(Duration::from_millis(100), "expedited-2");

        assert!(queue.pop_due(Instant::now()).is_none());

        tokio::time::advance(Duration::from_millis(150)).await;
        let now = Instant::now();
        assert_eq!(queue.pop_due(now), Some("expedited"));
        assert_eq!(queue.pop_due(now), Some("expedited-2"));
        assert_eq!(queue.pop_due(now), None);
        assert_eq!(queue.len(), 1);

        sleep_until_due(queue.next_due()).await;
        assert_eq!(queue.pop_due(Instant::now()), Some("standard"));
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_delay_is_parked_not_overflowed() {
        let mut queue = DeferredQueue::new();
        queue.schedule(Duration::MAX, "never");
        queue.schedule(Duration::from_millis(10), "soon");

        tokio::time::advance(Duration::from_millis(20)).await;
        assert_eq!(queue.pop_due(Instant::now()), Some("soon"));
        assert!(queue.pop_due(Instant::now()).is_none());
        assert!(queue.next_due().is_some_and(|due| due > Instant::now()));
    }
}
