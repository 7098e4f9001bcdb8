//! Cancellable one-shot timers on the frame clock's timeline.
//!
//! Timers carry a payload instead of a callback: the owner polls due payloads and
//! dispatches them itself, so no timer can outlive the state it would act on.

use std::time::Duration;

/// Handle returned by [`TimerQueue::schedule`], used to cancel a pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<E> {
    id: TimerId,
    due: Duration,
    event: E,
}

/// One-shot timer queue. Due timers fire in (due time, schedule order) order.
#[derive(Debug)]
pub struct TimerQueue<E> {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current position of the queue on its timeline.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `event` to fire `delay` after the queue's current time.
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay,
            event,
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Drop every pending timer. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        if count > 0 {
            log::debug!("Cancelling {} pending timer(s)", count);
        }
        self.pending.clear();
        count
    }

    /// Pop the earliest timer due at or before `until`, moving `now` to its due time.
    ///
    /// Timers scheduled by the caller while handling the returned event are timed
    /// from that due time, so a long frame still yields exact chains.
    pub fn poll(&mut self, until: Duration) -> Option<E> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.id))
            .map(|(i, _)| i)?;
        let fired = self.pending.swap_remove(idx);
        self.now = self.now.max(fired.due);
        Some(fired.event)
    }

    /// Move the timeline forward to `until` without firing anything.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time remaining until `id` fires, if it is still pending.
    pub fn remaining(&self, id: TimerId) -> Option<Duration> {
        self.pending
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.due.saturating_sub(self.now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn drain(q: &mut TimerQueue<&'static str>, until: Duration) -> Vec<&'static str> {
        let mut fired = Vec::new();
        while let Some(e) = q.poll(until) {
            fired.push(e);
        }
        q.advance_to(until);
        fired
    }

    #[test]
    fn fires_in_due_order_then_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(300), "c");
        q.schedule(ms(100), "a");
        q.schedule(ms(100), "b");
        assert_eq!(drain(&mut q, ms(50)), Vec::<&str>::new());
        assert_eq!(drain(&mut q, ms(1000)), vec!["a", "b", "c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let id = q.schedule(ms(100), "gone");
        q.schedule(ms(200), "kept");
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert_eq!(drain(&mut q, ms(500)), vec!["kept"]);
    }

    #[test]
    fn cancel_all_clears_queue() {
        let mut q = TimerQueue::new();
        q.schedule(ms(10), "x");
        q.schedule(ms(20), "y");
        assert_eq!(q.cancel_all(), 2);
        assert!(drain(&mut q, ms(1000)).is_empty());
    }

    #[test]
    fn chained_timer_is_timed_from_parent_due_time() {
        let mut q = TimerQueue::new();
        q.schedule(ms(500), "first");
        // One long frame covering both timers.
        let until = ms(2000);
        assert_eq!(q.poll(until), Some("first"));
        assert_eq!(q.now(), ms(500));
        let id = q.schedule(ms(1000), "second");
        assert_eq!(q.remaining(id), Some(ms(1000)));
        assert_eq!(q.poll(until), Some("second"));
        assert_eq!(q.now(), ms(1500));
        assert_eq!(q.poll(until), None);
        q.advance_to(until);
        assert_eq!(q.now(), until);
    }
}
