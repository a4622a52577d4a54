use std::time::{Duration, Instant};

/// A single pending deadline. Starting it again replaces the previous one.
#[derive(Debug, Default, Clone)]
pub struct PendingTimer {
    deadline: Option<Instant>,
}

impl PendingTimer {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    pub fn start(&mut self, now: Instant, delay: Duration) {
        self.cancel();
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consumes the deadline if it has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Collapses a burst of terminal resize notifications into the last one.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    timer: PendingTimer,
    pending: Option<(u16, u16)>,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timer: PendingTimer::new(),
            pending: None,
        }
    }

    pub fn notify(&mut self, width: u16, height: u16, now: Instant) {
        self.pending = Some((width, height));
        self.timer.start(now, self.delay);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Dimensions to apply once the burst has been quiet for the delay.
    pub fn take_due(&mut self, now: Instant) -> Option<(u16, u16)> {
        if self.timer.fire_if_due(now) {
            self.pending.take()
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.pending = None;
    }
}
