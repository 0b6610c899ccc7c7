use std::{cell::Cell, rc::Rc};

pub use instant::{Duration, Instant};

/// Source of "now" for every timing gate in the crate.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep a handle while the dispatcher owns another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    start: Instant,
    offset: Rc<Cell<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Default::default(),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.offset.get()
    }
}

/// A cancelable one-shot deadline.
///
/// Re-arming pushes the deadline back, which is what makes it a debounce: it only fires once
/// the input has been quiet for `delay`.
#[derive(Clone, Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn arm(&mut self, at: Instant) {
        self.deadline = Some(at + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once, the first time it is polled at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

pub struct FramerateCounter {
    start: Option<Instant>,

    framerate: u32,
    tick_ct: u32,
    frames: u64,

    last_tick: Option<Instant>,
}

impl Default for FramerateCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FramerateCounter {
    pub fn new() -> Self {
        Self {
            start: None,
            framerate: 0,
            tick_ct: 0,
            frames: 0,
            last_tick: None,
        }
    }

    /// Records a frame at `tick_time`, returning the time since the previous frame.
    pub fn tick(&mut self, tick_time: Instant) -> Option<Duration> {
        let start = *self.start.get_or_insert(tick_time);

        let time_since_last_tick = match self.last_tick {
            Some(last_tick) => {
                let elapsed_secs = tick_time.saturating_duration_since(start).as_secs();
                let last_elapsed_secs = last_tick.saturating_duration_since(start).as_secs();

                if elapsed_secs != last_elapsed_secs {
                    self.framerate = self.tick_ct;
                    self.tick_ct = 0;
                }

                Some(tick_time.saturating_duration_since(last_tick))
            }
            None => None,
        };

        self.tick_ct += 1;
        self.frames += 1;

        self.last_tick = Some(tick_time);

        time_since_last_tick
    }

    /// Frames counted during the last full second.
    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_fires_once_after_quiet_period() {
        let clock = ManualClock::new();
        let mut stop = Debounce::new(Duration::from_millis(100));

        stop.arm(clock.now());
        clock.advance_millis(60);
        assert!(!stop.poll(clock.now()));

        // re-arming restarts the quiet period
        stop.arm(clock.now());
        clock.advance_millis(60);
        assert!(!stop.poll(clock.now()));

        clock.advance_millis(40);
        assert!(stop.poll(clock.now()));
        assert!(!stop.poll(clock.now()));
        assert!(!stop.is_armed());
    }

    #[test]
    fn cancelled_debounce_never_fires() {
        let clock = ManualClock::new();
        let mut stop = Debounce::new(Duration::from_millis(100));

        stop.arm(clock.now());
        stop.cancel();
        clock.advance_millis(500);

        assert!(!stop.poll(clock.now()));
    }

    #[test]
    fn framerate_counts_frames_per_second() {
        let clock = ManualClock::new();
        let mut counter = FramerateCounter::new();

        assert_eq!(counter.tick(clock.now()), None);

        for _ in 0..9 {
            clock.advance_millis(100);
            assert_eq!(counter.tick(clock.now()), Some(Duration::from_millis(100)));
        }
        assert_eq!(counter.framerate(), 0);

        clock.advance_millis(100);
        counter.tick(clock.now());

        assert_eq!(counter.framerate(), 10);
        assert_eq!(counter.frames(), 11);
    }
}
