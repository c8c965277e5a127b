use chrono::Timelike;

/// Source of the local wall-clock hour (0..=23).
pub trait Clock {
    fn current_hour(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// A clock pinned to one hour, for tests and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn current_hour(&self) -> u32 {
        self.0 % 24
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn current_hour(&self) -> u32 {
        (**self).current_hour()
    }
}
