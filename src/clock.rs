use jiff::Zoned;

/// Source of "now" for every time-dependent operation.
///
/// The store and stats logic never reach for the wall clock themselves;
/// callers hand in a clock, which keeps streak and stats computations
/// deterministic under test.
pub trait Clock {
    fn now(&self) -> Zoned;
}

/// The real system clock, in the system's local time zone.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

#[cfg(test)]
pub struct FixedClock(pub Zoned);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> Zoned {
        self.0.clone()
    }
}
