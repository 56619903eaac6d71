use std::time::{Duration, Instant};

/// Quiet period before a completion toggle is sent
pub const TOGGLE_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Holds the latest value and settles once no new value arrived for `quiet`
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    value: T,
    changed_at: Option<Instant>,
    quiet: Duration,
}

impl<T: Clone> Debounced<T> {
    pub fn new(value: T, quiet: Duration) -> Self {
        Self {
            value,
            changed_at: None,
            quiet,
        }
    }

    pub fn set(&mut self, value: T, now: Instant) {
        self.value = value;
        self.changed_at = Some(now);
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        match self.changed_at {
            Some(changed_at) => now.saturating_duration_since(changed_at) >= self.quiet,
            None => false,
        }
    }

    /// Hands out the settled value once, then goes idle until the next `set`
    pub fn take_settled(&mut self, now: Instant) -> Option<T> {
        if self.is_settled(now) {
            self.changed_at = None;
            Some(self.value.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, Instant};

    use super::{Debounced, TOGGLE_QUIET_PERIOD};

    #[test]
    fn test_idle_value_never_settles() {
        let debounced = Debounced::new(false, TOGGLE_QUIET_PERIOD);

        assert!(!debounced.is_settled(Instant::now() + Duration::from_secs(5)));
    }

    #[test]
    fn test_settles_after_quiet_period() {
        let start = Instant::now();
        let mut debounced = Debounced::new(false, TOGGLE_QUIET_PERIOD);

        debounced.set(true, start);

        assert!(debounced.take_settled(start + Duration::from_millis(299)).is_none());
        assert_eq!(debounced.take_settled(start + Duration::from_millis(300)), Some(true));
        assert!(debounced.take_settled(start + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_rapid_changes_collapse_into_last_value() {
        let start = Instant::now();
        let mut debounced = Debounced::new(false, TOGGLE_QUIET_PERIOD);

        debounced.set(true, start);
        debounced.set(false, start + Duration::from_millis(200));
        debounced.set(true, start + Duration::from_millis(400));

        assert!(!debounced.is_settled(start + Duration::from_millis(600)));
        assert_eq!(debounced.take_settled(start + Duration::from_millis(700)), Some(true));
    }
}
