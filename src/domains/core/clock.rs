use chrono::{DateTime, Duration, Utc};

/// Current wall-clock time
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Next timestamp after `previous`: the wall clock, or one microsecond past
/// `previous` if the clock has not moved (or went backwards).
pub fn tick(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = Utc::now();
    let floor = previous + Duration::microseconds(1);
    if current > previous {
        current
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_is_strictly_increasing() {
        let mut last = now();
        for _ in 0..10_000 {
            let next = tick(last);
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn test_tick_survives_clock_skew() {
        let future = now() + Duration::hours(1);
        assert!(tick(future) > future);
    }
}
