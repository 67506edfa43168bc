use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared growth radius: the largest Chebyshev distance from the center of
/// any cell known to be occupied. Only ever raised.
#[derive(Debug, Default)]
pub struct RadiusTracker {
    current: AtomicUsize,
}

impl RadiusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    /// Raise the radius to `candidate` if it is larger.
    /// Returns true when this call moved the radius.
    pub fn raise(&self, candidate: usize) -> bool {
        let mut current = self.current.load(Ordering::Acquire);
        while candidate > current {
            match self.current.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(RadiusTracker::new().read(), 0);
    }

    #[test]
    fn test_raise_only_increases() {
        let tracker = RadiusTracker::new();
        assert!(tracker.raise(3));
        assert!(!tracker.raise(2));
        assert!(!tracker.raise(3));
        assert_eq!(tracker.read(), 3);
        assert!(tracker.raise(7));
        assert_eq!(tracker.read(), 7);
    }

    #[test]
    fn test_concurrent_raise_keeps_maximum() {
        let tracker = Arc::new(RadiusTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || {
                    let mut last = 0;
                    for i in 0..1000 {
                        tracker.raise(i * 8 + worker);
                        let now = tracker.read();
                        assert!(now >= last, "radius went down from {last} to {now}");
                        last = now;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(tracker.read(), 999 * 8 + 7);
    }
}
