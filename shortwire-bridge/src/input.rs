//! Pointer and motion input helpers
//!
//! Turn raw pointer presses and accelerometer samples into the values fed
//! to [`Bridge::feed_swipe`](crate::Bridge::feed_swipe) and
//! [`Bridge::feed_acceleration`](crate::Bridge::feed_acceleration).
//! Timestamps are milliseconds on any monotonic clock.

use shortwire_core::config::InputConfig;
use shortwire_protocol::SwipeDirection;

/// A classified swipe gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swipe {
    pub direction: SwipeDirection,
    /// 1-255, higher for longer and faster gestures
    pub strength: u8,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    x: f32,
    y: f32,
    at_ms: u64,
}

/// Classifies press/release pairs into swipes
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    min_distance: f32,
    full_distance: f32,
    fast_ms: f32,
    press: Option<Press>,
}

impl SwipeTracker {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            min_distance: config.swipe_min_distance,
            full_distance: config.swipe_full_distance,
            fast_ms: config.swipe_fast_ms,
            press: None,
        }
    }

    /// Record the start of a gesture
    pub fn press(&mut self, x: f32, y: f32, at_ms: u64) {
        self.press = Some(Press { x, y, at_ms });
    }

    /// Finish the gesture started by the last [`press`](Self::press)
    ///
    /// Returns `None` without a matching press, or when the pointer moved
    /// less than the minimum distance.
    pub fn release(&mut self, x: f32, y: f32, at_ms: u64) -> Option<Swipe> {
        let press = self.press.take()?;
        let dx = x - press.x;
        let dy = y - press.y;
        let distance = dx.hypot(dy);
        if distance.is_nan() || distance < self.min_distance {
            return None;
        }

        let direction = if dx.abs() >= dy.abs() {
            if dx >= 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            }
        } else if dy >= 0.0 {
            SwipeDirection::Down
        } else {
            SwipeDirection::Up
        };

        let elapsed = at_ms.saturating_sub(press.at_ms).max(1) as f32;
        let speed = (distance / self.full_distance).min(1.0) * (self.fast_ms / elapsed).min(1.0);
        let mut strength = (speed * 255.0).round().min(255.0);
        if strength.is_nan() || strength <= 0.0 {
            // Slow gestures still register, scaled by travel
            strength = distance.round().min(255.0);
        }

        Some(Swipe {
            direction,
            strength: strength as u8,
        })
    }

    /// Forget a pending press
    pub fn cancel(&mut self) {
        self.press = None;
    }
}

/// Rate limiter for acceleration samples
#[derive(Debug, Clone)]
pub struct MotionThrottle {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl MotionThrottle {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            interval_ms: u64::from(config.motion_interval_ms),
            last_ms: None,
        }
    }

    /// Returns true if a sample taken at `now_ms` should be forwarded
    pub fn admit(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_ms {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return false;
            }
        }
        self.last_ms = Some(now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tracker() -> SwipeTracker {
        SwipeTracker::new(&InputConfig::default())
    }

    #[test]
    fn test_short_release_ignored() {
        let mut swipes = tracker();
        swipes.press(100.0, 100.0, 0);
        assert_eq!(swipes.release(105.0, 105.0, 50), None);
    }

    #[test]
    fn test_release_without_press() {
        let mut swipes = tracker();
        assert_eq!(swipes.release(300.0, 0.0, 10), None);

        swipes.press(0.0, 0.0, 0);
        swipes.cancel();
        assert_eq!(swipes.release(300.0, 0.0, 10), None);
    }

    #[test]
    fn test_directions() {
        let cases = [
            ((50.0, 0.0), SwipeDirection::Right),
            ((-50.0, 0.0), SwipeDirection::Left),
            ((0.0, 50.0), SwipeDirection::Down),
            ((0.0, -50.0), SwipeDirection::Up),
            // Diagonal ties go horizontal
            ((40.0, 40.0), SwipeDirection::Right),
            ((10.0, -60.0), SwipeDirection::Up),
        ];
        for ((dx, dy), expected) in cases {
            let mut swipes = tracker();
            swipes.press(200.0, 200.0, 0);
            let swipe = swipes.release(200.0 + dx, 200.0 + dy, 100).unwrap();
            assert_eq!(swipe.direction, expected, "dx={} dy={}", dx, dy);
        }
    }

    #[test]
    fn test_fast_long_swipe_is_full_strength() {
        let mut swipes = tracker();
        swipes.press(0.0, 0.0, 1000);
        let swipe = swipes.release(400.0, 0.0, 1100).unwrap();
        assert_eq!(swipe.strength, 255);
    }

    #[test]
    fn test_strength_scales() {
        // Half the full distance at full speed
        let mut swipes = tracker();
        swipes.press(0.0, 0.0, 0);
        assert_eq!(swipes.release(150.0, 0.0, 200).unwrap().strength, 128);

        // Full distance, twice as slow as the fast threshold
        swipes.press(0.0, 0.0, 0);
        assert_eq!(swipes.release(300.0, 0.0, 400).unwrap().strength, 128);
    }

    #[test]
    fn test_zero_elapsed_counts_as_one_ms() {
        let mut swipes = tracker();
        swipes.press(0.0, 0.0, 500);
        assert_eq!(swipes.release(0.0, 300.0, 500).unwrap().strength, 255);
    }

    #[test]
    fn test_very_slow_swipe_falls_back_to_distance() {
        let mut swipes = tracker();
        swipes.press(0.0, 0.0, 0);
        let swipe = swipes.release(12.0, 0.0, 10_000_000).unwrap();
        assert_eq!(swipe.strength, 12);
    }

    #[test]
    fn test_motion_throttle() {
        let mut throttle = MotionThrottle::new(&InputConfig::default());
        assert!(throttle.admit(0));
        assert!(!throttle.admit(40));
        assert!(!throttle.admit(79));
        assert!(throttle.admit(80));
        assert!(!throttle.admit(100));
        assert!(throttle.admit(1000));
    }

    proptest! {
        #[test]
        fn prop_swipe_strength_never_zero(
            dx in -1000.0f32..1000.0,
            dy in -1000.0f32..1000.0,
            elapsed in 0u64..100_000,
        ) {
            let mut swipes = tracker();
            swipes.press(0.0, 0.0, 0);
            let swipe = swipes.release(dx, dy, elapsed);
            if dx.hypot(dy) < 10.0 {
                prop_assert!(swipe.is_none());
            } else {
                let swipe = swipe.unwrap();
                prop_assert!(swipe.strength >= 1);
                let horizontal = matches!(
                    swipe.direction,
                    SwipeDirection::Left | SwipeDirection::Right
                );
                prop_assert_eq!(horizontal, dx.abs() >= dy.abs());
            }
        }
    }
}
