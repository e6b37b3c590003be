//! Countdown timer.

use std::time::Duration;

// Use web-time on WASM, std::time otherwise
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Default countdown length in seconds.
pub const DEFAULT_SECONDS: u32 = 300;

/// Quick adjustment buttons, in seconds.
pub const QUICK_ADJUSTMENTS: [i64; 5] = [60, 300, 600, -60, -300];

/// How close the countdown is to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// More than half the time left.
    Calm,
    /// More than a quarter left.
    Warning,
    Critical,
}

/// Countdown timer state.
#[derive(Debug, Clone)]
pub struct Timer {
    remaining: u32,
    initial: u32,
    running: bool,
    /// Instant of the last whole-second tick while running.
    last_tick: Option<Instant>,
    controls_visible: bool,
    quick_visible: bool,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(DEFAULT_SECONDS)
    }
}

impl Timer {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            initial: seconds,
            running: false,
            last_tick: None,
            controls_visible: true,
            quick_visible: true,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn initial(&self) -> u32 {
        self.initial
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the start/pause button is enabled.
    pub fn can_toggle(&self) -> bool {
        self.running || self.remaining > 0
    }

    /// Start or pause. Does nothing when stopped at zero.
    pub fn toggle(&mut self, now: Instant) {
        if !self.can_toggle() {
            return;
        }
        self.running = !self.running;
        self.last_tick = self.running.then_some(now);
    }

    /// Stop and restore the initial duration.
    pub fn reset(&mut self) {
        self.running = false;
        self.last_tick = None;
        self.remaining = self.initial;
    }

    /// One-second tick. Stops at zero.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        if self.remaining <= 1 {
            self.remaining = 0;
            self.running = false;
            self.last_tick = None;
            log::info!("Timer finished");
        } else {
            self.remaining -= 1;
        }
    }

    /// Apply every whole second elapsed since the last tick.
    ///
    /// Returns true if the display changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(last) = self.last_tick else {
            return false;
        };
        let ticks = now.saturating_duration_since(last).as_secs();
        if ticks == 0 {
            return false;
        }
        for _ in 0..ticks {
            self.tick();
            if !self.running {
                return true;
            }
        }
        self.last_tick = Some(last + Duration::from_secs(ticks));
        true
    }

    /// Time until the next tick, for scheduling a repaint.
    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        let last = self.last_tick?;
        let elapsed = now.saturating_duration_since(last);
        Some(Duration::from_secs(1).saturating_sub(elapsed))
    }

    /// Add (or remove, when negative) seconds. Never goes below zero.
    ///
    /// A timer stopped at zero is set to `seconds` instead.
    pub fn add_time(&mut self, seconds: i64) {
        let next = if !self.running && self.remaining == 0 {
            seconds
        } else {
            i64::from(self.remaining) + seconds
        };
        self.remaining = u32::try_from(next.max(0)).unwrap_or(u32::MAX);
    }

    /// Whether a quick adjustment of `seconds` is enabled.
    pub fn can_adjust(&self, seconds: i64) -> bool {
        seconds >= 0 || i64::from(self.remaining) >= -seconds
    }

    /// Set both the remaining and the initial duration from a minutes field.
    ///
    /// Anything that does not start with digits counts as zero minutes.
    pub fn set_minutes(&mut self, text: &str) {
        let digits: String = text.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
        let minutes: u32 = digits.parse().unwrap_or(0);
        let seconds = minutes.saturating_mul(60);
        self.remaining = seconds;
        self.initial = seconds;
    }

    /// Minutes prefilled in the edit field.
    pub fn minutes_text(&self) -> String {
        (self.remaining / 60).to_string()
    }

    /// `MM:SS`.
    pub fn formatted(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    /// Urgency band from the remaining/initial ratio.
    pub fn urgency(&self) -> Urgency {
        if self.initial == 0 {
            return Urgency::Critical;
        }
        let ratio = f64::from(self.remaining) / f64::from(self.initial);
        if ratio > 0.5 {
            Urgency::Calm
        } else if ratio > 0.25 {
            Urgency::Warning
        } else {
            Urgency::Critical
        }
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    /// Quick buttons are only shown together with the controls.
    pub fn quick_buttons_visible(&self) -> bool {
        self.controls_visible && self.quick_visible
    }

    /// Show or hide the control row. Hiding it also hides the quick buttons.
    pub fn toggle_controls(&mut self) {
        self.controls_visible = !self.controls_visible;
        if !self.controls_visible {
            self.quick_visible = false;
        }
    }

    pub fn toggle_quick_buttons(&mut self) {
        self.quick_visible = !self.quick_visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let timer = Timer::default();
        assert_eq!(timer.remaining(), 300);
        assert_eq!(timer.formatted(), "05:00");
        assert!(!timer.is_running());
        assert_eq!(timer.urgency(), Urgency::Calm);
    }

    #[test]
    fn test_tick_stops_at_zero() {
        let mut timer = Timer::new(2);
        timer.toggle(Instant::now());
        timer.tick();
        assert_eq!(timer.remaining(), 1);
        timer.tick();
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_running());
        timer.tick();
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn test_advance_counts_whole_seconds() {
        let t0 = Instant::now();
        let mut timer = Timer::new(10);
        timer.toggle(t0);
        assert!(!timer.advance(t0 + Duration::from_millis(900)));
        assert!(timer.advance(t0 + Duration::from_millis(2500)));
        assert_eq!(timer.remaining(), 8);
        // The half second left over carries into the next tick.
        assert!(timer.advance(t0 + Duration::from_millis(3000)));
        assert_eq!(timer.remaining(), 7);
        assert!(timer.advance(t0 + Duration::from_secs(60)));
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_toggle_disabled_at_zero() {
        let mut timer = Timer::new(0);
        assert!(!timer.can_toggle());
        timer.toggle(Instant::now());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_paused_timer_does_not_advance() {
        let t0 = Instant::now();
        let mut timer = Timer::new(10);
        timer.toggle(t0);
        timer.toggle(t0);
        assert!(!timer.advance(t0 + Duration::from_secs(5)));
        assert_eq!(timer.remaining(), 10);
    }

    #[test]
    fn test_reset_restores_initial() {
        let mut timer = Timer::new(120);
        timer.toggle(Instant::now());
        timer.tick();
        timer.reset();
        assert_eq!(timer.remaining(), 120);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_add_time() {
        let mut timer = Timer::new(90);
        timer.add_time(-300);
        assert_eq!(timer.remaining(), 0);
        timer.add_time(600);
        assert_eq!(timer.remaining(), 600);
        timer.add_time(60);
        assert_eq!(timer.remaining(), 660);
    }

    #[test]
    fn test_quick_adjust_rules() {
        let timer = Timer::new(100);
        assert!(timer.can_adjust(-60));
        assert!(!timer.can_adjust(-300));
        assert!(timer.can_adjust(600));
        let timer = Timer::new(59);
        assert!(!timer.can_adjust(-60));
    }

    #[test]
    fn test_set_minutes() {
        let mut timer = Timer::default();
        timer.set_minutes("12");
        assert_eq!(timer.remaining(), 720);
        assert_eq!(timer.initial(), 720);
        timer.set_minutes("abc");
        assert_eq!(timer.remaining(), 0);
        timer.set_minutes("3min");
        assert_eq!(timer.formatted(), "03:00");
    }

    #[test]
    fn test_urgency_bands() {
        let mut timer = Timer::new(100);
        timer.add_time(-49);
        assert_eq!(timer.urgency(), Urgency::Calm);
        timer.add_time(-1);
        assert_eq!(timer.urgency(), Urgency::Warning);
        timer.add_time(-25);
        assert_eq!(timer.urgency(), Urgency::Critical);
    }

    #[test]
    fn test_hiding_controls_hides_quick_buttons() {
        let mut timer = Timer::default();
        assert!(timer.quick_buttons_visible());
        timer.toggle_controls();
        assert!(!timer.quick_buttons_visible());
        timer.toggle_controls();
        assert!(!timer.quick_buttons_visible());
        timer.toggle_quick_buttons();
        assert!(timer.quick_buttons_visible());
    }
}
