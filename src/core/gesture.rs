//! # Gesture Interpreter
//!
//! Watches the raw touch stream and recognises navigation gestures. It only
//! observes: the caller forwards every event to the content view whatever
//! the outcome, so scrolling and text selection keep working.
//!
//! ```text
//! Press ─┬─ Move* ─┬─ Release → SwipeLeft | SwipeRight | TapBottomBand | nothing
//!        │         └─ Cancel  → nothing
//! ```

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Press,
    Move,
    Release,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: u64,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self {
            phase,
            x,
            y,
            timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    SwipeLeft,
    SwipeRight,
    TapBottomBand,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Minimum horizontal travel for a swipe.
    pub min_swipe_distance: f32,
    /// Minimum horizontal speed for a swipe, in units per second.
    pub min_swipe_velocity: f32,
    /// Maximum vertical drift a swipe may have.
    pub max_off_path: f32,
    /// Movement below this still counts as a tap.
    pub tap_slop: f32,
    /// Height of the bottom tap band as a fraction of the screen height.
    pub bottom_band_fraction: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_swipe_distance: 120.0,
            min_swipe_velocity: 200.0,
            max_off_path: 250.0,
            tap_slop: 16.0,
            bottom_band_fraction: 0.15,
        }
    }
}

#[derive(Debug)]
pub struct GestureInterpreter {
    config: GestureConfig,
    screen_height: f32,
    down: Option<TouchEvent>,
    max_travel: f32,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig, screen_height: f32) -> Self {
        Self {
            config,
            screen_height,
            down: None,
            max_travel: 0.0,
        }
    }

    pub fn set_screen_height(&mut self, height: f32) {
        self.screen_height = height;
    }

    /// Feed one event. Returns a gesture when this event ends a stream that
    /// classifies as one.
    pub fn observe(&mut self, event: &TouchEvent) -> Option<Gesture> {
        match event.phase {
            TouchPhase::Press => {
                self.down = Some(*event);
                self.max_travel = 0.0;
                None
            }
            TouchPhase::Move => {
                if let Some(down) = self.down {
                    let travel = (event.x - down.x).hypot(event.y - down.y);
                    self.max_travel = self.max_travel.max(travel);
                }
                None
            }
            TouchPhase::Release => {
                let down = self.down.take()?;
                let gesture = self.classify(&down, event);
                if let Some(gesture) = gesture {
                    debug!("Gesture recognised: {:?}", gesture);
                }
                gesture
            }
            TouchPhase::Cancel => {
                self.down = None;
                None
            }
        }
    }

    fn classify(&self, down: &TouchEvent, up: &TouchEvent) -> Option<Gesture> {
        let dx = up.x - down.x;
        let dy = up.y - down.y;
        let travel = self.max_travel.max(dx.hypot(dy));

        // Avoid dividing by zero on same-millisecond streams
        let elapsed_secs = up.timestamp_ms.saturating_sub(down.timestamp_ms).max(1) as f32 / 1000.0;
        let velocity = dx.abs() / elapsed_secs;

        if dx.abs() >= self.config.min_swipe_distance
            && dy.abs() <= self.config.max_off_path
            && velocity >= self.config.min_swipe_velocity
        {
            return Some(if dx < 0.0 {
                Gesture::SwipeLeft
            } else {
                Gesture::SwipeRight
            });
        }

        let band_top = self.screen_height * (1.0 - self.config.bottom_band_fraction);
        if travel <= self.config.tap_slop && up.y >= band_top {
            return Some(Gesture::TapBottomBand);
        }

        None
    }
}
