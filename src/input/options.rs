use serde::{Deserialize, Serialize};

use crate::time::Duration;

/// Options for interaction event resolution.
///
/// All delays are in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventOptions {
    /// The second release of a button must come within this many seconds of the first
    /// for a double click to count.
    pub double_click_delay: f64,

    /// The second tap must end within this many seconds of the first for a double touch.
    pub double_touch_delay: f64,

    /// Radius in pixels around the first tap reserved for double-touch matching.
    ///
    /// Recorded for listeners; recognition is gated on [`Self::double_touch_delay`] only.
    pub double_touch_radius: f32,

    /// How long the pointer must stay still after moving before `mousestop` fires.
    pub stop_delay: f64,

    /// Multiplier for the wheel delta when the backend reports it in lines.
    pub line_scroll_speed: f32,
}

impl Default for EventOptions {
    fn default() -> Self {
        let line_scroll_speed = if cfg!(target_arch = "wasm32") {
            8.0
        } else {
            40.0
        };

        Self {
            double_click_delay: 0.3,
            double_touch_delay: 0.55,
            double_touch_radius: 10.0,
            stop_delay: 0.1,
            line_scroll_speed,
        }
    }
}

/// Upper bound for every delay, in seconds.
pub const MAX_DELAY_SECS: f64 = 60.0;

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn clamp_delay(value: f64) -> f64 {
    clamp_non_negative(value).min(MAX_DELAY_SECS)
}

impl EventOptions {
    /// Clamps negative and non-finite values to zero, and delays to [`MAX_DELAY_SECS`].
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            double_click_delay: clamp_delay(self.double_click_delay),
            double_touch_delay: clamp_delay(self.double_touch_delay),
            double_touch_radius: clamp_non_negative(self.double_touch_radius as f64) as f32,
            stop_delay: clamp_delay(self.stop_delay),
            line_scroll_speed: clamp_non_negative(self.line_scroll_speed as f64) as f32,
        }
    }

    pub fn double_click_duration(&self) -> Duration {
        Duration::from_secs_f64(clamp_delay(self.double_click_delay))
    }

    pub fn double_touch_duration(&self) -> Duration {
        Duration::from_secs_f64(clamp_delay(self.double_touch_delay))
    }

    pub fn stop_duration(&self) -> Duration {
        Duration::from_secs_f64(clamp_delay(self.stop_delay))
    }
}
