use plotters::style::RGBColor;

/// Default upper bound of the color scale; larger fractions clamp to it.
pub const DEFAULT_SCALE_MAX: f64 = 0.6;

/// Linear two-color scale shared by every month panel and the color bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
    pub low: RGBColor,
    pub high: RGBColor,
}

impl Default for ColorScale {
    fn default() -> Self {
        ColorScale {
            min: 0.0,
            max: DEFAULT_SCALE_MAX,
            low: RGBColor(0x45, 0x75, 0xb4),
            high: RGBColor(0xd7, 0x30, 0x27),
        }
    }
}

impl ColorScale {
    pub fn with_max(max: f64) -> Self {
        ColorScale {
            max,
            ..Default::default()
        }
    }

    /// Position of `value` on the scale, clamped to `[0, 1]`.
    pub fn position(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 || value.is_nan() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f64) -> RGBColor {
        let t = self.position(value);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;

        RGBColor(
            mix(self.low.0, self.high.0),
            mix(self.low.1, self.high.1),
            mix(self.low.2, self.high.2),
        )
    }

    /// Multiples of `step` within the scale bounds.
    pub fn ticks(&self, step: f64) -> Vec<f64> {
        if step <= 0.0 || self.max <= self.min {
            return vec![self.min];
        }
        let first = (self.min / step).ceil() as i64;
        let last = (self.max / step + 1e-9).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}
