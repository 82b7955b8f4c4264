/// Bounded parameter adjusted by vertical drag or scroll.
///
/// Dragging `travel` units upward sweeps the full range; one scroll step
/// moves by the same per-unit amount. Values are always clamped to `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Knob {
    label: String,
    min: f64,
    max: f64,
    value: f64,
    unit: String,
    travel: f64,
    drag: Option<KnobDrag>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct KnobDrag {
    start_y: f64,
    start_value: f64,
}

impl Knob {
    /// Non-finite bounds fall back to `0.0..=1.0`; a non-finite value starts at `min`.
    pub fn new(label: &str, min: f64, max: f64, value: f64, unit: &str) -> Self {
        let (min, max) = if min.is_finite() && max.is_finite() {
            if max < min { (max, min) } else { (min, max) }
        } else {
            log::warn!(target: "knob", "{}: bounds {}..{} are not finite, using 0..1", label, min, max);
            (0.0, 1.0)
        };
        let value = if value.is_finite() { value } else { min };
        Self {
            label: label.to_string(),
            min,
            max,
            value: value.clamp(min, max),
            unit: unit.to_string(),
            travel: 100.0,
            drag: None,
        }
    }

    pub fn with_travel(mut self, travel: f64) -> Self {
        if travel > 0.0 {
            self.travel = travel;
        }
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Position within the range, 0.0..=1.0.
    pub fn normalized(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        (self.value - self.min) / span
    }

    /// Pointer angle, -135° at `min` through +135° at `max`.
    pub fn rotation_degrees(&self) -> f64 {
        self.normalized() * 270.0 - 135.0
    }

    fn sensitivity(&self) -> f64 {
        (self.max - self.min) / self.travel
    }

    /// Clamp and store. Returns the new value if it changed.
    pub fn set_value(&mut self, value: f64) -> Option<f64> {
        let value = value.clamp(self.min, self.max);
        if value == self.value {
            return None;
        }
        self.value = value;
        Some(value)
    }

    pub fn begin_drag(&mut self, y: f64) {
        self.drag = Some(KnobDrag {
            start_y: y,
            start_value: self.value,
        });
    }

    /// Follow the pointer to `y`. Screen y grows downward, so moving up raises the value.
    pub fn drag_to(&mut self, y: f64) -> Option<f64> {
        let drag = self.drag?;
        let delta = drag.start_y - y;
        self.set_value(drag.start_value + delta * self.sensitivity())
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// One wheel notch.
    pub fn scroll(&mut self, up: bool) -> Option<f64> {
        let step = if up { 1.0 } else { -1.0 };
        self.set_value(self.value + step * self.sensitivity())
    }

    /// Value with one decimal and the unit, e.g. `"75.0%"`.
    pub fn display(&self) -> String {
        format!("{:.1}{}", self.value, self.unit)
    }
}
