/// How wheel deltas are folded into the frame's wheel value.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WheelMode {
    /// Sum raw deltas as delivered (fractional, platform units).
    Accumulate,
    /// Each event contributes `+1` or `-1` by the sign of its delta.
    Step,
}

/// Per-backend input conventions.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct InputPolicy {
    pub wheel: WheelMode,

    /// Report no pointer while the window lacks mouse focus.
    pub pointer_requires_focus: bool,
}

impl InputPolicy {
    /// Marmalade/IwGx conventions: raw wheel magnitudes, pointer always reported.
    pub const fn marmalade() -> Self {
        Self {
            wheel: WheelMode::Accumulate,
            pointer_requires_focus: false,
        }
    }

    /// SDL conventions: one wheel step per event, pointer only with mouse focus.
    pub const fn sdl() -> Self {
        Self {
            wheel: WheelMode::Step,
            pointer_requires_focus: true,
        }
    }
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            wheel: WheelMode::Accumulate,
            pointer_requires_focus: true,
        }
    }
}
