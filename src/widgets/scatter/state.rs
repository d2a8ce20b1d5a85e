//! Interaction state of the scatter plot.
//!
//! The widget keeps exactly two pieces of interaction state: which point the
//! pointer is over and where the pointer sits on the legend. [`transition`] is
//! a pure function from the current state and an event to the next state and
//! the list of effects the widget must apply to its scene.

use crate::data::DAYS_IN_REFERENCE_YEAR;

/// Interaction state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScatterState {
    /// Point under the pointer.
    pub hovered_point: Option<usize>,
    /// Pointer x on the legend, in legend pixels.
    pub legend_pointer_x: Option<f32>,
}

/// Pointer events the scatter plot reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScatterEvent {
    /// Pointer entered the hit region of a point.
    PointEnter(usize),
    /// Pointer left the point hit regions.
    PointLeave,
    /// Pointer moved over the legend, at this legend x.
    LegendMove(f32),
    /// Pointer left the legend.
    LegendLeave,
}

/// Scene changes requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Show the highlight dot and tooltip for a point.
    ShowHighlight(usize),
    /// Hide the highlight dot and tooltip.
    HideHighlight,
    /// Show the legend window around this legend x: bar, label, window
    /// histograms; hide legend ticks.
    ShowWindow(f32),
    /// Fade every point to the dimmed style.
    DimPoints,
    /// Bring points inside the window around this legend x back to full style.
    HighlightWindow(f32),
    /// Return every point to its resting style.
    RestorePoints,
    /// Hide the window bar and histograms; show legend ticks.
    HideWindow,
}

/// Next state and effects for `event`.
#[must_use]
pub fn transition(state: ScatterState, event: ScatterEvent) -> (ScatterState, Vec<Effect>) {
    match event {
        ScatterEvent::PointEnter(index) => (
            ScatterState { hovered_point: Some(index), ..state },
            vec![Effect::ShowHighlight(index)],
        ),
        ScatterEvent::PointLeave => {
            let effects = if state.hovered_point.is_some() {
                vec![Effect::HideHighlight]
            } else {
                Vec::new()
            };
            (ScatterState { hovered_point: None, ..state }, effects)
        }
        ScatterEvent::LegendMove(x) => (
            ScatterState { legend_pointer_x: Some(x), ..state },
            vec![Effect::ShowWindow(x), Effect::DimPoints, Effect::HighlightWindow(x)],
        ),
        ScatterEvent::LegendLeave => (
            ScatterState { legend_pointer_x: None, ..state },
            vec![Effect::RestorePoints, Effect::HideWindow],
        ),
    }
}

/// A span of reference-year days that may wrap past either end of the year.
///
/// `start` may be negative (the window began in the previous year) and `end`
/// may reach past the last day (the window runs into the next year).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayWindow {
    /// First day.
    pub start: f32,
    /// Last day.
    pub end: f32,
}

impl DayWindow {
    /// Whether the reference-year `day` falls inside the window.
    #[must_use]
    pub fn contains(&self, day: f32) -> bool {
        if self.start < 0.0 {
            day >= self.start + DAYS_IN_REFERENCE_YEAR || day <= self.end
        } else if self.end >= DAYS_IN_REFERENCE_YEAR {
            day <= self.end - DAYS_IN_REFERENCE_YEAR || day >= self.start
        } else {
            (self.start..=self.end).contains(&day)
        }
    }
}

/// Geometry of the day-of-year legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendAxis {
    /// Legend width in pixels.
    pub width: f32,
    /// Width of the highlight bar, also the window half-width.
    pub bar_width: f32,
}

impl LegendAxis {
    /// Legend whose highlight bar is 5% of its width.
    #[must_use]
    pub fn new(width: f32) -> Self {
        Self { width, bar_width: width * 0.05 }
    }

    /// Day at legend x. January 1 is at 0 and December 31 at the full width.
    #[must_use]
    pub fn day_at(&self, x: f32) -> f32 {
        x / self.width * (DAYS_IN_REFERENCE_YEAR - 1.0)
    }

    /// Legend x of a day.
    #[must_use]
    pub fn x_for_day(&self, day: f32) -> f32 {
        day / (DAYS_IN_REFERENCE_YEAR - 1.0) * self.width
    }

    /// Day window around legend x.
    #[must_use]
    pub fn window(&self, x: f32) -> DayWindow {
        DayWindow { start: self.day_at(x - self.bar_width), end: self.day_at(x + self.bar_width) }
    }

    /// Pointer x limited to the span whose window still touches the legend.
    #[must_use]
    pub fn clamp_x(&self, x: f32) -> f32 {
        if x.is_nan() {
            return 0.0;
        }
        x.clamp(-self.bar_width, self.width + self.bar_width)
    }

    /// Left edge of the highlight bar centered on `x`, kept inside the legend.
    #[must_use]
    pub fn bar_position(&self, x: f32) -> f32 {
        (x - self.bar_width / 2.0).clamp(0.0, (self.width - self.bar_width).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_enter_and_leave() {
        let (state, effects) = transition(ScatterState::default(), ScatterEvent::PointEnter(3));
        assert_eq!(state.hovered_point, Some(3));
        assert_eq!(effects, vec![Effect::ShowHighlight(3)]);

        let (state, effects) = transition(state, ScatterEvent::PointLeave);
        assert_eq!(state, ScatterState::default());
        assert_eq!(effects, vec![Effect::HideHighlight]);
    }

    #[test]
    fn test_leave_without_hover_is_quiet() {
        let (_, effects) = transition(ScatterState::default(), ScatterEvent::PointLeave);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_legend_move_and_leave() {
        let (state, effects) = transition(ScatterState::default(), ScatterEvent::LegendMove(40.0));
        assert_eq!(state.legend_pointer_x, Some(40.0));
        assert_eq!(
            effects,
            vec![Effect::ShowWindow(40.0), Effect::DimPoints, Effect::HighlightWindow(40.0)]
        );

        let (state, effects) = transition(state, ScatterEvent::LegendLeave);
        assert_eq!(state.legend_pointer_x, None);
        assert_eq!(effects, vec![Effect::RestorePoints, Effect::HideWindow]);
    }

    #[test]
    fn test_legend_and_point_state_independent() {
        let (state, _) = transition(ScatterState::default(), ScatterEvent::PointEnter(1));
        let (state, _) = transition(state, ScatterEvent::LegendMove(10.0));
        assert_eq!(state.hovered_point, Some(1));
        let (state, _) = transition(state, ScatterEvent::PointLeave);
        assert_eq!(state.legend_pointer_x, Some(10.0));
    }

    #[test]
    fn test_window_plain() {
        let w = DayWindow { start: 100.0, end: 120.0 };
        assert!(w.contains(100.0));
        assert!(w.contains(120.0));
        assert!(!w.contains(99.0));
        assert!(!w.contains(121.0));
    }

    #[test]
    fn test_window_wraps_into_previous_year() {
        let w = DayWindow { start: -10.0, end: 8.0 };
        assert!(w.contains(360.0));
        assert!(w.contains(0.0));
        assert!(w.contains(8.0));
        assert!(!w.contains(9.0));
        assert!(!w.contains(355.0));
    }

    #[test]
    fn test_window_wraps_into_next_year() {
        let w = DayWindow { start: 355.0, end: 375.0 };
        assert!(w.contains(365.0));
        assert!(w.contains(3.0));
        assert!(!w.contains(10.0));
        assert!(!w.contains(354.0));
    }

    #[test]
    fn test_legend_axis() {
        let legend = LegendAxis::new(250.0);
        assert!((legend.bar_width - 12.5).abs() < f32::EPSILON);
        assert!(legend.day_at(0.0).abs() < f32::EPSILON);
        assert!((legend.day_at(250.0) - 365.0).abs() < 1e-4);
        assert!((legend.x_for_day(legend.day_at(77.0)) - 77.0).abs() < 1e-3);

        let w = legend.window(0.0);
        assert!(w.start < 0.0);
        assert!(w.contains(365.0));

        assert!(legend.bar_position(-5.0).abs() < f32::EPSILON);
        assert!((legend.bar_position(100.0) - 93.75).abs() < 1e-4);
        assert!((legend.bar_position(400.0) - 237.5).abs() < 1e-4);
    }

    #[test]
    fn test_legend_clamp_x() {
        let legend = LegendAxis::new(250.0);
        assert!((legend.clamp_x(100.0) - 100.0).abs() < f32::EPSILON);
        assert!((legend.clamp_x(1.0e15) - 262.5).abs() < 1e-4);
        assert!((legend.clamp_x(f32::NEG_INFINITY) + 12.5).abs() < 1e-4);
        assert!(legend.clamp_x(f32::NAN).abs() < f32::EPSILON);
    }
}
