//! Rolling window summaries over team history
//!
//! Mean, spread, and sample-count statistics over the most recent N games.

use crate::features::state::TeamState;

/// Summary statistics for one window size
#[derive(Debug, Clone, Copy)]
pub struct WindowSummary {
    pub window: usize,
    /// Mean margin over the window (0.0 with no history)
    pub margin_avg: f64,
    /// Population standard deviation of margins (0.0 with no history)
    pub margin_std: f64,
    /// Mean points scored
    pub pf_avg: f64,
    /// Mean points allowed
    pub pa_avg: f64,
    /// Games actually available, capped at the window size
    pub count: f64,
}

impl WindowSummary {
    /// Per-window feature names, unprefixed; the builder adds the side
    /// prefix. Order here fixes the column order for the whole table.
    pub fn names(window: usize) -> [String; 5] {
        [
            format!("margin_avg_{}", window),
            format!("margin_std_{}", window),
            format!("pf_avg_{}", window),
            format!("pa_avg_{}", window),
            format!("cnt_{}", window),
        ]
    }

    pub fn values(&self) -> [f64; 5] {
        [
            self.margin_avg,
            self.margin_std,
            self.pf_avg,
            self.pa_avg,
            self.count,
        ]
    }
}

/// Summarize a team's history over each configured window size.
///
/// A history shorter than the window is used whole; an empty history
/// yields exact zeros rather than missing values, so row shapes stay
/// identical across teams. Pure: repeated calls with unchanged state
/// return identical summaries.
pub fn summarize(state: &TeamState, windows: &[usize]) -> Vec<WindowSummary> {
    windows
        .iter()
        .map(|&w| WindowSummary {
            window: w,
            margin_avg: tail_mean(&state.margins, w),
            margin_std: tail_std(&state.margins, w),
            pf_avg: tail_mean(&state.points_for, w),
            pa_avg: tail_mean(&state.points_against, w),
            count: state.margins.len().min(w) as f64,
        })
        .collect()
}

/// Mean of the last `window` entries, 0.0 when empty
fn tail_mean(values: &[f64], window: usize) -> f64 {
    let tail = tail(values, window);
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// Population standard deviation of the last `window` entries, 0.0 when empty
fn tail_std(values: &[f64], window: usize) -> f64 {
    let tail = tail(values, window);
    if tail.is_empty() {
        return 0.0;
    }
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    let var = tail.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / tail.len() as f64;
    var.sqrt()
}

fn tail(values: &[f64], window: usize) -> &[f64] {
    let start = values.len().saturating_sub(window);
    &values[start..]
}
