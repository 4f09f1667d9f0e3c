//! Replay of a recorded convergence run.

use fuzzmap_core::{Activation, CognitiveMap, ConvergenceEngine, ConvergenceEvent, ConvergenceReport};
use serde::{Deserialize, Serialize};

/// Node values and freeze flags after a prefix of the event log.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameState {
    /// Number of events applied
    pub frame: usize,
    /// Outer pass of the last applied event (0 before any)
    pub pass: usize,
    pub values: Vec<f64>,
    pub frozen: Vec<bool>,
}

/// Scrubbable log of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    initial: Vec<f64>,
    events: Vec<ConvergenceEvent>,
    current_frame: usize,
}

impl Timeline {
    /// Create a timeline from initial values and the events that followed.
    pub fn new(initial: Vec<f64>, events: Vec<ConvergenceEvent>) -> Self {
        Self {
            initial,
            events,
            current_frame: 0,
        }
    }

    /// Run `engine` on `map`, recording every event.
    pub fn record<A: Activation>(
        engine: &ConvergenceEngine<A>,
        map: &mut CognitiveMap,
    ) -> (Self, ConvergenceReport) {
        let initial = map.values().to_vec();
        let mut events = Vec::new();
        let report = engine.run_observed(map, |e| events.push(e));
        (Self::new(initial, events), report)
    }

    pub fn events(&self) -> &[ConvergenceEvent] {
        &self.events
    }

    /// Get the current frame number.
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Get the total number of frames.
    pub fn total_frames(&self) -> usize {
        self.events.len()
    }

    /// Seek to a specific frame, clamped to the log.
    pub fn seek(&mut self, frame: usize) {
        self.current_frame = frame.min(self.events.len());
    }

    /// Advance one frame. Returns false at the end.
    pub fn step_forward(&mut self) -> bool {
        if self.current_frame < self.events.len() {
            self.current_frame += 1;
            true
        } else {
            false
        }
    }

    /// Go back one frame. Returns false at the start.
    pub fn step_back(&mut self) -> bool {
        if self.current_frame > 0 {
            self.current_frame -= 1;
            true
        } else {
            false
        }
    }

    /// State at the current frame.
    pub fn current(&self) -> FrameState {
        self.state_at(self.current_frame)
    }

    /// Rebuild the state after the first `frame` events.
    pub fn state_at(&self, frame: usize) -> FrameState {
        let frame = frame.min(self.events.len());
        let mut values = self.initial.clone();
        let mut frozen = vec![false; values.len()];
        let mut pass = 0;

        for event in &self.events[..frame] {
            pass = event.pass();
            match event {
                ConvergenceEvent::NodeUpdated { node, new, .. } => {
                    if let Some(v) = values.get_mut(*node) {
                        *v = *new;
                    }
                }
                ConvergenceEvent::NodeFrozen { node, .. } => {
                    if let Some(f) = frozen.get_mut(*node) {
                        *f = true;
                    }
                }
                ConvergenceEvent::Converged { .. } | ConvergenceEvent::BudgetExhausted { .. } => {
                    // Terminal marker only
                }
            }
        }

        FrameState {
            frame,
            pass,
            values,
            frozen,
        }
    }

    /// Values at the end of outer pass `pass` (pass 0 is the initial vector).
    pub fn values_after_pass(&self, pass: usize) -> Vec<f64> {
        let end = self
            .events
            .iter()
            .position(|e| e.pass() > pass)
            .unwrap_or(self.events.len());
        self.state_at(end).values
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzzmap_core::{sigmoid, FcmConfig, WeightMatrix};

    fn recorded() -> (Timeline, ConvergenceReport, CognitiveMap) {
        let mut map = CognitiveMap::new(WeightMatrix::zeros(2), vec![0.2, 0.8]).unwrap();
        let engine = ConvergenceEngine::new(FcmConfig::default());
        let (timeline, report) = Timeline::record(&engine, &mut map);
        (timeline, report, map)
    }

    #[test]
    fn frame_zero_is_initial_state() {
        let (timeline, _, _) = recorded();
        let state = timeline.state_at(0);
        assert_eq!(state.values, vec![0.2, 0.8]);
        assert_eq!(state.frozen, vec![false, false]);
        assert_eq!(state.pass, 0);
    }

    #[test]
    fn last_frame_matches_engine_output() {
        let (timeline, report, map) = recorded();
        let end = timeline.state_at(timeline.total_frames());
        assert_eq!(end.values, map.values().to_vec());
        assert_eq!(end.frozen, vec![true, true]);
        assert_eq!(end.pass, report.passes);
        assert!(matches!(
            timeline.events().last(),
            Some(ConvergenceEvent::Converged { .. })
        ));
    }

    #[test]
    fn first_pass_values() {
        let (timeline, _, _) = recorded();
        let after_one = timeline.values_after_pass(1);
        assert!((after_one[0] - sigmoid(0.2)).abs() < 1e-12);
        assert!((after_one[1] - sigmoid(0.8)).abs() < 1e-12);
        assert_eq!(timeline.values_after_pass(0), vec![0.2, 0.8]);
    }

    #[test]
    fn seek_respects_bounds() {
        let (mut timeline, _, _) = recorded();
        let total = timeline.total_frames();

        timeline.seek(10_000);
        assert_eq!(timeline.current_frame(), total);
        assert!(!timeline.step_forward());

        timeline.seek(0);
        assert_eq!(timeline.current_frame(), 0);
        assert!(!timeline.step_back());

        assert!(timeline.step_forward());
        assert_eq!(timeline.current().frame, 1);
    }

    #[test]
    fn serializes_events_with_type_tag() {
        let (timeline, _, _) = recorded();
        let json = timeline.to_json().unwrap();
        assert!(json.contains("\"type\":\"NodeUpdated\""));
        assert!(json.contains("\"type\":\"Converged\""));
    }
}
