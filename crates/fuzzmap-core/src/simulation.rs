//! A simulation session: one map, its generator and its engine.

use crate::config::FcmConfig;
use crate::convergence::{ConvergenceEngine, ConvergenceEvent, ConvergenceReport};
use crate::error::Result;
use crate::map::CognitiveMap;
use crate::matrix::{MatrixGenerator, WeightMatrix};

/// Owns the map between engine runs.
///
/// Editors mutate the map through [`map_mut`](Self::map_mut) (or the
/// `edit_*` shortcuts) strictly between calls to [`converge`](Self::converge).
pub struct Simulation {
    generator: MatrixGenerator,
    engine: ConvergenceEngine,
    map: CognitiveMap,
    last_report: Option<ConvergenceReport>,
}

impl Simulation {
    /// Random session: pick a node count from the configured range,
    /// generate weights, draw initial values in `[0, 1)` and converge once.
    pub fn random(config: FcmConfig) -> Result<Self> {
        config.validate()?;
        let mut generator = MatrixGenerator::new(config.clone());

        let n = generator.random_size()?;
        let weights = generator.generate(n);
        tracing::info!(n, "created {n} x {n} weight matrix");

        let values = generator.random_values(n);
        let map = CognitiveMap::new(weights, values)?;

        let mut sim = Self {
            generator,
            engine: ConvergenceEngine::new(config),
            map,
            last_report: None,
        };
        sim.converge();
        Ok(sim)
    }

    /// Session over an existing map. Nothing is run.
    pub fn with_map(config: FcmConfig, map: CognitiveMap) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            generator: MatrixGenerator::new(config.clone()),
            engine: ConvergenceEngine::new(config),
            map,
            last_report: None,
        })
    }

    /// Replace the map with a freshly generated one of size `n`.
    ///
    /// `n` must lie in the configured range.
    pub fn regenerate(&mut self, n: usize) -> Result<&CognitiveMap> {
        let weights: WeightMatrix = self.generator.generate_checked(n)?;
        let values = self.generator.random_values(n);
        self.map = CognitiveMap::new(weights, values)?;
        self.last_report = None;
        Ok(&self.map)
    }

    /// Run the engine on the current map.
    pub fn converge(&mut self) -> ConvergenceReport {
        let report = self.engine.run(&mut self.map);
        self.last_report = Some(report);
        report
    }

    /// Run the engine, collecting every event.
    pub fn converge_recorded(&mut self) -> (ConvergenceReport, Vec<ConvergenceEvent>) {
        let mut events = Vec::new();
        let report = self.engine.run_observed(&mut self.map, |e| events.push(e));
        self.last_report = Some(report);
        (report, events)
    }

    /// Node editor, 1-based.
    pub fn edit_node(&mut self, index: usize, value: f64) -> Result<()> {
        self.map.edit_node(index, value)
    }

    /// Edge editor, 0-based.
    pub fn edit_edge(&mut self, src: usize, dst: usize, weight: f64) -> Result<()> {
        self.map.edit_edge(src, dst, weight)
    }

    pub fn map(&self) -> &CognitiveMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut CognitiveMap {
        &mut self.map
    }

    pub fn config(&self) -> &FcmConfig {
        self.engine.config()
    }

    /// Report of the most recent run, if any since the map was created.
    pub fn last_report(&self) -> Option<ConvergenceReport> {
        self.last_report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn random_session_is_deterministic_per_seed() {
        let a = Simulation::random(FcmConfig::default().with_seed(42)).unwrap();
        let b = Simulation::random(FcmConfig::default().with_seed(42)).unwrap();
        assert_eq!(a.map(), b.map());
    }

    #[test]
    fn random_session_respects_config_range() {
        for seed in 0..20 {
            let sim = Simulation::random(FcmConfig::default().with_seed(seed)).unwrap();
            let n = sim.map().node_count();
            assert!((3..10).contains(&n), "seed {seed} gave {n} nodes");
            assert!(sim.map().weights().has_zero_diagonal());
            assert!(sim.last_report().is_some());
        }
    }

    #[test]
    fn invalid_config_rejected() {
        let config = FcmConfig::default().with_max_iterations(0);
        assert!(matches!(
            Simulation::random(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn regenerate_checks_dimension() {
        let mut sim = Simulation::random(FcmConfig::default().with_seed(1)).unwrap();
        assert!(sim.regenerate(4).is_ok());
        assert_eq!(sim.map().node_count(), 4);
        assert!(sim.last_report().is_none());
        assert!(matches!(
            sim.regenerate(10),
            Err(Error::InvalidDimension { n: 10, .. })
        ));
        assert_eq!(sim.map().node_count(), 4);
    }

    #[test]
    fn edits_then_converge() {
        let map = CognitiveMap::new(WeightMatrix::zeros(3), vec![0.5; 3]).unwrap();
        let mut sim = Simulation::with_map(FcmConfig::default(), map).unwrap();

        sim.edit_node(1, 0.9).unwrap();
        sim.edit_edge(0, 1, 0.8).unwrap();
        assert_eq!(
            sim.edit_node(4, 0.1),
            Err(Error::IndexOutOfRange { index: 4, len: 3 })
        );

        let (report, events) = sim.converge_recorded();
        assert!(report.converged);
        assert!(matches!(
            events.last(),
            Some(ConvergenceEvent::Converged { .. })
        ));
        assert_eq!(sim.last_report(), Some(report));
    }

    #[test]
    fn map_mut_edits_are_seen_by_next_run() {
        let map = CognitiveMap::new(WeightMatrix::zeros(2), vec![0.2, 0.8]).unwrap();
        let mut sim = Simulation::with_map(FcmConfig::default(), map).unwrap();

        sim.map_mut().edit_edge(0, 1, 1.0).unwrap();
        assert_eq!(sim.map().weights().get(0, 1), 1.0);

        let coupled = sim.converge();
        let mut isolated =
            CognitiveMap::new(WeightMatrix::zeros(2), vec![0.2, 0.8]).unwrap();
        ConvergenceEngine::new(FcmConfig::default()).run(&mut isolated);

        assert!(coupled.converged);
        assert!(sim.map().values()[1] > isolated.values()[1]);
    }
}
