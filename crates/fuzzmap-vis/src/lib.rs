//! Fuzzy Cognitive Map Visualization
//!
//! Read-only views of a map for humans and frontends.
//!
//! # Architecture
//!
//! - **Graph**: nodes plus one labelled edge per non-zero weight
//! - **Layout**: seeded force-directed placement
//! - **Render**: Graphviz DOT, terminal table, JSON snapshot
//! - **Timeline**: replay a convergence run event by event
//!
//! # Usage
//!
//! ```ignore
//! let graph = GraphView::from_matrix(sim.map().weights());
//! println!("{}", render_dot(&graph, Some(sim.map().values())));
//! ```

mod graph;
mod layout;
mod render;
mod timeline;

pub use graph::{round2, EdgeLabel, GraphView};
pub use layout::{spring_layout, LayoutConfig, Position};
pub use render::{render_dot, render_table, GraphSnapshot, NodeSnapshot};
pub use timeline::{FrameState, Timeline};

#[cfg(test)]
mod tests {
    use super::*;
    use fuzzmap_core::{FcmConfig, Simulation};

    #[test]
    fn random_session_renders() {
        let sim = Simulation::random(FcmConfig::default().with_seed(3)).unwrap();
        let graph = GraphView::from_matrix(sim.map().weights());

        assert_eq!(graph.node_count, sim.map().node_count());
        let dot = render_dot(&graph, Some(&sim.map().values()[..]));
        assert_eq!(dot.matches(" -> ").count(), graph.edges.len());
    }

    #[test]
    fn timeline_replays_session_run() {
        let mut sim = Simulation::random(FcmConfig::default().with_seed(8)).unwrap();
        sim.edit_node(1, 0.0).unwrap();

        let before = sim.map().values().to_vec();
        let (report, events) = sim.converge_recorded();
        let timeline = Timeline::new(before, events);

        let end = timeline.state_at(timeline.total_frames());
        assert_eq!(end.values, sim.map().values().to_vec());
        assert_eq!(end.pass, report.passes);
    }
}
