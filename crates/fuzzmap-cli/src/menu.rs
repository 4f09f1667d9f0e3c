//! Interactive menu: edit node, edit edge, display graph, quit.
//!
//! Editors run strictly between engine runs; nothing here triggers
//! convergence.

use std::io::{BufRead, Write};
use std::str::FromStr;

use fuzzmap_core::Simulation;
use fuzzmap_vis::{render_dot, render_table, GraphView};

use crate::error::{CliError, Result};

const MENU: &str = "Menu:\n\t1. Change a node's value\n\t2. Change an edge value\n\t3. Display a visual representation of the graph\n\t4. Quit\nSelection: ";

/// How the graph is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Edge table
    #[default]
    Table,
    /// Graphviz DOT
    Dot,
}

/// Whether the loop continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Console session over arbitrary input and output.
pub struct Menu<R, W> {
    input: R,
    output: W,
    mode: RenderMode,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, mode: RenderMode) -> Self {
        Self {
            input,
            output,
            mode,
        }
    }

    /// Loop until the user quits or input ends.
    pub fn run(&mut self, sim: &mut Simulation) -> Result<()> {
        loop {
            let Some(line) = self.prompt(MENU)? else {
                return Ok(());
            };

            let selection = line.trim();
            if selection.is_empty() || !selection.bytes().all(|b| b.is_ascii_digit()) {
                writeln!(self.output, "Please select a valid action.\n")?;
                continue;
            }

            let outcome = match selection.parse::<u32>() {
                Ok(1) => self.edit_node(sim),
                Ok(2) => self.edit_edge(sim),
                Ok(3) => self.show_graph(sim).map(|()| Flow::Continue),
                Ok(4) => Ok(Flow::Quit),
                _ => Ok(Flow::Continue),
            };

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(e) if e.is_recoverable() => {
                    tracing::debug!(error = %e, "edit rejected");
                    writeln!(self.output, "Error: {e}\n")?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn edit_node(&mut self, sim: &mut Simulation) -> Result<Flow> {
        writeln!(self.output, "Please select which of the following nodes to change:")?;
        for (i, value) in sim.map().values().iter().enumerate() {
            writeln!(self.output, "Node: {}; Value: {:.4}", i + 1, value)?;
        }

        let Some(raw) = self.prompt("Node to change: ")? else {
            return Ok(Flow::Quit);
        };
        let index: usize = parse_field(&raw, "node number")?;
        // Validate before asking for a value
        sim.map().values().node(index)?;

        let Some(raw) = self.prompt(&format!("New value of node {index}: "))? else {
            return Ok(Flow::Quit);
        };
        let value: f64 = parse_field(&raw, "node value")?;

        sim.edit_node(index, value)?;
        Ok(Flow::Continue)
    }

    fn edit_edge(&mut self, sim: &mut Simulation) -> Result<Flow> {
        writeln!(
            self.output,
            "Please view the graph and select edges that you wish to change."
        )?;
        self.show_graph(sim)?;

        let Some(raw) = self.prompt("Input the source node number: ")? else {
            return Ok(Flow::Quit);
        };
        let src: usize = parse_field(&raw, "source node")?;

        let Some(raw) = self.prompt("Input the destination node number: ")? else {
            return Ok(Flow::Quit);
        };
        let dst: usize = parse_field(&raw, "destination node")?;
        sim.map().weights().try_get(src, dst)?;

        let Some(raw) = self.prompt("Enter a new value for the edge: ")? else {
            return Ok(Flow::Quit);
        };
        let weight: f64 = parse_field(&raw, "edge weight")?;

        sim.edit_edge(src, dst, weight)?;
        self.show_graph(sim)?;
        Ok(Flow::Continue)
    }

    fn show_graph(&mut self, sim: &Simulation) -> Result<()> {
        let graph = GraphView::from_matrix(sim.map().weights());
        let text = match self.mode {
            RenderMode::Table => render_table(&graph),
            RenderMode::Dot => render_dot(&graph, Some(&sim.map().values()[..])),
        };
        write!(self.output, "{text}")?;
        Ok(())
    }

    /// Print `text` and read one line. `None` on end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }
}

fn parse_field<T: FromStr>(raw: &str, what: &'static str) -> Result<T> {
    raw.trim().parse().map_err(|_| CliError::InvalidInput {
        what,
        input: raw.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzzmap_core::{CognitiveMap, FcmConfig, WeightMatrix};
    use std::io::Cursor;

    fn sim() -> Simulation {
        let weights = WeightMatrix::from_rows(vec![
            vec![0.0, 0.5, 0.0],
            vec![0.0, 0.0, -0.25],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        let map = CognitiveMap::new(weights, vec![0.1, 0.2, 0.3]).unwrap();
        Simulation::with_map(FcmConfig::default(), map).unwrap()
    }

    fn drive(input: &str, sim: &mut Simulation, mode: RenderMode) -> String {
        let mut menu = Menu::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), mode);
        menu.run(sim).unwrap();
        String::from_utf8(menu.into_output()).unwrap()
    }

    #[test]
    fn quit_immediately() {
        let mut s = sim();
        let out = drive("4\n", &mut s, RenderMode::Table);
        assert_eq!(out, MENU);
    }

    #[test]
    fn end_of_input_quits() {
        let mut s = sim();
        let out = drive("", &mut s, RenderMode::Table);
        assert_eq!(out, MENU);
    }

    #[test]
    fn non_numeric_selection_is_rejected() {
        let mut s = sim();
        let out = drive("abc\n4\n", &mut s, RenderMode::Table);
        assert!(out.contains("Please select a valid action."));
    }

    #[test]
    fn unknown_number_redisplays_menu() {
        let mut s = sim();
        let out = drive("9\n4\n", &mut s, RenderMode::Table);
        assert_eq!(out.matches("Selection: ").count(), 2);
        assert!(!out.contains("Please select a valid action."));
    }

    #[test]
    fn edit_node_uses_one_based_index() {
        let mut s = sim();
        let out = drive("1\n2\n0.9\n4\n", &mut s, RenderMode::Table);
        assert!(out.contains("Node: 2; Value: 0.2000"));
        assert!(out.contains("New value of node 2: "));
        assert_eq!(s.map().values()[1], 0.9);
    }

    #[test]
    fn edit_node_rejects_zero_and_past_end() {
        let mut s = sim();
        let out = drive("1\n0\n1\n4\n4\n", &mut s, RenderMode::Table);
        assert!(out.contains("Error: index 0 out of range for 3 nodes"));
        assert!(out.contains("Error: index 4 out of range for 3 nodes"));
        assert!(!out.contains("New value of node"));
        assert_eq!(&s.map().values()[..], &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn edit_node_rejects_garbage_value() {
        let mut s = sim();
        let out = drive("1\n1\nlots\n4\n", &mut s, RenderMode::Table);
        assert!(out.contains("Error: invalid node value: \"lots\""));
        assert_eq!(s.map().values()[0], 0.1);
    }

    #[test]
    fn edit_edge_uses_zero_based_indices() {
        let mut s = sim();
        let out = drive("2\n2\n0\n0.75\n4\n", &mut s, RenderMode::Table);
        assert_eq!(s.map().weights().get(2, 0), 0.75);
        // Graph shown before and after the edit
        assert_eq!(out.matches("  0 -> 1   :  0.50").count(), 2);
        assert!(out.contains("  2 -> 0   :  0.75"));
    }

    #[test]
    fn edit_edge_out_of_range_reports_error() {
        let mut s = sim();
        let out = drive("2\n0\n3\n4\n", &mut s, RenderMode::Table);
        assert!(out.contains("Error: index 3 out of range for 3 nodes"));
        assert!(!out.contains("Enter a new value for the edge"));
    }

    #[test]
    fn edit_edge_self_loop_reports_error() {
        let mut s = sim();
        let out = drive("2\n1\n1\n0.5\n4\n", &mut s, RenderMode::Table);
        assert!(out.contains("Error: node 1 cannot influence itself"));
        assert_eq!(s.map().weights().get(1, 1), 0.0);
    }

    #[test]
    fn display_in_dot_mode() {
        let mut s = sim();
        let out = drive("3\n4\n", &mut s, RenderMode::Dot);
        assert!(out.contains("digraph fcm {"));
        assert!(out.contains("    1 -> 2 [label=\"-0.25\"];"));
    }

    #[test]
    fn edits_do_not_run_convergence() {
        let mut s = sim();
        drive("1\n1\n0.9\n4\n", &mut s, RenderMode::Table);
        assert!(s.last_report().is_none());
        assert_eq!(&s.map().values()[..], &[0.9, 0.2, 0.3]);
    }
}
