//! Force-directed node placement.
//!
//! Fruchterman–Reingold: every pair of nodes repels with `k² / d`, every
//! edge attracts its endpoints with `|w| · d² / k`, and the step size is
//! capped by a temperature that cools linearly to zero. Edge direction is
//! ignored for placement.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::graph::GraphView;

/// A node position in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Layout parameters.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Seed for initial positions
    pub seed: u64,
    /// Cooling steps
    pub iterations: usize,
    /// Initial temperature (max step length)
    pub temperature: f64,
    /// Half-width of the output box, centred on the origin
    pub scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 50,
            temperature: 0.1,
            scale: 1.0,
        }
    }
}

/// Smallest distance used in force terms, keeps coincident nodes finite.
const MIN_DISTANCE: f64 = 0.01;

/// Place every node of `graph`. Deterministic for a given seed.
pub fn spring_layout(graph: &GraphView, config: &LayoutConfig) -> Vec<Position> {
    let n = graph.node_count;
    match n {
        0 => return Vec::new(),
        1 => return vec![Position::default()],
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<Position> = (0..n)
        .map(|_| Position::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    // Optimal pairwise distance for a unit area
    let k = (1.0 / n as f64).sqrt();
    let cooling = config.temperature / (config.iterations.max(1) as f64);
    let mut temperature = config.temperature;

    for _ in 0..config.iterations {
        let mut disp = vec![Position::default(); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let d = pos[i].distance(&pos[j]).max(MIN_DISTANCE);
                let f = k * k / d;
                disp[i].x += dx / d * f;
                disp[i].y += dy / d * f;
                disp[j].x -= dx / d * f;
                disp[j].y -= dy / d * f;
            }
        }

        for edge in &graph.edges {
            let (s, t) = (edge.source, edge.target);
            let dx = pos[s].x - pos[t].x;
            let dy = pos[s].y - pos[t].y;
            let d = pos[s].distance(&pos[t]).max(MIN_DISTANCE);
            let f = edge.weight.abs() * d * d / k;
            disp[s].x -= dx / d * f;
            disp[s].y -= dy / d * f;
            disp[t].x += dx / d * f;
            disp[t].y += dy / d * f;
        }

        for (p, d) in pos.iter_mut().zip(&disp) {
            let len = (d.x * d.x + d.y * d.y).sqrt();
            if len > 0.0 {
                let step = len.min(temperature);
                p.x += d.x / len * step;
                p.y += d.y / len * step;
            }
        }

        temperature -= cooling;
    }

    rescale(&mut pos, config.scale);
    tracing::debug!(nodes = n, iterations = config.iterations, "spring layout complete");
    pos
}

/// Centre on the origin and scale so the farthest coordinate is `scale`.
fn rescale(pos: &mut [Position], scale: f64) {
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p.y).sum::<f64>() / n;

    let mut extent: f64 = 0.0;
    for p in pos.iter_mut() {
        p.x -= cx;
        p.y -= cy;
        extent = extent.max(p.x.abs()).max(p.y.abs());
    }

    if extent > 0.0 {
        for p in pos.iter_mut() {
            p.x *= scale / extent;
            p.y *= scale / extent;
        }
    }
}
