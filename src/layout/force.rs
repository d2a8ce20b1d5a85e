//! Force-directed layout simulation.
//!
//! Velocity-Verlet integration of three forces: springs along links,
//! pairwise many-body charge and a centering force. A cooling parameter
//! `alpha` scales every force and decays geometrically each tick; once it falls
//! below `alpha_min`, or after `max_ticks` steps, the simulation stops and
//! fires its end callback.
//!
//! The link force biases displacement toward the lower-degree endpoint and
//! weakens springs attached to hubs, which keeps dense neighbourhoods from
//! collapsing.
//!
//! # References
//!
//! - Dwyer, T. (2009). "Scalable, Versatile and Simple Constrained Graph Layout."
//! - Verlet, L. (1967). "Computer experiments on classical fluids."

use crate::error::{Error, Result};
use crate::geometry::Point;

/// Simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    /// Rest length of link springs.
    pub link_distance: f64,
    /// Many-body strength; negative repels.
    pub charge: f64,
    /// Fraction of velocity removed each tick.
    pub velocity_decay: f64,
    /// Simulation stops once alpha falls below this.
    pub alpha_min: f64,
    /// Per-tick alpha decay rate.
    pub alpha_decay: f64,
    /// Hard step cap; the simulation ends here even if alpha has not cooled.
    pub max_ticks: usize,
    /// Centering target.
    pub center: (f64, f64),
}

impl Default for ForceParams {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            link_distance: 30.0,
            charge: -30.0,
            velocity_decay: 0.4,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            max_ticks: 1_000,
            center: (0.0, 0.0),
        }
    }
}

/// Position and velocity of one simulated node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimNode {
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// X velocity.
    pub vx: f64,
    /// Y velocity.
    pub vy: f64,
}

impl SimNode {
    /// Position as a screen point.
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x as f32, self.y as f32)
    }
}

/// Whether the simulation is still moving after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Alpha is still above the minimum.
    Running,
    /// The simulation has stopped; further ticks do nothing.
    Ended,
}

struct SimLink {
    source: usize,
    target: usize,
    strength: f64,
    bias: f64,
}

type EndCallback = Box<dyn FnOnce(&[SimNode])>;

/// Deterministic linear congruential generator for tie-breaking jitter.
struct Lcg(u64);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        self.0 = (1_664_525 * self.0 + 1_013_904_223) % 4_294_967_296;
        self.0 as f64 / 4_294_967_296.0
    }

    fn jiggle(&mut self) -> f64 {
        (self.next_unit() - 0.5) * 1e-6
    }
}

/// Cooperative force simulation over a fixed node set.
pub struct ForceSimulation {
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    params: ForceParams,
    alpha: f64,
    ticks: usize,
    ended: bool,
    on_end: Option<EndCallback>,
    random: Lcg,
}

impl std::fmt::Debug for ForceSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceSimulation")
            .field("nodes", &self.nodes.len())
            .field("links", &self.links.len())
            .field("alpha", &self.alpha)
            .field("ticks", &self.ticks)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

impl ForceSimulation {
    /// Create a simulation for `node_count` nodes connected by index pairs.
    ///
    /// Nodes start on a phyllotaxis spiral around the origin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedData`] if a link references an index out of range.
    pub fn new(node_count: usize, links: &[(usize, usize)], params: ForceParams) -> Result<Self> {
        let mut degree = vec![0usize; node_count];
        for (i, &(s, t)) in links.iter().enumerate() {
            if s >= node_count || t >= node_count {
                return Err(Error::MalformedData(format!(
                    "link {i} ({s} -> {t}) is out of range for {node_count} nodes"
                )));
            }
            degree[s] += 1;
            degree[t] += 1;
        }

        let links = links
            .iter()
            .map(|&(source, target)| {
                let (ds, dt) = (degree[source] as f64, degree[target] as f64);
                SimLink { source, target, strength: 1.0 / ds.min(dt), bias: ds / (ds + dt) }
            })
            .collect();

        let initial_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
        let nodes = (0..node_count)
            .map(|i| {
                let radius = 10.0 * (0.5 + i as f64).sqrt();
                let angle = i as f64 * initial_angle;
                SimNode { x: radius * angle.cos(), y: radius * angle.sin(), vx: 0.0, vy: 0.0 }
            })
            .collect();

        Ok(Self {
            nodes,
            links,
            params,
            alpha: 1.0,
            ticks: 0,
            ended: false,
            on_end: None,
            random: Lcg(1),
        })
    }

    /// Register the callback fired once when the simulation ends.
    pub fn on_end<F>(&mut self, callback: F)
    where
        F: FnOnce(&[SimNode]) + 'static,
    {
        self.on_end = Some(Box::new(callback));
    }

    /// Advance one step.
    pub fn tick(&mut self) -> TickOutcome {
        if self.ended {
            return TickOutcome::Ended;
        }

        self.alpha += (0.0 - self.alpha) * self.params.alpha_decay;
        self.apply_links();
        self.apply_charge();
        self.apply_center();

        let keep = 1.0 - self.params.velocity_decay;
        for node in &mut self.nodes {
            node.vx *= keep;
            node.vy *= keep;
            node.x += node.vx;
            node.y += node.vy;
        }
        self.ticks += 1;

        let cooled = self.alpha.is_nan() || self.alpha < self.params.alpha_min;
        if cooled || self.ticks >= self.params.max_ticks {
            self.ended = true;
            tracing::debug!(ticks = self.ticks, nodes = self.nodes.len(), "force simulation ended");
            if let Some(callback) = self.on_end.take() {
                callback(&self.nodes);
            }
            return TickOutcome::Ended;
        }
        TickOutcome::Running
    }

    /// Tick until the simulation ends; returns the number of ticks taken.
    pub fn run(&mut self) -> usize {
        let start = self.ticks;
        while self.tick() == TickOutcome::Running {}
        self.ticks - start
    }

    /// Current cooling parameter.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Whether the simulation has ended.
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// Ticks taken so far.
    #[must_use]
    pub const fn ticks(&self) -> usize {
        self.ticks
    }

    /// Current node states.
    #[must_use]
    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    fn apply_links(&mut self) {
        let alpha = self.alpha;
        let distance = self.params.link_distance;
        for link in &self.links {
            let (s, t) = (self.nodes[link.source], self.nodes[link.target]);
            let mut x = t.x + t.vx - s.x - s.vx;
            let mut y = t.y + t.vy - s.y - s.vy;
            if x == 0.0 {
                x = self.random.jiggle();
            }
            if y == 0.0 {
                y = self.random.jiggle();
            }
            let len = (x * x + y * y).sqrt();
            let l = (len - distance) / len * alpha * link.strength;
            let (x, y) = (x * l, y * l);

            let target = &mut self.nodes[link.target];
            target.vx -= x * link.bias;
            target.vy -= y * link.bias;
            let source = &mut self.nodes[link.source];
            source.vx += x * (1.0 - link.bias);
            source.vy += y * (1.0 - link.bias);
        }
    }

    fn apply_charge(&mut self) {
        let w = self.params.charge * self.alpha;
        let n = self.nodes.len();
        for i in 0..n {
            let (mut dvx, mut dvy) = (0.0, 0.0);
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut x = self.nodes[j].x - self.nodes[i].x;
                let mut y = self.nodes[j].y - self.nodes[i].y;
                let mut l = x * x + y * y;
                if x == 0.0 {
                    x = self.random.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.random.jiggle();
                    l += y * y;
                }
                if l < 1.0 {
                    l = l.sqrt();
                }
                dvx += x * w / l;
                dvy += y * w / l;
            }
            self.nodes[i].vx += dvx;
            self.nodes[i].vy += dvy;
        }
    }

    fn apply_center(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        let n = self.nodes.len() as f64;
        let (sx, sy) =
            self.nodes.iter().fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
        let (dx, dy) = (sx / n - self.params.center.0, sy / n - self.params.center.1);
        for node in &mut self.nodes {
            node.x -= dx;
            node.y -= dy;
        }
    }
}
