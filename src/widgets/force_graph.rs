//! Force-directed network graph with neighbour highlighting.
//!
//! Node positions come from [`ForceSimulation`]; nothing is drawn until the
//! simulation reports completion through its end callback, at which point the
//! final positions are frozen into the scene. Hovering a node fades every node
//! and link outside its neighbourhood and reveals the neighbours' labels.

use std::cell::RefCell;
use std::rc::Rc;

use crate::color::{Rgba, TABLEAU10};
use crate::data::{Adjacency, Graph};
use crate::error::{Error, Result};
use crate::geometry::{Margin, Point, Rect};
use crate::layout::{ForceParams, ForceSimulation, TickOutcome};
use crate::scale::OrdinalScale;
use crate::scene::{Element, ElementId, Scene, Shape, Style, TextAnchor};

/// Element classes owned by the graph.
pub mod class {
    /// Link lines.
    pub const LINK: &str = "link";
    /// Node circles.
    pub const NODE: &str = "node";
    /// Node labels.
    pub const LABEL: &str = "label";
}

/// Opacity of nodes and links outside the hovered neighbourhood.
pub const FADED_OPACITY: f32 = 0.3;

/// Node circle radius.
pub const NODE_RADIUS: f32 = 5.0;

const LABEL_OFFSET: (f32, f32) = (8.0, 6.0);
const LABEL_FONT_SIZE: f32 = 12.0;

/// Force graph builder.
#[derive(Debug, Clone)]
pub struct ForceGraph {
    graph: Graph,
    width: u32,
    height: u32,
    margin: Margin,
    params: ForceParams,
}

impl ForceGraph {
    /// Create a graph widget with the default 800×800 layout.
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            width: 800,
            height: 800,
            margin: Margin::new(25.0, 20.0, 20.0, 35.0),
            params: ForceParams::default(),
        }
    }

    /// Set the margins.
    #[must_use]
    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Override simulation parameters (the center is always the inner-area center).
    #[must_use]
    pub fn params(mut self, params: ForceParams) -> Self {
        self.params = params;
        self
    }

    /// Prepare the simulation. Nothing is drawn until it ends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the margins leave no inner area.
    pub fn build(self) -> Result<BuiltForceGraph> {
        let inner = self.margin.inner(self.width as f32, self.height as f32);
        if inner.width <= 0.0 || inner.height <= 0.0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }

        let center = inner.center();
        let params =
            ForceParams { center: (f64::from(center.x), f64::from(center.y)), ..self.params };
        let pairs: Vec<(usize, usize)> =
            self.graph.links.iter().map(|l| (l.source, l.target)).collect();
        let mut simulation = ForceSimulation::new(self.graph.nodes.len(), &pairs, params)?;

        let settled = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&settled);
        simulation.on_end(move |nodes| {
            *sink.borrow_mut() = Some(nodes.iter().map(|n| n.point()).collect());
        });

        let colors = OrdinalScale::new(self.graph.nodes.iter().map(|n| n.group), &TABLEAU10)?;
        Ok(BuiltForceGraph {
            adjacency: self.graph.adjacency(),
            graph: self.graph,
            colors,
            inner,
            simulation,
            settled,
            positions: Vec::new(),
            scene: Scene::new(self.width as f32, self.height as f32),
            handles: Handles::default(),
            hovered: None,
        })
    }
}

impl batuta_common::display::WithDimensions for ForceGraph {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

#[derive(Debug, Clone, Default)]
struct Handles {
    links: Vec<ElementId>,
    nodes: Vec<ElementId>,
    labels: Vec<ElementId>,
}

/// A graph widget driving its simulation and owning its scene.
#[derive(Debug)]
pub struct BuiltForceGraph {
    graph: Graph,
    adjacency: Adjacency,
    colors: OrdinalScale<i64>,
    inner: Rect,
    simulation: ForceSimulation,
    settled: Rc<RefCell<Option<Vec<Point>>>>,
    positions: Vec<Point>,
    scene: Scene,
    handles: Handles,
    hovered: Option<usize>,
}

impl BuiltForceGraph {
    /// Run up to `steps` simulation ticks, drawing the graph once it ends.
    pub fn advance(&mut self, steps: usize) -> TickOutcome {
        let mut outcome =
            if self.simulation.is_ended() { TickOutcome::Ended } else { TickOutcome::Running };
        for _ in 0..steps {
            outcome = self.simulation.tick();
            if outcome == TickOutcome::Ended {
                break;
            }
        }
        self.freeze_if_ended();
        outcome
    }

    /// Run the simulation to completion and draw; returns the ticks taken.
    pub fn settle(&mut self) -> usize {
        let ticks = self.simulation.run();
        self.freeze_if_ended();
        ticks
    }

    /// Whether final positions have been drawn.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.handles.nodes.is_empty()
            || (self.graph.nodes.is_empty() && self.simulation.is_ended())
    }

    /// Final node positions (empty until settled).
    #[must_use]
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// The underlying graph.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Adjacency index used for hover highlighting.
    #[must_use]
    pub const fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Inner drawing area; the simulation is centered on it.
    #[must_use]
    pub const fn inner(&self) -> Rect {
        self.inner
    }

    /// The rendered scene.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Currently hovered node.
    #[must_use]
    pub const fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Fill color of a node's group.
    #[must_use]
    pub fn node_color(&self, index: usize) -> Option<Rgba> {
        self.graph.nodes.get(index).map(|n| self.colors.get(&n.group))
    }

    /// Node whose circle contains `point`; the nearest center wins overlaps.
    #[must_use]
    pub fn node_at(&self, point: Point) -> Option<usize> {
        let reach = NODE_RADIUS * NODE_RADIUS;
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance_squared(point)))
            .filter(|&(_, d2)| d2 <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Enter (`Some`) or leave (`None`) a node.
    ///
    /// Entering fades everything outside the node's neighbourhood and shows
    /// the neighbours' labels; leaving restores full opacity and hides every
    /// label. Ignored until the graph is settled or for unknown nodes.
    pub fn hover(&mut self, node: Option<usize>) {
        if !self.is_settled() || node.is_some_and(|n| n >= self.graph.nodes.len()) {
            return;
        }
        self.hovered = node;

        for (i, id) in self.handles.nodes.iter().enumerate() {
            let opacity = match node {
                Some(n) if !self.adjacency.connected(n, i) => FADED_OPACITY,
                _ => 1.0,
            };
            if let Some(element) = self.scene.get_mut(*id) {
                element.style.opacity = opacity;
            }
        }

        for (link, id) in self.graph.links.iter().zip(&self.handles.links) {
            let opacity = match node {
                Some(n) if link.source != n && link.target != n => FADED_OPACITY,
                _ => 1.0,
            };
            if let Some(element) = self.scene.get_mut(*id) {
                element.style.opacity = opacity;
            }
        }

        for (i, id) in self.handles.labels.iter().enumerate() {
            let visible = node.is_some_and(|n| self.adjacency.connected(n, i));
            if let Some(element) = self.scene.get_mut(*id) {
                element.style.visible = visible;
            }
        }

        tracing::debug!(node = ?node, "graph hover");
    }

    fn freeze_if_ended(&mut self) {
        if self.is_settled() {
            return;
        }
        let Some(positions) = self.settled.borrow_mut().take() else { return };
        self.positions = positions;
        self.draw();
    }

    fn draw(&mut self) {
        for class in [class::LINK, class::NODE, class::LABEL] {
            self.scene.remove_by_class(class);
        }
        self.handles = Handles::default();

        for link in &self.graph.links {
            let (from, to) = (self.positions[link.source], self.positions[link.target]);
            let width = 0.5 * link.value.max(0.0).sqrt() as f32;
            let style = Style::stroked(Rgba::GREY, width);
            let id = self.scene.push(Element::new(class::LINK, Shape::Line { from, to }, style));
            self.handles.links.push(id);
        }

        for (node, &center) in self.graph.nodes.iter().zip(&self.positions) {
            let style = Style::filled(self.colors.get(&node.group)).with_stroke(Rgba::BLACK, 1.0);
            let shape = Shape::Circle { center, radius: NODE_RADIUS };
            let id = self.scene.push(Element::new(class::NODE, shape, style));
            self.handles.nodes.push(id);
        }

        for (node, &center) in self.graph.nodes.iter().zip(&self.positions) {
            let text = Shape::Text {
                at: center.offset(LABEL_OFFSET.0, LABEL_OFFSET.1),
                content: node.id.clone(),
                font_size: LABEL_FONT_SIZE,
                anchor: TextAnchor::Start,
            };
            let style = Style::filled(Rgba::BLACK).hidden();
            let id = self.scene.push(Element::new(class::LABEL, text, style));
            self.handles.labels.push(id);
        }

        tracing::debug!(
            nodes = self.positions.len(),
            links = self.graph.links.len(),
            "rendered force graph"
        );
    }
}
