//! Node/link graph data and its adjacency index.
//!
//! JSON input has the shape `{"nodes": [{"id", "group"}], "links": [{"source",
//! "target", "value"}]}`. Link endpoints name node ids and are resolved to
//! node indices at load time; an unknown id is a load error.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// A graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Unique identifier, also used as the label.
    pub id: String,
    /// Group used for coloring.
    pub group: i64,
}

/// A weighted link between two node indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphLink {
    /// Source node index.
    pub source: usize,
    /// Target node index.
    pub target: usize,
    /// Link weight.
    pub value: f64,
}

/// Ids may be written as strings or integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawNode {
    id: RawId,
    #[serde(default)]
    group: i64,
}

fn default_link_value() -> f64 {
    1.0
}

#[derive(Deserialize)]
struct RawLink {
    source: RawId,
    target: RawId,
    #[serde(default = "default_link_value")]
    value: f64,
}

#[derive(Deserialize)]
struct RawGraph {
    nodes: Vec<RawNode>,
    #[serde(default)]
    links: Vec<RawLink>,
}

/// Graph with links resolved to node indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    /// Nodes in load order.
    pub nodes: Vec<GraphNode>,
    /// Links in load order.
    pub links: Vec<GraphLink>,
}

impl Graph {
    /// Build a graph from nodes and id-based links.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if a link names an id not among `nodes`.
    pub fn from_parts(nodes: Vec<GraphNode>, links: &[(&str, &str, f64)]) -> Result<Self> {
        let index = id_index(&nodes);
        let links = links
            .iter()
            .enumerate()
            .map(|(i, &(s, t, value))| {
                let (source, target) = (resolve(&index, i, s)?, resolve(&index, i, t)?);
                Ok(GraphLink { source, target, value })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { nodes, links })
    }

    /// Parse graph JSON from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid JSON or unresolved link endpoints.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let raw: RawGraph = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    /// Parse graph JSON text.
    ///
    /// # Errors
    ///
    /// See [`Graph::from_reader`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawGraph = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    /// Load a graph JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Number of links touching each node.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        let mut degree = vec![0; self.nodes.len()];
        for link in &self.links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }
        degree
    }

    /// Build the adjacency index.
    #[must_use]
    pub fn adjacency(&self) -> Adjacency {
        Adjacency::new(self.links.iter().map(|l| (l.source, l.target)))
    }

    fn from_raw(raw: RawGraph) -> Result<Self> {
        let nodes: Vec<GraphNode> =
            raw.nodes.into_iter().map(|n| GraphNode { id: n.id.into(), group: n.group }).collect();
        let index = id_index(&nodes);

        let mut links = Vec::with_capacity(raw.links.len());
        for (i, link) in raw.links.into_iter().enumerate() {
            let (source, target): (String, String) = (link.source.into(), link.target.into());
            links.push(GraphLink {
                source: resolve(&index, i, &source)?,
                target: resolve(&index, i, &target)?,
                value: link.value,
            });
        }

        tracing::info!(nodes = nodes.len(), links = links.len(), "loaded graph");
        Ok(Self { nodes, links })
    }
}

fn id_index(nodes: &[GraphNode]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id.clone()).or_insert(i);
    }
    index
}

fn resolve(index: &HashMap<String, usize>, link: usize, id: &str) -> Result<usize> {
    index.get(id).copied().ok_or_else(|| Error::UnknownNode { link, id: id.to_string() })
}

/// Undirected, reflexive adjacency over node indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    pairs: HashSet<(usize, usize)>,
}

impl Adjacency {
    /// Index the given directed pairs.
    pub fn new<I: IntoIterator<Item = (usize, usize)>>(pairs: I) -> Self {
        Self { pairs: pairs.into_iter().collect() }
    }

    /// Whether `a` and `b` are linked in either direction, or are the same node.
    #[must_use]
    pub fn connected(&self, a: usize, b: usize) -> bool {
        a == b || self.pairs.contains(&(a, b)) || self.pairs.contains(&(b, a))
    }
}
