//! Undirected coupling graphs and their dense adjacency form.
//!
//! A [`Graph`] is the edge-list input boundary of the engine: nodes are
//! indexed `0..n` and every edge carries a weight (1.0 unless stated
//! otherwise). [`Graph::to_adjacency`] produces the dense symmetric matrix
//! the model consumes, in node-index order.
//!
//! Weighted graphs can be coerced to unweighted form with
//! [`Graph::unweighted_copy`]: a new graph with the same nodes and edges and
//! all weights reset to 1. The original graph is never mutated.

use tracing::warn;

use crate::error::{KuramotoError, KuramotoResult};
use crate::mat::Mat;

/// Absolute tolerance for treating an edge weight as 1.0.
pub const WEIGHT_TOL: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Edge {
    a: usize,
    b: usize,
    weight: f64,
}

/// Undirected, optionally weighted graph over nodes `0..n`.
///
/// # Examples
///
/// ```
/// use kuramoto::Graph;
///
/// let mut g = Graph::new(3);
/// g.add_edge(0, 1).unwrap();
/// g.add_weighted_edge(1, 2, 2.5).unwrap();
/// assert_eq!(g.node_count(), 3);
/// assert_eq!(g.edge_count(), 2);
/// assert!(g.is_weighted());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    nodes: usize,
    edges: Vec<Edge>,
}

impl Graph {
    /// Create an edgeless graph with `nodes` nodes.
    pub fn new(nodes: usize) -> Self {
        Self {
            nodes,
            edges: Vec::new(),
        }
    }

    /// Complete (all-to-all) unweighted graph on `nodes` nodes.
    ///
    /// ```
    /// use kuramoto::Graph;
    /// let g = Graph::complete(4);
    /// assert_eq!(g.edge_count(), 6);
    /// ```
    pub fn complete(nodes: usize) -> Self {
        let mut g = Self::new(nodes);
        for a in 0..nodes {
            for b in (a + 1)..nodes {
                g.edges.push(Edge { a, b, weight: 1.0 });
            }
        }
        g
    }

    /// Ring (cycle) unweighted graph on `nodes` nodes.
    ///
    /// Each node couples to its two neighbors. For fewer than three nodes
    /// the ring degenerates to a single edge or no edges.
    ///
    /// ```
    /// use kuramoto::Graph;
    /// let g = Graph::ring(5);
    /// assert_eq!(g.edge_count(), 5);
    /// ```
    pub fn ring(nodes: usize) -> Self {
        let mut g = Self::new(nodes);
        match nodes {
            0 | 1 => {}
            2 => g.edges.push(Edge {
                a: 0,
                b: 1,
                weight: 1.0,
            }),
            _ => {
                for a in 0..nodes {
                    g.edges.push(Edge {
                        a,
                        b: (a + 1) % nodes,
                        weight: 1.0,
                    });
                }
            }
        }
        g
    }

    /// Add an unweighted edge between `a` and `b`.
    pub fn add_edge(&mut self, a: usize, b: usize) -> KuramotoResult<()> {
        self.add_weighted_edge(a, b, 1.0)
    }

    /// Add an edge with an explicit weight.
    ///
    /// Fails with [`KuramotoError::Configuration`] if either node index is
    /// out of range.
    pub fn add_weighted_edge(&mut self, a: usize, b: usize, weight: f64) -> KuramotoResult<()> {
        if a >= self.nodes || b >= self.nodes {
            return Err(KuramotoError::Configuration(format!(
                "edge ({a}, {b}) references a node outside 0..{}",
                self.nodes
            )));
        }
        self.edges.push(Edge { a, b, weight });
        Ok(())
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether any edge weight differs from 1.0 beyond [`WEIGHT_TOL`].
    pub fn is_weighted(&self) -> bool {
        self.edges
            .iter()
            .any(|e| (e.weight - 1.0).abs() > WEIGHT_TOL)
    }

    /// Copy with every edge weight reset to 1.
    ///
    /// Emits a non-fatal warning when called on a graph that actually has
    /// non-unit weights. The receiver is left untouched.
    pub fn unweighted_copy(&self) -> Self {
        if self.is_weighted() {
            warn!("coercing weighted graph to unweighted");
        }
        Self {
            nodes: self.nodes,
            edges: self
                .edges
                .iter()
                .map(|e| Edge {
                    a: e.a,
                    b: e.b,
                    weight: 1.0,
                })
                .collect(),
        }
    }

    /// Dense symmetric adjacency matrix in node-index order.
    ///
    /// Both `(a, b)` and `(b, a)` entries are set, so the result is
    /// symmetric by construction. Self-loops land on the diagonal.
    ///
    /// ```
    /// use kuramoto::Graph;
    /// let a = Graph::ring(3).to_adjacency();
    /// assert_eq!(a[(0, 1)], 1.0);
    /// assert_eq!(a[(1, 0)], 1.0);
    /// assert_eq!(a[(0, 0)], 0.0);
    /// ```
    pub fn to_adjacency(&self) -> Mat {
        let mut m = Mat::zeros(self.nodes, self.nodes);
        for e in &self.edges {
            m[(e.a, e.b)] = e.weight;
            m[(e.b, e.a)] = e.weight;
        }
        m
    }

    /// Edge weights in insertion order.
    pub fn edge_weights(&self) -> Vec<f64> {
        self.edges.iter().map(|e| e.weight).collect()
    }
}
