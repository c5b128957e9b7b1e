use crate::circuits::ComponentTracker;
use crate::dsu::{find_bottleneck, Bottleneck};
use crate::edges::EdgeIndex;
use crate::error::Result;
use crate::points::PointSet;

/// Parameters of the clustering query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterParams {
    /// How many of the shortest edges to connect.
    pub connections: usize,
    /// How many of the largest components to multiply.
    pub top_k: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            connections: 1000,
            top_k: 3,
        }
    }
}

/// A point set together with its sorted distance index, built once and shared
/// by both queries.
#[derive(Debug, Clone)]
pub struct Connectivity {
    points: PointSet,
    edges: EdgeIndex,
}

impl Connectivity {
    pub fn new(points: PointSet) -> Result<Self> {
        let edges = EdgeIndex::build(&points)?;
        Ok(Self { points, edges })
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn edges(&self) -> &EdgeIndex {
        &self.edges
    }

    /// Product of the sizes of the `top_k` largest components formed by the
    /// `connections` shortest edges.
    ///
    /// `Ok(None)` when the point set has no edges.
    #[tracing::instrument(skip(self), fields(points = self.points.len()))]
    pub fn top_k_component_size_product(&self, params: ClusterParams) -> Result<Option<u64>> {
        if self.edges.is_empty() {
            return Ok(None);
        }
        if params.connections > self.edges.len() {
            tracing::warn!(
                requested = params.connections,
                available = self.edges.len(),
                "not enough edges, connecting all of them"
            );
        }

        let prefix = self.edges.shortest(params.connections);
        let registry = ComponentTracker::new(prefix, self.points.len())?.run(params.top_k)?;
        registry.size_product().map(Some)
    }

    /// The shortest edge whose addition leaves every point connected.
    ///
    /// `Ok(None)` when there are fewer than two points.
    #[tracing::instrument(skip(self), fields(points = self.points.len()))]
    pub fn bottleneck_connecting_edge(&self) -> Result<Option<Bottleneck>> {
        find_bottleneck(&self.edges, self.points.len())
    }
}

pub fn top_k_component_size_product(
    points: PointSet,
    connections: usize,
    top_k: usize,
) -> Result<Option<u64>> {
    Connectivity::new(points)?.top_k_component_size_product(ClusterParams { connections, top_k })
}

pub fn bottleneck_connecting_edge(points: PointSet) -> Result<Option<Bottleneck>> {
    Connectivity::new(points)?.bottleneck_connecting_edge()
}
