use crate::edges::Edge;
use crate::error::{ConnectivityError, Result};

/// Disjoint Set Union with path compression and union by size that also
/// tracks how many disjoint sets currently exist.
#[derive(Debug, Clone)]
pub struct Dsu {
    parent: Vec<usize>,
    sizes: Vec<usize>,
    num_components: usize,
}

impl Dsu {
    pub fn new(n: usize) -> Result<Self> {
        let mut parent = Vec::new();
        let mut sizes = Vec::new();
        parent
            .try_reserve_exact(n)
            .and_then(|()| sizes.try_reserve_exact(n))
            .map_err(|_| ConnectivityError::ScratchAllocation { what: "disjoint set" })?;
        parent.extend(0..n);
        sizes.resize(n, 1);

        Ok(Self {
            parent,
            sizes,
            num_components: n,
        })
    }

    pub fn find(&mut self, mut i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[i] != root {
            let next = self.parent[i];
            self.parent[i] = root;
            i = next;
        }

        root
    }

    /// Unifies sets. Returns `true` if a merge actually occurred (sets were disjoint).
    pub fn union(&mut self, i: usize, j: usize) -> bool {
        let mut root_i = self.find(i);
        let mut root_j = self.find(j);

        if root_i == root_j {
            return false;
        }

        if self.sizes[root_i] < self.sizes[root_j] {
            std::mem::swap(&mut root_i, &mut root_j);
        }
        self.parent[root_j] = root_i;
        self.sizes[root_i] += self.sizes[root_j];
        self.num_components -= 1;
        true
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }
}

/// State after one edge of a [`ConnectivitySweep`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepStep {
    pub edge: Edge,
    /// Whether the edge joined two previously disjoint components.
    pub merged: bool,
    /// Distinct components after the edge was applied.
    pub components: usize,
}

/// Kruskal-style pass that adds sorted edges one at a time.
///
/// Yields a step per edge and stops after the edge that leaves a single
/// component.
pub struct ConnectivitySweep<'e> {
    edges: std::slice::Iter<'e, Edge>,
    dsu: Dsu,
    done: bool,
}

impl<'e> ConnectivitySweep<'e> {
    pub fn new(edges: &'e [Edge], points: usize) -> Result<Self> {
        Ok(Self {
            edges: edges.iter(),
            dsu: Dsu::new(points)?,
            done: points < 2,
        })
    }

    pub fn components(&self) -> usize {
        self.dsu.num_components()
    }
}

impl Iterator for ConnectivitySweep<'_> {
    type Item = SweepStep;

    fn next(&mut self) -> Option<SweepStep> {
        if self.done {
            return None;
        }

        let edge = *self.edges.next()?;
        let merged = self.dsu.union(edge.a, edge.b);
        let components = self.dsu.num_components();
        if merged {
            tracing::trace!(a = edge.a, b = edge.b, components, "merged components");
        }
        self.done = components == 1;

        Some(SweepStep {
            edge,
            merged,
            components,
        })
    }
}

/// The edge whose addition first connected every point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bottleneck {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    /// 1-based position of the edge in the sorted list.
    pub edges_processed: usize,
}

/// Runs the sweep to completion over `edges`, which must be sorted ascending.
///
/// Returns `Ok(None)` when there are fewer than two points.
#[tracing::instrument(skip(edges), fields(edges = edges.len()))]
pub fn find_bottleneck(edges: &[Edge], points: usize) -> Result<Option<Bottleneck>> {
    if points < 2 {
        return Ok(None);
    }

    let mut sweep = ConnectivitySweep::new(edges, points)?;
    let mut processed = 0;
    for step in sweep.by_ref() {
        processed += 1;
        if step.components == 1 {
            tracing::debug!(processed, distance = step.edge.distance, "fully connected");
            return Ok(Some(Bottleneck {
                a: step.edge.a,
                b: step.edge.b,
                distance: step.edge.distance,
                edges_processed: processed,
            }));
        }
    }

    Err(ConnectivityError::Disconnected {
        components: sweep.components(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use itertools::Itertools;

    fn edge(a: usize, b: usize, distance: f64) -> Edge {
        Edge { a, b, distance }
    }

    #[test]
    fn union_merges_and_counts() -> miette::Result<()> {
        let mut dsu = Dsu::new(5)?;
        assert!(dsu.union(0, 1));
        assert!(dsu.union(3, 4));
        assert!(!dsu.union(1, 0));
        assert!(dsu.union(1, 4));
        assert_eq!(dsu.num_components(), 2);
        assert_eq!(dsu.find(0), dsu.find(4));
        assert_eq!(dsu.find(3), dsu.find(1));
        assert_ne!(dsu.find(2), dsu.find(0));
        Ok(())
    }

    #[test]
    fn sweep_count_never_increases() -> miette::Result<()> {
        let edges = [
            edge(0, 1, 1.0),
            edge(2, 3, 1.0),
            edge(0, 1, 1.5),
            edge(1, 2, 2.0),
            edge(3, 4, 3.0),
            edge(0, 4, 4.0),
        ];
        let steps = ConnectivitySweep::new(&edges, 5)?.collect_vec();

        assert!(steps
            .iter()
            .tuple_windows()
            .all(|(x, y)| y.components <= x.components));
        assert!(!steps[2].merged);
        assert_eq!(steps.last().map(|s| s.components), Some(1));
        // Stops at the connecting edge.
        assert_eq!(steps.len(), 5);
        Ok(())
    }

    #[test]
    fn reports_connecting_edge() -> miette::Result<()> {
        let edges = [edge(0, 1, 1.0), edge(1, 2, 1.0), edge(0, 2, 2.0)];
        let found = find_bottleneck(&edges, 3)?;
        assert_eq!(
            found,
            Some(Bottleneck {
                a: 1,
                b: 2,
                distance: 1.0,
                edges_processed: 2,
            })
        );
        Ok(())
    }

    #[test]
    fn degenerate_sets_have_no_bottleneck() -> miette::Result<()> {
        assert_eq!(find_bottleneck(&[], 0)?, None);
        assert_eq!(find_bottleneck(&[], 1)?, None);
        assert_eq!(ConnectivitySweep::new(&[], 1)?.count(), 0);
        Ok(())
    }

    #[test]
    fn exhausted_edges_are_an_error() {
        let edges = [edge(0, 1, 1.0)];
        assert!(matches!(
            find_bottleneck(&edges, 3),
            Err(ConnectivityError::Disconnected { components: 2 })
        ));
    }
}
