//! Connected components ("circuits") of the subgraph formed by the shortest
//! edges, and a bounded registry of the largest ones.

use std::collections::HashSet;

use crate::edges::Edge;
use crate::error::{ConnectivityError, Result};

fn scratch<T>(capacity: usize, what: &'static str) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(capacity)
        .map_err(|_| ConnectivityError::ScratchAllocation { what })?;
    Ok(buffer)
}

/// A set of point ids, stored sorted so equal sets compare and hash equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    ids: Vec<usize>,
}

impl Component {
    pub fn new(mut ids: Vec<usize>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    /// Point ids in ascending order.
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    pub(crate) fn size(&self) -> usize {
        self.ids.len()
    }

    fn try_clone(&self) -> Result<Self> {
        let mut ids = scratch(self.ids.len(), "component copy")?;
        ids.extend_from_slice(&self.ids);
        Ok(Self { ids })
    }
}

/// The `k` largest distinct components offered so far, largest first.
#[derive(Debug, Clone)]
pub struct TopKRegistry {
    k: usize,
    entries: Vec<Component>,
    present: HashSet<Component>,
}

impl TopKRegistry {
    /// `max_components` bounds how many components can ever be offered, so
    /// the registry never reserves more than it could hold.
    pub fn new(k: usize, max_components: usize) -> Result<Self> {
        let capacity = k.min(max_components).saturating_add(1);
        let entries = scratch(capacity, "top-k registry")?;
        let mut present = HashSet::new();
        present
            .try_reserve(capacity)
            .map_err(|_| ConnectivityError::ScratchAllocation { what: "top-k registry" })?;

        Ok(Self {
            k,
            entries,
            present,
        })
    }

    /// Records `component` unless an identical one is already held.
    ///
    /// Returns `true` if the component is among the retained entries afterwards.
    pub fn offer(&mut self, component: Component) -> Result<bool> {
        if self.present.contains(&component) {
            return Ok(false);
        }

        // Equal sizes keep arrival order.
        let at = self
            .entries
            .partition_point(|held| held.size() >= component.size());
        if at >= self.k {
            return Ok(false);
        }

        self.present
            .try_reserve(1)
            .map_err(|_| ConnectivityError::ScratchAllocation { what: "top-k registry" })?;
        self.entries
            .try_reserve(1)
            .map_err(|_| ConnectivityError::ScratchAllocation { what: "top-k registry" })?;
        self.present.insert(component.try_clone()?);
        self.entries.insert(at, component);
        if self.entries.len() > self.k {
            if let Some(evicted) = self.entries.pop() {
                self.present.remove(&evicted);
            }
        }
        Ok(true)
    }

    pub fn entries(&self) -> &[Component] {
        &self.entries
    }

    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(Component::size)
    }

    /// Product of the `k` retained sizes.
    pub fn size_product(&self) -> Result<u64> {
        if self.entries.len() < self.k {
            return Err(ConnectivityError::InsufficientComponents {
                found: self.entries.len(),
                k: self.k,
            });
        }
        self.sizes()
            .try_fold(1u64, |product, size| product.checked_mul(size as u64))
            .ok_or(ConnectivityError::ProductOverflow { k: self.k })
    }
}

/// Depth-first component discovery over a fixed prefix of the edge list.
pub struct ComponentTracker<'e> {
    edges: &'e [Edge],
    adjacency: Vec<Vec<usize>>,
    discovered: Vec<bool>,
    stack: Vec<usize>,
    members: Vec<usize>,
}

impl<'e> ComponentTracker<'e> {
    /// `points` bounds every edge endpoint.
    pub fn new(edges: &'e [Edge], points: usize) -> Result<Self> {
        let mut degrees: Vec<usize> = scratch(points, "adjacency list")?;
        degrees.resize(points, 0);
        for edge in edges {
            degrees[edge.a] += 1;
            degrees[edge.b] += 1;
        }

        let mut adjacency: Vec<Vec<usize>> = scratch(points, "adjacency list")?;
        for &degree in &degrees {
            adjacency.push(scratch(degree, "adjacency list")?);
        }
        // Every push below fits in the capacity reserved from the degrees.
        for edge in edges {
            adjacency[edge.a].push(edge.b);
            adjacency[edge.b].push(edge.a);
        }

        let mut discovered: Vec<bool> = scratch(points, "visited set")?;
        discovered.resize(points, false);

        // Each point is pushed at most once per run.
        Ok(Self {
            edges,
            adjacency,
            discovered,
            stack: scratch(points, "traversal stack")?,
            members: scratch(points, "component members")?,
        })
    }

    fn explore(&mut self, source: usize) -> Result<Component> {
        self.members.clear();
        self.members.push(source);
        self.discovered[source] = true;
        self.stack.push(source);

        while let Some(node) = self.stack.pop() {
            for &next in &self.adjacency[node] {
                if !self.discovered[next] {
                    self.discovered[next] = true;
                    self.members.push(next);
                    self.stack.push(next);
                }
            }
        }

        let mut ids: Vec<usize> = scratch(self.members.len(), "component")?;
        ids.extend_from_slice(&self.members);
        Ok(Component::new(ids))
    }

    /// Walks the edges in order, exploring each one's component the first time
    /// one of its endpoints is reached, and keeps the `k` largest.
    #[tracing::instrument(skip(self), fields(edges = self.edges.len()))]
    pub fn run(mut self, k: usize) -> Result<TopKRegistry> {
        // Every component contains at least one of the edges.
        let mut registry = TopKRegistry::new(k, self.edges.len())?;
        let mut found = 0usize;

        for edge in self.edges {
            // Components of a fixed subgraph are disjoint, so a discovered
            // endpoint means its component is already recorded.
            if self.discovered[edge.a] {
                continue;
            }
            let component = self.explore(edge.a)?;
            found += 1;
            tracing::trace!(ids = ?component.ids(), "discovered component");
            registry.offer(component)?;
        }

        tracing::debug!(found, kept = registry.entries().len(), "component sweep done");
        Ok(registry)
    }
}
