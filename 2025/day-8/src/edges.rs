use rayon::prelude::*;
use std::ops::Deref;

use crate::error::{ConnectivityError, Result};
use crate::points::PointSet;

/// An unordered pair of point ids with the Euclidean distance between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
}

/// Every pairwise edge of a point set, sorted ascending by distance.
///
/// Equal distances keep generation order (`(0, 1), (0, 2), .., (1, 2), ..`),
/// which makes the bottleneck query reproducible.
#[derive(Debug, Clone, Default)]
pub struct EdgeIndex {
    edges: Vec<Edge>,
}

/// Number of edges in the complete graph on `n` points, if it fits in `usize`.
pub fn pair_count(n: usize) -> Option<usize> {
    if n < 2 {
        return Some(0);
    }
    // One of n, n - 1 is even, so halve it first.
    if n % 2 == 0 {
        (n / 2).checked_mul(n - 1)
    } else {
        n.checked_mul((n - 1) / 2)
    }
}

impl EdgeIndex {
    #[tracing::instrument(skip_all, fields(points = points.len()))]
    pub fn build(points: &PointSet) -> Result<Self> {
        let n = points.len();
        let count = pair_count(n).ok_or(ConnectivityError::EdgeAllocation {
            points: n,
            edges: usize::MAX,
        })?;

        let mut edges = Vec::new();
        edges
            .try_reserve_exact(count)
            .map_err(|_| ConnectivityError::EdgeAllocation {
                points: n,
                edges: count,
            })?;

        // Fill the reserved buffer in place, one row per source point.
        edges.resize(
            count,
            Edge {
                a: 0,
                b: 0,
                distance: 0.0,
            },
        );
        let mut rows = Vec::new();
        rows.try_reserve_exact(n)
            .map_err(|_| ConnectivityError::EdgeAllocation {
                points: n,
                edges: count,
            })?;
        let mut rest = edges.as_mut_slice();
        for i in 0..n {
            let (row, tail) = std::mem::take(&mut rest).split_at_mut(n - 1 - i);
            rows.push((i, row));
            rest = tail;
        }

        let coords = points.as_slice();
        rows.into_par_iter().for_each(|(i, row)| {
            let from = coords[i].as_dvec3();
            for (slot, j) in row.iter_mut().zip(i + 1..n) {
                *slot = Edge {
                    a: i,
                    b: j,
                    distance: from.distance(coords[j].as_dvec3()),
                };
            }
        });

        // In place; ties fall back to generation order.
        edges.par_sort_unstable_by(|x, y| {
            x.distance
                .total_cmp(&y.distance)
                .then((x.a, x.b).cmp(&(y.a, y.b)))
        });

        tracing::debug!(edges = edges.len(), "built distance index");
        Ok(Self { edges })
    }

    /// The `m` shortest edges, or all of them when `m` exceeds the count.
    pub fn shortest(&self, m: usize) -> &[Edge] {
        &self.edges[..m.min(self.edges.len())]
    }
}

impl Deref for EdgeIndex {
    type Target = [Edge];

    fn deref(&self) -> &[Edge] {
        &self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::points::Point;
    use itertools::Itertools;
    use rstest::rstest;

    fn line(n: i64) -> PointSet {
        (0..n).map(|x| Point::new(x, 0, 0)).collect()
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(3, 3)]
    #[case(7, 21)]
    #[case(20, 190)]
    fn produces_every_pair(#[case] n: i64, #[case] expected: usize) -> miette::Result<()> {
        let index = EdgeIndex::build(&line(n))?;
        assert_eq!(index.len(), expected);
        assert_eq!(pair_count(n as usize), Some(expected));
        Ok(())
    }

    #[test]
    fn pair_count_overflow() {
        assert_eq!(pair_count(usize::MAX), None);
    }

    #[test]
    fn sorted_non_negative_and_valid() -> miette::Result<()> {
        let points: PointSet = [
            (162, 817, 812),
            (57, 618, 57),
            (906, 360, 560),
            (-592, 479, 940),
            (352, -342, 300),
            (466, 668, -158),
        ]
        .into_iter()
        .map(|(x, y, z)| Point::new(x, y, z))
        .collect();
        let index = EdgeIndex::build(&points)?;

        assert!(index.iter().all(|e| e.distance >= 0.0));
        assert!(index.iter().all(|e| e.a < e.b && e.b < points.len()));
        assert!(index
            .iter()
            .tuple_windows()
            .all(|(x, y)| x.distance <= y.distance));

        let pairs = index.iter().map(|e| (e.a, e.b)).sorted().collect_vec();
        let expected = (0..points.len()).tuple_combinations().collect_vec();
        assert_eq!(pairs, expected);
        Ok(())
    }

    #[test]
    fn ties_keep_generation_order() -> miette::Result<()> {
        let index = EdgeIndex::build(&line(3))?;
        let order = index.iter().map(|e| (e.a, e.b, e.distance)).collect_vec();
        assert_eq!(order, vec![(0, 1, 1.0), (1, 2, 1.0), (0, 2, 2.0)]);
        Ok(())
    }

    #[test]
    fn lattice_matches_sequential_stable_order() -> miette::Result<()> {
        let points: PointSet = (0..4)
            .cartesian_product(0..4)
            .cartesian_product(0..4)
            .map(|((x, y), z)| Point::new(x, y, z))
            .collect();
        let index = EdgeIndex::build(&points)?;

        let mut expected = (0..points.len())
            .tuple_combinations()
            .map(|(a, b)| Edge {
                a,
                b,
                distance: points[a].as_dvec3().distance(points[b].as_dvec3()),
            })
            .collect_vec();
        expected.sort_by(|x, y| x.distance.total_cmp(&y.distance));

        assert_eq!(index.len(), expected.len());
        assert!(index.iter().eq(expected.iter()));
        Ok(())
    }

    #[test]
    fn coincident_points_come_first() -> miette::Result<()> {
        let points = PointSet::new(vec![
            Point::new(0, 0, 0),
            Point::new(5, 5, 5),
            Point::new(9, 9, 9),
            Point::new(5, 5, 5),
        ]);
        let index = EdgeIndex::build(&points)?;
        assert_eq!(index[0], Edge { a: 1, b: 3, distance: 0.0 });
        Ok(())
    }

    #[test]
    fn shortest_clamps() -> miette::Result<()> {
        let index = EdgeIndex::build(&line(4))?;
        assert_eq!(index.shortest(2).len(), 2);
        assert_eq!(index.shortest(100).len(), 6);
        Ok(())
    }
}
