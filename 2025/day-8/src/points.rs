use chumsky::prelude::*;
use glam::I64Vec3;
use miette::*;
use std::ops::Index;

/// A junction box position. Its identity is its index in the owning [`PointSet`].
pub type Point = I64Vec3;

/// Immutable collection of points, addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Parses one `x,y,z` triple per line.
    pub fn parse(input: &str) -> Result<Self> {
        parser()
            .parse(input)
            .into_result()
            .map(Self::new)
            .map_err(|e| miette!("Parse failed: {:?}", e))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }
}

impl Index<usize> for PointSet {
    type Output = Point;

    fn index(&self, id: usize) -> &Point {
        &self.points[id]
    }
}

impl From<Vec<Point>> for PointSet {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn parser<'a>() -> impl Parser<'a, &'a str, Vec<Point>, extra::Err<Rich<'a, char>>> {
    let coord = just('-')
        .or_not()
        .then(text::int(10))
        .to_slice()
        .try_map(|digits: &'a str, span| {
            digits
                .parse::<i64>()
                .map_err(|e| Rich::custom(span, format!("invalid coordinate {digits:?}: {e}")))
        })
        .padded_by(text::inline_whitespace());

    let point = coord
        .clone()
        .then_ignore(just(','))
        .then(coord.clone())
        .then_ignore(just(','))
        .then(coord)
        .map(|((x, y), z)| Point::new(x, y, z));

    point
        .separated_by(text::newline())
        .allow_trailing()
        .collect::<Vec<_>>()
        .padded()
}
