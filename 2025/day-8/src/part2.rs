use miette::*;

use crate::points::PointSet;
use crate::query::Connectivity;

/// Multiplies the X coordinates of the last two junction boxes that need to be
/// connected before every box is on a single circuit.
#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    let points = PointSet::parse(input)?;
    let connectivity = Connectivity::new(points)?;

    let Some(bottleneck) = connectivity.bottleneck_connecting_edge()? else {
        return Ok("0".to_string());
    };

    let x1 = connectivity.points()[bottleneck.a].x;
    let x2 = connectivity.points()[bottleneck.b].x;
    let result = x1
        .checked_mul(x2)
        .ok_or_else(|| miette!("Product of {x1} and {x2} overflows"))?;

    Ok(result.to_string())
}
