use miette::*;

use crate::points::PointSet;
use crate::query::{ClusterParams, Connectivity};

#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    solve(input, ClusterParams::default())
}

/// Connects the closest pairs and multiplies the sizes of the largest circuits.
fn solve(input: &str, params: ClusterParams) -> Result<String> {
    let points = PointSet::parse(input)?;
    let connectivity = Connectivity::new(points)?;

    let result = connectivity
        .top_k_component_size_product(params)?
        .unwrap_or(0);

    Ok(result.to_string())
}
