pub mod circuits;
pub mod dsu;
pub mod edges;
pub mod error;
pub mod part1;
pub mod part2;
pub mod points;
pub mod query;

pub use error::ConnectivityError;
pub use query::{bottleneck_connecting_edge, top_k_component_size_product, Connectivity};
