use miette::Diagnostic;
use thiserror::Error;

/// Failures surfaced by the distance index and the two connectivity queries.
///
/// A point set too small to produce any edge is not an error: queries report
/// it as `Ok(None)`.
#[derive(Debug, Error, Diagnostic)]
pub enum ConnectivityError {
    #[error("cannot allocate {edges} edges for {points} points")]
    #[diagnostic(
        code(day8::edge_allocation),
        help("the pairwise edge list grows quadratically with the number of points")
    )]
    EdgeAllocation { points: usize, edges: usize },

    #[error("cannot allocate scratch space for {what}")]
    #[diagnostic(code(day8::scratch_allocation))]
    ScratchAllocation { what: &'static str },

    #[error("only {found} distinct components were found, {k} are required")]
    #[diagnostic(
        code(day8::insufficient_components),
        help("connect fewer points or ask for fewer components")
    )]
    InsufficientComponents { found: usize, k: usize },

    #[error("product of the {k} largest component sizes overflows u64")]
    #[diagnostic(code(day8::product_overflow))]
    ProductOverflow { k: usize },

    #[error("edge list exhausted with {components} components still disjoint")]
    #[diagnostic(code(day8::disconnected))]
    Disconnected { components: usize },
}

pub type Result<T> = std::result::Result<T, ConnectivityError>;
