use crate::math::Real;
use crate::traversal::NodeType;

/// Errors surfaced by the query entry points.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// The input geometry carries non-finite numbers, a non-orthonormal
    /// rotation, or an inconsistent tree.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),

    /// No narrow-phase rule exists for this pair of node types.
    #[error("unsupported query between {first:?} and {second:?}")]
    UnsupportedPair {
        /// The node type of the first operand.
        first: NodeType,
        /// The node type of the second operand.
        second: NodeType,
    },

    /// The iterative solver exhausted its iteration budget.
    #[error("solver failed to converge (best bound so far: {best_bound})")]
    SolverFailure {
        /// The best distance bound observed before giving up.
        best_bound: Real,
    },
}
