use std::fmt;

/// Errors surfaced by the solver and the runtime-dimension layer.
///
/// Everything except `DegenerateSegment` is a precondition failure detected
/// before any work starts.
#[derive(Clone, Debug, PartialEq)]
pub enum SolveError {
    /// The chain has no joints.
    EmptyChain,
    /// `bones.len()` must equal `joints - 1`.
    MismatchedLengths { joints: usize, bones: usize },
    /// A bone length is zero, negative, or not finite.
    InvalidBoneLength { index: usize, length: f64 },
    /// Tolerance must be finite and strictly positive.
    InvalidTolerance { tolerance: f64 },
    /// `max_iterations` must be at least one when set.
    InvalidMaxIterations,
    /// A coordinate is NaN or infinite. `index` is the joint, `None` for the target.
    NonFinite { index: Option<usize> },
    /// The two ends of a bone coincide, so the direction of movement is undefined.
    DegenerateSegment { bone: usize },
    /// A point does not share the chain's dimension.
    DimensionMismatch { expected: usize, found: usize },
    /// Only 2D and 3D points are supported at runtime.
    UnsupportedDimension { found: usize },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyChain => write!(f, "chain has no joints"),
            Self::MismatchedLengths { joints, bones } => write!(
                f,
                "chain of {joints} joints needs {} bone lengths, got {bones}",
                joints.saturating_sub(1)
            ),
            Self::InvalidBoneLength { index, length } => {
                write!(f, "bone {index} has invalid length {length} (must be > 0)")
            }
            Self::InvalidTolerance { tolerance } => {
                write!(f, "tolerance must be > 0, got {tolerance}")
            }
            Self::InvalidMaxIterations => write!(f, "max_iterations must be at least 1"),
            Self::NonFinite { index: Some(i) } => write!(f, "joint {i} has a non-finite coordinate"),
            Self::NonFinite { index: None } => write!(f, "target has a non-finite coordinate"),
            Self::DegenerateSegment { bone } => {
                write!(f, "bone {bone} collapsed: both joints coincide")
            }
            Self::DimensionMismatch { expected, found } => {
                write!(f, "expected a {expected}D point, got {found} coordinates")
            }
            Self::UnsupportedDimension { found } => {
                write!(f, "points must have 2 or 3 coordinates, got {found}")
            }
        }
    }
}

impl std::error::Error for SolveError {}
