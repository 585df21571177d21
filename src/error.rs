/// Errors raised when a transform, grid or report receives a malformed shape.
///
/// Every variant is structural: the engine checks shapes at the smallest
/// boundary (grid construction, the 1-D transform) and fails the call there.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DftError {
    /// A transform or root of unity was requested for a length of zero.
    #[error("transform length must be non-zero")]
    ZeroLength,

    /// A grid was built with no rows or no columns.
    #[error("grid must have at least one row and one column")]
    EmptyGrid,

    /// The rows handed to a grid constructor do not share one length.
    #[error("row {row} has {actual} samples, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A flat buffer does not hold `height * width * channels` samples.
    #[error("buffer holds {actual} samples, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// Two grids that must line up elementwise have different shapes.
    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// An image was described with zero channels.
    #[error("image must have at least one channel")]
    InvalidChannels,
}

pub type Result<T> = std::result::Result<T, DftError>;
