use crate::triangulation::VertexId;

/// Errors raised while building the triangulation or evaluating the density field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DtfeError {
    /// The query coincides with an existing sample or its cavity has zero area.
    #[error("cannot interpolate at ({x}, {y}): query coincides with a sample or its cell is degenerate")]
    InvalidVertex {
        /// Query x coordinate
        x: f64,
        /// Query y coordinate
        y: f64,
    },

    /// Two consecutive neighbors of a Voronoi center share no triangle.
    #[error("triangulation adjacency is inconsistent: no triangle spans neighbors {a:?} and {b:?}")]
    AdjacencyInconsistent {
        /// Previous neighbor in angular order
        a: VertexId,
        /// Next neighbor in angular order
        b: VertexId,
    },

    /// The locate walk revisited a triangle.
    #[error("locate walk did not terminate after {steps} steps - possible numerical degeneracy")]
    WalkCycle {
        /// Number of steps taken before giving up
        steps: usize,
    },

    /// A sample sits exactly on an already inserted vertex.
    #[error("sample {id:?} duplicates an existing vertex")]
    DuplicateVertex {
        /// The rejected sample
        id: VertexId,
    },

    /// Inserting the sample would create a zero-area or inverted triangle.
    #[error("sample {id:?} produces a degenerate triangle")]
    DegenerateInsertion {
        /// The rejected sample
        id: VertexId,
    },

    /// The sample lies outside the super triangle.
    #[error("sample {id:?} lies outside the triangulation")]
    OutsideTriangulation {
        /// The rejected sample
        id: VertexId,
    },

    /// A sample coordinate is NaN or infinite.
    #[error("sample {id:?} has a non-finite coordinate")]
    NonFiniteSample {
        /// The rejected sample
        id: VertexId,
    },

    /// A sample index past the end of the sample list.
    #[error("sample index {index} out of range for {count} samples")]
    SampleOutOfRange {
        /// Requested index
        index: usize,
        /// Number of samples
        count: usize,
    },

    /// Sample and weight (or density) buffers disagree in length.
    #[error("got {points} samples but {weights} weights")]
    LengthMismatch {
        /// Number of samples
        points: usize,
        /// Number of weights
        weights: usize,
    },

    /// An interpolation strategy name was not recognized.
    #[error("unknown interpolation strategy: {0}")]
    UnknownStrategy(String),

    /// A query was issued before `calculate`.
    #[error("the density field has not been calculated")]
    NotCalculated,
}
