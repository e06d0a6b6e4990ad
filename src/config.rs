/// What to do with a sample that cannot be inserted (duplicate location,
/// degenerate fan, or outside the super triangle).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InvalidVertexPolicy {
    /// Abort construction with the insertion error.
    #[default]
    Reject,
    /// Skip the sample; it stays in the arena without incident triangles.
    Drop,
}

/// Construction parameters for [`Triangulation`](crate::Triangulation).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangulationConfig {
    /// Circumradius of the enclosing super triangle, in multiples of the larger
    /// side of the sample bounding box. Values below 2 are raised to 2. Larger
    /// values keep hull-adjacent cavities away from the super vertices.
    pub super_triangle_scale: f64,
    /// Bits per axis of the Hilbert curve used to order insertions.
    pub hilbert_order: u32,
    pub invalid_vertex_policy: InvalidVertexPolicy,
}

impl TriangulationConfig {
    pub fn new(super_triangle_scale: f64, hilbert_order: u32, invalid_vertex_policy: InvalidVertexPolicy) -> Self {
        Self {
            super_triangle_scale,
            hilbert_order: hilbert_order.clamp(1, 31),
            invalid_vertex_policy,
        }
    }

    pub fn with_policy(mut self, policy: InvalidVertexPolicy) -> Self {
        self.invalid_vertex_policy = policy;
        self
    }
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self::new(10.0, 16, InvalidVertexPolicy::Reject)
    }
}
