//! Draw call records.

use crate::gl;

/// Primitive topology.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Primitive {
    /// List of triangle points.
    Triangles,
}

impl Primitive {
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Primitive::Triangles => gl::TRIANGLES,
        }
    }
}

/// An indexed draw that was submitted to the driver.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DrawCall {
    /// The primitive topology.
    pub primitive: Primitive,

    /// Number of indices drawn.
    pub count: usize,
}
