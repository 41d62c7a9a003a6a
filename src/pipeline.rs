//! Fixed-function state.

use crate::gl;

/// Specifies how fragments combine with the color already in the
/// framebuffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Blend {
    /// Fragments overwrite the framebuffer.
    Disabled,

    /// Classic transparency: `src * a + dst * (1 - a)`.
    Alpha,
}

impl Default for Blend {
    fn default() -> Self {
        Blend::Disabled
    }
}

impl Blend {
    /// Returns the source and destination factors, or `None` if blending is
    /// disabled.
    pub(crate) fn as_gl_enums_if_enabled(self) -> Option<(u32, u32)> {
        match self {
            Blend::Disabled => None,
            Blend::Alpha => Some((gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA)),
        }
    }
}
