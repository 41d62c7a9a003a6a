//! Texture sampling properties.

use crate::gl;

/// Texture filtering mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Filter {
    /// Nearest texel.
    Nearest,

    /// Linear filter.
    Linear,
}

impl Filter {
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Filter::Nearest => gl::NEAREST,
            Filter::Linear => gl::LINEAR,
        }
    }
}

/// Texture co-ordinate wrapping mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrap {
    /// Clamp to the edge texel.
    ClampToEdge,

    /// Repeat.
    Repeat,

    /// Repeat, mirroring every other tile.
    MirroredRepeat,
}

impl Wrap {
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Wrap::ClampToEdge => gl::CLAMP_TO_EDGE,
            Wrap::Repeat => gl::REPEAT,
            Wrap::MirroredRepeat => gl::MIRRORED_REPEAT,
        }
    }
}

/// Sampling properties for a 2D texture.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Sampler {
    /// Specifies the magnification filter.
    ///
    /// Default: `Linear`.
    pub mag_filter: Filter,

    /// Specifies the minification filter.
    ///
    /// Default: `Linear`.
    pub min_filter: Filter,

    /// Specifies the wrapping mode for the S axis.
    ///
    /// Default: `ClampToEdge`.
    pub wrap_s: Wrap,

    /// Specifies the wrapping mode for the T axis.
    ///
    /// Default: `ClampToEdge`.
    pub wrap_t: Wrap,
}

impl Sampler {
    /// Returns the `glTexParameteri` settings this sampler amounts to.
    pub(crate) fn parameters(&self) -> [(u32, i32); 4] {
        [
            (gl::TEXTURE_MIN_FILTER, self.min_filter.as_gl_enum() as i32),
            (gl::TEXTURE_MAG_FILTER, self.mag_filter.as_gl_enum() as i32),
            (gl::TEXTURE_WRAP_S, self.wrap_s.as_gl_enum() as i32),
            (gl::TEXTURE_WRAP_T, self.wrap_t.as_gl_enum() as i32),
        ]
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            mag_filter: Filter::Linear,
            min_filter: Filter::Linear,
            wrap_s: Wrap::ClampToEdge,
            wrap_t: Wrap::ClampToEdge,
        }
    }
}
