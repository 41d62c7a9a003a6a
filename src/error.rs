//! Error types.

use std::{fmt, io, panic, path};

use crate::gl;
use crate::program::Stage;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// An error flag raised by the driver, as returned by `glGetError`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ErrorCode(pub u32);

impl ErrorCode {
    /// Returns the symbolic OpenGL name of the error, if it is a core one.
    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            gl::INVALID_ENUM => Some("GL_INVALID_ENUM"),
            gl::INVALID_VALUE => Some("GL_INVALID_VALUE"),
            gl::INVALID_OPERATION => Some("GL_INVALID_OPERATION"),
            gl::OUT_OF_MEMORY => Some("GL_OUT_OF_MEMORY"),
            gl::INVALID_FRAMEBUFFER_OPERATION => Some("GL_INVALID_FRAMEBUFFER_OPERATION"),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (0x{:04x})", name, self.0),
            None => write!(f, "0x{:04x}", self.0),
        }
    }
}

/// Everything that can go wrong in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The driver raised an error flag during a call.
    #[error("[OpenGL error] {code} in {call} at {location}")]
    Driver {
        /// The raised flag.
        code: ErrorCode,
        /// The driver entry point that raised it.
        call: &'static str,
        /// Where the call was issued from.
        location: &'static panic::Location<'static>,
    },

    /// A shader stage failed to compile.
    #[error("failed to compile {stage} shader: {log}")]
    Compile {
        /// The offending stage.
        stage: Stage,
        /// The driver's diagnostic log.
        log: String,
    },

    /// The program failed to link.
    #[error("failed to link program: {log}")]
    Link {
        /// The driver's diagnostic log.
        log: String,
    },

    /// The shader source has no section for a stage.
    #[error("shader source has no {0} section")]
    MissingStage(Stage),

    /// A `#shader` marker line names no known stage.
    #[error("line {line}: unknown shader stage marker {text:?}")]
    UnknownStage {
        /// 1-based line number.
        line: usize,
        /// The marker line.
        text: String,
    },

    /// A shader source file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The file that was requested.
        path: path::PathBuf,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// A vertex buffer does not hold a whole number of vertices for a layout.
    #[error("vertex buffer of {len} bytes is not a whole number of {stride}-byte vertices")]
    LayoutMismatch {
        /// Buffer size in bytes.
        len: usize,
        /// Layout stride in bytes.
        stride: usize,
    },

    /// RGBA8 pixel data does not match the texture dimensions.
    #[error("{len} bytes of pixel data do not fill a {width}x{height} RGBA8 texture")]
    TextureSize {
        /// Texture width in texels.
        width: u32,
        /// Texture height in texels.
        height: u32,
        /// Supplied byte count.
        len: usize,
    },

    /// No scene is registered under the requested name.
    #[error("no scene named {0:?}")]
    UnknownScene(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_render_their_gl_name() {
        assert_eq!(
            ErrorCode(0x0502).to_string(),
            "GL_INVALID_OPERATION (0x0502)",
        );
        assert_eq!(ErrorCode(0x1234).to_string(), "0x1234");
    }
}
