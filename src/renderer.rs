//! Clearing and drawing.

use crate::buffer::IndexBuffer;
use crate::context::Context;
use crate::draw_call::{DrawCall, Primitive};
use crate::error::Result;
use crate::gl;
use crate::pipeline::Blend;
use crate::program::Program;
use crate::vertex_array::VertexArray;

/// Issues clears and indexed draws.
///
/// Owns no GPU objects; every call binds what it needs, so nothing is
/// assumed about bindings left behind by earlier calls.
#[derive(Clone, Debug)]
pub struct Renderer {
    ctx: Context,
}

impl Renderer {
    /// Constructor.
    pub fn new(ctx: &Context) -> Self {
        Self { ctx: ctx.clone() }
    }

    /// Returns the context draws are issued through.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Clears the color buffer to the configured clear color.
    #[track_caller]
    pub fn clear(&self) -> Result<()> {
        self.clear_to(self.ctx.config().clear_color)
    }

    /// Clears the color buffer to `color`.
    #[track_caller]
    pub fn clear_to(&self, color: [f32; 4]) -> Result<()> {
        let [r, g, b, a] = color;
        self.ctx.call("glClearColor", |gl| gl.clear_color(r, g, b, a))?;
        self.ctx.call("glClear", |gl| gl.clear(gl::COLOR_BUFFER_BIT))
    }

    /// Enables or disables blending.
    #[track_caller]
    pub fn set_blend(&self, blend: Blend) -> Result<()> {
        match blend.as_gl_enums_if_enabled() {
            Some((src, dst)) => {
                self.ctx.call("glEnable", |gl| gl.enable(gl::BLEND))?;
                self.ctx.call("glBlendFunc", |gl| gl.blend_func(src, dst))
            }
            None => self.ctx.call("glDisable", |gl| gl.disable(gl::BLEND)),
        }
    }

    /// Draws every index of `ib` as a triangle list.
    ///
    /// Binds `program`, then `va`, then `ib`. The element buffer binding is
    /// stored in the vertex array, so `ib` is bound last.
    #[track_caller]
    pub fn draw(&self, va: &VertexArray, ib: &IndexBuffer, program: &Program) -> Result<DrawCall> {
        debug_assert!(
            self.ctx.ptr_eq(va.context())
                && self.ctx.ptr_eq(ib.context())
                && self.ctx.ptr_eq(program.context()),
            "draw mixes objects from different contexts",
        );
        program.bind()?;
        va.bind()?;
        ib.bind()?;
        let draw_call = DrawCall {
            primitive: Primitive::Triangles,
            count: ib.count() as usize,
        };
        let mode = draw_call.primitive.as_gl_enum();
        self.ctx.call("glDrawElements", |gl| {
            gl.draw_elements(mode, draw_call.count, gl::UNSIGNED_INT, 0)
        })?;
        Ok(draw_call)
    }
}
