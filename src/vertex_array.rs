//! Vertex array objects.

use std::fmt;

use crate::buffer::VertexBuffer;
use crate::context::{Context, Object};
use crate::error::{Error, Result};
use crate::layout::Layout;

/// The OpenGL VAO ID type.
pub(crate) type Id = u32;

/// Corresponds to an OpenGL vertex array object.
///
/// A vertex array records, on the driver side, which buffer and which byte
/// ranges feed each attribute slot. It does not keep the buffers alive: every
/// [`VertexBuffer`] added to it, and the index buffer drawn with it, must
/// outlive the draws that use this array.
///
/// [`VertexBuffer`]: ../buffer/struct.VertexBuffer.html
pub struct VertexArray {
    /// The OpenGL VAO ID.
    id: Id,

    /// Releases the VAO upon destruction.
    ctx: Context,
}

impl VertexArray {
    /// Allocates an empty vertex array.
    #[track_caller]
    pub fn new(ctx: &Context) -> Result<Self> {
        let id = ctx.call("glGenVertexArrays", |gl| gl.gen_vertex_array())?;
        debug!("created vertex array {}", id);
        Ok(Self { id, ctx: ctx.clone() })
    }

    /// Feeds the attributes described by `layout` from `buffer`.
    ///
    /// Slot `n` receives the `n`th element of `layout`, read at its running
    /// byte offset with the layout's stride. Slots always count from zero,
    /// so adding a second buffer reconfigures the slots of the first rather
    /// than continuing after them.
    ///
    /// Leaves this array and `buffer` bound.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LayoutMismatch`] without touching driver state if the
    /// buffer does not hold a whole number of vertices for the layout.
    ///
    /// [`Error::LayoutMismatch`]: ../error/enum.Error.html#variant.LayoutMismatch
    #[track_caller]
    pub fn add_buffer(&self, buffer: &VertexBuffer, layout: &Layout) -> Result<()> {
        debug_assert!(
            self.ctx.ptr_eq(buffer.context()),
            "vertex buffer belongs to a different context",
        );
        let stride = layout.stride();
        if stride != 0 && buffer.size() % stride != 0 {
            return Err(Error::LayoutMismatch {
                len: buffer.size(),
                stride,
            });
        }
        self.bind()?;
        buffer.bind()?;
        for attribute in layout {
            let element = attribute.element;
            self.ctx.call("glEnableVertexAttribArray", |gl| {
                gl.enable_vertex_attrib_array(attribute.index)
            })?;
            self.ctx.call("glVertexAttribPointer", |gl| {
                gl.vertex_attrib_pointer(
                    attribute.index,
                    element.count as i32,
                    element.ty.gl_type(),
                    element.normalized,
                    stride as i32,
                    attribute.offset,
                )
            })?;
        }
        Ok(())
    }

    /// Makes this the current vertex array.
    #[track_caller]
    pub fn bind(&self) -> Result<()> {
        self.ctx.bind_vertex_array(self.id)
    }

    /// Clears the current vertex array binding.
    #[track_caller]
    pub fn unbind(&self) -> Result<()> {
        self.ctx.bind_vertex_array(0)
    }

    /// Returns the OpenGL VAO ID.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn context(&self) -> &Context {
        &self.ctx
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.ctx.release(Object::VertexArray, self.id);
    }
}

impl fmt::Debug for VertexArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[derive(Debug)]
        struct VertexArray(u32);

        VertexArray(self.id).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ErrorPolicy};
    use crate::gl;
    use crate::layout::ElementType;
    use crate::mock::{MockDriver, Pointer};

    fn context() -> (MockDriver, Context) {
        let mock = MockDriver::new();
        let config = Config {
            error_policy: ErrorPolicy::Log,
            ..Config::default()
        };
        (mock.clone(), Context::new(mock, config))
    }

    #[test]
    fn attributes_get_sequential_slots_and_running_offsets() {
        let (mock, ctx) = context();
        let vb = VertexBuffer::new(&ctx, &[0.0f32; 4 * 6]).unwrap();
        let va = VertexArray::new(&ctx).unwrap();
        let mut layout = Layout::new();
        layout.push(ElementType::F32, 2).push(ElementType::F32, 4);
        va.add_buffer(&vb, &layout).unwrap();

        let state = mock.vertex_array(va.id()).unwrap();
        assert_eq!(state.attributes.len(), 2);
        let pointer = |slot: usize| state.attributes[slot].pointer.unwrap();
        assert!(state.attributes[0].enabled && state.attributes[1].enabled);
        assert_eq!(
            pointer(0),
            Pointer {
                buffer: vb.id(),
                size: 2,
                ty: gl::FLOAT,
                normalized: false,
                stride: 24,
                offset: 0,
            },
        );
        assert_eq!(pointer(1).offset, 8);
        assert_eq!(pointer(1).stride, 24);
    }

    #[test]
    fn byte_attributes_are_normalized() {
        let (mock, ctx) = context();
        let vb = VertexBuffer::new(&ctx, &[0u8; 16 * 3]).unwrap();
        let va = VertexArray::new(&ctx).unwrap();
        let mut layout = Layout::new();
        layout.push_typed::<f32>(3).push_typed::<u8>(4);
        va.add_buffer(&vb, &layout).unwrap();

        let state = mock.vertex_array(va.id()).unwrap();
        let color = state.attributes[1].pointer.unwrap();
        assert_eq!((color.ty, color.normalized, color.offset), (gl::UNSIGNED_BYTE, true, 12));
    }

    #[test]
    fn second_buffer_restarts_at_slot_zero() {
        let (mock, ctx) = context();
        let positions = VertexBuffer::new(&ctx, &[0.0f32; 6]).unwrap();
        let colors = VertexBuffer::new(&ctx, &[0u8; 12]).unwrap();
        let va = VertexArray::new(&ctx).unwrap();
        let mut first = Layout::new();
        first.push_typed::<f32>(2);
        let mut second = Layout::new();
        second.push_typed::<u8>(4);
        va.add_buffer(&positions, &first).unwrap();
        va.add_buffer(&colors, &second).unwrap();

        let state = mock.vertex_array(va.id()).unwrap();
        assert_eq!(state.attributes.len(), 1);
        assert_eq!(state.attributes[0].pointer.unwrap().buffer, colors.id());
    }

    #[test]
    fn partial_vertices_are_rejected_before_any_driver_call() {
        let (mock, ctx) = context();
        let vb = VertexBuffer::new(&ctx, &[0.0f32; 5]).unwrap();
        let va = VertexArray::new(&ctx).unwrap();
        mock.clear_calls();
        let mut layout = Layout::new();
        layout.push_typed::<f32>(2);
        match va.add_buffer(&vb, &layout) {
            Err(Error::LayoutMismatch { len, stride }) => assert_eq!((len, stride), (20, 8)),
            other => panic!("expected layout mismatch, got {:?}", other),
        }
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn empty_layout_configures_nothing() {
        let (mock, ctx) = context();
        let vb = VertexBuffer::new(&ctx, &[0.0f32; 5]).unwrap();
        let va = VertexArray::new(&ctx).unwrap();
        mock.clear_calls();
        va.add_buffer(&vb, &Layout::new()).unwrap();
        assert_eq!(mock.call_count("glVertexAttribPointer"), 0);
        assert_eq!(mock.call_count("glEnableVertexAttribArray"), 0);
        assert!(mock.vertex_array(va.id()).unwrap().attributes.is_empty());
    }

    #[test]
    fn bind_then_unbind_restores_the_slot() {
        let (mock, ctx) = context();
        let va = VertexArray::new(&ctx).unwrap();
        let before = ctx.bindings();
        va.bind().unwrap();
        assert_eq!(mock.bound_vertex_array(), va.id());
        va.unbind().unwrap();
        assert_eq!(ctx.bindings(), before);
        assert_eq!(mock.bound_vertex_array(), 0);
    }

    #[test]
    fn dropping_releases_the_handle() {
        let (mock, ctx) = context();
        let va = VertexArray::new(&ctx).unwrap();
        let id = va.id();
        va.bind().unwrap();
        drop(va);
        assert_eq!(mock.release_count(id), 1);
        assert_eq!(ctx.bindings().vertex_array, 0);
    }
}
