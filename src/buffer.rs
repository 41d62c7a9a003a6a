//! GPU buffer management.

use std::{fmt, mem};

use crate::context::{Context, Object};
use crate::error::Result;
use crate::gl;

/// OpenGL buffer ID type.
pub(crate) type Id = u32;

/// Determines what the buffer may be used for.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Kind {
    /// Corresponds to `GL_ARRAY_BUFFER`.
    Array,

    /// Corresponds to `GL_ELEMENT_ARRAY_BUFFER`.
    Index,
}

impl Kind {
    /// Returns the equivalent OpenGL target enumeration constant.
    pub fn as_gl_enum(self) -> u32 {
        match self {
            Kind::Array => gl::ARRAY_BUFFER,
            Kind::Index => gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// A write-once region of GPU memory. Released when dropped.
struct Buffer {
    /// The OpenGL buffer ID.
    id: Id,

    /// The type of buffer, e.g. a vertex buffer.
    kind: Kind,

    /// The number of bytes held by the buffer.
    size: usize,

    /// Releases the buffer upon destruction.
    ctx: Context,
}

impl Buffer {
    /// Allocates a buffer and uploads `data` with `GL_STATIC_DRAW`. The
    /// buffer is left bound to its target.
    #[track_caller]
    fn new(ctx: &Context, kind: Kind, data: &[u8]) -> Result<Self> {
        let id = ctx.call("glGenBuffers", |gl| gl.gen_buffer())?;
        // Owned from here on, so an upload failure still releases it.
        let buffer = Buffer {
            id,
            kind,
            size: data.len(),
            ctx: ctx.clone(),
        };
        let target = kind.as_gl_enum();
        ctx.bind_buffer(target, id)?;
        ctx.call("glBufferData", |gl| gl.buffer_data(target, data, gl::STATIC_DRAW))?;
        debug!("created {:?} buffer {} ({} bytes)", kind, id, data.len());
        Ok(buffer)
    }

    #[track_caller]
    fn bind(&self) -> Result<()> {
        self.ctx.bind_buffer(self.kind.as_gl_enum(), self.id)
    }

    #[track_caller]
    fn unbind(&self) -> Result<()> {
        self.ctx.bind_buffer(self.kind.as_gl_enum(), 0)
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.ctx.release(Object::Buffer, self.id);
    }
}

/// Interleaved vertex data in GPU memory.
///
/// The bytes are uploaded once at construction. How they decompose into
/// attributes is described separately by a [`Layout`] when the buffer is
/// added to a [`VertexArray`].
///
/// [`Layout`]: ../layout/struct.Layout.html
/// [`VertexArray`]: ../vertex_array/struct.VertexArray.html
pub struct VertexBuffer {
    buffer: Buffer,
}

impl VertexBuffer {
    /// Uploads `data` into a new vertex buffer, leaving it bound.
    ///
    /// Any plain-old-data slice is accepted; it is uploaded as raw bytes.
    #[track_caller]
    pub fn new<T: bytemuck::Pod>(ctx: &Context, data: &[T]) -> Result<Self> {
        let bytes = bytemuck::cast_slice(data);
        Ok(Self {
            buffer: Buffer::new(ctx, Kind::Array, bytes)?,
        })
    }

    /// Makes this the current array buffer.
    #[track_caller]
    pub fn bind(&self) -> Result<()> {
        self.buffer.bind()
    }

    /// Clears the current array buffer binding.
    #[track_caller]
    pub fn unbind(&self) -> Result<()> {
        self.buffer.unbind()
    }

    /// Returns the number of bytes the buffer holds.
    pub fn size(&self) -> usize {
        self.buffer.size
    }

    /// Returns the OpenGL buffer ID.
    pub fn id(&self) -> u32 {
        self.buffer.id
    }

    pub(crate) fn context(&self) -> &Context {
        &self.buffer.ctx
    }
}

impl fmt::Debug for VertexBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VertexBuffer")
            .field("id", &self.buffer.id)
            .field("size", &self.buffer.size)
            .finish()
    }
}

/// A list of `u32` vertex indices in GPU memory.
pub struct IndexBuffer {
    buffer: Buffer,

    /// Number of indices.
    count: u32,
}

impl IndexBuffer {
    /// Uploads `indices` into a new index buffer, leaving it bound.
    ///
    /// The buffer binds to `GL_ELEMENT_ARRAY_BUFFER`, which is recorded in
    /// whatever vertex array is current at the time.
    #[track_caller]
    pub fn new(ctx: &Context, indices: &[u32]) -> Result<Self> {
        let bytes = bytemuck::cast_slice(indices);
        Ok(Self {
            buffer: Buffer::new(ctx, Kind::Index, bytes)?,
            count: indices.len() as u32,
        })
    }

    /// Makes this the current element buffer.
    #[track_caller]
    pub fn bind(&self) -> Result<()> {
        self.buffer.bind()
    }

    /// Clears the current element buffer binding.
    #[track_caller]
    pub fn unbind(&self) -> Result<()> {
        self.buffer.unbind()
    }

    /// Returns the number of indices.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the number of bytes the buffer holds.
    pub fn size(&self) -> usize {
        self.count as usize * mem::size_of::<u32>()
    }

    /// Returns the OpenGL buffer ID.
    pub fn id(&self) -> u32 {
        self.buffer.id
    }

    pub(crate) fn context(&self) -> &Context {
        &self.buffer.ctx
    }
}

impl fmt::Debug for IndexBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("IndexBuffer")
            .field("id", &self.buffer.id)
            .field("count", &self.count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ErrorPolicy};
    use crate::mock::MockDriver;

    fn context() -> (MockDriver, Context) {
        let mock = MockDriver::new();
        let config = Config {
            error_policy: ErrorPolicy::Log,
            ..Config::default()
        };
        (mock.clone(), Context::new(mock, config))
    }

    #[test]
    fn vertex_data_is_uploaded_once_as_static_bytes() {
        let (mock, ctx) = context();
        let vb = VertexBuffer::new(&ctx, &[1.0f32, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(vb.size(), 16);
        assert_eq!(mock.buffer_data(vb.id()).unwrap(), bytemuck::cast_slice::<f32, u8>(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(mock.buffer_usage(vb.id()), Some(gl::STATIC_DRAW));
        assert_eq!(mock.call_count("glBufferData"), 1);
        assert_eq!(ctx.bindings().array_buffer, vb.id());
    }

    #[test]
    fn index_buffer_counts_indices() {
        let (mock, ctx) = context();
        let ib = IndexBuffer::new(&ctx, &[0, 1, 2, 2, 3, 0]).unwrap();
        assert_eq!(ib.count(), 6);
        assert_eq!(ib.size(), 24);
        assert_eq!(mock.buffer_data(ib.id()).unwrap().len(), 24);
        assert_eq!(mock.bound_element_buffer(), ib.id());
    }

    #[test]
    fn empty_buffers_are_accepted() {
        let (_mock, ctx) = context();
        let vb = VertexBuffer::new::<u8>(&ctx, &[]).unwrap();
        assert_eq!(vb.size(), 0);
    }

    #[test]
    fn dropping_releases_the_handle_exactly_once() {
        let (mock, ctx) = context();
        let vb = VertexBuffer::new(&ctx, &[0u8; 8]).unwrap();
        let id = vb.id();
        let moved = vb;
        assert!(mock.is_live(id));
        drop(moved);
        assert!(!mock.is_live(id));
        assert_eq!(mock.release_count(id), 1);
        assert_eq!(ctx.bindings().array_buffer, 0);
    }

    #[test]
    fn failed_upload_still_releases_the_buffer() {
        let (mock, ctx) = context();
        mock.fail_next("glBufferData", gl::OUT_OF_MEMORY);
        assert!(VertexBuffer::new(&ctx, &[0.0f32; 3]).is_err());
        assert_eq!(mock.live_objects(), 0);
    }

    #[test]
    fn bind_then_unbind_restores_the_slot() {
        let (mock, ctx) = context();
        let vb = VertexBuffer::new(&ctx, &[0.0f32; 3]).unwrap();
        vb.unbind().unwrap();
        let before = ctx.bindings();
        vb.bind().unwrap();
        vb.unbind().unwrap();
        assert_eq!(ctx.bindings(), before);
        assert_eq!(mock.bound_array_buffer(), 0);
    }
}
