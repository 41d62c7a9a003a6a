//! Owning wrappers over the OpenGL 3.3 core objects needed to put indexed,
//! shaded geometry on screen: vertex and index buffers, vertex layouts,
//! vertex arrays, shader programs and textures, plus a small renderer and a
//! scene menu for interactive demos.
//!
//! Every driver call is issued through a [`Context`], which checks the error
//! flag around it and keeps a snapshot of the current bindings. Objects
//! release their driver handles when dropped.
//!
//! ```rust
//! use glwrap::mock::MockDriver;
//! use glwrap::{Config, Context, IndexBuffer, Layout, Program, Renderer, Source, VertexArray, VertexBuffer};
//!
//! # fn main() -> glwrap::Result<()> {
//! let ctx = Context::new(MockDriver::new(), Config::default());
//! let vertices: [f32; 8] = [-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5];
//! let vb = VertexBuffer::new(&ctx, &vertices)?;
//! let mut layout = Layout::new();
//! layout.push_typed::<f32>(2);
//! let va = VertexArray::new(&ctx)?;
//! va.add_buffer(&vb, &layout)?;
//! let ib = IndexBuffer::new(&ctx, &[0, 1, 2, 2, 3, 0])?;
//!
//! let source = Source::parse(
//!     "#shader vertex\nvoid main() {}\n#shader fragment\nvoid main() {}\n",
//! )?;
//! let program = Program::from_source(&ctx, &source)?;
//!
//! let renderer = Renderer::new(&ctx);
//! renderer.clear()?;
//! assert_eq!(renderer.draw(&va, &ib, &program)?.count, 6);
//! # Ok(())
//! # }
//! ```
//!
//! [`Context`]: context/struct.Context.html

#[macro_use] extern crate log;

mod util;

pub mod buffer;
pub mod config;
pub mod context;
pub mod draw_call;
pub mod driver;
pub mod error;
pub mod gl;
pub mod layout;
pub mod mock;
pub mod pipeline;
pub mod program;
pub mod renderer;
pub mod sampler;
pub mod scene;
pub mod texture;
pub mod vertex_array;

#[doc(inline)]
pub use buffer::IndexBuffer;

#[doc(inline)]
pub use buffer::VertexBuffer;

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use config::ErrorPolicy;

#[doc(inline)]
pub use context::Bindings;

#[doc(inline)]
pub use context::Context;

#[doc(inline)]
pub use draw_call::DrawCall;

#[doc(inline)]
pub use draw_call::Primitive;

#[doc(inline)]
pub use driver::Driver;

#[doc(inline)]
pub use error::Error;

#[doc(inline)]
pub use error::ErrorCode;

#[doc(inline)]
pub use error::Result;

#[doc(inline)]
pub use layout::Component;

#[doc(inline)]
pub use layout::Element;

#[doc(inline)]
pub use layout::ElementType;

#[doc(inline)]
pub use layout::Layout;

#[doc(inline)]
pub use pipeline::Blend;

#[doc(inline)]
pub use program::Program;

#[doc(inline)]
pub use program::Source;

#[doc(inline)]
pub use program::Stage;

#[doc(inline)]
pub use program::Uniform;

#[doc(inline)]
pub use renderer::Renderer;

#[doc(inline)]
pub use sampler::Sampler;

#[doc(inline)]
pub use scene::Menu;

#[doc(inline)]
pub use scene::Scene;

#[doc(inline)]
pub use scene::Ui;

#[doc(inline)]
pub use texture::Texture2;

#[doc(inline)]
pub use vertex_array::VertexArray;
