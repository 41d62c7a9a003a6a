//! GPU-visible pixel container.

use std::fmt;

use crate::context::{Context, Object};
use crate::error::{Error, Result};
use crate::gl;
use crate::sampler::Sampler;

/// OpenGL texture ID type.
pub(crate) type Id = u32;

/// Bytes per RGBA8 texel.
const TEXEL_SIZE: usize = 4;

/// GPU-visible 2D texture holding 8-bit RGBA texels.
///
/// Pixels are supplied already decoded, row by row, first row at the
/// bottom of the image as OpenGL expects.
pub struct Texture2 {
    /// The OpenGL texture ID.
    id: Id,

    width: u32,
    height: u32,
    sampler: Sampler,

    /// Releases the texture upon destruction.
    ctx: Context,
}

impl Texture2 {
    /// Uploads `pixels` into a new texture and applies `sampler`.
    ///
    /// The texture is left bound to the active texture unit.
    ///
    /// # Errors
    ///
    /// [`Error::TextureSize`] if `pixels` does not hold exactly
    /// `width * height` texels; nothing is allocated in that case.
    ///
    /// [`Error::TextureSize`]: ../error/enum.Error.html#variant.TextureSize
    #[track_caller]
    pub fn new(
        ctx: &Context,
        width: u32,
        height: u32,
        pixels: &[u8],
        sampler: Sampler,
    ) -> Result<Self> {
        if pixels.len() != width as usize * height as usize * TEXEL_SIZE {
            return Err(Error::TextureSize {
                width,
                height,
                len: pixels.len(),
            });
        }
        let id = ctx.call("glGenTextures", |gl| gl.gen_texture())?;
        let texture = Texture2 {
            id,
            width,
            height,
            sampler,
            ctx: ctx.clone(),
        };
        ctx.bind_texture(ctx.bindings().active_texture, id)?;
        for (param, value) in sampler.parameters().iter().cloned() {
            ctx.call("glTexParameteri", |gl| gl.tex_parameteri(gl::TEXTURE_2D, param, value))?;
        }
        ctx.call("glTexImage2D", |gl| {
            gl.tex_image_2d(
                gl::TEXTURE_2D,
                gl::RGBA8,
                width,
                height,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                Some(pixels),
            )
        })?;
        debug!("created {}x{} texture {}", width, height, id);
        Ok(texture)
    }

    /// Binds the texture to texture unit `slot`, which also becomes the
    /// active unit.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not below [`MAX_TEXTURE_UNITS`].
    ///
    /// [`MAX_TEXTURE_UNITS`]: ../context/constant.MAX_TEXTURE_UNITS.html
    #[track_caller]
    pub fn bind(&self, slot: u32) -> Result<()> {
        self.ctx.bind_texture(slot, self.id)
    }

    /// Clears the 2D texture binding of the active unit.
    #[track_caller]
    pub fn unbind(&self) -> Result<()> {
        self.ctx.bind_texture(self.ctx.bindings().active_texture, 0)
    }

    /// Returns the OpenGL texture ID.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the width of the texture in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the sampling properties.
    pub fn sampler(&self) -> Sampler {
        self.sampler
    }
}

impl Drop for Texture2 {
    fn drop(&mut self) {
        self.ctx.release(Object::Texture, self.id);
    }
}

impl fmt::Debug for Texture2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[derive(Debug)]
        struct Texture2(u32);

        Texture2(self.id).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ErrorPolicy};
    use crate::mock::MockDriver;
    use crate::sampler::{Filter, Wrap};

    fn context() -> (MockDriver, Context) {
        let mock = MockDriver::new();
        let config = Config {
            error_policy: ErrorPolicy::Log,
            ..Config::default()
        };
        (mock.clone(), Context::new(mock, config))
    }

    #[test]
    fn pixels_and_sampling_are_uploaded() {
        let (mock, ctx) = context();
        let pixels = [255u8; 2 * 2 * 4];
        let sampler = Sampler {
            mag_filter: Filter::Nearest,
            wrap_s: Wrap::Repeat,
            ..Sampler::default()
        };
        let texture = Texture2::new(&ctx, 2, 2, &pixels, sampler).unwrap();
        let state = mock.texture(texture.id()).unwrap();
        assert_eq!((state.width, state.height), (2, 2));
        assert_eq!(state.internal_format, gl::RGBA8);
        assert_eq!(state.data, pixels.to_vec());
        assert_eq!(state.parameters[&gl::TEXTURE_MAG_FILTER], gl::NEAREST as i32);
        assert_eq!(state.parameters[&gl::TEXTURE_MIN_FILTER], gl::LINEAR as i32);
        assert_eq!(state.parameters[&gl::TEXTURE_WRAP_S], gl::REPEAT as i32);
        assert_eq!(state.parameters[&gl::TEXTURE_WRAP_T], gl::CLAMP_TO_EDGE as i32);
    }

    #[test]
    fn wrong_pixel_count_allocates_nothing() {
        let (mock, ctx) = context();
        match Texture2::new(&ctx, 4, 4, &[0; 15], Sampler::default()) {
            Err(Error::TextureSize { width, height, len }) => assert_eq!((width, height, len), (4, 4, 15)),
            other => panic!("expected texture size error, got {:?}", other),
        }
        assert_eq!(mock.call_count("glGenTextures"), 0);
    }

    #[test]
    fn bind_selects_the_unit() {
        let (mock, ctx) = context();
        let texture = Texture2::new(&ctx, 1, 1, &[0; 4], Sampler::default()).unwrap();
        texture.bind(3).unwrap();
        assert_eq!(mock.bound_texture(3), texture.id());
        assert_eq!(ctx.bindings().active_texture, 3);
        assert_eq!(ctx.bindings().textures[3], texture.id());
        texture.unbind().unwrap();
        assert_eq!(mock.bound_texture(3), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn units_beyond_the_limit_fail_fast() {
        let (_mock, ctx) = context();
        let texture = Texture2::new(&ctx, 1, 1, &[0; 4], Sampler::default()).unwrap();
        let _ = texture.bind(crate::context::MAX_TEXTURE_UNITS as u32);
    }

    #[test]
    fn dropping_clears_every_unit_holding_it() {
        let (mock, ctx) = context();
        let texture = Texture2::new(&ctx, 1, 1, &[0; 4], Sampler::default()).unwrap();
        let id = texture.id();
        texture.bind(1).unwrap();
        drop(texture);
        assert_eq!(mock.release_count(id), 1);
        assert_eq!(ctx.bindings().textures, [0; crate::context::MAX_TEXTURE_UNITS]);
    }
}
