//! Driver ownership, binding state and error-checked calls.

use std::{cell, fmt, os, panic, rc};

use crate::config::{Config, ErrorPolicy};
use crate::driver::Driver;
use crate::error::{Error, ErrorCode, Result};
use crate::gl;

/// Upper bound on stale error flags drained before a call.
const MAX_DRAINED_ERRORS: usize = 16;

/// The number of texture units tracked by [`Bindings`], the minimum
/// `GL_MAX_COMBINED_TEXTURE_IMAGE_UNITS` of a 3.3 core context.
///
/// [`Bindings`]: struct.Bindings.html
pub const MAX_TEXTURE_UNITS: usize = 48;

/// Categories of driver object a wrapper can own.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Object {
    Buffer,
    VertexArray,
    Shader,
    Program,
    Texture,
}

/// The driver's global binding slots, as last set through a [`Context`].
///
/// A slot holding `0` has nothing bound. The element buffer slot is really
/// part of the bound vertex array's state on the driver side; the snapshot
/// only records the last element buffer bound through this context.
///
/// Deleting a bound object clears its slot, except for the program in use:
/// the driver only flags it for deletion and it stays current until another
/// program is used.
///
/// [`Context`]: struct.Context.html
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Bindings {
    /// `GL_ARRAY_BUFFER`.
    pub array_buffer: u32,

    /// `GL_ELEMENT_ARRAY_BUFFER`.
    pub element_buffer: u32,

    /// The current vertex array object.
    pub vertex_array: u32,

    /// The program in use.
    pub program: u32,

    /// The active texture unit index.
    pub active_texture: u32,

    /// `GL_TEXTURE_2D` per texture unit.
    pub textures: [u32; MAX_TEXTURE_UNITS],
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            array_buffer: 0,
            element_buffer: 0,
            vertex_array: 0,
            program: 0,
            active_texture: 0,
            textures: [0; MAX_TEXTURE_UNITS],
        }
    }
}

impl Bindings {
    /// Clears every slot referring to a deleted object.
    fn forget(&mut self, object: Object, id: u32) {
        fn reset(slot: &mut u32, id: u32) {
            if *slot == id {
                *slot = 0;
            }
        }

        match object {
            Object::Buffer => {
                reset(&mut self.array_buffer, id);
                reset(&mut self.element_buffer, id);
            }
            Object::VertexArray => reset(&mut self.vertex_array, id),
            Object::Texture => {
                for slot in self.textures.iter_mut() {
                    reset(slot, id);
                }
            }
            Object::Shader | Object::Program => {}
        }
    }
}

struct Inner {
    driver: Box<dyn Driver>,
    config: Config,
    bindings: cell::Cell<Bindings>,
}

/// Shared handle to a graphics driver and its current-binding state.
///
/// Cloning is cheap; every clone refers to the same driver. Every object
/// created from a context keeps a clone so it can release its handle when
/// dropped. A context cannot leave the thread it was created on, matching
/// the driver's rule that a graphics context is current on one thread.
#[derive(Clone)]
pub struct Context {
    inner: rc::Rc<Inner>,
}

impl Context {
    /// Wraps an already-loaded driver.
    pub fn new<D>(driver: D, config: Config) -> Self
        where D: Driver + 'static
    {
        debug!("creating context with {:?}", config);
        Self {
            inner: rc::Rc::new(Inner {
                driver: Box::new(driver),
                config,
                bindings: cell::Cell::new(Bindings::default()),
            }),
        }
    }

    /// Loads the native OpenGL driver from the context that is current on
    /// this thread.
    pub fn load<F>(query_proc_address: F, config: Config) -> Self
        where F: FnMut(&str) -> *const os::raw::c_void
    {
        let context = Context::new(gl::Backend::load(query_proc_address), config);
        match context.version() {
            Some(version) => info!("OpenGL version: {}", version),
            None => warn!("driver did not report GL_VERSION"),
        }
        context
    }

    /// Returns the configuration the context was created with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Returns a snapshot of the binding slots.
    pub fn bindings(&self) -> Bindings {
        self.inner.bindings.get()
    }

    /// Returns the driver's `GL_VERSION` string.
    pub fn version(&self) -> Option<String> {
        self.inner.driver.get_string(gl::VERSION)
    }

    /// Returns true if both handles refer to the same driver.
    pub fn ptr_eq(&self, other: &Context) -> bool {
        rc::Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Issues one driver call between error checks.
    ///
    /// Pending error flags are drained first so that a flag raised afterwards
    /// belongs to `f`. A raised flag is logged and then handled according to
    /// the configured [`ErrorPolicy`].
    ///
    /// [`ErrorPolicy`]: ../config/enum.ErrorPolicy.html
    #[track_caller]
    pub(crate) fn call<T, F>(&self, call: &'static str, f: F) -> Result<T>
        where F: FnOnce(&dyn Driver) -> T
    {
        self.checked(call, panic::Location::caller(), true, f)
    }

    fn checked<T, F>(
        &self,
        call: &'static str,
        location: &'static panic::Location<'static>,
        may_panic: bool,
        f: F,
    ) -> Result<T>
        where F: FnOnce(&dyn Driver) -> T
    {
        let driver = &*self.inner.driver;
        self.drain(driver);
        let value = f(driver);
        match driver.get_error() {
            gl::NO_ERROR => Ok(value),
            code => {
                let error = Error::Driver {
                    code: ErrorCode(code),
                    call,
                    location,
                };
                error!(target: "gl", "{}", error);
                if may_panic && self.inner.config.error_policy == ErrorPolicy::Panic {
                    panic!("{}", error);
                }
                Err(error)
            }
        }
    }

    fn drain(&self, driver: &dyn Driver) {
        for _ in 0 .. MAX_DRAINED_ERRORS {
            match driver.get_error() {
                gl::NO_ERROR => return,
                code => warn!(target: "gl", "discarding stale error {}", ErrorCode(code)),
            }
        }
        warn!(target: "gl", "error flag still set after {} reads", MAX_DRAINED_ERRORS);
    }

    fn update<F>(&self, f: F)
        where F: FnOnce(&mut Bindings)
    {
        let mut bindings = self.inner.bindings.get();
        f(&mut bindings);
        self.inner.bindings.set(bindings);
    }

    /// Binds `id` to a buffer target.
    #[track_caller]
    pub(crate) fn bind_buffer(&self, target: u32, id: u32) -> Result<()> {
        self.call("glBindBuffer", |gl| gl.bind_buffer(target, id))?;
        self.update(|bindings| match target {
            gl::ARRAY_BUFFER => bindings.array_buffer = id,
            gl::ELEMENT_ARRAY_BUFFER => bindings.element_buffer = id,
            _ => {}
        });
        Ok(())
    }

    /// Makes `id` the current vertex array.
    #[track_caller]
    pub(crate) fn bind_vertex_array(&self, id: u32) -> Result<()> {
        self.call("glBindVertexArray", |gl| gl.bind_vertex_array(id))?;
        self.update(|bindings| bindings.vertex_array = id);
        Ok(())
    }

    /// Makes `id` the program in use.
    #[track_caller]
    pub(crate) fn use_program(&self, id: u32) -> Result<()> {
        self.call("glUseProgram", |gl| gl.use_program(id))?;
        self.update(|bindings| bindings.program = id);
        Ok(())
    }

    /// Activates texture unit `unit` and binds a 2D texture to it.
    #[track_caller]
    pub(crate) fn bind_texture(&self, unit: u32, id: u32) -> Result<()> {
        assert!(
            (unit as usize) < MAX_TEXTURE_UNITS,
            "texture unit {} out of range (max {})",
            unit,
            MAX_TEXTURE_UNITS,
        );
        self.call("glActiveTexture", |gl| gl.active_texture(unit))?;
        self.update(|bindings| bindings.active_texture = unit);
        self.call("glBindTexture", |gl| gl.bind_texture(gl::TEXTURE_2D, id))?;
        self.update(|bindings| bindings.textures[unit as usize] = id);
        Ok(())
    }

    /// Deletes a driver object, clearing any snapshot slot it held.
    #[track_caller]
    pub(crate) fn try_release(&self, object: Object, id: u32) -> Result<()> {
        if id == 0 {
            return Ok(());
        }
        let location = panic::Location::caller();
        match object {
            Object::Buffer => {
                self.checked("glDeleteBuffers", location, false, |gl| gl.delete_buffer(id))
            }
            Object::VertexArray => {
                self.checked("glDeleteVertexArrays", location, false, |gl| {
                    gl.delete_vertex_array(id)
                })
            }
            Object::Shader => {
                self.checked("glDeleteShader", location, false, |gl| gl.delete_shader(id))
            }
            Object::Program => {
                self.checked("glDeleteProgram", location, false, |gl| gl.delete_program(id))
            }
            Object::Texture => {
                self.checked("glDeleteTextures", location, false, |gl| gl.delete_texture(id))
            }
        }?;
        debug!("released {:?} {}", object, id);
        self.update(|bindings| bindings.forget(object, id));
        Ok(())
    }

    /// Deletes a driver object. Never panics; failures are only logged.
    ///
    /// Called from `Drop`, so the recorded location is the wrapper's `drop`.
    #[track_caller]
    pub(crate) fn release(&self, object: Object, id: u32) {
        if self.try_release(object, id).is_err() {
            warn!("leaking {:?} {}", object, id);
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[derive(Debug)]
        struct Context<'a> {
            config: &'a Config,
            bindings: Bindings,
        }

        Context {
            config: &self.inner.config,
            bindings: self.bindings(),
        }.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;

    fn context(policy: ErrorPolicy) -> (MockDriver, Context) {
        let mock = MockDriver::new();
        let config = Config {
            error_policy: policy,
            ..Config::default()
        };
        (mock.clone(), Context::new(mock, config))
    }

    #[test]
    fn stale_errors_are_not_attributed_to_the_next_call() {
        let (mock, ctx) = context(ErrorPolicy::Log);
        mock.push_error(gl::INVALID_VALUE);
        mock.push_error(gl::INVALID_ENUM);
        assert!(ctx.call("glClear", |gl| gl.clear(gl::COLOR_BUFFER_BIT)).is_ok());
    }

    #[test]
    fn raised_errors_carry_code_call_and_location() {
        let (mock, ctx) = context(ErrorPolicy::Log);
        mock.fail_next("glClear", gl::OUT_OF_MEMORY);
        match ctx.call("glClear", |gl| gl.clear(gl::COLOR_BUFFER_BIT)) {
            Err(Error::Driver { code, call, location }) => {
                assert_eq!(code, ErrorCode(gl::OUT_OF_MEMORY));
                assert_eq!(call, "glClear");
                assert!(location.file().ends_with("context.rs"));
            }
            other => panic!("expected driver error, got {:?}", other),
        }
    }

    #[test]
    #[should_panic(expected = "GL_INVALID_OPERATION")]
    fn panic_policy_aborts() {
        let (mock, ctx) = context(ErrorPolicy::Panic);
        mock.fail_next("glUseProgram", gl::INVALID_OPERATION);
        let _ = ctx.use_program(0);
    }

    #[test]
    fn failed_binds_leave_the_snapshot_untouched() {
        let (_mock, ctx) = context(ErrorPolicy::Log);
        assert!(ctx.bind_vertex_array(42).is_err());
        assert_eq!(ctx.bindings().vertex_array, 0);
    }

    #[test]
    fn releasing_a_bound_object_clears_its_slot() {
        let (mock, ctx) = context(ErrorPolicy::Log);
        let id = ctx.call("glGenBuffers", |gl| gl.gen_buffer()).unwrap();
        ctx.bind_buffer(gl::ARRAY_BUFFER, id).unwrap();
        assert_eq!(ctx.bindings().array_buffer, id);
        ctx.release(Object::Buffer, id);
        assert_eq!(ctx.bindings().array_buffer, 0);
        assert_eq!(mock.release_count(id), 1);
    }

    #[test]
    fn release_never_panics() {
        let (mock, ctx) = context(ErrorPolicy::Panic);
        mock.fail_next("glDeleteProgram", gl::INVALID_VALUE);
        ctx.release(Object::Program, 7);
    }

    #[test]
    fn failed_releases_report_the_caller() {
        let (mock, ctx) = context(ErrorPolicy::Panic);
        mock.fail_next("glDeleteProgram", gl::INVALID_VALUE);
        let (result, line) = (ctx.try_release(Object::Program, 7), line!());
        match result {
            Err(Error::Driver { call, location, .. }) => {
                assert_eq!(call, "glDeleteProgram");
                assert_eq!(location.line(), line);
                assert!(location.file().ends_with("context.rs"));
            }
            other => panic!("expected driver error, got {:?}", other),
        }
    }

    #[test]
    fn every_guaranteed_texture_unit_is_tracked() {
        let (mock, ctx) = context(ErrorPolicy::Log);
        let id = ctx.call("glGenTextures", |gl| gl.gen_texture()).unwrap();
        let last = MAX_TEXTURE_UNITS as u32 - 1;
        ctx.bind_texture(last, id).unwrap();
        assert_eq!(last, 47);
        assert_eq!(mock.bound_texture(last), id);
        assert_eq!(ctx.bindings().textures[last as usize], id);
        assert_eq!(ctx.bindings().active_texture, last);
    }
}
