//! GLSL programs.

use std::{cell, fmt, fs, path};
use std::collections::HashMap;

use crate::context::{Context, Object};
use crate::error::{Error, Result};
use crate::gl;

/// The OpenGL program ID type.
pub(crate) type Id = u32;

/// The location the driver reports for a uniform the program lacks.
pub const UNRESOLVED: i32 = -1;

/// Marker that introduces a stage section in a shader source file.
const STAGE_MARKER: &str = "#shader";

/// A programmable pipeline stage.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Stage {
    /// Corresponds to `GL_VERTEX_SHADER`.
    Vertex,

    /// Corresponds to `GL_FRAGMENT_SHADER`.
    Fragment,
}

impl Stage {
    /// Returns the equivalent OpenGL shader type enumeration constant.
    pub fn as_gl_enum(self) -> u32 {
        match self {
            Stage::Vertex => gl::VERTEX_SHADER,
            Stage::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vertex and fragment source split out of one text resource.
///
/// The resource is divided by marker lines containing `#shader` and the
/// name of the stage that follows:
///
/// ```text
/// #shader vertex
/// #version 330 core
/// ...
/// #shader fragment
/// #version 330 core
/// ...
/// ```
///
/// Lines before the first marker are ignored. A stage marked twice
/// accumulates both sections.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Source {
    /// Vertex stage text.
    pub vertex: String,

    /// Fragment stage text.
    pub fragment: String,
}

impl Source {
    /// Splits `text` into its stage sections.
    pub fn parse(text: &str) -> Result<Self> {
        let mut sections: [Option<String>; 2] = [None, None];
        let mut current = None;
        for (number, line) in text.lines().enumerate() {
            if line.contains(STAGE_MARKER) {
                let stage = if line.contains("vertex") {
                    Stage::Vertex
                } else if line.contains("fragment") {
                    Stage::Fragment
                } else {
                    return Err(Error::UnknownStage {
                        line: number + 1,
                        text: line.to_owned(),
                    });
                };
                sections[stage as usize].get_or_insert_with(String::new);
                current = Some(stage);
            } else if let Some(stage) = current {
                let section = sections[stage as usize].get_or_insert_with(String::new);
                section.push_str(line);
                section.push('\n');
            }
        }
        let [vertex, fragment] = sections;
        Ok(Source {
            vertex: vertex.ok_or(Error::MissingStage(Stage::Vertex))?,
            fragment: fragment.ok_or(Error::MissingStage(Stage::Fragment))?,
        })
    }

    /// Reads and splits the file at `path`.
    pub fn load<P: AsRef<path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        Source::parse(&text)
    }

    /// Returns the text of one stage.
    pub fn stage(&self, stage: Stage) -> &str {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }
}

/// A value that can be written to a uniform.
///
/// Matrices are column-major: `Mat4(m)[c][r]` is row `r` of column `c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniform {
    /// Corresponds to `glUniform1i`; also selects sampler texture units.
    Int(i32),

    /// Corresponds to `glUniform1f`.
    Float(f32),

    /// Corresponds to `glUniform4f`.
    Vec4([f32; 4]),

    /// Corresponds to `glUniformMatrix4fv`.
    Mat4([[f32; 4]; 4]),
}

impl From<i32> for Uniform {
    fn from(value: i32) -> Self {
        Uniform::Int(value)
    }
}

impl From<f32> for Uniform {
    fn from(value: f32) -> Self {
        Uniform::Float(value)
    }
}

impl From<[f32; 4]> for Uniform {
    fn from(value: [f32; 4]) -> Self {
        Uniform::Vec4(value)
    }
}

impl From<[[f32; 4]; 4]> for Uniform {
    fn from(value: [[f32; 4]; 4]) -> Self {
        Uniform::Mat4(value)
    }
}

/// A compiled stage, deleted when dropped. The linked program keeps its own
/// copy of the code, so stages only live for the duration of a link.
struct StageObject<'a> {
    id: u32,
    ctx: &'a Context,
}

impl<'a> Drop for StageObject<'a> {
    fn drop(&mut self) {
        self.ctx.release(Object::Shader, self.id);
    }
}

fn compile<'a>(ctx: &'a Context, stage: Stage, source: &str) -> Result<StageObject<'a>> {
    trace!("compiling {} stage", stage);
    let id = ctx.call("glCreateShader", |gl| gl.create_shader(stage.as_gl_enum()))?;
    let object = StageObject { id, ctx };
    ctx.call("glShaderSource", |gl| gl.shader_source(id, source))?;
    ctx.call("glCompileShader", |gl| gl.compile_shader(id))?;
    if !ctx.call("glGetShaderiv", |gl| gl.shader_compile_status(id))? {
        let log = ctx.call("glGetShaderInfoLog", |gl| gl.shader_info_log(id))?;
        error!("failed to compile {} shader: {}", stage, log);
        return Err(Error::Compile { stage, log });
    }
    Ok(object)
}

/// A compiled and linked shader program.
///
/// Construction either yields a linked program or an error; there is no
/// half-built state to check for before binding.
///
/// Uniform locations are looked up lazily and cached per name for the
/// lifetime of the program, including names the program does not have.
pub struct Program {
    /// The OpenGL program ID.
    id: Id,

    /// File the source came from, if any.
    path: Option<path::PathBuf>,

    /// Uniform name to location, [`UNRESOLVED`] for unknown names.
    ///
    /// [`UNRESOLVED`]: constant.UNRESOLVED.html
    locations: cell::RefCell<HashMap<String, i32>>,

    /// Releases the program upon destruction.
    ctx: Context,
}

impl Program {
    /// Compiles both stages and links them.
    ///
    /// # Errors
    ///
    /// [`Error::Compile`] or [`Error::Link`] carry the driver's diagnostic
    /// log. Every driver object created along the way is released before the
    /// error is returned.
    ///
    /// [`Error::Compile`]: ../error/enum.Error.html#variant.Compile
    /// [`Error::Link`]: ../error/enum.Error.html#variant.Link
    pub fn from_source(ctx: &Context, source: &Source) -> Result<Self> {
        let vertex = compile(ctx, Stage::Vertex, &source.vertex)?;
        let fragment = compile(ctx, Stage::Fragment, &source.fragment)?;

        let id = ctx.call("glCreateProgram", |gl| gl.create_program())?;
        let program = Program {
            id,
            path: None,
            locations: cell::RefCell::new(HashMap::new()),
            ctx: ctx.clone(),
        };
        ctx.call("glAttachShader", |gl| gl.attach_shader(id, vertex.id))?;
        ctx.call("glAttachShader", |gl| gl.attach_shader(id, fragment.id))?;
        ctx.call("glLinkProgram", |gl| gl.link_program(id))?;
        if !ctx.call("glGetProgramiv", |gl| gl.program_link_status(id))? {
            let log = ctx.call("glGetProgramInfoLog", |gl| gl.program_info_log(id))?;
            error!("failed to link program: {}", log);
            return Err(Error::Link { log });
        }

        // Validation depends on state bound at draw time, so a failure here
        // is only worth a warning.
        ctx.call("glValidateProgram", |gl| gl.validate_program(id))?;
        if !ctx.call("glGetProgramiv", |gl| gl.program_validate_status(id))? {
            let log = ctx.call("glGetProgramInfoLog", |gl| gl.program_info_log(id))?;
            warn!("program {} failed validation: {}", id, log);
        }

        debug!("linked program {}", id);
        Ok(program)
    }

    /// Loads, compiles and links the two-stage source file at `path`.
    pub fn from_file<P: AsRef<path::Path>>(ctx: &Context, path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = Source::load(path)?;
        let mut program = Program::from_source(ctx, &source)?;
        debug!("program {} loaded from {}", program.id, path.display());
        program.path = Some(path.to_owned());
        Ok(program)
    }

    /// Makes this the program in use for draws and uniform writes.
    #[track_caller]
    pub fn bind(&self) -> Result<()> {
        self.ctx.use_program(self.id)
    }

    /// Clears the program in use.
    #[track_caller]
    pub fn unbind(&self) -> Result<()> {
        self.ctx.use_program(0)
    }

    /// Resolves a uniform name to its location.
    ///
    /// The driver is asked at most once per name; later calls are answered
    /// from the cache. A name the program lacks resolves to [`UNRESOLVED`]
    /// and is warned about the first time only.
    ///
    /// [`UNRESOLVED`]: constant.UNRESOLVED.html
    pub fn uniform_location(&self, name: &str) -> Result<i32> {
        let cached = self.locations.borrow().get(name).cloned();
        if let Some(location) = cached {
            return Ok(location);
        }
        let id = self.id;
        let location = self.ctx.call("glGetUniformLocation", |gl| {
            gl.get_uniform_location(id, name)
        })?;
        if location == UNRESOLVED {
            warn!("uniform {} doesn't exist in program {}", name, id);
        }
        self.locations.borrow_mut().insert(name.to_owned(), location);
        Ok(location)
    }

    /// Writes `value` to the named uniform of the program in use.
    ///
    /// The program must be bound first. Writing to a name the program lacks
    /// does nothing.
    pub fn set_uniform<U: Into<Uniform>>(&self, name: &str, value: U) -> Result<()> {
        let location = self.uniform_location(name)?;
        if location == UNRESOLVED {
            return Ok(());
        }
        let value: Uniform = value.into();
        match value {
            Uniform::Int(v) => self.ctx.call("glUniform1i", |gl| gl.uniform_1i(location, v)),
            Uniform::Float(v) => self.ctx.call("glUniform1f", |gl| gl.uniform_1f(location, v)),
            Uniform::Vec4(v) => self.ctx.call("glUniform4f", |gl| gl.uniform_4f(location, v)),
            Uniform::Mat4(ref m) => {
                self.ctx.call("glUniformMatrix4fv", |gl| gl.uniform_matrix_4fv(location, m))
            }
        }
    }

    /// Writes an `int` (or sampler) uniform.
    pub fn set_uniform_1i(&self, name: &str, value: i32) -> Result<()> {
        self.set_uniform(name, value)
    }

    /// Writes a `float` uniform.
    pub fn set_uniform_1f(&self, name: &str, value: f32) -> Result<()> {
        self.set_uniform(name, value)
    }

    /// Writes a `vec4` uniform.
    pub fn set_uniform_4f(&self, name: &str, x: f32, y: f32, z: f32, w: f32) -> Result<()> {
        self.set_uniform(name, [x, y, z, w])
    }

    /// Writes a column-major `mat4` uniform.
    pub fn set_uniform_mat4(&self, name: &str, matrix: &[[f32; 4]; 4]) -> Result<()> {
        self.set_uniform(name, *matrix)
    }

    /// Returns the GLSL program ID.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the file the program was loaded from, if any.
    pub fn path(&self) -> Option<&path::Path> {
        self.path.as_ref().map(|path| path.as_path())
    }

    pub(crate) fn context(&self) -> &Context {
        &self.ctx
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        self.ctx.release(Object::Program, self.id);
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Program")
            .field("id", &self.id)
            .field("path", &self.path)
            .finish()
    }
}
