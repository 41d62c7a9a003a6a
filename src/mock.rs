//! A headless driver that records what it is asked to do.
//!
//! `MockDriver` models the parts of the OpenGL state machine this crate
//! touches: object names, the global binding slots, per vertex array
//! attribute state, uniforms and draw submissions. It raises the same error
//! flags a core profile driver would for the misuse it can detect, so the
//! error-checking path can be exercised without a GPU.
//!
//! Shader "compilation" is deliberately simple: a stage compiles if its
//! source declares `void main`. Linking fails if a fragment stage `in` has no
//! vertex stage `out` of the same name; otherwise every `uniform` declaration
//! in the attached stages receives a location, in order.
//!
//! ```rust
//! use glwrap::mock::MockDriver;
//! use glwrap::{Config, Context, VertexBuffer};
//!
//! let mock = MockDriver::new();
//! let ctx = Context::new(mock.clone(), Config::default());
//! let vb = VertexBuffer::new(&ctx, &[0.0f32, 1.0, 2.0]).unwrap();
//! assert_eq!(mock.buffer_data(vb.id()).unwrap().len(), 12);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use vec_map::VecMap;

use crate::driver::Driver;
use crate::gl;
use crate::program::Uniform;

/// State of one vertex attribute slot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Attribute {
    /// Set by `glEnableVertexAttribArray`.
    pub enabled: bool,

    /// Set by `glVertexAttribPointer`.
    pub pointer: Option<Pointer>,
}

/// Arguments recorded by `glVertexAttribPointer`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Pointer {
    /// The array buffer bound when the pointer was set.
    pub buffer: u32,

    /// Component count.
    pub size: i32,

    /// Component type.
    pub ty: u32,

    /// Whether fixed-point data is normalized.
    pub normalized: bool,

    /// Byte stride between vertices.
    pub stride: i32,

    /// Byte offset of the first component.
    pub offset: usize,
}

/// Recorded state of one vertex array object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexArray {
    /// Attribute slots keyed by index.
    pub attributes: VecMap<Attribute>,

    /// The bound element buffer.
    pub element_buffer: u32,
}

/// One recorded `glDrawElements` submission.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Draw {
    /// Primitive mode.
    pub mode: u32,

    /// Number of indices.
    pub count: usize,

    /// Index type.
    pub index_type: u32,

    /// Byte offset into the element buffer.
    pub offset: usize,

    /// Program in use.
    pub program: u32,

    /// Vertex array bound.
    pub vertex_array: u32,

    /// Element buffer of that vertex array.
    pub element_buffer: u32,
}

/// Recorded state of one texture object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Texture {
    /// Width in texels.
    pub width: u32,

    /// Height in texels.
    pub height: u32,

    /// Internal format.
    pub internal_format: u32,

    /// Uploaded bytes, empty if allocated without data.
    pub data: Vec<u8>,

    /// Parameters set with `glTexParameteri`.
    pub parameters: HashMap<u32, i32>,
}

struct Buffer {
    data: Vec<u8>,
    usage: u32,
}

struct Shader {
    kind: u32,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct Program {
    shaders: Vec<u32>,
    linked: bool,
    log: String,
    locations: HashMap<String, i32>,
    uniforms: HashMap<i32, Uniform>,
}

#[derive(Default)]
struct State {
    next_id: u32,
    errors: VecDeque<u32>,
    failures: HashMap<&'static str, u32>,
    calls: Vec<&'static str>,
    released: Vec<u32>,
    clear_color: [f32; 4],
    clears: Vec<u32>,
    enabled: Vec<u32>,
    blend_func: Option<(u32, u32)>,
    buffers: HashMap<u32, Buffer>,
    array_buffer: u32,
    element_buffer: u32,
    vertex_arrays: HashMap<u32, VertexArray>,
    vertex_array: u32,
    shaders: HashMap<u32, Shader>,
    programs: HashMap<u32, Program>,
    program: u32,
    textures: HashMap<u32, Texture>,
    active_texture: u32,
    texture_units: VecMap<u32>,
    draws: Vec<Draw>,
}

impl State {
    /// Logs a call and raises any error injected for it.
    fn record(&mut self, call: &'static str) {
        self.calls.push(call);
        if let Some(code) = self.failures.remove(call) {
            self.errors.push_back(code);
        }
    }

    fn raise(&mut self, code: u32) {
        self.errors.push_back(code);
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn release(&mut self, id: u32) {
        self.released.push(id);
    }

    fn bound_element_buffer(&self) -> u32 {
        match self.vertex_arrays.get(&self.vertex_array) {
            Some(vao) => vao.element_buffer,
            None => self.element_buffer,
        }
    }

    fn current_texture(&self) -> u32 {
        self.texture_units
            .get(self.active_texture as usize)
            .cloned()
            .unwrap_or(0)
    }
}

/// Collects the names declared by `qualifier` lines in GLSL source.
fn declarations(source: &str, qualifier: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in source.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.any(|token| token == qualifier) {
            if let Some(last) = line.split_whitespace().last() {
                let name = last.trim_end_matches(';');
                let name = match name.find('[') {
                    Some(bracket) => &name[.. bracket],
                    None => name,
                };
                if !name.is_empty() && !names.iter().any(|n| n == name) {
                    names.push(name.to_owned());
                }
            }
        }
    }
    names
}

/// Recording driver. Clones share state, so keep one clone for inspection
/// and hand the other to a [`Context`].
///
/// [`Context`]: ../context/struct.Context.html
#[derive(Clone, Default)]
pub struct MockDriver {
    state: Rc<RefCell<State>>,
}

impl MockDriver {
    /// Constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an error flag as if an earlier, unchecked call had failed.
    pub fn push_error(&self, code: u32) {
        self.state.borrow_mut().raise(code);
    }

    /// Makes the next invocation of `call` (e.g. `"glBufferData"`) raise
    /// `code`.
    pub fn fail_next(&self, call: &'static str, code: u32) {
        self.state.borrow_mut().failures.insert(call, code);
    }

    /// Every call issued so far, by driver entry point name. `glGetError` is
    /// not recorded.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.borrow().calls.clone()
    }

    /// Number of times `call` has been issued.
    pub fn call_count(&self, call: &str) -> usize {
        self.state.borrow().calls.iter().filter(|c| **c == call).count()
    }

    /// Forgets the recorded call log.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Number of times object `id` has been deleted.
    pub fn release_count(&self, id: u32) -> usize {
        self.state.borrow().released.iter().filter(|r| **r == id).count()
    }

    /// Returns true if `id` names an object that exists.
    pub fn is_live(&self, id: u32) -> bool {
        let state = self.state.borrow();
        state.buffers.contains_key(&id)
            || state.vertex_arrays.contains_key(&id)
            || state.shaders.contains_key(&id)
            || state.programs.contains_key(&id)
            || state.textures.contains_key(&id)
    }

    /// Number of objects currently alive.
    pub fn live_objects(&self) -> usize {
        let state = self.state.borrow();
        state.buffers.len()
            + state.vertex_arrays.len()
            + state.shaders.len()
            + state.programs.len()
            + state.textures.len()
    }

    /// Contents uploaded to buffer `id`.
    pub fn buffer_data(&self, id: u32) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&id).map(|buffer| buffer.data.clone())
    }

    /// Usage hint given for buffer `id`.
    pub fn buffer_usage(&self, id: u32) -> Option<u32> {
        self.state.borrow().buffers.get(&id).map(|buffer| buffer.usage)
    }

    /// Recorded state of vertex array `id`.
    pub fn vertex_array(&self, id: u32) -> Option<VertexArray> {
        self.state.borrow().vertex_arrays.get(&id).cloned()
    }

    /// The current `GL_ARRAY_BUFFER` binding.
    pub fn bound_array_buffer(&self) -> u32 {
        self.state.borrow().array_buffer
    }

    /// The current `GL_ELEMENT_ARRAY_BUFFER` binding.
    pub fn bound_element_buffer(&self) -> u32 {
        self.state.borrow().bound_element_buffer()
    }

    /// The current vertex array.
    pub fn bound_vertex_array(&self) -> u32 {
        self.state.borrow().vertex_array
    }

    /// The program in use.
    pub fn bound_program(&self) -> u32 {
        self.state.borrow().program
    }

    /// The 2D texture bound to texture unit `unit`.
    pub fn bound_texture(&self, unit: u32) -> u32 {
        self.state
            .borrow()
            .texture_units
            .get(unit as usize)
            .cloned()
            .unwrap_or(0)
    }

    /// Source text given to shader `id`.
    pub fn shader_source(&self, id: u32) -> Option<String> {
        self.state.borrow().shaders.get(&id).map(|shader| shader.source.clone())
    }

    /// Shaders attached to program `id`.
    pub fn attached_shaders(&self, id: u32) -> Vec<u32> {
        self.state
            .borrow()
            .programs
            .get(&id)
            .map(|program| program.shaders.clone())
            .unwrap_or_default()
    }

    /// The last value written to `location` of program `id`.
    pub fn uniform(&self, id: u32, location: i32) -> Option<Uniform> {
        self.state
            .borrow()
            .programs
            .get(&id)
            .and_then(|program| program.uniforms.get(&location).cloned())
    }

    /// Recorded state of texture `id`.
    pub fn texture(&self, id: u32) -> Option<Texture> {
        self.state.borrow().textures.get(&id).cloned()
    }

    /// The current clear color.
    pub fn clear_color(&self) -> [f32; 4] {
        self.state.borrow().clear_color
    }

    /// Masks passed to `glClear`, in order.
    pub fn clears(&self) -> Vec<u32> {
        self.state.borrow().clears.clone()
    }

    /// Returns true if `cap` is enabled.
    pub fn is_enabled(&self, cap: u32) -> bool {
        self.state.borrow().enabled.contains(&cap)
    }

    /// The blend factors last set.
    pub fn blend_func(&self) -> Option<(u32, u32)> {
        self.state.borrow().blend_func
    }

    /// Every draw submitted so far.
    pub fn draws(&self) -> Vec<Draw> {
        self.state.borrow().draws.clone()
    }
}

impl Driver for MockDriver {
    fn get_error(&self) -> u32 {
        self.state.borrow_mut().errors.pop_front().unwrap_or(gl::NO_ERROR)
    }

    fn get_string(&self, name: u32) -> Option<String> {
        match name {
            gl::VERSION => Some("3.3.0 glwrap mock".to_owned()),
            _ => None,
        }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        let mut state = self.state.borrow_mut();
        state.record("glClearColor");
        state.clear_color = [r, g, b, a];
    }

    fn clear(&self, mask: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glClear");
        state.clears.push(mask);
    }

    fn enable(&self, cap: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glEnable");
        if !state.enabled.contains(&cap) {
            state.enabled.push(cap);
        }
    }

    fn disable(&self, cap: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glDisable");
        state.enabled.retain(|c| *c != cap);
    }

    fn blend_func(&self, src: u32, dst: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glBlendFunc");
        state.blend_func = Some((src, dst));
    }

    fn gen_buffer(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.record("glGenBuffers");
        let id = state.next_id();
        state.buffers.insert(id, Buffer { data: Vec::new(), usage: 0 });
        id
    }

    fn delete_buffer(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glDeleteBuffers");
        if state.buffers.remove(&id).is_none() {
            return;
        }
        state.release(id);
        if state.array_buffer == id {
            state.array_buffer = 0;
        }
        if state.element_buffer == id {
            state.element_buffer = 0;
        }
        for vao in state.vertex_arrays.values_mut() {
            if vao.element_buffer == id {
                vao.element_buffer = 0;
            }
        }
    }

    fn bind_buffer(&self, target: u32, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glBindBuffer");
        if id != 0 && !state.buffers.contains_key(&id) {
            state.raise(gl::INVALID_OPERATION);
            return;
        }
        match target {
            gl::ARRAY_BUFFER => state.array_buffer = id,
            gl::ELEMENT_ARRAY_BUFFER => {
                let vertex_array = state.vertex_array;
                match state.vertex_arrays.get_mut(&vertex_array) {
                    Some(vao) => vao.element_buffer = id,
                    None => state.element_buffer = id,
                }
            }
            _ => state.raise(gl::INVALID_ENUM),
        }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glBufferData");
        let id = match target {
            gl::ARRAY_BUFFER => state.array_buffer,
            gl::ELEMENT_ARRAY_BUFFER => state.bound_element_buffer(),
            _ => {
                state.raise(gl::INVALID_ENUM);
                return;
            }
        };
        match state.buffers.get_mut(&id) {
            Some(buffer) => {
                buffer.data = data.to_vec();
                buffer.usage = usage;
            }
            None => state.raise(gl::INVALID_OPERATION),
        }
    }

    fn gen_vertex_array(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.record("glGenVertexArrays");
        let id = state.next_id();
        state.vertex_arrays.insert(id, VertexArray::default());
        id
    }

    fn delete_vertex_array(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glDeleteVertexArrays");
        if state.vertex_arrays.remove(&id).is_some() {
            state.release(id);
            if state.vertex_array == id {
                state.vertex_array = 0;
            }
        }
    }

    fn bind_vertex_array(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glBindVertexArray");
        if id != 0 && !state.vertex_arrays.contains_key(&id) {
            state.raise(gl::INVALID_OPERATION);
            return;
        }
        state.vertex_array = id;
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glEnableVertexAttribArray");
        let vertex_array = state.vertex_array;
        match state.vertex_arrays.get_mut(&vertex_array) {
            Some(vao) => {
                let attribute = vao
                    .attributes
                    .entry(index as usize)
                    .or_insert_with(Attribute::default);
                attribute.enabled = true;
            }
            None => state.raise(gl::INVALID_OPERATION),
        }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) {
        let mut state = self.state.borrow_mut();
        state.record("glVertexAttribPointer");
        if !(1 ..= 4).contains(&size) || stride < 0 {
            state.raise(gl::INVALID_VALUE);
            return;
        }
        let buffer = state.array_buffer;
        let vertex_array = state.vertex_array;
        match state.vertex_arrays.get_mut(&vertex_array) {
            Some(vao) if buffer != 0 => {
                let attribute = vao
                    .attributes
                    .entry(index as usize)
                    .or_insert_with(Attribute::default);
                attribute.pointer = Some(Pointer {
                    buffer,
                    size,
                    ty,
                    normalized,
                    stride,
                    offset,
                });
            }
            _ => state.raise(gl::INVALID_OPERATION),
        }
    }

    fn create_shader(&self, ty: u32) -> u32 {
        let mut state = self.state.borrow_mut();
        state.record("glCreateShader");
        match ty {
            gl::VERTEX_SHADER | gl::FRAGMENT_SHADER => {
                let id = state.next_id();
                let shader = Shader {
                    kind: ty,
                    source: String::new(),
                    compiled: false,
                    log: String::new(),
                };
                state.shaders.insert(id, shader);
                id
            }
            _ => {
                state.raise(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn shader_source(&self, id: u32, source: &str) {
        let mut state = self.state.borrow_mut();
        state.record("glShaderSource");
        match state.shaders.get_mut(&id) {
            Some(shader) => shader.source = source.to_owned(),
            None => state.raise(gl::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glCompileShader");
        match state.shaders.get_mut(&id) {
            Some(shader) => {
                shader.compiled = shader.source.contains("void main");
                shader.log = if shader.compiled {
                    String::new()
                } else {
                    "0:1(1): error: syntax error, no entry point `main` defined".to_owned()
                };
            }
            None => state.raise(gl::INVALID_VALUE),
        }
    }

    fn shader_compile_status(&self, id: u32) -> bool {
        let mut state = self.state.borrow_mut();
        state.record("glGetShaderiv");
        match state.shaders.get(&id) {
            Some(shader) => shader.compiled,
            None => {
                state.raise(gl::INVALID_VALUE);
                false
            }
        }
    }

    fn shader_info_log(&self, id: u32) -> String {
        let mut state = self.state.borrow_mut();
        state.record("glGetShaderInfoLog");
        state.shaders.get(&id).map(|shader| shader.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glDeleteShader");
        if state.shaders.remove(&id).is_some() {
            state.release(id);
        }
    }

    fn create_program(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.record("glCreateProgram");
        let id = state.next_id();
        state.programs.insert(id, Program::default());
        id
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glAttachShader");
        if !state.shaders.contains_key(&shader) {
            state.raise(gl::INVALID_VALUE);
            return;
        }
        match state.programs.get_mut(&program) {
            Some(program) => program.shaders.push(shader),
            None => state.raise(gl::INVALID_VALUE),
        }
    }

    fn link_program(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glLinkProgram");
        let attached = match state.programs.get(&id) {
            Some(program) => program.shaders.clone(),
            None => {
                state.raise(gl::INVALID_VALUE);
                return;
            }
        };
        let mut sources = Vec::new();
        let mut outputs = Vec::new();
        let mut inputs = Vec::new();
        let mut log = String::new();
        for shader in &attached {
            match state.shaders.get(shader) {
                Some(shader) if shader.compiled => {
                    match shader.kind {
                        gl::VERTEX_SHADER => outputs.extend(declarations(&shader.source, "out")),
                        _ => inputs.extend(declarations(&shader.source, "in")),
                    }
                    sources.push(shader.source.clone());
                }
                _ => log = format!("error: shader {} is not compiled", shader),
            }
        }
        if attached.len() < 2 {
            log = "error: a vertex and a fragment shader are required".to_owned();
        }
        if let Some(input) = inputs.iter().find(|input| !outputs.contains(input)) {
            log = format!(
                "error: fragment shader input `{}` has no matching vertex shader output",
                input,
            );
        }
        let mut locations = HashMap::new();
        for name in sources.iter().flat_map(|source| declarations(source, "uniform")) {
            let next = locations.len() as i32;
            locations.entry(name).or_insert(next);
        }
        if let Some(program) = state.programs.get_mut(&id) {
            program.linked = log.is_empty();
            program.log = log;
            program.locations = if program.linked { locations } else { HashMap::new() };
            program.uniforms.clear();
        }
    }

    fn program_link_status(&self, id: u32) -> bool {
        let mut state = self.state.borrow_mut();
        state.record("glGetProgramiv");
        state.programs.get(&id).map(|program| program.linked).unwrap_or(false)
    }

    fn validate_program(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glValidateProgram");
        if !state.programs.contains_key(&id) {
            state.raise(gl::INVALID_VALUE);
        }
    }

    fn program_validate_status(&self, id: u32) -> bool {
        let mut state = self.state.borrow_mut();
        state.record("glGetProgramiv");
        state.programs.get(&id).map(|program| program.linked).unwrap_or(false)
    }

    fn program_info_log(&self, id: u32) -> String {
        let mut state = self.state.borrow_mut();
        state.record("glGetProgramInfoLog");
        state.programs.get(&id).map(|program| program.log.clone()).unwrap_or_default()
    }

    fn delete_program(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glDeleteProgram");
        match state.programs.remove(&id) {
            // A program in use is only flagged for deletion and stays current.
            Some(_) => state.release(id),
            None => state.raise(gl::INVALID_VALUE),
        }
    }

    fn use_program(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glUseProgram");
        if id != 0 && !state.programs.get(&id).map(|p| p.linked).unwrap_or(false) {
            state.raise(gl::INVALID_OPERATION);
            return;
        }
        state.program = id;
    }

    fn get_uniform_location(&self, program: u32, name: &str) -> i32 {
        let mut state = self.state.borrow_mut();
        state.record("glGetUniformLocation");
        match state.programs.get(&program) {
            Some(program) if program.linked => {
                program.locations.get(name).cloned().unwrap_or(-1)
            }
            _ => {
                state.raise(gl::INVALID_OPERATION);
                -1
            }
        }
    }

    fn uniform_1i(&self, location: i32, value: i32) {
        write_uniform(&self.state, "glUniform1i", location, Uniform::Int(value));
    }

    fn uniform_1f(&self, location: i32, value: f32) {
        write_uniform(&self.state, "glUniform1f", location, Uniform::Float(value));
    }

    fn uniform_4f(&self, location: i32, value: [f32; 4]) {
        write_uniform(&self.state, "glUniform4f", location, Uniform::Vec4(value));
    }

    fn uniform_matrix_4fv(&self, location: i32, value: &[[f32; 4]; 4]) {
        write_uniform(&self.state, "glUniformMatrix4fv", location, Uniform::Mat4(*value));
    }

    fn gen_texture(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.record("glGenTextures");
        let id = state.next_id();
        state.textures.insert(id, Texture::default());
        id
    }

    fn delete_texture(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glDeleteTextures");
        if state.textures.remove(&id).is_some() {
            state.release(id);
            for (_, bound) in state.texture_units.iter_mut() {
                if *bound == id {
                    *bound = 0;
                }
            }
        }
    }

    fn active_texture(&self, unit: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glActiveTexture");
        state.active_texture = unit;
    }

    fn bind_texture(&self, target: u32, id: u32) {
        let mut state = self.state.borrow_mut();
        state.record("glBindTexture");
        if target != gl::TEXTURE_2D {
            state.raise(gl::INVALID_ENUM);
            return;
        }
        if id != 0 && !state.textures.contains_key(&id) {
            state.raise(gl::INVALID_OPERATION);
            return;
        }
        let unit = state.active_texture as usize;
        state.texture_units.insert(unit, id);
    }

    fn tex_parameteri(&self, target: u32, param: u32, value: i32) {
        let mut state = self.state.borrow_mut();
        state.record("glTexParameteri");
        let id = state.current_texture();
        match state.textures.get_mut(&id) {
            Some(texture) if target == gl::TEXTURE_2D => {
                texture.parameters.insert(param, value);
            }
            _ => state.raise(gl::INVALID_OPERATION),
        }
    }

    fn tex_image_2d(
        &self,
        target: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        _format: u32,
        _ty: u32,
        data: Option<&[u8]>,
    ) {
        let mut state = self.state.borrow_mut();
        state.record("glTexImage2D");
        let id = state.current_texture();
        match state.textures.get_mut(&id) {
            Some(texture) if target == gl::TEXTURE_2D => {
                texture.width = width;
                texture.height = height;
                texture.internal_format = internal_format;
                texture.data = data.map(|bytes| bytes.to_vec()).unwrap_or_default();
            }
            _ => state.raise(gl::INVALID_OPERATION),
        }
    }

    fn draw_elements(&self, mode: u32, count: usize, ty: u32, offset: usize) {
        let mut state = self.state.borrow_mut();
        state.record("glDrawElements");
        let element_buffer = state.bound_element_buffer();
        if state.vertex_array == 0 || state.program == 0 || element_buffer == 0 {
            state.raise(gl::INVALID_OPERATION);
            return;
        }
        let draw = Draw {
            mode,
            count,
            index_type: ty,
            offset,
            program: state.program,
            vertex_array: state.vertex_array,
            element_buffer,
        };
        state.draws.push(draw);
    }
}

fn write_uniform(
    state: &RefCell<State>,
    call: &'static str,
    location: i32,
    value: Uniform,
) {
    let mut state = state.borrow_mut();
    state.record(call);
    if location == -1 {
        return;
    }
    let current = state.program;
    match state.programs.get_mut(&current) {
        Some(program) if program.locations.values().any(|l| *l == location) => {
            program.uniforms.insert(location, value);
        }
        _ => state.raise(gl::INVALID_OPERATION),
    }
}
