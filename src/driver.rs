//! Raw graphics driver entry points.

/// The subset of OpenGL the crate issues.
///
/// Each method corresponds to one driver entry point and performs no error
/// checking of its own; callers go through [`Context`], which polls the error
/// flag around every call.
///
/// Object names are plain `u32` handles where `0` means "none", exactly as the
/// driver reports them.
///
/// [`Context`]: ../context/struct.Context.html
pub trait Driver {
    /// Corresponds to `glGetError`.
    fn get_error(&self) -> u32;

    /// Corresponds to `glGetString`.
    fn get_string(&self, name: u32) -> Option<String>;

    // Framebuffer and fixed-function state

    /// Corresponds to `glClearColor`.
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);

    /// Corresponds to `glClear`.
    fn clear(&self, mask: u32);

    /// Corresponds to `glEnable`.
    fn enable(&self, cap: u32);

    /// Corresponds to `glDisable`.
    fn disable(&self, cap: u32);

    /// Corresponds to `glBlendFunc`.
    fn blend_func(&self, src: u32, dst: u32);

    // Buffers

    /// Corresponds to `glGenBuffers(1)`.
    fn gen_buffer(&self) -> u32;

    /// Corresponds to `glDeleteBuffers(1)`.
    fn delete_buffer(&self, id: u32);

    /// Corresponds to `glBindBuffer`.
    fn bind_buffer(&self, target: u32, id: u32);

    /// Corresponds to `glBufferData`.
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);

    // Vertex arrays

    /// Corresponds to `glGenVertexArrays(1)`.
    fn gen_vertex_array(&self) -> u32;

    /// Corresponds to `glDeleteVertexArrays(1)`.
    fn delete_vertex_array(&self, id: u32);

    /// Corresponds to `glBindVertexArray`.
    fn bind_vertex_array(&self, id: u32);

    /// Corresponds to `glEnableVertexAttribArray`.
    fn enable_vertex_attrib_array(&self, index: u32);

    /// Corresponds to `glVertexAttribPointer`.
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: usize,
    );

    // Shaders and programs

    /// Corresponds to `glCreateShader`.
    fn create_shader(&self, ty: u32) -> u32;

    /// Corresponds to `glShaderSource` with a single string.
    fn shader_source(&self, id: u32, source: &str);

    /// Corresponds to `glCompileShader`.
    fn compile_shader(&self, id: u32);

    /// Corresponds to `glGetShaderiv(GL_COMPILE_STATUS)`.
    fn shader_compile_status(&self, id: u32) -> bool;

    /// Corresponds to `glGetShaderInfoLog`.
    fn shader_info_log(&self, id: u32) -> String;

    /// Corresponds to `glDeleteShader`.
    fn delete_shader(&self, id: u32);

    /// Corresponds to `glCreateProgram`.
    fn create_program(&self) -> u32;

    /// Corresponds to `glAttachShader`.
    fn attach_shader(&self, program: u32, shader: u32);

    /// Corresponds to `glLinkProgram`.
    fn link_program(&self, id: u32);

    /// Corresponds to `glGetProgramiv(GL_LINK_STATUS)`.
    fn program_link_status(&self, id: u32) -> bool;

    /// Corresponds to `glValidateProgram`.
    fn validate_program(&self, id: u32);

    /// Corresponds to `glGetProgramiv(GL_VALIDATE_STATUS)`.
    fn program_validate_status(&self, id: u32) -> bool;

    /// Corresponds to `glGetProgramInfoLog`.
    fn program_info_log(&self, id: u32) -> String;

    /// Corresponds to `glDeleteProgram`.
    fn delete_program(&self, id: u32);

    /// Corresponds to `glUseProgram`.
    fn use_program(&self, id: u32);

    /// Corresponds to `glGetUniformLocation`.
    fn get_uniform_location(&self, program: u32, name: &str) -> i32;

    /// Corresponds to `glUniform1i`.
    fn uniform_1i(&self, location: i32, value: i32);

    /// Corresponds to `glUniform1f`.
    fn uniform_1f(&self, location: i32, value: f32);

    /// Corresponds to `glUniform4f`.
    fn uniform_4f(&self, location: i32, value: [f32; 4]);

    /// Corresponds to `glUniformMatrix4fv` with one column-major matrix.
    fn uniform_matrix_4fv(&self, location: i32, value: &[[f32; 4]; 4]);

    // Textures

    /// Corresponds to `glGenTextures(1)`.
    fn gen_texture(&self) -> u32;

    /// Corresponds to `glDeleteTextures(1)`.
    fn delete_texture(&self, id: u32);

    /// Corresponds to `glActiveTexture(GL_TEXTURE0 + unit)`.
    fn active_texture(&self, unit: u32);

    /// Corresponds to `glBindTexture`.
    fn bind_texture(&self, target: u32, id: u32);

    /// Corresponds to `glTexParameteri`.
    fn tex_parameteri(&self, target: u32, param: u32, value: i32);

    /// Corresponds to `glTexImage2D` at mip level 0.
    fn tex_image_2d(
        &self,
        target: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    );

    // Draw calls

    /// Corresponds to `glDrawElements` sourcing indices from the bound
    /// element buffer at byte `offset`.
    fn draw_elements(&self, mode: u32, count: usize, ty: u32, offset: usize);
}
