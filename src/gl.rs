//! OpenGL bindings and the native driver.

use std::{ffi, os, ptr};

use crate::driver::Driver;
use crate::util;

// Import OpenGL bindings.
include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));

/// The native OpenGL driver.
///
/// Requires an OpenGL 3.3 core context to be current on the calling thread
/// for as long as the backend is used.
pub struct Backend {
    gl: Gl,
}

impl Backend {
    /// Constructor.
    pub fn load<F>(mut func: F) -> Self
        where F: FnMut(&str) -> *const os::raw::c_void
    {
        let gl = Gl::load_with(|sym| func(sym));
        Backend { gl }
    }
}

impl Driver for Backend {
    fn get_error(&self) -> u32 {
        unsafe { self.gl.GetError() }
    }

    fn get_string(&self, name: u32) -> Option<String> {
        let raw = unsafe { self.gl.GetString(name) };
        if raw.is_null() {
            None
        } else {
            let cstr = unsafe { ffi::CStr::from_ptr(raw as *const os::raw::c_char) };
            Some(cstr.to_string_lossy().into_owned())
        }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        trace!(target: "gl", "glClearColor{:?}", (r, g, b, a));
        unsafe {
            self.gl.ClearColor(r, g, b, a);
        }
    }

    fn clear(&self, mask: u32) {
        trace!(target: "gl", "glClear{:?}", (mask,));
        unsafe {
            self.gl.Clear(mask);
        }
    }

    fn enable(&self, cap: u32) {
        trace!(target: "gl", "glEnable{:?}", (cap,));
        unsafe {
            self.gl.Enable(cap);
        }
    }

    fn disable(&self, cap: u32) {
        trace!(target: "gl", "glDisable{:?}", (cap,));
        unsafe {
            self.gl.Disable(cap);
        }
    }

    fn blend_func(&self, src: u32, dst: u32) {
        trace!(target: "gl", "glBlendFunc{:?}", (src, dst));
        unsafe {
            self.gl.BlendFunc(src, dst);
        }
    }

    fn gen_buffer(&self) -> u32 {
        let mut id: u32 = 0;
        unsafe {
            trace!(target: "gl", "glGenBuffers(1) ");
            self.gl.GenBuffers(1, &mut id as *mut _);
        }
        trace!(target: "gl", "=> {}", id);
        id
    }

    fn delete_buffer(&self, id: u32) {
        trace!(target: "gl", "glDeleteBuffers{:?}", (1, id));
        unsafe {
            self.gl.DeleteBuffers(1, &id as *const _);
        }
    }

    fn bind_buffer(&self, target: u32, id: u32) {
        trace!(target: "gl", "glBindBuffer{:?}", (target, id));
        unsafe {
            self.gl.BindBuffer(target, id);
        }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        trace!(target: "gl", "glBufferData{:?}", (target, data.len(), usage));
        unsafe {
            self.gl.BufferData(
                target,
                data.len() as _,
                data.as_ptr() as *const _,
                usage,
            );
        }
    }

    fn gen_vertex_array(&self) -> u32 {
        let mut id: u32 = 0;
        unsafe {
            trace!(target: "gl", "glGenVertexArrays(1) ");
            self.gl.GenVertexArrays(1, &mut id as *mut _);
        }
        trace!(target: "gl", "=> {}", id);
        id
    }

    fn delete_vertex_array(&self, id: u32) {
        trace!(target: "gl", "glDeleteVertexArrays{:?}", (1, id));
        unsafe {
            self.gl.DeleteVertexArrays(1, &id as *const _);
        }
    }

    fn bind_vertex_array(&self, id: u32) {
        trace!(target: "gl", "glBindVertexArray{:?}", (id,));
        unsafe {
            self.gl.BindVertexArray(id);
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        trace!(target: "gl", "glEnableVertexAttribArray{:?}", (index,));
        unsafe {
            self.gl.EnableVertexAttribArray(index);
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
        trace!(
            target: "gl",
            "glVertexAttribPointer{:?}",
            (index, size, ty, normalized, stride, offset),
        );
        let normalized = if normalized { TRUE } else { FALSE };
        unsafe {
            self.gl.VertexAttribPointer(
                index,
                size,
                ty,
                normalized,
                stride,
                offset as *const _,
            );
        }
    }

    fn create_shader(&self, ty: u32) -> u32 {
        let id = unsafe {
            trace!(target: "gl", "glCreateShader{:?} ", (ty,));
            self.gl.CreateShader(ty)
        };
        trace!(target: "gl", "=> {}", id);
        id
    }

    fn shader_source(&self, id: u32, source: &str) {
        trace!(target: "gl", "glShaderSource{:?}", (id, source.len()));
        let ptr = source.as_ptr() as *const os::raw::c_char;
        let len = source.len() as i32;
        unsafe {
            self.gl.ShaderSource(id, 1, &ptr as *const _, &len as *const _);
        }
    }

    fn compile_shader(&self, id: u32) {
        trace!(target: "gl", "glCompileShader{:?}", (id,));
        unsafe {
            self.gl.CompileShader(id);
        }
    }

    fn shader_compile_status(&self, id: u32) -> bool {
        let mut status = 0i32;
        unsafe {
            trace!(target: "gl", "glGetShaderiv{:?} ", (id, COMPILE_STATUS));
            self.gl.GetShaderiv(id, COMPILE_STATUS, &mut status as *mut _);
        }
        trace!(target: "gl", "=> {}", status);
        status != 0
    }

    fn shader_info_log(&self, id: u32) -> String {
        let mut len = 0i32;
        unsafe {
            self.gl.GetShaderiv(id, INFO_LOG_LENGTH, &mut len as *mut _);
        }
        let mut buf = vec![0u8; len.max(1) as usize];
        let mut written = 0i32;
        unsafe {
            self.gl.GetShaderInfoLog(
                id,
                buf.len() as _,
                &mut written as *mut _,
                buf.as_mut_ptr() as *mut _,
            );
        }
        util::info_log(buf, written)
    }

    fn delete_shader(&self, id: u32) {
        trace!(target: "gl", "glDeleteShader{:?}", (id,));
        unsafe {
            self.gl.DeleteShader(id);
        }
    }

    fn create_program(&self) -> u32 {
        let id = unsafe {
            trace!(target: "gl", "glCreateProgram() ");
            self.gl.CreateProgram()
        };
        trace!(target: "gl", "=> {}", id);
        id
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        trace!(target: "gl", "glAttachShader{:?}", (program, shader));
        unsafe {
            self.gl.AttachShader(program, shader);
        }
    }

    fn link_program(&self, id: u32) {
        trace!(target: "gl", "glLinkProgram{:?}", (id,));
        unsafe {
            self.gl.LinkProgram(id);
        }
    }

    fn program_link_status(&self, id: u32) -> bool {
        let mut status = 0i32;
        unsafe {
            trace!(target: "gl", "glGetProgramiv{:?} ", (id, LINK_STATUS));
            self.gl.GetProgramiv(id, LINK_STATUS, &mut status as *mut _);
        }
        trace!(target: "gl", "=> {}", status);
        status != 0
    }

    fn validate_program(&self, id: u32) {
        trace!(target: "gl", "glValidateProgram{:?}", (id,));
        unsafe {
            self.gl.ValidateProgram(id);
        }
    }

    fn program_validate_status(&self, id: u32) -> bool {
        let mut status = 0i32;
        unsafe {
            trace!(target: "gl", "glGetProgramiv{:?} ", (id, VALIDATE_STATUS));
            self.gl.GetProgramiv(id, VALIDATE_STATUS, &mut status as *mut _);
        }
        trace!(target: "gl", "=> {}", status);
        status != 0
    }

    fn program_info_log(&self, id: u32) -> String {
        let mut len = 0i32;
        unsafe {
            self.gl.GetProgramiv(id, INFO_LOG_LENGTH, &mut len as *mut _);
        }
        let mut buf = vec![0u8; len.max(1) as usize];
        let mut written = 0i32;
        unsafe {
            self.gl.GetProgramInfoLog(
                id,
                buf.len() as _,
                &mut written as *mut _,
                buf.as_mut_ptr() as *mut _,
            );
        }
        util::info_log(buf, written)
    }

    fn delete_program(&self, id: u32) {
        trace!(target: "gl", "glDeleteProgram{:?}", (id,));
        unsafe {
            self.gl.DeleteProgram(id);
        }
    }

    fn use_program(&self, id: u32) {
        trace!(target: "gl", "glUseProgram{:?}", (id,));
        unsafe {
            self.gl.UseProgram(id);
        }
    }

    fn get_uniform_location(&self, program: u32, name: &str) -> i32 {
        let name = match util::c_string(name) {
            Some(name) => name,
            None => return -1,
        };
        let location = unsafe {
            trace!(target: "gl", "glGetUniformLocation{:?} ", (program, &name));
            self.gl.GetUniformLocation(program, name.as_ptr() as *const _)
        };
        trace!(target: "gl", "=> {}", location);
        location
    }

    fn uniform_1i(&self, location: i32, value: i32) {
        trace!(target: "gl", "glUniform1i{:?}", (location, value));
        unsafe {
            self.gl.Uniform1i(location, value);
        }
    }

    fn uniform_1f(&self, location: i32, value: f32) {
        trace!(target: "gl", "glUniform1f{:?}", (location, value));
        unsafe {
            self.gl.Uniform1f(location, value);
        }
    }

    fn uniform_4f(&self, location: i32, value: [f32; 4]) {
        trace!(target: "gl", "glUniform4f{:?}", (location, value));
        let [x, y, z, w] = value;
        unsafe {
            self.gl.Uniform4f(location, x, y, z, w);
        }
    }

    fn uniform_matrix_4fv(&self, location: i32, value: &[[f32; 4]; 4]) {
        trace!(target: "gl", "glUniformMatrix4fv{:?}", (location, 1, FALSE, value));
        unsafe {
            self.gl.UniformMatrix4fv(location, 1, FALSE, value.as_ptr() as *const f32);
        }
    }

    fn gen_texture(&self) -> u32 {
        let mut id = 0;
        unsafe {
            trace!(target: "gl", "glGenTextures(1) ");
            self.gl.GenTextures(1, &mut id as *mut _);
        }
        trace!(target: "gl", "=> {}", id);
        id
    }

    fn delete_texture(&self, id: u32) {
        trace!(target: "gl", "glDeleteTextures{:?}", (1, id));
        unsafe {
            self.gl.DeleteTextures(1, &id as *const _);
        }
    }

    fn active_texture(&self, unit: u32) {
        trace!(target: "gl", "glActiveTexture{:?}", (unit,));
        unsafe {
            self.gl.ActiveTexture(TEXTURE0 + unit);
        }
    }

    fn bind_texture(&self, target: u32, id: u32) {
        trace!(target: "gl", "glBindTexture{:?}", (target, id));
        unsafe {
            self.gl.BindTexture(target, id);
        }
    }

    fn tex_parameteri(&self, target: u32, param: u32, value: i32) {
        trace!(target: "gl", "glTexParameteri{:?}", (target, param, value));
        unsafe {
            self.gl.TexParameteri(target, param, value);
        }
    }

    fn tex_image_2d(
        &self,
        target: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    ) {
        trace!(
            target: "gl",
            "glTexImage2D{:?}",
            (target, 0, internal_format, width, height, 0, format, ty),
        );
        let pixels = match data {
            Some(bytes) => bytes.as_ptr() as *const os::raw::c_void,
            None => ptr::null(),
        };
        unsafe {
            self.gl.TexImage2D(
                target,
                0,
                internal_format as _,
                width as _,
                height as _,
                0,
                format,
                ty,
                pixels,
            );
        }
    }

    fn draw_elements(&self, mode: u32, count: usize, ty: u32, offset: usize) {
        trace!(target: "gl", "glDrawElements{:?}", (mode, count, ty, offset));
        unsafe {
            self.gl.DrawElements(mode, count as _, ty, offset as *const _);
        }
    }
}
