use glam::{Mat4, Vec3};
use glwrap::{
    Blend, Context, IndexBuffer, Layout, Program, Renderer, Sampler, Scene, Texture2, Ui,
    VertexArray, VertexBuffer,
};

const TEXTURE_SHADER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/menu/res/texture.shader");

/// Fills the window with an editable color.
pub struct ClearColor {
    color: [f32; 4],
}

impl ClearColor {
    pub fn new(_ctx: &Context) -> glwrap::Result<Self> {
        Ok(Self {
            color: [0.2, 0.3, 0.8, 1.0],
        })
    }
}

impl Scene for ClearColor {
    fn on_render(&mut self, renderer: &Renderer) -> glwrap::Result<()> {
        renderer.clear_to(self.color)
    }

    fn on_ui(&mut self, ui: &mut dyn Ui) {
        ui.color_edit4("Clear Color", &mut self.color);
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
    tex_coord: [f32; 2],
}

const QUAD: [Vertex; 4] = [
    Vertex { position: [-50.0, -50.0], tex_coord: [0.0, 0.0] },
    Vertex { position: [50.0, -50.0], tex_coord: [1.0, 0.0] },
    Vertex { position: [50.0, 50.0], tex_coord: [1.0, 1.0] },
    Vertex { position: [-50.0, 50.0], tex_coord: [0.0, 1.0] },
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Side of the generated checkerboard, in texels.
const CHECKER_SIZE: u32 = 64;

/// An RGBA8 checkerboard with translucent dark squares.
fn checkerboard() -> Vec<u8> {
    let mut pixels = Vec::with_capacity((CHECKER_SIZE * CHECKER_SIZE * 4) as usize);
    for y in 0 .. CHECKER_SIZE {
        for x in 0 .. CHECKER_SIZE {
            if (x / 8 + y / 8) % 2 == 0 {
                pixels.extend_from_slice(&[255, 255, 255, 255]);
            } else {
                pixels.extend_from_slice(&[40, 120, 200, 160]);
            }
        }
    }
    pixels
}

/// Two textured quads moved around with sliders.
pub struct Texture2D {
    _vertices: VertexBuffer,
    va: VertexArray,
    ib: IndexBuffer,
    program: Program,
    texture: Texture2,
    projection: Mat4,
    view: Mat4,
    translation_a: [f32; 3],
    translation_b: [f32; 3],
}

impl Texture2D {
    pub fn new(ctx: &Context) -> glwrap::Result<Self> {
        let vertices = VertexBuffer::new(ctx, &QUAD)?;
        let mut layout = Layout::new();
        layout.push_typed::<f32>(2).push_typed::<f32>(2);
        let va = VertexArray::new(ctx)?;
        va.add_buffer(&vertices, &layout)?;
        let ib = IndexBuffer::new(ctx, &QUAD_INDICES)?;

        let program = Program::from_file(ctx, TEXTURE_SHADER)?;
        let texture = Texture2::new(ctx, CHECKER_SIZE, CHECKER_SIZE, &checkerboard(), Sampler::default())?;
        texture.bind(0)?;
        program.bind()?;
        program.set_uniform_1i("u_Texture", 0)?;

        Renderer::new(ctx).set_blend(Blend::Alpha)?;

        Ok(Self {
            _vertices: vertices,
            va,
            ib,
            program,
            texture,
            projection: Mat4::orthographic_rh_gl(0.0, 960.0, 0.0, 540.0, -1.0, 1.0),
            view: Mat4::from_translation(Vec3::ZERO),
            translation_a: [200.0, 200.0, 0.0],
            translation_b: [400.0, 200.0, 0.0],
        })
    }
}

impl Scene for Texture2D {
    fn on_render(&mut self, renderer: &Renderer) -> glwrap::Result<()> {
        self.texture.bind(0)?;
        for translation in &[self.translation_a, self.translation_b] {
            let model = Mat4::from_translation(Vec3::from(*translation));
            let mvp = self.projection * self.view * model;
            self.program.bind()?;
            self.program.set_uniform_mat4("u_MVP", &mvp.to_cols_array_2d())?;
            renderer.draw(&self.va, &self.ib, &self.program)?;
        }
        Ok(())
    }

    fn on_ui(&mut self, ui: &mut dyn Ui) {
        ui.slider3("Translation A", &mut self.translation_a, 0.0, 960.0);
        ui.slider3("Translation B", &mut self.translation_b, 0.0, 960.0);
    }
}
