use glwrap::mock::MockDriver;
use glwrap::{
    Config, Context, DrawCall, ElementType, Error, ErrorCode, ErrorPolicy, IndexBuffer, Layout,
    Primitive, Program, Renderer, Sampler, Source, Stage, Texture2, Uniform, VertexArray,
    VertexBuffer,
};
use glwrap::gl;

const BASIC: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/res/basic.shader");

const TEXTURED: &str = "\
#shader vertex
#version 330 core
layout(location = 0) in vec4 position;
layout(location = 1) in vec2 texCoord;
out vec2 v_TexCoord;
void main() { gl_Position = position; v_TexCoord = texCoord; }
#shader fragment
#version 330 core
layout(location = 0) out vec4 color;
in vec2 v_TexCoord;
uniform sampler2D u_Texture;
void main() { color = texture(u_Texture, v_TexCoord); }
";

/// Four corners of a quad, 2 position + 4 color floats each.
const QUAD: [f32; 24] = [
    -0.5, -0.5, 1.0, 0.0, 0.0, 1.0,
    0.5, -0.5, 0.0, 1.0, 0.0, 1.0,
    0.5, 0.5, 0.0, 0.0, 1.0, 1.0,
    -0.5, 0.5, 1.0, 1.0, 1.0, 1.0,
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

fn context(policy: ErrorPolicy) -> (MockDriver, Context) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mock = MockDriver::new();
    let config = Config {
        error_policy: policy,
        ..Config::default()
    };
    (mock.clone(), Context::new(mock, config))
}

fn quad(ctx: &Context) -> (VertexBuffer, VertexArray, IndexBuffer) {
    let vb = VertexBuffer::new(ctx, &QUAD).unwrap();
    let mut layout = Layout::new();
    layout.push_typed::<f32>(2).push_typed::<f32>(4);
    let va = VertexArray::new(ctx).unwrap();
    va.add_buffer(&vb, &layout).unwrap();
    let ib = IndexBuffer::new(ctx, &QUAD_INDICES).unwrap();
    (vb, va, ib)
}

fn identity() -> [[f32; 4]; 4] {
    let mut m = [[0.0; 4]; 4];
    for i in 0 .. 4 {
        m[i][i] = 1.0;
    }
    m
}

#[test]
fn two_triangles_submit_six_indices() {
    let (mock, ctx) = context(ErrorPolicy::Panic);
    let (_vb, va, ib) = quad(&ctx);
    let program = Program::from_file(&ctx, BASIC).unwrap();
    assert_eq!(program.path(), Some(std::path::Path::new(BASIC)));

    let renderer = Renderer::new(&ctx);
    renderer.clear().unwrap();
    let draw_call = renderer.draw(&va, &ib, &program).unwrap();
    assert_eq!(
        draw_call,
        DrawCall {
            primitive: Primitive::Triangles,
            count: 6,
        },
    );

    let draws = mock.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].mode, gl::TRIANGLES);
    assert_eq!(draws[0].count, 6);
    assert_eq!(draws[0].index_type, gl::UNSIGNED_INT);
    assert_eq!(draws[0].offset, 0);
    assert_eq!(draws[0].program, program.id());
    assert_eq!(draws[0].vertex_array, va.id());
    assert_eq!(draws[0].element_buffer, ib.id());
}

#[test]
fn draw_binds_program_then_vertex_array_then_indices() {
    let (mock, ctx) = context(ErrorPolicy::Panic);
    let (_vb, va, ib) = quad(&ctx);
    let program = Program::from_file(&ctx, BASIC).unwrap();
    va.unbind().unwrap();
    program.unbind().unwrap();

    mock.clear_calls();
    Renderer::new(&ctx).draw(&va, &ib, &program).unwrap();
    assert_eq!(
        mock.calls(),
        vec!["glUseProgram", "glBindVertexArray", "glBindBuffer", "glDrawElements"],
    );
    let bindings = ctx.bindings();
    assert_eq!(
        (bindings.program, bindings.vertex_array, bindings.element_buffer),
        (program.id(), va.id(), ib.id()),
    );
}

#[test]
fn layout_of_two_and_four_floats() {
    let (mock, ctx) = context(ErrorPolicy::Panic);
    let mut layout = Layout::new();
    layout.push(ElementType::F32, 2).push(ElementType::F32, 4);
    assert_eq!(layout.stride(), 24);
    assert_eq!(layout.elements().len(), 2);
    let offsets: Vec<_> = layout.iter().map(|attribute| attribute.offset).collect();
    assert_eq!(offsets, vec![0, 8]);

    let (vb, va, _ib) = quad(&ctx);
    let state = mock.vertex_array(va.id()).unwrap();
    for attribute in &layout {
        let pointer = state.attributes[attribute.index as usize].pointer.unwrap();
        assert_eq!(pointer.offset, attribute.offset);
        assert_eq!(pointer.stride, 24);
        assert_eq!(pointer.size, attribute.element.count as i32);
        assert_eq!(pointer.buffer, vb.id());
    }
}

#[test]
fn stride_is_the_sum_of_element_sizes() {
    let cases: &[&[(ElementType, u8)]] = &[
        &[(ElementType::F32, 3)],
        &[(ElementType::F32, 3), (ElementType::U8, 4)],
        &[(ElementType::U32, 1), (ElementType::U8, 1), (ElementType::F32, 4)],
        &[(ElementType::U8, 2), (ElementType::U8, 3), (ElementType::U8, 4), (ElementType::F32, 1)],
    ];
    for elements in cases {
        let mut layout = Layout::new();
        let mut expected = 0;
        let mut offsets = Vec::new();
        for &(ty, count) in elements.iter() {
            layout.push(ty, count);
            offsets.push(expected);
            expected += ty.size() * count as usize;
        }
        assert_eq!(layout.stride(), expected);
        assert_eq!(layout.iter().map(|a| a.offset).collect::<Vec<_>>(), offsets);
    }
}

#[test]
fn matrix_uniform_location_is_cached() {
    let (mock, ctx) = context(ErrorPolicy::Panic);
    let program = Program::from_file(&ctx, BASIC).unwrap();
    program.bind().unwrap();
    let mvp = identity();
    program.set_uniform_mat4("u_MVP", &mvp).unwrap();
    let first = program.uniform_location("u_MVP").unwrap();
    let second = program.uniform_location("u_MVP").unwrap();
    assert_eq!(first, second);
    assert_ne!(first, -1);
    assert_eq!(mock.call_count("glGetUniformLocation"), 1);
    assert_eq!(mock.uniform(program.id(), first), Some(Uniform::Mat4(mvp)));
}

#[test]
fn missing_uniform_resolves_to_minus_one_and_writes_nothing() {
    let (mock, ctx) = context(ErrorPolicy::Panic);
    let program = Program::from_file(&ctx, BASIC).unwrap();
    program.bind().unwrap();
    assert_eq!(program.uniform_location("u_Color").unwrap(), -1);
    program.set_uniform_4f("u_Color", 1.0, 0.0, 1.0, 1.0).unwrap();
    assert_eq!(mock.call_count("glUniform4f"), 0);
    assert_eq!(mock.call_count("glGetUniformLocation"), 1);
}

#[test]
fn invalid_vertex_stage_does_not_fault() {
    // The panic policy only concerns driver error flags.
    let (mock, ctx) = context(ErrorPolicy::Panic);
    let mut source = Source::load(BASIC).unwrap();
    source.vertex = source.vertex.replace("void main()", "void entry()");
    match Program::from_source(&ctx, &source) {
        Err(Error::Compile { stage: Stage::Vertex, .. }) => {}
        other => panic!("expected vertex compile error, got {:?}", other),
    }
    assert_eq!(mock.live_objects(), 0);
}

#[test]
fn bind_then_unbind_leaves_bindings_unchanged() {
    let (_mock, ctx) = context(ErrorPolicy::Panic);
    let (vb, va, ib) = quad(&ctx);
    let program = Program::from_file(&ctx, BASIC).unwrap();
    let texture = Texture2::new(&ctx, 1, 1, &[255; 4], Sampler::default()).unwrap();
    vb.unbind().unwrap();
    ib.unbind().unwrap();
    va.unbind().unwrap();
    program.unbind().unwrap();
    texture.unbind().unwrap();

    let before = ctx.bindings();
    vb.bind().unwrap();
    vb.unbind().unwrap();
    va.bind().unwrap();
    va.unbind().unwrap();
    program.bind().unwrap();
    program.unbind().unwrap();
    texture.bind(0).unwrap();
    texture.unbind().unwrap();
    assert_eq!(ctx.bindings(), before);
}

#[test]
fn textured_quad_samples_unit_zero() {
    let (mock, ctx) = context(ErrorPolicy::Panic);
    let vertices: [f32; 16] = [
        -0.5, -0.5, 0.0, 0.0,
        0.5, -0.5, 1.0, 0.0,
        0.5, 0.5, 1.0, 1.0,
        -0.5, 0.5, 0.0, 1.0,
    ];
    let vb = VertexBuffer::new(&ctx, &vertices).unwrap();
    let mut layout = Layout::new();
    layout.push_typed::<f32>(2).push_typed::<f32>(2);
    let va = VertexArray::new(&ctx).unwrap();
    va.add_buffer(&vb, &layout).unwrap();
    let ib = IndexBuffer::new(&ctx, &QUAD_INDICES).unwrap();

    let program = Program::from_source(&ctx, &Source::parse(TEXTURED).unwrap()).unwrap();
    let pixels: Vec<u8> = (0 .. 4 * 4 * 4).map(|i| i as u8).collect();
    let texture = Texture2::new(&ctx, 4, 4, &pixels, Sampler::default()).unwrap();
    texture.bind(0).unwrap();
    program.bind().unwrap();
    program.set_uniform_1i("u_Texture", 0).unwrap();

    let renderer = Renderer::new(&ctx);
    renderer.set_blend(glwrap::Blend::Alpha).unwrap();
    renderer.draw(&va, &ib, &program).unwrap();

    let location = program.uniform_location("u_Texture").unwrap();
    assert_eq!(mock.uniform(program.id(), location), Some(Uniform::Int(0)));
    assert_eq!(mock.bound_texture(0), texture.id());
    assert_eq!(mock.texture(texture.id()).unwrap().data, pixels);
    assert_eq!(mock.draws().len(), 1);
}

#[test]
fn driver_errors_point_at_the_caller() {
    let (mock, ctx) = context(ErrorPolicy::Log);
    let (_vb, va, ib) = quad(&ctx);
    let program = Program::from_file(&ctx, BASIC).unwrap();
    mock.push_error(gl::INVALID_ENUM);
    mock.fail_next("glDrawElements", gl::INVALID_OPERATION);
    match Renderer::new(&ctx).draw(&va, &ib, &program) {
        Err(Error::Driver { code, call, location }) => {
            assert_eq!(code, ErrorCode(gl::INVALID_OPERATION));
            assert_eq!(call, "glDrawElements");
            assert!(location.file().ends_with("scenarios.rs"));
        }
        other => panic!("expected driver error, got {:?}", other),
    }
}

#[test]
#[should_panic(expected = "glDrawElements")]
fn panic_policy_aborts_on_driver_errors() {
    let (mock, ctx) = context(ErrorPolicy::Panic);
    let (_vb, va, ib) = quad(&ctx);
    let program = Program::from_file(&ctx, BASIC).unwrap();
    mock.fail_next("glDrawElements", gl::INVALID_OPERATION);
    let _ = Renderer::new(&ctx).draw(&va, &ib, &program);
}

#[test]
fn dropping_everything_releases_every_handle() {
    let (mock, ctx) = context(ErrorPolicy::Panic);
    let program_id;
    {
        let (_vb, va, ib) = quad(&ctx);
        let program = Program::from_file(&ctx, BASIC).unwrap();
        program_id = program.id();
        let _texture = Texture2::new(&ctx, 2, 1, &[0; 8], Sampler::default()).unwrap();
        Renderer::new(&ctx).draw(&va, &ib, &program).unwrap();
        assert_eq!(mock.live_objects(), 5);
    }
    assert_eq!(mock.live_objects(), 0);
    let bindings = ctx.bindings();
    // The deleted program stays in use until another one is made current.
    assert_eq!(bindings.program, program_id);
    assert_eq!((bindings.vertex_array, bindings.array_buffer), (0, 0));
}
