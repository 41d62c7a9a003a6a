#[macro_use] extern crate log;

mod scenes;
mod ui;

use std::time::Instant;

use glutin::dpi::LogicalSize;
use glutin::event::{ElementState, Event, KeyboardInput, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::window::WindowBuilder;
use glutin::{Api, ContextBuilder, GlProfile, GlRequest};

use glwrap::{Config, Context, Menu, Renderer};

use ui::KeyboardUi;

const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

fn frame(renderer: &Renderer, menu: &mut Menu, ui: &mut KeyboardUi, dt: f32) -> glwrap::Result<()> {
    renderer.clear_to(BACKGROUND)?;
    menu.on_update(dt);
    menu.on_render(renderer)?;
    ui.begin();
    menu.on_ui(ui)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let event_loop = EventLoop::new();
    let window_builder = WindowBuilder::new()
        .with_title("glwrap")
        .with_inner_size(LogicalSize::new(960.0, 540.0))
        .with_resizable(false);
    let windowed_context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
        .with_gl_profile(GlProfile::Core)
        .with_vsync(true)
        .build_windowed(window_builder, &event_loop)?;
    let windowed_context = unsafe { windowed_context.make_current().map_err(|(_, err)| err)? };

    let ctx = Context::load(
        |sym| windowed_context.get_proc_address(sym) as *const _,
        Config::from_env(),
    );
    let renderer = Renderer::new(&ctx);
    let mut menu = Menu::new(&ctx);
    menu.register("Clear Color", scenes::ClearColor::new);
    menu.register("Texture 2D", scenes::Texture2D::new);
    let mut ui = KeyboardUi::default();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::KeyboardInput {
                    input: KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(key),
                        ..
                    },
                    ..
                } => ui.key(key),
                _ => {}
            },
            Event::MainEventsCleared => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;
                if let Err(err) = frame(&renderer, &mut menu, &mut ui, dt) {
                    error!("{}", err);
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                windowed_context.window().set_title(&ui.end());
                if let Err(err) = windowed_context.swap_buffers() {
                    error!("failed to swap buffers: {}", err);
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    })
}
