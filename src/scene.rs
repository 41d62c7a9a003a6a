//! Selectable scenes and the menu that switches between them.

use std::fmt;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::renderer::Renderer;

/// Label of the button that leaves the active scene.
pub const BACK_LABEL: &str = "<-";

/// Widgets offered by the debug overlay.
///
/// Each method draws one widget and returns true if the user changed it
/// (or, for buttons, pressed it) this frame.
pub trait Ui {
    /// A push button.
    fn button(&mut self, label: &str) -> bool;

    /// An RGBA color editor.
    fn color_edit4(&mut self, label: &str, color: &mut [f32; 4]) -> bool;

    /// Three linked sliders over `min ..= max`.
    fn slider3(&mut self, label: &str, value: &mut [f32; 3], min: f32, max: f32) -> bool;
}

/// A self-contained demonstration driven by the host's frame loop.
///
/// Every hook is optional.
pub trait Scene {
    /// Advances the scene by `dt` seconds.
    fn on_update(&mut self, _dt: f32) {}

    /// Draws the scene.
    fn on_render(&mut self, _renderer: &Renderer) -> Result<()> {
        Ok(())
    }

    /// Draws the scene's overlay widgets.
    fn on_ui(&mut self, _ui: &mut dyn Ui) {}
}

type Constructor = Box<dyn Fn(&Context) -> Result<Box<dyn Scene>>>;

struct Entry {
    name: String,
    constructor: Constructor,
}

struct Active {
    name: String,
    scene: Box<dyn Scene>,
}

/// A registry of scenes keyed by display name, at most one of which is
/// active.
///
/// Scenes are built when selected and dropped when left, so their GPU
/// objects only exist while they are on screen.
pub struct Menu {
    ctx: Context,
    entries: Vec<Entry>,
    active: Option<Active>,
}

impl Menu {
    /// Creates an empty menu whose scenes are built on `ctx`.
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            entries: Vec::new(),
            active: None,
        }
    }

    /// Adds a scene under `name`, replacing any scene of the same name.
    pub fn register<S, F>(&mut self, name: &str, constructor: F)
        where S: Scene + 'static, F: Fn(&Context) -> Result<S> + 'static
    {
        let constructor: Constructor = Box::new(move |ctx: &Context| {
            let scene = constructor(ctx)?;
            Ok(Box::new(scene) as Box<dyn Scene>)
        });
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                warn!("scene {:?} registered twice; keeping the latest", name);
                entry.constructor = constructor;
            }
            None => self.entries.push(Entry {
                name: name.to_owned(),
                constructor,
            }),
        }
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Builds and enters the scene registered under `name`.
    ///
    /// The active scene, if any, is dropped first. If construction fails,
    /// no scene is active afterwards.
    pub fn select(&mut self, name: &str) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.name == name)
            .ok_or_else(|| Error::UnknownScene(name.to_owned()))?;
        self.back();
        let scene = (self.entries[index].constructor)(&self.ctx)?;
        info!("entering scene {:?}", name);
        self.active = Some(Active {
            name: name.to_owned(),
            scene,
        });
        Ok(())
    }

    /// Leaves the active scene, releasing its GPU objects. Returns false if
    /// no scene was active.
    pub fn back(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                info!("leaving scene {:?}", active.name);
                true
            }
            None => false,
        }
    }

    /// Name of the active scene.
    pub fn current(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.name.as_str())
    }

    /// Forwards to the active scene.
    pub fn on_update(&mut self, dt: f32) {
        if let Some(active) = self.active.as_mut() {
            active.scene.on_update(dt);
        }
    }

    /// Forwards to the active scene.
    pub fn on_render(&mut self, renderer: &Renderer) -> Result<()> {
        match self.active.as_mut() {
            Some(active) => active.scene.on_render(renderer),
            None => Ok(()),
        }
    }

    /// Lists one button per scene while idle. While a scene is active, draws
    /// a back button followed by the scene's own widgets.
    pub fn on_ui(&mut self, ui: &mut dyn Ui) -> Result<()> {
        if let Some(active) = self.active.as_mut() {
            if ui.button(BACK_LABEL) {
                self.back();
            } else {
                active.scene.on_ui(ui);
            }
            return Ok(());
        }
        let mut chosen = None;
        for entry in &self.entries {
            if ui.button(&entry.name) && chosen.is_none() {
                chosen = Some(entry.name.clone());
            }
        }
        match chosen {
            Some(name) => self.select(&name),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Menu")
            .field("scenes", &self.names().collect::<Vec<_>>())
            .field("current", &self.current())
            .finish()
    }
}
