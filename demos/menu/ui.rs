use glutin::event::VirtualKeyCode as Key;
use glwrap::scene::BACK_LABEL;
use glwrap::Ui;

/// A pending keyboard action, applied to the focused widget on the next
/// frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Action {
    Activate,
    Back,
    Adjust(i8),
}

/// A widget overlay driven from the keyboard, reported in the window title.
///
/// Up and Down move the focus, Return presses buttons, Left and Right
/// adjust the selected component of a color or slider, Tab selects the next
/// component and Escape leaves the active scene.
#[derive(Debug, Default)]
pub struct KeyboardUi {
    /// Labels drawn so far this frame.
    widgets: Vec<String>,

    /// Number of widgets drawn last frame.
    previous: usize,

    focus: usize,
    component: usize,
    action: Option<Action>,
    status: String,
}

impl KeyboardUi {
    pub fn key(&mut self, key: Key) {
        match key {
            Key::Up if self.previous > 0 => {
                self.focus = (self.focus + self.previous - 1) % self.previous;
                self.component = 0;
            }
            Key::Down if self.previous > 0 => {
                self.focus = (self.focus + 1) % self.previous;
                self.component = 0;
            }
            Key::Tab => self.component += 1,
            Key::Return => self.action = Some(Action::Activate),
            Key::Escape => self.action = Some(Action::Back),
            Key::Left => self.action = Some(Action::Adjust(-1)),
            Key::Right => self.action = Some(Action::Adjust(1)),
            _ => {}
        }
    }

    /// Starts a frame's worth of widgets.
    pub fn begin(&mut self) {
        self.widgets.clear();
        self.status.clear();
    }

    /// Finishes the frame, returning the title to show.
    pub fn end(&mut self) -> String {
        if self.widgets.len() != self.previous {
            self.focus = 0;
            self.component = 0;
        }
        self.previous = self.widgets.len();
        self.action = None;
        match self.widgets.get(self.focus) {
            Some(label) if self.status.is_empty() => format!("glwrap - {}", label),
            Some(label) => format!("glwrap - {} {}", label, self.status),
            None => "glwrap".to_owned(),
        }
    }

    /// Registers a widget, returning true if it has the focus.
    fn widget(&mut self, label: &str) -> bool {
        self.widgets.push(label.to_owned());
        self.widgets.len() - 1 == self.focus
    }

    fn adjust(&mut self, values: &mut [f32], step: f32, min: f32, max: f32) -> bool {
        let index = self.component % values.len();
        let changed = match self.action {
            Some(Action::Adjust(direction)) => {
                let value = &mut values[index];
                *value = (*value + step * direction as f32).max(min).min(max);
                self.action = None;
                true
            }
            _ => false,
        };
        self.status = format!("[{}] = {:.2}", index, values[index]);
        changed
    }
}

impl Ui for KeyboardUi {
    fn button(&mut self, label: &str) -> bool {
        let focused = self.widget(label);
        let pressed = match self.action {
            Some(Action::Back) => label == BACK_LABEL,
            Some(Action::Activate) => focused,
            _ => false,
        };
        if pressed {
            self.action = None;
        }
        pressed
    }

    fn color_edit4(&mut self, label: &str, color: &mut [f32; 4]) -> bool {
        if self.widget(label) {
            self.adjust(color, 0.05, 0.0, 1.0)
        } else {
            false
        }
    }

    fn slider3(&mut self, label: &str, value: &mut [f32; 3], min: f32, max: f32) -> bool {
        if self.widget(label) {
            self.adjust(value, (max - min) / 96.0, min, max)
        } else {
            false
        }
    }
}
