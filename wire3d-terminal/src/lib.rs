/// Terminal front-end for the hidden-line vehicle renderer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use nalgebra::Vector2;
use std::io::{self, stdout, Write};
use std::time::Duration;
use tracing::{debug, info};
use wire3d_core::config::TerminalConfig;
use wire3d_core::scene::FrameStats;
use wire3d_core::{ConfigError, DragTracker, Renderer, ViewState, Wire3dConfig};

pub mod renderer;

pub use renderer::TerminalSurface;

/// Rows reserved above the drawing area for the status line
const STATUS_ROWS: u16 = 1;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    renderer: Renderer,
    view: ViewState,
    initial_view: ViewState,
    surface: TerminalSurface,
    drag: DragTracker,
    settings: TerminalConfig,
    running: bool,
    dirty: bool,
    stats: FrameStats,
}

impl TerminalApp {
    pub fn new(config: &Wire3dConfig) -> Result<Self, AppError> {
        let (columns, rows) = terminal::size()?;
        Ok(Self::with_size(config, columns, rows))
    }

    /// Build the app for a terminal of `columns` x `rows` cells
    pub fn with_size(config: &Wire3dConfig, columns: u16, rows: u16) -> Self {
        let mut view = config.view.to_view_state();
        view.set_scale(config.terminal.scale);

        Self {
            renderer: Renderer::vehicle(config.raster.fill_rule),
            view,
            initial_view: view,
            surface: TerminalSurface::new(columns as usize, rows.saturating_sub(STATUS_ROWS) as usize),
            drag: DragTracker::new(),
            settings: config.terminal.clone(),
            running: true,
            dirty: true,
            stats: FrameStats::default(),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn surface(&self) -> &TerminalSurface {
        &self.surface
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let poll_interval = Duration::from_millis(1000 / u64::from(self.settings.frame_rate.max(1)));
        let mut out = stdout();

        while self.running {
            if self.dirty {
                self.render(&mut out)?;
                self.dirty = false;
            }

            if event::poll(poll_interval)? {
                let event = event::read()?;
                if self.handle_event(event) {
                    self.dirty = true;
                }
            }
        }

        Ok(())
    }

    /// Apply one input event; returns true when the frame must be redrawn
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(columns, rows) => {
                debug!(columns, rows, "terminal resized");
                self.surface
                    .resize(columns as usize, rows.saturating_sub(STATUS_ROWS) as usize);
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        let step = self.settings.rotation_step;
        let pan = self.settings.pan_step as f32;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return false;
            }
            KeyCode::Char('w') | KeyCode::Up => self.view.rotate(step, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.view.rotate(-step, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.view.rotate(0.0, -step),
            KeyCode::Char('d') | KeyCode::Right => self.view.rotate(0.0, step),
            KeyCode::Char('h') => self.view.pan_by(Vector2::new(-pan, 0.0)),
            KeyCode::Char('l') => self.view.pan_by(Vector2::new(pan, 0.0)),
            KeyCode::Char('k') => self.view.pan_by(Vector2::new(0.0, -pan)),
            KeyCode::Char('j') => self.view.pan_by(Vector2::new(0.0, pan)),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.view.set_scale(self.view.scale.saturating_add(1))
            }
            KeyCode::Char('-') => self.view.set_scale(self.view.scale.saturating_sub(1)),
            KeyCode::Char('o') => {
                self.view.toggle_occlusion();
                info!(occlusion = self.view.occlusion, "occlusion toggled");
            }
            KeyCode::Char('r') => self.view = self.initial_view,
            _ => return false,
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        // Each cell is one pixel wide and two pixels tall
        let x = mouse.column as f32;
        let y = mouse.row.saturating_sub(STATUS_ROWS) as f32 * 2.0;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag.begin(x, y);
                false
            }
            MouseEventKind::Drag(MouseButton::Left) => match self.drag.drag_to(x, y) {
                Some(delta) => {
                    self.view.pan_by(delta);
                    true
                }
                None => false,
            },
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag.end();
                false
            }
            _ => false,
        }
    }

    /// Rasterize the current view and write it to the terminal
    pub fn render<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.surface.clear();
        self.stats = self.renderer.render(self.view, &mut self.surface);

        self.surface.draw(out, STATUS_ROWS)?;
        queue!(
            out,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;
        out.flush()
    }

    pub fn status_line(&self) -> String {
        format!(
            "wire3d | rx {:+.2} ry {:+.2} | scale {} | hidden lines {} | {} px | WASD rotate +/- scale o occlusion drag/hjkl pan r reset q quit",
            self.view.rotation_x,
            self.view.rotation_y,
            self.view.scale,
            if self.view.occlusion { "on" } else { "off" },
            self.stats.painted,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app() -> TerminalApp {
        TerminalApp::with_size(&Wire3dConfig::default(), 120, 41)
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_terminal_scale_replaces_view_scale() {
        let app = app();
        assert_eq!(app.view().scale, 2);
        assert_eq!(app.surface().cell_size(), (120, 40));
    }

    #[test]
    fn test_keys_update_view() {
        let mut app = app();
        assert!(app.handle_event(key('o')));
        assert!(app.view().occlusion);
        assert!(app.handle_event(key('+')));
        assert_eq!(app.view().scale, 3);
        let before = app.view().rotation_y;
        assert!(app.handle_event(key('d')));
        assert!((app.view().rotation_y - before - 0.1).abs() < 1e-5);
        assert!(app.handle_event(key('r')));
        assert!(!app.view().occlusion);
        assert!(!app.handle_event(key('x')));
    }

    #[test]
    fn test_scale_never_reaches_zero() {
        let mut app = app();
        for _ in 0..5 {
            app.handle_event(key('-'));
        }
        assert_eq!(app.view().scale, 1);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(!app.handle_event(Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))));
        assert!(!app.is_running());
    }

    #[test]
    fn test_mouse_drag_pans() {
        let mut app = app();
        assert!(!app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5)));
        assert!(app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 13, 6)));
        assert_eq!(app.view().pan, Vector2::new(3.0, 2.0));
        assert!(!app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 13, 6)));
        assert!(!app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 6)));
        assert_eq!(app.view().pan, Vector2::new(3.0, 2.0));
    }

    #[test]
    fn test_resize_event() {
        let mut app = app();
        assert!(app.handle_event(Event::Resize(80, 25)));
        assert_eq!(app.surface().cell_size(), (80, 24));
    }

    #[test]
    fn test_render_draws_vehicle() {
        let mut app = app();
        let mut out = Vec::new();
        app.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("wire3d | rx"));
        assert!(text.contains('▀') || text.contains('▄') || text.contains('█'));
    }
}
