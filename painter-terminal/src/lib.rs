/// Terminal front end: keyboard controls over a painter scene
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::debug;
use painter_core::config::ControlsConfig;
use painter_core::{RenderStats, Scene, Vector3};
use std::io::{self, stdout, Write};
use std::time::Duration;

pub mod renderer;

pub use renderer::TerminalCanvas;

/// One control step, as produced by a key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Azimuth(f64),
    Elevation(f64),
    Angle(f64),
    Distance(f64),
    LightAzimuth(f64),
    LightElevation(f64),
    Quit,
}

impl Action {
    pub fn from_key(code: KeyCode, controls: &ControlsConfig) -> Option<Action> {
        let step = controls.step;
        let distance = controls.distance_step;
        let action = match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('a') | KeyCode::Left => Action::Azimuth(-step),
            KeyCode::Char('d') | KeyCode::Right => Action::Azimuth(step),
            KeyCode::Char('w') | KeyCode::Up => Action::Elevation(step),
            KeyCode::Char('s') | KeyCode::Down => Action::Elevation(-step),
            KeyCode::Char('e') => Action::Angle(step),
            KeyCode::Char('r') => Action::Angle(-step),
            KeyCode::Char('+') | KeyCode::Char('=') => Action::Distance(distance),
            KeyCode::Char('-') => Action::Distance(-distance),
            KeyCode::Char('j') => Action::LightAzimuth(-step),
            KeyCode::Char('l') => Action::LightAzimuth(step),
            KeyCode::Char('i') => Action::LightElevation(step),
            KeyCode::Char('k') => Action::LightElevation(-step),
            _ => return None,
        };
        Some(action)
    }
}

/// Spherical angles (azimuth, elevation) of a light vector.
fn light_angles(light: &Vector3) -> (f64, f64) {
    let (x, y, z) = light.components();
    let length = light.length();
    let elevation = if length > 0.0 {
        (y / length).clamp(-1.0, 1.0).asin()
    } else {
        0.0
    };
    (x.atan2(z), elevation)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene<TerminalCanvas>,
    controls: ControlsConfig,
    light_azimuth: f64,
    light_elevation: f64,
    stats: RenderStats,
    running: bool,
}

impl TerminalApp {
    /// Wrap a populated scene; the canvas is sized to the terminal on `run`.
    pub fn new(scene: Scene<TerminalCanvas>, controls: ControlsConfig) -> Self {
        let (light_azimuth, light_elevation) = light_angles(scene.light());
        Self {
            scene,
            controls,
            light_azimuth,
            light_elevation,
            stats: RenderStats::default(),
            running: true,
        }
    }

    pub fn scene(&self) -> &Scene<TerminalCanvas> {
        &self.scene
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Apply one control step through the scene's mutators.
    pub fn apply(&mut self, action: Action) {
        let orientation = self.scene.frustum().orientation();
        let front = self.scene.frustum().front();
        self.stats = match action {
            Action::Quit => {
                self.running = false;
                return;
            }
            Action::Azimuth(d) => self.scene.set_azimuth(orientation.azimuth + d),
            Action::Elevation(d) => self.scene.set_elevation(orientation.elevation + d),
            Action::Angle(d) => self.scene.set_angle(orientation.angle + d),
            Action::Distance(d) => self.scene.set_distance(front + d),
            Action::LightAzimuth(d) => {
                self.light_azimuth += d;
                self.scene.set_light(self.light_azimuth, self.light_elevation)
            }
            Action::LightElevation(d) => {
                self.light_elevation += d;
                self.scene.set_light(self.light_azimuth, self.light_elevation)
            }
        };
        debug!("{:?} -> {:?}", action, self.stats);
    }

    /// Resize the canvas and render a fresh frame.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.scene.surface_mut().resize(width, height);
        self.stats = self.scene.render();
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        // last row is the status line
        self.resize(width as usize, height.saturating_sub(1) as usize);
        self.present()?;

        while self.running {
            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            match event::read()? {
                Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                    if let Some(action) = Action::from_key(code, &self.controls) {
                        self.apply(action);
                        if self.running {
                            self.present()?;
                        }
                    }
                }
                Event::Resize(width, height) => {
                    self.resize(width as usize, height.saturating_sub(1) as usize);
                    self.present()?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn status_line(&self) -> String {
        let o = self.scene.frustum().orientation();
        format!(
            "az {:+.2} el {:+.2} roll {:+.2} dist {:.2} | light {:+.2}/{:+.2} | {} drawn {} culled | a/d w/s e/r +/- j/l i/k q",
            o.azimuth,
            o.elevation,
            o.angle,
            self.scene.frustum().front(),
            self.light_azimuth,
            self.light_elevation,
            self.stats.submitted,
            self.stats.culled,
        )
    }

    fn present(&self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.scene.surface().draw(&mut stdout)?;

        // Draw UI overlay
        let (width, height) = terminal::size()?;
        let mut status = self.status_line();
        status.truncate(width as usize);
        queue!(
            stdout,
            cursor::MoveTo(0, height.saturating_sub(1)),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use painter_core::{DecodedMesh, Frustum, Mesh};

    fn app() -> TerminalApp {
        let canvas = TerminalCanvas::new(40, 20);
        let mut scene = Scene::new(Frustum::default(), Vector3::new(0.3, 0.5, 0.8), canvas).unwrap();
        scene
            .populate(&[DecodedMesh::from(&Mesh::cube(2.0))])
            .unwrap();
        TerminalApp::new(scene, ControlsConfig::default())
    }

    #[test]
    fn test_key_mapping() {
        let controls = ControlsConfig::default();
        assert_eq!(Action::from_key(KeyCode::Char('q'), &controls), Some(Action::Quit));
        assert_eq!(
            Action::from_key(KeyCode::Left, &controls),
            Some(Action::Azimuth(-0.05))
        );
        assert_eq!(
            Action::from_key(KeyCode::Char('+'), &controls),
            Some(Action::Distance(0.1))
        );
        assert_eq!(Action::from_key(KeyCode::Char('z'), &controls), None);
    }

    #[test]
    fn test_apply_moves_camera_and_renders() {
        let mut app = app();
        app.apply(Action::Azimuth(0.5));
        app.apply(Action::Elevation(0.3));
        app.apply(Action::Distance(1.0));

        let o = app.scene().frustum().orientation();
        assert!((o.azimuth - 0.5).abs() < 1e-12);
        assert!((o.elevation - 0.3).abs() < 1e-12);
        assert!((app.scene().frustum().front() - 6.0).abs() < 1e-12);
        // azimuth and elevation both expose three cube faces
        assert_eq!(app.stats().submitted, 6);
        assert!(app.scene().surface().to_text().contains(|c: char| c != ' ' && c != '\n'));
    }

    #[test]
    fn test_light_keys_move_light() {
        let mut app = app();
        app.apply(Action::LightAzimuth(0.2));
        let (azimuth, _) = light_angles(app.scene().light());
        assert!((azimuth - (0.3f64.atan2(0.8) + 0.2)).abs() < 1e-9);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.apply(Action::Quit);
        assert!(!app.is_running());
    }

    #[test]
    fn test_light_angles_round_trip() {
        let light = painter_core::scene::light_from_angles(0.7, -0.4);
        let (azimuth, elevation) = light_angles(&light);
        assert!((azimuth - 0.7).abs() < 1e-12);
        assert!((elevation + 0.4).abs() < 1e-12);
    }
}
