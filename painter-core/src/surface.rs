/// The 2D drawing surface the pipeline submits to

/// RGB colour, channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Single-channel shading intensity, carried in blue.
    pub fn blue(intensity: f64) -> Self {
        Self::new(0.0, 0.0, intensity)
    }

    /// 8-bit channels, clamped.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

/// Minimal 2D drawing capability: same Cartesian units as projected x/y.
pub trait Surface {
    /// Called once at the start of every render pass.
    fn begin_frame(&mut self) {}

    fn fill_polygon(&mut self, points: [(f64, f64); 3], color: Rgb);

    fn plot_point(&mut self, x: f64, y: f64, color: Rgb);
}

/// One primitive call, as seen by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Fill { points: [(f64, f64); 3], color: Rgb },
    Point { x: f64, y: f64, color: Rgb },
}

/// Surface that remembers the calls of the last frame, in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    pub frames: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fills(&self) -> impl Iterator<Item = (&[(f64, f64); 3], &Rgb)> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Fill { points, color } => Some((points, color)),
            DrawCall::Point { .. } => None,
        })
    }

    pub fn fill_count(&self) -> usize {
        self.fills().count()
    }
}

impl Surface for RecordingSurface {
    fn begin_frame(&mut self) {
        self.calls.clear();
        self.frames += 1;
    }

    fn fill_polygon(&mut self, points: [(f64, f64); 3], color: Rgb) {
        self.calls.push(DrawCall::Fill { points, color });
    }

    fn plot_point(&mut self, x: f64, y: f64, color: Rgb) {
        self.calls.push(DrawCall::Point { x, y, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb8_clamps() {
        assert_eq!(Rgb::blue(0.5).to_rgb8(), (0, 0, 128));
        assert_eq!(Rgb::new(-1.0, 2.0, 1.0).to_rgb8(), (0, 255, 255));
    }

    #[test]
    fn test_recording_surface_keeps_last_frame() {
        let mut surface = RecordingSurface::new();
        surface.begin_frame();
        surface.fill_polygon([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)], Rgb::blue(1.0));
        surface.begin_frame();
        surface.plot_point(2.0, 3.0, Rgb::WHITE);

        assert_eq!(surface.frames, 2);
        assert_eq!(surface.fill_count(), 0);
        assert_eq!(
            surface.calls,
            vec![DrawCall::Point { x: 2.0, y: 3.0, color: Rgb::WHITE }]
        );
    }
}
