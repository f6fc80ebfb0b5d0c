use anyhow::{anyhow, Result};
use sdl2::pixels::Color;
use sdl2::rect::Point;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::Sdl;

/// SDL window with a 2D canvas for debug outlines.
pub struct GameWindow {
    canvas: Canvas<Window>,
}

impl GameWindow {
    pub fn new(sdl: &Sdl, title: &str, width: u32, height: u32) -> Result<Self> {
        let video = sdl.video().map_err(|e| anyhow!("failed to init SDL2 video: {e}"))?;

        let window = video
            .window(title, width, height)
            .position_centered()
            .build()?;

        let canvas = window.into_canvas().accelerated().build()?;

        Ok(Self { canvas })
    }

    pub fn clear(&mut self, rgb: (u8, u8, u8)) {
        self.canvas.set_draw_color(Color::RGB(rgb.0, rgb.1, rgb.2));
        self.canvas.clear();
    }

    /// Closed outline through `points` (world units map 1:1 to pixels).
    pub fn outline(&mut self, points: &[(f32, f32)], rgba: [u8; 4]) -> Result<()> {
        if points.len() < 2 {
            return Ok(());
        }
        let mut path: Vec<Point> = points
            .iter()
            .map(|&(x, y)| Point::new(x.round() as i32, y.round() as i32))
            .collect();
        path.push(path[0]);
        self.canvas
            .set_draw_color(Color::RGBA(rgba[0], rgba[1], rgba[2], rgba[3]));
        self.canvas
            .draw_lines(path.as_slice())
            .map_err(|e| anyhow!("draw failed: {e}"))
    }

    pub fn present(&mut self) {
        self.canvas.present();
    }

    pub fn size(&self) -> (u32, u32) {
        self.canvas.window().size()
    }
}
