//! Canvas2D line surface.
//!
//! The guideline canvas is an absolutely positioned `<canvas>` laid over
//! the wrapper. Its backing store is kept at the wrapper's pixel size by the
//! renderer, so one canvas unit is one CSS pixel.

use pb_core::Line;
use pb_render::{LineStyle, LineSurface};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wrap `canvas`. Fails when the browser refuses a 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, String> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "Canvas error: getContext threw".to_string())?
            .ok_or_else(|| "Canvas error: no 2d context".to_string())?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Canvas error: unexpected context type".to_string())?;
        Ok(Self { canvas, ctx })
    }
}

impl LineSurface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn stroke_lines(&mut self, lines: &[Line], style: &LineStyle) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_stroke_style_str(&style.color);
        ctx.set_line_width(style.width);
        ctx.set_shadow_color(style.shadow_color);
        ctx.set_shadow_blur(style.shadow_blur);
        ctx.set_shadow_offset_x(style.shadow_offset.0);
        ctx.set_shadow_offset_y(style.shadow_offset.1);
        ctx.begin_path();
        for line in lines {
            ctx.move_to(line.p0.x, line.p0.y);
            ctx.line_to(line.p1.x, line.p1.y);
        }
        ctx.stroke();
        ctx.restore();
    }
}
