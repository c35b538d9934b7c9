use std::collections::BTreeMap;

use serde_json::Value;

use crate::color::theme::Theme;
use crate::compile::config::RenderConfig;
use crate::compile::format::nice_ticks;
use crate::foundation::error::{PlotshotError, PlotshotResult};
use crate::render::gateway::RenderGateway;
use crate::widget::model::ChartFamily;

/// Space reserved for value-axis labels when `containLabel` is set.
const Y_LABEL_BAND_PX: f64 = 40.0;
/// Space reserved for time-axis labels when `containLabel` is set.
const X_LABEL_BAND_PX: f64 = 20.0;
/// Space reserved for a title block.
const TITLE_BAND_PX: f64 = 24.0;

/// Options for [`CpuGateway`].
#[derive(Clone, Copy, Debug)]
pub struct CpuGatewayOpts {
    /// Fraction of a time slot covered by its bars, in `(0, 1]`.
    pub bar_fill_ratio: f64,
    /// Line series stroke width in pixels.
    pub line_width: f64,
    /// Grid line thickness in pixels.
    pub grid_line_width: f64,
}

impl Default for CpuGatewayOpts {
    fn default() -> Self {
        Self {
            bar_fill_ratio: 0.6,
            line_width: 2.0,
            grid_line_width: 1.0,
        }
    }
}

/// Reference gateway: rasterizes bars, lines and grid lines with `vello_cpu` and encodes PNG.
///
/// Text (titles, legends, tick labels) is not drawn; space for it is still reserved so plots
/// line up with engines that do draw it.
#[derive(Clone, Debug, Default)]
pub struct CpuGateway {
    opts: CpuGatewayOpts,
}

impl CpuGateway {
    /// Create a gateway with `opts`.
    pub fn new(opts: CpuGatewayOpts) -> Self {
        Self { opts }
    }
}

impl RenderGateway for CpuGateway {
    #[tracing::instrument(skip(self, config, theme), fields(series = config.series.len()))]
    fn render(
        &self,
        config: &RenderConfig,
        width: u32,
        height: u32,
        theme: &Theme,
    ) -> PlotshotResult<Vec<u8>> {
        let (w, h) = surface_size(width, height)?;
        let scene = Scene::build(config, theme)?;
        let plot = PlotRect::for_config(config, width, height);

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        set_color(&mut ctx, scene.background);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(width), f64::from(height)));

        if plot.is_degenerate() {
            tracing::debug!("plot area collapsed, drawing background only");
        } else {
            let y_max = scene.y_max(config);
            let y = ValueMap::new(config.y_axis.min, y_max, &plot);
            let x = scene.x_map(config, &plot);

            if config.y_axis.show_split_lines {
                self.draw_grid_lines(&mut ctx, config, &plot, &y, scene.grid_line);
            }
            self.draw_bars(&mut ctx, &scene, &plot, &x, &y);
            self.draw_lines(&mut ctx, &scene, &x, &y);
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        encode_png(pixmap.data_as_u8_slice(), width, height)
    }
}

impl CpuGateway {
    fn draw_grid_lines(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        config: &RenderConfig,
        plot: &PlotRect,
        y: &ValueMap,
        color: [u8; 4],
    ) {
        let ticks: Vec<f64> = if config.y_axis.ticks.is_empty() {
            nice_ticks(y.max, 5)
        } else {
            config.y_axis.ticks.iter().map(|t| t.value).collect()
        };
        set_color(ctx, color);
        let half = self.opts.grid_line_width / 2.0;
        for v in ticks {
            let py = y.to_px(v);
            if py < plot.top - half || py > plot.bottom + half {
                continue;
            }
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                plot.left,
                py - half,
                plot.right,
                py + half,
            ));
        }
    }

    fn draw_bars(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        scene: &Scene,
        plot: &PlotRect,
        x: &TimeMap,
        y: &ValueMap,
    ) {
        let groups = scene.bar_groups();
        if groups.is_empty() || scene.xs.is_empty() {
            return;
        }

        let slot = plot.width() / scene.xs.len() as f64;
        let bar_w = slot * self.opts.bar_fill_ratio.clamp(0.05, 1.0) / groups.len() as f64;

        for (row, t) in scene.xs.iter().enumerate() {
            let Some(t) = t else { continue };
            let center = x.to_px(*t);
            let left0 = center - bar_w * groups.len() as f64 / 2.0;

            for (gi, members) in groups.iter().enumerate() {
                let left = left0 + bar_w * gi as f64;
                let mut base = y.min;
                for &si in members {
                    let s = &scene.series[si];
                    let Some(v) = s.values.get(row).copied().flatten() else {
                        continue;
                    };
                    let top = base + v;
                    set_color(ctx, s.color);
                    let (py0, py1) = (y.to_px(base), y.to_px(top));
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                        left,
                        py0.min(py1),
                        left + bar_w,
                        py0.max(py1),
                    ));
                    base = top;
                }
            }
        }
    }

    fn draw_lines(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        scene: &Scene,
        x: &TimeMap,
        y: &ValueMap,
    ) {
        let half = self.opts.line_width / 2.0;
        for s in scene.series.iter().filter(|s| s.family == ChartFamily::Line) {
            let points: Vec<(f64, f64)> = scene
                .xs
                .iter()
                .zip(&s.values)
                .filter_map(|(t, v)| Some((x.to_px((*t)?), y.to_px((*v)?))))
                .collect();
            if points.is_empty() {
                continue;
            }
            set_color(ctx, s.color);
            if points.len() == 1 {
                let (px, py) = points[0];
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    px - half,
                    py - half,
                    px + half,
                    py + half,
                ));
                continue;
            }
            for seg in points.windows(2) {
                if let Some(quad) = segment_quad(seg[0], seg[1], half) {
                    ctx.fill_path(&quad);
                }
            }
        }
    }
}

/// Plot area in pixels, after padding and reserved label bands.
#[derive(Clone, Copy, Debug)]
struct PlotRect {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl PlotRect {
    fn for_config(config: &RenderConfig, width: u32, height: u32) -> Self {
        let g = config.grid;
        let mut left = g.left.max(0.0);
        let mut top = g.top.max(0.0);
        let mut bottom = g.bottom.max(0.0);
        if g.contain_label && config.y_axis.show_labels {
            left += Y_LABEL_BAND_PX;
        }
        if g.contain_label && config.x_axis.show_labels {
            bottom += X_LABEL_BAND_PX;
        }
        if config.title.is_some() {
            top += TITLE_BAND_PX;
        }
        Self {
            left,
            top,
            right: f64::from(width) - g.right.max(0.0),
            bottom: f64::from(height) - bottom,
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn is_degenerate(&self) -> bool {
        self.right - self.left < 1.0 || self.bottom - self.top < 1.0
    }
}

#[derive(Clone, Copy, Debug)]
struct ValueMap {
    min: f64,
    max: f64,
    top: f64,
    bottom: f64,
}

impl ValueMap {
    fn new(min: f64, max: f64, plot: &PlotRect) -> Self {
        let max = if max > min { max } else { min + 1.0 };
        Self {
            min,
            max,
            top: plot.top,
            bottom: plot.bottom,
        }
    }

    fn to_px(&self, v: f64) -> f64 {
        let t = (v - self.min) / (self.max - self.min);
        self.bottom - t.clamp(0.0, 1.0) * (self.bottom - self.top)
    }
}

#[derive(Clone, Copy, Debug)]
struct TimeMap {
    min: f64,
    max: f64,
    left: f64,
    right: f64,
}

impl TimeMap {
    fn to_px(&self, t: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return (self.left + self.right) / 2.0;
        }
        self.left + (t - self.min) / span * (self.right - self.left)
    }
}

#[derive(Debug)]
struct SceneSeries {
    family: ChartFamily,
    stack: Option<String>,
    color: [u8; 4],
    values: Vec<Option<f64>>,
}

/// Config data resolved into numbers and straight RGBA colors.
#[derive(Debug)]
struct Scene {
    background: [u8; 4],
    grid_line: [u8; 4],
    xs: Vec<Option<f64>>,
    series: Vec<SceneSeries>,
}

impl Scene {
    fn build(config: &RenderConfig, theme: &Theme) -> PlotshotResult<Self> {
        let Some(dataset) = &config.dataset else {
            return Err(PlotshotError::render("config has no dataset"));
        };
        let Some(header) = dataset.header() else {
            return Err(PlotshotError::render("dataset has no header row"));
        };
        let rows = dataset.rows();
        if rows.is_empty() {
            return Err(PlotshotError::render("dataset has no rows to draw"));
        }

        let background = config
            .background_color
            .as_ref()
            .unwrap_or(&theme.background)
            .to_rgba8()?;
        let grid_line = theme.grid_line.to_rgba8()?;

        let xs = rows
            .iter()
            .map(|r| r.first().and_then(cell_f64))
            .collect();

        let mut series = Vec::with_capacity(config.series.len());
        for (i, s) in config.series.iter().enumerate() {
            let col = s.encode.y;
            if col == 0 || col >= header.len() {
                return Err(PlotshotError::render(format!(
                    "series {i} encodes column {col}, dataset has {} column(s)",
                    header.len()
                )));
            }
            let palette = theme.palette.colors();
            let color = match &s.item_style.color {
                Some(c) => c,
                None => &palette[i % palette.len()],
            };
            series.push(SceneSeries {
                family: s.family,
                stack: s.stack.clone(),
                color: color.to_rgba8()?,
                values: rows.iter().map(|r| r.get(col).and_then(cell_f64)).collect(),
            });
        }

        Ok(Self {
            background,
            grid_line,
            xs,
            series,
        })
    }

    /// Bar series grouped side by side; members of one group stack.
    fn bar_groups(&self) -> Vec<Vec<usize>> {
        let mut by_stack: BTreeMap<&str, usize> = BTreeMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (i, s) in self.series.iter().enumerate() {
            if s.family != ChartFamily::Bar {
                continue;
            }
            match &s.stack {
                Some(key) => {
                    let gi = *by_stack.entry(key.as_str()).or_insert_with(|| {
                        groups.push(Vec::new());
                        groups.len() - 1
                    });
                    groups[gi].push(i);
                }
                None => groups.push(vec![i]),
            }
        }
        groups
    }

    fn y_max(&self, config: &RenderConfig) -> f64 {
        if let Some(max) = config.y_axis.max {
            return max;
        }
        let groups = self.bar_groups();
        let mut max = config.y_axis.min;
        for row in 0..self.xs.len() {
            for members in &groups {
                let sum: f64 = members
                    .iter()
                    .filter_map(|&si| self.series[si].values.get(row).copied().flatten())
                    .sum();
                max = max.max(sum);
            }
            for s in self.series.iter().filter(|s| s.family == ChartFamily::Line) {
                if let Some(v) = s.values.get(row).copied().flatten() {
                    max = max.max(v);
                }
            }
        }
        max
    }

    fn x_map(&self, config: &RenderConfig, plot: &PlotRect) -> TimeMap {
        let data_min = self.xs.iter().flatten().copied().reduce(f64::min);
        let data_max = self.xs.iter().flatten().copied().reduce(f64::max);
        let min = config.x_axis.min.or(data_min).unwrap_or(0.0);
        let max = config.x_axis.max.or(data_max).unwrap_or(min);

        // Keep bars at the edges inside the plot: inset by half a slot.
        let inset = if self.bar_groups().is_empty() || self.xs.is_empty() {
            0.0
        } else {
            plot.width() / self.xs.len() as f64 / 2.0
        };
        TimeMap {
            min,
            max,
            left: plot.left + inset,
            right: plot.right - inset,
        }
    }
}

fn surface_size(width: u32, height: u32) -> PlotshotResult<(u16, u16)> {
    let to_u16 = |v: u32, what: &str| -> PlotshotResult<u16> {
        match u16::try_from(v) {
            Ok(0) | Err(_) => Err(PlotshotError::render(format!(
                "{what} must be in 1..={}, got {v}",
                u16::MAX
            ))),
            Ok(v) => Ok(v),
        }
    };
    Ok((to_u16(width, "width")?, to_u16(height, "height")?))
}

fn cell_f64(v: &Value) -> Option<f64> {
    let parsed: Option<f64> = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn set_color(ctx: &mut vello_cpu::RenderContext, rgba: [u8; 4]) {
    let [r, g, b, a] = rgba;
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
}

/// Quad of half-width `half` around the segment `a -> b`; `None` for zero-length segments.
fn segment_quad(a: (f64, f64), b: (f64, f64), half: f64) -> Option<vello_cpu::kurbo::BezPath> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f64::EPSILON {
        return None;
    }
    // Unit normal scaled to half the stroke width.
    let (nx, ny) = (-dy / len * half, dx / len * half);

    let mut p = vello_cpu::kurbo::BezPath::new();
    p.move_to(vello_cpu::kurbo::Point::new(a.0 + nx, a.1 + ny));
    p.line_to(vello_cpu::kurbo::Point::new(b.0 + nx, b.1 + ny));
    p.line_to(vello_cpu::kurbo::Point::new(b.0 - nx, b.1 - ny));
    p.line_to(vello_cpu::kurbo::Point::new(a.0 - nx, a.1 - ny));
    p.close_path();
    Some(p)
}

fn unpremultiply(px: &mut [u8]) {
    for p in px.chunks_exact_mut(4) {
        let a = u16::from(p[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut p[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn encode_png(premul: &[u8], width: u32, height: u32) -> PlotshotResult<Vec<u8>> {
    let mut straight = premul.to_vec();
    unpremultiply(&mut straight);
    let img = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| PlotshotError::render("pixel buffer does not match surface size"))?;
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| PlotshotError::render(format!("png encode failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
