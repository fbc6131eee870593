use std::fmt::Write;

use rrt_parser::{Edge, Point, Segments};

use crate::obstacle::Obstacle;

/// Presentation settings of the rendered figure.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub grid: bool,
    /// Canvas size in pixels
    pub width: u32,
    pub height: u32,
    pub graph_color: String,
    pub path_color: String,
    pub obstacle_color: String,
    pub line_width: f64,
    /// Radius of the endpoint markers of graph and path edges, `0` disables them.
    pub marker_radius: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            title: "RRT Graph & Solution".into(),
            x_label: "X-axis".into(),
            y_label: "Y-axis".into(),
            grid: true,
            width: 1000,
            height: 800,
            graph_color: "blue".into(),
            path_color: "red".into(),
            obstacle_color: "black".into(),
            line_width: 1.0,
            marker_radius: 0.5,
        }
    }
}

/// An abstraction over anything that can be drawn as a set of styled line segments.
///
/// See [SvgWriter]
pub trait VisualLayer {
    fn name(&self) -> &str;

    fn segments(&self) -> Box<dyn Iterator<Item = Edge> + '_>;

    fn stroke(&self) -> &str;

    fn marker_radius(&self) -> f64 {
        0.0
    }
}

pub struct SegmentLayer<'a> {
    pub name: &'a str,
    pub segments: &'a Segments,
    pub color: &'a str,
    pub marker_radius: f64,
}

impl<'a> SegmentLayer<'a> {
    pub fn graph(segments: &'a Segments, style: &'a PlotStyle) -> Self {
        Self {
            name: "graph",
            segments,
            color: &style.graph_color,
            marker_radius: style.marker_radius,
        }
    }

    pub fn path(segments: &'a Segments, style: &'a PlotStyle) -> Self {
        Self {
            name: "path",
            segments,
            color: &style.path_color,
            marker_radius: style.marker_radius,
        }
    }
}

impl VisualLayer for SegmentLayer<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn segments(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        Box::new(self.segments.iter())
    }

    fn stroke(&self) -> &str {
        self.color
    }

    fn marker_radius(&self) -> f64 {
        self.marker_radius
    }
}

pub struct ObstacleLayer<'a> {
    pub obstacles: &'a [Obstacle],
    pub color: &'a str,
}

impl<'a> ObstacleLayer<'a> {
    pub fn new(obstacles: &'a [Obstacle], style: &'a PlotStyle) -> Self {
        Self {
            obstacles,
            color: &style.obstacle_color,
        }
    }
}

impl VisualLayer for ObstacleLayer<'_> {
    fn name(&self) -> &str {
        "obstacles"
    }

    fn segments(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        Box::new(self.obstacles.iter().flat_map(|obs| obs.outline_edges()))
    }

    fn stroke(&self) -> &str {
        self.color
    }
}

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
/// Fraction of the data range added on every side
const DATA_PADDING: f64 = 0.05;
const TARGET_TICKS: f64 = 10.0;

/// Maps data coordinates onto the canvas with a single scale for both axes.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    view_min: Point,
    view_max: Point,
    scale: f64,
    plot_left: f64,
    plot_bottom: f64,
}

impl Viewport {
    fn fit(data_min: Point, data_max: Point, style: &PlotStyle) -> Self {
        let plot_w = (style.width as f64 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let plot_h = (style.height as f64 - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);

        let range_x = nonzero(data_max.x - data_min.x) * (1.0 + 2.0 * DATA_PADDING);
        let range_y = nonzero(data_max.y - data_min.y) * (1.0 + 2.0 * DATA_PADDING);
        let scale = (plot_w / range_x).min(plot_h / range_y);

        let center = (data_min + data_max) * 0.5;
        let half_view = Point::new(plot_w / scale, plot_h / scale) * 0.5;

        Self {
            view_min: center - half_view,
            view_max: center + half_view,
            scale,
            plot_left: MARGIN_LEFT,
            plot_bottom: MARGIN_TOP + plot_h,
        }
    }

    #[inline]
    fn x(&self, x: f64) -> f64 {
        self.plot_left + (x - self.view_min.x) * self.scale
    }

    #[inline]
    fn y(&self, y: f64) -> f64 {
        self.plot_bottom - (y - self.view_min.y) * self.scale
    }
}

pub struct SvgWriter;

impl SvgWriter {
    /// Render all `layers`, in order, into a single SVG document.
    pub fn write_svg(layers: &[&dyn VisualLayer], style: &PlotStyle) -> eyre::Result<String> {
        let (data_min, data_max) = data_bounds(layers);
        let view = Viewport::fit(data_min, data_max, style);
        let (width, height) = (style.width as f64, style.height as f64);

        let mut output = String::new();
        writeln!(
            &mut output,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = style.width,
            h = style.height
        )?;
        writeln!(&mut output, r#"<rect width="100%" height="100%" fill="white"/>"#)?;

        if style.grid {
            Self::write_grid(&mut output, &view)?;
        }

        writeln!(
            &mut output,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="black"/>"#,
            MARGIN_LEFT,
            MARGIN_TOP,
            width - MARGIN_LEFT - MARGIN_RIGHT,
            height - MARGIN_TOP - MARGIN_BOTTOM
        )?;

        for layer in layers {
            Self::write_layer(&mut output, *layer, &view, style.line_width)?;
        }

        // Labels
        writeln!(
            &mut output,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="sans-serif" font-size="18">{}</text>"#,
            width / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            escape(&style.title)
        )?;
        writeln!(
            &mut output,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="sans-serif" font-size="14">{}</text>"#,
            MARGIN_LEFT + (width - MARGIN_LEFT - MARGIN_RIGHT) / 2.0,
            height - 15.0,
            escape(&style.x_label)
        )?;
        let y_mid = MARGIN_TOP + (height - MARGIN_TOP - MARGIN_BOTTOM) / 2.0;
        writeln!(
            &mut output,
            r#"<text x="20" y="{y_mid:.2}" text-anchor="middle" font-family="sans-serif" font-size="14" transform="rotate(-90 20 {y_mid:.2})">{}</text>"#,
            escape(&style.y_label)
        )?;

        write!(&mut output, "</svg>")?;

        Ok(output)
    }

    fn write_layer(output: &mut String, layer: &dyn VisualLayer, view: &Viewport, line_width: f64) -> std::fmt::Result {
        writeln!(
            output,
            r#"<g id="{}" stroke="{}" stroke-width="{}" fill="{}">"#,
            escape(layer.name()),
            escape(layer.stroke()),
            line_width,
            escape(layer.stroke())
        )?;

        let radius = layer.marker_radius();
        for edge in layer.segments() {
            let (x1, y1) = (view.x(edge.head.x), view.y(edge.head.y));
            let (x2, y2) = (view.x(edge.tail.x), view.y(edge.tail.y));
            writeln!(output, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}"/>"#)?;

            if radius > 0.0 {
                writeln!(output, r#"<circle cx="{x1:.2}" cy="{y1:.2}" r="{radius}"/>"#)?;
                writeln!(output, r#"<circle cx="{x2:.2}" cy="{y2:.2}" r="{radius}"/>"#)?;
            }
        }

        writeln!(output, "</g>")
    }

    fn write_grid(output: &mut String, view: &Viewport) -> std::fmt::Result {
        let span = (view.view_max.x - view.view_min.x).max(view.view_max.y - view.view_min.y);
        let step = nice_step(span / TARGET_TICKS);
        let decimals = if step >= 1.0 { 0 } else { (-step.log10()).ceil() as usize };

        let (left, right) = (view.x(view.view_min.x), view.x(view.view_max.x));
        let (bottom, top) = (view.y(view.view_min.y), view.y(view.view_max.y));

        let mut grid_path = String::new();
        let mut labels = String::new();

        for tick in ticks(view.view_min.x, view.view_max.x, step) {
            let x = view.x(tick);
            write!(&mut grid_path, "M{x:.2} {top:.2}V{bottom:.2}")?;
            writeln!(
                &mut labels,
                r#"<text x="{x:.2}" y="{:.2}" text-anchor="middle">{:.*}</text>"#,
                bottom + 16.0,
                decimals,
                tick + 0.0
            )?;
        }
        for tick in ticks(view.view_min.y, view.view_max.y, step) {
            let y = view.y(tick);
            write!(&mut grid_path, "M{left:.2} {y:.2}H{right:.2}")?;
            writeln!(
                &mut labels,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="end">{:.*}</text>"#,
                left - 6.0,
                y + 4.0,
                decimals,
                tick + 0.0
            )?;
        }

        writeln!(output, r##"<path id="grid" d="{grid_path}" stroke="#dddddd" stroke-width="1" fill="none"/>"##)?;
        writeln!(output, r#"<g font-family="sans-serif" font-size="11" fill="black">"#)?;
        output.push_str(&labels);
        writeln!(output, "</g>")
    }
}

/// The bounding box of every point in `layers`, a unit box if there are none.
fn data_bounds(layers: &[&dyn VisualLayer]) -> (Point, Point) {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);

    for edge in layers.iter().flat_map(|layer| layer.segments()) {
        for p in [edge.head, edge.tail] {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
    }

    if min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite() {
        (min, max)
    } else {
        (Point::new(0.0, 0.0), Point::new(1.0, 1.0))
    }
}

fn nonzero(range: f64) -> f64 {
    if range > f64::EPSILON {
        range
    } else {
        1.0
    }
}

/// Round `raw` to a 1, 2 or 5 multiple of a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn ticks(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> {
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(move |i| i as f64 * step)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
