use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::drivers::capture::Waveform;
use crate::drivers::error::ScopeError;
use crate::drivers::registry::FigureRegistry;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub palette: Vec<RGBColor>,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(10, 10, 10),
            palette: vec![BLUE, RED, GREEN, CYAN, MAGENTA, YELLOW, WHITE],
        }
    }
}
impl PlotStyle {
    fn color(&self, idx: usize) -> RGBColor {
        if self.palette.is_empty() {
            WHITE
        } else {
            self.palette[idx % self.palette.len()]
        }
    }
}
/// Optional decorations for one `scope_plot` call. Labels and title stick to
/// the figure; later calls overwrite them only when they set a value.
#[derive(Clone, Debug, Default)]
pub struct PlotOptions {
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub label: Option<String>,
    pub title: Option<String>,
}
#[derive(Clone, Debug)]
struct Series {
    label: Option<String>,
    points: Vec<(f64, f64)>,
}
/// Series overlaid on one figure id.
#[derive(Clone, Debug, Default)]
pub struct Figure {
    title: Option<String>,
    x_label: Option<String>,
    y_label: Option<String>,
    series: Vec<Series>,
    grid: bool,
}
impl Figure {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    pub fn series_count(&self) -> usize {
        self.series.len()
    }
    pub fn has_grid(&self) -> bool {
        self.grid
    }
    fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut points = self.series.iter().flat_map(|s| s.points.iter().copied());
        let (x0, y0) = points.next()?;
        Some(points.fold(((x0, x0), (y0, y0)), |((xl, xh), (yl, yh)), (x, y)| {
            ((xl.min(x), xh.max(x)), (yl.min(y), yh.max(y)))
        }))
    }
}
/// Plotting session: figures plus the registry that tracks their grids.
#[derive(Debug, Default)]
pub struct ScopePlotter {
    registry: FigureRegistry,
    figures: BTreeMap<u32, Figure>,
}
impl ScopePlotter {
    pub fn new() -> Self {
        Self::default()
    }
    /// Adds `y` over `x` to a figure. Returns true when this call turned the
    /// figure's grid on, which happens once per figure.
    pub fn scope_plot(
        &mut self,
        x: &[f64],
        y: &[f64],
        figure_id: u32,
        options: &PlotOptions,
    ) -> Result<bool, ScopeError> {
        if x.len() != y.len() {
            return Err(ScopeError::Plot(format!(
                "x has {} points but y has {}",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(ScopeError::Plot("series has no samples".into()));
        }
        let figure = self.figures.entry(figure_id).or_default();
        figure.series.push(Series {
            label: options.label.clone(),
            points: x.iter().copied().zip(y.iter().copied()).collect(),
        });
        if options.title.is_some() {
            figure.title = options.title.clone();
        }
        if options.x_label.is_some() {
            figure.x_label = options.x_label.clone();
        }
        if options.y_label.is_some() {
            figure.y_label = options.y_label.clone();
        }
        if self.registry.check_active_grid(figure_id) {
            return Ok(false);
        }
        figure.grid = true;
        self.registry.activate_grid(figure_id);
        log::debug!("plot: grid enabled on figure {figure_id}");
        Ok(true)
    }
    pub fn plot_waveform(
        &mut self,
        waveform: &Waveform,
        figure_id: u32,
        options: &PlotOptions,
    ) -> Result<bool, ScopeError> {
        self.scope_plot(&waveform.time, &waveform.voltage, figure_id, options)
    }
    pub fn figure(&self, figure_id: u32) -> Option<&Figure> {
        self.figures.get(&figure_id)
    }
    pub fn figure_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.figures.keys().copied()
    }
    pub fn render_png(&self, figure_id: u32, style: &PlotStyle) -> Result<Vec<u8>, ScopeError> {
        let figure = self
            .figures
            .get(&figure_id)
            .ok_or(ScopeError::UnknownFigure(figure_id))?;
        let ((x_min, x_max), (y_min, y_max)) = figure
            .bounds()
            .ok_or_else(|| ScopeError::Plot(format!("figure {figure_id} has no samples")))?;
        let x_range = if x_max > x_min {
            x_min..x_max
        } else {
            x_min..x_min + 1.0
        };
        let y_range = if y_max > y_min {
            let pad = (y_max - y_min) * 0.05;
            (y_min - pad)..(y_max + pad)
        } else {
            (y_min - 1.0)..(y_max + 1.0)
        };
        let len = (style.width as usize)
            .checked_mul(style.height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| {
                ScopeError::Plot(format!("{}x{} image is too large", style.width, style.height))
            })?;
        let mut buffer = vec![0u8; len];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
                .into_drawing_area();
            root.fill(&style.background)?;
            let mut builder = ChartBuilder::on(&root);
            builder
                .margin(10)
                .set_label_area_size(LabelAreaPosition::Left, 60)
                .set_label_area_size(LabelAreaPosition::Bottom, 40);
            if let Some(title) = &figure.title {
                builder.caption(title, ("sans-serif", 20).into_font().color(&WHITE));
            }
            let mut chart = builder.build_cartesian_2d(x_range, y_range)?;
            let mut mesh = chart.configure_mesh();
            mesh.light_line_style(&WHITE.mix(0.1))
                .bold_line_style(&WHITE.mix(0.2))
                .axis_style(&WHITE.mix(0.6))
                .label_style(("sans-serif", 12).into_font().color(&WHITE));
            if let Some(x_label) = &figure.x_label {
                mesh.x_desc(x_label.as_str());
            }
            if let Some(y_label) = &figure.y_label {
                mesh.y_desc(y_label.as_str());
            }
            if !figure.grid {
                mesh.disable_mesh();
            }
            mesh.draw()?;
            for (idx, series) in figure.series.iter().enumerate() {
                let color = style.color(idx);
                let drawn =
                    chart.draw_series(LineSeries::new(series.points.iter().copied(), &color))?;
                if let Some(label) = &series.label {
                    drawn
                        .label(label.as_str())
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
                }
            }
            if figure.series.iter().any(|s| s.label.is_some()) {
                chart
                    .configure_series_labels()
                    .label_font(("sans-serif", 12).into_font().color(&WHITE))
                    .border_style(&WHITE.mix(0.2))
                    .background_style(&style.background)
                    .draw()?;
            }
            root.present()?;
        }
        encode_png(&buffer, style.width, style.height)
    }
    pub fn save_png(
        &self,
        figure_id: u32,
        style: &PlotStyle,
        path: impl AsRef<Path>,
    ) -> Result<(), ScopeError> {
        let png = self.render_png(figure_id, style)?;
        std::fs::write(path.as_ref(), png)?;
        log::info!("plot: figure {figure_id} written to {}", path.as_ref().display());
        Ok(())
    }
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScopeError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ScopeError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    fn ramp(n: usize) -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..n).map(|i| i as f64 * 1e-6).collect();
        let y: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
        (x, y)
    }
    #[test]
    fn grid_is_drawn_once_per_figure() {
        let mut plotter = ScopePlotter::new();
        let (x, y) = ramp(16);
        let opts = PlotOptions::default();
        assert!(plotter.scope_plot(&x, &y, 1, &opts).unwrap());
        assert!(!plotter.scope_plot(&x, &y, 1, &opts).unwrap());
        assert!(plotter.scope_plot(&x, &y, 2, &opts).unwrap());
        let figure = plotter.figure(1).unwrap();
        assert!(figure.has_grid());
        assert_eq!(figure.series_count(), 2);
        assert_eq!(plotter.figure_ids().collect::<Vec<_>>(), vec![1, 2]);
    }
    #[test]
    fn separate_sessions_keep_separate_grids() {
        let (x, y) = ramp(4);
        let mut first = ScopePlotter::new();
        let mut second = ScopePlotter::new();
        assert!(first.scope_plot(&x, &y, 7, &PlotOptions::default()).unwrap());
        assert!(second.scope_plot(&x, &y, 7, &PlotOptions::default()).unwrap());
    }
    #[test]
    fn options_stick_unless_overridden() {
        let mut plotter = ScopePlotter::new();
        let (x, y) = ramp(4);
        let titled = PlotOptions {
            title: Some("CH1".into()),
            x_label: Some("Time (s)".into()),
            ..Default::default()
        };
        plotter.scope_plot(&x, &y, 0, &titled).unwrap();
        plotter.scope_plot(&x, &y, 0, &PlotOptions::default()).unwrap();
        let figure = plotter.figure(0).unwrap();
        assert_eq!(figure.title(), Some("CH1"));
        assert_eq!(figure.x_label.as_deref(), Some("Time (s)"));
        assert_eq!(figure.bounds(), Some(((0.0, x[3]), (0.0, 1.5))));
    }
    #[test]
    fn rejects_mismatched_or_empty_series() {
        let mut plotter = ScopePlotter::new();
        let opts = PlotOptions::default();
        assert!(matches!(
            plotter.scope_plot(&[0.0, 1.0], &[0.0], 0, &opts),
            Err(ScopeError::Plot(_))
        ));
        assert!(matches!(
            plotter.scope_plot(&[], &[], 0, &opts),
            Err(ScopeError::Plot(_))
        ));
        assert!(plotter.figure(0).is_none());
    }
    #[test]
    fn unknown_figure_cannot_render() {
        let plotter = ScopePlotter::new();
        assert!(matches!(
            plotter.render_png(3, &PlotStyle::default()),
            Err(ScopeError::UnknownFigure(3))
        ));
    }
    #[test]
    fn oversized_canvas_is_plot_error() {
        let mut plotter = ScopePlotter::new();
        let (x, y) = ramp(4);
        plotter.scope_plot(&x, &y, 0, &PlotOptions::default()).unwrap();
        let style = PlotStyle {
            width: u32::MAX,
            height: u32::MAX,
            ..PlotStyle::default()
        };
        assert!(matches!(
            plotter.render_png(0, &style),
            Err(ScopeError::Plot(_))
        ));
    }
    #[test]
    fn encodes_png_signature() {
        let png = encode_png(&[0u8; 4 * 2 * 3], 4, 2).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert!(encode_png(&[0u8; 3], 4, 2).is_err());
    }
}
