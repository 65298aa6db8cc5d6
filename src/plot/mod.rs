//! CDF plot rendering on top of `plotters`

pub mod fonts;

use crate::{
    error::{AppError, Result},
    models::{CdfPoint, Config},
    stats::step_points,
};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// X axis description
pub const X_AXIS_LABEL: &str = "Latency (ms)";
/// Y axis description
pub const Y_AXIS_LABEL: &str = "CDF";
/// Head room to the right of the largest latency
const X_AXIS_PADDING: f64 = 1.05;

/// Plot appearance options
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Chart caption
    pub title: String,
    /// Font for caption and axis labels; system fonts are searched when unset
    pub font_path: Option<PathBuf>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: crate::defaults::DEFAULT_WIDTH,
            height: crate::defaults::DEFAULT_HEIGHT,
            title: crate::defaults::DEFAULT_TITLE.to_string(),
            font_path: None,
        }
    }
}

impl From<&Config> for PlotOptions {
    fn from(config: &Config) -> Self {
        Self {
            width: config.width,
            height: config.height,
            title: config.title.clone(),
            font_path: config.font_path.clone(),
        }
    }
}

/// Result of a successful render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    /// Image that was written
    pub output_path: PathBuf,
    /// Font used for text, `None` when the chart was drawn without text
    pub font: Option<PathBuf>,
    /// Problem with the requested font, if any
    pub font_warning: Option<String>,
}

impl RenderOutcome {
    /// Whether caption and axis labels were drawn
    pub fn labels_drawn(&self) -> bool {
        self.font.is_some()
    }
}

/// Renders a CDF as a post-step line plot to a PNG file
pub struct PlotRenderer {
    options: PlotOptions,
}

impl PlotRenderer {
    /// Create a renderer with explicit options
    pub fn new(options: PlotOptions) -> Self {
        Self { options }
    }

    /// Create a renderer from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(PlotOptions::from(config))
    }

    /// X axis range: starts at 0, ends a little past the largest value
    pub fn x_range(cdf: &[CdfPoint]) -> (f64, f64) {
        let max = cdf
            .iter()
            .map(|p| p.latency_ms)
            .fold(0.0_f64, f64::max);

        if max > 0.0 {
            (0.0, max * X_AXIS_PADDING)
        } else {
            (0.0, 1.0)
        }
    }

    /// Render `cdf` to `output`
    pub fn render_cdf(&self, cdf: &[CdfPoint], output: &Path) -> Result<RenderOutcome> {
        if cdf.is_empty() {
            return Err(AppError::empty_result("nothing to plot"));
        }

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(AppError::io(format!(
                    "Output directory '{}' does not exist",
                    parent.display()
                )));
            }
        }

        let (font, font_warning) = self.prepare_font();
        self.draw(cdf, output, font.is_some())?;

        Ok(RenderOutcome {
            output_path: output.to_path_buf(),
            font,
            font_warning,
        })
    }

    /// Pick and register a font; a failure downgrades to a text-free chart
    fn prepare_font(&self) -> (Option<PathBuf>, Option<String>) {
        let mut warning = None;

        if let Some(requested) = &self.options.font_path {
            match fonts::register_chart_font(requested) {
                Ok(active) => return (Some(active.to_path_buf()), None),
                Err(e) => warning = Some(format!("{:#}", e)),
            }
        }

        if let Some(active) = fonts::registered_font() {
            return (Some(active.to_path_buf()), warning);
        }

        match fonts::discover_system_font() {
            Some(candidate) => match fonts::register_chart_font(&candidate) {
                Ok(active) => (Some(active.to_path_buf()), warning),
                Err(e) => (None, Some(format!("{:#}", e))),
            },
            None => (
                None,
                warning.or_else(|| {
                    Some("no system font found, drawing chart without text".to_string())
                }),
            ),
        }
    }

    fn draw(&self, cdf: &[CdfPoint], output: &Path, with_text: bool) -> Result<()> {
        let root = BitMapBackend::new(output, (self.options.width, self.options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let (x_min, x_max) = Self::x_range(cdf);

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if with_text {
            builder
                .caption(&self.options.title, (fonts::FONT_FAMILY, 24))
                .x_label_area_size(45)
                .y_label_area_size(60);
        }

        let mut chart = builder
            .build_cartesian_2d(x_min..x_max, 0.0..1.0)
            .map_err(render_error)?;

        let mut mesh = chart.configure_mesh();
        if with_text {
            mesh.x_desc(X_AXIS_LABEL)
                .y_desc(Y_AXIS_LABEL)
                .label_style((fonts::FONT_FAMILY, 14));
        } else {
            // tick labels need a font too
            mesh.disable_x_axis().disable_y_axis();
        }
        mesh.draw().map_err(render_error)?;

        chart
            .draw_series(LineSeries::new(step_points(cdf), BLUE.stroke_width(2)))
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

fn render_error<E: std::fmt::Display>(error: E) -> AppError {
    AppError::render(error.to_string())
}
