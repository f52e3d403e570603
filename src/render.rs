// src/render.rs - chart rendering collaborator

use std::path::{Path, PathBuf};

use charming::component::{Axis, Legend, Title};
use charming::element::AxisType;
use charming::series::Line;
use charming::{Chart, HtmlRenderer};

use crate::error::RenderError;

const CHART_WIDTH: u64 = 1000;
const CHART_HEIGHT: u64 = 700;

/// One labeled line on a chart: index-aligned x/y samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    pub label: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Curve {
    pub fn new(label: impl Into<String>, xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Curve {
            label: label.into(),
            xs,
            ys,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty() || self.ys.is_empty()
    }

    /// Samples as `[x, y]` pairs, the layout charming expects for value axes.
    pub fn points(&self) -> Vec<Vec<f64>> {
        self.xs
            .iter()
            .zip(self.ys.iter())
            .map(|(&x, &y)| vec![x, y])
            .collect()
    }
}

/// Fixed text of a chart: title and axis labels. The legend is shown only
/// for charts with more than one curve (single-connection files get none).
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
}

/// The cwnd-over-time chart every log file produces.
pub const CWND_CHART: ChartSpec = ChartSpec {
    title: "Congestion Window Size Over Time",
    x_label: "Time (s)",
    y_label: "Congestion Window Size (packets)",
};

/// Something that can turn a set of curves into a persisted chart.
///
/// Rendering must fail when no curve carries any point; callers rely on
/// that to flag files that produced no plottable data.
pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec, curves: &[Curve], name: &str) -> Result<(), RenderError>;
}

/// Production renderer backed by charming, persisting one HTML chart per
/// call as `<out_dir>/<name>.html`.
pub struct CharmingRenderer {
    out_dir: PathBuf,
}

impl CharmingRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        CharmingRenderer {
            out_dir: out_dir.into(),
        }
    }

    pub fn chart_path(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{}.html", name))
    }
}

impl ChartRenderer for CharmingRenderer {
    fn render(&self, spec: &ChartSpec, curves: &[Curve], name: &str) -> Result<(), RenderError> {
        if curves.iter().all(|c| c.is_empty()) {
            return Err(RenderError::EmptyChart {
                chart: name.to_string(),
            });
        }

        let mut chart = Chart::new()
            .title(Title::new().text(spec.title))
            .x_axis(Axis::new().type_(AxisType::Value).name(spec.x_label))
            .y_axis(Axis::new().type_(AxisType::Value).name(spec.y_label));

        if curves.len() > 1 {
            chart = chart.legend(Legend::new().show(true).top("bottom"));
        }

        for curve in curves {
            chart = chart.series(
                Line::new()
                    .name(curve.label.as_str())
                    .data(curve.points())
                    .show_symbol(false),
            );
        }

        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.chart_path(name);
        save_chart(&chart, name, &path)
    }
}

fn save_chart(chart: &Chart, name: &str, path: &Path) -> Result<(), RenderError> {
    let mut renderer = HtmlRenderer::new(name, CHART_WIDTH, CHART_HEIGHT);
    renderer.save(chart, path).map_err(|e| RenderError::Save {
        chart: name.to_string(),
        message: e.to_string(),
    })
}
