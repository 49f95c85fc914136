use super::aggregate::{
    age_histogram, correlation_matrix, survival_by_class, survival_by_family_size,
    survival_by_sex,
};
use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result, ResultExt};
use crate::schema::CORRELATION_FIELDS;
use crate::types::{AgeHistogram, CorrelationMatrix, GroupRate};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::error::Error as StdError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

type DrawResult = std::result::Result<(), Box<dyn StdError + Send + Sync>>;

const BAR_SIZE: (u32, u32) = (800, 600);
const WIDE_SIZE: (u32, u32) = (1000, 600);
const HEATMAP_SIZE: (u32, u32) = (1000, 800);

/// The fixed set of summary charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Chart {
    CorrelationHeatmap,
    ClassSurvivalRate,
    AgeDistribution,
    FamilySizeImpact,
    GenderSurvivalRate,
}

impl Chart {
    pub const ALL: [Chart; 5] = [
        Chart::CorrelationHeatmap,
        Chart::ClassSurvivalRate,
        Chart::AgeDistribution,
        Chart::FamilySizeImpact,
        Chart::GenderSurvivalRate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CorrelationHeatmap => "correlation_heatmap",
            Self::ClassSurvivalRate => "class_survival_rate",
            Self::AgeDistribution => "age_distribution",
            Self::FamilySizeImpact => "family_size_impact",
            Self::GenderSurvivalRate => "gender_survival_rate",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.svg", self.name())
    }

    fn title(&self) -> &'static str {
        match self {
            Self::CorrelationHeatmap => "Correlation Heatmap of Survival Factors",
            Self::ClassSurvivalRate => "Survival Rate by Class",
            Self::AgeDistribution => "Age Distribution by Survival",
            Self::FamilySizeImpact => "Survival Rate by Family Size",
            Self::GenderSurvivalRate => "Survival Rate by Gender",
        }
    }
}

/// A chart that could not be produced.
#[derive(Debug, Clone, Serialize)]
pub struct ChartFailure {
    pub chart: Chart,
    pub message: String,
    /// Messages of the underlying causes, outermost first.
    pub causes: Vec<String>,
}

/// Result of rendering every chart.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderReport {
    pub rendered: Vec<PathBuf>,
    pub failures: Vec<ChartFailure>,
}

impl RenderReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Draws the summary charts as SVG files.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    histogram_bins: usize,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(PipelineConfig::default().histogram_bins)
    }
}

impl ChartRenderer {
    pub fn new(histogram_bins: usize) -> Self {
        Self { histogram_bins }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.histogram_bins)
    }

    /// Render every chart into `dir`, creating it if needed.
    ///
    /// A failing chart is recorded in the report and does not stop the
    /// others. When `dir` cannot be created every chart is recorded as failed.
    pub fn render_all(&self, df: &DataFrame, dir: impl AsRef<Path>) -> RenderReport {
        let dir = dir.as_ref();
        let mut report = RenderReport::default();

        if let Err(e) = fs::create_dir_all(dir) {
            error!("Cannot create chart directory {}: {}", dir.display(), e);
            for chart in Chart::ALL {
                let cause = io::Error::new(
                    e.kind(),
                    format!("creating directory {}: {}", dir.display(), e),
                );
                report.record_failure(chart, ProcessingError::render(chart.name(), cause));
            }
            return report;
        }

        for chart in Chart::ALL {
            match self.render(chart, df, dir) {
                Ok(path) => {
                    info!("Saved {}", path.display());
                    report.rendered.push(path);
                }
                Err(e) => {
                    error!("Chart {} failed: {}", chart.name(), e);
                    report.record_failure(chart, e);
                }
            }
        }
        report
    }

    /// Render one chart into `dir`.
    ///
    /// Aggregation and drawing failures both come back as
    /// [`ProcessingError::Render`] with the underlying error as its source.
    pub fn render(&self, chart: Chart, df: &DataFrame, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(chart.file_name());
        self.draw(chart, df, &path)
            .map_err(|e| ProcessingError::render(chart.name(), e))?;
        Ok(path)
    }

    fn draw(&self, chart: Chart, df: &DataFrame, path: &Path) -> DrawResult {
        match chart {
            Chart::CorrelationHeatmap => {
                let matrix = correlation_matrix(df, &CORRELATION_FIELDS)
                    .context("correlating survival factors")?;
                draw_heatmap(path, chart.title(), &matrix)
            }
            Chart::ClassSurvivalRate => {
                let groups = survival_by_class(df).context("summarizing survival by class")?;
                draw_rate_bars(path, chart.title(), "Class", &groups, RGBColor(68, 1, 84))
            }
            Chart::AgeDistribution => {
                let hist = age_histogram(df, self.histogram_bins).context("binning ages")?;
                draw_stacked_histogram(path, chart.title(), &hist)
            }
            Chart::FamilySizeImpact => {
                let groups = survival_by_family_size(df)
                    .context("summarizing survival by family size")?;
                draw_rate_bars(path, chart.title(), "Family Size", &groups, RGBColor(49, 104, 142))
            }
            Chart::GenderSurvivalRate => {
                let groups = survival_by_sex(df).context("summarizing survival by gender")?;
                draw_rate_bars(path, chart.title(), "Gender", &groups, RGBColor(240, 128, 128))
            }
        }
    }
}

impl RenderReport {
    fn record_failure(&mut self, chart: Chart, err: ProcessingError) {
        self.failures.push(ChartFailure {
            chart,
            message: err.to_string(),
            causes: causes(&err),
        });
    }
}

fn causes(err: &ProcessingError) -> Vec<String> {
    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes
}

fn draw_rate_bars(
    path: &Path,
    title: &str,
    x_desc: &str,
    groups: &[GroupRate],
    color: RGBColor,
) -> DrawResult {
    if groups.is_empty() {
        return Err("no groups to plot".into());
    }

    let root = SVGBackend::new(path, BAR_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0usize..groups.len()).into_segmented(), 0f64..1f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Survival Rate")
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => groups
                .get(*i)
                .map(|g| g.label.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(color.filled())
            .margin(10)
            .data(
                groups
                    .iter()
                    .enumerate()
                    .filter_map(|(i, g)| g.rate.map(|rate| (i, rate))),
            ),
    )?;

    root.present()?;
    Ok(())
}

fn draw_stacked_histogram(path: &Path, title: &str, hist: &AgeHistogram) -> DrawResult {
    let (Some(&lo), Some(&hi)) = (hist.edges.first(), hist.edges.last()) else {
        return Err("histogram has no bins".into());
    };
    let tallest = hist
        .perished
        .iter()
        .zip(&hist.survived)
        .map(|(p, s)| p + s)
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let root = SVGBackend::new(path, WIDE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..tallest * 1.1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Age")
        .y_desc("Count")
        .draw()?;

    let perished_color = RGBColor(31, 119, 180);
    let survived_color = RGBColor(255, 127, 14);

    chart
        .draw_series(hist.edges.windows(2).zip(&hist.perished).map(|(edge, &count)| {
            Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], perished_color.filled())
        }))?
        .label("No")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], perished_color.filled()));

    chart
        .draw_series(
            hist.edges
                .windows(2)
                .zip(hist.perished.iter().zip(&hist.survived))
                .map(|(edge, (&below, &count))| {
                    Rectangle::new(
                        [(edge[0], below as f64), (edge[1], (below + count) as f64)],
                        survived_color.filled(),
                    )
                }),
        )?
        .label("Yes")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], survived_color.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_heatmap(path: &Path, title: &str, matrix: &CorrelationMatrix) -> DrawResult {
    let n = matrix.labels.len();
    if n == 0 {
        return Err("no fields to correlate".into());
    }

    let root = SVGBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d((0usize..n).into_segmented(), (0usize..n).into_segmented())?;

    let label_of = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            matrix.labels.get(*i).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };
    chart
        .configure_mesh()
        .disable_mesh()
        .x_label_formatter(&label_of)
        .y_label_formatter(&label_of)
        .draw()?;

    let cells = (0..n).flat_map(|row| (0..n).map(move |col| (row, col)));

    chart.draw_series(cells.clone().map(|(row, col)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(col), SegmentValue::Exact(row)),
                (SegmentValue::Exact(col + 1), SegmentValue::Exact(row + 1)),
            ],
            diverging_color(matrix.values[row][col]).filled(),
        )
    }))?;

    let annotation = TextStyle::from(("sans-serif", 16).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(cells.map(|(row, col)| {
        let value = matrix.values[row][col];
        let text = if value.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:.2}", value)
        };
        Text::new(
            text,
            (SegmentValue::CenterOf(col), SegmentValue::CenterOf(row)),
            annotation.clone(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Blue for -1, white for 0, red for +1; grey when undefined.
fn diverging_color(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(200, 200, 200);
    }
    let t = value.clamp(-1.0, 1.0);
    let (end, weight) = if t < 0.0 {
        ((59.0, 76.0, 192.0), -t)
    } else {
        ((180.0, 4.0, 38.0), t)
    };
    let blend = |c: f64| (255.0 + (c - 255.0) * weight).round() as u8;
    RGBColor(blend(end.0), blend(end.1), blend(end.2))
}
