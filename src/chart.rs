use plotters::prelude::*;
use tracing::info;

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    series::Series,
};

/// Default folder for chart images.
pub const GRAPH_DIR: &str = "Graph reports";

const SIZE: (u32, u32) = (1024, 768);

const COLORS: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];

/// The two charts the tool can draw.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChartKind {
    /// Material quantity by category.
    Bar,
    /// Project participation by city.
    Pie,
}

impl ChartKind {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Bar => "Material Quantity by Category",
            Self::Pie => "Project Participation by City",
        }
    }

    /// Returns the image file name used for this chart.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Bar => "Material_Quantity_by_Category.png",
            Self::Pie => "Project_Participation_by_City.png",
        }
    }
}

/// Draws `series` as a chart of the given kind into `graph_dir`, creating
/// the folder if needed and replacing any earlier image. Returns the path
/// of the image.
///
/// # Errors
///
/// Returns [`Error::Io`] if the folder cannot be created, and
/// [`Error::Chart`] if drawing fails.
pub fn save(kind: ChartKind, series: &Series, graph_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(graph_dir).map_err(|source| Error::Io {
        path: graph_dir.to_path_buf(),
        source,
    })?;
    let path = graph_dir.join(kind.file_name());
    render(kind, series, &path)?;
    Ok(path)
}

/// Draws `series` as a PNG image at `path`.
///
/// # Errors
///
/// Returns [`Error::Chart`] if the drawing backend fails.
pub fn render(kind: ChartKind, series: &Series, path: &Path) -> Result<()> {
    let drawn = match kind {
        ChartKind::Bar => draw_bar(series, path),
        ChartKind::Pie => draw_pie(series, path),
    };
    drawn.map_err(|e| Error::Chart {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    info!("saved {} chart to {}", kind.title(), path.display());
    Ok(())
}

fn draw_bar(series: &Series, path: &Path) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let labels: Vec<&str> = series.labels().collect();
    let slots = labels.len().max(1) as u32;
    let y_max = bar_axis_max(series);
    let mut chart = ChartBuilder::on(&root)
        .caption(ChartKind::Bar.title(), ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(140)
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..slots).into_segmented(), 0u64..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Categories")
        .y_desc("Quantity")
        .x_labels(slots as usize)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(ToString::to_string)
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_label_style(
            ("sans-serif", 16)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .draw()?;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.filled())
            .margin(10)
            .data(series.iter().enumerate().map(|(i, (_, v))| (i as u32, v))),
    )?;
    root.present()?;
    Ok(())
}

fn draw_pie(series: &Series, path: &Path) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(ChartKind::Pie.title(), ("sans-serif", 30))?;
    let slices = pie_slices(series);
    if !slices.is_empty() {
        let (width, height) = root.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = f64::from(width.min(height)) * 0.35;
        let sizes: Vec<f64> = slices.iter().map(|(_, v)| *v).collect();
        let labels: Vec<&str> = slices.iter().map(|(l, _)| *l).collect();
        let colors: Vec<RGBColor> = (0..slices.len()).map(|i| COLORS[i % COLORS.len()]).collect();
        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(140.0);
        pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
        pie.percentages(("sans-serif", 16).into_font().color(&WHITE));
        root.draw(&pie)?;
    }
    root.present()?;
    Ok(())
}

/// Returns the top of the quantity axis, leaving headroom above the
/// tallest bar.
fn bar_axis_max(series: &Series) -> u64 {
    let tallest = series.iter().map(|(_, v)| v).max().unwrap_or(0);
    tallest.saturating_add(tallest / 10).max(1)
}

/// Returns the slices worth drawing: labels with a non-zero share.
fn pie_slices(series: &Series) -> Vec<(&str, f64)> {
    series
        .iter()
        .filter(|(_, v)| *v > 0)
        .map(|(label, v)| (label, v as f64))
        .collect()
}
