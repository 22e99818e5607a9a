use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::Path;

use crate::charts::{
    BoxPlotSpec, CartesianSpec, ChartKind, ChartSpec, Datum, PieSpec, RadarSpec, WordCloudSpec,
};
use crate::config::Config;
use crate::echarts::EchartsRenderer;

const PALETTE: [RGBColor; 10] = [
    RGBColor(84, 112, 198),
    RGBColor(145, 204, 117),
    RGBColor(250, 200, 88),
    RGBColor(238, 102, 102),
    RGBColor(115, 192, 222),
    RGBColor(59, 162, 114),
    RGBColor(252, 132, 82),
    RGBColor(154, 96, 180),
    RGBColor(234, 124, 204),
    RGBColor(42, 100, 246),
];

const RADAR_RINGS: usize = 4;

fn palette(i: usize) -> RGBColor {
    PALETTE[i % PALETTE.len()]
}

/// Something that can turn a chart spec into a file on disk.
pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec, output_path: &Path) -> Result<()>;
}

/// Picks a renderer from the output file extension.
pub fn renderer_for(output_path: &Path, config: &Config) -> Result<Box<dyn ChartRenderer>> {
    let extension = output_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" | "svg" => Ok(Box::new(PlottersRenderer::new(
            config.display_width,
            config.display_height,
        ))),
        "html" | "htm" => Ok(Box::new(EchartsRenderer::new(config.display_height))),
        _ => Err(anyhow::anyhow!(
            "Unsupported output format '{}': use .png, .svg or .html",
            output_path.display()
        )),
    }
}

/// Draws charts as PNG or SVG images.
pub struct PlottersRenderer {
    width: u32,
    height: u32,
}

impl PlottersRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;

        if spec.is_empty() {
            return draw_empty(root, spec.title());
        }

        match spec {
            ChartSpec::WordCloud(cloud) => draw_word_cloud(root, cloud),
            ChartSpec::Bar(data) => draw_cartesian(root, data, ChartKind::Bar),
            ChartSpec::Line(data) => draw_cartesian(root, data, ChartKind::Line),
            ChartSpec::Scatter(data) => draw_cartesian(root, data, ChartKind::Scatter),
            ChartSpec::Pie(pie) => draw_pie(root, pie),
            ChartSpec::BoxPlot(boxplot) => draw_box_plot(root, boxplot),
            ChartSpec::Radar(radar) => draw_radar(root, radar),
        }
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, spec: &ChartSpec, output_path: &Path) -> Result<()> {
        let size = (self.width, self.height);
        let is_svg = output_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

        if is_svg {
            let root = SVGBackend::new(output_path, size).into_drawing_area();
            self.draw(&root, spec)?;
            root.present().context("Failed to write image to file")?;
        } else {
            let root = BitMapBackend::new(output_path, size).into_drawing_area();
            self.draw(&root, spec)?;
            root.present().context("Failed to write image to file")?;
        }

        Ok(())
    }
}

fn draw_empty<DB>(root: &DrawingArea<DB, Shift>, title: &str) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = root.titled(title, ("sans-serif", 28))?;
    let (width, height) = area.dim_in_pixel();

    area.draw(&Text::new(
        "No words to display",
        (width as i32 / 2, height as i32 / 2),
        ("sans-serif", 20)
            .into_font()
            .color(&RGBColor(120, 120, 120))
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;

    Ok(())
}

/// Bar, line and scatter all plot counts against the ranked words.
fn draw_cartesian<DB>(
    root: &DrawingArea<DB, Shift>,
    spec: &CartesianSpec,
    kind: ChartKind,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = spec.values.len();
    let max_count = spec.values.iter().copied().max().unwrap_or(0);
    let categories = &spec.categories;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 28))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 60)
        .build_cartesian_2d(0..n, 0..(max_count + max_count / 10 + 1))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(spec.series_name.as_str())
        .x_labels(n)
        .x_label_formatter(&|x| categories.get(*x).cloned().unwrap_or_default())
        .label_style(("sans-serif", 12))
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .draw()?;

    let points = spec.values.iter().enumerate().map(|(i, &count)| (i, count));

    match kind {
        ChartKind::Bar => {
            chart.draw_series(points.map(|(i, count)| {
                Rectangle::new([(i, 0), (i + 1, count)], palette(i).mix(0.9).filled())
            }))?;
        }
        ChartKind::Line => {
            chart.draw_series(LineSeries::new(points.clone(), palette(0).stroke_width(2)))?;
            chart.draw_series(points.map(|point| Circle::new(point, 4, palette(0).filled())))?;
        }
        _ => {
            chart.draw_series(points.map(|(i, count)| Circle::new((i, count), 6, palette(i).filled())))?;
        }
    }

    Ok(())
}

fn draw_pie<DB>(root: &DrawingArea<DB, Shift>, spec: &PieSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = root.titled(&spec.title, ("sans-serif", 28))?;
    let (width, height) = area.dim_in_pixel();

    let center = (width as i32 / 2, height as i32 / 2);
    let radius = width.min(height) as f64 * 0.35;
    let sizes: Vec<f64> = spec.slices.iter().map(|slice| slice.value as f64).collect();
    let colors: Vec<RGBColor> = (0..sizes.len()).map(palette).collect();
    let labels: Vec<&str> = spec.slices.iter().map(|slice| slice.name.as_str()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 12).into_font().color(&BLACK));
    area.draw(&pie)?;

    Ok(())
}

fn draw_box_plot<DB>(root: &DrawingArea<DB, Shift>, spec: &BoxPlotSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let values: Vec<f64> = spec.values.iter().map(|&count| count as f64).collect();
    let quartiles = Quartiles::new(&values);
    let max_count = spec.values.iter().copied().max().unwrap_or(0) as f32;
    let category = &spec.category;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 28))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0i32..2i32, 0f32..(max_count * 1.1 + 1.0))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(3)
        .x_label_formatter(&|x| if *x == 1 { category.clone() } else { String::new() })
        .label_style(("sans-serif", 12))
        .draw()?;

    chart.draw_series(std::iter::once(
        Boxplot::new_vertical(1, &quartiles)
            .width(60)
            .style(&palette(0)),
    ))?;

    Ok(())
}

fn draw_radar<DB>(root: &DrawingArea<DB, Shift>, spec: &RadarSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = spec.values.len();

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 28))
        .margin(10)
        .build_cartesian_2d(-1.5f64..1.5f64, -1.25f64..1.25f64)?;

    for ring in 1..=RADAR_RINGS {
        let ratio = ring as f64 / RADAR_RINGS as f64;
        chart.draw_series(std::iter::once(PathElement::new(
            closed(radar_polygon(&vec![ratio; n])),
            RGBColor(215, 215, 225).stroke_width(1),
        )))?;
    }

    for (i, indicator) in spec.indicators.iter().enumerate() {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0), radar_point(i, n, 1.0)],
            RGBColor(200, 200, 210).stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            indicator.name.clone(),
            radar_point(i, n, 1.12),
            ("sans-serif", 12)
                .into_font()
                .color(&RGBColor(60, 60, 80))
                .pos(Pos::new(HPos::Center, VPos::Center)),
        )))?;
    }

    let points = radar_polygon(&radar_ratios(spec));
    chart.draw_series(std::iter::once(Polygon::new(
        points.clone(),
        palette(0).mix(0.3).filled(),
    )))?;
    chart.draw_series(std::iter::once(PathElement::new(
        closed(points),
        palette(0).stroke_width(2),
    )))?;

    Ok(())
}

fn draw_word_cloud<DB>(root: &DrawingArea<DB, Shift>, spec: &WordCloudSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = root.titled(&spec.title, ("sans-serif", 28))?;
    let (width, height) = area.dim_in_pixel();

    for placed in word_cloud_layout(&spec.words, spec.size_range, (width, height)) {
        // Consistent color per word
        let hue = (placed.text.chars().fold(0u32, |acc, c| acc.wrapping_add(c as u32)) % 360)
            as f64
            / 360.0;

        area.draw(&Text::new(
            placed.text,
            placed.center,
            ("sans-serif", placed.font_size as f64)
                .into_font()
                .color(&HSLColor(hue, 0.7, 0.45))
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
    }

    Ok(())
}

/// Linear map of `count` from `[min_count, max_count]` onto the font range.
/// A flat distribution gets the largest size. An inverted range collapses
/// to its minimum.
pub fn font_size_for(count: usize, min_count: usize, max_count: usize, range: (u32, u32)) -> u32 {
    let (min_size, max_size) = range;
    if max_count <= min_count {
        return max_size;
    }
    let ratio = (count.saturating_sub(min_count)) as f64 / (max_count - min_count) as f64;
    min_size + (max_size.saturating_sub(min_size) as f64 * ratio.min(1.0)).round() as u32
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub center: (i32, i32),
    pub font_size: u32,
}

/// Lays the words out on a square-ish grid, in rank order, row by row.
/// Sizes come from `font_size_for`, scaled down together when the largest
/// would not fit in a grid cell.
pub fn word_cloud_layout(words: &[Datum], range: (u32, u32), area: (u32, u32)) -> Vec<PlacedWord> {
    if words.is_empty() {
        return Vec::new();
    }

    let max_count = words.iter().map(|w| w.value).max().unwrap_or(0);
    let min_count = words.iter().map(|w| w.value).min().unwrap_or(0);

    let cols = (words.len() as f64).sqrt().ceil() as usize;
    let rows = words.len().div_ceil(cols);
    let cell_width = area.0 as f64 / cols as f64;
    let cell_height = area.1 as f64 / rows as f64;

    let largest = font_size_for(max_count, min_count, max_count, range).max(1) as f64;
    let scale = (cell_height * 0.9 / largest).min(1.0);

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let row = i / cols;
            let col = i % cols;
            let size = font_size_for(word.value, min_count, max_count, range) as f64 * scale;

            PlacedWord {
                text: word.name.clone(),
                center: (
                    (col as f64 * cell_width + cell_width / 2.0) as i32,
                    (row as f64 * cell_height + cell_height / 2.0) as i32,
                ),
                font_size: size.round().max(1.0) as u32,
            }
        })
        .collect()
}

/// Point on axis `index` of `count`, first axis straight up, going clockwise.
pub fn radar_point(index: usize, count: usize, ratio: f64) -> (f64, f64) {
    let angle = FRAC_PI_2 - TAU * index as f64 / count.max(1) as f64;
    (ratio * angle.cos(), ratio * angle.sin())
}

pub fn radar_polygon(ratios: &[f64]) -> Vec<(f64, f64)> {
    ratios
        .iter()
        .enumerate()
        .map(|(i, &ratio)| radar_point(i, ratios.len(), ratio))
        .collect()
}

/// Each value relative to its axis maximum.
pub fn radar_ratios(spec: &RadarSpec) -> Vec<f64> {
    spec.values
        .iter()
        .zip(&spec.indicators)
        .map(|(&value, axis)| {
            if axis.max == 0 {
                0.0
            } else {
                value as f64 / axis.max as f64
            }
        })
        .collect()
}

fn closed(mut points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}
