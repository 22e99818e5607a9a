use serde::{Deserialize, Serialize};

use crate::analyzer::RankedList;

pub const SERIES_NAME: &str = "Frequency";
pub const BOX_PLOT_CATEGORY: &str = "word frequency";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    WordCloud,
    Bar,
    Line,
    Pie,
    Scatter,
    BoxPlot,
    Radar,
}

impl ChartKind {
    /// Menu order of the interactive shell.
    pub const ALL: [ChartKind; 7] = [
        ChartKind::WordCloud,
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Scatter,
        ChartKind::BoxPlot,
        ChartKind::Radar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::WordCloud => "word-cloud",
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::BoxPlot => "box-plot",
            ChartKind::Radar => "radar",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::WordCloud => "Word Cloud",
            ChartKind::Bar => "Word Frequency Bar Chart",
            ChartKind::Line => "Word Frequency Line Chart",
            ChartKind::Pie => "Word Frequency Pie Chart",
            ChartKind::Scatter => "Word Frequency Scatter Chart",
            ChartKind::BoxPlot => "Word Frequency Box Plot",
            ChartKind::Radar => "Word Frequency Radar Chart",
        }
    }

    /// Accepts a kind name (case-insensitive) or its 1-based menu number.
    pub fn from_selection(input: &str) -> Option<ChartKind> {
        let input = input.trim();
        if let Ok(index) = input.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| ChartKind::ALL.get(i))
                .copied();
        }
        <ChartKind as clap::ValueEnum>::from_str(input, true).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datum {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCloudSpec {
    pub title: String,
    pub words: Vec<Datum>,
    /// Smallest and largest font size, in pixels.
    pub size_range: (u32, u32),
}

/// Shared shape of the bar, line and scatter charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartesianSpec {
    pub title: String,
    pub series_name: String,
    pub categories: Vec<String>,
    pub values: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieSpec {
    pub title: String,
    pub slices: Vec<Datum>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxPlotSpec {
    pub title: String,
    pub category: String,
    pub values: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarIndicator {
    pub name: String,
    pub max: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarSpec {
    pub title: String,
    pub indicators: Vec<RadarIndicator>,
    pub values: Vec<usize>,
}

/// Chart-family specific data handed over to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChartSpec {
    WordCloud(WordCloudSpec),
    Bar(CartesianSpec),
    Line(CartesianSpec),
    Pie(PieSpec),
    Scatter(CartesianSpec),
    BoxPlot(BoxPlotSpec),
    Radar(RadarSpec),
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSpec::WordCloud(_) => ChartKind::WordCloud,
            ChartSpec::Bar(_) => ChartKind::Bar,
            ChartSpec::Line(_) => ChartKind::Line,
            ChartSpec::Pie(_) => ChartKind::Pie,
            ChartSpec::Scatter(_) => ChartKind::Scatter,
            ChartSpec::BoxPlot(_) => ChartKind::BoxPlot,
            ChartSpec::Radar(_) => ChartKind::Radar,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ChartSpec::WordCloud(spec) => &spec.title,
            ChartSpec::Bar(spec) | ChartSpec::Line(spec) | ChartSpec::Scatter(spec) => &spec.title,
            ChartSpec::Pie(spec) => &spec.title,
            ChartSpec::BoxPlot(spec) => &spec.title,
            ChartSpec::Radar(spec) => &spec.title,
        }
    }

    /// True when the spec carries no data points.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartSpec::WordCloud(spec) => spec.words.is_empty(),
            ChartSpec::Bar(spec) | ChartSpec::Line(spec) | ChartSpec::Scatter(spec) => {
                spec.values.is_empty()
            }
            ChartSpec::Pie(spec) => spec.slices.is_empty(),
            ChartSpec::BoxPlot(spec) => spec.values.is_empty(),
            ChartSpec::Radar(spec) => spec.values.is_empty(),
        }
    }
}

/// Builds the spec for `kind` from the ranked words.
pub fn build_chart(kind: ChartKind, ranked: &RankedList, size_range: (u32, u32)) -> ChartSpec {
    match kind {
        ChartKind::WordCloud => ChartSpec::WordCloud(build_word_cloud(ranked, size_range)),
        ChartKind::Bar => ChartSpec::Bar(build_cartesian(kind, ranked)),
        ChartKind::Line => ChartSpec::Line(build_cartesian(kind, ranked)),
        ChartKind::Scatter => ChartSpec::Scatter(build_cartesian(kind, ranked)),
        ChartKind::Pie => ChartSpec::Pie(build_pie(ranked)),
        ChartKind::BoxPlot => ChartSpec::BoxPlot(build_box_plot(ranked)),
        ChartKind::Radar => ChartSpec::Radar(build_radar(ranked)),
    }
}

fn to_data(ranked: &RankedList) -> Vec<Datum> {
    ranked
        .iter()
        .map(|(word, count)| Datum {
            name: word.clone(),
            value: *count,
        })
        .collect()
}

fn counts(ranked: &RankedList) -> Vec<usize> {
    ranked.iter().map(|(_, count)| *count).collect()
}

pub fn build_word_cloud(ranked: &RankedList, size_range: (u32, u32)) -> WordCloudSpec {
    WordCloudSpec {
        title: ChartKind::WordCloud.title().to_string(),
        words: to_data(ranked),
        size_range,
    }
}

/// Categories are the words, the single series their counts, in rank order.
pub fn build_cartesian(kind: ChartKind, ranked: &RankedList) -> CartesianSpec {
    CartesianSpec {
        title: kind.title().to_string(),
        series_name: SERIES_NAME.to_string(),
        categories: ranked.iter().map(|(word, _)| word.clone()).collect(),
        values: counts(ranked),
    }
}

pub fn build_pie(ranked: &RankedList) -> PieSpec {
    PieSpec {
        title: ChartKind::Pie.title().to_string(),
        slices: to_data(ranked),
    }
}

pub fn build_box_plot(ranked: &RankedList) -> BoxPlotSpec {
    BoxPlotSpec {
        title: ChartKind::BoxPlot.title().to_string(),
        category: BOX_PLOT_CATEGORY.to_string(),
        values: counts(ranked),
    }
}

/// Every axis shares the largest count as its maximum.
pub fn build_radar(ranked: &RankedList) -> RadarSpec {
    let max = ranked.iter().map(|(_, count)| *count).max().unwrap_or(0);

    RadarSpec {
        title: ChartKind::Radar.title().to_string(),
        indicators: ranked
            .iter()
            .map(|(word, _)| RadarIndicator {
                name: word.clone(),
                max,
            })
            .collect(),
        values: counts(ranked),
    }
}
