//! Fetch a web page, count the words of its visible text and turn the most
//! frequent ones into chart data.
//!
//! The pipeline is `fetch -> strip -> segment -> count -> rank`, followed by
//! one of the seven chart builders in [`charts`]. Every stage sits behind a
//! small trait ([`FetchClient`], [`MarkupStripper`], [`WordSegmenter`],
//! [`ChartRenderer`]) so it can be swapped or faked.

pub mod analyzer;
pub mod charts;
pub mod config;
pub mod echarts;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod utils;
pub mod visualizer;

pub use analyzer::{FrequencyTable, RankedList, SegmenterKind, WordSegmenter, WordStats};
pub use charts::{build_chart, ChartKind, ChartSpec};
pub use config::Config;
pub use extractor::{HtmlStripper, MarkupStripper};
pub use fetcher::{FetchClient, FetchError, HttpFetcher};
pub use pipeline::{Analysis, Pipeline, PipelineError};
pub use visualizer::ChartRenderer;
