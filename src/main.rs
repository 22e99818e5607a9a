use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use word_insights::config::{
    DEFAULT_DISPLAY_HEIGHT, DEFAULT_DISPLAY_WIDTH, DEFAULT_FETCH_TIMEOUT, DEFAULT_TOP_N,
    DEFAULT_WORD_SIZE_RANGE,
};
use word_insights::{
    build_chart, utils, visualizer, Analysis, ChartKind, ChartSpec, Config, HtmlStripper,
    HttpFetcher, Pipeline, SegmenterKind,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Options {
    /// Number of most frequent words to chart
    #[arg(long, default_value_t = DEFAULT_TOP_N, global = true)]
    top: usize,

    /// Fetch timeout in seconds
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs(), global = true)]
    timeout: u64,

    /// Chart height in pixels
    #[arg(long, default_value_t = DEFAULT_DISPLAY_HEIGHT, global = true)]
    height: u32,

    /// Chart width in pixels (PNG and SVG output)
    #[arg(long, default_value_t = DEFAULT_DISPLAY_WIDTH, global = true)]
    width: u32,

    /// Smallest word cloud font size
    #[arg(long, default_value_t = DEFAULT_WORD_SIZE_RANGE.0, global = true)]
    min_font: u32,

    /// Largest word cloud font size
    #[arg(long, default_value_t = DEFAULT_WORD_SIZE_RANGE.1, global = true)]
    max_font: u32,

    /// Word segmentation strategy
    #[arg(long, value_enum, default_value_t = SegmenterKind::Jieba, global = true)]
    segmenter: SegmenterKind,

    /// User-Agent header sent with the request
    #[arg(long, global = true)]
    user_agent: Option<String>,
}

impl Options {
    fn to_config(&self) -> Config {
        let defaults = Config::default();
        Config {
            top_n: self.top,
            word_size_range: (self.min_font, self.max_font),
            display_height: self.height,
            display_width: self.width,
            fetch_timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a page and render a chart of its word frequencies
    Chart {
        /// Page to analyze
        #[arg(short, long)]
        url: String,

        /// Type of chart to draw
        #[arg(short = 't', long = "type", value_enum, default_value_t = ChartKind::WordCloud)]
        kind: ChartKind,

        /// Output file (.png, .svg or .html)
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Fetch a page and print its most frequent words
    Analyze {
        /// Page to analyze
        #[arg(short, long)]
        url: String,

        /// Output results as JSON to specified file
        #[arg(short, long)]
        output_json: Option<PathBuf>,

        /// Show every ranked word with its share of the text
        #[arg(short, long)]
        detailed: bool,
    },
    /// Print the chart data for a page as JSON
    Spec {
        /// Page to analyze
        #[arg(short, long)]
        url: String,

        /// Type of chart to build
        #[arg(short = 't', long = "type", value_enum, default_value_t = ChartKind::Bar)]
        kind: ChartKind,
    },
    /// Ask for URLs and chart types until an empty URL is entered
    Interactive {
        /// Directory charts are written to
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Output format: png, svg or html
        #[arg(short, long, default_value = "png")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = cli.options.to_config();
    config.validate().context("Invalid options")?;

    let fetcher = HttpFetcher::new(&config).context("Failed to build HTTP client")?;
    info!("Using {:?} segmentation", cli.options.segmenter);
    let pipeline = Pipeline::new(
        Box::new(fetcher),
        Box::new(HtmlStripper),
        cli.options.segmenter.build(),
        config.top_n,
    );

    match &cli.command {
        Commands::Chart { url, kind, output } => {
            let spec = render_url(&pipeline, &config, url, *kind, output)?;
            println!("{} saved to {}", spec.title(), output.display());
            Ok(())
        }
        Commands::Analyze {
            url,
            output_json,
            detailed,
        } => {
            let analysis = fetch_analysis(&pipeline, url)?;
            print_analysis_summary(&analysis, *detailed);

            // Export to JSON if requested
            if let Some(json_path) = output_json {
                utils::export_to_json(&analysis, json_path)
                    .context("Failed to export results to JSON")?;
                println!("Results exported to {}", json_path.display());
            }

            Ok(())
        }
        Commands::Spec { url, kind } => {
            let spec = pipeline
                .chart_for_url(url, *kind, config.word_size_range)
                .with_context(|| format!("Failed to analyze {}", url))?;
            let json = serde_json::to_string_pretty(&spec)
                .context("Failed to serialize chart spec")?;
            println!("{}", json);
            Ok(())
        }
        Commands::Interactive { dir, format } => run_interactive(&pipeline, &config, dir, format),
    }
}

fn fetch_analysis(pipeline: &Pipeline, url: &str) -> Result<Analysis> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Fetching {}", url.trim()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = pipeline.analyze_url(url);
    spinner.finish_and_clear();

    result.with_context(|| format!("Failed to analyze {}", url.trim()))
}

/// One full request: fetch, count, build the chart and write it out.
fn render_url(
    pipeline: &Pipeline,
    config: &Config,
    url: &str,
    kind: ChartKind,
    output: &Path,
) -> Result<ChartSpec> {
    let renderer = visualizer::renderer_for(output, config)?;
    let analysis = fetch_analysis(pipeline, url)?;

    if analysis.is_empty() {
        println!(
            "{}",
            "No words were found on the page; the chart will be empty.".yellow()
        );
    }

    let spec = build_chart(kind, &analysis.stats.top_words, config.word_size_range);
    info!("Rendering {} chart to {}", spec.kind().name(), output.display());
    renderer
        .render(&spec, output)
        .context("Failed to generate visualization")?;

    Ok(spec)
}

fn run_interactive(pipeline: &Pipeline, config: &Config, dir: &Path, format: &str) -> Result<()> {
    let format = format.trim_start_matches('.').to_lowercase();
    // Fail on a bad format before asking anything
    visualizer::renderer_for(Path::new(&format!("chart.{}", format)), config)?;

    println!("\n{}", "=== Word Frequency Explorer ===".bold().green());
    println!("Enter an empty URL or 'q' to quit.");

    loop {
        let url = prompt("\nURL: ")?;
        if url.is_empty() || url.eq_ignore_ascii_case("q") {
            break;
        }

        println!("{}", "Chart types:".bold());
        for (i, kind) in ChartKind::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, kind.name());
        }
        let choice = prompt("Chart type [1]: ")?;
        let kind = if choice.is_empty() {
            ChartKind::WordCloud
        } else {
            match ChartKind::from_selection(&choice) {
                Some(kind) => kind,
                None => {
                    println!("{}", format!("Unknown chart type '{}'", choice).red());
                    continue;
                }
            }
        };

        let output = dir.join(utils::chart_file_name(&url, kind, &format));
        match render_url(pipeline, config, &url, kind, &output) {
            Ok(spec) => println!("{} saved to {}", spec.title().green(), output.display()),
            Err(e) => println!("{} {:#}", "Error:".red().bold(), e),
        }
    }

    Ok(())
}

/// Reads one trimmed line; end of input reads as an empty line.
fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read from stdin")?;
    Ok(input.trim().to_string())
}

fn print_analysis_summary(analysis: &Analysis, detailed: bool) {
    let stats = &analysis.stats;

    println!("\n{}", "=== Word Frequency Summary ===".bold().green());
    println!("URL: {}", analysis.url);
    println!("Plain text: {} characters", analysis.text_length);
    println!("Total words: {}", stats.total_tokens);
    println!("Distinct words: {}", stats.distinct_tokens);

    if stats.top_words.is_empty() {
        println!("\n{}", "No words were found on the page.".yellow());
        return;
    }

    let shown = if detailed { stats.top_words.len() } else { stats.top_words.len().min(10) };
    println!(
        "\n{}",
        format!("Top {} most common {}:", shown, utils::pluralize("word", shown)).bold()
    );
    for (i, (word, count)) in stats.top_words.iter().take(shown).enumerate() {
        if detailed {
            println!("  {}. {} ({}, {:.1}%)", i + 1, word, count, stats.share(*count));
        } else {
            println!("  {}. {} ({})", i + 1, word, count);
        }
    }
}
