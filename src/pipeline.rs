use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analyzer::{count_frequencies, tokenize, WordSegmenter, WordStats};
use crate::charts::{build_chart, ChartKind, ChartSpec};
use crate::extractor::MarkupStripper;
use crate::fetcher::{FetchClient, FetchError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no content found at {url}")]
    EmptyContent { url: String },
}

/// Word statistics of one fetched page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub url: String,
    pub fetched_at: String,
    /// Length of the extracted plain text, in characters.
    pub text_length: usize,
    #[serde(flatten)]
    pub stats: WordStats,
}

impl Analysis {
    /// True when no token survived segmentation.
    pub fn is_empty(&self) -> bool {
        self.stats.top_words.is_empty()
    }
}

/// fetch -> strip -> segment -> count -> rank, one request at a time.
pub struct Pipeline {
    fetcher: Box<dyn FetchClient>,
    stripper: Box<dyn MarkupStripper>,
    segmenter: Box<dyn WordSegmenter>,
    top_n: usize,
}

impl Pipeline {
    pub fn new(
        fetcher: Box<dyn FetchClient>,
        stripper: Box<dyn MarkupStripper>,
        segmenter: Box<dyn WordSegmenter>,
        top_n: usize,
    ) -> Self {
        Self {
            fetcher,
            stripper,
            segmenter,
            top_n,
        }
    }

    pub fn analyze_url(&self, url: &str) -> Result<Analysis, PipelineError> {
        let url = url.trim();
        let html = self.fetcher.fetch(url)?;
        info!("Fetched {} bytes from {}", html.len(), url);
        self.analyze_html(url, &html)
    }

    pub fn analyze_html(&self, url: &str, html: &str) -> Result<Analysis, PipelineError> {
        let text = self.stripper.strip(html);
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyContent {
                url: url.to_string(),
            });
        }
        let text_length = text.chars().count();
        info!("Extracted {} characters of plain text", text_length);

        let tokens = tokenize(self.segmenter.as_ref(), &text);
        let table = count_frequencies(&tokens);
        info!("Counted {} tokens, {} distinct", tokens.len(), table.len());
        if table.is_empty() {
            warn!("No words survived segmentation for {}", url);
        }

        Ok(Analysis {
            url: url.to_string(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
            text_length,
            stats: WordStats::from_table(&table, self.top_n),
        })
    }

    /// URL and chart kind in, chart spec out.
    pub fn chart_for_url(
        &self,
        url: &str,
        kind: ChartKind,
        size_range: (u32, u32),
    ) -> Result<ChartSpec, PipelineError> {
        let analysis = self.analyze_url(url)?;
        Ok(build_chart(kind, &analysis.stats.top_words, size_range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{JiebaSegmenter, UnicodeWordSegmenter};
    use crate::extractor::HtmlStripper;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use std::collections::HashMap;

    /// Serves canned pages; unknown URLs answer 404.
    struct StaticFetcher {
        pages: HashMap<String, String>,
    }

    impl StaticFetcher {
        fn with_page(url: &str, html: &str) -> Self {
            let mut pages = HashMap::new();
            pages.insert(url.to_string(), html.to_string());
            Self { pages }
        }
    }

    impl FetchClient for StaticFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            })
        }
    }

    struct UnreachableFetcher;

    impl FetchClient for UnreachableFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::Timeout {
                url: url.to_string(),
                secs: 10,
            })
        }
    }

    const URL: &str = "https://example.com/story";
    const PAGE: &str = r#"
        <html><body>
          <p>The cat sat on the mat.</p>
          <script>the the the the</script>
          <p>The cat ran!</p>
        </body></html>
    "#;

    fn pipeline(fetcher: impl FetchClient + 'static) -> Pipeline {
        Pipeline::new(
            Box::new(fetcher),
            Box::new(HtmlStripper),
            Box::new(UnicodeWordSegmenter),
            20,
        )
    }

    #[test]
    fn analyzes_fetched_page() {
        let analysis = pipeline(StaticFetcher::with_page(URL, PAGE))
            .analyze_url(URL)
            .unwrap();

        assert_eq!(analysis.url, URL);
        assert_eq!(analysis.stats.total_tokens, 9);
        assert_eq!(analysis.stats.distinct_tokens, 7);
        assert_eq!(
            analysis.stats.top_words[..3].to_vec(),
            vec![
                ("The".to_string(), 2),
                ("cat".to_string(), 2),
                ("sat".to_string(), 1)
            ]
        );
        assert_eq!(analysis.stats.top_words.last(), Some(&("ran".to_string(), 1)));
    }

    #[test]
    fn produces_bar_chart_for_url() {
        let html = "<body>the cat sat on the mat the cat ran</body>";
        let spec = pipeline(StaticFetcher::with_page(URL, html))
            .chart_for_url(URL, ChartKind::Bar, (20, 100))
            .unwrap();

        let ChartSpec::Bar(bar) = spec else {
            panic!("expected a bar spec");
        };
        assert_eq!(bar.categories, vec!["the", "cat", "sat", "on", "mat", "ran"]);
        assert_eq!(bar.values, vec![3, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn fetch_failure_stops_the_pipeline() {
        let err = pipeline(UnreachableFetcher)
            .chart_for_url(URL, ChartKind::Pie, (20, 100))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Fetch(FetchError::Timeout { .. })));

        let err = pipeline(StaticFetcher::with_page(URL, PAGE))
            .analyze_url("https://example.com/missing")
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn empty_body_is_reported_as_no_content() {
        let html = "<html><body><script>only();</script><style>p {}</style></body></html>";
        let err = pipeline(StaticFetcher::with_page(URL, html))
            .analyze_url(URL)
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyContent { .. }));
        assert_eq!(err.to_string(), format!("no content found at {}", URL));
    }

    #[test]
    fn punctuation_only_body_is_no_content() {
        let html = "<body>!!! ... ???</body>";
        let err = pipeline(StaticFetcher::with_page(URL, html))
            .analyze_url(URL)
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyContent { .. }));
    }

    #[test]
    fn text_without_words_gives_empty_analysis_and_charts() {
        let html = "<body>_ __</body>";
        let analysis = pipeline(StaticFetcher::with_page(URL, html))
            .analyze_url(URL)
            .unwrap();

        assert!(analysis.is_empty());
        assert_eq!(analysis.stats.total_tokens, 0);
        assert_eq!(analysis.stats.distinct_tokens, 0);
        assert!(analysis.text_length > 0);

        for kind in ChartKind::ALL {
            let spec = build_chart(kind, &analysis.stats.top_words, (20, 100));
            assert!(spec.is_empty(), "{} should be empty", kind.name());
        }
    }

    #[test]
    fn whitespace_tokens_never_reach_the_ranking() {
        let html = "<body><p>北京 欢迎 你</p><p>北京</p></body>";
        let analysis = Pipeline::new(
            Box::new(StaticFetcher::with_page(URL, html)),
            Box::new(HtmlStripper),
            Box::new(JiebaSegmenter::new()),
            20,
        )
        .analyze_url(URL)
        .unwrap();

        assert_eq!(analysis.stats.top_words[0], ("北京".to_string(), 2));
        assert!(analysis
            .stats
            .top_words
            .iter()
            .all(|(word, _)| !word.trim().is_empty()));
    }

    #[test]
    fn top_n_is_respected() {
        let html: String = (0..40).map(|i| format!("<p>word{}</p>", i)).collect();
        let html = format!("<body>{}</body>", html);
        let analysis = Pipeline::new(
            Box::new(StaticFetcher::with_page(URL, &html)),
            Box::new(HtmlStripper),
            Box::new(UnicodeWordSegmenter),
            5,
        )
        .analyze_url(URL)
        .unwrap();

        assert_eq!(analysis.stats.top_words.len(), 5);
        assert_eq!(analysis.stats.distinct_tokens, 40);
    }

    #[test]
    fn analysis_exports_flat_json() {
        let analysis = pipeline(StaticFetcher::with_page(URL, PAGE))
            .analyze_url(URL)
            .unwrap();
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json["url"], URL);
        assert_eq!(json["total_tokens"], 9);
        assert_eq!(json["top_words"][0][0], "The");
    }
}
