use jieba_rs::Jieba;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Tokens ranked by count, most frequent first.
pub type RankedList = Vec<(String, usize)>;

/// Splits plain text into word-like pieces, in reading order.
pub trait WordSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Dictionary and HMM based segmentation; handles scripts without spaces
/// between words (Chinese in particular) as well as Latin text.
pub struct JiebaSegmenter {
    jieba: Jieba,
}

impl JiebaSegmenter {
    pub fn new() -> Self {
        Self { jieba: Jieba::new() }
    }
}

impl Default for JiebaSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSegmenter for JiebaSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.jieba.cut(text, true)
    }
}

/// UAX#29 word boundaries. Good enough for whitespace-delimited scripts,
/// but splits ideographic text into single characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeWordSegmenter;

impl WordSegmenter for UnicodeWordSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.unicode_words().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SegmenterKind {
    #[default]
    Jieba,
    Unicode,
}

impl SegmenterKind {
    pub fn build(self) -> Box<dyn WordSegmenter> {
        match self {
            SegmenterKind::Jieba => Box::new(JiebaSegmenter::new()),
            SegmenterKind::Unicode => Box::new(UnicodeWordSegmenter),
        }
    }
}

/// Segments `text` and drops empty and whitespace-only pieces.
pub fn tokenize(segmenter: &dyn WordSegmenter, text: &str) -> Vec<String> {
    segmenter
        .segment(text)
        .into_iter()
        .filter(|token| !token.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TermStats {
    count: usize,
    first_seen: usize,
}

/// Occurrence count per distinct token.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    terms: HashMap<String, TermStats>,
}

impl FrequencyTable {
    pub fn get(&self, token: &str) -> Option<usize> {
        self.terms.get(token).map(|stats| stats.count)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of tokens counted, i.e. the length of the source stream.
    pub fn total(&self) -> usize {
        self.terms.values().map(|stats| stats.count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.terms
            .iter()
            .map(|(token, stats)| (token.as_str(), stats.count))
    }
}

/// Counts every token in a single pass, remembering where each was first seen.
pub fn count_frequencies(tokens: &[String]) -> FrequencyTable {
    let mut terms: HashMap<String, TermStats> = HashMap::new();

    for (position, token) in tokens.iter().enumerate() {
        terms
            .entry(token.clone())
            .or_insert(TermStats {
                count: 0,
                first_seen: position,
            })
            .count += 1;
    }

    FrequencyTable { terms }
}

/// The `limit` most frequent tokens. Equal counts keep first-occurrence order.
pub fn rank_top_words(table: &FrequencyTable, limit: usize) -> RankedList {
    let mut ranked: Vec<(&String, &TermStats)> = table.terms.iter().collect();

    ranked.sort_by(|a, b| {
        b.1.count
            .cmp(&a.1.count)
            .then_with(|| a.1.first_seen.cmp(&b.1.first_seen))
    });
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(token, stats)| (token.clone(), stats.count))
        .collect()
}

/// Ranked words plus the totals they were drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordStats {
    pub total_tokens: usize,
    pub distinct_tokens: usize,
    pub top_words: RankedList,
}

impl WordStats {
    pub fn from_table(table: &FrequencyTable, limit: usize) -> Self {
        Self {
            total_tokens: table.total(),
            distinct_tokens: table.len(),
            top_words: rank_top_words(table, limit),
        }
    }

    /// Share of all counted tokens taken by `count`, as a percentage.
    pub fn share(&self, count: usize) -> f64 {
        if self.total_tokens == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total_tokens as f64
        }
    }
}
