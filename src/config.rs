use anyhow::Result;
use std::time::Duration;

/// Number of words every chart is built from.
pub const DEFAULT_TOP_N: usize = 20;

/// Font size range (in pixels) the word cloud maps counts into.
pub const DEFAULT_WORD_SIZE_RANGE: (u32, u32) = (20, 100);

/// Height of the rendered chart.
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 400;

pub const DEFAULT_DISPLAY_WIDTH: u32 = 800;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_USER_AGENT: &str = concat!("word_insights/", env!("CARGO_PKG_VERSION"));

/// Tunables for a single run of the tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub top_n: usize,
    pub word_size_range: (u32, u32),
    pub display_height: u32,
    pub display_width: u32,
    pub fetch_timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            word_size_range: DEFAULT_WORD_SIZE_RANGE,
            display_height: DEFAULT_DISPLAY_HEIGHT,
            display_width: DEFAULT_DISPLAY_WIDTH,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.word_size_range;
        if min > max {
            return Err(anyhow::anyhow!(
                "Minimum font size ({}) is larger than maximum font size ({})",
                min,
                max
            ));
        }
        if self.display_height == 0 || self.display_width == 0 {
            return Err(anyhow::anyhow!("Chart dimensions must be non-zero"));
        }
        if self.fetch_timeout.is_zero() {
            return Err(anyhow::anyhow!("Fetch timeout must be at least one second"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_n, 20);
        assert_eq!(config.word_size_range, (20, 100));
        assert_eq!(config.display_height, 400);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn rejects_inverted_font_range() {
        let config = Config {
            word_size_range: (80, 10),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout_and_dimensions() {
        let config = Config {
            fetch_timeout: Duration::ZERO,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            display_height: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
