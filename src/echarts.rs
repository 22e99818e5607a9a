//! Standalone HTML output backed by ECharts, the charting library the
//! browser embeds. Statistics such as box-plot quartiles are left to it.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use crate::charts::{CartesianSpec, ChartSpec, Datum};
use crate::visualizer::ChartRenderer;

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";
const WORDCLOUD_CDN: &str =
    "https://cdn.jsdelivr.net/npm/echarts-wordcloud@2/dist/echarts-wordcloud.min.js";

pub struct EchartsRenderer {
    height: u32,
}

impl EchartsRenderer {
    pub fn new(height: u32) -> Self {
        Self { height }
    }

    pub fn to_html(&self, spec: &ChartSpec) -> Result<String> {
        let option = serde_json::to_string(&echarts_option(spec))
            .context("Failed to serialize chart options")?
            // keep the option from closing the surrounding <script>
            .replace("</", "<\\/");

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{echarts}"></script>
<script src="{wordcloud}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:{height}px;"></div>
<script>
var chart = echarts.init(document.getElementById("chart"));
chart.setOption({option});
</script>
</body>
</html>
"#,
            title = spec.title(),
            echarts = ECHARTS_CDN,
            wordcloud = WORDCLOUD_CDN,
            height = self.height,
            option = option,
        ))
    }
}

impl ChartRenderer for EchartsRenderer {
    fn render(&self, spec: &ChartSpec, output_path: &Path) -> Result<()> {
        let html = self.to_html(spec)?;
        fs::write(output_path, html)
            .with_context(|| format!("Failed to write {}", output_path.display()))
    }
}

fn name_value(data: &[Datum]) -> Vec<Value> {
    data.iter()
        .map(|d| json!({ "name": d.name, "value": d.value }))
        .collect()
}

fn cartesian(spec: &CartesianSpec, series_type: &str) -> Value {
    json!({
        "title": { "text": spec.title },
        "tooltip": {},
        "xAxis": { "type": "category", "data": spec.categories },
        "yAxis": { "type": "value" },
        "series": [{
            "name": spec.series_name,
            "type": series_type,
            "data": spec.values,
        }],
    })
}

/// ECharts `option` object for a spec.
pub fn echarts_option(spec: &ChartSpec) -> Value {
    match spec {
        ChartSpec::WordCloud(cloud) => json!({
            "title": { "text": cloud.title },
            "tooltip": {},
            "series": [{
                "type": "wordCloud",
                "sizeRange": [cloud.size_range.0, cloud.size_range.1],
                "data": name_value(&cloud.words),
            }],
        }),
        ChartSpec::Bar(data) => cartesian(data, "bar"),
        ChartSpec::Line(data) => cartesian(data, "line"),
        ChartSpec::Scatter(data) => cartesian(data, "scatter"),
        ChartSpec::Pie(pie) => json!({
            "title": { "text": pie.title },
            "tooltip": { "trigger": "item" },
            "series": [{ "type": "pie", "data": name_value(&pie.slices) }],
        }),
        ChartSpec::BoxPlot(boxplot) => json!({
            "title": { "text": boxplot.title },
            "tooltip": {},
            "dataset": [
                { "source": [boxplot.values] },
                {
                    "transform": {
                        "type": "boxplot",
                        "config": { "itemNameFormatter": boxplot.category },
                    },
                },
            ],
            "xAxis": { "type": "category" },
            "yAxis": { "type": "value" },
            "series": [{ "type": "boxplot", "datasetIndex": 1 }],
        }),
        ChartSpec::Radar(radar) => json!({
            "title": { "text": radar.title },
            "tooltip": {},
            "radar": {
                "indicator": radar
                    .indicators
                    .iter()
                    .map(|axis| json!({ "name": axis.name, "max": axis.max }))
                    .collect::<Vec<_>>(),
            },
            "series": [{
                "type": "radar",
                "data": [{ "value": radar.values }],
            }],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::RankedList;
    use crate::charts::{build_chart, ChartKind};
    use pretty_assertions::assert_eq;

    fn sample() -> RankedList {
        vec![("rust".to_string(), 5), ("crab".to_string(), 2)]
    }

    #[test]
    fn bar_option_has_categories_and_series() {
        let spec = build_chart(ChartKind::Bar, &sample(), (20, 100));
        let option = echarts_option(&spec);

        assert_eq!(option["xAxis"]["data"], json!(["rust", "crab"]));
        assert_eq!(option["series"][0]["type"], "bar");
        assert_eq!(option["series"][0]["data"], json!([5, 2]));
        assert_eq!(option["series"][0]["name"], "Frequency");
    }

    #[test]
    fn word_cloud_option_carries_size_range() {
        let spec = build_chart(ChartKind::WordCloud, &sample(), (20, 100));
        let option = echarts_option(&spec);

        assert_eq!(option["series"][0]["sizeRange"], json!([20, 100]));
        assert_eq!(option["series"][0]["data"][0], json!({ "name": "rust", "value": 5 }));
    }

    #[test]
    fn box_plot_leaves_statistics_to_echarts() {
        let spec = build_chart(ChartKind::BoxPlot, &sample(), (20, 100));
        let option = echarts_option(&spec);

        assert_eq!(option["dataset"][0]["source"], json!([[5, 2]]));
        assert_eq!(option["dataset"][1]["transform"]["type"], "boxplot");
    }

    #[test]
    fn radar_indicators_share_max() {
        let spec = build_chart(ChartKind::Radar, &sample(), (20, 100));
        let option = echarts_option(&spec);

        assert_eq!(
            option["radar"]["indicator"],
            json!([{ "name": "rust", "max": 5 }, { "name": "crab", "max": 5 }])
        );
        assert_eq!(option["series"][0]["data"][0]["value"], json!([5, 2]));
    }

    #[test]
    fn empty_specs_still_produce_options() {
        for kind in ChartKind::ALL {
            let spec = build_chart(kind, &RankedList::new(), (20, 100));
            let option = echarts_option(&spec);
            assert_eq!(option["title"]["text"], kind.title());
        }
    }

    #[test]
    fn html_page_embeds_option_at_display_height() {
        let spec = build_chart(ChartKind::Pie, &sample(), (20, 100));
        let html = EchartsRenderer::new(400).to_html(&spec).unwrap();

        assert!(html.contains("height:400px"));
        assert!(html.contains("<title>Word Frequency Pie Chart</title>"));
        assert!(html.contains(r#""type":"pie""#));
    }

    #[test]
    fn render_writes_html_file() {
        let path = std::env::temp_dir().join(format!("word_insights_test_{}.html", std::process::id()));
        let spec = build_chart(ChartKind::Line, &sample(), (20, 100));

        EchartsRenderer::new(400).render(&spec, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(written.contains(r#""type":"line""#));
    }
}
