use crate::error::Error;
use crate::error::*;
use crate::stats::RateMatrix;
use serde_json::json;
use snafu::ResultExt;
use std::fs;
use tracing::info;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Historical Failure Rate</title>
    <script src="https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js"></script>
</head>
<body>
    <div id="chart" style="width:900px;height:500px;"></div>
    <script>
        var chart = echarts.init(document.getElementById('chart'));
        chart.setOption(__OPTION__);
    </script>
</body>
</html>
"#;

/// Grouped bar chart of failure rates: one series per platform, one bar per
/// version label, percentage as bar height. Cells without data become null
/// gaps.
pub fn render(matrix: &RateMatrix, versions: &[String]) -> String {
    let series: Vec<serde_json::Value> = matrix
        .platforms
        .iter()
        .map(|row| {
            let data: Vec<serde_json::Value> = row
                .rates
                .iter()
                .map(|rate| match rate {
                    Some(value) => json!((value * 100.0).round() / 100.0),
                    None => serde_json::Value::Null,
                })
                .collect();
            json!({
                "name": row.platform,
                "type": "bar",
                "data": data,
            })
        })
        .collect();

    let option = json!({
        "title": { "text": "Historical Failure Rate" },
        "tooltip": { "show": true },
        "legend": { "show": true, "right": "80px" },
        "xAxis": { "type": "category", "data": versions },
        "yAxis": { "type": "value", "axisLabel": { "formatter": "{value} %" } },
        "series": series,
    });

    PAGE_TEMPLATE.replace("__OPTION__", &option.to_string())
}

pub fn write_to(path: &str, html: &str) -> Result<(), Error> {
    fs::write(path, html).context(WriteChartSnafu { path })?;
    info!(path, "chart written");
    Ok(())
}
