// HTML page rendering
//
// The page holds one canvas per chart and hands the server-built Chart.js
// configurations to the browser. The only client-side logic is the tooltip
// title (each point carries its own date label) and the date tick format.
use crate::application::chart_service::ChartPage;
use crate::domain::chart::ChartLayout;
use crate::domain::reach::ReachSummary;

const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js@2.9.4/dist/Chart.min.js";

const RENDER_SCRIPT: &str = r#"
(function () {
  var charts = JSON.parse(document.getElementById("chartData").textContent);
  charts.forEach(function (chart) {
    var config = chart.config;
    config.options.tooltips.callbacks = {
      title: function (items, data) {
        var item = items[0];
        return data.datasets[item.datasetIndex].data[item.index].label;
      }
    };
    config.options.scales.xAxes[0].ticks = {
      callback: function (value) { return new Date(value).toISOString().slice(0, 10); }
    };
    new Chart(document.getElementById(chart.canvas).getContext("2d"), config);
  });
})();
"#;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// JSON inside <script> must not be able to close the tag
fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn summary_html(summary: &ReachSummary) -> String {
    let mut parts = vec![
        format!("{} domain(s) attempted", summary.total),
        format!(
            "{} reachable ({:.1}%)",
            summary.reachable, summary.reachable_percent
        ),
    ];
    if let Some(multi_rtt) = summary.multi_rtt {
        parts.push(format!("{} required multiple round trips", multi_rtt));
    }
    if let Some(too_much) = summary.too_much {
        parts.push(format!("{} exceeded amplification limits", too_much));
    }
    if let Some(retry) = summary.retry {
        parts.push(format!("{} sent RETRY packets", retry));
    }

    format!(
        "<p class=\"summary\">Latest run {}: {}</p>",
        escape_html(&summary.time_label),
        escape_html(&parts.join(", "))
    )
}

fn chart_block(title: &str, canvas: &str) -> String {
    format!(
        "<h2>{}</h2>\n<div class=\"chart\"><canvas id=\"{}\"></canvas></div>\n",
        escape_html(title),
        escape_html(canvas)
    )
}

fn document(body: &str, script: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>QUIC Reachability</title>\n\
         <style>body{{font-family:sans-serif;color:#5a5c69;margin:2rem}}\
         .chart{{position:relative;height:320px;margin-bottom:2rem}}\
         .unavailable{{color:#e74a3b}}</style>\n\
         </head>\n<body>\n<h1>QUIC Reachability</h1>\n{}\n{}</body>\n</html>\n",
        body, script
    )
}

pub fn render_page(page: &ChartPage) -> serde_json::Result<String> {
    let mut body = String::new();
    if let Some(summary) = &page.summary {
        body.push_str(&summary_html(summary));
        body.push('\n');
    }

    for chart in &page.charts {
        body.push_str(&chart_block(&chart.title, &chart.canvas));
    }

    let data = serde_json::to_string(&page.charts)?;
    let script = format!(
        "<script src=\"{}\"></script>\n\
         <script id=\"chartData\" type=\"application/json\">{}</script>\n\
         <script>{}</script>\n",
        CHART_JS_URL,
        script_safe_json(&data),
        RENDER_SCRIPT
    );

    Ok(document(&body, &script))
}

/// Page shown when the feed could not be loaded. Canvases are still laid out
/// so the page keeps its shape.
pub fn render_unavailable(layouts: &[ChartLayout]) -> String {
    let mut body = String::from("<p class=\"unavailable\">Reachability data unavailable.</p>\n");
    for layout in layouts {
        body.push_str(&chart_block(&layout.title, &layout.canvas));
    }

    document(&body, "")
}
