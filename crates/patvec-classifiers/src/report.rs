//! Cross-validation result artifacts: the JSON dump and the box-plot page.
use std::path::{Path, PathBuf};

use plotly::layout::{Axis, Layout};
use plotly::{BoxPlot, Plot};

use crate::cv::CvReport;
use crate::error::Result;

/// Write the full cross-validation results (fold scores, fit times,
/// estimator parameters) as pretty-printed JSON. Returns the file path.
pub fn write_cv_json(report: &CvReport, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join("cross_validation_results.json");
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Build the box plot of per-fold scores, one trace per metric.
pub fn cv_box_plot(report: &CvReport) -> Plot {
    let title = format!(
        "{}-fold cross-validation of {} ({})",
        report.folds,
        report.model,
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    );

    let mut plot = Plot::new();
    for (metric, values) in &report.scores {
        let trace = BoxPlot::new(values.clone()).name(metric);
        plot.add_trace(trace);
    }
    let layout = Layout::new()
        .title(title.as_str())
        .x_axis(Axis::new().title("Scoring metric"))
        .y_axis(Axis::new().title("Score"));
    plot.set_layout(layout);
    plot
}

/// Write the box-plot report as a standalone HTML file. Returns the path.
pub fn write_cv_report(report: &CvReport, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join("cv_box_plot.html");
    cv_box_plot(report).write_html(&path);
    Ok(path)
}
