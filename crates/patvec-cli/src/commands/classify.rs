//! Classification command implementation.
use std::path::PathBuf;

use anyhow::{Context, Result};

use patvec_classifiers::config::{load_cv_config, CvConfig, ModelKind};
use patvec_classifiers::cv::cross_validate;
use patvec_classifiers::dataset::read_labeled_tsv;
use patvec_classifiers::metrics::Metric;
use patvec_classifiers::report::{write_cv_json, write_cv_report};

/// Arguments of the `classify` command; optional fields override the JSON
/// config (or the built-in defaults) only when given on the command line.
#[derive(Debug, Clone)]
pub struct ClassifyArgs {
    pub data: PathBuf,
    pub out_dir: PathBuf,
    pub model: Option<String>,
    pub folds: Option<usize>,
    pub metrics: Option<String>,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub write_report: bool,
}

/// Cross-validate a classifier over a labeled embedding matrix and write
/// the JSON results (and optionally the box-plot report) to the output
/// directory.
pub fn run_classify(args: &ClassifyArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            eprintln!("[patvec::classify] using config {}", path.display());
            load_cv_config(path)?
        }
        None => CvConfig::default(),
    };

    if let Some(model) = &args.model {
        config.model = model.parse::<ModelKind>().map_err(anyhow::Error::msg)?;
    }
    if let Some(folds) = args.folds {
        config.folds = folds;
    }
    if let Some(metrics) = &args.metrics {
        config.metrics = metrics
            .split(',')
            .map(|m| m.trim().parse::<Metric>().map_err(anyhow::Error::msg))
            .collect::<Result<Vec<_>>>()?;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    if args.config.is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        eprintln!(
            "[patvec::classify] no config provided; effective config:\n{}",
            default_json
        );
    }

    let dataset = read_labeled_tsv(&args.data)
        .with_context(|| format!("failed to read labeled dataset {}", args.data.display()))?;
    eprintln!(
        "[patvec::classify] {} samples x {} features (classes: {} / {})",
        dataset.n_samples(),
        dataset.n_features(),
        dataset.classes[0],
        dataset.classes[1]
    );

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let report = cross_validate(&dataset, &config)?;
    let json_path = write_cv_json(&report, &args.out_dir)?;
    eprintln!("[patvec::classify] wrote {}", json_path.display());

    if args.write_report {
        let html_path = write_cv_report(&report, &args.out_dir)?;
        eprintln!("[patvec::classify] wrote {}", html_path.display());
    }

    eprintln!(
        "[patvec::classify] completed {}-fold cross-validation of {}",
        report.folds, report.model
    );
    Ok(())
}
