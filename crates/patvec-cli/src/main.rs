use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use patvec_cli::commands::classify::{run_classify, ClassifyArgs};
use patvec_cli::commands::embedding::run_binning;
use patvec_cli::commands::sample_scoring::{run_limma, run_ssgsea, run_z_score};

fn data_arg() -> Arg {
    Arg::new("data")
        .long("data")
        .help("Path to tab-separated gene expression data file")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn design_arg() -> Arg {
    Arg::new("design")
        .long("design")
        .help("Path to tab-separated experiment design file")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn out_arg() -> Arg {
    Arg::new("out")
        .long("out")
        .help("Path to the output file")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn control_arg() -> Arg {
    Arg::new("control")
        .long("control")
        .help("Group label of the control samples in the design table")
        .default_value("Control")
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .value_hint(ValueHint::Other)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("PATVEC_LOG", "error,patvec=info"))
        .init();

    let matches = Command::new("patvec")
        .version(clap::crate_version!())
        .about("patvec - score, embed, and classify patient expression profiles")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("sample-scoring")
                .about("Single-sample scoring methods")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("limma")
                        .about("Limma-style single-sample differential scoring")
                        .arg(data_arg())
                        .arg(design_arg())
                        .arg(out_arg())
                        .arg(
                            Arg::new("alpha")
                                .long("alpha")
                                .help("Significance level applied to adjusted p-values")
                                .default_value("0.05")
                                .value_parser(clap::value_parser!(f64)),
                        )
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .help("Multiple-testing adjustment method")
                                .default_value("fdr_bh")
                                .value_parser(["fdr_bh", "fdr_by", "bonferroni", "holm"]),
                        )
                        .arg(control_arg()),
                )
                .subcommand(
                    Command::new("z-score")
                        .about("Control-cohort z-score scoring")
                        .arg(data_arg())
                        .arg(design_arg())
                        .arg(out_arg())
                        .arg(control_arg()),
                )
                .subcommand(
                    Command::new("ssgsea")
                        .about("Single-sample gene-set enrichment scoring")
                        .arg(data_arg())
                        .arg(
                            Arg::new("gene_sets")
                                .long("gene-sets")
                                .help("Path to the .gmt gene set file")
                                .required(true)
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(out_arg())
                        .arg(
                            Arg::new("min_size")
                                .long("min-size")
                                .help("Skip gene sets with fewer matrix genes than this")
                                .default_value("2")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ),
        )
        .subcommand(
            Command::new("embedding")
                .about("Vectorization of score matrices")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("binning")
                        .about("Sign-binning of scores into {1, -1, 0} vectors")
                        .arg(
                            Arg::new("data")
                                .long("data")
                                .help("Path to a tab-separated score matrix")
                                .required(true)
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(out_arg()),
                ),
        )
        .subcommand(
            Command::new("classify")
                .about("Cross-validated classification of labeled embeddings")
                .arg(
                    Arg::new("data")
                        .long("data")
                        .help("Path to a tab-separated labeled embedding matrix")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("out_dir")
                        .long("out-dir")
                        .help("Directory for the cross-validation results")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("model")
                        .long("model")
                        .help("Model family to cross-validate [default: logistic_regression]")
                        .value_parser(["logistic_regression", "svm", "gbdt"]),
                )
                .arg(
                    Arg::new("folds")
                        .long("folds")
                        .help("Number of stratified cross-validation folds [default: 10]")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("metrics")
                        .long("metrics")
                        .help("Comma-separated scoring metrics [default: roc_auc,accuracy,f1]")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Shuffle seed for the fold split")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("Path to a JSON cross-validation configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable the box-plot HTML report")
                        .action(ArgAction::SetTrue),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("sample-scoring", sub_m)) => handle_sample_scoring(sub_m),
        Some(("embedding", sub_m)) => handle_embedding(sub_m),
        Some(("classify", sub_m)) => handle_classify(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_sample_scoring(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("limma", m)) => {
            let data: &PathBuf = m.get_one("data").unwrap();
            let design: &PathBuf = m.get_one("design").unwrap();
            let out: &PathBuf = m.get_one("out").unwrap();
            let alpha: f64 = *m.get_one("alpha").unwrap();
            let method: &String = m.get_one("method").unwrap();
            let control: &String = m.get_one("control").unwrap();
            run_limma(data, design, out, alpha, method, control)
        }
        Some(("z-score", m)) => {
            let data: &PathBuf = m.get_one("data").unwrap();
            let design: &PathBuf = m.get_one("design").unwrap();
            let out: &PathBuf = m.get_one("out").unwrap();
            let control: &String = m.get_one("control").unwrap();
            run_z_score(data, design, out, control)
        }
        Some(("ssgsea", m)) => {
            let data: &PathBuf = m.get_one("data").unwrap();
            let gene_sets: &PathBuf = m.get_one("gene_sets").unwrap();
            let out: &PathBuf = m.get_one("out").unwrap();
            let min_size: usize = *m.get_one("min_size").unwrap();
            run_ssgsea(data, gene_sets, out, min_size)
        }
        _ => unreachable!(),
    }
}

fn handle_embedding(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("binning", m)) => {
            let data: &PathBuf = m.get_one("data").unwrap();
            let out: &PathBuf = m.get_one("out").unwrap();
            run_binning(data, out)
        }
        _ => unreachable!(),
    }
}

fn handle_classify(matches: &ArgMatches) -> Result<()> {
    let args = ClassifyArgs {
        data: matches.get_one::<PathBuf>("data").unwrap().clone(),
        out_dir: matches.get_one::<PathBuf>("out_dir").unwrap().clone(),
        model: matches.get_one::<String>("model").cloned(),
        folds: matches.get_one::<usize>("folds").copied(),
        metrics: matches.get_one::<String>("metrics").cloned(),
        seed: matches.get_one::<u64>("seed").copied(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        write_report: !matches.get_flag("no_report"),
    };
    run_classify(&args)
}
