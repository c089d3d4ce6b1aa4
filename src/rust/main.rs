use std::io::{self, BufRead};
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use textcat::{BayesClassifier, HarnessConfig, ModelStore, PipelineReport, TextClassifier, TrainingPipeline};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a classifier from a tab-separated file and export it
    Train {
        /// Training data: one `text<TAB>category` example per line
        data_file: PathBuf,
        /// Name of the exported model
        output_name: String,
        /// Seed for the train/test shuffle
        #[arg(long)]
        seed: Option<u64>,
        /// Share of examples used for training
        #[arg(long)]
        train_fraction: Option<f64>,
        /// Directory the model is exported under
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Classify text with an exported model (binary or JSON)
    Test {
        model_path: PathBuf,
        /// Texts to classify; reads lines from stdin when omitted
        texts: Vec<String>,
    },
}

fn main() -> Result<()> {
    textcat::init_logger();
    let args = Args::parse();

    match args.command {
        Command::Train {
            data_file,
            output_name,
            seed,
            train_fraction,
            output_dir,
        } => {
            let mut config = HarnessConfig::from_env()?;
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(fraction) = train_fraction {
                config = config.with_train_fraction(fraction)?;
            }
            if let Some(dir) = output_dir {
                config = config.with_models_dir(dir);
            }

            let report = TrainingPipeline::new(config)
                .run(&data_file, &output_name)
                .with_context(|| format!("training from {} failed", data_file.display()))?;
            print_report(&report);
        }
        Command::Test { model_path, texts } => {
            let classifier: BayesClassifier = ModelStore::load_classifier(&model_path)
                .with_context(|| format!("could not load model {}", model_path.display()))?;
            info!(
                "Loaded model with {} categories and {} known tokens",
                classifier.categories().len(),
                classifier.vocabulary_size()
            );

            if texts.is_empty() {
                for line in io::stdin().lock().lines() {
                    let line = line?;
                    if !line.trim().is_empty() {
                        process_input(&classifier, &line)?;
                    }
                }
            } else {
                for text in &texts {
                    process_input(&classifier, text)?;
                }
            }
        }
    }

    Ok(())
}

fn print_report(report: &PipelineReport) {
    println!("Dataset: {} examples ({} malformed lines skipped)", report.dataset_size, report.skipped_lines);
    println!("  Training: {}", report.train_size);
    println!("  Test:     {}", report.test_size);
    println!("Training time: {:.2?}", report.training.elapsed);
    println!("Vocabulary size: {}", report.metadata.vocabulary_size);
    println!();
    println!("Accuracy: {:.2}%", report.evaluation.accuracy * 100.0);
    println!();
    println!("Per-category metrics:");
    for (category, metrics) in &report.evaluation.metrics {
        println!(
            "  {}: precision {:.2}%, recall {:.2}%, f1 {:.2}%",
            category,
            metrics.precision * 100.0,
            metrics.recall * 100.0,
            metrics.f1 * 100.0
        );
    }
    println!();
    println!("Confusion matrix (rows: actual, columns: predicted):");
    print!("{}", report.evaluation.matrix);
    println!();
    println!("Model:    {}", report.exported.model_path.display());
    println!("JSON:     {}", report.exported.json_path.display());
    println!("Metadata: {}", report.exported.metadata_path.display());
}

fn process_input(classifier: &BayesClassifier, text: &str) -> Result<()> {
    let scores = classifier.classify(text)?;
    let category = classifier.classify_category(text)?;

    let mut scores: Vec<_> = scores.into_iter().collect();
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    println!("\n{}", text);
    println!("  Predicted category: {}", category);
    for (label, score) in scores {
        println!("    {}: {:.2}%", label, score);
    }
    Ok(())
}
