use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing::{debug, error, info, trace, warn};

use ono::config::OnoConfig;
use ono::context::GLOBAL_SCOPE;
use ono::discovery::{discover_inputs, output_name};
use ono::formats::{infer_format, validate_output, FormatRegistry};
use ono::llm::{HttpGenerator, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};
use ono::metadata::BuildMetadata;
use ono::pipeline::Pipeline;

/// Universal templating preprocessor that uses AI to solve those annoying
/// cross-platform, language-specific problems you don't want to think about.
#[derive(Parser)]
#[command(name = "ono")]
#[command(about = "Universal AI-powered templating preprocessor", long_about = None)]
struct Cli {
    /// Directory, file, or list from globs like *.ono
    input: String,

    /// File that establishes context
    #[arg(short, long)]
    context: Option<PathBuf>,

    /// Destination format, inferred from the file extension if omitted
    #[arg(short, long)]
    format: Option<String>,

    /// A place to put the output of the program
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        2 => "trace",
        _ => "trace,hyper=debug,tower=debug",
    };

    // Processed documents go to stdout; keep all diagnostics on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_thread_ids(cli.verbose >= 3)
        .with_line_number(cli.verbose >= 3)
        .with_writer(std::io::stderr)
        .init();

    debug!("ono started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli).await {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = OnoConfig::load();
    let registry = FormatRegistry::with_builtins();

    let inputs = discover_inputs(&cli.input)?;
    if inputs.is_empty() {
        warn!("no documents found under {}", cli.input);
        return Ok(());
    }

    // Settle every document's format up front; an unknown or uninferrable
    // format aborts the run before any resolution starts.
    let mut jobs: Vec<(PathBuf, String)> = Vec::with_capacity(inputs.len());
    for path in inputs {
        let format = match &cli.format {
            Some(f) => f.clone(),
            None => infer_format(&path)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "cannot infer format for {}; pass --format",
                        path.display()
                    )
                })?
                .to_string(),
        };
        registry.get(&format)?;
        jobs.push((path, format));
    }

    let generator = Arc::new(HttpGenerator::new(
        config.get_api_url().unwrap_or_default().to_string(),
        config.get_api_key().unwrap_or_default().to_string(),
        DEFAULT_MAX_RETRIES,
        DEFAULT_RETRY_DELAY_MS,
    )?);

    let mut pipeline =
        Pipeline::new(generator).with_max_concurrent(config.get_max_concurrent());
    if let Some(model) = config.get_model() {
        pipeline = pipeline.with_model(model);
    }

    let mut seed = config.get_context();
    if let Some(context_path) = &cli.context {
        seed.extend(load_context_file(context_path)?);
    }
    if !seed.is_empty() {
        pipeline.store().update(GLOBAL_SCOPE, seed);
    }

    let metadata = BuildMetadata::new();
    let multiple = jobs.len() > 1;
    if multiple {
        if let Some(out_dir) = &cli.output {
            fs::create_dir_all(out_dir)
                .with_context(|| format!("creating output directory {}", out_dir.display()))?;
        }
    }

    for (path, format) in &jobs {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;

        let (mut output_text, failure) = pipeline.process_with_fallback(&text, format).await;
        match failure {
            Some(e) => warn!("{}: {e}; wrote original text", path.display()),
            None => {
                report_validation(path, format, &output_text);
                if config.get_stamp() {
                    let prefix = registry.get(format)?.comment_prefix();
                    if let Some(stamp) =
                        metadata.stamp_comment(&path.display().to_string(), prefix)
                    {
                        output_text = format!("{stamp}{output_text}");
                    }
                }
            }
        }

        write_output(cli.output.as_deref(), path, multiple, &output_text)?;
    }

    Ok(())
}

fn report_validation(path: &Path, format: &str, text: &str) {
    let report = validate_output(text, format);
    for issue in report.errors.iter().chain(report.warnings.iter()) {
        warn!("{}: {issue}", path.display());
    }
}

/// Read the `--context` file. A YAML mapping contributes its entries to the
/// global scope; any other content is kept whole under the `background` key.
fn load_context_file(path: &Path) -> anyhow::Result<HashMap<String, Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading context file {}", path.display()))?;

    match serde_yaml::from_str::<serde_yaml::Value>(&content) {
        Ok(serde_yaml::Value::Mapping(mapping)) => {
            let mut entries = HashMap::new();
            for (key, value) in mapping {
                if let (Some(key), Ok(value)) = (key.as_str(), serde_json::to_value(&value)) {
                    entries.insert(key.to_string(), value);
                }
            }
            Ok(entries)
        }
        _ => Ok(HashMap::from([(
            "background".to_string(),
            Value::String(content),
        )])),
    }
}

fn write_output(
    output: Option<&Path>,
    input: &Path,
    multiple: bool,
    text: &str,
) -> anyhow::Result<()> {
    let Some(output) = output else {
        print!("{text}");
        return Ok(());
    };

    let dest = if multiple || output.is_dir() {
        let name = output_name(input);
        let file_name = name
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        output.join(file_name)
    } else {
        output.to_path_buf()
    };

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }

    fs::write(&dest, text).with_context(|| format!("writing {}", dest.display()))?;
    info!("{} -> {}", input.display(), dest.display());
    Ok(())
}
