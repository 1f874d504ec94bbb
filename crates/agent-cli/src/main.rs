//! Command-line interface for news-agent-rs
//!
//! ```bash
//! news-agent init-env
//! news-agent analyze --model gpt-4o-mini --symbols AAPL,MSFT
//! news-agent analyze --model deepseek-chat --symbols TSLA --date 2024-06-03 --full
//! news-agent templates
//! ```

use agent_stock::{InfoRecord, StockConfig};
use agent_stock::prompts::{NETWORK_EFFECT, build_catalog};
use agent_utils::{EnvSource, LogFormat};
use agent_workflow::{AnalysisRequest, analyze_stocks_advanced};
use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "news-agent")]
#[command(about = "Network-effect analysis of stock news with LLMs", long_about = None)]
struct Args {
    /// Log output format (pretty or json)
    #[arg(long, global = true, default_value = "pretty")]
    log_format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline for a list of symbols
    Analyze {
        /// Model identifier; selects the backend (gpt-*, deepseek-*)
        #[arg(long, default_value = "gpt-4o-mini")]
        model: String,

        /// Comma-separated ticker symbols
        #[arg(long, value_delimiter = ',', required = true)]
        symbols: Vec<String>,

        /// Comma-separated style tags, one per symbol, or one for all
        #[arg(long, value_delimiter = ',', default_value = NETWORK_EFFECT)]
        styles: Vec<String>,

        /// Trading day to analyse (YYYY-MM-DD); live snapshot when omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        /// JSON file with per-symbol `today_info` and `prompt_params` lists
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Print the full pipeline state as JSON
        #[arg(long)]
        full: bool,
    },

    /// List prompt templates and their placeholders
    Templates,

    /// Write a .env skeleton with the recognised keys
    InitEnv {
        #[arg(long, default_value = ".env")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Contents of an `--overrides` file
#[derive(Debug, Default, Deserialize)]
struct Overrides {
    #[serde(default)]
    today_info: Option<Vec<Option<InfoRecord>>>,
    #[serde(default)]
    prompt_params: Option<Vec<Option<InfoRecord>>>,
}

const ENV_TEMPLATE: &str = "\
# OpenAI (models starting with gpt)
OPENAI_API_KEY=your_openai_api_key_here
OPENAI_BASE_URL=https://api.openai.com/v1

# DeepSeek (models starting with deepseek)
DEEPSEEK_API_KEY=your_deepseek_api_key_here
DEEPSEEK_BASE_URL=https://api.deepseek.com/v1

# Pipeline files
STOCK_HISTORY_FILE=data/stock_history.json
# PROMPT_TEMPLATES_DIR=prompts/

# LLM call settings
ANALYSIS_MAX_TOKENS=1000
ANALYSIS_TEMPERATURE=0.3
LLM_TIMEOUT_SECS=120
";

/// One style applies to every symbol
fn expand_styles(styles: Vec<String>, symbols: usize) -> Vec<String> {
    match styles.as_slice() {
        [single] => vec![single.clone(); symbols],
        _ => styles,
    }
}

fn read_overrides(path: &Path) -> anyhow::Result<Overrides> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read overrides file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid overrides file {}", path.display()))
}

fn init_env(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; use --force to overwrite", path.display());
    }
    std::fs::write(path, ENV_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {}; fill in your API keys before running analyze", path.display());
    Ok(())
}

async fn analyze(
    model: String,
    symbols: Vec<String>,
    styles: Vec<String>,
    date: Option<NaiveDate>,
    overrides: Option<PathBuf>,
    full: bool,
) -> anyhow::Result<()> {
    let source = EnvSource::with_dotenv();
    let styles = expand_styles(styles, symbols.len());

    let mut request = AnalysisRequest::new(model, symbols, styles);
    request.date = date;
    if let Some(path) = overrides {
        let overrides = read_overrides(&path)?;
        request.today_info = overrides.today_info;
        request.prompt_params = overrides.prompt_params;
    }

    info!("Analyzing {} symbols with {}", request.symbols.len(), request.model);
    let state = analyze_stocks_advanced(request, &source).await?;

    if full {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let results = state.analysis_results.unwrap_or_default();
    for (symbol, result) in state.stock_list.iter().zip(results) {
        println!("=== {symbol} ===\n{result}\n");
    }
    Ok(())
}

fn list_templates() -> anyhow::Result<()> {
    let config = StockConfig::from_source(&EnvSource::with_dotenv())?;
    let catalog = build_catalog(config.templates_dir.as_deref())?;

    for name in catalog.names() {
        let template = catalog.get(&name)?;
        println!("{name}: {}", template.placeholders().join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    agent_utils::init_tracing_with(LogFormat::from_name(&args.log_format));

    match args.command {
        Command::Analyze {
            model,
            symbols,
            styles,
            date,
            overrides,
            full,
        } => analyze(model, symbols, styles, date, overrides, full).await,
        Command::Templates => list_templates(),
        Command::InitEnv { path, force } => init_env(&path, force),
    }
}
