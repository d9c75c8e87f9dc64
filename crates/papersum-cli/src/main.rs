use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, fmt};

use papersum_core::config_file::{self, Settings};
use papersum_core::{
    ApiClient, BatchEvent, ModelConfig, ModelTestOutcome, ModelType, Operation, PaperApi,
    PaperStore, SearchRequest, SortBy, run_batch,
};

mod output;

use output::ColorMode;

/// Papersum - search arXiv papers and summarize them through the papersum API
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the papersum API (overrides PAPERSUM_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend service is up
    Health,

    /// Search papers and list the results
    Search {
        query: String,

        /// Number of results to request
        #[arg(long)]
        max_results: Option<u32>,

        /// Result ordering: relevance or latest
        #[arg(long)]
        sort: Option<SortBy>,
    },

    /// Search, select results by index, then summarize them one at a time
    Summarize {
        query: String,

        /// Comma-separated zero-based result indices, e.g. 0,2
        #[arg(long, value_delimiter = ',', required = true)]
        select: Vec<usize>,

        /// Number of results to request
        #[arg(long)]
        max_results: Option<u32>,

        /// Result ordering: relevance or latest
        #[arg(long)]
        sort: Option<SortBy>,
    },

    /// Show the active model and the available models
    Models,

    /// Ask the active model for a short test response
    TestModel,

    /// Switch the backend to another model
    Switch {
        /// openai or ollama
        model_type: ModelType,
        model_name: String,
    },

    /// Run the connectivity checks: health, models, model test, optional switch
    Check {
        /// Also switch to this model and test it, as type:name (e.g. ollama:llama2)
        #[arg(long)]
        switch_to: Option<String>,
    },

    /// Print the resolved configuration
    Config {
        /// Write the current settings to the platform config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Resolve config: CLI flags > env vars > config file > defaults
    let settings =
        Settings::from_file(&config_file::load_config()).with_api_url_override(cli.api_url);
    let color = ColorMode(!cli.no_color);
    let api = ApiClient::new(settings.api_base_url.clone());
    tracing::debug!(api = %api.base_url(), "resolved API base URL");

    let stdout = std::io::stdout();
    let mut w = stdout.lock();

    match cli.command {
        Command::Health => health(&api, &mut w, color).await,
        Command::Search {
            query,
            max_results,
            sort,
        } => {
            let request = build_request(&settings, &query, max_results, sort)?;
            search(&api, &mut w, color, &request).await
        }
        Command::Summarize {
            query,
            select,
            max_results,
            sort,
        } => {
            let request = build_request(&settings, &query, max_results, sort)?;
            summarize(&api, &mut w, color, &request, &select).await
        }
        Command::Models => models(&api, &mut w, color).await,
        Command::TestModel => test_model(&api, &mut w, color).await,
        Command::Switch {
            model_type,
            model_name,
        } => {
            let config = ModelConfig::new(model_type, model_name)?;
            switch(&api, &mut w, color, &config).await
        }
        Command::Check { switch_to } => {
            let switch_to = switch_to.as_deref().map(parse_model_spec).transpose()?;
            if check(&api, &mut w, color, switch_to.as_ref()).await? {
                Ok(())
            } else {
                anyhow::bail!("connectivity check failed")
            }
        }
        Command::Config { init } => show_config(&settings, &mut w, init),
    }
}

fn build_request(
    settings: &Settings,
    query: &str,
    max_results: Option<u32>,
    sort: Option<SortBy>,
) -> anyhow::Result<SearchRequest> {
    let request = SearchRequest::new(
        query,
        max_results.unwrap_or(settings.max_results),
        sort.unwrap_or(settings.sort_by),
    )?;
    Ok(request)
}

/// Parse `type:name`. Only the first colon splits, so `ollama:llama2:13b` works.
fn parse_model_spec(spec: &str) -> anyhow::Result<ModelConfig> {
    let (model_type, model_name) = spec
        .split_once(':')
        .with_context(|| format!("expected type:name, got '{spec}'"))?;
    Ok(ModelConfig::new(model_type.parse()?, model_name)?)
}

async fn health(api: &dyn PaperApi, w: &mut dyn Write, color: ColorMode) -> anyhow::Result<()> {
    match api.health().await {
        Ok(()) => {
            output::print_check(w, true, "API service is running", color)?;
            Ok(())
        }
        Err(e) => {
            output::print_check(w, false, &Operation::Health.failure_message(&e), color)?;
            Err(e.into())
        }
    }
}

async fn search(
    api: &dyn PaperApi,
    w: &mut dyn Write,
    color: ColorMode,
    request: &SearchRequest,
) -> anyhow::Result<()> {
    let papers = api
        .search(request)
        .await
        .map_err(|e| anyhow::anyhow!(Operation::Search.failure_message(e)))?;

    if papers.is_empty() {
        writeln!(w, "No papers found")?;
        return Ok(());
    }
    for (i, paper) in papers.iter().enumerate() {
        output::print_paper(w, i, paper, color)?;
    }
    Ok(())
}

async fn summarize(
    api: &dyn PaperApi,
    w: &mut dyn Write,
    color: ColorMode,
    request: &SearchRequest,
    select: &[usize],
) -> anyhow::Result<()> {
    let mut store = PaperStore::new();
    store.set_results(
        api.search(request)
            .await
            .map_err(|e| anyhow::anyhow!(Operation::Search.failure_message(e)))?,
    );
    writeln!(w, "Found {} papers", store.len())?;

    for &index in select {
        if index >= store.len() {
            tracing::warn!(index, found = store.len(), "selection index out of range, skipping");
        }
        store.select(index);
    }
    let papers = store.selected_papers();
    let titles: Vec<String> = papers.iter().map(|p| p.title.clone()).collect();

    let bar = ProgressBar::new(papers.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{pos}/{len}] {msg}")?
            .tick_chars("\u{280B}\u{2819}\u{2839}\u{2838}\u{283C}\u{2834}\u{2826}\u{2827}\u{2807}\u{280F} "),
    );
    bar.enable_steady_tick(Duration::from_millis(120));

    let board = run_batch(api, papers, |event| match event {
        BatchEvent::SlotStarted { position, .. } => {
            bar.set_message(format!("Summarizing: {}", titles[position]));
        }
        BatchEvent::SlotFinished { .. } => bar.inc(1),
    })
    .await;
    bar.finish_and_clear();
    let board = board?;

    writeln!(w)?;
    for slot in board.slots() {
        output::print_slot(w, slot, color)?;
    }
    output::print_batch_summary(w, board.len(), board.failed_count(), color)?;
    Ok(())
}

async fn models(api: &dyn PaperApi, w: &mut dyn Write, color: ColorMode) -> anyhow::Result<()> {
    let info = api
        .list_models()
        .await
        .map_err(|e| anyhow::anyhow!(Operation::ListModels.failure_message(e)))?;
    output::print_model_info(w, &info, color)?;
    Ok(())
}

/// Returns an error when the model reports failure, so the exit status reflects it.
async fn test_model(api: &dyn PaperApi, w: &mut dyn Write, color: ColorMode) -> anyhow::Result<()> {
    if run_model_test(api, w, color).await? {
        Ok(())
    } else {
        anyhow::bail!("model test failed")
    }
}

async fn run_model_test(
    api: &dyn PaperApi,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<bool> {
    let ok = match api.test_model().await {
        Ok(ModelTestOutcome::Success { response }) => {
            output::print_check(w, true, &format!("Model test passed: {response}"), color)?;
            true
        }
        Ok(ModelTestOutcome::Failure { error }) => {
            output::print_check(w, false, &format!("Model test failed: {error}"), color)?;
            false
        }
        Err(e) => {
            output::print_check(w, false, &Operation::ModelTest.failure_message(e), color)?;
            false
        }
    };
    Ok(ok)
}

async fn switch(
    api: &dyn PaperApi,
    w: &mut dyn Write,
    color: ColorMode,
    config: &ModelConfig,
) -> anyhow::Result<()> {
    match api.switch_model(config).await {
        Ok(active) => {
            output::print_check(
                w,
                true,
                &format!("Switched to {}", active.display_name()),
                color,
            )?;
            Ok(())
        }
        Err(e) => {
            let message = Operation::ModelSwitch.failure_message(&e);
            output::print_check(w, false, &message, color)?;
            Err(e.into())
        }
    }
}

/// Health, model info, model test, then an optional switch and re-test.
///
/// Stops at the first failing required step. Returns whether every step passed.
async fn check(
    api: &dyn PaperApi,
    w: &mut dyn Write,
    color: ColorMode,
    switch_to: Option<&ModelConfig>,
) -> anyhow::Result<bool> {
    if let Err(e) = api.health().await {
        output::print_check(w, false, &Operation::Health.failure_message(&e), color)?;
        writeln!(w, "The API service is not running; start the backend first.")?;
        return Ok(false);
    }
    output::print_check(w, true, "API service is running", color)?;

    match api.list_models().await {
        Ok(info) => output::print_model_info(w, &info, color)?,
        Err(e) => {
            output::print_check(w, false, &Operation::ListModels.failure_message(&e), color)?;
            return Ok(false);
        }
    }

    if !run_model_test(api, w, color).await? {
        return Ok(false);
    }

    let Some(target) = switch_to else {
        return Ok(true);
    };
    match api.switch_model(target).await {
        Ok(active) => {
            output::print_check(
                w,
                true,
                &format!("Switched to {}", active.display_name()),
                color,
            )?;
            run_model_test(api, w, color).await
        }
        Err(e) => {
            output::print_check(w, false, &Operation::ModelSwitch.failure_message(&e), color)?;
            Ok(false)
        }
    }
}

fn show_config(settings: &Settings, w: &mut dyn Write, init: bool) -> anyhow::Result<()> {
    writeln!(w, "api.base_url       = {}", settings.api_base_url)?;
    writeln!(w, "search.max_results = {}", settings.max_results)?;
    writeln!(w, "search.sort_by     = {}", settings.sort_by.as_str())?;
    writeln!(w, "display.theme      = {}", settings.theme)?;
    writeln!(w, "display.fps        = {}", settings.fps)?;
    match config_file::config_path() {
        Some(path) => writeln!(w, "config file: {}", path.display())?,
        None => writeln!(w, "config file: (no config directory)")?,
    }

    if init {
        let path = config_file::save_config(&settings.to_config_file())
            .map_err(|e| anyhow::anyhow!(e))?;
        writeln!(w, "wrote {}", path.display())?;
    }
    Ok(())
}
