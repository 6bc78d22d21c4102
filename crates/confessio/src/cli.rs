//! Command line interface.

use clap::{Parser, Subcommand};
use confessio::{Pipeline, PipelineConfig, RunSettings};
use confessio_error::ConfessioResult;
use confessio_gemini::GeminiClient;
use confessio_publish::{CloudinaryClient, GraphClient};
use confessio_render::FontAsset;
use confessio_sheets::SheetsClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Scheduled confession publishing pipeline.
#[derive(Debug, Parser)]
#[command(name = "confessio", version, about)]
pub struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Execute one batch run
    Run,
    /// Load the configuration and report what a run would use
    Check,
}

/// Install the log subscriber.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

impl Cli {
    /// Dispatch the chosen subcommand.
    pub async fn execute(&self) -> ConfessioResult<()> {
        match self.command {
            Command::Run => run().await,
            Command::Check => check(),
        }
    }
}

async fn run() -> ConfessioResult<()> {
    let config = PipelineConfig::load()?;
    let font = FontAsset::load(&config.font_path)?;

    let store = SheetsClient::new(config.sheet_id.clone(), config.sheets_token.clone());
    let curator = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.moderation_model.clone(),
        config.selection_model.clone(),
        config.moderation_fail_mode,
    );
    let host = CloudinaryClient::new(
        config.cloudinary_cloud_name.clone(),
        config.cloudinary_api_key.clone(),
        config.cloudinary_api_secret.clone(),
    );
    let publisher = GraphClient::new(
        config.graph_api_version.clone(),
        config.instagram_account_id.clone(),
        config.facebook_app_id.clone(),
        config.facebook_app_secret.clone(),
    );

    let settings = RunSettings {
        max_posts_per_run: config.max_posts_per_run,
        fetch_window: config.fetch_window,
        token_refresh_days: config.token_refresh_days,
    };
    let pipeline = Pipeline::new(
        &store,
        &curator,
        &host,
        &publisher,
        config.style(),
        &font,
        config.scratch_dir.clone(),
        settings,
    );

    let report = pipeline.run().await?;
    info!(%report, "Pipeline finished");
    Ok(())
}

fn check() -> ConfessioResult<()> {
    let config = PipelineConfig::load()?;
    info!(
        sheet_id = %config.sheet_id,
        moderation_model = %config.moderation_model,
        selection_model = %config.selection_model,
        fail_mode = %config.moderation_fail_mode,
        max_posts = config.max_posts_per_run,
        fetch_window = config.fetch_window,
        token_refresh_days = config.token_refresh_days,
        font = %config.font_path.display(),
        scratch = %config.scratch_dir.display(),
        "Configuration loads cleanly"
    );
    FontAsset::load(&config.font_path)?;
    info!("Font parses cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_run() {
        let cli = Cli::try_parse_from(["confessio", "run"]).unwrap();
        assert!(matches!(cli.command, Command::Run));
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_parses_verbose_check() {
        let cli = Cli::try_parse_from(["confessio", "--verbose", "check"]).unwrap();
        assert!(matches!(cli.command, Command::Check));
        assert!(cli.verbose);
    }
}
