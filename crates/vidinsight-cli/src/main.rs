//! Vidinsight CLI: upload an MP4 for analysis and follow its results.
//!
//! Set VIDINSIGHT_API_GATEWAY_URL (or API_GATEWAY_URL), or pass --gateway-url.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::sync::mpsc;
use vidinsight_api_client::{Gateway, GatewayClient};
use vidinsight_cli::prompt::spawn_stdin_prompt;
use vidinsight_cli::render::{render_page, render_view};
use vidinsight_cli::{init_tracing, Command, ConsoleShell, ResultPage, UploadPage, ViewState};
use vidinsight_core::{ClientConfig, Route, SelectedFile};

#[derive(Parser)]
#[command(name = "vidinsight", about = "Upload a video and follow its analysis")]
struct Cli {
    /// Gateway base URL (overrides VIDINSIGHT_API_GATEWAY_URL)
    #[arg(long, global = true)]
    gateway_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an MP4 and start its analysis
    Upload {
        /// Path to the video
        file: PathBuf,
        /// Content type to report instead of guessing from the extension
        #[arg(long)]
        content_type: Option<String>,
        /// Open the result page after the upload
        #[arg(long)]
        open: bool,
        /// Open the result page with auto-refresh on
        #[arg(long)]
        watch: bool,
    },
    /// Show results for a previously uploaded video
    Results {
        /// Result id, or its route (`/<id>`)
        route: String,
        /// Keep the page open with auto-refresh on
        #[arg(long)]
        watch: bool,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn print_state(state: &ViewState, format: OutputFormat) -> anyhow::Result<()> {
    match (format, state) {
        (OutputFormat::Json, ViewState::Loaded(result)) => print_json(result),
        _ => {
            println!("{}", render_view(state));
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let config = match cli.gateway_url {
        Some(url) => {
            let config = ClientConfig::new(url);
            config.validate()?;
            config
        }
        None => ClientConfig::from_process_env().context(
            "Failed to load configuration. Set VIDINSIGHT_API_GATEWAY_URL or pass --gateway-url",
        )?,
    };
    let gateway: Arc<dyn Gateway> = Arc::new(
        GatewayClient::from_config(&config).context("Failed to create gateway client")?,
    );

    match cli.command {
        Commands::Upload {
            file,
            content_type,
            open,
            watch,
        } => {
            let selected = SelectedFile::from_path(&file, content_type.as_deref())
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let mut page = UploadPage::new(Arc::clone(&gateway), ConsoleShell::default());
            if !page.select_file(selected) {
                anyhow::bail!("{} is not an MP4 video", file.display());
            }
            eprintln!("{} [{}]", page.display_text(), page.button_label());

            let Some(route) = page.analyze().await else {
                anyhow::bail!("Upload of {} failed", file.display());
            };
            println!("{}", route.path());

            if open || watch {
                if let Some(id) = route.result_id() {
                    show_results(gateway, &config, id, watch, OutputFormat::Text).await?;
                }
            }
        }
        Commands::Results {
            route,
            watch,
            format,
        } => {
            let route = Route::parse(&route).context("Invalid result route")?;
            let id = route
                .result_id()
                .context("`/` is the upload page; pass a result id")?;
            show_results(gateway, &config, id, watch, format).await?;
        }
    }

    Ok(())
}

async fn show_results(
    gateway: Arc<dyn Gateway>,
    config: &ClientConfig,
    id: &str,
    watch: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut page = ResultPage::new(gateway, id, config.refresh_interval);

    if !watch {
        let state = page.refresh().await;
        print_state(state, format)?;
        if let ViewState::Error(e) = state {
            return Err(anyhow::anyhow!("Failed to load results for {}: {}", id, e));
        }
        return Ok(());
    }

    let (tx, rx) = mpsc::channel(16);
    spawn_stdin_prompt(tx.clone()).context("Failed to start the command prompt")?;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Command::Quit).await;
        }
    });

    page.set_auto_refresh(true);
    page.run(rx, |page| {
        let printed = match (format, page.state()) {
            (OutputFormat::Json, ViewState::Loaded(result)) => print_json(result),
            _ => {
                println!("{}", render_page(page));
                Ok(())
            }
        };
        if let Err(e) = printed {
            tracing::error!(error = %e, "Failed to render result page");
        }
    })
    .await;

    Ok(())
}
