//! CLI logic for the textgraph tool.
//!
//! `textgraph generate` runs one text through the pipeline and writes the
//! image to disk; `textgraph serve` exposes the pipeline over HTTP.

pub mod error_adapter;
pub mod server;

mod args;
mod config;
mod error;

pub use args::{Args, Command, GenerateArgs, ServeArgs};
pub use error::CliError;
pub use error_adapter::ErrorAdapter;

use std::{fs, sync::Arc};

use log::{info, warn};
use tokio::io::AsyncReadExt;

use textgraph::{
    CancelToken, Pipeline, config::AppConfig, export::svg::render_svg, raster::PngRasterizer,
};
use textgraph_extract::{ChatModel, OpenAiChatModel};

/// Run the textgraph CLI application
///
/// Loads the configuration, builds the model client and rasterizer, then
/// dispatches to the selected subcommand.
///
/// # Errors
///
/// Returns `CliError` for:
/// - Configuration loading errors
/// - File I/O errors
/// - Pipeline failures, tagged with their stage
pub async fn run(args: &Args) -> Result<(), CliError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let model: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::new(app_config.model().clone())?);

    match &args.command {
        Command::Generate(generate) => run_generate(generate, app_config, model).await,
        Command::Serve(serve) => {
            let state = server::AppState::new(app_config, model, Arc::new(PngRasterizer::new()));
            server::serve(serve.listen, state).await
        }
    }
}

/// Runs one generation with an already built model client.
///
/// # Errors
///
/// See [`run`].
pub async fn run_generate(
    args: &GenerateArgs,
    app_config: AppConfig,
    model: Arc<dyn ChatModel>,
) -> Result<(), CliError> {
    info!(
        input_path = args.input_path().unwrap_or("<stdin>"),
        output_path = args.output;
        "Generating graph"
    );

    let text = read_input(args).await?;

    let pipeline = Pipeline::new(app_config, model, Arc::new(PngRasterizer::new()))
        .with_options(&args.options());
    let cancel = cancel_on_ctrl_c();
    let generated = pipeline.generate(&text, &cancel).await?;

    fs::write(&args.output, generated.image())?;
    info!(output_file = args.output; "PNG exported successfully");

    if let Some(svg_path) = &args.svg {
        fs::write(svg_path, render_svg(generated.scene()))?;
        info!(output_file = svg_path; "SVG exported successfully");
    }

    if let Some(json_path) = &args.json {
        fs::write(json_path, serde_json::to_string_pretty(generated.result())?)?;
        info!(output_file = json_path; "JSON result exported successfully");
    }

    Ok(())
}

async fn read_input(args: &GenerateArgs) -> Result<String, CliError> {
    match args.input_path() {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            Ok(text)
        }
    }
}

/// Token cancelled on the first Ctrl-C
fn cancel_on_ctrl_c() -> CancelToken {
    let cancel = CancelToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Cancellation requested");
                token.cancel();
            }
            Err(err) => warn!(err:err; "Failed to listen for Ctrl-C"),
        }
    });
    cancel
}
