//! Command-line argument definitions for the textgraph CLI.
//!
//! [`Args`] holds the options shared by every subcommand (configuration file
//! and log level); [`Command`] selects between a one-shot generation and the
//! HTTP service.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};

use textgraph::PipelineOptions;

/// Command-line arguments for the textgraph tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a graph image from a text file or stdin
    Generate(GenerateArgs),

    /// Serve the graph pipeline over HTTP
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Input text file; reads stdin when omitted or `-`
    pub input: Option<String>,

    /// Path to the output PNG file
    #[arg(short, long, default_value = "graph.png")]
    pub output: String,

    /// Also write the rendered scene as SVG
    #[arg(long)]
    pub svg: Option<String>,

    /// Also write the JSON result (entities, edges, counts and base64 image)
    #[arg(long)]
    pub json: Option<String>,

    /// Seed for the initial node placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Maximum number of entities laid out
    #[arg(long)]
    pub max_nodes: Option<usize>,

    /// Maximum number of simulation ticks
    #[arg(long)]
    pub ticks: Option<usize>,
}

impl GenerateArgs {
    /// Input path, or `None` for stdin
    pub fn input_path(&self) -> Option<&str> {
        self.input.as_deref().filter(|path| *path != "-")
    }

    /// Per-run overrides taken from the flags
    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            canvas_width: self.width,
            canvas_height: self.height,
            max_nodes: self.max_nodes,
            simulation_ticks: self.ticks,
            seed: self.seed,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_flags_become_options() {
        let args = Args::parse_from([
            "textgraph",
            "generate",
            "notes.txt",
            "--width",
            "320",
            "--seed",
            "7",
        ]);
        let Command::Generate(generate) = args.command else {
            panic!("Expected generate subcommand");
        };

        assert_eq!(generate.input_path(), Some("notes.txt"));
        assert_eq!(generate.output, "graph.png");
        let options = generate.options();
        assert_eq!(options.canvas_width, Some(320));
        assert_eq!(options.canvas_height, None);
        assert_eq!(options.seed, Some(7));
    }

    #[test]
    fn test_dash_reads_stdin() {
        let args = Args::parse_from(["textgraph", "generate", "-"]);
        let Command::Generate(generate) = args.command else {
            panic!("Expected generate subcommand");
        };
        assert_eq!(generate.input_path(), None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["textgraph", "serve", "--log-level", "debug"]);
        assert_eq!(args.log_level, "debug");
        let Command::Serve(serve) = args.command else {
            panic!("Expected serve subcommand");
        };
        assert_eq!(serve.listen, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    }
}
