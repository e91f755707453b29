use std::fs;
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use pitest_cli::common::{DEFAULT_PORT, DEFAULT_RESOURCE_DIR, DEFAULT_STATIC_PREFIX};
use pitest_inspector::assets::AssetResolver;
use pitest_inspector::config::{Output, ServerConfig};
use pitest_inspector::{render_source_file, server};

#[derive(Parser)]
#[command(name = "pitest-inspector", version)]
#[command(about = "Shows PIT mutation results line by line over the mutated source.")]
#[command(styles = pitest_cli::common::clap_styles())]
struct Cli {
    #[clap(subcommand)]
    command: InspectorCommands,
}

#[derive(Subcommand, Debug)]
enum InspectorCommands {
    #[command(
        about = "Renders the mutation view of a single source file.",
        long_about = "Renders the mutation view of a single source file from the file and its measures json. Writes a standalone page, or only the source tab with --fragment.",
    )]
    Render {
        /// The source file to annotate.
        source: PathBuf,
        #[arg(short = 'm', long = "measures", value_name = "MEASURES_JSON")]
        measures: PathBuf,
        /// Write to this file instead of stdout.
        #[arg(short = 'o', long = "output", value_name = "HTML_PATH")]
        output: Option<PathBuf>,
        /// Only write the source tab, without the page around it.
        #[arg(long)]
        fragment: bool,
        #[arg(long, value_name = "URL", default_value = DEFAULT_STATIC_PREFIX)]
        static_prefix: String,
    },
    #[command(
        about = "Runs the viewer server.",
        long_about = "Runs the viewer server on the localhost address. Every request re-reads the source file and its measures, so results can be regenerated while the server runs.",
    )]
    #[command(arg_required_else_help = true)]
    Server {
        #[arg(short = 's', long = "source-dir", value_name = "SOURCE_DIR")]
        source_dir: PathBuf,
        #[arg(short = 'd', long = "measures-dir", value_name = "MEASURES_DIR")]
        measures_dir: PathBuf,
        #[arg(short = 'r', long = "resource-dir", value_name = "RESOURCE_DIR", default_value = DEFAULT_RESOURCE_DIR)]
        resource_dir: PathBuf,
        #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "pitest_inspector=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn render(source: &Path, measures: &Path, out: Option<&Path>, output: Output, static_prefix: &str) -> anyhow::Result<()> {
    let assets = AssetResolver::new(static_prefix);
    let html = render_source_file(source, measures, &assets, output)
        .with_context(|| format!("failed to render {}", source.display()))?;

    match out {
        Some(out) => {
            fs::write(out, html).with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(out = %out.display(), "report written");
        }
        None => stdout().write_all(html.as_bytes())?,
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Cli::parse();

    match args.command {
        InspectorCommands::Render { source, measures, output, fragment, static_prefix } => {
            let mode = if fragment { Output::Fragment } else { Output::Page };
            render(&source, &measures, output.as_deref(), mode, &static_prefix)
        }
        InspectorCommands::Server { source_dir, measures_dir, resource_dir, port } => {
            let conf = ServerConfig { port, source_dir, measures_dir, resource_dir };
            actix_web::rt::System::new().block_on(server::server(conf))?;
            Ok(())
        }
    }
}
