use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "embedkit")]
#[command(about = "embedkit CLI - author, validate, store and page through chat embeds", long_about = None)]
struct Cli {
    /// Config file (defaults to $EMBEDKIT_CONFIG or ~/.config/embedkit/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store partition (defaults to [storage].default_partition)
    #[arg(long, short, global = true)]
    partition: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Where an embed is read from. With neither flag, stdin is read where allowed.
#[derive(clap::Args, Default)]
pub struct InputArgs {
    /// A .json or .txt file
    #[arg(long, short, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Inline JSON or shorthand
    #[arg(long, short)]
    text: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that input converts into a valid embed
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Convert input and store it under a name
    Save {
        name: String,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print a stored embed as JSON
    Get { name: String },
    /// List stored embed names
    List,
    /// Delete a stored embed
    Delete { name: String },
    /// Write a stored embed to <name>.json
    Export {
        name: String,
        /// Output directory
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },
    /// Page through every stored embed in the terminal
    Show,
    /// Page through the JSON source of an embed in the terminal.
    /// Controls are read from stdin, so input must come from --file or --text.
    Source {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the resolved config file path
    ConfigPath,
}

#[tokio::main]
async fn main() -> Result<()> {
    embedkit_application::logging::init_tracing("warn");

    let cli = Cli::parse();
    let ctx = commands::Context::load(cli.config, cli.partition).await?;

    match cli.command {
        Commands::Validate { input } => commands::store::validate(&ctx, input).await?,
        Commands::Save { name, input } => commands::store::save(&ctx, &name, input).await?,
        Commands::Get { name } => commands::store::get(&ctx, &name).await?,
        Commands::List => commands::store::list(&ctx).await?,
        Commands::Delete { name } => commands::store::delete(&ctx, &name).await?,
        Commands::Export { name, out } => commands::store::export(&ctx, &name, &out).await?,
        Commands::Show => commands::view::show(&ctx).await?,
        Commands::Source { input } => commands::view::source(&ctx, input).await?,
        Commands::ConfigPath => println!("{}", ctx.config_path.display()),
    }

    Ok(())
}
