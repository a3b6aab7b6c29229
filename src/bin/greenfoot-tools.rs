//! Scenario tooling: class diagrams, release packages and config checks

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use greenfoot::core::{CONFIG_FILE, Config};
use greenfoot::diagram::{self, DiagramOptions};
use greenfoot::release::{self, PACKAGE_NAME, PackageOptions, ReleaseTag};

#[derive(Parser, Debug)]
#[command(name = "greenfoot-tools")]
#[command(about = "Tooling for greenfoot scenarios")]
struct Args {
    /// Configuration file
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the PlantUML class diagram of a source tree
    Diagram {
        /// Directory scanned for `.rs` files
        #[arg(default_value = "src")]
        source: PathBuf,

        /// Output directory, overriding the configuration
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Zip a package for a tagged release and print its manifest
    Package {
        /// Release tag, e.g. v1.2.0 or refs/tags/v1.2.0
        tag: String,

        /// Directory to archive
        #[arg(long, default_value = "src")]
        source: PathBuf,

        /// Package name used for the asset and its top-level directory
        #[arg(long, default_value = PACKAGE_NAME)]
        name: String,

        #[arg(long, default_value = "CHANGELOG.md")]
        changelog: PathBuf,

        /// Where the archive is written
        #[arg(long, default_value = "target/release-assets")]
        out_dir: PathBuf,
    },

    /// Parse the configuration and print it back in canonical form
    CheckConfig,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::Diagram { source, out_dir } => {
            let config = Config::load_or_default(&args.config)?;
            let mut options = DiagramOptions::from_config(&config, source);
            if let Some(out_dir) = out_dir {
                options.output_dir = out_dir;
            }
            let path = diagram::generate(&options)?;
            println!("{}", path.display());
        }
        Command::Package {
            tag,
            source,
            name,
            changelog,
            out_dir,
        } => {
            let options = PackageOptions {
                source_dir: source,
                name,
                tag: ReleaseTag::parse(&tag)?,
                changelog,
                out_dir,
            };
            let manifest = release::package(&options)?;
            println!("{}", manifest.to_json()?);
        }
        Command::CheckConfig => {
            let config = Config::load(&args.config)?;
            print!("{}", config.to_cfg_string());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
