mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};

use settings::Settings;

#[derive(Parser)]
#[command(name = "yagl", version, about = "Translate NFO/GRF files to and from YAGL text")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a GRF file into YAGL text.
    Decode {
        grf: PathBuf,
        /// Output file, defaults to the input name with a `.yagl` extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Encode YAGL text into a GRF file.
    Encode {
        yagl: PathBuf,
        /// Output file, defaults to the input name with a `.grf` extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let settings = Settings::load().wrap_err("failed to load yagl settings")?;

    let filter = match cli.verbose {
        0 => settings.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::new().parse_filters(filter).init();

    match cli.command {
        Command::Decode { grf, output } => {
            let output = output_path(&grf, output, &settings, "yagl");
            let bytes = fs::read(&grf).wrap_err_with(|| format!("failed to read {}", grf.display()))?;
            let text = yagl_data::decode(&bytes).wrap_err_with(|| format!("failed to decode {}", grf.display()))?;
            fs::write(&output, text).wrap_err_with(|| format!("failed to write {}", output.display()))?;
            log::info!("decoded {} to {}", grf.display(), output.display());
        }
        Command::Encode { yagl, output } => {
            let output = output_path(&yagl, output, &settings, "grf");
            let text =
                fs::read_to_string(&yagl).wrap_err_with(|| format!("failed to read {}", yagl.display()))?;
            let bytes = yagl_data::encode(&text).wrap_err_with(|| format!("failed to encode {}", yagl.display()))?;
            fs::write(&output, bytes).wrap_err_with(|| format!("failed to write {}", output.display()))?;
            log::info!("encoded {} to {}", yagl.display(), output.display());
        }
    }
    Ok(())
}

/// `-o` wins; otherwise the input renamed, placed in `output_dir` when set.
fn output_path(input: &Path, explicit: Option<PathBuf>, settings: &Settings, extension: &str) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let renamed = input.with_extension(extension);
    match (&settings.output_dir, renamed.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => renamed,
    }
}
