//! voct - volt/octave quantizer and oscillator patches
//!
//! Run with: cargo run -- play
//!       or: cargo run -- render oscillator --out vco.wav

mod app;
mod render;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use std::path::PathBuf;
use voct_dsp::config::PatchConfig;

#[derive(Parser, Debug)]
#[command(name = "voct", version, about = "Volt/octave quantizer and enveloped VCO")]
struct Cli {
    /// Patch configuration (TOML). Defaults match the hardware patches.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a patch offline to a mono float WAV file
    Render {
        #[command(subcommand)]
        patch: render::RenderPatch,
    },
    /// Play the quantizer into the oscillator, driven from the keyboard
    Play,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();
    let config = PatchConfig::load_or_default(cli.config.as_deref())
        .wrap_err("failed to load patch config")?;

    match cli.command {
        Command::Render { patch } => render::run(&config, &patch),
        Command::Play => app::play(&config),
    }
}
