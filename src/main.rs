use anyhow::{Context, Result, ensure};
use clap::Parser;
use snake_tui::game::GameConfig;
use snake_tui::modes::HumanMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_tui")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value_t = 26)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 26)]
    height: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    ensure!(
        cli.width >= 4 && cli.height >= 4,
        "grid must be at least 4x4"
    );

    init_tracing()?;

    let config = GameConfig::new(cli.width, cli.height);
    let mut mode = HumanMode::new(config);
    mode.run().await?;

    Ok(())
}

/// The TUI owns the terminal, so logs go to a file instead, and only when
/// SNAKE_TUI_LOG names one. RUST_LOG filters as usual, defaulting to debug.
fn init_tracing() -> Result<()> {
    let Ok(path) = std::env::var("SNAKE_TUI_LOG") else {
        return Ok(());
    };

    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create log file {path}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(file)
        .with_ansi(false)
        .init();

    Ok(())
}
