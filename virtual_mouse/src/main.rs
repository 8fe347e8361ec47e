//! virtual_mouse — interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hand_gesture::ScreenSize;
use tracing::info;
use virtual_mouse::app::{run, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "virtual_mouse", about = "Drive the mouse pointer with hand gestures")]
struct Cli {
    /// JSON configuration file (missing fields take defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log pointer actions instead of moving the real pointer
    #[arg(long)]
    dry_run: bool,

    /// Screen size as WIDTHxHEIGHT, overriding the detected display
    #[arg(long, value_parser = parse_screen)]
    screen: Option<ScreenSize>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Consecutive failed captures before giving up
    #[arg(long)]
    max_capture_failures: Option<u32>,
}

fn parse_screen(s: &str) -> Result<ScreenSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{}`", s))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("width `{}`: {}", w, e))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("height `{}`: {}", h, e))?;
    if w == 0 || h == 0 {
        return Err(format!("{}x{} has no pixels", w, h));
    }
    Ok(ScreenSize::new(w as f64, h as f64))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "virtual_mouse=info,hand_gesture=info".into()),
        )
        .init();

    let mut cfg = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(screen) = cli.screen {
        cfg.screen = Some(screen);
    }
    if let Some(n) = cli.max_capture_failures {
        cfg.max_capture_failures = n;
    }
    cfg.validate().context("invalid configuration")?;

    if cli.print_config {
        println!("{}", cfg.to_json()?);
        return Ok(());
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Virtual Mouse — hand gesture pointer control        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
    println!("  Index up = move   Index + middle up = pinch to click   Q = quit");
    println!();

    info!("virtual_mouse v{} starting", env!("CARGO_PKG_VERSION"));
    let stats = run(cfg, cli.dry_run).context("virtual mouse stopped")?;
    info!(clicks = stats.clicks, frames = stats.frames, "bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_arg_parses_both_separators() {
        assert_eq!(parse_screen("1920x1080"), Ok(ScreenSize::new(1920.0, 1080.0)));
        assert_eq!(parse_screen("2560X1440"), Ok(ScreenSize::new(2560.0, 1440.0)));
    }

    #[test]
    fn screen_arg_rejects_garbage() {
        assert!(parse_screen("1920").is_err());
        assert!(parse_screen("0x1080").is_err());
        assert!(parse_screen("widexhigh").is_err());
    }

    #[test]
    fn cli_flags_parse() {
        let cli = Cli::try_parse_from(["virtual_mouse", "--dry-run", "--screen", "800x600"]).unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.screen, Some(ScreenSize::new(800.0, 600.0)));
        assert!(cli.config.is_none());
    }
}
