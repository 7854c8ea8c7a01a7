//! CLI for planning and simulating scroll-to-reveal gestures.
//!
//! # Usage
//!
//! ```bash
//! # Visible region and swipe vectors for a table with a keyboard on screen
//! automate plan --container 0,88,375,600 --keyboard 0,388,375,300
//!
//! # Reveal row 40 of a 3000pt list in a simulated scroll view
//! automate simulate --viewport 0,88,375,600 --content-height 3000 --target 0,2400,375,60
//!
//! # Same, but ignore the keyboard and print JSON
//! automate -f json simulate --viewport 0,0,375,600 --content-height 3000 \
//!     --target 0,2400,375,60 --keyboard 0,400,375,300 --no-avoid-keyboard
//!
//! # Inspect and edit persisted defaults
//! automate config show
//! automate config set frame_tolerance 0.5
//! ```

mod format;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use automate_core::config::{config_path, parse_frame_tolerance, parse_swipe_length, AutomateConfig};
use automate_core::driver::GestureDriver;
use automate_core::element::ElementQuery;
use automate_core::geometry::Rect;
use automate_core::reveal::{RevealOptions, RevealPlan, ScrollRevealer};
use automate_core::sim::SimulatedScrollView;

use format::{parse_rect, OutputFormat, SimulationReport};

/// Identifier given to the simulated target element.
const TARGET_ID: &str = "target";

/// Plan and simulate scroll-to-reveal gestures.
#[derive(Parser)]
#[command(name = "automate")]
#[command(about = "Plan and simulate scroll-to-reveal gestures")]
#[command(version)]
struct Cli {
    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the visible region and swipe vectors for a container
    Plan {
        /// Container frame as x,y,width,height
        #[arg(long, value_parser = parse_rect)]
        container: Rect,
        /// Keyboard frame as x,y,width,height
        #[arg(long, value_parser = parse_rect)]
        keyboard: Option<Rect>,
        /// Fraction of the visible region each swipe covers, in (0, 1]
        #[arg(long, value_parser = parse_swipe_length)]
        swipe_length: Option<f64>,
    },

    /// Reveal an element in a simulated scroll view
    Simulate {
        /// Scroll view frame on screen as x,y,width,height
        #[arg(long, value_parser = parse_rect)]
        viewport: Rect,
        /// Total height of the scrollable content
        #[arg(long)]
        content_height: f64,
        /// Target frame in content coordinates as x,y,width,height
        #[arg(long, value_parser = parse_rect)]
        target: Rect,
        /// Initial scroll offset in points
        #[arg(long, default_value = "0")]
        offset: f64,
        /// Keyboard frame on screen as x,y,width,height
        #[arg(long, value_parser = parse_rect)]
        keyboard: Option<Rect>,
        /// Do not subtract the keyboard from the visible region
        #[arg(long)]
        no_avoid_keyboard: bool,
        /// Frame difference still treated as no movement
        #[arg(long, env = "AUTOMATE_FRAME_TOLERANCE", value_parser = parse_frame_tolerance)]
        tolerance: Option<f64>,
    },

    /// Show or edit persisted defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Set one configuration key
    Set {
        /// One of: swipe_length, press_duration_secs, avoid_keyboard, frame_tolerance
        key: String,
        /// New value
        value: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AutomateConfig::load();

    match cli.command {
        Command::Plan {
            container,
            keyboard,
            swipe_length,
        } => {
            let swipe_length = swipe_length.unwrap_or(config.swipe_length);
            match RevealPlan::new(container, keyboard, swipe_length) {
                Ok(plan) => {
                    println!("{}", format::plan(&plan, cli.format));
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            }
        }

        Command::Simulate {
            viewport,
            content_height,
            target,
            offset,
            keyboard,
            no_avoid_keyboard,
            tolerance,
        } => {
            let mut options = RevealOptions::from(&config);
            if no_avoid_keyboard {
                options.avoid_keyboard = false;
            }
            if let Some(tolerance) = tolerance {
                options.frame_tolerance = tolerance;
            }

            let mut view = SimulatedScrollView::new(viewport, content_height)
                .with_target(TARGET_ID, target)
                .with_scroll_offset(offset);
            if let Some(keyboard) = keyboard {
                view = view.with_keyboard(keyboard);
            }

            let query = ElementQuery::id(TARGET_ID);
            let outcome = ScrollRevealer::with_options(&view, options)
                .reveal(&view.container(), &query)
                .await;

            let frame = match view.frame(&query).await {
                Ok(frame) => frame,
                Err(e) => return fail(&e),
            };
            let report = SimulationReport {
                revealed: outcome.is_ok(),
                error: outcome.as_ref().err().map(ToString::to_string),
                swipes: view.swipes().await.len(),
                scroll_offset: view.scroll_offset().await,
                frame,
            };
            println!("{}", format::simulation(&report, cli.format));
            if report.revealed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }

        Command::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", format::config(&config, &config_path(), cli.format));
                ExitCode::SUCCESS
            }
            ConfigAction::Set { key, value } => {
                let mut config = config;
                if let Err(e) = config.set(&key, &value) {
                    return fail(&e);
                }
                if let Err(e) = config.save() {
                    return fail(&e);
                }
                tracing::info!(%key, %value, "config updated");
                println!("{key} = {value}");
                ExitCode::SUCCESS
            }
        },
    }
}

fn fail(err: &dyn std::error::Error) -> ExitCode {
    eprintln!("Error: {err}");
    ExitCode::FAILURE
}
