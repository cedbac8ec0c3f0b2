use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::ArrivalScope;
use crate::settings::DetrendMethod;

#[derive(Parser)]
#[command(name = "baro-pulse")]
#[command(about = "Find an atmospheric pressure pulse in a weather station barometer archive")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "TOML configuration file (BARO_PULSE__* environment variables also apply)"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict arrivals, query the archive, detrend and plot
    Analyze {
        #[command(flatten)]
        event: EventArgs,

        #[arg(long, help = "SQLite archive file (selects the sqlite backend)")]
        sqlite: Option<PathBuf>,

        #[arg(long, help = "Hours before the first predicted arrival")]
        lead_hours: Option<f64>,

        #[arg(long, help = "Hours after the last predicted arrival")]
        lag_hours: Option<f64>,

        #[arg(long, help = "Arrivals the window must bracket: all or direct")]
        scope: Option<ArrivalScope>,

        #[arg(long, help = "Baseline model: spline or polynomial")]
        method: Option<DetrendMethod>,

        #[arg(long, help = "Hours between spline knots")]
        smoothing_hours: Option<f64>,

        #[arg(long, help = "Width of the arrival highlight bars in hours")]
        highlight_hours: Option<f64>,

        #[arg(short, long, help = "Output PNG path [default: ./hunga_tonga.png]")]
        output: Option<PathBuf>,

        #[arg(
            long,
            num_args = 0..=1,
            help = "Also export the residual series as CSV [default: next to the chart]"
        )]
        csv: Option<Option<PathBuf>>,

        #[arg(long, help = "Skip rendering the chart")]
        no_plot: bool,

        #[arg(long, help = "Open the chart in the image viewer once saved [default]")]
        show: bool,

        #[arg(long, conflicts_with = "show", help = "Save the chart without opening it")]
        no_show: bool,
    },

    /// Print the predicted arrivals without touching the archive
    Predict {
        #[command(flatten)]
        event: EventArgs,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Observer and event overrides shared by both subcommands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct EventArgs {
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Observer location as 'lat,lon' (decimal or DD:MM:SS)"
    )]
    pub observer: Option<String>,

    #[arg(long, allow_hyphen_values = true, help = "Event time as UTC epoch seconds")]
    pub event_time: Option<i64>,

    #[arg(long, help = "Propagation speed in km/s")]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
