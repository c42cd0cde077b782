use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;

use helix_meter::{Meter, MeterConfig};

#[derive(Parser)]
#[command(name = "helix-meter")]
#[command(about = "Render a three-zone meter to a PNG image")]
struct Cli {
    /// Log the marker placement and other details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a single meter
    Render(RenderArgs),
    /// Render the two reference meters (output.png and output1.png)
    Demo {
        /// Directory to write the images into
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Lower bound of the in-range zone
    #[arg(long, allow_hyphen_values = true)]
    min: f64,

    /// Upper bound of the in-range zone
    #[arg(long, allow_hyphen_values = true)]
    max: f64,

    /// Value to mark on the scale
    #[arg(long, allow_hyphen_values = true)]
    value: f64,

    /// printf-style pattern for the labels
    #[arg(long, default_value = "%.2f")]
    format: String,

    /// Text for the min bound instead of the formatted number
    #[arg(long)]
    min_label: Option<String>,

    /// Text for the max bound instead of the formatted number
    #[arg(long)]
    max_label: Option<String>,

    #[arg(long, default_value_t = 0)]
    padding_x: u32,

    #[arg(long, default_value_t = 0)]
    padding_y: u32,

    /// Leave the background transparent instead of white
    #[arg(long)]
    transparent: bool,

    /// Also show the meter in a window (needs the `preview` feature)
    #[arg(long)]
    preview: bool,

    /// Where to write the PNG
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Command::Render(args) => render(args),
        Command::Demo { out_dir } => demo(&out_dir),
    }
}

fn render(args: RenderArgs) -> anyhow::Result<()> {
    let config = MeterConfig::builder()
        .min_value(args.min)
        .max_value(args.max)
        .value(args.value)
        .format(args.format)
        .maybe_min_value_label(args.min_label)
        .maybe_max_value_label(args.max_label)
        .padding_x(args.padding_x)
        .padding_y(args.padding_y)
        .transparent(args.transparent)
        .build();
    let meter = Meter::with_config(config);

    meter
        .render(&args.output)
        .with_context(|| format!("rendering meter to {}", args.output.display()))?;

    if args.preview {
        preview(&meter)?;
    }

    Ok(())
}

#[cfg(feature = "preview")]
fn preview(meter: &Meter) -> anyhow::Result<()> {
    meter
        .show("helix-meter")
        .map_err(|err| anyhow::anyhow!("preview failed: {err}"))
}

#[cfg(not(feature = "preview"))]
fn preview(_meter: &Meter) -> anyhow::Result<()> {
    log::warn!("built without the `preview` feature; skipping preview window");
    Ok(())
}

fn demo(out_dir: &std::path::Path) -> anyhow::Result<()> {
    let mut meter = Meter::new();
    meter.set_min(28.0);
    meter.set_max(100.0);
    meter.set_value(7.0);
    meter.set_format("%.0f");
    let path = out_dir.join("output.png");
    meter
        .render(&path)
        .with_context(|| format!("rendering {}", path.display()))?;

    let mut meter1 = Meter::new();
    meter1.set_min(50.0);
    meter1.set_max(100.0);
    meter1.set_value(117.0);
    meter1.set_format("%.0f");
    meter1.set_padding(20, 10);
    let path1 = out_dir.join("output1.png");
    meter1
        .render(&path1)
        .with_context(|| format!("rendering {}", path1.display()))?;

    info!("demo meters written to {}", out_dir.display());
    Ok(())
}
