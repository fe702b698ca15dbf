// src/main.rs
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hantek_scope::{
    write_csv, write_json, Capture, CaptureReader, ChannelLayout, PlotOptions, PlotStyle,
    ScopePlotter, SpectrumBuilder, StyleConfig,
};
#[derive(Parser)]
#[command(name = "hantek-scope", version, about = "Hantek 6022BE capture viewer")]
struct Cli {
    /// Force the channel layout instead of guessing it from the line count
    #[arg(long, value_enum, default_value_t = LayoutArg::Auto, global = true)]
    layout: LayoutArg,
    #[command(subcommand)]
    command: Commands,
}
#[derive(Subcommand)]
enum Commands {
    /// Print the header and per-channel summary of a capture
    Info { file: PathBuf },
    /// Overlay every channel of the given captures on one figure
    Plot {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long, default_value = "capture.png")]
        out: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "Time (s)")]
        x_label: String,
        #[arg(long, default_value = "Voltage (V)")]
        y_label: String,
        /// JSON plot style (size, background, palette)
        #[arg(long)]
        style: Option<PathBuf>,
    },
    /// Plot the magnitude spectrum of each channel
    Spectrum {
        file: PathBuf,
        #[arg(short, long, default_value = "spectrum.png")]
        out: PathBuf,
        /// Defaults to the sample count rounded up to a power of two
        #[arg(long)]
        fft_size: Option<usize>,
        #[arg(long)]
        style: Option<PathBuf>,
    },
    /// Dump samples as CSV or JSON
    Export {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Standard output when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}
#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Auto,
    Single,
    Dual,
}
impl From<LayoutArg> for ChannelLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Auto => ChannelLayout::Auto,
            LayoutArg::Single => ChannelLayout::Single,
            LayoutArg::Dual => ChannelLayout::Dual,
        }
    }
}
#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let reader = CaptureReader::with_layout(cli.layout.into());
    match cli.command {
        Commands::Info { file } => info(&reader, &file),
        Commands::Plot {
            files,
            out,
            title,
            x_label,
            y_label,
            style,
        } => {
            let style = load_style(style.as_deref())?;
            let mut plotter = ScopePlotter::new();
            for (file_idx, file) in files.iter().enumerate() {
                let capture = load(&reader, file)?;
                let name = file
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| format!("file {file_idx}"));
                for (idx, channel) in capture.channels.iter().enumerate() {
                    let options = PlotOptions {
                        x_label: Some(x_label.clone()),
                        y_label: Some(y_label.clone()),
                        label: Some(format!("{name} CH{}", idx + 1)),
                        title: title.clone(),
                    };
                    plotter.plot_waveform(channel, 0, &options)?;
                }
            }
            plotter.save_png(0, &style, &out)?;
            println!("saved {}", out.display());
            Ok(())
        }
        Commands::Spectrum {
            file,
            out,
            fft_size,
            style,
        } => {
            let style = load_style(style.as_deref())?;
            let capture = load(&reader, &file)?;
            let mut plotter = ScopePlotter::new();
            for (idx, channel) in capture.channels.iter().enumerate() {
                let builder = match fft_size {
                    Some(n) => SpectrumBuilder::with_size(n),
                    None => SpectrumBuilder::for_waveform(channel),
                };
                let spectrum = builder.compute(channel, capture.step());
                log::info!(
                    "CH{}: {}-point FFT, peak at {:?} Hz",
                    idx + 1,
                    builder.fft_size(),
                    spectrum.peak_hz()
                );
                let options = PlotOptions {
                    x_label: Some("Frequency (Hz)".into()),
                    y_label: Some("Magnitude (V)".into()),
                    label: Some(format!("CH{}", idx + 1)),
                    title: Some("FFT Magnitude".into()),
                };
                plotter.scope_plot(&spectrum.frequencies_hz, &spectrum.magnitudes, 0, &options)?;
            }
            plotter.save_png(0, &style, &out)?;
            println!("saved {}", out.display());
            Ok(())
        }
        Commands::Export { file, format, out } => {
            let capture = load(&reader, &file)?;
            let written = match (&out, format) {
                (Some(path), ExportFormat::Csv) => write_csv(&capture, create(path)?),
                (Some(path), ExportFormat::Json) => write_json(&capture, create(path)?),
                (None, ExportFormat::Csv) => write_csv(&capture, io::stdout().lock()),
                (None, ExportFormat::Json) => write_json(&capture, io::stdout().lock()),
            };
            written.context("failed to write export")?;
            Ok(())
        }
    }
}
fn load(reader: &CaptureReader, path: &Path) -> Result<Capture> {
    reader
        .read(path)
        .with_context(|| format!("failed to load capture {}", path.display()))
}
fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}
fn load_style(path: Option<&Path>) -> Result<PlotStyle> {
    let Some(path) = path else {
        return Ok(PlotStyle::default());
    };
    let config = StyleConfig::from_path(path)
        .with_context(|| format!("failed to load plot style {}", path.display()))?;
    Ok(config.into())
}
fn info(reader: &CaptureReader, path: &Path) -> Result<()> {
    let capture = load(reader, path)?;
    let header = &capture.header;
    println!("file:        {}", path.display());
    println!("clock:       {} ({:e} s)", header.clock, header.clock_seconds);
    println!(
        "sample rate: {} Hz (step {:e} s)",
        capture.sample_rate_hz(),
        header.step
    );
    println!("samples:     {}", header.size);
    println!("channels:    {}", capture.channel_count());
    for (idx, channel) in capture.channels.iter().enumerate() {
        if let Some((lo, hi)) = channel.voltage_range() {
            println!("  CH{}: min {lo} V, max {hi} V", idx + 1);
        }
    }
    Ok(())
}
