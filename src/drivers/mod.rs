// src/drivers/mod.rs
pub mod capture;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod fft;
pub mod plot;
pub mod registry;
pub use capture::{load_file, Capture, CaptureHeader, CaptureReader, ChannelLayout, Waveform};
pub use clock::{parse_duration, sample_interval, sample_rate_hz};
pub use config::StyleConfig;
pub use error::ScopeError;
pub use export::{write_csv, write_json};
pub use fft::{FrequencySpectrum, SpectrumBuilder};
pub use plot::{Figure, PlotOptions, PlotStyle, ScopePlotter};
pub use registry::FigureRegistry;
