use std::path::Path;
use serde::Serialize;
use crate::drivers::clock::{parse_duration, sample_interval, sample_rate_hz};
use crate::drivers::ScopeError;
// Header field positions, counted from the first line of a header block.
const CLOCK_LINE: usize = 1;
const SIZE_LINE: usize = 2;
/// One channel: sample times (s) and readings (V), equal length.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Waveform {
    pub time: Vec<f64>,
    pub voltage: Vec<f64>,
}
impl Waveform {
    pub fn len(&self) -> usize {
        self.voltage.len()
    }
    pub fn is_empty(&self) -> bool {
        self.voltage.is_empty()
    }
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.voltage.iter().copied())
    }
    /// Lowest and highest reading, `None` for an empty waveform.
    pub fn voltage_range(&self) -> Option<(f64, f64)> {
        let first = *self.voltage.first()?;
        Some(
            self.voltage
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }
}
/// Fields recovered from the block in front of a channel's samples.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaptureHeader {
    /// Clock value as written in the file, e.g. `10u`.
    pub clock: String,
    pub clock_seconds: f64,
    pub step: f64,
    pub size: usize,
}
impl CaptureHeader {
    /// `first_line` is the 1-based file line number of `lines[0]`.
    fn parse(lines: &[&str], first_line: usize) -> Result<Self, ScopeError> {
        let clock = field_value(lines, CLOCK_LINE, "clock", first_line)?;
        let clock_seconds =
            parse_duration(clock).map_err(|e| e.at_line(first_line + CLOCK_LINE))?;
        let size_text = field_value(lines, SIZE_LINE, "size", first_line)?;
        let size: usize = size_text.parse().map_err(|_| {
            ScopeError::format("size", format!("{size_text:?} is not a sample count"))
                .at_line(first_line + SIZE_LINE)
        })?;
        if size == 0 {
            return Err(ScopeError::format("size", "sample count must be positive")
                .at_line(first_line + SIZE_LINE));
        }
        Ok(Self {
            clock: clock.to_string(),
            clock_seconds,
            step: sample_interval(clock_seconds),
            size,
        })
    }
}
/// `label: value` lookup at a fixed header line; the label itself is not checked.
fn field_value<'a>(
    lines: &[&'a str],
    index: usize,
    field: &str,
    first_line: usize,
) -> Result<&'a str, ScopeError> {
    let number = first_line + index;
    let line: &'a str = lines.get(index).copied().ok_or_else(|| {
        ScopeError::format(
            field,
            format!("header ends after {} line(s), field is missing", lines.len()),
        )
        .at_line(number)
    })?;
    let (_, value) = line.split_once(':').ok_or_else(|| {
        ScopeError::format(field, format!("expected `label: value`, found {line:?}")).at_line(number)
    })?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ScopeError::format(field, "value is empty").at_line(number));
    }
    Ok(value)
}
/// How the reader decides between one and two channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelLayout {
    /// Two channels when the file has more than `2 * size` lines.
    #[default]
    Auto,
    Single,
    Dual,
}
/// Header plus the one or two channels of a capture file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Capture {
    pub header: CaptureHeader,
    pub channels: Vec<Waveform>,
}
impl Capture {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScopeError> {
        CaptureReader::default().read(path)
    }
    pub fn parse(text: &str) -> Result<Self, ScopeError> {
        CaptureReader::default().parse(text)
    }
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
    pub fn step(&self) -> f64 {
        self.header.step
    }
    pub fn sample_rate_hz(&self) -> f64 {
        sample_rate_hz(self.header.step)
    }
}
/// Loads every channel of a capture file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<Waveform>, ScopeError> {
    Ok(Capture::from_path(path)?.channels)
}
#[derive(Clone, Copy, Debug, Default)]
pub struct CaptureReader {
    layout: ChannelLayout,
}
impl CaptureReader {
    pub fn with_layout(layout: ChannelLayout) -> Self {
        Self { layout }
    }
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Capture, ScopeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("capture: read {} bytes from {}", text.len(), path.display());
        self.parse(&text)
    }
    pub fn parse(&self, text: &str) -> Result<Capture, ScopeError> {
        let lines: Vec<&str> = text.lines().collect();
        let delimiters: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.trim().is_empty())
            .map(|(idx, _)| idx)
            .collect();
        let Some(&header_end) = delimiters.first() else {
            return Err(ScopeError::Layout(
                "no blank line separates the header from the samples".into(),
            ));
        };
        let header = CaptureHeader::parse(&lines[..header_end], 1)?;
        let size = header.size;
        if size > lines.len() {
            return Err(ScopeError::format(
                "size",
                format!("{size} samples declared, file has only {} lines", lines.len()),
            )
            .at_line(1 + SIZE_LINE));
        }
        let dual = match self.layout {
            ChannelLayout::Auto => size.checked_mul(2).is_some_and(|n| lines.len() > n),
            ChannelLayout::Single => false,
            ChannelLayout::Dual => true,
        };
        if dual && delimiters.len() < 4 {
            return Err(ScopeError::Layout(format!(
                "{} lines suggest two channels of {size} samples, but only {} blank-line \
                 delimiter(s) were found (need at least 4)",
                lines.len(),
                delimiters.len()
            )));
        }
        let ch1 = parse_block(&lines, &delimiters, 0, size, "channel 1")?;
        let time = linspace(size as f64 * header.step, size);
        let mut channels = vec![Waveform {
            time: time.clone(),
            voltage: ch1,
        }];
        if dual {
            check_second_header(&lines, &delimiters, &header)?;
            let ch2 = parse_block(&lines, &delimiters, 3, size, "channel 2")?;
            channels.push(Waveform { time, voltage: ch2 });
        }
        log::debug!(
            "capture: clock {} -> step {:e}s, {} samples x {} channel(s)",
            header.clock,
            header.step,
            size,
            channels.len()
        );
        Ok(Capture { header, channels })
    }
}
/// Samples between delimiter `index` and the next one (or end of file).
fn parse_block(
    lines: &[&str],
    delimiters: &[usize],
    index: usize,
    size: usize,
    channel: &str,
) -> Result<Vec<f64>, ScopeError> {
    let start = delimiters[index] + 1;
    let end = delimiters.get(index + 1).copied().unwrap_or(lines.len());
    let block = &lines[start..end];
    if block.len() < size {
        return Err(ScopeError::format(
            format!("{channel} data"),
            format!("expected {size} samples, file holds {}", block.len()),
        )
        .at_line(end + 1));
    }
    if block.len() > size {
        return Err(ScopeError::Layout(format!(
            "{channel} block starting on line {} holds {} lines, header declares {size}",
            start + 1,
            block.len()
        )));
    }
    block
        .iter()
        .enumerate()
        .map(|(offset, line)| {
            line.trim().parse::<f64>().map_err(|_| {
                ScopeError::format(
                    format!("{channel} sample"),
                    format!("{:?} is not a number", line.trim()),
                )
                .at_line(start + offset + 1)
            })
        })
        .collect()
}
/// Channel 2 shares channel 1's time axis, so its own header must agree when present.
fn check_second_header(
    lines: &[&str],
    delimiters: &[usize],
    first: &CaptureHeader,
) -> Result<(), ScopeError> {
    let start = delimiters[1] + 1;
    let section = &lines[start..delimiters[2]];
    match CaptureHeader::parse(section, start + 1) {
        Ok(second) if second.size != first.size || second.step != first.step => {
            Err(ScopeError::Layout(format!(
                "channel 2 header on line {} declares {} samples at {:e}s, channel 1 has {} at {:e}s",
                start + 1,
                second.size,
                second.step,
                first.size,
                first.step
            )))
        }
        Ok(_) => Ok(()),
        Err(err) => {
            log::warn!(
                "capture: channel 2 header on line {} not checked against channel 1 ({err})",
                start + 1
            );
            Ok(())
        }
    }
}
/// `count` evenly spaced points from 0 to `stop`, both ends included.
pub(crate) fn linspace(stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let delta = stop / (count - 1) as f64;
            let mut points: Vec<f64> = (0..count).map(|i| i as f64 * delta).collect();
            points[count - 1] = stop;
            points
        }
    }
}
