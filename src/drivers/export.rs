use std::io::{BufWriter, Write};
use crate::drivers::capture::Capture;
use crate::drivers::ScopeError;
/// Writes `time,ch1[,ch2]` rows, one per sample.
pub fn write_csv<W: Write>(capture: &Capture, writer: W) -> Result<(), ScopeError> {
    let mut w = BufWriter::new(writer);
    write!(w, "time")?;
    for idx in 1..=capture.channel_count() {
        write!(w, ",ch{idx}")?;
    }
    writeln!(w)?;
    let Some(first) = capture.channels.first() else {
        w.flush()?;
        return Ok(());
    };
    for (row, t) in first.time.iter().enumerate() {
        write!(w, "{t:e}")?;
        for channel in &capture.channels {
            match channel.voltage.get(row) {
                Some(v) => write!(w, ",{v}")?,
                None => write!(w, ",")?,
            }
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}
pub fn write_json<W: Write>(capture: &Capture, writer: W) -> Result<(), ScopeError> {
    let mut w = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut w, capture)?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}
