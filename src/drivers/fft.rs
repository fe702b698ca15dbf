use rustfft::{num_complex::Complex64, FftPlanner};
use crate::drivers::capture::Waveform;
use crate::drivers::clock::sample_rate_hz;
/// Magnitude spectrum of one channel.
#[derive(Clone, Debug)]
pub struct FrequencySpectrum {
    pub sample_rate_hz: f64,
    pub frequencies_hz: Vec<f64>,
    pub magnitudes: Vec<f64>,
}
impl FrequencySpectrum {
    /// Frequency of the strongest bin above DC.
    pub fn peak_hz(&self) -> Option<f64> {
        self.magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| self.frequencies_hz[k])
    }
}
/// Helper that computes FFTs for a given window size.
pub struct SpectrumBuilder {
    fft_size: usize,
}
impl SpectrumBuilder {
    pub fn with_size(fft_size: usize) -> Self {
        Self {
            fft_size: fft_size.max(2),
        }
    }
    /// Window covering the whole waveform, rounded up to a power of two.
    pub fn for_waveform(waveform: &Waveform) -> Self {
        Self::with_size(waveform.len().next_power_of_two())
    }
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
    pub fn compute(&self, waveform: &Waveform, step: f64) -> FrequencySpectrum {
        let rate = sample_rate_hz(step);
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(self.fft_size);
        let frequencies = (0..self.fft_size / 2)
            .map(|k| k as f64 * (rate / self.fft_size as f64))
            .collect();
        let mut buffer: Vec<Complex64> = waveform
            .voltage
            .iter()
            .copied()
            .take(self.fft_size)
            .map(|v| Complex64::new(v, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex64::new(0.0, 0.0));
        fft.process(&mut buffer);
        let magnitudes = buffer
            .iter()
            .take(self.fft_size / 2)
            .map(|c| c.norm() / self.fft_size as f64)
            .collect();
        FrequencySpectrum {
            sample_rate_hz: rate,
            frequencies_hz: frequencies,
            magnitudes,
        }
    }
}
