/// Synthetic test signal for exercising the chart without a simulation run

use num_complex::Complex64;

/// Samples in a generated wave
pub const WAVE_POINTS: usize = 50;

const MAX_FREQUENCY: f64 = 5.0;
const MAX_AMPLITUDE: f64 = 10.0;

/// A generated complex exponential
#[derive(Debug, Clone)]
pub struct Wave {
    pub t: Vec<f64>,
    pub samples: Vec<Complex64>,
    pub frequency: f64,
    pub amplitude: f64,
}

impl Wave {
    /// `amplitude * exp(i*2*pi*frequency*t)` on `points` samples of `t` in [0, 1]
    pub fn new(amplitude: f64, frequency: f64, points: usize) -> Self {
        let t: Vec<f64> = match points {
            0 => Vec::new(),
            1 => vec![0.0],
            n => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
        };
        let samples = t
            .iter()
            .map(|t| amplitude * Complex64::new(0.0, 2.0 * std::f64::consts::PI * frequency * t).exp())
            .collect();
        Self {
            t,
            samples,
            frequency,
            amplitude,
        }
    }

    /// Legend label: the frequency with three decimals
    pub fn label(&self) -> String {
        format!("{:.3}", self.frequency)
    }
}

/// Produces a different wave on every call.
///
/// Frequencies and amplitudes walk low-discrepancy sequences so consecutive
/// waves are visibly distinct and runs are reproducible.
#[derive(Debug, Default)]
pub struct WaveGenerator {
    count: u64,
}

impl WaveGenerator {
    pub fn next_wave(&mut self) -> Wave {
        self.count += 1;
        let n = self.count as f64;
        let frequency = MAX_FREQUENCY * (n * 0.618_033_988_749_895).fract();
        // keep amplitudes away from zero so the line is visible
        let amplitude = MAX_AMPLITUDE * (0.1 + 0.9 * (n * 0.754_877_666_246_693).fract());
        Wave::new(amplitude, frequency, WAVE_POINTS)
    }
}
