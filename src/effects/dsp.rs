//! Small DSP building blocks shared by the effects

use rand::Rng;

/// Convert a decibel value to a linear amplitude factor
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Soft-clip saturation: gain by `drive_db`, then tanh limiting
pub fn soft_clip(x: f32, drive_db: f32) -> f32 {
    (x * db_to_linear(drive_db)).tanh()
}

/// Standard normal sample via the Box-Muller transform
pub fn gaussian<R: Rng>(rng: &mut R) -> f32 {
    let u1: f32 = rng.random::<f32>().max(f32::MIN_POSITIVE);
    let u2: f32 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
}

/// Second-order IIR section (RBJ cookbook coefficients), direct form I
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    fn from_coefficients(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        Biquad {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Lowpass filter at `cutoff_hz`
    pub fn lowpass(sample_rate: f32, cutoff_hz: f32, q: f32) -> Self {
        let omega = std::f32::consts::TAU * cutoff_hz / sample_rate;
        let (sin_w, cos_w) = omega.sin_cos();
        let alpha = sin_w / (2.0 * q);

        Self::from_coefficients(
            (1.0 - cos_w) / 2.0,
            1.0 - cos_w,
            (1.0 - cos_w) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w,
            1.0 - alpha,
        )
    }

    /// Highpass filter at `cutoff_hz`
    pub fn highpass(sample_rate: f32, cutoff_hz: f32, q: f32) -> Self {
        let omega = std::f32::consts::TAU * cutoff_hz / sample_rate;
        let (sin_w, cos_w) = omega.sin_cos();
        let alpha = sin_w / (2.0 * q);

        Self::from_coefficients(
            (1.0 + cos_w) / 2.0,
            -(1.0 + cos_w),
            (1.0 + cos_w) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w,
            1.0 - alpha,
        )
    }

    /// Bandpass filter (0 dB peak) centered on `center_hz` with the given Q
    pub fn bandpass(sample_rate: f32, center_hz: f32, q: f32) -> Self {
        let omega = std::f32::consts::TAU * center_hz / sample_rate;
        let (sin_w, cos_w) = omega.sin_cos();
        let alpha = sin_w / (2.0 * q);

        Self::from_coefficients(alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
    }

    /// Process one sample
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    /// Filter a channel plane in place
    pub fn process_plane(&mut self, plane: &mut [f32]) {
        for sample in plane {
            *sample = self.process(*sample);
        }
    }
}

/// First-order smoothing filter with lowpass/highpass outputs
#[derive(Debug, Clone)]
pub struct OnePole {
    coeff: f32,
    state: f32,
}

impl OnePole {
    /// Create a one-pole section with the given cutoff
    pub fn new(sample_rate: f32, cutoff_hz: f32) -> Self {
        let coeff = 1.0 - (-std::f32::consts::TAU * cutoff_hz / sample_rate).exp();
        OnePole { coeff, state: 0.0 }
    }

    /// Lowpass output for one sample
    pub fn lowpass(&mut self, x: f32) -> f32 {
        self.state += self.coeff * (x - self.state);
        self.state
    }

    /// Highpass output for one sample (input minus the lowpass part)
    pub fn highpass(&mut self, x: f32) -> f32 {
        x - self.lowpass(x)
    }
}
