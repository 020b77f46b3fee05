use std::f32::consts::TAU;

/*
Ladder Filter
=============

A cascade of four one-pole low-pass sections with a single global feedback
path from the last stage's output back to the first stage's input. The
classic analog synthesizer low-pass topology.

Per-sample recurrence:

    val      = input - k * state[3]        k = resonance (feedback amount)
    state[0] += p * (tanh(val) - state[0])
    state[1] += p * (state[0]  - state[1])
    state[2] += p * (state[1]  - state[2])
    state[3] += p * (state[2]  - state[3])
    output   = state[3]

The saturation sits on the first stage only. That models the analog input
soft clipping while the inner stages stay linear for a predictable 24
dB/octave rolloff. It also bounds the magnitude that can recirculate through
the feedback path, so extreme settings degrade into audible self-oscillation
instead of numeric blowup. There are no error conditions: every input is
clamped or saturated into the stable region.

Resonance k runs 0..4 for the stable range; values up to ~4.2 are tolerated
before self-oscillation dominates. The setter imposes no clamp: pushing the
filter into self-oscillation is a musical feature.

The pole coefficient is derived as

    fc = clamp(cutoff / sample_rate, 0.0, 0.45)
    p  = 1 - exp(-TAU * fc)

The 0.45 ceiling keeps the discretized one-pole update stable near Nyquist;
above it the recurrence gain runs away. This is an approximation of the
continuous-time pole mapping, fine for musical use.
*/

pub struct LadderFilter {
    state: [f32; 4],
    cutoff_hz: f32,
    resonance: f32,
    sample_rate: f32,
    p: f32,
}

impl LadderFilter {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            state: [0.0; 4],
            cutoff_hz: 1000.0,
            resonance: 0.0,
            sample_rate,
            p: 0.0,
        };
        filter.update_coefficients();
        filter
    }

    /// Change the sample rate used for coefficient derivation. Keeps the
    /// stage states so a live rate change does not click.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coefficients();
    }

    /// Requested cutoff in Hz. No input bound; the coefficient derivation
    /// clamps internally.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
        self.update_coefficients();
    }

    /// Feedback amount k. Unclamped; see the module notes on self-oscillation.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance;
        self.update_coefficients();
    }

    /// Zero the four stage states and recompute coefficients from the
    /// current cutoff/resonance/sample rate. Used at initialization and for
    /// preset changes that should silence filter ringing.
    pub fn reset(&mut self) {
        self.state = [0.0; 4];
        self.update_coefficients();
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let val = input - self.resonance * self.state[3];

        self.state[0] += self.p * (val.tanh() - self.state[0]);
        self.state[1] += self.p * (self.state[0] - self.state[1]);
        self.state[2] += self.p * (self.state[1] - self.state[2]);
        self.state[3] += self.p * (self.state[2] - self.state[3]);

        self.state[3]
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// The per-sample smoothing factor consumed by the recurrence.
    pub fn pole_coefficient(&self) -> f32 {
        self.p
    }

    fn update_coefficients(&mut self) {
        let fc = (self.cutoff_hz / self.sample_rate).clamp(0.0, 0.45);
        self.p = 1.0 - (-TAU * fc).exp();
    }
}
