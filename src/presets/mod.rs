//! Built-in preset catalog and the control-value scaling curves.
//!
//! The catalog is compiled in and read-only. Applying a preset writes each
//! field to the [`ParameterStore`] as an independent atomic set; the audio
//! side may briefly observe a mix of old and new values across parameters,
//! which is accepted (see `params`).

use crate::params::{ParamId, ParameterStore};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Exponential CC-to-cutoff curve range.
pub const CUTOFF_MIN_HZ: f32 = 20.0;
pub const CUTOFF_MAX_HZ: f32 = 18_000.0;

/// Full-range CC resonance target. The canonical resonance domain is the
/// feedback coefficient k in 0..4.2; CC sweeps the musical range up to 4.0,
/// just under the tolerated self-oscillation ceiling.
pub const CC_RESONANCE_MAX: f32 = 4.0;

/// One immutable parameter bundle.
///
/// `ratio` and `index` are in their native 0..10 range and are divided by
/// 10.0 on application, matching the normalized units the tone engine
/// consumes. Envelope fields are already normalized; cutoff and resonance
/// are written directly in native units.
// Serialize only: `name` borrows from the compiled-in catalog.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub ratio: f32,
    pub index: f32,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    pub cutoff_hz: f32,
    pub resonance: f32,
}

#[rustfmt::skip]
pub const PRESETS: [Preset; 5] = [
    // name          ratio index attack decay sustain release cutoff   res
    Preset { name: "Init",      ratio: 1.0, index: 0.0, attack: 0.0, decay: 0.5, sustain: 1.0, release: 0.2, cutoff_hz: 18_000.0, resonance: 0.0 },
    Preset { name: "E. Piano",  ratio: 1.0, index: 3.5, attack: 0.0, decay: 0.6, sustain: 0.0, release: 0.4, cutoff_hz: 8_000.0,  resonance: 0.2 },
    Preset { name: "Fat Bass",  ratio: 0.5, index: 1.5, attack: 0.0, decay: 0.3, sustain: 0.8, release: 0.2, cutoff_hz: 400.0,    resonance: 0.5 },
    Preset { name: "Bell",      ratio: 2.4, index: 2.0, attack: 0.0, decay: 0.8, sustain: 0.0, release: 2.0, cutoff_hz: 12_000.0, resonance: 0.1 },
    Preset { name: "Acid Lead", ratio: 1.0, index: 5.0, attack: 0.1, decay: 0.4, sustain: 0.6, release: 0.3, cutoff_hz: 1_500.0,  resonance: 0.8 },
];

pub fn count() -> usize {
    PRESETS.len()
}

/// Human-readable label; a sentinel for out-of-range indices, never a panic.
pub fn name(index: usize) -> &'static str {
    match PRESETS.get(index) {
        Some(preset) => preset.name,
        None => "Unknown",
    }
}

/// Write every field of preset `index` into the store. Out-of-range is a
/// no-op.
pub fn apply(index: usize, params: &ParameterStore) {
    let Some(preset) = PRESETS.get(index) else {
        return;
    };

    params.set(ParamId::Cutoff, preset.cutoff_hz);
    params.set(ParamId::Resonance, preset.resonance);
    params.set(ParamId::Ratio, preset.ratio / 10.0);
    params.set(ParamId::ModIndex, preset.index / 10.0);
    params.set(ParamId::Attack, preset.attack);
    params.set(ParamId::Decay, preset.decay);
    params.set(ParamId::Sustain, preset.sustain);
    params.set(ParamId::Release, preset.release);
}

/// Exponential curve from a normalized 0..1 control value to Hz:
/// `min * (max/min)^normalized`. Equal control increments give equal
/// perceptual (logarithmic) brightness steps.
pub fn cutoff_from_cc(normalized: f32) -> f32 {
    CUTOFF_MIN_HZ * (CUTOFF_MAX_HZ / CUTOFF_MIN_HZ).powf(normalized)
}

/// Linear curve from a normalized 0..1 control value to the feedback
/// coefficient k.
pub fn resonance_from_cc(normalized: f32) -> f32 {
    normalized * CC_RESONANCE_MAX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_curve_hits_endpoints_exactly() {
        assert_eq!(cutoff_from_cc(0.0), 20.0);
        assert_eq!(cutoff_from_cc(1.0), 18_000.0);
    }

    #[test]
    fn cutoff_curve_is_strictly_increasing() {
        let mut previous = 0.0;
        for value in 0..=127u8 {
            let cutoff = cutoff_from_cc(value as f32 / 127.0);
            assert!(
                cutoff > previous,
                "curve not increasing at cc {}: {} <= {}",
                value,
                cutoff,
                previous
            );
            previous = cutoff;
        }
    }

    #[test]
    fn resonance_curve_spans_the_k_domain() {
        assert_eq!(resonance_from_cc(0.0), 0.0);
        assert_eq!(resonance_from_cc(1.0), 4.0);
        assert_eq!(resonance_from_cc(0.5), 2.0);
    }

    #[test]
    fn catalog_shape() {
        assert_eq!(count(), 5);
        assert_eq!(name(0), "Init");
        assert_eq!(name(2), "Fat Bass");
        assert_eq!(name(99), "Unknown");
    }

    #[test]
    fn apply_is_deterministic_after_scaling() {
        let store = ParameterStore::new();
        apply(2, &store);

        assert_eq!(store.get(ParamId::Cutoff), 400.0);
        assert_eq!(store.get(ParamId::Resonance), 0.5);
        assert_eq!(store.get(ParamId::Ratio), 0.5 / 10.0);
        assert_eq!(store.get(ParamId::ModIndex), 1.5 / 10.0);
        assert_eq!(store.get(ParamId::Attack), 0.0);
        assert_eq!(store.get(ParamId::Decay), 0.3);
        assert_eq!(store.get(ParamId::Sustain), 0.8);
        assert_eq!(store.get(ParamId::Release), 0.2);
        // Gain is not part of a preset
        assert_eq!(store.get(ParamId::Gain), 0.5);
    }

    #[test]
    fn apply_out_of_range_is_a_no_op() {
        let store = ParameterStore::new();
        let version = store.version();
        apply(99, &store);
        assert_eq!(store.version(), version);
        assert_eq!(store.get(ParamId::Cutoff), 1000.0);
    }
}
