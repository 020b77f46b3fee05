//! Lock-free parameter store shared between the control and audio contexts.
//!
//! Every value the audio pipeline reads per block lives here as a single
//! word-sized atomic. The control context replaces scalars one at a time;
//! the audio context reads them at block boundaries. A write to one
//! parameter is observed fully or not at all, but there is no transactional
//! multi-parameter update: a preset lands as a sequence of independent
//! `set` calls, and a torn read ACROSS parameters during that window is an
//! accepted, audible-but-bounded artifact.
//!
//! The store is `Sync` and meant to be shared via `Arc`. Neither side ever
//! blocks or allocates.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier for one live scalar parameter.
///
/// `Ratio`, `ModIndex` and the envelope times are stored in the normalized
/// 0..1 units the tone engine consumes; `Cutoff` is in Hz, `Resonance` is
/// the feedback coefficient k, `Gain` is a linear output multiplier.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamId {
    Cutoff,
    Resonance,
    Ratio,
    ModIndex,
    Attack,
    Decay,
    Sustain,
    Release,
    Gain,
}

impl ParamId {
    pub const COUNT: usize = 9;
}

/// Plain copy of every live parameter, taken per-field atomically.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveParameters {
    pub cutoff_hz: f32,
    pub resonance: f32,
    pub ratio: f32,
    pub mod_index: f32,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    pub gain: f32,
}

const DEFAULTS: [f32; ParamId::COUNT] = [
    1000.0, // Cutoff (Hz)
    0.0,    // Resonance
    0.0,    // Ratio
    0.0,    // ModIndex
    0.0,    // Attack
    0.0,    // Decay
    0.0,    // Sustain
    0.0,    // Release
    0.5,    // Gain
];

pub struct ParameterStore {
    slots: [AtomicU32; ParamId::COUNT],
    version: AtomicU64,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|i| AtomicU32::new(DEFAULTS[i].to_bits())),
            version: AtomicU64::new(0),
        }
    }

    /// Replace one scalar. Safe to call from the control context while the
    /// audio context reads concurrently.
    pub fn set(&self, id: ParamId, value: f32) {
        self.slots[id as usize].store(value.to_bits(), Ordering::Relaxed);
        self.version.fetch_add(1, Ordering::Release);
    }

    pub fn get(&self, id: ParamId) -> f32 {
        f32::from_bits(self.slots[id as usize].load(Ordering::Relaxed))
    }

    /// Monotonic write counter. The audio context compares this at block
    /// boundaries to decide whether coefficients need recomputation.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> LiveParameters {
        LiveParameters {
            cutoff_hz: self.get(ParamId::Cutoff),
            resonance: self.get(ParamId::Resonance),
            ratio: self.get(ParamId::Ratio),
            mod_index: self.get(ParamId::ModIndex),
            attack: self.get(ParamId::Attack),
            decay: self.get(ParamId::Decay),
            sustain: self.get(ParamId::Sustain),
            release: self.get(ParamId::Release),
            gain: self.get(ParamId::Gain),
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_filter_settings() {
        let store = ParameterStore::new();
        assert_eq!(store.get(ParamId::Cutoff), 1000.0);
        assert_eq!(store.get(ParamId::Resonance), 0.0);
        assert_eq!(store.get(ParamId::Gain), 0.5);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn set_get_roundtrip() {
        let store = ParameterStore::new();
        store.set(ParamId::Cutoff, 432.5);
        store.set(ParamId::Resonance, 3.9);
        store.set(ParamId::Ratio, -0.0);

        assert_eq!(store.get(ParamId::Cutoff), 432.5);
        assert_eq!(store.get(ParamId::Resonance), 3.9);
        assert_eq!(store.get(ParamId::Ratio), 0.0);
    }

    #[test]
    fn every_set_bumps_the_version() {
        let store = ParameterStore::new();
        let before = store.version();
        store.set(ParamId::Attack, 0.1);
        store.set(ParamId::Decay, 0.2);
        assert_eq!(store.version(), before + 2);
    }

    #[test]
    fn snapshot_reflects_writes() {
        let store = ParameterStore::new();
        store.set(ParamId::Cutoff, 400.0);
        store.set(ParamId::Sustain, 0.8);

        let snap = store.snapshot();
        assert_eq!(snap.cutoff_hz, 400.0);
        assert_eq!(snap.sustain, 0.8);
        assert_eq!(snap.gain, 0.5);
    }
}
