//! Fixed per-block processing order and the external collaborator seams.
//!
//! One [`AudioPipeline`] runs on the audio context at the block cadence:
//!
//!   tone source -> ladder filter -> effects (in order) -> gain -> stereo out
//!
//! The filter stage walks the block sample by sample because each sample
//! depends on the previous sample's filter state; it cannot be parallelized
//! within a block. Everything the pipeline touches per block was allocated
//! at construction, and the only cross-context reads are atomic loads from
//! the [`ParameterStore`] plus a non-blocking ring-buffer drain.

use std::sync::Arc;

use rtrb::Consumer;

use crate::control::ToneMessage;
use crate::dsp::LadderFilter;
use crate::params::{LiveParameters, ParameterStore};
use crate::MAX_BLOCK_SIZE;

/// Parameter identifiers the tone engine understands. The named variants
/// correspond to the store's engine-facing fields; `Other` carries opaque
/// pass-through controller IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineParam {
    Ratio,
    ModIndex,
    Attack,
    Decay,
    Sustain,
    Release,
    Other(u8),
}

/// Block-level tone generator. Fills a buffer with samples; note and
/// parameter delivery arrive between blocks, never mid-buffer.
pub trait ToneSource: Send {
    fn generate(&mut self, out: &mut [f32]);

    fn note_on(&mut self, _note: u8, _velocity: f32) {}

    fn note_off(&mut self, _note: u8) {}

    fn set_parameter(&mut self, _param: EngineParam, _value: f32) {}
}

/// In-place block effect (delay, reverb).
pub trait BlockEffect: Send {
    fn process(&mut self, buffer: &mut [f32]);
}

/// Hardware/codec boundary.
pub trait OutputSink: Send {
    fn output(&mut self, left: &[f32], right: &[f32]);
}

pub struct AudioPipeline {
    params: Arc<ParameterStore>,
    filter: LadderFilter,
    tone: Box<dyn ToneSource>,
    effects: Vec<Box<dyn BlockEffect>>,
    sink: Box<dyn OutputSink>,
    messages: Consumer<ToneMessage>,
    mono: Vec<f32>,
    left: Vec<f32>,
    right: Vec<f32>,
    cached: LiveParameters,
    seen_version: u64,
}

impl AudioPipeline {
    /// Effects are applied in the order given (delay before reverb in the
    /// stock wiring).
    pub fn new(
        sample_rate: f32,
        params: Arc<ParameterStore>,
        tone: Box<dyn ToneSource>,
        effects: Vec<Box<dyn BlockEffect>>,
        sink: Box<dyn OutputSink>,
        messages: Consumer<ToneMessage>,
    ) -> Self {
        let cached = params.snapshot();
        let seen_version = params.version();

        let mut filter = LadderFilter::new(sample_rate);
        filter.set_cutoff(cached.cutoff_hz);
        filter.set_resonance(cached.resonance);

        let mut pipeline = Self {
            params,
            filter,
            tone,
            effects,
            sink,
            messages,
            mono: vec![0.0; MAX_BLOCK_SIZE],
            left: vec![0.0; MAX_BLOCK_SIZE],
            right: vec![0.0; MAX_BLOCK_SIZE],
            cached,
            seen_version,
        };
        pipeline.push_engine_parameters();
        pipeline
    }

    /// Run one block. Never blocks, never allocates; `frames` is clamped to
    /// [`MAX_BLOCK_SIZE`].
    pub fn process_block(&mut self, frames: usize) {
        let frames = frames.min(MAX_BLOCK_SIZE);

        self.drain_messages();
        self.refresh_parameters();

        let mono = &mut self.mono[..frames];
        mono.fill(0.0);

        self.tone.generate(mono);
        self.filter.render(mono);

        for effect in &mut self.effects {
            effect.process(mono);
        }

        let gain = self.cached.gain;
        for i in 0..frames {
            let sample = self.mono[i] * gain;
            self.left[i] = sample;
            self.right[i] = sample;
        }

        self.sink.output(&self.left[..frames], &self.right[..frames]);
    }

    /// Silence any filter ringing, e.g. around a preset change.
    pub fn reset(&mut self) {
        self.filter.reset();
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.messages.pop() {
            match message {
                ToneMessage::NoteOn { note, velocity } => self.tone.note_on(note, velocity),
                ToneMessage::NoteOff { note } => self.tone.note_off(note),
                ToneMessage::Control { id, value } => {
                    self.tone.set_parameter(EngineParam::Other(id), value)
                }
            }
        }
    }

    /// Re-read the store only when something was written, and push only the
    /// fields that actually changed.
    fn refresh_parameters(&mut self) {
        let version = self.params.version();
        if version == self.seen_version {
            return;
        }
        self.seen_version = version;

        let next = self.params.snapshot();
        if next.cutoff_hz != self.cached.cutoff_hz {
            self.filter.set_cutoff(next.cutoff_hz);
        }
        if next.resonance != self.cached.resonance {
            self.filter.set_resonance(next.resonance);
        }
        if next.ratio != self.cached.ratio {
            self.tone.set_parameter(EngineParam::Ratio, next.ratio);
        }
        if next.mod_index != self.cached.mod_index {
            self.tone.set_parameter(EngineParam::ModIndex, next.mod_index);
        }
        if next.attack != self.cached.attack {
            self.tone.set_parameter(EngineParam::Attack, next.attack);
        }
        if next.decay != self.cached.decay {
            self.tone.set_parameter(EngineParam::Decay, next.decay);
        }
        if next.sustain != self.cached.sustain {
            self.tone.set_parameter(EngineParam::Sustain, next.sustain);
        }
        if next.release != self.cached.release {
            self.tone.set_parameter(EngineParam::Release, next.release);
        }
        self.cached = next;
    }

    fn push_engine_parameters(&mut self) {
        self.tone.set_parameter(EngineParam::Ratio, self.cached.ratio);
        self.tone
            .set_parameter(EngineParam::ModIndex, self.cached.mod_index);
        self.tone.set_parameter(EngineParam::Attack, self.cached.attack);
        self.tone.set_parameter(EngineParam::Decay, self.cached.decay);
        self.tone
            .set_parameter(EngineParam::Sustain, self.cached.sustain);
        self.tone
            .set_parameter(EngineParam::Release, self.cached.release);
    }
}
