//! Control-context event handling.
//!
//! Discrete control events (decoded MIDI) arrive over a channel consumed by
//! the control context; the audio context never touches that channel. The
//! handler translates each event into either an atomic write to the
//! [`ParameterStore`] or a [`ToneMessage`] pushed toward the audio side
//! over a realtime-safe SPSC ring. The control context may sleep freely
//! between events; its effects take hold on the audio side's next block
//! boundary, never retroactively.

use std::sync::Arc;

use rtrb::{Consumer, Producer};

use crate::params::{ParamId, ParameterStore};
use crate::presets;

/// A decoded control event as delivered by the external MIDI transport.
#[derive(Debug, Clone, Copy)]
pub enum ControlEvent {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
}

/// What crosses from the control context to the audio context's tone
/// source: note events plus opaque pass-through parameters.
#[derive(Debug, Clone, Copy)]
pub enum ToneMessage {
    NoteOn { note: u8, velocity: f32 },
    NoteOff { note: u8 },
    Control { id: u8, value: f32 },
}

pub trait EventReceiver {
    fn pop(&mut self) -> Option<ControlEvent>;
}

impl EventReceiver for Consumer<ControlEvent> {
    fn pop(&mut self) -> Option<ControlEvent> {
        Consumer::pop(self).ok()
    }
}

// CC assignments from the firmware's controller map.
const CC_RATIO: u8 = 16;
const CC_MOD_INDEX: u8 = 17;
const CC_ATTACK: u8 = 18;
const CC_DECAY: u8 = 19;
const CC_SUSTAIN: u8 = 20;
const CC_RELEASE: u8 = 21;
const CC_RESONANCE: u8 = 71;
const CC_CUTOFF: u8 = 74;

pub struct ControlHandler {
    params: Arc<ParameterStore>,
    tone_tx: Producer<ToneMessage>,
}

impl ControlHandler {
    pub fn new(params: Arc<ParameterStore>, tone_tx: Producer<ToneMessage>) -> Self {
        Self { params, tone_tx }
    }

    /// Apply one event. Note and pass-through messages are dropped if the
    /// ring is full; parameter writes always land (last write wins).
    pub fn handle(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::NoteOn { note, velocity, .. } => {
                let _ = self.tone_tx.push(ToneMessage::NoteOn {
                    note,
                    velocity: velocity as f32 / 127.0,
                });
            }
            ControlEvent::NoteOff { note, .. } => {
                let _ = self.tone_tx.push(ToneMessage::NoteOff { note });
            }
            ControlEvent::ControlChange {
                controller, value, ..
            } => self.control_change(controller, value),
            ControlEvent::ProgramChange { program, .. } => {
                presets::apply(program as usize, &self.params);
            }
        }
    }

    /// Pump every pending event, then return so the caller can sleep.
    pub fn drain(&mut self, rx: &mut impl EventReceiver) {
        while let Some(event) = rx.pop() {
            self.handle(event);
        }
    }

    fn control_change(&mut self, controller: u8, value: u8) {
        let normalized = value as f32 / 127.0;
        match controller {
            CC_CUTOFF => self
                .params
                .set(ParamId::Cutoff, presets::cutoff_from_cc(normalized)),
            CC_RESONANCE => self
                .params
                .set(ParamId::Resonance, presets::resonance_from_cc(normalized)),
            CC_RATIO => self.params.set(ParamId::Ratio, normalized),
            CC_MOD_INDEX => self.params.set(ParamId::ModIndex, normalized),
            CC_ATTACK => self.params.set(ParamId::Attack, normalized),
            CC_DECAY => self.params.set(ParamId::Decay, normalized),
            CC_SUSTAIN => self.params.set(ParamId::Sustain, normalized),
            CC_RELEASE => self.params.set(ParamId::Release, normalized),
            // Anything else is an opaque ID the tone engine interprets
            // (operator feedback on 22, for one).
            other => {
                let _ = self.tone_tx.push(ToneMessage::Control {
                    id: other,
                    value: normalized,
                });
            }
        }
    }
}
