//! Live two-thread demo: a control thread draining MIDI-style events and an
//! audio thread running the block pipeline, handing blocks to cpal over a
//! lock-free ring.
//!
//! Run with: cargo run --example live --features cpal-demo

#[cfg(feature = "cpal-demo")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    demo::run()
}

#[cfg(not(feature = "cpal-demo"))]
fn main() {
    eprintln!("Build with --features cpal-demo to run this example.");
}

#[cfg(feature = "cpal-demo")]
mod demo {
    use std::f32::consts::TAU;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use rtrb::{Producer, RingBuffer};

    use ladder_fm::control::{ControlEvent, ControlHandler};
    use ladder_fm::params::ParameterStore;
    use ladder_fm::pipeline::{AudioPipeline, EngineParam, OutputSink, ToneSource};
    use ladder_fm::presets;

    const BLOCK: usize = 256;

    /// Toy two-operator FM voice standing in for the external tone engine.
    struct FmTone {
        sample_rate: f32,
        carrier_phase: f32,
        modulator_phase: f32,
        frequency: f32,
        ratio: f32,
        index: f32,
        level: f32,
        target: f32,
        velocity: f32,
    }

    impl FmTone {
        fn new(sample_rate: f32) -> Self {
            Self {
                sample_rate,
                carrier_phase: 0.0,
                modulator_phase: 0.0,
                frequency: 0.0,
                ratio: 1.0,
                index: 2.0,
                level: 0.0,
                target: 0.0,
                velocity: 0.0,
            }
        }
    }

    impl ToneSource for FmTone {
        fn generate(&mut self, out: &mut [f32]) {
            if self.frequency == 0.0 {
                out.fill(0.0);
                return;
            }
            let carrier_step = TAU * self.frequency / self.sample_rate;
            let modulator_step = carrier_step * self.ratio;
            for sample in out.iter_mut() {
                // One-pole envelope smoothing toward the gate target
                self.level += 0.002 * (self.target - self.level);
                let modulation = self.index * self.modulator_phase.sin();
                *sample = self.velocity * self.level * (self.carrier_phase + modulation).sin();
                self.carrier_phase = (self.carrier_phase + carrier_step) % TAU;
                self.modulator_phase = (self.modulator_phase + modulator_step) % TAU;
            }
        }

        fn note_on(&mut self, note: u8, velocity: f32) {
            self.frequency = 440.0 * 2.0f32.powf((note as f32 - 69.0) / 12.0);
            self.velocity = velocity;
            self.target = 1.0;
        }

        fn note_off(&mut self, _note: u8) {
            self.target = 0.0;
        }

        fn set_parameter(&mut self, param: EngineParam, value: f32) {
            match param {
                EngineParam::Ratio => self.ratio = (value * 10.0).max(0.1),
                EngineParam::ModIndex => self.index = value * 10.0,
                _ => {}
            }
        }
    }

    /// Pushes interleaved stereo frames toward the cpal callback.
    struct RingSink {
        tx: Producer<f32>,
    }

    impl OutputSink for RingSink {
        fn output(&mut self, left: &[f32], right: &[f32]) {
            for (l, r) in left.iter().zip(right.iter()) {
                let _ = self.tx.push(*l);
                let _ = self.tx.push(*r);
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("no default output device available")?;
        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        println!("=== ladder_fm live demo ===");
        println!("Sample rate: {} Hz, {} channels", sample_rate, channels);

        let params = Arc::new(ParameterStore::new());
        let (tone_tx, tone_rx) = RingBuffer::new(256);
        let (mut event_tx, mut event_rx) = RingBuffer::new(256);
        let (sample_tx, mut sample_rx) = RingBuffer::new(BLOCK * 8);

        let stop = Arc::new(AtomicBool::new(false));

        // Audio context: pipeline at block cadence, feeding the sample ring.
        let audio_thread = {
            let params = params.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                let mut pipeline = AudioPipeline::new(
                    sample_rate,
                    params,
                    Box::new(FmTone::new(sample_rate)),
                    Vec::new(),
                    Box::new(RingSink { tx: sample_tx }),
                    tone_rx,
                );
                // Fixed block cadence; the ring absorbs scheduling jitter.
                let block_duration =
                    Duration::from_secs_f64(BLOCK as f64 / sample_rate as f64);
                let mut next = Instant::now();
                while !stop.load(Ordering::Acquire) {
                    pipeline.process_block(BLOCK);
                    next += block_duration;
                    let now = Instant::now();
                    if next > now {
                        thread::sleep(next - now);
                    } else {
                        next = now;
                    }
                }
            })
        };

        // Control context: drain events, then yield.
        let control_thread = {
            let params = params.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                let mut handler = ControlHandler::new(params, tone_tx);
                while !stop.load(Ordering::Acquire) {
                    handler.drain(&mut event_rx);
                    thread::sleep(Duration::from_millis(10));
                }
            })
        };

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let left = sample_rx.pop().unwrap_or(0.0);
                    let right = sample_rx.pop().unwrap_or(left);
                    for (ch, slot) in frame.iter_mut().enumerate() {
                        *slot = if ch == 1 { right } else { left };
                    }
                }
            },
            |err| eprintln!("audio error: {}", err),
            None,
        )?;
        stream.play()?;

        // Fat Bass, then a short riff with a cutoff sweep.
        println!("Preset: {}", presets::name(2));
        event_tx
            .push(ControlEvent::ProgramChange {
                channel: 0,
                program: 2,
            })
            .ok();

        for (i, note) in [36u8, 43, 48, 43, 36, 40, 43, 48].iter().enumerate() {
            event_tx
                .push(ControlEvent::NoteOn {
                    channel: 0,
                    note: *note,
                    velocity: 110,
                })
                .ok();
            event_tx
                .push(ControlEvent::ControlChange {
                    channel: 0,
                    controller: 74,
                    value: (30 + i * 12) as u8,
                })
                .ok();
            thread::sleep(Duration::from_millis(400));
            event_tx
                .push(ControlEvent::NoteOff {
                    channel: 0,
                    note: *note,
                })
                .ok();
            thread::sleep(Duration::from_millis(100));
        }
        thread::sleep(Duration::from_millis(500));

        stop.store(true, Ordering::Release);
        audio_thread.join().ok();
        control_thread.join().ok();
        Ok(())
    }
}
