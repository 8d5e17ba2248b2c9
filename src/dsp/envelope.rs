/*
AR Envelope Implementation
==========================

This module implements a linear attack/release envelope generator. It shapes
the amplitude of the oscillator so a held button opens the sound smoothly and
letting go closes it again.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0). This multiplies
              the audio signal to control its amplitude over time.

  stage       Which phase of the envelope we're in: Idle, Attack or Release.
              A state machine governs transitions.

  gate        The note on/off signal. Gate high starts Attack, gate low starts
              Release, from wherever the level currently is.

  span        How many samples a full 0 → 1 (or 1 → 0) ramp takes:
              span = time_seconds * sample_rate.

  sample_rate Samples per second (e.g., 48000). Converts time in seconds to
              time in samples.


The Shape: Linear Ramps, No Sustain Stage
-----------------------------------------

  Level
    1.0 ┐     ╱‾‾‾‾‾‾‾‾‾‾‾‾‾‾╲
        │    ╱                 ╲
        │   ╱                   ╲
    0.0 └──╱─────────────────────╲──→ Time
          gate on             gate off
          Attack   (Idle @ 1)  Release  (Idle @ 0)

There is no sustain stage. When the attack reaches 1.0 the envelope simply
goes Idle, and Idle means "hold the current level". The peak is therefore
held for as long as the gate stays high, and after a release the level rests
at 0.0.


The Math: Time to Ramp
----------------------

The slope is fixed by the stage time, not by where the ramp starts:

    increment = 1.0 / (time_seconds * sample_rate) = 1.0 / span

Releasing from 0.5 with a 1 s release takes half a second. A retrigger during
release picks the attack up from the current level, so there's no jump back
to zero and no click beyond the change of slope.

Instead of adding `increment` every sample (which drifts over tens of
thousands of f32 additions) we remember where the ramp started and count
samples:

    attack:  level = start + elapsed / span
    release: level = start - elapsed / span

A 1 s release at 48 kHz from full level hits 0.0 on exactly sample 48000.
Changing a stage time mid-ramp re-anchors `start` at the current level, so the
new slope applies from the next sample without any jump.

Times at or below zero (or shorter than one sample) are instantaneous: the
span is clamped to one sample, so the full transition happens on the next
sample and we never divide by zero.


The State Machine
-----------------

         gate on                level >= 1
    ┌──────────────→ ┌────────┐ ──────────→ ┌──────┐
    │                │ Attack │             │ Idle │ (holds level)
    │   ┌──────────→ └────────┘ ←────────── └──────┘
    │   │ gate on        │         gate on     ↑
    │   │                │ gate off            │ level <= 0
    │   │                ↓                     │
    │   │           ┌─────────┐ ───────────────┘
    │   └────────── │ Release │
    │               └─────────┘ ←── gate off (from any stage)
*/

use super::{processor::SignalProcessor, sanitize};

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Holding level (0.0 after release, 1.0 after attack)
    Attack,  // Gate high, ramping up to 1.0
    Release, // Gate low, ramping down to 0.0
}

pub struct EnvelopeStage {
    // AR parameters (seconds)
    attack_time: f32,
    release_time: f32,
    sample_rate: f32,

    // Runtime state
    stage: EnvelopeState,
    level: f32,

    // Ramp bookkeeping (anchored at each gate or parameter change)
    ramp_start: f32,
    ramp_span: f32,
    ramp_elapsed: u32,
}

impl EnvelopeStage {
    pub fn new(sample_rate: f32) -> Self {
        Self::ar(sample_rate, 0.01, 0.3)
    }

    pub fn ar(sample_rate: f32, attack: f32, release: f32) -> Self {
        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate
        } else {
            48_000.0
        };

        Self {
            attack_time: sanitize_time(attack),
            release_time: sanitize_time(release),
            sample_rate,

            stage: EnvelopeState::Idle,
            level: 0.0,

            ramp_start: 0.0,
            ramp_span: 1.0,
            ramp_elapsed: 0,
        }
    }

    /// Gate high starts the attack, gate low starts the release.
    ///
    /// Both ramps start from the current level; nothing is reset.
    pub fn gate(&mut self, on: bool) {
        let stage = if on {
            EnvelopeState::Attack
        } else {
            EnvelopeState::Release
        };
        self.begin_ramp(stage);
    }

    /// Set the attack time. An attack in flight continues from its current
    /// level at the new rate.
    pub fn set_attack(&mut self, seconds: f32) {
        self.attack_time = sanitize_time(seconds);
        if self.stage == EnvelopeState::Attack {
            self.begin_ramp(EnvelopeState::Attack);
        }
    }

    /// Set the release time. A release in flight continues from its current
    /// level at the new rate.
    pub fn set_release(&mut self, seconds: f32) {
        self.release_time = sanitize_time(seconds);
        if self.stage == EnvelopeState::Release {
            self.begin_ramp(EnvelopeState::Release);
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return;
        }
        self.sample_rate = sample_rate;
        if self.stage != EnvelopeState::Idle {
            self.begin_ramp(self.stage);
        }
    }

    fn begin_ramp(&mut self, stage: EnvelopeState) {
        let seconds = match stage {
            EnvelopeState::Attack => self.attack_time,
            EnvelopeState::Release => self.release_time,
            EnvelopeState::Idle => 0.0,
        };

        self.stage = stage;
        self.ramp_start = self.level;
        self.ramp_span = ramp_span(seconds, self.sample_rate);
        self.ramp_elapsed = 0;
    }

    /// Advance the envelope by one sample and return the new level.
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {}

            EnvelopeState::Attack => {
                self.ramp_elapsed = self.ramp_elapsed.saturating_add(1);
                self.level = self.ramp_start + self.ramp_elapsed as f32 / self.ramp_span;

                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeState::Idle;
                }
            }

            EnvelopeState::Release => {
                self.ramp_elapsed = self.ramp_elapsed.saturating_add(1);
                self.level = self.ramp_start - self.ramp_elapsed as f32 / self.ramp_span;

                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Multiply `input` by the running envelope into `output`, one step per sample.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        for (out, &x) in output.iter_mut().zip(input.iter()) {
            *out = sanitize(x) * self.next_sample();
        }
    }

    /// Render the raw envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Returns true while a ramp is running.
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    /// Reset to idle at zero.
    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.ramp_start = 0.0;
        self.ramp_span = 1.0;
        self.ramp_elapsed = 0;
    }

    /// Get the current envelope level (0.0 to 1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Get the current envelope stage
    pub fn stage(&self) -> EnvelopeState {
        self.stage
    }

    pub fn attack(&self) -> f32 {
        self.attack_time
    }

    pub fn release(&self) -> f32 {
        self.release_time
    }
}

impl SignalProcessor for EnvelopeStage {
    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        sanitize(input) * self.next_sample()
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        self.process(input, output);
    }
}

fn sanitize_time(seconds: f32) -> f32 {
    sanitize(seconds).max(0.0)
}

/// Samples in a full ramp, never less than one.
fn ramp_span(seconds: f32, sample_rate: f32) -> f32 {
    let samples = seconds * sample_rate;
    if samples.is_finite() && samples > 1.0 {
        samples
    } else {
        1.0
    }
}
