use rtrb::{Consumer, Producer, RingBuffer};

use super::{ButtonId, ParameterId, Patch};
use crate::io::AudioBuffer;

/// Events a control thread can send to a patch running on the audio thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatchMessage {
    Button { id: ButtonId, value: u16 },
    Parameter { id: ParameterId, value: f32 },
}

const PATCH_QUEUE_SIZE: usize = 64;

/// Control-thread end: push events without blocking.
pub struct PatchHandle {
    tx: Producer<PatchMessage>,
}

impl PatchHandle {
    /// Returns false if the queue was full and the event was dropped.
    pub fn button(&mut self, id: ButtonId, pressed: bool) -> bool {
        let value = u16::from(pressed);
        self.tx.push(PatchMessage::Button { id, value }).is_ok()
    }

    /// Returns false if the queue was full and the event was dropped.
    pub fn parameter(&mut self, id: ParameterId, value: f32) -> bool {
        self.tx.push(PatchMessage::Parameter { id, value }).is_ok()
    }
}

/// Audio-thread end: a patch plus the queue feeding it.
///
/// Queued events are applied at the start of each block, in order, before any
/// audio is processed.
pub struct SharedPatch<P> {
    patch: P,
    rx: Consumer<PatchMessage>,
}

impl<P: Patch> SharedPatch<P> {
    pub fn new(patch: P) -> (Self, PatchHandle) {
        Self::with_capacity(patch, PATCH_QUEUE_SIZE)
    }

    pub fn with_capacity(patch: P, capacity: usize) -> (Self, PatchHandle) {
        let (tx, rx) = RingBuffer::<PatchMessage>::new(capacity);
        (Self { patch, rx }, PatchHandle { tx })
    }

    pub fn patch(&self) -> &P {
        &self.patch
    }

    pub fn patch_mut(&mut self) -> &mut P {
        &mut self.patch
    }

    /// Apply every queued event now.
    pub fn drain(&mut self) {
        while let Ok(msg) = self.rx.pop() {
            match msg {
                PatchMessage::Button { id, value } => self.patch.button_changed(id, value, 0),
                PatchMessage::Parameter { id, value } => self.patch.set_parameter(id, value),
            }
        }
    }
}

impl<P: Patch> Patch for SharedPatch<P> {
    fn process_audio(&mut self, buffer: &mut AudioBuffer) {
        self.drain();
        self.patch.process_audio(buffer);
    }

    fn button_changed(&mut self, id: ButtonId, value: u16, sample_offset: u16) {
        self.patch.button_changed(id, value, sample_offset);
    }

    fn set_parameter(&mut self, id: ParameterId, value: f32) {
        self.patch.set_parameter(id, value);
    }
}
