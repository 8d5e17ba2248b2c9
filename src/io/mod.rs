// Purpose - host audio buffer boundary

/// Host channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left = 0,
    Right = 1,
}

/// One block of host-owned, pre-sized sample buffers (one per channel).
///
/// Patches read and write the buffers in place and never resize them, so a
/// buffer allocated once by the host can be reused for every callback.
#[derive(Debug, Default, Clone)]
pub struct AudioBuffer {
    pub buffers: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(channels: usize, block_size: usize) -> Self {
        Self {
            buffers: vec![vec![0.0; block_size]; channels],
        }
    }

    /// Mono buffer holding a copy of `samples`.
    pub fn from_mono(samples: &[f32]) -> Self {
        Self {
            buffers: vec![samples.to_vec()],
        }
    }

    pub fn channels(&self) -> usize {
        self.buffers.len()
    }

    pub fn block_size(&self) -> usize {
        self.buffers.first().map_or(0, Vec::len)
    }

    /// Samples of `channel`; empty if the host didn't supply that channel.
    pub fn samples(&self, channel: Channel) -> &[f32] {
        match self.buffers.get(channel as usize) {
            Some(buffer) => buffer.as_slice(),
            None => &[],
        }
    }

    pub fn samples_mut(&mut self, channel: Channel) -> &mut [f32] {
        match self.buffers.get_mut(channel as usize) {
            Some(buffer) => buffer.as_mut_slice(),
            None => &mut [],
        }
    }

    pub fn fill(&mut self, value: f32) {
        for buffer in &mut self.buffers {
            buffer.fill(value);
        }
    }
}
