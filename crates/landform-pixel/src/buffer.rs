//! Packed byte storage for height-field captures.
//!
//! A [`PixelBuffer`] owns a row-major byte array with a fixed channel count.
//! Bounds probes fail closed ([`PixelBuffer::index_of`]) and reads fail soft
//! ([`PixelBuffer::sample`]), so flood-fill loops can probe arbitrary
//! neighbor offsets near the buffer edge without interruption.

use glam::IVec2;
use thiserror::Error;
use tracing::error;

/// Maximum number of channels a buffer can carry.
pub const MAX_CHANNELS: usize = 4;

/// Channel codes for the capture layout convention.
///
/// A full capture carries all four channels. The 3-channel meshing snapshot
/// produced by [`PixelBuffer::meshing_snapshot`] carries only `Height`,
/// `ClusterId`, and `Visited`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Channel {
    /// Quantized height value.
    Height = 0,
    /// Assigned cluster id (0 = unassigned).
    ClusterId = 1,
    /// Visited flag for flood fills (0 = unvisited).
    Visited = 2,
    /// Active/mask flag (0 = inactive). Present only in 4-channel captures.
    Mask = 3,
}

impl Channel {
    /// Offset of this channel within a pixel's channel run.
    pub const fn offset(self) -> usize {
        self as usize
    }
}

/// Errors raised when constructing a buffer from raw parts.
#[derive(Debug, Error)]
pub enum PixelBufferError {
    /// The byte array length does not equal `width * height * channels`.
    #[error("data length {actual} does not match {width}x{height}x{channels}")]
    SizeMismatch {
        /// Buffer width in pixels.
        width: i32,
        /// Buffer height in pixels.
        height: i32,
        /// Channel count.
        channels: usize,
        /// Actual byte length supplied.
        actual: usize,
    },
    /// The channel count is zero or exceeds [`MAX_CHANNELS`].
    #[error("unsupported channel count {0} (expected 1..={MAX_CHANNELS})")]
    UnsupportedChannelCount(usize),
}

/// A packed, row-major, multi-channel byte buffer.
///
/// Invariant: `data.len() == width * height * channels`, so every in-range
/// pixel position maps to a unique, non-overlapping channel run.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    data: Vec<u8>,
    size: IVec2,
    channels: usize,
}

impl PixelBuffer {
    /// Creates a zero-filled buffer.
    ///
    /// # Panics
    ///
    /// Panics if `channels` is zero or exceeds [`MAX_CHANNELS`], or if either
    /// dimension is negative.
    pub fn new(size: IVec2, channels: usize) -> Self {
        assert!(
            channels >= 1 && channels <= MAX_CHANNELS,
            "unsupported channel count {channels}"
        );
        assert!(size.x >= 0 && size.y >= 0, "negative buffer size {size}");
        Self {
            data: vec![0; size.x as usize * size.y as usize * channels],
            size,
            channels,
        }
    }

    /// Wraps an existing byte array, checking the size invariant.
    pub fn from_raw(data: Vec<u8>, size: IVec2, channels: usize) -> Result<Self, PixelBufferError> {
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(PixelBufferError::UnsupportedChannelCount(channels));
        }
        let expected = size.x.max(0) as usize * size.y.max(0) as usize * channels;
        if size.x < 0 || size.y < 0 || data.len() != expected {
            return Err(PixelBufferError::SizeMismatch {
                width: size.x,
                height: size.y,
                channels,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            size,
            channels,
        })
    }

    /// Buffer dimensions in pixels.
    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// Number of channels per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// The raw backing bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Maps a pixel position to the start index of its channel run.
    ///
    /// Fails closed: returns `None` for out-of-bounds coordinates or a
    /// computed index outside the backing array. Never panics.
    pub fn index_of(&self, pos: IVec2) -> Option<usize> {
        if pos.x < 0 || pos.x >= self.size.x || pos.y < 0 || pos.y >= self.size.y {
            return None;
        }
        let index = (pos.x + pos.y * self.size.x) as usize * self.channels;
        (index < self.data.len()).then_some(index)
    }

    /// Reads all channels of the pixel starting at `index`.
    ///
    /// Channels beyond [`PixelBuffer::channels`] are zero. An invalid index
    /// yields an all-zero tuple rather than an error; callers that care must
    /// guard with [`PixelBuffer::index_of`] first.
    pub fn sample(&self, index: usize) -> [u8; MAX_CHANNELS] {
        let mut values = [0; MAX_CHANNELS];
        let run = index
            .checked_add(self.channels)
            .and_then(|end| self.data.get(index..end));
        match run {
            Some(run) => values[..self.channels].copy_from_slice(run),
            None => error!(index, len = self.data.len(), "pixel sample out of range"),
        }
        values
    }

    /// Writes one channel of the pixel starting at `index`.
    ///
    /// Unchecked by contract: callers are responsible for validating `index`
    /// with [`PixelBuffer::index_of`] beforehand.
    ///
    /// # Panics
    ///
    /// Panics if `index + channel` lands outside the backing array.
    pub fn write(&mut self, value: u8, index: usize, channel: Channel) {
        self.data[index + channel.offset()] = value;
    }

    /// Copies the `Height` and `ClusterId` channels into an owned 3-channel
    /// buffer with a zeroed `Visited` channel.
    ///
    /// This is the immutable snapshot handed to a per-cluster meshing worker:
    /// the worker's flood-fill mutations never race with the capture that
    /// produced the cluster metadata.
    pub fn meshing_snapshot(&self) -> PixelBuffer {
        let mut snapshot = PixelBuffer::new(self.size, 3);
        let pixel_count = self.size.x as usize * self.size.y as usize;
        for i in 0..pixel_count {
            let src = i * self.channels;
            let dst = i * 3;
            snapshot.data[dst + Channel::Height.offset()] =
                self.data[src + Channel::Height.offset()];
            if self.channels > Channel::ClusterId.offset() {
                snapshot.data[dst + Channel::ClusterId.offset()] =
                    self.data[src + Channel::ClusterId.offset()];
            }
        }
        snapshot
    }
}
