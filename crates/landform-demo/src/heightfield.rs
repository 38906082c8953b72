//! Synthetic height-field capture for the demo pipeline.
//!
//! Composites multiple octaves of simplex noise into a byte height field
//! and thresholds it against a sea level to produce the active mask,
//! honoring the capture channel-layout convention (height, cluster id,
//! visited, mask).

use glam::IVec2;
use landform_pixel::{Channel, PixelBuffer};
use noise::{NoiseFn, Simplex};

/// Configuration for the fBm capture bake.
#[derive(Clone, Debug)]
pub struct HeightFieldParams {
    /// Noise seed.
    pub seed: u32,
    /// Number of noise octaves to composite.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency of the first octave, in cycles per pixel.
    pub base_frequency: f64,
    /// Height below which a pixel is masked out as water.
    pub sea_level: u8,
}

impl Default for HeightFieldParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 5,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.04,
            sea_level: 90,
        }
    }
}

/// Bakes a square 4-channel capture of fBm terrain.
///
/// Heights are normalized into the full byte range; pixels at or above
/// `sea_level` get their mask flag set. Cluster-id and visited channels
/// start zeroed.
pub fn bake_capture(resolution: u32, params: &HeightFieldParams) -> PixelBuffer {
    let noise = Simplex::new(params.seed);
    let max_amplitude = max_amplitude(params);
    let mut buffer = PixelBuffer::new(IVec2::splat(resolution as i32), 4);

    for y in 0..resolution as i32 {
        for x in 0..resolution as i32 {
            let mut total = 0.0;
            let mut frequency = params.base_frequency;
            let mut amplitude = 1.0;
            for _ in 0..params.octaves {
                total += noise.get([x as f64 * frequency, y as f64 * frequency]) * amplitude;
                frequency *= params.lacunarity;
                amplitude *= params.persistence;
            }

            // Map [-max_amplitude, max_amplitude] onto the byte range.
            let normalized = (total / max_amplitude + 1.0) * 0.5;
            let height = (normalized.clamp(0.0, 1.0) * 255.0) as u8;

            let pos = IVec2::new(x, y);
            if let Some(index) = buffer.index_of(pos) {
                buffer.write(height, index, Channel::Height);
                if height >= params.sea_level {
                    buffer.write(u8::MAX, index, Channel::Mask);
                }
            }
        }
    }
    buffer
}

/// Geometric sum of all octave amplitudes.
fn max_amplitude(params: &HeightFieldParams) -> f64 {
    let mut sum = 0.0;
    let mut amplitude = 1.0;
    for _ in 0..params.octaves {
        sum += amplitude;
        amplitude *= params.persistence;
    }
    sum
}
