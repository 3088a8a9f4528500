// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! data_textures packs scene attributes into GPU *data textures*: 2D integer or float textures
used as random-access lookup tables, read with direct texel fetches rather than sampled.

A batched renderer draws thousands of objects in one call.  Whatever varies per object or per
vertex (colors, pick colors, decode matrices, offsets, positions, indices) has to live somewhere
a shader can index.  This crate decides where: every record kind gets a fixed texture width and a
row-major layout, so a shader recovers record `i` from `i` and the width alone.

| Class            | Records                              | Width | Format           |
|------------------|--------------------------------------|-------|------------------|
| Camera           | view, view normal, projection        | 4     | RGBA32F          |
| Model            | world, world normal                  | 4     | RGBA32F          |
| Colors and flags | one 32-byte block per object         | 4096  | RGBA8UI          |
| Offsets          | one XYZ per object                   | 512   | RGB32F           |
| Decode matrices  | one 4×4 per object                   | 2048  | RGBA32F          |
| Indices          | one triangle per texel               | 4096  | RGB8/16/32UI     |
| Edge indices     | one edge per texel                   | 4096  | RG8/16/32UI      |
| Positions        | one quantized vertex per texel       | 4096  | RGB16UI          |
| Portion ids      | one id per vertex                    | 4096  | R16UI            |

# Getting started

Build a [`TextureLayoutEncoder`](encoder::TextureLayoutEncoder) over a
[`TextureSink`](sink::TextureSink) and a [`RamAccountant`](stats::RamAccountant):

```
use data_textures::encoder::{EncoderConfig, ObjectRecord, TextureLayoutEncoder};
use data_textures::layout::Category;
use data_textures::software::SoftwareSink;
use data_textures::stats::DataTextureRamStats;

let stats = DataTextureRamStats::new();
let mut encoder = TextureLayoutEncoder::new(SoftwareSink::new(), &stats, EncoderConfig::default());

let objects = [ObjectRecord { color: [255, 0, 0, 255], solid: true, ..Default::default() }];
let metadata = encoder.colors_and_flags_texture(&objects).unwrap();
assert_eq!(metadata.texture().width(), 4096);

// no edges for this layer
assert!(encoder.edge_indices_texture::<u16>(&[]).unwrap().is_none());

assert_eq!(stats.bytes(Category::ColorsAndFlags), 4096 * 4);
```

# Backends

[`SoftwareSink`](software::SoftwareSink) keeps textures in CPU memory.  With the `backend_wgpu`
feature (on by default) `WgpuSink` allocates real textures on a `wgpu::Device`.

# Errors

Encoding a mandatory category from empty input fails with [`Error::ZeroHeight`].  Optional
categories (indices, edge indices, portion ids) return `Ok(None)` instead, and nothing is created.
*/

pub mod bittricks;
pub mod camera;
pub mod dirty_tracking;
pub mod encoder;
mod error;
pub mod layout;
pub mod math;
pub mod packed;
pub mod pixel_formats;
pub mod sink;
pub mod software;
pub mod stats;
pub mod visible_to;

mod imp;

pub use error::Error;

#[cfg(feature = "backend_wgpu")]
pub use imp::{WgpuDataTexture, WgpuSink, widen_for_upload, wgpu_format};

pub use glam;
