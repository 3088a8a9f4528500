// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! The texture layout encoder.

[`TextureLayoutEncoder`] turns CPU-side attribute arrays into data textures.  It has one operation
per record kind, and every operation runs the same steps:

1. validate the input and compute the [`TextureLayout`]
2. zero-fill a [`PackedBuffer`] and pack the records into it
3. create the texture on the [`TextureSink`], upload, set nearest/clamp-to-edge lookups
4. report the buffer size to the [`RamAccountant`]

| Operation                                                           | Width | Format               | Empty input     |
|---------------------------------------------------------------------|-------|----------------------|-----------------|
| [`camera_texture`](TextureLayoutEncoder::camera_texture)            | 4     | RGBA32F              | n/a             |
| [`model_texture`](TextureLayoutEncoder::model_texture)              | 4     | RGBA32F              | n/a             |
| [`colors_and_flags_texture`](TextureLayoutEncoder::colors_and_flags_texture) | 4096 | RGBA8UI      | error           |
| [`object_offsets_texture`](TextureLayoutEncoder::object_offsets_texture) | 512 | RGB32F             | error           |
| [`positions_decode_matrices_texture`](TextureLayoutEncoder::positions_decode_matrices_texture) | 2048 | RGBA32F | error |
| [`indices_texture`](TextureLayoutEncoder::indices_texture)          | 4096  | RGB8/16/32UI         | `None`          |
| [`edge_indices_texture`](TextureLayoutEncoder::edge_indices_texture) | 4096 | RG8/16/32UI          | `None`          |
| [`positions_texture`](TextureLayoutEncoder::positions_texture)      | 4096  | RGB16UI              | error           |
| [`portion_ids_texture`](TextureLayoutEncoder::portion_ids_texture)  | 4096  | R16UI                | `None`          |

The encoder keeps no state between operations.  Textures that are rewritten later (camera,
offsets) or read back on the CPU (colors and flags) keep their packed buffer; the rest drop it
after upload.
*/

mod geometry;
mod matrices;
mod metadata;
mod offsets;

pub use metadata::{
    COLORS_AND_FLAGS_RECORD_BYTES, ColorsAndFlagsTexture, ObjectMetadata, ObjectRecord,
};
pub use offsets::ObjectOffsetsTexture;
pub(crate) use matrices::pack_camera_matrices;

use crate::layout::{Category, TextureLayout};
use crate::packed::PackedBuffer;
use crate::pixel_formats::TexelComponent;
use crate::sink::{DataTextureConfig, Region, TextureSink};
use crate::stats::RamAccountant;
use crate::visible_to::TextureUsage;

/// Settings shared by every texture an encoder creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Prepended to each texture's debug label, as `"{prefix}_{category}"`.
    pub debug_prefix: String,
    /// Forwarded to the sink for every texture.
    pub visible_to: TextureUsage,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            debug_prefix: "dtx".to_string(),
            visible_to: TextureUsage::default(),
        }
    }
}

/// A created texture and its layout.
#[derive(Debug)]
pub struct DataTexture<H> {
    handle: H,
    layout: TextureLayout,
}

impl<H> DataTexture<H> {
    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn into_handle(self) -> H {
        self.handle
    }

    pub fn layout(&self) -> &TextureLayout {
        &self.layout
    }

    pub fn width(&self) -> u32 {
        self.layout.width()
    }

    pub fn height(&self) -> u32 {
        self.layout.height()
    }
}

/// Packs attribute arrays into data textures.  See the [module documentation](self).
#[derive(Debug)]
pub struct TextureLayoutEncoder<S, A> {
    sink: S,
    accountant: A,
    config: EncoderConfig,
}

impl<S: TextureSink, A: RamAccountant> TextureLayoutEncoder<S, A> {
    pub fn new(sink: S, accountant: A, config: EncoderConfig) -> Self {
        TextureLayoutEncoder {
            sink,
            accountant,
            config,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn accountant(&self) -> &A {
        &self.accountant
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn into_parts(self) -> (S, A) {
        (self.sink, self.accountant)
    }

    /// Creates a texture for `buffer`, uploads all of it and reports it.
    fn upload<C: TexelComponent>(&mut self, buffer: &PackedBuffer<C>) -> DataTexture<S::Handle> {
        self.create(*buffer.layout(), buffer.byte_len(), Some(buffer.as_bytes()))
    }

    /// Creates storage for `layout`, optionally fills it, and sets nearest/clamp lookups.
    fn create(
        &mut self,
        layout: TextureLayout,
        byte_len: usize,
        initial: Option<&[u8]>,
    ) -> DataTexture<S::Handle> {
        let category = layout.category();
        let debug_name = format!("{}_{}", self.config.debug_prefix, category.label());
        let config = DataTextureConfig {
            debug_name: &debug_name,
            layout,
            visible_to: self.config.visible_to,
        };
        let mut handle = self.sink.create_texture(&config);
        if let Some(bytes) = initial {
            self.sink
                .write_sub_image(&handle, Region::full(&layout), layout.format(), bytes);
        }
        self.sink.set_filtering_nearest_clamp_to_edge(&mut handle);
        if category.is_ram_tracked() {
            self.accountant.texture_created(category, byte_len);
        }
        logwise::info_sync!(
            "created {name} {width}x{height} {format} ({bytes} bytes)",
            name = logwise::privacy::LogIt(&debug_name),
            width = layout.width(),
            height = layout.height(),
            format = logwise::privacy::LogIt(layout.format()),
            bytes = byte_len
        );
        DataTexture { handle, layout }
    }

    /// Re-uploads `region` of a retained buffer into its existing texture.
    pub(crate) fn rewrite<C: TexelComponent>(
        &mut self,
        texture: &DataTexture<S::Handle>,
        buffer: &PackedBuffer<C>,
        region: Region,
    ) {
        debug_assert_eq!(texture.layout(), buffer.layout());
        let data = buffer.region(region);
        logwise::trace_sync!(
            "rewrite {category} region ({x},{y}) {w}x{h}",
            category = logwise::privacy::LogIt(texture.layout().category()),
            x = region.x,
            y = region.y,
            w = region.width,
            h = region.height
        );
        self.sink.write_sub_image(
            texture.handle(),
            region,
            texture.layout().format(),
            crate::pixel_formats::components_as_bytes(&data),
        );
    }
}

/// Checks that a per-object column has the expected length.
fn check_len(category: Category, expected: usize, actual: usize) -> Result<(), crate::Error> {
    if expected == actual {
        Ok(())
    } else {
        Err(crate::Error::LengthMismatch {
            category,
            expected,
            actual,
        })
    }
}

/// Checks that a flat input holds whole records, returning the record count.
fn whole_records(category: Category, len: usize, stride: usize) -> Result<usize, crate::Error> {
    if len % stride == 0 {
        Ok(len / stride)
    } else {
        Err(crate::Error::RaggedInput {
            category,
            len,
            stride,
        })
    }
}
