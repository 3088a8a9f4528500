// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Per-vertex and per-primitive textures: triangle indices, edge indices, quantized positions,
//! portion ids.
//!
//! All four are 4096 texels wide with one primitive or vertex per texel.  The source array is
//! copied verbatim to the start of a zero-filled buffer, so texels past the last record read as
//! zero.  Consumers know the record count and never read past it.
//!
//! Index, edge and portion id textures are optional for a layer: empty input gives `Ok(None)`
//! and creates nothing.

use super::{DataTexture, TextureLayoutEncoder, whole_records};
use crate::Error;
use crate::layout::{Category, TextureLayout};
use crate::packed::PackedBuffer;
use crate::pixel_formats::{ComponentFormat, IndexComponent, TexelComponent};
use crate::sink::TextureSink;
use crate::stats::RamAccountant;

impl<S: TextureSink, A: RamAccountant> TextureLayoutEncoder<S, A> {
    /// Packs triangle vertex indices, three per texel.
    ///
    /// The caller picks the index type from the largest index it stores, see
    /// [`IndexWidth::for_max_index`](crate::pixel_formats::IndexWidth::for_max_index).
    pub fn indices_texture<I: IndexComponent>(
        &mut self,
        indices: &[I],
    ) -> Result<Option<DataTexture<S::Handle>>, Error> {
        self.pack_optional(Category::Indices, I::TRIANGLE_FORMAT, indices)
    }

    /// Packs edge vertex indices, two per texel.
    pub fn edge_indices_texture<I: IndexComponent>(
        &mut self,
        edge_indices: &[I],
    ) -> Result<Option<DataTexture<S::Handle>>, Error> {
        self.pack_optional(Category::EdgeIndices, I::EDGE_FORMAT, edge_indices)
    }

    /// Packs quantized positions as flat xyz triples, one vertex per texel.
    /// Fails when `positions` is empty.
    pub fn positions_texture(&mut self, positions: &[u16]) -> Result<DataTexture<S::Handle>, Error> {
        self.pack_flat(Category::Positions, ComponentFormat::RGB16UI, positions)
    }

    /// Packs one portion id per vertex.
    pub fn portion_ids_texture(
        &mut self,
        portion_ids: &[u16],
    ) -> Result<Option<DataTexture<S::Handle>>, Error> {
        self.pack_optional(Category::PortionIds, ComponentFormat::R16UI, portion_ids)
    }

    fn pack_optional<C: TexelComponent>(
        &mut self,
        category: Category,
        format: ComponentFormat,
        values: &[C],
    ) -> Result<Option<DataTexture<S::Handle>>, Error> {
        debug_assert!(category.absent_when_empty());
        if values.is_empty() {
            logwise::trace_sync!(
                "no {category} for this layer",
                category = logwise::privacy::LogIt(category)
            );
            return Ok(None);
        }
        self.pack_flat(category, format, values).map(Some)
    }

    fn pack_flat<C: TexelComponent>(
        &mut self,
        category: Category,
        format: ComponentFormat,
        values: &[C],
    ) -> Result<DataTexture<S::Handle>, Error> {
        let records = whole_records(category, values.len(), category.components_per_record())?;
        let layout = TextureLayout::for_records(category, format, records)?;
        let mut buffer = PackedBuffer::zeroed(layout);
        buffer.write(0, values);
        Ok(self.upload(&buffer))
    }
}
