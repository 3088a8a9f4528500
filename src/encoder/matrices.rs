// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Matrix textures: camera, model, and per-object positions decode matrices.
//!
//! Each 4×4 matrix takes four RGBA32F texels in one row, column-major, so texel `k` of a matrix
//! is its `k`-th column.

use super::{DataTexture, TextureLayoutEncoder, check_len};
use crate::Error;
use crate::camera::{CameraMatrices, CameraTextureBinding, PickCameraTexture};
use crate::layout::{Category, TextureLayout};
use crate::math::{packed_components, rtc_view_matrix};
use crate::packed::PackedBuffer;
use crate::pixel_formats::ComponentFormat;
use crate::sink::TextureSink;
use crate::stats::RamAccountant;
use glam::{DMat4, DVec3};

const MATRIX_COMPONENTS: usize = 16;

/// Writes view, view-normal and projection into rows 0, 1 and 2.
///
/// With an `origin` the view row holds the RTC view matrix instead of the raw one.
pub(crate) fn pack_camera_matrices(
    buffer: &mut PackedBuffer<f32>,
    camera: &CameraMatrices,
    origin: Option<DVec3>,
) {
    let view = match origin {
        Some(origin) => rtc_view_matrix(camera.view, origin),
        None => camera.view,
    };
    let rows = [view, camera.view_normal, camera.projection];
    for (row, matrix) in rows.iter().enumerate() {
        buffer.write(row * MATRIX_COMPONENTS, &packed_components(matrix));
    }
}

const CAMERA_LAYOUT: TextureLayout =
    TextureLayout::fixed(Category::Camera, ComponentFormat::RGBA32F, 3);
const MODEL_LAYOUT: TextureLayout =
    TextureLayout::fixed(Category::Model, ComponentFormat::RGBA32F, 2);

impl<S: TextureSink, A: RamAccountant> TextureLayoutEncoder<S, A> {
    /// Creates the camera texture and a binding that keeps it in step with the camera.
    ///
    /// The binding starts dirty and is refreshed once before it is returned, so the texture
    /// is valid immediately.
    pub fn camera_texture(
        &mut self,
        camera: &CameraMatrices,
        origin: Option<DVec3>,
    ) -> CameraTextureBinding<S::Handle> {
        let buffer = PackedBuffer::zeroed(CAMERA_LAYOUT);
        let texture = self.create(CAMERA_LAYOUT, buffer.byte_len(), None);
        let mut binding = CameraTextureBinding::new(texture, buffer, origin);
        binding.refresh_if_dirty(self, camera);
        binding
    }

    /// Creates a camera texture for picking passes.
    ///
    /// Texture contents are undefined until [`PickCameraTexture::update`] is called.
    pub fn pick_camera_texture(&mut self, origin: Option<DVec3>) -> PickCameraTexture<S::Handle> {
        let buffer = PackedBuffer::zeroed(CAMERA_LAYOUT);
        let texture = self.create(CAMERA_LAYOUT, buffer.byte_len(), None);
        PickCameraTexture::new(texture, buffer, origin)
    }

    /// Packs a model's world matrix (row 0) and world normal matrix (row 1).
    pub fn model_texture(
        &mut self,
        world: &DMat4,
        world_normal: &DMat4,
    ) -> DataTexture<S::Handle> {
        let mut buffer = PackedBuffer::zeroed(MODEL_LAYOUT);
        buffer.write(0, &packed_components(world));
        buffer.write(MATRIX_COMPONENTS, &packed_components(world_normal));
        self.upload(&buffer)
    }

    /// Packs one matrix per object: `instance[i] * decode[i]`, composed here in double
    /// precision so the shader never multiplies per vertex.
    ///
    /// Pass `None` for `instance` when objects are not instanced.
    pub fn positions_decode_matrices_texture(
        &mut self,
        decode: &[DMat4],
        instance: Option<&[DMat4]>,
    ) -> Result<DataTexture<S::Handle>, Error> {
        let category = Category::PositionsDecodeMatrices;
        if let Some(instance) = instance {
            check_len(category, decode.len(), instance.len())?;
        }
        let layout = TextureLayout::for_records(category, ComponentFormat::RGBA32F, decode.len())?;
        let mut buffer = PackedBuffer::zeroed(layout);
        for (i, decode) in decode.iter().enumerate() {
            let composed = match instance {
                Some(instance) => instance[i] * *decode,
                None => *decode,
            };
            buffer.write(layout.record_offset(i), &packed_components(&composed));
        }
        Ok(self.upload(&buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Texel;
    use crate::software::{SoftwareSink, SoftwareTextureId};
    use crate::stats::DataTextureRamStats;

    fn encoder() -> TextureLayoutEncoder<SoftwareSink, DataTextureRamStats> {
        TextureLayoutEncoder::new(
            SoftwareSink::new(),
            DataTextureRamStats::new(),
            Default::default(),
        )
    }

    fn matrix_at(
        encoder: &TextureLayoutEncoder<SoftwareSink, DataTextureRamStats>,
        id: &SoftwareTextureId,
        x: u32,
        y: u32,
    ) -> Vec<f32> {
        let texture = encoder.sink().texture(id).unwrap();
        (0..4)
            .flat_map(|k| texture.texel::<f32>(Texel { x: x + k, y }))
            .collect()
    }

    #[test]
    fn model_rows() {
        let mut encoder = encoder();
        let world = DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0));
        let normal = DMat4::from_scale(DVec3::splat(2.0));
        let texture = encoder.model_texture(&world, &normal);
        assert_eq!((texture.width(), texture.height()), (4, 2));
        assert_eq!(
            matrix_at(&encoder, texture.handle(), 0, 0),
            world.as_mat4().to_cols_array()
        );
        assert_eq!(
            matrix_at(&encoder, texture.handle(), 0, 1),
            normal.as_mat4().to_cols_array()
        );
        assert_eq!(encoder.accountant().number_of_textures(), 0);
    }

    #[test]
    fn decode_matrices_are_composed() {
        let mut encoder = encoder();
        let decode: Vec<DMat4> = (0..513)
            .map(|i| DMat4::from_scale(DVec3::splat(1.0 + i as f64)))
            .collect();
        let instance: Vec<DMat4> = (0..513)
            .map(|i| DMat4::from_translation(DVec3::new(i as f64, 0.0, 0.0)))
            .collect();
        let texture = encoder
            .positions_decode_matrices_texture(&decode, Some(&instance))
            .unwrap();
        assert_eq!((texture.width(), texture.height()), (2048, 2));
        let expected = (instance[512] * decode[512]).as_mat4().to_cols_array();
        assert_eq!(matrix_at(&encoder, texture.handle(), 0, 1), expected);
        let expected = (instance[1] * decode[1]).as_mat4().to_cols_array();
        assert_eq!(matrix_at(&encoder, texture.handle(), 4, 0), expected);
        // unused slot after the last object
        assert_eq!(matrix_at(&encoder, texture.handle(), 4, 1), vec![0.0; 16]);
        assert_eq!(
            encoder.accountant().bytes(Category::PositionsDecodeMatrices),
            2048 * 2 * 16
        );
    }

    #[test]
    fn decode_without_instancing() {
        let mut encoder = encoder();
        let decode = [DMat4::from_scale(DVec3::new(0.5, 0.25, 0.125))];
        let texture = encoder
            .positions_decode_matrices_texture(&decode, None)
            .unwrap();
        assert_eq!(
            matrix_at(&encoder, texture.handle(), 0, 0),
            decode[0].as_mat4().to_cols_array()
        );
    }

    #[test]
    fn decode_errors() {
        let mut encoder = encoder();
        assert_eq!(
            encoder
                .positions_decode_matrices_texture(&[], None)
                .unwrap_err(),
            Error::ZeroHeight {
                category: Category::PositionsDecodeMatrices
            }
        );
        let decode = [DMat4::IDENTITY; 2];
        let instance = [DMat4::IDENTITY; 1];
        assert_eq!(
            encoder
                .positions_decode_matrices_texture(&decode, Some(&instance))
                .unwrap_err(),
            Error::LengthMismatch {
                category: Category::PositionsDecodeMatrices,
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(encoder.sink().len(), 0);
    }
}
