// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Camera textures.

The camera texture is the only data texture rewritten after creation.  [`CameraTextureBinding`]
is a two-state machine:

```text
             mark_dirty()
   ┌───────┐ ───────────▶ ┌───────┐
   │ Clean │              │ Dirty │
   └───────┘ ◀─────────── └───────┘
          refresh_if_dirty(): repack + one write
```

Wire the scene's "camera changed" notification to [`CameraTextureBinding::mark_dirty`] (or to a
clone of [`CameraTextureBinding::dirty_flag`]) and its "about to render" notification to
[`CameraTextureBinding::refresh_if_dirty`].  However many times the camera moves within a frame,
at most one upload happens per render.

[`PickCameraTexture`] packs the same three matrices but has no dirty tracking: picking uses an
arbitrary camera, so the caller updates it explicitly before each pick.
*/

use crate::dirty_tracking::DirtyFlag;
use crate::encoder::{DataTexture, TextureLayoutEncoder, pack_camera_matrices};
use crate::packed::PackedBuffer;
use crate::sink::{Region, TextureSink};
use crate::stats::RamAccountant;
use glam::{DMat4, DVec3};

/// The three matrices stored in a camera texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub view: DMat4,
    pub view_normal: DMat4,
    pub projection: DMat4,
}

impl CameraMatrices {
    /// Derives the view normal matrix (inverse transpose of `view`).
    pub fn new(view: DMat4, projection: DMat4) -> Self {
        CameraMatrices {
            view,
            view_normal: view.inverse().transpose(),
            projection,
        }
    }
}

/// Anything that can report current camera matrices.
pub trait CameraSource {
    fn camera_matrices(&self) -> CameraMatrices;
}

impl CameraSource for CameraMatrices {
    fn camera_matrices(&self) -> CameraMatrices {
        *self
    }
}

/// A camera texture kept in step with a live camera.
#[derive(Debug)]
pub struct CameraTextureBinding<H> {
    texture: DataTexture<H>,
    buffer: PackedBuffer<f32>,
    origin: Option<DVec3>,
    dirty: DirtyFlag,
}

impl<H> CameraTextureBinding<H> {
    pub(crate) fn new(
        texture: DataTexture<H>,
        buffer: PackedBuffer<f32>,
        origin: Option<DVec3>,
    ) -> Self {
        CameraTextureBinding {
            texture,
            buffer,
            origin,
            dirty: DirtyFlag::new(true),
        }
    }

    pub fn texture(&self) -> &DataTexture<H> {
        &self.texture
    }

    pub fn origin(&self) -> Option<DVec3> {
        self.origin
    }

    /// The CPU copy of the texture contents as of the last refresh.
    pub fn buffer(&self) -> &PackedBuffer<f32> {
        &self.buffer
    }

    /// Camera changed.
    pub fn mark_dirty(&self) {
        self.dirty.mark_dirty();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// A handle the camera can keep to mark this binding dirty.
    pub fn dirty_flag(&self) -> DirtyFlag {
        self.dirty.clone()
    }

    /// About to render.  Repacks and uploads the camera matrices if anything changed since the
    /// last refresh, returning whether an upload happened.
    pub fn refresh_if_dirty<S, A>(
        &mut self,
        encoder: &mut TextureLayoutEncoder<S, A>,
        camera: &impl CameraSource,
    ) -> bool
    where
        S: TextureSink<Handle = H>,
        A: RamAccountant,
    {
        if !self.dirty.take() {
            logwise::trace_sync!("camera texture clean; skipping upload");
            return false;
        }
        pack_camera_matrices(&mut self.buffer, &camera.camera_matrices(), self.origin);
        encoder.rewrite(&self.texture, &self.buffer, Region::full(self.texture.layout()));
        true
    }
}

/// A camera texture for picking passes, updated on demand.
#[derive(Debug)]
pub struct PickCameraTexture<H> {
    texture: DataTexture<H>,
    buffer: PackedBuffer<f32>,
    origin: Option<DVec3>,
}

impl<H> PickCameraTexture<H> {
    pub(crate) fn new(
        texture: DataTexture<H>,
        buffer: PackedBuffer<f32>,
        origin: Option<DVec3>,
    ) -> Self {
        PickCameraTexture {
            texture,
            buffer,
            origin,
        }
    }

    pub fn texture(&self) -> &DataTexture<H> {
        &self.texture
    }

    pub fn buffer(&self) -> &PackedBuffer<f32> {
        &self.buffer
    }

    /// Packs and uploads `camera`.  Call before every pick.
    pub fn update<S, A>(&mut self, encoder: &mut TextureLayoutEncoder<S, A>, camera: &CameraMatrices)
    where
        S: TextureSink<Handle = H>,
        A: RamAccountant,
    {
        pack_camera_matrices(&mut self.buffer, camera, self.origin);
        encoder.rewrite(&self.texture, &self.buffer, Region::full(self.texture.layout()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Texel;
    use crate::math::rtc_view_matrix;
    use crate::software::SoftwareSink;
    use crate::stats::NoAccounting;

    fn camera(eye_x: f64) -> CameraMatrices {
        CameraMatrices::new(
            DMat4::look_at_rh(DVec3::new(eye_x, 2.0, 10.0), DVec3::ZERO, DVec3::Y),
            DMat4::perspective_rh(1.0, 1.5, 0.1, 1000.0),
        )
    }

    fn encoder() -> TextureLayoutEncoder<SoftwareSink, NoAccounting> {
        TextureLayoutEncoder::new(SoftwareSink::new(), NoAccounting, Default::default())
    }

    fn row(buffer: &PackedBuffer<f32>, y: u32) -> Vec<f32> {
        (0..4)
            .flat_map(|x| buffer.texel(Texel { x, y }).to_vec())
            .collect()
    }

    #[test]
    fn created_with_one_upload() {
        let mut encoder = encoder();
        let binding = encoder.camera_texture(&camera(0.0), None);
        assert!(!binding.is_dirty());
        let texture = encoder.sink().texture(binding.texture().handle()).unwrap();
        // storage is allocated empty; the forced refresh is the only write
        assert_eq!(texture.write_count(), 1);
        assert!(texture.is_nearest_clamp_to_edge());
        assert_eq!((texture.layout().width(), texture.layout().height()), (4, 3));
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut encoder = encoder();
        let mut binding = encoder.camera_texture(&camera(0.0), None);
        let before = encoder.sink().texture(binding.texture().handle()).unwrap().write_count();

        binding.mark_dirty();
        assert!(binding.refresh_if_dirty(&mut encoder, &camera(1.0)));
        assert!(!binding.refresh_if_dirty(&mut encoder, &camera(1.0)));

        let after = encoder.sink().texture(binding.texture().handle()).unwrap().write_count();
        assert_eq!(after - before, 1);
    }

    #[test]
    fn bursts_coalesce() {
        let mut encoder = encoder();
        let mut binding = encoder.camera_texture(&camera(0.0), None);
        let notifier = binding.dirty_flag();
        let before = encoder.sink().texture(binding.texture().handle()).unwrap().write_count();
        for _ in 0..10 {
            notifier.mark_dirty();
        }
        assert!(binding.refresh_if_dirty(&mut encoder, &camera(3.0)));
        let after = encoder.sink().texture(binding.texture().handle()).unwrap().write_count();
        assert_eq!(after - before, 1);
        assert_eq!(row(binding.buffer(), 0), camera(3.0).view.as_mat4().to_cols_array());
    }

    #[test]
    fn rows_hold_view_normal_projection() {
        let mut encoder = encoder();
        let cam = camera(4.0);
        let binding = encoder.camera_texture(&cam, None);
        let stored = encoder.sink().texture(binding.texture().handle()).unwrap();
        let uploaded: Vec<f32> = (0..3)
            .flat_map(|y| (0..4).flat_map(move |x| stored.texel::<f32>(Texel { x, y })))
            .collect();
        let mut expected = Vec::new();
        expected.extend(cam.view.as_mat4().to_cols_array());
        expected.extend(cam.view_normal.as_mat4().to_cols_array());
        expected.extend(cam.projection.as_mat4().to_cols_array());
        assert_eq!(uploaded, expected);
    }

    #[test]
    fn origin_rewrites_view_only() {
        let mut encoder = encoder();
        let cam = camera(4.0);
        let origin = DVec3::new(100.0, 0.0, -50.0);
        let binding = encoder.camera_texture(&cam, Some(origin));
        assert_eq!(
            row(binding.buffer(), 0),
            rtc_view_matrix(cam.view, origin).as_mat4().to_cols_array()
        );
        assert_eq!(row(binding.buffer(), 1), cam.view_normal.as_mat4().to_cols_array());
        assert_eq!(row(binding.buffer(), 2), cam.projection.as_mat4().to_cols_array());
    }

    #[test]
    fn pick_camera_updates_explicitly() {
        let mut encoder = encoder();
        let mut pick = encoder.pick_camera_texture(None);
        assert!(pick.buffer().as_slice().iter().all(|c| *c == 0.0));
        let cam = camera(-2.0);
        pick.update(&mut encoder, &cam);
        pick.update(&mut encoder, &cam);
        let stored = encoder.sink().texture(pick.texture().handle()).unwrap();
        assert_eq!(stored.write_count(), 2);
        assert_eq!(row(pick.buffer(), 2), cam.projection.as_mat4().to_cols_array());
    }
}
