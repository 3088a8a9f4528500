// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Matrix helpers.
//!
//! Scene matrices are kept in double precision and only narrowed to `f32` when packed, so that
//! composition (RTC views, instance × decode) happens before precision is lost.

use glam::{DMat4, DVec3};

/// Rewrites `view` so that it is relative to `origin`.
///
/// The rotation part is kept; the translation becomes the position of `origin` in view space.
/// Geometry stored relative to `origin` then lands in the same place as under the raw view
/// matrix, without ever forming large world coordinates in `f32`.
pub fn rtc_view_matrix(view: DMat4, origin: DVec3) -> DMat4 {
    let origin_in_view = view * origin.extend(1.0);
    let mut rtc = view;
    rtc.w_axis.x = origin_in_view.x;
    rtc.w_axis.y = origin_in_view.y;
    rtc.w_axis.z = origin_in_view.z;
    rtc
}

/// The sixteen components of `matrix`, column-major, narrowed to `f32`.
pub fn packed_components(matrix: &DMat4) -> [f32; 16] {
    matrix.as_mat4().to_cols_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;

    #[test]
    fn rtc_matches_raw_view_for_relative_points() {
        let view = DMat4::look_at_rh(
            DVec3::new(1.0e6 + 10.0, 5.0, 1.0e6),
            DVec3::new(1.0e6, 0.0, 1.0e6),
            DVec3::Y,
        );
        let origin = DVec3::new(1.0e6, 0.0, 1.0e6);
        let rtc = rtc_view_matrix(view, origin);
        let local = DVec3::new(1.5, -2.0, 0.25);
        let via_world = view.transform_point3(origin + local);
        let via_rtc = rtc.transform_point3(local);
        assert!((via_world - via_rtc).length() < 1e-6);
    }

    #[test]
    fn rtc_at_world_origin_is_identity_rewrite() {
        let view = DMat4::from_rotation_translation(
            DQuat::from_rotation_y(0.3),
            DVec3::new(1.0, 2.0, 3.0),
        );
        assert_eq!(rtc_view_matrix(view, DVec3::ZERO), view);
    }

    #[test]
    fn column_major() {
        let m = DMat4::from_translation(DVec3::new(7.0, 8.0, 9.0));
        let packed = packed_components(&m);
        assert_eq!(&packed[12..16], &[7.0, 8.0, 9.0, 1.0]);
        assert_eq!(packed[0], 1.0);
    }
}
