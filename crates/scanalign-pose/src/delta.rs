use glam::DMat4;

use crate::error::PoseError;

// |det| below this is treated as singular; well-formed rigid transforms have
// |det| == 1, so the margin is generous.
const SINGULARITY_EPS: f64 = 1e-12;

/// Compute the rigid delta that maps the imported effective pose onto the
/// reference effective pose:
///
/// `delta = reference_eff * inverse(imported_eff)`
///
/// so that `delta * imported_eff == reference_eff`.
///
/// # Arguments
///
/// * `reference_eff` - Effective transform of the reference entity.
/// * `imported_eff` - Effective transform of the imported entity, raw.
///
/// # Returns
///
/// The delta transform, or [`PoseError::SingularTransform`] when the imported
/// effective transform is not invertible. Callers must skip the entity in
/// that case rather than propagate a corrupt pose.
pub fn compute_delta(reference_eff: &DMat4, imported_eff: &DMat4) -> Result<DMat4, PoseError> {
    let determinant = imported_eff.determinant();
    if determinant.abs() < SINGULARITY_EPS {
        return Err(PoseError::SingularTransform { determinant });
    }
    Ok(*reference_eff * imported_eff.inverse())
}

/// Apply a delta to a local transform multiplicatively: `delta * local`.
///
/// The local transform is never overwritten wholesale; composing on the left
/// preserves the entity's existing relationship to its group frame.
pub fn apply_delta(delta: &DMat4, local: &DMat4) -> DMat4 {
    *delta * *local
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{DQuat, DVec3};

    fn mat_eq(a: &DMat4, b: &DMat4, eps: f64) {
        for (x, y) in a.to_cols_array().into_iter().zip(b.to_cols_array()) {
            assert_relative_eq!(x, y, epsilon = eps);
        }
    }

    fn pose(axis: DVec3, angle: f64, t: DVec3) -> DMat4 {
        DMat4::from_rotation_translation(DQuat::from_axis_angle(axis.normalize(), angle), t)
    }

    #[test]
    fn test_delta_reconciles_poses() {
        let reference = pose(DVec3::new(0.3, 1.0, -0.2), 0.7, DVec3::new(12.0, -3.5, 4.1));
        let imported = pose(DVec3::new(1.0, 0.1, 0.4), -1.3, DVec3::new(-2.0, 8.0, 0.5));

        let delta = compute_delta(&reference, &imported).unwrap();
        mat_eq(&(delta * imported), &reference, 1e-9);
    }

    #[test]
    fn test_delta_applied_to_local_recomposes_without_group_transform() {
        // both entities sit in a group that imposes no transform of its own,
        // so effective == local and the delta recomposes exactly
        let reference_local = pose(DVec3::X, 0.2, DVec3::new(1.0, 2.0, 3.0));
        let imported_local = pose(DVec3::Y, -0.9, DVec3::new(-4.0, 0.5, 2.0));

        let delta = compute_delta(&reference_local, &imported_local).unwrap();
        let aligned_local = apply_delta(&delta, &imported_local);
        mat_eq(&aligned_local, &reference_local, 1e-9);
    }

    #[test]
    fn test_delta_through_identity_group_transform() {
        // recomposition through a group holds when the group transform
        // commutes with the delta; identity is the common case
        let group = DMat4::IDENTITY;
        let reference_local = pose(DVec3::new(0.1, 0.9, 0.2), 1.1, DVec3::new(7.0, -1.0, 2.5));
        let imported_local = pose(DVec3::new(0.8, 0.0, 0.6), -0.4, DVec3::new(0.0, 3.0, -9.0));

        let reference_eff = group * reference_local;
        let imported_eff = group * imported_local;

        let delta = compute_delta(&reference_eff, &imported_eff).unwrap();
        let aligned_local = apply_delta(&delta, &imported_local);
        mat_eq(&(group * aligned_local), &reference_eff, 1e-9);
    }

    #[test]
    fn test_identity_inputs_give_identity_delta() {
        let delta = compute_delta(&DMat4::IDENTITY, &DMat4::IDENTITY).unwrap();
        mat_eq(&delta, &DMat4::IDENTITY, 1e-12);
    }

    #[test]
    fn test_singular_imported_transform_is_rejected() {
        let singular = DMat4::ZERO;
        let err = compute_delta(&DMat4::IDENTITY, &singular).unwrap_err();
        assert!(matches!(err, PoseError::SingularTransform { .. }));
    }
}
