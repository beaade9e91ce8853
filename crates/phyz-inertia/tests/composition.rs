//! Composite-body scenarios for phyz-inertia.

use approx::{assert_relative_eq, assert_relative_ne};
use phyz_inertia::{Inertial, MassMatrix3, Pose3, Quat, Vec3, pose_from_xyz_rpy};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

const EPS: f64 = 1e-9;

fn unit_cube() -> MassMatrix3 {
    MassMatrix3::from_box(12.0, Vec3::new(1.0, 1.0, 1.0)).unwrap()
}

/// Cube of twice the edge and eight times the mass, at the origin.
fn big_cube() -> Inertial {
    let m = MassMatrix3::from_box(8.0 * 12.0, Vec3::new(1.0, 1.0, 1.0) * 2.0).unwrap();
    Inertial::new(m, Pose3::identity())
}

#[test]
fn eight_cubes_make_a_big_cube() {
    let cube = unit_cube();
    let at = |x: f64, y: f64, z: f64| {
        Inertial::new(cube, pose_from_xyz_rpy(x, y, z, 0.0, 0.0, 0.0))
    };

    let added = at(-0.5, -0.5, -0.5)
        + at(-0.5, 0.5, -0.5)
        + at(0.5, -0.5, -0.5)
        + at(0.5, 0.5, -0.5)
        + at(-0.5, -0.5, 0.5)
        + at(-0.5, 0.5, 0.5)
        + at(0.5, -0.5, 0.5)
        + at(0.5, 0.5, 0.5);

    assert_relative_eq!(added, big_cube(), epsilon = EPS);
    assert_relative_eq!(added.mass_matrix().mass(), 96.0);
    assert_relative_eq!(
        added.mass_matrix().diagonal_moments(),
        Vec3::new(64.0, 64.0, 64.0),
        epsilon = EPS
    );
}

#[test]
fn eight_rotated_cubes_make_a_big_cube() {
    // a cube's inertia is isotropic, so the orientation of each part is irrelevant
    let cube = unit_cube();
    let at = |x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64| {
        Inertial::new(cube, pose_from_xyz_rpy(x, y, z, roll, pitch, yaw))
    };

    let parts = [
        at(-0.5, -0.5, -0.5, 0.0, 0.0, 0.0),
        at(-0.5, 0.5, -0.5, FRAC_PI_2, 0.0, 0.0),
        at(0.5, -0.5, -0.5, 0.0, FRAC_PI_2, 0.0),
        at(0.5, 0.5, -0.5, 0.0, 0.0, FRAC_PI_2),
        at(-0.5, -0.5, 0.5, PI, 0.0, 0.0),
        at(-0.5, 0.5, 0.5, 0.0, PI, 0.0),
        at(0.5, -0.5, 0.5, 0.0, 0.0, PI),
        at(0.5, 0.5, 0.5, 0.0, 0.0, 0.0),
    ];
    let added: Inertial = parts.iter().sum();
    assert_relative_eq!(added, big_cube(), epsilon = EPS);
}

#[test]
fn rotated_half_cubes_match_in_reference_frame() {
    let tilt = pose_from_xyz_rpy(0.0, 0.0, 0.0, FRAC_PI_4, 0.0, 0.0);
    let cube = Inertial::new(unit_cube(), tilt);
    let half = MassMatrix3::from_box(6.0, Vec3::new(0.5, 1.0, 1.0)).unwrap();
    let left = Inertial::new(half, pose_from_xyz_rpy(-0.25, 0.0, 0.0, FRAC_PI_4, 0.0, 0.0));
    let right = Inertial::new(half, pose_from_xyz_rpy(0.25, 0.0, 0.0, FRAC_PI_4, 0.0, 0.0));

    for sum in [left + right, right + left] {
        // the sum is expressed in reference axes, so the inertials differ...
        assert_ne!(cube, sum);
        assert_relative_ne!(cube, sum, epsilon = EPS);
        assert_eq!(sum.pose().rotation, Quat::identity());
        // ...but the body is the same
        assert_relative_eq!(cube.mass_matrix().mass(), sum.mass_matrix().mass());
        assert_relative_eq!(
            cube.pose().translation.vector,
            sum.pose().translation.vector,
            epsilon = EPS
        );
        assert_relative_eq!(cube.moi(), sum.moi(), epsilon = EPS);
    }
}

#[test]
fn massless_parts_are_absorbed() {
    let link = Inertial::new(
        MassMatrix3::new(12.0, Vec3::new(2.0, 3.0, 4.0), Vec3::new(0.1, 0.2, 0.3)),
        pose_from_xyz_rpy(-1.0, 0.0, 0.0, 0.0, 0.2, 0.0),
    );
    let empty = Inertial::new(
        MassMatrix3::ZERO,
        pose_from_xyz_rpy(1.0, 0.0, 0.0, 0.0, 0.0, 0.0),
    );

    assert_eq!(link + empty, link);
    assert_eq!(empty + link, link);
    let total: Inertial = [empty, link, empty].into_iter().sum();
    assert_eq!(total, link);
}

#[test]
fn assembled_link_has_consistent_principal_axes() {
    // an L-shaped link: a long bar along X and a post along Z at one end
    let bar = Inertial::new(
        MassMatrix3::from_box(4.0, Vec3::new(2.0, 0.2, 0.2)).unwrap(),
        pose_from_xyz_rpy(1.0, 0.0, 0.0, 0.0, 0.0, 0.0),
    );
    let mut post_mm = MassMatrix3::ZERO;
    post_mm.set_from_cylinder_z(2.0, 1.0, 0.1).unwrap();
    let post = Inertial::new(post_mm, pose_from_xyz_rpy(2.0, 0.0, 0.5, 0.0, 0.0, 0.0));

    let link = bar + post;
    let mm = link.mass_matrix();
    assert!(mm.is_valid());
    assert_relative_eq!(mm.mass(), 6.0);
    assert_relative_eq!(
        link.pose().translation.vector,
        Vec3::new(4.0 / 3.0, 0.0, 1.0 / 6.0),
        epsilon = EPS
    );

    // the X-Z coupling tilts the principal axes inside the X-Z plane
    assert!(mm.ixz().abs() > 1e-3);
    let rot = mm.principal_axes_offset();
    let moments = mm.principal_moments();
    let r = rot.to_rotation_matrix().into_inner();
    assert_relative_eq!(
        r.transpose() * mm.moi() * r,
        phyz_inertia::Mat3::from_diagonal(&moments),
        epsilon = 1e-9
    );

    // the equivalent box reproduces the composite tensor
    let (size, box_rot) = mm.equivalent_box().unwrap();
    let boxed = Inertial::new(
        MassMatrix3::from_box(mm.mass(), size).unwrap(),
        Pose3::from_parts(link.pose().translation, box_rot),
    );
    assert_relative_eq!(boxed.moi(), link.moi(), epsilon = 1e-9);
}

#[test]
fn invalid_mass_matrix_is_rejected_by_inertial() {
    let mut inertial = Inertial::new(unit_cube(), Pose3::identity());
    let negative = MassMatrix3::new(-1.0, Vec3::new(2.0, 3.0, 4.0), Vec3::zeros());
    assert!(inertial.set_mass_matrix(negative).is_err());
    assert_eq!(*inertial.mass_matrix(), unit_cube());
}
