/// World to lattice axis mapping (row-major: [lattice_x, lattice_y, lattice_z])
/// Lattice X = world Y, lattice Y (vertical) = world Z, lattice Z = world X
pub const AXIS_PERMUTATION: [[f64; 3]; 3] = [
    [0.0, 1.0, 0.0], // X = Y
    [0.0, 0.0, 1.0], // Y = Z
    [1.0, 0.0, 0.0], // Z = X
];

/// Constant added to the vertical lattice axis so the lowest point lands one
/// block below the start height
pub const VERTICAL_LATTICE_OFFSET: i64 = -1;

/// Apply the axis permutation to a world space offset.
pub fn permute_axes(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let input = [x, y, z];
    let mut output = [0.0; 3];

    for i in 0..3 {
        for j in 0..3 {
            output[i] += AXIS_PERMUTATION[i][j] * input[j];
        }
    }

    (output[0], output[1], output[2])
}

/// Inverse of [`permute_axes`]: lattice space offset back to world axes.
pub fn unpermute_axes(lx: f64, ly: f64, lz: f64) -> (f64, f64, f64) {
    let input = [lx, ly, lz];
    let mut output = [0.0; 3];

    // Permutation matrices are orthogonal, the transpose is the inverse
    for i in 0..3 {
        for j in 0..3 {
            output[j] += AXIS_PERMUTATION[i][j] * input[i];
        }
    }

    (output[0], output[1], output[2])
}
