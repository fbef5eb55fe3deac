// Derived per-cell layer (heatmap, gradient, aspect): row-major Vec<Vec<T>>
// congruent to the grid it was computed from, access as `layer[y][x]`.
pub type CellMap<T> = Vec<Vec<T>>;

// Round to `places` decimals with ties going toward +infinity,
// so -0.125 becomes -0.12 and 0.125 becomes 0.13.
pub fn round_dp(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor + 0.5).floor() / factor
}

// Position of `value` inside [min, max] mapped to [0.0, 1.0].
// A zero-width range maps everything to 0.0.
pub fn normalize_unit(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return 0.0;
    }
    ((value - min) / range).clamp(0.0, 1.0)
}
