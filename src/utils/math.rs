pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// First-order lag of `current` toward `target`. The step gain is capped at
/// one so a single step never overshoots.
pub fn approach(current: f64, target: f64, rate: f64, delta_time: f64) -> f64 {
    current + (target - current) * (rate * delta_time).min(1.0)
}

pub fn retention(rate: f64, delta_time: f64) -> f64 {
    (1.0 - delta_time * rate).clamp(0.0, 1.0)
}
