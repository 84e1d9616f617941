//! Contrast Limited Adaptive Histogram Equalization on one float channel.

/// Below this value range the channel is returned unchanged.
const RANGE_EPSILON: f64 = 1e-10;

/// Per-tile lookup curves, `grid * grid * n_bins` values in bin units.
struct TileCurves {
    grid: usize,
    n_bins: usize,
    curves: Vec<f64>,
}

impl TileCurves {
    #[inline]
    fn curve(&self, gy: usize, gx: usize) -> &[f64] {
        let start = (gy * self.grid + gx) * self.n_bins;
        &self.curves[start..start + self.n_bins]
    }
}

/// Tile boundaries along one axis: `[round(i*step), max(round((i+1)*step), start+1))`,
/// clipped to the image extent.
fn tile_span(i: usize, step: f64, extent: usize) -> (usize, usize) {
    let start = (i as f64 * step).round_ties_even() as usize;
    let end = ((i + 1) as f64 * step).round_ties_even() as usize;
    let end = end.max(start + 1);
    (start.min(extent), end.min(extent))
}

/// Clip-limited histogram equalization curve of one tile.
fn tile_curve(hist: &mut [f64], n_pixels: usize, clip_limit: f64, out: &mut [f64]) {
    let n_bins = hist.len();
    let limit = clip_limit * n_pixels as f64 / n_bins as f64;

    let mut excess = 0.0;
    for h in hist.iter_mut() {
        if *h > limit {
            excess += *h - limit;
            *h = limit;
        }
    }
    let share = excess / n_bins as f64;

    let mut acc = 0.0;
    let mut cdf_min = None;
    for (i, h) in hist.iter().enumerate() {
        acc += h + share;
        out[i] = acc;
        if cdf_min.is_none() && acc > 0.0 {
            cdf_min = Some(acc);
        }
    }

    let cdf_min = cdf_min.unwrap_or(0.0);
    let denom = n_pixels as f64 - cdf_min;
    if denom < 1.0 {
        for (i, v) in out.iter_mut().enumerate() {
            *v = i as f64;
        }
    } else {
        let top = (n_bins - 1) as f64;
        for v in out.iter_mut() {
            *v = (*v - cdf_min) / denom * top;
        }
    }
}

/// Continuous tile coordinate of pixel `i`: lower tile, upper tile, blend.
#[inline]
fn tile_position(i: usize, step: f64, grid: usize) -> (usize, usize, f64) {
    let f = (i as f64 + 0.5) / step - 0.5;
    let lo = f.floor();
    let frac = f - lo;
    let last = (grid - 1) as f64;
    let t0 = lo.clamp(0.0, last) as usize;
    let t1 = (lo + 1.0).clamp(0.0, last) as usize;
    (t0, t1, frac)
}

/// Apply CLAHE to a row-major `width x height` channel whose values lie in
/// `[value_min, value_max]`.
///
/// The image is split into `grid x grid` tiles. Each tile gets a
/// clip-limited equalization curve over `n_bins` bins, and each pixel
/// blends the curves of its four nearest tile centers bilinearly so there
/// are no seams at tile borders.
#[allow(clippy::too_many_arguments)]
pub fn clahe_channel(
    channel: &[f64],
    width: usize,
    height: usize,
    clip_limit: f64,
    grid: usize,
    value_min: f64,
    value_max: f64,
    n_bins: usize,
) -> Vec<f64> {
    let range = value_max - value_min;
    if range < RANGE_EPSILON || channel.is_empty() || grid == 0 || n_bins < 2 {
        return channel.to_vec();
    }

    let top = (n_bins - 1) as f64;
    let scaled: Vec<f64> = channel
        .iter()
        .map(|&v| ((v - value_min) / range * top).clamp(0.0, top))
        .collect();

    let row_step = height as f64 / grid as f64;
    let col_step = width as f64 / grid as f64;

    let mut tiles = TileCurves {
        grid,
        n_bins,
        curves: vec![0.0; grid * grid * n_bins],
    };
    let mut hist = vec![0.0; n_bins];
    let mut identity_tiles = 0usize;

    for gy in 0..grid {
        let (y0, y1) = tile_span(gy, row_step, height);
        for gx in 0..grid {
            let (x0, x1) = tile_span(gx, col_step, width);

            hist.fill(0.0);
            for y in y0..y1 {
                for &v in &scaled[y * width + x0..y * width + x1] {
                    hist[(v as usize).min(n_bins - 1)] += 1.0;
                }
            }
            let n_pixels = (y1 - y0) * (x1 - x0);

            let start = (gy * grid + gx) * n_bins;
            let out = &mut tiles.curves[start..start + n_bins];
            tile_curve(&mut hist, n_pixels, clip_limit, out);
            if out.iter().enumerate().all(|(i, &v)| v == i as f64) {
                identity_tiles += 1;
            }
        }
    }

    if identity_tiles > 0 {
        tracing::trace!(identity_tiles, grid, "CLAHE tiles degenerated to identity");
    }

    let mut result = Vec::with_capacity(scaled.len());
    for y in 0..height {
        let (gy0, gy1, fy) = tile_position(y, row_step, grid);
        for x in 0..width {
            let (gx0, gx1, fx) = tile_position(x, col_step, grid);

            let val = scaled[y * width + x];
            let idx = val.clamp(0.0, (n_bins - 2) as f64) as usize;
            let frac = val - idx as f64;
            let sample = |gy: usize, gx: usize| {
                let c = tiles.curve(gy, gx);
                c[idx] * (1.0 - frac) + c[idx + 1] * frac
            };

            let upper = sample(gy0, gx0) * (1.0 - fx) + sample(gy0, gx1) * fx;
            let lower = sample(gy1, gx0) * (1.0 - fx) + sample(gy1, gx1) * fx;
            let mapped = upper * (1.0 - fy) + lower * fy;

            result.push(mapped / top * range + value_min);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread(values: &[f64]) -> f64 {
        let max = values.iter().cloned().fold(f64::MIN, f64::max);
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        max - min
    }

    /// Low-contrast ramp between 40 and 60 on a 0..100 scale.
    fn narrow_ramp(w: usize, h: usize) -> Vec<f64> {
        (0..w * h)
            .map(|i| 40.0 + 20.0 * (i % w) as f64 / (w - 1) as f64)
            .collect()
    }

    #[test]
    fn test_degenerate_range_is_copy() {
        let ch = vec![3.0, 4.0, 5.0, 6.0];
        assert_eq!(clahe_channel(&ch, 2, 2, 2.0, 8, 1.0, 1.0, 256), ch);
    }

    #[test]
    fn test_output_stays_in_range() {
        let ch = narrow_ramp(32, 24);
        let out = clahe_channel(&ch, 32, 24, 4.0, 4, 0.0, 100.0, 256);
        assert_eq!(out.len(), ch.len());
        assert!(out.iter().all(|&v| (0.0..=100.0).contains(&v)));
    }

    #[test]
    fn test_stretches_low_contrast() {
        let ch = narrow_ramp(64, 16);
        let out = clahe_channel(&ch, 64, 16, 4.0, 2, 0.0, 100.0, 256);
        assert!(
            spread(&out) > spread(&ch),
            "CLAHE must widen a narrow ramp: {} -> {}",
            spread(&ch),
            spread(&out)
        );
    }

    #[test]
    fn test_higher_clip_limit_stretches_more() {
        let ch = narrow_ramp(64, 16);
        let weak = clahe_channel(&ch, 64, 16, 1.0, 2, 0.0, 100.0, 256);
        let strong = clahe_channel(&ch, 64, 16, 4.0, 2, 0.0, 100.0, 256);
        assert!(
            spread(&strong) > spread(&weak),
            "clip 4.0 ({}) must stretch more than clip 1.0 ({})",
            spread(&strong),
            spread(&weak)
        );
    }

    #[test]
    fn test_monotone_within_uniform_rows() {
        // A horizontal ramp stays ordered after remapping
        let ch = narrow_ramp(40, 4);
        let out = clahe_channel(&ch, 40, 4, 2.0, 1, 0.0, 100.0, 256);
        for x in 1..40 {
            assert!(out[x] >= out[x - 1] - 1e-9, "ramp order broken at x={x}");
        }
    }

    #[test]
    fn test_tiny_image_more_tiles_than_pixels() {
        let ch = vec![10.0, 90.0, 50.0];
        let out = clahe_channel(&ch, 3, 1, 2.0, 8, 0.0, 100.0, 256);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_tile_span_uses_half_even_rounding() {
        // 2.5 rounds to 2, 7.5 rounds to 8
        assert_eq!(tile_span(1, 2.5, 100), (2, 5));
        assert_eq!(tile_span(3, 2.5, 100), (8, 10));
        // Empty tiles beyond the image are clipped
        assert_eq!(tile_span(7, 1.0 / 8.0 * 3.0, 3), (3, 3));
    }
}
