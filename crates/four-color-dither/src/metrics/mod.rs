//! Image quality metrics between an original and a reconstruction.
//!
//! Used to judge how well a dithered (and reconverted) image preserves the
//! original. All functions require buffers of identical dimensions.

use crate::api::DitherError;
use crate::color::{Lab, Rgb, BT709};
use crate::output::PixelBuffer;

/// SSIM window edge length.
pub const SSIM_WINDOW: usize = 7;

const SSIM_C1: f64 = (0.01 * 255.0) * (0.01 * 255.0);
const SSIM_C2: f64 = (0.03 * 255.0) * (0.03 * 255.0);

/// All metrics of one comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMetrics {
    /// Peak signal-to-noise ratio in dB; infinite for identical images
    pub psnr: f64,
    /// Mean structural similarity of BT.709 gray, -1..=1
    pub ssim: f64,
    /// Mean CIE76 color difference
    pub mean_delta_e: f64,
    /// Mean per-channel histogram correlation, -1..=1
    pub histogram_correlation: f64,
    /// Weighted 0..=1 score, higher is better
    pub composite: f64,
}

impl ImageMetrics {
    /// Compute every metric.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::DimensionMismatch`] if the buffers differ in size.
    ///
    /// ```
    /// use four_color_dither::{ImageMetrics, PixelBuffer, Rgb};
    ///
    /// let a = PixelBuffer::from_rgb(&[Rgb::new(10, 200, 30); 4], 2, 2).unwrap();
    /// let m = ImageMetrics::compute(&a, &a).unwrap();
    /// assert!(m.psnr.is_infinite());
    /// assert!((m.composite - 1.0).abs() < 1e-9);
    /// ```
    pub fn compute(original: &PixelBuffer, reconstructed: &PixelBuffer) -> Result<Self, DitherError> {
        let psnr = psnr(original, reconstructed)?;
        let ssim = ssim(original, reconstructed)?;
        let mean_delta_e = mean_delta_e(original, reconstructed)?;
        let histogram_correlation = histogram_correlation(original, reconstructed)?;
        let composite = composite_score(psnr, ssim, mean_delta_e, histogram_correlation);
        tracing::debug!(psnr, ssim, mean_delta_e, histogram_correlation, composite, "image metrics");
        Ok(Self {
            psnr,
            ssim,
            mean_delta_e,
            histogram_correlation,
            composite,
        })
    }
}

/// Combine the four metrics into one 0..=1 score.
///
/// Weights: SSIM 0.40, color difference 0.30 (ΔE 30 scores zero), PSNR
/// 0.20 (50 dB scores one), histogram correlation 0.10. Each term is
/// clipped to 0..=1 before weighting.
pub fn composite_score(psnr: f64, ssim: f64, mean_delta_e: f64, histogram_correlation: f64) -> f64 {
    let unit = |v: f64| v.clamp(0.0, 1.0);
    0.40 * unit(ssim)
        + 0.30 * unit(1.0 - mean_delta_e / 30.0)
        + 0.20 * unit(psnr / 50.0)
        + 0.10 * unit(histogram_correlation)
}

/// Peak signal-to-noise ratio over the RGB channels, in dB.
pub fn psnr(original: &PixelBuffer, reconstructed: &PixelBuffer) -> Result<f64, DitherError> {
    original.check_same_size(reconstructed)?;
    let a = original.to_rgb();
    let b = reconstructed.to_rgb();
    let n = (a.len() * 3).max(1) as f64;
    let sum: f64 = a
        .iter()
        .zip(&b)
        .flat_map(|(p, q)| {
            let (p, q) = (p.to_f64(), q.to_f64());
            (0..3).map(move |c| (p[c] - q[c]) * (p[c] - q[c]))
        })
        .sum();
    let mse = sum / n;
    if mse < 1e-10 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (255.0 * 255.0 / mse).log10())
}

/// Mean SSIM of the BT.709 gray images using a 7x7 box window.
pub fn ssim(original: &PixelBuffer, reconstructed: &PixelBuffer) -> Result<f64, DitherError> {
    original.check_same_size(reconstructed)?;
    let (w, h) = (original.width(), original.height());
    if w == 0 || h == 0 {
        return Ok(1.0);
    }
    let x = gray(original);
    let y = gray(reconstructed);
    let xx: Vec<f64> = x.iter().map(|v| v * v).collect();
    let yy: Vec<f64> = y.iter().map(|v| v * v).collect();
    let xy: Vec<f64> = x.iter().zip(&y).map(|(a, b)| a * b).collect();

    let mu_x = box_filter(&x, w, h, SSIM_WINDOW);
    let mu_y = box_filter(&y, w, h, SSIM_WINDOW);
    let e_xx = box_filter(&xx, w, h, SSIM_WINDOW);
    let e_yy = box_filter(&yy, w, h, SSIM_WINDOW);
    let e_xy = box_filter(&xy, w, h, SSIM_WINDOW);

    let mut total = 0.0;
    for i in 0..w * h {
        let (mx, my) = (mu_x[i], mu_y[i]);
        let var_x = (e_xx[i] - mx * mx).max(0.0);
        let var_y = (e_yy[i] - my * my).max(0.0);
        let cov = e_xy[i] - mx * my;
        let num = (2.0 * mx * my + SSIM_C1) * (2.0 * cov + SSIM_C2);
        let den = (mx * mx + my * my + SSIM_C1) * (var_x + var_y + SSIM_C2);
        total += num / den;
    }
    Ok(total / (w * h) as f64)
}

/// Mean CIE76 ΔE between corresponding pixels.
pub fn mean_delta_e(original: &PixelBuffer, reconstructed: &PixelBuffer) -> Result<f64, DitherError> {
    original.check_same_size(reconstructed)?;
    let a = original.to_rgb();
    if a.is_empty() {
        return Ok(0.0);
    }
    let b = reconstructed.to_rgb();
    let sum: f64 = a
        .iter()
        .zip(&b)
        .map(|(&p, &q)| Lab::from(p).delta_e76(Lab::from(q)))
        .sum();
    Ok(sum / a.len() as f64)
}

/// Mean Pearson correlation of the three 256-bin channel histograms.
pub fn histogram_correlation(original: &PixelBuffer, reconstructed: &PixelBuffer) -> Result<f64, DitherError> {
    original.check_same_size(reconstructed)?;
    let a = original.to_rgb();
    let b = reconstructed.to_rgb();
    let total: f64 = (0..3).map(|c| correlation(&histogram(&a, c), &histogram(&b, c))).sum();
    Ok(total / 3.0)
}

fn histogram(pixels: &[Rgb], channel: usize) -> [f64; 256] {
    let mut hist = [0.0; 256];
    for p in pixels {
        hist[p.to_bytes()[channel] as usize] += 1.0;
    }
    hist
}

fn correlation(h1: &[f64; 256], h2: &[f64; 256]) -> f64 {
    let m1 = h1.iter().sum::<f64>() / 256.0;
    let m2 = h2.iter().sum::<f64>() / 256.0;
    let mut num = 0.0;
    let mut s1 = 0.0;
    let mut s2 = 0.0;
    for i in 0..256 {
        let (d1, d2) = (h1[i] - m1, h2[i] - m2);
        num += d1 * d2;
        s1 += d1 * d1;
        s2 += d2 * d2;
    }
    let den = (s1 * s2).sqrt();
    if den < 1e-10 {
        // Flat histograms (empty images)
        return if num < 1e-10 { 1.0 } else { 0.0 };
    }
    num / den
}

fn gray(buffer: &PixelBuffer) -> Vec<f64> {
    buffer
        .to_rgb()
        .into_iter()
        .map(|p| {
            let v = p.to_f64();
            BT709[0] * v[0] + BT709[1] * v[1] + BT709[2] * v[2]
        })
        .collect()
}

/// Centered `size` x `size` mean filter with edge-replicated borders.
fn box_filter(img: &[f64], width: usize, height: usize, size: usize) -> Vec<f64> {
    let half = (size / 2) as isize;
    let clamp = |v: isize, n: usize| v.clamp(0, n as isize - 1) as usize;

    let mut horiz = vec![0.0; img.len()];
    for y in 0..height {
        let row = &img[y * width..(y + 1) * width];
        for x in 0..width {
            horiz[y * width + x] = (-half..=half).map(|d| row[clamp(x as isize + d, width)]).sum();
        }
    }

    let mut out = vec![0.0; img.len()];
    let area = (size * size) as f64;
    for y in 0..height {
        for x in 0..width {
            let sum: f64 = (-half..=half)
                .map(|d| horiz[clamp(y as isize + d, height) * width + x])
                .sum();
            out[y * width + x] = sum / area;
        }
    }
    out
}
