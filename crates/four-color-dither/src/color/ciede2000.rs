//! CIEDE2000 color difference (Sharma, Wu & Dalal, 2005)

use super::lab::Lab;

const POW25_7: f64 = 6_103_515_625.0; // 25^7

/// Compute the CIEDE2000 color difference between two Lab colors.
///
/// Uses unit weighting factors (kL = kC = kH = 1). When either chroma is
/// zero the hue difference is zero and the mean hue is the plain sum of the
/// two hue angles, since the hue of an achromatic color is undefined.
///
/// ```
/// use four_color_dither::{ciede2000, Lab};
/// let a = Lab::new(50.0, 2.6772, -79.7751);
/// let b = Lab::new(50.0, 0.0, -82.7485);
/// assert!((ciede2000(a, b) - 2.0425).abs() < 1e-4);
/// ```
pub fn ciede2000(lab1: Lab, lab2: Lab) -> f64 {
    let Lab { l: l1, a: a1, b: b1 } = lab1;
    let Lab { l: l2, a: a2, b: b2 } = lab2;

    let c1_ab = (a1 * a1 + b1 * b1).sqrt();
    let c2_ab = (a2 * a2 + b2 * b2).sqrt();
    let c_ab_mean_7 = ((c1_ab + c2_ab) / 2.0).powi(7);
    let g = 0.5 * (1.0 - (c_ab_mean_7 / (c_ab_mean_7 + POW25_7)).sqrt());

    let a1p = a1 * (1.0 + g);
    let a2p = a2 * (1.0 + g);
    let c1p = (a1p * a1p + b1 * b1).sqrt();
    let c2p = (a2p * a2p + b2 * b2).sqrt();
    let h1p = b1.atan2(a1p).to_degrees().rem_euclid(360.0);
    let h2p = b2.atan2(a2p).to_degrees().rem_euclid(360.0);

    let achromatic = c1p * c2p == 0.0;

    let dl = l2 - l1;
    let dc = c2p - c1p;
    let dh = if achromatic {
        0.0
    } else if (h2p - h1p).abs() <= 180.0 {
        h2p - h1p
    } else if h2p - h1p > 180.0 {
        h2p - h1p - 360.0
    } else {
        h2p - h1p + 360.0
    };
    let d_big_h = 2.0 * (c1p * c2p).sqrt() * (dh / 2.0).to_radians().sin();

    let l_mean = (l1 + l2) / 2.0;
    let c_mean = (c1p + c2p) / 2.0;
    let h_mean = if achromatic {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_mean - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_mean).to_radians().cos()
        + 0.32 * (3.0 * h_mean + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_mean - 63.0).to_radians().cos();

    let l50 = (l_mean - 50.0) * (l_mean - 50.0);
    let sl = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
    let sc = 1.0 + 0.045 * c_mean;
    let sh = 1.0 + 0.015 * c_mean * t;

    let c_mean_7 = c_mean.powi(7);
    let rc = 2.0 * (c_mean_7 / (c_mean_7 + POW25_7)).sqrt();
    let d_theta = 30.0 * (-((h_mean - 275.0) / 25.0).powi(2)).exp();
    let rt = -(2.0 * d_theta).to_radians().sin() * rc;

    let tl = dl / sl;
    let tc = dc / sc;
    let th = d_big_h / sh;

    (tl * tl + tc * tc + th * th + rt * tc * th).sqrt()
}
