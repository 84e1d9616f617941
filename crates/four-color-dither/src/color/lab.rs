//! CIE L*a*b* color type (D65 reference white)
//!
//! Conversion chain: 8-bit sRGB -> linear RGB -> XYZ (D65) -> Lab. The
//! inverse runs the mirrored chain and clamps to the sRGB gamut before
//! re-encoding.

use super::linear_rgb::LinearRgb;
use super::srgb::Rgb;

/// linear sRGB -> XYZ (D65)
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

/// XYZ (D65) -> linear sRGB
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// D65 reference white
const WHITE: [f64; 3] = [0.95047, 1.0, 1.08883];

const DELTA: f64 = 6.0 / 29.0;

#[inline]
fn f(t: f64) -> f64 {
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

#[inline]
fn f_inv(t: f64) -> f64 {
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

#[inline]
fn mul(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// A color in CIE L*a*b* space.
///
/// `l` is lightness in 0.0..=100.0; `a` and `b` are the green-red and
/// blue-yellow opponent axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    /// Lightness (0.0..=100.0)
    pub l: f64,
    /// Green (-) to red (+)
    pub a: f64,
    /// Blue (-) to yellow (+)
    pub b: f64,
}

impl Lab {
    /// Create a new Lab color.
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Coordinates as an array `[L, a, b]`.
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.l, self.a, self.b]
    }

    /// Build from an array `[L, a, b]`.
    #[inline]
    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Chroma (distance from the neutral axis).
    #[inline]
    pub fn chroma(self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    /// Squared Euclidean distance. Ranking-equivalent to [`delta_e76`](Self::delta_e76).
    #[inline]
    pub fn distance_squared(self, other: Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// CIE76 color difference (Euclidean distance in Lab).
    #[inline]
    pub fn delta_e76(self, other: Lab) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Convert linear RGB to Lab.
    pub fn from_linear(c: LinearRgb) -> Self {
        let [x, y, z] = mul(&RGB_TO_XYZ, [c.r, c.g, c.b]);
        let fx = f(x / WHITE[0]);
        let fy = f(y / WHITE[1]);
        let fz = f(z / WHITE[2]);
        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// Convert to linear RGB without clamping.
    pub fn to_linear(self) -> LinearRgb {
        let fy = (self.l + 16.0) / 116.0;
        let fx = fy + self.a / 500.0;
        let fz = fy - self.b / 200.0;
        let xyz = [
            WHITE[0] * f_inv(fx),
            WHITE[1] * f_inv(fy),
            WHITE[2] * f_inv(fz),
        ];
        let [r, g, b] = mul(&XYZ_TO_RGB, xyz);
        LinearRgb::new(r, g, b)
    }

    /// Convert back to 8-bit sRGB, clamping out-of-gamut values.
    ///
    /// ```
    /// use four_color_dither::{Lab, Rgb};
    /// let c = Rgb::new(128, 64, 32);
    /// let back = Lab::from(c).to_rgb();
    /// assert!((back.r as i32 - 128).abs() <= 1);
    /// ```
    #[inline]
    pub fn to_rgb(self) -> Rgb {
        self.to_linear().to_rgb()
    }
}

impl From<Rgb> for Lab {
    #[inline]
    fn from(c: Rgb) -> Self {
        Self::from_linear(LinearRgb::from(c))
    }
}

impl From<LinearRgb> for Lab {
    #[inline]
    fn from(c: LinearRgb) -> Self {
        Self::from_linear(c)
    }
}
