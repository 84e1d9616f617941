//! Anti-Saturation and Centroid-Clip: move out-of-gamut pixels onto the
//! palette tetrahedron, in normalized RGB or in Lab.

use super::geometry::{Tetrahedron, Vec3};
use super::GamutSpace;
use crate::color::{quantize_unit, Lab, Rgb};
use crate::palette::Palette;

/// How an outside point is brought onto the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMethod {
    /// Nearest point on the surface (Anti-Saturation)
    Nearest,
    /// Ray from the centroid through the point (Centroid-Clip)
    Centroid,
}

/// A tetrahedron clip prepared for one palette.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    tetrahedron: Tetrahedron,
    space: GamutSpace,
    method: ClipMethod,
}

impl Projection {
    /// Build the tetrahedron from the palette's output colors in `space`.
    pub fn new(palette: &Palette, space: GamutSpace, method: ClipMethod) -> Self {
        let vertices = palette.colors().map(|c| to_space(c, space));
        Self {
            tetrahedron: Tetrahedron::new(vertices),
            space,
            method,
        }
    }

    /// The tetrahedron in working-space coordinates.
    pub fn tetrahedron(&self) -> &Tetrahedron {
        &self.tetrahedron
    }

    /// Clip a working-space point; inside points are returned unchanged.
    pub fn clip_point(&self, p: Vec3) -> Vec3 {
        if self.tetrahedron.contains(p) {
            return p;
        }
        match self.method {
            ClipMethod::Nearest => self.tetrahedron.project_to_surface(p),
            ClipMethod::Centroid => self.tetrahedron.clip_via_centroid(p),
        }
    }

    /// True if the pixel needs no clipping.
    pub fn is_inside(&self, c: Rgb) -> bool {
        self.tetrahedron.contains(to_space(c, self.space))
    }

    /// Map one pixel.
    pub fn apply(&self, c: Rgb) -> Rgb {
        let p = to_space(c, self.space);
        if self.tetrahedron.contains(p) {
            return c;
        }
        from_space(self.clip_point(p), self.space)
    }
}

fn to_space(c: Rgb, space: GamutSpace) -> Vec3 {
    match space {
        GamutSpace::Rgb => c.to_f64().map(|v| v / 255.0),
        GamutSpace::Lab => Lab::from(c).to_array(),
    }
}

fn from_space(p: Vec3, space: GamutSpace) -> Rgb {
    match space {
        GamutSpace::Rgb => Rgb::new(quantize_unit(p[0]), quantize_unit(p[1]), quantize_unit(p[2])),
        GamutSpace::Lab => Lab::from_array(p).to_rgb(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBES: [Rgb; 6] = [
        Rgb::new(0, 0, 255),
        Rgb::new(0, 255, 0),
        Rgb::new(255, 0, 255),
        Rgb::new(30, 140, 200),
        Rgb::new(255, 128, 0),
        Rgb::new(90, 90, 90),
    ];

    fn all() -> Vec<Projection> {
        let palette = Palette::eink();
        let mut out = Vec::new();
        for space in [GamutSpace::Rgb, GamutSpace::Lab] {
            for method in [ClipMethod::Nearest, ClipMethod::Centroid] {
                out.push(Projection::new(&palette, space, method));
            }
        }
        out
    }

    #[test]
    fn test_palette_colors_are_fixed_points() {
        for proj in all() {
            for &c in Palette::eink().colors() {
                assert!(proj.is_inside(c), "{c} must be inside in {:?}", proj.space);
                assert_eq!(proj.apply(c), c);
            }
        }
    }

    #[test]
    fn test_clipped_points_are_inside() {
        for proj in all() {
            for c in PROBES {
                let p = to_space(c, proj.space);
                let q = proj.clip_point(p);
                assert!(
                    proj.tetrahedron().contains(q),
                    "{:?}/{:?}: clip of {c} left the tetrahedron",
                    proj.space,
                    proj.method
                );
            }
        }
    }

    #[test]
    fn test_blue_is_pulled_in() {
        let proj = Projection::new(&Palette::eink(), GamutSpace::Rgb, ClipMethod::Nearest);
        let out = proj.apply(Rgb::new(0, 0, 255));
        assert_ne!(out, Rgb::new(0, 0, 255));
        assert!(out.b < 255, "blue channel must shrink, got {out}");
    }

    #[test]
    fn test_rgb_quantized_output_is_near_surface() {
        // After 8-bit rounding the pixel lies within half a code value of
        // the surface point.
        let proj = Projection::new(&Palette::eink(), GamutSpace::Rgb, ClipMethod::Centroid);
        for c in PROBES {
            let q = proj.clip_point(to_space(c, GamutSpace::Rgb));
            let out = proj.apply(c).to_f64();
            for i in 0..3 {
                assert!((out[i] / 255.0 - q[i].clamp(0.0, 1.0)).abs() <= 0.5 / 255.0 + 1e-12);
            }
        }
    }
}
