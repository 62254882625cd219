// SPDX-License-Identifier: Apache-2.0

//! `SassColor`: either an RGB or an HSL representation, with the other
//! derivable and cached on first request (design §3). Color-space
//! conversion *precision* is explicitly out of scope (design §1); the
//! formulas here are the standard textbook ones, used only to satisfy
//! the "derivable" invariant, not to match any particular reference
//! implementation.

use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgba {
    r: u8,
    g: u8,
    b: u8,
    alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hsla {
    h: f64,
    s: f64,
    l: f64,
    alpha: f64,
}

#[derive(Debug, Clone, Copy)]
enum Primary {
    Rgba(Rgba),
    Hsla(Hsla),
}

/// A color, carrying whichever representation (RGBA or HSLA) it was
/// constructed or last single-dimension-modified with; the other
/// representation is computed lazily and cached.
///
/// `Clone` recomputes the cache rather than copying it, which is always
/// correct (the cache is pure derived data) and keeps the type simple to
/// reason about.
#[derive(Debug)]
pub struct SassColor {
    primary: Primary,
    derived: OnceLock<Primary>,
}

impl Clone for SassColor {
    fn clone(&self) -> Self {
        SassColor { primary: self.primary, derived: OnceLock::new() }
    }
}

impl SassColor {
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        SassColor { primary: Primary::Rgba(Rgba { r, g, b, alpha }), derived: OnceLock::new() }
    }

    pub fn hsla(h: f64, s: f64, l: f64, alpha: f64) -> Self {
        SassColor { primary: Primary::Hsla(Hsla { h, s, l, alpha }), derived: OnceLock::new() }
    }

    fn other(&self) -> &Primary {
        self.derived.get_or_init(|| match self.primary {
            Primary::Rgba(c) => Primary::Hsla(rgb_to_hsl(c)),
            Primary::Hsla(c) => Primary::Rgba(hsl_to_rgb(c)),
        })
    }

    fn canonical_rgba(&self) -> Rgba {
        match self.primary {
            Primary::Rgba(c) => c,
            Primary::Hsla(_) => match self.other() {
                Primary::Rgba(c) => *c,
                Primary::Hsla(_) => unreachable!(),
            },
        }
    }

    pub fn red(&self) -> u8 {
        self.canonical_rgba().r
    }

    pub fn green(&self) -> u8 {
        self.canonical_rgba().g
    }

    pub fn blue(&self) -> u8 {
        self.canonical_rgba().b
    }

    pub fn alpha(&self) -> f64 {
        match self.primary {
            Primary::Rgba(c) => c.alpha,
            Primary::Hsla(c) => c.alpha,
        }
    }

    pub fn hue(&self) -> f64 {
        match self.primary {
            Primary::Hsla(c) => c.h,
            Primary::Rgba(_) => match self.other() {
                Primary::Hsla(c) => c.h,
                Primary::Rgba(_) => unreachable!(),
            },
        }
    }

    pub fn saturation(&self) -> f64 {
        match self.primary {
            Primary::Hsla(c) => c.s,
            Primary::Rgba(_) => match self.other() {
                Primary::Hsla(c) => c.s,
                Primary::Rgba(_) => unreachable!(),
            },
        }
    }

    pub fn lightness(&self) -> f64 {
        match self.primary {
            Primary::Hsla(c) => c.l,
            Primary::Rgba(_) => match self.other() {
                Primary::Hsla(c) => c.l,
                Primary::Rgba(_) => unreachable!(),
            },
        }
    }

    /// True if this color currently carries an HSL primary — used by the
    /// Protocol Codec, which "uses whichever representation the value
    /// currently carries; the other is not sent" (design §4.2).
    pub fn is_hsl_primary(&self) -> bool {
        matches!(self.primary, Primary::Hsla(_))
    }

    /// Changes only the alpha channel, preserving the source
    /// representation exactly (design §9 open question resolution: a
    /// single-dimension modification must not force a cross-
    /// representation round trip).
    pub fn with_alpha(&self, alpha: f64) -> Self {
        let primary = match self.primary {
            Primary::Rgba(c) => Primary::Rgba(Rgba { alpha, ..c }),
            Primary::Hsla(c) => Primary::Hsla(Hsla { alpha, ..c }),
        };
        SassColor { primary, derived: OnceLock::new() }
    }
}

impl PartialEq for SassColor {
    fn eq(&self, other: &Self) -> bool {
        let a = self.canonical_rgba();
        let b = other.canonical_rgba();
        a.r == b.r && a.g == b.g && a.b == b.b && a.alpha.to_bits() == b.alpha.to_bits()
    }
}

impl Eq for SassColor {}

impl Hash for SassColor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let c = self.canonical_rgba();
        c.r.hash(state);
        c.g.hash(state);
        c.b.hash(state);
        c.alpha.to_bits().hash(state);
    }
}

fn rgb_to_hsl(c: Rgba) -> Hsla {
    let r = c.r as f64 / 255.0;
    let g = c.g as f64 / 255.0;
    let b = c.b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let l = (max + min) / 2.0;

    if delta == 0.0 {
        return Hsla { h: 0.0, s: 0.0, l: l * 100.0, alpha: c.alpha };
    }

    let s = if l < 0.5 { delta / (max + min) } else { delta / (2.0 - max - min) };

    let h = if max == r {
        ((g - b) / delta) % 6.0
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    let mut h = h * 60.0;
    if h < 0.0 {
        h += 360.0;
    }

    Hsla { h, s: s * 100.0, l: l * 100.0, alpha: c.alpha }
}

fn hsl_to_rgb(c: Hsla) -> Rgba {
    let h = c.h.rem_euclid(360.0) / 360.0;
    let s = c.s / 100.0;
    let l = c.l / 100.0;

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgba { r: v, g: v, b: v, alpha: c.alpha };
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let to_channel = |mut t: f64| -> u8 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba {
        r: to_channel(h + 1.0 / 3.0),
        g: to_channel(h),
        b: to_channel(h - 1.0 / 3.0),
        alpha: c.alpha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_and_derived_hsl_are_equal_and_hash_equal() {
        let rgb = SassColor::rgba(51, 153, 255, 1.0);
        let hsl = SassColor::hsla(rgb.hue(), rgb.saturation(), rgb.lightness(), 1.0);
        assert_eq!(rgb, hsl);

        let mut h1 = std::collections::hash_map::DefaultHasher::new();
        let mut h2 = std::collections::hash_map::DefaultHasher::new();
        rgb.hash(&mut h1);
        hsl.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn alpha_only_modification_preserves_rgb_primary_exactly() {
        let rgb = SassColor::rgba(10, 20, 30, 1.0);
        let modified = rgb.with_alpha(0.5);
        assert_eq!(modified.red(), 10);
        assert_eq!(modified.green(), 20);
        assert_eq!(modified.blue(), 30);
        assert_eq!(modified.alpha(), 0.5);
        assert!(!modified.is_hsl_primary());
    }

    #[test]
    fn black_and_white_have_zero_saturation() {
        let black = SassColor::rgba(0, 0, 0, 1.0);
        assert_eq!(black.saturation(), 0.0);
        let white = SassColor::rgba(255, 255, 255, 1.0);
        assert_eq!(white.saturation(), 0.0);
    }
}
