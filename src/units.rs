use derive_more::{Add, AddAssign, Display, From, Into, Mul, Sub, SubAssign};

/// Typographic points. Font sizes are expressed in points and converted to
/// pixels through a face's DPI; at 72 DPI one point is exactly one pixel.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    From,
    Into,
    Display,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

impl Pt {
    /// Convert to pixels at the given resolution
    pub fn to_px(self, dpi: f32) -> f32 {
        self.0 * dpi / 72.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }
}

impl std::ops::Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_pixels_at_72_dpi() {
        assert_eq!(Pt(36.0).to_px(72.0), 36.0);
        assert_eq!(Pt(36.0).to_px(144.0), 72.0);
    }

    #[test]
    fn arithmetic_stays_in_points() {
        let mut size = Pt(12.0) * 2.0;
        size -= Pt(1.0);
        assert_eq!(size, Pt(23.0));
        assert_eq!(Pt(10.0).max(Pt(9.0)), Pt(10.0));
        assert_eq!(format!("{}", Pt(12.5)), "12.5pt");
    }
}
