/// Margins are used when fitting text into an image, in whole pixels. There is
/// no control preventing glyphs from overflowing the margins; they only bound
/// the width the fit calculator aims for.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Margins {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Margins {
    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: i32, horizontal: i32) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Width left over once the horizontal margins are taken out. May be negative
    /// for images narrower than the margins.
    pub fn inner_width(&self, width: u32) -> i32 {
        width as i32 - self.left - self.right
    }
}
