/// The class label carried by every small box. The dataset is single-class.
pub const TEXT_LABEL: i32 = 1;

/// Axis-aligned small box in pixel units.
///
/// The corners are stored as given. No ordering between the min and max
/// coordinates is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
    pub label: i32,
}

impl BoundingBox {
    /// Create a box labeled with [TEXT_LABEL].
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
            label: TEXT_LABEL,
        }
    }

    pub fn from_corners(corners: [i32; 4]) -> Self {
        let [x_min, y_min, x_max, y_max] = corners;
        Self::new(x_min, y_min, x_max, y_max)
    }

    pub fn corners(&self) -> [i32; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }

    /// The `[x_min, y_min, x_max, y_max, label]` row.
    pub fn to_array(&self) -> [i32; 5] {
        [self.x_min, self.y_min, self.x_max, self.y_max, self.label]
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from(corners: [i32; 4]) -> Self {
        Self::from_corners(corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_row_has_text_label() {
        let bbox = BoundingBox::from([1192, 1862, 2424, 1895]);
        assert_eq!(bbox.to_array(), [1192, 1862, 2424, 1895, 1]);
    }

    #[test]
    fn box_keeps_unordered_corners() {
        let bbox = BoundingBox::new(20, 20, 10, 10);
        assert_eq!(bbox.corners(), [20, 20, 10, 10]);
    }
}
