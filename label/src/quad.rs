use num_traits::ToPrimitive;

/// A four-point polygon `[x1, y1, x2, y2, x3, y3, x4, y4]` in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quad {
    coords: [i32; 8],
}

impl Quad {
    pub fn new(coords: [i32; 8]) -> Self {
        Self { coords }
    }

    /// Build a quad from real-valued coordinates, truncating toward zero.
    ///
    /// Returns `None` if any value is not finite or does not fit in `i32`.
    pub fn try_from_reals<T>(coords: [T; 8]) -> Option<Self>
    where
        T: ToPrimitive,
    {
        let mut out = [0; 8];
        for (dst, src) in out.iter_mut().zip(coords.iter()) {
            *dst = src.to_f64()?.trunc().to_i32()?;
        }
        Some(Self { coords: out })
    }

    pub fn coords(&self) -> &[i32; 8] {
        &self.coords
    }
}

impl From<[i32; 8]> for Quad {
    fn from(coords: [i32; 8]) -> Self {
        Self::new(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reals_are_truncated_toward_zero() {
        let quad =
            Quad::try_from_reals([10.9, -3.7, 20.0, 10.2, 20.5, 20.0, 10.0, 20.999]).unwrap();
        assert_eq!(quad.coords(), &[10, -3, 20, 10, 20, 20, 10, 20]);
    }

    #[test]
    fn non_finite_reals_are_rejected() {
        assert!(Quad::try_from_reals([f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).is_none());
        assert!(Quad::try_from_reals([1e12, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).is_none());
    }
}
