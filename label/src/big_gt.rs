use crate::Quad;

/// Number of values per polygon in a [BigGt].
pub const QUAD_LEN: usize = 8;

/// The large polygon ground truth of one image.
///
/// Polygons are stored as a flat sequence of integers, eight values per
/// polygon, in source order. The length is always a multiple of [QUAD_LEN].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BigGt {
    values: Vec<i32>,
}

impl BigGt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, quad: Quad) {
        self.values.extend_from_slice(quad.coords());
    }

    /// Number of polygons.
    pub fn num_quads(&self) -> usize {
        self.values.len() / QUAD_LEN
    }

    /// Number of flat values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }

    pub fn quads(&self) -> impl Iterator<Item = Quad> + '_ {
        self.values.chunks_exact(QUAD_LEN).map(|chunk| {
            let mut coords = [0; QUAD_LEN];
            coords.copy_from_slice(chunk);
            Quad::new(coords)
        })
    }
}

impl Extend<Quad> for BigGt {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Quad>,
    {
        iter.into_iter().for_each(|quad| self.push(quad));
    }
}

impl FromIterator<Quad> for BigGt {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Quad>,
    {
        let mut big_gt = Self::new();
        big_gt.extend(iter);
        big_gt
    }
}

impl AsRef<[i32]> for BigGt {
    fn as_ref(&self) -> &[i32] {
        &self.values
    }
}
