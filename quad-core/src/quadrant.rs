//! Quadrant selectors and a fixed four-slot container indexed by them.

use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the four children of a subdivided node.
///
/// Each quadrant is written as a pair of bits in a path string:
/// `NW = "00"`, `NE = "01"`, `SW = "10"`, `SE = "11"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum Quadrant {
    NW,
    NE,
    SW,
    SE,
}

impl Quadrant {
    /// All quadrants in path order.
    pub const ALL: [Quadrant; 4] = [Quadrant::NW, Quadrant::NE, Quadrant::SW, Quadrant::SE];

    pub fn iter_all() -> impl ExactSizeIterator<Item = Quadrant> {
        Self::ALL.into_iter()
    }

    /// The two path characters for this quadrant.
    pub fn bits(self) -> &'static str {
        match self {
            Self::NW => "00",
            Self::NE => "01",
            Self::SW => "10",
            Self::SE => "11",
        }
    }

    pub fn from_bits(hi: u8, lo: u8) -> Option<Self> {
        match (hi, lo) {
            (b'0', b'0') => Some(Self::NW),
            (b'0', b'1') => Some(Self::NE),
            (b'1', b'0') => Some(Self::SW),
            (b'1', b'1') => Some(Self::SE),
            _ => None,
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bits())
    }
}

/// Four values, one per [`Quadrant`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Quad<T> {
    pub nw: T,
    pub ne: T,
    pub sw: T,
    pub se: T,
}

impl<T> Quad<T> {
    pub fn from_fn(mut f: impl FnMut(Quadrant) -> T) -> Self {
        Quad {
            nw: f(Quadrant::NW),
            ne: f(Quadrant::NE),
            sw: f(Quadrant::SW),
            se: f(Quadrant::SE),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        Quadrant::iter_all().map(|q| &self[q])
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Quad<U> {
        Quad {
            nw: f(self.nw),
            ne: f(self.ne),
            sw: f(self.sw),
            se: f(self.se),
        }
    }
}

impl<T> IntoIterator for Quad<T> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, 4>;
    fn into_iter(self) -> Self::IntoIter {
        [self.nw, self.ne, self.sw, self.se].into_iter()
    }
}

impl<T> Index<Quadrant> for Quad<T> {
    type Output = T;
    fn index(&self, index: Quadrant) -> &Self::Output {
        match index {
            Quadrant::NW => &self.nw,
            Quadrant::NE => &self.ne,
            Quadrant::SW => &self.sw,
            Quadrant::SE => &self.se,
        }
    }
}

impl<T> IndexMut<Quadrant> for Quad<T> {
    fn index_mut(&mut self, index: Quadrant) -> &mut Self::Output {
        match index {
            Quadrant::NW => &mut self.nw,
            Quadrant::NE => &mut self.ne,
            Quadrant::SW => &mut self.sw,
            Quadrant::SE => &mut self.se,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_round_trip_through_from_bits() {
        for q in Quadrant::iter_all() {
            let b = q.bits().as_bytes();
            assert_eq!(Quadrant::from_bits(b[0], b[1]), Some(q));
        }
        assert_eq!(Quadrant::from_bits(b'0', b'2'), None);
        assert_eq!(Quadrant::from_bits(b'x', b'1'), None);
    }

    #[test]
    fn quad_index_matches_fields() {
        let mut quad = Quad::from_fn(|q| q.bits());
        assert_eq!(quad[Quadrant::NE], "01");
        assert_eq!(quad.sw, "10");

        quad[Quadrant::SE] = "xx";
        assert_eq!(quad.se, "xx");
    }

    #[test]
    fn iteration_follows_path_order() {
        let quad = Quad::from_fn(|q| q as usize);
        let by_ref: Vec<usize> = quad.iter().copied().collect();
        let by_value: Vec<usize> = quad.into_iter().collect();
        assert_eq!(by_ref, vec![0, 1, 2, 3]);
        assert_eq!(by_value, by_ref);
        assert_eq!(quad.map(|i| i * 2).se, 6);
    }
}
