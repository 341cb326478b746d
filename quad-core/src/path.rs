//! Node paths: the sequence of quadrant choices from the root.

use std::fmt;
use std::str::FromStr;

use crate::error::PathError;
use crate::quadrant::Quadrant;
use crate::types::Depth;

/// Location of a node, as the quadrants taken from the root to reach it.
///
/// The root is the empty path. The string form uses two bit characters
/// per level (see [`Quadrant::bits`]), so `"0111"` is the SE child of the
/// NE child of the root.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct QuadPath(Vec<Quadrant>);

impl QuadPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Depth in quadrant steps. Parsing guarantees this fits in [`Depth`].
    pub fn depth(&self) -> Depth {
        self.0.len() as Depth
    }

    pub fn quadrants(&self) -> &[Quadrant] {
        &self.0
    }

    pub fn child(&self, quadrant: Quadrant) -> Self {
        let mut quadrants = Vec::with_capacity(self.0.len() + 1);
        quadrants.extend_from_slice(&self.0);
        quadrants.push(quadrant);
        Self(quadrants)
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// The last quadrant step, or `None` for the root.
    pub fn last(&self) -> Option<Quadrant> {
        self.0.last().copied()
    }
}

impl From<Vec<Quadrant>> for QuadPath {
    fn from(quadrants: Vec<Quadrant>) -> Self {
        Self(quadrants)
    }
}

impl FromIterator<Quadrant> for QuadPath {
    fn from_iter<I: IntoIterator<Item = Quadrant>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for QuadPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for q in &self.0 {
            f.write_str(q.bits())?;
        }
        Ok(())
    }
}

impl FromStr for QuadPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() % 2 != 0 {
            return Err(PathError::OddLength(s.to_owned()));
        }
        if bytes.len() / 2 > Depth::MAX as usize {
            return Err(PathError::TooDeep(s.to_owned()));
        }
        bytes
            .chunks_exact(2)
            .enumerate()
            .map(|(level, pair)| {
                Quadrant::from_bits(pair[0], pair[1]).ok_or_else(|| PathError::InvalidQuadrant {
                    path: s.to_owned(),
                    pair: String::from_utf8_lossy(pair).into_owned(),
                    level,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_empty_string() {
        let root = QuadPath::root();
        assert!(root.is_root());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.to_string(), "");
        assert_eq!("".parse::<QuadPath>(), Ok(root));
    }

    #[test]
    fn child_and_parent_are_inverse() {
        let path = QuadPath::root().child(Quadrant::NE).child(Quadrant::SE);
        assert_eq!(path.to_string(), "0111");
        assert_eq!(path.depth(), 2);
        assert_eq!(path.last(), Some(Quadrant::SE));

        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "01");
        assert_eq!(parent.parent(), Some(QuadPath::root()));
        assert_eq!(QuadPath::root().parent(), None);
    }

    #[test]
    fn parses_bit_pairs() {
        let path: QuadPath = "001011".parse().unwrap();
        assert_eq!(
            path.quadrants(),
            &[Quadrant::NW, Quadrant::SW, Quadrant::SE]
        );
    }

    #[test]
    fn rejects_odd_length() {
        assert_eq!(
            "010".parse::<QuadPath>(),
            Err(PathError::OddLength("010".into()))
        );
    }

    #[test]
    fn rejects_non_bit_characters() {
        let err = "0012".parse::<QuadPath>().unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidQuadrant {
                path: "0012".into(),
                pair: "12".into(),
                level: 1,
            }
        );
    }
}
