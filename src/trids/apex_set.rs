use core::fmt;

use anyhow::Result as HowResult;

use crate::utils::types::VertexIdx;

/// The apexes of the (at most two) triangles incident to an edge.
///
/// An edge with one apex lies on the boundary of the triangulation, an edge with two apexes is
/// an inner edge and thereby a flip candidate. Capacity is fixed at two; exceeding it means the
/// triangulation is broken and is reported as an error.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum ApexSet {
    #[default]
    Empty,
    One(VertexIdx),
    Two(VertexIdx, VertexIdx),
}

impl ApexSet {
    pub const fn len(&self) -> usize {
        match self {
            ApexSet::Empty => 0,
            ApexSet::One(_) => 1,
            ApexSet::Two(_, _) => 2,
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, ApexSet::Empty)
    }

    pub const fn contains(&self, v: VertexIdx) -> bool {
        match *self {
            ApexSet::Empty => false,
            ApexSet::One(u) => u == v,
            ApexSet::Two(u, w) => u == v || w == v,
        }
    }

    /// Add `v`, does nothing if `v` is already an apex.
    ///
    /// ## Errors
    /// Returns an error if the set already holds two apexes other than `v`.
    pub fn insert(&mut self, v: VertexIdx) -> HowResult<()> {
        *self = match *self {
            ApexSet::Empty => ApexSet::One(v),
            ApexSet::One(u) if u == v => ApexSet::One(u),
            ApexSet::One(u) => ApexSet::Two(u, v),
            ApexSet::Two(u, w) if u == v || w == v => ApexSet::Two(u, w),
            ApexSet::Two(u, w) => {
                return Err(anyhow::Error::msg(format!(
                    "Cannot add apex {v}, edge already has apexes {u} and {w}"
                )));
            }
        };
        Ok(())
    }

    /// Remove `v` if it is an apex.
    pub fn erase(&mut self, v: VertexIdx) {
        *self = match *self {
            ApexSet::One(u) if u == v => ApexSet::Empty,
            ApexSet::Two(u, w) if u == v => ApexSet::One(w),
            ApexSet::Two(u, w) if w == v => ApexSet::One(u),
            other => other,
        };
    }

    /// Substitute `old` by `new` in place, or add `new` if `old` is not an apex.
    ///
    /// Lets a flip swap the apex on one side of an edge in a single step.
    pub fn replace(&mut self, old: VertexIdx, new: VertexIdx) -> HowResult<()> {
        if old != new && self.contains(new) {
            self.erase(old);
            return Ok(());
        }
        match *self {
            ApexSet::One(u) if u == old => *self = ApexSet::One(new),
            ApexSet::Two(u, w) if u == old => *self = ApexSet::Two(new, w),
            ApexSet::Two(u, w) if w == old => *self = ApexSet::Two(u, new),
            _ => return self.insert(new),
        }
        Ok(())
    }

    /// The smaller apex.
    ///
    /// ## Errors
    /// Returns an error if the set is empty.
    pub fn min(&self) -> HowResult<VertexIdx> {
        match *self {
            ApexSet::Empty => Err(anyhow::Error::msg("Edge has no apex, cannot take the minimum")),
            ApexSet::One(u) => Ok(u),
            ApexSet::Two(u, w) => Ok(u.min(w)),
        }
    }

    /// The larger apex.
    ///
    /// ## Errors
    /// Returns an error if the set is empty.
    pub fn max(&self) -> HowResult<VertexIdx> {
        match *self {
            ApexSet::Empty => Err(anyhow::Error::msg("Edge has no apex, cannot take the maximum")),
            ApexSet::One(u) => Ok(u),
            ApexSet::Two(u, w) => Ok(u.max(w)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = VertexIdx> {
        let (first, second) = match *self {
            ApexSet::Empty => (None, None),
            ApexSet::One(u) => (Some(u), None),
            ApexSet::Two(u, w) => (Some(u), Some(w)),
        };
        first.into_iter().chain(second)
    }
}

impl fmt::Display for ApexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApexSet::Empty => write!(f, "{{}}"),
            ApexSet::One(u) => write!(f, "{{{u}}}"),
            ApexSet::Two(u, w) => write!(f, "{{{u}, {w}}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert() {
        let mut apexes = ApexSet::default();
        assert!(apexes.is_empty());

        apexes.insert(3).unwrap();
        apexes.insert(3).unwrap();
        assert_eq!(apexes, ApexSet::One(3));

        apexes.insert(1).unwrap();
        assert_eq!(apexes.len(), 2);
        assert!(apexes.contains(1) && apexes.contains(3));

        // re-inserting a member is fine, a third value is not
        apexes.insert(1).unwrap();
        assert!(apexes.insert(5).is_err());
        assert_eq!(apexes.len(), 2);
    }

    #[test]
    fn test_erase() {
        let mut apexes = ApexSet::Two(4, 6);

        apexes.erase(7);
        assert_eq!(apexes, ApexSet::Two(4, 6));

        apexes.erase(4);
        assert_eq!(apexes, ApexSet::One(6));

        apexes.erase(6);
        assert!(apexes.is_empty());
    }

    #[test]
    fn test_replace() {
        let mut apexes = ApexSet::Two(2, 8);

        apexes.replace(8, 5).unwrap();
        assert_eq!(apexes, ApexSet::Two(2, 5));

        // old is not an apex, so new is added
        let mut apexes = ApexSet::One(2);
        apexes.replace(9, 4).unwrap();
        assert_eq!(apexes, ApexSet::Two(2, 4));

        // ... which fails on a full set
        assert!(apexes.replace(9, 7).is_err());

        // never holds the same apex twice
        let mut apexes = ApexSet::Two(2, 4);
        apexes.replace(2, 4).unwrap();
        assert_eq!(apexes, ApexSet::One(4));
    }

    #[test]
    fn test_min_max() {
        assert!(ApexSet::Empty.min().is_err());
        assert!(ApexSet::Empty.max().is_err());

        assert_eq!(ApexSet::One(4).min().unwrap(), 4);
        assert_eq!(ApexSet::One(4).max().unwrap(), 4);

        assert_eq!(ApexSet::Two(9, 2).min().unwrap(), 2);
        assert_eq!(ApexSet::Two(9, 2).max().unwrap(), 9);
    }

    #[test]
    fn test_iter() {
        assert_eq!(ApexSet::Empty.iter().count(), 0);
        assert_eq!(ApexSet::Two(1, 2).iter().collect::<Vec<_>>(), vec![1, 2]);
    }
}
