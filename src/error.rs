use std::fmt;

/// Errors returned by [`KdTree`](crate::KdTree) queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KdTreeError {
    /// The tree was built from zero points.
    EmptyIndex,
}

impl fmt::Display for KdTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIndex => write!(f, "nearest neighbour query on an empty index"),
        }
    }
}

impl std::error::Error for KdTreeError {}
