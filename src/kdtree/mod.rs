
use crate::{KdTreeError, Point};
use std::iter::FromIterator;

// below this many points a subtree is built on the calling thread
const DEFAULT_PARALLEL_CUTOFF: usize = 1 << 12;

type Child = Option<Box<Node>>;

#[derive(Debug, Clone)]
struct Node {
    point: Point,
    left: Child,
    right: Child,
}

impl Node {
    fn leaf(point: Point) -> Self {
        Self {
            point,
            left: None,
            right: None,
        }
    }
}

/// Splitting axis of a level of the tree. Alternates between `X` and `Y` by depth.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn from_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Axis::X
        } else {
            Axis::Y
        }
    }

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BuildConfig {
    /// Ranges holding at least this many points build their two subtrees in parallel.
    /// `usize::MAX` disables parallel building.
    pub parallel_cutoff: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            parallel_cutoff: DEFAULT_PARALLEL_CUTOFF,
        }
    }
}

impl BuildConfig {
    pub fn with_parallel_cutoff(mut self, cutoff: usize) -> Self {
        self.parallel_cutoff = cutoff;
        self
    }
}

/// Balanced 2-d tree over a fixed set of points.
///
/// Read-only once built, so a shared reference can be queried from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct KdTree {
    root: Child,
    len: usize,
}

impl KdTree {
    /// Build the tree from `points`.
    ///
    /// The slice is reordered in place by the median partitioning; callers must not rely on
    /// its order afterwards. Use `from_iterator` to leave the caller's data untouched.
    pub fn new(points: &mut [Point]) -> Self {
        Self::with_config(points, BuildConfig::default())
    }

    /// Same as `new` with explicit build settings.
    pub fn with_config(points: &mut [Point], config: BuildConfig) -> Self {
        let len = points.len();
        if len == 0 {
            log::trace!("building an empty KdTree");
            return Self::default();
        }

        let root = build(points, 0, config.parallel_cutoff);
        let tree = Self { root, len };
        log::debug!(
            "built KdTree of {} points, depth {}, parallel: {}",
            len,
            tree.depth(),
            len >= config.parallel_cutoff
        );
        tree
    }

    pub fn from_iterator<It>(it: It) -> Self
    where
        It: Iterator<Item = Point>,
    {
        let mut points = it.collect::<Vec<_>>();
        Self::new(points.as_mut_slice())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels in the tree, 0 if it is empty.
    pub fn depth(&self) -> usize {
        height(self.root.as_deref())
    }

    /// Pre-order iterator over the indexed points
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Returns the indexed point closest to `target`.
    /// If several points are equally close, the first one found is returned.
    pub fn nearest(&self, target: &Point) -> Result<Point, KdTreeError> {
        self.nearest_with_dist_sq(target).map(|(point, _)| point)
    }

    /// Returns the indexed point closest to `target` and its squared distance to `target`.
    pub fn nearest_with_dist_sq(&self, target: &Point) -> Result<(Point, f64), KdTreeError> {
        let root = match self.root.as_deref() {
            Some(root) => root,
            None => {
                log::debug!("nearest({:?}) on an empty KdTree", target);
                return Err(KdTreeError::EmptyIndex);
            }
        };

        // the root is always visited first, so `point` is replaced unless every distance is NaN
        let mut best = Nearest {
            point: root.point,
            dist_sq: f64::INFINITY,
        };
        find_nearest_impl(Some(root), target, 0, &mut best);
        Ok((best.point, best.dist_sq))
    }
}

impl FromIterator<Point> for KdTree {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::from_iterator(iter.into_iter())
    }
}

impl<'a> IntoIterator for &'a KdTree {
    type Item = &'a Point;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Point;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(right) = node.right.as_deref() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push(left);
        }
        Some(&node.point)
    }
}

struct Nearest {
    point: Point,
    dist_sq: f64,
}

/// Build the subtree of `points`. Reorders `points`.
fn build(points: &mut [Point], depth: usize, parallel_cutoff: usize) -> Child {
    let len = points.len();
    match len {
        0 => return None,
        1 => return Some(Box::new(Node::leaf(points[0]))),
        _ => {}
    }

    let axis = Axis::from_depth(depth);
    let mid = len / 2;
    // total_cmp keeps the selection well defined for NaN coordinates
    let (lo, median, hi) =
        points.select_nth_unstable_by(mid, |a, b| a.coord(axis).total_cmp(&b.coord(axis)));
    let point = *median;

    #[cfg(debug_assertions)]
    {
        let m = point.coord(axis);
        assert!(lo.iter().all(|p| p.coord(axis).total_cmp(&m).is_le()));
        assert!(hi.iter().all(|p| p.coord(axis).total_cmp(&m).is_ge()));
    }

    let (left, right) = if len >= parallel_cutoff {
        rayon::join(
            || build(lo, depth + 1, parallel_cutoff),
            || build(hi, depth + 1, parallel_cutoff),
        )
    } else {
        (
            build(lo, depth + 1, parallel_cutoff),
            build(hi, depth + 1, parallel_cutoff),
        )
    };

    Some(Box::new(Node { point, left, right }))
}

fn find_nearest_impl(node: Option<&Node>, target: &Point, depth: usize, best: &mut Nearest) {
    let node = match node {
        Some(node) => node,
        None => return,
    };

    let dist_sq = node.point.dist_sq(target);
    if dist_sq < best.dist_sq {
        best.point = node.point;
        best.dist_sq = dist_sq;
    }

    let axis = Axis::from_depth(depth);
    let axis_delta = target.coord(axis) - node.point.coord(axis);
    let (near, far) = if axis_delta <= 0.0 {
        (&node.left, &node.right)
    } else {
        (&node.right, &node.left)
    };

    find_nearest_impl(near.as_deref(), target, depth + 1, best);
    // the far side can only hold a closer point if the splitting line is within range
    if axis_delta * axis_delta < best.dist_sq {
        find_nearest_impl(far.as_deref(), target, depth + 1, best);
    }
}

fn height(node: Option<&Node>) -> usize {
    match node {
        Some(node) => 1 + height(node.left.as_deref()).max(height(node.right.as_deref())),
        None => 0,
    }
}
