use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use rand::seq::SliceRandom;

use super::room::{ClusterId, DIRECTIONS};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Claim {
    room: usize,
    cluster: ClusterId,
}

/// Which cells are taken, by which room and cluster, and which are still
/// waiting for a room.
#[derive(Clone, Debug)]
pub struct PositionRegistry {
    width: i32,
    height: i32,
    cells: Vec<Option<Claim>>,
    unplaced: Vec<Point>,
}

impl PositionRegistry {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let size = (width * height) as usize;
        let mut unplaced = Vec::with_capacity(size);
        for y in 0..height {
            for x in 0..width {
                unplaced.push(Point::new(x, y));
            }
        }
        Self {
            width,
            height,
            cells: vec![None; size],
            unplaced,
        }
    }

    /// Empty registry whose unplaced list is uniformly shuffled.
    pub fn shuffled(width: i32, height: i32, rng: &mut RandomNumberGenerator) -> Self {
        let mut registry = Self::new(width, height);
        registry.unplaced.shuffle(rng.get_rng());
        registry
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2, self.height / 2)
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub(crate) fn idx(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    pub fn is_free(&self, point: Point) -> bool {
        self.idx(point).is_some_and(|idx| self.cells[idx].is_none())
    }

    /// Claims `point` for a room. False when the cell is off-grid or taken.
    pub fn reserve(&mut self, point: Point, room: usize, cluster: ClusterId) -> bool {
        let Some(idx) = self.idx(point) else {
            return false;
        };
        if self.cells[idx].is_some() {
            return false;
        }
        self.cells[idx] = Some(Claim { room, cluster });
        self.unplaced.retain(|candidate| *candidate != point);
        true
    }

    pub fn room_index(&self, point: Point) -> Option<usize> {
        self.idx(point).and_then(|idx| self.cells[idx]).map(|claim| claim.room)
    }

    pub fn cluster_at(&self, point: Point) -> Option<ClusterId> {
        self.idx(point)
            .and_then(|idx| self.cells[idx])
            .map(|claim| claim.cluster)
    }

    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        DIRECTIONS
            .into_iter()
            .map(move |dir| dir.step(point))
            .filter(move |next| self.in_bounds(*next))
    }

    pub fn free_neighbors(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        self.neighbors(point).filter(move |next| self.is_free(*next))
    }

    /// A free cell touching at least one room of `cluster`.
    pub fn free_adjacent_to_cluster(&self, point: Point, cluster: ClusterId) -> bool {
        self.is_free(point)
            && self
                .neighbors(point)
                .any(|next| self.cluster_at(next) == Some(cluster))
    }

    /// A free cell touching any room at all.
    pub fn free_adjacent_to_any(&self, point: Point) -> bool {
        self.is_free(point)
            && self
                .neighbors(point)
                .any(|next| self.cluster_at(next).is_some())
    }

    /// First eligible seed cell in shuffled order, uniform among eligible
    /// cells when the registry was built with `shuffled`.
    pub fn seed_position(&self) -> Option<Point> {
        self.unplaced
            .iter()
            .copied()
            .find(|point| self.free_adjacent_to_any(*point))
    }

    pub fn unplaced(&self) -> &[Point] {
        &self.unplaced
    }

    pub fn free_count(&self) -> usize {
        self.unplaced.len()
    }

    pub fn is_full(&self) -> bool {
        self.unplaced.is_empty()
    }
}
