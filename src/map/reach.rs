use std::collections::VecDeque;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, DijkstraMap, DistanceAlg};
use smallvec::SmallVec;

use super::graph::RoomGraph;

/// Walks only along room connections, one step per link.
struct RoomWalk<'a> {
    graph: &'a RoomGraph,
}

impl<'a> BaseMap for RoomWalk<'a> {
    fn is_opaque(&self, idx: usize) -> bool {
        self.graph.room_at(self.index_to_point2d(idx)).is_none()
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let mut exits = SmallVec::new();
        if let Some(room) = self.graph.room_at(self.index_to_point2d(idx)) {
            for (_, next) in room.exits() {
                exits.push((self.point2d_to_index(next), 1.0));
            }
        }
        exits
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Manhattan.distance2d(p1, p2)
    }
}

impl<'a> Algorithm2D for RoomWalk<'a> {
    fn dimensions(&self) -> Point {
        let registry = self.graph.registry();
        Point::new(registry.width(), registry.height())
    }

    fn in_bounds(&self, point: Point) -> bool {
        self.graph.registry().in_bounds(point)
    }
}

/// Link count from `start` to every reachable room, in room creation order.
pub fn distances_from(graph: &RoomGraph, start: Point) -> Vec<(Point, u32)> {
    if graph.room_at(start).is_none() {
        return Vec::new();
    }
    let walk = RoomWalk { graph };
    let registry = graph.registry();
    let max_depth = (registry.width() * registry.height()) as f32;
    let flood = DijkstraMap::new(
        registry.width(),
        registry.height(),
        &[walk.point2d_to_index(start)],
        &walk,
        max_depth,
    );
    graph
        .rooms()
        .iter()
        .filter_map(|room| {
            let depth = flood.map[walk.point2d_to_index(room.position())];
            (depth < f32::MAX).then_some((room.position(), depth as u32))
        })
        .collect()
}

pub fn reachable_from(graph: &RoomGraph, start: Point) -> Vec<Point> {
    distances_from(graph, start)
        .into_iter()
        .map(|(point, _)| point)
        .collect()
}

/// Rooms grouped by connectivity. Components are ordered by their first
/// room in creation order; members are in discovery order.
pub fn connected_components(graph: &RoomGraph) -> Vec<Vec<Point>> {
    let registry = graph.registry();
    let mut seen = vec![false; (registry.width() * registry.height()) as usize];
    let mut components = Vec::new();

    for room in graph.rooms() {
        let Some(idx) = registry.idx(room.position()) else {
            continue;
        };
        if seen[idx] {
            continue;
        }
        seen[idx] = true;
        let mut component = Vec::new();
        let mut open = VecDeque::from([room.position()]);
        while let Some(point) = open.pop_front() {
            component.push(point);
            let Some(current) = graph.room_at(point) else {
                continue;
            };
            for (_, next) in current.exits() {
                if let Some(next_idx) = registry.idx(next) {
                    if !seen[next_idx] {
                        seen[next_idx] = true;
                        open.push_back(next);
                    }
                }
            }
        }
        components.push(component);
    }
    components
}
