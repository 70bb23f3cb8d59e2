use bracket_geometry::prelude::{DistanceAlg, Point};
use log::{debug, warn};

use super::{cluster::Cluster, graph::RoomGraph, room::ClusterId};

/// A candidate cluster-to-cluster edge weighted by the closest pair of
/// member rooms.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClusterLink {
    pub a: ClusterId,
    pub b: ClusterId,
    pub distance: i32,
}

/// Two clusters the connector could not join through any adjacent room pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedLink {
    pub a: ClusterId,
    pub b: ClusterId,
}

#[derive(Clone, Debug, Default)]
pub struct ConnectionReport {
    pub links: Vec<ClusterLink>,
    pub unresolved: Vec<UnresolvedLink>,
}

impl ConnectionReport {
    pub fn is_connected(&self) -> bool {
        self.unresolved.is_empty()
    }
}

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

fn cluster_distance(a: &Cluster, b: &Cluster) -> i32 {
    a.rooms
        .iter()
        .flat_map(|pa| {
            b.rooms
                .iter()
                .map(move |pb| DistanceAlg::Manhattan.distance2d(*pa, *pb) as i32)
        })
        .min()
        .unwrap_or(i32::MAX)
}

/// Every unordered cluster pair, closest first. Ties keep pair order.
fn candidate_links(clusters: &[Cluster]) -> Vec<(usize, usize, ClusterLink)> {
    let mut links = Vec::new();
    for (i, a) in clusters.iter().enumerate() {
        for (j, b) in clusters.iter().enumerate().skip(i + 1) {
            links.push((
                i,
                j,
                ClusterLink {
                    a: a.id,
                    b: b.id,
                    distance: cluster_distance(a, b),
                },
            ));
        }
    }
    links.sort_by_key(|(_, _, link)| link.distance);
    links
}

/// Minimum spanning plan over clusters: `clusters.len() - 1` links.
pub fn plan(clusters: &[Cluster]) -> Vec<ClusterLink> {
    let mut sets = UnionFind::new(clusters.len());
    let mut plan = Vec::with_capacity(clusters.len().saturating_sub(1));
    for (i, j, link) in candidate_links(clusters) {
        if plan.len() + 1 >= clusters.len() {
            break;
        }
        if sets.union(i, j) {
            plan.push(link);
        }
    }
    plan
}

/// Tries every grid-adjacent room pair between the two clusters in
/// membership order until one connects.
pub fn link_clusters(graph: &mut RoomGraph, a: &Cluster, b: &Cluster) -> Option<(Point, Point)> {
    for &pa in &a.rooms {
        for &pb in &b.rooms {
            if graph.connect_adjacent(pa, pb) {
                return Some((pa, pb));
            }
        }
    }
    None
}

/// Joins all clusters into one component. A plan edge that cannot be
/// materialized is set aside and the next closest edge bridging the same
/// sets is tried; pairs still apart at the end are reported.
pub fn connect_all(graph: &mut RoomGraph, clusters: &[Cluster]) -> ConnectionReport {
    let mut sets = UnionFind::new(clusters.len());
    let mut report = ConnectionReport::default();
    let mut failed = Vec::new();
    let needed = clusters.len().saturating_sub(1);

    for (i, j, link) in candidate_links(clusters) {
        if report.links.len() == needed {
            break;
        }
        if sets.find(i) == sets.find(j) {
            continue;
        }
        match link_clusters(graph, &clusters[i], &clusters[j]) {
            Some((from, to)) => {
                sets.union(i, j);
                debug!(
                    "linked cluster {} to {} via {:?} -> {:?} (distance {})",
                    link.a.0, link.b.0, from, to, link.distance
                );
                report.links.push(link);
            }
            None => failed.push((i, j, link)),
        }
    }

    for (i, j, link) in failed {
        if sets.find(i) != sets.find(j) {
            warn!(
                "clusters {} and {} could not be connected (distance {})",
                link.a.0, link.b.0, link.distance
            );
            report.unresolved.push(UnresolvedLink { a: link.a, b: link.b });
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::registry::PositionRegistry;

    fn cluster(id: usize, rooms: &[(i32, i32)]) -> Cluster {
        Cluster {
            id: ClusterId(id),
            room_type: "cave".into(),
            rooms: rooms.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    fn graph_for(clusters: &[Cluster], caps: &[(i32, i32, usize)]) -> RoomGraph {
        let mut graph = RoomGraph::new(PositionRegistry::new(5, 5));
        for c in clusters {
            for p in &c.rooms {
                let cap = caps
                    .iter()
                    .find(|(x, y, _)| Point::new(*x, *y) == *p)
                    .map_or(4, |(_, _, cap)| *cap);
                graph
                    .insert(*p, "cave", "Cave".into(), String::new(), c.id, cap)
                    .unwrap();
            }
        }
        graph
    }

    #[test]
    fn union_find_merges_once() {
        let mut sets = UnionFind::new(4);
        assert!(sets.union(0, 1));
        assert!(sets.union(2, 3));
        assert!(!sets.union(1, 0));
        assert!(sets.union(1, 3));
        assert_eq!(sets.find(0), sets.find(2));
    }

    #[test]
    fn plan_spans_every_cluster() {
        let clusters = vec![
            cluster(0, &[(0, 0), (1, 0)]),
            cluster(1, &[(2, 0), (3, 0)]),
            cluster(2, &[(0, 1)]),
            cluster(3, &[(4, 4)]),
        ];
        let plan = plan(&clusters);
        assert_eq!(plan.len(), 3);
        assert!(plan.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(plan[0].distance, 1);
        assert_eq!(plan.last().unwrap().b, ClusterId(3));
        assert!(super::plan(&clusters[..1]).is_empty());
    }

    #[test]
    fn connect_all_joins_adjacent_clusters() {
        let clusters = vec![
            cluster(0, &[(0, 0), (1, 0)]),
            cluster(1, &[(0, 1), (1, 1)]),
            cluster(2, &[(2, 0), (2, 1)]),
        ];
        let mut graph = graph_for(&clusters, &[]);
        let report = connect_all(&mut graph, &clusters);
        assert!(report.is_connected());
        assert_eq!(report.links.len(), 2);
        assert!(graph.are_connected(Point::new(0, 0), Point::new(0, 1)));
    }

    #[test]
    fn falls_back_to_another_room_pair_when_one_is_full() {
        // (0,0) is saturated, leaving (1,0)-(1,1) as the only usable pair.
        let clusters = vec![cluster(0, &[(0, 0), (1, 0)]), cluster(1, &[(0, 1), (1, 1)])];
        let mut graph = graph_for(&clusters, &[(0, 0, 1)]);
        assert!(graph.connect_adjacent(Point::new(0, 0), Point::new(1, 0)));
        let report = connect_all(&mut graph, &clusters);
        assert!(report.is_connected());
        assert!(graph.are_connected(Point::new(1, 0), Point::new(1, 1)));
        assert!(!graph.are_connected(Point::new(0, 0), Point::new(0, 1)));
    }

    #[test]
    fn unreachable_pairs_are_reported() {
        let clusters = vec![cluster(0, &[(0, 0)]), cluster(1, &[(0, 1)]), cluster(2, &[(3, 3)])];
        let mut graph = graph_for(&clusters, &[]);
        let report = connect_all(&mut graph, &clusters);
        assert_eq!(report.links.len(), 1);
        assert!(!report.is_connected());
        assert!(report.unresolved.iter().all(|link| link.b == ClusterId(2)));
    }
}
