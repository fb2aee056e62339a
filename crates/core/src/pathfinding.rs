//! Bounded next-step search used by agents to close in on a target.
//! The search is breadth-first over a flat node list and is capped, so it
//! gives up on distant or unreachable targets instead of scanning the map.

use std::collections::BTreeMap;

use crate::types::Coord;

/// Node expansions allowed per query before the search gives up.
pub const MAX_EXPANSIONS: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchNode {
    pub position: Coord,
    pub parent: Coord,
}

/// Returns the first cell on the path from `agent` to `target`, or `agent`
/// itself when the target is the agent's cell, unreachable, or further away
/// than [`MAX_EXPANSIONS`] expansions reach.
///
/// `walkable` decides which cells may be stepped onto. The agent's own cell
/// is never tested.
pub fn next_step(agent: Coord, target: Coord, walkable: impl Fn(Coord) -> bool) -> Coord {
    if agent == target {
        return agent;
    }

    let mut nodes = vec![SearchNode { position: agent, parent: agent }];
    // position -> index into `nodes`
    let mut listed = BTreeMap::from([(agent, 0_usize)]);
    let mut cursor = 0;
    let mut expansions = 0;

    while let Some(node) = nodes.get(cursor).copied() {
        if node.position == target {
            return first_step(&nodes, &listed, cursor, agent);
        }
        if expansions == MAX_EXPANSIONS {
            tracing::trace!(?agent, ?target, expansions, "next-step search exhausted");
            return agent;
        }
        expansions += 1;

        for next in node.position.neighbors() {
            if listed.contains_key(&next) || !walkable(next) {
                continue;
            }
            listed.insert(next, nodes.len());
            nodes.push(SearchNode { position: next, parent: node.position });
        }
        cursor += 1;
    }

    agent
}

fn first_step(
    nodes: &[SearchNode],
    listed: &BTreeMap<Coord, usize>,
    goal: usize,
    agent: Coord,
) -> Coord {
    let mut current = nodes[goal];
    while current.parent != agent {
        match listed.get(&current.parent) {
            Some(&index) => current = nodes[index],
            None => return agent,
        }
    }
    current.position
}
