//! Boundary to the rendering collaborator.

use crate::types::Coord;

use super::spawns::SpawnPlacement;

/// Summary passed with the phase-one completion signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterializedSummary {
    pub floor_count: usize,
    pub wall_count: usize,
}

/// Receives tiles and actors as generation produces them. Every callback
/// defaults to a no-op so a sink only implements what it renders.
///
/// Call order: all `floor_tile`/`wall_tile` calls, then exactly one
/// `materialized`, then `edge_ornament`, `exit` and `spawn` calls.
pub trait TileSink {
    fn floor_tile(&mut self, _coord: Coord) {}

    fn wall_tile(&mut self, _coord: Coord) {}

    /// Phase one is complete; the floor and wall sets will not change again.
    fn materialized(&mut self, _summary: MaterializedSummary) {}

    /// `variant` indexes the renderer's 15-entry rounded-edge catalog.
    fn edge_ornament(&mut self, _coord: Coord, _variant: usize) {}

    fn exit(&mut self, _coord: Coord) {}

    fn spawn(&mut self, _placement: &SpawnPlacement) {}
}

/// Sink for hosts that only need the returned snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TileSink for NullSink {}
