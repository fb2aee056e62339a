//! Insertion-ordered set of floor coordinates.

use std::collections::BTreeSet;

use crate::types::Coord;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FloorSet {
    order: Vec<Coord>,
    index: BTreeSet<Coord>,
}

impl FloorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `coord` unless it is already present. Returns whether it was new.
    pub fn insert(&mut self, coord: Coord) -> bool {
        if !self.index.insert(coord) {
            return false;
        }
        self.order.push(coord);
        true
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.index.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn first(&self) -> Option<Coord> {
        self.order.first().copied()
    }

    /// The exit door sits on the most recently added tile.
    pub fn last(&self) -> Option<Coord> {
        self.order.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[Coord] {
        &self.order
    }
}

impl FromIterator<Coord> for FloorSet {
    fn from_iter<T: IntoIterator<Item = Coord>>(iter: T) -> Self {
        let mut floors = Self::new();
        for coord in iter {
            floors.insert(coord);
        }
        floors
    }
}
