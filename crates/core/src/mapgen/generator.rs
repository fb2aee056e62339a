//! High-level generation orchestration: validate, materialize, then populate.

mod pipeline;

use crate::config::GenerationConfig;
use crate::error::{ConfigError, DungeonError};

use super::model::GeneratedDungeon;
use super::sink::{NullSink, TileSink};

pub struct DungeonGenerator {
    config: GenerationConfig,
    seed: u64,
}

impl DungeonGenerator {
    pub fn new(config: GenerationConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generate(&self) -> Result<GeneratedDungeon, DungeonError> {
        self.generate_into(&mut NullSink)
    }

    /// Runs both phases, streaming tiles to `sink`. Phase two starts only
    /// after phase one has returned its completion token.
    pub fn generate_into(&self, sink: &mut dyn TileSink) -> Result<GeneratedDungeon, DungeonError> {
        let materialized = pipeline::materialize(&self.config, self.seed, sink)?;
        pipeline::populate(materialized, &self.config, sink)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use proptest::prelude::*;
    use xxhash_rust::xxh3::xxh3_64;

    use super::*;
    use crate::config::{DungeonStrategy, SpanRange, WallFill};
    use crate::mapgen::sink::MaterializedSummary;
    use crate::mapgen::spawns::SpawnPlacement;
    use crate::types::{Coord, SpawnCategory, TileKind};

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum SinkEvent {
        Floor(Coord),
        Wall(Coord),
        Materialized(MaterializedSummary),
        Ornament(Coord, usize),
        Exit(Coord),
        Spawn(SpawnPlacement),
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<SinkEvent>,
    }

    impl TileSink for RecordingSink {
        fn floor_tile(&mut self, coord: Coord) {
            self.events.push(SinkEvent::Floor(coord));
        }

        fn wall_tile(&mut self, coord: Coord) {
            self.events.push(SinkEvent::Wall(coord));
        }

        fn materialized(&mut self, summary: MaterializedSummary) {
            self.events.push(SinkEvent::Materialized(summary));
        }

        fn edge_ornament(&mut self, coord: Coord, variant: usize) {
            self.events.push(SinkEvent::Ornament(coord, variant));
        }

        fn exit(&mut self, coord: Coord) {
            self.events.push(SinkEvent::Exit(coord));
        }

        fn spawn(&mut self, placement: &SpawnPlacement) {
            self.events.push(SinkEvent::Spawn(*placement));
        }
    }

    fn populated_config(strategy: DungeonStrategy, target: u32) -> GenerationConfig {
        GenerationConfig {
            strategy,
            target_floor_count: target,
            item_spawn_percent: 20,
            enemy_spawn_percent: 10,
            item_catalog: vec!["potion".to_string(), "scroll".to_string()],
            enemy_catalog: vec!["skeleton".to_string(), "slime".to_string(), "bat".to_string()],
            ..GenerationConfig::default()
        }
    }

    fn floors_connected(dungeon: &GeneratedDungeon) -> bool {
        let start = Coord::ORIGIN;
        let mut seen = BTreeSet::from([start]);
        let mut open = VecDeque::from([start]);
        while let Some(current) = open.pop_front() {
            for next in current.neighbors() {
                if dungeon.is_walkable(next) && seen.insert(next) {
                    open.push_back(next);
                }
            }
        }
        seen.len() == dungeon.floors().len()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = GenerationConfig { target_floor_count: 0, ..GenerationConfig::default() };
        assert_eq!(
            DungeonGenerator::new(config, 1).err(),
            Some(ConfigError::ZeroTargetCount)
        );
    }

    #[test]
    fn same_inputs_produce_byte_identical_output() {
        for strategy in DungeonStrategy::ALL {
            let config = populated_config(strategy, 300);
            let a = DungeonGenerator::new(config.clone(), 123_456).expect("valid").generate();
            let b = DungeonGenerator::new(config, 123_456).expect("valid").generate();
            let a = a.expect("generation succeeds");
            let b = b.expect("generation succeeds");
            assert_eq!(a.canonical_bytes(), b.canonical_bytes());
            assert_eq!(xxh3_64(&a.canonical_bytes()), b.fingerprint());
        }
    }

    #[test]
    fn changing_seed_changes_output() {
        let config = populated_config(DungeonStrategy::Caverns, 200);
        let a = DungeonGenerator::new(config.clone(), 1).expect("valid").generate().expect("ok");
        let b = DungeonGenerator::new(config, 2).expect("valid").generate().expect("ok");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn sink_sees_every_tile_before_the_completion_signal() {
        let config = populated_config(DungeonStrategy::Rooms, 250);
        let generator = DungeonGenerator::new(config, 8).expect("valid");
        let mut sink = RecordingSink::default();
        let dungeon = generator.generate_into(&mut sink).expect("generation succeeds");

        let barrier = sink
            .events
            .iter()
            .position(|event| matches!(event, SinkEvent::Materialized(_)))
            .expect("completion signal must be emitted");
        let (before, after) = sink.events.split_at(barrier);

        assert!(before.iter().all(|event| matches!(event, SinkEvent::Floor(_) | SinkEvent::Wall(_))));
        assert!(after[1..].iter().all(|event| matches!(
            event,
            SinkEvent::Ornament(..) | SinkEvent::Exit(_) | SinkEvent::Spawn(_)
        )));
        assert_eq!(
            after[0],
            SinkEvent::Materialized(MaterializedSummary {
                floor_count: dungeon.floors().len(),
                wall_count: dungeon.walls().len(),
            })
        );

        let floors: Vec<Coord> = before
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Floor(coord) => Some(*coord),
                _ => None,
            })
            .collect();
        assert_eq!(floors.as_slice(), dungeon.floors().as_slice());

        let exits: Vec<&SinkEvent> =
            after.iter().filter(|event| matches!(event, SinkEvent::Exit(_))).collect();
        assert_eq!(exits, vec![&SinkEvent::Exit(dungeon.exit())]);
        let spawn_count =
            after.iter().filter(|event| matches!(event, SinkEvent::Spawn(_))).count();
        assert_eq!(spawn_count, dungeon.spawns().len());
    }

    #[test]
    fn sink_receives_one_ornament_per_open_wall() {
        let config = GenerationConfig {
            wall_fill: WallFill::Surround,
            ..GenerationConfig::with_strategy(DungeonStrategy::Rooms, 200)
        };
        let generator = DungeonGenerator::new(config, 3).expect("valid");
        let mut sink = RecordingSink::default();
        let dungeon = generator.generate_into(&mut sink).expect("ok");

        let ornaments =
            sink.events.iter().filter(|event| matches!(event, SinkEvent::Ornament(..))).count();
        let open_walls = dungeon.edges().iter().filter(|(_, mask)| !mask.is_enclosed()).count();
        assert_eq!(ornaments, open_walls);
    }

    #[test]
    fn exit_is_last_floor_and_walkable() {
        for strategy in DungeonStrategy::ALL {
            let dungeon = DungeonGenerator::new(populated_config(strategy, 150), 77)
                .expect("valid")
                .generate()
                .expect("ok");
            assert_eq!(Some(dungeon.exit()), dungeon.floors().last());
            assert_eq!(dungeon.tile_at(dungeon.exit()), TileKind::Floor);
        }
    }

    #[test]
    fn spawns_avoid_the_exit_and_enemies_stand_in_the_open() {
        let seeds = [11_u64, 2_024, 77_777, 909_090];
        for seed in seeds {
            let config = GenerationConfig {
                item_spawn_percent: 100,
                enemy_spawn_percent: 100,
                ..populated_config(DungeonStrategy::Rooms, 400)
            };
            let dungeon = DungeonGenerator::new(config, seed).expect("valid").generate().expect("ok");
            for spawn in dungeon.spawns() {
                assert_ne!(spawn.coord, dungeon.exit(), "seed={seed}");
            }
            for spawn in dungeon.spawns_of(SpawnCategory::Enemy) {
                assert!(
                    spawn.coord.neighbors().iter().all(|next| !dungeon.walls().contains(*next)),
                    "enemy {:?} must stand in the open (seed={seed})",
                    spawn.coord
                );
            }
            assert!(dungeon.spawns_of(SpawnCategory::Enemy).count() > 0, "rooms have open cells");
        }
    }

    #[test]
    fn fixed_room_dungeon_is_connected_and_walled() {
        let config = GenerationConfig {
            hallway_length: SpanRange::fixed(10),
            room_half_extent: SpanRange::fixed(2),
            ..GenerationConfig::with_strategy(DungeonStrategy::Rooms, 100)
        };
        let dungeon = DungeonGenerator::new(config, 42).expect("valid").generate().expect("ok");
        assert!(floors_connected(&dungeon));
        for floor in dungeon.floors().iter() {
            for next in floor.neighbors() {
                assert_ne!(dungeon.tile_at(next), TileKind::Unclaimed, "floor must be enclosed");
            }
        }
    }

    #[test]
    fn stall_is_reported_not_truncated() {
        let config = GenerationConfig {
            stall_limit: Some(10),
            ..GenerationConfig::with_strategy(DungeonStrategy::Caverns, 1_000)
        };
        let error = DungeonGenerator::new(config, 5).expect("valid").generate().expect_err("stall");
        assert!(matches!(error, DungeonError::Stall { strategy: DungeonStrategy::Caverns, .. }));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]
        #[test]
        fn generated_dungeons_hold_their_invariants(
            seed in any::<u64>(),
            target in 1_u32..300,
            strategy_selector in 0_usize..3,
        ) {
            let strategy = DungeonStrategy::ALL[strategy_selector];
            let dungeon = DungeonGenerator::new(populated_config(strategy, target), seed)
                .expect("valid")
                .generate()
                .expect("default stall limit is generous");

            prop_assert!(dungeon.floors().len() >= target as usize);
            prop_assert!(floors_connected(&dungeon));
            for wall in dungeon.walls().iter() {
                prop_assert!(!dungeon.floors().contains(wall));
                prop_assert!(wall.neighbors().iter().any(|next| dungeon.floors().contains(*next)));
                let mask = dungeon.edges().get(wall).expect("every wall is classified");
                prop_assert!(mask.bits() <= 15);
            }
        }
    }
}
