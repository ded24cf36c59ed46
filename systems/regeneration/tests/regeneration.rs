use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use geocoin_core::{Command, Direction, Event, GeoCoord, GridCell, GridSpec, SpawnLedger};
use geocoin_luck::{initial_coin_count, spawn_trial};
use geocoin_system_regeneration::{Config, Regeneration};
use geocoin_world::{self as world, query, World};

const RADIUS: u32 = 4;
const PROBABILITY: f64 = 0.3;

fn new_world() -> World {
    World::new(world::Config::new(
        GridSpec::new(GeoCoord::new(0.0, 0.0), 1e-4),
        GeoCoord::new(0.0, 0.0),
    ))
}

fn dispatch(world: &mut World, regeneration: &mut Regeneration, command: Command) -> Vec<Event> {
    let mut log = Vec::new();
    let mut events = Vec::new();
    world::apply(world, command, &mut events);

    loop {
        if events.is_empty() {
            break;
        }
        log.extend(events.iter().cloned());

        let mut commands = Vec::new();
        regeneration.handle(&events, &query::spawn_ledger(world), &mut commands);
        if commands.is_empty() {
            break;
        }

        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }

    log
}

fn revealed(events: &[Event]) -> Vec<(GridCell, usize)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::CacheRevealed { cell, coins, .. } => Some((*cell, coins.len())),
            _ => None,
        })
        .collect()
}

fn regenerate_at(
    world: &mut World,
    regeneration: &mut Regeneration,
    center: GridCell,
) -> Vec<Event> {
    dispatch(world, regeneration, Command::Regenerate { center })
}

#[test]
fn first_regeneration_decides_the_whole_window() {
    let mut world = new_world();
    let mut regeneration = Regeneration::new(Config::new(RADIUS, PROBABILITY));
    let events = regenerate_at(&mut world, &mut regeneration, GridCell::new(0, 0));

    let window: Vec<GridCell> = GridCell::new(0, 0).neighborhood(RADIUS).collect();
    assert_eq!(query::world_state(&world).len(), window.len());
    let ledger = query::spawn_ledger(&world);
    assert!(window.iter().all(|cell| ledger.is_decided(*cell)));

    let expected: Vec<(GridCell, usize)> = window
        .iter()
        .filter(|cell| spawn_trial(**cell, PROBABILITY))
        .map(|cell| (*cell, initial_coin_count(*cell) as usize))
        .collect();
    assert_eq!(revealed(&events), expected);
}

#[test]
fn regenerating_twice_is_idempotent() {
    let mut world = new_world();
    let mut regeneration = Regeneration::new(Config::new(RADIUS, PROBABILITY));
    let center = GridCell::new(2, -3);

    let first = regenerate_at(&mut world, &mut regeneration, center);
    let export_after_first = query::export_state(&world);
    let second = regenerate_at(&mut world, &mut regeneration, center);

    assert_eq!(revealed(&first), revealed(&second));
    assert_eq!(query::export_state(&world), export_after_first);
    assert!(second.iter().all(|event| !matches!(
        event,
        Event::CacheSpawned { .. } | Event::SpawnTrialFailed { .. }
    )));
}

#[test]
fn regeneration_clears_before_revealing() {
    let mut world = new_world();
    let mut regeneration = Regeneration::new(Config::new(RADIUS, 1.0));
    let events = regenerate_at(&mut world, &mut regeneration, GridCell::new(0, 0));

    let cleared = events
        .iter()
        .position(|event| matches!(event, Event::NeighborhoodCleared))
        .expect("regeneration clears renderings");
    let first_reveal = events
        .iter()
        .position(|event| matches!(event, Event::CacheRevealed { .. }))
        .expect("full probability reveals caches");
    assert!(cleared < first_reveal);
}

#[test]
fn barren_cells_never_reroll() {
    let mut world = new_world();
    let mut barren_regeneration = Regeneration::new(Config::new(RADIUS, 0.0));
    let _ = regenerate_at(&mut world, &mut barren_regeneration, GridCell::new(0, 0));
    assert!(query::visible_cells(&world).is_empty());

    let mut generous = Regeneration::new(Config::new(RADIUS, 1.0));
    let events = regenerate_at(&mut world, &mut generous, GridCell::new(0, 0));
    assert!(revealed(&events).is_empty());
    assert!(query::visible_cells(&world).is_empty());
}

#[test]
fn moving_regenerates_around_the_new_cell() {
    let mut world = new_world();
    let mut regeneration = Regeneration::new(Config::new(RADIUS, 1.0));
    let _ = regenerate_at(&mut world, &mut regeneration, GridCell::new(0, 0));

    let events = dispatch(
        &mut world,
        &mut regeneration,
        Command::MovePlayer {
            direction: Direction::East,
        },
    );

    let spawned: Vec<GridCell> = events
        .iter()
        .filter_map(|event| match event {
            Event::CacheSpawned { cell, .. } => Some(*cell),
            _ => None,
        })
        .collect();
    let new_column = i32::try_from(RADIUS).expect("small radius") + 1;
    assert_eq!(spawned.len(), 2 * RADIUS as usize + 1);
    assert!(spawned.iter().all(|cell| cell.j() == new_column));

    let visible = query::visible_cells(&world);
    assert!(visible
        .iter()
        .all(|cell| cell.chebyshev_distance(GridCell::new(0, 1)) <= RADIUS));
}

#[test]
fn emptied_caches_stay_empty_after_leaving_and_returning() {
    let mut world = new_world();
    let mut regeneration = Regeneration::new(Config::new(RADIUS, 1.0));
    let _ = regenerate_at(&mut world, &mut regeneration, GridCell::new(0, 0));

    let cell = GridCell::new(0, 0);
    let collected = dispatch(&mut world, &mut regeneration, Command::Collect { cell });
    let amount = collected
        .iter()
        .find_map(|event| match event {
            Event::CoinsCollected { amount, .. } => Some(*amount),
            _ => None,
        })
        .expect("cache at the origin is collected");
    assert_eq!(amount, initial_coin_count(cell));

    for direction in [Direction::North; 12] {
        let _ = dispatch(&mut world, &mut regeneration, Command::MovePlayer { direction });
    }
    for direction in [Direction::South; 12] {
        let _ = dispatch(&mut world, &mut regeneration, Command::MovePlayer { direction });
    }

    assert_eq!(query::player_cell(&world), cell);
    assert!(query::visible_cells(&world).contains(&cell));
    assert_eq!(query::cache_at(&world, cell).map(|cache| cache.len()), Some(0));
    assert_eq!(query::purse(&world), amount);
}

#[test]
fn deterministic_replay_produces_identical_worlds() {
    let first = replay();
    let second = replay();
    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
}

fn replay() -> ReplayOutcome {
    let mut world = new_world();
    let mut regeneration = Regeneration::new(Config::new(RADIUS, PROBABILITY));
    let mut reveals = Vec::new();

    let script = [
        Command::Regenerate {
            center: GridCell::new(0, 0),
        },
        Command::MovePlayer {
            direction: Direction::North,
        },
        Command::MovePlayer {
            direction: Direction::North,
        },
        Command::MovePlayer {
            direction: Direction::West,
        },
        Command::RelocatePlayer {
            position: GeoCoord::new(0.0021, -0.0013),
        },
        Command::MovePlayer {
            direction: Direction::South,
        },
    ];

    for command in script {
        let events = dispatch(&mut world, &mut regeneration, command);
        reveals.extend(revealed(&events));
    }

    let cells = query::export_state(&world)
        .cells
        .into_iter()
        .map(|entry| (entry.cell, format!("{:?}", entry.record)))
        .collect();

    ReplayOutcome { reveals, cells }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    reveals: Vec<(GridCell, usize)>,
    cells: Vec<(GridCell, String)>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
