use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use grid_shooter_core::{
    Cell, CellCoord, Command, Event, Lateral, ScoreTable, TemplateId, WaveTemplate,
    ENEMY_BLOCK_ROWS,
};
use grid_shooter_world::{self as world, query, CatalogError, WaveCatalog, World};

#[test]
fn builtin_templates_stamp_only_the_forward_rows() {
    let catalog = WaveCatalog::builtin();
    assert_eq!(catalog.template_count(), 6, "every built-in template must validate");

    for index in 0..catalog.template_count() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::StartSession {
                template: TemplateId::new(index),
            },
            &mut events,
        );

        let Some(Event::WaveStamped { weighted_count, .. }) = events.last() else {
            panic!("expected a stamped wave, got {events:?}");
        };
        assert!(*weighted_count >= 1, "template {index} has no enemies");

        for (coord, cell) in query::grid_view(&world).iter() {
            if cell.is_enemy() {
                assert!(
                    coord.row() < ENEMY_BLOCK_ROWS,
                    "template {index} placed an enemy at {coord:?}"
                );
            } else {
                assert_eq!(cell, Cell::Empty);
            }
        }
    }
}

#[test]
fn empty_catalog_is_rejected() {
    assert_eq!(WaveCatalog::new(Vec::new()), Err(CatalogError::Empty));
}

#[test]
fn template_identifiers_wrap_around_catalog() {
    let first = WaveTemplate::parse(&["B.......", "........", "........"]).expect("valid");
    let second = WaveTemplate::parse(&[".......D", "........", "........"]).expect("valid");
    let catalog = WaveCatalog::new(vec![first.clone(), second]).expect("non-empty");

    assert_eq!(catalog.template(TemplateId::new(4)), &first);
}

#[test]
fn wave_stamp_clears_projectiles_in_flight() {
    let template = WaveTemplate::parse(&["...B....", "........", "........"]).expect("valid");
    let catalog = WaveCatalog::new(vec![template]).expect("non-empty");
    let mut world = World::with_catalog(catalog, ScoreTable::default());
    let mut events = Vec::new();

    for command in [
        Command::StartSession {
            template: TemplateId::new(0),
        },
        Command::SpawnEnemyBullet {
            cell: CellCoord::new(6, 3),
        },
        Command::MoveCursor {
            direction: Lateral::Left,
        },
        Command::FirePlayerBullet,
    ] {
        world::apply(&mut world, command, &mut events);
    }
    assert_eq!(query::grid_view(&world).enemy_count(), 1);

    world::apply(
        &mut world,
        Command::StartSession {
            template: TemplateId::new(0),
        },
        &mut events,
    );

    let occupied: Vec<Cell> = query::grid_view(&world)
        .iter()
        .map(|(_, cell)| cell)
        .filter(|cell| !cell.is_empty())
        .collect();
    assert_eq!(occupied, vec![Cell::Enemy(grid_shooter_core::Tier::B)]);
}

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        log.extend(events.iter().map(|event| format!("{event:?}")));
    }

    let cells = query::grid_view(&world)
        .iter()
        .map(|(coord, cell)| (coord, format!("{cell:?}")))
        .collect();

    ReplayOutcome {
        cells,
        events: log,
        score: query::score(&world),
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![Command::StartSession {
        template: TemplateId::new(2),
    }];
    for step in 0..24 {
        if step % 3 == 0 {
            commands.push(Command::FirePlayerBullet);
        }
        if step % 5 == 0 {
            commands.push(Command::MoveCursor {
                direction: if step % 10 == 0 {
                    Lateral::Left
                } else {
                    Lateral::Right
                },
            });
        }
        if step % 7 == 0 {
            commands.push(Command::SpawnEnemyBullet {
                cell: CellCoord::new(step % 8, 3),
            });
        }
        commands.push(Command::AdvanceProjectiles);
    }
    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    cells: Vec<(CellCoord, String)>,
    events: Vec<String>,
    score: u32,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
