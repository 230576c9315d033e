//! Pathfinding and goal selection properties
//!
//! Random partial knowledge maps check that A* never trusts unseen cells
//! and that path costs behave; a fixed corridor checks the whole chain.

use dungeon_economy::core::types::{Coord, PartyToken};
use dungeon_economy::dungeon::{Grid, TileKind};
use dungeon_economy::knowledge::KnowledgeMap;
use dungeon_economy::navigation::{choose_target, cumulative_costs, find_path, GoalKind};
use dungeon_economy::party::{AdventurerClass, AdventurerTrait, Member, Party, PartyKind};
use proptest::prelude::*;

const SIZE: i32 = 8;

/// None = unseen, Some(i) = observed as TileKind::ALL[i]
fn knowledge_from(cells: &[Option<usize>]) -> KnowledgeMap {
    let mut knowledge = KnowledgeMap::blank(SIZE, SIZE);
    for (i, cell) in cells.iter().enumerate() {
        if let Some(kind) = cell {
            let at = Coord::new(i as i32 % SIZE, i as i32 / SIZE);
            knowledge.observe(at, TileKind::ALL[*kind], 1);
        }
    }
    knowledge
}

fn cells_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec(
        prop_oneof![
            1 => Just(None),
            1 => Just(Some(0usize)),
            4 => (1usize..5).prop_map(Some),
        ],
        (SIZE * SIZE) as usize,
    )
}

fn coord_strategy() -> impl Strategy<Value = Coord> {
    (0..SIZE, 0..SIZE).prop_map(|(x, y)| Coord::new(x, y))
}

proptest! {
    #![proptest_config(ProptestConfig {
        max_global_rejects: 8192,
        ..ProptestConfig::default()
    })]

    #[test]
    fn path_only_crosses_known_walkable_cells(
        cells in cells_strategy(),
        start in coord_strategy(),
        goal in coord_strategy(),
        allow_danger in any::<bool>(),
    ) {
        let knowledge = knowledge_from(&cells);
        if let Some(path) = find_path(&knowledge, start, goal, allow_danger) {
            prop_assert_eq!(path.first().copied(), Some(start));
            prop_assert_eq!(path.last().copied(), Some(goal));
            for step in &path {
                prop_assert!(knowledge.is_seen(*step));
                prop_assert!(knowledge.is_known_walkable(*step));
            }
            for pair in path.windows(2) {
                prop_assert_eq!(pair[0].manhattan(&pair[1]), 1);
            }
            prop_assert!(path.len() as i32 - 1 >= start.manhattan(&goal));
        }
    }

    #[test]
    fn cumulative_cost_never_decreases(
        cells in cells_strategy(),
        start in coord_strategy(),
        goal in coord_strategy(),
    ) {
        let knowledge = knowledge_from(&cells);
        if let Some(path) = find_path(&knowledge, start, goal, true) {
            let costs = cumulative_costs(&knowledge, &path, true);
            prop_assert_eq!(costs.len(), path.len());
            prop_assert_eq!(costs[0], 0);
            for pair in costs.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
        }
    }

    #[test]
    fn unseen_goal_is_unreachable(
        cells in cells_strategy(),
        start in coord_strategy(),
        goal in coord_strategy(),
    ) {
        let knowledge = knowledge_from(&cells);
        prop_assume!(!knowledge.is_seen(goal));
        prop_assert!(find_path(&knowledge, start, goal, false).is_none());
    }

    #[test]
    fn unseen_start_is_stranded(
        cells in cells_strategy(),
        start in coord_strategy(),
        goal in coord_strategy(),
    ) {
        let knowledge = knowledge_from(&cells);
        prop_assume!(!knowledge.is_seen(start));
        prop_assert!(find_path(&knowledge, start, goal, true).is_none());
    }
}

#[test]
fn test_known_corridor_leads_to_exit() {
    let grid = Grid::new(24, 16);
    let mut knowledge = KnowledgeMap::blank(24, 16);
    for at in grid.coords().collect::<Vec<_>>() {
        knowledge.observe(at, grid.tile_at(at), 1);
    }

    let entrance = grid.entrance();
    let mut party = Party::new(
        PartyToken::new("cor01"),
        PartyKind::Regular,
        vec![Member::new(
            AdventurerClass::Warrior,
            AdventurerTrait::ManaSink,
            1,
            entrance,
        )],
        knowledge,
        entrance,
    );
    party.exit_known = true;
    party.exit_pos = Some(grid.exit());

    let goal = choose_target(&party);
    assert_eq!(goal.map(|g| g.kind), Some(GoalKind::Exit));
    assert_eq!(goal.map(|g| g.pos), Some(Coord::new(22, 8)));

    let path = find_path(&party.knowledge, entrance, grid.exit(), true);
    let path = path.expect("corridor is fully known");
    assert_eq!(path.len() - 1, 21);
    assert!(path.iter().all(|c| c.y == 8));
}

#[test]
fn test_unknown_corridor_has_no_path() {
    let grid = Grid::new(24, 16);
    let knowledge = KnowledgeMap::blank(24, 16);
    assert!(find_path(&knowledge, grid.entrance(), grid.exit(), true).is_none());
}
