/// Maze generation: recursive backtracking with an explicit stack,
/// then special-cell placement.
///
/// Carving works on odd coordinates only. Every odd interior cell is a
/// node; the even cells between two nodes are the corridors. The stack walk
/// visits every node exactly once and carves one corridor per visit, so the
/// result is a spanning tree over the nodes (a perfect maze).
///
/// Placement order:
///   1. Exit at the far corner `(W-2, H-2)` (an odd node, so always carved)
///   2. Keys on random carved nodes, never the start
///   3. Traps on random carved nodes, never the start or the exit
///
/// Sampling is bounded; running out of samples is `PlacementExhausted`.

use log::debug;
use rand::Rng;

use crate::domain::cell::Cell;
use crate::domain::grid::{Maze, Pos};
use crate::domain::rules::GenerationParameters;
use crate::error::{GameError, Result, SpecialKind};

/// Two-step offsets to the neighboring nodes.
const NODE_STEPS: [(isize, isize); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

pub fn generate<R: Rng + ?Sized>(params: &GenerationParameters, rng: &mut R) -> Result<Maze> {
    params.validate()?;

    let mut maze = Maze::new(params.width, params.height);
    carve(&mut maze, rng)?;

    let exit = params.exit_pos();
    if maze.get(exit)? != Cell::Path {
        return Err(GameError::ExitUnreachable { pos: exit });
    }
    maze.set(exit, Cell::Exit)?;

    place(&mut maze, rng, SpecialKind::Key, params.key_count, params.max_placement_attempts)?;
    place(&mut maze, rng, SpecialKind::Trap, params.trap_count, params.max_placement_attempts)?;

    debug!(
        "generated {}x{} maze: {} keys, {} traps, exit at ({}, {})",
        params.width, params.height, maze.count(Cell::Key), maze.count(Cell::Trap), exit.x, exit.y,
    );
    Ok(maze)
}

/// Carve the whole maze starting at `Pos::START`.
fn carve<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) -> Result<()> {
    maze.set(Pos::START, Cell::Path)?;
    let mut stack = vec![Pos::START];
    let mut candidates: Vec<Pos> = Vec::with_capacity(4);

    while let Some(&current) = stack.last() {
        candidates.clear();
        candidates.extend(uncarved_neighbors(maze, current));

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let next = candidates[rng.gen_range(0..candidates.len())];
        let between = Pos::new((current.x + next.x) / 2, (current.y + next.y) / 2);
        maze.set(between, Cell::Path)?;
        maze.set(next, Cell::Path)?;
        stack.push(next);
    }
    Ok(())
}

/// Nodes two cells away that lie strictly inside the border and are still wall.
fn uncarved_neighbors(maze: &Maze, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
    let (w, h) = (maze.width() as isize, maze.height() as isize);
    NODE_STEPS.iter().filter_map(move |&(dx, dy)| {
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        if nx < 1 || ny < 1 || nx > w - 2 || ny > h - 2 {
            return None;
        }
        let next = Pos::new(nx as usize, ny as usize);
        (maze.cell_at(next) == Cell::Wall).then_some(next)
    })
}

/// Uniformly random odd interior coordinate.
fn sample_node<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Pos {
    let x = rng.gen_range(0..width / 2) * 2 + 1;
    let y = rng.gen_range(0..height / 2) * 2 + 1;
    Pos::new(x, y)
}

/// Stamp `count` cells of `kind` onto free `Path` nodes other than the start.
/// The exit is already stamped, so requiring `Path` keeps it excluded too.
fn place<R: Rng + ?Sized>(
    maze: &mut Maze,
    rng: &mut R,
    kind: SpecialKind,
    count: usize,
    max_attempts: usize,
) -> Result<()> {
    let cell = match kind {
        SpecialKind::Key => Cell::Key,
        SpecialKind::Trap => Cell::Trap,
    };

    let (w, h) = (maze.width(), maze.height());
    for placed in 0..count {
        let spot = (0..max_attempts)
            .map(|_| sample_node(w, h, rng))
            .find(|&p| p != Pos::START && maze.cell_at(p) == Cell::Path);

        match spot {
            Some(p) => maze.set(p, cell)?,
            None => {
                return Err(GameError::PlacementExhausted {
                    kind,
                    placed,
                    wanted: count,
                    attempts: max_attempts,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    /// Assert the maze is a spanning tree over its odd nodes.
    fn assert_perfect(maze: &Maze) {
        let (w, h) = (maze.width(), maze.height());
        let mut nodes = 0;
        let mut edges = 0;
        for (p, c) in maze.positions() {
            let odd_x = p.x % 2 == 1;
            let odd_y = p.y % 2 == 1;
            let interior = p.x >= 1 && p.y >= 1 && p.x <= w - 2 && p.y <= h - 2;
            match (odd_x, odd_y) {
                (true, true) if interior => {
                    assert!(c.is_carved(), "node {p:?} left uncarved");
                    nodes += 1;
                }
                // corridor between two horizontally or vertically adjacent nodes
                (false, true) | (true, false) if interior => {
                    if c.is_carved() {
                        edges += 1;
                    }
                }
                _ => assert_eq!(c, Cell::Wall, "{p:?} should never be carved"),
            }
        }
        assert_eq!(edges, nodes - 1, "carved corridors must form a tree");
    }

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn generated_mazes_are_perfect_and_connected() {
        let params = GenerationParameters::default();
        for seed in 0..25 {
            let maze = generate(&params, &mut seeded(seed)).unwrap();
            assert_perfect(&maze);

            let reach = maze.reachable_from(Pos::START);
            let carved = maze.positions().filter(|(_, c)| c.is_carved()).count();
            assert_eq!(reach.len(), carved, "seed {seed}: unreachable carved cells");
        }
    }

    #[test]
    fn special_cells_counted_and_disjoint() {
        let params = GenerationParameters::default();
        for seed in 0..25 {
            let maze = generate(&params, &mut seeded(seed)).unwrap();
            assert_eq!(maze.count(Cell::Key), params.key_count);
            assert_eq!(maze.count(Cell::Trap), params.trap_count);
            assert_eq!(maze.find(Cell::Exit), vec![params.exit_pos()]);
            assert_eq!(maze.get(Pos::START).unwrap(), Cell::Path);

            // specials sit on nodes, one tag per cell makes them disjoint
            for (p, c) in maze.positions().filter(|(_, c)| c.is_special()) {
                assert!(p.x % 2 == 1 && p.y % 2 == 1, "{c:?} off-node at {p:?}");
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let params = GenerationParameters::default();
        let a = generate(&params, &mut seeded(42)).unwrap();
        let b = generate(&params, &mut seeded(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn odd_non_square_sizes() {
        let params = GenerationParameters {
            width: 31,
            height: 9,
            ..Default::default()
        };
        let maze = generate(&params, &mut seeded(7)).unwrap();
        assert_eq!((maze.width(), maze.height()), (31, 9));
        assert_perfect(&maze);
        assert_eq!(maze.cell_at(Pos::new(29, 7)), Cell::Exit);
    }

    #[test]
    fn smallest_corridor_maze() {
        // 5x3: two nodes, start and exit, joined by one corridor
        let params = GenerationParameters {
            width: 5,
            height: 3,
            key_count: 0,
            trap_count: 0,
            required_keys: 0,
            ..Default::default()
        };
        let maze = generate(&params, &mut seeded(1)).unwrap();
        assert_eq!(maze.to_string(), "#####\n#  E#\n#####\n");
    }

    #[test]
    fn exhausted_placement_is_reported() {
        // A constant-zero source always samples the start node, which is never eligible.
        let params = GenerationParameters {
            max_placement_attempts: 50,
            ..Default::default()
        };
        let err = generate(&params, &mut StepRng::new(0, 0)).unwrap_err();
        match err {
            GameError::PlacementExhausted { kind, placed, wanted, attempts } => {
                assert_eq!(kind, SpecialKind::Key);
                assert_eq!(placed, 0);
                assert_eq!(wanted, 3);
                assert_eq!(attempts, 50);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_parameters_rejected_before_carving() {
        let params = GenerationParameters { width: 18, ..Default::default() };
        assert!(matches!(
            generate(&params, &mut seeded(0)),
            Err(GameError::InvalidParameters { .. })
        ));
    }
}
