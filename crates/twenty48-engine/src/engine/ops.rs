use rand::Rng;

use super::state::{Board, Move, Score, Spawn, WIN_VALUE};

/// Cell coordinates of line `line_idx`, ordered from the edge tiles
/// compact toward. Rows for Left/Right, columns for Up/Down; reversing
/// the order for Right/Down is what lets one merge routine serve all
/// four directions.
fn line_indices(size: usize, dir: Move, line_idx: usize) -> Vec<(usize, usize)> {
    match dir {
        Move::Left => (0..size).map(|c| (line_idx, c)).collect(),
        Move::Right => (0..size).rev().map(|c| (line_idx, c)).collect(),
        Move::Up => (0..size).map(|r| (r, line_idx)).collect(),
        Move::Down => (0..size).rev().map(|r| (r, line_idx)).collect(),
    }
}

/// Single merge pass over an already-compacted line (no zeros): equal
/// neighbors collapse into their doubled value and the scan advances
/// past the result, so a merged tile never merges again in the same
/// move. Returns the merged line and the score it produced.
pub(crate) fn merge_line(values: &[u32]) -> (Vec<u32>, Score) {
    let mut merged = Vec::with_capacity(values.len());
    let mut gained: Score = 0;
    let mut i = 0;
    while i < values.len() {
        if i + 1 < values.len() && values[i] == values[i + 1] {
            let doubled = values[i] * 2;
            merged.push(doubled);
            gained += Score::from(doubled);
            i += 2;
        } else {
            merged.push(values[i]);
            i += 1;
        }
    }
    (merged, gained)
}

/// Slide/merge every line toward `dir`. Pure: returns the new board and
/// the score gained; the caller compares against the input to decide
/// whether the move counted.
pub fn shift(board: &Board, dir: Move) -> (Board, Score) {
    let size = board.size();
    let mut next = board.clone();
    let mut gained: Score = 0;
    for line_idx in 0..size {
        let coords = line_indices(size, dir, line_idx);
        let packed: Vec<u32> = coords
            .iter()
            .map(|&(r, c)| board.get(r, c))
            .filter(|&v| v != 0)
            .collect();
        let (mut line, g) = merge_line(&packed);
        gained += g;
        line.resize(size, 0);
        for (&(r, c), &v) in coords.iter().zip(line.iter()) {
            next.set(r, c, v);
        }
    }
    (next, gained)
}

/// True iff some cell reached the winning value.
pub fn is_won(board: &Board) -> bool {
    board.cells().iter().any(|&v| v == WIN_VALUE)
}

/// True iff no empty cell remains and no two horizontally or vertically
/// adjacent cells are equal. Deliberately does not simulate moves;
/// adjacency is what standard 2048 checks.
pub fn is_game_over(board: &Board) -> bool {
    let size = board.size();
    for r in 0..size {
        for c in 0..size {
            let cur = board.get(r, c);
            if cur == 0 {
                return false;
            }
            if c + 1 < size && board.get(r, c + 1) == cur {
                return false;
            }
            if r + 1 < size && board.get(r + 1, c) == cur {
                return false;
            }
        }
    }
    true
}

/// Place a new tile on a uniformly chosen empty cell: 2 with
/// probability 0.9, 4 otherwise. `None` if the board is full.
pub(crate) fn spawn_tile<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Option<Spawn> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return None;
    }
    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let value = if rng.gen_range(0..10) < 9 { 2 } else { 4 };
    board.set(row, col, value);
    Some(Spawn { row, col })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board(rows: &[[u32; 4]; 4]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn it_merge_line() {
        assert_eq!(merge_line(&[]), (vec![], 0));
        assert_eq!(merge_line(&[2, 4, 2, 4]), (vec![2, 4, 2, 4], 0));
        assert_eq!(merge_line(&[2, 2, 2, 2]), (vec![4, 4], 8));
        assert_eq!(merge_line(&[2, 2, 4]), (vec![4, 4], 4));
        assert_eq!(merge_line(&[4, 4, 8, 8]), (vec![8, 16], 24));
        // Three equal tiles: nearest pair merges, the third survives.
        assert_eq!(merge_line(&[2, 2, 2]), (vec![4, 2], 4));
    }

    #[test]
    fn test_shift_left() {
        let b = board(&[
            [0, 0, 0, 2],
            [2, 0, 2, 0],
            [2, 2, 4, 0],
            [2, 4, 8, 16],
        ]);
        let (shifted, gained) = shift(&b, Move::Left);
        assert_eq!(
            shifted,
            board(&[
                [2, 0, 0, 0],
                [4, 0, 0, 0],
                [4, 4, 0, 0],
                [2, 4, 8, 16],
            ])
        );
        assert_eq!(gained, 8);
    }

    #[test]
    fn test_shift_right() {
        let b = board(&[
            [2, 0, 0, 0],
            [0, 2, 0, 2],
            [0, 4, 2, 2],
            [2, 4, 8, 16],
        ]);
        let (shifted, gained) = shift(&b, Move::Right);
        assert_eq!(
            shifted,
            board(&[
                [0, 0, 0, 2],
                [0, 0, 0, 4],
                [0, 0, 4, 4],
                [2, 4, 8, 16],
            ])
        );
        assert_eq!(gained, 8);
    }

    #[test]
    fn test_shift_up() {
        let b = board(&[
            [2, 0, 4, 2],
            [2, 2, 0, 4],
            [4, 0, 4, 8],
            [4, 2, 2, 16],
        ]);
        let (shifted, gained) = shift(&b, Move::Up);
        assert_eq!(
            shifted,
            board(&[
                [4, 4, 8, 2],
                [8, 0, 2, 4],
                [0, 0, 0, 8],
                [0, 0, 0, 16],
            ])
        );
        assert_eq!(gained, 24);
    }

    #[test]
    fn test_shift_down() {
        let b = board(&[
            [2, 2, 2, 16],
            [2, 0, 4, 8],
            [4, 2, 0, 4],
            [4, 0, 4, 2],
        ]);
        let (shifted, gained) = shift(&b, Move::Down);
        assert_eq!(
            shifted,
            board(&[
                [0, 0, 0, 16],
                [0, 0, 0, 8],
                [4, 0, 2, 4],
                [8, 4, 8, 2],
            ])
        );
        assert_eq!(gained, 24);
    }

    #[test]
    fn merges_happen_nearest_the_moved_edge_first() {
        // Moving left, the leftmost equal pair wins the merge.
        let b = board(&[
            [2, 2, 2, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let (left, _) = shift(&b, Move::Left);
        assert_eq!(left.rows().next().unwrap(), &[4, 2, 0, 0]);
        // Moving right, the rightmost pair does.
        let (right, _) = shift(&b, Move::Right);
        assert_eq!(right.rows().next().unwrap(), &[0, 0, 2, 4]);
    }

    #[test]
    fn packed_distinct_line_is_a_noop() {
        let b = board(&[
            [2, 4, 8, 16],
            [32, 64, 128, 256],
            [2, 8, 2, 8],
            [16, 4, 16, 4],
        ]);
        let (shifted, gained) = shift(&b, Move::Left);
        assert_eq!(shifted, b);
        assert_eq!(gained, 0);
        let (shifted, gained) = shift(&b, Move::Right);
        assert_eq!(shifted, b);
        assert_eq!(gained, 0);
    }

    #[test]
    fn it_game_over() {
        // Full, no adjacent equals anywhere.
        let stuck = board(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(is_game_over(&stuck));
        // Same board with one adjacent equal pair.
        let mergeable = board(&[
            [2, 2, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(!is_game_over(&mergeable));
        // Any empty cell means the game is on.
        let open = board(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 0, 4],
            [4, 2, 4, 2],
        ]);
        assert!(!is_game_over(&open));
    }

    #[test]
    fn it_is_won() {
        let mut b = board(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(!is_won(&b));
        b.set(2, 1, 2048);
        assert!(is_won(&b));
    }

    #[test]
    fn it_spawn_fills_then_refuses() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut b = Board::empty(4).unwrap();
        for expected_empty in (0..16).rev() {
            let spawn = spawn_tile(&mut b, &mut rng).expect("room left");
            let v = b.get(spawn.row, spawn.col);
            assert!(v == 2 || v == 4);
            assert_eq!(b.count_empty(), expected_empty);
        }
        assert_eq!(spawn_tile(&mut b, &mut rng), None);
        assert_eq!(b.count_empty(), 0);
    }

    #[test]
    fn spawn_value_distribution_is_nine_to_one() {
        let mut rng = StdRng::seed_from_u64(2048);
        let trials = 10_000;
        let mut fours = 0;
        for _ in 0..trials {
            let mut b = Board::empty(4).unwrap();
            let spawn = spawn_tile(&mut b, &mut rng).unwrap();
            if b.get(spawn.row, spawn.col) == 4 {
                fours += 1;
            }
        }
        // Expect ~1000; 3.3% absolute tolerance is > 10 sigma.
        let share = f64::from(fours) / f64::from(trials);
        assert!((share - 0.1).abs() < 0.033, "4-tile share was {share}");
    }

    #[test]
    fn spawn_cell_choice_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut counts = [0u32; 16];
        let trials = 16_000;
        for _ in 0..trials {
            let mut b = Board::empty(4).unwrap();
            let spawn = spawn_tile(&mut b, &mut rng).unwrap();
            counts[spawn.row * 4 + spawn.col] += 1;
        }
        for &c in &counts {
            // Expect ~1000 per cell.
            assert!((600..1400).contains(&c), "cell count {c} out of range");
        }
    }

    #[test]
    fn shift_works_on_non_default_sizes() {
        let b = Board::from_rows(&[[2, 2, 2], [0, 4, 4], [8, 0, 8]]).unwrap();
        let (shifted, gained) = shift(&b, Move::Left);
        assert_eq!(
            shifted,
            Board::from_rows(&[[4, 2, 0], [8, 0, 0], [16, 0, 0]]).unwrap()
        );
        assert_eq!(gained, 28);
    }
}
