use twenty48_engine::Move;

/// Minimum displacement, in input units, before a drag counts as a swipe.
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;

/// One logical input to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(Move),
    NewGame,
    Quit,
}

/// Map one line of input to an action. Accepts direction words
/// (anything `Move::from_str` takes), WASD keys, `new`/`n`, `quit`/`q`,
/// and `swipe DX DY` so pointer frontends can pipe raw gesture deltas.
/// Returns `None` for anything unrecognized, including sub-threshold
/// swipes.
pub fn parse_action(line: &str) -> Option<Action> {
    let trimmed = line.trim();
    let mut words = trimmed.split_whitespace();
    match words.next()?.to_ascii_lowercase().as_str() {
        "w" => Some(Action::Shift(Move::Up)),
        "a" => Some(Action::Shift(Move::Left)),
        "s" => Some(Action::Shift(Move::Down)),
        "d" => Some(Action::Shift(Move::Right)),
        "n" | "new" => Some(Action::NewGame),
        "q" | "quit" | "exit" => Some(Action::Quit),
        "swipe" => {
            let dx: f64 = words.next()?.parse().ok()?;
            let dy: f64 = words.next()?.parse().ok()?;
            classify_swipe(dx, dy).map(Action::Shift)
        }
        word => word.parse::<Move>().ok().map(Action::Shift),
    }
}

/// Classify a gesture displacement as a direction. Screen convention:
/// y grows downward. The axis with the larger absolute displacement
/// wins (ties go to the vertical axis), and that axis's displacement
/// must exceed [`MIN_SWIPE_DISTANCE`].
pub fn classify_swipe(dx: f64, dy: f64) -> Option<Move> {
    if dx.abs() > dy.abs() {
        if dx.abs() > MIN_SWIPE_DISTANCE {
            Some(if dx > 0.0 { Move::Right } else { Move::Left })
        } else {
            None
        }
    } else if dy.abs() > MIN_SWIPE_DISTANCE {
        Some(if dy > 0.0 { Move::Down } else { Move::Up })
    } else {
        None
    }
}
