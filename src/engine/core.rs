use super::{
    balance::difficulty_weight,
    types::{Difficulty, Outcome},
};

/// Wygrana: `ceil(zapas / 1000) * waga(trudność)` + jednorazowy bonus z przedmiotów.
///
/// `time_left_ms == None` oznacza minigrę bez limitu czasu; wtedy liczy się
/// jak jedna sekunda zapasu.
pub fn resolve_win(
    time_left_ms: Option<f64>,
    difficulty: Difficulty,
    bonus_damage: u64,
) -> Outcome {
    let seconds_left = match time_left_ms {
        Some(ms) => (ms.max(0.0) / 1000.0).ceil() as u64,
        None => 1,
    };

    Outcome {
        won: true,
        damage: seconds_left
            .saturating_mul(difficulty_weight(difficulty))
            .saturating_add(bonus_damage),
    }
}

/// Przegrana nigdy nie rani przeciwnika.
pub fn resolve_lose() -> Outcome {
    Outcome {
        won: false,
        damage: 0,
    }
}
