use super::types::Difficulty;

/// Czas wyświetlania komunikatu przed startem (niezależny od time scale).
pub const ALERT_DELAY_MS: f64 = 1000.0;

/// Mnożnik obrażeń za sekundę zapasu. Musi rosnąć razem z trudnością.
pub fn difficulty_weight(difficulty: Difficulty) -> u64 {
    match difficulty {
        Difficulty::Easy => 1,
        Difficulty::Medium => 2,
        Difficulty::Hard => 3,
    }
}

// ---- strojenie konkretnych minigier ----

pub fn qte_window_ms(difficulty: Difficulty) -> i64 {
    match difficulty {
        Difficulty::Easy => 220,
        Difficulty::Medium => 150,
        Difficulty::Hard => 100,
    }
}

pub fn simon_length(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy => 4,
        Difficulty::Medium => 5,
        Difficulty::Hard => 6,
    }
}
