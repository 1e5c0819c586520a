use rand::Rng;
use tracing::warn;

use super::{
    balance,
    session::{ChallengeBody, TickControl},
    types::{ChallengeInfo, Difficulty, MinigameResult, QteSpec, SimonSpec},
};

pub fn qte_spec_for(difficulty: Difficulty) -> QteSpec {
    // cel ok. 1.2s, okno zależne od trudności
    QteSpec {
        target_ms: 1200,
        window_ms: balance::qte_window_ms(difficulty).max(40),
    }
}

pub fn score_qte(elapsed_ms: i64, spec: &QteSpec) -> MinigameResult {
    let diff = (elapsed_ms - spec.target_ms).abs();
    if diff <= spec.window_ms {
        MinigameResult::Success
    } else if diff <= spec.window_ms * 2 {
        MinigameResult::Partial(diff)
    } else {
        MinigameResult::Fail
    }
}

pub fn simon_spec_for(difficulty: Difficulty) -> SimonSpec {
    SimonSpec {
        length: balance::simon_length(difficulty).clamp(3, 8),
        alphabet: &['A', 'B', 'C', 'D'],
    }
}

pub fn gen_simon_seq(spec: &SimonSpec) -> Vec<char> {
    let mut rng = rand::rng();
    (0..spec.length)
        .map(|_| {
            let i = rng.random_range(0..spec.alphabet.len());
            spec.alphabet[i]
        })
        .collect()
}

pub fn check_simon_step(expected: char, got: char) -> bool {
    expected == got.to_ascii_uppercase()
}

/// QTE: wciśnij dowolny klawisz jak najbliżej `target_ms` od startu.
/// Trafienie w okno (lub tuż obok) wygrywa, reszta przegrywa.
#[derive(Debug, Clone)]
pub struct QteChallenge {
    spec: QteSpec,
    clock_ms: f64,
    pressed_at: Option<f64>,
}

impl QteChallenge {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            spec: qte_spec_for(difficulty),
            clock_ms: 0.0,
            pressed_at: None,
        }
    }

    pub fn spec(&self) -> &QteSpec {
        &self.spec
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }
}

impl ChallengeBody for QteChallenge {
    fn info(&self) -> ChallengeInfo {
        ChallengeInfo {
            name: "Quick strike".into(),
            description: format!("Strike {} ms after the signal", self.spec.target_ms),
            alert_text: "Ready!".into(),
        }
    }

    fn on_tick(&mut self, _time_ms: u64, delta_ms: f64, ctl: &mut TickControl) {
        self.clock_ms += delta_ms.max(0.0);
        if ctl.verdict().is_some() {
            return;
        }

        let result = match self.pressed_at.take() {
            Some(at) => score_qte(at.round() as i64, &self.spec),
            // za późno nawet na częściowe trafienie
            None if (self.clock_ms as i64) > self.spec.target_ms + self.spec.window_ms * 2 => {
                MinigameResult::Fail
            }
            None => return,
        };

        let verdict = match result {
            MinigameResult::Success | MinigameResult::Partial(_) => ctl.win(),
            MinigameResult::Fail => ctl.lose(),
        };
        if let Err(err) = verdict {
            warn!(%err, "qte verdict rejected");
        }
    }

    fn on_key(&mut self, _key: char) {
        if self.pressed_at.is_none() {
            self.pressed_at = Some(self.clock_ms);
        }
    }

    fn on_reset(&mut self) {
        self.clock_ms = 0.0;
        self.pressed_at = None;
    }
}

/// Simon: powtórz losową sekwencję; pomyłka przegrywa.
#[derive(Debug, Clone)]
pub struct SimonChallenge {
    spec: SimonSpec,
    seq: Vec<char>,
    cursor: usize,
    pending: Vec<char>,
}

impl SimonChallenge {
    pub fn new(difficulty: Difficulty) -> Self {
        let spec = simon_spec_for(difficulty);
        let seq = gen_simon_seq(&spec);
        Self::with_sequence(spec, seq)
    }

    pub fn with_sequence(spec: SimonSpec, seq: Vec<char>) -> Self {
        Self {
            spec,
            seq,
            cursor: 0,
            pending: Vec::new(),
        }
    }

    pub fn sequence(&self) -> &[char] {
        &self.seq
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl ChallengeBody for SimonChallenge {
    fn info(&self) -> ChallengeInfo {
        ChallengeInfo {
            name: "Simon".into(),
            description: format!("Repeat the {}-symbol sequence", self.seq.len()),
            alert_text: "Remember!".into(),
        }
    }

    fn on_tick(&mut self, _time_ms: u64, _delta_ms: f64, ctl: &mut TickControl) {
        if ctl.verdict().is_some() {
            return;
        }
        let mut mistake = false;
        for got in self.pending.drain(..) {
            let Some(&expected) = self.seq.get(self.cursor) else {
                break;
            };
            if !check_simon_step(expected, got) {
                mistake = true;
                break;
            }
            self.cursor += 1;
        }

        let verdict = if mistake {
            ctl.lose()
        } else if self.cursor >= self.seq.len() {
            ctl.win()
        } else {
            return;
        };
        if let Err(err) = verdict {
            warn!(%err, cursor = self.cursor, "simon verdict rejected");
        }
    }

    fn on_key(&mut self, key: char) {
        self.pending.push(key);
    }

    fn on_reset(&mut self) {
        self.seq = gen_simon_seq(&self.spec);
        self.cursor = 0;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        session::MiniChallengeSession,
        types::{ChallengeDuration, Outcome, Phase, SessionConfig},
    };

    fn config(difficulty: Difficulty) -> SessionConfig {
        SessionConfig {
            difficulty,
            duration: ChallengeDuration::Timed(5000),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn qte_scoring_bands() {
        let spec = QteSpec { target_ms: 1200, window_ms: 100 };
        assert_eq!(score_qte(1250, &spec), MinigameResult::Success);
        assert_eq!(score_qte(1350, &spec), MinigameResult::Partial(150));
        assert_eq!(score_qte(1500, &spec), MinigameResult::Fail);
    }

    #[test]
    fn simon_sequence_uses_alphabet() {
        let spec = simon_spec_for(Difficulty::Hard);
        let seq = gen_simon_seq(&spec);
        assert_eq!(seq.len(), 6);
        assert!(seq.iter().all(|c| spec.alphabet.contains(c)));
    }

    #[test]
    fn qte_press_on_target_wins() {
        let mut combat: Vec<Outcome> = Vec::new();
        let body = QteChallenge::new(Difficulty::Easy);
        let mut s = MiniChallengeSession::new(config(Difficulty::Easy), body);
        s.tick(0, 1000.0, &mut combat).unwrap();
        assert_eq!(s.phase(), Phase::Running);

        s.tick(1000, 1200.0, &mut combat).unwrap();
        s.press(' ');
        let out = s.tick(2200, 16.0, &mut combat).unwrap();
        // 5000 - 1216 -> 4 s zapasu
        assert_eq!(out, Some(Outcome { won: true, damage: 4 }));
        assert_eq!(s.body().clock_ms(), 0.0);
    }

    #[test]
    fn qte_no_press_loses_after_window() {
        let mut combat: Vec<Outcome> = Vec::new();
        let body = QteChallenge::new(Difficulty::Hard);
        let mut s = MiniChallengeSession::new(config(Difficulty::Hard), body);
        s.tick(0, 1000.0, &mut combat).unwrap();
        let out = s.tick(1000, 1500.0, &mut combat).unwrap();
        assert_eq!(out, Some(Outcome { won: false, damage: 0 }));
    }

    #[test]
    fn simon_correct_sequence_wins() {
        let mut combat: Vec<Outcome> = Vec::new();
        let spec = simon_spec_for(Difficulty::Easy);
        let body = SimonChallenge::with_sequence(spec, vec!['A', 'B', 'C', 'D']);
        let mut s = MiniChallengeSession::new(config(Difficulty::Easy), body);
        s.tick(0, 1000.0, &mut combat).unwrap();

        for k in ['a', 'b', 'c'] {
            s.press(k);
        }
        assert_eq!(s.tick(0, 100.0, &mut combat).unwrap(), None);
        assert_eq!(s.body().cursor(), 3);
        s.press('d');
        let out = s.tick(0, 100.0, &mut combat).unwrap();
        assert_eq!(out, Some(Outcome { won: true, damage: 5 }));
    }

    #[test]
    fn simon_mistake_loses() {
        let mut combat: Vec<Outcome> = Vec::new();
        let spec = simon_spec_for(Difficulty::Easy);
        let body = SimonChallenge::with_sequence(spec, vec!['A', 'B', 'C', 'D']);
        let mut s = MiniChallengeSession::new(config(Difficulty::Easy), body);
        s.tick(0, 1000.0, &mut combat).unwrap();
        s.press('A');
        s.press('C');
        let out = s.tick(0, 16.0, &mut combat).unwrap();
        assert_eq!(out, Some(Outcome { won: false, damage: 0 }));
        assert_eq!(combat.len(), 1);
    }

    /// Otacza minigrę i rozstrzyga klatkę, zanim ona dostanie głos.
    struct Forfeit<B>(B);

    impl<B: ChallengeBody> ChallengeBody for Forfeit<B> {
        fn on_tick(&mut self, time_ms: u64, delta_ms: f64, ctl: &mut TickControl) {
            ctl.lose().unwrap();
            self.0.on_tick(time_ms, delta_ms, ctl);
        }

        fn on_key(&mut self, key: char) {
            self.0.on_key(key);
        }
    }

    #[test]
    fn bodies_skip_frames_already_decided() {
        let mut combat: Vec<Outcome> = Vec::new();
        let simon = SimonChallenge::with_sequence(simon_spec_for(Difficulty::Easy), vec!['A']);
        let mut s = MiniChallengeSession::new(config(Difficulty::Easy), Forfeit(simon));
        s.tick(0, 1000.0, &mut combat).unwrap();
        s.press('A');
        let out = s.tick(0, 16.0, &mut combat).unwrap();
        assert_eq!(out, Some(Outcome { won: false, damage: 0 }));
        assert_eq!(s.body().0.cursor(), 0);

        let mut combat: Vec<Outcome> = Vec::new();
        let qte = Forfeit(QteChallenge::new(Difficulty::Easy));
        let mut s = MiniChallengeSession::new(config(Difficulty::Easy), qte);
        s.tick(0, 1000.0, &mut combat).unwrap();
        s.press(' ');
        let out = s.tick(0, 1200.0, &mut combat).unwrap();
        assert_eq!(out, Some(Outcome { won: false, damage: 0 }));
        assert_eq!(combat, vec![Outcome { won: false, damage: 0 }]);
    }
}
