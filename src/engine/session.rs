//! Maszyna stanów jednej minigry: Alerting -> Running -> (Suspended) -> Resolved -> reset.

use tracing::{debug, info};

use super::{
    balance::ALERT_DELAY_MS,
    core::{resolve_lose, resolve_win},
    countdown::{AlertTimer, Countdown},
    error::SessionError,
    types::{ChallengeInfo, ItemType, Outcome, Phase, SessionConfig},
};

/// Odbiorca wyniku (system walki). Wołany dokładnie raz na rozgrywkę.
pub trait CombatCollaborator {
    fn continue_combat(&mut self, outcome: Outcome);
}

impl CombatCollaborator for Vec<Outcome> {
    fn continue_combat(&mut self, outcome: Outcome) {
        self.push(outcome);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Win,
    Lose,
}

/// Uchwyt przekazywany do `on_tick`; jedyne miejsce, z którego ciało minigry
/// ogłasza wygraną lub przegraną.
#[derive(Debug)]
pub struct TickControl {
    verdict: Option<Verdict>,
    elapsed_ms: f64,
    fraction_remaining: f64,
}

impl TickControl {
    pub fn win(&mut self) -> Result<(), SessionError> {
        self.decide(Verdict::Win, "win")
    }

    pub fn lose(&mut self) -> Result<(), SessionError> {
        self.decide(Verdict::Lose, "lose")
    }

    fn decide(&mut self, verdict: Verdict, op: &'static str) -> Result<(), SessionError> {
        if self.verdict.is_some() {
            // po pierwszym werdykcie sesja jest już rozstrzygnięta
            return Err(SessionError::invalid_state(op, Phase::Resolved));
        }
        self.verdict = Some(verdict);
        Ok(())
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn fraction_remaining(&self) -> f64 {
        self.fraction_remaining
    }
}

/// Konkretna minigra podpinana do sesji.
pub trait ChallengeBody {
    fn info(&self) -> ChallengeInfo {
        ChallengeInfo::default()
    }

    /// Wołane tylko w fazie `Running`.
    fn on_tick(&mut self, time_ms: u64, delta_ms: f64, ctl: &mut TickControl);

    fn on_key(&mut self, _key: char) {}

    fn on_start(&mut self) {}

    fn on_reset(&mut self) {}
}

impl<B: ChallengeBody + ?Sized> ChallengeBody for Box<B> {
    fn info(&self) -> ChallengeInfo {
        (**self).info()
    }

    fn on_tick(&mut self, time_ms: u64, delta_ms: f64, ctl: &mut TickControl) {
        (**self).on_tick(time_ms, delta_ms, ctl)
    }

    fn on_key(&mut self, key: char) {
        (**self).on_key(key)
    }

    fn on_start(&mut self) {
        (**self).on_start()
    }

    fn on_reset(&mut self) {
        (**self).on_reset()
    }
}

/// Kontekst otwartego ekwipunku; istnieje tylko w fazie `Suspended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptRequest {
    pub context: ItemType,
}

pub struct MiniChallengeSession<B> {
    config: SessionConfig,
    body: B,
    pub(crate) countdown: Countdown,
    pub(crate) alert: AlertTimer,
    pub(crate) phase: Phase,
    pub(crate) interrupt: Option<InterruptRequest>,
    pub(crate) bonus_damage: u64,
}

impl<B: ChallengeBody> MiniChallengeSession<B> {
    /// Tworzy sesję w fazie `Alerting` z uzbrojonym komunikatem startowym.
    pub fn new(config: SessionConfig, body: B) -> Self {
        let mut session = Self {
            countdown: Countdown::new(config.duration),
            config,
            body,
            alert: AlertTimer::default(),
            phase: Phase::Alerting,
            interrupt: None,
            bonus_damage: 0,
        };
        session.begin();
        session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn info(&self) -> ChallengeInfo {
        self.body.info()
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn bonus_damage(&self) -> u64 {
        self.bonus_damage
    }

    pub fn alert_pending(&self) -> bool {
        self.alert.is_pending()
    }

    /// (Ponowne) uzbrojenie komunikatu startowego dla kolejnej rozgrywki.
    pub fn begin(&mut self) {
        if self.phase == Phase::Alerting {
            self.alert.schedule(ALERT_DELAY_MS);
            debug!(difficulty = ?self.config.difficulty, "mini challenge alerting");
        }
    }

    /// Jedna klatka pętli hosta. Zwraca wynik, jeśli rozgrywka się w niej
    /// rozstrzygnęła (wynik jest też przekazany do `combat`).
    pub fn tick(
        &mut self,
        time_ms: u64,
        delta_ms: f64,
        combat: &mut dyn CombatCollaborator,
    ) -> Result<Option<Outcome>, SessionError> {
        match self.phase {
            Phase::Alerting => {
                // komunikat liczy realny czas, bez time scale
                if self.alert.advance(delta_ms) {
                    self.start_running();
                }
                Ok(None)
            }
            Phase::Running => {
                self.countdown.advance(delta_ms);
                // timeout sprawdzany przed tickiem ciała minigry
                if self.countdown.expired() {
                    debug!(elapsed_ms = self.countdown.elapsed_ms(), "mini challenge timed out");
                    return self.lose(combat).map(Some);
                }

                let mut ctl = TickControl {
                    verdict: None,
                    elapsed_ms: self.countdown.elapsed_ms(),
                    fraction_remaining: self.countdown.fraction_remaining(),
                };
                self.body.on_tick(time_ms, delta_ms, &mut ctl);

                match ctl.verdict {
                    Some(Verdict::Win) => self.win(combat).map(Some),
                    Some(Verdict::Lose) => self.lose(combat).map(Some),
                    None => Ok(None),
                }
            }
            Phase::Suspended | Phase::Resolved => Ok(None),
        }
    }

    /// Klawisz trafia do ciała minigry tylko w trakcie gry.
    pub fn press(&mut self, key: char) {
        if self.phase == Phase::Running {
            self.body.on_key(key);
        }
    }

    pub fn win(&mut self, combat: &mut dyn CombatCollaborator) -> Result<Outcome, SessionError> {
        self.ensure_running("win")?;
        let outcome = resolve_win(
            self.countdown.time_left_ms(),
            self.config.difficulty,
            self.bonus_damage,
        );
        Ok(self.deliver(outcome, combat))
    }

    pub fn lose(&mut self, combat: &mut dyn CombatCollaborator) -> Result<Outcome, SessionError> {
        self.ensure_running("lose")?;
        Ok(self.deliver(resolve_lose(), combat))
    }

    /// Czyści postęp i wraca do `Alerting` (bez uzbrajania komunikatu; patrz `begin`).
    pub fn reset(&mut self) {
        self.countdown.stop();
        self.countdown.reset();
        self.countdown.set_duration(self.config.duration);
        self.alert.cancel();
        self.interrupt = None;
        self.bonus_damage = 0;
        self.phase = Phase::Alerting;
        self.body.on_reset();
    }

    pub(crate) fn start_running(&mut self) {
        self.alert.cancel();
        self.phase = Phase::Running;
        self.countdown.start();
        self.body.on_start();
        debug!(
            elapsed_ms = self.countdown.elapsed_ms(),
            time_scale = self.countdown.time_scale(),
            "mini challenge running"
        );
    }

    fn ensure_running(&self, op: &'static str) -> Result<(), SessionError> {
        if self.phase == Phase::Running {
            Ok(())
        } else {
            Err(SessionError::invalid_state(op, self.phase))
        }
    }

    fn deliver(&mut self, outcome: Outcome, combat: &mut dyn CombatCollaborator) -> Outcome {
        self.phase = Phase::Resolved;
        self.countdown.stop();
        info!(
            won = outcome.won,
            damage = outcome.damage,
            elapsed_ms = self.countdown.elapsed_ms(),
            "mini challenge resolved"
        );
        combat.continue_combat(outcome);
        self.reset();
        outcome
    }
}
