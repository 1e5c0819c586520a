//! Bezgłowy host: pętla ticków na tokio, sterująca jedną sesją od początku do wyniku.

use std::time::Duration;

use anyhow::{bail, Result};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::{
    config::{HostConfig, MinigameKind},
    engine::{
        interrupt::{self, CloseOutcome},
        minigames::{QteChallenge, SimonChallenge},
        repo::{InventoryRepo, PlayerInventory},
        session::{ChallengeBody, CombatCollaborator, MiniChallengeSession},
        types::{ItemKey, Outcome, Phase},
    },
};

/// Strona walki w demie: zapamiętuje i loguje wyniki.
#[derive(Debug, Default)]
pub struct CombatLog {
    pub outcomes: Vec<Outcome>,
}

impl CombatCollaborator for CombatLog {
    fn continue_combat(&mut self, outcome: Outcome) {
        info!(won = outcome.won, damage = outcome.damage, "combat continues");
        self.outcomes.push(outcome);
    }
}

/// Startowy zestaw dla nowego gracza.
pub fn starter_inventory(player_id: u64) -> PlayerInventory {
    PlayerInventory {
        player_id,
        items: vec![ItemKey::HealingPotion, ItemKey::Hourglass, ItemKey::WarDrum],
        passive: vec![ItemKey::LuckyCharm],
    }
}

pub async fn run_once(cfg: &HostConfig, repo: &impl InventoryRepo) -> Result<Outcome> {
    let mut inventory = repo.get_or_create(cfg.player_id);
    if inventory.items.is_empty() && inventory.passive.is_empty() {
        inventory = starter_inventory(cfg.player_id);
    }

    let difficulty = cfg.session.difficulty;
    let outcome = match cfg.minigame {
        MinigameKind::Qte => {
            let session = MiniChallengeSession::new(cfg.session, QteChallenge::new(difficulty));
            drive(cfg, session, &mut inventory, |body: &QteChallenge| {
                (body.clock_ms() >= body.spec().target_ms as f64).then_some(' ')
            })
            .await?
        }
        MinigameKind::Simon => {
            let session = MiniChallengeSession::new(cfg.session, SimonChallenge::new(difficulty));
            drive(cfg, session, &mut inventory, |body: &SimonChallenge| {
                body.sequence().get(body.cursor()).copied()
            })
            .await?
        }
    };

    repo.save(&inventory);
    Ok(outcome)
}

/// `pilot` gra za gracza: zwraca klawisz do wciśnięcia w danej klatce.
async fn drive<B, P>(
    cfg: &HostConfig,
    mut session: MiniChallengeSession<B>,
    inventory: &mut PlayerInventory,
    mut pilot: P,
) -> Result<Outcome>
where
    B: ChallengeBody,
    P: FnMut(&B) -> Option<char>,
{
    let info = session.info();
    info!(
        name = %info.name,
        description = %info.description,
        alert = %info.alert_text,
        "mini challenge created"
    );

    let mut combat = CombatLog::default();
    let mut ticker = interval(Duration::from_millis(cfg.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let started = Instant::now();
    let mut last = started;
    let mut used_inventory = false;

    for n in 0..cfg.max_ticks {
        let now = ticker.tick().await;
        let delta_ms = now.duration_since(last).as_secs_f64() * 1000.0;
        last = now;

        // pierwsza klatka gry: zajrzyj do ekwipunku
        if session.phase() == Phase::Running && !used_inventory {
            used_inventory = true;
            let prompt = interrupt::open(&mut session, inventory)?;
            let pick = prompt.eligible().next().map(|e| e.slot);
            match interrupt::close(&mut session, inventory, pick)? {
                CloseOutcome::Consumed(item) => info!(?item, "used item mid challenge"),
                CloseOutcome::Cancelled => debug!("inventory closed without item"),
            }
            continue;
        }

        if let Some(key) = pilot(session.body()) {
            session.press(key);
        }

        let time_ms = now.duration_since(started).as_millis() as u64;
        if let Some(outcome) = session.tick(time_ms, delta_ms, &mut combat)? {
            info!(ticks = n + 1, time_ms, "session finished");
            return Ok(outcome);
        }
    }

    bail!("mini challenge did not resolve within {} ticks", cfg.max_ticks)
}
