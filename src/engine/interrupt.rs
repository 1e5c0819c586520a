//! Przerwanie minigry ekwipunkiem: `open` zamraża sesję, `close` albo ją
//! anuluje (powtórka komunikatu), albo zużywa przedmiot i wznawia grę.

use tracing::{debug, info, warn};

use super::{
    balance::ALERT_DELAY_MS,
    error::SessionError,
    items::{item_type, use_item, ItemTarget},
    repo::PlayerInventory,
    session::{ChallengeBody, InterruptRequest, MiniChallengeSession},
    types::{ItemKey, ItemType, Phase},
};

/// Pozycja ekwipunku pokazywana graczowi.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryEntry {
    pub slot: usize,
    pub item: ItemKey,
    pub selectable: bool,
}

/// Żądanie otwarcia ekwipunku dla warstwy prezentacji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryPrompt {
    pub context: ItemType,
    pub items: Vec<InventoryEntry>,
    pub passive: Vec<ItemKey>,
}

impl InventoryPrompt {
    pub fn eligible(&self) -> impl Iterator<Item = &InventoryEntry> + '_ {
        self.items.iter().filter(|e| e.selectable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Nic nie zużyto; sesja wraca do komunikatu startowego.
    Cancelled,
    /// Przedmiot zużyty; gra wznowiona od razu.
    Consumed(ItemKey),
}

pub fn open<B: ChallengeBody>(
    session: &mut MiniChallengeSession<B>,
    inventory: &PlayerInventory,
) -> Result<InventoryPrompt, SessionError> {
    match session.phase {
        Phase::Alerting | Phase::Running => {}
        phase => return Err(SessionError::invalid_state("open", phase)),
    }

    let context = session.config().item_context;
    session.alert.cancel();
    session.countdown.stop();
    session.phase = Phase::Suspended;
    session.interrupt = Some(InterruptRequest { context });

    debug!(
        player_id = inventory.player_id,
        ?context,
        elapsed_ms = session.countdown.elapsed_ms(),
        "inventory opened, session suspended"
    );

    Ok(InventoryPrompt {
        context,
        items: inventory
            .items
            .iter()
            .enumerate()
            .map(|(slot, item)| InventoryEntry {
                slot,
                item: *item,
                selectable: item_type(*item) == context,
            })
            .collect(),
        passive: inventory.passive.clone(),
    })
}

/// `selected` to slot z listy aktywnej (lub `None` gdy gracz zamknął ekwipunek).
pub fn close<B: ChallengeBody>(
    session: &mut MiniChallengeSession<B>,
    inventory: &mut PlayerInventory,
    selected: Option<usize>,
) -> Result<CloseOutcome, SessionError> {
    let Some(request) = session.interrupt.take() else {
        return Err(SessionError::invalid_state("close", session.phase));
    };

    let matching = selected.and_then(|slot| match inventory.items.get(slot) {
        Some(item) if item_type(*item) == request.context => Some((slot, *item)),
        Some(_) => None,
        None => {
            warn!(player_id = inventory.player_id, slot, "selected inventory slot does not exist");
            None
        }
    });

    let Some((slot, item)) = matching else {
        session.phase = Phase::Alerting;
        session.alert.schedule(ALERT_DELAY_MS);
        debug!(player_id = inventory.player_id, "inventory closed, replaying alert");
        return Ok(CloseOutcome::Cancelled);
    };

    let commands = {
        let mut target = ItemTarget {
            countdown: &mut session.countdown,
            bonus_damage: &mut session.bonus_damage,
        };
        match use_item(item, slot, &mut target) {
            Ok(cmds) => cmds,
            Err(err) => {
                // przerwanie nadal czeka na poprawne zamknięcie
                session.interrupt = Some(request);
                return Err(err);
            }
        }
    };
    for cmd in commands {
        inventory.apply(cmd);
    }

    info!(player_id = inventory.player_id, ?item, "inventory closed with item, resuming");
    session.start_running();
    Ok(CloseOutcome::Consumed(item))
}
