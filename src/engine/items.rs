use tracing::info;

use super::{
    countdown::Countdown,
    error::SessionError,
    types::{ChallengeDuration, ItemKey, ItemType},
};

/// Nazwy i typy przedmiotów
#[derive(Debug, Clone, Copy)]
pub struct ItemMeta {
    pub name: &'static str,
    pub item_type: ItemType,
}

pub const ITEM_META: &[(ItemKey, ItemMeta)] = &[
    (ItemKey::Hourglass,     ItemMeta { name: "Hourglass",      item_type: ItemType::Minigame }),
    (ItemKey::Stopwatch,     ItemMeta { name: "Stopwatch",      item_type: ItemType::Minigame }),
    (ItemKey::WarDrum,       ItemMeta { name: "War drum",       item_type: ItemType::Minigame }),
    (ItemKey::HealingPotion, ItemMeta { name: "Healing potion", item_type: ItemType::Combat   }),
    (ItemKey::LuckyCharm,    ItemMeta { name: "Lucky charm",    item_type: ItemType::Passive  }),
];

pub const HOURGLASS_SCALE: f64 = 0.5;
pub const STOPWATCH_EXTRA_MS: u64 = 3000;
pub const WAR_DRUM_BONUS: u64 = 5;

#[inline]
pub fn item_name(k: ItemKey) -> &'static str {
    ITEM_META.iter().find(|(kk, _)| *kk == k).map(|(_, m)| m.name).unwrap_or("Item")
}

#[inline]
pub fn item_type(k: ItemKey) -> ItemType {
    ITEM_META
        .iter()
        .find(|(kk, _)| *kk == k)
        .map(|(_, m)| m.item_type)
        .unwrap_or(ItemType::Passive)
}

/// Polecenie dla ekwipunku zwracane przez efekt przedmiotu; stosuje je
/// protokół przerwania, nie sam przedmiot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryCommand {
    RemoveActive(usize),
}

/// To, co efekt przedmiotu może zmienić w trwającej sesji.
pub struct ItemTarget<'a> {
    pub(crate) countdown: &'a mut Countdown,
    pub(crate) bonus_damage: &'a mut u64,
}

impl ItemTarget<'_> {
    pub fn time_scale(&self) -> f64 {
        self.countdown.time_scale()
    }

    pub fn set_time_scale(&mut self, scale: f64) -> Result<(), SessionError> {
        self.countdown.set_time_scale(scale)
    }

    /// Bez efektu dla minigry bez limitu czasu.
    pub fn extend_duration(&mut self, extra_ms: u64) {
        if let ChallengeDuration::Timed(ms) = self.countdown.duration() {
            self.countdown
                .set_duration(ChallengeDuration::Timed(ms.saturating_add(extra_ms)));
        }
    }

    pub fn grant_bonus(&mut self, damage: u64) {
        *self.bonus_damage = self.bonus_damage.saturating_add(damage);
    }
}

/// Użycie przedmiotu ze slotu `slot` listy aktywnej.
pub fn use_item(
    key: ItemKey,
    slot: usize,
    target: &mut ItemTarget<'_>,
) -> Result<Vec<InventoryCommand>, SessionError> {
    match key {
        ItemKey::Hourglass => {
            let scale = target.time_scale() * HOURGLASS_SCALE;
            target.set_time_scale(scale)?;
        }
        ItemKey::Stopwatch => target.extend_duration(STOPWATCH_EXTRA_MS),
        ItemKey::WarDrum => target.grant_bonus(WAR_DRUM_BONUS),
        // efekt działa poza minigrą, ale wybrany przedmiot i tak znika
        ItemKey::HealingPotion | ItemKey::LuckyCharm => {}
    }

    info!(item = item_name(key), slot, "item used");
    Ok(vec![InventoryCommand::RemoveActive(slot)])
}
