use dashmap::DashMap;
use tracing::warn;

use super::{items::InventoryCommand, types::ItemKey};

/// Ekwipunek gracza: przedmioty aktywne (do użycia) i pasywne (tylko podgląd).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInventory {
    pub player_id: u64,
    pub items: Vec<ItemKey>,
    pub passive: Vec<ItemKey>,
}

impl PlayerInventory {
    pub fn new(player_id: u64) -> Self {
        Self {
            player_id,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, cmd: InventoryCommand) {
        match cmd {
            InventoryCommand::RemoveActive(slot) => {
                if slot < self.items.len() {
                    self.items.remove(slot);
                } else {
                    warn!(player_id = self.player_id, slot, "remove of missing inventory slot");
                }
            }
        }
    }
}

pub trait InventoryRepo {
    fn get_or_create(&self, player_id: u64) -> PlayerInventory;
    fn save(&self, inventory: &PlayerInventory);
}

#[derive(Default)]
pub struct MemoryInventoryRepo {
    players: DashMap<u64, PlayerInventory>,
}

impl MemoryInventoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InventoryRepo for MemoryInventoryRepo {
    fn get_or_create(&self, player_id: u64) -> PlayerInventory {
        self.players
            .entry(player_id)
            .or_insert_with(|| PlayerInventory::new(player_id))
            .clone()
    }

    fn save(&self, inventory: &PlayerInventory) {
        self.players.insert(inventory.player_id, inventory.clone());
    }
}
