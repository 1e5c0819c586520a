use serde::{Deserialize, Serialize};

/// Poziom trudności (uporządkowany: wyżej = większa nagroda i ryzyko).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

/// Czas na minigrę w ms albo brak limitu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeDuration {
    Timed(u64),
    #[default]
    Untimed,
}

impl ChallengeDuration {
    pub fn as_ms(self) -> Option<u64> {
        match self {
            ChallengeDuration::Timed(ms) => Some(ms),
            ChallengeDuration::Untimed => None,
        }
    }
}

/// Typ przedmiotu; służy też jako tag kontekstu przy otwieraniu ekwipunku.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Minigame,
    Combat,
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKey {
    Hourglass,     // spowalnia upływ czasu
    Stopwatch,     // + czas na minigrę
    WarDrum,       // jednorazowy bonus do obrażeń
    HealingPotion, // tylko w walce
    LuckyCharm,    // pasywny
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Alerting,
    Running,
    Suspended,
    Resolved,
}

/// Wynik jednej rozgrywki przekazywany do walki.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub won: bool,
    pub damage: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub duration: ChallengeDuration,
    pub item_context: ItemType,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            duration: ChallengeDuration::Untimed,
            item_context: ItemType::Minigame,
        }
    }
}

/// Teksty wyświetlane przez warstwę prezentacji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeInfo {
    pub name: String,
    pub description: String,
    pub alert_text: String,
}

impl Default for ChallengeInfo {
    fn default() -> Self {
        Self {
            name: "Default MiniGame".into(),
            description: "Default description".into(),
            alert_text: "Default!".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinigameResult {
    Success,
    Partial(i64), // ile ms od ideału (QTE)
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QteSpec {
    pub target_ms: i64,
    pub window_ms: i64,
}

#[derive(Debug, Clone)]
pub struct SimonSpec {
    pub length: usize,
    pub alphabet: &'static [char],
}
