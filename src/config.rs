use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::engine::types::{ChallengeDuration, Difficulty, SessionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinigameKind {
    Qte,
    Simon,
}

/// Ustawienia hosta czytane z ENV (pliki `.env*` ładuje `dotenvy`).
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub tick_ms: u64,
    pub max_ticks: u64,
    pub player_id: u64,
    pub minigame: MinigameKind,
    pub session: SessionConfig,
}

impl HostConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Wersja testowalna: `lookup` zastępuje `env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let num = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .filter(|&v| v != 0)
                .unwrap_or(default)
        };

        let minigame = match lookup("MINIGAME").as_deref().map(str::trim) {
            Some("simon") => MinigameKind::Simon,
            _ => MinigameKind::Qte,
        };

        let session = match lookup("CHALLENGE_CONFIG").filter(|s| !s.trim().is_empty()) {
            Some(path) => load_session_config(PathBuf::from(path))?,
            None => SessionConfig {
                difficulty: lookup("CHALLENGE_DIFFICULTY")
                    .and_then(|s| parse_difficulty(&s))
                    .unwrap_or_default(),
                duration: lookup("CHALLENGE_DURATION_MS")
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .map(ChallengeDuration::Timed)
                    .unwrap_or(ChallengeDuration::Timed(5000)),
                ..SessionConfig::default()
            },
        };

        Ok(Self {
            tick_ms: num("TICK_MS", 16),
            max_ticks: num("MAX_TICKS", 2000),
            player_id: num("PLAYER_ID", 1),
            minigame,
            session,
        })
    }
}

pub fn parse_difficulty(s: &str) -> Option<Difficulty> {
    match s.trim().to_ascii_lowercase().as_str() {
        "easy" | "1" => Some(Difficulty::Easy),
        "medium" | "2" => Some(Difficulty::Medium),
        "hard" | "3" => Some(Difficulty::Hard),
        _ => None,
    }
}

pub fn load_session_config(path: PathBuf) -> Result<SessionConfig> {
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("reading session config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing session config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::engine::types::ItemType;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_env_empty() {
        let cfg = HostConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.tick_ms, 16);
        assert_eq!(cfg.max_ticks, 2000);
        assert_eq!(cfg.minigame, MinigameKind::Qte);
        assert_eq!(cfg.session.duration, ChallengeDuration::Timed(5000));
        assert_eq!(cfg.session.difficulty, Difficulty::Easy);
    }

    #[test]
    fn bad_numbers_fall_back() {
        let cfg = HostConfig::from_lookup(lookup(&[
            ("TICK_MS", "abc"),
            ("MAX_TICKS", "0"),
            ("MINIGAME", "simon"),
            ("CHALLENGE_DIFFICULTY", "HARD"),
        ]))
        .unwrap();
        assert_eq!(cfg.tick_ms, 16);
        assert_eq!(cfg.max_ticks, 2000);
        assert_eq!(cfg.minigame, MinigameKind::Simon);
        assert_eq!(cfg.session.difficulty, Difficulty::Hard);
    }

    #[test]
    fn session_config_json() {
        let cfg: SessionConfig =
            serde_json::from_str(r#"{"difficulty":"medium","duration":{"timed":10000}}"#).unwrap();
        assert_eq!(cfg.difficulty, Difficulty::Medium);
        assert_eq!(cfg.duration, ChallengeDuration::Timed(10_000));
        assert_eq!(cfg.item_context, ItemType::Minigame);

        let cfg: SessionConfig = serde_json::from_str(r#"{"duration":"untimed"}"#).unwrap();
        assert_eq!(cfg.duration, ChallengeDuration::Untimed);
    }

    #[test]
    fn missing_config_file_is_error() {
        let vars = [("CHALLENGE_CONFIG", "/nonexistent/challenge.json")];
        let err = HostConfig::from_lookup(lookup(&vars));
        assert!(err.is_err());
    }
}
