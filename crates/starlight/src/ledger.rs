//! Counters and placed-star history, and how they map onto storage keys.
//!
//! The star list is authoritative: on load the total and the click flag are
//! derived from its length, and a stored total that disagrees is logged and dropped.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError};

/// Storage key for the click flag (`"true"` once a star has been placed).
pub const KEY_CLICK_FLAG: &str = "hasClicked";
/// Storage key for the total placed-star count (integer string).
pub const KEY_TOTAL_COUNT: &str = "totalClicks";
/// Storage key for the placed-star history (JSON array of `{id, x, y}`).
pub const KEY_STAR_LIST: &str = "clickedStars";

/// A star placed by a completed interaction. `x`/`y` are screen percentages in [0, 100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickedStar {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarLedger {
    pub has_clicked: bool,
    pub total_clicks: u64,
    pub stars: Vec<ClickedStar>,
}

impl StarLedger {
    /// Read the three keys. Missing or malformed values fall back to defaults.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let stars: Vec<ClickedStar> = match store.get(KEY_STAR_LIST) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Stored star list is malformed ({}), starting empty", e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        let stored_total = store.get(KEY_TOTAL_COUNT).and_then(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| log::warn!("Stored total {:?} is not a count: {}", raw, e))
                .ok()
        });
        let total_clicks = stars.len() as u64;
        if let Some(stored) = stored_total {
            if stored != total_clicks {
                log::warn!(
                    "Stored total {} disagrees with {} stored stars; using the star list",
                    stored,
                    total_clicks
                );
            }
        }

        let stored_flag = store.get(KEY_CLICK_FLAG).is_some_and(|raw| raw == "true");
        let has_clicked = total_clicks > 0;
        if stored_flag != has_clicked {
            log::warn!(
                "Stored click flag {} disagrees with {} stored stars; using the star list",
                stored_flag,
                total_clicks
            );
        }

        log::info!("Loaded {} placed star(s)", total_clicks);
        Self {
            has_clicked,
            total_clicks,
            stars,
        }
    }

    /// The three key/value pairs describing this ledger.
    pub fn entries(&self) -> Result<Vec<(&'static str, String)>, StoreError> {
        Ok(vec![
            (KEY_CLICK_FLAG, self.has_clicked.to_string()),
            (KEY_TOTAL_COUNT, self.total_clicks.to_string()),
            (KEY_STAR_LIST, serde_json::to_string(&self.stars)?),
        ])
    }

    /// Write all three keys as one batch.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.write_batch(&self.entries()?)
    }

    /// Append a placed star and update the counters to match.
    pub fn record(&mut self, star: ClickedStar) {
        self.stars.push(star);
        self.total_clicks = self.stars.len() as u64;
        self.has_clicked = true;
    }

    /// Id for a star created at `now_ms`, strictly greater than every stored id.
    pub fn next_star_id(&self, now_ms: u64) -> u64 {
        match self.stars.iter().map(|s| s.id).max() {
            Some(last) if now_ms <= last => last + 1,
            _ => now_ms,
        }
    }

    /// How many stars the field should show.
    pub fn generation_count(&self) -> usize {
        self.stars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn stars(n: u64) -> Vec<ClickedStar> {
        (0..n)
            .map(|i| ClickedStar {
                id: 1_700_000_000_000 + i,
                x: 10.0 * i as f32 + 0.25,
                y: 99.5 - 7.0 * i as f32,
            })
            .collect()
    }

    #[test]
    fn empty_store_gives_defaults() {
        let ledger = StarLedger::load(&MemoryStore::new());
        assert_eq!(ledger, StarLedger::default());
        assert!(!ledger.has_clicked);
        assert_eq!(ledger.generation_count(), 0);
    }

    #[test]
    fn round_trip_reproduces_state() {
        let ledger = StarLedger {
            has_clicked: true,
            total_clicks: 5,
            stars: stars(5),
        };
        let mut store = MemoryStore::new();
        ledger.save(&mut store).expect("memory save");
        assert_eq!(store.get(KEY_CLICK_FLAG).as_deref(), Some("true"));
        assert_eq!(store.get(KEY_TOTAL_COUNT).as_deref(), Some("5"));
        assert_eq!(StarLedger::load(&store), ledger);
    }

    #[test]
    fn malformed_values_fall_back() {
        let store = MemoryStore::with_entries([
            (KEY_CLICK_FLAG, "yes"),
            (KEY_TOTAL_COUNT, "many"),
            (KEY_STAR_LIST, "[{\"id\": 1, \"x\": "),
        ]);
        assert_eq!(StarLedger::load(&store), StarLedger::default());
    }

    #[test]
    fn star_list_wins_over_stored_total() {
        let store = MemoryStore::with_entries([
            (KEY_CLICK_FLAG, "true"),
            (KEY_TOTAL_COUNT, "9"),
            (KEY_STAR_LIST, r#"[{"id":5,"x":1.0,"y":2.0},{"id":6,"x":3.5,"y":4.5}]"#),
        ]);
        let ledger = StarLedger::load(&store);
        assert_eq!(ledger.total_clicks, 2);
        assert!(ledger.has_clicked);
        assert_eq!(ledger.stars[1], ClickedStar { id: 6, x: 3.5, y: 4.5 });
    }

    #[test]
    fn record_keeps_counters_in_step() {
        let mut ledger = StarLedger::default();
        ledger.record(ClickedStar { id: 10, x: 1.0, y: 1.0 });
        ledger.record(ClickedStar { id: 11, x: 2.0, y: 2.0 });
        assert_eq!(ledger.total_clicks, 2);
        assert!(ledger.has_clicked);
        assert_eq!(ledger.stars.iter().map(|s| s.id).collect::<Vec<_>>(), vec![10, 11]);
    }

    #[test]
    fn star_ids_are_monotonic() {
        let mut ledger = StarLedger::default();
        assert_eq!(ledger.next_star_id(500), 500);
        ledger.record(ClickedStar { id: 500, x: 0.0, y: 0.0 });
        assert_eq!(ledger.next_star_id(500), 501);
        assert_eq!(ledger.next_star_id(400), 501);
        assert_eq!(ledger.next_star_id(900), 900);
    }
}
