//! Embedded region datasets. Each quiz map is a plain tile-grid cartogram:
//! one named cell per region, no real geometry.

use serde::Deserialize;

/// One clickable region cell.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RegionDef {
    pub id: String,
    pub name: String,
    pub col: u8,
    pub row: u8,
}

/// A complete quiz map.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Dataset {
    /// Unit word for the game-over message ("länder", "stater", "landskap").
    pub unit: String,
    pub cols: u8,
    pub rows: u8,
    pub regions: Vec<RegionDef>,
}

impl Dataset {
    /// Fallback when a dataset fails to parse; the host then sits on "Laddar...".
    pub fn empty() -> Self {
        Self {
            unit: String::new(),
            cols: 1,
            rows: 1,
            regions: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetId {
    Europe,
    UsStates,
    Landskap,
}

impl DatasetId {
    pub const ALL: [DatasetId; 3] = [DatasetId::Europe, DatasetId::UsStates, DatasetId::Landskap];

    pub fn title(self) -> &'static str {
        match self {
            DatasetId::Europe => "Europas länder",
            DatasetId::UsStates => "USA:s delstater",
            DatasetId::Landskap => "Svenska landskap",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            DatasetId::Europe => "🇪🇺",
            DatasetId::UsStates => "🇺🇸",
            DatasetId::Landskap => "🇸🇪",
        }
    }

    pub fn load(self) -> Result<Dataset, serde_json::Error> {
        let raw = match self {
            DatasetId::Europe => include_str!("data/europe.json"),
            DatasetId::UsStates => include_str!("data/us_states.json"),
            DatasetId::Landskap => include_str!("data/landskap.json"),
        };
        serde_json::from_str(raw)
    }
}
