//! Sort order for inductor construction categories.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::InductorRecord;
use crate::core::RedcError;

/// Category labels used by Chinese vendor power inductor catalogs, best first.
pub const VENDOR_ORDER: &[&str] = &[
    "一体成型电感",
    "小型化一体成型电感",
    "立脚型一体成型电感",
    "磁封胶功率电感",
    "车规级一体成型电感",
    "车规级小型一体成型电感",
    "羰基一体成型电感",
    "小型化一体成型电感T-CORE",
    "T-CORE超大电流电感",
    "铁氧体绕线",
    "磁屏蔽罩",
];

/// Generic construction labels, as used by the built-in catalog.
pub const CONSTRUCTION_ORDER: &[&str] = &["Molded", "Shielded", "Semi-Shielded", "Unshielded"];

/// Category label to rank, lower ranks first. Labels compare
/// case-insensitively after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPriorityTable {
    ranks: HashMap<String, u32>,
}

/// On-disk form: either labels in priority order or an explicit map.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriorityFile {
    Ordered(Vec<String>),
    Ranked(HashMap<String, u32>),
}

fn key(category: &str) -> String {
    category.trim().to_lowercase()
}

/// [`VENDOR_ORDER`] ranks 0 to 10, then [`CONSTRUCTION_ORDER`].
impl Default for CategoryPriorityTable {
    fn default() -> Self {
        Self::from_order(VENDOR_ORDER.iter().chain(CONSTRUCTION_ORDER).copied())
    }
}

impl CategoryPriorityTable {
    /// Rank categories by their position in `order`. A repeated label keeps
    /// its first position.
    pub fn from_order<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks = HashMap::new();
        for (rank, category) in order.into_iter().enumerate() {
            ranks.entry(key(category.as_ref())).or_insert(rank as u32);
        }
        Self { ranks }
    }

    pub fn from_ranks<I, S>(ranks: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        Self {
            ranks: ranks
                .into_iter()
                .map(|(category, rank)| (key(category.as_ref()), rank))
                .collect(),
        }
    }

    /// Parse a JSON array of labels or a JSON object of label to rank.
    pub fn from_json(json: &str) -> Result<Self, RedcError> {
        Ok(match serde_json::from_str::<PriorityFile>(json)? {
            PriorityFile::Ordered(order) => Self::from_order(order),
            PriorityFile::Ranked(ranks) => Self::from_ranks(ranks),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, RedcError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// `None` for categories the table does not know.
    pub fn rank(&self, category: &str) -> Option<u32> {
        self.ranks.get(&key(category)).copied()
    }

    /// Stable sort by rank; unknown categories go last in catalog order.
    pub fn sort_records(&self, records: &mut [InductorRecord]) {
        records.sort_by_key(|record| {
            let rank = self.rank(&record.category);
            (rank.is_none(), rank)
        });
    }
}
