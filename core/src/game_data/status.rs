use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::events::{IconId, StatusId};

/// Display metadata for a status effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<IconId>,
    /// Free company buffs are always on and only clutter the recap
    #[serde(default)]
    pub is_fc_buff: bool,
}

pub trait StatusLookup {
    /// `None` for ids the game data doesn't know.
    fn resolve_status(&self, id: StatusId) -> Option<StatusInfo>;
}

/// In-memory status sheet.
#[derive(Debug, Clone, Default)]
pub struct StatusTable {
    statuses: HashMap<StatusId, StatusInfo>,
}

/// On-disk layout: one `[[status]]` table per entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusTableFile {
    #[serde(default, rename = "status")]
    pub statuses: Vec<StatusEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub id: StatusId,
    #[serde(flatten)]
    pub info: StatusInfo,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. Returns the previous entry, if any.
    pub fn insert(&mut self, id: StatusId, info: StatusInfo) -> Option<StatusInfo> {
        self.statuses.insert(id, info)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Merge entries from a parsed file. Later entries win.
    /// Returns the ids that were already present.
    pub fn extend_from_file(&mut self, file: StatusTableFile) -> Vec<StatusId> {
        let mut duplicates = Vec::new();
        for entry in file.statuses {
            if self.insert(entry.id, entry.info).is_some() {
                duplicates.push(entry.id);
            }
        }
        duplicates
    }
}

impl FromIterator<(StatusId, StatusInfo)> for StatusTable {
    fn from_iter<I: IntoIterator<Item = (StatusId, StatusInfo)>>(iter: I) -> Self {
        Self {
            statuses: iter.into_iter().collect(),
        }
    }
}

impl StatusLookup for StatusTable {
    fn resolve_status(&self, id: StatusId) -> Option<StatusInfo> {
        self.statuses.get(&id).cloned()
    }
}
