//! Stored record models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Identifier;
use crate::embed::EmbedDocument;

/// A document saved under a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Identifier,
    pub document: EmbedDocument,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredRecord {
    /// Creates a fresh record stamped with the current time.
    pub fn new(id: Identifier, document: EmbedDocument) -> Self {
        let now = Utc::now();
        Self {
            id,
            document,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the record that replaces `self` when `document` is saved
    /// under the same name. The creation time is kept.
    pub fn overwritten_with(&self, document: EmbedDocument) -> Self {
        Self {
            id: self.id.clone(),
            document,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

/// Every record saved in one partition, ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    records: Vec<StoredRecord>,
}

impl Partition {
    /// Builds a partition from records in any order.
    ///
    /// When an identifier repeats, the last record wins.
    pub fn from_records(records: impl IntoIterator<Item = StoredRecord>) -> Self {
        let mut partition = Self::default();
        for record in records {
            partition.upsert(record);
        }
        partition
    }

    pub fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StoredRecord> {
        self.records
    }

    pub fn ids(&self) -> Vec<Identifier> {
        self.records.iter().map(|record| record.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: &Identifier) -> std::result::Result<usize, usize> {
        self.records.binary_search_by(|record| record.id.cmp(id))
    }

    pub fn get(&self, id: &Identifier) -> Option<&StoredRecord> {
        self.position(id).ok().map(|index| &self.records[index])
    }

    /// Saves `document` under `id`, keeping the creation time of a record
    /// it replaces.
    pub fn save(&mut self, id: &Identifier, document: EmbedDocument) -> SaveOutcome {
        let record = match self.get(id) {
            Some(existing) => existing.overwritten_with(document),
            None => StoredRecord::new(id.clone(), document),
        };
        match self.upsert(record) {
            Some(_) => SaveOutcome::Overwritten,
            None => SaveOutcome::Created,
        }
    }

    /// Inserts or replaces the record with the same id, keeping order.
    /// Returns the record that was replaced, if any.
    pub fn upsert(&mut self, record: StoredRecord) -> Option<StoredRecord> {
        match self.position(&record.id) {
            Ok(index) => Some(std::mem::replace(&mut self.records[index], record)),
            Err(index) => {
                self.records.insert(index, record);
                None
            }
        }
    }

    pub fn remove(&mut self, id: &Identifier) -> Option<StoredRecord> {
        self.position(id).ok().map(|index| self.records.remove(index))
    }
}

/// Whether a save created a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Created,
    Overwritten,
}

impl SaveOutcome {
    pub fn is_created(self) -> bool {
        matches!(self, Self::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::EmbedDraft;

    fn doc(title: &str) -> EmbedDocument {
        EmbedDraft::new().with_title(title).build().unwrap()
    }

    fn id(raw: &str) -> Identifier {
        Identifier::parse(raw).unwrap()
    }

    #[test]
    fn test_records_stay_sorted() {
        let mut partition = Partition::default();
        assert_eq!(partition.save(&id("rules"), doc("r")), SaveOutcome::Created);
        assert_eq!(partition.save(&id("about"), doc("a")), SaveOutcome::Created);
        assert_eq!(partition.save(&id("faq"), doc("f")), SaveOutcome::Created);

        assert_eq!(partition.ids(), vec![id("about"), id("faq"), id("rules")]);
    }

    #[test]
    fn test_overwrite_keeps_creation_time() {
        let mut partition = Partition::default();
        partition.save(&id("faq"), doc("v1"));
        let created = partition.get(&id("faq")).unwrap().created_at;

        assert_eq!(partition.save(&id("FAQ"), doc("v2")), SaveOutcome::Overwritten);

        let record = partition.get(&id("faq")).unwrap();
        assert_eq!(record.document.title(), Some("v2"));
        assert_eq!(record.created_at, created);
        assert!(record.updated_at >= created);
        assert_eq!(partition.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut partition = Partition::default();
        partition.save(&id("ghost"), doc("boo"));

        assert!(partition.remove(&id("ghost")).is_some());
        assert!(partition.remove(&id("ghost")).is_none());
        assert!(partition.is_empty());
    }

    #[test]
    fn test_from_records_sorts_and_dedupes() {
        let partition = Partition::from_records(vec![
            StoredRecord::new(id("b"), doc("first b")),
            StoredRecord::new(id("a"), doc("a")),
            StoredRecord::new(id("b"), doc("second b")),
        ]);

        assert_eq!(partition.ids(), vec![id("a"), id("b")]);
        assert_eq!(
            partition.get(&id("b")).unwrap().document.title(),
            Some("second b")
        );
    }
}
