//! Session-scoped file attachments.
//!
//! The store tracks two provenance-tagged collections: files the user
//! uploaded and files the backend declared as generated. Both live only
//! as long as the session.

use serde::{Deserialize, Serialize};

/// Origin tag of a file record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// File uploaded by the user.
    Uploaded,
    /// File produced by the backend during an exchange.
    Generated,
}

impl Provenance {
    /// Wire value used by the delete-file endpoint's `file_type` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Generated => "generated",
        }
    }
}

/// A single tracked file within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File name, unique within its provenance collection.
    pub name: String,
    /// Size in bytes. `0` means unknown (server-generated files report no size).
    pub size_bytes: u64,
    /// Origin of the record.
    pub provenance: Provenance,
}

impl FileRecord {
    /// Creates a record for a user-uploaded file.
    pub fn uploaded(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            provenance: Provenance::Uploaded,
        }
    }

    /// Creates a record for a server-generated file. Size is unknown.
    pub fn generated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes: 0,
            provenance: Provenance::Generated,
        }
    }
}

/// Holds the attachments of a single session, split by provenance.
///
/// Both collections preserve insertion order, which drives display order
/// and removal semantics. Within each collection, names are unique: adding
/// a record whose name is already present is a no-op rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentStore {
    uploaded: Vec<FileRecord>,
    generated: Vec<FileRecord>,
}

impl AttachmentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record into the collection matching its provenance.
    ///
    /// Duplicate names (within the same provenance) are skipped silently.
    /// Returns `true` if the record was inserted.
    pub fn add(&mut self, record: FileRecord) -> bool {
        let bucket = self.bucket_mut(record.provenance);
        if bucket.iter().any(|r| r.name == record.name) {
            return false;
        }
        bucket.push(record);
        true
    }

    /// Removes the first record with the given name from the collection
    /// matching `provenance`. No-op if absent.
    pub fn remove(&mut self, name: &str, provenance: Provenance) -> Option<FileRecord> {
        let bucket = self.bucket_mut(provenance);
        let idx = bucket.iter().position(|r| r.name == name)?;
        Some(bucket.remove(idx))
    }

    /// Returns all records, uploaded files first, then generated files.
    ///
    /// The ordering is significant: user uploads are always listed before
    /// backend-generated files.
    pub fn all(&self) -> Vec<FileRecord> {
        self.uploaded
            .iter()
            .chain(self.generated.iter())
            .cloned()
            .collect()
    }

    /// Empties both collections.
    pub fn clear(&mut self) {
        self.uploaded.clear();
        self.generated.clear();
    }

    /// True iff both collections are empty.
    pub fn is_empty(&self) -> bool {
        self.uploaded.is_empty() && self.generated.is_empty()
    }

    /// Total number of tracked files across both collections.
    pub fn len(&self) -> usize {
        self.uploaded.len() + self.generated.len()
    }

    fn bucket_mut(&mut self, provenance: Provenance) -> &mut Vec<FileRecord> {
        match provenance {
            Provenance::Uploaded => &mut self.uploaded,
            Provenance::Generated => &mut self.generated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_deduplicates_by_name_within_provenance() {
        let mut store = AttachmentStore::new();
        assert!(store.add(FileRecord::uploaded("report.pdf", 1024)));
        assert!(!store.add(FileRecord::uploaded("report.pdf", 2048)));
        assert_eq!(store.len(), 1);
        // The original record is untouched by the skipped duplicate
        assert_eq!(store.all()[0].size_bytes, 1024);
    }

    #[test]
    fn same_name_allowed_across_provenances() {
        let mut store = AttachmentStore::new();
        assert!(store.add(FileRecord::uploaded("data.csv", 10)));
        assert!(store.add(FileRecord::generated("data.csv")));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn all_lists_uploaded_before_generated() {
        let mut store = AttachmentStore::new();
        store.add(FileRecord::generated("summary.txt"));
        store.add(FileRecord::uploaded("input.csv", 42));
        store.add(FileRecord::uploaded("notes.md", 7));

        let names: Vec<_> = store.all().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["input.csv", "notes.md", "summary.txt"]);
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let mut store = AttachmentStore::new();
        store.add(FileRecord::uploaded("a.txt", 1));
        assert!(store.remove("missing.txt", Provenance::Uploaded).is_none());
        assert!(store.remove("a.txt", Provenance::Generated).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_matches_provenance() {
        let mut store = AttachmentStore::new();
        store.add(FileRecord::uploaded("x.bin", 5));
        store.add(FileRecord::generated("x.bin"));

        let removed = store.remove("x.bin", Provenance::Generated).unwrap();
        assert_eq!(removed.provenance, Provenance::Generated);
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].provenance, Provenance::Uploaded);
    }

    #[test]
    fn clear_empties_both_collections() {
        let mut store = AttachmentStore::new();
        store.add(FileRecord::uploaded("a", 1));
        store.add(FileRecord::generated("b"));
        assert!(!store.is_empty());

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn generated_records_have_unknown_size() {
        let record = FileRecord::generated("chart.png");
        assert_eq!(record.size_bytes, 0);
        assert_eq!(record.provenance, Provenance::Generated);
    }
}
