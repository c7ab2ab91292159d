//! Key-path configuration store.
//!
//! Values live in a JSON tree and are addressed by a static [`KeyPath`].
//! Writes are grouped into a [`Changeset`] and applied by
//! [`ConfigStore::save`] all at once or not at all.
//!
//! Concurrent saves are not coordinated: the last writer wins.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
use serde_json::{Map, Value};
use sweep_core::Result;

/// Location of a value in the configuration tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: &'static [&'static str],
}

impl KeyPath {
    /// Creates a key path from its segments.
    pub const fn new(segments: &'static [&'static str]) -> Self {
        Self { segments }
    }

    /// Returns the path segments, outermost first.
    pub const fn segments(&self) -> &'static [&'static str] {
        self.segments
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// An ordered set of writes applied by a single save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    writes: Vec<(KeyPath, Value)>,
}

impl Changeset {
    /// Creates an empty changeset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a write, replacing any earlier write to the same path.
    #[must_use]
    pub fn set(mut self, path: KeyPath, value: impl Into<Value>) -> Self {
        self.writes.retain(|(existing, _)| *existing != path);
        self.writes.push((path, value.into()));
        self
    }

    /// Returns the number of writes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns `true` if there are no writes.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Applies every write to `root`.
    pub(crate) fn apply(&self, root: &mut Value) {
        for (path, value) in &self.writes {
            assign(root, path, value.clone());
        }
    }
}

/// Persistence backing the job configuration record.
pub trait ConfigStore: Send + Sync {
    /// Reads the value at `path`, if any.
    fn get(&self, path: &KeyPath) -> Result<Option<Value>>;

    /// Applies all writes in `changes` atomically.
    fn save(&self, changes: Changeset) -> Result<()>;
}

/// Returns the value at `path` inside `root`.
pub(crate) fn lookup<'a>(root: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| node.as_object()?.get(*segment))
}

/// Writes `value` at `path`, creating or replacing intermediate objects.
pub(crate) fn assign(root: &mut Value, path: &KeyPath, value: Value) {
    let Some((last, parents)) = path.segments().split_last() else {
        *root = value;
        return;
    };

    let mut node = root;
    for segment in parents {
        node = ensure_object(node)
            .entry(*segment)
            .or_insert_with(|| Value::Object(Map::new()));
    }
    ensure_object(node).insert((*last).to_owned(), value);
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const BUCKET: KeyPath = KeyPath::new(&["job", "storage", "bucket"]);
    const ENABLED: KeyPath = KeyPath::new(&["job", "enabled"]);

    #[test]
    fn test_assign_creates_nested_objects() {
        let mut root = Value::Null;
        assign(&mut root, &BUCKET, json!("archive"));
        assign(&mut root, &ENABLED, json!(true));

        assert_eq!(
            root,
            json!({ "job": { "enabled": true, "storage": { "bucket": "archive" } } })
        );
    }

    #[test]
    fn test_assign_replaces_scalar_parent() {
        let mut root = json!({ "job": { "storage": "oops" } });
        assign(&mut root, &BUCKET, json!("archive"));

        assert_eq!(lookup(&root, &BUCKET), Some(&json!("archive")));
    }

    #[test]
    fn test_lookup_missing() {
        let root = json!({ "job": { "enabled": true } });
        assert_eq!(lookup(&root, &BUCKET), None);
        assert_eq!(lookup(&root, &ENABLED), Some(&json!(true)));
    }

    #[test]
    fn test_changeset_last_write_wins() {
        let changes = Changeset::new()
            .set(ENABLED, true)
            .set(BUCKET, "archive")
            .set(ENABLED, false);

        let mut root = Value::Null;
        changes.apply(&mut root);

        assert_eq!(changes.len(), 2);
        assert_eq!(lookup(&root, &ENABLED), Some(&json!(false)));
    }

    #[test]
    fn test_key_path_display() {
        assert_eq!(BUCKET.to_string(), "job.storage.bucket");
    }
}
