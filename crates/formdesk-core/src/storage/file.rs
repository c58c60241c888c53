//! Templates as JSON files in one directory.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::template::Template;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "json";

/// One `<encoded id>.json` file per template.
///
/// Ids are encoded reversibly: ASCII letters, digits and `-` are kept and
/// every other byte becomes `_` plus two hex digits. Distinct ids never
/// share a file and no id can escape the directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, creating it when missing.
    pub fn new(dir: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&dir)
            .map_err(|e| io_error("create storage directory", &dir, e))?;
        Ok(Self { dir })
    }

    /// `<local data dir>/formdesk/templates`, falling back to the home directory.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine a data directory".to_string()))?;
        Self::new(base.join("formdesk").join("templates"))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", encode_id(id)))
    }
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io(format!("Failed to {action} {}: {e}", path.display()))
}

fn encode_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            out.push(byte as char);
        } else {
            let _ = write!(out, "_{byte:02x}");
        }
    }
    out
}

/// Inverse of [`encode_id`]; `None` for names this storage did not write.
fn decode_id(stem: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(stem.len());
    let mut rest = stem.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        if byte == b'_' {
            let hex = std::str::from_utf8(tail.get(..2)?).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            rest = &tail[2..];
        } else if byte.is_ascii_alphanumeric() || byte == b'-' {
            bytes.push(byte);
            rest = tail;
        } else {
            return None;
        }
    }
    String::from_utf8(bytes).ok()
}

impl Storage for FileStorage {
    fn save(&self, id: &str, template: &Template) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.path_for(id);
        let json = template.to_json();
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json).map_err(|e| io_error("write", &path, e))
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Template>> {
        let path = self.path_for(id);
        let id = id.to_string();
        Box::pin(async move {
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(StorageError::NotFound(id));
                }
                Err(e) => return Err(io_error("read", &path, e)),
            };
            Template::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {e}", path.display()))
            })
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.path_for(id);
        Box::pin(async move {
            match fs::remove_file(&path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                    Err(io_error("delete", &path, e))
                }
                _ => Ok(()),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let dir = self.dir.clone();
        Box::pin(async move {
            let entries = fs::read_dir(&dir).map_err(|e| io_error("read", &dir, e))?;
            let ids = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
                .filter_map(|path| decode_id(path.file_stem()?.to_str()?))
                .collect();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.path_for(id);
        Box::pin(async move { Ok(path.is_file()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::block_on;
    use crate::template::{Field, FieldType};
    use kurbo::Point;
    use tempfile::tempdir;

    fn storage() -> (tempfile::TempDir, FileStorage) {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, storage) = storage();
        let mut template = Template::new("健康診断票");
        template.pages[0]
            .fields
            .push(Field::new(FieldType::Date, Point::new(40.0, 80.0)));

        block_on(storage.save("form-1", &template)).unwrap();
        assert_eq!(block_on(storage.load("form-1")).unwrap(), template);
    }

    #[test]
    fn test_load_missing() {
        let (_dir, storage) = storage();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_load_corrupt_file() {
        let (dir, storage) = storage();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let result = block_on(storage.load("broken"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_list_skips_foreign_files() {
        let (dir, storage) = storage();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        fs::write(dir.path().join("bad_zz.json"), "{}").unwrap();

        block_on(storage.save("form1", &Template::default())).unwrap();
        block_on(storage.save("a.b", &Template::default())).unwrap();

        let mut ids = block_on(storage.list()).unwrap();
        ids.sort();
        assert_eq!(ids, vec!["a.b".to_string(), "form1".to_string()]);
    }

    #[test]
    fn test_delete() {
        let (_dir, storage) = storage();
        block_on(storage.save("gone", &Template::default())).unwrap();
        assert!(block_on(storage.exists("gone")).unwrap());

        block_on(storage.delete("gone")).unwrap();
        assert!(!block_on(storage.exists("gone")).unwrap());
        block_on(storage.delete("gone")).unwrap();
    }

    #[test]
    fn test_similar_ids_stay_distinct() {
        let (_dir, storage) = storage();
        block_on(storage.save("a_b", &Template::new("underscore"))).unwrap();

        assert!(!block_on(storage.exists("a.b")).unwrap());
        assert!(matches!(
            block_on(storage.load("a.b")),
            Err(StorageError::NotFound(_))
        ));

        block_on(storage.save("a.b", &Template::new("dot"))).unwrap();
        assert_eq!(block_on(storage.load("a_b")).unwrap().name, "underscore");
        assert_eq!(block_on(storage.load("a.b")).unwrap().name, "dot");
    }

    #[test]
    fn test_ids_cannot_escape_directory() {
        let (dir, storage) = storage();
        block_on(storage.save("../doc:x", &Template::new("inside"))).unwrap();

        assert!(dir.path().join("_2e_2e_2fdoc_3ax.json").is_file());
        assert_eq!(block_on(storage.load("../doc:x")).unwrap().name, "inside");
    }

    #[test]
    fn test_id_encoding_round_trips() {
        for id in ["3f2a-uuid", "a_b", "a.b", "日本語", ""] {
            assert_eq!(decode_id(&encode_id(id)).as_deref(), Some(id));
        }
        assert_eq!(decode_id("_4"), None);
    }
}
