use crate::comments::strip_comments;
use crate::error::{ConfigError, Result};
use crate::utils::{char_len_at, get_offset};
use crate::value::{ConfigMap, ConfigValue};
use log::debug;
use miette::NamedSource;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Owns the parsed configuration tree.
///
/// The root is always an object. It is replaced as a whole by a successful
/// load and left untouched by a failed one.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStore {
    root: ConfigValue,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl DocumentStore {
    /// A store whose root is an empty object.
    #[must_use]
    pub fn new_empty() -> Self {
        DocumentStore {
            root: ConfigValue::Object(ConfigMap::new()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &ConfigValue {
        &self.root
    }

    /// Reads, strips and parses the file at `path`, then swaps it in as the new root.
    ///
    /// # Errors
    /// `MissingPathArgument` for an empty path, `NotFound` if nothing (or no
    /// regular file) lives at `path`, `IsDirectory` for directories,
    /// `ReadError` for other I/O failures and `ParseError` when the text is not
    /// UTF-8 or not a JSON object.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let source = read_source(path).inspect_err(|err| {
            debug!(
                "loading `{}` failed, keeping the previous document: {err}",
                path.display()
            );
        })?;

        self.load_source(&source, &path.to_string_lossy())
    }

    /// Same as [`DocumentStore::load`] for text already in memory. `name` only
    /// appears in diagnostics.
    ///
    /// # Errors
    /// Returns `ParseError` when the stripped text is not a JSON object.
    pub fn load_source(&mut self, source: &str, name: &str) -> Result<()> {
        match parse_document(source, name) {
            Ok(root) => {
                debug!(
                    "loaded configuration `{name}` with {} top-level keys",
                    root.as_object().map_or(0, ConfigMap::len)
                );
                self.root = root;
                Ok(())
            }
            Err(err) => {
                debug!("loading `{name}` failed, keeping the previous document: {err}");
                Err(err)
            }
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::MissingPathArgument);
    }

    let metadata = fs::metadata(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        },
    })?;
    if metadata.is_dir() {
        return Err(ConfigError::IsDirectory {
            path: path.to_path_buf(),
        });
    }
    if !metadata.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|err| {
        let offset = err.utf8_error().valid_up_to();
        let text = String::from_utf8_lossy(err.as_bytes()).into_owned();
        let len = char_len_at(&text, offset);
        ConfigError::ParseError {
            message: format!("invalid UTF-8 at byte {offset}"),
            src: NamedSource::new(path.to_string_lossy(), text),
            span: (offset, len).into(),
        }
    })
}

/// Strips comments from `source` and decodes it into a tree with an object root.
///
/// # Errors
/// Returns `ParseError` pointing into the stripped text when decoding fails or
/// the root value is not an object.
pub fn parse_document(source: &str, name: &str) -> Result<ConfigValue> {
    let cleaned = strip_comments(source);

    let json: serde_json::Value = serde_json::from_str(&cleaned).map_err(|err| {
        let offset = get_offset(&cleaned, err.line(), err.column());
        let len = char_len_at(&cleaned, offset);
        ConfigError::ParseError {
            message: err.to_string(),
            src: NamedSource::new(name, cleaned.clone()),
            span: (offset, len).into(),
        }
    })?;

    let root = ConfigValue::from(json);
    if root.as_object().is_none() {
        let offset = cleaned.len() - cleaned.trim_start().len();
        let len = cleaned.trim().len();
        return Err(ConfigError::ParseError {
            message: format!("root value must be an object, found {}", root.kind()),
            src: NamedSource::new(name, cleaned),
            span: (offset, len).into(),
        });
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_empty_has_object_root() {
        let store = DocumentStore::new_empty();
        assert_eq!(store.root(), &ConfigValue::Object(ConfigMap::new()));
    }

    #[test]
    fn test_load_source_with_comments() {
        let mut store = DocumentStore::new_empty();
        store
            .load_source("// header\n{\"a\": 1 /* one */}", "inline.json")
            .unwrap();

        let root = store.root().as_object().unwrap();
        assert_eq!(root["a"], ConfigValue::Number(1.0));
    }

    #[test]
    fn test_failed_load_keeps_previous_root() {
        let mut store = DocumentStore::new_empty();
        store.load_source(r#"{"keep": true}"#, "first.json").unwrap();
        let before = store.clone();

        let err = store.load_source("{ broken", "second.json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert_eq!(store, before);
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let err = parse_document("  [1, 2]", "array.json").unwrap_err();
        match err {
            ConfigError::ParseError { message, span, .. } => {
                assert!(message.contains("array"));
                assert_eq!(span.offset(), 2);
            }
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"{\"a\": \"\xff\"}").unwrap();

        let mut store = DocumentStore::new_empty();
        match store.load(file.path()) {
            Err(ConfigError::ParseError { span, .. }) => assert_eq!(span.offset(), 7),
            other => panic!("Expected ParseError, got {other:?}"),
        }
        assert_eq!(store, DocumentStore::new_empty());
    }

    #[test]
    fn test_failed_file_load_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent-config.json");

        capture::install();
        let mut store = DocumentStore::new_empty();
        assert!(matches!(
            store.load(&missing),
            Err(ConfigError::NotFound { .. })
        ));
        assert!(capture::messages()
            .iter()
            .any(|message| message.contains("absent-config.json")
                && message.contains("keeping the previous document")));
    }

    #[test]
    fn test_empty_path_is_missing_argument() {
        let mut store = DocumentStore::new_empty();
        assert!(matches!(
            store.load(""),
            Err(ConfigError::MissingPathArgument)
        ));
    }

    mod capture {
        use log::{LevelFilter, Log, Metadata, Record};
        use std::sync::{Mutex, Once};

        struct CaptureLogger;

        static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());
        static INIT: Once = Once::new();
        static LOGGER: CaptureLogger = CaptureLogger;

        impl Log for CaptureLogger {
            fn enabled(&self, _metadata: &Metadata) -> bool {
                true
            }

            fn log(&self, record: &Record) {
                if let Ok(mut messages) = MESSAGES.lock() {
                    messages.push(record.args().to_string());
                }
            }

            fn flush(&self) {}
        }

        pub fn install() {
            INIT.call_once(|| {
                if log::set_logger(&LOGGER).is_ok() {
                    log::set_max_level(LevelFilter::Trace);
                }
            });
        }

        pub fn messages() -> Vec<String> {
            MESSAGES.lock().map(|m| m.clone()).unwrap_or_default()
        }
    }
}
