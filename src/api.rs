use crate::bind::{bind, Bind};
use crate::document::DocumentStore;
use crate::error::Result;
use crate::path::resolve;
use crate::value::ConfigValue;
use std::path::Path;

/// A loaded configuration document with path-addressed, typed access.
///
/// `Config` does no locking. `load` replaces the whole tree and needs
/// `&mut self`, and reads take `&self`. Sharing one instance between
/// threads therefore needs the caller's own synchronisation around reloads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    store: DocumentStore,
}

impl Config {
    /// An empty configuration. Every lookup but `/` fails with `NodeNotFound` until a document is loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the JSON-with-comments file at `path` into a new configuration.
    ///
    /// # Errors
    /// See [`Config::load`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::new();
        config.load(path)?;
        Ok(config)
    }

    /// Parses in-memory text. `name` is used in diagnostics only.
    ///
    /// # Errors
    /// Returns `ParseError` if the text is not a JSON object after comment stripping.
    pub fn from_source(source: &str, name: &str) -> Result<Self> {
        let mut config = Self::new();
        config.store.load_source(source, name)?;
        Ok(config)
    }

    /// Replaces the current document with the file at `path`. On failure the
    /// current document is kept.
    ///
    /// # Errors
    /// `MissingPathArgument`, `NotFound`, `IsDirectory`, `ReadError` or `ParseError`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.store.load(path)
    }

    /// Alias of [`Config::load`].
    ///
    /// # Errors
    /// See [`Config::load`].
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load(path)
    }

    #[must_use]
    pub fn root(&self) -> &ConfigValue {
        self.store.root()
    }

    /// The raw node at `path`, e.g. `"/server/port"`.
    ///
    /// # Errors
    /// `NotAnObject` or `NodeNotFound` from path resolution.
    pub fn node(&self, path: &str) -> Result<&ConfigValue> {
        resolve(self.store.root(), path)
    }

    /// Copies the node at `path` into `dest`.
    ///
    /// ```
    /// let config = jsonc_conf::Config::from_source(r#"{"a": 1}"#, "inline.json").unwrap();
    /// let mut a = 0i64;
    /// config.get("/a", &mut a).unwrap();
    /// assert_eq!(a, 1);
    /// ```
    ///
    /// # Errors
    /// Resolution errors, then any binding error for the destination's type.
    pub fn get<D: Bind + ?Sized>(&self, path: &str, dest: &mut D) -> Result<()> {
        self.get_into(path, Some(dest))
    }

    /// Like [`Config::get`] for an optional destination. The path is resolved
    /// first. `None` then fails with `InvalidDestination` and writes nothing.
    ///
    /// # Errors
    /// See [`Config::get`].
    pub fn get_into<D: Bind + ?Sized>(&self, path: &str, dest: Option<&mut D>) -> Result<()> {
        let node = self.node(path)?;
        bind(node, dest)
    }

    /// Binds the node at `path` into a fresh `T`.
    ///
    /// # Errors
    /// See [`Config::get`].
    pub fn get_as<T: Bind + Default>(&self, path: &str) -> Result<T> {
        let mut value = T::default();
        self.get(path, &mut value)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::value::ConfigMap;

    #[test]
    fn test_round_trip_integer() {
        let config = Config::from_source(r#"{"a": 1}"#, "test.json").unwrap();
        let mut x = 0i32;
        config.get("/a", &mut x).unwrap();
        assert_eq!(x, 1);
    }

    #[test]
    fn test_whole_document_into_map() {
        let source = r#"
        {
            // service name
            "name": "My App",
            "features": ["a", "b"],
            "config": { "host": "localhost", "port": 8080 }
        }
        "#;
        let config = Config::from_source(source, "test.json").unwrap();

        let root: ConfigMap = config.get_as("/").unwrap();
        assert_eq!(&ConfigValue::Object(root), config.root());
    }

    #[test]
    fn test_empty_config_reports_node_not_found() {
        let config = Config::new();
        assert!(matches!(
            config.get_as::<String>("/name"),
            Err(ConfigError::NodeNotFound)
        ));
        assert!(config.get_as::<ConfigMap>("/").unwrap().is_empty());
    }

    #[test]
    fn test_none_destination_after_resolution() {
        let config = Config::from_source(r#"{"a": 1}"#, "test.json").unwrap();
        assert!(matches!(
            config.get_into::<i32>("/a", None),
            Err(ConfigError::InvalidDestination)
        ));
        assert!(matches!(
            config.get_into::<i32>("/b", None),
            Err(ConfigError::NodeNotFound)
        ));
    }
}
