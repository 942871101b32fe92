//! Path-addressed, typed access to JSON configuration files with `//` and `/* */` comments.
//!
//! ```
//! use jsonc_conf::Config;
//!
//! let config = Config::from_source(
//!     r#"{
//!         // listener settings
//!         "server": { "listen": "0.0.0.0", "port": 8080 }
//!     }"#,
//!     "inline.json",
//! )
//! .unwrap();
//!
//! let port: u16 = config.get_as("/server/port").unwrap();
//! assert_eq!(port, 8080);
//! ```

pub mod api;
pub mod bind;
pub mod comments;
pub mod document;
pub mod error;
pub mod path;
pub mod utils;
pub mod value;

pub use api::Config;
pub use bind::{decode_with_serde, Bind, CustomDecode, DestinationKind, Record};
pub use error::{ConfigError, Result};
pub use value::{ConfigMap, ConfigValue, NodeKind};
