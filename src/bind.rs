//! Binding of configuration nodes into typed Rust destinations.
//!
//! Every destination type implements [`Bind`]. Scalars, `String`, `bool`,
//! [`ConfigMap`] and `Vec<T>` are covered here. Structured types implement
//! [`Record`] and get [`Bind`] through the blanket impl.
//!
//! Binding is not transactional. When a nested field or element fails, the
//! fields bound before it keep their new values.
//!
//! # Numeric conversion
//!
//! JSON numbers carry no width. Integer destinations receive the number
//! truncated toward zero to `i64` (saturating, NaN becomes 0), then wrapped to
//! the target width, so `300` lands in a `u8` as `44` and `-1` as `255`.
//! `u64` and `usize` take non-negative numbers directly, saturating at their
//! maximum. `f32` rounds to nearest.

use crate::error::{ConfigError, DecodeError, Result};
use crate::value::{ConfigMap, ConfigValue};
use log::trace;
use serde::de::DeserializeOwned;
use std::fmt;

/// The declared shape of a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Map,
    Record {
        name: &'static str,
        fields: &'static [&'static str],
    },
    Sequence(Box<DestinationKind>),
}

impl DestinationKind {
    #[must_use]
    pub fn is_record(&self) -> bool {
        matches!(self, DestinationKind::Record { .. })
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestinationKind::Bool => write!(f, "bool"),
            DestinationKind::Int8 => write!(f, "i8"),
            DestinationKind::Int16 => write!(f, "i16"),
            DestinationKind::Int32 => write!(f, "i32"),
            DestinationKind::Int64 => write!(f, "i64"),
            DestinationKind::UInt8 => write!(f, "u8"),
            DestinationKind::UInt16 => write!(f, "u16"),
            DestinationKind::UInt32 => write!(f, "u32"),
            DestinationKind::UInt64 => write!(f, "u64"),
            DestinationKind::Float32 => write!(f, "f32"),
            DestinationKind::Float64 => write!(f, "f64"),
            DestinationKind::String => write!(f, "string"),
            DestinationKind::Map => write!(f, "map"),
            DestinationKind::Record { name, .. } => write!(f, "record `{name}`"),
            DestinationKind::Sequence(element) => write!(f, "sequence of {element}"),
        }
    }
}

/// A location a configuration node can be copied into.
pub trait Bind {
    fn kind() -> DestinationKind
    where
        Self: Sized;

    /// Overwrites `self` with the contents of `node`.
    ///
    /// # Errors
    /// Returns a `ConfigError` when the node's kind does not fit this destination.
    fn bind(&mut self, node: &ConfigValue) -> Result<()>;
}

/// A structured destination with named fields.
///
/// A JSON key reaches a field when the two names agree after uppercasing their
/// first character, so `"port"` and `"Port"` both fill a field declared as
/// `"Port"`. Keys with no matching field are ignored. Struct members that are
/// not listed in [`Record::FIELDS`] are never written.
///
/// ```
/// use jsonc_conf::{Bind, Record};
///
/// #[derive(Default)]
/// struct Listener {
///     listen: String,
///     port: u16,
/// }
///
/// impl Record for Listener {
///     const FIELDS: &'static [&'static str] = &["Listen", "Port"];
///
///     fn field_mut(&mut self, name: &str) -> Option<&mut dyn Bind> {
///         match name {
///             "Listen" => Some(&mut self.listen),
///             "Port" => Some(&mut self.port),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record: Default {
    const FIELDS: &'static [&'static str];

    /// The field declared as `name` in [`Record::FIELDS`].
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Bind>;

    /// Records that parse themselves return their decoder here. It then
    /// replaces field-by-field binding.
    fn custom_decoder(&mut self) -> Option<&mut dyn CustomDecode> {
        None
    }
}

/// Custom decoding hook for records. It receives the object node re-encoded as JSON text.
pub trait CustomDecode {
    /// # Errors
    /// Any error is reported to the caller as `CustomDeserializeFailed`.
    fn decode_json(&mut self, json: &str) -> std::result::Result<(), DecodeError>;
}

/// Implements [`CustomDecode::decode_json`] for types that derive `Deserialize`.
///
/// # Errors
/// Returns the `serde_json` error when `json` does not decode into `T`.
pub fn decode_with_serde<T: DeserializeOwned>(
    target: &mut T,
    json: &str,
) -> std::result::Result<(), DecodeError> {
    *target = serde_json::from_str(json)?;
    Ok(())
}

/// Binds `node` into `dest`. A missing destination fails with `InvalidDestination`.
///
/// # Errors
/// Propagates the first failure of any nested bind.
pub fn bind<D: Bind + ?Sized>(node: &ConfigValue, dest: Option<&mut D>) -> Result<()> {
    let dest = dest.ok_or(ConfigError::InvalidDestination)?;
    dest.bind(node)
}

fn mismatch<D: Bind>(node: &ConfigValue) -> ConfigError {
    match node {
        ConfigValue::Null => ConfigError::UnsupportedNodeType {
            found: node.kind().to_string(),
        },
        other => ConfigError::type_mismatch(D::kind(), other.kind()),
    }
}

fn field_matches(key: &str, field: &str) -> bool {
    let mut key_chars = key.chars();
    let mut field_chars = field.chars();
    match (key_chars.next(), field_chars.next()) {
        (Some(k), Some(f)) => {
            k.to_uppercase().eq(f.to_uppercase()) && key_chars.as_str() == field_chars.as_str()
        }
        (None, None) => true,
        _ => false,
    }
}

fn bind_record<R: Record>(record: &mut R, map: &ConfigMap) -> Result<()> {
    if let Some(decoder) = record.custom_decoder() {
        trace!(
            "dispatching object to custom decoder of `{}`",
            std::any::type_name::<R>()
        );
        let json = serde_json::to_string(map)
            .map_err(|err| ConfigError::CustomDeserializeFailed { source: err.into() })?;
        return decoder
            .decode_json(&json)
            .map_err(|source| ConfigError::CustomDeserializeFailed { source });
    }

    for (key, value) in map {
        let Some(field) = R::FIELDS.iter().find(|field| field_matches(key, field)) else {
            continue;
        };
        if let Some(slot) = record.field_mut(field) {
            slot.bind(value)?;
        }
    }
    Ok(())
}

impl<R: Record> Bind for R {
    fn kind() -> DestinationKind {
        DestinationKind::Record {
            name: std::any::type_name::<R>(),
            fields: R::FIELDS,
        }
    }

    fn bind(&mut self, node: &ConfigValue) -> Result<()> {
        match node {
            ConfigValue::Object(map) => bind_record(self, map),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl<T: Bind + Default> Bind for Vec<T> {
    fn kind() -> DestinationKind {
        DestinationKind::Sequence(Box::new(T::kind()))
    }

    fn bind(&mut self, node: &ConfigValue) -> Result<()> {
        let ConfigValue::Array(items) = node else {
            return Err(mismatch::<Self>(node));
        };

        let records = T::kind().is_record();
        self.clear();
        self.reserve(items.len());
        for (index, item) in items.iter().enumerate() {
            if records && !matches!(item, ConfigValue::Object(_)) {
                return Err(ConfigError::ArrayElementNotObject {
                    index,
                    found: item.kind().to_string(),
                });
            }
            let mut element = T::default();
            element.bind(item)?;
            self.push(element);
        }
        Ok(())
    }
}

impl Bind for String {
    fn kind() -> DestinationKind {
        DestinationKind::String
    }

    fn bind(&mut self, node: &ConfigValue) -> Result<()> {
        match node {
            ConfigValue::String(s) => {
                self.clone_from(s);
                Ok(())
            }
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Bind for bool {
    fn kind() -> DestinationKind {
        DestinationKind::Bool
    }

    fn bind(&mut self, node: &ConfigValue) -> Result<()> {
        match node {
            ConfigValue::Bool(b) => {
                *self = *b;
                Ok(())
            }
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Bind for ConfigMap {
    fn kind() -> DestinationKind {
        DestinationKind::Map
    }

    fn bind(&mut self, node: &ConfigValue) -> Result<()> {
        match node {
            ConfigValue::Object(map) => {
                self.clone_from(map);
                Ok(())
            }
            other => Err(mismatch::<Self>(other)),
        }
    }
}

trait FromNumber {
    fn from_number(n: f64) -> Self;
}

// `as` from f64 truncates toward zero and saturates; integer `as` then wraps.
macro_rules! from_number_wrapping {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromNumber for $ty {
                fn from_number(n: f64) -> Self {
                    (n as i64) as $ty
                }
            }
        )*
    };
}

from_number_wrapping!(i8, i16, i32, i64, isize, u8, u16, u32);

impl FromNumber for u64 {
    fn from_number(n: f64) -> Self {
        if n >= 0.0 {
            n as u64
        } else {
            (n as i64) as u64
        }
    }
}

impl FromNumber for usize {
    fn from_number(n: f64) -> Self {
        u64::from_number(n) as usize
    }
}

impl FromNumber for f32 {
    fn from_number(n: f64) -> Self {
        n as f32
    }
}

impl FromNumber for f64 {
    fn from_number(n: f64) -> Self {
        n
    }
}

macro_rules! impl_bind_number {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Bind for $ty {
                fn kind() -> DestinationKind {
                    DestinationKind::$kind
                }

                fn bind(&mut self, node: &ConfigValue) -> Result<()> {
                    match node {
                        ConfigValue::Number(n) => {
                            *self = <$ty as FromNumber>::from_number(*n);
                            Ok(())
                        }
                        other => Err(mismatch::<Self>(other)),
                    }
                }
            }
        )*
    };
}

impl_bind_number!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    usize => UInt64,
    f32 => Float32,
    f64 => Float64,
);
