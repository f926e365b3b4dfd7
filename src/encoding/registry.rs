use crate::encoding::ebcdic;
use crate::error::{CodecError, EncodingError, Result};
use crate::utils::metrics::global_metrics;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Name of the built-in strict 7-bit ASCII encoding
pub const ASCII: &str = "ascii";

/// Name of the built-in IBM-1047 EBCDIC encoding
pub const EBCDIC: &str = "ebcdic";

type EncodeFn = dyn Fn(&str) -> std::result::Result<Vec<u8>, EncodingError> + Send + Sync + 'static;
type DecodeFn = dyn Fn(&[u8]) -> std::result::Result<String, EncodingError> + Send + Sync + 'static;

#[derive(Clone)]
struct Entry {
    encode: Arc<EncodeFn>,
    decode: Arc<DecodeFn>,
}

enum Slot {
    Functions(Entry),
    /// Another registered name, resolved on every lookup
    Alias(String),
}

/// Name-keyed table of encode/decode function pairs.
///
/// Lookups take the read lock only long enough to clone the entry, so a registered
/// function may itself touch the registry. Names are resolved on every call, which
/// means re-registering a name affects all subsequent encode/decode calls, including
/// those made through an alias of it.
pub struct EncodingRegistry {
    entries: RwLock<HashMap<String, Slot>>,
}

impl Default for EncodingRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for EncodingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodingRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl EncodingRegistry {
    /// An empty registry, without even the built-ins
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// A registry seeded with `ascii` and `ebcdic`
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register(ASCII, ascii_encode, ascii_decode);
        registry.register(EBCDIC, ebcdic::encode, ebcdic::decode);
        registry
    }

    /// Register `name`, silently replacing any encoding already registered under it.
    pub fn register<E, D>(&self, name: &str, encode: E, decode: D)
    where
        E: Fn(&str) -> std::result::Result<Vec<u8>, EncodingError> + Send + Sync + 'static,
        D: Fn(&[u8]) -> std::result::Result<String, EncodingError> + Send + Sync + 'static,
    {
        let entry = Entry {
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        };

        let replaced = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Slot::Functions(entry))
            .is_some();

        global_metrics().encoding_registered();
        debug!(encoding = name, replaced, "Encoding registered");
    }

    /// Make `alias` another name for `target`.
    ///
    /// The alias follows `target` by name, so re-registering `target` later is seen
    /// through the alias too. Registering functions under `alias` itself replaces the
    /// alias.
    ///
    /// # Errors
    /// `UnknownEncoding` if `target` does not resolve, or if it resolves through
    /// `alias` (which would form a cycle).
    pub fn alias(&self, alias: &str, target: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let path = resolve_path(&entries, target)
            .ok_or_else(|| CodecError::UnknownEncoding(target.to_string()))?;
        if path.contains(&alias) {
            return Err(CodecError::UnknownEncoding(target.to_string()));
        }
        entries.insert(alias.to_string(), Slot::Alias(target.to_string()));
        drop(entries);

        debug!(alias, target, "Encoding alias registered");
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Encode `text` with the encoding registered as `name`.
    ///
    /// # Errors
    /// `UnknownEncoding` if nothing is registered under `name`, `EncodingFailure` if
    /// the encode function rejects the text.
    pub fn encode(&self, name: &str, text: &str) -> Result<Vec<u8>> {
        let entry = self.lookup(name)?;
        (entry.encode)(text).map_err(|source| CodecError::EncodingFailure {
            encoding: name.to_string(),
            source,
        })
    }

    /// Decode `bytes` with the encoding registered as `name`.
    ///
    /// # Errors
    /// `UnknownEncoding` if nothing is registered under `name`, `EncodingFailure` if
    /// the decode function rejects the bytes.
    pub fn decode(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let entry = self.lookup(name)?;
        (entry.decode)(bytes).map_err(|source| CodecError::EncodingFailure {
            encoding: name.to_string(),
            source,
        })
    }

    fn lookup(&self, name: &str) -> Result<Entry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        resolve_path(&entries, name)
            .and_then(|path| path.last().and_then(|last| entries.get(*last)))
            .and_then(|slot| match slot {
                Slot::Functions(entry) => Some(entry.clone()),
                Slot::Alias(_) => None,
            })
            .ok_or_else(|| CodecError::UnknownEncoding(name.to_string()))
    }
}

/// Names visited from `name` to the slot holding functions, or `None` if the chain
/// ends at an unregistered name or loops.
fn resolve_path<'a>(entries: &'a HashMap<String, Slot>, name: &'a str) -> Option<Vec<&'a str>> {
    let mut path = vec![name];
    let mut current = name;
    loop {
        match entries.get(current)? {
            Slot::Functions(_) => return Some(path),
            Slot::Alias(target) => {
                if path.contains(&target.as_str()) || path.len() > entries.len() {
                    return None;
                }
                current = target.as_str();
                path.push(current);
            }
        }
    }
}

fn ascii_encode(text: &str) -> std::result::Result<Vec<u8>, EncodingError> {
    match text.chars().find(|c| !c.is_ascii()) {
        Some(c) => Err(EncodingError::UnmappableChar(c)),
        None => Ok(text.as_bytes().to_vec()),
    }
}

fn ascii_decode(bytes: &[u8]) -> std::result::Result<String, EncodingError> {
    match bytes.iter().find(|b| !b.is_ascii()) {
        Some(&b) => Err(EncodingError::UnmappableByte(b)),
        None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

static GLOBAL_REGISTRY: Lazy<EncodingRegistry> = Lazy::new(EncodingRegistry::with_builtins);

/// Get the process-wide registry used by the plain field operations
pub fn global_registry() -> &'static EncodingRegistry {
    &GLOBAL_REGISTRY
}

/// Register an encoding in the process-wide registry, replacing any previous one of that name
pub fn register_encoding<E, D>(name: &str, encode: E, decode: D)
where
    E: Fn(&str) -> std::result::Result<Vec<u8>, EncodingError> + Send + Sync + 'static,
    D: Fn(&[u8]) -> std::result::Result<String, EncodingError> + Send + Sync + 'static,
{
    global_registry().register(name, encode, decode);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_present() {
        let registry = EncodingRegistry::with_builtins();
        assert_eq!(registry.names(), vec![ASCII.to_string(), EBCDIC.to_string()]);
        assert!(!EncodingRegistry::new().contains(ASCII));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_ascii_identity() {
        let registry = EncodingRegistry::with_builtins();
        assert_eq!(registry.encode(ASCII, "0100").unwrap(), b"0100".to_vec());
        assert_eq!(registry.decode(ASCII, b"0100").unwrap(), "0100");
    }

    #[test]
    fn test_ascii_rejects_high_bytes() {
        let registry = EncodingRegistry::with_builtins();
        match registry.decode(ASCII, &[0x30, 0xC1]) {
            Err(CodecError::EncodingFailure { encoding, source }) => {
                assert_eq!(encoding, ASCII);
                assert_eq!(source, EncodingError::UnmappableByte(0xC1));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(registry.encode(ASCII, "é").is_err());
    }

    #[test]
    fn test_unknown_encoding() {
        let registry = EncodingRegistry::with_builtins();
        assert!(matches!(
            registry.encode("missing", "x"),
            Err(CodecError::UnknownEncoding(name)) if name == "missing"
        ));
        assert!(matches!(
            registry.decode("", b"x"),
            Err(CodecError::UnknownEncoding(name)) if name.is_empty()
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_decoder_error_is_wrapped() {
        let registry = EncodingRegistry::new();
        registry.register(
            "force_error",
            |_| Err(EncodingError::custom("forced_error")),
            |_| Err(EncodingError::custom("forced_error")),
        );
        let err = registry.decode("force_error", &[1, 1, 1, 1]).unwrap_err();
        assert_eq!(err.to_string(), "encoder 'force_error' returned error: forced_error");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_register_overwrites() {
        let registry = EncodingRegistry::with_builtins();
        registry.register(ASCII, |t| Ok(t.bytes().rev().collect()), |b| {
            Ok(b.iter().rev().map(|&c| char::from(c)).collect())
        });
        assert_eq!(registry.encode(ASCII, "12").unwrap(), b"21".to_vec());
        assert_eq!(registry.decode(ASCII, b"21").unwrap(), "12");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_alias_follows_reregistered_target() {
        let registry = EncodingRegistry::with_builtins();
        registry.register("host", ebcdic::encode, ebcdic::decode);
        registry.alias("cp1047", "host").unwrap();
        registry.alias("mainframe", "cp1047").unwrap();

        registry.register("host", |t| Ok(t.as_bytes().to_vec()), |b| {
            Ok(b.iter().map(|&c| char::from(c)).collect())
        });
        assert_eq!(registry.encode("cp1047", "14").unwrap(), b"14".to_vec());
        assert_eq!(registry.encode("mainframe", "14").unwrap(), b"14".to_vec());
        assert_eq!(registry.decode("cp1047", b"14").unwrap(), "14");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_alias_cycle_rejected() {
        let registry = EncodingRegistry::with_builtins();
        registry.alias("a", ASCII).unwrap();
        registry.alias("b", "a").unwrap();
        assert!(matches!(
            registry.alias("a", "b"),
            Err(CodecError::UnknownEncoding(name)) if name == "b"
        ));
        assert!(matches!(
            registry.alias("self", "self"),
            Err(CodecError::UnknownEncoding(_))
        ));
        assert_eq!(registry.encode("b", "1").unwrap(), b"1".to_vec());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_register_replaces_alias() {
        let registry = EncodingRegistry::with_builtins();
        registry.alias("cp1047", EBCDIC).unwrap();
        registry.register("cp1047", |t| Ok(t.as_bytes().to_vec()), |b| {
            Ok(b.iter().map(|&c| char::from(c)).collect())
        });
        assert_eq!(registry.encode("cp1047", "1").unwrap(), b"1".to_vec());
        assert_eq!(registry.encode(EBCDIC, "1").unwrap(), vec![0xF1]);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_alias_shares_functions() {
        let registry = EncodingRegistry::with_builtins();
        registry.alias("cp1047", EBCDIC).unwrap();
        assert_eq!(
            registry.encode("cp1047", "14").unwrap(),
            registry.encode(EBCDIC, "14").unwrap()
        );
        assert!(matches!(
            registry.alias("x", "nope"),
            Err(CodecError::UnknownEncoding(_))
        ));
        assert!(!registry.contains("x"));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_encoder_may_reenter_registry() {
        let registry = Arc::new(EncodingRegistry::with_builtins());
        let inner = Arc::clone(&registry);
        registry.register(
            "upper",
            move |t| {
                inner
                    .encode(ASCII, &t.to_ascii_uppercase())
                    .map_err(|e| EncodingError::custom(e.to_string()))
            },
            |b| Ok(b.iter().map(|&c| char::from(c)).collect()),
        );
        assert_eq!(registry.encode("upper", "ab").unwrap(), b"AB".to_vec());
    }
}
