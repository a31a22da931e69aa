use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

use crate::error::{Result, SwatchError};

/// A base16 scheme as written in its file: every top-level key with the
/// literal text of its value, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scheme {
    entries: Vec<(String, String)>,
}

impl Scheme {
    /// Read and parse a scheme file. The file handle is dropped before the
    /// scheme is returned.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| SwatchError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|source| {
            SwatchError::SchemeSyntax {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Parse scheme text. Scalars are never type-inferred: `0601` stays
    /// `"0601"` and `no` stays `"no"`.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Set `key` to `value`. A key seen before keeps its original position
    /// and takes the new value.
    pub fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Scheme {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut scheme = Scheme::default();
        for (k, v) in iter {
            scheme.insert(k.into(), v.into());
        }
        scheme
    }
}

/// A scalar taken verbatim from the document, bypassing YAML's implicit
/// bool/int/float resolution.
struct RawScalar(String);

impl<'de> Deserialize<'de> for RawScalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawScalarVisitor;

        impl Visitor<'_> for RawScalarVisitor {
            type Value = RawScalar;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a scalar value")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RawScalar, E> {
                Ok(RawScalar(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<RawScalar, E> {
                Ok(RawScalar(v))
            }
        }

        deserializer.deserialize_str(RawScalarVisitor)
    }
}

impl<'de> Deserialize<'de> for Scheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SchemeVisitor;

        impl<'de> Visitor<'de> for SchemeVisitor {
            type Value = Scheme;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of scheme keys to color values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Scheme, A::Error> {
                let mut scheme = Scheme {
                    entries: Vec::with_capacity(map.size_hint().unwrap_or(0)),
                };
                while let Some((RawScalar(key), RawScalar(value))) = map.next_entry()? {
                    scheme.insert(key, value);
                }
                Ok(scheme)
            }
        }

        deserializer.deserialize_map(SchemeVisitor)
    }
}
