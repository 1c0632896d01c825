use anyhow::{Context, Result, bail};
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Static data-type → destination URL table. Built once at start and shared
/// read-only between invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    routes: HashMap<String, String>,
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new([
            ("TypeA", "https://destinationA.com/api"),
            ("TypeB", "https://destinationB.com/api"),
            ("TypeC", "https://destinationC.com/api"),
        ])
    }
}

impl RoutingTable {
    pub fn new<K, V>(routes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            routes: routes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the destination mapped to `data_type`, matched exactly.
    pub fn resolve(&self, data_type: &str) -> Option<&str> {
        self.routes.get(data_type).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Loads a YAML mapping of `<data type>: <url>`.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read routing table from {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse routing table {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let UniqueRoutes(routes) =
            serde_yaml::from_str(content).context("Failed to parse YAML routing table")?;
        let table = Self { routes };
        table.validate()?;
        Ok(table)
    }

    /// Parses `TYPE=URL[,TYPE=URL...]`. Duplicate types are rejected.
    pub fn parse_inline(spec: &str) -> Result<Self> {
        let mut routes = HashMap::new();
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((data_type, url)) = pair.split_once('=') else {
                bail!("route `{pair}` is not of the form TYPE=URL");
            };
            let (data_type, url) = (data_type.trim(), url.trim());
            if routes
                .insert(data_type.to_string(), url.to_string())
                .is_some()
            {
                bail!("data type `{data_type}` is mapped more than once");
            }
        }
        let table = Self { routes };
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            bail!("routing table has no entries");
        }
        for (data_type, url) in &self.routes {
            if data_type.is_empty() {
                bail!("routing table contains an empty data type");
            }
            reqwest::Url::parse(url)
                .with_context(|| format!("destination for `{data_type}` is not a valid URL"))?;
        }
        Ok(())
    }
}

// A YAML mapping that fails on repeated keys instead of keeping the last one.
struct UniqueRoutes(HashMap<String, String>);

impl<'de> Deserialize<'de> for UniqueRoutes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoutesVisitor;

        impl<'de> Visitor<'de> for RoutesVisitor {
            type Value = UniqueRoutes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of data type to destination URL")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<UniqueRoutes, A::Error> {
                let mut routes = HashMap::new();
                while let Some((data_type, url)) = map.next_entry::<String, String>()? {
                    if routes.contains_key(&data_type) {
                        return Err(de::Error::custom(format!(
                            "data type `{data_type}` is mapped more than once"
                        )));
                    }
                    routes.insert(data_type, url);
                }
                Ok(UniqueRoutes(routes))
            }
        }

        deserializer.deserialize_map(RoutesVisitor)
    }
}
