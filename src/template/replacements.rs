use std::collections::BTreeMap;

use itertools::Itertools;
use strum::Display;

use crate::template::{
    TemplateError,
    ProcResult,
    err_str,
};

/// Replacement layers, lowest precedence first.
/// A key in a later layer overrides the same key from an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Layer {
    /// Project-wide values: project name, angular fraction, fluid solver.
    Base,
    /// Bare `*_MESH_FILE` tokens for the coupling document.
    MeshPath,
    /// `{{ROLE}}` tokens for resolved interface names.
    Interface,
    /// Flattened user parameters.
    UserConfig,
}

/// Placeholder token to substitution value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplacementMap {
    entries: BTreeMap<String, String>,
}
impl ReplacementMap {
    pub fn new() -> Self {
        ReplacementMap::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|value| value.as_str())
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
impl FromIterator<(String, String)> for ReplacementMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        ReplacementMap{entries: iter.into_iter().collect()}
    }
}

/// Layered construction of a `ReplacementMap`.
/// Each layer is checked when added; the merge is checked when built.
#[derive(Debug, Clone, Default)]
pub struct LayeredReplacements {
    layers: BTreeMap<Layer, Vec<(String, String)>>,
}
impl LayeredReplacements {
    pub fn new() -> Self {
        LayeredReplacements::default()
    }

    /// Add one layer. Keys must be reserved tokens and unique within the layer.
    pub fn add_layer(&mut self, layer: Layer, entries: Vec<(String, String)>) -> ProcResult<()> {
        if self.layers.contains_key(&layer) {
            return err_str(&format!("Replacement layer added twice: {}", layer));
        }
        if let Some(key) = entries.iter().map(|(key, _)| key).find(|key| !is_reserved_token(key)) {
            return Err(TemplateError::InvalidKey{layer, key: key.clone()});
        }
        if let Some(key) = entries.iter().map(|(key, _)| key).duplicates().next() {
            return Err(TemplateError::DuplicateKey{layer, key: key.clone()});
        }
        self.layers.insert(layer, entries);
        Ok(())
    }

    /// A single layer as its own map (empty if it was never added).
    pub fn layer(&self, layer: Layer) -> ReplacementMap {
        self.layers.get(&layer)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Merge all layers in precedence order.
    /// Fails if any merged value contains a merged key, which would make substitution order-dependent.
    pub fn build(&self) -> ProcResult<ReplacementMap> {
        let mut merged = BTreeMap::<String, (Layer, String)>::new();
        for (layer, entries) in self.layers.iter() {
            for (key, value) in entries.iter() {
                if let Some((previous, _)) = merged.insert(key.clone(), (*layer, value.clone())) {
                    log::debug!("{} layer overrides {} for {}", layer, previous, key);
                }
            }
        }

        for (key, (_, value)) in merged.iter() {
            if let Some(contained) = merged.keys().find(|other| value.contains(other.as_str())) {
                return Err(TemplateError::ValueContainsKey{key: key.clone(), contained: contained.clone()});
            }
        }

        Ok(merged.into_iter().map(|(key, (_, value))| (key, value)).collect())
    }
}

/// True for `{{name}}` tokens (letters, digits, `_`, `.`, `-`)
/// and bare upper-snake tokens with at least one underscore (`SOLID_MESH_FILE`).
pub fn is_reserved_token(key: &str) -> bool {
    if let Some(inner) = key.strip_prefix("{{").and_then(|rest| rest.strip_suffix("}}")) {
        return !inner.is_empty()
            && inner.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-');
    }

    key.starts_with(|c: char| c.is_ascii_uppercase())
        && key.contains('_')
        && key.split('_').all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()))
}

/// `{{path}}` token for a flattened configuration path.
pub fn config_token(path: &str) -> String {
    format!("{{{{{}}}}}", path)
}

/// Flatten a nested document into `(dotted.path, value)` pairs.
/// Sequences use the element index as the path segment, null becomes an empty string.
pub fn flatten_parameters(value: &serde_yaml::Value) -> Vec<(String, String)> {
    let mut flat = Vec::new();
    flatten_into(&mut flat, "", value);
    flat
}

fn flatten_into(flat: &mut Vec<(String, String)>, prefix: &str, value: &serde_yaml::Value) {
    let join = |segment: &str| {
        if prefix.is_empty() { segment.to_string() } else { format!("{}.{}", prefix, segment) }
    };
    match value {
        serde_yaml::Value::Mapping(mapping) => {
            for (key, child) in mapping.iter() {
                flatten_into(flat, &join(&scalar_to_string(key)), child);
            }
        },
        serde_yaml::Value::Sequence(sequence) => {
            for (i, child) in sequence.iter().enumerate() {
                flatten_into(flat, &join(&i.to_string()), child);
            }
        },
        serde_yaml::Value::Tagged(tagged) => flatten_into(flat, prefix, &tagged.value),
        scalar => {
            if !prefix.is_empty() {
                flat.push((prefix.to_string(), scalar_to_string(scalar)));
            }
        },
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other).unwrap_or_default().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn token_alphabet() {
        assert!(is_reserved_token("{{INTERIOR_FSI}}"));
        assert!(is_reserved_token("{{solver.end-time.0}}"));
        assert!(is_reserved_token("SOLID_MESH_FILE"));
        assert!(is_reserved_token("A1_B2"));
        assert!(!is_reserved_token("{{}}"));
        assert!(!is_reserved_token("{{a b}}"));
        assert!(!is_reserved_token("MESH"));
        assert!(!is_reserved_token("Solid_Mesh"));
        assert!(!is_reserved_token("_SOLID"));
        assert!(!is_reserved_token("SOLID__MESH"));
        assert!(!is_reserved_token("1_SOLID"));
    }

    #[test]
    fn later_layers_override_earlier_ones() {
        let mut layers = LayeredReplacements::new();
        layers.add_layer(Layer::UserConfig, entries(&[("{{PROJECT_NAME}}", "from-user")])).unwrap();
        layers.add_layer(Layer::Base, entries(&[("{{PROJECT_NAME}}", "base"), ("{{FRACTION_OF_PI}}", "1")])).unwrap();

        let map = layers.build().unwrap();
        assert_eq!(map.get("{{PROJECT_NAME}}"), Some("from-user"));
        assert_eq!(map.get("{{FRACTION_OF_PI}}"), Some("1"));
        assert_eq!(layers.layer(Layer::Base).len(), 2);
        assert!(layers.layer(Layer::Interface).is_empty());
    }

    #[test]
    fn layer_checks() {
        let mut layers = LayeredReplacements::new();
        assert!(matches!(
            layers.add_layer(Layer::Base, entries(&[("name", "x")])),
            Err(TemplateError::InvalidKey{layer: Layer::Base, ..})
        ));
        assert!(matches!(
            layers.add_layer(Layer::Base, entries(&[("{{A}}", "x"), ("{{A}}", "y")])),
            Err(TemplateError::DuplicateKey{..})
        ));
        layers.add_layer(Layer::Base, entries(&[("{{A}}", "x")])).unwrap();
        assert!(layers.add_layer(Layer::Base, entries(&[("{{B}}", "x")])).is_err());
    }

    #[test]
    fn value_containing_a_key_is_rejected() {
        let mut layers = LayeredReplacements::new();
        layers.add_layer(Layer::MeshPath, entries(&[("SOLID_MESH_FILE", "calculix/mesh.msh")])).unwrap();
        layers.add_layer(Layer::UserConfig, entries(&[("{{note}}", "see SOLID_MESH_FILE")])).unwrap();
        match layers.build() {
            Err(TemplateError::ValueContainsKey{key, contained}) => {
                assert_eq!(key, "{{note}}");
                assert_eq!(contained, "SOLID_MESH_FILE");
            },
            other => panic!("expected a collision, got {:?}", other),
        }
    }

    #[test]
    fn flattens_nested_parameters() {
        let value: serde_yaml::Value = serde_yaml::from_str(concat!(
            "solver:\n",
            "  end_time: 0.5\n",
            "  write: true\n",
            "species: [H2, O2]\n",
            "empty: ~\n",
        )).unwrap();
        let flat = flatten_parameters(&value);
        assert_eq!(flat, entries(&[
            ("solver.end_time", "0.5"),
            ("solver.write", "true"),
            ("species.0", "H2"),
            ("species.1", "O2"),
            ("empty", ""),
        ]));
        assert_eq!(config_token("solver.end_time"), "{{solver.end_time}}");
        assert!(flatten_parameters(&serde_yaml::Value::Null).is_empty());
    }
}
