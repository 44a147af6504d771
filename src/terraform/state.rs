use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StateError;

/// Terraform state document (the `modules`-array layout).
///
/// Only `modules` is interpreted; every other top-level key is kept in
/// `extra` so a projected state serializes back with the same header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub modules: Vec<Module>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub path: Vec<String>,
    #[serde(default)]
    pub resources: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Module {
    /// `path[0]` for the root module, `path[1]` for anything nested below it.
    pub fn display_name(&self) -> &str {
        let index = if self.path.len() == 1 { 0 } else { 1 };
        self.path.get(index).map(String::as_str).unwrap_or_default()
    }

    pub fn entries(&self) -> impl Iterator<Item = ResourceEntry<'_>> {
        let module = self.display_name();
        self.resources
            .iter()
            .map(move |(key, attributes)| ResourceEntry::new(module, key, attributes))
    }
}

impl State {
    /// Reads and parses the state file at `path`.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        let content = fs::read(path).map_err(|source| StateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_slice(&content, path)
    }

    /// Parses state JSON. `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, StateError> {
        Self::parse_slice(content.as_bytes(), origin)
    }

    /// Like [`State::parse`], for raw file bytes. Invalid UTF-8 is a parse error.
    pub fn parse_slice(content: &[u8], origin: &Path) -> Result<Self, StateError> {
        let state: State = serde_json::from_slice(content).map_err(|source| StateError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        for (index, module) in state.modules.iter().enumerate() {
            if module.path.is_empty() {
                return Err(StateError::InvalidModule {
                    path: origin.to_path_buf(),
                    index,
                });
            }
            if let Some((key, _)) = module.resources.iter().find(|(_, v)| !v.is_object()) {
                return Err(StateError::InvalidResource {
                    path: origin.to_path_buf(),
                    module: index,
                    key: key.clone(),
                });
            }
        }

        tracing::debug!(modules = state.modules.len(), "parsed state");
        Ok(state)
    }

    /// Every path component of every module, de-duplicated.
    pub fn list_modules(&self) -> BTreeSet<String> {
        self.modules
            .iter()
            .flat_map(|module| module.path.iter().cloned())
            .collect()
    }

    /// Fully-qualified resource names, sorted ascending. Duplicates are kept.
    pub fn list_resources(&self) -> Vec<String> {
        let mut resources: Vec<String> = self.entries().map(|e| e.qualified_name()).collect();
        resources.sort();
        resources
    }

    /// Flattened resource view across all modules, ordered by qualified name.
    pub fn resource_entries(&self) -> Vec<ResourceEntry<'_>> {
        let mut entries: Vec<ResourceEntry<'_>> = self.entries().collect();
        entries.sort_by_cached_key(|entry| entry.qualified_name());
        entries
    }

    fn entries(&self) -> impl Iterator<Item = ResourceEntry<'_>> {
        self.modules.iter().flat_map(Module::entries)
    }
}

/// One resource together with the display name of the module holding it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceEntry<'a> {
    pub module: &'a str,
    pub key: &'a str,
    pub attributes: &'a Value,
}

impl<'a> ResourceEntry<'a> {
    pub fn new(module: &'a str, key: &'a str, attributes: &'a Value) -> Self {
        Self {
            module,
            key,
            attributes,
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.key)
    }

    /// The `type` attribute when present, otherwise the key up to its first dot
    /// (a leading `data.` is skipped).
    pub fn resource_type(&self) -> &'a str {
        if let Some(Value::String(kind)) = self.attributes.get("type") {
            return kind;
        }
        self.split_key().0
    }

    pub fn name(&self) -> &'a str {
        self.split_key().1
    }

    /// `primary.id`, falling back to a top-level `id` attribute.
    pub fn id(&self) -> Option<&'a str> {
        self.attributes
            .get("primary")
            .and_then(|primary| primary.get("id"))
            .or_else(|| self.attributes.get("id"))
            .and_then(Value::as_str)
    }

    /// Looks `key` up in the resource object, then in Terraform's flattened
    /// `primary.attributes` map.
    pub fn attribute(&self, key: &str) -> Option<&'a Value> {
        self.attributes.get(key).or_else(|| {
            self.attributes
                .get("primary")
                .and_then(|primary| primary.get("attributes"))
                .and_then(|attributes| attributes.get(key))
        })
    }

    fn split_key(&self) -> (&'a str, &'a str) {
        let key = self.key.strip_prefix("data.").unwrap_or(self.key);
        key.split_once('.').unwrap_or((key, ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(value: Value) -> State {
        State::parse(&value.to_string(), Path::new("test.tfstate")).unwrap()
    }

    #[test]
    fn test_root_module_resource_name() {
        let state = state(json!({
            "modules": [{"path": ["root"], "resources": {"aws_instance.a": {}}}]
        }));
        assert_eq!(state.list_resources(), vec!["root.aws_instance.a"]);
    }

    #[test]
    fn test_nested_module_uses_first_nesting_level() {
        let state = state(json!({
            "modules": [
                {"path": ["root", "child"], "resources": {"aws_subnet.private": {}}},
                {"path": ["root", "child", "grandchild"], "resources": {"aws_eip.nat": {}}}
            ]
        }));
        assert_eq!(
            state.list_resources(),
            vec!["child.aws_eip.nat", "child.aws_subnet.private"]
        );
    }

    #[test]
    fn test_resources_sorted_regardless_of_input_order() {
        let state = state(json!({
            "modules": [
                {"path": ["root", "web"], "resources": {"aws_instance.z": {}, "aws_instance.b": {}}},
                {"path": ["root"], "resources": {"aws_vpc.main": {}}},
                {"path": ["root", "db"], "resources": {"aws_db_instance.primary": {}}}
            ]
        }));
        let resources = state.list_resources();
        let mut sorted = resources.clone();
        sorted.sort();
        assert_eq!(resources, sorted);
        assert_eq!(resources[0], "db.aws_db_instance.primary");
        assert_eq!(resources.len(), 4);
    }

    #[test]
    fn test_duplicate_qualified_names_preserved() {
        let state = state(json!({
            "modules": [
                {"path": ["root", "net"], "resources": {"aws_route.r": {}}},
                {"path": ["root", "net", "inner"], "resources": {"aws_route.r": {}}}
            ]
        }));
        assert_eq!(state.list_resources(), vec!["net.aws_route.r", "net.aws_route.r"]);
    }

    #[test]
    fn test_list_modules_is_union_of_paths() {
        let state = state(json!({
            "modules": [{"path": ["root"]}, {"path": ["root", "net"]}]
        }));
        let expected: BTreeSet<String> = ["root", "net"].iter().map(|s| s.to_string()).collect();
        assert_eq!(state.list_modules(), expected);
    }

    #[test]
    fn test_missing_resources_is_empty() {
        let state = state(json!({"modules": [{"path": ["root"]}]}));
        assert!(state.list_resources().is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = State::parse("{\"modules\": [", Path::new("broken.tfstate"));
        assert!(matches!(result, Err(StateError::Parse { .. })));
    }

    #[test]
    fn test_missing_modules_key_is_parse_error() {
        let result = State::parse(r#"{"version": 4, "resources": []}"#, Path::new("v4.tfstate"));
        match result {
            Err(StateError::Parse { source, .. }) => {
                assert!(source.to_string().contains("modules"));
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_path_type_is_parse_error() {
        let result = State::parse(
            r#"{"modules": [{"path": "root", "resources": {}}]}"#,
            Path::new("bad.tfstate"),
        );
        assert!(matches!(result, Err(StateError::Parse { .. })));
    }

    #[test]
    fn test_empty_module_path_rejected() {
        let result = State::parse(
            r#"{"modules": [{"path": ["root"]}, {"path": []}]}"#,
            Path::new("bad.tfstate"),
        );
        assert!(matches!(
            result,
            Err(StateError::InvalidModule { index: 1, .. })
        ));
    }

    #[test]
    fn test_non_object_resource_rejected() {
        let result = State::parse(
            r#"{"modules": [{"path": ["root"], "resources": {"aws_vpc.main": {}, "aws_instance.a": 5}}]}"#,
            Path::new("bad.tfstate"),
        );
        match result {
            Err(StateError::InvalidResource { module, key, .. }) => {
                assert_eq!(module, 0);
                assert_eq!(key, "aws_instance.a");
            }
            other => panic!("expected InvalidResource error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_non_utf8_file_is_parse_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("terraform.tfstate");
        fs::write(&path, b"{\"modules\": [\xff]}").unwrap();

        match State::load(&path) {
            Err(StateError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = State::load(&tmp.path().join("absent.tfstate"));
        assert!(matches!(result, Err(StateError::Io { .. })));
    }

    #[test]
    fn test_extra_keys_survive_roundtrip() {
        let state = state(json!({
            "version": 3,
            "serial": 12,
            "lineage": "abc",
            "modules": [{"path": ["root"], "outputs": {"ip": {"value": "10.0.0.1"}}, "resources": {}}]
        }));
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["serial"], 12);
        assert_eq!(value["lineage"], "abc");
        assert_eq!(value["modules"][0]["outputs"]["ip"]["value"], "10.0.0.1");
    }

    #[test]
    fn test_resource_entry_type_and_name() {
        let attributes = json!({});
        let entry = ResourceEntry::new("root", "aws_instance.web.0", &attributes);
        assert_eq!(entry.resource_type(), "aws_instance");
        assert_eq!(entry.name(), "web.0");

        let entry = ResourceEntry::new("root", "data.aws_ami.ubuntu", &attributes);
        assert_eq!(entry.resource_type(), "aws_ami");
        assert_eq!(entry.name(), "ubuntu");
    }

    #[test]
    fn test_resource_entry_type_attribute_wins() {
        let attributes = json!({"type": "aws_instance"});
        let entry = ResourceEntry::new("root", "odd_key", &attributes);
        assert_eq!(entry.resource_type(), "aws_instance");
        assert_eq!(entry.name(), "");
    }

    #[test]
    fn test_resource_entry_id_and_attributes() {
        let attributes = json!({
            "type": "aws_instance",
            "primary": {"id": "i-123", "attributes": {"instance_type": "t2.micro"}}
        });
        let entry = ResourceEntry::new("root", "aws_instance.web", &attributes);
        assert_eq!(entry.id(), Some("i-123"));
        assert_eq!(entry.attribute("instance_type"), Some(&json!("t2.micro")));
        assert_eq!(entry.attribute("missing"), None);
    }

    #[test]
    fn test_projections_are_idempotent() {
        let state = state(json!({
            "modules": [
                {"path": ["root"], "resources": {"b.x": {}, "a.y": {}}},
                {"path": ["root", "m"], "resources": {"c.z": {}}}
            ]
        }));
        assert_eq!(state.list_resources(), state.list_resources());
        assert_eq!(state.list_modules(), state.list_modules());
    }
}
