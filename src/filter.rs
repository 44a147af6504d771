//! `key=value` selectors over state resources.
//!
//! Selectors are ANDed. `module`, `type`, `name` and `id` resolve against the
//! resource's identity; any other key is looked up as a resource attribute.

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::StateError;
use crate::terraform::{Module, ResourceEntry, State};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub key: String,
    pub value: String,
}

impl FromStr for Selector {
    type Err = StateError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok(Self {
                key: key.to_string(),
                value: value.to_string(),
            }),
            _ => Err(StateError::InvalidFilter(raw.to_string())),
        }
    }
}

impl Selector {
    pub fn matches(&self, entry: &ResourceEntry<'_>) -> bool {
        let actual = match self.key.as_str() {
            "module" => Some(entry.module.to_string()),
            "type" => Some(entry.resource_type().to_string()),
            "name" => Some(entry.name().to_string()),
            "id" => entry.id().map(str::to_string),
            key => entry.attribute(key).and_then(scalar_text),
        };
        actual.is_some_and(|actual| actual == self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    selectors: Vec<Selector>,
}

impl Filter {
    pub fn parse<I, S>(raw: I) -> Result<Self, StateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selectors = raw
            .into_iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<Selector>, _>>()?;
        Ok(Self { selectors })
    }

    pub fn matches(&self, entry: &ResourceEntry<'_>) -> bool {
        self.selectors.iter().all(|selector| selector.matches(entry))
    }

    /// A copy of `state` holding only matching resources. Modules left with
    /// no resources are dropped.
    pub fn apply(&self, state: &State) -> State {
        let modules: Vec<Module> = state
            .modules
            .iter()
            .filter_map(|module| {
                let resources: Map<String, Value> = module
                    .entries()
                    .filter(|entry| self.matches(entry))
                    .map(|entry| (entry.key.to_string(), entry.attributes.clone()))
                    .collect();
                (!resources.is_empty()).then(|| Module {
                    path: module.path.clone(),
                    resources,
                    extra: module.extra.clone(),
                })
            })
            .collect();

        tracing::info!(
            selectors = self.selectors.len(),
            modules = modules.len(),
            "filtered state"
        );

        State {
            modules,
            extra: state.extra.clone(),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
