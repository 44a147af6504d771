use std::collections::BTreeMap;

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use termtree::Tree;

use crate::terraform::{ResourceEntry, State};

/// A title line followed by one `  - item` line per element.
///
/// ```text
/// Resources:
///   - root.aws_instance.web
///   - root.aws_vpc.main
/// ```
pub fn format_list<I, S>(title: &str, items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = title.to_string();
    for item in items {
        out.push_str("\n  - ");
        out.push_str(item.as_ref());
    }
    out
}

pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[derive(Debug, Tabled)]
struct ResourceRow<'a> {
    #[tabled(rename = "Module")]
    module: &'a str,
    #[tabled(rename = "Type")]
    resource_type: &'a str,
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Id")]
    id: &'a str,
}

impl<'a> From<&ResourceEntry<'a>> for ResourceRow<'a> {
    fn from(entry: &ResourceEntry<'a>) -> Self {
        Self {
            module: entry.module,
            resource_type: entry.resource_type(),
            name: entry.name(),
            id: entry.id().unwrap_or("-"),
        }
    }
}

pub fn format_resource_table(entries: &[ResourceEntry<'_>]) -> String {
    let rows: Vec<ResourceRow<'_>> = entries.iter().map(ResourceRow::from).collect();
    Table::new(rows).with(Style::sharp()).to_string()
}

#[derive(Debug, Default)]
struct PathNode(BTreeMap<String, PathNode>);

impl PathNode {
    fn insert(&mut self, path: &[String]) {
        if let Some((head, rest)) = path.split_first() {
            self.0.entry(head.clone()).or_default().insert(rest);
        }
    }

    fn into_tree(self, label: String) -> Tree<String> {
        Tree::new(label).with_leaves(
            self.0
                .into_iter()
                .map(|(label, node)| node.into_tree(label)),
        )
    }
}

/// Module paths rendered as a tree, one tree per top-level path component.
pub fn format_module_tree(state: &State) -> String {
    let mut roots = PathNode::default();
    for module in &state.modules {
        roots.insert(&module.path);
    }

    roots
        .0
        .into_iter()
        .map(|(label, node)| node.into_tree(label).to_string())
        .collect::<String>()
        .trim_end()
        .to_string()
}
