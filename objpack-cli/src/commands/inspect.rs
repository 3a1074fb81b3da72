//! Inspect command implementation.

use objpack::mmap::MappedDocument;
use super::read_config;
use objpack::{Value, document};
use serde::Serialize;
use std::path::Path;

/// Longest scalar summary printed before eliding.
const SUMMARY_LIMIT: usize = 60;

/// One node of the typed value tree.
#[derive(Debug, Serialize)]
struct Node {
    #[serde(rename = "type")]
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    fn leaf(kind: impl Into<String>, value: impl ToString) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value.to_string()),
            children: Vec::new(),
        }
    }

    fn branch(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            children,
        }
    }

    fn describe(value: &Value) -> Self {
        let kind = value.type_name();
        match value {
            Value::Null => Self::branch(kind, Vec::new()),
            Value::String(s) => Self::leaf(kind, format!("{:?}", elide(s))),
            Value::Bool(b) => Self::leaf(kind, b),
            Value::Char(c) => Self::leaf(kind, format!("U+{:04X}", c)),
            Value::Float(v) => Self::leaf(kind, v),
            Value::Double(v) => Self::leaf(kind, v),
            Value::BigDecimal(d) => Self::leaf(kind, d),
            Value::BigInteger(i) => Self::leaf(kind, i),
            Value::Date(d) => Self::leaf(format!("{} ({:?})", kind, d.kind), d.millis),
            Value::Record(r) => Self::branch(
                format!("{} {}", kind, r.type_name()),
                r.fields().iter().map(Self::describe).collect(),
            ),
            Value::Array(items) | Value::List(items) | Value::Set(items) => Self::branch(
                format!("{}[{}]", kind, items.len()),
                items.iter().map(Self::describe).collect(),
            ),
            Value::Map(entries) => Self::branch(
                format!("{}[{}]", kind, entries.len()),
                entries
                    .iter()
                    .map(|(k, v)| Self::branch("entry", vec![Self::describe(k), Self::describe(v)]))
                    .collect(),
            ),
            Value::BoolArray(items) => Self::leaf(kind, format!("{} elements", items.len())),
            Value::ByteArray(items) | Value::Serialized(items) => {
                Self::leaf(kind, format!("{} bytes", items.len()))
            }
            Value::CharArray(items) => Self::leaf(kind, format!("{} elements", items.len())),
            Value::ShortArray(items) => Self::leaf(kind, format!("{} elements", items.len())),
            Value::IntArray(items) => Self::leaf(kind, format!("{} elements", items.len())),
            Value::LongArray(items) => Self::leaf(kind, format!("{} elements", items.len())),
            Value::FloatArray(items) => Self::leaf(kind, format!("{} elements", items.len())),
            Value::DoubleArray(items) => Self::leaf(kind, format!("{} elements", items.len())),
            Value::StringArray(items) => Self::leaf(kind, format!("{} elements", items.len())),
            Value::Extension(ext) => Self::leaf(
                format!("{} ({})", kind, ext.tag()),
                format!("{:?}", ext.payload()),
            ),
            other => Self::leaf(kind, other.as_i64().unwrap_or_default()),
        }
    }

    fn print(&self, depth: usize) {
        let indent = "  ".repeat(depth);
        match &self.value {
            Some(value) => println!("{}{}: {}", indent, self.kind, value),
            None => println!("{}{}", indent, self.kind),
        }
        for child in &self.children {
            child.print(depth + 1);
        }
    }
}

fn elide(s: &str) -> String {
    if s.chars().count() <= SUMMARY_LIMIT {
        return s.to_string();
    }
    let head: String = s.chars().take(SUMMARY_LIMIT).collect();
    format!("{}...", head)
}

/// JSON output for document inspection.
#[derive(Debug, Serialize)]
struct InspectJson {
    file: String,
    size: usize,
    table_offset: usize,
    body_len: usize,
    table_len: usize,
    string_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    strings: Option<Vec<String>>,
    root: Node,
}

pub fn cmd_inspect(
    input: &Path,
    json: bool,
    show_strings: bool,
    max_depth: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config(max_depth);
    let doc = MappedDocument::open(input)?;
    let layout = doc.layout()?;
    let value = doc.decode(&config)?;

    let strings = if show_strings {
        let table = document::read_string_table(doc.as_bytes())?;
        Some(table.iter().map(str::to_owned).collect::<Vec<_>>())
    } else {
        None
    };

    if json {
        let report = InspectJson {
            file: input.display().to_string(),
            size: doc.as_bytes().len(),
            table_offset: layout.table_offset,
            body_len: layout.body_len(),
            table_len: layout.table_len(),
            string_count: layout.string_count,
            strings,
            root: Node::describe(&value),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Document Information");
    println!("====================");
    println!("File: {}", input.display());
    println!("Size: {} bytes", doc.as_bytes().len());
    println!("Table offset: {}", layout.table_offset);
    println!("Body: {} bytes", layout.body_len());
    println!(
        "String table: {} bytes ({} strings)",
        layout.table_len(),
        layout.string_count
    );
    if layout.total_len() < doc.as_bytes().len() {
        println!(
            "Trailing data: {} bytes",
            doc.as_bytes().len() - layout.total_len()
        );
    }

    if let Some(strings) = strings {
        println!();
        println!("Strings:");
        for (i, s) in strings.iter().enumerate() {
            println!("  [{}] {:?}", i, elide(s));
        }
    }

    println!();
    println!("Value:");
    Node::describe(&value).print(1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_map() {
        let value = Value::map([("k", Value::Int(3))]);
        let node = Node::describe(&value);
        assert_eq!(node.kind, "map[1]");
        let entry = &node.children[0];
        assert_eq!(entry.children[0].value.as_deref(), Some("\"k\""));
        assert_eq!(entry.children[1].kind, "int");
        assert_eq!(entry.children[1].value.as_deref(), Some("3"));
    }

    #[test]
    fn test_elide_long_strings() {
        let long = "x".repeat(100);
        assert_eq!(elide(&long).len(), SUMMARY_LIMIT + 3);
        assert_eq!(elide("short"), "short");
    }
}
