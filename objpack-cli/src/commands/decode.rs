//! Decode command implementation.

use crate::json::to_json;
use super::read_config;
use objpack::mmap::MappedDocument;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn cmd_decode(
    input: &Path,
    output: Option<&Path>,
    pretty: bool,
    max_depth: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config(max_depth);
    let document = MappedDocument::open(input)?;
    let value = document.decode(&config)?;

    let json = to_json(&value);
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };

    match output {
        Some(path) => {
            fs::write(path, text.as_bytes())?;
            info!(output = %path.display(), "wrote JSON");
        }
        None => println!("{}", text),
    }
    Ok(())
}
