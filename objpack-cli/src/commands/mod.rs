//! Command implementations for the objpack CLI.

pub mod decode;
pub mod encode;
pub mod inspect;

pub use decode::cmd_decode;
pub use encode::cmd_encode;
pub use inspect::cmd_inspect;

use objpack::CodecConfig;

/// Nesting limit for documents read from disk.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Decode settings for documents of unknown origin.
pub(crate) fn read_config(max_depth: usize) -> CodecConfig {
    CodecConfig::new()
        .with_dynamic_records(true)
        .with_max_depth(max_depth)
}
