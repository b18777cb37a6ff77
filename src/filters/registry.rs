//! Static filter table.
//!
//! Adding a filter means adding one entry here plus the matching WGSL file
//! under the program root — the execution engine needs no change.

use serde::Serialize;

use crate::error::FilterError;

/// One registered filter: name, program source identifier, and the entry
/// point the compiled kernel is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterDescriptor {
    pub name: &'static str,
    pub source_id: &'static str,
    pub entry_point: &'static str,
}

/// All known filters. Append-only; names are unique.
const FILTERS: &[FilterDescriptor] = &[
    FilterDescriptor {
        name: "grayscale",
        source_id: "grayscale_program",
        entry_point: "grayscale_kernel",
    },
    FilterDescriptor {
        name: "sepia",
        source_id: "sepia_program",
        entry_point: "sepia_kernel",
    },
];

/// Look up a filter by name. Performs no device interaction.
pub fn resolve(name: &str) -> Result<&'static FilterDescriptor, FilterError> {
    FILTERS
        .iter()
        .find(|f| f.name == name)
        .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))
}

/// The full filter table, for menus and listings.
pub fn filters() -> &'static [FilterDescriptor] {
    FILTERS
}
