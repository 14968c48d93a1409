//! Presentation queries over a set of declared binaries.
//!
//! These are the functions an admin view or report calls: they never resolve
//! anything themselves and only render the state the binaries already carry.

use crate::binary::{Binary, BinaryRecord};

/// Records for every binary, in the given order.
#[must_use]
pub fn get_all_binaries(binaries: &[Binary]) -> Vec<BinaryRecord> {
    binaries.iter().map(Binary::snapshot).collect()
}

/// Record for the binary named `name`, if declared.
#[must_use]
pub fn get_binary(binaries: &[Binary], name: &str) -> Option<BinaryRecord> {
    binaries.iter().find(|binary| binary.name == name).map(Binary::snapshot)
}
