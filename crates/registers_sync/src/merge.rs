//! Category-level merge of a delta into the stored payload.

use registers_model::{RegisterCategory, Registers};

/// Folds `delta` over `existing`.
///
/// Every category present in `delta` replaces the stored list whole,
/// including with an empty list. Categories absent from `delta` keep the
/// stored list. With no stored payload the result is a copy of `delta`.
pub fn merge_registers(existing: Option<&Registers>, delta: &Registers) -> Registers {
    let mut merged = existing.cloned().unwrap_or_default();
    for category in RegisterCategory::ALL {
        if let Some(list) = delta.get(category) {
            merged.replace(category, list.clone());
        }
    }
    merged
}
