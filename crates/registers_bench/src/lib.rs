//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use chrono::{Duration, NaiveDate};
use registers_model::{
    RegisterCategory, RegisterList, RegisterLocation, RegisteredItem, Registers, VersionMarker,
};
use registers_testkit::epoch;

const LOCATIONS: [RegisterLocation; 4] = [
    RegisterLocation::PublicRegister,
    RegisterLocation::RegisteredOffice,
    RegisterLocation::SingleAlternativeInspectionLocation,
    RegisterLocation::UnspecifiedLocation,
];

/// Generate a list of `len` entries for `category`.
pub fn generate_list(category: RegisterCategory, len: usize) -> RegisterList {
    let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
    let items = (0..len)
        .map(|i| {
            RegisteredItem::new(base + Duration::days(i as i64), LOCATIONS[i % LOCATIONS.len()])
                .with_filing(format!("/company/00006400/filing-history/{}", i))
        })
        .collect();
    RegisterList::new(category, items)
}

/// Generate a payload holding the first `categories` categories, each
/// with `len` entries.
pub fn generate_registers(categories: usize, len: usize) -> Registers {
    RegisterCategory::ALL
        .into_iter()
        .take(categories)
        .fold(Registers::new(), |registers, category| {
            registers.with_list(generate_list(category, len))
        })
}

/// Generate `count` strictly increasing markers, one second apart.
pub fn generate_markers(count: usize) -> Vec<VersionMarker> {
    (0..count)
        .map(|i| VersionMarker::from_datetime(epoch() + Duration::seconds(i as i64)))
        .collect()
}
