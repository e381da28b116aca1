//! Test fixtures.
//!
//! Small constructors for the values most tests need, panicking on
//! malformed literals.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use registers_model::{
    CompanyNumber, RegisterCategory, RegisterList, RegisterLocation, RegisteredItem, Registers,
    RegistersDelta, VersionMarker,
};

/// The instant every [`crate::SyncHarness`] clock starts at.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid fixture instant")
}

/// Parses a company number literal.
pub fn company(raw: &str) -> CompanyNumber {
    CompanyNumber::parse(raw).expect("valid company number fixture")
}

/// Parses a 20-digit marker literal.
pub fn marker(raw: &str) -> VersionMarker {
    VersionMarker::parse(raw).expect("valid version marker fixture")
}

/// One entry moved to `location` on 2020-01-01.
pub fn item(location: RegisterLocation) -> RegisteredItem {
    RegisteredItem::new(
        NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid fixture date"),
        location,
    )
}

/// A one-entry list for `category`.
pub fn list(category: RegisterCategory, location: RegisterLocation) -> RegisterList {
    RegisterList::new(category, vec![item(location)])
}

/// A payload holding only a `directors` list at the public register.
pub fn directors() -> Registers {
    Registers::new().with_list(list(
        RegisterCategory::Directors,
        RegisterLocation::PublicRegister,
    ))
}

/// A payload holding only a `members` list at the registered office.
pub fn members() -> Registers {
    Registers::new().with_list(list(
        RegisterCategory::Members,
        RegisterLocation::RegisteredOffice,
    ))
}

/// A payload holding every category.
pub fn all_categories(location: RegisterLocation) -> Registers {
    RegisterCategory::ALL
        .into_iter()
        .fold(Registers::new(), |registers, category| {
            registers.with_list(list(category, location))
        })
}

/// Builds a delta from literals.
pub fn delta(company_number: &str, delta_at: &str, registers: Registers) -> RegistersDelta {
    RegistersDelta::new(company(company_number), marker(delta_at), registers)
}
