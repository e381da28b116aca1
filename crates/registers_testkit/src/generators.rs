//! Property-based test generators using proptest.
//!
//! Strategies produce values that already satisfy the model's parsing
//! rules, so properties can focus on service behavior.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use registers_model::{
    CompanyNumber, RegisterCategory, RegisterList, RegisterLocation, RegisteredItem, Registers,
    RegistersDelta, VersionMarker,
};

/// Strategy for valid company numbers.
pub fn company_number_strategy() -> impl Strategy<Value = CompanyNumber> {
    prop::string::string_regex("[A-Z0-9]{8}")
        .expect("Invalid regex")
        .prop_map(|raw| CompanyNumber::parse(&raw).expect("generated company number"))
}

/// Strategy for markers between 2000 and 2099, at microsecond precision.
pub fn marker_strategy() -> impl Strategy<Value = VersionMarker> {
    (946_684_800i64..4_102_444_800i64, 0u32..1_000_000).prop_map(|(secs, micros)| {
        let at = Utc
            .timestamp_opt(secs, micros * 1_000)
            .single()
            .expect("generated instant in range");
        VersionMarker::from_datetime(at)
    })
}

/// Strategy for register categories.
pub fn category_strategy() -> impl Strategy<Value = RegisterCategory> {
    prop::sample::select(RegisterCategory::ALL.to_vec())
}

/// Strategy for register locations.
pub fn location_strategy() -> impl Strategy<Value = RegisterLocation> {
    prop_oneof![
        Just(RegisterLocation::PublicRegister),
        Just(RegisterLocation::RegisteredOffice),
        Just(RegisterLocation::SingleAlternativeInspectionLocation),
        Just(RegisterLocation::UnspecifiedLocation),
    ]
}

/// Strategy for register entries.
pub fn item_strategy() -> impl Strategy<Value = RegisteredItem> {
    (0i64..20_000, location_strategy(), any::<bool>()).prop_map(|(days, location, linked)| {
        let from = NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid base date")
            + chrono::Duration::days(days);
        let item = RegisteredItem::new(from, location);
        if linked {
            item.with_filing(format!("/company/00000000/filing-history/{}", days))
        } else {
            item
        }
    })
}

/// Strategy for a list of `category`, possibly empty.
pub fn list_strategy(category: RegisterCategory) -> impl Strategy<Value = RegisterList> {
    prop::collection::vec(item_strategy(), 0..4)
        .prop_map(move |items| RegisterList::new(category, items))
}

/// Strategy for payloads with any subset of categories present.
pub fn registers_strategy() -> impl Strategy<Value = Registers> {
    RegisterCategory::ALL
        .into_iter()
        .map(|category| prop::option::of(list_strategy(category)).boxed())
        .collect::<Vec<_>>()
        .prop_map(|lists| {
            lists
                .into_iter()
                .flatten()
                .fold(Registers::new(), Registers::with_list)
        })
}

/// Strategy for deltas against `company_number`.
pub fn delta_strategy(company_number: CompanyNumber) -> impl Strategy<Value = RegistersDelta> {
    (marker_strategy(), registers_strategy())
        .prop_map(move |(delta_at, registers)| {
            RegistersDelta::new(company_number.clone(), delta_at, registers)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn markers_encode_to_twenty_digits(marker in marker_strategy()) {
            let encoded = marker.encode();
            prop_assert_eq!(encoded.len(), 20);
            prop_assert_eq!(VersionMarker::parse(&encoded).unwrap(), marker);
        }

        #[test]
        fn lists_match_their_slot(registers in registers_strategy()) {
            for category in registers.categories() {
                prop_assert_eq!(registers.get(category).unwrap().register_type, category);
            }
        }
    }
}
