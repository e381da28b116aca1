//! Register categories and the registers payload.

use crate::error::{ModelError, ModelResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A statutory register category.
///
/// Each category is an independent slot of [`Registers`]: a delta that
/// names one category never disturbs the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegisterCategory {
    /// Register of directors.
    Directors,
    /// Register of secretaries.
    Secretaries,
    /// Register of people with significant control.
    PersonsWithSignificantControl,
    /// Register of directors' usual residential addresses.
    UsualResidentialAddress,
    /// Register of members.
    Members,
    /// Register of LLP members.
    LlpMembers,
    /// Register of LLP members' usual residential addresses.
    LlpUsualResidentialAddress,
}

impl RegisterCategory {
    /// Every category, in canonical order.
    pub const ALL: [RegisterCategory; 7] = [
        RegisterCategory::Directors,
        RegisterCategory::Secretaries,
        RegisterCategory::PersonsWithSignificantControl,
        RegisterCategory::UsualResidentialAddress,
        RegisterCategory::Members,
        RegisterCategory::LlpMembers,
        RegisterCategory::LlpUsualResidentialAddress,
    ];

    /// Returns the wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegisterCategory::Directors => "directors",
            RegisterCategory::Secretaries => "secretaries",
            RegisterCategory::PersonsWithSignificantControl => "persons-with-significant-control",
            RegisterCategory::UsualResidentialAddress => "usual-residential-address",
            RegisterCategory::Members => "members",
            RegisterCategory::LlpMembers => "llp-members",
            RegisterCategory::LlpUsualResidentialAddress => "llp-usual-residential-address",
        }
    }
}

impl fmt::Display for RegisterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a register has been moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegisterLocation {
    /// Held on the public register at Companies House.
    PublicRegister,
    /// Held at the registered office.
    RegisteredOffice,
    /// Held at the single alternative inspection location.
    SingleAlternativeInspectionLocation,
    /// Location not specified.
    UnspecifiedLocation,
}

/// Links attached to a registered item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLinks {
    /// The filing that moved the register.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filing: Option<String>,
}

/// One entry in a register's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredItem {
    /// Date from which the register was held at this location.
    pub registered_from: NaiveDate,
    /// Where the register was moved to.
    pub register_moved_to: RegisterLocation,
    /// Related links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ItemLinks>,
}

impl RegisteredItem {
    /// Creates an item without links.
    pub fn new(registered_from: NaiveDate, register_moved_to: RegisterLocation) -> Self {
        Self {
            registered_from,
            register_moved_to,
            links: None,
        }
    }

    /// Attaches a filing link.
    pub fn with_filing(mut self, filing: impl Into<String>) -> Self {
        self.links = Some(ItemLinks {
            filing: Some(filing.into()),
        });
        self
    }
}

/// The history of one register category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterList {
    /// The category this list belongs to.
    pub register_type: RegisterCategory,
    /// Items, most recent first as supplied by the delta source.
    #[serde(default)]
    pub items: Vec<RegisteredItem>,
}

impl RegisterList {
    /// Creates a register list.
    pub fn new(register_type: RegisterCategory, items: Vec<RegisteredItem>) -> Self {
        Self {
            register_type,
            items,
        }
    }
}

/// The registers payload: one optional list per category.
///
/// Slots are addressed through [`RegisterCategory`] rather than by field,
/// so callers that work across categories iterate
/// [`RegisterCategory::ALL`] instead of naming each one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    directors: Option<RegisterList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    secretaries: Option<RegisterList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    persons_with_significant_control: Option<RegisterList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    usual_residential_address: Option<RegisterList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    members: Option<RegisterList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    llp_members: Option<RegisterList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    llp_usual_residential_address: Option<RegisterList>,
}

impl Registers {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a list under its own `register_type`, replacing any existing one.
    #[must_use]
    pub fn with_list(mut self, list: RegisterList) -> Self {
        let category = list.register_type;
        self.replace(category, list);
        self
    }

    /// Returns the list held for `category`, if present.
    pub fn get(&self, category: RegisterCategory) -> Option<&RegisterList> {
        self.slot(category).as_ref()
    }

    /// Returns true if `category` is present.
    pub fn contains(&self, category: RegisterCategory) -> bool {
        self.slot(category).is_some()
    }

    /// Replaces the slot for `category`, returning the previous list.
    pub fn replace(
        &mut self,
        category: RegisterCategory,
        list: RegisterList,
    ) -> Option<RegisterList> {
        self.slot_mut(category).replace(list)
    }

    /// Clears the slot for `category`, returning the previous list.
    pub fn remove(&mut self, category: RegisterCategory) -> Option<RegisterList> {
        self.slot_mut(category).take()
    }

    /// Iterates the present categories in canonical order.
    pub fn categories(&self) -> impl Iterator<Item = RegisterCategory> + '_ {
        RegisterCategory::ALL
            .into_iter()
            .filter(move |category| self.contains(*category))
    }

    /// Returns true if no category is present.
    pub fn is_empty(&self) -> bool {
        self.categories().next().is_none()
    }

    /// Checks that every present list sits under its own `register_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MismatchedRegisterType`] for the first slot,
    /// in canonical order, whose list names another category.
    pub fn validate(&self) -> ModelResult<()> {
        for slot in RegisterCategory::ALL {
            if let Some(list) = self.get(slot) {
                if list.register_type != slot {
                    return Err(ModelError::MismatchedRegisterType {
                        slot,
                        register_type: list.register_type,
                    });
                }
            }
        }
        Ok(())
    }

    fn slot(&self, category: RegisterCategory) -> &Option<RegisterList> {
        match category {
            RegisterCategory::Directors => &self.directors,
            RegisterCategory::Secretaries => &self.secretaries,
            RegisterCategory::PersonsWithSignificantControl => {
                &self.persons_with_significant_control
            }
            RegisterCategory::UsualResidentialAddress => &self.usual_residential_address,
            RegisterCategory::Members => &self.members,
            RegisterCategory::LlpMembers => &self.llp_members,
            RegisterCategory::LlpUsualResidentialAddress => &self.llp_usual_residential_address,
        }
    }

    fn slot_mut(&mut self, category: RegisterCategory) -> &mut Option<RegisterList> {
        match category {
            RegisterCategory::Directors => &mut self.directors,
            RegisterCategory::Secretaries => &mut self.secretaries,
            RegisterCategory::PersonsWithSignificantControl => {
                &mut self.persons_with_significant_control
            }
            RegisterCategory::UsualResidentialAddress => &mut self.usual_residential_address,
            RegisterCategory::Members => &mut self.members,
            RegisterCategory::LlpMembers => &mut self.llp_members,
            RegisterCategory::LlpUsualResidentialAddress => {
                &mut self.llp_usual_residential_address
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 11, 3).unwrap()
    }

    fn list(category: RegisterCategory) -> RegisterList {
        RegisterList::new(
            category,
            vec![RegisteredItem::new(date(), RegisterLocation::PublicRegister)],
        )
    }

    #[test]
    fn validate_rejects_misfiled_list() {
        let registers: Registers = serde_json::from_value(serde_json::json!({
            "directors": {"register_type": "members", "items": []}
        }))
        .unwrap();
        assert!(matches!(
            registers.validate(),
            Err(ModelError::MismatchedRegisterType {
                slot: RegisterCategory::Directors,
                register_type: RegisterCategory::Members,
            })
        ));

        let registers = Registers::new()
            .with_list(list(RegisterCategory::Directors))
            .with_list(list(RegisterCategory::LlpMembers));
        assert!(registers.validate().is_ok());
    }

    #[test]
    fn empty_payload() {
        let registers = Registers::new();
        assert!(registers.is_empty());
        assert_eq!(registers.categories().count(), 0);
        assert_eq!(serde_json::to_string(&registers).unwrap(), "{}");
    }

    #[test]
    fn slots_are_independent() {
        let mut registers = Registers::new()
            .with_list(list(RegisterCategory::Directors))
            .with_list(list(RegisterCategory::LlpMembers));

        assert!(registers.contains(RegisterCategory::Directors));
        assert!(registers.contains(RegisterCategory::LlpMembers));
        assert!(!registers.contains(RegisterCategory::Members));

        registers.remove(RegisterCategory::Directors);
        assert!(!registers.contains(RegisterCategory::Directors));
        assert!(registers.contains(RegisterCategory::LlpMembers));
    }

    #[test]
    fn categories_in_canonical_order() {
        let registers = Registers::new()
            .with_list(list(RegisterCategory::Members))
            .with_list(list(RegisterCategory::Directors));

        let present: Vec<_> = registers.categories().collect();
        assert_eq!(
            present,
            vec![RegisterCategory::Directors, RegisterCategory::Members]
        );
    }

    #[test]
    fn every_category_has_its_own_slot() {
        let mut registers = Registers::new();
        for category in RegisterCategory::ALL {
            assert!(registers.replace(category, list(category)).is_none());
        }
        assert_eq!(registers.categories().count(), RegisterCategory::ALL.len());
        for category in RegisterCategory::ALL {
            assert_eq!(registers.get(category).unwrap().register_type, category);
        }
    }

    #[test]
    fn wire_format() {
        let registers = Registers::new().with_list(RegisterList::new(
            RegisterCategory::PersonsWithSignificantControl,
            vec![RegisteredItem::new(date(), RegisterLocation::UnspecifiedLocation)
                .with_filing("/company/00006400/filing-history/abc")],
        ));

        let json = serde_json::to_value(&registers).unwrap();
        let list = &json["persons_with_significant_control"];
        assert_eq!(list["register_type"], "persons-with-significant-control");
        assert_eq!(list["items"][0]["registered_from"], "2022-11-03");
        assert_eq!(list["items"][0]["register_moved_to"], "unspecified-location");
        assert_eq!(
            list["items"][0]["links"]["filing"],
            "/company/00006400/filing-history/abc"
        );
    }

    #[test]
    fn absent_and_null_categories_decode_as_missing() {
        let json = r#"{"directors": null, "members": {"register_type": "members", "items": []}}"#;
        let registers: Registers = serde_json::from_str(json).unwrap();
        assert!(!registers.contains(RegisterCategory::Directors));
        assert!(registers.contains(RegisterCategory::Members));
    }

    #[test]
    fn category_display_matches_wire_name() {
        for category in RegisterCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }
}
