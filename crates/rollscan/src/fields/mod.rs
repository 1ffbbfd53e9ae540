//! Field rules.
//!
//! Each rule is compiled once from a [`Vocabulary`](crate::text::vocabulary::Vocabulary)
//! and then applied to normalized text. Rules never fail at extraction time:
//! a field that cannot be recovered comes back as the sentinel.

pub mod address;
pub mod age;
pub mod boundary;
pub mod gender;
pub mod house;
pub mod identifier;
pub mod location;
pub mod name;

pub use address::AddressRule;
pub use age::{AgeRule, age_on, date_of_birth_and_age, extract_age, find_date_of_birth};
pub use boundary::{BoundaryPattern, GuardianMatch, GuardianResolver, extract_between};
pub use gender::{GenderRule, extract_gender};
pub use house::{HouseRule, extract_house};
pub use identifier::{IdentifierRule, extract_code};
pub use location::{PostalCodeRule, RegionMatcher};
pub use name::clean_person_name;
