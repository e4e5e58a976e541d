use std::collections::{btree_map, BTreeMap};

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::establishment::Establishment;

pub const NAME: &str = "name";
pub const CURRENCY_XBT: &str = "currency:XBT";
pub const PAYMENT_LIGHTNING: &str = "payment:lightning";
pub const PAYMENT_ONCHAIN: &str = "payment:onchain";
pub const ADDRESS_FULL: &str = "addr:full";
pub const ADDRESS_CITY: &str = "addr:city";
pub const WEBSITE: &str = "website";
pub const PHONE: &str = "phone";
pub const DESCRIPTION: &str = "description";
pub const AMENITY: &str = "amenity";
pub const SHOP: &str = "shop";
pub const CHECK_DATE_XBT: &str = "check_date:currency:XBT";

/// OpenStreetMap tags, kept sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct OsmTags(BTreeMap<String, String>);

impl OsmTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// `true` if the tag is present and equals `yes`.
    pub fn is_yes(&self, key: &str) -> bool {
        self.get(key) == Some("yes")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OsmTags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl Extend<(String, String)> for OsmTags {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for OsmTags {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMode {
    /// A new element: payment tags only when accepted.
    Create,
    /// A partial edit: payment tags as explicit yes/no whenever supplied.
    Update,
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn kind_tag(kind: &str) -> Option<(&'static str, String)> {
    let kind = kind.trim().to_lowercase();
    match kind.as_str() {
        "restaurant" | "cafe" | "bar" | "pub" => Some((AMENITY, kind)),
        "loja" | "store" => Some((SHOP, "yes".to_owned())),
        _ => None,
    }
}

/// Derives the OSM tags for an establishment.
///
/// `check_date` stamps `check_date:currency:XBT` when given. Caller supplied
/// `tags` are merged last and may shadow any derived key.
pub fn map_tags(
    establishment: &Establishment,
    mode: TagMode,
    check_date: Option<NaiveDate>,
) -> OsmTags {
    let mut tags = OsmTags::new();

    if let Some(name) = &establishment.name {
        tags.insert(NAME, name.as_str());
    }

    let payments = [
        (PAYMENT_LIGHTNING, establishment.accepts_lightning),
        (PAYMENT_ONCHAIN, establishment.accepts_onchain),
    ];

    match mode {
        TagMode::Create => {
            tags.insert(CURRENCY_XBT, "yes");
            for (key, accepted) in payments {
                if accepted == Some(true) {
                    tags.insert(key, "yes");
                }
            }
        }
        TagMode::Update => {
            for (key, accepted) in payments {
                if let Some(accepted) = accepted {
                    tags.insert(key, yes_no(accepted));
                }
            }
        }
    }

    let optional = [
        (ADDRESS_FULL, &establishment.address),
        (WEBSITE, &establishment.website),
        (PHONE, &establishment.phone),
        (DESCRIPTION, &establishment.description),
    ];
    for (key, value) in optional {
        if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
            tags.insert(key, value);
        }
    }

    if let Some((key, value)) = establishment.kind.as_deref().and_then(kind_tag) {
        tags.insert(key, value);
    }

    if let Some(date) = check_date {
        tags.insert(CHECK_DATE_XBT, date.format("%Y-%m-%d").to_string());
    }

    tags.extend(establishment.tags.clone());

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExampleData;
    use rstest::rstest;

    fn cafe_x() -> Establishment {
        Establishment::new("Café X", -25.10, -50.15)
    }

    #[test]
    fn minimal_establishment_yields_name_and_currency_only() {
        let tags = map_tags(&cafe_x(), TagMode::Create, None);
        let expected: OsmTags = [(NAME, "Café X"), (CURRENCY_XBT, "yes")].into_iter().collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn create_omits_declined_payment_methods() {
        let establishment = Establishment {
            accepts_lightning: Some(true),
            accepts_onchain: Some(false),
            ..cafe_x()
        };
        let tags = map_tags(&establishment, TagMode::Create, None);
        assert_eq!(tags.get(PAYMENT_LIGHTNING), Some("yes"));
        assert!(!tags.contains_key(PAYMENT_ONCHAIN));
    }

    #[test]
    fn update_spells_out_both_payment_methods() {
        let establishment = Establishment {
            accepts_lightning: Some(true),
            accepts_onchain: Some(false),
            ..cafe_x()
        };
        let tags = map_tags(&establishment, TagMode::Update, None);
        assert_eq!(tags.get(PAYMENT_LIGHTNING), Some("yes"));
        assert_eq!(tags.get(PAYMENT_ONCHAIN), Some("no"));
        assert!(!tags.contains_key(CURRENCY_XBT));
    }

    #[test]
    fn update_only_touches_supplied_fields() {
        let establishment = Establishment {
            phone: Some("+55 42 3222-0000".to_owned()),
            ..Default::default()
        };
        let tags = map_tags(&establishment, TagMode::Update, None);
        let expected: OsmTags = [(PHONE, "+55 42 3222-0000")].into_iter().collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn optional_fields_are_copied_when_non_empty() {
        let establishment = Establishment {
            address: Some("Rua A, 1".to_owned()),
            website: Some("https://cafe.example".to_owned()),
            phone: Some(String::new()),
            description: Some("Espresso".to_owned()),
            ..cafe_x()
        };
        let tags = map_tags(&establishment, TagMode::Create, None);
        assert_eq!(tags.get(ADDRESS_FULL), Some("Rua A, 1"));
        assert_eq!(tags.get(WEBSITE), Some("https://cafe.example"));
        assert_eq!(tags.get(DESCRIPTION), Some("Espresso"));
        assert!(!tags.contains_key(PHONE));
    }

    #[test]
    fn caller_tags_shadow_derived_ones() {
        let mut establishment = cafe_x();
        establishment
            .tags
            .insert(CURRENCY_XBT.to_owned(), "no".to_owned());
        establishment
            .tags
            .insert("opening_hours".to_owned(), "24/7".to_owned());
        let tags = map_tags(&establishment, TagMode::Create, None);
        assert_eq!(tags.get(CURRENCY_XBT), Some("no"));
        assert_eq!(tags.get("opening_hours"), Some("24/7"));
    }

    #[rstest]
    #[case("Cafe", AMENITY, "cafe")]
    #[case("restaurant", AMENITY, "restaurant")]
    #[case(" PUB ", AMENITY, "pub")]
    #[case("loja", SHOP, "yes")]
    #[case("Store", SHOP, "yes")]
    fn kind_maps_to_amenity_or_shop(
        #[case] kind: &str,
        #[case] key: &str,
        #[case] value: &str,
    ) {
        let establishment = Establishment {
            kind: Some(kind.to_owned()),
            ..cafe_x()
        };
        let tags = map_tags(&establishment, TagMode::Create, None);
        assert_eq!(tags.get(key), Some(value));
    }

    #[test]
    fn unknown_kind_is_ignored() {
        let establishment = Establishment {
            kind: Some("bakery".to_owned()),
            ..cafe_x()
        };
        let tags = map_tags(&establishment, TagMode::Create, None);
        assert!(!tags.contains_key(AMENITY));
        assert!(!tags.contains_key(SHOP));
    }

    #[rstest]
    #[case(TagMode::Create)]
    #[case(TagMode::Update)]
    fn check_date_is_stamped_when_given(#[case] mode: TagMode) {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let tags = map_tags(&cafe_x(), mode, Some(date));
        assert_eq!(tags.get(CHECK_DATE_XBT), Some("2024-03-09"));
    }

    #[test]
    fn mapping_is_deterministic() {
        let establishment = Establishment::example_data();
        assert_eq!(
            map_tags(&establishment, TagMode::Create, None),
            map_tags(&establishment, TagMode::Create, None)
        );
    }
}
