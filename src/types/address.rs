use super::bounds::Bounds;
use super::stopwords::ADDRESS_STOPWORDS;
use super::{SuggestionType, TypeProfile};
use crate::matchers::{MatchContext, Matcher, SameParent, Strategy};
use crate::models::{Suggestion, SuggestionsOptions};
use crate::utils::json_path::{compact_join, deep_text, fields_not_empty};
use crate::utils::tokens::Stopwords;
use once_cell::sync::Lazy;
use serde_json::Value;

static MATCHERS: Lazy<[Matcher; 2]> = Lazy::new(|| {
    let context = MatchContext::with_stopwords(&ADDRESS_STOPWORDS);
    [
        Matcher::new(Strategy::NormalizedQuery, context),
        Matcher::new(Strategy::Words(SameParent::Address), context),
    ]
});

const BOUNDS: &[&str] = &["region", "area", "city", "settlement", "street", "house"];

pub struct AddressProfile;

impl TypeProfile for AddressProfile {
    fn kind(&self) -> SuggestionType {
        SuggestionType::Address
    }

    fn matchers(&self) -> &'static [Matcher] {
        MATCHERS.as_slice()
    }

    fn enrichment_enabled(&self) -> bool {
        true
    }

    fn geo_enabled(&self) -> bool {
        true
    }

    fn unformattable_tokens(&self) -> Option<&'static Stopwords> {
        Some(&*ADDRESS_STOPWORDS)
    }

    fn bounds_available(&self) -> &'static [&'static str] {
        BOUNDS
    }

    fn bound_fields(&self, bound: &str) -> &'static [&'static str] {
        match bound {
            "region" => &["region", "region_type", "region_type_full", "region_with_type"],
            "area" => &["area", "area_type", "area_type_full", "area_with_type"],
            "city" => &["city", "city_type", "city_type_full", "city_with_type"],
            "settlement" => &[
                "settlement",
                "settlement_type",
                "settlement_type_full",
                "settlement_with_type",
            ],
            "street" => &["street", "street_type", "street_type_full", "street_with_type"],
            "house" => &["house", "house_type", "house_type_full", "block", "block_type"],
            _ => &[],
        }
    }

    fn is_data_complete(
        &self,
        suggestion: &Suggestion,
        _options: &SuggestionsOptions,
        bounds: &Bounds,
    ) -> bool {
        match suggestion.data_object() {
            Some(data) => fields_not_empty(data, &[bounds.to.unwrap_or("flat")]),
            None => true,
        }
    }

    fn compose_value(&self, data: &Value) -> Option<String> {
        let text = |field: &str| deep_text(data, field);
        let with_type = |combined: &str, first: &str, second: &str| {
            text(combined).or_else(|| {
                Some(compact_join([text(first), text(second)], " ")).filter(|s| !s.is_empty())
            })
        };
        let house = compact_join(
            [text("house_type"), text("house"), text("block_type"), text("block")],
            " ",
        );
        let flat = compact_join([text("flat_type"), text("flat")], " ");
        let postal_box = text("postal_box").map(|pbox| format!("а/я {}", pbox));

        Some(compact_join(
            [
                with_type("region_with_type", "region", "region_type"),
                with_type("area_with_type", "area_type", "area"),
                with_type("city_with_type", "city_type", "city"),
                with_type("settlement_with_type", "settlement_type", "settlement"),
                with_type("street_with_type", "street_type", "street"),
                Some(house),
                Some(flat),
                postal_box,
            ],
            ", ",
        ))
    }
}
