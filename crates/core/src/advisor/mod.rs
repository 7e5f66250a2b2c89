//! Season/city crop suggestions.
//!
//! A static nested table keyed by lowercase season then lowercase city. Lookups are
//! total: unknown keys resolve to a single placeholder message instead of an error.

mod table;

use std::collections::BTreeMap;

use table::SUGGESTION_TABLE;

pub const NO_SEASON_SUGGESTIONS: &str = "No specific suggestions for the given season";
pub const NO_CITY_SUGGESTIONS: &str = "No specific suggestions for the given city in this season";

const NO_SEASON: &[&str] = &[NO_SEASON_SUGGESTIONS];
const NO_CITY: &[&str] = &[NO_CITY_SUGGESTIONS];

type CityTable = BTreeMap<&'static str, &'static [&'static str]>;

#[derive(Clone, Debug)]
pub struct SeasonCityAdvisor {
    seasons: BTreeMap<&'static str, CityTable>,
}

impl Default for SeasonCityAdvisor {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SeasonCityAdvisor {
    /// Advisor over the bundled suggestion table.
    pub fn builtin() -> Self {
        Self::from_entries(SUGGESTION_TABLE.iter().flat_map(|(season, cities)| {
            cities.iter().map(move |(city, crops)| (*season, *city, *crops))
        }))
    }

    /// Keys must already be lowercase; later duplicates replace earlier ones.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (&'static str, &'static str, &'static [&'static str])>,
    ) -> Self {
        let mut seasons: BTreeMap<&'static str, CityTable> = BTreeMap::new();
        for (season, city, crops) in entries {
            seasons.entry(season).or_default().insert(city, crops);
        }
        Self { seasons }
    }

    pub fn suggest(&self, season: &str, city: &str) -> &[&'static str] {
        let season = normalize_key(season);
        let Some(cities) = self.seasons.get(season.as_str()) else {
            return NO_SEASON;
        };

        let city = normalize_key(city);
        cities.get(city.as_str()).copied().unwrap_or(NO_CITY)
    }

    pub fn is_known(&self, season: &str, city: &str) -> bool {
        self.seasons
            .get(normalize_key(season).as_str())
            .is_some_and(|cities| cities.contains_key(normalize_key(city).as_str()))
    }

    pub fn seasons(&self) -> Vec<&'static str> {
        self.seasons.keys().copied().collect()
    }

    /// Cities known for `season`, sorted; empty for unknown seasons.
    pub fn cities(&self, season: &str) -> Vec<&'static str> {
        self.seasons
            .get(normalize_key(season).as_str())
            .map(|cities| cities.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Every city that appears under any season, sorted and deduplicated.
    pub fn all_cities(&self) -> Vec<&'static str> {
        let mut cities: Vec<&'static str> =
            self.seasons.values().flat_map(|cities| cities.keys().copied()).collect();
        cities.sort_unstable();
        cities.dedup();
        cities
    }
}

pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}
