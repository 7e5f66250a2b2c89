use croprec_core::advisor::normalize_key;
use croprec_core::SeasonCityAdvisor;
use serde_json::json;

use crate::commands::CommandResult;

/// Table lookup only; blank or unknown keys get the advisor's fallback message.
pub fn run(season: &str, city: &str) -> CommandResult {
    let advisor = SeasonCityAdvisor::builtin();
    let suggestions = advisor.suggest(season, city);

    CommandResult::success_with_data(
        "suggest",
        suggestions.join(", "),
        Some(json!({
            "season": normalize_key(season),
            "city": normalize_key(city),
            "known": advisor.is_known(season, city),
            "suggestions": suggestions,
        })),
    )
}
