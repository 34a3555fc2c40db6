//! Static broker lookup tables: known display names, aliases, categories and regions.
//!
//! Classification is membership-based; anything not listed falls back to
//! `Category::General` / `Region::Global`.

use super::normalize::slugify;
use super::{Category, Region};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical display names of every broker the catalog recognizes.
pub const KNOWN_BROKERS: &[&str] = &[
    "eToro",
    "Admirals",
    "AvaTrade",
    "Binance",
    "Capital.com",
    "Charles Schwab",
    "CMC Markets",
    "Coinbase",
    "Degiro",
    "Exness",
    "Fidelity",
    "FXCM",
    "FxPro",
    "Hargreaves Lansdown",
    "IC Markets",
    "IG",
    "Interactive Brokers",
    "Kraken",
    "Moomoo",
    "NinjaTrader",
    "OANDA",
    "Pepperstone",
    "Plus500",
    "Robinhood",
    "Saxo Bank",
    "tastytrade",
    "Tiger Brokers",
    "Trading 212",
    "Tradovate",
    "Webull",
    "XM",
];

/// Many-to-one aliases: normalized asset slug → canonical display name.
const ALIASES: &[(&str, &str)] = &[
    ("admiral-markets", "Admirals"),
    ("admiral-markets-review", "Admirals"),
    ("admirals-logo", "Admirals"),
    ("admiral-markets-logo", "Admirals"),
    ("etoro-logo", "eToro"),
    ("ava-trade", "AvaTrade"),
    ("ava-trade-review", "AvaTrade"),
    ("capital", "Capital.com"),
    ("capital-com-logo", "Capital.com"),
    ("schwab", "Charles Schwab"),
    ("schwab-review", "Charles Schwab"),
    ("td-ameritrade", "Charles Schwab"),
    ("cmc", "CMC Markets"),
    ("fidelity-investments", "Fidelity"),
    ("hl", "Hargreaves Lansdown"),
    ("ib", "Interactive Brokers"),
    ("ibkr", "Interactive Brokers"),
    ("ibkr-review", "Interactive Brokers"),
    ("interactive-brokers-logo", "Interactive Brokers"),
    ("ig-markets", "IG"),
    ("ig-group", "IG"),
    ("ninja-trader", "NinjaTrader"),
    ("oanda-logo", "OANDA"),
    ("saxo", "Saxo Bank"),
    ("saxo-markets", "Saxo Bank"),
    ("tastyworks", "tastytrade"),
    ("tasty-trade", "tastytrade"),
    ("tiger-trade", "Tiger Brokers"),
    ("trading212", "Trading 212"),
    ("trading212-review", "Trading 212"),
    ("xm-group", "XM"),
    ("futu-moomoo", "Moomoo"),
];

const CATEGORIES: &[(&str, Category)] = &[
    ("admirals", Category::Forex),
    ("avatrade", Category::Forex),
    ("exness", Category::Forex),
    ("fxcm", Category::Forex),
    ("fxpro", Category::Forex),
    ("ic-markets", Category::Forex),
    ("oanda", Category::Forex),
    ("pepperstone", Category::Forex),
    ("xm", Category::Forex),
    ("etoro", Category::Stock),
    ("charles-schwab", Category::Stock),
    ("degiro", Category::Stock),
    ("fidelity", Category::Stock),
    ("hargreaves-lansdown", Category::Stock),
    ("moomoo", Category::Stock),
    ("robinhood", Category::Stock),
    ("tiger-brokers", Category::Stock),
    ("trading-212", Category::Stock),
    ("webull", Category::Stock),
    ("binance", Category::Crypto),
    ("coinbase", Category::Crypto),
    ("kraken", Category::Crypto),
    ("ninjatrader", Category::Futures),
    ("tradovate", Category::Futures),
    ("tastytrade", Category::Options),
];

const REGIONS: &[(&str, Region)] = &[
    ("charles-schwab", Region::Us),
    ("coinbase", Region::Us),
    ("fidelity", Region::Us),
    ("ninjatrader", Region::Us),
    ("robinhood", Region::Us),
    ("tastytrade", Region::Us),
    ("tradovate", Region::Us),
    ("webull", Region::Us),
    ("admirals", Region::Eu),
    ("degiro", Region::Eu),
    ("saxo-bank", Region::Eu),
    ("trading-212", Region::Eu),
    ("cmc-markets", Region::Uk),
    ("hargreaves-lansdown", Region::Uk),
    ("ig", Region::Uk),
    ("moomoo", Region::Asia),
    ("tiger-brokers", Region::Asia),
];

static BY_SLUG: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    KNOWN_BROKERS
        .iter()
        .map(|name| (slugify(name), *name))
        .collect()
});

static ALIAS_INDEX: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIASES.iter().copied().collect());

/// Display name for an exact canonical slug.
pub fn display_name_for_slug(slug: &str) -> Option<&'static str> {
    BY_SLUG.get(slug).copied()
}

/// Display name for an alias key.
pub fn display_name_for_alias(key: &str) -> Option<&'static str> {
    ALIAS_INDEX.get(key).copied()
}

pub fn category_for(id: &str) -> Category {
    CATEGORIES
        .iter()
        .find(|(slug, _)| *slug == id)
        .map(|(_, category)| *category)
        .unwrap_or(Category::General)
}

pub fn region_for(id: &str) -> Region {
    REGIONS
        .iter()
        .find(|(slug, _)| *slug == id)
        .map(|(_, region)| *region)
        .unwrap_or(Region::Global)
}
