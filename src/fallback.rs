//! Fallback content synthesis.
//!
//! Pure and network-free: builds review content for a subject from fixed
//! templates keyed by category. Output always satisfies every
//! [`StructuredContent`] invariant.

use crate::catalog::{Category, Entity};
use crate::content::{BrokerFeatures, FaqEntry, Ratings, ReviewSection, StructuredContent};
use chrono::{Datelike, NaiveDate};

fn category_ratings(category: Category) -> Ratings {
    let (overall, fees, platform) = match category {
        Category::Forex => (3.8, 3.7, 3.9),
        Category::Stock => (3.9, 3.8, 3.9),
        Category::Crypto => (3.6, 3.5, 3.8),
        Category::Futures => (3.7, 3.6, 3.8),
        Category::Options => (3.8, 3.7, 3.9),
        Category::General => (3.5, 3.5, 3.5),
    };
    Ratings {
        overall,
        fees,
        platform,
        support: 3.5,
        trust: 3.6,
    }
}

fn category_instruments(category: Category) -> Vec<String> {
    let instruments: &[&str] = match category {
        Category::Forex => &["Forex pairs", "CFDs on indices", "Commodities"],
        Category::Stock => &["Stocks", "ETFs"],
        Category::Crypto => &["Cryptocurrencies", "Stablecoins"],
        Category::Futures => &["Futures contracts", "Micro futures"],
        Category::Options => &["Equity options", "Index options", "Stocks"],
        Category::General => &["Multiple asset classes"],
    };
    instruments.iter().map(|s| s.to_string()).collect()
}

fn category_pro(category: Category) -> &'static str {
    match category {
        Category::Forex => "Wide selection of currency pairs",
        Category::Stock => "Access to popular stocks and ETFs",
        Category::Crypto => "Broad range of digital assets",
        Category::Futures => "Dedicated futures trading tools",
        Category::Options => "Options-focused analytics and strategy tools",
        Category::General => "Covers several asset classes in one account",
    }
}

fn category_con(category: Category) -> &'static str {
    match category {
        Category::Forex => "Leveraged products carry a high risk of loss",
        Category::Stock => "Some international markets may be unavailable",
        Category::Crypto => "Crypto prices are highly volatile",
        Category::Futures => "Futures margin requirements can be demanding",
        Category::Options => "Options strategies can be complex for beginners",
        Category::General => "Product range varies by jurisdiction",
    }
}

/// Deterministic review content for `entity`, dated `today`.
pub fn synthesize(entity: &Entity, today: NaiveDate) -> StructuredContent {
    let name = entity.name.as_str();
    let kind = entity.category.describe();
    let region = entity.region.describe();
    let year = today.year();

    let introduction = format!(
        "{name} is a broker offering {kind} trading to {region} clients. This review summarizes what \
         traders should know about its fees, trading platforms, account options and \
         safety measures before opening an account."
    );
    let overview = format!(
        "{name} offers {kind} trading to {region} customers. Details such as pricing, \
         available markets and regulatory coverage change over time, so always confirm \
         the current terms directly with the broker."
    );

    let section = |heading: &str, topic: &str| ReviewSection {
        heading: heading.to_string(),
        body: format!(
            "{topic} matter when evaluating {kind} brokers, and {name} is no \
             exception. Traders should compare this area against other providers in the \
             {region} market, read the broker's official documentation carefully, and test \
             the service with a demo or small deposit first. Conditions can differ between \
             account types and jurisdictions, so verify the latest information before \
             committing capital."
        ),
    };

    StructuredContent {
        title: format!("{name} Review {year}"),
        meta_description: format!(
            "Our {year} {name} review covers fees, platforms, regulation and account \
             options for {kind} traders."
        ),
        introduction,
        overview,
        pros: vec![
            category_pro(entity.category).to_string(),
            format!("Available to {region} clients"),
            "Straightforward account opening".to_string(),
            "Web and mobile trading access".to_string(),
            "Educational resources for new traders".to_string(),
        ],
        cons: vec![
            category_con(entity.category).to_string(),
            "Fee schedule should be checked for your account type".to_string(),
            "Support hours may vary by region".to_string(),
        ],
        features: BrokerFeatures {
            regulation: vec!["Verify current regulatory status with the broker".to_string()],
            minimum_deposit: "Varies by account type".to_string(),
            platforms: vec!["Web platform".to_string(), "Mobile app".to_string()],
            instruments: category_instruments(entity.category),
            fees: "See the broker's published fee schedule".to_string(),
            customer_support: "Email and online help center".to_string(),
        },
        detailed_review: vec![
            section("Fees and Costs", "Trading and non-trading fees"),
            section("Trading Platforms", "Platform quality and usability"),
            section("Account Types", "Account types and funding options"),
            section("Safety and Regulation", "Regulation and client fund protections"),
        ],
        verdict: format!(
            "{name} is a reasonable option to consider for {kind} trading. Compare its costs \
             and features with alternatives and confirm current terms before opening an account."
        ),
        faq: vec![
            FaqEntry {
                question: format!("Is {name} regulated?"),
                answer: format!(
                    "{name} states that it operates under financial regulation; check the \
                     broker's website for the regulators covering your country."
                ),
            },
            FaqEntry {
                question: format!("What can I trade with {name}?"),
                answer: format!(
                    "{name} focuses on {kind} trading. The exact product list depends on \
                     your region and account type."
                ),
            },
            FaqEntry {
                question: format!("What is the minimum deposit at {name}?"),
                answer: "The minimum deposit varies by account type and funding method."
                    .to_string(),
            },
            FaqEntry {
                question: format!("Is {name} suitable for beginners?"),
                answer: "Beginners should start with a demo account or a small deposit and \
                         review the available educational material first."
                    .to_string(),
            },
        ],
        ratings: category_ratings(entity.category),
        last_updated: today,
    }
}
