//! Prompt templates, schema hints and generation options per task.

use storefront_backends::{GenerationOptions, Prompt};

use crate::types::{BrowsingHistory, Product, ProductData, UserProfile};

/// At most this many products are listed in a recommendation prompt.
pub const MAX_RECOMMENDATION_CANDIDATES: usize = 20;

pub const SEARCH_INTENT_HINT: &str = r#"{
  "intent": "product_search | comparison | recommendation",
  "category": "category name",
  "priceRange": [min_price, max_price],
  "features": ["feature"],
  "sentiment": "positive | neutral | negative"
}"#;

pub const COMPARISON_HINT: &str = r#"{
  "summary": "overall comparison",
  "bestFor": {"value": "product name", "quality": "product name", "popularity": "product name"},
  "pros_cons": {"<product id>": {"pros": ["..."], "cons": ["..."]}}
}"#;

pub const RECOMMENDATION_HINT: &str = r#"{
  "recommendations": [
    {"productId": "<product id>", "reason": "why", "confidence": 0.9, "category": "category"}
  ],
  "insights": "purchase pattern analysis",
  "nextPurchasePrediction": "expected timing of the next purchase"
}"#;

pub const TEST_CASES_HINT: &str = r#"{
  "testCases": [
    {"description": "scenario", "instructions": "steps to perform", "expectedElement": "[data-testid=\"...\"]"}
  ]
}"#;

pub fn description(data: &ProductData) -> Prompt {
    Prompt::new(format!(
        "Product name: {}\nCategory: {}\nFeatures: {}\nPrice: {}",
        data.name,
        data.category,
        data.features.join(", "),
        data.price
    ))
    .with_system(
        "You are a professional product copywriter. Write an appealing and accurate \
         description based on the product information given.",
    )
}

pub fn description_options() -> GenerationOptions {
    GenerationOptions::new().with_temperature(0.7).with_max_tokens(500)
}

pub fn search_intent(query: &str) -> Prompt {
    Prompt::new(format!("Search query: {query:?}"))
        .with_system("Analyze the shopper's natural-language search query and extract a structured search intent.")
}

pub fn search_intent_options() -> GenerationOptions {
    GenerationOptions::new().with_temperature(0.3)
}

pub fn comparison(products: &[Product]) -> Prompt {
    let listing = products
        .iter()
        .map(|p| {
            format!(
                "Product ID: {}\nName: {}\nPrice: {}\nDescription: {}\nAverage rating: {}",
                p.id,
                p.name,
                p.price,
                p.description.as_deref().unwrap_or("n/a"),
                rating(p.average_rating)
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n");

    Prompt::new(format!("Compare the following products:\n{listing}"))
}

pub fn comparison_options() -> GenerationOptions {
    GenerationOptions::new().with_temperature(0.3).with_max_tokens(1000)
}

pub fn recommendation(
    profile: &UserProfile,
    history: &[BrowsingHistory],
    available: &[Product],
) -> Prompt {
    let history = history
        .iter()
        .map(|entry| format!("- {} ({})", entry.product_name, entry.category_name))
        .collect::<Vec<_>>()
        .join("\n");
    let products = available
        .iter()
        .take(MAX_RECOMMENDATION_CANDIDATES)
        .map(|p| format!("- [{}] {} ({}, rating: {})", p.id, p.name, p.price, rating(p.average_rating)))
        .collect::<Vec<_>>()
        .join("\n");

    Prompt::new(format!(
        "Analyze the user profile and purchase history and produce personalized recommendations.\n\n\
         User:\n\
         - Age group: {}\n\
         - Interests: {}\n\
         - Average purchase amount: {}\n\n\
         Recent history:\n{history}\n\n\
         Available products:\n{products}",
        profile.age_group,
        profile.interests.join(", "),
        profile.average_purchase_amount
    ))
}

pub fn recommendation_options() -> GenerationOptions {
    GenerationOptions::new()
        .with_model("claude-3-opus-20240229")
        .with_temperature(0.5)
        .with_max_tokens(2000)
}

pub fn test_cases(scenarios: &[String]) -> Prompt {
    let listing = scenarios
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n");

    Prompt::new(format!("Scenarios:\n{listing}")).with_system(
        "You write end-to-end browser test cases. For each scenario, describe the steps \
         to perform and the element that must be visible afterwards.",
    )
}

pub fn test_cases_options() -> GenerationOptions {
    GenerationOptions::new().with_temperature(0.2)
}

fn rating(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |r| format!("{r:.1}"))
}
