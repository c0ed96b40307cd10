//! Prompt builders for the generative oracle

use haat_common::vocabulary::{category_label, Category};
use haat_common::ProductAttributes;

/// Prompt asking the oracle to turn a shopping query into filter JSON
pub fn filter_prompt(query: &str) -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| format!("'{}'", c.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    // JSON-quote the query so stray quotes cannot break out of the prompt
    let quoted = serde_json::to_string(query).unwrap_or_else(|_| format!("\"{}\"", query));

    format!(
        r#"You are the search API of Haat, an Indian marketplace for handmade artisan goods.
Convert the shopper's query into a JSON object of search filters.

Schema:
- category: string, one of {categories}
- minPrice: integer (Indian Rupees)
- maxPrice: integer (Indian Rupees)
- search: string of the important keywords from the query
- _facets: object of tag arrays
    - materials: string[] (e.g. 'silver', 'clay', 'wood')
    - styles: string[] (e.g. 'minimalist', 'boho', 'rustic')
    - audience: string[] (e.g. 'for her', 'for him', 'kids')
    - occasion: string[] (e.g. 'birthday', 'diwali')
    - eco: string[] ('eco-friendly' when sustainability is mentioned)

Rules:
1. Prices are in Indian Rupees (₹, Rs). Use whole numbers.
2. Read intent: "cheap" or "affordable" suggests maxPrice 1000.
3. Omit any field the query gives no evidence for.
4. Reply with the JSON object only. No prose, no markdown.

Query: {quoted}

JSON:"#
    )
}

/// Prompt asking the oracle for a description and feature list
pub fn description_prompt(attrs: &ProductAttributes) -> String {
    let spec = serde_json::to_string(&attrs.spec).unwrap_or_else(|_| "{}".to_string());
    let use_case = if attrs.use_case.trim().is_empty() {
        "not specified"
    } else {
        attrs.use_case.trim()
    };
    let feature_range = match attrs.mode.feature_limit() {
        limit if limit <= 3 => "2-3",
        _ => "3-6",
    };
    let length = match attrs.mode {
        haat_common::DescriptionMode::Short => "one short paragraph",
        haat_common::DescriptionMode::Long => "two to three paragraphs",
    };

    format!(
        r#"You write product copy for Haat, a marketplace of handmade goods from India.
Write a description for the product below.

Instructions:
1. Tone: {tone} and inviting.
2. The description is {length} long.
3. List {feature_range} key highlights as short "Label: value" lines.
4. Reply with a single valid JSON object and nothing else.

Product:
- Title: {title}
- Category: {category}
- Materials: {materials}
- Primary use case: {use_case}
- Keywords: {keywords}
- Specification: {spec}

Output format:
{{
  "description": "Engaging copy that weaves in the details above.",
  "features": ["Materials: ...", "Care: ..."]
}}"#,
        tone = attrs.tone.as_str(),
        title = attrs.title.trim(),
        category = category_label(&attrs.category),
        materials = join_list(&attrs.materials, 5),
        keywords = join_list(&attrs.keywords, 6),
    )
}

fn join_list(items: &[String], limit: usize) -> String {
    let joined = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(limit)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haat_common::{DescriptionMode, Tone};

    #[test]
    fn test_filter_prompt_quotes_query() {
        let prompt = filter_prompt(r#"rings "under" 500"#);
        assert!(prompt.contains(r#"Query: "rings \"under\" 500""#));
        assert!(prompt.contains("'home-decor'"));
    }

    #[test]
    fn test_description_prompt_fields() {
        let attrs = ProductAttributes {
            title: "Clay Diya Set".into(),
            category: "pottery".into(),
            materials: vec!["clay".into(), " ".into()],
            tone: Tone::Earthy,
            mode: DescriptionMode::Short,
            ..Default::default()
        };
        let prompt = description_prompt(&attrs);
        assert!(prompt.contains("1. Tone: earthy and inviting."));
        assert!(prompt.contains("- Materials: clay\n"));
        assert!(prompt.contains("- Keywords: none\n"));
        assert!(prompt.contains("- Primary use case: not specified\n"));
        assert!(prompt.contains("List 2-3 key highlights"));
    }
}
