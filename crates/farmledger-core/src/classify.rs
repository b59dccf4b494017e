//! Expense category classification for marketplace line items
//!
//! Product names are free text, so classification is a keyword heuristic:
//! an ordered rule table where the first rule with a matching substring
//! wins. Unmatched names fall back to `other_expense`.

use crate::models::{ExpenseCategory, OrderItem};

/// Where a matched rule sends the line item
#[derive(Debug, Clone, Copy)]
enum RuleTarget {
    Fixed(ExpenseCategory),
    /// Rental or purchase depending on the line item's rental flag
    Equipment,
}

struct ClassificationRule {
    keywords: &'static [&'static str],
    target: RuleTarget,
}

/// Evaluated top to bottom; order matters ("fertilizer seed mix" is fertilizer)
const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        keywords: &["fertilizer", "nutrient"],
        target: RuleTarget::Fixed(ExpenseCategory::Fertilizers),
    },
    ClassificationRule {
        keywords: &["seed"],
        target: RuleTarget::Fixed(ExpenseCategory::Seeds),
    },
    ClassificationRule {
        keywords: &["pesticide", "insecticide", "fungicide"],
        target: RuleTarget::Fixed(ExpenseCategory::Pesticides),
    },
    ClassificationRule {
        keywords: &["equipment", "tool", "machinery"],
        target: RuleTarget::Equipment,
    },
];

/// Classify a purchased product by name
pub fn classify_expense_category(product_name: &str, is_rental: bool) -> ExpenseCategory {
    let name = product_name.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| name.contains(kw)))
        .map(|rule| match rule.target {
            RuleTarget::Fixed(category) => category,
            RuleTarget::Equipment if is_rental => ExpenseCategory::EquipmentRental,
            RuleTarget::Equipment => ExpenseCategory::EquipmentPurchase,
        })
        .unwrap_or(ExpenseCategory::OtherExpense)
}

pub fn classify_order_item(item: &OrderItem) -> ExpenseCategory {
    classify_expense_category(&item.product_name, item.is_rental)
}

/// Turn a snake_case key into a display label: `crop_sales` -> `Crop Sales`
pub fn format_category_name(name: &str) -> String {
    name.split('_')
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
