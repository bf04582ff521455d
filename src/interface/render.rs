use crate::models::{Ingredient, Macro, MacroVector, MealOutcome, MealTime};

fn mark(ok: bool) -> &'static str {
    if ok { "ok" } else { "MISSED" }
}

/// Display an optimized meal in a formatted table.
pub fn display_outcome(outcome: &MealOutcome, target: &MacroVector) {
    if outcome.items.is_empty() {
        println!("No meal generated.");
        return;
    }

    println!();
    println!("=== Optimized Meal ({}) ===", outcome.method_used);
    println!();

    let max_name_len = outcome.items.iter().map(|i| i.name.len()).max().unwrap_or(10);

    for (i, item) in outcome.items.iter().enumerate() {
        let tag = if item.is_helper { "  [helper]" } else { "" };
        println!(
            "{:>3}. {:<width$} {:>7.1} g | {:>6.0} kcal  P {:>5.1}  C {:>5.1}  F {:>5.1}{}",
            i + 1,
            item.name,
            item.quantity_grams,
            item.macros.calories,
            item.macros.protein,
            item.macros.carbs,
            item.macros.fat,
            tag,
            width = max_name_len
        );
    }

    println!();
    println!("--- Totals vs target ---");
    for m in Macro::ALL {
        let unit = if m == Macro::Calories { "kcal" } else { "g" };
        println!(
            "  {:<8} {:>8.1} / {:>8.1} {:<4} {}",
            m.name(),
            outcome.totals.get(m),
            target.get(m),
            unit,
            mark(outcome.verdict.get(m))
        );
    }
    println!(
        "Target achieved: {}",
        if outcome.verdict.overall { "yes" } else { "no" }
    );

    if !outcome.helpers_added.is_empty() {
        println!("Helpers added: {}", outcome.helpers_added.join(", "));
    }
    for rec in &outcome.recommendations {
        println!("  * {}", rec);
    }
    println!("Score: {:.4} ({} ms)", outcome.score, outcome.elapsed_ms);
    println!();
}

/// Display the helper table for one meal time.
pub fn display_helper_list(meal_time: MealTime, helpers: &[&Ingredient]) {
    if helpers.is_empty() {
        println!("{}: (no helpers)", meal_time);
        return;
    }

    println!();
    println!("=== Helpers for {} ({} items) ===", meal_time, helpers.len());
    println!();

    for helper in helpers {
        println!(
            "  {} - {} kcal, P:{} C:{} F:{} per 100g, up to {} g ({:?})",
            helper.name,
            helper.profile.calories,
            helper.profile.protein,
            helper.profile.carbs,
            helper.profile.fat,
            helper.max_quantity,
            helper.category
        );
    }

    println!();
}
