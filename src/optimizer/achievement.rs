use crate::models::{AchievementVerdict, Macro, MacroVector};
use crate::optimizer::config::Tolerances;

/// Whether a single macro sits inside its tolerance band.
#[inline]
pub fn within_band(achieved: f64, target: f64, band: f64, abs_floor: f64) -> bool {
    (achieved - target).abs() <= (target * band).max(abs_floor)
}

/// Check achieved totals against the target.
pub fn check(totals: &MacroVector, target: &MacroVector, tolerances: &Tolerances) -> AchievementVerdict {
    let ok = |m: Macro| {
        within_band(
            totals.get(m),
            target.get(m),
            tolerances.band(m),
            tolerances.floor(m),
        )
    };

    let calories = ok(Macro::Calories);
    let protein = ok(Macro::Protein);
    let carbs = ok(Macro::Carbs);
    let fat = ok(Macro::Fat);

    AchievementVerdict {
        calories,
        protein,
        carbs,
        fat,
        overall: calories && protein && carbs && fat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calorie_band_is_looser() {
        let tol = Tolerances::default();
        let target = MacroVector::new(1000.0, 100.0, 100.0, 100.0);

        // 8% off: fine for calories, not for protein
        let totals = MacroVector::new(1080.0, 108.0, 100.0, 100.0);
        let verdict = check(&totals, &target, &tol);
        assert!(verdict.calories);
        assert!(!verdict.protein);
        assert!(verdict.carbs);
        assert!(!verdict.overall);
    }

    #[test]
    fn test_exact_band_edge_is_achieved() {
        let tol = Tolerances::default();
        let target = MacroVector::new(1000.0, 100.0, 100.0, 100.0);
        let totals = MacroVector::new(900.0, 95.0, 105.0, 100.0);
        assert!(check(&totals, &target, &tol).overall);
    }

    #[test]
    fn test_zero_target_uses_absolute_floor() {
        let tol = Tolerances::default();
        let verdict = check(&MacroVector::new(0.2, 0.01, 0.0, 0.0), &MacroVector::ZERO, &tol);
        assert!(verdict.overall);

        let verdict = check(&MacroVector::new(0.0, 3.0, 0.0, 0.0), &MacroVector::ZERO, &tol);
        assert!(!verdict.protein);
    }

    #[test]
    fn test_check_is_idempotent() {
        let tol = Tolerances::default();
        let target = MacroVector::new(600.0, 40.0, 70.0, 20.0);
        let totals = MacroVector::new(590.0, 41.0, 60.0, 20.5);
        assert_eq!(check(&totals, &target, &tol), check(&totals, &target, &tol));
    }
}
