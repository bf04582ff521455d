use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// One of the four tracked nutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Macro {
    Calories,
    Protein,
    Carbs,
    Fat,
}

impl Macro {
    /// All macros, calories first.
    pub const ALL: [Macro; 4] = [Macro::Calories, Macro::Protein, Macro::Carbs, Macro::Fat];

    /// The gram-measured macros that helper ingredients can fill.
    pub const NUTRIENTS: [Macro; 3] = [Macro::Protein, Macro::Carbs, Macro::Fat];

    pub fn name(self) -> &'static str {
        match self {
            Macro::Calories => "calories",
            Macro::Protein => "protein",
            Macro::Carbs => "carbs",
            Macro::Fat => "fat",
        }
    }
}

/// Calories, protein, carbs and fat.
///
/// Used both as a per-100g profile and as an absolute total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroVector {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroVector {
    pub const ZERO: MacroVector = MacroVector {
        calories: 0.0,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
    };

    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    #[inline]
    pub fn get(&self, m: Macro) -> f64 {
        match m {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, m: Macro) -> &mut f64 {
        match m {
            Macro::Calories => &mut self.calories,
            Macro::Protein => &mut self.protein,
            Macro::Carbs => &mut self.carbs,
            Macro::Fat => &mut self.fat,
        }
    }

    /// Contribution of `grams` of a food whose per-100g profile is `self`.
    #[inline]
    pub fn for_grams(&self, grams: f64) -> Self {
        *self * (grams / 100.0)
    }

    /// Per-macro `max(0, target - self)`.
    pub fn deficit(&self, target: &MacroVector) -> Self {
        Self {
            calories: (target.calories - self.calories).max(0.0),
            protein: (target.protein - self.protein).max(0.0),
            carbs: (target.carbs - self.carbs).max(0.0),
            fat: (target.fat - self.fat).max(0.0),
        }
    }

    /// True when every component is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        Macro::ALL
            .iter()
            .all(|&m| self.get(m).is_finite() && self.get(m) >= 0.0)
    }
}

impl Add for MacroVector {
    type Output = MacroVector;

    fn add(self, other: MacroVector) -> MacroVector {
        MacroVector {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }
}

impl Mul<f64> for MacroVector {
    type Output = MacroVector;

    fn mul(self, factor: f64) -> MacroVector {
        MacroVector {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }
}

impl std::iter::Sum for MacroVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(MacroVector::ZERO, |acc, v| acc + v)
    }
}
