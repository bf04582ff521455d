pub mod prompts;
pub mod render;

pub use prompts::{prompt_ingredients, prompt_meal_time, prompt_preferences, prompt_target, prompt_yes_no};
pub use render::{display_helper_list, display_outcome};
