//! Fallback display names for accounts whose login response carries none.
//!
//! The names have no meaning beyond labelling a record in an account file.

use rand::seq::SliceRandom;

const FIRST_NAMES: &[&str] = &[
    "Aaron", "Abigail", "Adam", "Alice", "Amelia", "Andrew", "Anna", "Benjamin", "Bianca",
    "Caleb", "Camila", "Carlos", "Charlotte", "Chloe", "Daniel", "David", "Diana", "Dylan",
    "Elena", "Eli", "Emily", "Emma", "Ethan", "Felix", "Fiona", "Gabriel", "Grace", "Hannah",
    "Henry", "Isaac", "Isabella", "Jack", "Jacob", "James", "Julia", "Kevin", "Laura", "Leo",
    "Liam", "Lucas", "Lucy", "Maria", "Mason", "Mia", "Nathan", "Noah", "Olivia", "Oscar",
    "Paula", "Peter", "Quinn", "Rachel", "Ryan", "Samuel", "Sarah", "Sofia", "Thomas", "Victor",
    "Wendy", "William", "Zoe",
];

/// Pick a random plausible first name.
pub fn fallback_first_name() -> String {
    FIRST_NAMES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Anonymous")
        .to_string()
}

/// Use `name` when it is present and non-blank, otherwise a random fallback.
pub fn display_name_or_fallback(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => fallback_first_name(),
    }
}
