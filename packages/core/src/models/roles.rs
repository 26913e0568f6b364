//! Role-Attribute Generators
//!
//! Department and language names handed out when a node's role changes.
//! Department names are a three-part animal combination
//! (`"<amphibian> <mammal> <fish>"`); languages come from a fixed catalog.
//! The concrete strings carry no meaning for tree consistency - they only
//! need to be non-empty and drawn from a fixed catalog.

use rand::Rng;

const AMPHIBIANS: &[&str] = &[
    "Frog",
    "Crocodile",
    "Alligator",
    "Monitor-lizard",
    "Salamander",
    "Toad",
    "Newt",
    "Iguana",
    "Snake",
    "Green-dragon-lizard",
];

const MAMMALS: &[&str] = &[
    "Lion",
    "Tiger",
    "Goat",
    "Horse",
    "Donkey",
    "Dog",
    "Cat",
    "Pig",
    "Panther",
    "Leopard",
    "Cheetah",
    "Cow",
    "Walrus",
    "Otter",
    "Giraffe",
    "Sheep",
    "Rabbit",
    "Monkey",
];

const FISHES: &[&str] = &[
    "Herring",
    "Crab",
    "Brill",
    "Haddock",
    "Eel",
    "Whale",
    "Blue-whale",
    "Salmon",
    "Sardines",
    "Pike",
    "Carp",
    "Shark",
    "Tuna",
    "Pufferfish",
    "Blue-tang",
];

const LANGUAGES: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "C#",
    "C++",
    "PHP",
    "TypeScript",
    "Ruby",
    "Swift",
    "Kotlin",
    "Go",
    "R",
];

fn pick(catalog: &'static [&'static str]) -> &'static str {
    let index = rand::rng().random_range(0..catalog.len());
    catalog[index]
}

/// Generate a department name for a node that becomes a manager.
pub fn generate_department_name() -> String {
    format!("{} {} {}", pick(AMPHIBIANS), pick(MAMMALS), pick(FISHES))
}

/// Generate a language preference for a node that becomes a leaf
/// contributor.
pub fn generate_programming_language() -> String {
    pick(LANGUAGES).to_string()
}
