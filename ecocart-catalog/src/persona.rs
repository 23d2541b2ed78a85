use serde::{Deserialize, Serialize};
use std::fmt;
use crate::product::normalize;

/// Customer archetypes the storefront can be viewed as
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonaType {
    Student,
    Loyal,
    Strategic,
}

impl PersonaType {
    pub const ALL: [PersonaType; 3] = [PersonaType::Student, PersonaType::Loyal, PersonaType::Strategic];

    /// Resolve a free-form persona name or display label.
    ///
    /// Anything unrecognized becomes `Strategic`, the persona with the
    /// smallest discounts.
    pub fn parse_lenient(s: &str) -> Self {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|p| normalize(&p.to_string()) == wanted || normalize(p.label()) == wanted)
            .unwrap_or(PersonaType::Strategic)
    }

    /// Purchase history string attached when the persona is selected
    pub fn default_history(&self) -> &'static str {
        match self {
            PersonaType::Student | PersonaType::Loyal => "Mostly Full Price (Loyal)",
            PersonaType::Strategic => "Always Waits for Discounts",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PersonaType::Student => "Student (Budget)",
            PersonaType::Loyal => "Loyal Customer (Premium)",
            PersonaType::Strategic => "Deal Hunter (Strategic)",
        }
    }
}

impl fmt::Display for PersonaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PersonaType::Student => "Student",
            PersonaType::Loyal => "Loyal",
            PersonaType::Strategic => "Strategic",
        };
        f.write_str(name)
    }
}

/// The shopper currently viewing the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Persona {
    pub persona_type: PersonaType,
    /// Display and prompt context only; never consulted by the rule table
    pub history: String,
}

impl Persona {
    pub fn select(persona_type: PersonaType) -> Self {
        Self {
            persona_type,
            history: persona_type.default_history().to_string(),
        }
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::select(PersonaType::Student)
    }
}
