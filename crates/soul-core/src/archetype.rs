/// A named archetype and its fixed narrative message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Archetype {
    /// Display name, stored in a reading's `pattern` field.
    pub name: &'static str,
    /// Narrative text, stored in a reading's `message` field.
    pub message: &'static str,
}

/// The sixteen archetypes, indexed 0-15. Order is part of the reading format.
pub const ARCHETYPES: [Archetype; 16] = [
    Archetype {
        name: "The Seeker",
        message: "A question carries you further than any answer could.",
    },
    Archetype {
        name: "The Weaver",
        message: "Threads you thought were separate are already one cloth.",
    },
    Archetype {
        name: "The Wanderer",
        message: "The road bends toward what you have not yet named.",
    },
    Archetype {
        name: "The Guardian",
        message: "What you protect is quietly protecting you.",
    },
    Archetype {
        name: "The Alchemist",
        message: "Old burdens are ready to become new gold.",
    },
    Archetype {
        name: "The Mirror",
        message: "What you see in others is asking to be seen in you.",
    },
    Archetype {
        name: "The Flame",
        message: "A small spark now will light a long season.",
    },
    Archetype {
        name: "The Tide",
        message: "Let the current carry what your hands cannot.",
    },
    Archetype {
        name: "The Mountain",
        message: "Stillness is its own kind of progress.",
    },
    Archetype {
        name: "The Storm",
        message: "Disruption clears the air for a clearer sky.",
    },
    Archetype {
        name: "The Oracle",
        message: "The answer is already speaking beneath the words.",
    },
    Archetype {
        name: "The Trickster",
        message: "Laughter will open the door that force cannot.",
    },
    Archetype {
        name: "The Healer",
        message: "Tend the wound gently and it will teach you.",
    },
    Archetype {
        name: "The Architect",
        message: "Draw the plan before you lay the first stone.",
    },
    Archetype {
        name: "The Dreamer",
        message: "The vision is real even before it is visible.",
    },
    Archetype {
        name: "The Phoenix",
        message: "An ending is preparing the ground for return.",
    },
];

impl Archetype {
    /// Look up an archetype by table index.
    pub fn by_index(index: usize) -> Option<&'static Archetype> {
        ARCHETYPES.get(index)
    }

    /// Find an archetype and its index by name (exact match).
    pub fn by_name(name: &str) -> Option<(usize, &'static Archetype)> {
        ARCHETYPES.iter().enumerate().find(|(_, a)| a.name == name)
    }

    /// True if `pattern` names an archetype whose message is exactly `message`.
    pub fn is_paired(pattern: &str, message: &str) -> bool {
        Self::by_name(pattern).is_some_and(|(_, a)| a.message == message)
    }
}
