//! Personality profile analysis.
//!
//! Maps a reading onto trait labels, an elemental affinity, an intensity band,
//! and growth prompts. Every table here is fixed, so the profile for a given
//! reading never changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use soul_core::{AXIS_MAX, AXIS_MIN, Axis, Reading};

/// Trait labels per axis, indexed by band (low to high). Rows follow [`Axis::ALL`].
const AXIS_TRAITS: [[&str; 4]; 4] = [
    ["Reserved", "Attuned", "Empathic", "Harmonious"],
    ["Dreamy", "Curious", "Perceptive", "Lucid"],
    ["Steady", "Adaptable", "Restless", "Mercurial"],
    ["Latent", "Budding", "Creative", "Visionary"],
];

/// Traits earned when both axes are strong.
const COMBINATION_TRAITS: [(Axis, Axis, &str); 6] = [
    (Axis::Resonance, Axis::Clarity, "Wise"),
    (Axis::Resonance, Axis::Flux, "Passionate"),
    (Axis::Resonance, Axis::Emergence, "Inspiring"),
    (Axis::Clarity, Axis::Flux, "Strategic"),
    (Axis::Clarity, Axis::Emergence, "Inventive"),
    (Axis::Flux, Axis::Emergence, "Transformative"),
];

/// Scores above this count as strong.
const STRONG_THRESHOLD: u8 = 60;
const MAX_DOMINANT_TRAITS: usize = 6;

/// One of the five elements a soul can lean toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// Drive and transformation.
    Fire,
    /// Depth and empathy.
    Water,
    /// Patience and structure.
    Earth,
    /// Insight and invention.
    Air,
    /// Integration and meaning.
    Spirit,
}

impl Element {
    /// All elements in tie-breaking order.
    pub const ALL: [Element; 5] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Spirit,
    ];

    /// Lowercase element name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Earth => "earth",
            Self::Air => "air",
            Self::Spirit => "spirit",
        }
    }

    /// Fixed descriptive text.
    pub fn description(self) -> &'static str {
        match self {
            Self::Fire => "Drive and transformation; you move first and ask later.",
            Self::Water => "Depth and empathy; you feel the currents beneath the surface.",
            Self::Earth => "Patience and structure; you build things that last.",
            Self::Air => "Insight and invention; you think in wide open skies.",
            Self::Spirit => "Integration and meaning; you connect what others keep apart.",
        }
    }

    /// Weighted score in tenths: weights sum to 10, so the range is 10..=1000.
    fn score(self, [r, c, f, e]: [u32; 4]) -> u32 {
        match self {
            Self::Fire => 5 * f + 3 * e + 2 * r,
            Self::Water => 5 * r + 3 * f + 2 * c,
            // Earth favours stability, i.e. low flux.
            Self::Earth => 5 * c + 3 * (101 - f) + 2 * r,
            Self::Air => 4 * c + 4 * e + 2 * f,
            Self::Spirit => 4 * e + 4 * r + 2 * c,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The dominant element and how strongly it dominates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementalAffinity {
    /// The highest-scoring element.
    pub element: Element,
    /// Normalized score, 0-100.
    pub strength: u8,
    /// The element's fixed description.
    pub description: String,
}

/// How strongly a reading expresses itself overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// Mean axis value of 40 or less.
    Gentle,
    /// Mean axis value in 41-60.
    Moderate,
    /// Mean axis value in 61-80.
    Intense,
    /// Mean axis value above 80.
    Overwhelming,
}

impl Intensity {
    /// Bucket the sum of the four axes (i.e. four times the mean).
    fn from_axis_sum(sum: u32) -> Self {
        match sum {
            0..=160 => Self::Gentle,
            161..=240 => Self::Moderate,
            241..=320 => Self::Intense,
            _ => Self::Overwhelming,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gentle => write!(f, "gentle"),
            Self::Moderate => write!(f, "moderate"),
            Self::Intense => write!(f, "intense"),
            Self::Overwhelming => write!(f, "overwhelming"),
        }
    }
}

/// A derived, non-persisted view of a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    /// One label per axis, followed by any combination traits.
    pub traits: Vec<String>,
    /// The leading element.
    pub elemental_affinity: ElementalAffinity,
    /// Overall intensity band.
    pub intensity: Intensity,
    /// The strongest traits, at most six.
    pub dominant_traits: Vec<String>,
    /// Improvement prompts for the weakest axis or axes.
    pub growth_areas: Vec<String>,
    /// Template-filled narrative.
    pub summary: String,
}

/// Analyze a reading. Total: axis values outside 1-100 are clamped first.
pub fn analyze(reading: &Reading) -> PersonalityProfile {
    let values = reading.axes().map(|v| v.clamp(AXIS_MIN, AXIS_MAX));

    let scored = scored_traits(values);
    let traits: Vec<String> = scored.iter().map(|(t, _)| (*t).to_string()).collect();
    let dominant_traits = dominant_traits(&scored, values);
    let elemental_affinity = elemental_affinity(values);
    let intensity = Intensity::from_axis_sum(values.iter().map(|v| u32::from(*v)).sum());
    let weakest = weakest_axes(values);
    let growth_areas = weakest
        .iter()
        .map(|a| growth_prompt(*a).to_string())
        .collect();

    let weakest_names: Vec<&str> = weakest.iter().map(|a| a.name()).collect();
    let summary = format!(
        "{} reading with {} intensity, aligned with {} ({}%). Dominant traits: {}. Growth lies in {}.",
        reading.pattern,
        intensity,
        elemental_affinity.element,
        elemental_affinity.strength,
        dominant_traits.join(", "),
        weakest_names.join(", "),
    );

    PersonalityProfile {
        traits,
        elemental_affinity,
        intensity,
        dominant_traits,
        growth_areas,
        summary,
    }
}

fn band(value: u8) -> usize {
    match value {
        0..=40 => 0,
        41..=60 => 1,
        61..=80 => 2,
        _ => 3,
    }
}

fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::Resonance => 0,
        Axis::Clarity => 1,
        Axis::Flux => 2,
        Axis::Emergence => 3,
    }
}

/// Axis traits in axis order, then combination traits in table order.
fn scored_traits(values: [u8; 4]) -> Vec<(&'static str, u8)> {
    let mut scored: Vec<(&'static str, u8)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (AXIS_TRAITS[i][band(*v)], *v))
        .collect();

    for (a, b, label) in COMBINATION_TRAITS {
        let (va, vb) = (values[axis_index(a)], values[axis_index(b)]);
        if va > STRONG_THRESHOLD && vb > STRONG_THRESHOLD {
            scored.push((label, va.min(vb)));
        }
    }
    scored
}

fn dominant_traits(scored: &[(&'static str, u8)], values: [u8; 4]) -> Vec<String> {
    let mut strong: Vec<(&'static str, u8)> = scored
        .iter()
        .copied()
        .filter(|(_, score)| *score > STRONG_THRESHOLD)
        .collect();
    // Stable sort keeps axis order among equal scores.
    strong.sort_by(|a, b| b.1.cmp(&a.1));
    strong.truncate(MAX_DOMINANT_TRAITS);

    if strong.is_empty() {
        // First maximum wins, so ties resolve in axis order.
        let (best, value) = values
            .iter()
            .copied()
            .enumerate()
            .fold((0, values[0]), |acc, (i, v)| if v > acc.1 { (i, v) } else { acc });
        return vec![AXIS_TRAITS[best][band(value)].to_string()];
    }
    strong.into_iter().map(|(t, _)| t.to_string()).collect()
}

fn elemental_affinity(values: [u8; 4]) -> ElementalAffinity {
    let v = values.map(u32::from);
    let mut element = Element::ALL[0];
    let mut best = element.score(v);
    for candidate in &Element::ALL[1..] {
        let score = candidate.score(v);
        if score > best {
            element = *candidate;
            best = score;
        }
    }
    // Rescale 10..=1000 to 0..=100, rounding half up.
    let strength = ((best.saturating_sub(10) * 100 + 495) / 990).min(100) as u8;
    ElementalAffinity {
        element,
        strength,
        description: element.description().to_string(),
    }
}

fn weakest_axes(values: [u8; 4]) -> Vec<Axis> {
    let min = values.iter().copied().min().unwrap_or(AXIS_MIN);
    Axis::ALL
        .iter()
        .copied()
        .filter(|a| values[axis_index(*a)] == min)
        .collect()
}

fn growth_prompt(axis: Axis) -> &'static str {
    match axis {
        Axis::Resonance => "Resonance: open yourself to deeper connection",
        Axis::Clarity => "Clarity: make room for stillness and focus",
        Axis::Flux => "Flux: welcome change instead of bracing against it",
        Axis::Emergence => "Emergence: give new ideas space to take shape",
    }
}
