use std::fmt;

use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;

/// Lowest value any axis can take.
pub const AXIS_MIN: u8 = 1;
/// Highest value any axis can take.
pub const AXIS_MAX: u8 = 100;
/// Length in hex characters of a reading's proof fragment (64 bits).
pub const PROOF_FRAGMENT_LEN: usize = 16;

/// One of the four numeric dimensions of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Connection and empathy.
    Resonance,
    /// Focus and perception.
    Clarity,
    /// Change and movement.
    Flux,
    /// Creativity and becoming.
    Emergence,
}

impl Axis {
    /// All axes in their stable order. Tie-breaking everywhere follows this order.
    pub const ALL: [Axis; 4] = [Axis::Resonance, Axis::Clarity, Axis::Flux, Axis::Emergence];

    /// Lowercase axis name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Resonance => "resonance",
            Self::Clarity => "clarity",
            Self::Flux => "flux",
            Self::Emergence => "emergence",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The oracle's output for one consultation.
///
/// Fields are plain data so that readings loaded from untrusted storage can be
/// represented and then checked with [`Reading::issues`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Connection axis, 1-100.
    pub resonance: u8,
    /// Focus axis, 1-100.
    pub clarity: u8,
    /// Change axis, 1-100.
    pub flux: u8,
    /// Creativity axis, 1-100.
    pub emergence: u8,
    /// Archetype name.
    pub pattern: String,
    /// Archetype narrative, paired with `pattern`.
    pub message: String,
    /// Hex prefix of the reading digest.
    pub proof_fragment: String,
}

impl Reading {
    /// Value of a single axis.
    pub fn axis(&self, axis: Axis) -> u8 {
        match axis {
            Axis::Resonance => self.resonance,
            Axis::Clarity => self.clarity,
            Axis::Flux => self.flux,
            Axis::Emergence => self.emergence,
        }
    }

    /// All four axis values in [`Axis::ALL`] order.
    pub fn axes(&self) -> [u8; 4] {
        [self.resonance, self.clarity, self.flux, self.emergence]
    }

    /// The archetype this reading's `pattern` names, if any.
    pub fn archetype(&self) -> Option<&'static Archetype> {
        Archetype::by_name(&self.pattern).map(|(_, a)| a)
    }

    /// Every shape problem with this reading. Empty means well-formed.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for axis in Axis::ALL {
            let value = self.axis(axis);
            if !(AXIS_MIN..=AXIS_MAX).contains(&value) {
                issues.push(format!("{axis} {value} outside [{AXIS_MIN}, {AXIS_MAX}]"));
            }
        }
        match Archetype::by_name(&self.pattern) {
            None => issues.push(format!("unknown pattern \"{}\"", self.pattern)),
            Some((_, a)) if a.message != self.message => {
                issues.push(format!(
                    "message does not match pattern \"{}\"",
                    self.pattern
                ));
            }
            Some(_) => {}
        }
        let fragment_ok = self.proof_fragment.len() == PROOF_FRAGMENT_LEN
            && self
                .proof_fragment
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !fragment_ok {
            issues.push("proof fragment is not 16 lowercase hex characters".into());
        }
        issues
    }

    /// True when [`Reading::issues`] is empty.
    pub fn is_well_formed(&self) -> bool {
        self.issues().is_empty()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [resonance {}, clarity {}, flux {}, emergence {}] #{}",
            self.pattern,
            self.resonance,
            self.clarity,
            self.flux,
            self.emergence,
            self.proof_fragment
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ARCHETYPES;

    fn sample() -> Reading {
        Reading {
            resonance: 78,
            clarity: 66,
            flux: 94,
            emergence: 91,
            pattern: ARCHETYPES[9].name.to_string(),
            message: ARCHETYPES[9].message.to_string(),
            proof_fragment: "c2d511716c2dd156".to_string(),
        }
    }

    #[test]
    fn well_formed_sample() {
        assert!(sample().is_well_formed());
        assert_eq!(sample().archetype().map(|a| a.name), Some("The Storm"));
    }

    #[test]
    fn out_of_bounds_axes_reported() {
        let mut r = sample();
        r.resonance = 0;
        r.emergence = 101;
        let issues = r.issues();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].starts_with("resonance 0"));
        assert!(issues[1].starts_with("emergence 101"));
    }

    #[test]
    fn mismatched_message_reported() {
        let mut r = sample();
        r.message = ARCHETYPES[0].message.to_string();
        assert_eq!(
            r.issues(),
            vec!["message does not match pattern \"The Storm\""]
        );
    }

    #[test]
    fn bad_proof_fragment_reported() {
        let mut r = sample();
        r.proof_fragment = "C2D511716C2DD156".to_string();
        assert!(!r.is_well_formed());
        r.proof_fragment = "abc".to_string();
        assert!(!r.is_well_formed());
    }

    #[test]
    fn axis_accessors_follow_stable_order() {
        let r = sample();
        let by_axis: Vec<u8> = Axis::ALL.iter().map(|a| r.axis(*a)).collect();
        assert_eq!(by_axis, r.axes().to_vec());
    }

    #[test]
    fn display_line() {
        assert_eq!(
            sample().to_string(),
            "The Storm [resonance 78, clarity 66, flux 94, emergence 91] #c2d511716c2dd156"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"proof_fragment\""));
        let back: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }
}
