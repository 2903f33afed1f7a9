//! Structural validation of souls and epochs.
//!
//! Validators never fail fast. Every problem found is collected into a
//! [`VerificationReport`] so a caller sees the whole picture in one pass.
//! Issue text never includes the secret seed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use soul_core::is_valid_seed_hex;
use soul_oracle::verify_reading;

use crate::soul::{Epoch, Soul};

/// Outcome of auditing a soul.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True when the soul-level fields and every epoch passed.
    pub soul_valid: bool,
    /// Number of epochs without any issue.
    pub epochs_valid: usize,
    /// Number of epochs examined.
    pub total_epochs: usize,
    /// Indices of the epochs that failed, ascending.
    pub invalid_epochs: Vec<usize>,
    /// One human-readable line per problem.
    pub issues: Vec<String>,
}

impl VerificationReport {
    /// True when nothing was flagged.
    pub fn is_valid(&self) -> bool {
        self.soul_valid && self.issues.is_empty()
    }
}

/// Problems with a single epoch considered on its own.
pub fn epoch_issues(epoch: &Epoch) -> Vec<String> {
    let mut issues = Vec::new();
    if epoch.sequence_number < 1 {
        issues.push("sequence number must be at least 1".to_string());
    }
    if epoch.question.trim().is_empty() {
        issues.push("question is empty".to_string());
    }
    issues.extend(epoch.reading.issues());
    issues
}

/// True when the epoch is well-formed on its own.
pub fn verify_epoch_structure(epoch: &Epoch) -> bool {
    epoch_issues(epoch).is_empty()
}

/// True when the soul and all of its epochs are well-formed.
pub fn verify_soul_structure(soul: &Soul) -> bool {
    verification_report(soul).is_valid()
}

/// Structural audit of a typed soul. Readings are not re-derived.
pub fn verification_report(soul: &Soul) -> VerificationReport {
    audit_soul(soul, false)
}

/// Structural audit plus replay: every epoch that is otherwise well-formed
/// must reproduce its reading from the soul's seed.
pub fn verify_replay(soul: &Soul) -> VerificationReport {
    audit_soul(soul, true)
}

fn audit_soul(soul: &Soul, replay: bool) -> VerificationReport {
    let mut audit = Audit::new(Some(soul.created_at()), soul.epochs().len());
    if soul.name().trim().is_empty() {
        audit.soul_issue("name is empty");
    }
    let seed = soul.secret_seed();
    let seed_ok = seed.is_well_formed();
    if !seed_ok {
        audit.soul_issue(SEED_ISSUE);
    }

    for (index, epoch) in soul.epochs().iter().enumerate() {
        let mut extra = Vec::new();
        if replay && seed_ok && verify_epoch_structure(epoch) {
            match verify_reading(
                &epoch.question,
                seed.expose_secret(),
                epoch.sequence_number,
                &epoch.reading,
            ) {
                Ok(true) => {}
                Ok(false) => extra.push("reading does not replay from the seed".to_string()),
                Err(e) => extra.push(format!("reading cannot be replayed: {e}")),
            }
        }
        audit.check_epoch(index, epoch, extra);
    }

    audit.check_last_epoch_at(
        soul.last_epoch_at(),
        soul.epochs().last().map(|e| e.timestamp),
    );
    audit.finish()
}

/// Audit an untrusted JSON document that claims to be a soul.
///
/// Shape problems (missing fields, wrong types, negative or fractional
/// sequence numbers) are reported per field; every epoch that does parse is
/// then held to the same checks as [`verification_report`].
pub fn verification_report_json(document: &Value) -> VerificationReport {
    let Some(fields) = document.as_object() else {
        let mut audit = Audit::new(None, 0);
        audit.soul_issue("document is not a JSON object");
        return audit.finish();
    };

    let epochs = fields.get("epochs").and_then(Value::as_array);
    let created_at = timestamp_field(fields.get("created_at"));
    let mut audit = Audit::new(created_at, epochs.map_or(0, Vec::len));

    match fields.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => {}
        Some(_) => audit.soul_issue("name is empty"),
        None => audit.soul_issue("name is missing or not a string"),
    }
    match fields.get("secret_seed").and_then(Value::as_str) {
        Some(seed) if is_valid_seed_hex(seed) => {}
        _ => audit.soul_issue(SEED_ISSUE),
    }
    if created_at.is_none() {
        audit.soul_issue("created_at is missing or not an RFC 3339 timestamp");
    }
    let last_epoch_at = match fields.get("last_epoch_at") {
        None | Some(Value::Null) => Some(None),
        Some(value) => timestamp_field(Some(value)).map(Some),
    };
    if last_epoch_at.is_none() {
        audit.soul_issue("last_epoch_at is not an RFC 3339 timestamp");
    }

    let Some(epochs) = epochs else {
        audit.soul_issue("epochs is missing or not an array");
        return audit.finish();
    };

    let mut final_timestamp = None;
    for (index, raw) in epochs.iter().enumerate() {
        final_timestamp = None;
        let mut problems = Vec::new();
        if let Some(problem) = sequence_number_problem(raw) {
            problems.push(problem.to_string());
        }
        match serde_json::from_value::<Epoch>(raw.clone()) {
            Ok(epoch) if problems.is_empty() => {
                final_timestamp = Some(epoch.timestamp);
                audit.check_epoch(index, &epoch, Vec::new());
            }
            Ok(_) => audit.reject(index, problems),
            Err(e) => {
                if problems.is_empty() {
                    problems.push(format!("malformed epoch: {e}"));
                }
                audit.reject(index, problems);
            }
        }
    }

    // The final epoch must parse before lastEpochAt can be compared to it.
    let comparable = epochs.is_empty() || final_timestamp.is_some();
    if let (Some(recorded), true) = (last_epoch_at, comparable) {
        audit.check_last_epoch_at(recorded, final_timestamp);
    }
    audit.finish()
}

const SEED_ISSUE: &str = "secret seed is not 64 lowercase hex characters";

fn timestamp_field(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value.and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn sequence_number_problem(raw: &Value) -> Option<&'static str> {
    let Some(value) = raw.get("sequence_number") else {
        return Some("sequence number is missing");
    };
    if value.as_u64().is_some() {
        return None;
    }
    if value.is_number() {
        Some("sequence number must be a positive integer")
    } else {
        Some("sequence number is not a number")
    }
}

/// Position of an epoch that passed its own checks, kept for the ordering pass.
#[derive(Debug, Clone, Copy)]
struct OrderKey {
    index: usize,
    sequence: u64,
    timestamp: DateTime<Utc>,
}

impl OrderKey {
    fn precedes(&self, later: &OrderKey) -> bool {
        later.sequence > self.sequence && later.timestamp >= self.timestamp
    }
}

/// Longest run of keys where each one precedes the next, as positions into
/// `keys`. Among runs of equal length the one starting earliest wins, so an
/// out-of-order epoch is blamed rather than the epochs around it.
fn longest_ordered_run(keys: &[OrderKey]) -> Vec<usize> {
    // best[i]: length of the longest run starting at keys[i].
    let mut best = vec![1usize; keys.len()];
    for i in (0..keys.len()).rev() {
        for (j, later) in keys.iter().enumerate().skip(i + 1) {
            if keys[i].precedes(later) && best[j] + 1 > best[i] {
                best[i] = best[j] + 1;
            }
        }
    }

    let mut run = Vec::new();
    let mut wanted = best.iter().copied().max().unwrap_or(0);
    let mut last: Option<usize> = None;
    for (pos, key) in keys.iter().enumerate() {
        if wanted == 0 {
            break;
        }
        let follows = last.is_none_or(|l| keys[l].precedes(key));
        if best[pos] == wanted && follows {
            run.push(pos);
            last = Some(pos);
            wanted -= 1;
        }
    }
    run
}

/// Accumulates issues over a soul's epochs.
///
/// Each epoch is first checked on its own. Ordering is settled in
/// [`Audit::finish`] against the longest well-ordered run of the epochs
/// that passed.
struct Audit {
    soul_issues: Vec<String>,
    total_epochs: usize,
    created_at: Option<DateTime<Utc>>,
    rejected: BTreeMap<usize, Vec<String>>,
    passed: Vec<OrderKey>,
}

impl Audit {
    fn new(created_at: Option<DateTime<Utc>>, total_epochs: usize) -> Self {
        Self {
            soul_issues: Vec::new(),
            total_epochs,
            created_at,
            rejected: BTreeMap::new(),
            passed: Vec::new(),
        }
    }

    fn soul_issue(&mut self, issue: &str) {
        self.soul_issues.push(issue.to_string());
    }

    fn check_epoch(&mut self, index: usize, epoch: &Epoch, extra: Vec<String>) {
        let mut problems = epoch_issues(epoch);
        if self.created_at.is_some_and(|created| epoch.timestamp < created) {
            problems.push("timestamp precedes soul creation".to_string());
        }
        problems.extend(extra);

        if problems.is_empty() {
            self.passed.push(OrderKey {
                index,
                sequence: epoch.sequence_number,
                timestamp: epoch.timestamp,
            });
        } else {
            self.reject(index, problems);
        }
    }

    fn reject(&mut self, index: usize, problems: Vec<String>) {
        self.rejected.entry(index).or_default().extend(problems);
    }

    fn check_last_epoch_at(
        &mut self,
        recorded: Option<DateTime<Utc>>,
        final_epoch: Option<DateTime<Utc>>,
    ) {
        if recorded != final_epoch {
            self.soul_issue("last_epoch_at does not match the final epoch");
        }
    }

    /// Reject every passed epoch outside the longest well-ordered run,
    /// describing the conflict with its neighbours in that run.
    fn check_ordering(&mut self) {
        let run = longest_ordered_run(&self.passed);
        let keys = std::mem::take(&mut self.passed);
        let mut kept = run.iter().copied().peekable();
        let mut previous: Option<OrderKey> = None;

        for (pos, key) in keys.iter().enumerate() {
            if kept.peek() == Some(&pos) {
                kept.next();
                previous = Some(*key);
                continue;
            }
            let next = kept.peek().map(|&p| keys[p]);
            let mut problems = Vec::new();
            if let Some(prev) = previous {
                if key.sequence <= prev.sequence {
                    problems.push(format!(
                        "sequence number {} does not follow {}",
                        key.sequence, prev.sequence
                    ));
                }
                if key.timestamp < prev.timestamp {
                    problems.push("timestamp precedes the previous epoch".to_string());
                }
            }
            if let Some(next) = next {
                if key.sequence >= next.sequence {
                    problems.push(format!(
                        "sequence number {} is not below {} of a later epoch",
                        key.sequence, next.sequence
                    ));
                }
                if key.timestamp > next.timestamp {
                    problems.push("timestamp is later than the following epoch".to_string());
                }
            }
            self.reject(key.index, problems);
        }
    }

    fn finish(mut self) -> VerificationReport {
        self.check_ordering();
        let invalid_epochs: Vec<usize> = self.rejected.keys().copied().collect();
        let soul_valid = self.soul_issues.is_empty() && invalid_epochs.is_empty();
        let mut issues = self.soul_issues;
        for (index, problems) in self.rejected {
            issues.extend(problems.into_iter().map(|p| format!("epoch[{index}]: {p}")));
        }
        VerificationReport {
            soul_valid,
            epochs_valid: self.total_epochs - invalid_epochs.len(),
            total_epochs: self.total_epochs,
            invalid_epochs,
            issues,
        }
    }
}
