//! Deciding which record survives when two titles name the same game.
//!
//! The merge engine never talks to a terminal itself. It asks a
//! [`ConflictResolver`] for each conflict, and [`ConflictPolicy`] remembers
//! "apply to all" answers so the resolver is not asked again within the
//! same merge.

use std::collections::VecDeque;
use std::io;

use almanac_core::ReleaseRecord;

/// One resolver answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    KeepIncoming,
    KeepExisting,
    /// Keep the incoming record here and for every later conflict.
    KeepIncomingForAll,
    /// Keep the existing record here and for every later conflict.
    KeepExistingForAll,
}

impl Resolution {
    pub fn keeps_incoming(self) -> bool {
        matches!(self, Self::KeepIncoming | Self::KeepIncomingForAll)
    }
}

/// Two records under one date that name the same game.
#[derive(Debug, Clone, Copy)]
pub struct Conflict<'a> {
    pub date: &'a str,
    pub existing: &'a ReleaseRecord,
    pub incoming: &'a ReleaseRecord,
    /// The titles differ and were matched through the translation table.
    pub by_alias: bool,
}

/// Source of conflict decisions.
pub trait ConflictResolver {
    fn resolve(&mut self, conflict: &Conflict<'_>) -> io::Result<Resolution>;
}

/// Always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedResolver(pub Resolution);

impl ConflictResolver for FixedResolver {
    fn resolve(&mut self, _conflict: &Conflict<'_>) -> io::Result<Resolution> {
        Ok(self.0)
    }
}

/// Replays a fixed sequence of answers and records the titles it was asked
/// about.
#[derive(Debug, Default)]
pub struct ScriptedResolver {
    answers: VecDeque<Resolution>,
    pub asked: Vec<(String, String)>,
}

impl ScriptedResolver {
    pub fn new(answers: impl IntoIterator<Item = Resolution>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

impl ConflictResolver for ScriptedResolver {
    fn resolve(&mut self, conflict: &Conflict<'_>) -> io::Result<Resolution> {
        self.asked.push((
            conflict.existing.title.clone(),
            conflict.incoming.title.clone(),
        ));
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left")
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyState {
    #[default]
    Ask,
    ForceAllIncoming,
    ForceAllExisting,
}

/// Per-merge conflict state machine.
#[derive(Debug, Default)]
pub struct ConflictPolicy {
    state: PolicyState,
}

impl ConflictPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PolicyState {
        self.state
    }

    /// Returns `true` when the incoming record should replace the existing one.
    pub fn decide(
        &mut self,
        conflict: &Conflict<'_>,
        resolver: &mut dyn ConflictResolver,
    ) -> io::Result<bool> {
        match self.state {
            PolicyState::ForceAllIncoming => return Ok(true),
            PolicyState::ForceAllExisting => return Ok(false),
            PolicyState::Ask => {}
        }

        let answer = resolver.resolve(conflict)?;
        match answer {
            Resolution::KeepIncomingForAll => self.state = PolicyState::ForceAllIncoming,
            Resolution::KeepExistingForAll => self.state = PolicyState::ForceAllExisting,
            Resolution::KeepIncoming | Resolution::KeepExisting => {}
        }
        Ok(answer.keeps_incoming())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conflict<'a>(a: &'a ReleaseRecord, b: &'a ReleaseRecord) -> Conflict<'a> {
        Conflict {
            date: "2026-03-15",
            existing: a,
            incoming: b,
            by_alias: false,
        }
    }

    #[test]
    fn force_state_stops_asking() {
        let a = ReleaseRecord::new("A");
        let b = ReleaseRecord::new("a");
        let mut resolver = ScriptedResolver::new([Resolution::KeepExistingForAll]);
        let mut policy = ConflictPolicy::new();

        assert!(!policy.decide(&conflict(&a, &b), &mut resolver).unwrap());
        assert_eq!(policy.state(), PolicyState::ForceAllExisting);
        // The script is exhausted, so a second question would fail.
        assert!(!policy.decide(&conflict(&a, &b), &mut resolver).unwrap());
        assert_eq!(resolver.asked.len(), 1);
    }

    #[test]
    fn single_answers_keep_asking() {
        let a = ReleaseRecord::new("A");
        let b = ReleaseRecord::new("a");
        let mut resolver =
            ScriptedResolver::new([Resolution::KeepIncoming, Resolution::KeepExisting]);
        let mut policy = ConflictPolicy::new();

        assert!(policy.decide(&conflict(&a, &b), &mut resolver).unwrap());
        assert!(!policy.decide(&conflict(&a, &b), &mut resolver).unwrap());
        assert_eq!(policy.state(), PolicyState::Ask);
    }

    #[test]
    fn exhausted_script_is_an_error() {
        let a = ReleaseRecord::new("A");
        let mut resolver = ScriptedResolver::default();
        let mut policy = ConflictPolicy::new();
        let err = policy.decide(&conflict(&a, &a), &mut resolver).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
