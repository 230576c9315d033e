//! Recurring-identity store
//!
//! A bounded roster of Regular identities, oldest first, plus the knowledge
//! and member templates each one last checkpointed.

use std::collections::VecDeque;

use ahash::AHashMap;

use crate::core::types::{Coord, PartyToken};
use crate::knowledge::KnowledgeMap;
use crate::party::{MemberTemplate, Party};

/// What a Regular identity carries between incarnations
#[derive(Debug, Clone, PartialEq)]
pub struct PartyMemory {
    pub knowledge: KnowledgeMap,
    pub exit_known: bool,
    pub exit_pos: Option<Coord>,
    pub member_templates: Vec<MemberTemplate>,
}

impl PartyMemory {
    /// Snapshot a party; templates are supplied by the caller
    pub fn capture(party: &Party, member_templates: Vec<MemberTemplate>) -> Self {
        Self {
            knowledge: party.knowledge.clone(),
            exit_known: party.exit_known,
            exit_pos: party.exit_pos,
            member_templates,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecurringStore {
    pool_size: usize,
    roster: VecDeque<PartyToken>,
    memory: AHashMap<PartyToken, PartyMemory>,
}

impl RecurringStore {
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size: pool_size.max(1),
            roster: VecDeque::new(),
            memory: AHashMap::new(),
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Roster in enrolment order, oldest first
    pub fn roster(&self) -> impl Iterator<Item = &PartyToken> {
        self.roster.iter()
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn contains(&self, token: &PartyToken) -> bool {
        self.roster.contains(token)
    }

    /// Admit an identity, evicting the oldest (and its memory) when full
    ///
    /// Returns the evicted identity. Enrolling a known identity is a no-op.
    pub fn enroll(&mut self, token: PartyToken) -> Option<PartyToken> {
        if self.contains(&token) {
            return None;
        }
        self.roster.push_back(token);
        if self.roster.len() > self.pool_size {
            let evicted = self.roster.pop_front()?;
            self.memory.remove(&evicted);
            return Some(evicted);
        }
        None
    }

    /// Replace an identity's memory wholesale
    ///
    /// Ignored for identities no longer on the roster.
    pub fn checkpoint(&mut self, token: &PartyToken, memory: PartyMemory) -> bool {
        if !self.contains(token) {
            return false;
        }
        self.memory.insert(token.clone(), memory);
        true
    }

    pub fn recall(&self, token: &PartyToken) -> Option<&PartyMemory> {
        self.memory.get(token)
    }

    pub fn forget_all(&mut self) {
        self.roster.clear();
        self.memory.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> PartyMemory {
        PartyMemory {
            knowledge: KnowledgeMap::blank(4, 4),
            exit_known: false,
            exit_pos: None,
            member_templates: Vec::new(),
        }
    }

    #[test]
    fn test_eviction_drops_oldest_and_its_memory() {
        let mut store = RecurringStore::new(3);
        let tokens: Vec<PartyToken> = ["aaaaa", "bbbbb", "ccccc", "ddddd"]
            .into_iter()
            .map(PartyToken::new)
            .collect();

        for t in &tokens[..3] {
            assert_eq!(store.enroll(t.clone()), None);
            assert!(store.checkpoint(t, memory()));
        }
        assert_eq!(store.enroll(tokens[3].clone()), Some(tokens[0].clone()));

        assert_eq!(store.len(), 3);
        assert!(!store.contains(&tokens[0]));
        assert!(store.recall(&tokens[0]).is_none());
        assert!(store.recall(&tokens[1]).is_some());
        let roster: Vec<_> = store.roster().cloned().collect();
        assert_eq!(roster, tokens[1..].to_vec());
    }

    #[test]
    fn test_enroll_is_idempotent() {
        let mut store = RecurringStore::new(2);
        assert_eq!(store.enroll(PartyToken::new("x")), None);
        assert_eq!(store.enroll(PartyToken::new("x")), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_checkpoint_replaces_and_requires_roster() {
        let mut store = RecurringStore::new(3);
        let t = PartyToken::new("q1w2e");
        assert!(!store.checkpoint(&t, memory()));

        store.enroll(t.clone());
        store.checkpoint(&t, memory());
        let mut later = memory();
        later.exit_known = true;
        later.exit_pos = Some(Coord::new(3, 2));
        store.checkpoint(&t, later.clone());
        assert_eq!(store.recall(&t), Some(&later));
    }
}
