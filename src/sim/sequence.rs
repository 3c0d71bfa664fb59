//! Spawn patterns and the planner that hands them out in order
//!
//! A session's whole token sequence is prepared up front: a fixed opening
//! followed by a long random tail. Tokens are consumed through a cursor and
//! never replayed.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One named spawn shape, deciding object count and timing for a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnToken {
    /// One object, never a bomb
    SingleSafe,
    /// One object of any kind
    SingleAny,
    /// One safe object plus one forced bomb
    DoubleOneBomb,
    Double,
    Triple,
    Quadruple,
    /// Five objects spread over the chain delay
    Chain,
    /// Five objects packed into half the chain delay
    FastChain,
}

/// Constraint on the kind an individual slot may produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnSlot {
    /// Normal or Fast only
    NoBomb,
    /// Always a bomb
    ForceBomb,
    /// Bomb with probability 1 / (ratio + 1)
    Any,
}

/// Number of objects in a chain batch
pub const CHAIN_LENGTH: usize = 5;

impl SpawnToken {
    pub const ALL: [SpawnToken; 8] = [
        SpawnToken::SingleSafe,
        SpawnToken::SingleAny,
        SpawnToken::DoubleOneBomb,
        SpawnToken::Double,
        SpawnToken::Triple,
        SpawnToken::Quadruple,
        SpawnToken::Chain,
        SpawnToken::FastChain,
    ];

    /// Slots of this pattern, in issue order
    pub fn slots(&self) -> &'static [SpawnSlot] {
        use SpawnSlot::*;
        match self {
            SpawnToken::SingleSafe => &[NoBomb],
            SpawnToken::SingleAny => &[Any],
            SpawnToken::DoubleOneBomb => &[NoBomb, ForceBomb],
            SpawnToken::Double => &[Any, Any],
            SpawnToken::Triple => &[Any, Any, Any],
            SpawnToken::Quadruple => &[Any, Any, Any, Any],
            SpawnToken::Chain | SpawnToken::FastChain => &[Any, Any, Any, Any, Any],
        }
    }

    /// Objects produced by one batch of this token
    pub fn cardinality(&self) -> usize {
        self.slots().len()
    }

    /// Divisor applied to the chain delay between consecutive chain slots.
    /// `None` for patterns that spawn everything on the same tick.
    pub fn chain_divisor(&self) -> Option<f32> {
        match self {
            SpawnToken::Chain => Some(5.0),
            SpawnToken::FastChain => Some(10.0),
            _ => None,
        }
    }

    /// Offsets (seconds, relative to the batch) at which each slot is issued
    pub fn slot_offsets(&self, chain_delay: f32) -> Vec<f32> {
        match self.chain_divisor() {
            Some(divisor) => (0..self.cardinality())
                .map(|i| chain_delay / divisor * i as f32)
                .collect(),
            None => vec![0.0; self.cardinality()],
        }
    }
}

/// Prepared token sequence plus its read cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencePlanner {
    tokens: Vec<SpawnToken>,
    cursor: usize,
}

impl SequencePlanner {
    /// Build the opening followed by `random_tail` uniformly drawn tokens
    pub fn new<R: Rng>(opening: &[SpawnToken], random_tail: usize, rng: &mut R) -> Self {
        let mut tokens = Vec::with_capacity(opening.len() + random_tail);
        tokens.extend_from_slice(opening);
        for _ in 0..random_tail {
            let index = rng.random_range(0..SpawnToken::ALL.len());
            tokens.push(SpawnToken::ALL[index]);
        }
        Self { tokens, cursor: 0 }
    }

    /// Planner over an explicit sequence (scripted sessions and tests)
    pub fn from_tokens(tokens: Vec<SpawnToken>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Hand out the next token and advance the cursor.
    ///
    /// Exhaustion is not reachable in a normal session; it is logged and
    /// reported as `None` so the caller can skip the batch.
    pub fn next_token(&mut self) -> Option<SpawnToken> {
        let Some(&token) = self.tokens.get(self.cursor) else {
            log::error!(
                "Spawn sequence exhausted after {} tokens; skipping batch",
                self.tokens.len()
            );
            return None;
        };
        self.cursor += 1;
        Some(token)
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.cursor
    }

    pub fn tokens(&self) -> &[SpawnToken] {
        &self.tokens
    }
}
