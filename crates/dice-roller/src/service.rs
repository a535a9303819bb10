//! Dice service implementations: production, seeded, and scripted.

use rand::rngs::ThreadRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{parse_notation, DiceError, RollSpec};

/// Source of every random number the combat engine consumes.
///
/// The trait is object-safe so engines can hold a `Box<dyn DiceService>`;
/// the generic convenience [`DiceServiceExt::choice`] is layered on top of
/// [`DiceService::choose_index`].
pub trait DiceService {
    /// Rolls `NdS[+|-M]` notation and returns the total.
    fn roll(&mut self, notation: &str) -> Result<i32, DiceError>;

    /// Rolls a single d20 and returns the raw face (no modifiers).
    fn d20(&mut self) -> Result<i32, DiceError>;

    /// Picks an index in `0..len`.
    fn choose_index(&mut self, len: usize) -> Result<usize, DiceError>;
}

/// Generic helpers available on every [`DiceService`], including trait objects.
pub trait DiceServiceExt: DiceService {
    /// Picks one element of `items` uniformly.
    fn choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, DiceError> {
        let index = self.choose_index(items.len())?;
        Ok(&items[index])
    }
}

impl<D: DiceService + ?Sized> DiceServiceExt for D {}

fn roll_spec<R: Rng>(rng: &mut R, spec: &RollSpec) -> i32 {
    let mut total = 0i32;
    for _ in 0..spec.count {
        total += rng.gen_range(1..=spec.sides) as i32;
    }
    total + spec.modifier
}

/// Production dice service backed by the thread-local RNG.
#[derive(Debug)]
pub struct RngDice {
    rng: ThreadRng,
}

impl RngDice {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RngDice {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceService for RngDice {
    fn roll(&mut self, notation: &str) -> Result<i32, DiceError> {
        let spec = parse_notation(notation)?;
        Ok(roll_spec(&mut self.rng, &spec))
    }

    fn d20(&mut self) -> Result<i32, DiceError> {
        Ok(self.rng.gen_range(1..=20))
    }

    fn choose_index(&mut self, len: usize) -> Result<usize, DiceError> {
        if len == 0 {
            return Err(DiceError::EmptyChoice);
        }
        Ok(self.rng.gen_range(0..len))
    }
}

/// Reproducible dice service: the same seed always yields the same stream.
#[derive(Clone, Debug)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DiceService for SeededDice {
    fn roll(&mut self, notation: &str) -> Result<i32, DiceError> {
        let spec = parse_notation(notation)?;
        Ok(roll_spec(&mut self.rng, &spec))
    }

    fn d20(&mut self) -> Result<i32, DiceError> {
        Ok(self.rng.gen_range(1..=20))
    }

    fn choose_index(&mut self, len: usize) -> Result<usize, DiceError> {
        if len == 0 {
            return Err(DiceError::EmptyChoice);
        }
        Ok(self.rng.gen_range(0..len))
    }
}

/// Scripted dice service for tests.
///
/// Values are consumed in call order, one per `roll`/`d20`/`choose_index`
/// call. `roll` returns the scripted value as the final total (notation is
/// still parsed so malformed expressions fail loudly), and `choose_index`
/// reduces the scripted value modulo the sequence length. The service errors
/// once the script runs dry rather than cycling, so a test that draws more
/// than it scripted fails instead of silently reusing values.
#[derive(Clone, Debug)]
pub struct FixedDice {
    values: Vec<i32>,
    cursor: usize,
}

impl FixedDice {
    pub fn new(values: impl Into<Vec<i32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len() - self.cursor
    }

    fn next(&mut self) -> Result<i32, DiceError> {
        let value = self
            .values
            .get(self.cursor)
            .copied()
            .ok_or(DiceError::SequenceExhausted { drawn: self.cursor })?;
        self.cursor += 1;
        Ok(value)
    }
}

impl DiceService for FixedDice {
    fn roll(&mut self, notation: &str) -> Result<i32, DiceError> {
        parse_notation(notation)?;
        self.next()
    }

    fn d20(&mut self) -> Result<i32, DiceError> {
        self.next()
    }

    fn choose_index(&mut self, len: usize) -> Result<usize, DiceError> {
        if len == 0 {
            return Err(DiceError::EmptyChoice);
        }
        Ok(self.next()? as usize % len)
    }
}
