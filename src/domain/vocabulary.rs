use serde::{Serialize, Deserialize};

use crate::error::{Result, SynthesisError};
use crate::domain::record::LookupRecord;

/// A vocabulary element. The index is the token's position inside its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    Key(usize),
    Value(usize),
}

impl Token {
    pub fn is_value(&self) -> bool {
        matches!(self, Token::Value(_))
    }
}

/// Label for output slots that belong to no token.
pub const PAD_LABEL: &str = "<pad>";

/// Two disjoint token classes, keys and values, identified by display name.
///
/// Token numbers are contiguous: values take `0..V`, keys take `V..V+K`.
/// The token number doubles as the output-logit index.
///
/// The network reads tokens as raw integers ("input codes"), never as
/// one-hot vectors. Codes are unsigned: the depth-padding layers forward
/// quantities through a bare ReLU, which is only lossless for non-negative
/// inputs, so a vocabulary with negative codes must never reach synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub keys: Vec<String>,
    pub values: Vec<String>,
}

impl Vocabulary {
    pub fn new(keys: Vec<String>, values: Vec<String>) -> Result<Vocabulary> {
        let vocab = Vocabulary { keys, values };
        vocab.validate()?;
        Ok(vocab)
    }

    /// `A, B, C, …` keys and `1, 2, 3, …` values.
    pub fn with_counts(key_count: usize, value_count: usize) -> Result<Vocabulary> {
        let keys = (0..key_count).map(key_name).collect();
        let values = (1..=value_count).map(|v| v.to_string()).collect();
        Vocabulary::new(keys, values)
    }

    /// The three-letter, three-number vocabulary the teaching tool ships with.
    pub fn reference() -> Vocabulary {
        Vocabulary {
            keys: vec!["A".into(), "B".into(), "C".into()],
            values: vec!["1".into(), "2".into(), "3".into()],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.keys.len() < 2 {
            return Err(SynthesisError::InvalidVocabulary(format!(
                "need at least 2 keys so that key1 != key2 is satisfiable, got {}",
                self.keys.len()
            )));
        }
        if self.values.is_empty() {
            return Err(SynthesisError::InvalidVocabulary("no value tokens".into()));
        }
        let mut names: Vec<&str> = self.keys.iter().chain(&self.values).map(String::as_str).collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(SynthesisError::InvalidVocabulary(format!(
                "token name {:?} is used twice",
                pair[0]
            )));
        }
        Ok(())
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Output cardinality, `2·max(K, V)`. Slots past `V + K` are padding.
    pub fn output_size(&self) -> usize {
        2 * self.key_count().max(self.value_count())
    }

    /// Largest raw integer a value slot can carry.
    pub fn max_value_code(&self) -> u32 {
        self.value_count() as u32
    }

    pub fn token_number(&self, token: Token) -> usize {
        match token {
            Token::Value(i) => i,
            Token::Key(i) => self.value_count() + i,
        }
    }

    /// Inverse of `token_number`; `None` for padding slots.
    pub fn token_at(&self, number: usize) -> Option<Token> {
        let v = self.value_count();
        if number < v {
            Some(Token::Value(number))
        } else if number < v + self.key_count() {
            Some(Token::Key(number - v))
        } else {
            None
        }
    }

    /// The raw integer the network reads for `token`.
    ///
    /// Values read their magnitude `i + 1`, so `0` is free to mean "no
    /// contribution"; keys read their token number.
    pub fn input_code(&self, token: Token) -> u32 {
        match token {
            Token::Value(i) => i as u32 + 1,
            Token::Key(_) => self.token_number(token) as u32,
        }
    }

    pub fn name(&self, token: Token) -> &str {
        match token {
            Token::Key(i) => &self.keys[i],
            Token::Value(i) => &self.values[i],
        }
    }

    pub fn token(&self, name: &str) -> Option<Token> {
        if let Some(i) = self.keys.iter().position(|k| k == name) {
            return Some(Token::Key(i));
        }
        self.values.iter().position(|v| v == name).map(Token::Value)
    }

    pub fn output_labels(&self) -> Vec<String> {
        (0..self.output_size())
            .map(|n| match self.token_at(n) {
                Some(t) => self.name(t).to_owned(),
                None => PAD_LABEL.to_owned(),
            })
            .collect()
    }

    /// Every record with `key1 != key2`, in lexicographic index order.
    pub fn records(&self) -> Vec<LookupRecord> {
        let (k, v) = (self.key_count(), self.value_count());
        let mut out = Vec::with_capacity(k * k.saturating_sub(1) * v * v * k);
        for key1 in 0..k {
            for value1 in 0..v {
                for key2 in (0..k).filter(|&key2| key2 != key1) {
                    for value2 in 0..v {
                        for query in 0..k {
                            out.push(LookupRecord { key1, value1, key2, value2, query });
                        }
                    }
                }
            }
        }
        out
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::reference()
    }
}

fn key_name(i: usize) -> String {
    if i < 26 {
        char::from(b'A' + i as u8).to_string()
    } else {
        format!("K{i}")
    }
}
