use serde::{Serialize, Deserialize};

use crate::domain::vocabulary::{Token, Vocabulary};
use crate::error::{Result, SynthesisError};

/// Input slot indices of the five-field lookup record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub key1: usize,
    pub value1: usize,
    pub key2: usize,
    pub value2: usize,
    pub query: usize,
}

pub const RECORD_LAYOUT: RecordLayout = RecordLayout {
    key1: 0,
    value1: 1,
    key2: 2,
    value2: 3,
    query: 4,
};

impl RecordLayout {
    pub const WIDTH: usize = 5;

    pub fn slot_names(&self) -> Vec<String> {
        let mut names = vec![String::new(); Self::WIDTH];
        names[self.key1] = "key1".into();
        names[self.value1] = "value1".into();
        names[self.key2] = "key2".into();
        names[self.value2] = "value2".into();
        names[self.query] = "query".into();
        names
    }
}

/// Two associations plus a query, by class-local token index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    pub key1: usize,
    pub value1: usize,
    pub key2: usize,
    pub value2: usize,
    pub query: usize,
}

impl LookupRecord {
    /// Checked constructor. The network itself never validates its inputs;
    /// records that break `key1 != key2` are outside the domain the weights
    /// are correct for.
    pub fn new(
        vocab: &Vocabulary,
        key1: usize,
        value1: usize,
        key2: usize,
        value2: usize,
        query: usize,
    ) -> Result<LookupRecord> {
        let (k, v) = (vocab.key_count(), vocab.value_count());
        if [key1, key2, query].iter().any(|&i| i >= k) || value1 >= v || value2 >= v {
            return Err(SynthesisError::DomainViolation(
                "token index outside the vocabulary".into(),
            ));
        }
        if key1 == key2 {
            return Err(SynthesisError::DomainViolation(format!(
                "key1 and key2 are both {:?}",
                vocab.keys[key1]
            )));
        }
        Ok(LookupRecord { key1, value1, key2, value2, query })
    }

    /// Parses `[key1, value1, key2, value2, query]` by display name.
    pub fn from_names(vocab: &Vocabulary, names: [&str; 5]) -> Result<LookupRecord> {
        let key = |name: &str| match vocab.token(name) {
            Some(Token::Key(i)) => Ok(i),
            _ => Err(SynthesisError::DomainViolation(format!("{name:?} is not a key"))),
        };
        let value = |name: &str| match vocab.token(name) {
            Some(Token::Value(i)) => Ok(i),
            _ => Err(SynthesisError::DomainViolation(format!("{name:?} is not a value"))),
        };
        LookupRecord::new(
            vocab,
            key(names[0])?,
            value(names[1])?,
            key(names[2])?,
            value(names[3])?,
            key(names[4])?,
        )
    }

    /// The symbolic function: the value stored under `query`, or `None` when
    /// the query matches neither key ("don't care").
    pub fn expected(&self) -> Option<Token> {
        if self.query == self.key1 {
            Some(Token::Value(self.value1))
        } else if self.query == self.key2 {
            Some(Token::Value(self.value2))
        } else {
            None
        }
    }

    /// Raw numeric input row laid out per `RECORD_LAYOUT`.
    pub fn encode(&self, vocab: &Vocabulary) -> Vec<f64> {
        let mut row = vec![0.0; RecordLayout::WIDTH];
        let code = |t: Token| vocab.input_code(t) as f64;
        row[RECORD_LAYOUT.key1] = code(Token::Key(self.key1));
        row[RECORD_LAYOUT.value1] = code(Token::Value(self.value1));
        row[RECORD_LAYOUT.key2] = code(Token::Key(self.key2));
        row[RECORD_LAYOUT.value2] = code(Token::Value(self.value2));
        row[RECORD_LAYOUT.query] = code(Token::Key(self.query));
        row
    }

    pub fn describe(&self, vocab: &Vocabulary) -> String {
        format!(
            "({},{},{},{},{})",
            vocab.keys[self.key1],
            vocab.values[self.value1],
            vocab.keys[self.key2],
            vocab.values[self.value2],
            vocab.keys[self.query]
        )
    }
}
