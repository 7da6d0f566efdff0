//! Ordered header of keyword/value/comment cards
//!
//! The header is the data being validated. Card order is significant since
//! fields may declare a fixed position. Keywords are stored upper-cased.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

/// One keyword/value/comment triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub keyword: String,
    #[serde(default = "undefined")]
    pub value: Value,
    #[serde(default)]
    pub comment: String,
}

fn undefined() -> Value {
    Value::Undefined
}

impl Card {
    pub fn new(keyword: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            keyword: normalize(&keyword.into()),
            value: value.into(),
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

fn normalize(keyword: &str) -> String {
    keyword.trim().to_uppercase()
}

/// An ordered collection of cards with unique keywords
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a card value, keeping its position if the keyword already exists
    pub fn set(&mut self, keyword: &str, value: impl Into<Value>) {
        let keyword = normalize(keyword);
        let value = value.into();
        match self.cards.iter_mut().find(|c| c.keyword == keyword) {
            Some(card) => card.value = value,
            None => self.cards.push(Card {
                keyword,
                value,
                comment: String::new(),
            }),
        }
    }

    /// Set a card value and comment, keeping its position if present
    pub fn set_with_comment(
        &mut self,
        keyword: &str,
        value: impl Into<Value>,
        comment: impl Into<String>,
    ) {
        self.push_card(Card::new(keyword, value).with_comment(comment));
    }

    /// Insert a whole card, replacing an existing card with the same keyword in place
    pub fn push_card(&mut self, card: Card) {
        let card = Card {
            keyword: normalize(&card.keyword),
            ..card
        };
        match self.cards.iter_mut().find(|c| c.keyword == card.keyword) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&Card> {
        let keyword = normalize(keyword);
        self.cards.iter().find(|c| c.keyword == keyword)
    }

    pub fn value(&self, keyword: &str) -> Option<&Value> {
        self.get(keyword).map(|c| &c.value)
    }

    /// 0-based index of a keyword
    pub fn position(&self, keyword: &str) -> Option<usize> {
        let keyword = normalize(keyword);
        self.cards.iter().position(|c| c.keyword == keyword)
    }

    /// Card and its index, as consumed by field validation
    pub fn entry(&self, keyword: &str) -> Option<(usize, &Card)> {
        let keyword = normalize(keyword);
        self.cards
            .iter()
            .enumerate()
            .find(|(_, c)| c.keyword == keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    pub fn remove(&mut self, keyword: &str) -> Option<Card> {
        let index = self.position(keyword)?;
        Some(self.cards.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|c| c.keyword.as_str())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl FromIterator<Card> for Header {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut header = Header::new();
        for card in iter {
            header.push_card(card);
        }
        header
    }
}

impl<'a> IntoIterator for &'a Header {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

/// Mapping entry form: either a bare value or `{value, comment}`
#[derive(Deserialize)]
#[serde(untagged)]
enum CardEntry {
    Full {
        #[serde(default = "undefined")]
        value: Value,
        #[serde(default)]
        comment: String,
    },
    Bare(Value),
}

struct HeaderVisitor;

impl<'de> Visitor<'de> for HeaderVisitor {
    type Value = Header;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a list of cards or a mapping of keyword to value")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Header, A::Error> {
        let mut header = Header::new();
        while let Some(card) = seq.next_element::<Card>()? {
            if card.keyword.trim().is_empty() {
                return Err(de::Error::custom("card keyword must not be empty"));
            }
            header.push_card(card);
        }
        Ok(header)
    }

    // Entries are consumed in document order, so ordering survives
    // regardless of the backing map type of the source format.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Header, A::Error> {
        let mut header = Header::new();
        while let Some((keyword, entry)) = map.next_entry::<String, CardEntry>()? {
            let card = match entry {
                CardEntry::Full { value, comment } => Card::new(keyword, value).with_comment(comment),
                CardEntry::Bare(value) => Card::new(keyword, value),
            };
            header.push_card(card);
        }
        Ok(header)
    }
}

impl<'de> Deserialize<'de> for Header {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(HeaderVisitor)
    }
}
