use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::{color::ItemColor, error::SpinError};

pub const MIN_ITEMS: usize = 2;
const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const DEFAULT_LABELS: [&str; 8] = [
    "Monopoly",
    "Catan",
    "7 Wonders",
    "Dixit",
    "Uno",
    "Scrabble",
    "Risk",
    "Carcassonne",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub label: String,
    pub color: ItemColor,
}

impl Item {
    pub fn new(label: impl Into<String>, color: ItemColor) -> Self {
        Self::with_id(generate_id(&mut rand::rng()), label, color)
    }

    pub fn with_id(id: impl Into<String>, label: impl Into<String>, color: ItemColor) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color,
        }
    }

    /// Shortened label for drawing on a segment.
    pub fn display_label(&self) -> String {
        if self.label.chars().count() > 15 {
            let head: String = self.label.chars().take(12).collect();
            format!("{}...", head)
        } else {
            self.label.clone()
        }
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

pub fn generate_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

pub fn default_items() -> Vec<Item> {
    DEFAULT_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| Item::with_id((i + 1).to_string(), *label, ItemColor::palette(i)))
        .collect()
}

/// The ordered list of candidates shown on the wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemList {
    items: Vec<Item>,
}

impl Default for ItemList {
    fn default() -> Self {
        Self {
            items: default_items(),
        }
    }
}

impl ItemList {
    pub fn new(items: Vec<Item>) -> Result<Self, SpinError> {
        if items.len() < MIN_ITEMS {
            return Err(SpinError::TooFewItems {
                count: items.len(),
                required: MIN_ITEMS,
            });
        }
        Ok(Self { items })
    }

    pub fn add(&mut self, label: &str) -> Result<&Item, SpinError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(SpinError::EmptyLabel);
        }
        let item = Item::new(label, ItemColor::palette(self.items.len()));
        log::debug!("Adding item {:?} ({})", item.label, item.id);
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn remove(&mut self, id: &str) -> Result<Item, SpinError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| SpinError::UnknownItem(id.to_string()))?;
        if self.items.len() <= MIN_ITEMS {
            return Err(SpinError::TooFewItems {
                count: self.items.len() - 1,
                required: MIN_ITEMS,
            });
        }
        let removed = self.items.remove(index);
        log::debug!("Removed item {:?} ({})", removed.label, removed.id);
        Ok(removed)
    }

    pub fn reset(&mut self) {
        self.items = default_items();
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }
}
