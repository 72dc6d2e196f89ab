//! Per-player item store attached to the progression capability.
//!
//! The store is ordered by insertion and bounded so that a full store still
//! fits in one snapshot frame. Moving items in and out of the player's
//! inventory is the host's job; the store only records what it holds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use monarch_core::{ErrorSeverity, GameError};

/// A stack of one item kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Registry identifier, e.g. `"minecraft:diamond"`.
    pub item: String,
    pub count: u32,
}

impl ItemStack {
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("cannot store an empty stack")]
    EmptyStack,

    #[error("item id is {len} bytes, limit is {max}")]
    ItemIdTooLong { len: usize, max: usize },

    #[error("store is full ({capacity} stacks)")]
    Full { capacity: usize },

    #[error("no stored stack at slot {index} (store holds {len})")]
    NoSuchSlot { index: usize, len: usize },
}

impl GameError for StorageError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyStack => "STORAGE_EMPTY_STACK",
            Self::ItemIdTooLong { .. } => "STORAGE_INVALID_ITEM",
            Self::Full { .. } => "STORAGE_FULL",
            Self::NoSuchSlot { .. } => "STORAGE_NO_SUCH_SLOT",
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::EmptyStack => "There is nothing to store.".to_string(),
            Self::ItemIdTooLong { .. } => "That item cannot be stored.".to_string(),
            Self::Full { capacity } => format!("Your storage is full ({capacity} stacks)."),
            Self::NoSuchSlot { .. } => "That storage slot is empty.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemStorage {
    stacks: Vec<ItemStack>,
}

impl ItemStorage {
    /// Stacks one store may hold.
    pub const CAPACITY: usize = 256;
    /// Longest accepted item id, in bytes.
    pub const MAX_ITEM_ID_LEN: usize = 128;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stacks(stacks: Vec<ItemStack>) -> Self {
        Self { stacks }
    }

    /// Whether `stack` would be accepted by [`store`](Self::store).
    pub fn check(&self, stack: &ItemStack) -> Result<(), StorageError> {
        if stack.count == 0 || stack.item.is_empty() {
            return Err(StorageError::EmptyStack);
        }
        if stack.item.len() > Self::MAX_ITEM_ID_LEN {
            return Err(StorageError::ItemIdTooLong {
                len: stack.item.len(),
                max: Self::MAX_ITEM_ID_LEN,
            });
        }
        if self.stacks.len() >= Self::CAPACITY {
            return Err(StorageError::Full {
                capacity: Self::CAPACITY,
            });
        }
        Ok(())
    }

    /// Appends a stack; returns its slot.
    pub fn store(&mut self, stack: ItemStack) -> Result<usize, StorageError> {
        self.check(&stack)?;
        self.stacks.push(stack);
        Ok(self.stacks.len() - 1)
    }

    /// Removes the stack at `index`; later slots shift down by one.
    pub fn withdraw(&mut self, index: usize) -> Result<ItemStack, StorageError> {
        if index >= self.stacks.len() {
            return Err(StorageError::NoSuchSlot {
                index,
                len: self.stacks.len(),
            });
        }
        Ok(self.stacks.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.stacks.get(index)
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
