use std::sync::{Arc, Mutex};

use crate::models::{char_count, derive_rows, TodoItem, TodoRow, MAX_TODO_CHARS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty,
    TooLong { chars: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Empty => write!(f, "to-do text is empty"),
            ValidationError::TooLong { chars } => write!(
                f,
                "to-do text has {chars} characters, limit is {MAX_TODO_CHARS}"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "index {} out of range for list of length {}",
            self.index, self.len
        )
    }
}

impl std::error::Error for IndexError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveError {
    OutOfRange(IndexError),
    /// The item at `index` is not the one the caller last saw there.
    Stale { index: usize },
}

impl std::fmt::Display for RemoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoveError::OutOfRange(err) => write!(f, "{err}"),
            RemoveError::Stale { index } => write!(f, "row {index} changed since it was shown"),
        }
    }
}

impl std::error::Error for RemoveError {}

impl From<IndexError> for RemoveError {
    fn from(value: IndexError) -> Self {
        RemoveError::OutOfRange(value)
    }
}

pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::Empty);
    }
    let chars = char_count(text);
    if chars > MAX_TODO_CHARS {
        return Err(ValidationError::TooLong { chars });
    }
    Ok(())
}

/// The process-wide to-do list. Cloning shares the same list.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<Vec<TodoItem>>>,
}

impl AppState {
    pub fn new(todos: Vec<TodoItem>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(todos)),
        }
    }

    pub fn todos(&self) -> Vec<TodoItem> {
        let guard = self.inner.lock().expect("state poisoned");
        guard.clone()
    }

    pub fn rows(&self) -> Vec<TodoRow> {
        let guard = self.inner.lock().expect("state poisoned");
        derive_rows(&guard)
    }

    pub fn get(&self, index: usize) -> Result<TodoItem, IndexError> {
        let guard = self.inner.lock().expect("state poisoned");
        guard.get(index).cloned().ok_or(IndexError {
            index,
            len: guard.len(),
        })
    }

    pub fn add(&self, text: &str) -> Result<TodoItem, ValidationError> {
        validate_text(text)?;
        let item = TodoItem::new(text);
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.push(item.clone());
        Ok(item)
    }

    pub fn remove_at(&self, index: usize) -> Result<TodoItem, IndexError> {
        let mut guard = self.inner.lock().expect("state poisoned");
        if index >= guard.len() {
            return Err(IndexError {
                index,
                len: guard.len(),
            });
        }
        Ok(guard.remove(index))
    }

    /// Like [`AppState::remove_at`], but only when the item still reads `expected`, so a
    /// row index rendered before an earlier removal cannot delete its neighbour.
    pub fn remove_matching(&self, index: usize, expected: &str) -> Result<TodoItem, RemoveError> {
        let mut guard = self.inner.lock().expect("state poisoned");
        let Some(current) = guard.get(index) else {
            return Err(RemoveError::OutOfRange(IndexError {
                index,
                len: guard.len(),
            }));
        };
        if current.text != expected {
            return Err(RemoveError::Stale { index });
        }
        Ok(guard.remove(index))
    }

    /// Puts back a snapshot taken before a mutation whose write-through failed.
    pub fn restore(&self, todos: Vec<TodoItem>) {
        let mut guard = self.inner.lock().expect("state poisoned");
        *guard = todos;
    }
}
