use serde::{Deserialize, Serialize};

/// Longest accepted item, counted in Unicode scalar values rather than bytes.
pub const MAX_TODO_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub text: String,
}

/// Length as the limit counts it: Unicode scalar values, not bytes.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

impl TodoItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One rendered line of the list. `index` is the position the frontend sends back
/// when the row is checked off or copied.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TodoRow {
    pub index: usize,
    pub text: String,
}

pub fn derive_rows(todos: &[TodoItem]) -> Vec<TodoRow> {
    todos
        .iter()
        .enumerate()
        .map(|(index, todo)| TodoRow {
            index,
            text: todo.text.clone(),
        })
        .collect()
}
