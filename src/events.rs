use crate::models::TodoRow;

pub const EVENT_TODOS_UPDATED: &str = "todos_updated";
pub const EVENT_TOAST: &str = "toast";

#[derive(Debug, Clone, serde::Serialize)]
pub struct RowsPayload {
    pub rows: Vec<TodoRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ToastPayload {
    pub id: u64,
    pub message: String,
    pub visible: bool,
}
