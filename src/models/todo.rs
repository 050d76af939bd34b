use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A row of the remote `todos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Server-assigned identifier.
    pub id: i64,
    /// Rows inserted with a missing title come back as `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub complete: bool,
    /// Owner of the row.
    pub user_id: Uuid,
}

/// Insert payload for a new todo. New rows always start incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTodo {
    pub title: String,
    pub complete: bool,
    pub user_id: Uuid,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            title: title.into(),
            complete: false,
            user_id,
        }
    }
}

/// Form body of `POST /add`. The title is not validated.
#[derive(Debug, Deserialize)]
pub struct AddTodoForm {
    #[serde(default)]
    pub title: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
