pub mod todo;
pub mod user;

pub use todo::{AddTodoForm, NewTodo, Todo};
pub use user::{AuthForm, CredentialsForm};
