//! HTML pages.
//!
//! The app serves four small pages, so they are rendered with `format!` into a
//! shared layout rather than through a template engine. Every value that came
//! from a user or from the backend goes through [`escape`].

use actix_web::http::StatusCode;

use crate::models::Todo;

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Escapes text for use in HTML element content and double-quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Tallylist</title>
</head>
<body>
<nav><a href="/">Tallylist</a> · <a href="/home">My list</a> · <a href="/about">About</a></nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}

fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(r#"<p class="error" role="alert">{}</p>"#, escape(message)),
        None => String::new(),
    }
}

/// The landing page with the combined login/signup form.
pub fn landing(error: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Welcome to Tallylist</h1>
{banner}
<form method="post" action="/auth">
  <label>Email <input type="email" name="email" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit" name="action" value="login">Log in</button>
  <button type="submit" name="action" value="signup">Sign up</button>
</form>"#,
        banner = error_banner(error),
    );
    layout("Welcome", &body)
}

/// The signed-in user's list, in the order given.
pub fn home(email: &str, todos: &[Todo]) -> String {
    let mut items = String::new();
    for todo in todos {
        let title = if todo.complete {
            format!("<s>{}</s>", escape(&todo.title))
        } else {
            escape(&todo.title)
        };
        let toggle_label = if todo.complete { "Undo" } else { "Done" };
        items.push_str(&format!(
            "  <li data-id=\"{id}\">{title} <a href=\"/update/{id}\">{toggle_label}</a> <a href=\"/delete/{id}\">Delete</a></li>\n",
            id = todo.id,
        ));
    }
    if todos.is_empty() {
        items.push_str("  <li class=\"empty\">Nothing to do yet.</li>\n");
    }

    let body = format!(
        r#"<h1>Your to-dos</h1>
<p>Signed in as {email}</p>
<form method="post" action="/logout"><button type="submit">Log out</button></form>
<form method="post" action="/add">
  <input type="text" name="title" placeholder="What needs doing?">
  <button type="submit">Add</button>
</form>
<ol id="todos">
{items}</ol>"#,
        email = escape(email),
        items = items,
    );
    layout("My list", &body)
}

pub fn about() -> String {
    let body = r#"<h1>About</h1>
<p>Tallylist is a small to-do list. Sign in, add items, tick them off.
Accounts and lists are stored with a hosted backend service.</p>"#;
    layout("About", body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<h1>{code} {reason}</h1>
<p>{message}</p>
<p><a href="/">Back to the start page</a></p>"#,
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
        message = escape(message),
    );
    layout("Error", &body)
}
