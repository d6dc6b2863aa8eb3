//! Page templates.
//!
//! Templates are compiled into the binary with `include_str!` and registered
//! with Tera once at startup. HTML auto-escaping is on for every page.

use axum::response::Html;
use tera::{Context, Tera};
use todo_lists_web::AppError;

const TEMPLATES: [(&str, &str); 5] = [
    ("layout.html", include_str!("../templates/layout.html")),
    ("lists.html", include_str!("../templates/lists.html")),
    ("new_list.html", include_str!("../templates/new_list.html")),
    ("list.html", include_str!("../templates/list.html")),
    ("edit_list.html", include_str!("../templates/edit_list.html")),
];

/// Compiled page templates.
#[derive(Debug)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Compile the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns the Tera error if a template does not parse.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        tera.autoescape_on(vec![".html"]);
        Ok(Self { tera })
    }

    /// Render a page.
    ///
    /// # Errors
    ///
    /// Returns an internal [`AppError`] if rendering fails.
    pub fn render(&self, name: &str, context: &Context) -> Result<Html<String>, AppError> {
        self.tera.render(name, context).map(Html).map_err(|e| {
            AppError::internal("An internal error occurred")
                .with_source(anyhow::anyhow!("failed to render {name}: {e:?}"))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::views::ListView;
    use todo_lists_core::{FlashState, ListId, TodoList};

    fn list(name: &str, count: i64, remaining: i64) -> ListView {
        ListView::from(TodoList {
            id: ListId::new(1),
            name: name.to_string(),
            todos_count: count,
            todos_remaining_count: remaining,
        })
    }

    fn lists_page(lists: &[ListView], flash: &FlashState) -> String {
        let templates = Templates::new().unwrap();
        let mut context = Context::new();
        context.insert("lists", lists);
        context.insert("flash", flash);
        templates.render("lists.html", &context).unwrap().0
    }

    #[test]
    fn test_all_templates_compile() {
        assert!(Templates::new().is_ok());
    }

    #[test]
    fn test_names_are_escaped() {
        let html = lists_page(&[list("<script>alert(1)</script>", 0, 0)], &FlashState::new());

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn test_layout_shows_flash_messages() {
        let mut flash = FlashState::new();
        flash.set_success("The list has been created.");

        let html = lists_page(&[], &flash);

        assert!(html.contains("The list has been created."));
    }

    #[test]
    fn test_complete_list_gets_class() {
        let html = lists_page(&[list("Groceries", 2, 0)], &FlashState::new());

        assert!(html.contains("class=\"complete\""));
        assert!(html.contains("0 / 2"));
    }
}
