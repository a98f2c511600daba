//! Server-side rendering.
//!
//! Templates are compiled into the binary and registered with Tera once at
//! startup. Every page is rendered with the request's [`Locals`] plus the
//! pending flash, which rendering consumes.

pub mod flash;
pub mod locals;

use tera::{Context, Tera};

use crate::http::error::AppError;

pub use flash::{Flash, FlashKind};
pub use locals::{set_locals, Locals};

const TEMPLATES: [(&str, &str); 5] = [
    (
        "layouts/default.html",
        include_str!("../../templates/layouts/default.html"),
    ),
    ("home.html", include_str!("../../templates/home.html")),
    ("errors/404.html", include_str!("../../templates/errors/404.html")),
    ("errors/500.html", include_str!("../../templates/errors/500.html")),
    (
        "errors/error.html",
        include_str!("../../templates/errors/error.html"),
    ),
];

/// Pages the application can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    NotFound,
    ServerError,
    ErrorDetail,
}

impl View {
    pub fn template(self) -> &'static str {
        match self {
            View::Home => "home.html",
            View::NotFound => "errors/404.html",
            View::ServerError => "errors/500.html",
            View::ErrorDetail => "errors/error.html",
        }
    }
}

/// Template registry.
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    pub fn render(&self, view: View, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(view.template(), context)
    }

    /// Render a full page, taking the pending flash out of the session.
    pub async fn page(&self, locals: &Locals, view: View, extra: Context) -> Result<String, AppError> {
        let flash = match &locals.session {
            Some(session) => Flash::take(session).await?,
            None => None,
        };

        let mut context = locals.context(flash.as_ref());
        context.extend(extra);
        Ok(self.render(view, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_render() {
        let views = Views::new().unwrap();
        let locals = Locals::bare("/");
        let mut context = locals.context(None);
        context.insert(
            "error",
            &serde_json::json!({ "status": 418, "kind": "status", "message": "teapot" }),
        );

        for view in [View::Home, View::NotFound, View::ServerError, View::ErrorDetail] {
            let html = views.render(view, &context).unwrap();
            assert!(html.contains("<main>"), "{view:?} did not extend the layout");
        }
    }

    #[test]
    fn test_flash_and_escaping() {
        let views = Views::new().unwrap();
        let flash = Flash::danger("<b>nope</b>");
        let html = views
            .render(View::Home, &Locals::bare("/app/").context(Some(&flash)))
            .unwrap();

        assert!(html.contains("flash-danger"));
        assert!(html.contains("&lt;b&gt;nope&lt;&#x2F;b&gt;"));
        assert!(html.contains("href=\"/app/\""));
    }
}
