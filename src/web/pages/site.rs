//! Static pages: about, tech and the custom "page not found".

use maud::{html, Markup};

use crate::components::{BaseLayout, SITE_NAME};
use crate::db::User;

/// Render `/about/author/`.
#[must_use]
pub fn render_about_author_page(user: Option<&User>) -> Markup {
    let content = html! {
        h1 { "About the author" }
        p {
            (SITE_NAME) " is a small blogging platform: write posts, "
            "file them into groups, follow the authors you like and "
            "discuss everything in the comments."
        }
    };

    BaseLayout::new("About the author", user).render(content)
}

/// Render `/about/tech/`.
#[must_use]
pub fn render_about_tech_page(user: Option<&User>) -> Markup {
    let content = html! {
        h1 { "Technologies" }
        ul {
            li { "axum and tower-http for HTTP" }
            li { "SQLite through sqlx for storage" }
            li { "maud for server-rendered HTML" }
            li { "argon2 for password hashing" }
        }
    };

    BaseLayout::new("Technologies", user).render(content)
}

/// Render the custom 404 page.
#[must_use]
pub fn render_not_found_page() -> Markup {
    let content = html! {
        div class="not-found" {
            h1 { "Page not found" }
            p { "The page you requested does not exist." }
            a href="/" { "Back to the home page" }
        }
    };

    BaseLayout::new("Page not found", None).render(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_page() {
        let html = render_not_found_page().into_string();
        assert!(html.contains("<h1>Page not found</h1>"));
        assert!(html.contains("<title>Page not found - Yatube</title>"));
    }
}
