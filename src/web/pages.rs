//! Server-rendered HTML pages
//!
//! Every value interpolated into markup goes through [`escape`].

use std::fmt::Write;

use crate::reading_list::{Book, SearchHit};

/// Cover image used when a saved book has no thumbnail
pub const NO_COVER_URL: &str = "/static/images/no-cover.png";

pub const POPULAR_GENRES: &[&str] = &[
    "Fantasy",
    "Mystery",
    "Romance",
    "Science Fiction",
    "Biography",
    "History",
];

pub struct Testimonial {
    pub text: &'static str,
    pub author: &'static str,
}

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        text: "Bookify helped me discover my new favorite author!",
        author: "Sarah J.",
    },
    Testimonial {
        text: "The recommendations are always spot on.",
        author: "Michael T.",
    },
    Testimonial {
        text: "I've doubled my reading since using Bookify.",
        author: "Priya K.",
    },
];

/// Escape text for use in HTML element content and quoted attributes
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// Posts the data-* attributes of a button as a form and reloads on removal
const BOOK_ACTIONS_SCRIPT: &str = r#"<script>
document.addEventListener('click', async (e) => {
  const btn = e.target.closest('[data-action]');
  if (!btn) return;
  const body = new URLSearchParams(btn.dataset);
  body.delete('action');
  const res = await fetch('/' + btn.dataset.action, {method: 'POST', body});
  const ack = await res.json();
  if (btn.dataset.action === 'remove_book') { location.reload(); return; }
  btn.textContent = ack.status === 'success' ? 'Saved' : 'Already saved';
  btn.disabled = true;
});
</script>"#;

fn layout(title: &str, current_year: i32, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Bookify</title>
</head>
<body>
<nav>
  <a href="/">Bookify</a>
  <a href="/readinglist">Reading List</a>
  <a href="/profile">Profile</a>
  <form action="/search" method="get"><input type="search" name="q" placeholder="Search books"><button>Search</button></form>
</nav>
<main>
{body}
</main>
<footer>&copy; {current_year} Bookify</footer>
{BOOK_ACTIONS_SCRIPT}
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn home(current_year: i32) -> String {
    let mut body = String::from("<h1>Find your next favorite book</h1>\n<section class=\"genres\">\n<h2>Popular genres</h2>\n<ul>\n");
    for genre in POPULAR_GENRES {
        let _ = writeln!(
            body,
            r#"<li><a href="/search?q={}">{}</a></li>"#,
            urlencoding::encode(genre),
            escape(genre)
        );
    }
    body.push_str("</ul>\n</section>\n<section class=\"testimonials\">\n");
    for t in TESTIMONIALS {
        let _ = writeln!(
            body,
            "<blockquote><p>{}</p><cite>{}</cite></blockquote>",
            escape(t.text),
            escape(t.author)
        );
    }
    body.push_str("</section>");

    layout("Home", current_year, &body)
}

fn book_card(book: &Book, action: &str) -> String {
    let cover = if book.thumbnail.is_empty() {
        NO_COVER_URL
    } else {
        book.thumbnail.as_str()
    };
    let button = match action {
        "saved" => "<button disabled>Saved</button>".to_string(),
        _ => {
            let label = if action == "remove_book" {
                "Remove"
            } else {
                "Save"
            };
            format!(
                r#"<button data-action="{action}" data-title="{title}" data-author="{author}" data-description="{description}" data-thumbnail="{thumbnail}">{label}</button>"#,
                title = escape(&book.title),
                author = escape(&book.author),
                description = escape(&book.description),
                thumbnail = escape(&book.thumbnail),
            )
        }
    };

    format!(
        r#"<article class="book">
<img src="{cover}" alt="">
<h3>{title}</h3>
<p class="author">{author}</p>
<p class="description">{description}</p>
{button}
</article>
"#,
        cover = escape(cover),
        title = escape(&book.title),
        author = escape(&book.author),
        description = escape(&book.description),
    )
}

pub fn results(query: &str, hits: &[SearchHit], error: Option<&str>, current_year: i32) -> String {
    let mut body = format!("<h1>Results for &quot;{}&quot;</h1>\n", escape(query));

    if let Some(error) = error {
        let _ = writeln!(
            body,
            r#"<p class="error">Search failed: {}</p>"#,
            escape(error)
        );
    } else if hits.is_empty() {
        body.push_str("<p>No books found.</p>\n");
    }

    for hit in hits {
        let action = if hit.is_saved { "saved" } else { "save_book" };
        body.push_str(&book_card(&hit.book, action));
    }

    layout(&format!("Search: {}", query), current_year, &body)
}

pub fn reading_list(books: &[Book], current_year: i32) -> String {
    let mut body = String::from("<h1>My Reading List</h1>\n");
    if books.is_empty() {
        body.push_str(r#"<p>Your reading list is empty. <a href="/">Find a book</a>.</p>"#);
    }
    for book in books {
        body.push_str(&book_card(book, "remove_book"));
    }

    layout("Reading List", current_year, &body)
}

pub fn profile(reading_list_count: usize, current_year: i32) -> String {
    let plural = if reading_list_count == 1 { "" } else { "s" };
    let body = format!(
        r#"<h1>My Profile</h1>
<p>You have <strong>{reading_list_count}</strong> book{plural} on your reading list.</p>
<section class="challenge">
<h2>{current_year} Reading Challenge</h2>
<p><a href="/readinglist">View your reading list</a></p>
</section>"#
    );

    layout("Profile", current_year, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, thumbnail: &str) -> Book {
        Book {
            title: title.to_string(),
            author: "Frank Herbert".to_string(),
            description: "Spice".to_string(),
            thumbnail: thumbnail.to_string(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_home_lists_genres_and_testimonials() {
        let html = home(2026);
        for genre in POPULAR_GENRES {
            assert!(html.contains(genre));
        }
        assert!(html.contains("/search?q=Science%20Fiction"));
        assert!(html.contains("Priya K."));
        assert!(html.contains("&copy; 2026"));
    }

    #[test]
    fn test_results_escapes_query_and_books() {
        let hits = vec![SearchHit {
            book: book("<script>", ""),
            is_saved: false,
        }];
        let html = results("a<b", &hits, None, 2026);
        assert!(html.contains("a&lt;b"));
        assert!(!html.contains("<h3><script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(NO_COVER_URL));
    }

    #[test]
    fn test_results_saved_and_error() {
        let hits = vec![SearchHit {
            book: book("Dune", "http://img/1.jpg"),
            is_saved: true,
        }];
        let html = results("dune", &hits, None, 2026);
        assert!(html.contains("<button disabled>Saved</button>"));
        assert!(!html.contains(r#"data-action="save_book""#));

        let html = results("dune", &[], Some("Catalog returned status 500"), 2026);
        assert!(html.contains("Search failed: Catalog returned status 500"));
    }

    #[test]
    fn test_reading_list_page() {
        let html = reading_list(&[], 2026);
        assert!(html.contains("Your reading list is empty"));

        let html = reading_list(&[book("Dune", "")], 2026);
        assert!(html.contains(r#"data-action="remove_book""#));
    }

    #[test]
    fn test_profile_page() {
        assert!(profile(1, 2026).contains("<strong>1</strong> book on"));
        let html = profile(3, 2026);
        assert!(html.contains("<strong>3</strong> books on"));
        assert!(html.contains("2026 Reading Challenge"));
    }
}
