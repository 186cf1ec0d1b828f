//! Server-rendered HTML pages.
//!
//! Pages are plain strings built from escaped fragments; there is no
//! template engine. All upstream text goes through `html_escape`.

use std::fmt::Write;

use hollow_core::SearchResult;
use hollow_core::model::DetailSections;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use url::Url;

use crate::handoff::ProductView;

const STYLE: &str = "body{font-family:sans-serif;margin:0;background:#f5f5f5;color:#222}\
main{max-width:72rem;margin:0 auto;padding:1.5rem;background:#fff}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(14rem,1fr));gap:1rem}\
.card{border:1px solid #ddd;border-radius:.75rem;padding:1rem;display:flex;flex-direction:column}\
.card img{width:100%;height:10rem;object-fit:contain}\
.price{color:#16803c;font-weight:600}.old{text-decoration:line-through;color:#999}\
.empty{color:#888;font-style:italic}.error{color:#b91c1c}.tag{background:#fef3c7;padding:.1rem .5rem}";

/// Opens a product only after the resolution round trip returns.
const RESOLVE_SCRIPT: &str = r#"
document.querySelectorAll("button[data-product]").forEach(function (button) {
  button.addEventListener("click", async function () {
    const card = button.closest(".card");
    const status = card.querySelector(".status");
    button.disabled = true;
    status.textContent = "Loading details...";
    try {
      const res = await fetch("/api/resolve", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ product: JSON.parse(button.dataset.product) }),
      });
      const body = await res.json();
      if (!res.ok) throw new Error(body.message || res.statusText);
      status.textContent = "";
      window.open(body.location, "_blank");
    } catch (err) {
      status.textContent = "Could not load details: " + err.message;
      status.className = "status error";
    } finally {
      button.disabled = false;
    }
  });
});
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
         <title>{}</title><style>{STYLE}</style></head><body><main>{body}</main></body></html>",
        text(title)
    )
}

fn rating_line(rating: Option<f64>, reviews: Option<u64>) -> String {
    match (rating, reviews) {
        (Some(rating), Some(reviews)) => format!("<p>★ {rating} ({reviews} reviews)</p>"),
        (Some(rating), None) => format!("<p>★ {rating}</p>"),
        _ => String::new(),
    }
}

/// Upstream URLs are only emitted into attributes when they are http(s).
fn web_url(raw: &str) -> Option<Url> {
    Url::parse(raw.trim()).ok().filter(|url| matches!(url.scheme(), "http" | "https"))
}

fn thumbnail(item: &SearchResult) -> String {
    match item.thumbnail.as_deref().and_then(web_url) {
        Some(src) => format!("<img src=\"{}\" alt=\"{}\">", attr(src.as_str()), attr(&item.title)),
        None => String::new(),
    }
}

fn card(item: &SearchResult) -> String {
    let payload = serde_json::to_string(item).unwrap_or_default();
    let mut html = String::from("<div class=\"card\">");
    html.push_str(&thumbnail(item));
    let _ = write!(html, "<h2>{}</h2><p>{}</p>", text(&item.title), text(&item.source));
    if let Some(snippet) = &item.snippet {
        let _ = write!(html, "<p>{}</p>", text(snippet));
    }
    let _ = write!(html, "<p class=\"price\">{}</p>", text(&item.price));
    if let Some(alt) = &item.alternative_price {
        let _ = write!(html, "<p class=\"old\">{}</p>", text(&alt.price));
    }
    html.push_str(&rating_line(item.rating, item.reviews));
    if let Some(tag) = &item.tag {
        let _ = write!(html, "<p><span class=\"tag\">{}</span></p>", text(tag));
    }
    let _ = write!(
        html,
        "<button type=\"button\" data-product=\"{}\">View Product</button><p class=\"status\"></p></div>",
        attr(&payload)
    );
    html
}

/// Search page, with results when a query was submitted.
pub fn home(query: Option<&str>, results: &[SearchResult]) -> String {
    let mut body = String::from("<h1>Smart Shopping Search</h1>");
    let _ = write!(
        body,
        "<form method=\"get\" action=\"/\"><input type=\"text\" name=\"q\" placeholder=\"Search for products...\" \
         value=\"{}\"> <button type=\"submit\">Search</button></form>",
        attr(query.unwrap_or_default())
    );

    if query.is_some() {
        if results.is_empty() {
            body.push_str("<p class=\"empty\">No results.</p>");
        } else {
            body.push_str("<div class=\"grid\">");
            for item in results {
                body.push_str(&card(item));
            }
            body.push_str("</div>");
        }
    }

    let _ = write!(body, "<script>{RESOLVE_SCRIPT}</script>");
    layout("Smart Shopping Search", &body)
}

fn section(title: &str, items: Vec<String>, empty: &str) -> String {
    let mut html = format!("<section><h2>{}</h2>", text(title));
    if items.is_empty() {
        let _ = write!(html, "<p class=\"empty\">{}</p>", text(empty));
    } else {
        html.push_str("<ul>");
        for item in items {
            let _ = write!(html, "<li>{item}</li>");
        }
        html.push_str("</ul>");
    }
    html.push_str("</section>");
    html
}

/// Anchor for web links; anything else degrades to the bare label.
fn link(href: Option<&str>, label: &str) -> String {
    match href.map(|raw| (raw, web_url(raw))) {
        Some((_, Some(url))) => {
            format!(" <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>", attr(url.as_str()), text(label))
        }
        Some((raw, None)) => {
            tracing::debug!(href = raw, "not linking non-web url");
            format!(" <span>{}</span>", text(label))
        }
        None => String::new(),
    }
}

fn detail_sections(sections: &DetailSections) -> String {
    let specs = sections.specs.iter().map(|s| text(s).into_owned()).collect();

    let sellers = sections
        .sellers
        .iter()
        .map(|s| {
            format!(
                "{} - {}{}",
                text(&s.name),
                text(s.price.as_deref().unwrap_or("N/A")),
                link(s.link.as_deref(), "Visit")
            )
        })
        .collect();

    let related = sections
        .related
        .iter()
        .map(|r| format!("{}{}", text(&r.title), link(r.link.as_deref(), "View")))
        .collect();

    let mut ratings: Vec<String> =
        sections.ratings.iter().map(|r| format!("{} stars: {}", text(&r.stars), r.count)).collect();
    ratings.extend(sections.filters.iter().map(|f| match f.count {
        Some(count) => format!("{} ({count})", text(&f.name)),
        None => text(&f.name).into_owned(),
    }));

    let reviews = sections
        .reviews
        .iter()
        .map(|r| {
            let title = r.title.as_deref().map(|t| format!("<strong>{}</strong><br>", text(t))).unwrap_or_default();
            format!("{title}{}", text(&r.content))
        })
        .collect();

    [
        section("Specifications", specs, "No specifications available."),
        section("Online Sellers", sellers, "No sellers listed."),
        section("Related Products", related, "No related products."),
        section("Ratings & Filters", ratings, "No ratings yet."),
        section("Customer Reviews", reviews, "No reviews yet."),
    ]
    .concat()
}

/// Detail page for a cached product.
pub fn product(view: &ProductView) -> String {
    let item = &view.product.summary;
    let mut body = thumbnail(item);
    let _ = write!(body, "<h1>{}</h1>", text(&item.title));
    if !item.source.is_empty() {
        let _ = write!(body, "<p>Sold by: {}</p>", text(&item.source));
    }
    body.push_str(&rating_line(item.rating, item.reviews));
    if let Some(snippet) = &item.snippet {
        let _ = write!(body, "<p>{}</p>", text(snippet));
    }
    let _ = write!(body, "<p class=\"price\">{}</p>", text(&item.price));
    if let Some(alt) = &item.alternative_price {
        let _ = write!(body, "<p class=\"old\">{}</p>", text(&alt.price));
    }
    if let Some(tag) = &item.tag {
        let _ = write!(body, "<p><span class=\"tag\">{}</span></p>", text(tag));
    }
    body.push_str(&link(item.product_link.as_deref(), "View on Source"));
    body.push_str(&detail_sections(&view.sections));

    layout(&item.title, &body)
}

/// Shown when no cached record exists for the requested product.
pub fn not_found(product_id: &str) -> String {
    let body = format!(
        "<h1>Product not found</h1><p>No details are available for <code>{}</code>. \
         Select the product from a search to load them.</p><p><a href=\"/\">Back to search</a></p>",
        text(product_id)
    );
    layout("Product not found", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{detail, result};
    use hollow_core::merge;

    #[test]
    fn test_home_without_query_has_no_results() {
        let html = home(None, &[]);
        assert!(html.contains("<form"));
        assert!(!html.contains("No results."));
    }

    #[test]
    fn test_home_cards_carry_product_payload() {
        let html = home(Some("shoes"), &[result("A1"), result("A2")]);
        assert_eq!(html.matches("class=\"card\"").count(), 2);
        assert!(html.contains("data-product="));
        assert!(html.contains("&quot;product_id&quot;:&quot;A2&quot;"));
        assert!(html.contains("/api/resolve"));
    }

    #[test]
    fn test_home_empty_results() {
        assert!(home(Some("nothing"), &[]).contains("No results."));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut item = result("A1");
        item.title = "<script>alert(1)</script>".into();
        let html = home(Some("x"), &[item]);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_product_page_sections() {
        let view = ProductView::from(merge(&result("A2"), detail("A2")));
        let html = product(&view);

        assert!(html.contains("Product A2"));
        assert!(html.contains("Shop A2"));
        assert!(html.contains("Works for A2"));
        for heading in ["Specifications", "Online Sellers", "Related Products", "Ratings &amp; Filters", "Customer Reviews"] {
            assert!(html.contains(heading), "missing {heading}");
        }
        assert!(html.contains("No specifications available."));
        assert!(html.contains("No related products."));
    }

    #[test]
    fn test_not_found_page() {
        let html = not_found("A9");
        assert!(html.contains("Product not found"));
        assert!(html.contains("A9"));
    }

    #[test]
    fn test_only_web_links_are_anchors() {
        assert!(link(Some("https://shop.example/p?a=1&b=2"), "Visit").contains("href=\"https://shop.example/p?a=1&amp;b=2\""));
        assert!(link(Some("http://shop.example/"), "Visit").contains("<a href"));

        for hostile in ["javascript:alert(1)", " JavaScript:alert(1)", "data:text/html,<b>x</b>", "vbscript:x", "/relative"] {
            let html = link(Some(hostile), "Visit");
            assert!(!html.contains("<a"), "{hostile} was linked");
            assert!(html.contains("Visit"));
        }
        assert!(link(None, "Visit").is_empty());
    }

    #[test]
    fn test_stored_script_link_is_not_rendered() {
        let mut item = result("A2");
        item.product_link = Some("javascript:alert(document.cookie)".into());
        item.thumbnail = Some("javascript:alert(2)".into());
        let html = product(&ProductView::from(merge(&item, detail("A2"))));

        assert!(!html.contains("javascript:"));
        assert!(html.contains("View on Source"));
        assert!(html.contains("href=\"https://shop.example/p\""));
    }
}
