//! Pure panel rendering.
//!
//! Builds a small element tree from a [`SearchResponse`]. Hosts either walk the
//! tree into real DOM nodes or call [`ViewNode::to_html`]. Every clickable row
//! is an `<a>` carrying `data-ls-row` and its position in `data-ls-index`, and
//! [`Panel::targets`] lists the row hrefs in the same order.

use livesearch_core::{CategoryResult, ProductResult, SearchResponse};
use regex::RegexBuilder;

/// Placeholder image for categories without a thumbnail.
pub const CATEGORY_FALLBACK_THUMB: &str = "data:image/svg+xml;utf8,\
%3Csvg xmlns='http://www.w3.org/2000/svg' width='40' height='40' viewBox='0 0 40 40'%3E\
%3Crect width='40' height='40' rx='6' fill='%23f1f3f5'/%3E\
%3Cpath d='M11 14h7l2 3h9v10H11z' fill='none' stroke='%23adb5bd' stroke-width='2'/%3E\
%3C/svg%3E";

pub const NO_RESULTS: &str = "No results";
pub const SEARCHING: &str = "Searching\u{2026}";
pub const SKELETON_ROWS: usize = 4;

/// Injected once per page.
pub const STYLESHEET: &str = r#"
.ls-panel{position:absolute;z-index:99999;background:#fff;border:1px solid #e3e6ea;border-radius:10px;
  box-shadow:0 8px 24px rgba(0,0,0,.12);max-height:70vh;overflow-y:auto;font-size:14px;-webkit-overflow-scrolling:touch}
.ls-section-title{padding:10px 14px 4px;font-size:12px;font-weight:600;text-transform:uppercase;color:#868e96}
.ls-row{display:flex;align-items:center;gap:12px;padding:8px 14px;color:inherit;text-decoration:none;cursor:pointer}
.ls-row:hover,.ls-row.ls-active{background:#f1f3f5}
.ls-thumb{width:40px;height:40px;flex:0 0 40px;border-radius:6px;object-fit:cover;background:#f8f9fa}
.ls-text{min-width:0;flex:1}
.ls-title{white-space:nowrap;overflow:hidden;text-overflow:ellipsis}
.ls-title mark{background:none;color:inherit;font-weight:700}
.ls-meta,.ls-subtitle{font-size:12px;color:#868e96;white-space:nowrap;overflow:hidden;text-overflow:ellipsis}
.ls-empty,.ls-footer{padding:12px 14px;color:#868e96}
.ls-skeleton-row{display:flex;gap:12px;padding:8px 14px}
.ls-skeleton-thumb,.ls-skeleton-line{background:linear-gradient(90deg,#f1f3f5 25%,#e9ecef 37%,#f1f3f5 63%);
  background-size:400% 100%;animation:ls-shimmer 1.2s ease infinite;border-radius:6px}
.ls-skeleton-thumb{width:40px;height:40px}
.ls-skeleton-line{height:12px;margin:6px 0;flex:1}
@keyframes ls-shimmer{0%{background-position:100% 50%}100%{background-position:0 50%}}
"#;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<ViewNode>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, attrs: Vec::new(), children: Vec::new() }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, node: impl Into<ViewNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = ViewNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(ViewNode::Text(text.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    }

    fn add_class(&mut self, class: &str) {
        match self.attrs.iter_mut().find(|(k, _)| *k == "class") {
            Some((_, value)) => {
                value.push(' ');
                value.push_str(class);
            }
            None => self.attrs.push(("class", class.to_string())),
        }
    }
}

impl From<Element> for ViewNode {
    fn from(element: Element) -> Self {
        ViewNode::Element(element)
    }
}

impl ViewNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            ViewNode::Element(e) => Some(e),
            ViewNode::Text(_) => None,
        }
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            ViewNode::Text(t) => out.push_str(t),
            ViewNode::Element(e) => e.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// All elements in document order whose `class` attribute contains `class`.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |e| {
            if e.get_attr("class").is_some_and(|c| c.split(' ').any(|c| c == class)) {
                found.push(e);
            }
        });
        found
    }

    fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        if let ViewNode::Element(e) = self {
            f(e);
            for c in &e.children {
                c.walk(f);
            }
        }
    }

    /// Copy with the row at `index` marked active.
    pub fn with_active_row(&self, index: Option<usize>) -> ViewNode {
        let mut node = self.clone();
        if let Some(i) = index {
            node.mark_row(&i.to_string());
        }
        node
    }

    fn mark_row(&mut self, index: &str) {
        if let ViewNode::Element(e) = self {
            if e.get_attr("data-ls-index") == Some(index) {
                e.add_class("ls-active");
                e.attrs.push(("aria-selected", "true".into()));
                return;
            }
            e.children.iter_mut().for_each(|c| c.mark_row(index));
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            ViewNode::Text(t) => escape_into(t, out),
            ViewNode::Element(e) => {
                out.push('<');
                out.push_str(e.tag);
                for (name, value) in &e.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, out);
                    out.push('"');
                }
                out.push('>');
                if e.tag == "img" {
                    return;
                }
                e.children.iter().for_each(|c| c.write_html(out));
                out.push_str("</");
                out.push_str(e.tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

/// Rendered results plus the navigation target of each row.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub content: ViewNode,
    pub targets: Vec<String>,
}

impl Panel {
    pub fn row_count(&self) -> usize {
        self.targets.len()
    }
}

/// Split `text` around case-insensitive occurrences of `query`, wrapping each
/// occurrence in `<mark>`.
pub fn highlight(text: &str, query: &str) -> Vec<ViewNode> {
    let needle = query.trim();
    if needle.is_empty() {
        return vec![ViewNode::Text(text.to_string())];
    }
    let Ok(re) = RegexBuilder::new(&regex::escape(needle)).case_insensitive(true).build() else {
        return vec![ViewNode::Text(text.to_string())];
    };

    let mut nodes = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            nodes.push(ViewNode::Text(text[last..m.start()].to_string()));
        }
        nodes.push(Element::new("mark").text(m.as_str()).into());
        last = m.end();
    }
    if last < text.len() {
        nodes.push(ViewNode::Text(text[last..].to_string()));
    }
    nodes
}

/// `price · SKU: x · In Stock`, omitting absent parts.
pub fn product_meta(product: &ProductResult) -> String {
    let mut parts = Vec::with_capacity(3);
    if let Some(price) = product.price.as_deref().filter(|p| !p.is_empty()) {
        parts.push(price.to_string());
    }
    if let Some(sku) = product.sku.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("SKU: {sku}"));
    }
    parts.push(if product.in_stock { "In Stock" } else { "Out of Stock" }.to_string());
    parts.join(" \u{b7} ")
}

struct RowFields<'a> {
    index: usize,
    href: &'a str,
    title: &'a str,
    thumb: Option<&'a str>,
    secondary: Option<(&'static str, String)>,
}

fn row(fields: RowFields<'_>, query: &str) -> ViewNode {
    let mut text = Element::new("div")
        .class("ls-text")
        .child(Element::new("div").class("ls-title").children(highlight(fields.title, query)));
    if let Some((class, line)) = fields.secondary {
        text = text.child(Element::new("div").class(class).text(line));
    }

    let mut anchor = Element::new("a")
        .class("ls-row")
        .attr("href", fields.href)
        .attr("data-ls-row", "1")
        .attr("data-ls-index", fields.index.to_string());
    if let Some(src) = fields.thumb {
        let img = Element::new("img").class("ls-thumb").attr("src", src).attr("alt", "").attr("loading", "lazy");
        anchor = anchor.child(img);
    }
    anchor.child(text).into()
}

fn product_row(product: &ProductResult, index: usize, query: &str) -> (ViewNode, String) {
    let href = non_empty(product.target_url.as_deref()).unwrap_or("#");
    let node = row(
        RowFields {
            index,
            href,
            title: non_empty(Some(product.name.as_str())).unwrap_or("Product"),
            thumb: non_empty(product.thumbnail_url.as_deref()),
            secondary: Some(("ls-meta", product_meta(product))),
        },
        query,
    );
    (node, href.to_string())
}

fn category_row(category: &CategoryResult, index: usize, query: &str) -> (ViewNode, String) {
    let href = non_empty(category.target_url.as_deref()).unwrap_or("#");
    let node = row(
        RowFields {
            index,
            href,
            title: non_empty(Some(category.name.as_str())).unwrap_or("Category"),
            thumb: Some(non_empty(category.thumbnail_url.as_deref()).unwrap_or(CATEGORY_FALLBACK_THUMB)),
            secondary: Some(("ls-subtitle", "Category".to_string())),
        },
        query,
    );
    (node, href.to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Results panel: a "Products" then a "Categories" section, each present only
/// when it has rows, or a single "No results" line.
pub fn results_view(response: &SearchResponse, max_products: usize, max_categories: usize) -> Panel {
    let query = response.query.as_str();
    let mut targets = Vec::new();
    let mut sections: Vec<ViewNode> = Vec::new();

    let mut rows: Vec<ViewNode> = Vec::new();
    for product in response.products.iter().take(max_products) {
        let (node, href) = product_row(product, targets.len(), query);
        rows.push(node);
        targets.push(href);
    }
    if !rows.is_empty() {
        sections.push(Element::new("div").class("ls-section-title").text("Products").into());
        sections.extend(rows);
    }

    let mut rows: Vec<ViewNode> = Vec::new();
    for category in response.categories.iter().take(max_categories) {
        let (node, href) = category_row(category, targets.len(), query);
        rows.push(node);
        targets.push(href);
    }
    if !rows.is_empty() {
        sections.push(Element::new("div").class("ls-section-title").text("Categories").into());
        sections.extend(rows);
    }

    if sections.is_empty() {
        sections.push(Element::new("div").class("ls-empty").text(NO_RESULTS).into());
    }

    Panel { content: Element::new("div").class("ls-results").children(sections).into(), targets }
}

pub fn skeleton_view() -> ViewNode {
    let rows = (0..SKELETON_ROWS).map(|_| {
        ViewNode::from(
            Element::new("div")
                .class("ls-skeleton-row")
                .child(Element::new("div").class("ls-skeleton-thumb"))
                .child(
                    Element::new("div")
                        .class("ls-text")
                        .child(Element::new("div").class("ls-skeleton-line"))
                        .child(Element::new("div").class("ls-skeleton-line")),
                ),
        )
    });
    Element::new("div").class("ls-skeleton").attr("aria-busy", "true").children(rows).into()
}

/// Footer appended under existing results while a refresh is pending.
pub fn inline_loading_footer() -> ViewNode {
    Element::new("div").class("ls-footer").attr("aria-live", "polite").text(SEARCHING).into()
}

/// The panel container around `content`.
pub fn panel(content: ViewNode) -> ViewNode {
    Element::new("div").class("ls-panel").attr("role", "listbox").child(content).into()
}
