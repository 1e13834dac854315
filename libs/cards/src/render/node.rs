//! Minimal HTML element tree

use std::fmt;

const VOID_TAGS: [&str; 4] = ["img", "br", "meta", "link"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, classes: &str) -> Self {
        self.attr("class", classes)
    }

    /// Marks the semantic part of a card this element renders
    pub fn part(self, name: &str) -> Self {
        self.attr("data-part", name)
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn maybe_child(self, child: Option<impl Into<Node>>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    pub fn children<N: Into<Node>>(mut self, children: impl IntoIterator<Item = N>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn to_html(&self) -> String {
        Node::from(self.clone()).to_html()
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// All text in document order, separated by single spaces
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    /// First element tagged with `data-part="<name>"`
    pub fn find_part(&self, name: &str) -> Option<&Element> {
        self.find_parts(name).into_iter().next()
    }

    pub fn find_parts(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.visit(&mut |element| {
            if element.attr_value("data-part") == Some(name) {
                found.push(element);
            }
        });
        found
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        if let Node::Element(element) = self {
            f(element);
            for child in &element.children {
                child.visit(f);
            }
        }
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        match self {
            Node::Text(text) => parts.push(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(parts);
                }
            }
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => escape_into(text, out),
            Node::Element(element) => {
                out.push('<');
                out.push_str(element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, out);
                    out.push('"');
                }
                out.push('>');

                if VOID_TAGS.contains(&element.tag) {
                    return;
                }

                for child in &element.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(element.tag);
                out.push('>');
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html_escapes_text_and_attributes() {
        let node: Node = Element::new("a")
            .attr("href", "https://x.com/?a=1&b=\"2\"")
            .text("<Tom & Jerry>")
            .into();

        assert_eq!(
            node.to_html(),
            "<a href=\"https://x.com/?a=1&amp;b=&quot;2&quot;\">&lt;Tom &amp; Jerry&gt;</a>"
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let node: Node = Element::new("div")
            .child(Element::new("img").attr("src", "a.png"))
            .into();
        assert_eq!(node.to_html(), "<div><img src=\"a.png\"></div>");
    }

    #[test]
    fn test_find_part_and_text_content() {
        let node: Node = Element::new("section")
            .child(Element::new("h1").part("title").text("Alex"))
            .maybe_child(None::<Element>)
            .child(Element::new("p").part("subtitle").text("Engineer"))
            .into();

        assert_eq!(node.find_part("title").unwrap().tag(), "h1");
        assert!(node.find_part("avatar").is_none());
        assert_eq!(node.text_content(), "Alex Engineer");
    }
}
