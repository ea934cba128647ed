//! Card document model
//!
//! A [`Card`] is one renderable unit of the export batch: a sized canvas with a
//! tree of element, text and image nodes. Image nodes carry the `src` that the
//! inliner swaps for an embedded copy while a render is in flight.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Marker class for decorative nodes that must never appear in an export
pub const EXPORT_IGNORE_CLASS: &str = "export-ignore";

/// Prefix identifying sources that are already self-contained
pub const DATA_URI_PREFIX: &str = "data:";

/// Position of a node inside a card, as child indices from the root list
pub type NodePath = Vec<usize>;

/// One node of a card's renderable tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Container node
    Element {
        #[serde(default)]
        classes: Vec<String>,
        #[serde(default)]
        children: Vec<Node>,
    },
    /// Text run
    Text {
        content: String,
        #[serde(default)]
        classes: Vec<String>,
    },
    /// Image reference (remote URL, local path or `data:` URI)
    Image {
        src: String,
        #[serde(default)]
        classes: Vec<String>,
    },
}

impl Node {
    /// Creates an image node without classes
    pub fn image(src: impl Into<String>) -> Self {
        Node::Image {
            src: src.into(),
            classes: Vec::new(),
        }
    }

    /// Creates a text node without classes
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
            classes: Vec::new(),
        }
    }

    /// Creates an element node with the given classes and children
    pub fn element(classes: &[&str], children: Vec<Node>) -> Self {
        Node::Element {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            children,
        }
    }

    /// Classes attached to this node
    pub fn classes(&self) -> &[String] {
        match self {
            Node::Element { classes, .. }
            | Node::Text { classes, .. }
            | Node::Image { classes, .. } => classes,
        }
    }

    /// Whether the node carries the given class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }
}

/// Predicate deciding which nodes a renderer must leave out
pub type ExcludePredicate = Arc<dyn Fn(&Node) -> bool + Send + Sync>;

/// Default predicate: drop nodes tagged with [`EXPORT_IGNORE_CLASS`]
pub fn export_ignore_predicate() -> ExcludePredicate {
    Arc::new(|node: &Node| node.has_class(EXPORT_IGNORE_CLASS))
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_background() -> String {
    "#ffffff".to_string()
}

/// A renderable card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Stable identifier from the document
    pub id: String,

    /// Logical width in CSS pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Logical height in CSS pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Background colour as `#rrggbb`
    #[serde(default = "default_background")]
    pub background: String,

    /// Top-level nodes
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Card {
    /// Creates an empty card with default dimensions
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            width: default_width(),
            height: default_height(),
            background: default_background(),
            nodes: Vec::new(),
        }
    }

    /// Appends a top-level node
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Every image source in depth-first order, with its path
    pub fn image_sources(&self) -> Vec<(NodePath, String)> {
        let mut found = Vec::new();
        collect_images(&self.nodes, &mut Vec::new(), &mut found);
        found
    }

    /// Image sources that still point outside the document
    pub fn external_image_sources(&self) -> Vec<(NodePath, String)> {
        self.image_sources()
            .into_iter()
            .filter(|(_, src)| !src.starts_with(DATA_URI_PREFIX))
            .collect()
    }

    /// Source of the image at `path`, if that node is an image
    pub fn image_src(&self, path: &[usize]) -> Option<&str> {
        match node_at(&self.nodes, path)? {
            Node::Image { src, .. } => Some(src.as_str()),
            _ => None,
        }
    }

    /// Replaces the source of the image at `path`, returning the previous one
    pub fn set_image_src(&mut self, path: &[usize], src: String) -> Option<String> {
        match node_at_mut(&mut self.nodes, path)? {
            Node::Image { src: current, .. } => Some(std::mem::replace(current, src)),
            _ => None,
        }
    }

    /// Visits every node that survives `exclude`, skipping excluded subtrees
    pub fn visit_rendered<'a>(&'a self, exclude: &ExcludePredicate, visit: &mut dyn FnMut(&'a Node)) {
        visit_nodes(&self.nodes, exclude, visit);
    }
}

fn collect_images(nodes: &[Node], prefix: &mut NodePath, out: &mut Vec<(NodePath, String)>) {
    for (i, node) in nodes.iter().enumerate() {
        prefix.push(i);
        match node {
            Node::Image { src, .. } => out.push((prefix.clone(), src.clone())),
            Node::Element { children, .. } => collect_images(children, prefix, out),
            Node::Text { .. } => {}
        }
        prefix.pop();
    }
}

fn visit_nodes<'a>(nodes: &'a [Node], exclude: &ExcludePredicate, visit: &mut dyn FnMut(&'a Node)) {
    for node in nodes {
        if exclude(node) {
            continue;
        }
        visit(node);
        if let Node::Element { children, .. } = node {
            visit_nodes(children, exclude, visit);
        }
    }
}

fn node_at<'a>(nodes: &'a [Node], path: &[usize]) -> Option<&'a Node> {
    let (first, rest) = path.split_first()?;
    let node = nodes.get(*first)?;
    if rest.is_empty() {
        return Some(node);
    }
    match node {
        Node::Element { children, .. } => node_at(children, rest),
        _ => None,
    }
}

fn node_at_mut<'a>(nodes: &'a mut [Node], path: &[usize]) -> Option<&'a mut Node> {
    let (first, rest) = path.split_first()?;
    let node = nodes.get_mut(*first)?;
    if rest.is_empty() {
        return Some(node);
    }
    match node {
        Node::Element { children, .. } => node_at_mut(children, rest),
        _ => None,
    }
}

/// Shared handle to a card; a render holds the lock for its whole scope
pub type CardHandle = Arc<Mutex<Card>>;

/// A card positioned inside its batch
#[derive(Debug, Clone)]
pub struct CardDescriptor {
    /// Handle to the card document
    pub handle: CardHandle,

    /// Zero-based position in the batch
    pub index: usize,

    /// Number of cards in the batch
    pub total: usize,
}

impl CardDescriptor {
    /// Wraps an ordered list of cards into descriptors
    pub fn from_cards(cards: Vec<Card>) -> Vec<Self> {
        let total = cards.len();
        cards
            .into_iter()
            .enumerate()
            .map(|(index, card)| Self {
                handle: Arc::new(Mutex::new(card)),
                index,
                total,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> Card {
        Card::new("card-1")
            .with_node(Node::image("https://cdn.example.com/a.png"))
            .with_node(Node::element(
                &["column"],
                vec![
                    Node::text("hello"),
                    Node::image("data:image/png;base64,AAAA"),
                    Node::element(&[], vec![Node::image("./local/b.jpg")]),
                ],
            ))
    }

    #[test]
    fn test_image_sources_depth_first() {
        let card = sample_card();
        let sources = card.image_sources();

        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0], (vec![0], "https://cdn.example.com/a.png".to_string()));
        assert_eq!(sources[1].0, vec![1, 1]);
        assert_eq!(sources[2], (vec![1, 2, 0], "./local/b.jpg".to_string()));
    }

    #[test]
    fn test_external_image_sources_skip_data_uris() {
        let card = sample_card();
        let external: Vec<String> = card
            .external_image_sources()
            .into_iter()
            .map(|(_, src)| src)
            .collect();

        assert_eq!(external, vec!["https://cdn.example.com/a.png", "./local/b.jpg"]);
    }

    #[test]
    fn test_set_image_src_returns_previous() {
        let mut card = sample_card();
        let previous = card.set_image_src(&[1, 2, 0], "data:image/jpeg;base64,BBBB".to_string());

        assert_eq!(previous.as_deref(), Some("./local/b.jpg"));
        assert_eq!(card.image_src(&[1, 2, 0]), Some("data:image/jpeg;base64,BBBB"));
    }

    #[test]
    fn test_set_image_src_rejects_non_image_paths() {
        let mut card = sample_card();
        assert!(card.set_image_src(&[1, 0], "x".to_string()).is_none());
        assert!(card.set_image_src(&[7], "x".to_string()).is_none());
        assert!(card.set_image_src(&[], "x".to_string()).is_none());
    }

    #[test]
    fn test_visit_rendered_skips_ignored_subtree() {
        let card = Card::new("c")
            .with_node(Node::element(
                &[EXPORT_IGNORE_CLASS],
                vec![Node::image("https://example.com/hidden.png")],
            ))
            .with_node(Node::image("https://example.com/shown.png"));

        let predicate = export_ignore_predicate();
        let mut images = Vec::new();
        card.visit_rendered(&predicate, &mut |node| {
            if let Node::Image { src, .. } = node {
                images.push(src.clone());
            }
        });

        assert_eq!(images, vec!["https://example.com/shown.png"]);
    }

    #[test]
    fn test_card_deserialize_defaults() {
        let card: Card = serde_json::from_str(
            r#"{"id": "c1", "nodes": [{"type": "image", "src": "a.png"}]}"#,
        )
        .unwrap();

        assert_eq!(card.width, 800);
        assert_eq!(card.height, 600);
        assert_eq!(card.background, "#ffffff");
        assert_eq!(card.nodes, vec![Node::image("a.png")]);
    }

    #[test]
    fn test_descriptors_carry_index_and_total() {
        let descriptors =
            CardDescriptor::from_cards(vec![Card::new("a"), Card::new("b"), Card::new("c")]);

        assert_eq!(descriptors.len(), 3);
        assert!(descriptors.iter().all(|d| d.total == 3));
        assert_eq!(
            descriptors.iter().map(|d| d.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }
}
