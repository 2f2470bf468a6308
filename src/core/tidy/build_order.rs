//! `<!--after X-->` annotations for `BuildOrder` entries.
//!
//! Each `BuildOrder` is followed by a comment naming the `Include` of the
//! entry with the nearest lower build order, so reordering shows up in diffs.

use super::dom::{Document, Element, Node};
use std::collections::BTreeMap;

const ANNOTATION_PREFIX: &str = "after ";

/// Comment text must not contain `--`.
fn sanitize(name: &str) -> String {
    name.replace("--", "__")
}

fn is_annotation(node: Option<&Node>) -> bool {
    matches!(node, Some(Node::Comment(text)) if text.starts_with(ANNOTATION_PREFIX))
}

fn is_build_order(node: &Node, tag: &str) -> Option<i64> {
    match node {
        Node::Element(element) if element.name == tag => element.text().trim().parse().ok(),
        _ => None,
    }
}

/// Map each build order number to the `Include` of its owning element.
pub fn collect_build_orders(document: &Document, tag: &str) -> BTreeMap<i64, String> {
    let mut orders = BTreeMap::new();
    document.for_each_element(&mut |element: &Element| {
        for child in &element.children {
            if let Some(order) = is_build_order(child, tag) {
                orders.insert(order, element.attr_unescaped("Include"));
            }
        }
    });
    orders
}

/// Drop an annotation written by an earlier run directly after `index`,
/// along with the whitespace that preceded it.
fn remove_annotation(children: &mut Vec<Node>, index: usize) {
    let next = children.get(index + 1);
    if is_annotation(next) {
        children.remove(index + 1);
    } else if matches!(next, Some(Node::Text(_))) && is_annotation(children.get(index + 2)) {
        children.drain(index + 1..=index + 2);
    }
}

/// Annotate every `tag` element. Returns the number of comments written.
pub fn add_build_orders(document: &mut Document, tag: &str) -> usize {
    let orders = collect_build_orders(document, tag);
    let mut written = 0;

    document.for_each_element_mut(&mut |element| {
        let positions: Vec<(usize, i64)> = element
            .children
            .iter()
            .enumerate()
            .filter_map(|(i, child)| is_build_order(child, tag).map(|order| (i, order)))
            .collect();

        // Back to front keeps earlier indices valid while inserting.
        for (index, order) in positions.into_iter().rev() {
            remove_annotation(&mut element.children, index);

            let Some((_, before)) = orders.range(0..order).next_back() else {
                continue;
            };

            let comment = Node::Comment(format!("{}{}", ANNOTATION_PREFIX, sanitize(before)));
            let indent = index
                .checked_sub(1)
                .and_then(|i| element.children.get(i))
                .filter(|node| node.is_text())
                .cloned();
            element.children.insert(index + 1, comment);
            if let Some(indent) = indent {
                element.children.insert(index + 1, indent);
            }
            written += 1;
        }
    });

    written
}
