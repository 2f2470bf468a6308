//! Canonical child ordering for the grouping elements of a project file.

use super::dom::{Document, Element, Node};

/// Sort key shared by every rule: non-element children rank first.
type Key = (u8, usize, Vec<String>);

fn leading_key() -> Key {
    (0, 0, Vec::new())
}

/// `PropertyGroup` children: by tag name.
pub fn property_key(node: &Node) -> Key {
    match node {
        Node::Element(element) => (1, 0, vec![element.name.clone()]),
        _ => leading_key(),
    }
}

/// `ItemGroup` children: by item kind rank, then case-insensitively by
/// `Include`. Kinds outside `item_order` keep their relative order at the end.
pub fn item_key(item_order: &[String]) -> impl Fn(&Node) -> Key + '_ {
    move |node| match node {
        Node::Element(element) => match item_order.iter().position(|kind| *kind == element.name) {
            Some(rank) => (1, rank, vec![element.attr("Include").to_lowercase()]),
            None => (2, 0, Vec::new()),
        },
        _ => leading_key(),
    }
}

/// `Deployment` children: by tag, then the `Name`, `Class` and `LocalName`
/// attributes.
pub fn deployment_key(node: &Node) -> Key {
    match node {
        Node::Element(element) => (
            1,
            0,
            ["Name", "Class", "LocalName"]
                .iter()
                .fold(vec![element.name.clone()], |mut key, attr| {
                    key.push(element.attr(attr).to_string());
                    key
                }),
        ),
        _ => leading_key(),
    }
}

/// Reorder `element`'s children by `key`, re-spacing them with its existing
/// whitespace: the first text child goes before every sorted child and the
/// last text child closes the list.
pub fn sort_children(element: &mut Element, key: &impl Fn(&Node) -> Key) {
    let children = std::mem::take(&mut element.children);
    let indenter = children.iter().find(|n| n.is_text()).cloned();
    let closer = children.iter().rev().find(|n| n.is_text()).cloned();

    let mut items: Vec<Node> = children.into_iter().filter(|n| !n.is_text()).collect();
    items.sort_by_cached_key(key);

    let mut sorted = Vec::with_capacity(items.len() * 2 + 1);
    for item in items {
        if let Some(indent) = &indenter {
            sorted.push(indent.clone());
        }
        sorted.push(item);
    }
    if let Some(closer) = closer {
        sorted.push(closer);
    }

    element.children = sorted;
}

/// Sort the children of every element named `tag`. Returns how many
/// elements were sorted.
pub fn sort_child_nodes(document: &mut Document, tag: &str, key: &impl Fn(&Node) -> Key) -> usize {
    let mut count = 0;
    document.for_each_element_mut(&mut |element| {
        if element.name == tag {
            sort_children(element, key);
            count += 1;
        }
    });
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tidy::dom::{parse, serialize};

    fn sorted(input: &str, tag: &str, key: &impl Fn(&Node) -> Key) -> String {
        let mut document = parse(input.as_bytes(), "t").unwrap();
        sort_child_nodes(&mut document, tag, key);
        String::from_utf8(serialize(&document).unwrap()).unwrap()
    }

    #[test]
    fn property_group_children_sort_by_tag() {
        let input = "<PropertyGroup>\n    <Zeta>1</Zeta>\n    <Alpha>2</Alpha>\n    <Mid/>\n</PropertyGroup>";
        assert_eq!(
            sorted(input, "PropertyGroup", &property_key),
            "<PropertyGroup>\n    <Alpha>2</Alpha>\n    <Mid/>\n    <Zeta>1</Zeta>\n</PropertyGroup>"
        );
    }

    #[test]
    fn item_group_sorts_by_kind_then_include() {
        let order: Vec<String> = ["DelphiCompile", "DCCReference", "BuildConfiguration"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let input = "<ItemGroup>\n  <BuildConfiguration Include=\"Base\"/>\n  <DCCReference Include=\"b.pas\"/>\n  <Other Include=\"z\"/>\n  <DCCReference Include=\"A.pas\"/>\n  <DelphiCompile Include=\"App.dpr\"/>\n  <Another/>\n</ItemGroup>";
        assert_eq!(
            sorted(input, "ItemGroup", &item_key(&order)),
            "<ItemGroup>\n  <DelphiCompile Include=\"App.dpr\"/>\n  <DCCReference Include=\"A.pas\"/>\n  <DCCReference Include=\"b.pas\"/>\n  <BuildConfiguration Include=\"Base\"/>\n  <Other Include=\"z\"/>\n  <Another/>\n</ItemGroup>"
        );
    }

    #[test]
    fn deployment_sorts_by_tag_and_attributes() {
        let input = "<Deployment>\n <DeployFile Name=\"b\" Class=\"X\"/>\n <DeployClass Name=\"z\"/>\n <DeployFile Name=\"a\" Class=\"Y\"/>\n</Deployment>";
        assert_eq!(
            sorted(input, "Deployment", &deployment_key),
            "<Deployment>\n <DeployClass Name=\"z\"/>\n <DeployFile Name=\"a\" Class=\"Y\"/>\n <DeployFile Name=\"b\" Class=\"X\"/>\n</Deployment>"
        );
    }

    #[test]
    fn comments_move_ahead_of_elements() {
        let input = "<PropertyGroup>\n  <B/>\n  <!--c-->\n  <A/>\n</PropertyGroup>";
        assert_eq!(
            sorted(input, "PropertyGroup", &property_key),
            "<PropertyGroup>\n  <!--c-->\n  <A/>\n  <B/>\n</PropertyGroup>"
        );
    }

    #[test]
    fn children_without_whitespace_stay_packed() {
        assert_eq!(
            sorted("<PropertyGroup><B/><A/></PropertyGroup>", "PropertyGroup", &property_key),
            "<PropertyGroup><A/><B/></PropertyGroup>"
        );
    }

    #[test]
    fn nested_matches_are_all_sorted() {
        let mut document = parse(
            b"<Project><PropertyGroup><B/><A/></PropertyGroup><PropertyGroup><D/><C/></PropertyGroup></Project>",
            "t",
        )
        .unwrap();
        assert_eq!(sort_child_nodes(&mut document, "PropertyGroup", &property_key), 2);
        assert_eq!(
            String::from_utf8(serialize(&document).unwrap()).unwrap(),
            "<Project><PropertyGroup><A/><B/></PropertyGroup><PropertyGroup><C/><D/></PropertyGroup></Project>"
        );
    }
}
