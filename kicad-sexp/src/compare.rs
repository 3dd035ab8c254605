//! Structural comparison of node trees, skipping volatile children.
//!
//! Generators stamp some values, like the `tedit` edit time of a footprint or
//! the `generator` version of a compiled library, that change on every run.
//! Checking whether a file on disk is up to date means comparing everything
//! else.
use crate::node::Node;

/// Returns whether `a` and `b` are equal once every child matching `ignore`
/// has been removed, at any depth.
///
/// Atoms compare by type and value, so `1` and `"1"` are different.
///
/// ```
/// use kicad_sexp::{equal_ignoring, from_str, tagged};
///
/// let old = from_str("(module R (tedit 5F3A1B2C) (layer F.Cu))").unwrap();
/// let new = from_str("(module R (tedit 6A000000) (layer F.Cu))").unwrap();
/// assert!(equal_ignoring(&old, &new, tagged("tedit")));
/// ```
pub fn equal_ignoring<F>(a: &Node, b: &Node, ignore: F) -> bool
where
    F: Fn(&Node) -> bool,
{
    first_mismatch(a, b, ignore).is_none()
}

/// Finds where `a` and `b` first differ once every child matching `ignore`
/// has been removed.
///
/// The result is the path of child indices into the filtered trees, or `None`
/// if the trees are equal. An empty path means the roots themselves differ.
pub fn first_mismatch<F>(a: &Node, b: &Node, ignore: F) -> Option<Vec<usize>>
where
    F: Fn(&Node) -> bool,
{
    let mut path = Vec::new();
    if mismatch(a, b, &ignore, &mut path) {
        path.reverse();
        Some(path)
    } else {
        None
    }
}

/// Pushes the path in reverse order on a mismatch.
fn mismatch<F>(a: &Node, b: &Node, ignore: &F, path: &mut Vec<usize>) -> bool
where
    F: Fn(&Node) -> bool,
{
    let (Node::List(a), Node::List(b)) = (a, b) else {
        return a != b;
    };

    let mut a = a.iter().filter(|node| !ignore(*node));
    let mut b = b.iter().filter(|node| !ignore(*node));
    let mut index = 0;

    loop {
        match (a.next(), b.next()) {
            (None, None) => return false,
            (Some(a), Some(b)) if !mismatch(a, b, ignore, path) => index += 1,
            _ => {
                path.push(index);
                return true;
            }
        }
    }
}

/// Copies `node` without the children matching `ignore`, at any depth.
pub fn strip_ignored<F>(node: &Node, ignore: F) -> Node
where
    F: Fn(&Node) -> bool,
{
    strip(node, &ignore)
}

fn strip<F>(node: &Node, ignore: &F) -> Node
where
    F: Fn(&Node) -> bool,
{
    match node {
        Node::List(items) => items
            .iter()
            .filter(|item| !ignore(*item))
            .map(|item| strip(item, ignore))
            .collect(),
        atom => atom.clone(),
    }
}

/// Matches lists whose tag is `tag`.
pub fn tagged(tag: &str) -> impl Fn(&Node) -> bool + '_ {
    move |node| node.is_tagged(tag)
}

/// Matches lists whose tag is any of `tags`.
pub fn tagged_any<'a>(tags: &'a [&'a str]) -> impl Fn(&Node) -> bool + 'a {
    move |node| node.tag().is_some_and(|tag| tags.iter().any(|t| *t == tag))
}

#[cfg(test)]
mod test {
    use super::{equal_ignoring, first_mismatch, strip_ignored, tagged, tagged_any};
    use crate::{from_str, list, parse, Node, Numbers, ParseOptions};
    use rstest::rstest;

    fn never(_: &Node) -> bool {
        false
    }

    #[rstest]
    #[case("(a b (c 1))", "(a b (c 1))", None)]
    #[case("(a b (c 1))", "(a b (c 2))", Some(vec![2, 1]))]
    #[case("(a b)", "(a b c)", Some(vec![2]))]
    #[case("(a b c)", "(a b)", Some(vec![2]))]
    #[case("(a (b))", "(a b)", Some(vec![1]))]
    #[case("(a)", "(b)", Some(vec![0]))]
    fn test_first_mismatch(#[case] a: &str, #[case] b: &str, #[case] expected: Option<Vec<usize>>) {
        let a = from_str(a).unwrap();
        let b = from_str(b).unwrap();
        assert_eq!(first_mismatch(&a, &b, never), expected);
    }

    #[test]
    fn test_ignores_volatile_children() {
        let old = from_str("(module R_0402 (layer F.Cu) (tedit 5F3A1B2C) (pad 1 smd rect))").unwrap();
        let new = from_str("(module R_0402 (layer F.Cu) (tedit 6A11D0E4) (pad 1 smd rect))").unwrap();
        assert!(!equal_ignoring(&old, &new, never));
        assert!(equal_ignoring(&old, &new, tagged("tedit")));
        assert_eq!(first_mismatch(&old, &new, never), Some(vec![3, 1]));
    }

    #[test]
    fn test_ignores_at_any_depth() {
        let old = from_str("(lib (symbol a (generator x)) (symbol b))").unwrap();
        let new = from_str("(lib (symbol a) (symbol b (generator y)))").unwrap();
        assert!(equal_ignoring(&old, &new, tagged("generator")));
    }

    #[test]
    fn test_ignored_child_only_on_one_side() {
        let old = from_str("(module R (tedit 1) (layer F.Cu))").unwrap();
        let new = from_str("(module R (layer F.Cu))").unwrap();
        assert!(equal_ignoring(&old, &new, tagged("tedit")));
        assert_eq!(first_mismatch(&old, &new, tagged("layer")), Some(vec![2]));
    }

    #[test]
    fn test_types_must_match() {
        let exact = ParseOptions::new().numbers(Numbers::Exact);
        let numeric = parse("(at 1)", &exact).unwrap();
        let stringy = parse("(at \"1\")", &exact).unwrap();
        assert_eq!(numeric, list!["at", 1]);
        assert!(!equal_ignoring(&numeric, &stringy, never));
        assert!(!equal_ignoring(&list!["at", 1], &list!["at", 1.0], never));
    }

    #[test]
    fn test_strip_ignored() {
        let tree = from_str("(lib (version 1) (generator x) (symbol a (generator y)))").unwrap();
        let stripped = strip_ignored(&tree, tagged_any(&["generator", "version"]));
        assert_eq!(stripped, list!["lib", list!["symbol", "a"]]);
    }
}
