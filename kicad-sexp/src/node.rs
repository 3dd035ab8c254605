//! The node tree.
use ordered_float::OrderedFloat;
use proptest::arbitrary::Arbitrary;
use smol_str::SmolStr;

use crate::escape::is_bare_word;
use crate::number::{classify, Decimal};
use crate::printer::{Print, Printer};

/// An s-expression represented as a recursive enum.
///
/// Equality is structural and typed: `Int(1)`, `Str("1")` and
/// `Decimal(1)` are all different nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    List(Vec<Node>),
    Str(SmolStr),
    Int(i64),
    Float(OrderedFloat<f64>),
    Decimal(Decimal),
}

impl Node {
    /// Builds a list node from its items.
    pub fn list(items: impl IntoIterator<Item = Node>) -> Self {
        Node::List(items.into_iter().collect())
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_))
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(str) => Some(str),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Int(int) => Some(*int),
            _ => None,
        }
    }

    /// Reads any numeric atom as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Int(int) => Some(*int as f64),
            Node::Float(float) => Some(float.into_inner()),
            Node::Decimal(decimal) => Some(decimal.to_f64()),
            _ => None,
        }
    }

    /// The tag of a list: its first item, when that is a string.
    pub fn tag(&self) -> Option<&str> {
        self.as_list()?.first()?.as_str()
    }

    /// Returns whether this is a list tagged `tag`.
    pub fn is_tagged(&self, tag: &str) -> bool {
        self.tag() == Some(tag)
    }

    /// The items of a list after its tag.
    pub fn args(&self) -> &[Node] {
        match self.as_list() {
            Some([_, rest @ ..]) => rest,
            _ => &[],
        }
    }

    /// The item at `index` of a list.
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.as_list()?.get(index)
    }

    /// The first child list tagged `tag`.
    pub fn find(&self, tag: &str) -> Option<&Node> {
        self.as_list()?.iter().find(|node| node.is_tagged(tag))
    }

    /// All child lists tagged `tag`, in order.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.as_list()
            .unwrap_or_default()
            .iter()
            .filter(move |node| node.is_tagged(tag))
    }
}

/// Builds a [`Node::List`] from expressions convertible into nodes.
///
/// ```
/// use kicad_sexp::{list, Node};
///
/// let at = list!["at", 1.5, -2];
/// assert_eq!(at.tag(), Some("at"));
/// assert_eq!(at.args(), &[Node::from(1.5), Node::from(-2)]);
/// ```
#[macro_export]
macro_rules! list {
    ($($item:expr),* $(,)?) => {
        $crate::node::Node::List(vec![$($crate::node::Node::from($item)),*])
    };
}

pub use list;

impl Print for Node {
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        match self {
            Node::List(items) => printer.list(|printer| printer.print(items)),
            Node::Str(str) => printer.atom(str),
            Node::Int(int) => printer.int(*int),
            Node::Float(float) => printer.float(float.into_inner()),
            Node::Decimal(decimal) => printer.decimal(decimal),
        }
    }
}

impl From<SmolStr> for Node {
    fn from(value: SmolStr) -> Self {
        Self::Str(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<&String> for Node {
    fn from(value: &String) -> Self {
        Self::Str(value.as_str().into())
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Self::Float(OrderedFloat(value))
    }
}

impl From<Decimal> for Node {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Self::List(value)
    }
}

impl FromIterator<Node> for Node {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

/// The atoms an arbitrary [`Node`] tree is built from.
///
/// Every generated tree is a list whose lists all start with a bare word tag.
#[derive(Debug, Clone, Copy, Default)]
pub enum Leaves {
    /// Any string, integer, float or decimal.
    #[default]
    Any,
    /// Any string.
    Text,
    /// Integers, decimals and strings that do not read back as numbers.
    Exact,
    /// Integers, floats and strings that do not read back as numbers.
    Native,
}

impl Arbitrary for Node {
    type Parameters = Leaves;
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(leaves: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        let text = any::<String>().prop_map(Node::from);
        let plain = any::<String>()
            .prop_filter("reads back as a number", |str| {
                !is_bare_word(str) || classify(str).is_none()
            })
            .prop_map(Node::from);
        let int = any::<i64>().prop_map(Node::Int);
        let float = (-1.0e6..1.0e6f64).prop_map(Node::from);
        let decimal = (any::<i64>(), 1..6u32)
            .prop_map(|(mantissa, scale)| Node::Decimal(Decimal::from_scaled(mantissa, scale)));

        let leaf = match leaves {
            Leaves::Any => prop_oneof![text, int, float, decimal].boxed(),
            Leaves::Text => text.boxed(),
            Leaves::Exact => prop_oneof![plain, int, decimal].boxed(),
            Leaves::Native => prop_oneof![plain, int, float].boxed(),
        };

        let tag = "[a-z][a-z0-9_]{0,8}".prop_map(Node::from).boxed();
        let tagged = move |items: BoxedStrategy<Node>| {
            (tag.clone(), proptest::collection::vec(items, 0..8)).prop_map(|(tag, mut items)| {
                items.insert(0, tag);
                Node::List(items)
            })
        };

        let tree = leaf.prop_recursive(6, 128, 8, {
            let tagged = tagged.clone();
            move |inner| tagged(inner).boxed()
        });

        tagged(tree.boxed()).boxed()
    }
}
