//! Selectors: values that name zero or more items.

use super::item::ItemId;

/// Identifies a set of items on a surface.
///
/// Built implicitly from the common shapes of argument:
/// `"*"` selects everything, any other string is a tag, an [`ItemId`] is
/// that item, and vectors of either resolve element by element.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Every item, in paint order
    All,
    Item(ItemId),
    Items(Vec<ItemId>),
    /// Items carrying the tag; an unknown tag selects nothing
    Tag(String),
    /// Each element resolved as if passed alone, so `"*"` still means all
    Tags(Vec<String>),
    /// Nested selectors, concatenated in order
    Many(Vec<Selector>),
}

/// The tag that means "every item".
pub const WILDCARD: &str = "*";

impl From<ItemId> for Selector {
    fn from(id: ItemId) -> Self {
        Selector::Item(id)
    }
}

impl From<Vec<ItemId>> for Selector {
    fn from(ids: Vec<ItemId>) -> Self {
        Selector::Items(ids)
    }
}

impl From<&[ItemId]> for Selector {
    fn from(ids: &[ItemId]) -> Self {
        Selector::Items(ids.to_vec())
    }
}

impl<const N: usize> From<[ItemId; N]> for Selector {
    fn from(ids: [ItemId; N]) -> Self {
        Selector::Items(ids.to_vec())
    }
}

impl From<&str> for Selector {
    fn from(tag: &str) -> Self {
        if tag == WILDCARD {
            Selector::All
        } else {
            Selector::Tag(tag.to_string())
        }
    }
}

impl From<String> for Selector {
    fn from(tag: String) -> Self {
        if tag == WILDCARD {
            Selector::All
        } else {
            Selector::Tag(tag)
        }
    }
}

impl From<&String> for Selector {
    fn from(tag: &String) -> Self {
        Selector::from(tag.as_str())
    }
}

impl From<Vec<&str>> for Selector {
    fn from(tags: Vec<&str>) -> Self {
        Selector::Tags(tags.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Selector {
    fn from(tags: Vec<String>) -> Self {
        Selector::Tags(tags)
    }
}

impl From<Vec<Selector>> for Selector {
    fn from(selectors: Vec<Selector>) -> Self {
        Selector::Many(selectors)
    }
}

impl From<&Selector> for Selector {
    fn from(selector: &Selector) -> Self {
        selector.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_string_selects_all() {
        assert_eq!(Selector::from("*"), Selector::All);
        assert_eq!(Selector::from("*".to_string()), Selector::All);
        assert_eq!(Selector::from("red"), Selector::Tag("red".to_string()));
    }

    #[test]
    fn tag_lists_keep_order() {
        assert_eq!(
            Selector::from(vec!["b", "a"]),
            Selector::Tags(vec!["b".to_string(), "a".to_string()])
        );
    }
}
