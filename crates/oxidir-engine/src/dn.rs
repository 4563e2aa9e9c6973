//! Distinguished-name parsing and hierarchy resolution.
//!
//! A [`Dn`] is an ordered sequence of `attribute=value` components, most
//! specific first. Parsing never fails: malformed input degrades to a
//! best-effort component so callers can always fall back to displaying the
//! raw string. Splitting is escape-aware (`\,` and `\=` do not terminate a
//! component), but values are stored verbatim — the engine never re-escapes
//! or unescapes, so a DN echoed back to the server is byte-compatible with
//! what the server sent.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One `attribute=value` component of a distinguished name.
///
/// A component parsed from text without an unescaped `=` keeps the whole
/// text as its value and an empty attribute name.
#[derive(Debug, Clone)]
pub struct DnComponent {
    attribute: String,
    value: String,
}

impl DnComponent {
    /// The attribute name (empty for a malformed component).
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The attribute value, stored verbatim including any escapes.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Case-insensitive attribute name match.
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attribute.eq_ignore_ascii_case(attribute)
    }
}

impl fmt::Display for DnComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attribute.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{}={}", self.attribute, self.value)
        }
    }
}

impl PartialEq for DnComponent {
    fn eq(&self, other: &Self) -> bool {
        self.attribute.eq_ignore_ascii_case(&other.attribute) && self.value == other.value
    }
}

impl Eq for DnComponent {}

/// A distinguished name.
///
/// Equality and hashing use the canonical form: attribute names compare
/// case-insensitively, values compare exactly, surrounding whitespace is
/// insignificant.
#[derive(Debug, Clone)]
pub struct Dn {
    components: Vec<DnComponent>,
}

impl Dn {
    /// Parse a DN string into components.
    ///
    /// Never fails. Commas escaped with a backslash do not split; a piece
    /// without an unescaped `=` becomes a component with an empty attribute
    /// name, which callers observe only through the fallback behavior of
    /// [`Dn::leaf_value`].
    pub fn parse(input: &str) -> Dn {
        let components = split_unescaped(input, ',')
            .into_iter()
            .map(|piece| piece.trim())
            .filter(|piece| !piece.is_empty())
            .map(|piece| match find_unescaped(piece, '=') {
                Some(idx) => DnComponent {
                    attribute: piece[..idx].trim().to_string(),
                    value: piece[idx + 1..].trim().to_string(),
                },
                None => DnComponent {
                    attribute: String::new(),
                    value: piece.to_string(),
                },
            })
            .collect();
        Dn { components }
    }

    /// The ordered components, most specific first.
    pub fn components(&self) -> &[DnComponent] {
        &self.components
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// Whether the DN has no components (parsed from an empty string).
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The leading (most specific) component, if any.
    pub fn rdn(&self) -> Option<&DnComponent> {
        self.components.first()
    }

    /// Display label for this DN: the leading component's value, or the full
    /// canonical string when there is no parseable leading component.
    pub fn label(&self) -> String {
        match self.rdn() {
            Some(rdn) if !rdn.attribute.is_empty() => rdn.value.clone(),
            _ => self.to_string(),
        }
    }

    /// The immediately enclosing DN, or `None` at the top of the hierarchy.
    pub fn parent(&self) -> Option<Dn> {
        if self.components.len() < 2 {
            return None;
        }
        Some(Dn {
            components: self.components[1..].to_vec(),
        })
    }

    /// Every ancestor DN from immediate parent to root.
    ///
    /// Each returned DN is a suffix of `self` with one fewer leading
    /// component; used to place an entry at the correct depth when
    /// assembling the tree.
    pub fn parent_chain(&self) -> Vec<Dn> {
        (1..self.components.len())
            .map(|skip| Dn {
                components: self.components[skip..].to_vec(),
            })
            .collect()
    }

    /// Whether `self` ends with all of `suffix`'s components.
    pub fn ends_with(&self, suffix: &Dn) -> bool {
        if suffix.components.len() > self.components.len() {
            return false;
        }
        let offset = self.components.len() - suffix.components.len();
        self.components[offset..] == suffix.components[..]
    }

    /// Whether `self` lies strictly below `ancestor` in the hierarchy.
    pub fn is_descendant_of(&self, ancestor: &Dn) -> bool {
        self.components.len() > ancestor.components.len() && self.ends_with(ancestor)
    }

    /// Extract the value of the first component whose attribute matches
    /// `attribute` (case-insensitive).
    ///
    /// Falls back to the full DN string when no component matches; the
    /// caller must treat that as "could not resolve a clean identifier" and
    /// display the raw DN.
    pub fn leaf_value(&self, attribute: &str) -> String {
        self.components
            .iter()
            .find(|c| c.has_attribute(attribute))
            .map(|c| c.value.clone())
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{component}")?;
            first = false;
        }
        Ok(())
    }
}

impl PartialEq for Dn {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for Dn {}

impl Hash for Dn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for component in &self.components {
            component.attribute.to_ascii_lowercase().hash(state);
            component.value.hash(state);
        }
    }
}

impl From<&str> for Dn {
    fn from(input: &str) -> Self {
        Dn::parse(input)
    }
}

impl Serialize for Dn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Dn::parse(&text))
    }
}

/// Split on `separator`, honoring backslash escapes.
fn split_unescaped(input: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (idx, c) in input.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == separator {
            pieces.push(&input[start..idx]);
            start = idx + c.len_utf8();
        }
    }
    pieces.push(&input[start..]);
    pieces
}

/// Byte index of the first unescaped occurrence of `needle`, if any.
fn find_unescaped(input: &str, needle: char) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in input.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == needle {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_components_most_specific_first() {
        let dn = Dn::parse("uid=alice,ou=people,dc=example,dc=com");
        assert_eq!(dn.depth(), 4);
        assert_eq!(dn.components()[0].attribute(), "uid");
        assert_eq!(dn.components()[0].value(), "alice");
        assert_eq!(dn.components()[3].value(), "com");
    }

    #[test]
    fn display_round_trips_canonical_form() {
        let dn = Dn::parse("uid=alice,ou=people,dc=example,dc=com");
        assert_eq!(dn.to_string(), "uid=alice,ou=people,dc=example,dc=com");
    }

    #[test]
    fn whitespace_around_components_is_insignificant() {
        let spaced = Dn::parse("cn=admins , ou=groups, dc=example");
        let tight = Dn::parse("cn=admins,ou=groups,dc=example");
        assert_eq!(spaced, tight);
        assert_eq!(spaced.to_string(), "cn=admins,ou=groups,dc=example");
    }

    #[test]
    fn escaped_comma_does_not_split() {
        let dn = Dn::parse(r"cn=Smith\, John,ou=people,dc=example");
        assert_eq!(dn.depth(), 3);
        assert_eq!(dn.components()[0].value(), r"Smith\, John");
        assert_eq!(dn.components()[1].value(), "people");
    }

    #[test]
    fn escaped_equals_stays_in_value() {
        let dn = Dn::parse(r"cn=a\=b,dc=example");
        assert_eq!(dn.components()[0].attribute(), "cn");
        assert_eq!(dn.components()[0].value(), r"a\=b");
    }

    #[test]
    fn parent_chain_walks_to_root() {
        let dn = Dn::parse("uid=alice,ou=people,dc=example,dc=com");
        let chain: Vec<String> = dn.parent_chain().iter().map(Dn::to_string).collect();
        assert_eq!(
            chain,
            vec!["ou=people,dc=example,dc=com", "dc=example,dc=com", "dc=com"]
        );
    }

    #[test]
    fn top_level_dn_has_no_parent() {
        let dn = Dn::parse("dc=com");
        assert!(dn.parent().is_none());
        assert!(dn.parent_chain().is_empty());
    }

    #[test]
    fn leaf_value_returns_first_matching_component() {
        let dn = Dn::parse("uid=alice,ou=people,uid=shadow,dc=example");
        assert_eq!(dn.leaf_value("uid"), "alice");
    }

    #[test]
    fn leaf_value_matches_attribute_case_insensitively() {
        let dn = Dn::parse("UID=Alice,OU=People,DC=example");
        assert_eq!(dn.leaf_value("uid"), "Alice");
    }

    #[test]
    fn leaf_value_falls_back_to_full_dn() {
        let dn = Dn::parse("cn=admins,ou=groups,dc=example");
        assert_eq!(dn.leaf_value("uid"), "cn=admins,ou=groups,dc=example");
    }

    #[test]
    fn malformed_input_degrades_to_single_component() {
        let dn = Dn::parse("not a distinguished name");
        assert_eq!(dn.depth(), 1);
        assert_eq!(dn.components()[0].attribute(), "");
        assert_eq!(dn.leaf_value("uid"), "not a distinguished name");
    }

    #[test]
    fn empty_input_yields_empty_dn() {
        let dn = Dn::parse("");
        assert!(dn.is_empty());
        assert_eq!(dn.to_string(), "");
    }

    #[test]
    fn equality_ignores_attribute_case() {
        assert_eq!(
            Dn::parse("UID=alice,OU=people,DC=example"),
            Dn::parse("uid=alice,ou=people,dc=example")
        );
        assert_ne!(
            Dn::parse("uid=Alice,ou=people"),
            Dn::parse("uid=alice,ou=people")
        );
    }

    #[test]
    fn descendant_checks_use_component_suffixes() {
        let base = Dn::parse("ou=people,dc=example,dc=com");
        let entry = Dn::parse("uid=alice,ou=people,dc=example,dc=com");
        let sibling = Dn::parse("uid=alice,ou=service,dc=example,dc=com");

        assert!(entry.is_descendant_of(&base));
        assert!(!base.is_descendant_of(&base));
        assert!(!sibling.is_descendant_of(&base));
    }

    #[test]
    fn label_uses_leading_component_value() {
        assert_eq!(Dn::parse("ou=people,dc=example").label(), "people");
        assert_eq!(Dn::parse("gibberish").label(), "gibberish");
    }
}
