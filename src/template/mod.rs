//! CRF++ feature templates
//!
//! A template is a list of rules. Each rule is free text with embedded
//! `%x[row,col]` macros, where `row` is an offset relative to the current
//! position and `col` is a feature column of the token found there.

use std::fmt;
use std::slice;
use std::str::FromStr;

use crate::error::{Error, Result, RuleError};
use crate::sequence::Sequence;

mod scanner;

/// A `%x[row,col]` reference to a feature of a neighbouring token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Macro {
    row: i32,
    col: i32,
}

impl Macro {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Offset relative to the expansion position
    pub fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based feature column.
    ///
    /// Negative columns parse but name no feature, so expanding one against
    /// an in-range token fails.
    pub fn col(&self) -> i32 {
        self.col
    }

    /// Index of the token this macro points at when expanded at `position`
    /// of a sequence with `len` tokens, or `None` past either edge.
    pub fn resolve(&self, position: usize, len: usize) -> Option<usize> {
        position
            .checked_add_signed(self.row as isize)
            .filter(|&target| target < len)
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%x[{},{}]", self.row, self.col)
    }
}

/// A segment of a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// Text copied to the output as is
    Literal(String),
    /// Replaced by a feature of a neighbouring token
    Macro(Macro),
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Literal(text) => f.write_str(text),
            Item::Macro(m) => fmt::Display::fmt(m, f),
        }
    }
}

/// One template line, parsed into its ordered items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    items: Vec<Item>,
}

impl Rule {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Iterate over the macros of this rule in order
    pub fn macros(&self) -> impl Iterator<Item = &Macro> + '_ {
        self.items.iter().filter_map(|item| match item {
            Item::Macro(m) => Some(m),
            Item::Literal(_) => None,
        })
    }

    /// Whether the rule expands to the same text at every position
    pub fn is_constant(&self) -> bool {
        self.macros().next().is_none()
    }

    /// Expand the rule at `position` of `sequence`.
    ///
    /// Macros pointing before the first or after the last token contribute
    /// nothing. A macro column the target token does not have is an error.
    pub fn instantiate(&self, position: usize, sequence: &Sequence) -> Result<String> {
        let mut out = String::new();
        for item in &self.items {
            match item {
                Item::Literal(text) => out.push_str(text),
                Item::Macro(m) => {
                    let target = match m.resolve(position, sequence.len()) {
                        Some(target) => target,
                        None => continue,
                    };
                    let token = &sequence.tokens()[target];
                    let feature = usize::try_from(m.col())
                        .ok()
                        .and_then(|col| token.feature(col));
                    match feature {
                        Some(feature) => out.push_str(feature),
                        None => {
                            return Err(Error::FeatureIndexOutOfRange {
                                rule: self.to_string(),
                                sequence: 0,
                                position,
                                target,
                                col: m.col(),
                                num_features: token.num_features(),
                            });
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let items = scanner::scan(s)?;
        Ok(Self { items })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            fmt::Display::fmt(item, f)?;
        }
        Ok(())
    }
}

/// The ordered rules of a template file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    rules: Vec<Rule>,
}

impl Template {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl From<Vec<Rule>> for Template {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl std::iter::FromIterator<Rule> for Template {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Template {
    type Item = &'a Rule;
    type IntoIter = slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromStr for Template {
    type Err = Error;

    /// Parse template text, skipping blank lines and `#` comments
    fn from_str(s: &str) -> Result<Self> {
        crate::reader::parse_template(s.as_bytes())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
