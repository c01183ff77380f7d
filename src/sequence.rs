use std::fmt;
use std::slice;

/// One labeled position of a sequence
///
/// Features keep the column order of the data file; the label is the last
/// column and is never addressable by a macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    features: Vec<String>,
    label: String,
}

impl Token {
    pub fn new<F, S, L>(features: F, label: L) -> Self
    where
        F: IntoIterator<Item = S>,
        S: Into<String>,
        L: Into<String>,
    {
        Self {
            features: features.into_iter().map(Into::into).collect(),
            label: label.into(),
        }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Feature at column `index`, if the token has that many columns
    pub fn feature(&self, index: usize) -> Option<&str> {
        self.features.get(index).map(String::as_str)
    }

    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} -> {}", self.features, self.label)
    }
}

/// An ordered run of tokens forming one training instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    tokens: Vec<Token>,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, position: usize) -> Option<&Token> {
        self.tokens.get(position)
    }

    /// Feature `feature_index` of the token at `token_index`
    pub fn feature(&self, token_index: usize, feature_index: usize) -> Option<&str> {
        self.token(token_index)
            .and_then(|token| token.feature(feature_index))
    }

    /// Labels in sequence order
    pub fn labels(&self) -> Vec<&str> {
        self.tokens.iter().map(Token::label).collect()
    }

    pub fn iter(&self) -> slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
}

impl From<Vec<Token>> for Sequence {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

impl std::iter::FromIterator<Token> for Sequence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Token;
    type IntoIter = slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
