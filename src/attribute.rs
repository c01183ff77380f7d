/// An attribute produced by expanding one template rule at one position
///
/// This is the unit a CRFsuite item is made of. Expanded template rules are
/// binary features, so no scale is attached and none is written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    /// Expanded rule text
    pub name: String,
}

impl Attribute {
    /// Create a new attribute with a name
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self { name: name.into() }
    }
}

impl From<String> for Attribute {
    fn from(name: String) -> Self {
        Self { name }
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
