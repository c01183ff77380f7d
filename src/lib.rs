//! Expand CRF++ feature templates into CRFsuite attributes
//!
//! CRF++ describes features with a template file whose rules embed
//! `%x[row,col]` macros. This crate expands those rules over CRF++ style
//! labeled data and writes the result in the CRFsuite data format, one item
//! per line with a blank line between sequences.
//!
//! # Examples
//!
//! ## Converting files
//!
//! ```no_run
//! use crfs_template::Converter;
//!
//! let stats = Converter::new()
//!     .with_separator("\t")?
//!     .convert("train.data", "template", "train.crfsuite")?;
//! println!("{} sequences written", stats.sequences);
//! # Ok::<(), crfs_template::Error>(())
//! ```
//!
//! ## Expanding a single rule
//!
//! ```
//! use crfs_template::{Rule, Sequence, Token};
//!
//! let sequence = Sequence::from(vec![
//!     Token::new(vec!["w0", "f0"], "LBL0"),
//!     Token::new(vec!["w1", "f1"], "LBL1"),
//! ]);
//! let rule: Rule = "%x[0,0]-%x[1,1]".parse()?;
//! assert_eq!(rule.instantiate(0, &sequence)?, "w0-f1");
//! assert_eq!(rule.instantiate(1, &sequence)?, "w1-");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod attribute;
mod converter;
mod error;
mod sequence;
mod template;
mod writer;

/// Loaders for CRF++ data and template files
pub mod reader;

pub use self::attribute::Attribute;
pub use self::converter::{convert, ConversionStats, Converter, Expansion};
pub use self::error::{Error, Result, RuleError, RuleErrorKind};
pub use self::sequence::{Sequence, Token};
pub use self::template::{Item, Macro, Rule, Template};
pub use self::writer::{escape, Format, OutputOptions, SuiteWriter};
