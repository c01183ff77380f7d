use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::attribute::Attribute;
use crate::error::{Error, Result};
use crate::reader;
use crate::sequence::Sequence;
use crate::template::Template;
use crate::writer::{Format, OutputOptions, SuiteWriter};

/// One rule expanded at one position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Index of the sequence in the data file
    pub sequence: usize,
    /// Index of the rule in the template
    pub rule: usize,
    /// Position inside the sequence
    pub position: usize,
    /// Expanded text
    pub value: String,
}

/// Counters collected while writing a conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub sequences: usize,
    pub tokens: usize,
    pub rules: usize,
    /// Attributes written, repeats included
    pub attributes: usize,
    pub distinct_attributes: usize,
    pub distinct_labels: usize,
}

/// Expands CRF++ templates over labeled data and writes CRFsuite items
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: OutputOptions,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &OutputOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OutputOptions {
        &mut self.options
    }

    /// Set the column separator (builder pattern)
    pub fn with_separator(mut self, separator: &str) -> Result<Self> {
        self.options.set_separator(separator)?;
        Ok(self)
    }

    /// Write the label column (builder pattern)
    pub fn with_label(mut self, enabled: bool) -> Self {
        self.options.set_flag(Format::LABEL, enabled);
        self
    }

    /// Escape attribute names for CRFsuite (builder pattern)
    pub fn with_escape(mut self, enabled: bool) -> Self {
        self.options.set_flag(Format::ESCAPE, enabled);
        self
    }

    /// Drop attributes that expand to an empty string (builder pattern)
    pub fn with_skip_empty(mut self, enabled: bool) -> Self {
        self.options.set_flag(Format::SKIP_EMPTY, enabled);
        self
    }

    /// Set a parameter by name.
    ///
    /// Known parameters are `separator`, `label`, `escape` and `skip_empty`.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "separator" => self.options.set_separator(value),
            "label" => self.set_flag(name, Format::LABEL, value),
            "escape" => self.set_flag(name, Format::ESCAPE, value),
            "skip_empty" => self.set_flag(name, Format::SKIP_EMPTY, value),
            _ => Err(Error::invalid_parameter(format!(
                "unknown parameter: {}",
                name
            ))),
        }
    }

    /// Get a parameter value by name
    pub fn get(&self, name: &str) -> Result<String> {
        let flag = match name {
            "separator" => return Ok(self.options.separator().to_string()),
            "label" => Format::LABEL,
            "escape" => Format::ESCAPE,
            "skip_empty" => Format::SKIP_EMPTY,
            _ => {
                return Err(Error::invalid_parameter(format!(
                    "unknown parameter: {}",
                    name
                )))
            }
        };
        Ok(self.options.format().contains(flag).to_string())
    }

    fn set_flag(&mut self, name: &str, flag: Format, value: &str) -> Result<()> {
        let enabled = match value {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => {
                return Err(Error::invalid_parameter(format!(
                    "{} must be a boolean, got {:?}",
                    name, value
                )))
            }
        };
        self.options.set_flag(flag, enabled);
        Ok(())
    }

    /// Expand every rule at every position and hand each result to `f`.
    ///
    /// Order is sequences in data order, then rules in template order, then
    /// positions from left to right. The first failing expansion stops the
    /// walk.
    pub fn visit<F>(&self, sequences: &[Sequence], template: &Template, mut f: F) -> Result<()>
    where
        F: FnMut(Expansion),
    {
        for (index, sequence) in sequences.iter().enumerate() {
            for (rule_index, rule) in template.iter().enumerate() {
                for position in 0..sequence.len() {
                    let value = rule
                        .instantiate(position, sequence)
                        .map_err(|e| e.in_sequence(index))?;
                    f(Expansion {
                        sequence: index,
                        rule: rule_index,
                        position,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// Expand the template over one sequence, grouped by position.
    ///
    /// Item `t` holds the attributes of position `t` in rule order, which is
    /// the shape a CRF trainer takes as its item sequence. `index` is only
    /// used to report errors.
    pub fn attributes(
        &self,
        index: usize,
        sequence: &Sequence,
        template: &Template,
    ) -> Result<Vec<Vec<Attribute>>> {
        let skip_empty = self.options.format().contains(Format::SKIP_EMPTY);
        let mut xseq = vec![Vec::with_capacity(template.len()); sequence.len()];
        for rule in template {
            for (position, item) in xseq.iter_mut().enumerate() {
                let value = rule
                    .instantiate(position, sequence)
                    .map_err(|e| e.in_sequence(index))?;
                if skip_empty && value.is_empty() {
                    continue;
                }
                item.push(Attribute::from(value));
            }
        }
        Ok(xseq)
    }

    /// Write every sequence to `writer` in the CRFsuite data format
    pub fn write<W: Write>(
        &self,
        sequences: &[Sequence],
        template: &Template,
        writer: W,
    ) -> Result<ConversionStats> {
        let with_label = self.options.format().contains(Format::LABEL);
        let mut out = SuiteWriter::new(writer, self.options.clone());
        let mut attrs = HashSet::new();
        let mut labels = HashSet::new();
        let mut stats = ConversionStats {
            sequences: sequences.len(),
            rules: template.len(),
            ..ConversionStats::default()
        };

        for (index, sequence) in sequences.iter().enumerate() {
            let xseq = self.attributes(index, sequence, template)?;
            for (position, (token, item)) in sequence.iter().zip(xseq).enumerate() {
                if !with_label && item.iter().all(|attr| attr.name.is_empty()) {
                    return Err(Error::EmptyItem {
                        sequence: index,
                        position,
                    });
                }
                out.write_item(token.label(), &item)?;
                labels.insert(token.label());
                stats.attributes += item.len();
                attrs.extend(item.into_iter().map(|attr| attr.name));
            }
            out.end_sequence()?;
            stats.tokens += sequence.len();
            tracing::debug!(sequence = index, tokens = sequence.len(), "expanded sequence");
        }
        out.flush()?;

        stats.distinct_attributes = attrs.len();
        stats.distinct_labels = labels.len();
        Ok(stats)
    }

    /// Convert a CRF++ data file with a template into a CRFsuite data file.
    ///
    /// Both inputs are loaded and fully expanded before `output` is touched,
    /// so a failure leaves no partial output behind.
    pub fn convert<P, Q, R>(&self, input: P, template: Q, output: R) -> Result<ConversionStats>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        let sequences = reader::load_data(input)?;
        let template = reader::load_template(template)?;

        let mut buf = Vec::new();
        let stats = self.write(&sequences, &template, &mut buf)?;

        let output = output.as_ref();
        fs::write(output, &buf).map_err(|e| Error::io_at(output, e))?;
        tracing::info!(
            output = %output.display(),
            sequences = stats.sequences,
            tokens = stats.tokens,
            rules = stats.rules,
            attributes = stats.distinct_attributes,
            labels = stats.distinct_labels,
            "conversion finished"
        );
        Ok(stats)
    }
}

/// Convert with default options, see [`Converter::convert`]
pub fn convert<P, Q, R>(input: P, template: Q, output: R) -> Result<ConversionStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    Converter::new().convert(input, template, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<Sequence>, Template) {
        let sequences = reader::parse_data(b"He PRP B-NP\nreckons VBZ B-VP\n\nOK UH O\n").unwrap();
        let template: Template = "# unigram\nU00:%x[0,0]\nU01:%x[-1,0]\nB\n".parse().unwrap();
        (sequences, template)
    }

    #[test]
    fn test_visit_order() {
        let (sequences, template) = sample();
        let mut seen = Vec::new();
        Converter::new()
            .visit(&sequences, &template, |e| {
                seen.push((e.sequence, e.rule, e.position, e.value))
            })
            .unwrap();

        let expected = vec![
            (0, 0, 0, "U00:He".to_string()),
            (0, 0, 1, "U00:reckons".to_string()),
            (0, 1, 0, "U01:".to_string()),
            (0, 1, 1, "U01:He".to_string()),
            (0, 2, 0, "B".to_string()),
            (0, 2, 1, "B".to_string()),
            (1, 0, 0, "U00:OK".to_string()),
            (1, 1, 0, "U01:".to_string()),
            (1, 2, 0, "B".to_string()),
        ];
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_attributes_grouped_by_position() {
        let (sequences, template) = sample();
        let xseq = Converter::new()
            .attributes(0, &sequences[0], &template)
            .unwrap();
        let names: Vec<Vec<&str>> = xseq
            .iter()
            .map(|item| item.iter().map(|a| a.name.as_str()).collect())
            .collect();
        assert_eq!(
            names,
            vec![
                vec!["U00:He", "U01:", "B"],
                vec!["U00:reckons", "U01:He", "B"],
            ]
        );
    }

    #[test]
    fn test_attributes_skip_empty() {
        let sequences = reader::parse_data(b"a X\nb Y\n").unwrap();
        let template: Template = "%x[-1,0]\n%x[0,0]\n".parse().unwrap();

        let xseq = Converter::new()
            .attributes(0, &sequences[0], &template)
            .unwrap();
        assert_eq!(xseq[0], vec![Attribute::from("a")]);

        let xseq = Converter::new()
            .with_skip_empty(false)
            .attributes(0, &sequences[0], &template)
            .unwrap();
        assert_eq!(xseq[0], vec![Attribute::from(""), Attribute::from("a")]);
    }

    #[test]
    fn test_write_with_stats() {
        let (sequences, template) = sample();
        let mut buf = Vec::new();
        let stats = Converter::new()
            .write(&sequences, &template, &mut buf)
            .unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "B-NP\tU00\\:He\tU01\\:\tB\n\
             B-VP\tU00\\:reckons\tU01\\:He\tB\n\
             \n\
             O\tU00\\:OK\tU01\\:\tB\n\
             \n"
        );
        assert_eq!(stats.sequences, 2);
        assert_eq!(stats.tokens, 3);
        assert_eq!(stats.rules, 3);
        assert_eq!(stats.attributes, 9);
        assert_eq!(stats.distinct_attributes, 6);
        assert_eq!(stats.distinct_labels, 3);
    }

    #[test]
    fn test_write_refuses_blank_item_lines() {
        let sequences = reader::parse_data(b"a X\nb Y\n\nc Z\n").unwrap();
        let template: Template = "%x[-1,0]".parse().unwrap();
        let converter = Converter::new().with_label(false);

        let mut buf = Vec::new();
        match converter.write(&sequences, &template, &mut buf).unwrap_err() {
            Error::EmptyItem { sequence, position } => {
                assert_eq!(sequence, 0);
                assert_eq!(position, 0);
            }
            other => panic!("unexpected error: {}", other),
        }

        // Kept empty attributes still leave nothing on the line
        let converter = converter.with_skip_empty(false);
        assert!(matches!(
            converter.write(&sequences, &template, Vec::new()),
            Err(Error::EmptyItem { .. })
        ));

        // A template without rules has nothing to write either
        let empty: Template = "# only comments\n".parse().unwrap();
        assert!(matches!(
            Converter::new().with_label(false).write(&sequences, &empty, Vec::new()),
            Err(Error::EmptyItem { sequence: 0, position: 0 })
        ));

        // With the label column every token keeps its own line
        let mut buf = Vec::new();
        Converter::new()
            .write(&sequences, &template, &mut buf)
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "X\nY\ta\n\nZ\n\n");
    }

    #[test]
    fn test_feature_error_names_sequence() {
        let (sequences, _) = sample();
        let template: Template = "U:%x[0,5]".parse().unwrap();
        let err = Converter::new()
            .write(&sequences, &template, Vec::new())
            .unwrap_err();
        match err {
            Error::FeatureIndexOutOfRange {
                sequence,
                position,
                col,
                ..
            } => {
                assert_eq!(sequence, 0);
                assert_eq!(position, 0);
                assert_eq!(col, 5);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_params() {
        let mut converter = Converter::new();
        assert_eq!(converter.get("separator").unwrap(), "\t");
        assert_eq!(converter.get("label").unwrap(), "true");

        converter.set("label", "false").unwrap();
        converter.set("escape", "0").unwrap();
        converter.set("separator", " ").unwrap();
        assert_eq!(converter.get("label").unwrap(), "false");
        assert_eq!(converter.get("escape").unwrap(), "false");
        assert_eq!(converter.get("skip_empty").unwrap(), "true");
        assert_eq!(converter.options().separator(), " ");

        let err = converter.set("label", "maybe").unwrap_err();
        assert_eq!(err.to_string(), "label must be a boolean, got \"maybe\"");
        let err = converter.set("verbose", "true").unwrap_err();
        assert_eq!(err.to_string(), "unknown parameter: verbose");
        assert!(converter.get("verbose").is_err());
    }
}
