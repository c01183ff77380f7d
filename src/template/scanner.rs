use super::{Item, Macro};
use crate::error::{RuleError, RuleErrorKind};

/// Opening delimiter of a macro
const OPEN: &str = "%x[";
const CLOSE: char = ']';
const SEPARATOR: char = ',';

/// Split one template rule into literal and macro items.
///
/// Every `%x[` must be followed by `row,col]` with nothing else inside the
/// brackets. Text without any `%x[` comes back as a single literal.
pub(super) fn scan(text: &str) -> Result<Vec<Item>, RuleError> {
    let mut items = Vec::new();
    let mut rest = text;
    let mut consumed = 0;

    while let Some(start) = rest.find(OPEN) {
        if start > 0 {
            items.push(Item::Literal(rest[..start].to_string()));
        }
        let offset = consumed + start;
        let body_start = start + OPEN.len();
        let body = &rest[body_start..];
        let end = body.find(CLOSE).ok_or(RuleError {
            offset,
            kind: RuleErrorKind::Unterminated,
        })?;
        items.push(Item::Macro(parse_macro(&body[..end], offset)?));

        let next = body_start + end + CLOSE.len_utf8();
        rest = &rest[next..];
        consumed += next;
    }

    if !rest.is_empty() {
        items.push(Item::Literal(rest.to_string()));
    }
    Ok(items)
}

/// Parse the `row,col` interior of a macro
fn parse_macro(body: &str, offset: usize) -> Result<Macro, RuleError> {
    let error = |kind| RuleError { offset, kind };
    let (row, col) = body
        .split_once(SEPARATOR)
        .ok_or_else(|| error(RuleErrorKind::MissingComma))?;
    let row: i32 = row.parse().map_err(|_| error(RuleErrorKind::InvalidRow))?;
    let col: i32 = col
        .parse()
        .map_err(|_| error(RuleErrorKind::InvalidColumn))?;
    Ok(Macro::new(row, col))
}
