//! Argument formatter for user macros.
//!
//! A user macro body is a format template in the printf-like dialect of
//! boost.format:
//! - `%%` renders a literal percent sign.
//! - `%N%` renders the N-th argument (1-indexed).
//! - `%[N$][flags][width][.precision][length]conv`, e.g. `%s`, `%d`, `%-5s`,
//!   `%1$s`. Without `N$` the directive takes the next argument in order.
//! - `%|spec|` is the same directive with an optional conversion char.
//!
//! Arguments are text, so the conversion char only selects a slot (`%c`
//! keeps the first character, `%n` consumes nothing). Width pads; precision
//! truncates only `%s`.
//!
//! Invocation text is split on runs of whitespace and bound to the template
//! positionally. Missing arguments render as empty text and surplus arguments
//! are dropped; only a malformed template is an error.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::errors::FormatError;

const CONVERSIONS: &str = "diouxXeEfFgGaAcCsSpn";
const LENGTH_MODIFIERS: &str = "hlLqjzt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Align {
    #[default]
    Right,
    Left,
    Center,
}

/// Padding and truncation of one directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Spec {
    align: Align,
    zero: bool,
    width: usize,
    precision: Option<usize>,
}

impl Spec {
    fn apply(&self, arg: &str) -> String {
        let text: String = match self.precision {
            Some(p) => arg.chars().take(p).collect(),
            None => arg.to_string(),
        };
        let pad = self.width.saturating_sub(text.chars().count());
        if pad == 0 {
            return text;
        }
        let fill = |n: usize, c: char| std::iter::repeat(c).take(n).collect::<String>();
        match self.align {
            Align::Left => text + &fill(pad, ' '),
            Align::Center => fill(pad / 2, ' ') + &text + &fill(pad - pad / 2, ' '),
            Align::Right if self.zero => fill(pad, '0') + &text,
            Align::Right => fill(pad, ' ') + &text,
        }
    }
}

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    /// Zero-based argument index.
    Arg(usize, Spec),
}

/// What a single `%` directive refers to.
enum Directive {
    Numbered(usize, Spec),
    Sequential(Spec),
    Ignored,
}

/// A parsed format template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Parses a template, rejecting malformed directives.
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let mut pieces = Vec::new();
        let mut text = String::new();
        let mut numbered = false;
        let mut sequential = 0usize;
        let mut chars = source.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            if c != '%' {
                text.push(c);
                continue;
            }
            if chars.next_if(|&(_, c)| c == '%').is_some() {
                text.push('%');
                continue;
            }

            let piece = match parse_directive(&mut chars, offset)? {
                Directive::Ignored => continue,
                Directive::Numbered(index, spec) => {
                    if sequential > 0 {
                        return Err(FormatError::MixedDirectives);
                    }
                    numbered = true;
                    Piece::Arg(index, spec)
                }
                Directive::Sequential(spec) => {
                    if numbered {
                        return Err(FormatError::MixedDirectives);
                    }
                    sequential += 1;
                    Piece::Arg(sequential - 1, spec)
                }
            };

            if !text.is_empty() {
                pieces.push(Piece::Text(std::mem::take(&mut text)));
            }
            pieces.push(piece);
        }

        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }
        Ok(Self { pieces })
    }

    /// Renders the template with positional arguments.
    pub fn render(&self, args: &[&str]) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Arg(index, spec) => {
                    if let Some(arg) = args.get(*index) {
                        out.push_str(&spec.apply(arg));
                    }
                }
            }
        }
        out
    }
}

/// Parses everything after the `%` that opens the directive at `offset`.
fn parse_directive(
    chars: &mut Peekable<CharIndices<'_>>,
    offset: usize,
) -> Result<Directive, FormatError> {
    if chars.peek().is_none() {
        return Err(FormatError::TrailingPercent { offset });
    }
    let bars = chars.next_if(|&(_, c)| c == '|').is_some();
    let mut spec = Spec::default();
    let mut index = None;

    let leading = take_digits(chars);
    let mut width_seen = false;
    if let Some(digits) = &leading {
        if !bars && chars.next_if(|&(_, c)| c == '%').is_some() {
            return Ok(Directive::Numbered(to_index(digits, offset)?, spec));
        }
        if chars.next_if(|&(_, c)| c == '$').is_some() {
            index = Some(to_index(digits, offset)?);
        } else {
            spec.zero = digits.starts_with('0');
            spec.width = to_number(digits);
            width_seen = true;
        }
    }

    if !width_seen {
        while let Some((_, flag)) = chars.next_if(|&(_, c)| "-=+ #0'_".contains(c)) {
            match flag {
                '-' => spec.align = Align::Left,
                '=' => spec.align = Align::Center,
                '0' => spec.zero = true,
                _ => {}
            }
        }
        if let Some(digits) = take_digits(chars) {
            spec.width = to_number(&digits);
        }
    }

    let mut precision = None;
    if chars.next_if(|&(_, c)| c == '.').is_some() {
        precision = Some(take_digits(chars).map_or(0, |d| to_number(&d)));
    }
    while chars.next_if(|&(_, c)| LENGTH_MODIFIERS.contains(c)).is_some() {}

    let mut ignored = false;
    match chars.next() {
        Some((_, '|')) if bars => return Ok(slot(index, spec)),
        Some((_, conv)) if CONVERSIONS.contains(conv) => match conv {
            's' | 'S' => spec.precision = precision,
            'c' | 'C' => spec.precision = Some(1),
            'n' => ignored = true,
            _ => {}
        },
        Some((_, directive)) => {
            return Err(FormatError::UnsupportedDirective { directive, offset })
        }
        None => return Err(FormatError::UnterminatedDirective { offset }),
    }

    if bars && chars.next_if(|&(_, c)| c == '|').is_none() {
        return Err(FormatError::UnterminatedDirective { offset });
    }
    if ignored {
        return Ok(Directive::Ignored);
    }
    Ok(slot(index, spec))
}

fn slot(index: Option<usize>, spec: Spec) -> Directive {
    match index {
        Some(index) => Directive::Numbered(index, spec),
        None => Directive::Sequential(spec),
    }
}

fn take_digits(chars: &mut Peekable<CharIndices<'_>>) -> Option<String> {
    let mut digits = String::new();
    while let Some((_, d)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
        digits.push(d);
    }
    (!digits.is_empty()).then_some(digits)
}

fn to_number(digits: &str) -> usize {
    digits
        .bytes()
        .fold(0usize, |n, d| n.saturating_mul(10).saturating_add((d - b'0') as usize))
}

/// Converts a 1-indexed argument number to a zero-based index.
fn to_index(digits: &str, offset: usize) -> Result<usize, FormatError> {
    to_number(digits)
        .checked_sub(1)
        .ok_or(FormatError::ZeroIndex { offset })
}

/// Splits invocation text into whitespace-separated arguments.
pub fn split_arguments(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Substitutes the arguments in `argument_text` into `template`.
pub fn apply_arguments(template: &str, argument_text: &str) -> Result<String, FormatError> {
    let template = Template::parse(template)?;
    Ok(template.render(&split_arguments(argument_text)))
}
