use thiserror::Error;

/// Upper bound for a field width or precision; longer names are not valid
/// filenames anyway.
pub const MAX_FIELD_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternPart {
    Literal(String),
    Field { token: Token, spec: FormatSpec },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Index,
    Original,
    Total,
}

impl Token {
    fn name(self) -> &'static str {
        match self {
            Token::Index => "index",
            Token::Original => "original",
            Token::Total => "total",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sign {
    #[default]
    Minus,
    Plus,
    Space,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSpec {
    pub fill: Option<char>,
    pub align: Option<Align>,
    pub sign: Option<Sign>,
    pub alternate: bool,
    pub zero: bool,
    pub width: usize,
    pub grouping: Option<char>,
    pub precision: Option<usize>,
    pub kind: Option<char>,
    raw: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern has unbalanced braces")]
    UnbalancedBraces,
    #[error("unknown pattern token: {0}")]
    UnknownToken(String),
    #[error("pattern contains an empty replacement field")]
    EmptyField,
    #[error("unsupported replacement field: {0}")]
    UnsupportedField(String),
    #[error("invalid format spec '{spec}': {reason}")]
    InvalidSpec { spec: String, reason: &'static str },
    #[error("format code '{code}' is not valid for {token}")]
    TypeMismatch { token: &'static str, code: char },
}

/// Values substituted into a pattern for one file.
#[derive(Debug, Clone, Copy)]
pub struct PatternContext<'a> {
    pub index: usize,
    pub original: &'a str,
    pub total: usize,
}

pub fn validate_pattern(input: &str) -> Result<(), PatternError> {
    parse_pattern(input).map(|_| ())
}

pub fn parse_pattern(input: &str) -> Result<Vec<PatternPart>, PatternError> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    literal.push('{');
                    continue;
                }
                if !literal.is_empty() {
                    parts.push(PatternPart::Literal(std::mem::take(&mut literal)));
                }
                let mut field = String::new();
                let mut found_close = false;
                for next in chars.by_ref() {
                    if next == '}' {
                        found_close = true;
                        break;
                    }
                    if next == '{' {
                        return Err(PatternError::UnbalancedBraces);
                    }
                    field.push(next);
                }
                if !found_close {
                    return Err(PatternError::UnbalancedBraces);
                }
                parts.push(parse_field(&field)?);
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    literal.push('}');
                    continue;
                }
                return Err(PatternError::UnbalancedBraces);
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        parts.push(PatternPart::Literal(literal));
    }

    Ok(parts)
}

pub fn render_pattern(
    parts: &[PatternPart],
    ctx: &PatternContext<'_>,
) -> Result<String, PatternError> {
    let mut output = String::new();
    for part in parts {
        match part {
            PatternPart::Literal(s) => output.push_str(s),
            PatternPart::Field { token, spec } => {
                let value = match token {
                    Token::Index => format_integer(ctx.index, spec, *token)?,
                    Token::Original => format_text(ctx.original, spec, *token)?,
                    Token::Total => format_integer(ctx.total, spec, *token)?,
                };
                output.push_str(&value);
            }
        }
    }
    Ok(output)
}

fn parse_field(field: &str) -> Result<PatternPart, PatternError> {
    let (name, spec) = match field.split_once(':') {
        Some((name, spec)) => (name, spec),
        None => (field, ""),
    };

    if name.is_empty() {
        return Err(PatternError::EmptyField);
    }
    if name.contains(['!', '.', '[']) || name.chars().all(|c| c.is_ascii_digit()) {
        return Err(PatternError::UnsupportedField(field.to_string()));
    }

    let token = match name {
        "index" => Token::Index,
        "original" => Token::Original,
        "total" => Token::Total,
        other => return Err(PatternError::UnknownToken(other.to_string())),
    };

    Ok(PatternPart::Field {
        token,
        spec: parse_spec(spec)?,
    })
}

fn parse_spec(spec: &str) -> Result<FormatSpec, PatternError> {
    let invalid = |reason| PatternError::InvalidSpec {
        spec: spec.to_string(),
        reason,
    };
    let chars: Vec<char> = spec.chars().collect();
    let mut out = FormatSpec {
        raw: spec.to_string(),
        ..FormatSpec::default()
    };
    let mut i = 0usize;

    if chars.len() >= 2 && parse_align(chars[1]).is_some() {
        out.fill = Some(chars[0]);
        out.align = parse_align(chars[1]);
        i = 2;
    } else if let Some(align) = chars.first().and_then(|c| parse_align(*c)) {
        out.align = Some(align);
        i = 1;
    }

    match chars.get(i) {
        Some('+') => out.sign = Some(Sign::Plus),
        Some('-') => out.sign = Some(Sign::Minus),
        Some(' ') => out.sign = Some(Sign::Space),
        _ => {}
    }
    if out.sign.is_some() {
        i += 1;
    }

    if chars.get(i) == Some(&'#') {
        out.alternate = true;
        i += 1;
    }

    if chars.get(i) == Some(&'0') {
        out.zero = true;
        i += 1;
    }

    let start = i;
    while chars.get(i).is_some_and(char::is_ascii_digit) {
        i += 1;
    }
    if i > start {
        out.width = chars[start..i]
            .iter()
            .collect::<String>()
            .parse::<usize>()
            .ok()
            .filter(|width| *width <= MAX_FIELD_LEN)
            .ok_or_else(|| invalid("width is too large"))?;
    }

    if let Some(sep) = chars.get(i).filter(|c| matches!(c, ',' | '_')) {
        out.grouping = Some(*sep);
        i += 1;
    }

    if chars.get(i) == Some(&'.') {
        i += 1;
        let start = i;
        while chars.get(i).is_some_and(char::is_ascii_digit) {
            i += 1;
        }
        if i == start {
            return Err(invalid("missing precision"));
        }
        out.precision = Some(
            chars[start..i]
                .iter()
                .collect::<String>()
                .parse::<usize>()
                .ok()
                .filter(|precision| *precision <= MAX_FIELD_LEN)
                .ok_or_else(|| invalid("precision is too large"))?,
        );
    }

    match &chars[i..] {
        [] => {}
        [kind] if matches!(kind, 'd' | 'x' | 'X' | 'o' | 'b' | 's') => out.kind = Some(*kind),
        [_] => return Err(invalid("unknown format code")),
        _ => return Err(invalid("unexpected characters")),
    }

    Ok(out)
}

fn parse_align(ch: char) -> Option<Align> {
    match ch {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        '=' => Some(Align::AfterSign),
        _ => None,
    }
}

fn format_integer(value: usize, spec: &FormatSpec, token: Token) -> Result<String, PatternError> {
    if spec.precision.is_some() {
        return Err(PatternError::InvalidSpec {
            spec: spec.raw.clone(),
            reason: "precision is not allowed for integers",
        });
    }

    let (digits, radix_prefix, group_every) = match spec.kind {
        None | Some('d') => (value.to_string(), "", 3),
        Some('x') => (format!("{value:x}"), "0x", 4),
        Some('X') => (format!("{value:X}"), "0X", 4),
        Some('o') => (format!("{value:o}"), "0o", 4),
        Some('b') => (format!("{value:b}"), "0b", 4),
        Some(code) => {
            return Err(PatternError::TypeMismatch {
                token: token.name(),
                code,
            })
        }
    };
    if spec.grouping == Some(',') && group_every != 3 {
        return Err(PatternError::InvalidSpec {
            spec: spec.raw.clone(),
            reason: "',' grouping is only allowed for decimal integers",
        });
    }
    let sign = match spec.sign {
        Some(Sign::Plus) => "+",
        Some(Sign::Space) => " ",
        _ => "",
    };
    let lead = if spec.alternate {
        format!("{sign}{radix_prefix}")
    } else {
        sign.to_string()
    };

    let (fill, align) = resolve_fill(spec, Align::Right);
    if align == Align::AfterSign {
        let target = spec.width.saturating_sub(lead.chars().count());
        let body = match spec.grouping {
            Some(sep) if fill == '0' => zero_pad_grouped(&digits, sep, group_every, target),
            Some(sep) => pad(&group_digits(&digits, sep, group_every), target, fill, Align::Right),
            None => pad(&digits, target, fill, Align::Right),
        };
        return Ok(format!("{lead}{body}"));
    }

    let grouped = match spec.grouping {
        Some(sep) => group_digits(&digits, sep, group_every),
        None => digits,
    };
    Ok(pad(&format!("{lead}{grouped}"), spec.width, fill, align))
}

/// Inserts `sep` between every `every` digits, counting from the right.
fn group_digits(digits: &str, sep: char, every: usize) -> String {
    let count = digits.chars().count();
    let mut out = String::with_capacity(count + count / every);
    for (pos, ch) in digits.chars().enumerate() {
        if pos > 0 && (count - pos) % every == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

// Zero padding counts as digits, so separators land inside the padding too.
fn zero_pad_grouped(digits: &str, sep: char, every: usize, target: usize) -> String {
    let mut len = digits.len();
    loop {
        let grouped = group_digits(&format!("{digits:0>len$}"), sep, every);
        if grouped.chars().count() >= target {
            return grouped;
        }
        len += 1;
    }
}

fn format_text(value: &str, spec: &FormatSpec, token: Token) -> Result<String, PatternError> {
    if let Some(code) = spec.kind.filter(|k| *k != 's') {
        return Err(PatternError::TypeMismatch {
            token: token.name(),
            code,
        });
    }
    if spec.sign.is_some() {
        return Err(PatternError::InvalidSpec {
            spec: spec.raw.clone(),
            reason: "sign is not allowed for text",
        });
    }
    if spec.alternate || spec.grouping.is_some() {
        return Err(PatternError::InvalidSpec {
            spec: spec.raw.clone(),
            reason: "alternate form and grouping are not allowed for text",
        });
    }

    let (fill, align) = resolve_fill(spec, Align::Left);
    if align == Align::AfterSign {
        return Err(PatternError::InvalidSpec {
            spec: spec.raw.clone(),
            reason: "'=' alignment is not allowed for text",
        });
    }

    let text: String = match spec.precision {
        Some(limit) => value.chars().take(limit).collect(),
        None => value.to_string(),
    };
    Ok(pad(&text, spec.width, fill, align))
}

fn resolve_fill(spec: &FormatSpec, default_align: Align) -> (char, Align) {
    match (spec.fill, spec.align, spec.zero) {
        (Some(fill), Some(align), _) => (fill, align),
        (None, Some(align), true) => ('0', align),
        (None, Some(align), false) => (' ', align),
        (_, None, true) if default_align == Align::Right => ('0', Align::AfterSign),
        (_, None, true) => ('0', default_align),
        (_, None, false) => (' ', default_align),
    }
}

fn pad(value: &str, width: usize, fill: char, align: Align) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let gap = width - len;
    let (left, right) = match align {
        Align::Left => (0, gap),
        Align::Center => (gap / 2, gap - gap / 2),
        Align::Right | Align::AfterSign => (gap, 0),
    };
    let mut out = String::with_capacity(value.len() + gap);
    out.extend(std::iter::repeat(fill).take(left));
    out.push_str(value);
    out.extend(std::iter::repeat(fill).take(right));
    out
}
