// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP/IFC Parser using nom
//!
//! Zero-copy tokenization, header parsing and string-aware entity scanning.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::{many1, separated_list0},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// STEP/IFC Token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal: 'text' (raw, escapes still encoded)
    String(&'a str),
    /// Integer: 42
    Integer(i64),
    /// Float: 3.14
    Float(f64),
    /// Enum: .TRUE., .FALSE., .UNKNOWN.
    Enum(&'a str),
    /// List: (1, 2, 3)
    List(Vec<Token<'a>>),
    /// Typed value: IFCLABEL('x'), IFCBOOLEAN(.T.)
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value: $
    Null,
    /// Asterisk (derived value): *
    Derived,
}

/// Parse entity reference: #123
fn entity_ref(input: &str) -> IResult<&str, Token> {
    map(
        preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
        Token::EntityRef,
    )(input)
}

/// Parse string literal: 'text' or "text"
/// IFC uses '' to escape a single quote within a string
fn string_literal(input: &str) -> IResult<&str, Token> {
    fn parse_string_content(input: &str, quote: char) -> IResult<&str, &str> {
        let mut i = 0;
        let bytes = input.as_bytes();

        while i < bytes.len() {
            if bytes[i] as char == quote {
                if i + 1 < bytes.len() && bytes[i + 1] as char == quote {
                    i += 2;
                    continue;
                } else {
                    return Ok((&input[i..], &input[..i]));
                }
            }
            i += 1;
        }

        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )))
    }

    alt((
        map(
            delimited(char('\''), |i| parse_string_content(i, '\''), char('\'')),
            Token::String,
        ),
        map(
            delimited(char('"'), |i| parse_string_content(i, '"'), char('"')),
            Token::String,
        ),
    ))(input)
}

/// Parse integer: 42, -42, +42
fn integer(input: &str) -> IResult<&str, Token> {
    map_res(recognize(tuple((opt(one_of("+-")), digit1))), |s: &str| {
        s.parse::<i64>().map(Token::Integer)
    })(input)
}

/// Parse float: 3.14, -3.14, 1.5E-10, 0., 1.
fn float(input: &str) -> IResult<&str, Token> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            char('.'),
            opt(digit1),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| s.parse::<f64>().map(Token::Float),
    )(input)
}

/// Parse enum: .T., .F., .U., .ELEMENT.
fn enum_value(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('.'),
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            char('.'),
        ),
        Token::Enum,
    )(input)
}

fn null(input: &str) -> IResult<&str, Token> {
    map(char('$'), |_| Token::Null)(input)
}

fn derived(input: &str) -> IResult<&str, Token> {
    map(char('*'), |_| Token::Derived)(input)
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Comma separated tokens inside parentheses
fn arguments(input: &str) -> IResult<&str, Vec<Token>> {
    delimited(
        char('('),
        separated_list0(delimited(ws, char(','), ws), token),
        preceded(ws, char(')')),
    )(input)
}

/// Parse typed value: IFCLABEL('x'), IFCBOOLEAN(.T.)
fn typed_value(input: &str) -> IResult<&str, Token> {
    map(pair(keyword, preceded(ws, arguments)), |(type_name, args)| {
        Token::TypedValue(type_name, args)
    })(input)
}

/// Skip whitespace
fn ws(input: &str) -> IResult<&str, ()> {
    map(take_while(|c: char| c.is_whitespace()), |_| ())(input)
}

/// Parse a token with optional surrounding whitespace
fn token(input: &str) -> IResult<&str, Token> {
    delimited(
        ws,
        alt((
            float, // float before integer (float includes '.')
            integer,
            entity_ref,
            string_literal,
            enum_value,
            list,
            typed_value,
            null,
            derived,
        )),
        ws,
    )(input)
}

/// Parse list: (1, 2, 3) or nested lists
fn list(input: &str) -> IResult<&str, Token> {
    map(arguments, Token::List)(input)
}

/// Complex instance body: (IFCA(...) IFCB(...))
fn complex_records(input: &str) -> IResult<&str, Vec<(&str, Vec<Token>)>> {
    delimited(
        char('('),
        many1(delimited(ws, pair(keyword, preceded(ws, arguments)), ws)),
        char(')'),
    )(input)
}

/// Parse a complete entity instance
/// Example: #123=IFCWALL('guid','owner',$,$,'name',$,$,$);
///
/// Complex instances (`#5=(IFCA() IFCB());`) report the first partial
/// record's type with the attributes of all records in order.
pub fn parse_entity(input: &str) -> Result<(u32, &str, Vec<Token>)> {
    let header: IResult<&str, u32> = delimited(
        ws,
        preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
        tuple((ws, char('='), ws)),
    )(input);

    let (rest, id) = header.map_err(|e| Error::parse(0, format!("Invalid entity header: {}", e)))?;

    let simple: IResult<&str, (&str, Vec<Token>)> =
        pair(keyword, preceded(ws, arguments))(rest);

    let (rest, type_name, args) = match simple {
        Ok((rest, (type_name, args))) => (rest, type_name, args),
        Err(_) => {
            let (rest, records) = complex_records(rest).map_err(|e| {
                Error::parse(0, format!("Failed to parse entity #{}: {}", id, e))
            })?;
            let type_name = records.first().map(|(name, _)| *name).unwrap_or_default();
            let args = records.into_iter().flat_map(|(_, args)| args).collect();
            (rest, type_name, args)
        }
    };

    let terminator: IResult<&str, ()> = map(tuple((ws, char(';'))), |_| ())(rest);
    terminator.map_err(|_| Error::parse(0, format!("Entity #{} is not terminated by ';'", id)))?;

    Ok((id, type_name, args))
}

/// Values read from the STEP `HEADER` section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepHeader {
    /// Schema identifiers from `FILE_SCHEMA`, e.g. `["IFC4"]`
    pub schema_identifiers: Vec<String>,
    /// Name recorded in `FILE_NAME`
    pub file_name: Option<String>,
    /// Timestamp recorded in `FILE_NAME`
    pub time_stamp: Option<String>,
    /// Originating system recorded in `FILE_NAME`
    pub originating_system: Option<String>,
}

/// Parse the `HEADER;` ... `ENDSEC;` section.
///
/// Returns a default header when the section is missing; unknown header
/// records are ignored.
pub fn parse_header(content: &str) -> Result<StepHeader> {
    let mut header = StepHeader::default();

    let Some(start) = content.find("HEADER;") else {
        return Ok(header);
    };
    let section_start = start + "HEADER;".len();
    let mut position = section_start;

    while let Some((stmt_start, stmt_end)) = next_statement(content, position) {
        position = stmt_end;
        let statement = content[stmt_start..stmt_end - 1].trim();
        if statement == "ENDSEC" {
            break;
        }

        let parsed: IResult<&str, Token> = typed_value(statement);
        let (_, Token::TypedValue(name, args)) =
            parsed.map_err(|e| Error::parse(stmt_start, format!("Invalid header record: {}", e)))?
        else {
            continue;
        };

        match name {
            "FILE_SCHEMA" => {
                if let Some(Token::List(items)) = args.first() {
                    header.schema_identifiers = items
                        .iter()
                        .filter_map(|item| match item {
                            Token::String(s) => Some(decode_step_string(s)),
                            _ => None,
                        })
                        .collect();
                }
            }
            "FILE_NAME" => {
                let text = |index: usize| match args.get(index) {
                    Some(Token::String(s)) => Some(decode_step_string(s)),
                    _ => None,
                };
                header.file_name = text(0);
                header.time_stamp = text(1);
                header.originating_system = text(5);
            }
            _ => {}
        }
    }

    Ok(header)
}

/// Find the next `;`-terminated statement at or after `from`.
///
/// Skips whitespace and `/* */` comments before the statement and ignores
/// `;` inside quoted strings. Returns `(start, end)` with `end` one past the
/// terminating semicolon.
fn next_statement(content: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = content.as_bytes();
    let len = bytes.len();
    let mut pos = from;

    loop {
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos + 1 < len && bytes[pos] == b'/' && bytes[pos + 1] == b'*' {
            let close = memchr::memmem::find(&bytes[pos + 2..], b"*/")?;
            pos += close + 4;
            continue;
        }
        break;
    }

    if pos >= len {
        return None;
    }

    let start = pos;
    let mut in_string = false;
    while pos < len {
        let offset = if in_string {
            memchr::memchr(b'\'', &bytes[pos..])?
        } else {
            memchr::memchr2(b'\'', b';', &bytes[pos..])?
        };
        pos += offset;
        match bytes[pos] {
            b'\'' => in_string = !in_string,
            _ => return Some((start, pos + 1)),
        }
        pos += 1;
    }

    None
}

/// Decode STEP string escapes into UTF-8.
///
/// Handles `''`, `\\`, `\S\c`, `\X\hh`, `\X2\...\X0\`, `\X4\...\X0\` and
/// ignores code page switches (`\PA\`). Malformed escapes are kept verbatim.
pub fn decode_step_string(raw: &str) -> String {
    if !raw.contains('\\') && !raw.contains("''") {
        return raw.to_string();
    }

    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;

    while i < bytes.len() {
        let rest = &raw[i..];

        if rest.starts_with("''") {
            out.push('\'');
            i += 2;
        } else if rest.starts_with("\\\\") {
            out.push('\\');
            i += 2;
        } else if rest.starts_with("\\S\\") && rest.len() > 3 {
            match rest[3..].chars().next() {
                Some(c) if c.is_ascii() => {
                    out.push(char::from_u32(c as u32 + 0x80).unwrap_or(c));
                    i += 4;
                }
                _ => {
                    out.push('\\');
                    i += 1;
                }
            }
        } else if rest.starts_with("\\P") && rest.len() >= 4 && rest.as_bytes()[3] == b'\\' {
            i += 4;
        } else if rest.starts_with("\\X\\") {
            match rest.get(3..5).and_then(|h| u32::from_str_radix(h, 16).ok()) {
                Some(code) => {
                    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                    i += 5;
                }
                None => {
                    out.push('\\');
                    i += 1;
                }
            }
        } else if rest.starts_with("\\X2\\") || rest.starts_with("\\X4\\") {
            let width = if rest.starts_with("\\X2\\") { 4 } else { 8 };
            let Some(end) = rest[4..].find("\\X0\\") else {
                out.push('\\');
                i += 1;
                continue;
            };
            let hex = &rest[4..4 + end];
            if hex.len() % width != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                out.push('\\');
                i += 1;
                continue;
            }
            let codes = (0..hex.len())
                .step_by(width)
                .filter_map(|k| u32::from_str_radix(&hex[k..k + width], 16).ok());
            if width == 4 {
                let units: Vec<u16> = codes.map(|c| c as u16).collect();
                out.push_str(&String::from_utf16_lossy(&units));
            } else {
                out.extend(codes.map(|c| char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER)));
            }
            i += 4 + end + 4;
        } else {
            let c = rest.chars().next().unwrap_or_default();
            out.push(c);
            i += c.len_utf8().max(1);
        }
    }

    out
}

/// Fast entity scanner - scans file without full parsing
/// O(n) over the DATA section; quoted strings and comments are skipped
pub struct EntityScanner<'a> {
    content: &'a str,
    position: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a new scanner
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
        }
    }

    /// Scan for the next entity
    /// Returns (entity_id, type_name, line_start, line_end)
    pub fn next_entity(&mut self) -> Option<(u32, &'a str, usize, usize)> {
        loop {
            let (line_start, line_end) = next_statement(self.content, self.position)?;
            self.position = line_end;

            let line = &self.content[line_start..line_end];
            if !line.starts_with('#') {
                // HEADER records, section markers, ISO-10303-21 envelope
                continue;
            }

            let id_end = line[1..]
                .find(|c: char| !c.is_ascii_digit())
                .map(|i| i + 1)
                .unwrap_or(line.len());
            let Ok(id) = line[1..id_end].parse::<u32>() else {
                continue;
            };

            let Some(eq_pos) = line[id_end..].find('=') else {
                continue;
            };
            let after_eq = &line[id_end + eq_pos + 1..];
            let type_slice = after_eq.trim_start();
            let type_len = type_slice
                .find(|c: char| c == '(' || c.is_whitespace())
                .unwrap_or(type_slice.len());
            let type_name = &type_slice[..type_len];

            return Some((id, type_name, line_start, line_end));
        }
    }

    /// Reset scanner to beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }
}
