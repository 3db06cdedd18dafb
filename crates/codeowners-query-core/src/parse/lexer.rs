//! Lexer and token parsers for CODEOWNERS files.
//!
//! This module contains nom-based parsers for individual tokens
//! like patterns, owners, and comments.

use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{char, space0, space1},
    combinator::rest,
    multi::many0,
    sequence::preceded,
};

/// Characters that can appear in a pattern (non-whitespace, non-comment).
fn is_pattern_char(c: char) -> bool {
    !c.is_whitespace() && c != '#'
}

/// Characters that can appear in an owner token.
fn is_owner_char(c: char) -> bool {
    !c.is_whitespace() && c != '#'
}

/// Parses a complete comment line (optional whitespace + # + content).
pub fn parse_comment_line(input: &str) -> IResult<&str, &str> {
    (space0, char('#'), rest)
        .map(|(_, _, content)| content)
        .parse(input)
}

/// Checks if a line is blank (empty or only whitespace).
pub fn is_blank_line(input: &str) -> bool {
    input.trim().is_empty()
}

/// The raw tokens of a rule line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleComponents<'a> {
    /// The pattern text, including any `!` negation marker.
    pub pattern: &'a str,
    /// Owner tokens in the order written. May be empty.
    pub owners: Vec<&'a str>,
}

/// Parses the components of a rule line (pattern followed by zero or more owners).
///
/// Parsing stops at end of line or at a trailing `#` comment; the unparsed
/// remainder is returned.
pub fn parse_rule_components(input: &str) -> IResult<&str, RuleComponents<'_>> {
    let (input, _) = space0(input)?;
    let (input, pattern) = take_while1(is_pattern_char)(input)?;
    let (input, owners) = many0(preceded(space1, take_while1(is_owner_char))).parse(input)?;

    Ok((input, RuleComponents { pattern, owners }))
}

/// Classifies an owner string into its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerKind<'a> {
    /// A GitHub user (@username).
    User(&'a str),
    /// A GitHub team (@org/team).
    Team { org: &'a str, team: &'a str },
    /// An email address.
    Email(&'a str),
    /// Unknown/invalid format.
    Unknown(&'a str),
}

/// Classifies an owner text string into its type.
pub fn classify_owner(text: &str) -> OwnerKind<'_> {
    if let Some(stripped) = text.strip_prefix('@') {
        if let Some((org, team)) = stripped.split_once('/') {
            if !org.is_empty() && !team.is_empty() {
                return OwnerKind::Team { org, team };
            }
            return OwnerKind::Unknown(text);
        }
        if !stripped.is_empty() {
            return OwnerKind::User(stripped);
        }
        return OwnerKind::Unknown(text);
    } else if text.contains('@') {
        return OwnerKind::Email(text);
    }

    OwnerKind::Unknown(text)
}
