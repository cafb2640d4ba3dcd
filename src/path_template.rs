//! Translation of framework path syntax into OpenAPI path templates.
//!
//! Framework paths use these constructs:
//!
//! - `:name` (or `:"quoted name"`) - a named segment parameter
//! - `*name` - a wildcard matching any number of segments
//! - `{ ... }` - an optional group, which may nest
//! - `\x` - the literal character `x`
//!
//! OpenAPI paths only know `{name}` placeholders, so groups are unwrapped (their parameters
//! become non-required) and wildcards are rejected.
//!
//! # Example
//!
//! ```
//! use openapi_from_router::path_template::translate;
//!
//! let translated = translate("/users/:id{/posts/:post}", "get_post", &[]).unwrap();
//! assert_eq!(translated.path, "/users/{id}/posts/{post}");
//! assert!(translated.parameters[0].required);
//! assert!(!translated.parameters[1].required);
//! ```

use crate::document::{Parameter, ParameterLocation};
use crate::error::{Error, Result};
use log::debug;

/// One token of a parsed framework path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Param(String),
    Wildcard(String),
    /// Optional segment wrapping a nested token sequence
    Group(Vec<Token>),
}

/// Kind of a key collected from a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Param,
    Wildcard,
}

/// A parameter or wildcard key, flattened out of any groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey {
    pub name: String,
    pub kind: KeyKind,
    /// False when the key sits inside a group at any depth
    pub required: bool,
}

/// Result of translating one route path.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedPath {
    /// OpenAPI path template, e.g. `/users/{id}`
    pub path: String,
    /// One path parameter per distinct key, in path order
    pub parameters: Vec<Parameter>,
}

/// Tokenize a framework path.
///
/// # Errors
///
/// Returns [`Error::PathSyntax`] for unbalanced braces, a marker without a name, an unterminated
/// quoted name, a trailing escape, a reserved character (`()[]?+!`), or a literal brace. An
/// escaped `{` or `}` has no spelling in an OpenAPI path template, where braces always delimit a
/// parameter.
pub fn parse(path: &str) -> Result<Vec<Token>> {
    let syntax_error = |message: String| Error::PathSyntax {
        path: path.to_string(),
        message,
    };

    // Innermost open group is last
    let mut groups: Vec<Vec<Token>> = vec![Vec::new()];
    let mut text = String::new();
    let mut chars = path.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, escaped @ ('{' | '}'))) => {
                    return Err(syntax_error(format!(
                        "literal `{}` at index {} cannot appear in a documented path",
                        escaped,
                        index + 1
                    )));
                }
                Some((_, escaped)) => text.push(escaped),
                None => return Err(syntax_error(format!("trailing escape at index {}", index))),
            },
            '{' => {
                flush_text(&mut text, &mut groups);
                groups.push(Vec::new());
            }
            '}' => {
                flush_text(&mut text, &mut groups);
                if groups.len() < 2 {
                    return Err(syntax_error(format!("unmatched `}}` at index {}", index)));
                }
                if let Some(inner) = groups.pop() {
                    push_token(&mut groups, Token::Group(inner));
                }
            }
            ':' | '*' => {
                flush_text(&mut text, &mut groups);
                let name = match chars.peek() {
                    Some((_, '"')) => {
                        chars.next();
                        read_quoted_name(&mut chars).ok_or_else(|| {
                            syntax_error(format!("unterminated quoted name at index {}", index))
                        })?
                    }
                    _ => read_name(&mut chars),
                };
                if name.is_empty() {
                    return Err(syntax_error(format!("missing parameter name at index {}", index)));
                }
                if name.contains(['{', '}']) {
                    return Err(syntax_error(format!(
                        "parameter name `{}` at index {} contains a brace",
                        name, index
                    )));
                }
                let token = if ch == ':' {
                    Token::Param(name)
                } else {
                    Token::Wildcard(name)
                };
                push_token(&mut groups, token);
            }
            '(' | ')' | '[' | ']' | '?' | '+' | '!' => {
                return Err(syntax_error(format!("unexpected `{}` at index {}", ch, index)));
            }
            _ => text.push(ch),
        }
    }

    flush_text(&mut text, &mut groups);
    if groups.len() > 1 {
        return Err(syntax_error("unclosed `{` group".to_string()));
    }

    Ok(groups.pop().unwrap_or_default())
}

fn push_token(groups: &mut [Vec<Token>], token: Token) {
    if let Some(current) = groups.last_mut() {
        current.push(token);
    }
}

fn flush_text(text: &mut String, groups: &mut [Vec<Token>]) {
    if !text.is_empty() {
        push_token(groups, Token::Text(std::mem::take(text)));
    }
}

fn is_name_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_name_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn read_name(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> String {
    let mut name = String::new();
    while let Some(&(_, ch)) = chars.peek() {
        let accepted = if name.is_empty() {
            is_name_start(ch)
        } else {
            is_name_continue(ch)
        };
        if !accepted {
            break;
        }
        name.push(ch);
        chars.next();
    }
    name
}

fn read_quoted_name(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> Option<String> {
    let mut name = String::new();
    while let Some((_, ch)) = chars.next() {
        match ch {
            '"' => return Some(name),
            '\\' => name.push(chars.next()?.1),
            _ => name.push(ch),
        }
    }
    None
}

/// Flatten tokens into the ordered list of parameter and wildcard keys.
///
/// Everything nested in a group, at any depth, is marked not required.
pub fn collect_keys(tokens: &[Token]) -> Vec<ParsedKey> {
    let mut keys = Vec::new();
    collect_keys_into(tokens, true, &mut keys);
    keys
}

fn collect_keys_into(tokens: &[Token], required: bool, keys: &mut Vec<ParsedKey>) {
    for token in tokens {
        match token {
            Token::Text(_) => {}
            Token::Param(name) => keys.push(ParsedKey {
                name: name.clone(),
                kind: KeyKind::Param,
                required,
            }),
            Token::Wildcard(name) => keys.push(ParsedKey {
                name: name.clone(),
                kind: KeyKind::Wildcard,
                required,
            }),
            Token::Group(inner) => collect_keys_into(inner, false, keys),
        }
    }
}

/// Tokenize `path` and collect its keys
pub fn parse_keys(path: &str) -> Result<Vec<ParsedKey>> {
    Ok(collect_keys(&parse(path)?))
}

/// Translate a framework path into an OpenAPI path template plus its path parameters.
///
/// `declared` holds the parameters the caller already declared on the operation. A declared
/// path parameter with a matching name keeps its description, schema, example and extensions;
/// `required` always follows the group analysis.
///
/// # Errors
///
/// - [`Error::WildcardPath`] if the path contains a wildcard; `route_name` is carried for
///   diagnostics.
/// - [`Error::PathSyntax`] if the path cannot be tokenized.
pub fn translate(path: &str, route_name: &str, declared: &[Parameter]) -> Result<TranslatedPath> {
    let tokens = parse(path)?;
    let keys = collect_keys(&tokens);

    if keys.iter().any(|key| key.kind == KeyKind::Wildcard) {
        return Err(Error::WildcardPath {
            path: path.to_string(),
            name: route_name.to_string(),
        });
    }

    let mut parameters: Vec<Parameter> = Vec::with_capacity(keys.len());
    for key in &keys {
        if parameters.iter().any(|p| p.name == key.name) {
            debug!("Parameter `{}` repeated in {}", key.name, path);
            continue;
        }
        parameters.push(resolve_parameter(key, declared));
    }

    let rewritten = render(&unwrap_groups(&tokens));
    debug!("Translated {} -> {}", path, rewritten);

    Ok(TranslatedPath {
        path: rewritten,
        parameters,
    })
}

fn resolve_parameter(key: &ParsedKey, declared: &[Parameter]) -> Parameter {
    let default = Parameter::path(key.name.clone(), key.required);

    match declared
        .iter()
        .find(|p| p.name == key.name && p.location == ParameterLocation::Path)
    {
        Some(existing) => Parameter {
            name: key.name.clone(),
            location: ParameterLocation::Path,
            required: key.required,
            schema: existing.schema.clone().or(default.schema),
            description: existing.description.clone(),
            deprecated: existing.deprecated,
            example: existing.example.clone(),
            extensions: existing.extensions.clone(),
        },
        None => default,
    }
}

// First pass: groups dissolve into their contents, leaving plain markers.
fn unwrap_groups(tokens: &[Token]) -> Vec<Token> {
    let mut flat = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::Group(inner) => flat.extend(unwrap_groups(inner)),
            other => flat.push(other.clone()),
        }
    }
    flat
}

// Second pass: markers become `{name}`.
fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Param(name) | Token::Wildcard(name) => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
            Token::Group(inner) => out.push_str(&render(inner)),
        }
    }
    out
}
