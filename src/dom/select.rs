use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    Descendant,     // space
    Child,          // >
    Adjacent,       // +
    GeneralSibling, // ~
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Combinator::Descendant => "descendant",
            Combinator::Child => "child",
            Combinator::Adjacent => "adjacent",
            Combinator::GeneralSibling => "sibling",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeSelector {
    Exists(String),         // [attr]
    Equals(String, String), // [attr=value]
}

/// One compound selector: `tag.class#id[attr=value]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectorPart {
    pub(crate) element: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) id: Option<String>,
    pub(crate) attributes: Vec<AttributeSelector>,
}

impl SelectorPart {
    /// Checks the part against an element's tag name and attributes.
    pub fn matches<'a, F>(&self, tag_name: &str, attribute: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        if let Some(element) = &self.element {
            if !element.eq_ignore_ascii_case(tag_name) {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if attribute("id") != Some(id.as_str()) {
                return false;
            }
        }

        let classes = attribute("class").unwrap_or_default();
        if !self
            .classes
            .iter()
            .all(|class| classes.split_whitespace().any(|c| c == class))
        {
            return false;
        }

        self.attributes.iter().all(|attr_sel| match attr_sel {
            AttributeSelector::Exists(name) => attribute(name).is_some(),
            AttributeSelector::Equals(name, value) => attribute(name) == Some(value.as_str()),
        })
    }
}

/// Why a `<content select>` style selector cannot be carried over to slots.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectorProblem {
    Unparseable,
    Combinator(Combinator),
}

/// Comma separated compound selectors.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentSelector {
    pub(crate) alternatives: Vec<SelectorPart>,
}

impl ContentSelector {
    pub fn parse(selector: &str) -> Result<Self, SelectorProblem> {
        let mut alternatives = Vec::new();

        for part in selector.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(SelectorProblem::Unparseable);
            }

            let mut chars = part.chars().peekable();
            let first = parse_compound(&mut chars)?;
            if let Some(combinator) = parse_combinator(&mut chars)? {
                // The right-hand side must still be a valid compound, otherwise
                // the selector is garbage rather than merely unsupported.
                parse_compound(&mut chars)?;
                return Err(SelectorProblem::Combinator(combinator));
            }
            alternatives.push(first);
        }

        Ok(Self { alternatives })
    }

    pub fn matches<'a, F>(&self, tag_name: &str, attribute: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str> + Copy,
    {
        self.alternatives
            .iter()
            .any(|part| part.matches(tag_name, attribute))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_ident(chars: &mut Peekable<Chars>) -> Result<String, SelectorProblem> {
    let mut token = String::with_capacity(16);
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        token.push(c);
        chars.next();
    }
    if token.is_empty() {
        return Err(SelectorProblem::Unparseable);
    }
    Ok(token)
}

fn parse_compound(chars: &mut Peekable<Chars>) -> Result<SelectorPart, SelectorProblem> {
    let mut part = SelectorPart::default();
    let mut consumed = false;

    match chars.peek() {
        Some('*') => {
            chars.next();
            consumed = true;
        }
        Some(&c) if is_ident_char(c) => {
            part.element = Some(parse_ident(chars)?);
            consumed = true;
        }
        _ => {}
    }

    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                part.classes.push(parse_ident(chars)?);
            }
            '#' => {
                chars.next();
                if part.id.is_some() {
                    return Err(SelectorProblem::Unparseable);
                }
                part.id = Some(parse_ident(chars)?);
            }
            '[' => {
                chars.next();
                part.attributes.push(parse_attribute_selector(chars)?);
            }
            _ => break,
        }
        consumed = true;
    }

    if consumed {
        Ok(part)
    } else {
        Err(SelectorProblem::Unparseable)
    }
}

fn parse_attribute_selector(
    chars: &mut Peekable<Chars>,
) -> Result<AttributeSelector, SelectorProblem> {
    skip_whitespace(chars);
    let name = parse_ident(chars)?;
    skip_whitespace(chars);

    match chars.next() {
        Some(']') => Ok(AttributeSelector::Exists(name)),
        Some('=') => {
            skip_whitespace(chars);
            let value = parse_attribute_value(chars)?;
            skip_whitespace(chars);
            if chars.next() != Some(']') {
                return Err(SelectorProblem::Unparseable);
            }
            Ok(AttributeSelector::Equals(name, value))
        }
        _ => Err(SelectorProblem::Unparseable),
    }
}

fn parse_attribute_value(chars: &mut Peekable<Chars>) -> Result<String, SelectorProblem> {
    match chars.peek() {
        Some(&quote) if quote == '"' || quote == '\'' => {
            chars.next();
            let mut value = String::new();
            for c in chars.by_ref() {
                if c == quote {
                    return Ok(value);
                }
                value.push(c);
            }
            Err(SelectorProblem::Unparseable)
        }
        _ => parse_ident(chars),
    }
}

fn parse_combinator(
    chars: &mut Peekable<Chars>,
) -> Result<Option<Combinator>, SelectorProblem> {
    let had_space = skip_whitespace(chars);
    let combinator = match chars.peek() {
        None => return Ok(None),
        Some('>') => Combinator::Child,
        Some('+') => Combinator::Adjacent,
        Some('~') => Combinator::GeneralSibling,
        Some(_) if had_space => return Ok(Some(Combinator::Descendant)),
        Some(_) => return Err(SelectorProblem::Unparseable),
    };
    chars.next();
    skip_whitespace(chars);
    Ok(Some(combinator))
}

fn skip_whitespace(chars: &mut Peekable<Chars>) -> bool {
    let mut skipped = false;
    while chars.next_if(|c| c.is_whitespace()).is_some() {
        skipped = true;
    }
    skipped
}
