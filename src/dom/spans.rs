use std::ops::Range;

use super::utils::{is_raw_text_element, is_void_element};

/// Byte offsets of one start tag in the source, plus where its element ends.
#[derive(Clone, Debug)]
pub(crate) struct TagSpan {
    pub name: String,
    /// Offset of the `<`.
    pub start: usize,
    /// Offset just past the tag name.
    pub name_end: usize,
    /// Offset just past the closing `>` of the start tag.
    pub start_tag_end: usize,
    /// Offset just past the element's end tag, or where it was implicitly closed.
    pub end: usize,
    pub attributes: Vec<AttributeSpan>,
}

#[derive(Clone, Debug)]
pub(crate) struct AttributeSpan {
    pub name: String,
    /// Value including its quotes, if the attribute has one.
    pub value: Option<Range<usize>>,
}

/// Scans raw HTML for start and end tags, recording byte offsets.
///
/// html5ever does not expose source locations, so the index correlates the
/// tree it builds with these spans in document order.
pub(crate) fn scan_tags(source: &str) -> Vec<TagSpan> {
    let bytes = source.as_bytes();
    let lower = source.to_ascii_lowercase();
    let len = bytes.len();
    let mut tags: Vec<TagSpan> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut i = 0;

    while i < len {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        if source[i..].starts_with("<!--") {
            i = source[i + 4..].find("-->").map_or(len, |p| i + 4 + p + 3);
            continue;
        }

        match bytes.get(i + 1) {
            Some(b'/') => {
                let name_start = i + 2;
                let name_end = scan_name(bytes, name_start);
                let close = find_byte(bytes, b'>', name_end).map_or(len, |p| p + 1);
                if name_end > name_start {
                    let name = lower[name_start..name_end].to_string();
                    close_element(&mut tags, &mut open, &name, i, close);
                }
                i = close;
            }
            Some(b'!') | Some(b'?') => {
                i = find_byte(bytes, b'>', i + 2).map_or(len, |p| p + 1);
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let tag = scan_start_tag(source, &lower, i);
                let self_closing = source[..tag.start_tag_end].ends_with("/>");
                i = tag.start_tag_end;
                close_implied(&mut tags, &mut open, &tag.name, tag.start);

                let idx = tags.len();
                let name = tag.name.clone();
                tags.push(tag);

                if is_void_element(&name) || self_closing {
                    continue;
                }
                open.push(idx);

                if is_raw_text_element(&name) {
                    let needle = format!("</{}", name);
                    i = lower[i..].find(&needle).map_or(len, |p| i + p);
                }
            }
            _ => i += 1,
        }
    }

    for idx in open {
        tags[idx].end = len;
    }

    tags
}

fn scan_start_tag(source: &str, lower: &str, start: usize) -> TagSpan {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let name_end = scan_name(bytes, start + 1);
    let mut tag = TagSpan {
        name: lower[start + 1..name_end].to_string(),
        start,
        name_end,
        start_tag_end: len,
        end: len,
        attributes: Vec::new(),
    };

    let mut i = name_end;
    loop {
        while i < len && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'>') {
                break;
            }
            i += 1;
        }
        if i >= len {
            break;
        }
        if bytes[i] == b'>' {
            tag.start_tag_end = i + 1;
            break;
        }
        if bytes[i] == b'/' {
            tag.start_tag_end = i + 2;
            break;
        }

        let attr_start = i;
        while i < len
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        // A stray `=` with no name still has to be consumed.
        if i == attr_start {
            i += 1;
        }
        let name = lower[attr_start..i].to_string();

        let mut j = skip_whitespace(bytes, i);
        let mut value = None;
        if bytes.get(j) == Some(&b'=') {
            j = skip_whitespace(bytes, j + 1);
            match bytes.get(j) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    let close = find_byte(bytes, quote, j + 1).map_or(len, |p| p + 1);
                    value = Some(j..close);
                    i = close;
                }
                Some(_) => {
                    let value_start = j;
                    while j < len && !bytes[j].is_ascii_whitespace() && bytes[j] != b'>' {
                        j += 1;
                    }
                    value = Some(value_start..j);
                    i = j;
                }
                None => i = j,
            }
        }

        tag.attributes.push(AttributeSpan { name, value });
    }

    tag.end = tag.start_tag_end;
    tag
}

fn close_element(
    tags: &mut [TagSpan],
    open: &mut Vec<usize>,
    name: &str,
    end_tag_start: usize,
    end_tag_end: usize,
) {
    let Some(pos) = open.iter().rposition(|&idx| tags[idx].name == name) else {
        return;
    };
    for &idx in &open[pos + 1..] {
        tags[idx].end = end_tag_start;
    }
    tags[open[pos]].end = end_tag_end;
    open.truncate(pos);
}

/// Start tags that end an open element without its end tag, with the
/// elements that bound the search for it.
fn implied_end(name: &str) -> Option<(&'static [&'static str], &'static [&'static str])> {
    let rule: (&[&str], &[&str]) = match name {
        "li" => (&["li"], &["ul", "ol", "menu"]),
        "dt" | "dd" => (&["dt", "dd"], &["dl"]),
        "option" => (&["option"], &["select", "datalist", "optgroup"]),
        "optgroup" => (&["option", "optgroup"], &["select"]),
        "tr" => (&["tr", "td", "th"], &["table", "tbody", "thead", "tfoot"]),
        "td" | "th" => (&["td", "th"], &["tr", "table"]),
        "p" | "div" | "ul" | "ol" | "dl" | "table" | "pre" | "section" | "article" | "aside"
        | "header" | "footer" | "nav" | "main" | "form" | "blockquote" | "hr" | "h1" | "h2"
        | "h3" | "h4" | "h5" | "h6" => (&["p"], &[]),
        _ => return None,
    };
    Some(rule)
}

fn close_implied(tags: &mut [TagSpan], open: &mut Vec<usize>, name: &str, at: usize) {
    let Some((closes, bounds)) = implied_end(name) else {
        return;
    };
    let found = if bounds.is_empty() {
        // An open `p` only ends when it is the current element.
        open.last()
            .filter(|&&idx| closes.contains(&tags[idx].name.as_str()))
            .map(|_| open.len() - 1)
    } else {
        open.iter()
            .rev()
            .take_while(|&&idx| !bounds.contains(&tags[idx].name.as_str()))
            .position(|&idx| closes.contains(&tags[idx].name.as_str()))
            .map(|from_top| open.len() - 1 - from_top)
    };
    let Some(pos) = found else {
        return;
    };
    for &idx in &open[pos..] {
        tags[idx].end = at;
    }
    open.truncate(pos);
}

fn scan_name(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'/' | b'>')
    {
        i += 1;
    }
    i
}

fn skip_whitespace(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn find_byte(bytes: &[u8], needle: u8, from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|p| from + p)
}
