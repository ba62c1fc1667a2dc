//! XML normalization for structural comparison
//!
//! Re-serializes an XML document into a deterministic line form: fixed
//! two-space indentation, every attribute on its own line, and optional
//! stripping of insignificant whitespace. Two structurally equivalent
//! documents normalize to identical line sequences, so the line differ
//! can compare them without caring about the original formatting.

use anyhow::bail;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

const INDENT: &str = "  ";

/// Parses `input` and renders it as normalized lines.
///
/// Fails on anything that is not a well-formed single-root document; the
/// error names the byte position and the parser's reason so forced-XML
/// callers can surface it.
pub fn normalize_xml(input: &str, strip_whitespace: bool) -> anyhow::Result<Vec<String>> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(strip_whitespace);

    let mut lines = Vec::new();
    let mut depth = 0usize;
    let mut root_elements = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if depth == 0 {
                    root_elements += 1;
                    if root_elements > 1 {
                        bail!("multiple root elements");
                    }
                }
                push_element(&mut lines, &start, depth, false)?;
                depth += 1;
            }
            Ok(Event::Empty(start)) => {
                if depth == 0 {
                    root_elements += 1;
                    if root_elements > 1 {
                        bail!("multiple root elements");
                    }
                }
                push_element(&mut lines, &start, depth, true)?;
            }
            Ok(Event::End(end)) => {
                depth -= 1;
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                lines.push(format!("{}</{}>", INDENT.repeat(depth), name));
            }
            Ok(Event::Text(text)) => {
                let content = String::from_utf8_lossy(text.as_ref()).into_owned();
                if depth == 0 {
                    if !content.trim().is_empty() {
                        bail!("text content outside the root element");
                    }
                    continue;
                }
                push_text(&mut lines, &content, depth, strip_whitespace);
            }
            Ok(Event::CData(data)) => {
                let content = String::from_utf8_lossy(data.as_ref()).into_owned();
                lines.push(format!("{}<![CDATA[{}]]>", INDENT.repeat(depth), content));
            }
            Ok(Event::Comment(comment)) => {
                let content = String::from_utf8_lossy(comment.as_ref()).into_owned();
                lines.push(format!("{}<!--{}-->", INDENT.repeat(depth), content));
            }
            Ok(Event::Decl(decl)) => {
                let content = String::from_utf8_lossy(decl.as_ref()).into_owned();
                lines.push(format!("<?{}?>", content));
            }
            Ok(Event::PI(pi)) => {
                let content = String::from_utf8_lossy(pi.as_ref()).into_owned();
                lines.push(format!("{}<?{}?>", INDENT.repeat(depth), content));
            }
            Ok(Event::DocType(doctype)) => {
                let content = String::from_utf8_lossy(doctype.as_ref()).into_owned();
                lines.push(format!("<!DOCTYPE {}>", content.trim()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => bail!("not well-formed at byte {}: {}", reader.buffer_position(), e),
        }
    }

    if depth > 0 {
        bail!("unclosed element at end of document");
    }
    if root_elements == 0 {
        bail!("no root element");
    }

    Ok(lines)
}

fn push_element(
    lines: &mut Vec<String>,
    start: &BytesStart<'_>,
    depth: usize,
    self_closing: bool,
) -> anyhow::Result<()> {
    let indent = INDENT.repeat(depth);
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let closer = if self_closing { " />" } else { ">" };

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = match attribute {
            Ok(a) => a,
            Err(e) => bail!("bad attribute on <{}>: {}", name, e),
        };
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attribute.value).into_owned();
        attributes.push(format!("{}{}{}=\"{}\"", indent, INDENT, key, value));
    }

    if attributes.is_empty() {
        if self_closing {
            lines.push(format!("{}<{} />", indent, name));
        } else {
            lines.push(format!("{}<{}>", indent, name));
        }
    } else {
        lines.push(format!("{}<{}", indent, name));
        let last = attributes.len() - 1;
        for (i, mut attribute_line) in attributes.into_iter().enumerate() {
            if i == last {
                attribute_line.push_str(closer);
            }
            lines.push(attribute_line);
        }
    }

    Ok(())
}

fn push_text(lines: &mut Vec<String>, content: &str, depth: usize, strip_whitespace: bool) {
    let indent = INDENT.repeat(depth);
    for piece in content.split('\n') {
        let piece = if strip_whitespace { piece.trim() } else { piece };
        if strip_whitespace && piece.is_empty() {
            continue;
        }
        lines.push(format!("{}{}", indent, piece));
    }
}
