//! Parser for the NMA XML response envelope.
//!
//! # Design
//! The API replies with a single tiny document: root element `nma` holding
//! exactly one result element, `<success .../>` on success or an error tag
//! whose text content is the failure message. The contract is "root tag,
//! first child tag, first child text", so this is a purpose-built scanner
//! rather than a general XML parser. Only the first child is inspected;
//! anything after it is ignored, matching how the real service responds.
//!
//! Nothing here panics: malformed input of any shape comes back as
//! `NmaError::Api` with a parse diagnostic.

use crate::error::NmaError;

/// Interpret a response body already known to have arrived with HTTP 200.
pub fn parse_outcome(body: &str) -> Result<(), NmaError> {
    let doc = skip_prolog(body.trim());

    let root = open_tag(doc).ok_or_else(malformed)?;
    if root.name != "nma" {
        return Err(NmaError::Api(format!(
            "unexpected response root element <{}>",
            root.name
        )));
    }
    if root.self_closing {
        return Err(malformed());
    }

    let inner = root.rest.trim_start();
    if inner.starts_with("</") {
        // <nma></nma> with no result element.
        return Err(malformed());
    }
    let child = open_tag(inner).ok_or_else(malformed)?;
    if child.name == "success" {
        return Ok(());
    }

    let text = if child.self_closing {
        ""
    } else {
        let content = child.rest;
        &content[..content.find('<').unwrap_or(content.len())]
    };
    let text = decode_entities(text.trim());
    if text.is_empty() {
        Err(NmaError::Api(format!(
            "server returned <{}> with no message",
            child.name
        )))
    } else {
        Err(NmaError::Api(text))
    }
}

struct OpenTag<'a> {
    name: &'a str,
    self_closing: bool,
    /// Everything after the `>` of the opening tag.
    rest: &'a str,
}

/// Scan one opening tag at the start of `input`, tolerating attributes.
fn open_tag(input: &str) -> Option<OpenTag<'_>> {
    let after_lt = input.strip_prefix('<')?;
    let name_end = after_lt.find(|c: char| c.is_whitespace() || c == '>' || c == '/')?;
    let name = &after_lt[..name_end];
    if name.is_empty() {
        return None;
    }
    let close = after_lt.find('>')?;
    let self_closing = after_lt[..close].ends_with('/');
    Some(OpenTag {
        name,
        self_closing,
        rest: &after_lt[close + 1..],
    })
}

/// Skip the `<?xml ...?>` declaration, if any.
fn skip_prolog(doc: &str) -> &str {
    if let Some(rest) = doc.strip_prefix("<?") {
        if let Some(end) = rest.find("?>") {
            return rest[end + 2..].trim_start();
        }
    }
    doc
}

fn malformed() -> NmaError {
    NmaError::Api("could not parse server response".to_string())
}

/// Decode the five predefined XML entities plus numeric character
/// references. Unknown entities are kept verbatim rather than dropped.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let entity = &rest[amp..];
        match entity.find(';') {
            Some(semi) => {
                let name = &entity[1..semi];
                match decode_entity(name) {
                    Some(c) => out.push(c),
                    None => out.push_str(&entity[..=semi]),
                }
                rest = &entity[semi + 1..];
            }
            None => {
                out.push_str(entity);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse().ok()?
            } else {
                return None;
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_parses_as_success() {
        assert_eq!(parse_outcome(r#"<nma><success code="100"/></nma>"#), Ok(()));
    }

    #[test]
    fn success_with_attributes_and_prolog() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?><nma><success code="200" remaining="798" resettimer="59" /></nma>"#;
        assert_eq!(parse_outcome(body), Ok(()));
    }

    #[test]
    fn error_envelope_yields_its_text() {
        let body = r#"<nma><error code="401">Invalid apikey</error></nma>"#;
        assert_eq!(
            parse_outcome(body),
            Err(NmaError::Api("Invalid apikey".to_string()))
        );
    }

    #[test]
    fn error_text_entities_are_decoded() {
        let body = r#"<nma><error code="400">limit &lt; 1 &amp; rejected</error></nma>"#;
        assert_eq!(
            parse_outcome(body),
            Err(NmaError::Api("limit < 1 & rejected".to_string()))
        );
    }

    #[test]
    fn numeric_character_references_are_decoded() {
        let body = "<nma><error>quota&#32;hit &#x2014; retry later</error></nma>";
        assert_eq!(
            parse_outcome(body),
            Err(NmaError::Api("quota hit \u{2014} retry later".to_string()))
        );
    }

    #[test]
    fn unknown_entity_is_kept_verbatim() {
        let body = "<nma><error>bad &nbsp; value</error></nma>";
        assert_eq!(
            parse_outcome(body),
            Err(NmaError::Api("bad &nbsp; value".to_string()))
        );
    }

    #[test]
    fn only_the_first_child_is_inspected() {
        let body = r#"<nma><success code="200"/><error code="500">ignored</error></nma>"#;
        assert_eq!(parse_outcome(body), Ok(()));
    }

    #[test]
    fn self_closing_error_gets_a_fallback_message() {
        let body = r#"<nma><error code="402"/></nma>"#;
        assert_eq!(
            parse_outcome(body),
            Err(NmaError::Api("server returned <error> with no message".to_string()))
        );
    }

    #[test]
    fn wrong_root_tag_is_a_failure_not_a_panic() {
        let err = parse_outcome("<html><body>oops</body></html>").unwrap_err();
        assert_eq!(
            err,
            NmaError::Api("unexpected response root element <html>".to_string())
        );
    }

    #[test]
    fn malformed_documents_are_failures_not_panics() {
        for body in ["", "not xml at all", "<nma>", "<nma></nma>", "<>", "<nma><", "<nma/>"] {
            let err = parse_outcome(body).unwrap_err();
            assert!(matches!(err, NmaError::Api(_)), "body {body:?}");
        }
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let body = "  \t <nma> <success code=\"200\"/> </nma>  ";
        assert_eq!(parse_outcome(body), Ok(()));
    }
}
