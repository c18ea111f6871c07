//! Message decoding: visible text and calendar date

use chrono::{DateTime, NaiveDate};
use mailparse::{MailHeaderMap, MailParseError, ParsedMail};
use scraper::{Html, Node};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BodyError {
    #[error("MIME parse error: {0}")]
    Mime(#[from] MailParseError),

    #[error("missing Date header")]
    MissingDate,

    #[error("unparsable Date header: {0}")]
    BadDate(String),

    #[error("no text/plain or text/html part")]
    NoTextPart,
}

/// A decoded message: when it was sent and what it says
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    pub date: NaiveDate,
    pub text: String,
}

pub fn decode_message(raw: &[u8]) -> Result<DecodedMessage, BodyError> {
    let parsed = mailparse::parse_mail(raw)?;
    let date = message_date(&parsed)?;
    let text = message_text(&parsed)?;
    Ok(DecodedMessage { date, text })
}

/// Calendar date as written in the Date header, in the sender's own offset
pub fn message_date(parsed: &ParsedMail<'_>) -> Result<NaiveDate, BodyError> {
    let value = parsed
        .headers
        .get_first_value("Date")
        .ok_or(BodyError::MissingDate)?;

    if let Ok(dt) = DateTime::parse_from_rfc2822(value.trim()) {
        return Ok(dt.date_naive());
    }

    let epoch = mailparse::dateparse(&value).map_err(|_| BodyError::BadDate(value.clone()))?;
    DateTime::from_timestamp(epoch, 0)
        .map(|dt| dt.date_naive())
        .ok_or(BodyError::BadDate(value))
}

/// Visible text of a message.
///
/// The first `text/plain` part wins; otherwise the first `text/html` part is
/// reduced to its text content.
pub fn message_text(parsed: &ParsedMail<'_>) -> Result<String, BodyError> {
    if let Some(part) = find_part(parsed, "text/plain") {
        return Ok(part.get_body()?);
    }
    if let Some(part) = find_part(parsed, "text/html") {
        return Ok(html_to_text(&part.get_body()?));
    }
    Err(BodyError::NoTextPart)
}

fn find_part<'a, 'b>(parsed: &'a ParsedMail<'b>, mimetype: &str) -> Option<&'a ParsedMail<'b>> {
    if parsed.subparts.is_empty() {
        return (parsed.ctype.mimetype.eq_ignore_ascii_case(mimetype)).then_some(parsed);
    }
    parsed
        .subparts
        .iter()
        .find_map(|sub| find_part(sub, mimetype))
}

/// Text nodes of an HTML document joined by single spaces.
///
/// Script and style contents are dropped; markup structure is otherwise
/// irrelevant.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut words: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(el) if matches!(el.name(), "script" | "style"))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}
