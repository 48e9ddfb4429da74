//! Minimal mailbox header reader
//!
//! Only `Subject` and `Message-ID` are extracted. Messages are split on
//! `From ` separator lines; folded header lines are unfolded.

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Message {
    pub subject: String,
    pub message_id: String,
}

#[derive(Clone, Copy)]
enum Field {
    Subject,
    MessageId,
    Other,
}

/// Headers of every message in `text`.
pub fn parse(text: &str) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut current = Message::default();
    let mut in_headers = true;
    let mut seen_header = false;
    let mut last = Field::Other;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');

        if line.starts_with("From ") && (!in_headers || !seen_header) {
            if seen_header {
                messages.push(std::mem::take(&mut current));
            }
            in_headers = true;
            seen_header = false;
            last = Field::Other;
            continue;
        }
        if !in_headers {
            continue;
        }
        if line.is_empty() {
            in_headers = false;
            continue;
        }

        if line.starts_with([' ', '\t']) {
            let value = line.trim();
            match last {
                Field::Subject => append(&mut current.subject, value),
                Field::MessageId => append(&mut current.message_id, value),
                Field::Other => {}
            }
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        seen_header = true;
        let value = value.trim();
        last = if name.eq_ignore_ascii_case("subject") {
            current.subject = value.to_string();
            Field::Subject
        } else if name.eq_ignore_ascii_case("message-id") {
            current.message_id = value.to_string();
            Field::MessageId
        } else {
            Field::Other
        };
    }
    if seen_header {
        messages.push(current);
    }

    for message in &mut messages {
        message.message_id = message
            .message_id
            .trim()
            .trim_start_matches('<')
            .trim_end_matches('>')
            .to_string();
    }
    messages
}

fn append(field: &mut String, value: &str) {
    if !field.is_empty() {
        field.push(' ');
    }
    field.push_str(value);
}

/// Subject to message id for every message carrying both.
pub fn message_ids(messages: &[Message]) -> BTreeMap<String, String> {
    messages
        .iter()
        .filter(|m| !m.subject.is_empty() && !m.message_id.is_empty())
        .map(|m| (m.subject.clone(), m.message_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SERIES: &str = "\
From 1a2b3c Mon Sep 17 00:00:00 2001
From: Jane <jane@example.org>
Subject: [PATCH aerc v3 1/2] notmuch: add
 bindings
Message-ID: <one@example.org>

body
From: quoted line stays body

From 4d5e6f Mon Sep 17 00:00:00 2001
From: Jane <jane@example.org>
Message-Id: <two@example.org>
Subject: [PATCH aerc v3 2/2] notmuch: remove code

From unrelated text inside the body
";

    #[test]
    fn parses_series() {
        let messages = parse(SERIES);
        assert_eq!(
            messages,
            vec![
                Message {
                    subject: "[PATCH aerc v3 1/2] notmuch: add bindings".into(),
                    message_id: "one@example.org".into(),
                },
                Message {
                    subject: "[PATCH aerc v3 2/2] notmuch: remove code".into(),
                    message_id: "two@example.org".into(),
                },
            ]
        );
    }

    #[test]
    fn single_message_without_separator() {
        let messages = parse("Subject: hello\r\nMessage-ID: <x@y>\r\n\r\nbody\r\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].subject, "hello");
        assert_eq!(messages[0].message_id, "x@y");
    }

    #[test]
    fn message_ids_skip_incomplete() {
        let messages = vec![
            Message {
                subject: "a".into(),
                message_id: "1@x".into(),
            },
            Message {
                subject: "b".into(),
                message_id: String::new(),
            },
        ];
        let ids = message_ids(&messages);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids["a"], "1@x");
    }

    #[test]
    fn empty_input() {
        assert!(parse("").is_empty());
    }
}
