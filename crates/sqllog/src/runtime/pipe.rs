//! Pipe — feed stdin lines through the router.
//!
//! Each line is `<category-bits>\t<message>` or a bare `<message>`, which is
//! routed with the `messages` category. Bytes that are not valid UTF-8 are
//! replaced, never rejected, so one bad line cannot end the stream.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::route::{Category, MessageRouter};

pub fn parse_line(line: &str) -> (Category, &str) {
    if let Some((bits, msg)) = line.split_once('\t') {
        if let Ok(bits) = bits.parse::<u64>() {
            return (Category::from_bits_truncate(bits), msg);
        }
    }
    (Category::MESSAGES, line)
}

fn trim_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Route every line from `reader`; returns the number of lines routed.
pub async fn pump<R>(router: &mut MessageRouter, mut reader: R) -> std::io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut count = 0u64;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(trim_newline(&buf));
        let (category, msg) = parse_line(&line);
        router.log(category, msg);
        count += 1;
    }
    tracing::debug!("input closed after {} messages", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::client::fake::{RecordingSink, SharedBuffer};
    use crate::route::Severity;

    #[test]
    fn test_parse_line_with_category() {
        assert_eq!(parse_line("1\ttest 2"), (Category::ERRORS, "test 2"));
        assert_eq!(parse_line("3\tinfo:x"), (Category::ERRORS | Category::MESSAGES, "info:x"));
    }

    #[test]
    fn test_parse_line_without_category() {
        assert_eq!(parse_line("info:hello"), (Category::MESSAGES, "info:hello"));
        assert_eq!(parse_line("x\tinfo:tab"), (Category::MESSAGES, "x\tinfo:tab"));
    }

    #[tokio::test]
    async fn test_pump_routes_every_line() {
        let sink = Arc::new(RecordingSink::new());
        let raw = SharedBuffer::new();
        let mut router = MessageRouter::new(sink.clone()).with_raw_channel(raw.clone());

        let input: &[u8] = b"info:a=1 one\nstderr:two\n1\tthree\n2\tdropped\n";
        let count = pump(&mut router, input).await.unwrap();

        assert_eq!(count, 4);
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].severity, Severity::Info);
        assert_eq!(events[0].message, "one");
        assert_eq!(events[1].severity, Severity::Warning);
        assert_eq!(events[1].message, "three");
        assert_eq!(raw.contents(), "two\n");
    }

    #[tokio::test]
    async fn test_pump_keeps_lines_with_invalid_utf8() {
        let sink = Arc::new(RecordingSink::new());
        let mut router = MessageRouter::new(sink.clone());

        let input: &[u8] = b"info:first\ninfo:bad \xff byte\r\ninfo:third";
        let count = pump(&mut router, input).await.unwrap();

        assert_eq!(count, 3);
        let messages: Vec<String> = sink.events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["first", "bad \u{FFFD} byte", "third"]);
    }

    #[test]
    fn test_trim_newline() {
        assert_eq!(trim_newline(b"a\r\n"), b"a");
        assert_eq!(trim_newline(b"a\n"), b"a");
        assert_eq!(trim_newline(b"a"), b"a");
        assert_eq!(trim_newline(b"a\r"), b"a");
    }
}
