//! This module contains the HTML lexer. It splits a string into markup tokens
//! (tags, comments, declarations) and the text between them.

use phf::phf_set;
use slog::{debug, o, trace};

/// Elements whose contents are never markup.
static RAW_TEXT_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "script",
    "style",
};

/// The lexer that works through the input string.
struct Lexer {
    start: usize,
    context: Context,
    quote: Option<u8>,
    raw_end: Option<String>,
}

impl Lexer {
    /// Create a new lexer at the start of some text.
    fn new() -> Lexer {
        Lexer {
            start: 0,
            context: Context::Text,
            quote: None,
            raw_end: None,
        }
    }
}

/// Where the lexer is.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Context {
    Text,
    Tag,
    Comment,
    Declaration,
    RawText,
}

/// The tokenized parts of the input string.
#[derive(Debug)]
pub struct Token<'a> {
    pub token_type: TokenType,
    pub contents: &'a str,
}

impl Token<'_> {
    /// Creates a new [`Token`].
    pub fn new(token_type: TokenType, contents: &str) -> Token {
        Token {
            token_type,
            contents,
        }
    }
}

/// The types of tokens.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenType {
    Text,
    RawText,
    StartTag,
    EndTag,
    Comment,
    Declaration,
}

/// The main lexer function.
pub fn lexer(input: &str) -> Result<Vec<Token>, String> {
    debug!(slog_scope::logger(), "Starting lexer...");

    match slog_scope::scope(
        &slog_scope::logger().new(o!("fn" => "markup_lexer()")),
        || markup_lexer(input),
    ) {
        Ok(output) => {
            debug!(slog_scope::logger(), "Lexing completed");
            Ok(output)
        }
        Err(e) => Err(e),
    }
}

/// Push a token, logging it first.
fn push<'a>(lex: &mut Vec<Token<'a>>, token_type: TokenType, contents: &'a str) {
    trace!(
        slog_scope::logger(),
        "Pushing token type {:?} containing {:?}",
        token_type,
        contents
    );
    lex.push(Token::new(token_type, contents));
}

/// The markup lexer.
///
/// Walks the input byte by byte. Every context boundary is an ASCII byte, so
/// the slices taken at those boundaries are always valid `str` slices.
fn markup_lexer(input: &str) -> Result<Vec<Token>, String> {
    let bytes = input.as_bytes();
    let mut lexer = Lexer::new();
    let mut lex: Vec<Token> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];

        match lexer.context {
            Context::Text => {
                if c == b'<' {
                    let next = bytes.get(i + 1).copied();
                    let context = if bytes[i..].starts_with(b"<!--") {
                        Some(Context::Comment)
                    } else if next == Some(b'!') || next == Some(b'?') {
                        Some(Context::Declaration)
                    } else if next.map_or(false, |n| n.is_ascii_alphabetic() || n == b'/') {
                        Some(Context::Tag)
                    } else {
                        // A lone '<' is just text.
                        None
                    };

                    if let Some(context) = context {
                        if i > lexer.start {
                            push(&mut lex, TokenType::Text, &input[lexer.start..i]);
                        }
                        lexer.start = i;
                        lexer.context = context;
                        if context == Context::Comment {
                            // Skip past "<!--" so "<!-->" isn't read as closed.
                            i += 4;
                            continue;
                        }
                    }
                }
            }
            Context::Tag => match lexer.quote {
                Some(q) => {
                    if c == q {
                        lexer.quote = None;
                    }
                }
                None => {
                    if c == b'"' || c == b'\'' {
                        // Only quotes that open an attribute value count.
                        if i > 0 && bytes[..i].trim_ascii_end().ends_with(b"=") {
                            lexer.quote = Some(c);
                        }
                    } else if c == b'>' {
                        let contents = &input[lexer.start..=i];
                        if contents.starts_with("</") {
                            push(&mut lex, TokenType::EndTag, contents);
                            lexer.context = Context::Text;
                        } else {
                            push(&mut lex, TokenType::StartTag, contents);
                            match raw_text_name(contents) {
                                Some(name) => {
                                    lexer.raw_end = Some(format!("</{}", name));
                                    lexer.context = Context::RawText;
                                }
                                None => lexer.context = Context::Text,
                            }
                        }
                        lexer.start = i + 1;
                    }
                }
            },
            Context::Comment => {
                if bytes[i..].starts_with(b"-->") {
                    push(&mut lex, TokenType::Comment, &input[lexer.start..i + 3]);
                    i += 3;
                    lexer.start = i;
                    lexer.context = Context::Text;
                    continue;
                }
            }
            Context::Declaration => {
                if c == b'>' {
                    push(&mut lex, TokenType::Declaration, &input[lexer.start..=i]);
                    lexer.start = i + 1;
                    lexer.context = Context::Text;
                }
            }
            Context::RawText => {
                let end = lexer.raw_end.as_deref().unwrap_or("</");
                if bytes.len() - i >= end.len()
                    && bytes[i..i + end.len()].eq_ignore_ascii_case(end.as_bytes())
                {
                    if i > lexer.start {
                        push(&mut lex, TokenType::RawText, &input[lexer.start..i]);
                    }
                    lexer.start = i;
                    lexer.raw_end = None;
                    lexer.context = Context::Tag;
                }
            }
        }

        i += 1;
    }

    // Deal with whatever is left at the end of the input.
    match lexer.context {
        Context::Text => {
            if lexer.start < bytes.len() {
                push(&mut lex, TokenType::Text, &input[lexer.start..]);
            }
        }
        Context::RawText => {
            if lexer.start < bytes.len() {
                push(&mut lex, TokenType::RawText, &input[lexer.start..]);
            }
        }
        Context::Tag => {
            let err_msg = format!("unterminated tag starting at byte {}", lexer.start);
            return Err(err_msg);
        }
        Context::Comment => {
            let err_msg = format!("unterminated comment starting at byte {}", lexer.start);
            return Err(err_msg);
        }
        Context::Declaration => {
            let err_msg = format!(
                "unterminated declaration starting at byte {}",
                lexer.start
            );
            return Err(err_msg);
        }
    }

    trace!(slog_scope::logger(), "Markup lexer complete.");
    Ok(lex)
}

/// If a start tag opens a raw-text element, return that element's name.
fn raw_text_name(tag: &str) -> Option<String> {
    let name: String = tag[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    if RAW_TEXT_ELEMENTS.contains(name.as_str()) && !tag.ends_with("/>") {
        Some(name)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_document() {
        let content =
            lexer(r#"<!DOCTYPE html><p class="a">Hello <b>there</b>.</p><!-- done -->"#)
                .unwrap();

        assert_eq!(content.len(), 9);
        assert_eq!(content[0].contents, "<!DOCTYPE html>");
        assert_eq!(content[0].token_type, TokenType::Declaration);
        assert_eq!(content[1].contents, r#"<p class="a">"#);
        assert_eq!(content[1].token_type, TokenType::StartTag);
        assert_eq!(content[2].contents, "Hello ");
        assert_eq!(content[2].token_type, TokenType::Text);
        assert_eq!(content[3].contents, "<b>");
        assert_eq!(content[3].token_type, TokenType::StartTag);
        assert_eq!(content[4].contents, "there");
        assert_eq!(content[4].token_type, TokenType::Text);
        assert_eq!(content[5].contents, "</b>");
        assert_eq!(content[5].token_type, TokenType::EndTag);
        assert_eq!(content[6].contents, ".");
        assert_eq!(content[6].token_type, TokenType::Text);
        assert_eq!(content[7].contents, "</p>");
        assert_eq!(content[7].token_type, TokenType::EndTag);
        assert_eq!(content[8].contents, "<!-- done -->");
        assert_eq!(content[8].token_type, TokenType::Comment);
    }

    mod tags {
        use super::*;

        #[test]
        fn gt_inside_quotes() {
            let content = lexer(r#"<span data-title="a > b">x</span>"#).unwrap();
            assert_eq!(content.len(), 3);
            assert_eq!(content[0].contents, r#"<span data-title="a > b">"#);
            assert_eq!(content[0].token_type, TokenType::StartTag);
        }

        #[test]
        fn single_quotes() {
            let content = lexer(r#"<span data-title='say "hi"'>x</span>"#).unwrap();
            assert_eq!(content[0].contents, r#"<span data-title='say "hi"'>"#);
        }

        #[test]
        fn lone_less_than() {
            let content = lexer("1 < 2 <3").unwrap();
            assert_eq!(content.len(), 1);
            assert_eq!(content[0].contents, "1 < 2 <3");
            assert_eq!(content[0].token_type, TokenType::Text);
        }

        #[test]
        fn unterminated() {
            let err = lexer("<p class=\"a").unwrap_err();
            assert!(err.contains("unterminated tag"));
        }
    }

    mod raw_text {
        use super::*;

        #[test]
        fn script() {
            let content = lexer("<script>if (a<b) { x = '</p>'; }</SCRIPT>after").unwrap();
            assert_eq!(content.len(), 4);
            assert_eq!(content[1].contents, "if (a<b) { x = '</p>'; }");
            assert_eq!(content[1].token_type, TokenType::RawText);
            assert_eq!(content[2].contents, "</SCRIPT>");
            assert_eq!(content[2].token_type, TokenType::EndTag);
            assert_eq!(content[3].contents, "after");
        }

        #[test]
        fn empty_script() {
            let content = lexer(r#"<script src="a.js"></script>"#).unwrap();
            assert_eq!(content.len(), 2);
            assert_eq!(content[1].token_type, TokenType::EndTag);
        }
    }

    mod comments {
        use super::*;

        #[test]
        fn tags_inside_comment() {
            let content = lexer("a<!-- <b>not a tag</b> -->c").unwrap();
            assert_eq!(content.len(), 3);
            assert_eq!(content[1].contents, "<!-- <b>not a tag</b> -->");
            assert_eq!(content[1].token_type, TokenType::Comment);
        }

        #[test]
        fn unterminated() {
            let err = lexer("a<!-- never closed").unwrap_err();
            assert!(err.contains("unterminated comment"));
        }
    }
}
