//! Positional scanning over schema.rb text.
//!
//! `Cursor` is a byte offset into a borrowed buffer. Every matcher creates its
//! own cursors, so nothing about a scan survives between calls. The matchers
//! recognize the statement shapes of the DSL and hand back borrowed slices;
//! interpreting option text is left to the `options` module.

/// A position in a source buffer.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn at(src: &'a str, pos: usize) -> Self {
        Self { src, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub fn eat(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    pub fn eat_char(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds and return them.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    /// Skip any whitespace, newlines included. Returns true if anything was
    /// skipped.
    pub fn skip_whitespace(&mut self) -> bool {
        !self.eat_while(char::is_whitespace).is_empty()
    }

    /// Skip spaces and tabs without leaving the current line.
    pub fn skip_inline_whitespace(&mut self) -> bool {
        !self.eat_while(|c| c.is_whitespace() && c != '\n').is_empty()
    }

    /// Consume up to (not including) the next newline.
    pub fn line_rest(&mut self) -> &'a str {
        self.eat_while(|c| c != '\n')
    }

    /// Read `"..."` without crossing a newline; returns the contents.
    fn double_quoted(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.eat_char('"') {
            return None;
        }
        let inner = self.eat_while(|c| c != '"' && c != '\n');
        if self.eat_char('"') {
            Some(inner)
        } else {
            self.pos = start;
            None
        }
    }
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Offsets of `keyword` in `text` that do not continue a longer identifier or
/// method chain on the left.
fn keyword_positions<'a>(text: &'a str, keyword: &'a str) -> impl Iterator<Item = usize> + 'a {
    text.match_indices(keyword).filter_map(move |(pos, _)| {
        let prev = text[..pos].chars().next_back();
        match prev {
            Some(c) if is_word_char(c) || c == '.' => None,
            _ => Some(pos),
        }
    })
}

/// Given `open` pointing at `[` or `{`, return the offset just past the
/// matching closer. Quoted strings are skipped; mismatched or unterminated
/// input yields `None`.
pub fn balanced_end(src: &str, open: usize) -> Option<usize> {
    let mut cursor = Cursor::at(src, open);
    let mut stack: Vec<char> = Vec::new();

    while let Some(c) = cursor.bump() {
        match c {
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ']' | '}' => {
                if stack.pop() != Some(c) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(cursor.pos());
                }
            }
            '"' | '\'' => {
                cursor.eat_while(|q| q != c);
                if !cursor.eat_char(c) {
                    return None;
                }
            }
            _ => {}
        }
        if stack.is_empty() {
            // `open` was not a bracket
            return None;
        }
    }
    None
}

/// Options trailing a statement: the rest of the line must be blank or start
/// with a comma.
fn trailing_options<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    let tail = cursor.line_rest().trim();
    if tail.is_empty() {
        Some("")
    } else {
        tail.strip_prefix(',').map(str::trim)
    }
}

/// `create_table "<name>" [, <options>] do |t| <body> end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBlock<'a> {
    pub name: &'a str,
    pub options: &'a str,
    pub body: &'a str,
}

/// `t.<type> "<name>" [, <options>]` or `t.column "<name>", "<type>" [, <options>]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDecl<'a> {
    pub name: &'a str,
    pub typ: &'a str,
    pub options: &'a str,
}

/// `t.index [<names>] [, <options>]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDecl<'a> {
    /// Bracketed array text, brackets included
    pub columns: &'a str,
    pub options: &'a str,
}

/// `add_foreign_key "<from>", "<to>" [, <options>]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyDecl<'a> {
    pub from_table: &'a str,
    pub to_table: &'a str,
    pub options: &'a str,
}

pub fn table_blocks(text: &str) -> Vec<TableBlock<'_>> {
    const KEYWORD: &str = "create_table";
    let mut blocks = Vec::new();
    let mut resume = 0;

    for pos in keyword_positions(text, KEYWORD) {
        if pos < resume {
            continue;
        }
        let mut cursor = Cursor::at(text, pos + KEYWORD.len());
        if let Some((block, end)) = table_block_at(&mut cursor) {
            blocks.push(block);
            resume = end;
        }
    }
    blocks
}

fn table_block_at<'a>(cursor: &mut Cursor<'a>) -> Option<(TableBlock<'a>, usize)> {
    let text = cursor.src();
    if !cursor.skip_whitespace() {
        return None;
    }
    let name = cursor.double_quoted()?;
    cursor.eat_char(',');

    let options_start = cursor.pos();
    let line = Cursor::at(text, options_start).line_rest();

    // options run to the first `do` that opens a `|t|` block
    let body_start = line.match_indices("do").find_map(|(offset, _)| {
        let mut probe = Cursor::at(text, options_start + offset + 2);
        probe.skip_whitespace();
        probe.eat("|t|").then(|| {
            probe.skip_whitespace();
            (offset, probe.pos())
        })
    });
    let (options_len, body_start) = body_start?;
    let options = &text[options_start..options_start + options_len];

    let body_end = text[body_start..]
        .match_indices("end")
        .map(|(offset, _)| body_start + offset)
        .find(|&at| {
            let before = text[body_start..at].chars().next_back();
            let after = text[at + 3..].chars().next();
            before.is_none_or(char::is_whitespace) && after.is_none_or(char::is_whitespace)
        })?;

    let block = TableBlock {
        name,
        options,
        body: text[body_start..body_end].trim_end(),
    };
    Some((block, body_end))
}

pub fn typed_columns(body: &str) -> Vec<ColumnDecl<'_>> {
    keyword_positions(body, "t.")
        .filter_map(|pos| {
            let mut cursor = Cursor::at(body, pos + 2);
            let typ = cursor.eat_while(is_word_char);
            if typ.is_empty() || typ == "column" || typ == "index" {
                return None;
            }
            if !cursor.skip_inline_whitespace() {
                return None;
            }
            let name = cursor.double_quoted().filter(|n| !n.is_empty())?;
            let options = trailing_options(&mut cursor)?;
            Some(ColumnDecl { name, typ, options })
        })
        .collect()
}

pub fn generic_columns(body: &str) -> Vec<ColumnDecl<'_>> {
    const KEYWORD: &str = "t.column";
    keyword_positions(body, KEYWORD)
        .filter_map(|pos| {
            let mut cursor = Cursor::at(body, pos + KEYWORD.len());
            if !cursor.skip_inline_whitespace() {
                return None;
            }
            let name = cursor.double_quoted().filter(|n| !n.is_empty())?;
            cursor.skip_inline_whitespace();
            if !cursor.eat_char(',') {
                return None;
            }
            cursor.skip_inline_whitespace();
            let typ = cursor.double_quoted().filter(|t| !t.is_empty())?;
            let options = trailing_options(&mut cursor)?;
            Some(ColumnDecl { name, typ, options })
        })
        .collect()
}

pub fn indexes(body: &str) -> Vec<IndexDecl<'_>> {
    const KEYWORD: &str = "t.index";
    keyword_positions(body, KEYWORD)
        .filter_map(|pos| {
            let mut cursor = Cursor::at(body, pos + KEYWORD.len());
            if !cursor.skip_whitespace() || cursor.peek() != Some('[') {
                return None;
            }
            let open = cursor.pos();
            let close = balanced_end(body, open)?;
            if body[open + 1..close - 1].trim().is_empty() {
                return None;
            }
            let mut cursor = Cursor::at(body, close);
            let options = trailing_options(&mut cursor)?;
            Some(IndexDecl {
                columns: &body[open..close],
                options,
            })
        })
        .collect()
}

pub fn foreign_keys(text: &str) -> Vec<ForeignKeyDecl<'_>> {
    const KEYWORD: &str = "add_foreign_key";
    keyword_positions(text, KEYWORD)
        .filter_map(|pos| {
            let mut cursor = Cursor::at(text, pos + KEYWORD.len());
            if !cursor.skip_whitespace() {
                return None;
            }
            let from_table = cursor.double_quoted()?;
            if !cursor.eat_char(',') {
                return None;
            }
            cursor.skip_whitespace();
            let to_table = cursor.double_quoted()?;
            cursor.eat_char(',');
            let options = cursor.line_rest().trim();
            Some(ForeignKeyDecl {
                from_table,
                to_table,
                options,
            })
        })
        .collect()
}
