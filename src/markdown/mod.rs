//! Terminal rendering for assistant replies. CommonMark plus the GitHub
//! extensions (tables, strikethrough, task lists) is parsed by pulldown-cmark;
//! this module folds its event stream into blocks and lays them out as lines.

use pulldown_cmark::{ Event, Options, Parser, Tag };
use std::mem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Code(String),
    Strong(Vec<Span>),
    Emphasis(Vec<Span>),
    Strike(Vec<Span>),
    Link {
        text: Vec<Span>,
        url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: usize,
        spans: Vec<Span>,
    },
    Paragraph(Vec<Span>),
    /// List entry; `number` is `None` for bullets, `depth` is 0 at top level.
    Item {
        number: Option<u64>,
        depth: usize,
        spans: Vec<Span>,
    },
    Quote(Vec<Span>),
    Code(Vec<String>),
    /// Header row first.
    Table(Vec<Vec<Vec<Span>>>),
    Rule,
}

/// Open container while walking the event stream.
enum Frame {
    Paragraph,
    Heading(usize),
    Quote,
    Code,
    List(Option<u64>),
    Item {
        number: Option<u64>,
        depth: usize,
        emitted: bool,
    },
    Table,
    Row,
    Cell,
    Strong,
    Emphasis,
    Strike,
    Link(String),
    Other,
}

struct Builder {
    blocks: Vec<Block>,
    frames: Vec<Frame>,
    /// Bottom entry collects the current block's text; each open inline
    /// container pushes one more.
    spans: Vec<Vec<Span>>,
    code: String,
    row: Vec<Vec<Span>>,
    rows: Vec<Vec<Vec<Span>>>,
}

impl Builder {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            frames: Vec::new(),
            spans: vec![Vec::new()],
            code: String::new(),
            row: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn push_span(&mut self, span: Span) {
        let Some(buf) = self.spans.last_mut() else {
            return;
        };
        // The parser splits text at every delimiter candidate.
        if let (Span::Text(next), Some(Span::Text(prev))) = (&span, buf.last_mut()) {
            prev.push_str(next);
            return;
        }
        buf.push(span);
    }

    fn take_root(&mut self) -> Vec<Span> {
        self.spans.first_mut().map(mem::take).unwrap_or_default()
    }

    fn open_inline(&mut self, frame: Frame) {
        self.frames.push(frame);
        self.spans.push(Vec::new());
    }

    fn close_inline(&mut self) -> Vec<Span> {
        if self.spans.len() > 1 { self.spans.pop().unwrap_or_default() } else { Vec::new() }
    }

    fn in_quote(&self) -> bool {
        self.frames.iter().any(|f| matches!(f, Frame::Quote))
    }

    /// Emits a tight list item's text before a nested block starts.
    fn flush_item_text(&mut self) {
        let spans = self.take_root();
        if spans.is_empty() {
            return;
        }
        self.emit_text(spans);
    }

    /// Places finished block text: the first text of a list item becomes the
    /// item, anything else a paragraph or quote.
    fn emit_text(&mut self, spans: Vec<Span>) {
        if let Some(Frame::Item { number, depth, emitted }) = self.frames.last_mut() {
            if !*emitted {
                *emitted = true;
                let (number, depth) = (*number, *depth);
                self.blocks.push(Block::Item { number, depth, spans });
                return;
            }
        }
        if self.in_quote() {
            self.blocks.push(Block::Quote(spans));
        } else {
            self.blocks.push(Block::Paragraph(spans));
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::HtmlBlock => self.frames.push(Frame::Paragraph),
            Tag::Heading { level, .. } => {
                self.flush_item_text();
                self.frames.push(Frame::Heading(level as usize));
            }
            Tag::BlockQuote(..) => self.frames.push(Frame::Quote),
            Tag::CodeBlock(_) => {
                self.flush_item_text();
                self.code.clear();
                self.frames.push(Frame::Code);
            }
            Tag::List(first) => {
                self.flush_item_text();
                self.frames.push(Frame::List(first));
            }
            Tag::Item => {
                let depth = self.frames
                    .iter()
                    .filter(|f| matches!(f, Frame::List(_)))
                    .count()
                    .saturating_sub(1);
                let number = match self.frames.last_mut() {
                    Some(Frame::List(Some(next))) => {
                        let number = *next;
                        *next += 1;
                        Some(number)
                    }
                    _ => None,
                };
                self.frames.push(Frame::Item { number, depth, emitted: false });
            }
            Tag::Table(_) => {
                self.rows.clear();
                self.frames.push(Frame::Table);
            }
            Tag::TableHead | Tag::TableRow => {
                self.row.clear();
                self.frames.push(Frame::Row);
            }
            Tag::TableCell => self.frames.push(Frame::Cell),
            Tag::Strong => self.open_inline(Frame::Strong),
            Tag::Emphasis => self.open_inline(Frame::Emphasis),
            Tag::Strikethrough => self.open_inline(Frame::Strike),
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                self.open_inline(Frame::Link(dest_url.to_string()))
            }
            _ => self.frames.push(Frame::Other),
        }
    }

    /// Events nest strictly, so every end closes the innermost frame.
    fn end(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        match frame {
            Frame::Paragraph => {
                let spans = self.take_root();
                if !spans.is_empty() {
                    self.emit_text(spans);
                }
            }
            Frame::Heading(level) => {
                let spans = self.take_root();
                self.blocks.push(Block::Heading { level, spans });
            }
            Frame::Item { number, depth, emitted } => {
                let spans = self.take_root();
                if spans.is_empty() {
                    return;
                }
                if emitted {
                    self.emit_text(spans);
                } else {
                    self.blocks.push(Block::Item { number, depth, spans });
                }
            }
            Frame::Code => {
                let lines = self.code.lines().map(str::to_string).collect();
                self.code.clear();
                self.blocks.push(Block::Code(lines));
            }
            Frame::Cell => {
                let cell = self.take_root();
                self.row.push(cell);
            }
            Frame::Row => {
                let row = mem::take(&mut self.row);
                self.rows.push(row);
            }
            Frame::Table => {
                let rows = mem::take(&mut self.rows);
                self.blocks.push(Block::Table(rows));
            }
            Frame::Strong => {
                let inner = self.close_inline();
                self.push_span(Span::Strong(inner));
            }
            Frame::Emphasis => {
                let inner = self.close_inline();
                self.push_span(Span::Emphasis(inner));
            }
            Frame::Strike => {
                let inner = self.close_inline();
                self.push_span(Span::Strike(inner));
            }
            Frame::Link(url) => {
                let text = self.close_inline();
                self.push_span(Span::Link { text, url });
            }
            Frame::Quote | Frame::List(_) | Frame::Other => {}
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if matches!(self.frames.last(), Some(Frame::Code)) {
                    self.code.push_str(&text);
                } else {
                    self.push_span(Span::Text(text.to_string()));
                }
            }
            Event::Code(code) => self.push_span(Span::Code(code.to_string())),
            Event::SoftBreak | Event::HardBreak => self.push_span(Span::Text(" ".to_string())),
            Event::Html(raw) | Event::InlineHtml(raw) => {
                self.push_span(Span::Text(raw.trim_end().to_string()))
            }
            Event::TaskListMarker(done) => {
                self.push_span(Span::Text((if done { "[x] " } else { "[ ] " }).to_string()))
            }
            Event::FootnoteReference(label) => self.push_span(Span::Text(format!("[{}]", label))),
            Event::Rule => {
                self.flush_item_text();
                self.blocks.push(Block::Rule);
            }
            _ => {}
        }
    }
}

pub fn parse(markdown: &str) -> Vec<Block> {
    let options = Options::ENABLE_TABLES |
        Options::ENABLE_STRIKETHROUGH |
        Options::ENABLE_TASKLISTS;
    let mut builder = Builder::new();
    for event in Parser::new_ext(markdown, options) {
        builder.event(event);
    }
    builder.blocks
}

const BOLD: &str = "\x1b[1m";
const BOLD_OFF: &str = "\x1b[22m";
const ITALIC: &str = "\x1b[3m";
const ITALIC_OFF: &str = "\x1b[23m";
const UNDERLINE: &str = "\x1b[4m";
const UNDERLINE_OFF: &str = "\x1b[24m";
const STRIKE: &str = "\x1b[9m";
const STRIKE_OFF: &str = "\x1b[29m";

pub fn plain_text(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Span::Text(s) | Span::Code(s) => s.clone(),
            Span::Strong(inner) | Span::Emphasis(inner) | Span::Strike(inner) => plain_text(inner),
            Span::Link { text, .. } => plain_text(text),
        })
        .collect()
}

fn render_spans(spans: &[Span], ansi: bool) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Span::Text(s) => out.push_str(s),
            Span::Code(s) => out.push_str(&format!("`{}`", s)),
            Span::Strong(inner) => {
                let inner = render_spans(inner, ansi);
                if ansi {
                    out.push_str(&format!("{}{}{}", BOLD, inner, BOLD_OFF));
                } else {
                    out.push_str(&inner.to_uppercase());
                }
            }
            Span::Emphasis(inner) => {
                let inner = render_spans(inner, ansi);
                if ansi {
                    out.push_str(&format!("{}{}{}", ITALIC, inner, ITALIC_OFF));
                } else {
                    out.push_str(&format!("_{}_", inner));
                }
            }
            Span::Strike(inner) => {
                let inner = render_spans(inner, ansi);
                if ansi {
                    out.push_str(&format!("{}{}{}", STRIKE, inner, STRIKE_OFF));
                } else {
                    out.push_str(&format!("~{}~", inner));
                }
            }
            Span::Link { text, url } => {
                let label = render_spans(text, ansi);
                if plain_text(text) == *url {
                    out.push_str(url);
                } else if ansi {
                    out.push_str(&format!("{}{}{} ({})", UNDERLINE, label, UNDERLINE_OFF, url));
                } else {
                    out.push_str(&format!("{} ({})", label, url));
                }
            }
        }
    }
    out
}

/// Lays blocks out as terminal lines. With `ansi` off, strong text is
/// upper-cased, emphasis keeps underscores and links show their target.
pub fn render(blocks: &[Block], ansi: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for block in blocks {
        match block {
            Block::Heading { level, spans } => {
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                let text = render_spans(spans, ansi);
                lines.push(if ansi { format!("{}{}{}", BOLD, text, BOLD_OFF) } else { text });
                let width = plain_text(spans).chars().count();
                match level {
                    1 => lines.push("=".repeat(width)),
                    2 => lines.push("-".repeat(width)),
                    _ => {}
                }
            }
            Block::Paragraph(spans) => lines.push(render_spans(spans, ansi)),
            Block::Item { number, depth, spans } => {
                let indent = "  ".repeat(depth + 1);
                let marker = match number {
                    Some(n) => format!("{}.", n),
                    None => "•".to_string(),
                };
                lines.push(format!("{}{} {}", indent, marker, render_spans(spans, ansi)));
            }
            Block::Quote(spans) => lines.push(format!("  │ {}", render_spans(spans, ansi))),
            Block::Code(code) => lines.extend(code.iter().map(|l| format!("    {}", l))),
            Block::Table(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    let cells: Vec<String> = row
                        .iter()
                        .map(|cell| render_spans(cell, ansi))
                        .collect();
                    let line = format!("  {}", cells.join(" | "));
                    let width = line.chars().count().saturating_sub(2);
                    lines.push(line);
                    if i == 0 {
                        lines.push(format!("  {}", "-".repeat(width)));
                    }
                }
            }
            Block::Rule => lines.push("─".repeat(40)),
        }
    }
    lines
}

pub fn render_markdown(markdown: &str, ansi: bool) -> Vec<String> {
    render(&parse(markdown), ansi)
}
