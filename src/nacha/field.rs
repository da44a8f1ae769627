//! Fixed-width field tables
//!
//! Every NACHA record is described as a table of [`FieldSpec`]s and rendered
//! by [`render_record`]. A table is only valid when its widths add up to
//! [`RECORD_LENGTH`].

/// Characters per NACHA record.
pub const RECORD_LENGTH: usize = 94;

/// Which side of the field the value is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    /// Value first, padding after
    Left,
    /// Padding first, value after
    Right,
}

/// Where a field's value comes from.
pub enum Source<R> {
    /// Fixed text, e.g. a record type code
    Literal(&'static str),
    /// Reserved space
    Blank,
    /// Read from the record being rendered
    Value(fn(&R) -> String),
}

/// One column of a fixed-width record.
pub struct FieldSpec<R> {
    pub name: &'static str,
    pub width: usize,
    pub justify: Justify,
    pub pad: char,
    pub source: Source<R>,
}

impl<R> FieldSpec<R> {
    /// A constant whose width is its own length.
    pub const fn literal(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            width: value.len(),
            justify: Justify::Left,
            pad: ' ',
            source: Source::Literal(value),
        }
    }

    pub const fn blank(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            justify: Justify::Left,
            pad: ' ',
            source: Source::Blank,
        }
    }

    /// Left-justified, space padded.
    pub const fn text(name: &'static str, width: usize, value: fn(&R) -> String) -> Self {
        Self {
            name,
            width,
            justify: Justify::Left,
            pad: ' ',
            source: Source::Value(value),
        }
    }

    /// Right-justified, space padded.
    pub const fn right(name: &'static str, width: usize, value: fn(&R) -> String) -> Self {
        Self {
            name,
            width,
            justify: Justify::Right,
            pad: ' ',
            source: Source::Value(value),
        }
    }

    /// Right-justified, zero filled.
    pub const fn numeric(name: &'static str, width: usize, value: fn(&R) -> String) -> Self {
        Self {
            name,
            width,
            justify: Justify::Right,
            pad: '0',
            source: Source::Value(value),
        }
    }

    pub const fn padded(
        name: &'static str,
        width: usize,
        justify: Justify,
        pad: char,
        value: fn(&R) -> String,
    ) -> Self {
        Self {
            name,
            width,
            justify,
            pad,
            source: Source::Value(value),
        }
    }

    fn value(&self, record: &R) -> String {
        match &self.source {
            Source::Literal(text) => (*text).to_string(),
            Source::Blank => String::new(),
            Source::Value(read) => read(record),
        }
    }
}

/// Sum of all field widths in a table.
pub fn layout_width<R>(layout: &[FieldSpec<R>]) -> usize {
    layout.iter().map(|f| f.width).sum()
}

/// Walk a field table and produce one fixed-width line.
pub fn render_record<R>(layout: &[FieldSpec<R>], record: &R) -> String {
    let mut line = String::with_capacity(RECORD_LENGTH);
    for field in layout {
        line.push_str(&fit(&field.value(record), field.width, field.justify, field.pad));
    }
    debug_assert_eq!(line.chars().count(), layout_width(layout));
    line
}

/// Pad `value` to `width`, or cut it to its first `width` characters.
///
/// Overlong values are truncated, never rejected. Characters outside printable
/// ASCII are written as spaces so every line stays one byte per character.
pub fn fit(value: &str, width: usize, justify: Justify, pad: char) -> String {
    let clean: Vec<char> = value
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { ' ' })
        .collect();

    if clean.len() >= width {
        return clean[..width].iter().collect();
    }

    let padding = std::iter::repeat(pad).take(width - clean.len());
    match justify {
        Justify::Left => clean.iter().copied().chain(padding).collect(),
        Justify::Right => padding.chain(clean.iter().copied()).collect(),
    }
}
