#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub(crate) struct PaddingWidth(usize);

impl PaddingWidth {
    pub(crate) fn new(width: usize) -> Option<Self> {
        // padding must be at least 1
        (width >= 1).then_some(PaddingWidth(width))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LeftWidth(usize);

impl LeftWidth {
    pub(crate) fn new(width: usize) -> Option<Self> {
        // left must be at least 1
        (width >= 1).then_some(LeftWidth(width))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MiddleWidth(usize);

impl MiddleWidth {
    pub(crate) fn new(width: usize) -> Option<Self> {
        // middle must be at least 2 (so we can hyphenate)
        (width >= 2).then_some(MiddleWidth(width))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TotalWidth(pub usize);

/// Lays out a left column (the flags) next to a wrapped middle column (the description).
#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    padding: PaddingWidth,
    left: LeftWidth,
    middle: MiddleWidth,
}

// Target 95% of the total width, so the output never runs right up against the edge.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Assuming an average word length of 5, 17 allows precisely 3 words with spaces between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

impl ColumnRenderer {
    /// A renderer fitting the middle column within `total_width`, where possible.
    pub(crate) fn guided(
        padding: PaddingWidth,
        left: LeftWidth,
        middle: MiddleWidth,
        total_width: TotalWidth,
    ) -> Self {
        let non_middle = left.0 + padding.0;
        let target_total_width = (total_width.0 as f64 * TARGET_TOTAL_FACTOR) as usize;
        let guided_middle = std::cmp::max(middle.0, MINIMUM_MIDDLE_WIDTH);

        if guided_middle + non_middle <= target_total_width {
            #[cfg(feature = "tracing_debug")]
            debug!("Columns {non_middle} and middle fit within the target total {target_total_width}.  Selecting middle: {guided_middle}.");
            Self::new(padding, left, MiddleWidth(guided_middle))
        } else if non_middle < total_width.0 {
            let calculated_middle = std::cmp::max(total_width.0 - non_middle, MINIMUM_MIDDLE_WIDTH);
            #[cfg(feature = "tracing_debug")]
            debug!("Columns {non_middle} fit within the total {total_width:?}.  Selecting middle: {calculated_middle}.");
            Self::new(padding, left, MiddleWidth(calculated_middle))
        } else {
            #[cfg(feature = "tracing_debug")]
            debug!("Columns {non_middle} do not fit within the total {total_width:?}.  Selecting middle: {MINIMUM_MIDDLE_WIDTH}.");
            Self::new(padding, left, MiddleWidth(MINIMUM_MIDDLE_WIDTH))
        }
    }

    pub(crate) fn new(padding: PaddingWidth, left: LeftWidth, middle: MiddleWidth) -> Self {
        Self {
            padding,
            left,
            middle,
        }
    }

    pub(crate) fn render(&self, indent: usize, left: &str, middle: &str) -> Vec<String> {
        let padding = format!("{:width$}", "", width = self.padding.0);
        let left_column_width = self.left.0;
        let middle_column_width = std::cmp::max(self.middle.0.saturating_sub(indent), 2);
        let mut out = Vec::default();

        for (i, part) in chunk(middle, middle_column_width).into_iter().enumerate() {
            let line = if i == 0 {
                format!("{:indent$}{:left_column_width$}{padding}{part}", "", left)
            } else {
                format!("{:indent$}{:left_column_width$}{padding}{part}", "", "")
            };
            out.push(line);
        }

        if out.is_empty() {
            out.push(format!("{:indent$}{left}", ""));
        }

        out
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ').filter(|word| !word.is_empty()) {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word.chars().count() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;

    while characters.len() - left > width {
        let part: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{part}-"));
        left += increment;
    }

    current.extend(characters[left..].iter());
}

/// Where user facing output goes.
pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, message: String);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, message: String) {
        eprintln!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn renderer(left: usize, middle: usize) -> ColumnRenderer {
        ColumnRenderer::new(
            PaddingWidth::new(2).unwrap(),
            LeftWidth::new(left).unwrap(),
            MiddleWidth::new(middle).unwrap(),
        )
    }

    #[test]
    fn widths() {
        assert!(PaddingWidth::new(0).is_none());
        assert!(LeftWidth::new(0).is_none());
        assert!(MiddleWidth::new(1).is_none());
        assert!(MiddleWidth::new(2).is_some());
    }

    #[test]
    fn column_renderer_simple() {
        assert_eq!(
            renderer(6, 20).render(1, "--flag", "does a thing"),
            vec![" --flag  does a thing"]
        );
        assert_eq!(
            renderer(6, 20).render(1, "-f", "does a thing"),
            vec![" -f      does a thing"]
        );
    }

    #[test]
    fn column_renderer_wraps() {
        assert_eq!(
            renderer(2, 11).render(0, "-f", "one two three four"),
            vec!["-f  one two", "    three four"]
        );
    }

    #[test]
    fn column_renderer_middle_empty() {
        assert_eq!(renderer(6, 20).render(1, "-f", ""), vec![" -f"]);
    }

    #[test]
    fn column_renderer_hyphenates() {
        assert_eq!(
            renderer(2, 5).render(0, "-f", "abcdefghij"),
            vec!["-f  abcd-", "    efgh-", "    ij"]
        );
    }

    #[rstest]
    #[case(100, 30)]
    #[case(35, 25)]
    #[case(10, MINIMUM_MIDDLE_WIDTH)]
    fn column_renderer_guided(#[case] total: usize, #[case] expected_middle: usize) {
        let renderer = ColumnRenderer::guided(
            PaddingWidth::new(2).unwrap(),
            LeftWidth::new(8).unwrap(),
            MiddleWidth::new(30).unwrap(),
            TotalWidth(total),
        );
        assert_eq!(renderer.middle.0, expected_middle);
    }

    #[test]
    fn chunk_words() {
        assert_eq!(chunk("  a  b ", 5), vec!["a b"]);
        assert_eq!(chunk("", 5), Vec::<String>::default());
    }
}
