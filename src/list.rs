use super::*;

const BULLET: char = '•';

/// The marker written before each plain text list item.
///
/// Unordered lists always use `•`, whatever bullet the source used.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ListMarker {
    Ordered { number: u64 },
    Unordered,
}

impl std::default::Default for ListMarker {
    fn default() -> Self {
        ListMarker::Unordered
    }
}

impl ListMarker {
    pub(crate) fn new(list: &List) -> Self {
        if list.ordered {
            ListMarker::Ordered { number: list.start }
        } else {
            ListMarker::Unordered
        }
    }

    pub(crate) fn increment_count(&mut self) {
        match self {
            Self::Ordered { number } => {
                *number += 1;
            }
            Self::Unordered => {}
        }
    }

    pub(crate) fn marker(&self) -> Cow<'static, str> {
        match self {
            Self::Ordered { number } => format!("{number}.").into(),
            Self::Unordered => BULLET.to_string().into(),
        }
    }

    /// Continuation lines line up with the text after the marker.
    pub(crate) fn indentation(&self) -> String {
        " ".repeat(self.marker().chars().count() + 1)
    }

    /// Put the marker in front of already rendered item content.
    pub(crate) fn apply(&self, content: &str) -> String {
        let marker = self.marker();
        if content.is_empty() {
            return marker.into_owned();
        }
        let indentation = self.indentation();
        let indented = textwrap::indent(content, &indentation);
        let body = indented.strip_prefix(indentation.as_str()).unwrap_or(&indented);
        format!("{marker} {}", body.trim_end_matches('\n'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ordered: bool, start: u64) -> List {
        List {
            ordered,
            start,
            tight: true,
            items: Vec::new(),
        }
    }

    #[test]
    fn ordered_markers_count_from_start() {
        let mut marker = ListMarker::new(&list(true, 9));
        assert_eq!(marker.marker(), "9.");
        marker.increment_count();
        assert_eq!(marker.marker(), "10.");
        assert_eq!(marker.indentation(), "    ");
    }

    #[test]
    fn bullets_never_count() {
        let mut marker = ListMarker::new(&list(false, 1));
        marker.increment_count();
        assert_eq!(marker, ListMarker::Unordered);
        assert_eq!(marker.apply("one\ntwo\n\nthree"), "• one\n  two\n\n  three");
        assert_eq!(marker.apply(""), "•");
    }
}
