use super::*;

/// Conveniently turn any iterator of [Event]s into a [`MergedTextAdapter`].
pub(crate) trait MergedTextExt<'input, I>
where
    I: Iterator<Item = Event<'input>>,
{
    fn merged_text(self) -> MergedTextAdapter<'input, I>;
}

// Blanket impl for all iterators
impl<'input, I> MergedTextExt<'input, I> for I
where
    I: Iterator<Item = Event<'input>>,
{
    fn merged_text(self) -> MergedTextAdapter<'input, I> {
        MergedTextAdapter::new(self)
    }
}

/// [pulldown_cmark] splits a run of text at entities, escapes and unmatched delimiters.
/// This joins consecutive [Event::Text] back together so later passes see whole words
/// and whole URLs.
pub(crate) struct MergedTextAdapter<'input, I>
where
    I: Iterator<Item = Event<'input>>,
{
    inner: Peekable<I>,
}

impl<'input, I> MergedTextAdapter<'input, I>
where
    I: Iterator<Item = Event<'input>>,
{
    fn new(inner: I) -> Self {
        Self {
            inner: inner.peekable(),
        }
    }
}

impl<'input, I> Iterator for MergedTextAdapter<'input, I>
where
    I: Iterator<Item = Event<'input>>,
{
    type Item = Event<'input>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.inner.next()?;
        let Event::Text(first) = event else {
            return Some(event);
        };
        if !matches!(self.inner.peek(), Some(Event::Text(_))) {
            return Some(Event::Text(first));
        }

        let mut merged = first.into_string();
        while let Some(Event::Text(next)) = self
            .inner
            .next_if(|event| matches!(event, Event::Text(_)))
        {
            merged.push_str(&next);
        }
        Some(Event::Text(merged.into()))
    }
}
