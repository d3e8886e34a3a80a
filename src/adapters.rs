use super::*;

mod merged_text;

pub(crate) use merged_text::MergedTextExt;
