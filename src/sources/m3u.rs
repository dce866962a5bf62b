//! M3U8 input needs no adaptation; the text goes to the first step as is.

use crate::errors::SourceResult;
use crate::pipeline::traits::TransformInput;

use super::{decode_text, SourceAdapter, SourceFormat};

pub struct M3uAdapter;

impl SourceAdapter for M3uAdapter {
    fn format(&self) -> SourceFormat {
        SourceFormat::M3u8
    }

    fn adapt(&self, bytes: &[u8]) -> SourceResult<TransformInput> {
        Ok(TransformInput::Playlist(decode_text(bytes)?))
    }
}
