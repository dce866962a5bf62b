//! M3U8 playlist text handling: `#EXTINF` model, parser, emitter and
//! group-title resolution.

pub mod emitter;
pub mod extinf;
pub mod group_title;
pub mod parser;

pub use emitter::PlaylistEmitter;
pub use extinf::{AttributeSpan, ExtInf};
pub use group_title::{record_group_title, resolve_group_title_list, resolve_group_titles};
pub use parser::{parse_entries, Playlist, PlaylistEntry};
