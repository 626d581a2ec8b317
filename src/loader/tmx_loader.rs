// src/loader/tmx_loader.rs
use crate::config::LoadOptions;
use crate::error::MapError;
use crate::loader::events::{attributes_of, end_name, start_name, TmxEvent};
use crate::loader::session::ParserSession;
use crate::map::Layout;
use crate::tileset::TextureLookup;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io;
use std::path::Path;

/// Parses a TMX document held in memory.
pub fn parse_str<L: TextureLookup>(
    xml: &str,
    textures: L,
    options: &LoadOptions,
) -> Result<Layout<L::Texture>, MapError> {
    let mut session = ParserSession::new(textures, options.clone());
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = start_name(&e)?;
                session.start_element(&name, &attributes_of(&e)?)?;
            }
            Event::Empty(e) => {
                let name = start_name(&e)?;
                session.start_element(&name, &attributes_of(&e)?)?;
                session.end_element(&name)?;
            }
            Event::End(e) => {
                let name = end_name(&e)?;
                session.end_element(&name)?;
            }
            Event::Text(t) => {
                let txt = t.decode()?;
                session.text(&txt)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    session.finish()
}

/// Parses an already tokenized event stream.
pub fn parse_events<L, I>(events: I, textures: L, options: &LoadOptions) -> Result<Layout<L::Texture>, MapError>
where
    L: TextureLookup,
    I: IntoIterator<Item = TmxEvent>,
{
    let mut session = ParserSession::new(textures, options.clone());
    for event in events {
        session.feed(&event)?;
    }
    session.finish()
}

/// Reads and parses a `.tmx` file.
pub fn load_file<L: TextureLookup>(
    path: impl AsRef<Path>,
    textures: L,
    options: &LoadOptions,
) -> Result<Layout<L::Texture>, MapError> {
    let p = path.as_ref();
    log::info!("loading tmx map {}", p.display());

    let txt = std::fs::read_to_string(p).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => MapError::NotFound {
            path: p.to_path_buf(),
        },
        _ => MapError::Read {
            path: p.to_path_buf(),
            source,
        },
    })?;
    parse_str(&txt, textures, options)
}
