//! Aggregate codec holder.

use std::sync::Arc;

use crate::json::JsonCodec;
use crate::types::{TextCodec, TextFormat};
use crate::xml::XmlCodec;

/// One shared instance of every codec, handed out per format.
#[derive(Debug, Clone)]
pub struct Codecs {
    pub json: Arc<JsonCodec>,
    pub xml: Arc<XmlCodec>,
}

impl Default for Codecs {
    fn default() -> Self {
        Self::new()
    }
}

impl Codecs {
    pub fn new() -> Self {
        Self {
            json: Arc::new(JsonCodec::new()),
            xml: Arc::new(XmlCodec::new()),
        }
    }

    pub fn get(&self, format: TextFormat) -> Arc<dyn TextCodec> {
        match format {
            TextFormat::Json => self.json.clone(),
            TextFormat::Xml => self.xml.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_hands_out_matching_codecs() {
        let codecs = Codecs::new();
        assert_eq!(codecs.get(TextFormat::Json).id(), "json");
        assert_eq!(codecs.get(TextFormat::Xml).id(), "xml");
        assert_eq!(codecs.get(TextFormat::Xml).format(), TextFormat::Xml);
    }
}
