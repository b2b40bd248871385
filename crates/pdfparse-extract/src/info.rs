use std::collections::BTreeMap;

use lopdf::{Document, Object};

/// Read the trailer `/Info` dictionary as string pairs.
///
/// Keys come back without their leading `/`. A document without an Info
/// dictionary yields an empty map. Values that are not strings, names or
/// numbers (arrays, streams, nested dictionaries) are skipped.
pub(crate) fn info_dictionary(doc: &Document) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    let info = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => doc.get_object(*id).ok(),
        Ok(obj) => Some(obj),
        Err(_) => None,
    };
    let Some(Ok(dict)) = info.map(|obj| obj.as_dict()) else {
        return metadata;
    };

    for (key, value) in dict.iter() {
        let key = String::from_utf8_lossy(key)
            .trim_start_matches('/')
            .to_string();
        if let Some(value) = object_to_string(doc, value) {
            metadata.insert(key, value);
        }
    }
    metadata
}

fn object_to_string(doc: &Document, obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Integer(i) => Some(i.to_string()),
        Object::Real(r) => Some(r.to_string()),
        Object::Boolean(b) => Some(b.to_string()),
        Object::Reference(id) => doc
            .get_object(*id)
            .ok()
            .and_then(|inner| object_to_string(doc, inner)),
        _ => None,
    }
}

/// PDF text strings are UTF-16BE when they start with a byte order mark and
/// PDFDocEncoding (close enough to Latin-1 for metadata) otherwise.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}
