//! Tagset lookup.
//!
//! Every plugin known to the tag database has one tagset file, named after
//! the hex encoding of its type, subtype and manufacturer codes. The file is
//! an XML property list whose nested dictionary lists the assigned
//! categories as keys:
//!
//! ```xml
//! <!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
//! <plist version="1.0">
//!   <dict>
//!     <key>tags</key>
//!     <dict>
//!       <key>Delay</key>
//!       <string>user</string>
//!     </dict>
//!   </dict>
//! </plist>
//! ```

use crate::error::AuditError;
use std::fs;
use std::path::Path;

pub const TAGSET_EXTENSION: &str = "tagset";

/// Builds the tagset file name for a plugin identifier.
///
/// `AudioUnit:Effects/aufx,clu2,SNSH` becomes
/// `61756678-636c7532-534e5348.tagset`.
pub fn tagset_file_name(identifier: &str) -> Result<String, AuditError> {
    let malformed = |reason: &str| AuditError::MalformedIdentifier {
        identifier: identifier.to_string(),
        reason: reason.to_string(),
    };

    let (_, codes) = identifier
        .split_once('/')
        .ok_or_else(|| malformed("missing '/' separator"))?;
    if codes.contains('/') {
        return Err(malformed("more than one '/' separator"));
    }

    let codes: Vec<&str> = codes.split(',').collect();
    if codes.len() != 3 {
        return Err(malformed(&format!("expected 3 type codes, found {}", codes.len())));
    }

    let encoded: Vec<String> = codes.iter().map(|code| hex::encode(code.as_bytes())).collect();
    Ok(format!("{}.{}", encoded.join("-"), TAGSET_EXTENSION))
}

/// Reads the category names from a tagset file.
pub fn read_categories(path: &Path) -> Result<Vec<String>, AuditError> {
    let content = fs::read_to_string(path).map_err(|e| AuditError::TagsetParse(e.to_string()))?;
    parse_categories(&content)
}

/// Extracts the category names from tagset XML, in document order.
///
/// Assumes the first nested dictionary is the category dictionary.
pub fn parse_categories(content: &str) -> Result<Vec<String>, AuditError> {
    // Property lists carry a DOCTYPE declaration.
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(content, options)
        .map_err(|e| AuditError::TagsetParse(e.to_string()))?;

    let outer = child_element(doc.root_element(), "dict")
        .ok_or_else(|| AuditError::TagsetParse("no dict element under root".to_string()))?;
    let inner = child_element(outer, "dict")
        .ok_or_else(|| AuditError::TagsetParse("no nested dict element".to_string()))?;

    let categories = inner
        .children()
        .filter(|n| n.has_tag_name("key"))
        .map(|key| key.text().unwrap_or_default().to_string())
        .collect();

    Ok(categories)
}

fn child_element<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagset(keys: &[&str]) -> String {
        let entries: String = keys
            .iter()
            .map(|k| format!("<key>{}</key><string>user</string>", k))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0"><dict><key>tags</key><dict>{}</dict></dict></plist>"#,
            entries
        )
    }

    #[test]
    fn resolves_documented_identifier() {
        assert_eq!(
            tagset_file_name("AudioUnit:Effects/aufx,clu2,SNSH").unwrap(),
            "61756678-636c7532-534e5348.tagset"
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let id = "AudioUnit:Instruments/aumu,Ni$D,-NI-";
        assert_eq!(tagset_file_name(id).unwrap(), tagset_file_name(id).unwrap());
    }

    #[test]
    fn rejects_identifier_without_slash() {
        let err = tagset_file_name("AudioUnit:Effects aufx,clu2,SNSH").unwrap_err();
        assert!(matches!(err, AuditError::MalformedIdentifier { .. }));
    }

    #[test]
    fn rejects_wrong_code_count() {
        for id in ["AudioUnit:Effects/aufx,clu2", "AudioUnit:Effects/aufx,clu2,SNSH,x", "K:C/a/b,c,d"] {
            let err = tagset_file_name(id).unwrap_err();
            assert!(matches!(err, AuditError::MalformedIdentifier { .. }), "{id}");
        }
    }

    #[test]
    fn reads_zero_one_and_two_categories() {
        assert!(parse_categories(&tagset(&[])).unwrap().is_empty());
        assert_eq!(parse_categories(&tagset(&["Delay"])).unwrap(), vec!["Delay"]);
        assert_eq!(
            parse_categories(&tagset(&["Reverb", "Delay"])).unwrap(),
            vec!["Reverb", "Delay"]
        );
    }

    #[test]
    fn reads_apple_plist_with_doctype() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?><!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd"><plist version="1.0"><dict><key>tags</key><dict><key>Delay</key><string>user</string></dict></dict></plist>"#;
        assert_eq!(parse_categories(xml).unwrap(), vec!["Delay"]);
    }

    #[test]
    fn hex_encodes_non_ascii_codes() {
        assert_eq!(tagset_file_name("K:C/é,a,b").unwrap(), "c3a9-61-62.tagset");
        assert_eq!(tagset_file_name("K:C/,,").unwrap(), "--.tagset");
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let err = parse_categories("<plist><dict>").unwrap_err();
        assert!(matches!(err, AuditError::TagsetParse(_)));
    }

    #[test]
    fn missing_nested_dict_is_a_parse_error() {
        let err = parse_categories("<plist><dict><key>tags</key></dict></plist>").unwrap_err();
        assert!(matches!(err, AuditError::TagsetParse(_)));

        let err = parse_categories("<plist><array/></plist>").unwrap_err();
        assert!(matches!(err, AuditError::TagsetParse(_)));
    }

    #[test]
    fn unreadable_file_is_a_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_categories(&dir.path().join("absent.tagset")).unwrap_err();
        assert!(matches!(err, AuditError::TagsetParse(_)));
    }
}
