//! Folder-name status encoding.
//!
//! A sprint directory name is `<prefix><identifier>[_<description>]` where the
//! prefix is one of `@` (planning), `+` (ready), `!` (active), `~` (archived).
//! The name is a denormalized cache of the marker file; `decode`/`encode` are
//! pure and exercised by the doctor and every lifecycle rename.

use crate::error::{Result, SprintError};
use crate::types::SprintStatus;
use regex::Regex;
use std::sync::OnceLock;

/// Characters reserved for status prefixes; forbidden inside identifiers
/// and descriptions so decode stays unambiguous.
pub const RESERVED: [char; 4] = ['@', '+', '!', '~'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedName {
    pub status: SprintStatus,
    pub identifier: String,
    pub description: Option<String>,
}

/// Parse a folder name into its (status, identifier, description) triple.
///
/// The remainder after the prefix is split at the last underscore; a purely
/// numeric suffix belongs to the identifier, so `@Sprint_25` decodes to
/// identifier `Sprint_25` while `@Sprint_25_Payments` decodes to
/// identifier `Sprint_25`, description `Payments`.
pub fn decode(folder_name: &str) -> Result<DecodedName> {
    let mut chars = folder_name.chars();
    let prefix = chars
        .next()
        .ok_or_else(|| SprintError::InvalidName(folder_name.to_string()))?;
    let status = SprintStatus::from_prefix(prefix)
        .ok_or_else(|| SprintError::InvalidName(folder_name.to_string()))?;

    let rest = chars.as_str();
    if rest.is_empty() {
        return Err(SprintError::InvalidName(folder_name.to_string()));
    }

    let (identifier, description) = match rest.rsplit_once('_') {
        Some((head, tail)) if !tail.is_empty() && !tail.chars().all(|c| c.is_ascii_digit()) => {
            (head.to_string(), Some(tail.to_string()))
        }
        _ => (rest.to_string(), None),
    };

    if identifier.is_empty() {
        return Err(SprintError::InvalidName(folder_name.to_string()));
    }

    Ok(DecodedName {
        status,
        identifier,
        description,
    })
}

/// Render the folder name for a (status, identifier, description) triple.
///
/// Rejects reserved prefix characters inside either component, and rejects
/// any triple whose rendering would not decode back to the same triple
/// (an underscore inside the description, or a bare identifier whose last
/// underscore segment is non-numeric) — `decode(encode(t)) == t` holds for
/// every name this function produces.
pub fn encode(status: SprintStatus, identifier: &str, description: Option<&str>) -> Result<String> {
    validate_component("identifier", identifier)?;
    if identifier.is_empty() {
        return Err(SprintError::InvalidInput("empty identifier".to_string()));
    }
    let description = description.filter(|d| !d.is_empty());
    if let Some(desc) = description {
        validate_component("description", desc)?;
    }
    let mut name = String::new();
    name.push(status.prefix());
    name.push_str(identifier);
    if let Some(desc) = description {
        name.push('_');
        name.push_str(desc);
    }

    let decoded = decode(&name)?;
    if decoded.identifier != identifier || decoded.description.as_deref() != description {
        return Err(SprintError::InvalidInput(format!(
            "'{name}' would not decode back to identifier '{identifier}'"
        )));
    }
    Ok(name)
}

fn validate_component(what: &str, value: &str) -> Result<()> {
    if let Some(c) = value.chars().find(|c| RESERVED.contains(c)) {
        return Err(SprintError::InvalidInput(format!(
            "{what} '{value}' contains reserved character '{c}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Auto-naming
// ---------------------------------------------------------------------------

static NUMERIC_SUFFIX_RE: OnceLock<Regex> = OnceLock::new();

fn numeric_suffix_re() -> &'static Regex {
    NUMERIC_SUFFIX_RE.get_or_init(|| Regex::new(r"(\d+)$").unwrap())
}

/// Next auto-generated identifier: scans every existing identifier for a
/// numeric suffix (regardless of status prefix) and returns `Sprint_NN`
/// with `NN = max + 1`, zero-padded to two digits. `Sprint_01` when no
/// numbered sprint exists yet.
pub fn next_identifier<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let max = existing
        .into_iter()
        .filter_map(|id| numeric_suffix_re().captures(id))
        .filter_map(|c| c[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("Sprint_{:02}", max + 1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_plain_identifier() {
        let d = decode("@Sprint").unwrap();
        assert_eq!(d.status, SprintStatus::Planning);
        assert_eq!(d.identifier, "Sprint");
        assert_eq!(d.description, None);
    }

    #[test]
    fn decode_numeric_suffix_stays_in_identifier() {
        let d = decode("@Sprint_25").unwrap();
        assert_eq!(d.identifier, "Sprint_25");
        assert_eq!(d.description, None);
    }

    #[test]
    fn decode_description_after_numeric_identifier() {
        let d = decode("@Sprint_25_Payments").unwrap();
        assert_eq!(d.identifier, "Sprint_25");
        assert_eq!(d.description.as_deref(), Some("Payments"));
    }

    #[test]
    fn decode_all_prefixes() {
        for status in SprintStatus::all() {
            let name = format!("{}Sprint_03", status.prefix());
            assert_eq!(decode(&name).unwrap().status, *status);
        }
    }

    #[test]
    fn decode_missing_prefix_fails() {
        for name in ["Sprint_01", "", "#Sprint_01"] {
            assert!(
                matches!(decode(name), Err(SprintError::InvalidName(_))),
                "expected InvalidName for {name:?}"
            );
        }
    }

    #[test]
    fn decode_prefix_only_fails() {
        assert!(decode("@").is_err());
    }

    #[test]
    fn encode_decode_roundtrip() {
        let cases = [
            (SprintStatus::Planning, "Sprint_01", None),
            (SprintStatus::Ready, "Sprint_24", Some("Redesign")),
            (SprintStatus::Active, "Hotfix", Some("Login")),
            (SprintStatus::Archived, "Sprint_99", None),
        ];
        for (status, id, desc) in cases {
            let name = encode(status, id, desc).unwrap();
            let d = decode(&name).unwrap();
            assert_eq!(d.status, status);
            assert_eq!(d.identifier, id);
            assert_eq!(d.description.as_deref(), desc);
        }
    }

    #[test]
    fn encode_rejects_underscore_description() {
        // `@Sprint_01_Big_Redesign` would decode to identifier
        // `Sprint_01_Big`, so the triple must be refused up front.
        assert!(matches!(
            encode(SprintStatus::Planning, "Sprint_01", Some("Big_Redesign")),
            Err(SprintError::InvalidInput(_))
        ));
    }

    #[test]
    fn encode_rejects_text_suffix_identifier_without_description() {
        // `@Hotfix_Login` would decode to identifier `Hotfix`,
        // description `Login`.
        assert!(matches!(
            encode(SprintStatus::Planning, "Hotfix_Login", None),
            Err(SprintError::InvalidInput(_))
        ));
    }

    #[test]
    fn encode_text_suffix_identifier_with_description_roundtrips() {
        let name = encode(SprintStatus::Ready, "Hotfix_Login", Some("Oauth")).unwrap();
        let d = decode(&name).unwrap();
        assert_eq!(d.identifier, "Hotfix_Login");
        assert_eq!(d.description.as_deref(), Some("Oauth"));
    }

    #[test]
    fn encode_rejects_reserved_characters() {
        assert!(encode(SprintStatus::Planning, "Sprint!01", None).is_err());
        assert!(encode(SprintStatus::Planning, "Sprint_01", Some("a+b")).is_err());
        assert!(encode(SprintStatus::Planning, "~Sprint", None).is_err());
    }

    #[test]
    fn encode_empty_identifier_fails() {
        assert!(encode(SprintStatus::Ready, "", None).is_err());
    }

    #[test]
    fn next_identifier_defaults_to_01() {
        assert_eq!(next_identifier([]), "Sprint_01");
        assert_eq!(next_identifier(["Kickoff"]), "Sprint_01");
    }

    #[test]
    fn next_identifier_scans_all_numeric_suffixes() {
        let ids = ["Sprint_02", "Sprint_09", "Hotfix_3", "Kickoff"];
        assert_eq!(next_identifier(ids), "Sprint_10");
    }

    #[test]
    fn next_identifier_zero_pads() {
        assert_eq!(next_identifier(["Sprint_08"]), "Sprint_09");
        assert_eq!(next_identifier(["Sprint_99"]), "Sprint_100");
    }
}
