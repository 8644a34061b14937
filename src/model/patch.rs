use serde::{Deserialize, Serialize};

/// Sparse update payload for a song.
///
/// A key missing from the JSON body deserializes to `None` and leaves the
/// stored value untouched. `Some("")` is an explicit update to an empty
/// string. `group` renames the group shared by every song that references it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub song: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl SongPatch {
    pub fn is_empty(&self) -> bool {
        self.group.is_none()
            && self.song.is_none()
            && self.release_date.is_none()
            && self.text.is_none()
            && self.link.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_keys_stay_none() {
        let patch: SongPatch = serde_json::from_str(r#"{"text": ""}"#).unwrap();
        assert_eq!(patch.text, Some(String::new()));
        assert_eq!(patch.group, None);
        assert_eq!(patch.song, None);
        assert_eq!(patch.release_date, None);
        assert_eq!(patch.link, None);
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_empty_object_is_empty_patch() {
        let patch: SongPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch, SongPatch::default());
    }

    #[test]
    fn test_release_date_uses_camel_case_key() {
        let patch: SongPatch =
            serde_json::from_str(r#"{"releaseDate": "2006-07-16", "group": "Muse"}"#).unwrap();
        assert_eq!(patch.release_date.as_deref(), Some("2006-07-16"));
        assert_eq!(patch.group.as_deref(), Some("Muse"));
    }
}
