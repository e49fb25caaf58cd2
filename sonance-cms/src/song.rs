use serde::{Deserialize, Serialize};

use crate::{Client, ClientResult};

/// A song, as returned by the `items/songs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// The unique identifier
    pub id: u64,
    /// The song name
    pub name: String,
    /// The performing artist
    pub artist: String,
    /// The URL of the playable media resource
    pub url: String,
    /// The asset identifier of the cover image
    pub cover: String,
    /// The accent colour, usually `#rrggbb`
    pub accent: String,
    /// Whether the song is part of the curated top tracks
    #[serde(default)]
    pub top_track: bool,
    /// The publication status of the item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// The manual sort key of the item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
    /// The ID of the user that created the item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_created: Option<String>,
    /// When the item was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    /// The ID of the user that last updated the item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_updated: Option<String>,
    /// When the item was last updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<String>,
}

/// Song endpoints.
impl Client {
    /// Fetch every song in the catalog, in the order the server returns them.
    pub async fn fetch_songs(&self) -> ClientResult<Vec<Song>> {
        self.request::<Vec<Song>>("items/songs").await
    }

    /// Parse the body of an `items/songs` response.
    pub fn parse_songs(bytes: &[u8]) -> ClientResult<Vec<Song>> {
        Self::parse_response::<Vec<Song>>(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;

    const RESPONSE: &str = r##"{
        "data": [
            {
                "id": 1,
                "status": "published",
                "sort": null,
                "user_created": "2085be13-8079-40a6-8a39-c3b9180f9a0a",
                "date_created": "2023-08-10T06:10:57.746Z",
                "user_updated": null,
                "date_updated": null,
                "name": "Colors",
                "artist": "William King",
                "accent": "#331E00",
                "cover": "4f718272-6b0e-42ee-92d0-805b783cb471",
                "top_track": true,
                "url": "https://example.com/colors.mp3"
            },
            {
                "id": 2,
                "name": "Saudade",
                "artist": "Gonzalo Fuentes",
                "accent": "#6F7E8A",
                "cover": "1d5ac3fb-5e8d-4a0a-9f06-7fe8c43aae5d",
                "top_track": false,
                "url": "https://example.com/saudade.mp3"
            }
        ]
    }"##;

    #[test]
    fn test_parse_songs() {
        let songs = Client::parse_songs(RESPONSE.as_bytes()).unwrap();
        assert_eq!(songs.len(), 2);

        assert_eq!(songs[0].id, 1);
        assert_eq!(songs[0].name, "Colors");
        assert_eq!(songs[0].artist, "William King");
        assert_eq!(songs[0].accent, "#331E00");
        assert!(songs[0].top_track);
        assert_eq!(songs[0].status.as_deref(), Some("published"));

        assert_eq!(songs[1].id, 2);
        assert!(!songs[1].top_track);
        assert_eq!(songs[1].date_created, None);
    }

    #[test]
    fn test_parse_songs_missing_top_track_defaults_to_false() {
        let body = r##"{"data":[{"id":7,"name":"a","artist":"b","url":"u","cover":"c","accent":"#000"}]}"##;
        let songs = Client::parse_songs(body.as_bytes()).unwrap();
        assert!(!songs[0].top_track);
    }

    #[test]
    fn test_parse_songs_rejects_malformed_body() {
        let err = Client::parse_songs(br#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, ClientError::DeserializationError(_)));
    }
}
