//! Wire types for the shared-album backend.
//!
//! The backend speaks JSON: a stream listing of photo descriptors, each
//! with a map of named derivatives, and a separate checksum-to-URL map.
//! Derivatives deserialize into a `BTreeMap` so candidate iteration order
//! is stable across runs.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// Response of the `webstream` listing call.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamListing {
    /// Photo descriptors in the album; absent means empty.
    #[serde(default)]
    pub photos: Vec<PhotoDescriptor>,
}

/// One photo in the stream listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDescriptor {
    /// Opaque photo identifier, used to request asset URLs.
    pub photo_guid: String,
    /// Named pre-rendered resolutions of this photo.
    #[serde(default)]
    pub derivatives: BTreeMap<String, Derivative>,
}

/// One pre-rendered resolution of a photo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Derivative {
    /// Pixel width; 0 when the backend omits it.
    #[serde(default)]
    pub width: u32,
    /// Pixel height; 0 when the backend omits it.
    #[serde(default)]
    pub height: u32,
    /// Checksum keying into the asset-URL map.
    pub checksum: Option<String>,
}

impl Derivative {
    /// Pixel area used for derivative selection.
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }
}

/// Response of the `webasseturls` call.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetUrlMap {
    /// Checksum to URL-parts map; absent means empty.
    #[serde(default)]
    pub items: HashMap<String, AssetLocation>,
}

/// Host and path of one resolvable asset.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetLocation {
    /// Host serving the asset.
    pub url_location: String,
    /// Path component, beginning with `/`.
    pub url_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stream_listing() {
        let json = r#"{
            "photos": [
                {
                    "photoGuid": "guid-1",
                    "derivatives": {
                        "1024": {"width": 1024, "height": 768, "checksum": "c1"},
                        "342": {"width": 342, "height": 256, "checksum": "c2"}
                    }
                }
            ],
            "streamName": "Family"
        }"#;

        let listing: StreamListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.photos.len(), 1);

        let photo = &listing.photos[0];
        assert_eq!(photo.photo_guid, "guid-1");
        assert_eq!(photo.derivatives.len(), 2);
        assert_eq!(photo.derivatives["1024"].area(), 1024 * 768);
    }

    #[test]
    fn missing_fields_default() {
        let listing: StreamListing = serde_json::from_str("{}").unwrap();
        assert!(listing.photos.is_empty());

        let photo: PhotoDescriptor =
            serde_json::from_str(r#"{"photoGuid": "guid-2"}"#).unwrap();
        assert!(photo.derivatives.is_empty());

        let derivative: Derivative = serde_json::from_str(r#"{"checksum": "c3"}"#).unwrap();
        assert_eq!(derivative.area(), 0);
    }

    #[test]
    fn parses_asset_url_map() {
        let json = r#"{
            "items": {
                "c1": {"url_location": "cvws.example.com", "url_path": "/a/b.jpeg?x=1"}
            }
        }"#;

        let assets: AssetUrlMap = serde_json::from_str(json).unwrap();
        let asset = &assets.items["c1"];
        assert_eq!(asset.url_location, "cvws.example.com");
        assert!(asset.url_path.starts_with('/'));
    }
}
