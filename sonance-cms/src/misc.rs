use crate::{Client, ClientResult};

/// Asset and media endpoints.
impl Client {
    /// The URL of the image asset identified by `cover`.
    pub fn cover_url(&self, cover: &str) -> String {
        format!("{}/assets/{cover}", self.base_url)
    }

    /// Download the media resource at `url` in full.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server does not answer
    /// with a success status.
    pub async fn download(&self, url: &str) -> ClientResult<Vec<u8>> {
        self.request_raw(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_url() {
        let client = Client::new("https://cms.example.com/");
        assert_eq!(
            client.cover_url("4f718272-6b0e-42ee-92d0-805b783cb471"),
            "https://cms.example.com/assets/4f718272-6b0e-42ee-92d0-805b783cb471"
        );
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(Client::default().base_url(), Client::DEFAULT_BASE_URL);
    }
}
