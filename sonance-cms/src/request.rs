use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Client, ClientError, ClientResult};

/// Making requests to the content API.
impl Client {
    /// Make a request to an `items` collection of the content API. `T` is the
    /// type of the `data` field of the response: for `items/songs`, `T` should
    /// be `Vec<Song>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not valid.
    pub async fn request<T: Serialize + DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let bytes = self.request_raw(&format!("{}/{path}", self.base_url)).await?;
        Self::parse_response::<T>(&bytes)
    }

    pub(crate) async fn request_raw(&self, url: &str) -> ClientResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::StatusError {
                code: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.into())
    }

    pub(crate) fn parse_response<T: Serialize + DeserializeOwned>(bytes: &[u8]) -> ClientResult<T> {
        let response: Response<T> = serde_json::from_slice(bytes)?;
        Ok(response.data)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Response<T> {
    data: T,
}
