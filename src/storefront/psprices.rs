//! psprices.com knows the store's product ids.  Its "buy" links redirect to the store with the
//! product id in the query string.

use super::client::StorefrontClient;
use super::error::{Result, StorefrontError};
use super::request::StoreRequest;
use super::transport::Transport;
use reqwest::{Method, Url};

const BUY_URL: &str = "https://psprices.com/game/buy";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// A psprices game, identified by the first number in any of its URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsPricesLink {
    game_id: String,
}

impl PsPricesLink {
    pub fn parse(link: &str) -> Result<Self> {
        let game_id: String = link
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(char::is_ascii_digit)
            .collect();

        if game_id.is_empty() {
            return Err(StorefrontError::InvalidLink(link.to_owned()));
        }
        Ok(Self { game_id })
    }

    pub fn buy_url(&self) -> String {
        format!("{}/{}", BUY_URL, self.game_id)
    }

    fn request(&self) -> StoreRequest {
        StoreRequest {
            method: Method::GET,
            url: self.buy_url(),
            headers: vec![("User-Agent", BROWSER_USER_AGENT.to_owned())],
            body: None,
        }
    }
}

fn product_id_in(url: &str) -> Result<String> {
    let url = Url::parse(url).map_err(|e| {
        StorefrontError::UnexpectedResponse(format!("redirected to invalid URL `{}`: {}", url, e))
    })?;

    url.query_pairs()
        .find(|(key, _)| key == "productId")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| {
            StorefrontError::UnexpectedResponse(format!("no product id in `{}`", url))
        })
}

impl<T: Transport> StorefrontClient<T> {
    /// Turn any psprices link into the store's product id.
    pub async fn product_id_from_psprices(&self, link: &str) -> Result<String> {
        let link = PsPricesLink::parse(link)?;
        let landed_on = self.transport().final_url(&link.request()).await?;
        product_id_in(&landed_on)
    }
}
