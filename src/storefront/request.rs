//! Request values for the storefront endpoints.
//!
//! Everything here is a pure function of its inputs: building a request never touches the network
//! and never reuses state from an earlier request.

use super::error::{Result, StorefrontError};
use super::region::Region;
use reqwest::Method;

const CATALOG_URL: &str = "https://store.playstation.com/store/api/chihiro/00_09_000/container";
const GRAPHQL_URL: &str = "https://web.np.playstation.com/api/graphql/v1/op";
const ORIGIN: &str = "https://checkout.playstation.com";

const ADD_TO_CART_HASH: &str = "93eb198753e06cba3a30ed3a6cd3abc1f1214c11031ffc5b0a5ca6d08c77061f";
const REMOVE_FROM_CART_HASH: &str =
    "55e50c2157c33e84f409d2a52f3bb7c19db62b144fb49e75a1a9b0acad276bba";

/// What a user asked the store about.
#[derive(Debug, Clone)]
pub struct ProductRequest {
    /// `pdccws_p` cookie of the user's store session.  Forwarded as-is.
    pub session_token: String,
    pub region: Region,
    pub product_id: String,
}

impl ProductRequest {
    pub fn new(session_token: impl Into<String>, region: Region, product_id: impl Into<String>) -> Self {
        Self {
            session_token: session_token.into(),
            region,
            product_id: product_id.into(),
        }
    }

    /// Product ids are three hyphen separated segments.  Nothing else about them is checked.
    pub fn validate(&self) -> Result<()> {
        if self.product_id.matches('-').count() != 2 {
            return Err(StorefrontError::InvalidProductId(self.product_id.clone()));
        }
        Ok(())
    }

    /// Catalog container of this product, with a trailing slash.
    fn container_url(&self) -> String {
        format!(
            "{}/{}/19/{}/",
            CATALOG_URL,
            self.region.as_path(),
            self.product_id
        )
    }

    pub fn image_url(&self) -> String {
        format!("{}image", self.container_url())
    }
}

/// One fully formed HTTP request.
#[derive(Debug, Clone)]
pub struct StoreRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<CartMutation>,
}

#[cfg(test)]
impl StoreRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
}

impl CartOperation {
    pub fn operation_name(&self) -> &'static str {
        match self {
            CartOperation::Add => "addToCart",
            CartOperation::Remove => "removeFromCart",
        }
    }

    fn persisted_query_hash(&self) -> &'static str {
        match self {
            CartOperation::Add => ADD_TO_CART_HASH,
            CartOperation::Remove => REMOVE_FROM_CART_HASH,
        }
    }
}

/// Body of a persisted GraphQL query against the cart.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutation {
    pub operation_name: &'static str,
    pub variables: CartVariables,
    pub extensions: Extensions,
}

/// Adding takes a list of SKUs, removing takes exactly one.  Serialized literally; the shapes
/// differ on the wire.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(untagged)]
pub enum CartVariables {
    Add { skus: Vec<SkuRef> },
    Remove {
        #[serde(rename = "skuId")]
        sku_id: String,
    },
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuRef {
    pub sku_id: String,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extensions {
    pub persisted_query: PersistedQuery,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedQuery {
    pub version: u8,
    pub sha256_hash: &'static str,
}

impl CartMutation {
    pub fn new(operation: CartOperation, sku_id: &str) -> Self {
        let variables = match operation {
            CartOperation::Add => CartVariables::Add {
                skus: vec![SkuRef {
                    sku_id: sku_id.to_owned(),
                }],
            },
            CartOperation::Remove => CartVariables::Remove {
                sku_id: sku_id.to_owned(),
            },
        };

        Self {
            operation_name: operation.operation_name(),
            variables,
            extensions: Extensions {
                persisted_query: PersistedQuery {
                    version: 1,
                    sha256_hash: operation.persisted_query_hash(),
                },
            },
        }
    }
}

fn headers(req: &ProductRequest, account_secret: &str) -> Vec<(&'static str, String)> {
    vec![
        ("Origin", ORIGIN.to_owned()),
        ("content-type", "application/json".to_owned()),
        ("Accept-Language", req.region.as_str().to_owned()),
        (
            "Cookie",
            format!(
                "AKA_A2=A; pdccws_p={}; isSignedIn=true; userinfo={}; p=0; gpdcTg=%5B1%5D",
                req.session_token, account_secret
            ),
        ),
    ]
}

/// Catalog lookup used to find the product's default SKU.  Fails on a malformed product id.
pub fn catalog_request(req: &ProductRequest, account_secret: &str) -> Result<StoreRequest> {
    req.validate()?;

    Ok(StoreRequest {
        method: Method::GET,
        url: req.container_url(),
        headers: headers(req, account_secret),
        body: None,
    })
}

pub fn cart_request(
    req: &ProductRequest,
    account_secret: &str,
    operation: CartOperation,
    sku_id: &str,
) -> StoreRequest {
    StoreRequest {
        method: Method::POST,
        url: GRAPHQL_URL.to_owned(),
        headers: headers(req, account_secret),
        body: Some(CartMutation::new(operation, sku_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(product_id: &str) -> ProductRequest {
        ProductRequest::new("abc", Region::parse("en-US").unwrap(), product_id)
    }

    #[test]
    fn product_id_needs_exactly_two_hyphens() {
        for bad in ["", "EP1234", "EP1234-ABCD", "EP1234-ABCD-00-00", "---"] {
            assert!(matches!(
                request(bad).validate(),
                Err(StorefrontError::InvalidProductId(_))
            ));
        }
        assert!(request("EP1234-ABCD00001_00-0000000000000000").validate().is_ok());
        // Only the separators are counted, not the segments.
        assert!(request("--").validate().is_ok());
    }

    #[test]
    fn catalog_request_uses_region_path_and_raw_language() {
        let req = request("EP1234-ABCD00001_00-0000000000000000");
        let built = catalog_request(&req, "secret").unwrap();

        assert_eq!(built.method, Method::GET);
        assert_eq!(
            built.url,
            "https://store.playstation.com/store/api/chihiro/00_09_000/container/en/US/19/EP1234-ABCD00001_00-0000000000000000/"
        );
        assert!(built.url.contains("en/US"));
        assert_eq!(built.header("Accept-Language"), Some("en-US"));
        assert_eq!(built.header("Origin"), Some("https://checkout.playstation.com"));
        assert_eq!(built.header("Content-Type"), Some("application/json"));
        assert_eq!(
            built.header("Cookie"),
            Some("AKA_A2=A; pdccws_p=abc; isSignedIn=true; userinfo=secret; p=0; gpdcTg=%5B1%5D")
        );
        assert!(built.body.is_none());
    }

    #[test]
    fn catalog_request_rejects_bad_product_id() {
        assert!(matches!(
            catalog_request(&request("nope"), "secret"),
            Err(StorefrontError::InvalidProductId(id)) if id == "nope"
        ));
    }

    #[test]
    fn image_url_extends_container_url() {
        let req = request("EP1234-ABCD00001_00-0000000000000000");
        assert_eq!(
            req.image_url(),
            "https://store.playstation.com/store/api/chihiro/00_09_000/container/en/US/19/EP1234-ABCD00001_00-0000000000000000/image"
        );
    }

    #[test]
    fn add_to_cart_nests_sku_in_list() {
        let built = cart_request(&request("a-b-c"), "secret", CartOperation::Add, "SKU123");
        assert_eq!(built.method, Method::POST);
        assert_eq!(built.url, "https://web.np.playstation.com/api/graphql/v1/op");

        let body = serde_json::to_value(built.body.unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "operationName": "addToCart",
                "variables": { "skus": [{ "skuId": "SKU123" }] },
                "extensions": {
                    "persistedQuery": {
                        "version": 1,
                        "sha256Hash": "93eb198753e06cba3a30ed3a6cd3abc1f1214c11031ffc5b0a5ca6d08c77061f"
                    }
                }
            })
        );
    }

    #[test]
    fn remove_from_cart_uses_flat_sku() {
        let built = cart_request(&request("a-b-c"), "secret", CartOperation::Remove, "SKU123");

        let body = serde_json::to_value(built.body.unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "operationName": "removeFromCart",
                "variables": { "skuId": "SKU123" },
                "extensions": {
                    "persistedQuery": {
                        "version": 1,
                        "sha256Hash": "55e50c2157c33e84f409d2a52f3bb7c19db62b144fb49e75a1a9b0acad276bba"
                    }
                }
            })
        );
    }

    #[test]
    fn cart_requests_carry_session_headers() {
        let built = cart_request(&request("a-b-c"), "secret", CartOperation::Remove, "SKU123");
        assert_eq!(built.header("accept-language"), Some("en-US"));
        assert!(built.header("cookie").unwrap().contains("pdccws_p=abc;"));
    }
}
