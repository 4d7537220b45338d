use super::error::Result;
use super::request::{cart_request, catalog_request, CartOperation, ProductRequest};
use super::response::{cart_outcome, default_sku};
use super::transport::{HttpTransport, Transport};
use std::time::Duration;

/// A product the store will sell right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuAvailability {
    pub sku_id: String,
    pub image_url: String,
}

/// Client for the PlayStation Store catalog and cart.
///
/// Holds no per-call state, so one client can serve any number of concurrent commands.
pub struct StorefrontClient<T = HttpTransport> {
    /// Long-lived account credential sent as the `userinfo` cookie.
    account_secret: String,
    transport: T,
}

impl StorefrontClient<HttpTransport> {
    pub fn new(account_secret: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self::with_transport(
            account_secret,
            HttpTransport::new(timeout)?,
        ))
    }
}

impl<T: Transport> StorefrontClient<T> {
    pub fn with_transport(account_secret: impl Into<String>, transport: T) -> Self {
        Self {
            account_secret: account_secret.into(),
            transport,
        }
    }

    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Look the product up in the catalog and return its default SKU.
    pub async fn resolve_sku(&self, req: &ProductRequest) -> Result<SkuAvailability> {
        let request = catalog_request(req, &self.account_secret)?;
        let response = self.transport.send(&request).await?;
        let sku_id = default_sku(&response)?;

        Ok(SkuAvailability {
            sku_id,
            image_url: req.image_url(),
        })
    }

    /// Image of the product, if it is available.
    pub async fn check_avatar(&self, req: &ProductRequest) -> Result<String> {
        self.resolve_sku(req)
            .await
            .map(|availability| availability.image_url)
    }

    pub async fn add_to_cart(&self, req: &ProductRequest) -> Result<()> {
        self.mutate_cart(req, CartOperation::Add).await
    }

    pub async fn remove_from_cart(&self, req: &ProductRequest) -> Result<()> {
        self.mutate_cart(req, CartOperation::Remove).await
    }

    async fn mutate_cart(&self, req: &ProductRequest, operation: CartOperation) -> Result<()> {
        let SkuAvailability { sku_id, .. } = self.resolve_sku(req).await?;
        let request = cart_request(req, &self.account_secret, operation, &sku_id);
        let response = self.transport.send(&request).await?;
        cart_outcome(&response)
    }
}
