//! Catalog loading with a cached, retrying fetch layer.
//!
//! The catalog is fetched wholesale from a [`CatalogSource`] and cached in
//! `moka` for a configurable stale time. Failed fetches are retried a fixed
//! number of times before the error is surfaced to the caller.

use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use pixelshelf_core::{Product, ProductId};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::action::CartAction;
use crate::persistence::CartStorage;
use crate::store::Store;

const CATALOG_CACHE_KEY: &str = "products";

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the catalog source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog payload is not valid product JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an identifier.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// The source is unreachable or refused the request.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// Every attempt failed; wraps the last error.
    #[error("catalog fetch failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<CatalogError>,
    },
}

/// Something that can produce the full product list.
pub trait CatalogSource: Send + Sync {
    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the source cannot be read or parsed.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// Catalog read from a JSON array of products on disk.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonFileCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let products: Vec<Product> = serde_json::from_str(&contents)?;
        ensure_unique_ids(&products)?;
        Ok(products)
    }
}

/// Fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl CatalogSource for StaticCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        ensure_unique_ids(&self.products)?;
        Ok(self.products.clone())
    }
}

fn ensure_unique_ids(products: &[Product]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id.clone()));
        }
    }
    Ok(())
}

/// Fetch policy for [`CatalogLoader`].
#[derive(Debug, Clone, Copy)]
pub struct LoaderOptions {
    /// How long a fetched catalog is served from cache.
    pub stale_time: Duration,
    /// Retries after the first failed attempt.
    pub retries: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(300), // 5 minutes
            retries: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Cached, retrying front for a [`CatalogSource`].
#[derive(Clone)]
pub struct CatalogLoader<C> {
    inner: Arc<CatalogLoaderInner<C>>,
}

struct CatalogLoaderInner<C> {
    source: C,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
    options: LoaderOptions,
}

impl<C: CatalogSource> CatalogLoader<C> {
    #[must_use]
    pub fn new(source: C, options: LoaderOptions) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(options.stale_time)
            .build();

        Self {
            inner: Arc::new(CatalogLoaderInner {
                source,
                cache,
                options,
            }),
        }
    }

    /// Return the catalog, fetching it if the cached copy is stale or absent.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Exhausted` once every attempt has failed.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(products) = self.inner.cache.get(&CATALOG_CACHE_KEY).await {
            debug!(products = products.len(), "Catalog served from cache");
            return Ok(products.as_ref().clone());
        }

        let products = self.fetch_with_retry().await?;
        info!(products = products.len(), "Catalog loaded");

        self.inner
            .cache
            .insert(CATALOG_CACHE_KEY, Arc::new(products.clone()))
            .await;
        Ok(products)
    }

    /// Drop the cached catalog so the next `load` refetches.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(&CATALOG_CACHE_KEY).await;
    }

    async fn fetch_with_retry(&self) -> Result<Vec<Product>, CatalogError> {
        let attempts = self.inner.options.retries.saturating_add(1);
        let mut attempt = 1;
        loop {
            match self.inner.source.fetch_products().await {
                Ok(products) => return Ok(products),
                Err(e) if attempt < attempts => {
                    warn!(attempt, attempts, error = %e, "Catalog fetch failed, retrying");
                    tokio::time::sleep(self.inner.options.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(CatalogError::Exhausted {
                        attempts,
                        source: Box::new(e),
                    });
                }
            }
        }
    }
}

/// Load the catalog into a store, tracking loading and error status.
///
/// # Errors
///
/// Returns the loader's error after recording it in the store's `error` field.
pub async fn refresh_catalog<S, C>(
    store: &mut Store<S>,
    loader: &CatalogLoader<C>,
) -> Result<usize, CatalogError>
where
    S: CartStorage,
    C: CatalogSource,
{
    store.dispatch(CartAction::SetError(None));
    store.dispatch(CartAction::SetLoading(true));

    let result = loader.load().await;
    let outcome = match result {
        Ok(products) => {
            let count = products.len();
            store.dispatch(CartAction::SetProducts(products));
            Ok(count)
        }
        Err(e) => {
            store.dispatch(CartAction::SetError(Some(e.to_string())));
            Err(e)
        }
    };

    store.dispatch(CartAction::SetLoading(false));
    outcome
}

/// Products flagged as featured, in catalog order.
#[must_use]
pub fn featured(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.featured).collect()
}

/// Products carrying a category label (case-insensitive).
#[must_use]
pub fn in_category<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    products.iter().filter(|p| p.in_category(category)).collect()
}

/// Find a product by ID.
#[must_use]
pub fn find<'a>(products: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    products.iter().find(|p| &p.id == id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tempfile::NamedTempFile;

    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::test_utils::catalog;

    /// Fails the first `failures` calls, then serves the fixture catalog.
    struct FlakySource {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakySource {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl CatalogSource for FlakySource {
        async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(CatalogError::Unavailable(format!("attempt {call}")))
            } else {
                Ok(catalog())
            }
        }
    }

    fn options(retries: u32) -> LoaderOptions {
        LoaderOptions {
            stale_time: Duration::from_secs(60),
            retries,
            retry_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let loader = CatalogLoader::new(FlakySource::new(2), options(3));
        let products = loader.load().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(loader.inner.source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_fixed_retries() {
        let loader = CatalogLoader::new(FlakySource::new(10), options(2));
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::Exhausted { attempts: 3, .. }));
        assert_eq!(loader.inner.source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cached_until_invalidated() {
        let loader = CatalogLoader::new(FlakySource::new(0), options(0));
        loader.load().await.unwrap();
        loader.load().await.unwrap();
        assert_eq!(loader.inner.source.calls.load(Ordering::SeqCst), 1);

        loader.invalidate().await;
        loader.load().await.unwrap();
        assert_eq!(loader.inner.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_duplicate_ids_rejected() {
        let mut products = catalog();
        products.push(products[0].clone());
        let err = StaticCatalog::new(products).fetch_products().await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProduct(id) if id.as_str() == "1"));
    }

    #[tokio::test]
    async fn test_json_file_catalog() {
        let file = NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&catalog()).unwrap();
        tokio::fs::write(file.path(), json).await.unwrap();

        let products = JsonFileCatalog::new(file.path()).fetch_products().await.unwrap();
        assert_eq!(products, catalog());

        let path = file.path().to_path_buf();
        file.close().unwrap();
        assert!(matches!(
            JsonFileCatalog::new(&path).fetch_products().await,
            Err(CatalogError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_refresh_catalog_records_status() {
        let mut store = Store::open(Vec::new(), MemoryStorage::new());

        let loader = CatalogLoader::new(FlakySource::new(0), options(0));
        assert_eq!(refresh_catalog(&mut store, &loader).await.unwrap(), 2);
        assert_eq!(store.state().products.len(), 2);
        assert!(!store.state().loading);
        assert!(store.state().error.is_none());

        let failing = CatalogLoader::new(FlakySource::new(5), options(0));
        assert!(refresh_catalog(&mut store, &failing).await.is_err());
        assert!(!store.state().loading);
        assert!(store.state().error.is_some());
        assert_eq!(store.state().products.len(), 2);
    }

    #[test]
    fn test_queries() {
        let mut products = catalog();
        products[1].featured = true;
        products[0].categories.insert("Fonts".to_owned());

        let featured_ids: Vec<_> = featured(&products).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(featured_ids, vec!["2"]);
        assert_eq!(in_category(&products, "fonts").len(), 1);
        assert!(find(&products, &ProductId::new("2")).is_some());
        assert!(find(&products, &ProductId::new("3")).is_none());
    }
}
