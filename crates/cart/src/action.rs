//! The closed set of actions the reducer accepts.

use std::num::NonZeroU32;

use pixelshelf_core::{LineKey, Product, VariantId};

/// A request to change store state.
///
/// This is the entire mutation vocabulary of the cart; there is no other
/// way to change a [`crate::StoreState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Replace the catalog wholesale. An empty list clears it.
    SetProducts(Vec<Product>),
    /// Add `quantity` of a product variant, merging into an existing line.
    AddToCart {
        product: Product,
        variant_id: VariantId,
        quantity: NonZeroU32,
    },
    /// Set a line's quantity. Zero removes the line.
    UpdateCartItem { key: LineKey, quantity: u32 },
    RemoveFromCart { key: LineKey },
    ClearCart,
    SetLoading(bool),
    SetError(Option<String>),
}

impl CartAction {
    /// Add a single unit of a variant.
    #[must_use]
    pub fn add_one(product: Product, variant_id: impl Into<VariantId>) -> Self {
        Self::AddToCart {
            product,
            variant_id: variant_id.into(),
            quantity: NonZeroU32::MIN,
        }
    }

    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetProducts(_) => "set_products",
            Self::AddToCart { .. } => "add_to_cart",
            Self::UpdateCartItem { .. } => "update_cart_item",
            Self::RemoveFromCart { .. } => "remove_from_cart",
            Self::ClearCart => "clear_cart",
            Self::SetLoading(_) => "set_loading",
            Self::SetError(_) => "set_error",
        }
    }
}
