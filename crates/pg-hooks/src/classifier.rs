use pg_core::Bug;

/// Which bugs the hooks act on, by Bugzilla classification or product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relevance {
    pub classifications: Vec<String>,
    pub products: Vec<String>,
}

impl Relevance {
    pub fn new<C, P>(classifications: C, products: P) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            classifications: classifications.into_iter().map(Into::into).collect(),
            products: products.into_iter().map(Into::into).collect(),
        }
    }

    /// Classification or product is in the allowed set.
    #[must_use]
    pub fn is_relevant(&self, bug: &Bug) -> bool {
        self.classification_allowed(bug) || self.products.contains(&bug.product)
    }

    /// Classification alone is in the allowed set.
    #[must_use]
    pub fn classification_allowed(&self, bug: &Bug) -> bool {
        self.classifications.contains(&bug.classification)
    }

    /// IGNORE detail for a bug that [`Self::is_relevant`] rejected.
    #[must_use]
    pub fn not_relevant_detail(bug: &Bug) -> String {
        format!(
            "not relevant for classification: '{}', product: '{}'",
            bug.classification, bug.product
        )
    }
}
