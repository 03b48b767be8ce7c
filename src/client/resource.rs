use crate::query::SortKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Products,
    Categories,
    Suppliers,
    Customers,
    Orders,
}

/// Everything that differs between the per-resource views and gateways.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    pub resource: Resource,
    pub path: &'static str,
    /// Name of one item in user-facing messages.
    pub singular: &'static str,
    pub sort_keys: &'static [SortKey],
    pub listing_requires_credential: bool,
    /// Whether listings carry the bearer token when one is present.
    pub send_credential: bool,
    pub mutations_require_credential: bool,
    /// Appended to the delete confirmation prompt.
    pub delete_warning: Option<&'static str>,
}

const ALL_SORT_KEYS: &[SortKey] = &[SortKey::Name, SortKey::Price, SortKey::Category];
const NAME_ONLY: &[SortKey] = &[SortKey::Name];

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Products,
        Resource::Categories,
        Resource::Suppliers,
        Resource::Customers,
        Resource::Orders,
    ];

    pub fn config(self) -> ResourceConfig {
        let base = ResourceConfig {
            resource: self,
            path: "products",
            singular: "product",
            sort_keys: NAME_ONLY,
            listing_requires_credential: false,
            send_credential: true,
            mutations_require_credential: true,
            delete_warning: None,
        };
        match self {
            Resource::Products => ResourceConfig {
                sort_keys: ALL_SORT_KEYS,
                ..base
            },
            Resource::Categories => ResourceConfig {
                path: "categories",
                singular: "category",
                delete_warning: Some("It cannot be deleted while products use it."),
                ..base
            },
            Resource::Suppliers => ResourceConfig {
                path: "suppliers",
                singular: "supplier",
                delete_warning: Some("It cannot be deleted while products use it."),
                ..base
            },
            Resource::Customers => ResourceConfig {
                path: "customers",
                singular: "customer",
                delete_warning: Some("It cannot be deleted while it has orders."),
                ..base
            },
            Resource::Orders => ResourceConfig {
                path: "orders",
                singular: "order",
                sort_keys: ALL_SORT_KEYS,
                listing_requires_credential: true,
                ..base
            },
        }
    }
}

impl ResourceConfig {
    /// Read-only product listing for anonymous visitors. Never sends a token.
    pub fn public_catalog() -> Self {
        Self {
            send_credential: false,
            ..Resource::Products.config()
        }
    }

    pub fn supports_sort(&self, key: SortKey) -> bool {
        self.sort_keys.contains(&key)
    }

    pub fn load_failed(&self) -> String {
        format!("Could not load the {} list", self.singular)
    }

    pub fn save_failed(&self) -> String {
        format!("Could not save the {}", self.singular)
    }

    pub fn delete_failed(&self) -> String {
        format!("Could not delete the {}", self.singular)
    }

    pub fn delete_blocked(&self) -> String {
        format!("Cannot delete the {}: other records depend on it", self.singular)
    }

    pub fn delete_prompt(&self) -> String {
        match self.delete_warning {
            Some(warning) => format!("Delete this {}? {warning}", self.singular),
            None => format!("Delete this {}?", self.singular),
        }
    }

    pub fn created(&self) -> String {
        format!("{} created", capitalized(self.singular))
    }

    pub fn updated(&self) -> String {
        format!("{} updated", capitalized(self.singular))
    }

    pub fn deleted(&self) -> String {
        format!("{} deleted", capitalized(self.singular))
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
