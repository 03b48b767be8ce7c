use std::{sync::Arc, time::Duration};

use serde::de::DeserializeOwned;

use crate::{
    client::{
        api::ApiClient,
        credentials::CredentialStore,
        error::ClientError,
        flash::FlashBoard,
        gateway::MutationGateway,
        resource::{Resource, ResourceConfig},
        session::SessionGate,
        view::{CollectionHandle, RemoteCollectionView},
    },
    config::ClientConfig,
    models::{Category, Customer, Order, Product, Supplier},
};

/// Owns everything the client keeps between user actions: the token, the
/// session, and one view/gateway pair per resource.
#[derive(Clone)]
pub struct AppStore {
    api: ApiClient,
    credentials: CredentialStore,
    flash: FlashBoard,
    session: SessionGate,
    catalog: RemoteCollectionView<Product>,
    products: MutationGateway<Product>,
    categories: MutationGateway<Category>,
    suppliers: MutationGateway<Supplier>,
    customers: MutationGateway<Customer>,
    orders: MutationGateway<Order>,
}

fn handle<T>(view: &RemoteCollectionView<T>) -> Arc<dyn CollectionHandle>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    Arc::new(view.clone())
}

impl AppStore {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let api = ApiClient::from_config(config)?;
        Ok(Self::with_api(api, config))
    }

    pub fn with_api(api: ApiClient, config: &ClientConfig) -> Self {
        let credentials = CredentialStore::new();
        let flash = FlashBoard::new(config.flash_ttl);
        let admin = ViewFactory {
            api: &api,
            credentials: &credentials,
            page_limit: config.page_limit,
            debounce: config.debounce,
        };

        let catalog: RemoteCollectionView<Product> = ViewFactory {
            page_limit: config.catalog_page_limit,
            ..admin
        }
        .build(ResourceConfig::public_catalog());
        let products: RemoteCollectionView<Product> = admin.build(Resource::Products.config());
        let categories: RemoteCollectionView<Category> =
            admin.build(Resource::Categories.config());
        let suppliers: RemoteCollectionView<Supplier> = admin.build(Resource::Suppliers.config());
        let customers: RemoteCollectionView<Customer> = admin.build(Resource::Customers.config());
        let orders: RemoteCollectionView<Order> = admin.build(Resource::Orders.config());

        let session = SessionGate::new(
            api.clone(),
            credentials.clone(),
            flash.clone(),
            vec![
                handle(&products),
                handle(&categories),
                handle(&suppliers),
                handle(&customers),
                handle(&orders),
            ],
        );

        let orders = MutationGateway::new(api.clone(), session.clone(), orders, flash.clone())
            .with_dependents(vec![handle(&products), handle(&customers)]);
        let products = MutationGateway::new(api.clone(), session.clone(), products, flash.clone())
            .with_dependents(vec![handle(&catalog)]);
        let categories =
            MutationGateway::new(api.clone(), session.clone(), categories, flash.clone());
        let suppliers = MutationGateway::new(api.clone(), session.clone(), suppliers, flash.clone());
        let customers = MutationGateway::new(api.clone(), session.clone(), customers, flash.clone());

        Self {
            api,
            credentials,
            flash,
            session,
            catalog,
            products,
            categories,
            suppliers,
            customers,
            orders,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn flash(&self) -> &FlashBoard {
        &self.flash
    }

    pub fn session(&self) -> &SessionGate {
        &self.session
    }

    /// Read-only product listing for visitors; never carries a token.
    pub fn catalog(&self) -> &RemoteCollectionView<Product> {
        &self.catalog
    }

    pub fn products(&self) -> &MutationGateway<Product> {
        &self.products
    }

    pub fn categories(&self) -> &MutationGateway<Category> {
        &self.categories
    }

    pub fn suppliers(&self) -> &MutationGateway<Supplier> {
        &self.suppliers
    }

    pub fn customers(&self) -> &MutationGateway<Customer> {
        &self.customers
    }

    pub fn orders(&self) -> &MutationGateway<Order> {
        &self.orders
    }

    /// Loads the first page of every admin panel concurrently. Each view keeps
    /// its own error; the first failure is also returned.
    pub async fn load_dashboard(&self) -> Result<(), ClientError> {
        let (products, categories, suppliers, customers, orders) = tokio::join!(
            self.products.view().refresh(),
            self.categories.view().refresh(),
            self.suppliers.view().refresh(),
            self.customers.view().refresh(),
            self.orders.view().refresh(),
        );
        products?;
        categories?;
        suppliers?;
        customers?;
        orders?;
        Ok(())
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }
}

#[derive(Clone, Copy)]
struct ViewFactory<'a> {
    api: &'a ApiClient,
    credentials: &'a CredentialStore,
    page_limit: u64,
    debounce: Duration,
}

impl ViewFactory<'_> {
    fn build<T>(&self, config: ResourceConfig) -> RemoteCollectionView<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        RemoteCollectionView::new(
            self.api.clone(),
            config,
            self.credentials.clone(),
            self.page_limit,
            self.debounce,
        )
    }
}
