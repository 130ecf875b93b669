//! Catalog management: categories, vendors and services.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Caller, Category, Money, Service, ServiceUpdate, Vendor, VendorUpdate};
use crate::domain::ports::{CategoryRepository, ServiceFilter, ServiceRepository, UserRepository, VendorRepository};
use crate::services::require_admin;

/// Fields for a new service.
#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub price: Money,
    pub vendor_id: Uuid,
    pub image: String,
    pub category_ids: Vec<Uuid>,
    pub description: Option<String>,
    pub service_type: Option<String>,
    pub duration: Option<String>,
}

pub struct CatalogService<S, C, V, U>
where
    S: ServiceRepository,
    C: CategoryRepository,
    V: VendorRepository,
    U: UserRepository,
{
    services: Arc<S>,
    categories: Arc<C>,
    vendors: Arc<V>,
    users: Arc<U>,
}

impl<S, C, V, U> CatalogService<S, C, V, U>
where
    S: ServiceRepository,
    C: CategoryRepository,
    V: VendorRepository,
    U: UserRepository,
{
    pub fn new(services: Arc<S>, categories: Arc<C>, vendors: Arc<V>, users: Arc<U>) -> Self {
        Self {
            services,
            categories,
            vendors,
            users,
        }
    }

    pub async fn create_category(&self, name: &str) -> DomainResult<Category> {
        let category = Category::new(name);
        category.validate().map_err(DomainError::ValidationFailed)?;
        self.categories.create(&category).await?;
        Ok(category)
    }

    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        self.categories.list().await
    }

    pub async fn get_category(&self, id: Uuid) -> DomainResult<Category> {
        self.categories.get(id).await?.ok_or(DomainError::CategoryNotFound(id))
    }

    pub async fn update_category(&self, id: Uuid, name: &str) -> DomainResult<Category> {
        let mut category = self.get_category(id).await?;
        category.name = name.trim().to_string();
        category.validate().map_err(DomainError::ValidationFailed)?;
        self.categories.update(&category).await?;
        Ok(category)
    }

    pub async fn delete_category(&self, id: Uuid) -> DomainResult<()> {
        self.categories.delete(id).await
    }

    pub async fn delete_all_categories(&self, caller: Caller) -> DomainResult<u64> {
        require_admin(caller, "clear the category list")?;
        let removed = self.categories.delete_all().await?;
        info!(removed, "categories deleted");
        Ok(removed)
    }

    /// Register a vendor for an existing user. Business names are unique
    /// after normalization.
    pub async fn create_vendor(&self, user_id: Uuid, business_name: &str, bio: &str, logo: &str) -> DomainResult<Vendor> {
        if self.users.get(user_id).await?.is_none() {
            return Err(DomainError::UserNotFound(user_id));
        }

        let vendor = Vendor::new(user_id, business_name, bio, logo);
        vendor.validate().map_err(DomainError::ValidationFailed)?;

        if self.vendors.get_by_name(&vendor.business_name).await?.is_some() {
            return Err(DomainError::ValidationFailed(format!(
                "vendor name already taken: {}",
                vendor.business_name
            )));
        }

        self.vendors.create(&vendor).await?;
        info!(vendor_id = %vendor.id, name = %vendor.business_name, "vendor created");
        Ok(vendor)
    }

    pub async fn list_vendors(&self) -> DomainResult<Vec<Vendor>> {
        self.vendors.list().await
    }

    pub async fn get_vendor(&self, id: Uuid) -> DomainResult<Vendor> {
        self.vendors.get(id).await?.ok_or(DomainError::VendorNotFound(id))
    }

    /// Edit a vendor profile. A new business name must still be unique.
    pub async fn update_vendor(&self, id: Uuid, update: VendorUpdate) -> DomainResult<Vendor> {
        let mut vendor = self.get_vendor(id).await?;
        if update.is_empty() {
            return Ok(vendor);
        }

        update.apply(&mut vendor);
        vendor.validate().map_err(DomainError::ValidationFailed)?;
        if let Some(existing) = self.vendors.get_by_name(&vendor.business_name).await? {
            if existing.id != id {
                return Err(DomainError::ValidationFailed(format!(
                    "vendor name already taken: {}",
                    vendor.business_name
                )));
            }
        }

        self.vendors.update(&vendor).await?;
        Ok(vendor)
    }

    pub async fn delete_vendor(&self, id: Uuid) -> DomainResult<()> {
        self.vendors.delete(id).await
    }

    /// Remove every vendor and, with them, their services.
    pub async fn delete_all_vendors(&self, caller: Caller) -> DomainResult<u64> {
        require_admin(caller, "remove every vendor")?;
        let removed = self.vendors.delete_all().await?;
        info!(removed, "vendors deleted");
        Ok(removed)
    }

    pub async fn create_service(&self, new: NewService) -> DomainResult<Service> {
        if self.vendors.get(new.vendor_id).await?.is_none() {
            return Err(DomainError::VendorNotFound(new.vendor_id));
        }
        self.ensure_categories(&new.category_ids).await?;

        let mut service =
            Service::new(&new.name, new.price, new.vendor_id, new.image).with_categories(new.category_ids);
        if let Some(description) = new.description {
            service = service.with_description(description);
        }
        if let Some(service_type) = new.service_type {
            service = service.with_type(service_type);
        }
        if let Some(duration) = new.duration {
            service = service.with_duration(duration);
        }

        service.validate().map_err(DomainError::ValidationFailed)?;
        self.services.create(&service).await?;
        info!(service_id = %service.id, price = %service.price, "service created");
        Ok(service)
    }

    pub async fn get_service(&self, id: Uuid) -> DomainResult<Service> {
        self.services.get(id).await?.ok_or(DomainError::ServiceNotFound(id))
    }

    /// List services, optionally restricted to any of `category_ids`.
    pub async fn list_services(&self, category_ids: Vec<Uuid>) -> DomainResult<Vec<Service>> {
        self.services
            .list(ServiceFilter {
                category_ids,
                ..Default::default()
            })
            .await
    }

    /// Price changes do not touch events the service is already part of.
    pub async fn update_service(&self, id: Uuid, update: ServiceUpdate) -> DomainResult<Service> {
        let mut service = self.get_service(id).await?;
        if update.is_empty() {
            return Ok(service);
        }
        if let Some(categories) = &update.category_ids {
            self.ensure_categories(categories).await?;
        }

        update.apply(&mut service);
        service.validate().map_err(DomainError::ValidationFailed)?;
        self.services.update(&service).await?;
        Ok(service)
    }

    pub async fn delete_service(&self, id: Uuid) -> DomainResult<()> {
        self.services.delete(id).await
    }

    /// Empty the catalog. Events lose the services they held.
    pub async fn delete_all_services(&self, caller: Caller) -> DomainResult<u64> {
        require_admin(caller, "clear the catalog")?;
        let removed = self.services.delete_all().await?;
        info!(removed, "services deleted");
        Ok(removed)
    }

    async fn ensure_categories(&self, ids: &[Uuid]) -> DomainResult<()> {
        for id in ids {
            if self.categories.get(*id).await?.is_none() {
                return Err(DomainError::CategoryNotFound(*id));
            }
        }
        Ok(())
    }
}
