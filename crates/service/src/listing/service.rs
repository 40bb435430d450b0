use std::sync::Arc;

use chrono::Utc;
use models::{Listing, ListingKind};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::form::ListingForm;
use super::repository::{ListingFilter, ListingRepository};
use crate::errors::ServiceError;
use crate::media::{upload_all, MediaFile, MediaStore};
use crate::pagination::Pagination;

/// A listing annotated with its mean comment rating.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub average_stars: Option<f64>,
}

/// One page of a search. `current_page` is `None` when the category search
/// ran without pagination.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub current_page: Option<u32>,
    pub total_results: u64,
    pub items: Vec<RatedListing>,
}

/// Drop empty image entries left behind by clients.
fn normalize_images(mut listing: Listing) -> Listing {
    listing.images.retain(|url| !url.trim().is_empty());
    listing
}

/// Search and mutation over every listing kind.
pub struct ListingService {
    repo: Arc<dyn ListingRepository>,
    media: Arc<dyn MediaStore>,
}

impl ListingService {
    pub fn new(repo: Arc<dyn ListingRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self { repo, media }
    }

    async fn rate(&self, kind: ListingKind, listings: Vec<Listing>) -> Result<Vec<RatedListing>, ServiceError> {
        let ids: Vec<Uuid> = listings.iter().map(|l| l.id).collect();
        let ratings = self.repo.average_stars(kind, &ids).await?;
        Ok(listings
            .into_iter()
            .map(|l| RatedListing {
                average_stars: ratings.get(&l.id).copied().flatten(),
                listing: normalize_images(l),
            })
            .collect())
    }

    async fn search(
        &self,
        kind: ListingKind,
        filter: ListingFilter,
        page: Option<Pagination>,
    ) -> Result<ListingPage, ServiceError> {
        let listings = self.repo.search_active(kind, &filter, page).await?;
        let total_results = self.repo.count_active(kind, &filter).await?;
        let items = self.rate(kind, listings).await?;
        Ok(ListingPage { current_page: page.map(|p| p.page), total_results, items })
    }

    /// Active listings whose name contains `search`, one page at a time.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn list_active(
        &self,
        kind: ListingKind,
        search: Option<&str>,
        page: Pagination,
    ) -> Result<ListingPage, ServiceError> {
        let filter = ListingFilter::NameContains(search.unwrap_or_default().to_string());
        self.search(kind, filter, Some(page)).await
    }

    /// Active listings sharing at least one category with `categories`.
    ///
    /// Fails with `NotFound` when the requested page holds no listing.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn list_by_category(
        &self,
        kind: ListingKind,
        categories: &[String],
        page: Option<Pagination>,
    ) -> Result<ListingPage, ServiceError> {
        let wanted: Vec<String> = categories
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if wanted.is_empty() {
            return Err(ServiceError::validation("categories is required"));
        }
        kind.validate_categories(&wanted)?;

        let result = self.search(kind, ListingFilter::CategoriesOverlap(wanted), page).await?;
        if result.items.is_empty() {
            return Err(ServiceError::NotFound(format!("{} listings not found", kind.label())));
        }
        Ok(result)
    }

    /// Every listing owned by `user_id`, active or not, without ratings.
    pub async fn list_by_owner(&self, kind: ListingKind, user_id: Uuid) -> Result<Vec<Listing>, ServiceError> {
        let listings = self.repo.list_by_owner(kind, user_id).await?;
        Ok(listings.into_iter().map(normalize_images).collect())
    }

    /// Validate the form, upload every image, then persist an active listing.
    #[instrument(skip(self, form, files), fields(kind = %kind, files = files.len()))]
    pub async fn create(
        &self,
        kind: ListingKind,
        form: ListingForm,
        files: Vec<MediaFile>,
    ) -> Result<Listing, ServiceError> {
        let mut listing = form.into_new_listing(kind, Utc::now().into())?;
        listing.images = upload_all(self.media.as_ref(), &kind.upload_folder(), files).await?;

        let created = self.repo.insert(kind, &listing).await?;
        common::metrics::LISTINGS_CREATED_TOTAL.inc();
        info!(id = %created.id, user_id = %created.user_id, images = created.images.len(), "listing_created");
        Ok(normalize_images(created))
    }

    /// Fill-if-missing update; new uploads are appended to the stored images.
    #[instrument(skip(self, form, files), fields(kind = %kind, files = files.len()))]
    pub async fn update(
        &self,
        kind: ListingKind,
        id: Uuid,
        form: ListingForm,
        files: Vec<MediaFile>,
    ) -> Result<Listing, ServiceError> {
        let mut listing = self
            .repo
            .get(kind, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(kind.label()))?;
        form.merge_into(kind, &mut listing)?;

        let uploaded = upload_all(self.media.as_ref(), &kind.upload_folder(), files).await?;
        listing.images.extend(uploaded);
        listing.updated_at = Utc::now().into();

        let saved = self.repo.save(kind, &listing).await?;
        info!(id = %saved.id, "listing_updated");
        Ok(normalize_images(saved))
    }

    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn toggle_active(&self, kind: ListingKind, id: Uuid) -> Result<Listing, ServiceError> {
        let mut listing = self
            .repo
            .get(kind, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(kind.label()))?;
        listing.is_active = !listing.is_active;
        listing.updated_at = Utc::now().into();
        let saved = self.repo.save(kind, &listing).await?;
        info!(id = %saved.id, is_active = saved.is_active, "listing_toggled");
        Ok(normalize_images(saved))
    }

    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn delete(&self, kind: ListingKind, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(kind, id).await? {
            return Err(ServiceError::not_found(kind.label()));
        }
        info!(%id, "listing_deleted");
        Ok(())
    }
}
