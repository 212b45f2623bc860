use ulid::Ulid;

use crate::model::{AdminInquiry, Pagination, Venue, VenuePage, VenueSummary};

use super::validate::ListingQuery;
use super::{Engine, EngineError};

impl Engine {
    /// One page of the venue listing. The count and data reads are
    /// independent, so they run concurrently.
    pub async fn list_venues(&self, query: &ListingQuery) -> Result<VenuePage, EngineError> {
        let (total, venues) = tokio::try_join!(
            self.store.count_venues(&query.filter),
            self.store.list_venues(&query.filter, query.page),
        )?;
        Ok(VenuePage {
            data: venues,
            pagination: Pagination::new(query.page.page, query.page.limit, total),
        })
    }

    pub async fn venue(&self, id: &str) -> Result<Venue, EngineError> {
        let venue_id = Ulid::from_string(id).map_err(|_| EngineError::VenueNotFound)?;
        self.store
            .venue_by_id(venue_id)
            .await?
            .ok_or(EngineError::VenueNotFound)
    }

    /// Distinct city names, alphabetically sorted.
    pub async fn cities(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.store.cities().await?)
    }

    /// Administrative listing: every inquiry, newest first, with minimal
    /// venue info embedded. An inquiry whose venue has vanished is skipped
    /// rather than failing the whole listing.
    pub async fn list_inquiries(&self) -> Result<Vec<AdminInquiry>, EngineError> {
        let inquiries = self.store.list_inquiries().await?;
        let mut rows = Vec::with_capacity(inquiries.len());
        for inquiry in inquiries {
            if let Some(venue) = self.store.venue_by_id(inquiry.venue_id).await? {
                rows.push(AdminInquiry {
                    venue: VenueSummary::from(&venue),
                    inquiry,
                });
            }
        }
        Ok(rows)
    }
}
