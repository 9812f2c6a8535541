//! Interest repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{
    ContactSummary, HouseSummary, Interest, InterestHouseView, InterestStatus, OwnerInterestView,
    TenantInterestView,
};

const INTEREST_COLUMNS: &str = "i.id, i.house_id, i.tenant_id, i.message, i.status, \
                                i.created_at, i.updated_at";

/// Interest repository
#[derive(Clone)]
pub struct InterestRepository {
    pool: PgPool,
}

impl InterestRepository {
    /// Create a new interest repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new interest in its initial `Pending` state
    pub async fn create(
        &self,
        house_id: Uuid,
        tenant_id: Uuid,
        message: Option<&str>,
    ) -> Result<Interest> {
        info!("Recording interest of tenant {} in house {}", tenant_id, house_id);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO interests AS i (house_id, tenant_id, message)
            VALUES ($1, $2, $3)
            RETURNING {INTEREST_COLUMNS}
            "#,
        ))
        .bind(house_id)
        .bind(tenant_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        map_interest(&row)
    }

    /// Find an interest by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Interest>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {INTEREST_COLUMNS}
            FROM interests i
            WHERE i.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_interest).transpose()
    }

    /// Find the interest of one tenant in one house, if any
    pub async fn find_by_pair(&self, house_id: Uuid, tenant_id: Uuid) -> Result<Option<Interest>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {INTEREST_COLUMNS}
            FROM interests i
            WHERE i.house_id = $1 AND i.tenant_id = $2
            "#,
        ))
        .bind(house_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_interest).transpose()
    }

    /// A tenant's interests, newest first, with each house and its owner
    pub async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<TenantInterestView>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {INTEREST_COLUMNS},
                   h.id AS h_id, h.owner_id, h.title, h.description, h.address, h.city,
                   h.state, h.zipcode, h.property_type, h.bedrooms, h.bathrooms, h.area_sqft,
                   h.rent, h.available_from, h.amenities, h.status AS h_status,
                   h.created_at AS h_created_at, h.updated_at AS h_updated_at,
                   u.id AS owner_user_id, u.name AS owner_name, u.username AS owner_username,
                   u.email AS owner_email
            FROM interests i
            JOIN houses h ON h.id = i.house_id
            JOIN users u ON u.id = h.owner_id
            WHERE i.tenant_id = $1
            ORDER BY i.created_at DESC
            "#,
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_tenant_view).collect()
    }

    /// Interests across all of one owner's houses, newest first, with the
    /// tenant identity and a short house summary
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<OwnerInterestView>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {INTEREST_COLUMNS},
                   h.id AS h_id, h.title, h.address, h.city, h.rent,
                   t.id AS tenant_user_id, t.name AS tenant_name, t.username AS tenant_username,
                   t.email AS tenant_email
            FROM interests i
            JOIN houses h ON h.id = i.house_id
            JOIN users t ON t.id = i.tenant_id
            WHERE h.owner_id = $1
            ORDER BY i.created_at DESC
            "#,
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_owner_view).collect()
    }

    /// Persist a status transition
    pub async fn set_status(&self, id: Uuid, status: InterestStatus) -> Result<Interest> {
        info!("Setting interest {} status to {}", id, status);

        let row = sqlx::query(&format!(
            r#"
            UPDATE interests AS i
            SET status = $2, updated_at = now()
            WHERE i.id = $1
            RETURNING {INTEREST_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        map_interest(&row)
    }

    /// Delete an interest
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM interests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn map_interest(row: &PgRow) -> Result<Interest> {
    Ok(Interest {
        id: row.get("id"),
        house_id: row.get("house_id"),
        tenant_id: row.get("tenant_id"),
        message: row.get("message"),
        status: row
            .get::<String, _>("status")
            .parse()
            .map_err(anyhow::Error::msg)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn map_tenant_view(row: &PgRow) -> Result<TenantInterestView> {
    let interest = map_interest(row)?;

    let house = crate::models::House {
        id: row.get("h_id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        description: row.get("description"),
        address: row.get("address"),
        city: row.get("city"),
        state: row.get("state"),
        zipcode: row.get("zipcode"),
        property_type: row
            .get::<String, _>("property_type")
            .parse()
            .map_err(anyhow::Error::msg)?,
        bedrooms: row.get("bedrooms"),
        bathrooms: row.get("bathrooms"),
        area_sqft: row.get("area_sqft"),
        rent: row.get("rent"),
        available_from: row.get("available_from"),
        amenities: row.get("amenities"),
        status: row
            .get::<String, _>("h_status")
            .parse()
            .map_err(anyhow::Error::msg)?,
        created_at: row.get("h_created_at"),
        updated_at: row.get("h_updated_at"),
    };

    // contact email is visible only while the interest is approved
    let email_visible = interest.status == InterestStatus::Approved;
    let owner = ContactSummary {
        id: row.get("owner_user_id"),
        name: row.get("owner_name"),
        username: row.get("owner_username"),
        email: email_visible.then(|| row.get::<String, _>("owner_email")),
    };

    Ok(TenantInterestView {
        interest,
        house: InterestHouseView { house, owner },
    })
}

fn map_owner_view(row: &PgRow) -> Result<OwnerInterestView> {
    let interest = map_interest(row)?;

    let email_visible = interest.status == InterestStatus::Approved;
    let tenant = ContactSummary {
        id: row.get("tenant_user_id"),
        name: row.get("tenant_name"),
        username: row.get("tenant_username"),
        email: email_visible.then(|| row.get::<String, _>("tenant_email")),
    };

    let house = HouseSummary {
        id: row.get("h_id"),
        title: row.get("title"),
        address: row.get("address"),
        city: row.get("city"),
        rent: row.get("rent"),
    };

    Ok(OwnerInterestView {
        interest,
        tenant,
        house,
    })
}
