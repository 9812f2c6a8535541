//! House repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{House, HouseUpdate, HouseWithOwner, NewHouse, OwnerSummary};
use crate::repositories::filter::{ListingFilter, PageParams, SortParams};

const HOUSE_COLUMNS: &str = "h.id, h.owner_id, h.title, h.description, h.address, h.city, \
                             h.state, h.zipcode, h.property_type, h.bedrooms, h.bathrooms, \
                             h.area_sqft, h.rent, h.available_from, h.amenities, h.status, \
                             h.created_at, h.updated_at";

const OWNER_COLUMNS: &str = "u.id AS owner_user_id, u.name AS owner_name, \
                             u.username AS owner_username";

/// House repository
#[derive(Clone)]
pub struct HouseRepository {
    pool: PgPool,
}

impl HouseRepository {
    /// Create a new house repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new house
    pub async fn create(&self, new_house: &NewHouse) -> Result<House> {
        info!("Creating house for owner: {}", new_house.owner_id);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO houses AS h (owner_id, title, description, address, city, state, zipcode,
                                property_type, bedrooms, bathrooms, area_sqft, rent,
                                available_from, amenities)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {HOUSE_COLUMNS}
            "#,
        ))
        .bind(new_house.owner_id)
        .bind(&new_house.title)
        .bind(&new_house.description)
        .bind(&new_house.address)
        .bind(&new_house.city)
        .bind(&new_house.state)
        .bind(&new_house.zipcode)
        .bind(new_house.property_type.as_str())
        .bind(new_house.bedrooms)
        .bind(new_house.bathrooms)
        .bind(new_house.area_sqft)
        .bind(new_house.rent)
        .bind(new_house.available_from)
        .bind(&new_house.amenities)
        .fetch_one(&self.pool)
        .await?;

        map_house(&row)
    }

    /// Find a house by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<House>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {HOUSE_COLUMNS}
            FROM houses h
            WHERE h.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_house).transpose()
    }

    /// Find a house by ID together with its owner summary
    pub async fn find_with_owner(&self, id: Uuid) -> Result<Option<HouseWithOwner>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {HOUSE_COLUMNS}, {OWNER_COLUMNS}
            FROM houses h
            JOIN users u ON u.id = h.owner_id
            WHERE h.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_house_with_owner).transpose()
    }

    /// Filtered, sorted, paginated public listing with owner summaries and
    /// the total count for pagination metadata
    pub async fn list_public(
        &self,
        filter: &ListingFilter,
        sort: SortParams,
        page: PageParams,
    ) -> Result<(Vec<HouseWithOwner>, i64)> {
        let total = self.count(filter).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {HOUSE_COLUMNS}, {OWNER_COLUMNS} FROM houses h JOIN users u ON u.id = h.owner_id",
        ));
        filter.push_where(&mut qb);
        push_order_and_page(&mut qb, sort, page);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let houses = rows
            .iter()
            .map(map_house_with_owner)
            .collect::<Result<Vec<_>>>()?;

        Ok((houses, total))
    }

    /// Filtered, sorted, paginated listing scoped to one owner
    pub async fn list_by_owner(
        &self,
        filter: &ListingFilter,
        sort: SortParams,
        page: PageParams,
    ) -> Result<(Vec<House>, i64)> {
        let total = self.count(filter).await?;

        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {HOUSE_COLUMNS} FROM houses h"));
        filter.push_where(&mut qb);
        push_order_and_page(&mut qb, sort, page);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let houses = rows.iter().map(map_house).collect::<Result<Vec<_>>>()?;

        Ok((houses, total))
    }

    /// Apply an allow-listed partial update
    pub async fn update(&self, id: Uuid, update: &HouseUpdate) -> Result<House> {
        info!("Updating house: {}", id);

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE houses h SET updated_at = now()");

        if let Some(title) = &update.title {
            qb.push(", title = ");
            qb.push_bind(title.clone());
        }
        if let Some(description) = &update.description {
            qb.push(", description = ");
            qb.push_bind(description.clone());
        }
        if let Some(address) = &update.address {
            qb.push(", address = ");
            qb.push_bind(address.clone());
        }
        if let Some(city) = &update.city {
            qb.push(", city = ");
            qb.push_bind(city.clone());
        }
        if let Some(state) = &update.state {
            qb.push(", state = ");
            qb.push_bind(state.clone());
        }
        if let Some(zipcode) = &update.zipcode {
            qb.push(", zipcode = ");
            qb.push_bind(zipcode.clone());
        }
        if let Some(property_type) = update.property_type {
            qb.push(", property_type = ");
            qb.push_bind(property_type.as_str());
        }
        if let Some(bedrooms) = update.bedrooms {
            qb.push(", bedrooms = ");
            qb.push_bind(bedrooms);
        }
        if let Some(bathrooms) = update.bathrooms {
            qb.push(", bathrooms = ");
            qb.push_bind(bathrooms);
        }
        if let Some(area_sqft) = update.area_sqft {
            qb.push(", area_sqft = ");
            qb.push_bind(area_sqft);
        }
        if let Some(rent) = update.rent {
            qb.push(", rent = ");
            qb.push_bind(rent);
        }
        if let Some(available_from) = update.available_from {
            qb.push(", available_from = ");
            qb.push_bind(available_from);
        }
        if let Some(amenities) = &update.amenities {
            qb.push(", amenities = ");
            qb.push_bind(amenities.clone());
        }
        if let Some(status) = update.status {
            qb.push(", status = ");
            qb.push_bind(status.as_str());
        }

        qb.push(" WHERE h.id = ");
        qb.push_bind(id);
        qb.push(&format!(" RETURNING {HOUSE_COLUMNS}"));

        let row = qb.build().fetch_one(&self.pool).await?;
        map_house(&row)
    }

    /// Delete a house
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM houses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count(&self, filter: &ListingFilter) -> Result<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM houses h");
        filter.push_where(&mut qb);

        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }
}

fn push_order_and_page(qb: &mut QueryBuilder<'_, Postgres>, sort: SortParams, page: PageParams) {
    // sort column and direction come from a fixed allow-list, never the query string
    qb.push(format!(" ORDER BY h.{} {}", sort.column, sort.direction));
    qb.push(" LIMIT ");
    qb.push_bind(page.limit);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset());
}

pub(crate) fn map_house(row: &PgRow) -> Result<House> {
    Ok(House {
        id: row.get("id"),
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
            .get::<String, _>("status")
            .parse()
            .map_err(anyhow::Error::msg)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn map_house_with_owner(row: &PgRow) -> Result<HouseWithOwner> {
    Ok(HouseWithOwner {
        house: map_house(row)?,
        owner: OwnerSummary {
            id: row.get("owner_user_id"),
            name: row.get("owner_name"),
            username: row.get("owner_username"),
        },
    })
}
