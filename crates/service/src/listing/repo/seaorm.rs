//! SeaORM-backed listing repository.
//!
//! The eight listing tables share one shape, so statements are built with
//! `sea_query` against `Alias::new(kind.table_name())` instead of per-kind
//! entities.
use std::collections::HashMap;

use async_trait::async_trait;
use models::listing::ListingIden;
use models::{comment, Listing, ListingKind, ListingRow};
use sea_orm::sea_query::extension::postgres::PgBinOper;
use sea_orm::sea_query::{Alias, Asterisk, Expr, Func, LikeExpr, Order, Query, SelectStatement, SimpleExpr};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, StatementBuilder, Value};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::listing::repository::{ListingFilter, ListingRepository};
use crate::pagination::Pagination;

pub struct SeaOrmListingRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct RatingRow {
    id: Uuid,
    average_stars: Option<f64>,
}

fn table(kind: ListingKind) -> Alias {
    Alias::new(kind.table_name())
}

fn json<T: Serialize>(value: &T) -> Result<SimpleExpr, ServiceError> {
    let v = serde_json::to_value(value).map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(Value::Json(Some(Box::new(v))).into())
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Column/value pairs written on insert and update.
fn mutable_columns(listing: &Listing) -> Result<Vec<(ListingIden, SimpleExpr)>, ServiceError> {
    Ok(vec![
        (ListingIden::Name, listing.name.clone().into()),
        (ListingIden::Location, json(&listing.location)?),
        (ListingIden::Images, listing.images.clone().into()),
        (ListingIden::Offers, listing.offers.clone().into()),
        (ListingIden::CodArea, listing.cod_area.clone().into()),
        (ListingIden::Phone, listing.phone.clone().into()),
        (ListingIden::City, listing.city.clone().into()),
        (ListingIden::Country, listing.country.clone().into()),
        (ListingIden::Web, listing.web.clone().into()),
        (ListingIden::Time, json(&listing.time)?),
        (ListingIden::Zone, listing.zone.as_str().into()),
        (ListingIden::Categories, listing.categories.clone().unwrap_or_default().into()),
        (ListingIden::IsActive, listing.is_active.into()),
        (ListingIden::UserId, listing.user_id.into()),
        (ListingIden::UpdatedAt, listing.updated_at.into()),
    ])
}

fn active_filter(kind: ListingKind, filter: &ListingFilter, query: &mut SelectStatement) {
    let t = table(kind);
    query.and_where(Expr::col((t.clone(), ListingIden::IsActive)).eq(true));
    match filter {
        ListingFilter::NameContains(needle) if !needle.is_empty() => {
            let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
            query.and_where(
                Expr::expr(Func::lower(Expr::col((t, ListingIden::Name))))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }
        ListingFilter::NameContains(_) => {}
        ListingFilter::CategoriesOverlap(values) => {
            query.and_where(
                Expr::col((t, ListingIden::Categories)).binary(PgBinOper::Overlap, Expr::val(values.clone())),
            );
        }
    }
}

impl SeaOrmListingRepository {
    async fn fetch(&self, kind: ListingKind, query: &SelectStatement) -> Result<Vec<Listing>, ServiceError> {
        let stmt = self.db.get_database_backend().build(query);
        let rows = ListingRow::find_by_statement(stmt).all(&self.db).await?;
        rows.into_iter()
            .map(|r| r.into_listing(kind).map_err(ServiceError::from))
            .collect()
    }

    async fn fetch_one<S: StatementBuilder>(
        &self,
        kind: ListingKind,
        query: &S,
    ) -> Result<Option<Listing>, ServiceError> {
        let stmt = self.db.get_database_backend().build(query);
        let row = ListingRow::find_by_statement(stmt).one(&self.db).await?;
        row.map(|r| r.into_listing(kind).map_err(ServiceError::from)).transpose()
    }
}

#[async_trait]
impl ListingRepository for SeaOrmListingRepository {
    async fn search_active(
        &self,
        kind: ListingKind,
        filter: &ListingFilter,
        page: Option<Pagination>,
    ) -> Result<Vec<Listing>, ServiceError> {
        let t = table(kind);
        let mut query = Query::select();
        query
            .column(Asterisk)
            .from(t.clone())
            .order_by((t.clone(), ListingIden::CreatedAt), Order::Asc)
            .order_by((t, ListingIden::Id), Order::Asc);
        active_filter(kind, filter, &mut query);
        if let Some(p) = page {
            query.limit(p.limit()).offset(p.offset());
        }
        self.fetch(kind, &query).await
    }

    async fn count_active(&self, kind: ListingKind, filter: &ListingFilter) -> Result<u64, ServiceError> {
        let t = table(kind);
        let mut query = Query::select();
        query
            .expr_as(Expr::col((t.clone(), ListingIden::Id)).count(), Alias::new("total"))
            .from(t);
        active_filter(kind, filter, &mut query);
        let stmt = self.db.get_database_backend().build(&query);
        let total: i64 = match self.db.query_one(stmt).await? {
            Some(row) => row.try_get("", "total")?,
            None => 0,
        };
        Ok(total.max(0) as u64)
    }

    async fn list_by_owner(&self, kind: ListingKind, user_id: Uuid) -> Result<Vec<Listing>, ServiceError> {
        let t = table(kind);
        let query = Query::select()
            .column(Asterisk)
            .from(t.clone())
            .and_where(Expr::col((t.clone(), ListingIden::UserId)).eq(user_id))
            .order_by((t.clone(), ListingIden::CreatedAt), Order::Asc)
            .order_by((t, ListingIden::Id), Order::Asc)
            .to_owned();
        self.fetch(kind, &query).await
    }

    async fn get(&self, kind: ListingKind, id: Uuid) -> Result<Option<Listing>, ServiceError> {
        let t = table(kind);
        let query = Query::select()
            .column(Asterisk)
            .from(t.clone())
            .and_where(Expr::col((t, ListingIden::Id)).eq(id))
            .to_owned();
        self.fetch_one(kind, &query).await
    }

    async fn insert(&self, kind: ListingKind, listing: &Listing) -> Result<Listing, ServiceError> {
        let mut pairs = mutable_columns(listing)?;
        pairs.push((ListingIden::Id, listing.id.into()));
        pairs.push((ListingIden::CreatedAt, listing.created_at.into()));
        let (columns, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();

        let mut query = Query::insert();
        query
            .into_table(table(kind))
            .columns(columns)
            .values(values)
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .returning_all();
        debug!(table = kind.table_name(), id = %listing.id, "inserting listing");
        self.fetch_one(kind, &query)
            .await?
            .ok_or_else(|| ServiceError::Db("insert returned no row".into()))
    }

    async fn save(&self, kind: ListingKind, listing: &Listing) -> Result<Listing, ServiceError> {
        let query = Query::update()
            .table(table(kind))
            .values(mutable_columns(listing)?)
            .and_where(Expr::col(ListingIden::Id).eq(listing.id))
            .returning_all()
            .to_owned();
        self.fetch_one(kind, &query)
            .await?
            .ok_or_else(|| ServiceError::not_found(kind.label()))
    }

    async fn delete(&self, kind: ListingKind, id: Uuid) -> Result<bool, ServiceError> {
        let query = Query::delete()
            .from_table(table(kind))
            .and_where(Expr::col(ListingIden::Id).eq(id))
            .to_owned();
        let res = self.db.execute(self.db.get_database_backend().build(&query)).await?;
        Ok(res.rows_affected() > 0)
    }

    async fn average_stars(
        &self,
        kind: ListingKind,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Option<f64>>, ServiceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let t = table(kind);
        let query = Query::select()
            .expr_as(Expr::col((t.clone(), ListingIden::Id)), Alias::new("id"))
            .expr_as(
                Func::avg(Expr::col((comment::Entity, comment::Column::Stars))),
                Alias::new("average_stars"),
            )
            .from(t.clone())
            .left_join(
                comment::Entity,
                Expr::col((comment::Entity, comment::listing_column(kind))).equals((t.clone(), ListingIden::Id)),
            )
            .and_where(Expr::col((t.clone(), ListingIden::Id)).is_in(ids.iter().copied()))
            .group_by_col((t, ListingIden::Id))
            .to_owned();
        let stmt = self.db.get_database_backend().build(&query);
        let rows = RatingRow::find_by_statement(stmt).all(&self.db).await?;
        Ok(rows.into_iter().map(|r| (r.id, r.average_stars)).collect())
    }
}
