//! Vacation listing query
//!
//! Builds the filtered, paginated listing of vacations together with the
//! per-row follower count and the viewer's follow flag. Every value taken from
//! the request is bound as a parameter.

use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};
use tracing::warn;

use crate::middleware::Principal;

/// Rows per listing page
pub const PAGE_SIZE: i64 = 10;

/// Named predicate narrowing the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VacationFilter {
    #[default]
    All,
    /// Starts after today
    Upcoming,
    /// Started on or before today and ends on or after today
    Active,
    /// Followed by the viewer
    Followed,
}

impl VacationFilter {
    /// Parse the `filter` query parameter; unknown values mean no filter
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("upcoming") => VacationFilter::Upcoming,
            Some("active") => VacationFilter::Active,
            Some("followed") => VacationFilter::Followed,
            _ => VacationFilter::All,
        }
    }
}

/// Parse the `page` query parameter; anything but a positive integer is page 1
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

/// One listing request, resolved against the caller and the current day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingQuery {
    page: i64,
    filter: VacationFilter,
    viewer: Option<i64>,
    today: NaiveDate,
}

impl ListingQuery {
    pub fn new(page: i64, filter: VacationFilter, principal: &Principal, today: NaiveDate) -> Self {
        Self {
            page: page.max(1),
            filter,
            viewer: principal.user_id(),
            today,
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(PAGE_SIZE)
    }

    fn push_where(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        match self.filter {
            VacationFilter::All => {}
            VacationFilter::Upcoming => {
                builder.push(" WHERE v.start_date > ").push_bind(self.today);
            }
            VacationFilter::Active => {
                builder
                    .push(" WHERE v.start_date <= ")
                    .push_bind(self.today)
                    .push(" AND v.end_date >= ")
                    .push_bind(self.today);
            }
            VacationFilter::Followed => match self.viewer {
                Some(user_id) => {
                    builder
                        .push(
                            " WHERE EXISTS (SELECT 1 FROM followers f2 \
                             WHERE f2.vacation_id = v.id AND f2.user_id = ",
                        )
                        .push_bind(user_id)
                        .push(")");
                }
                None => {
                    warn!("Followed filter requested without an identity, listing all vacations");
                }
            },
        }
    }

    /// `SELECT COUNT(*)` over the filtered vacations, one row per vacation
    pub fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM vacations v");
        self.push_where(&mut builder);
        builder
    }

    /// The requested page, enriched with `followers_count` and `is_followed`
    pub fn page_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(
            "SELECT v.id, v.destination, v.description, v.start_date, v.end_date, \
             v.price, v.image_name, COUNT(f.user_id) AS followers_count, ",
        );

        match self.viewer {
            Some(user_id) => {
                builder
                    .push(
                        "EXISTS (SELECT 1 FROM followers fx \
                         WHERE fx.vacation_id = v.id AND fx.user_id = ",
                    )
                    .push_bind(user_id)
                    .push(")");
            }
            None => {
                builder.push("FALSE");
            }
        }

        builder.push(
            " AS is_followed FROM vacations v LEFT JOIN followers f ON f.vacation_id = v.id",
        );
        self.push_where(&mut builder);
        builder
            .push(" GROUP BY v.id ORDER BY v.start_date ASC, v.id ASC LIMIT ")
            .push_bind(PAGE_SIZE)
            .push(" OFFSET ")
            .push_bind(self.offset());

        builder
    }
}
