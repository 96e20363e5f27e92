//! Tables the integration tests persist column values into.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, SimpleAsyncConnection};
use sqltime::{DateTimeValue, DateValue};

diesel::table! {
    date_fields (id) {
        id -> Int4,
        target_date -> Date,
        optional_date -> Nullable<Date>,
    }
}

diesel::table! {
    date_time_fields (id) {
        id -> Int4,
        target_date -> Timestamptz,
        wall_clock -> Nullable<Timestamp>,
    }
}

const CREATE_TABLES: &str = "
    CREATE TABLE date_fields (
        id SERIAL PRIMARY KEY,
        target_date DATE NOT NULL,
        optional_date DATE
    );
    CREATE TABLE date_time_fields (
        id SERIAL PRIMARY KEY,
        target_date TIMESTAMPTZ NOT NULL,
        wall_clock TIMESTAMP
    );
";

/// ## Summary
/// Creates the test tables in a fresh database.
///
/// ## Errors
/// Returns an error if the DDL fails.
pub async fn create_tables(conn: &mut AsyncPgConnection) -> QueryResult<()> {
    conn.batch_execute(CREATE_TABLES).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = date_fields)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DateField {
    pub id: i32,
    pub target_date: DateValue,
    pub optional_date: Option<DateValue>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = date_fields)]
pub struct NewDateField {
    pub target_date: DateValue,
    pub optional_date: Option<DateValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = date_time_fields)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DateTimeField {
    pub id: i32,
    pub target_date: DateTimeValue,
    pub wall_clock: Option<DateTimeValue>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = date_time_fields)]
pub struct NewDateTimeField {
    pub target_date: DateTimeValue,
    pub wall_clock: Option<DateTimeValue>,
}
