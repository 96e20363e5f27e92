use chrono::{FixedOffset, TimeZone, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Date, Text, Timestamptz};
use diesel_async::RunQueryDsl;
use sqltime::DateValue;
use sqltime_test::db::TestDb;
use sqltime_test::schema::{DateField, NewDateField, date_fields};

#[derive(QueryableByName)]
struct TextDate {
    #[diesel(sql_type = Text)]
    value: DateValue,
}

#[derive(QueryableByName)]
struct TimestampDate {
    #[diesel(sql_type = Timestamptz)]
    value: DateValue,
}

#[derive(QueryableByName)]
struct BoundDate {
    #[diesel(sql_type = Date)]
    value: DateValue,
}

async fn insert(db: &mut TestDb, field: NewDateField) -> anyhow::Result<DateField> {
    Ok(diesel::insert_into(date_fields::table)
        .values(&field)
        .returning(DateField::as_returning())
        .get_result(&mut db.conn)
        .await?)
}

async fn find(db: &mut TestDb, id: i32) -> anyhow::Result<DateField> {
    Ok(date_fields::table
        .find(id)
        .select(DateField::as_select())
        .first(&mut db.conn)
        .await?)
}

#[test_log::test(tokio::test)]
async fn date_field_round_trip() -> anyhow::Result<()> {
    let Some(mut db) = TestDb::create_or_skip("date_field").await? else {
        return Ok(());
    };

    let today = DateValue::today();
    let stored = insert(
        &mut db,
        NewDateField {
            target_date: today,
            optional_date: None,
        },
    )
    .await?;
    let loaded = find(&mut db, stored.id).await?;
    assert_eq!(loaded.target_date, today);
    assert_eq!(loaded.optional_date, None);

    for bound in [DateValue::min_value(), DateValue::max_value()] {
        let stored = insert(
            &mut db,
            NewDateField {
                target_date: bound,
                optional_date: Some(bound),
            },
        )
        .await?;
        let loaded = find(&mut db, stored.id).await?;
        assert_eq!(loaded.target_date, bound);
        assert_eq!(loaded.optional_date, Some(bound));
    }

    db.teardown().await
}

#[test_log::test(tokio::test)]
async fn date_field_rejects_null() -> anyhow::Result<()> {
    let Some(mut db) = TestDb::create_or_skip("date_null").await? else {
        return Ok(());
    };

    let result = diesel::sql_query("INSERT INTO date_fields (target_date) VALUES (NULL)")
        .execute(&mut db.conn)
        .await;
    assert!(matches!(
        result,
        Err(DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, _))
    ));

    db.teardown().await
}

#[test_log::test(tokio::test)]
async fn date_field_keeps_source_zone_calendar_day() -> anyhow::Result<()> {
    let Some(mut db) = TestDb::create_or_skip("date_zone").await? else {
        return Ok(());
    };

    let instant = Utc.with_ymd_and_hms(2018, 8, 20, 20, 0, 0).unwrap();
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

    let from_utc = insert(
        &mut db,
        NewDateField {
            target_date: DateValue::from_datetime(&instant),
            optional_date: None,
        },
    )
    .await?;
    let from_jst = insert(
        &mut db,
        NewDateField {
            target_date: DateValue::from_datetime(&instant.with_timezone(&tokyo)),
            optional_date: None,
        },
    )
    .await?;

    let from_utc = find(&mut db, from_utc.id).await?;
    let from_jst = find(&mut db, from_jst.id).await?;
    assert_ne!(from_utc.target_date, from_jst.target_date);
    assert_eq!(from_utc.target_date.to_string(), "2018-08-20");
    assert_eq!(from_jst.target_date.to_string(), "2018-08-21");

    db.teardown().await
}

#[test_log::test(tokio::test)]
async fn date_decodes_text_timestamp_and_bound_columns() -> anyhow::Result<()> {
    let Some(mut db) = TestDb::create_or_skip("date_decode").await? else {
        return Ok(());
    };

    let text: TextDate = diesel::sql_query("SELECT '2018-08-21'::text AS value")
        .get_result(&mut db.conn)
        .await?;
    assert_eq!(text.value, DateValue::new(2018, 8, 21, &Utc)?);

    let timestamp: TimestampDate =
        diesel::sql_query("SELECT TIMESTAMPTZ '2018-08-21 23:30:00+00' AS value")
            .get_result(&mut db.conn)
            .await?;
    assert_eq!(timestamp.value, DateValue::new(2018, 8, 21, &Utc)?);

    let bound: BoundDate = diesel::sql_query("SELECT $1 AS value")
        .bind::<Date, _>(DateValue::max_value())
        .get_result(&mut db.conn)
        .await?;
    assert_eq!(bound.value, DateValue::max_value());

    let malformed: Result<TextDate, _> = diesel::sql_query("SELECT 'not a date'::text AS value")
        .get_result(&mut db.conn)
        .await;
    assert!(matches!(malformed, Err(DieselError::DeserializationError(_))));

    let unpadded: Result<TextDate, _> = diesel::sql_query("SELECT '2018-8-1'::text AS value")
        .get_result(&mut db.conn)
        .await;
    assert!(matches!(unpadded, Err(DieselError::DeserializationError(_))));

    db.teardown().await
}

#[test]
fn json_matches_text_encoding() {
    let today = DateValue::today();
    let json = serde_json::to_string(&today).unwrap();
    assert_eq!(json, format!("\"{today}\""));
}
