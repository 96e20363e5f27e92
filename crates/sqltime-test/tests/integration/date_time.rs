use chrono::TimeDelta;
use chrono_tz::Asia::Tokyo;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Text, Timestamp};
use diesel_async::RunQueryDsl;
use sqltime::DateTimeValue;
use sqltime_test::db::TestDb;
use sqltime_test::schema::{DateTimeField, NewDateTimeField, date_time_fields};

#[derive(QueryableByName)]
struct TextDateTime {
    #[diesel(sql_type = Text)]
    value: DateTimeValue,
}

#[derive(QueryableByName)]
struct WallClock {
    #[diesel(sql_type = Timestamp)]
    value: DateTimeValue,
}

async fn insert(db: &mut TestDb, field: NewDateTimeField) -> anyhow::Result<DateTimeField> {
    Ok(diesel::insert_into(date_time_fields::table)
        .values(&field)
        .returning(DateTimeField::as_returning())
        .get_result(&mut db.conn)
        .await?)
}

async fn find(db: &mut TestDb, id: i32) -> anyhow::Result<DateTimeField> {
    Ok(date_time_fields::table
        .find(id)
        .select(DateTimeField::as_select())
        .first(&mut db.conn)
        .await?)
}

#[test_log::test(tokio::test)]
async fn date_time_field_round_trip() -> anyhow::Result<()> {
    let Some(mut db) = TestDb::create_or_skip("date_time_field").await? else {
        return Ok(());
    };

    let now = DateTimeValue::now().truncate(TimeDelta::seconds(1))?;
    let stored = insert(
        &mut db,
        NewDateTimeField {
            target_date: now,
            wall_clock: None,
        },
    )
    .await?;
    let loaded = find(&mut db, stored.id).await?;
    assert_eq!(loaded.target_date, now);
    assert_eq!(loaded.wall_clock, None);

    for bound in [DateTimeValue::min_value(), DateTimeValue::max_value()] {
        let stored = insert(
            &mut db,
            NewDateTimeField {
                target_date: bound,
                wall_clock: Some(bound),
            },
        )
        .await?;
        let loaded = find(&mut db, stored.id).await?;
        assert_eq!(loaded.target_date, bound);
        assert_eq!(loaded.wall_clock, Some(bound));
    }

    db.teardown().await
}

#[test_log::test(tokio::test)]
async fn date_time_field_rejects_null() -> anyhow::Result<()> {
    let Some(mut db) = TestDb::create_or_skip("date_time_null").await? else {
        return Ok(());
    };

    let result = diesel::sql_query("INSERT INTO date_time_fields (target_date) VALUES (NULL)")
        .execute(&mut db.conn)
        .await;
    assert!(matches!(
        result,
        Err(DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, _))
    ));

    db.teardown().await
}

#[test_log::test(tokio::test)]
async fn date_time_field_stores_the_instant_not_the_zone() -> anyhow::Result<()> {
    let Some(mut db) = TestDb::create_or_skip("date_time_zone").await? else {
        return Ok(());
    };

    let now_utc = DateTimeValue::now().utc().truncate(TimeDelta::microseconds(1))?;
    let now_jst = now_utc.in_timezone(&Tokyo);

    let from_utc = insert(
        &mut db,
        NewDateTimeField {
            target_date: now_utc,
            wall_clock: Some(now_utc),
        },
    )
    .await?;
    let from_jst = insert(
        &mut db,
        NewDateTimeField {
            target_date: now_jst,
            wall_clock: Some(now_jst),
        },
    )
    .await?;

    let from_utc = find(&mut db, from_utc.id).await?;
    let from_jst = find(&mut db, from_jst.id).await?;
    assert_eq!(from_utc.target_date, from_jst.target_date);
    assert_eq!(from_utc.wall_clock, from_jst.wall_clock);
    assert_eq!(from_jst.target_date, now_utc);

    db.teardown().await
}

#[test_log::test(tokio::test)]
async fn date_time_decodes_text_and_naive_columns() -> anyhow::Result<()> {
    let Some(mut db) = TestDb::create_or_skip("date_time_decode").await? else {
        return Ok(());
    };

    let expected = DateTimeValue::new(2018, 8, 21, 15, 4, 5, 123_456_000, &chrono::Utc)?;

    let text: TextDateTime = diesel::sql_query("SELECT '2018-08-21 15:04:05.123456'::text AS value")
        .get_result(&mut db.conn)
        .await?;
    assert_eq!(text.value, expected);

    let naive: WallClock =
        diesel::sql_query("SELECT TIMESTAMP '2018-08-21 15:04:05.123456' AS value")
            .get_result(&mut db.conn)
            .await?;
    assert_eq!(naive.value, expected);

    let malformed: Result<TextDateTime, _> =
        diesel::sql_query("SELECT '2018-08-21T15:04:05Z'::text AS value")
            .get_result(&mut db.conn)
            .await;
    assert!(matches!(malformed, Err(DieselError::DeserializationError(_))));

    db.teardown().await
}

#[test]
fn json_matches_text_encoding() {
    let now = DateTimeValue::now();
    let json = serde_json::to_string(&now).unwrap();
    assert_eq!(json, format!("\"{now}\""));
}
