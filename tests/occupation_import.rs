mod test_support;

use serde_json::json;
use spaces_migrate::legacy::OccupationRecord;
use spaces_migrate::occupations;
use spaces_migrate::oid::OidTranslator;
use spaces_migrate::MigrationError;
use test_support::{add_space, count, legacy_id, seeded_store, space_oid, temp_dir, SPACE_CID};

fn records(value: serde_json::Value) -> Vec<OccupationRecord> {
    serde_json::from_value(value).expect("occupation records")
}

#[test]
fn daily_occupation_links_every_target_space() {
    let dir = temp_dir("spaces-occupations-daily");
    let mut conn = seeded_store(&dir);
    add_space(&conn, 1);
    add_space(&conn, 2);
    conn.execute(
        "INSERT INTO occupation_requests(id, subject) VALUES('req-1', 'Aulas')",
        [],
    )
    .expect("insert request");

    let recs = records(json!([{
        "title": "Aulas de Álgebra",
        "description": "Turno T1",
        "frequency": "DAILY",
        "beginDate": "02/09/2013", "endDate": "20/12/2013",
        "beginTime": "08:00:00", "endTime": "09:30:00",
        "saturday": true, "sunday": false,
        "intervals": [{"start": "02/09/2013 08:00:00", "end": "02/09/2013 09:30:00"}],
        "spaces": [legacy_id(1), "", null, legacy_id(2), legacy_id(1)],
        "request": "req-1"
    }]));

    let translator = OidTranslator::new(SPACE_CID);
    let summary = occupations::import_occupations(&mut conn, &translator, &recs, 1000)
        .expect("import");
    assert_eq!(summary.created, 1);
    assert_eq!(summary.space_links, 2);
    assert_eq!(summary.with_request, 1);

    let (config, request): (String, Option<String>) = conn
        .query_row("SELECT config, request_id FROM occupations", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .expect("occupation row");
    assert_eq!(request.as_deref(), Some("req-1"));
    let config: serde_json::Value = serde_json::from_str(&config).expect("config json");
    assert_eq!(config["frequency"], "WEEKLY");
    assert_eq!(config["repeatsEvery"], 1);
    assert_eq!(config["weekdays"], json!([1, 2, 3, 4, 5, 6]));
    assert_eq!(config["start"], "2013-09-02T08:00:00");
    assert_eq!(config["allDay"], false);
    assert_eq!(config["intervals"].as_array().map(Vec::len), Some(1));

    assert_eq!(
        count(&conn, &format!("SELECT COUNT(*) FROM occupation_spaces WHERE space_oid = {}", space_oid(2))),
        1
    );

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn one_off_occupation_without_valid_request() {
    let dir = temp_dir("spaces-occupations-once");
    let mut conn = seeded_store(&dir);
    add_space(&conn, 7);

    let recs = records(json!([{
        "title": "Exame",
        "beginDate": "15/01/2014", "endDate": "15/01/2014",
        "beginTime": "09:00:00", "endTime": "12:00:00",
        "spaces": [legacy_id(7)],
        "request": "gone"
    }]));

    let translator = OidTranslator::new(SPACE_CID);
    let summary = occupations::import_occupations(&mut conn, &translator, &recs, 1000)
        .expect("import");
    assert_eq!(summary.with_request, 0);

    let config: String = conn
        .query_row("SELECT config FROM occupations", [], |row| row.get(0))
        .expect("config");
    let config: serde_json::Value = serde_json::from_str(&config).expect("config json");
    assert_eq!(config["frequency"], "NEVER");
    assert!(config["weekdays"].is_null());
    assert!(config["repeatsEvery"].is_null());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn unresolved_space_aborts_and_rolls_back() {
    let dir = temp_dir("spaces-occupations-missing");
    let mut conn = seeded_store(&dir);
    add_space(&conn, 1);

    let recs = records(json!([
        {"frequency": "WEEKLY",
         "beginDate": "04/09/2013", "endDate": "20/12/2013",
         "beginTime": "10:00:00", "endTime": "11:00:00",
         "spaces": [legacy_id(1)]},
        {"frequency": "BIWEEKLY",
         "beginDate": "04/09/2013", "endDate": "20/12/2013",
         "beginTime": "10:00:00", "endTime": "11:00:00",
         "spaces": [legacy_id(1), legacy_id(404)]}
    ]));

    let translator = OidTranslator::new(SPACE_CID);
    let err = occupations::import_occupations(&mut conn, &translator, &recs, 1000)
        .expect_err("missing space must abort");
    match err {
        MigrationError::MissingSpace(id) => assert_eq!(id, legacy_id(404)),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM occupations"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM occupation_spaces"), 0);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn biweekly_occupation_repeats_every_two_weeks_on_start_day() {
    let dir = temp_dir("spaces-occupations-biweekly");
    let mut conn = seeded_store(&dir);
    add_space(&conn, 3);

    let recs = records(json!([{
        "frequency": "BIWEEKLY",
        "beginDate": "04/09/2013", "endDate": "18/12/2013",
        "beginTime": "14:00:00", "endTime": "16:00:00",
        "spaces": [legacy_id(3)]
    }]));

    let translator = OidTranslator::new(SPACE_CID);
    occupations::import_occupations(&mut conn, &translator, &recs, 1000).expect("import");

    let config: String = conn
        .query_row("SELECT config FROM occupations", [], |row| row.get(0))
        .expect("config");
    let config: serde_json::Value = serde_json::from_str(&config).expect("config json");
    assert_eq!(config["repeatsEvery"], 2);
    assert_eq!(config["weekdays"], json!([3]));

    let _ = std::fs::remove_dir_all(dir);
}
