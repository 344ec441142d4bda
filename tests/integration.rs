//! Integration tests for the folio table pipeline.
//!
//! These tests drive a full render pass onto a `PageRecorder` and check:
//! - Emission order of headers, banners, data and summary rows
//! - Accumulated summary values
//! - Page breaks: rows stay above the page bottom, headers repeat, group
//!   banners continue
//! - Error propagation from bad field paths
//! - JSON input

use std::cell::Cell;
use std::rc::Rc;

use folio::model::{GroupedSummarySpec, Header, Record, SummarySpec};
use folio::surface::{PageRecorder, Surface};
use folio::table::{Average, Count, Sum, Table};
use folio::{FieldValue, RenderedTable, RowKind, TableError, TableOptions};

// ─── Helpers ────────────────────────────────────────────────────

const EPSILON: f64 = 1e-6;

fn headers() -> Vec<Header> {
    vec![
        Header::value("Name", "name"),
        Header::value("City", "city"),
        Header::value("Score", "score"),
    ]
}

fn person(name: &str, city: &str, score: i32) -> Record {
    FieldValue::map([
        ("name", FieldValue::from(name)),
        ("city", FieldValue::from(city)),
        ("score", FieldValue::from(score)),
    ])
}

fn people(count: usize, city: impl Fn(usize) -> &'static str) -> Vec<Record> {
    (0..count)
        .map(|i| person(&format!("Person {}", i), city(i), i as i32))
        .collect()
}

fn render(table: &Table) -> (PageRecorder, RenderedTable) {
    let mut recorder = PageRecorder::default();
    let report = table
        .render(&mut recorder, &TableOptions::default())
        .unwrap();
    (recorder, report)
}

fn kinds(report: &RenderedTable) -> Vec<RowKind> {
    report.rows.iter().map(|r| r.kind).collect()
}

fn all_texts(recorder: &PageRecorder) -> Vec<String> {
    recorder
        .pages()
        .iter()
        .flat_map(|p| p.texts().map(str::to_string))
        .collect()
}

fn bottom_limit(recorder: &PageRecorder) -> f64 {
    recorder.content_bounds().bottom_limit()
}

// ─── Empty and simple tables ────────────────────────────────────

#[test]
fn test_empty_table_prints_header_and_placeholder() {
    let table = Table::new(headers(), Vec::<Record>::new());
    let (recorder, report) = render(&table);

    assert_eq!(kinds(&report), vec![RowKind::Header, RowKind::Empty]);
    assert_eq!(report.pages, 1);
    let texts = all_texts(&recorder);
    assert!(texts.contains(&"Name".to_string()));
    assert!(texts.contains(&"No Data".to_string()));
}

#[test]
fn test_custom_empty_text() {
    let table = Table::new(headers(), Vec::<Record>::new()).empty_text("Nothing here");
    let (recorder, _) = render(&table);
    assert!(all_texts(&recorder).contains(&"Nothing here".to_string()));
}

#[test]
fn test_rows_follow_header_in_record_order() {
    let table = Table::new(headers(), people(3, |_| "A"));
    let (_, report) = render(&table);

    assert_eq!(
        kinds(&report),
        vec![
            RowKind::Header,
            RowKind::Data(0),
            RowKind::Data(1),
            RowKind::Data(2)
        ]
    );
    // Rows are stacked without gaps.
    for pair in report.rows.windows(2) {
        assert!((pair[0].y + pair[0].height - pair[1].y).abs() < EPSILON);
    }
}

#[test]
fn test_cursor_left_below_table() {
    let table = Table::new(headers(), people(3, |_| "A"));
    let mut recorder = PageRecorder::default();
    let first = table
        .render(&mut recorder, &TableOptions::default())
        .unwrap();

    let (x, y) = recorder.cursor();
    assert!((x - 72.0).abs() < EPSILON);
    assert!((y - first.bottom).abs() < EPSILON);

    let second = table
        .render(&mut recorder, &TableOptions::default())
        .unwrap();
    assert!((second.rows[0].y - first.bottom).abs() < EPSILON);
}

#[test]
fn test_title_printed_once_above_header() {
    let table = Table::new(headers(), people(200, |_| "A")).title("Staff");
    let (recorder, report) = render(&table);

    assert!(report.pages > 1);
    assert_eq!(report.rows[0].kind, RowKind::Title);
    assert_eq!(report.rows[1].kind, RowKind::Header);
    assert_eq!(report.count(RowKind::Title), 1);
    let titles = all_texts(&recorder)
        .into_iter()
        .filter(|t| t == "Staff")
        .count();
    assert_eq!(titles, 1);
}

// ─── Grouping ───────────────────────────────────────────────────

#[test]
fn test_banner_at_each_key_change() {
    let records = vec![
        person("a", "A", 1),
        person("b", "A", 2),
        person("c", "B", 3),
    ];
    let table = Table::new(headers(), records).group_by("city");
    let (recorder, report) = render(&table);

    assert_eq!(
        kinds(&report),
        vec![
            RowKind::Header,
            RowKind::Banner,
            RowKind::Data(0),
            RowKind::Data(1),
            RowKind::Banner,
            RowKind::Data(2),
        ]
    );
    let texts = all_texts(&recorder);
    assert!(texts.contains(&"A".to_string()));
    assert!(texts.contains(&"B".to_string()));
}

#[test]
fn test_grouped_summaries_close_each_run() {
    let records = vec![
        person("a", "A", 1),
        person("b", "A", 2),
        person("c", "B", 4),
        person("d", "A", 8),
    ];
    let table = Table::new(headers(), records)
        .grouped_summary(GroupedSummarySpec::new("Total", ["city"]).column("score"))
        .accumulator("score", Sum);
    let (recorder, report) = render(&table);

    assert_eq!(
        kinds(&report),
        vec![
            RowKind::Header,
            RowKind::Data(0),
            RowKind::Data(1),
            RowKind::GroupedSummary(0),
            RowKind::Data(2),
            RowKind::GroupedSummary(0),
            RowKind::Data(3),
            RowKind::GroupedSummary(0),
        ]
    );

    let texts = all_texts(&recorder);
    let titles: Vec<&str> = texts
        .iter()
        .map(String::as_str)
        .filter(|t| t.starts_with("Total: "))
        .collect();
    assert_eq!(titles, vec!["Total: A", "Total: B", "Total: A"]);
    // 1 + 2 is the only value not also printed by a data row.
    assert!(texts.contains(&"3".to_string()));
}

#[test]
fn test_single_record_gets_its_grouped_summary() {
    let table = Table::new(headers(), vec![person("a", "A", 5)])
        .grouped_summary(GroupedSummarySpec::new("Count", ["city"]).column("name"))
        .accumulator("name", Count);
    let (recorder, report) = render(&table);

    assert_eq!(report.count(RowKind::GroupedSummary(0)), 1);
    assert!(all_texts(&recorder).contains(&"1".to_string()));
}

#[test]
fn test_grouped_summary_override_matches_key() {
    let records = vec![person("a", "A", 1), person("b", "B", 2)];
    let overrides = [
        ("city".to_string(), FieldValue::from("B")),
        ("score".to_string(), FieldValue::from("fixed")),
    ]
    .into_iter()
    .collect();
    let table = Table::new(headers(), records)
        .grouped_summary(
            GroupedSummarySpec::new("Sum", ["city"])
                .column("score")
                .override_values(overrides),
        )
        .accumulator("score", Sum);
    let (recorder, _) = render(&table);

    let texts = all_texts(&recorder);
    assert_eq!(texts.iter().filter(|t| *t == "fixed").count(), 1);
}

// ─── Static summary ─────────────────────────────────────────────

#[test]
fn test_static_summary_emitted_once_at_end() {
    let records = vec![
        person("a", "A", 10),
        person("b", "A", 20),
        person("c", "A", 60),
    ];
    let table = Table::new(headers(), records)
        .summary(SummarySpec::new("Average").column("score"))
        .accumulator("score", Average);
    let (recorder, report) = render(&table);

    assert_eq!(report.count(RowKind::Summary), 1);
    assert_eq!(report.rows.last().map(|r| r.kind), Some(RowKind::Summary));
    let texts = all_texts(&recorder);
    assert!(texts.contains(&"Average".to_string()));
    assert!(texts.contains(&"30".to_string()));
}

#[test]
fn test_running_average_closure() {
    let headers = vec![Header::value("Name", "name"), Header::value("Age", "age")];
    let records = [10, 20, 30].map(|age| {
        FieldValue::map([("name", FieldValue::from("x")), ("age", FieldValue::from(age))])
    });
    let table = Table::new(headers, records)
        .summary(SummarySpec::new("Average").column("age"))
        .aggregate(
            "age",
            |value: &FieldValue, state: Option<(f64, f64)>| {
                let (sum, count) = state.unwrap_or((0.0, 0.0));
                (sum + value.as_f64().unwrap_or(0.0), count + 1.0)
            },
            |state: Option<&(f64, f64)>| match state {
                Some((sum, count)) => FieldValue::from(sum / count),
                None => FieldValue::Null,
            },
        );
    let (recorder, report) = render(&table);

    assert_eq!(report.count(RowKind::Summary), 1);
    // Once in the data row of the second record, once in the summary.
    let twenties = all_texts(&recorder).into_iter().filter(|t| t == "20").count();
    assert_eq!(twenties, 2);
}

#[test]
fn test_static_summary_override_wins() {
    let table = Table::new(headers(), vec![person("a", "A", 10), person("b", "A", 50)])
        .summary(SummarySpec::new("Total").column("score").value("score", "n/a"))
        .accumulator("score", Sum);
    let (recorder, _) = render(&table);

    let texts = all_texts(&recorder);
    assert!(texts.contains(&"n/a".to_string()));
    assert!(!texts.contains(&"60".to_string()));
}

#[test]
fn test_closure_accumulator() {
    let table = Table::new(headers(), vec![person("a", "A", 3), person("b", "A", 4)])
        .summary(SummarySpec::new("Product").column("score"))
        .aggregate(
            "score",
            |value: &FieldValue, state: Option<f64>| {
                state.unwrap_or(1.0) * value.as_f64().unwrap_or(1.0)
            },
            |state: Option<&f64>| FieldValue::from(state.copied().unwrap_or(0.0)),
        );
    let (recorder, _) = render(&table);
    assert!(all_texts(&recorder).contains(&"12".to_string()));
}

// ─── Pagination ─────────────────────────────────────────────────

#[test]
fn test_rows_stay_above_page_bottom() {
    let table = Table::new(headers(), people(200, |_| "A"));
    let (recorder, report) = render(&table);
    let limit = bottom_limit(&recorder);

    assert!(report.pages > 1);
    assert_eq!(recorder.pages().len(), report.pages);
    for row in &report.rows {
        assert!(
            row.y + row.height <= limit + EPSILON,
            "{:?} ends below the page bottom",
            row
        );
    }
}

#[test]
fn test_header_repeats_on_every_page() {
    let table = Table::new(headers(), people(200, |_| "A"));
    let (_, report) = render(&table);

    assert_eq!(report.count(RowKind::Header), report.pages);
    for page in 0..report.pages {
        let first = report.rows.iter().find(|r| r.page == page).unwrap();
        assert_eq!(first.kind, RowKind::Header);
    }
    assert_eq!(report.rows.iter().filter(|r| matches!(r.kind, RowKind::Data(_))).count(), 200);
}

#[test]
fn test_clamped_row_fills_page_then_breaks() {
    let table = Table::new(headers(), people(200, |_| "A"));
    let (recorder, report) = render(&table);
    let limit = bottom_limit(&recorder);

    let clamped: Vec<usize> = report
        .rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.clamped)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(clamped.len(), report.pages - 1);

    for i in clamped {
        let row = &report.rows[i];
        assert!(matches!(row.kind, RowKind::Data(_)));
        assert!((row.y + row.height - limit).abs() < EPSILON);
        let next = &report.rows[i + 1];
        assert_eq!(next.kind, RowKind::Header);
        assert_eq!(next.page, row.page + 1);
    }
}

#[test]
fn test_group_banner_continues_after_break() {
    let table = Table::new(headers(), people(200, |_| "A")).group_by("city");
    let (_, report) = render(&table);

    assert!(report.pages > 1);
    assert_eq!(report.count(RowKind::Banner), report.pages);
    for page in 1..report.pages {
        let rows: Vec<RowKind> = report
            .rows
            .iter()
            .filter(|r| r.page == page)
            .take(2)
            .map(|r| r.kind)
            .collect();
        assert_eq!(rows, vec![RowKind::Header, RowKind::Banner]);
    }
}

#[test]
fn test_summary_fits_on_last_page() {
    let table = Table::new(headers(), people(200, |_| "A"))
        .summary(SummarySpec::new("Total").column("score"))
        .accumulator("score", Sum);
    let (recorder, report) = render(&table);
    let limit = bottom_limit(&recorder);

    let summary = report.rows.last().unwrap();
    assert_eq!(summary.kind, RowKind::Summary);
    assert_eq!(summary.page, report.pages - 1);
    assert!(summary.y + summary.height <= limit + EPSILON);
    // 0 + 1 + ... + 199
    assert!(all_texts(&recorder).contains(&"19900".to_string()));
}

#[test]
fn test_page_hook_runs_for_added_pages() {
    let added = Rc::new(Cell::new(0));
    let seen = Rc::clone(&added);
    let mut recorder = PageRecorder::default().on_page_added(move |_, _| {
        seen.set(seen.get() + 1);
    });
    let table = Table::new(headers(), people(200, |_| "A"));
    let report = table
        .render(&mut recorder, &TableOptions::default())
        .unwrap();

    assert_eq!(added.get(), report.pages - 1);
}

// ─── Errors ─────────────────────────────────────────────────────

#[test]
fn test_bad_path_stops_render() {
    let headers = vec![Header::value("First", "name.first")];
    let table = Table::new(headers, vec![person("a", "A", 1)]);
    let mut recorder = PageRecorder::default();
    let result = table.render(&mut recorder, &TableOptions::default());

    match result {
        Err(TableError::KeyResolution { path, .. }) => assert_eq!(path, "name.first"),
        other => panic!("expected a key resolution error, got {:?}", other),
    }
}

#[test]
fn test_missing_final_key_renders_empty_text() {
    let headers = vec![
        Header::value("Name", "name"),
        Header::value("Nick", "nick").empty("none"),
    ];
    let table = Table::new(headers, vec![person("a", "A", 1)]);
    let (recorder, _) = render(&table);
    assert!(all_texts(&recorder).contains(&"none".to_string()));
}

// ─── JSON input ─────────────────────────────────────────────────

#[test]
fn test_render_json() {
    let headers = r#"[
        { "title": "Name", "value": "name" },
        { "title": "Owner", "headers": [
            { "title": "Age", "value": "owner.age", "formats": { "number": { "fixed": 1 } } }
        ] }
    ]"#;
    let records = r#"[
        { "name": "Rex", "owner": { "age": 30 } },
        { "name": "Tom", "owner": { "age": 41.26 } }
    ]"#;
    let options = r##"{ "border": 1, "header": { "background": "#eee" } }"##;

    let pages = folio::render_json(headers, records, options).unwrap();
    assert_eq!(pages.len(), 1);
    let texts: Vec<&str> = pages[0].texts().collect();
    for expected in ["Name", "Owner", "Age", "Rex", "30.0", "41.3"] {
        assert!(texts.contains(&expected), "missing {}", expected);
    }
}

#[test]
fn test_render_json_reports_parse_errors() {
    let result = folio::render_json("[", "[]", "{}");
    assert!(matches!(result, Err(TableError::Parse { .. })));
}
