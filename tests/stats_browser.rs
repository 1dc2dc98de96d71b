use std::fs;

use laliga_dashboard::stats_browser::{
    StatsPane, format_label, list_stats_files, load_stats_file, page_count, page_range,
};

#[test]
fn labels_come_from_file_names() {
    assert_eq!(format_label("datasets/stats/top_scorers.csv".as_ref()), "Top Scorers");
    assert_eq!(format_label("goalkeeper_SAVES.csv".as_ref()), "Goalkeeper Saves");
    assert_eq!(format_label("assists.csv".as_ref()), "Assists");
}

#[test]
fn lists_only_csv_files_sorted() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("top_scorers.csv"), "player,goals\nA,3\n").expect("write");
    fs::write(dir.path().join("assists.csv"), "player,assists\nB,2\n").expect("write");
    fs::write(dir.path().join("notes.txt"), "not a table").expect("write");
    fs::create_dir(dir.path().join("nested.csv")).expect("mkdir");

    let files = list_stats_files(dir.path());
    let labels: Vec<&str> = files.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, ["Assists", "Top Scorers"]);
}

#[test]
fn missing_directory_lists_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(list_stats_files(&dir.path().join("absent")).is_empty());
}

#[test]
fn good_file_loads_as_table() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("top_scorers.csv");
    fs::write(&path, "player,team,goals\nDovbyk,Girona,24\nSorloth,Villarreal,23\n")
        .expect("write");

    let StatsPane::Table(table) = load_stats_file(&path) else {
        panic!("file should load");
    };
    assert_eq!(table.row_count(), 2);
    let first: Vec<String> = table.columns().iter().map(|c| c.data.display(0)).collect();
    assert_eq!(first, ["Dovbyk", "Girona", "24"]);
}

#[test]
fn broken_files_report_inline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ragged = dir.path().join("ragged.csv");
    fs::write(&ragged, "player,goals\nA,1\nB\n").expect("write");

    for path in [ragged, dir.path().join("vanished.csv")] {
        match load_stats_file(&path) {
            StatsPane::Error(msg) => assert!(msg.starts_with("Error loading file: "), "{msg}"),
            StatsPane::Table(_) => panic!("{} should not load", path.display()),
        }
    }
}

#[test]
fn pagination_uses_twenty_row_pages() {
    assert_eq!(page_count(380, 20), 19);
    assert_eq!(page_range(380, 20, 0), 0..20);
    assert_eq!(page_range(380, 20, 18), 360..380);
    assert_eq!(page_range(15, 20, 3), 0..15);
}
