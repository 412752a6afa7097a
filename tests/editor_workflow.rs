use csved::codec;
use csved::{AppConfig, Message, Model, Modus, Status};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new("tests/fixtures").join(name)
}

fn model(output: &Path) -> Model {
    let config = AppConfig::default().with_output_path(output.to_path_buf());
    Model::init(&config, 100, 30).unwrap()
}

fn send(model: &mut Model, messages: &[Message]) {
    for m in messages {
        model.update(Some(m.clone())).unwrap();
    }
}

fn type_line(model: &mut Model, text: &str) {
    for c in text.chars() {
        let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        model.update(Some(Message::RawKey(key))).unwrap();
    }
    let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
    model.update(Some(Message::RawKey(enter))).unwrap();
}

#[test]
fn test_edit_and_export_workflow() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("edited_data.csv");
    let mut model = model(&output);

    model.open(fixture("sales.csv"));
    assert_eq!(model.status, Status::READY);
    assert_eq!(model.table().nrows(), 4);

    // Replace the second sales figure
    send(&mut model, &[Message::MoveDown, Message::MoveRight, Message::EditCell]);
    let clear = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
    for _ in 0..5 {
        model.update(Some(Message::RawKey(clear))).unwrap();
    }
    type_line(&mut model, "140");
    assert_eq!(model.table().cell(1, 1), Some("140"));

    // Drop the first row and append an empty one
    send(
        &mut model,
        &[Message::MoveBeginning, Message::DeleteRow, Message::AddRow],
    );
    assert_eq!(model.table().nrows(), 4);
    assert_eq!(model.table().rows()[3], vec!["", "", ""]);

    send(&mut model, &[Message::Save]);
    assert!(!model.is_dirty());

    let (header, rows) = codec::decode(&output, b',').unwrap();
    assert_eq!(header, vec!["month", "sales", "region"]);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], vec!["Feb", "140", "north"]);
    assert_eq!(rows[3], vec!["", "", ""]);
}

#[test]
fn test_chart_axis_selection() {
    let dir = TempDir::new().unwrap();
    let mut model = model(&dir.path().join("out.csv"));
    model.open(fixture("sales.csv"));

    let numeric: Vec<String> = model.table().numeric_columns().into_iter().collect();
    assert_eq!(numeric, vec!["sales"]);

    send(&mut model, &[Message::ToggleChart]);
    assert_eq!(model.modus(), Modus::CHART);
    let chart = &model.get_uidata().chart;
    assert_eq!(chart.x_name, "month");
    assert_eq!(chart.y_name, "sales");
    assert_eq!(chart.points.len(), 4);
    assert_eq!(chart.x_labels, vec!["Jan", "Feb", "Apr"]);

    // Only one numeric column, y stays put
    send(&mut model, &[Message::NextYAxis]);
    assert_eq!(model.get_uidata().chart.y_name, "sales");

    // x may be any column
    send(&mut model, &[Message::NextXAxis, Message::NextXAxis]);
    assert_eq!(model.get_uidata().chart.x_name, "region");
}

#[test]
fn test_quoted_values_survive_export() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let mut model = model(&output);
    model.open(fixture("quoted.csv"));
    assert_eq!(model.table().cell(0, 1), Some("hello, world"));
    assert_eq!(model.table().cell(1, 1), Some("she said \"hi\""));
    assert_eq!(model.table().cell(2, 1), Some(""));

    send(&mut model, &[Message::Save]);
    let (header, rows) = codec::decode(&output, b',').unwrap();
    assert_eq!((header, rows), model.table().snapshot());
}

#[test]
fn test_open_and_save_as_prompts() {
    let dir = TempDir::new().unwrap();
    let mut model = model(&dir.path().join("out.csv"));

    send(&mut model, &[Message::Open]);
    assert_eq!(model.modus(), Modus::CMDINPUT);
    type_line(&mut model, &fixture("sales.csv").display().to_string());
    assert_eq!(model.modus(), Modus::TABLE);
    assert_eq!(model.table().ncols(), 3);

    let target = dir.path().join("copy.csv");
    send(&mut model, &[Message::SaveAs]);
    let clear = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
    while !model.get_uidata().cmdinput.input.is_empty() {
        model.update(Some(Message::RawKey(clear))).unwrap();
    }
    type_line(&mut model, &target.display().to_string());
    assert!(target.exists());
}

#[test]
fn test_ragged_file_is_fitted_and_reported() {
    let dir = TempDir::new().unwrap();
    let mut model = model(&dir.path().join("out.csv"));
    model.open(fixture("ragged.csv"));
    assert_eq!(model.status, Status::READY);

    let (header, rows) = model.table().snapshot();
    assert_eq!(header, vec!["a", "b", "c"]);
    assert_eq!(
        rows,
        vec![
            vec!["1", "2", "3"],
            vec!["4", "5", ""],
            vec!["6", "7", "8"]
        ]
    );
    assert!(
        model
            .get_uidata()
            .status_message
            .contains("2 ragged lines fitted to 3 columns")
    );
}

#[test]
fn test_empty_file_opens_as_empty_table() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty.csv");
    std::fs::write(&empty, "").unwrap();

    let mut model = model(&dir.path().join("out.csv"));
    model.open(empty);
    assert_eq!(model.status, Status::EMPTY);
    assert!(model.table().is_empty());
    assert!(model.get_uidata().status_message.starts_with("Loaded 0 rows"));
}

#[test]
fn test_unknown_file_type_keeps_state() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("data.json");
    std::fs::write(&other, "{}").unwrap();

    let mut model = model(&dir.path().join("out.csv"));
    model.open(fixture("sales.csv"));
    model.open(other);
    assert_eq!(model.table().nrows(), 4);
    assert!(
        model
            .get_uidata()
            .status_message
            .contains("unknown file type")
    );
}
