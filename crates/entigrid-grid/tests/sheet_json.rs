use entigrid_grid::{CellValue, Grid, Sheet, SheetSnapshot};

fn sample() -> Sheet {
    let mut sheet = Sheet::with_columns("people", &["name", "bio"]);
    sheet
        .push_row([Some("Ada"), Some("Born in London")])
        .unwrap();
    sheet.push_row([Some("Alan"), None]).unwrap();
    sheet
}

#[test]
fn snapshot_through_trait_matches_inherent_snapshot() {
    let mut sheet = sample();
    sheet.add_column("extra", 1, &[None, None]).unwrap();
    let via_trait = SheetSnapshot::of(&sheet as &dyn Grid);
    assert_eq!(via_trait, sheet.snapshot());
    assert_eq!(via_trait.columns, vec!["name", "extra", "bio"]);
    assert_eq!(
        via_trait.column_text("bio"),
        vec![Some("Born in London".to_string()), None]
    );
}

#[test]
fn shared_sheet_write_guard_mutates_in_place() {
    let shared = sample().into_shared();
    {
        let mut guard = shared.write();
        guard.insert_blank_row(0, 2).unwrap();
    }
    assert_eq!(shared.read().row_count(), 3);
    assert_eq!(shared.read().get_value(1, 0), Some(&CellValue::from("Ada")));
}

#[cfg(feature = "json")]
#[test]
fn json_roundtrip_preserves_slot_layout() {
    let mut sheet = sample();
    let slot = sheet.add_column("tags", 0, &[None, None]).unwrap();
    sheet.ensure_cell_slots(1, slot + 1).unwrap();
    sheet.set_cell(1, slot, "math".into()).unwrap();

    let text = sheet.to_json_string().unwrap();
    let restored = Sheet::from_json_str(&text).unwrap();
    assert_eq!(restored, sheet);
    assert_eq!(restored.column_cell_index(0), Some(slot));

    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["columns"][0]["name"], "tags");
    assert_eq!(v["rows"][1]["cells"][slot]["type"], "Text");
}
